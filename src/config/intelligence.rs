// ABOUTME: Process-wide plan calculator configuration with environment overrides
// ABOUTME: OnceLock singleton over PlanConfig, tuned through CALAI_PLAN_* variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Intelligence Configuration
//!
//! Wraps [`PlanConfig`] in a lazily loaded global. Overrides:
//!
//! ```bash
//! export CALAI_PLAN_CALORIE_FLOOR=1400
//! export CALAI_PLAN_FAT_PERCENT=30
//! export CALAI_PLAN_LOSE_ADJUSTMENT=-400
//! export CALAI_PLAN_GAIN_ADJUSTMENT=250
//! export CALAI_PLAN_GAIN_PROTEIN_FACTOR=2.0
//! export CALAI_PLAN_LOSE_PROTEIN_FACTOR=1.4
//! ```

use std::sync::OnceLock;

use calai_intelligence::{ConfigError, PlanConfig};

static INTELLIGENCE_CONFIG: OnceLock<IntelligenceConfig> = OnceLock::new();

/// Configuration of the pure computation core
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntelligenceConfig {
    /// Plan calculator settings
    pub plan: PlanConfig,
}

impl IntelligenceConfig {
    /// Get the global configuration, loading it on first use
    ///
    /// Invalid overrides are logged and the defaults are used instead.
    pub fn global() -> &'static Self {
        INTELLIGENCE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                tracing::warn!("Failed to load intelligence config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an override does not parse or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.plan.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let plan = &mut self.plan;

        if let Some(val) = parse_override("CALAI_PLAN_CALORIE_FLOOR")? {
            plan.goal_adjustments.calorie_floor_kcal = val;
        }
        if let Some(val) = parse_override("CALAI_PLAN_FAT_PERCENT")? {
            plan.macro_split.fat_percent_of_calories = val;
        }
        if let Some(val) = parse_override("CALAI_PLAN_LOSE_ADJUSTMENT")? {
            plan.goal_adjustments.lose_weight_kcal = val;
        }
        if let Some(val) = parse_override("CALAI_PLAN_GAIN_ADJUSTMENT")? {
            plan.goal_adjustments.gain_muscle_kcal = val;
        }
        if let Some(val) = parse_override("CALAI_PLAN_GAIN_PROTEIN_FACTOR")? {
            plan.protein.gain_muscle_g_per_kg = val;
        }
        if let Some(val) = parse_override("CALAI_PLAN_LOSE_PROTEIN_FACTOR")? {
            plan.protein.lose_weight_g_per_kg = val;
        }

        Ok(self)
    }
}

fn parse_override(key: &str) -> Result<Option<f64>, ConfigError> {
    std::env::var(key).map_or(Ok(None), |val| {
        val.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ConfigError::Parse(format!("Invalid {key}")))
    })
}
