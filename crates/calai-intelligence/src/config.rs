// ABOUTME: Plan calculator configuration: Mifflin-St Jeor coefficients, multipliers, and macro policy
// ABOUTME: Defaults reproduce the published formula; validate() guards environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Plan Calculator Configuration
//!
//! Type-safe configuration for the nutrition plan calculator. Every constant
//! used by [`crate::plan_calculator`] lives here so that overrides can be
//! applied and validated in one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value or pair of values is outside its accepted range
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// An override could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A single value is outside its accepted range
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

/// BMR (Basal Metabolic Rate) calculation configuration
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
    /// Constant for gender `other`: mean of the male and female constants (-78)
    pub msj_other_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: -5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
            msj_other_constant: -78.0,
        }
    }
}

/// Activity factor multipliers for TDEE calculation
///
/// Reference: `McArdle`, W.D., Katch, F.I., & Katch, V.L. (2010). Exercise Physiology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Light: 1.375
    pub light: f64,
    /// Moderate: 1.55
    pub moderate: f64,
    /// Active: 1.725
    pub active: f64,
    /// Very active: 1.9
    pub very_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            active: 1.725,
            very_active: 1.9,
        }
    }
}

/// Calorie adjustment applied to TDEE per goal (kcal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAdjustmentConfig {
    /// Deficit for `lose_weight` (-500)
    pub lose_weight_kcal: f64,
    /// Adjustment for `maintain` (0)
    pub maintain_kcal: f64,
    /// Surplus for `gain_muscle` (+300)
    pub gain_muscle_kcal: f64,
    /// Lowest calorie target ever produced (1200)
    pub calorie_floor_kcal: f64,
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            lose_weight_kcal: -500.0,
            maintain_kcal: 0.0,
            gain_muscle_kcal: 300.0,
            calorie_floor_kcal: 1200.0,
        }
    }
}

/// Protein factors (g per kg bodyweight) per goal
///
/// Reference: Phillips & Van Loon (2011) DOI: 10.1080/02640414.2011.619204
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinFactorConfig {
    /// `maintain`: 1.0
    pub maintain_g_per_kg: f64,
    /// `gain_muscle`: midpoint of 1.6-2.2
    pub gain_muscle_g_per_kg: f64,
    /// `lose_weight`: midpoint of 1.2-1.5
    pub lose_weight_g_per_kg: f64,
}

impl ProteinFactorConfig {
    /// Accepted range for the `gain_muscle` factor
    pub const GAIN_RANGE: (f64, f64) = (1.6, 2.2);
    /// Accepted range for the `lose_weight` factor
    pub const LOSE_RANGE: (f64, f64) = (1.2, 1.5);
}

impl Default for ProteinFactorConfig {
    fn default() -> Self {
        Self {
            maintain_g_per_kg: 1.0,
            gain_muscle_g_per_kg: 1.9,
            lose_weight_g_per_kg: 1.35,
        }
    }
}

/// Split of the calories left after protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSplitConfig {
    /// Fat share of the total calorie target, percent (25)
    pub fat_percent_of_calories: f64,
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            fat_percent_of_calories: 25.0,
        }
    }
}

/// Safe plan used when neither the collaborator nor the local formula succeeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackPlanConfig {
    /// Calories (2000)
    pub calories_kcal: f64,
    /// Protein factor applied to weight (1.6 g/kg)
    pub protein_g_per_kg: f64,
    /// Carbs (200 g)
    pub carbs_g: f64,
    /// Fat (65 g)
    pub fat_g: f64,
    /// Reasoning text attached to the fallback plan
    pub reasoning: String,
}

impl Default for FallbackPlanConfig {
    fn default() -> Self {
        Self {
            calories_kcal: 2000.0,
            protein_g_per_kg: 1.6,
            carbs_g: 200.0,
            fat_g: 65.0,
            reasoning: "defaults used".to_owned(),
        }
    }
}

/// Complete plan calculator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// BMR coefficients
    pub bmr: BmrConfig,
    /// Activity multipliers
    pub activity_factors: ActivityFactorsConfig,
    /// Goal adjustments and calorie floor
    pub goal_adjustments: GoalAdjustmentConfig,
    /// Protein factors
    pub protein: ProteinFactorConfig,
    /// Carb/fat split
    pub macro_split: MacroSplitConfig,
    /// Fallback plan
    pub fallback: FallbackPlanConfig,
}

impl PlanConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any value falls outside its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fat = self.macro_split.fat_percent_of_calories;
        if !(fat > 0.0 && fat < 100.0) {
            return Err(ConfigError::ValueOutOfRange(
                "fat_percent_of_calories must be in (0, 100)",
            ));
        }

        if self.goal_adjustments.calorie_floor_kcal <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "calorie_floor_kcal must be positive",
            ));
        }

        if self.goal_adjustments.lose_weight_kcal > 0.0 {
            return Err(ConfigError::InvalidRange(
                "lose_weight_kcal must not be a surplus",
            ));
        }
        if self.goal_adjustments.gain_muscle_kcal < 0.0 {
            return Err(ConfigError::InvalidRange(
                "gain_muscle_kcal must not be a deficit",
            ));
        }

        let (gain_min, gain_max) = ProteinFactorConfig::GAIN_RANGE;
        if !(gain_min..=gain_max).contains(&self.protein.gain_muscle_g_per_kg) {
            return Err(ConfigError::ValueOutOfRange(
                "gain_muscle_g_per_kg must be within 1.6-2.2",
            ));
        }
        let (lose_min, lose_max) = ProteinFactorConfig::LOSE_RANGE;
        if !(lose_min..=lose_max).contains(&self.protein.lose_weight_g_per_kg) {
            return Err(ConfigError::ValueOutOfRange(
                "lose_weight_g_per_kg must be within 1.2-1.5",
            ));
        }
        if self.protein.maintain_g_per_kg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "maintain_g_per_kg must be positive",
            ));
        }

        let factors = &self.activity_factors;
        if !(factors.sedentary < factors.light
            && factors.light < factors.moderate
            && factors.moderate < factors.active
            && factors.active < factors.very_active)
        {
            return Err(ConfigError::InvalidRange(
                "Activity factors must be in ascending order",
            ));
        }
        if factors.sedentary < 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Activity factors must be at least 1.0",
            ));
        }

        let fallback = &self.fallback;
        if fallback.calories_kcal <= 0.0
            || fallback.protein_g_per_kg <= 0.0
            || fallback.carbs_g <= 0.0
            || fallback.fat_g <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Fallback plan targets must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_other_constant_is_mean_of_sexes() {
        let bmr = BmrConfig::default();
        let mean = (bmr.msj_male_constant + bmr.msj_female_constant) / 2.0;
        assert!((bmr.msj_other_constant - mean).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fat_share_out_of_range_rejected() {
        let mut config = PlanConfig::default();
        config.macro_split.fat_percent_of_calories = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_gain_protein_factor_outside_range_rejected() {
        let mut config = PlanConfig::default();
        config.protein.gain_muscle_g_per_kg = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unordered_activity_factors_rejected() {
        let mut config = PlanConfig::default();
        config.activity_factors.light = 1.1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }
}
