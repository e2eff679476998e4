// ABOUTME: Daily nutrition targets derived from a user profile
// ABOUTME: DailyGoals record with optional BMI/TDEE/reasoning and the plan-source tag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::constants::initial_goals;
use crate::errors::{AppError, AppResult};

/// Current daily nutrition targets
///
/// Replaced wholesale whenever the profile changes; never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoals {
    /// Energy target (kcal)
    #[serde(rename = "calories")]
    pub calories_kcal: f64,
    /// Protein target (g)
    #[serde(rename = "protein")]
    pub protein_grams: f64,
    /// Carbohydrate target (g)
    #[serde(rename = "carbs")]
    pub carbs_grams: f64,
    /// Fat target (g)
    #[serde(rename = "fat")]
    pub fat_grams: f64,
    /// Body-mass index at the time of calculation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    /// Total daily energy expenditure (kcal)
    #[serde(rename = "tdee", default, skip_serializing_if = "Option::is_none")]
    pub tdee_kcal: Option<f64>,
    /// Explanation of how the targets were derived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl DailyGoals {
    /// Targets in effect before onboarding has produced a plan
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            calories_kcal: initial_goals::CALORIES_KCAL,
            protein_grams: initial_goals::PROTEIN_G,
            carbs_grams: initial_goals::CARBS_G,
            fat_grams: initial_goals::FAT_G,
            bmi: None,
            tdee_kcal: None,
            reasoning: None,
        }
    }

    /// Check that every target is a finite, positive number
    ///
    /// Used on plans returned by the AI collaborator before they are accepted.
    ///
    /// # Errors
    ///
    /// Returns a plan-calculation error naming the first unusable target.
    pub fn validate(&self) -> AppResult<()> {
        let targets = [
            ("calories", self.calories_kcal),
            ("protein", self.protein_grams),
            ("carbs", self.carbs_grams),
            ("fat", self.fat_grams),
        ];
        for (name, value) in targets {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::plan_calculation(format!(
                    "{name} target must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in [("bmi", self.bmi), ("tdee", self.tdee_kcal)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::plan_calculation(format!(
                        "{name} must be a non-negative number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self::initial()
    }
}

/// Where a set of goals came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// Accepted from the AI collaborator after validation
    Collaborator,
    /// Computed locally with Mifflin-St Jeor
    Local,
    /// Fixed safe defaults
    Defaults,
}

impl Display for PlanSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Collaborator => "collaborator",
            Self::Local => "local",
            Self::Defaults => "defaults",
        })
    }
}

/// Goals together with their provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    /// The targets
    pub goals: DailyGoals,
    /// How they were obtained
    pub source: PlanSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goals_round_trip_storage_names() {
        let json = r#"{"calories":2000,"protein":128,"carbs":200,"fat":65,"bmi":0,"reasoning":"x"}"#;
        let goals: DailyGoals = serde_json::from_str(json).unwrap();
        assert!((goals.protein_grams - 128.0).abs() < f64::EPSILON);
        assert_eq!(goals.tdee_kcal, None);
        assert_eq!(goals.bmi, Some(0.0));
    }

    #[test]
    fn test_validate_rejects_zero_calories() {
        let goals = DailyGoals {
            calories_kcal: 0.0,
            ..DailyGoals::initial()
        };
        let err = goals.validate().unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::PlanCalculationFailed);
    }

    #[test]
    fn test_initial_goals_are_valid() {
        assert!(DailyGoals::initial().validate().is_ok());
    }
}
