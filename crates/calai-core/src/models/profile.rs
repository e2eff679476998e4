// ABOUTME: User profile model and raw onboarding input validation
// ABOUTME: Gender, ActivityLevel, WeightGoal enums plus ProfileInput -> UserProfile parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{onboarding_defaults, profile_limits};
use crate::errors::{AppError, AppResult};

/// Gender used by the metabolic model
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male (+5 kcal constant)
    #[default]
    Male,
    /// Female (-161 kcal constant)
    Female,
    /// Other or undisclosed
    Other,
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    #[default]
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Physical job or twice-daily training
    VeryActive,
}

/// Body-composition goal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// Caloric deficit
    LoseWeight,
    /// Caloric balance
    #[default]
    Maintain,
    /// Caloric surplus
    GainMuscle,
}

macro_rules! snake_case_enum_text {
    ($ty:ty, $what:literal, { $($variant:path => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Storage name
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $text),+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($text => Ok($variant),)+
                    _ => Err(AppError::invalid_input(format!(
                        concat!("Unknown ", $what, " '{}'"),
                        s.trim()
                    ))),
                }
            }
        }
    };
}

snake_case_enum_text!(Gender, "gender", {
    Gender::Male => "male",
    Gender::Female => "female",
    Gender::Other => "other",
});

snake_case_enum_text!(ActivityLevel, "activity level", {
    ActivityLevel::Sedentary => "sedentary",
    ActivityLevel::Light => "light",
    ActivityLevel::Moderate => "moderate",
    ActivityLevel::Active => "active",
    ActivityLevel::VeryActive => "very_active",
});

snake_case_enum_text!(WeightGoal, "goal", {
    WeightGoal::LoseWeight => "lose_weight",
    WeightGoal::Maintain => "maintain",
    WeightGoal::GainMuscle => "gain_muscle",
});

/// The single user profile of an installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender for the metabolic model
    pub gender: Gender,
    /// Height in centimeters
    #[serde(rename = "height")]
    pub height_cm: f64,
    /// Weight in kilograms
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    /// Activity level for the TDEE multiplier
    pub activity_level: ActivityLevel,
    /// Body-composition goal
    pub goal: WeightGoal,
}

impl UserProfile {
    /// Check that every numeric field is usable by the plan calculator
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> AppResult<()> {
        if !(profile_limits::MIN_AGE..=profile_limits::MAX_AGE).contains(&self.age) {
            return Err(AppError::out_of_range(format!(
                "Age must be between {} and {} years",
                profile_limits::MIN_AGE,
                profile_limits::MAX_AGE
            )));
        }
        if !self.height_cm.is_finite()
            || self.height_cm <= 0.0
            || self.height_cm > profile_limits::MAX_HEIGHT_CM
        {
            return Err(AppError::out_of_range(format!(
                "Height must be between 0 and {} cm",
                profile_limits::MAX_HEIGHT_CM
            )));
        }
        if !self.weight_kg.is_finite()
            || self.weight_kg <= 0.0
            || self.weight_kg > profile_limits::MAX_WEIGHT_KG
        {
            return Err(AppError::out_of_range(format!(
                "Weight must be between 0 and {} kg",
                profile_limits::MAX_WEIGHT_KG
            )));
        }
        Ok(())
    }

    /// Height in meters
    #[must_use]
    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }
}

/// Raw onboarding or profile-edit form values, as typed by the user
///
/// Numeric fields are kept as text so that non-numeric input can be rejected
/// explicitly rather than coerced to NaN or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    /// Display name (may be empty)
    pub name: String,
    /// Age text
    pub age: String,
    /// Gender text
    pub gender: String,
    /// Height text (cm)
    pub height: String,
    /// Weight text (kg)
    pub weight: String,
    /// Activity level text
    pub activity_level: String,
    /// Goal text
    pub goal: String,
}

impl ProfileInput {
    /// Form pre-filled with the onboarding defaults
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            name: String::new(),
            age: onboarding_defaults::AGE.to_string(),
            gender: Gender::default().to_string(),
            height: onboarding_defaults::HEIGHT_CM.to_string(),
            weight: onboarding_defaults::WEIGHT_KG.to_string(),
            activity_level: ActivityLevel::default().to_string(),
            goal: WeightGoal::default().to_string(),
        }
    }

    /// Parse and validate into a profile
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing, non-numeric, or out-of-range
    /// values and for unknown enum names.
    pub fn into_profile(self) -> AppResult<UserProfile> {
        let age = parse_field::<u32>("age", &self.age)?;
        let height_cm = parse_field::<f64>("height", &self.height)?;
        let weight_kg = parse_field::<f64>("weight", &self.weight)?;
        let gender = required("gender", &self.gender)?.parse()?;
        let activity_level = required("activity level", &self.activity_level)?.parse()?;
        let goal = required("goal", &self.goal)?.parse()?;

        let profile = UserProfile {
            name: self.name.trim().to_owned(),
            age,
            gender,
            height_cm,
            weight_kg,
            activity_level,
            goal,
        };
        profile.validate()?;
        Ok(profile)
    }
}

fn required<'a>(field: &str, raw: &'a str) -> AppResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed)
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> AppResult<T> {
    required(field, raw)?
        .parse::<T>()
        .map_err(|_| AppError::invalid_input(format!("{field} must be a number, got '{raw}'")))
}
