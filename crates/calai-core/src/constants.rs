// ABOUTME: Application-wide constants for the CalAI nutrition tracker
// ABOUTME: Storage keys, aggregation windows, label reference values, and onboarding defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Constants organized by domain.

/// Keys for the persisted snapshots (one JSON document per key)
pub mod storage_keys {
    /// Ordered sequence of food-log entries
    pub const LOGS: &str = "calai_logs";
    /// Single user profile record
    pub const PROFILE: &str = "calai_profile";
    /// Single daily goals record
    pub const GOALS: &str = "calai_goals";
}

/// Aggregation window sizes
pub mod windows {
    /// Daily buckets in the week view
    pub const WEEK_DAYS: u32 = 7;
    /// Daily buckets in the extended ("month") view
    pub const EXTENDED_DAYS: u32 = 14;
    /// Lookback for the rolling average in the research context digest
    pub const CONTEXT_TREND_DAYS: i64 = 7;
}

/// Energy density of macronutrients (kcal per gram)
pub mod energy {
    /// Protein kcal/g
    pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
    /// Carbohydrate kcal/g
    pub const KCAL_PER_G_CARBS: f64 = 4.0;
    /// Fat kcal/g
    pub const KCAL_PER_G_FAT: f64 = 9.0;
}

/// Reference daily values used on the per-entry nutrition label
///
/// Vitamin A, vitamin C, calcium, and iron are reported by the estimator as
/// %DV already and have no entry here.
pub mod daily_values {
    /// Total fat (g)
    pub const FAT_G: f64 = 65.0;
    /// Cholesterol (mg)
    pub const CHOLESTEROL_MG: f64 = 300.0;
    /// Sodium (mg)
    pub const SODIUM_MG: f64 = 2300.0;
    /// Total carbohydrate (g)
    pub const CARBS_G: f64 = 300.0;
    /// Protein (g)
    pub const PROTEIN_G: f64 = 50.0;
    /// Potassium (mg)
    pub const POTASSIUM_MG: f64 = 4700.0;
}

/// Goals snapshot used before onboarding has produced a plan
pub mod initial_goals {
    /// Calories (kcal)
    pub const CALORIES_KCAL: f64 = 2200.0;
    /// Protein (g)
    pub const PROTEIN_G: f64 = 150.0;
    /// Carbohydrates (g)
    pub const CARBS_G: f64 = 250.0;
    /// Fat (g)
    pub const FAT_G: f64 = 70.0;
}

/// Onboarding form defaults
pub mod onboarding_defaults {
    /// Age (years)
    pub const AGE: u32 = 25;
    /// Height (cm)
    pub const HEIGHT_CM: f64 = 175.0;
    /// Weight (kg)
    pub const WEIGHT_KG: f64 = 70.0;
}

/// Accepted ranges for profile input
pub mod profile_limits {
    /// Youngest age the metabolic model is applied to
    pub const MIN_AGE: u32 = 10;
    /// Oldest accepted age
    pub const MAX_AGE: u32 = 120;
    /// Height bounds (cm), exclusive lower
    pub const MAX_HEIGHT_CM: f64 = 300.0;
    /// Weight bounds (kg), exclusive lower
    pub const MAX_WEIGHT_KG: f64 = 500.0;
}

/// Prompt text used when only an image is supplied for estimation
pub const IMAGE_ONLY_PROMPT: &str = "Identify this food";

/// Service identifiers used in structured logs
pub mod service_names {
    /// Default service name
    pub const CALAI: &str = "calai";
    /// Name of the AI collaborator in log fields and error messages
    pub const GEMINI: &str = "Gemini";
}
