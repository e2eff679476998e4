// ABOUTME: Nutrition plan calculation from a body profile using Mifflin-St Jeor
// ABOUTME: BMR, TDEE, goal-adjusted calorie target, protein factor, carb/fat split, BMI, and fallback plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Nutrition Plan Calculator
//!
//! Derives daily calorie and macronutrient targets from a [`UserProfile`].
//! All functions are pure; identical inputs always produce identical goals.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Phillips, S.M., & Van Loon, L.J. (2011). Dietary protein for athletes.
//!   *Journal of Sports Sciences*, 29(sup1), S29-S38.
//!   <https://doi.org/10.1080/02640414.2011.619204>

use calai_core::constants::{energy, onboarding_defaults};
use calai_core::errors::{AppError, AppResult};
use calai_core::models::{
    ActivityLevel, DailyGoals, Gender, PlanSource, ResolvedPlan, UserProfile, WeightGoal,
};
use tracing::{debug, warn};

use crate::config::{
    ActivityFactorsConfig, BmrConfig, FallbackPlanConfig, GoalAdjustmentConfig, MacroSplitConfig,
    PlanConfig, ProteinFactorConfig,
};

/// Intermediate values of a local plan calculation
#[derive(Debug, Clone, PartialEq)]
pub struct PlanBreakdown {
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,
    /// Activity multiplier applied
    pub activity_factor: f64,
    /// Total daily energy expenditure (kcal/day)
    pub tdee: f64,
    /// Goal adjustment applied to TDEE (kcal)
    pub goal_adjustment: f64,
    /// Calorie target after the floor (kcal)
    pub calories: f64,
    /// Protein factor applied (g/kg)
    pub protein_factor: f64,
    /// Protein target (g)
    pub protein_g: f64,
    /// Carbohydrate target (g)
    pub carbs_g: f64,
    /// Fat target (g)
    pub fat_g: f64,
    /// Body-mass index
    pub bmi: f64,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `gender_constant`
/// - Male: +5
/// - Female: -161
/// - Other: -78 (mean of the two)
///
/// # Errors
///
/// Returns an error if any input is non-finite or not positive
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    config: &BmrConfig,
) -> AppResult<f64> {
    ensure_positive("weight", weight_kg)?;
    ensure_positive("height", height_cm)?;
    if age == 0 {
        return Err(AppError::invalid_input("Age must be a positive number of years"));
    }

    let gender_constant = match gender {
        Gender::Male => config.msj_male_constant,
        Gender::Female => config.msj_female_constant,
        Gender::Other => config.msj_other_constant,
    };

    Ok(config.msj_weight_coef * weight_kg
        + config.msj_height_coef * height_cm
        + config.msj_age_coef * f64::from(age)
        + gender_constant)
}

/// Activity multiplier for a level
#[must_use]
pub const fn activity_factor(level: ActivityLevel, config: &ActivityFactorsConfig) -> f64 {
    match level {
        ActivityLevel::Sedentary => config.sedentary,
        ActivityLevel::Light => config.light,
        ActivityLevel::Moderate => config.moderate,
        ActivityLevel::Active => config.active,
        ActivityLevel::VeryActive => config.very_active,
    }
}

/// Calculate Total Daily Energy Expenditure
///
/// Formula: TDEE = BMR x activity factor
///
/// # Errors
///
/// Returns an error if BMR is not positive
pub fn calculate_tdee(
    bmr: f64,
    activity_level: ActivityLevel,
    config: &ActivityFactorsConfig,
) -> AppResult<f64> {
    ensure_positive("BMR", bmr)?;
    Ok(bmr * activity_factor(activity_level, config))
}

/// Goal adjustment in kcal
#[must_use]
pub const fn goal_adjustment(goal: WeightGoal, config: &GoalAdjustmentConfig) -> f64 {
    match goal {
        WeightGoal::LoseWeight => config.lose_weight_kcal,
        WeightGoal::Maintain => config.maintain_kcal,
        WeightGoal::GainMuscle => config.gain_muscle_kcal,
    }
}

/// Calorie target: TDEE plus goal adjustment, never below the floor
#[must_use]
pub fn calculate_calorie_target(tdee: f64, goal: WeightGoal, config: &GoalAdjustmentConfig) -> f64 {
    (tdee + goal_adjustment(goal, config)).max(config.calorie_floor_kcal)
}

/// Protein factor (g/kg) for a goal
#[must_use]
pub const fn protein_factor(goal: WeightGoal, config: &ProteinFactorConfig) -> f64 {
    match goal {
        WeightGoal::Maintain => config.maintain_g_per_kg,
        WeightGoal::GainMuscle => config.gain_muscle_g_per_kg,
        WeightGoal::LoseWeight => config.lose_weight_g_per_kg,
    }
}

/// Calculate daily protein target
///
/// Formula: Protein (g) = `weight_kg` x goal factor
///
/// # Errors
///
/// Returns an error if weight is not positive
pub fn calculate_protein_target(
    weight_kg: f64,
    goal: WeightGoal,
    config: &ProteinFactorConfig,
) -> AppResult<f64> {
    ensure_positive("weight", weight_kg)?;
    Ok(weight_kg * protein_factor(goal, config))
}

/// Split the calorie target into carbs and fat after protein
///
/// Fat takes a fixed share of total calories (9 kcal/g); carbohydrates take
/// whatever remains after protein and fat (4 kcal/g), never below zero.
///
/// Returns `(carbs_g, fat_g)`.
#[must_use]
pub fn calculate_macro_split(
    calories: f64,
    protein_g: f64,
    config: &MacroSplitConfig,
) -> (f64, f64) {
    let fat_kcal = calories * config.fat_percent_of_calories / 100.0;
    let fat_g = fat_kcal / energy::KCAL_PER_G_FAT;
    let remaining_kcal = calories - protein_g * energy::KCAL_PER_G_PROTEIN - fat_kcal;
    let carbs_g = (remaining_kcal / energy::KCAL_PER_G_CARBS).max(0.0);
    (carbs_g, fat_g)
}

/// Body-mass index: weight / height(m)^2
///
/// # Errors
///
/// Returns an error if weight or height is not positive
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> AppResult<f64> {
    ensure_positive("weight", weight_kg)?;
    ensure_positive("height", height_cm)?;
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Run every step of the local calculation, keeping intermediate values
///
/// # Errors
///
/// Returns a validation error if the profile cannot feed the formula
pub fn calculate_breakdown(profile: &UserProfile, config: &PlanConfig) -> AppResult<PlanBreakdown> {
    let bmr = calculate_mifflin_st_jeor(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.gender,
        &config.bmr,
    )?;
    let tdee = calculate_tdee(bmr, profile.activity_level, &config.activity_factors)?;
    let calories = calculate_calorie_target(tdee, profile.goal, &config.goal_adjustments);
    let protein_g = calculate_protein_target(profile.weight_kg, profile.goal, &config.protein)?;
    let (carbs_g, fat_g) = calculate_macro_split(calories, protein_g, &config.macro_split);
    let bmi = calculate_bmi(profile.weight_kg, profile.height_cm)?;

    Ok(PlanBreakdown {
        bmr,
        activity_factor: activity_factor(profile.activity_level, &config.activity_factors),
        tdee,
        goal_adjustment: goal_adjustment(profile.goal, &config.goal_adjustments),
        calories,
        protein_factor: protein_factor(profile.goal, &config.protein),
        protein_g,
        carbs_g,
        fat_g,
        bmi,
    })
}

/// Compute daily goals locally from a profile
///
/// Targets are rounded to whole kcal and grams, BMI to one decimal.
///
/// # Errors
///
/// Returns a validation error if the profile cannot feed the formula
pub fn compute_plan(profile: &UserProfile, config: &PlanConfig) -> AppResult<DailyGoals> {
    let breakdown = calculate_breakdown(profile, config)?;
    let reasoning = describe(profile, &breakdown, config);

    Ok(DailyGoals {
        calories_kcal: breakdown.calories.round(),
        protein_grams: breakdown.protein_g.round(),
        carbs_grams: breakdown.carbs_g.round(),
        fat_grams: breakdown.fat_g.round(),
        bmi: Some(round_to(breakdown.bmi, 1)),
        tdee_kcal: Some(breakdown.tdee.round()),
        reasoning: Some(reasoning),
    })
}

/// Fixed safe plan
///
/// Protein scales with the profile weight; an unusable weight falls back to the
/// onboarding default weight so the plan never carries NaN.
#[must_use]
pub fn default_plan(profile: Option<&UserProfile>, config: &FallbackPlanConfig) -> DailyGoals {
    let weight_kg = profile
        .map(|p| p.weight_kg)
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(onboarding_defaults::WEIGHT_KG);

    DailyGoals {
        calories_kcal: config.calories_kcal,
        protein_grams: (weight_kg * config.protein_g_per_kg).round(),
        carbs_grams: config.carbs_g,
        fat_grams: config.fat_g,
        bmi: Some(0.0),
        tdee_kcal: None,
        reasoning: Some(config.reasoning.clone()),
    }
}

/// Compute goals locally, degrading to the fixed safe plan on failure
///
/// Never fails: a usable plan is always returned.
#[must_use]
pub fn compute_plan_or_default(profile: &UserProfile, config: &PlanConfig) -> ResolvedPlan {
    match compute_plan(profile, config) {
        Ok(goals) => {
            debug!(
                calories = goals.calories_kcal,
                protein = goals.protein_grams,
                "Computed local nutrition plan"
            );
            ResolvedPlan {
                goals,
                source: PlanSource::Local,
            }
        }
        Err(e) => {
            warn!(error = %e, "Local plan calculation failed, using default plan");
            ResolvedPlan {
                goals: default_plan(Some(profile), &config.fallback),
                source: PlanSource::Defaults,
            }
        }
    }
}

fn describe(profile: &UserProfile, b: &PlanBreakdown, config: &PlanConfig) -> String {
    format!(
        "Mifflin-St Jeor BMR {bmr:.0} kcal x {factor} ({activity}) gives a TDEE of {tdee:.0} kcal; \
         {goal} adjustment {adj:+.0} kcal sets the target at {cal:.0} kcal. \
         Since you weigh {weight} kg, protein is set at {pf} g/kg ({protein:.0} g). \
         Fat covers {fat_pct}% of calories ({fat:.0} g) and carbohydrates fill the rest ({carbs:.0} g).",
        bmr = b.bmr,
        factor = b.activity_factor,
        activity = profile.activity_level,
        tdee = b.tdee,
        goal = profile.goal,
        adj = b.goal_adjustment,
        cal = b.calories,
        weight = profile.weight_kg,
        pf = b.protein_factor,
        protein = b.protein_g,
        fat_pct = config.macro_split.fat_percent_of_calories,
        fat = b.fat_g,
        carbs = b.carbs_g,
    )
}

fn ensure_positive(field: &str, value: f64) -> AppResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "{field} must be a positive number"
        )))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
