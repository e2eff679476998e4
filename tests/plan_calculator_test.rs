// ABOUTME: Integration tests for the nutrition plan calculator
// ABOUTME: Mifflin-St Jeor targets, calorie floor, macro split, and the fallback plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::float_cmp)]

mod common;

use calai_core::errors::ErrorCode;
use calai_core::models::{ActivityLevel, Gender, PlanSource, UserProfile, WeightGoal};
use calai_intelligence::plan_calculator::{calculate_breakdown, calculate_mifflin_st_jeor};
use calai_intelligence::{compute_plan, compute_plan_or_default, default_plan, PlanConfig};
use common::{female_profile, male_profile};

#[test]
fn test_maintenance_plan_for_reference_male() {
    let goals = compute_plan(&male_profile(), &PlanConfig::default()).unwrap();

    // BMR 1780 x 1.55
    assert_eq!(goals.tdee_kcal, Some(2759.0));
    assert_eq!(goals.calories_kcal, 2759.0);
    assert_eq!(goals.protein_grams, 80.0);
    assert_eq!(goals.fat_grams, 77.0);
    assert_eq!(goals.carbs_grams, 437.0);
    assert_eq!(goals.bmi, Some(24.7));
    assert!(goals.reasoning.unwrap().contains("80 kg"));
}

#[test]
fn test_weight_loss_target_respects_calorie_floor() {
    let config = PlanConfig::default();
    let breakdown = calculate_breakdown(&female_profile(), &config).unwrap();
    assert!((breakdown.bmr - 1345.25).abs() < 1e-9);
    assert!(breakdown.tdee + breakdown.goal_adjustment < 1200.0);

    let goals = compute_plan(&female_profile(), &config).unwrap();
    assert_eq!(goals.calories_kcal, 1200.0);
    assert_eq!(goals.protein_grams, 81.0);
    assert_eq!(goals.fat_grams, 33.0);
    assert_eq!(goals.carbs_grams, 144.0);
}

#[test]
fn test_gain_muscle_uses_surplus_and_higher_protein() {
    let profile = UserProfile {
        goal: WeightGoal::GainMuscle,
        ..male_profile()
    };
    let goals = compute_plan(&profile, &PlanConfig::default()).unwrap();
    assert_eq!(goals.calories_kcal, 3059.0);
    assert_eq!(goals.protein_grams, 152.0);
}

#[test]
fn test_other_gender_uses_midpoint_constant() {
    let config = PlanConfig::default();
    let male = calculate_mifflin_st_jeor(80.0, 180.0, 30, Gender::Male, &config.bmr).unwrap();
    let other = calculate_mifflin_st_jeor(80.0, 180.0, 30, Gender::Other, &config.bmr).unwrap();
    assert!((male - other - 83.0).abs() < 1e-9);
}

#[test]
fn test_macro_calories_add_up_to_target() {
    for activity in [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ] {
        let profile = UserProfile {
            activity_level: activity,
            ..male_profile()
        };
        let goals = compute_plan(&profile, &PlanConfig::default()).unwrap();
        let macro_kcal =
            goals.protein_grams * 4.0 + goals.carbs_grams * 4.0 + goals.fat_grams * 9.0;
        // Rounding each macro to whole grams shifts the sum by a few kcal at most
        assert!((macro_kcal - goals.calories_kcal).abs() < 15.0, "{activity}");
    }
}

#[test]
fn test_unusable_profile_falls_back_to_defaults() {
    let profile = UserProfile {
        weight_kg: 0.0,
        ..male_profile()
    };
    let err = compute_plan(&profile, &PlanConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let plan = compute_plan_or_default(&profile, &PlanConfig::default());
    assert_eq!(plan.source, PlanSource::Defaults);
    assert_eq!(plan.goals.calories_kcal, 2000.0);
    // Unusable weight is replaced by the 70 kg onboarding default
    assert_eq!(plan.goals.protein_grams, 112.0);
    assert_eq!(plan.goals.carbs_grams, 200.0);
    assert_eq!(plan.goals.fat_grams, 65.0);
    assert_eq!(plan.goals.bmi, Some(0.0));
    assert_eq!(plan.goals.reasoning.as_deref(), Some("defaults used"));
}

#[test]
fn test_default_plan_scales_protein_with_weight() {
    let goals = default_plan(Some(&male_profile()), &PlanConfig::default().fallback);
    assert_eq!(goals.protein_grams, 128.0);
    let anonymous = default_plan(None, &PlanConfig::default().fallback);
    assert_eq!(anonymous.protein_grams, 112.0);
}

#[test]
fn test_plan_is_deterministic() {
    let config = PlanConfig::default();
    assert_eq!(
        compute_plan(&male_profile(), &config).unwrap(),
        compute_plan(&male_profile(), &config).unwrap()
    );
}
