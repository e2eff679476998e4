// ABOUTME: Tests for environment-driven configuration
// ABOUTME: Data directory, Gemini settings, HTTP timeout, and CALAI_PLAN_* calculator overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::float_cmp)]

use std::env;
use std::path::PathBuf;

use calai::config::environment::{
    DATA_DIR_ENV, GEMINI_API_KEY_ENV, GEMINI_MODEL_ENV, HTTP_TIMEOUT_ENV,
};
use calai::config::{AppConfig, IntelligenceConfig};
use calai::llm::GEMINI_DEFAULT_MODEL;
use serial_test::serial;

const PLAN_VARS: [&str; 6] = [
    "CALAI_PLAN_CALORIE_FLOOR",
    "CALAI_PLAN_FAT_PERCENT",
    "CALAI_PLAN_LOSE_ADJUSTMENT",
    "CALAI_PLAN_GAIN_ADJUSTMENT",
    "CALAI_PLAN_GAIN_PROTEIN_FACTOR",
    "CALAI_PLAN_LOSE_PROTEIN_FACTOR",
];

fn clear_env() {
    for key in [DATA_DIR_ENV, GEMINI_API_KEY_ENV, GEMINI_MODEL_ENV, HTTP_TIMEOUT_ENV]
        .into_iter()
        .chain(PLAN_VARS)
    {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_app_config_defaults() {
    clear_env();
    let config = AppConfig::from_env().unwrap();

    assert!(!config.gemini.is_enabled());
    assert_eq!(config.gemini.model, GEMINI_DEFAULT_MODEL);
    assert_eq!(config.gemini.timeout_secs, 60);
    assert!(config.data_dir.ends_with("calai") || config.data_dir.ends_with(".calai"));
}

#[test]
#[serial]
fn test_app_config_reads_environment() {
    clear_env();
    env::set_var(DATA_DIR_ENV, "/tmp/calai-test-data");
    env::set_var(GEMINI_API_KEY_ENV, "secret-key-123");
    env::set_var(GEMINI_MODEL_ENV, "gemini-2.5-pro");
    env::set_var(HTTP_TIMEOUT_ENV, "15");

    let config = AppConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.data_dir, PathBuf::from("/tmp/calai-test-data"));
    assert!(config.gemini.is_enabled());
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.gemini.timeout().as_secs(), 15);
    assert!(!format!("{:?}", config.gemini).contains("secret-key-123"));
    assert!(!config.summary().contains("secret-key-123"));
}

#[test]
#[serial]
fn test_blank_api_key_disables_collaborator() {
    clear_env();
    env::set_var(GEMINI_API_KEY_ENV, "   ");
    let config = AppConfig::from_env().unwrap();
    clear_env();
    assert!(!config.gemini.is_enabled());
}

#[test]
#[serial]
fn test_invalid_timeout_rejected() {
    clear_env();
    env::set_var(HTTP_TIMEOUT_ENV, "soon");
    assert!(AppConfig::from_env().is_err());
    env::set_var(HTTP_TIMEOUT_ENV, "0");
    assert!(AppConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_plan_overrides_applied() {
    clear_env();
    env::set_var("CALAI_PLAN_CALORIE_FLOOR", "1400");
    env::set_var("CALAI_PLAN_FAT_PERCENT", "30");
    env::set_var("CALAI_PLAN_GAIN_PROTEIN_FACTOR", "2.0");

    let config = IntelligenceConfig::load().unwrap();
    clear_env();

    assert_eq!(config.plan.goal_adjustments.calorie_floor_kcal, 1400.0);
    assert_eq!(config.plan.macro_split.fat_percent_of_calories, 30.0);
    assert_eq!(config.plan.protein.gain_muscle_g_per_kg, 2.0);
    assert_eq!(config.plan.protein.lose_weight_g_per_kg, 1.35);
}

#[test]
#[serial]
fn test_plan_override_validation() {
    clear_env();
    env::set_var("CALAI_PLAN_FAT_PERCENT", "abc");
    assert!(IntelligenceConfig::load().is_err());

    clear_env();
    env::set_var("CALAI_PLAN_LOSE_PROTEIN_FACTOR", "3.0");
    assert!(IntelligenceConfig::load().is_err());

    clear_env();
    env::set_var("CALAI_PLAN_LOSE_ADJUSTMENT", "200");
    assert!(IntelligenceConfig::load().is_err());
    clear_env();

    assert_eq!(IntelligenceConfig::load().unwrap(), IntelligenceConfig::default());
}
