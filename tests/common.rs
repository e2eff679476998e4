// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides logging setup, profile and entry builders, and a scripted nutrition advisor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `calai`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use calai::advisor::NutritionAdvisor;
use calai_core::models::{
    ActivityLevel, DailyGoals, EstimateMacros, EstimateRequest, FoodEstimate, FoodLogEntry, Gender,
    MealType, Micronutrients, Nutrition, ResearchAnswer, SourceLink, UserProfile, WeightGoal,
};
use calai::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

/// 2025-03-16T12:00:00Z, a Sunday
pub const NOON: i64 = 1_742_126_400_000;
pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 86_400_000;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Instant `ms` milliseconds after the epoch
pub fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

/// 30-year-old, 180 cm, 80 kg, moderately active male maintaining weight
pub fn male_profile() -> UserProfile {
    UserProfile {
        name: "Sam".into(),
        age: 30,
        gender: Gender::Male,
        height_cm: 180.0,
        weight_kg: 80.0,
        activity_level: ActivityLevel::Moderate,
        goal: WeightGoal::Maintain,
    }
}

/// 25-year-old, 165 cm, 60 kg, sedentary female losing weight
pub fn female_profile() -> UserProfile {
    UserProfile {
        name: "Alex".into(),
        age: 25,
        gender: Gender::Female,
        height_cm: 165.0,
        weight_kg: 60.0,
        activity_level: ActivityLevel::Sedentary,
        goal: WeightGoal::LoseWeight,
    }
}

/// Entry with the given calories, protein at a tenth of them
pub fn entry(name: &str, calories: f64, meal: MealType, when: DateTime<Utc>) -> FoodLogEntry {
    FoodLogEntry::new(
        name,
        Nutrition {
            calories,
            protein_grams: calories / 10.0,
            carbs_grams: calories / 8.0,
            fat_grams: calories / 40.0,
        },
        Micronutrients::none(),
        meal,
        when,
    )
}

/// Estimate as the collaborator would return it
pub fn estimate(name: &str, calories: f64, protein: f64) -> FoodEstimate {
    FoodEstimate {
        food_name: name.to_owned(),
        description: format!("1 serving of {name}"),
        calories,
        macros: EstimateMacros {
            protein,
            carbs: 10.0,
            fat: 5.0,
        },
        micronutrients: Micronutrients::none(),
    }
}

/// Goals a collaborator might propose
pub fn collaborator_goals() -> DailyGoals {
    DailyGoals {
        calories_kcal: 2500.0,
        protein_grams: 160.0,
        carbs_grams: 280.0,
        fat_grams: 80.0,
        bmi: Some(24.7),
        tdee_kcal: Some(2500.0),
        reasoning: Some("From the collaborator".into()),
    }
}

/// Advisor returning scripted results
///
/// Estimation waits for `gate` when one is set, which lets a test hold a
/// request in flight.
#[derive(Default)]
pub struct FakeAdvisor {
    pub estimates: Option<Vec<FoodEstimate>>,
    pub plan: Option<DailyGoals>,
    pub answer: Option<ResearchAnswer>,
    pub gate: Option<Arc<Notify>>,
    pub last_context: Mutex<Option<String>>,
    pub last_question: Mutex<Option<String>>,
}

impl FakeAdvisor {
    pub fn with_estimates(estimates: Vec<FoodEstimate>) -> Self {
        Self {
            estimates: Some(estimates),
            ..Self::default()
        }
    }

    pub fn with_plan(plan: DailyGoals) -> Self {
        Self {
            plan: Some(plan),
            ..Self::default()
        }
    }

    pub fn with_answer(text: &str) -> Self {
        Self {
            answer: Some(ResearchAnswer {
                text: text.to_owned(),
                sources: vec![SourceLink {
                    uri: "https://example.org/protein".into(),
                    title: "Protein needs".into(),
                }],
            }),
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl NutritionAdvisor for FakeAdvisor {
    async fn estimate_food(&self, _request: &EstimateRequest) -> AppResult<Vec<FoodEstimate>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.estimates
            .clone()
            .ok_or_else(|| AppError::estimation("scripted estimation failure"))
    }

    async fn compute_plan(&self, _profile: &UserProfile) -> AppResult<DailyGoals> {
        self.plan
            .clone()
            .ok_or_else(|| AppError::external_service("Gemini", "scripted plan failure"))
    }

    async fn research_query(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> AppResult<ResearchAnswer> {
        *self.last_question.lock().unwrap() = Some(question.to_owned());
        *self.last_context.lock().unwrap() = context.map(str::to_owned);
        self.answer
            .clone()
            .ok_or_else(|| AppError::service_unavailable("scripted research failure"))
    }
}
