// ABOUTME: Core data models for the CalAI nutrition tracker
// ABOUTME: Re-exports food-log, profile, goals, and collaborator estimate types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Data Models
//!
//! ## Design Principles
//!
//! - **Normalized at ingestion**: every numeric amount is sanitized once, when
//!   an entry is built or loaded, so aggregation needs no per-field fallbacks
//! - **Storage compatible**: serialized field names match the persisted
//!   `calai_logs`, `calai_profile`, and `calai_goals` records
//!
//! ## Core Models
//!
//! - `FoodLogEntry`: one recorded intake event
//! - `UserProfile`: body profile driving the plan calculator
//! - `DailyGoals`: current calorie and macro targets
//! - `FoodEstimate`: one food item returned by the AI collaborator

mod estimate;
mod food_log;
mod goals;
mod profile;

pub use estimate::{EstimateMacros, EstimateRequest, FoodEstimate, ResearchAnswer, SourceLink};
pub use food_log::{
    sanitize_amount, EntryId, FoodLogEntry, MealType, Micronutrients, NutrientKind, Nutrition,
    ReportedNutrients,
};
pub use goals::{DailyGoals, PlanSource, ResolvedPlan};
pub use profile::{ActivityLevel, Gender, ProfileInput, UserProfile, WeightGoal};
