// ABOUTME: Nutrition intelligence engine for the CalAI tracker
// ABOUTME: Plan calculation, aggregation, goal comparison, history, labels, and context digests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

#![deny(unsafe_code)]

//! # CalAI Intelligence
//!
//! Pure, synchronous computation over in-memory snapshots of the food log,
//! profile, and goals. Nothing in this crate performs I/O or holds state
//! between calls; callers pass the reference instant and time zone so that
//! results are reproducible.
//!
//! ## Modules
//!
//! - **`plan_calculator`**: Mifflin-St Jeor BMR, TDEE, calorie and macro targets
//! - **aggregation**: Time-windowed, grouped metric buckets with totals and averages
//! - **comparator**: Remaining calories and clamped progress against goals
//! - **history**: Day-grouped log listing
//! - **`nutrition_label`**: Per-entry percent daily values
//! - **`context_summary`**: Text digest for the research collaborator

/// Plan calculator configuration
pub mod config;

/// Daily goal derivation from a body profile
pub mod plan_calculator;

/// Bucketed aggregation of log entries
pub mod aggregation;

/// Intake versus goal comparison
pub mod comparator;

/// History grouping by local day
pub mod history;

/// Nutrition facts label
pub mod nutrition_label;

/// Research context digest
pub mod context_summary;

pub use aggregation::{
    aggregate, analytics, local_date, sum_totals, AggregateBucket, AggregateSeries,
    AnalyticsRange, AnalyticsView, ConsistencyInsight, DayLabel, Grouping, Metric,
    NutrientTotals, TimeWindow,
};
pub use comparator::{compare, GoalComparison, MacroProgress};
pub use config::{ConfigError, PlanConfig};
pub use context_summary::build_context_summary;
pub use history::{group_history, DayGroup};
pub use nutrition_label::{LabelLine, NutritionLabel};
pub use plan_calculator::{compute_plan, compute_plan_or_default, default_plan};
