// ABOUTME: Goal comparison of intake totals against daily targets
// ABOUTME: Non-negative remaining calories, clamped progress percentages, and raw ratios for overage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::DailyGoals;
use serde::{Deserialize, Serialize};

use crate::aggregation::NutrientTotals;

/// Progress of one nutrient against its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    /// Amount consumed
    pub consumed: f64,
    /// Target amount
    pub target: f64,
    /// consumed / target, unclamped (0 when the target is not positive)
    pub ratio: f64,
    /// Ratio as a percentage clamped to [0, 100]
    pub percent: f64,
}

impl MacroProgress {
    /// Compare one consumed amount with its target
    #[must_use]
    pub fn new(consumed: f64, target: f64) -> Self {
        let ratio = if target > 0.0 && consumed.is_finite() {
            (consumed / target).max(0.0)
        } else {
            0.0
        };
        Self {
            consumed,
            target,
            ratio,
            percent: (ratio * 100.0).clamp(0.0, 100.0),
        }
    }

    /// Consumption exceeds the target
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.ratio > 1.0
    }
}

/// Totals compared against goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalComparison {
    /// max(0, goal - consumed) calories
    pub remaining_calories: f64,
    /// Calories consumed beyond the goal, 0 when under
    pub calorie_overage: f64,
    /// Calorie progress
    pub calories: MacroProgress,
    /// Protein progress
    pub protein: MacroProgress,
    /// Carbohydrate progress
    pub carbs: MacroProgress,
    /// Fat progress
    pub fat: MacroProgress,
}

/// Compare intake totals with daily goals
///
/// Pure: identical inputs yield identical outputs.
#[must_use]
pub fn compare(totals: &NutrientTotals, goals: &DailyGoals) -> GoalComparison {
    let difference = goals.calories_kcal - totals.calories;
    GoalComparison {
        remaining_calories: difference.max(0.0),
        calorie_overage: (-difference).max(0.0),
        calories: MacroProgress::new(totals.calories, goals.calories_kcal),
        protein: MacroProgress::new(totals.protein, goals.protein_grams),
        carbs: MacroProgress::new(totals.carbs, goals.carbs_grams),
        fat: MacroProgress::new(totals.fat, goals.fat_grams),
    }
}
