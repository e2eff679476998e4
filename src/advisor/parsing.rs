// ABOUTME: Validation of collaborator JSON answers before they become entries or goals
// ABOUTME: Tolerates code fences and surrounding prose, rejects wrong shapes and bad numbers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::{DailyGoals, FoodEstimate};
use serde_json::Value;
use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Locate the JSON document in a model answer
///
/// Tries the whole text, then a fenced code block, then the outermost
/// array or object.
fn extract_json(response: &str) -> Option<Value> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let body = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = body.find("```") {
            if let Ok(value) = serde_json::from_str(body[..end].trim()) {
                return Some(value);
            }
        }
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&trimmed[start..=end]) {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn check_amount(value: f64, field: &str, item: usize) -> AppResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::estimation(format!(
            "Item {item}: {field} must be a non-negative number"
        )))
    }
}

fn validate_estimate(estimate: &FoodEstimate, item: usize) -> AppResult<()> {
    if estimate.food_name.trim().is_empty() {
        return Err(AppError::estimation(format!("Item {item}: missing foodName")));
    }
    check_amount(estimate.calories, "calories", item)?;
    check_amount(estimate.macros.protein, "protein", item)?;
    check_amount(estimate.macros.carbs, "carbs", item)?;
    check_amount(estimate.macros.fat, "fat", item)
}

/// Parse and validate a food estimation answer
///
/// A single object is accepted as a one-item list. Every item must carry a
/// name and non-negative calories and macros.
///
/// # Errors
///
/// Returns `EstimationFailed` when the answer is not JSON, has the wrong
/// shape, contains no items, or any item fails validation. Nothing is
/// returned partially.
pub fn parse_estimates(response: &str) -> AppResult<Vec<FoodEstimate>> {
    let value = extract_json(response).ok_or_else(|| {
        warn!("Estimation answer is not JSON");
        AppError::estimation("The analysis did not return valid JSON")
    })?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(AppError::estimation(
                "The analysis returned an unexpected shape",
            ))
        }
    };

    if items.is_empty() {
        return Err(AppError::estimation("No food items were identified"));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let item_no = i + 1;
            let estimate: FoodEstimate = serde_json::from_value(item).map_err(|e| {
                AppError::estimation(format!("Item {item_no}: {e}")).with_source(e)
            })?;
            validate_estimate(&estimate, item_no)?;
            Ok(estimate)
        })
        .collect()
}

/// Parse and validate a plan answer
///
/// # Errors
///
/// Returns `PlanCalculationFailed` when the answer is not a plan object or
/// any target is not positive.
pub fn parse_plan(response: &str) -> AppResult<DailyGoals> {
    let value = extract_json(response)
        .ok_or_else(|| AppError::plan_calculation("The plan answer is not valid JSON"))?;
    let goals: DailyGoals = serde_json::from_value(value)
        .map_err(|e| AppError::plan_calculation(format!("Malformed plan: {e}")).with_source(e))?;
    goals.validate()?;
    Ok(goals)
}
