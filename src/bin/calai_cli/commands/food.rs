// ABOUTME: Food log commands for calai-cli
// ABOUTME: AI-assisted logging, day-grouped history, and per-entry nutrition labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::{EntryId, EstimateRequest, MealType};
use calai::errors::{AppError, AppResult};
use calai::tracker::NutritionTracker;
use chrono::{Local, Utc};
use tracing::info;
use uuid::Uuid;

use crate::helpers::display::{display_estimates, display_label, display_user_error};

/// Estimate the described food and append it to the log
pub async fn log(
    tracker: &mut NutritionTracker,
    description: String,
    image: Option<String>,
    meal: &str,
    dry_run: bool,
) -> AppResult<()> {
    let meal_type: MealType = meal.parse()?;
    let mut request = EstimateRequest::text(description);
    if let Some(path) = image {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::invalid_input(format!("Cannot read image {path}: {e}")))?;
        request = request.with_image(bytes);
    }

    println!("Analyzing...");
    let estimates = match tracker.analyze_food(&request).await {
        Ok(estimates) => estimates,
        Err(e) if e.is_validation() || e.is_estimation() => {
            display_user_error(&e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    display_estimates(&estimates);

    if dry_run {
        println!("\nDry run: nothing saved.");
        return Ok(());
    }

    let ids = tracker
        .accept_estimates(estimates, meal_type, Utc::now())
        .await?;
    info!(count = ids.len(), meal = %meal_type, "Logged food");
    println!("\nAdded {} item(s) to {}.", ids.len(), meal_type.label());
    Ok(())
}

/// Print every day with its entries, newest first
pub fn history(tracker: &NutritionTracker) {
    let groups = tracker.history(&Local);
    if groups.is_empty() {
        println!("No history yet.");
        return;
    }
    println!("{} entries", tracker.entries().len());
    for group in groups {
        println!(
            "\n{}  ({} kcal, {}g protein)",
            group.heading(),
            group.calories.round(),
            group.protein.round()
        );
        for entry in &group.entries {
            println!(
                "  {}  {:<28} {:>6} kcal  {}",
                entry.timestamp().with_timezone(&Local).format("%H:%M"),
                entry.name(),
                entry.calories().round(),
                entry.id()
            );
        }
    }
}

/// Print the nutrition label of one entry
pub fn label(tracker: &NutritionTracker, id: &str) -> AppResult<()> {
    let uuid = Uuid::parse_str(id.trim())
        .map_err(|_| AppError::invalid_input(format!("'{id}' is not an entry id")))?;
    let label = tracker
        .label(EntryId::from_uuid(uuid))
        .ok_or_else(|| AppError::not_found(format!("Entry {id}")))?;
    display_label(&label);
    Ok(())
}
