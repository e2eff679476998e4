// ABOUTME: Profile commands for calai-cli
// ABOUTME: Onboarding with plan resolution and profile/goals display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::ProfileInput;
use calai::errors::AppResult;
use calai::tracker::NutritionTracker;
use tracing::info;

use crate::helpers::display::{display_goals, display_user_error};

/// Validate the form, store the profile, and show the resulting plan
pub async fn onboard(tracker: &mut NutritionTracker, input: ProfileInput) -> AppResult<()> {
    match tracker.complete_onboarding(input).await {
        Ok(plan) => {
            info!(source = %plan.source, "Onboarding complete");
            println!("\nProfile saved. Your daily plan ({}):", plan.source);
            display_goals(&plan.goals);
            Ok(())
        }
        Err(e) if e.is_validation() => {
            display_user_error(&e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Print the profile and goals
pub fn show(tracker: &NutritionTracker) {
    let Some(profile) = tracker.profile() else {
        println!("No profile yet. Run `calai-cli onboard` first.");
        return;
    };
    println!("Name:     {}", if profile.name.is_empty() { "-" } else { &profile.name });
    println!("Age:      {}", profile.age);
    println!("Gender:   {}", profile.gender);
    println!("Height:   {} cm", profile.height_cm);
    println!("Weight:   {} kg", profile.weight_kg);
    println!("Activity: {}", profile.activity_level);
    println!("Goal:     {}", profile.goal);
    println!();
    display_goals(tracker.goals());
}
