// ABOUTME: Insight commands for calai-cli
// ABOUTME: Dashboard, analytics charts, and grounded research questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai::errors::AppResult;
use calai_intelligence::{AnalyticsRange, Metric};
use calai::tracker::NutritionTracker;
use chrono::{Local, Utc};

use crate::helpers::display::{display_analytics, display_answer, display_dashboard, display_user_error};

/// Today's progress
pub fn dashboard(tracker: &NutritionTracker) {
    if tracker.needs_onboarding() {
        println!("No profile yet; showing progress against the starter goals.\n");
    }
    display_dashboard(&tracker.dashboard(Utc::now(), &Local), tracker.goals());
}

/// Chart for a range and metric
pub fn analytics(tracker: &NutritionTracker, range: &str, metric: &str) -> AppResult<()> {
    let range: AnalyticsRange = range.parse()?;
    let metric: Metric = metric.parse()?;
    display_analytics(&tracker.analytics(range, metric, Utc::now(), &Local));
    Ok(())
}

/// Answer a question with the research collaborator
pub async fn ask(tracker: &NutritionTracker, question: &str) -> AppResult<()> {
    match tracker.ask(question, Utc::now(), &Local).await {
        Ok(answer) => display_answer(&answer),
        Err(e) => display_user_error(&e),
    }
    Ok(())
}
