// ABOUTME: Deterministic plain-text digest of profile, goals, and intake for the research collaborator
// ABOUTME: Today's totals and entries, remaining budget, and the rolling 7-day calorie average
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::fmt::Write;

use calai_core::constants::windows;
use calai_core::models::{DailyGoals, FoodLogEntry, UserProfile};
use chrono::{DateTime, TimeZone, Utc};

use crate::aggregation::{sum_totals, TimeWindow};
use crate::comparator::compare;

/// Build the context digest handed to the research collaborator
///
/// The output depends only on the arguments: the same log, profile, goals,
/// reference instant, and time zone always produce the same text. The weekly
/// average divides the calories of the last 7 x 24h by 7 regardless of how
/// many days actually have entries.
#[must_use]
pub fn build_context_summary<Tz: TimeZone>(
    entries: &[FoodLogEntry],
    profile: &UserProfile,
    goals: &DailyGoals,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String {
    let today_window = TimeWindow::today(now, tz);
    let today = sum_totals(entries, &today_window, tz);
    let comparison = compare(&today, goals);
    let week = sum_totals(
        entries,
        &TimeWindow::last_days(now, windows::CONTEXT_TREND_DAYS),
        tz,
    );
    let weekly_average = (week.calories / windows::CONTEXT_TREND_DAYS as f64).round();

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "USER PROFILE:");
    let _ = writeln!(out, "Name: {}", profile.name);
    let _ = writeln!(
        out,
        "Stats: {}yo, {}, {}kg, {}cm",
        profile.age, profile.gender, profile.weight_kg, profile.height_cm
    );
    let _ = writeln!(
        out,
        "Goal: {} (Target: {} kcal/day, {}g protein/day)",
        profile.goal,
        goals.calories_kcal.round(),
        goals.protein_grams.round()
    );
    let _ = writeln!(out, "Activity: {}", profile.activity_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "CURRENT STATUS (Today):");
    let _ = writeln!(
        out,
        "Consumed: {} kcal, {}g protein",
        today.calories.round(),
        today.protein.round()
    );
    let _ = writeln!(
        out,
        "Remaining: {} kcal",
        comparison.remaining_calories.round()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "TODAY'S LOGS:");
    let mut any_today = false;
    for entry in entries.iter().filter(|e| today_window.contains(e, tz)) {
        any_today = true;
        let _ = writeln!(
            out,
            "- {} ({}kcal, {}g pro, {}g carb, {}g fat)",
            entry.name(),
            entry.calories().round(),
            entry.protein_grams(),
            entry.carbs_grams(),
            entry.fat_grams()
        );
    }
    if !any_today {
        let _ = writeln!(out, "No food logged today yet.");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "WEEKLY TREND:");
    let _ = write!(
        out,
        "Average Daily Calories (Past 7 days): ~{weekly_average} kcal"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calai_core::models::{ActivityLevel, Gender, MealType, Micronutrients, Nutrition, WeightGoal};

    const NOON: i64 = 1_742_126_400_000;
    const DAY_MS: i64 = 86_400_000;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn profile() -> UserProfile {
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

    fn entry(name: &str, calories: f64, when: DateTime<Utc>) -> FoodLogEntry {
        FoodLogEntry::new(
            name,
            Nutrition {
                calories,
                protein_grams: 20.0,
                carbs_grams: 30.0,
                fat_grams: 5.5,
            },
            Micronutrients::none(),
            MealType::Lunch,
            when,
        )
    }

    #[test]
    fn test_summary_contains_today_and_weekly_average() {
        let now = at(NOON);
        let entries = vec![
            entry("Salad", 350.0, now),
            entry("Pizza", 1050.0, at(NOON - 3 * DAY_MS)),
        ];
        let summary =
            build_context_summary(&entries, &profile(), &DailyGoals::initial(), now, &Utc);
        assert!(summary.contains("Stats: 30yo, male, 80kg, 180cm"));
        assert!(summary.contains("Goal: maintain (Target: 2200 kcal/day, 150g protein/day)"));
        assert!(summary.contains("Consumed: 350 kcal, 20g protein"));
        assert!(summary.contains("Remaining: 1850 kcal"));
        assert!(summary.contains("- Salad (350kcal, 20g pro, 30g carb, 5.5g fat)"));
        assert!(!summary.contains("Pizza"));
        assert!(summary.ends_with("~200 kcal"));
    }

    #[test]
    fn test_summary_without_entries() {
        let summary =
            build_context_summary(&[], &profile(), &DailyGoals::initial(), at(NOON), &Utc);
        assert!(summary.contains("No food logged today yet."));
        assert!(summary.contains("Remaining: 2200 kcal"));
        assert!(summary.ends_with("~0 kcal"));
    }

    #[test]
    fn test_remaining_is_clamped_in_summary() {
        let now = at(NOON);
        let entries = vec![entry("Feast", 5000.0, now)];
        let summary =
            build_context_summary(&entries, &profile(), &DailyGoals::initial(), now, &Utc);
        assert!(summary.contains("Remaining: 0 kcal"));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let now = at(NOON);
        let entries = vec![entry("Salad", 350.0, now)];
        let goals = DailyGoals::initial();
        assert_eq!(
            build_context_summary(&entries, &profile(), &goals, now, &Utc),
            build_context_summary(&entries, &profile(), &goals, now, &Utc)
        );
    }
}
