// ABOUTME: Output formatting helpers for calai-cli
// ABOUTME: Consistent terminal rendering of goals, estimates, dashboard, charts, labels, and answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::{DailyGoals, FoodEstimate, ResearchAnswer};
use calai::errors::AppError;
use calai_intelligence::{AnalyticsRange, AnalyticsView, MacroProgress, NutritionLabel};
use calai::tracker::DashboardView;

const BAR_WIDTH: usize = 30;

fn bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Print the user-facing text of an error
pub fn display_user_error(error: &AppError) {
    eprintln!("Error: {}", error.user_message());
}

/// Print daily targets
pub fn display_goals(goals: &DailyGoals) {
    println!("{}", "=".repeat(40));
    println!("  Calories: {:>6} kcal", goals.calories_kcal.round());
    println!("  Protein:  {:>6} g", goals.protein_grams.round());
    println!("  Carbs:    {:>6} g", goals.carbs_grams.round());
    println!("  Fat:      {:>6} g", goals.fat_grams.round());
    if let Some(tdee) = goals.tdee_kcal {
        println!("  TDEE:     {:>6} kcal", tdee.round());
    }
    if let Some(bmi) = goals.bmi.filter(|b| *b > 0.0) {
        println!("  BMI:      {bmi:>6.1}");
    }
    println!("{}", "=".repeat(40));
    if let Some(reasoning) = &goals.reasoning {
        println!("{reasoning}");
    }
}

/// Print the items found by the estimator
pub fn display_estimates(estimates: &[FoodEstimate]) {
    println!("\nFound {} item(s):", estimates.len());
    for estimate in estimates {
        println!(
            "  {:<28} {:>6} kcal  P {:>5.1}g  C {:>5.1}g  F {:>5.1}g",
            estimate.food_name,
            estimate.calories.round(),
            estimate.macros.protein,
            estimate.macros.carbs,
            estimate.macros.fat
        );
        if !estimate.description.is_empty() {
            println!("      {}", estimate.description);
        }
    }
}

fn progress_row(name: &str, unit: &str, progress: &MacroProgress) {
    println!(
        "  {name:<9} {} {:>5}/{:<5}{unit}{}",
        bar(progress.percent / 100.0),
        progress.consumed.round(),
        progress.target.round(),
        if progress.is_over() { "  over" } else { "" }
    );
}

/// Print today's progress
pub fn display_dashboard(view: &DashboardView<'_>, goals: &DailyGoals) {
    println!("Today, {}", view.date.format("%A, %B %-d"));
    println!("{}", "=".repeat(60));
    println!(
        "  {} kcal left of {} (eaten {})",
        view.comparison.remaining_calories.round(),
        goals.calories_kcal.round(),
        view.totals.calories.round()
    );
    if view.comparison.calorie_overage > 0.0 {
        println!(
            "  {} kcal over today's goal",
            view.comparison.calorie_overage.round()
        );
    }
    progress_row("Calories", " kcal", &view.comparison.calories);
    progress_row("Protein", "g", &view.comparison.protein);
    progress_row("Carbs", "g", &view.comparison.carbs);
    progress_row("Fat", "g", &view.comparison.fat);
    println!("{}", "=".repeat(60));

    if view.entries.is_empty() {
        println!("No food logged today yet.");
        return;
    }
    for entry in &view.entries {
        println!(
            "  {:<10} {:<28} {:>6} kcal",
            entry.meal_type().label(),
            entry.name(),
            entry.calories().round()
        );
    }
}

/// Print a bar chart of an analytics series
pub fn display_analytics(view: &AnalyticsView) {
    let (title, headline) = match view.range {
        AnalyticsRange::Day => ("Today by meal", "Total"),
        AnalyticsRange::Week => ("Last 7 days", "Daily average"),
        AnalyticsRange::Month => ("Last 14 days", "Daily average"),
    };
    println!("{title}: {}", view.series.metric);
    println!("{}", "=".repeat(60));
    let max = view.series.max_value();
    for bucket in &view.series.buckets {
        let fraction = if max > 0.0 { bucket.value / max } else { 0.0 };
        println!("  {:<10} {} {}", bucket.label, bar(fraction), bucket.rounded());
    }
    println!("{}", "=".repeat(60));
    println!("{headline}: {}", view.headline);
    println!("{}", view.insight.message());
}

/// Print a nutrition facts label
pub fn display_label(label: &NutritionLabel) {
    println!("Nutrition Facts: {}", label.name);
    println!("{}", "=".repeat(44));
    println!("Calories {:>35}", label.calories);
    println!("{}", "-".repeat(44));
    for line in &label.lines {
        let indent = if line.indented { "  " } else { "" };
        let amount = line
            .amount
            .map_or_else(|| "--".to_owned(), |a| format!("{a}{}", line.unit));
        let percent = line
            .percent_daily_value
            .map_or_else(String::new, |p| format!("{p}%"));
        println!("{indent}{:<22} {amount:>10} {percent:>8}", line.name);
    }
    println!("{}", "=".repeat(44));
}

/// Print a research answer with its sources
pub fn display_answer(answer: &ResearchAnswer) {
    println!("{}", answer.text);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for (i, source) in answer.sources.iter().enumerate() {
            println!("  {}. {} <{}>", i + 1, source.title, source.uri);
        }
    }
}
