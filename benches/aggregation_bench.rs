// ABOUTME: Criterion benchmarks for log aggregation and derived views
// ABOUTME: Measures analytics ranges, day grouping, and context digest over growing logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Criterion benchmarks for the aggregation engine.
//!
//! Logs are synthetic: several entries per day spread over the past year.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use calai_core::models::{
    ActivityLevel, DailyGoals, FoodLogEntry, Gender, MealType, Micronutrients, NutrientKind,
    Nutrition, UserProfile, WeightGoal,
};
use calai_intelligence::{
    analytics, build_context_summary, group_history, AnalyticsRange, Metric,
};
use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const LOG_SIZES: [usize; 3] = [100, 1_000, 10_000];

/// 2025-03-16T12:00:00Z
fn reference_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_742_126_400_000).unwrap_or_default()
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn generate_log(count: usize) -> Vec<FoodLogEntry> {
    let now = reference_now();
    (0..count)
        .map(|index| {
            let meal = MealType::ALL[index % MealType::ALL.len()];
            let minutes_ago = (index * 97 % (365 * 24 * 60)) as i64;
            FoodLogEntry::new(
                format!("Bench item {index}"),
                Nutrition {
                    calories: 150.0 + (index % 700) as f64,
                    protein_grams: (index % 45) as f64,
                    carbs_grams: (index % 80) as f64,
                    fat_grams: (index % 30) as f64,
                },
                Micronutrients::none().with(NutrientKind::Sodium, (index % 900) as f64),
                meal,
                now - Duration::minutes(minutes_ago),
            )
        })
        .collect()
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");
    let now = reference_now();
    let ranges = [
        ("day", AnalyticsRange::Day),
        ("week", AnalyticsRange::Week),
        ("month", AnalyticsRange::Month),
    ];

    for count in LOG_SIZES {
        let entries = generate_log(count);
        group.throughput(Throughput::Elements(count as u64));
        for (name, range) in ranges {
            group.bench_with_input(BenchmarkId::new(name, count), &entries, |b, entries| {
                b.iter(|| {
                    analytics(
                        black_box(entries),
                        range,
                        Metric::Calories,
                        black_box(now),
                        &Utc,
                    )
                });
            });
        }
    }

    group.finish();
}

fn bench_micronutrient_metric(c: &mut Criterion) {
    let entries = generate_log(1_000);
    let now = reference_now();
    c.bench_function("analytics_week_sodium", |b| {
        b.iter(|| {
            analytics(
                black_box(&entries),
                AnalyticsRange::Week,
                Metric::Micronutrient(NutrientKind::Sodium),
                now,
                &Utc,
            )
        });
    });
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    for count in LOG_SIZES {
        let entries = generate_log(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("group_history", count),
            &entries,
            |b, entries| {
                b.iter(|| group_history(black_box(entries), &Utc).len());
            },
        );
    }
    group.finish();
}

fn bench_context_summary(c: &mut Criterion) {
    let entries = generate_log(1_000);
    let profile = UserProfile {
        name: "Bench".into(),
        age: 30,
        gender: Gender::Female,
        height_cm: 168.0,
        weight_kg: 62.0,
        activity_level: ActivityLevel::Active,
        goal: WeightGoal::Maintain,
    };
    let goals = DailyGoals::initial();
    let now = reference_now();

    c.bench_function("build_context_summary", |b| {
        b.iter(|| build_context_summary(black_box(&entries), &profile, &goals, now, &Utc));
    });
}

criterion_group!(
    benches,
    bench_analytics,
    bench_micronutrient_metric,
    bench_history,
    bench_context_summary,
);
criterion_main!(benches);
