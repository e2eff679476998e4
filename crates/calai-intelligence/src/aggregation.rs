// ABOUTME: Time-windowed, grouped aggregation of food-log entries into chart buckets
// ABOUTME: Meal-type and per-day groupings, zero-filled buckets, totals, averages, and analytics ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Aggregation
//!
//! Every query recomputes from the raw entries; nothing here caches results
//! across mutations. Bucket values stay unrounded until a caller asks for the
//! display value, so `total()` always equals the metric sum of the entries
//! that fell into a bucket.
//!
//! Calendar-day bucketing is done in a caller-supplied time zone, which keeps
//! the functions deterministic: the CLI passes `chrono::Local`, tests pass
//! `Utc` or a `FixedOffset`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use calai_core::constants::windows;
use calai_core::errors::AppError;
use calai_core::models::{FoodLogEntry, MealType, NutrientKind};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Local calendar date of an instant
#[must_use]
pub fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Numeric field being aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Energy (kcal)
    Calories,
    /// Protein (g)
    Protein,
    /// Carbohydrates (g)
    Carbs,
    /// Fat (g)
    Fat,
    /// Any tracked micronutrient; unreported amounts count as 0
    Micronutrient(NutrientKind),
}

impl Metric {
    /// Value of this metric for one entry
    #[must_use]
    pub fn of(self, entry: &FoodLogEntry) -> f64 {
        match self {
            Self::Calories => entry.calories(),
            Self::Protein => entry.protein_grams(),
            Self::Carbs => entry.carbs_grams(),
            Self::Fat => entry.fat_grams(),
            Self::Micronutrient(kind) => entry.micronutrients().amount(kind),
        }
    }

    /// Display unit
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Calories => "kcal",
            Self::Protein | Self::Carbs | Self::Fat => "g",
            Self::Micronutrient(kind) => kind.unit(),
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calories => f.write_str("calories"),
            Self::Protein => f.write_str("protein"),
            Self::Carbs => f.write_str("carbs"),
            Self::Fat => f.write_str("fat"),
            Self::Micronutrient(kind) => write!(f, "{kind:?}"),
        }
    }
}

impl FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', '-', ' '], "");
        let metric = match key.as_str() {
            "calories" | "kcal" => Self::Calories,
            "protein" => Self::Protein,
            "carbs" | "carbohydrates" => Self::Carbs,
            "fat" => Self::Fat,
            "fiber" => Self::Micronutrient(NutrientKind::Fiber),
            "sugar" => Self::Micronutrient(NutrientKind::Sugar),
            "sodium" => Self::Micronutrient(NutrientKind::Sodium),
            "cholesterol" => Self::Micronutrient(NutrientKind::Cholesterol),
            "potassium" => Self::Micronutrient(NutrientKind::Potassium),
            "saturatedfat" => Self::Micronutrient(NutrientKind::SaturatedFat),
            "vitamina" => Self::Micronutrient(NutrientKind::VitaminA),
            "vitaminc" => Self::Micronutrient(NutrientKind::VitaminC),
            "calcium" => Self::Micronutrient(NutrientKind::Calcium),
            "iron" => Self::Micronutrient(NutrientKind::Iron),
            _ => {
                return Err(AppError::invalid_input(format!(
                    "Unknown metric '{}'",
                    s.trim()
                )))
            }
        };
        Ok(metric)
    }
}

/// Time-window predicate applied before grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Every entry
    All,
    /// Entries whose local calendar date equals the given date
    SameLocalDay(NaiveDate),
    /// Entries at or after the given instant
    Since(DateTime<Utc>),
}

impl TimeWindow {
    /// Local calendar day containing `now`
    #[must_use]
    pub fn today<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        Self::SameLocalDay(local_date(now, tz))
    }

    /// Rolling window of `days` x 24h ending at `now`
    #[must_use]
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self::Since(now - Duration::days(days))
    }

    /// Whether an entry falls in the window
    #[must_use]
    pub fn contains<Tz: TimeZone>(&self, entry: &FoodLogEntry, tz: &Tz) -> bool {
        match self {
            Self::All => true,
            Self::SameLocalDay(date) => local_date(entry.timestamp(), tz) == *date,
            Self::Since(start) => entry.timestamp() >= *start,
        }
    }
}

/// How a per-day bucket is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    /// Short weekday name (`Mon`)
    Weekday,
    /// Day of month (`16`)
    DayOfMonth,
    /// ISO date (`2025-03-16`)
    IsoDate,
}

impl DayLabel {
    fn render(self, date: NaiveDate) -> String {
        match self {
            Self::Weekday => date.format("%a").to_string(),
            Self::DayOfMonth => date.day().to_string(),
            Self::IsoDate => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Grouping key producing the bucket sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// One bucket per meal type in fixed order: breakfast, lunch, dinner, snack
    MealTypes,
    /// One bucket per local calendar day, `days` buckets ending at `today`,
    /// oldest first; `days` is treated as at least 1
    DaysEnding {
        /// Last day of the window
        today: NaiveDate,
        /// Number of daily buckets
        days: u32,
        /// Label style
        label: DayLabel,
    },
}

impl Grouping {
    /// Week view: 7 days ending today, weekday labels
    #[must_use]
    pub const fn week(today: NaiveDate) -> Self {
        Self::DaysEnding {
            today,
            days: windows::WEEK_DAYS,
            label: DayLabel::Weekday,
        }
    }

    /// Extended view: 14 days ending today, day-of-month labels
    #[must_use]
    pub const fn extended(today: NaiveDate) -> Self {
        Self::DaysEnding {
            today,
            days: windows::EXTENDED_DAYS,
            label: DayLabel::DayOfMonth,
        }
    }

    fn empty_buckets(&self) -> Vec<AggregateBucket> {
        match *self {
            Self::MealTypes => MealType::ALL
                .iter()
                .map(|meal| AggregateBucket::empty(meal.label()))
                .collect(),
            Self::DaysEnding { today, days, label } => {
                let days = days.max(1);
                (0..days)
                    .rev()
                    .map(|offset| {
                        let date = today - Duration::days(i64::from(offset));
                        AggregateBucket::empty(label.render(date))
                    })
                    .collect()
            }
        }
    }

    fn bucket_index<Tz: TimeZone>(&self, entry: &FoodLogEntry, tz: &Tz) -> Option<usize> {
        match *self {
            Self::MealTypes => MealType::ALL
                .iter()
                .position(|meal| *meal == entry.meal_type()),
            Self::DaysEnding { today, days, .. } => {
                let days = i64::from(days.max(1));
                let offset = (today - local_date(entry.timestamp(), tz)).num_days();
                if (0..days).contains(&offset) {
                    usize::try_from(days - 1 - offset).ok()
                } else {
                    None
                }
            }
        }
    }
}

/// One aggregation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    /// Bucket label
    pub label: String,
    /// Unrounded metric sum
    pub value: f64,
}

impl AggregateBucket {
    fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: 0.0,
        }
    }

    /// Value rounded to the nearest integer for display
    #[must_use]
    pub fn rounded(&self) -> i64 {
        self.value.round() as i64
    }
}

/// Ordered bucket sequence with summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    /// Aggregated metric
    pub metric: Metric,
    /// Buckets in display order
    pub buckets: Vec<AggregateBucket>,
}

impl AggregateSeries {
    /// Sum of bucket values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.value).sum()
    }

    /// Total divided by the bucket count
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.total() / self.buckets.len() as f64
    }

    /// Largest bucket value (0 when every bucket is empty)
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.value)
            .fold(0.0, f64::max)
    }
}

/// Aggregate a metric over entries matching a window, grouped into buckets
///
/// Every bucket of the grouping is present, zero when nothing matched.
/// Entries matching the window but outside every bucket are ignored.
#[must_use]
pub fn aggregate<Tz: TimeZone>(
    entries: &[FoodLogEntry],
    window: &TimeWindow,
    grouping: &Grouping,
    metric: Metric,
    tz: &Tz,
) -> AggregateSeries {
    let mut buckets = grouping.empty_buckets();

    for entry in entries.iter().filter(|e| window.contains(e, tz)) {
        if let Some(bucket) = grouping
            .bucket_index(entry, tz)
            .and_then(|index| buckets.get_mut(index))
        {
            bucket.value += metric.of(entry);
        }
    }

    AggregateSeries { metric, buckets }
}

/// Calorie and macro sums
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

impl NutrientTotals {
    /// Add one entry
    pub fn add(&mut self, entry: &FoodLogEntry) {
        self.calories += entry.calories();
        self.protein += entry.protein_grams();
        self.carbs += entry.carbs_grams();
        self.fat += entry.fat_grams();
    }
}

/// Sum calories and macros over entries matching a window
#[must_use]
pub fn sum_totals<Tz: TimeZone>(
    entries: &[FoodLogEntry],
    window: &TimeWindow,
    tz: &Tz,
) -> NutrientTotals {
    entries
        .iter()
        .filter(|e| window.contains(e, tz))
        .fold(NutrientTotals::default(), |mut totals, entry| {
            totals.add(entry);
            totals
        })
}

/// Chart range offered by the analytics view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsRange {
    /// Today's meals
    Day,
    /// Last 7 days
    #[default]
    Week,
    /// Last 14 days
    Month,
}

impl FromStr for AnalyticsRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(AppError::invalid_input(format!(
                "Unknown range '{other}' (expected day, week, or month)"
            ))),
        }
    }
}

/// Coarse consistency signal derived from the headline average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyInsight {
    /// Rounded average above 100
    High,
    /// Anything else
    Varies,
}

impl ConsistencyInsight {
    /// Threshold the rounded average must exceed
    pub const HIGH_THRESHOLD: i64 = 100;

    /// Insight text
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::High => {
                "You're consistently hitting high protein numbers. Great for muscle retention!"
            }
            Self::Varies => {
                "Your protein intake varies. Try to include a protein source in every meal."
            }
        }
    }
}

/// Chart data plus headline figures for one analytics range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsView {
    /// Selected range
    pub range: AnalyticsRange,
    /// Bucketed series
    pub series: AggregateSeries,
    /// Headline number: total for `day`, rounded average otherwise
    pub headline: i64,
    /// Consistency insight
    pub insight: ConsistencyInsight,
}

/// Build the analytics view for a range ending at `now`
#[must_use]
pub fn analytics<Tz: TimeZone>(
    entries: &[FoodLogEntry],
    range: AnalyticsRange,
    metric: Metric,
    now: DateTime<Utc>,
    tz: &Tz,
) -> AnalyticsView {
    let today = local_date(now, tz);
    let (window, grouping) = match range {
        AnalyticsRange::Day => (TimeWindow::SameLocalDay(today), Grouping::MealTypes),
        AnalyticsRange::Week => (TimeWindow::All, Grouping::week(today)),
        AnalyticsRange::Month => (TimeWindow::All, Grouping::extended(today)),
    };
    let series = aggregate(entries, &window, &grouping, metric, tz);
    let average = series.average().round() as i64;
    let headline = match range {
        AnalyticsRange::Day => series.total().round() as i64,
        AnalyticsRange::Week | AnalyticsRange::Month => average,
    };
    let insight = if average > ConsistencyInsight::HIGH_THRESHOLD {
        ConsistencyInsight::High
    } else {
        ConsistencyInsight::Varies
    };

    AnalyticsView {
        range,
        series,
        headline,
        insight,
    }
}
