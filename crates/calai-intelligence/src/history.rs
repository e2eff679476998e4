// ABOUTME: History view grouping of food-log entries by local calendar day
// ABOUTME: Newest day first, newest entry first within a day, with per-day calorie and protein sums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::models::FoodLogEntry;
use chrono::{NaiveDate, TimeZone};

use crate::aggregation::local_date;

/// Entries of one local calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    /// Local calendar date
    pub date: NaiveDate,
    /// Entries, newest first
    pub entries: Vec<&'a FoodLogEntry>,
    /// Unrounded calorie sum
    pub calories: f64,
    /// Unrounded protein sum (g)
    pub protein: f64,
}

impl DayGroup<'_> {
    /// Number of entries in the day
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries (never true for groups produced by [`group_history`])
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Heading such as `Sunday, March 16, 2025`
    #[must_use]
    pub fn heading(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}

/// Group entries by local day, newest day first
///
/// Entries with equal timestamps keep reverse insertion order, so the most
/// recently appended one is listed first.
#[must_use]
pub fn group_history<'a, Tz: TimeZone>(entries: &'a [FoodLogEntry], tz: &Tz) -> Vec<DayGroup<'a>> {
    let mut sorted: Vec<&FoodLogEntry> = entries.iter().rev().collect();
    // Stable sort keeps reverse insertion order for ties
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for entry in sorted {
        let date = local_date(entry.timestamp(), tz);
        match groups.last_mut() {
            Some(group) if group.date == date => {
                group.calories += entry.calories();
                group.protein += entry.protein_grams();
                group.entries.push(entry);
            }
            _ => groups.push(DayGroup {
                date,
                calories: entry.calories(),
                protein: entry.protein_grams(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use calai_core::models::{MealType, Micronutrients, Nutrition};
    use chrono::{DateTime, FixedOffset, Utc};

    fn entry(name: &str, ms: i64, calories: f64) -> FoodLogEntry {
        FoodLogEntry::new(
            name,
            Nutrition {
                calories,
                protein_grams: 10.0,
                ..Nutrition::default()
            },
            Micronutrients::none(),
            MealType::Snack,
            DateTime::from_timestamp_millis(ms).unwrap(),
        )
    }

    const NOON: i64 = 1_742_126_400_000;
    const HOUR: i64 = 3_600_000;

    #[test]
    fn test_newest_day_first_newest_entry_first() {
        let entries = vec![
            entry("old", NOON - 30 * HOUR, 100.0),
            entry("morning", NOON - 3 * HOUR, 200.0),
            entry("noon", NOON, 300.0),
        ];
        let groups = group_history(&entries, &Utc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].entries[0].name(), "noon");
        assert_eq!(groups[0].entries[1].name(), "morning");
        assert!((groups[0].calories - 500.0).abs() < f64::EPSILON);
        assert!((groups[0].protein - 20.0).abs() < f64::EPSILON);
        assert_eq!(groups[1].entries[0].name(), "old");
        assert_eq!(groups[0].heading(), "Sunday, March 16, 2025");
    }

    #[test]
    fn test_equal_timestamps_reverse_insertion_order() {
        let entries = vec![entry("first", NOON, 1.0), entry("second", NOON, 1.0)];
        let groups = group_history(&entries, &Utc);
        assert_eq!(groups[0].entries[0].name(), "second");
        assert_eq!(groups[0].entries[1].name(), "first");
    }

    #[test]
    fn test_grouping_uses_local_dates() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // 03:00Z on the 16th is still the 15th at UTC-5
        let entries = vec![entry("late", NOON - 9 * HOUR, 1.0), entry("day", NOON, 1.0)];
        let groups = group_history(&entries, &tz);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_empty_log_yields_no_groups() {
        assert!(group_history(&[], &Utc).is_empty());
    }
}
