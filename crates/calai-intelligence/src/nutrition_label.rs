// ABOUTME: Per-entry nutrition facts label with percent daily values
// ABOUTME: Reference daily values for fat, cholesterol, sodium, carbs, protein, and potassium
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use calai_core::constants::daily_values;
use calai_core::models::{FoodLogEntry, NutrientKind};
use serde::Serialize;

/// One line of the label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    /// Nutrient name as printed
    pub name: &'static str,
    /// Amount, `None` when the estimate did not report it
    pub amount: Option<f64>,
    /// Unit of `amount`
    pub unit: &'static str,
    /// Rounded percent of daily value, when a reference exists
    pub percent_daily_value: Option<i64>,
    /// Printed as a sub-line of the previous nutrient
    pub indented: bool,
}

/// Nutrition facts for a single log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionLabel {
    /// Entry name
    pub name: String,
    /// Rounded calories
    pub calories: i64,
    /// Label lines in print order
    pub lines: Vec<LabelLine>,
}

fn percent_of(amount: f64, reference: f64) -> i64 {
    (amount / reference * 100.0).round() as i64
}

fn line(
    name: &'static str,
    amount: Option<f64>,
    unit: &'static str,
    reference: Option<f64>,
    indented: bool,
) -> LabelLine {
    LabelLine {
        name,
        amount,
        unit,
        percent_daily_value: reference.map(|r| percent_of(amount.unwrap_or(0.0), r)),
        indented,
    }
}

impl NutritionLabel {
    /// Build the label for an entry
    ///
    /// Unreported micronutrients print as unknown but count as 0 in
    /// percentages. Vitamin A, vitamin C, calcium, and iron are already
    /// reported as percent daily value.
    #[must_use]
    pub fn for_entry(entry: &FoodLogEntry) -> Self {
        let micros = entry.micronutrients();
        let reported = |kind: NutrientKind| micros.reported_amount(kind);
        let as_dv = |kind: NutrientKind| {
            let amount = reported(kind);
            LabelLine {
                name: match kind {
                    NutrientKind::VitaminA => "Vitamin A",
                    NutrientKind::VitaminC => "Vitamin C",
                    NutrientKind::Calcium => "Calcium",
                    _ => "Iron",
                },
                amount,
                unit: "%",
                percent_daily_value: Some(amount.unwrap_or(0.0).round() as i64),
                indented: false,
            }
        };

        let lines = vec![
            line(
                "Total Fat",
                Some(entry.fat_grams()),
                "g",
                Some(daily_values::FAT_G),
                false,
            ),
            line(
                "Saturated Fat",
                reported(NutrientKind::SaturatedFat),
                "g",
                None,
                true,
            ),
            line(
                "Cholesterol",
                reported(NutrientKind::Cholesterol),
                "mg",
                Some(daily_values::CHOLESTEROL_MG),
                false,
            ),
            line(
                "Sodium",
                reported(NutrientKind::Sodium),
                "mg",
                Some(daily_values::SODIUM_MG),
                false,
            ),
            line(
                "Total Carbohydrate",
                Some(entry.carbs_grams()),
                "g",
                Some(daily_values::CARBS_G),
                false,
            ),
            line("Dietary Fiber", reported(NutrientKind::Fiber), "g", None, true),
            line("Total Sugars", reported(NutrientKind::Sugar), "g", None, true),
            line(
                "Protein",
                Some(entry.protein_grams()),
                "g",
                Some(daily_values::PROTEIN_G),
                false,
            ),
            as_dv(NutrientKind::VitaminA),
            as_dv(NutrientKind::VitaminC),
            as_dv(NutrientKind::Calcium),
            as_dv(NutrientKind::Iron),
            line(
                "Potassium",
                reported(NutrientKind::Potassium),
                "mg",
                Some(daily_values::POTASSIUM_MG),
                false,
            ),
        ];

        Self {
            name: entry.name().to_owned(),
            calories: entry.calories().round() as i64,
            lines,
        }
    }

    /// Find a line by printed name
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&LabelLine> {
        self.lines.iter().find(|l| l.name == name)
    }
}
