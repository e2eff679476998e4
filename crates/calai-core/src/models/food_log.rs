// ABOUTME: Food-log domain models: entries, meal types, and micronutrient records
// ABOUTME: Normalizes every numeric field at construction so aggregation never sees NaN or negatives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Type of meal
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    #[default]
    Snack,
}

impl MealType {
    /// Fixed display order used by the day view
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Lowercase storage name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    /// Capitalized chart label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            other => Err(AppError::invalid_input(format!(
                "Unknown meal type '{other}' (expected breakfast, lunch, dinner, or snack)"
            ))),
        }
    }
}

/// Named micronutrients an estimate may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutrientKind {
    /// Dietary fiber (g)
    Fiber,
    /// Total sugars (g)
    Sugar,
    /// Sodium (mg)
    Sodium,
    /// Cholesterol (mg)
    Cholesterol,
    /// Potassium (mg)
    Potassium,
    /// Saturated fat (g)
    SaturatedFat,
    /// Vitamin A (%DV)
    VitaminA,
    /// Vitamin C (%DV)
    VitaminC,
    /// Calcium (%DV)
    Calcium,
    /// Iron (%DV)
    Iron,
}

impl NutrientKind {
    /// Every tracked micronutrient
    pub const ALL: [Self; 10] = [
        Self::Fiber,
        Self::Sugar,
        Self::Sodium,
        Self::Cholesterol,
        Self::Potassium,
        Self::SaturatedFat,
        Self::VitaminA,
        Self::VitaminC,
        Self::Calcium,
        Self::Iron,
    ];

    /// Unit the estimator reports this nutrient in
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Fiber | Self::Sugar | Self::SaturatedFat => "g",
            Self::Sodium | Self::Cholesterol | Self::Potassium => "mg",
            Self::VitaminA | Self::VitaminC | Self::Calcium | Self::Iron => "%",
        }
    }

    const fn flag(self) -> ReportedNutrients {
        match self {
            Self::Fiber => ReportedNutrients::FIBER,
            Self::Sugar => ReportedNutrients::SUGAR,
            Self::Sodium => ReportedNutrients::SODIUM,
            Self::Cholesterol => ReportedNutrients::CHOLESTEROL,
            Self::Potassium => ReportedNutrients::POTASSIUM,
            Self::SaturatedFat => ReportedNutrients::SATURATED_FAT,
            Self::VitaminA => ReportedNutrients::VITAMIN_A,
            Self::VitaminC => ReportedNutrients::VITAMIN_C,
            Self::Calcium => ReportedNutrients::CALCIUM,
            Self::Iron => ReportedNutrients::IRON,
        }
    }
}

bitflags::bitflags! {
    /// Which micronutrients a record actually reported
    ///
    /// Unreported nutrients hold 0 for arithmetic but display as unknown.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ReportedNutrients: u16 {
        /// Fiber reported
        const FIBER = 1;
        /// Sugar reported
        const SUGAR = 1 << 1;
        /// Sodium reported
        const SODIUM = 1 << 2;
        /// Cholesterol reported
        const CHOLESTEROL = 1 << 3;
        /// Potassium reported
        const POTASSIUM = 1 << 4;
        /// Saturated fat reported
        const SATURATED_FAT = 1 << 5;
        /// Vitamin A reported
        const VITAMIN_A = 1 << 6;
        /// Vitamin C reported
        const VITAMIN_C = 1 << 7;
        /// Calcium reported
        const CALCIUM = 1 << 8;
        /// Iron reported
        const IRON = 1 << 9;
    }
}

/// Clamp an untrusted amount to a finite, non-negative value
#[must_use]
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Wire/storage shape: every key optional, absent meaning unknown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMicronutrients {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cholesterol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    potassium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturated_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vitamin_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vitamin_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calcium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iron: Option<f64>,
}

/// Normalized micronutrient amounts for one entry
///
/// Every amount is a finite, non-negative number. Nutrients the estimator did
/// not report hold 0 and are absent from [`Micronutrients::reported`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMicronutrients", into = "RawMicronutrients")]
pub struct Micronutrients {
    amounts: [f64; 10],
    reported: ReportedNutrients,
}

impl Micronutrients {
    /// Record with nothing reported
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder: set one nutrient (sanitized)
    #[must_use]
    pub fn with(mut self, kind: NutrientKind, amount: f64) -> Self {
        self.set(kind, Some(amount));
        self
    }

    /// Set or clear one nutrient; `None` marks it unknown
    pub fn set(&mut self, kind: NutrientKind, amount: Option<f64>) {
        let slot = Self::slot(kind);
        match amount {
            Some(value) => {
                self.amounts[slot] = sanitize_amount(value);
                self.reported.insert(kind.flag());
            }
            None => {
                self.amounts[slot] = 0.0;
                self.reported.remove(kind.flag());
            }
        }
    }

    /// Amount for arithmetic (0 when unreported)
    #[must_use]
    pub const fn amount(&self, kind: NutrientKind) -> f64 {
        self.amounts[Self::slot(kind)]
    }

    /// Amount for display (`None` when unreported)
    #[must_use]
    pub const fn reported_amount(&self, kind: NutrientKind) -> Option<f64> {
        if self.reported.contains(kind.flag()) {
            Some(self.amounts[Self::slot(kind)])
        } else {
            None
        }
    }

    /// Set of reported nutrients
    #[must_use]
    pub const fn reported(&self) -> ReportedNutrients {
        self.reported
    }

    /// Nothing reported at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    const fn slot(kind: NutrientKind) -> usize {
        kind as usize
    }
}

impl From<RawMicronutrients> for Micronutrients {
    fn from(raw: RawMicronutrients) -> Self {
        let mut out = Self::none();
        out.set(NutrientKind::Fiber, raw.fiber);
        out.set(NutrientKind::Sugar, raw.sugar);
        out.set(NutrientKind::Sodium, raw.sodium);
        out.set(NutrientKind::Cholesterol, raw.cholesterol);
        out.set(NutrientKind::Potassium, raw.potassium);
        out.set(NutrientKind::SaturatedFat, raw.saturated_fat);
        out.set(NutrientKind::VitaminA, raw.vitamin_a);
        out.set(NutrientKind::VitaminC, raw.vitamin_c);
        out.set(NutrientKind::Calcium, raw.calcium);
        out.set(NutrientKind::Iron, raw.iron);
        out
    }
}

impl From<Micronutrients> for RawMicronutrients {
    fn from(m: Micronutrients) -> Self {
        Self {
            fiber: m.reported_amount(NutrientKind::Fiber),
            sugar: m.reported_amount(NutrientKind::Sugar),
            sodium: m.reported_amount(NutrientKind::Sodium),
            cholesterol: m.reported_amount(NutrientKind::Cholesterol),
            potassium: m.reported_amount(NutrientKind::Potassium),
            saturated_fat: m.reported_amount(NutrientKind::SaturatedFat),
            vitamin_a: m.reported_amount(NutrientKind::VitaminA),
            vitamin_c: m.reported_amount(NutrientKind::VitaminC),
            calcium: m.reported_amount(NutrientKind::Calcium),
            iron: m.reported_amount(NutrientKind::Iron),
        }
    }
}

/// Opaque, immutable identifier of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Calorie and macronutrient amounts of one intake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Nutrition {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_grams: f64,
    /// Carbohydrates (g)
    pub carbs_grams: f64,
    /// Fat (g)
    pub fat_grams: f64,
}

/// Missing, null, NaN, or negative stored amounts load as 0
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map_or(0.0, sanitize_amount))
}

/// One recorded intake event
///
/// Entries are immutable once created; the only way to build one is through
/// [`FoodLogEntry::new`] or deserialization, both of which sanitize every
/// numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEntry {
    id: EntryId,
    name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    calories: f64,
    #[serde(rename = "protein", default, deserialize_with = "lenient_amount")]
    protein_grams: f64,
    #[serde(rename = "carbs", default, deserialize_with = "lenient_amount")]
    carbs_grams: f64,
    #[serde(rename = "fat", default, deserialize_with = "lenient_amount")]
    fat_grams: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    meal_type: MealType,
    #[serde(default, skip_serializing_if = "Micronutrients::is_empty")]
    micronutrients: Micronutrients,
}

impl FoodLogEntry {
    /// Create an entry with a fresh identifier, sanitizing all amounts
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        nutrition: Nutrition,
        micronutrients: Micronutrients,
        meal_type: MealType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::with_id(
            EntryId::new(),
            name,
            nutrition,
            micronutrients,
            meal_type,
            timestamp,
        )
    }

    /// Create an entry with a caller-supplied identifier
    #[must_use]
    pub fn with_id(
        id: EntryId,
        name: impl Into<String>,
        nutrition: Nutrition,
        micronutrients: Micronutrients,
        meal_type: MealType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            calories: sanitize_amount(nutrition.calories),
            protein_grams: sanitize_amount(nutrition.protein_grams),
            carbs_grams: sanitize_amount(nutrition.carbs_grams),
            fat_grams: sanitize_amount(nutrition.fat_grams),
            timestamp,
            meal_type,
            micronutrients,
        }
    }

    /// Identifier
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Display label
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Energy (kcal)
    #[must_use]
    pub const fn calories(&self) -> f64 {
        self.calories
    }

    /// Protein (g)
    #[must_use]
    pub const fn protein_grams(&self) -> f64 {
        self.protein_grams
    }

    /// Carbohydrates (g)
    #[must_use]
    pub const fn carbs_grams(&self) -> f64 {
        self.carbs_grams
    }

    /// Fat (g)
    #[must_use]
    pub const fn fat_grams(&self) -> f64 {
        self.fat_grams
    }

    /// Calorie and macro amounts
    #[must_use]
    pub const fn nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.calories,
            protein_grams: self.protein_grams,
            carbs_grams: self.carbs_grams,
            fat_grams: self.fat_grams,
        }
    }

    /// Creation instant
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Meal category
    #[must_use]
    pub const fn meal_type(&self) -> MealType {
        self.meal_type
    }

    /// Micronutrient record
    #[must_use]
    pub const fn micronutrients(&self) -> &Micronutrients {
        &self.micronutrients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_amount_rejects_nan_and_negative() {
        assert!(sanitize_amount(f64::NAN).abs() < f64::EPSILON);
        assert!(sanitize_amount(-12.0).abs() < f64::EPSILON);
        assert!(sanitize_amount(f64::INFINITY).abs() < f64::EPSILON);
        assert!((sanitize_amount(12.5) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unreported_micronutrient_is_unknown_but_zero() {
        let micros = Micronutrients::none().with(NutrientKind::Fiber, 4.0);
        assert_eq!(micros.reported_amount(NutrientKind::Fiber), Some(4.0));
        assert_eq!(micros.reported_amount(NutrientKind::Sodium), None);
        assert!(micros.amount(NutrientKind::Sodium).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legacy_record_with_missing_protein_loads_as_zero() {
        let json = r#"{
            "id": "7d7f7a3e-0d5c-4f4e-9a53-3f1f43b6f9a1",
            "name": "Apple",
            "calories": 95,
            "carbs": 25,
            "fat": 0.3,
            "timestamp": 1735689600000,
            "mealType": "snack",
            "micronutrients": { "fiber": 4.4, "vitaminC": 14 }
        }"#;
        let entry: FoodLogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.protein_grams().abs() < f64::EPSILON);
        assert!((entry.calories() - 95.0).abs() < f64::EPSILON);
        assert_eq!(
            entry.micronutrients().reported(),
            ReportedNutrients::FIBER | ReportedNutrients::VITAMIN_C
        );
        assert_eq!(entry.timestamp().timestamp_millis(), 1_735_689_600_000);
    }

    #[test]
    fn test_serialization_keeps_storage_field_names() {
        let entry = FoodLogEntry::new(
            "Eggs",
            Nutrition {
                calories: 140.0,
                protein_grams: 12.0,
                carbs_grams: 1.0,
                fat_grams: 10.0,
            },
            Micronutrients::none().with(NutrientKind::Cholesterol, 370.0),
            MealType::Breakfast,
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["protein"], 12.0);
        assert_eq!(value["mealType"], "breakfast");
        assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(value["micronutrients"]["cholesterol"], 370.0);
        assert!(value["micronutrients"].get("fiber").is_none());
    }

    #[test]
    fn test_negative_amounts_are_clamped_at_construction() {
        let entry = FoodLogEntry::new(
            "Broken",
            Nutrition {
                calories: -100.0,
                protein_grams: f64::NAN,
                carbs_grams: 5.0,
                fat_grams: 1.0,
            },
            Micronutrients::none(),
            MealType::Snack,
            Utc::now(),
        );
        assert!(entry.calories().abs() < f64::EPSILON);
        assert!(entry.protein_grams().abs() < f64::EPSILON);
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().unwrap_err().is_validation());
    }
}
