// ABOUTME: Shapes exchanged with the AI collaborator for estimation and research
// ABOUTME: FoodEstimate (validated), EstimateRequest, ResearchAnswer, and SourceLink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::food_log::{FoodLogEntry, MealType, Micronutrients, Nutrition};
use crate::constants::IMAGE_ONLY_PROMPT;
use crate::errors::{AppError, AppResult};

/// Macronutrient grams of one estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateMacros {
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

/// One food item identified by the collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEstimate {
    /// Display name
    pub food_name: String,
    /// Short description with portion estimate
    #[serde(default)]
    pub description: String,
    /// Energy (kcal)
    pub calories: f64,
    /// Macronutrients
    pub macros: EstimateMacros,
    /// Micronutrients, absent keys unknown
    #[serde(default, skip_serializing_if = "Micronutrients::is_empty")]
    pub micronutrients: Micronutrients,
}

impl FoodEstimate {
    /// Convert into a log entry with a fresh identifier
    ///
    /// Amounts are sanitized by [`FoodLogEntry::new`].
    #[must_use]
    pub fn into_entry(self, meal_type: MealType, timestamp: DateTime<Utc>) -> FoodLogEntry {
        FoodLogEntry::new(
            self.food_name,
            Nutrition {
                calories: self.calories,
                protein_grams: self.macros.protein,
                carbs_grams: self.macros.carbs,
                fat_grams: self.macros.fat,
            },
            self.micronutrients,
            meal_type,
            timestamp,
        )
    }
}

/// Input for a food estimation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateRequest {
    /// Free-text description (may be empty when an image is supplied)
    pub description: String,
    /// JPEG image bytes
    pub image: Option<Vec<u8>>,
}

impl EstimateRequest {
    /// Text-only request
    #[must_use]
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            image: None,
        }
    }

    /// Attach an image
    #[must_use]
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    /// Require a description or an image
    ///
    /// # Errors
    ///
    /// Returns a validation error when both are empty.
    pub fn validate(&self) -> AppResult<()> {
        let has_image = self.image.as_ref().is_some_and(|bytes| !bytes.is_empty());
        if self.description.trim().is_empty() && !has_image {
            return Err(AppError::missing_field("description or image"));
        }
        Ok(())
    }

    /// Text sent to the collaborator
    #[must_use]
    pub fn prompt_text(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            IMAGE_ONLY_PROMPT
        } else {
            trimmed
        }
    }
}

/// A cited web source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    /// Address
    pub uri: String,
    /// Page title
    pub title: String,
}

/// Answer to a research question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchAnswer {
    /// Answer text
    pub text: String,
    /// Grounding sources, possibly empty
    #[serde(default)]
    pub sources: Vec<SourceLink>,
}

impl ResearchAnswer {
    /// Answer given when the collaborator failed
    #[must_use]
    pub fn apology() -> Self {
        Self {
            text: "Sorry, I encountered an error searching for that.".to_owned(),
            sources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientKind;

    #[test]
    fn test_image_only_request_uses_identify_prompt() {
        let request = EstimateRequest::text("  ").with_image(vec![0xFF, 0xD8]);
        assert!(request.validate().is_ok());
        assert_eq!(request.prompt_text(), "Identify this food");
    }

    #[test]
    fn test_empty_request_is_rejected() {
        assert!(EstimateRequest::default().validate().unwrap_err().is_validation());
        let empty_image = EstimateRequest::text("").with_image(Vec::new());
        assert!(empty_image.validate().is_err());
    }

    #[test]
    fn test_estimate_conversion_sanitizes() {
        let estimate: FoodEstimate = serde_json::from_str(
            r#"{
                "foodName": "Oatmeal",
                "description": "1 cup",
                "calories": 150,
                "macros": {"protein": 5, "carbs": 27, "fat": -3},
                "micronutrients": {"fiber": 4}
            }"#,
        )
        .unwrap();
        let entry = estimate.into_entry(MealType::Breakfast, Utc::now());
        assert_eq!(entry.name(), "Oatmeal");
        assert!(entry.fat_grams().abs() < f64::EPSILON);
        assert_eq!(
            entry.micronutrients().reported_amount(NutrientKind::Fiber),
            Some(4.0)
        );
    }
}
