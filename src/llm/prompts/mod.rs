// ABOUTME: System instructions and prompt builders for the nutrition collaborator
// ABOUTME: Food estimation, plan computation, and grounded research prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Prompts
//!
//! System instructions are loaded at compile time from markdown files.
//! User prompts are assembled here so their wording stays in one place.

use chrono::NaiveDate;

/// System instruction for food estimation
pub const FOOD_LOG_SYSTEM_PROMPT: &str = include_str!("food_log_system.md");

/// System instruction for grounded research answers
pub const RESEARCH_SYSTEM_PROMPT: &str = include_str!("research_system.md");

/// System instruction for plan computation
pub const PLAN_SYSTEM_PROMPT: &str = include_str!("plan_system.md");

/// Answer used when the model returns no text for a research question
pub const EMPTY_RESEARCH_ANSWER: &str = "I couldn't find that information.";

/// Prompt asking for a JSON array of food items
#[must_use]
pub fn food_estimation_prompt(input: &str) -> String {
    format!(
        r#"Analyze this food intake: "{input}".
Return a JSON array of food items identified.
Each item must follow this structure:
{{
  "foodName": "string",
  "description": "short string with quantity estimation",
  "calories": number,
  "macros": {{
    "protein": number,
    "carbs": number,
    "fat": number
  }},
  "micronutrients": {{
    "fiber": number (g),
    "sugar": number (g),
    "sodium": number (mg),
    "cholesterol": number (mg),
    "potassium": number (mg),
    "saturatedFat": number (g),
    "vitaminA": number (% DV),
    "vitaminC": number (% DV),
    "calcium": number (% DV),
    "iron": number (% DV)
  }}
}}"#
    )
}

/// Prompt for a research question, with the user digest when one exists
#[must_use]
pub fn research_prompt(question: &str, context: Option<&str>, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match context {
        Some(context) if !context.trim().is_empty() => {
            format!("CONTEXT ABOUT USER:\n{context}\n\nUSER QUERY: {question}. Date: {date}")
        }
        _ => format!("User Query: {question}. Date: {date}"),
    }
}

/// Prompt asking for a daily plan for the serialized profile
#[must_use]
pub fn plan_prompt(profile_json: &str) -> String {
    format!(
        r#"Calculate the optimal daily nutrition plan for this user:
{profile_json}

METHODOLOGY:
1. Use Mifflin-St Jeor equation for BMR.
2. Calculate TDEE based on activity level.
3. Goal Adjustments:
   - Lose weight: -500 kcal deficit
   - Gain muscle: +300 kcal surplus
   - Maintain: 0

PROTEIN CALCULATION RULES:
- Base requirement: 1g protein per 1kg of body weight.
- If goal is 'gain_muscle': Increase to 1.6g - 2.2g per kg body weight.
- If goal is 'lose_weight': Maintain at least 1.2g - 1.5g per kg to preserve muscle.
- If goal is 'maintain': Use 1g per kg body weight.

Return a JSON object with this exact structure:
{{
  "calories": number,
  "protein": number,
  "carbs": number,
  "fat": number,
  "bmi": number,
  "tdee": number,
  "reasoning": "Explain the protein calculation specifically based on their weight (e.g. 'Since you weigh 70kg, we targeted 1.6g/kg...')"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_prompt_with_and_without_context() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        assert_eq!(
            research_prompt("is rice healthy?", None, date),
            "User Query: is rice healthy?. Date: 2025-03-16"
        );
        let with_context = research_prompt("more protein?", Some("USER PROFILE:\nName: Sam"), date);
        assert!(with_context.starts_with("CONTEXT ABOUT USER:\nUSER PROFILE:"));
        assert!(with_context.ends_with("USER QUERY: more protein?. Date: 2025-03-16"));
    }

    #[test]
    fn test_food_prompt_embeds_input() {
        let prompt = food_estimation_prompt("two eggs");
        assert!(prompt.starts_with("Analyze this food intake: \"two eggs\"."));
        assert!(prompt.contains("\"saturatedFat\""));
    }

    #[test]
    fn test_system_prompts_ask_for_json() {
        assert!(FOOD_LOG_SYSTEM_PROMPT.contains("Return ONLY valid JSON."));
        assert!(PLAN_SYSTEM_PROMPT.contains("Return ONLY valid JSON."));
        assert!(RESEARCH_SYSTEM_PROMPT.contains("Google Search"));
    }
}
