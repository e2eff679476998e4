// ABOUTME: AI collaborator contract for food estimation, plan computation, and research questions
// ABOUTME: NutritionAdvisor trait with the LLM-backed implementation and response validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Nutrition Advisor
//!
//! The tracker treats the advisor as an untrusted collaborator: every answer
//! is parsed and range-checked before it can reach the log or the goals.

mod llm_advisor;
/// Validation of collaborator answers
pub mod parsing;

pub use llm_advisor::LlmNutritionAdvisor;

use async_trait::async_trait;
use calai_core::models::{DailyGoals, EstimateRequest, FoodEstimate, ResearchAnswer, UserProfile};

use crate::errors::AppResult;

/// External collaborator consulted by the tracker
#[async_trait]
pub trait NutritionAdvisor: Send + Sync {
    /// Identify food items in a description and/or image
    ///
    /// # Errors
    ///
    /// Returns an estimation or external-service error on transport failure
    /// or when the answer does not validate.
    async fn estimate_food(&self, request: &EstimateRequest) -> AppResult<Vec<FoodEstimate>>;

    /// Propose daily goals for a profile
    ///
    /// # Errors
    ///
    /// Returns a plan-calculation or external-service error when no usable
    /// plan was produced.
    async fn compute_plan(&self, profile: &UserProfile) -> AppResult<DailyGoals>;

    /// Answer a nutrition question, grounded in the optional user digest
    ///
    /// # Errors
    ///
    /// Returns an external-service error on transport failure.
    async fn research_query(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> AppResult<ResearchAnswer>;
}
