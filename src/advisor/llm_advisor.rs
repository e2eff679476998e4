// ABOUTME: LLM-backed nutrition advisor issuing estimation, plan, and grounded research prompts
// ABOUTME: Validates every answer and records call timings through AppLogger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::time::Instant;

use async_trait::async_trait;
use calai_core::models::{DailyGoals, EstimateRequest, FoodEstimate, ResearchAnswer, UserProfile};
use chrono::Local;
use tracing::instrument;

use super::parsing::{parse_estimates, parse_plan};
use super::NutritionAdvisor;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{
    food_estimation_prompt, plan_prompt, research_prompt, EMPTY_RESEARCH_ANSWER,
    FOOD_LOG_SYSTEM_PROMPT, PLAN_SYSTEM_PROMPT, RESEARCH_SYSTEM_PROMPT,
};
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, ImageAttachment, LlmProvider};
use crate::logging::AppLogger;

/// Sampling temperature for answers that must parse as JSON
const STRUCTURED_TEMPERATURE: f32 = 0.2;

/// Output cap for a food estimation answer
const ESTIMATION_MAX_TOKENS: u32 = 2048;

/// Output cap for a nutrition plan answer
const PLAN_MAX_TOKENS: u32 = 512;

/// Nutrition advisor backed by a chat-completion provider
#[derive(Debug)]
pub struct LlmNutritionAdvisor<P> {
    provider: P,
    model: Option<String>,
}

impl<P: LlmProvider> LlmNutritionAdvisor<P> {
    /// Advisor using the provider's default model
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Use a specific model for every request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Underlying provider
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// System prompt plus user turn, folded into the user turn when the
    /// provider has no system role
    fn conversation(&self, system: &str, user: ChatMessage) -> Vec<ChatMessage> {
        if self.provider.capabilities().supports_system_messages() {
            vec![ChatMessage::system(system), user]
        } else {
            vec![ChatMessage {
                content: format!("{system}\n\n{}", user.content),
                ..user
            }]
        }
    }

    async fn send(&self, operation: &str, request: ChatRequest) -> AppResult<ChatResponse> {
        let request = match &self.model {
            Some(model) => request.with_model(model.clone()),
            None => request,
        };
        let started = Instant::now();
        let result = self.provider.complete(&request).await;
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_collaborator_call(operation, result.is_ok(), elapsed);
        result
    }
}

#[async_trait]
impl<P: LlmProvider> NutritionAdvisor for LlmNutritionAdvisor<P> {
    #[instrument(skip_all, fields(provider = self.provider.name(), has_image = request.image.is_some()))]
    async fn estimate_food(&self, request: &EstimateRequest) -> AppResult<Vec<FoodEstimate>> {
        request.validate()?;

        let mut message = ChatMessage::user(food_estimation_prompt(request.prompt_text()));
        if let Some(bytes) = request.image.as_ref().filter(|b| !b.is_empty()) {
            if !self.provider.capabilities().supports_vision() {
                return Err(AppError::estimation(format!(
                    "{} cannot analyze images",
                    self.provider.display_name()
                )));
            }
            message = message.with_image(ImageAttachment::jpeg(bytes.clone()));
        }

        let chat = ChatRequest::new(self.conversation(FOOD_LOG_SYSTEM_PROMPT, message))
            .with_json_mode()
            .with_temperature(STRUCTURED_TEMPERATURE)
            .with_max_tokens(ESTIMATION_MAX_TOKENS);
        let response = self.send("estimate_food", chat).await?;
        parse_estimates(&response.content)
    }

    #[instrument(skip_all, fields(provider = self.provider.name()))]
    async fn compute_plan(&self, profile: &UserProfile) -> AppResult<DailyGoals> {
        let profile_json = serde_json::to_string_pretty(profile)?;
        let chat = ChatRequest::new(
            self.conversation(PLAN_SYSTEM_PROMPT, ChatMessage::user(plan_prompt(&profile_json))),
        )
        .with_json_mode()
        .with_temperature(STRUCTURED_TEMPERATURE)
        .with_max_tokens(PLAN_MAX_TOKENS);
        let response = self.send("compute_plan", chat).await?;
        parse_plan(&response.content)
    }

    #[instrument(skip_all, fields(provider = self.provider.name(), has_context = context.is_some()))]
    async fn research_query(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> AppResult<ResearchAnswer> {
        let prompt = research_prompt(question, context, Local::now().date_naive());
        let mut chat =
            ChatRequest::new(self.conversation(RESEARCH_SYSTEM_PROMPT, ChatMessage::user(prompt)));
        if self.provider.capabilities().supports_search_grounding() {
            chat = chat.with_search_grounding();
        }

        let response = self.send("research_query", chat).await?;
        let text = if response.content.trim().is_empty() {
            EMPTY_RESEARCH_ANSWER.to_owned()
        } else {
            response.content
        };
        Ok(ResearchAnswer {
            text,
            sources: response.sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmCapabilities, MessageRole, TokenUsage};
    use calai_core::errors::ErrorCode;
    use calai_core::models::SourceLink;
    use std::sync::Mutex;

    /// Provider returning a fixed answer and recording the last request
    struct ScriptedProvider {
        answer: Result<String, ErrorCode>,
        capabilities: LlmCapabilities,
        sources: Vec<SourceLink>,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_owned()),
                capabilities: LlmCapabilities::full_featured(),
                sources: Vec::new(),
                last_request: Mutex::new(None),
            }
        }

        fn failing(code: ErrorCode) -> Self {
            Self {
                answer: Err(code),
                ..Self::answering("")
            }
        }

        fn last(&self) -> ChatRequest {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn display_name(&self) -> &'static str {
            "Scripted"
        }

        fn capabilities(&self) -> LlmCapabilities {
            self.capabilities
        }

        fn default_model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.answer {
                Ok(content) => Ok(ChatResponse {
                    content: content.clone(),
                    model: "scripted-1".to_owned(),
                    usage: Some(TokenUsage {
                        prompt_tokens: 1,
                        completion_tokens: 1,
                        total_tokens: 2,
                    }),
                    finish_reason: Some("STOP".to_owned()),
                    sources: self.sources.clone(),
                }),
                Err(code) => Err(AppError::new(*code, "scripted failure")),
            }
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Sam".into(),
            age: 30,
            gender: calai_core::models::Gender::Male,
            height_cm: 180.0,
            weight_kg: 80.0,
            activity_level: calai_core::models::ActivityLevel::Moderate,
            goal: calai_core::models::WeightGoal::Maintain,
        }
    }

    #[tokio::test]
    async fn test_estimate_sends_image_and_json_mode() {
        let advisor = LlmNutritionAdvisor::new(ScriptedProvider::answering(
            r#"[{"foodName": "Toast", "calories": 80, "macros": {"protein": 3, "carbs": 15, "fat": 1}}]"#,
        ));
        let request = EstimateRequest::text("").with_image(vec![0xFF, 0xD8, 0xFF]);
        let items = advisor.estimate_food(&request).await.unwrap();
        assert_eq!(items[0].food_name, "Toast");

        let sent = advisor.provider().last();
        assert!(sent.json_mode);
        assert!(sent.has_image());
        assert!(sent.messages[1].content.contains("\"Identify this food\""));
        assert_eq!(sent.temperature, Some(STRUCTURED_TEMPERATURE));
        assert_eq!(sent.max_tokens, Some(ESTIMATION_MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_system_prompt_folded_without_system_role() {
        let mut provider = ScriptedProvider::answering(
            r#"{"calories": 2759, "protein": 80, "carbs": 437, "fat": 77}"#,
        );
        provider.capabilities = LlmCapabilities::VISION | LlmCapabilities::JSON_MODE;
        let advisor = LlmNutritionAdvisor::new(provider);
        advisor.compute_plan(&profile()).await.unwrap();

        let sent = advisor.provider().last();
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(sent.messages[0].role, MessageRole::User);
        assert!(sent.messages[0].content.starts_with(PLAN_SYSTEM_PROMPT));
        assert!(sent.messages[0].content.contains("\"activityLevel\": \"moderate\""));
        assert_eq!(sent.max_tokens, Some(PLAN_MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_image_kept_when_system_prompt_folded() {
        let mut provider = ScriptedProvider::answering(
            r#"[{"foodName": "Toast", "calories": 80, "macros": {"protein": 3, "carbs": 15, "fat": 1}}]"#,
        );
        provider.capabilities = LlmCapabilities::VISION | LlmCapabilities::JSON_MODE;
        let advisor = LlmNutritionAdvisor::new(provider);
        let request = EstimateRequest::text("toast").with_image(vec![0xFF, 0xD8]);
        advisor.estimate_food(&request).await.unwrap();

        let sent = advisor.provider().last();
        assert_eq!(sent.messages.len(), 1);
        assert!(sent.has_image());
        assert!(sent.messages[0].content.starts_with(FOOD_LOG_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_estimate_without_vision_fails_before_calling() {
        let mut provider = ScriptedProvider::answering("[]");
        provider.capabilities = LlmCapabilities::text_only();
        let advisor = LlmNutritionAdvisor::new(provider);
        let request = EstimateRequest::text("photo").with_image(vec![1]);
        let err = advisor.estimate_food(&request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EstimationFailed);
        assert!(advisor.provider().last_request.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_estimate_rejects_empty_request() {
        let advisor = LlmNutritionAdvisor::new(ScriptedProvider::answering("[]"));
        let err = advisor
            .estimate_food(&EstimateRequest::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_plan_is_validated() {
        let advisor = LlmNutritionAdvisor::new(ScriptedProvider::answering(
            r#"{"calories": -1, "protein": 80, "carbs": 300, "fat": 70}"#,
        ));
        let err = advisor.compute_plan(&profile()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanCalculationFailed);
    }

    #[tokio::test]
    async fn test_plan_prompt_contains_profile() {
        let advisor = LlmNutritionAdvisor::new(ScriptedProvider::answering(
            r#"{"calories": 2759, "protein": 80, "carbs": 437, "fat": 77}"#,
        ))
        .with_model("gemini-2.0-flash");
        let goals = advisor.compute_plan(&profile()).await.unwrap();
        assert!((goals.protein_grams - 80.0).abs() < f64::EPSILON);

        let sent = advisor.provider().last();
        assert_eq!(sent.model.as_deref(), Some("gemini-2.0-flash"));
        assert!(sent.messages[1].content.contains("\"activityLevel\": \"moderate\""));
    }

    #[tokio::test]
    async fn test_research_grounded_with_sources() {
        let mut provider = ScriptedProvider::answering("Lentils are high in protein.");
        provider.sources = vec![SourceLink {
            uri: "https://example.org/lentils".into(),
            title: "Lentils".into(),
        }];
        let advisor = LlmNutritionAdvisor::new(provider);
        let answer = advisor
            .research_query("lentils?", Some("USER PROFILE:"))
            .await
            .unwrap();
        assert_eq!(answer.sources.len(), 1);
        let sent = advisor.provider().last();
        assert!(sent.search_grounding);
        assert!(sent.messages[1].content.starts_with("CONTEXT ABOUT USER:"));
    }

    #[tokio::test]
    async fn test_research_empty_answer() {
        let advisor = LlmNutritionAdvisor::new(ScriptedProvider::answering("  "));
        let answer = advisor.research_query("?", None).await.unwrap();
        assert_eq!(answer.text, EMPTY_RESEARCH_ANSWER);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let advisor =
            LlmNutritionAdvisor::new(ScriptedProvider::failing(ErrorCode::ExternalServiceUnavailable));
        let err = advisor
            .estimate_food(&EstimateRequest::text("rice"))
            .await
            .unwrap_err();
        assert!(err.is_estimation());
    }
}
