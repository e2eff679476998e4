// ABOUTME: LLM provider abstraction used by the nutrition collaborator
// ABOUTME: Capabilities, chat messages with image attachments, requests, responses, and the provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # LLM Provider Interface
//!
//! The nutrition collaborator talks to a language model through the
//! [`LlmProvider`] trait. The only production implementation is
//! [`GeminiProvider`]; tests substitute scripted providers.
//!
//! ## Key Concepts
//!
//! - **`LlmCapabilities`**: Bitflags describing provider features (vision, JSON mode, search grounding)
//! - **`ChatMessage`**: Role-based message, optionally carrying an inline image
//! - **`ChatRequest`**: Messages plus model, temperature, JSON mode, and grounding switches
//! - **`ChatResponse`**: Text plus any grounding sources the provider cited
//!
//! ## Example
//!
//! ```rust,no_run
//! use calai::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are an expert nutritionist."),
//!         ChatMessage::user("How much protein is in an egg?"),
//!     ])
//!     .with_search_grounding();
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
pub mod prompts;

pub use gemini::{GeminiProvider, DEFAULT_MODEL as GEMINI_DEFAULT_MODEL};

use async_trait::async_trait;
use calai_core::models::SourceLink;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    ///
    /// The collaborator checks these before sending an image or asking for
    /// grounded answers.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts inline images
        const VISION = 0b0000_0001;
        /// Provider can be forced to answer with JSON
        const JSON_MODE = 0b0000_0010;
        /// Provider supports system messages
        const SYSTEM_MESSAGES = 0b0000_0100;
        /// Provider can ground answers in web search results
        const SEARCH_GROUNDING = 0b0000_1000;
    }
}

impl LlmCapabilities {
    /// Capabilities for a basic text-only provider
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Capabilities for a full-featured provider (like Gemini Flash)
    #[must_use]
    pub const fn full_featured() -> Self {
        Self::VISION
            .union(Self::JSON_MODE)
            .union(Self::SYSTEM_MESSAGES)
            .union(Self::SEARCH_GROUNDING)
    }

    /// Check if vision is supported
    #[must_use]
    pub const fn supports_vision(&self) -> bool {
        self.contains(Self::VISION)
    }

    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }

    /// Check if search grounding is supported
    #[must_use]
    pub const fn supports_search_grounding(&self) -> bool {
        self.contains(Self::SEARCH_GROUNDING)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

/// Inline image sent alongside a user message
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// JPEG image
    #[must_use]
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/jpeg".to_owned(),
            data,
        }
    }
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
    /// Image placed before the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttachment>,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image: None,
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Attach an image
    #[must_use]
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Ask for a JSON-only answer
    pub json_mode: bool,
    /// Ground the answer in web search results
    pub search_grounding: bool,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_mode: false,
            search_grounding: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request a JSON-only answer
    #[must_use]
    pub const fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    /// Enable web search grounding
    #[must_use]
    pub const fn with_search_grounding(mut self) -> Self {
        self.search_grounding = true;
        self
    }

    /// Any message carries an image
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.messages.iter().any(|m| m.image.is_some())
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
    /// Web sources the answer was grounded on
    #[serde(default)]
    pub sources: Vec<SourceLink>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_featured_capabilities() {
        let caps = LlmCapabilities::full_featured();
        assert!(caps.supports_vision());
        assert!(caps.supports_json_mode());
        assert!(caps.supports_search_grounding());
        assert!(!LlmCapabilities::text_only().supports_vision());
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![
            ChatMessage::user("pasta").with_image(ImageAttachment::jpeg(vec![1, 2, 3])),
        ])
        .with_model("gemini-2.5-flash")
        .with_json_mode();
        assert!(request.json_mode);
        assert!(!request.search_grounding);
        assert!(request.has_image());
        assert_eq!(request.model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn test_image_debug_hides_bytes() {
        let debug = format!("{:?}", ImageAttachment::jpeg(vec![0; 2048]));
        assert!(debug.contains("2048"));
        assert!(!debug.contains("0, 0"));
    }
}
