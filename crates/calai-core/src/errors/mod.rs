// ABOUTME: Unified error handling for the CalAI nutrition engine
// ABOUTME: Defines ErrorCode, AppError, and the AppResult alias shared by every crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Unified Error Handling System
//!
//! All fallible operations return [`AppResult`]. The error carries a stable
//! [`ErrorCode`] so callers can branch on the failure class (validation,
//! estimation, plan calculation, storage) without string matching.
//!
//! Collaborator failures are converted at the boundary: estimation failures
//! become a user-facing message, plan-calculation failures are absorbed into a
//! deterministic fallback plan and never reach presentation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input failed validation
    InvalidInput = 3000,
    /// A required field is absent
    MissingRequiredField = 3001,
    /// Input could not be parsed
    InvalidFormat = 3002,
    /// A numeric value is outside its accepted range
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Lookup by identifier found nothing
    ResourceNotFound = 4000,
    /// An identifier collides with an existing record
    ResourceAlreadyExists = 4001,
    /// Another request for the same action is still outstanding
    RequestInFlight = 4002,

    // External Services (5000-5999)
    /// The AI collaborator returned an error
    ExternalServiceError = 5000,
    /// The AI collaborator could not be reached or is not configured
    ExternalServiceUnavailable = 5001,
    /// The AI collaborator rejected the request for quota reasons
    ExternalRateLimited = 5003,
    /// Food estimation failed or returned unusable data
    EstimationFailed = 5100,
    /// Plan calculation by the collaborator failed
    PlanCalculationFailed = 5101,

    // Configuration (6000-6999)
    /// Generic configuration failure
    ConfigError = 6000,
    /// Required configuration is missing
    ConfigMissing = 6001,
    /// Configuration is present but invalid
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Persistence failed
    StorageError = 9002,
    /// Serialization or deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested record was not found",
            Self::ResourceAlreadyExists => "A record with this identifier already exists",
            Self::RequestInFlight => "A request is already in progress",
            Self::ExternalServiceError => "The AI service encountered an error",
            Self::ExternalServiceUnavailable => "The AI service is currently unavailable",
            Self::ExternalRateLimited => "The AI service rate limit was exceeded",
            Self::EstimationFailed => "Failed to analyze the food",
            Self::PlanCalculationFailed => "Failed to calculate a nutrition plan",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this code belongs to the validation class
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::MissingRequiredField
                | Self::InvalidFormat
                | Self::ValueOutOfRange
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    }

    /// Value outside its accepted range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Unparseable input
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Record not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Identifier collision
    #[must_use]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            format!("{} already exists", resource.into()),
        )
    }

    /// Estimation or research request already outstanding
    #[must_use]
    pub fn request_in_flight() -> Self {
        Self::new(
            ErrorCode::RequestInFlight,
            "An analysis is already running; wait for it to finish",
        )
    }

    /// Food estimation failure
    #[must_use]
    pub fn estimation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EstimationFailed, message)
    }

    /// Plan calculation failure
    #[must_use]
    pub fn plan_calculation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PlanCalculationFailed, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service not reachable or not configured
    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceUnavailable, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Storage error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Whether this is a validation failure (malformed profile or entry input)
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.code.is_validation()
    }

    /// Whether this is a failure of the estimation collaborator
    #[must_use]
    pub const fn is_estimation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::EstimationFailed
                | ErrorCode::ExternalServiceError
                | ErrorCode::ExternalServiceUnavailable
                | ErrorCode::ExternalRateLimited
        )
    }

    /// Message suitable for presentation, without internal detail
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::EstimationFailed
            | ErrorCode::ExternalServiceError
            | ErrorCode::ExternalServiceUnavailable => {
                "Failed to analyze. Please try again or check your connection.".to_owned()
            }
            ErrorCode::ExternalRateLimited
            | ErrorCode::InvalidInput
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFormat
            | ErrorCode::ValueOutOfRange
            | ErrorCode::RequestInFlight => self.message.clone(),
            _ => self.code.description().to_owned(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
