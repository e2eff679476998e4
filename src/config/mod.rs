// ABOUTME: Configuration module for the data directory, collaborator, and plan calculator settings
// ABOUTME: Environment-driven AppConfig plus the global IntelligenceConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

/// Environment configuration
pub mod environment;
/// Plan calculator configuration singleton
pub mod intelligence;

pub use environment::{AppConfig, GeminiConfig};
pub use intelligence::IntelligenceConfig;
