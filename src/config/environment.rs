// ABOUTME: Environment configuration for the data directory and the Gemini collaborator
// ABOUTME: Reads CALAI_DATA_DIR, GEMINI_API_KEY, CALAI_GEMINI_MODEL, and CALAI_HTTP_TIMEOUT_SECS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Environment-based configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::llm::GEMINI_DEFAULT_MODEL as DEFAULT_MODEL;

/// Directory for persisted snapshots
pub const DATA_DIR_ENV: &str = "CALAI_DATA_DIR";
/// Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Gemini model id
pub const GEMINI_MODEL_ENV: &str = "CALAI_GEMINI_MODEL";
/// Collaborator HTTP timeout in seconds
pub const HTTP_TIMEOUT_ENV: &str = "CALAI_HTTP_TIMEOUT_SECS";

/// Default collaborator timeout
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
/// Fallback data directory when the platform has none
const LOCAL_DATA_DIR: &str = ".calai";

/// Gemini collaborator settings
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key; `None` disables the collaborator
    pub api_key: Option<String>,
    /// Model id
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Whether an API key is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the JSON snapshots
    pub data_dir: PathBuf,
    /// Collaborator settings
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `CALAI_HTTP_TIMEOUT_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let data_dir = env::var(DATA_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(default_data_dir, PathBuf::from);

        let timeout_secs: u64 = env_var_or(HTTP_TIMEOUT_ENV, &DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .context("Invalid CALAI_HTTP_TIMEOUT_SECS value")?;
        if timeout_secs == 0 {
            anyhow::bail!("CALAI_HTTP_TIMEOUT_SECS must be greater than zero");
        }

        let config = Self {
            data_dir,
            gemini: GeminiConfig {
                api_key: env::var(GEMINI_API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env_var_or(GEMINI_MODEL_ENV, DEFAULT_MODEL),
                timeout_secs,
            },
        };

        info!("{}", config.summary());
        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "CalAI Configuration:\n\
             - Data directory: {}\n\
             - Gemini: {}\n\
             - Model: {}\n\
             - Timeout: {}s",
            self.data_dir.display(),
            if self.gemini.is_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.gemini.model,
            self.gemini.timeout_secs,
        )
    }
}

/// Platform data directory joined with `calai`, or `./.calai`
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(LOCAL_DATA_DIR), |dir| dir.join("calai"))
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hides_key() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/calai"),
            gemini: GeminiConfig {
                api_key: Some("super-secret".to_owned()),
                ..GeminiConfig::default()
            },
        };
        let summary = config.summary();
        assert!(summary.contains("Gemini: Enabled"));
        assert!(!summary.contains("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_default_gemini_config() {
        let gemini = GeminiConfig::default();
        assert!(!gemini.is_enabled());
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.timeout(), Duration::from_secs(60));
    }
}
