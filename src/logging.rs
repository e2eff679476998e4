// ABOUTME: Logging configuration and structured logging setup for the CalAI tracker
// ABOUTME: Configures log levels, formatters, and event helpers for log store, plans, and the AI collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! Structured logging configuration
//!
//! Logs go to stderr so that command output on stdout stays machine-readable.

use std::env;
use std::io;

use anyhow::Result;
use calai_core::constants::service_names;
use serde_json::json;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for interactive use
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Compact,
            include_location: false,
            include_thread: false,
            service_name: service_names::CALAI.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let level = env::var("RUST_LOG").unwrap_or(defaults.level);

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: defaults.service_version,
            environment,
        }
    }

    /// Filter with noise reduction for the HTTP stack applied on top of the level
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(&self.level)
            .add_directive(
                "hyper=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "hyper_util=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "reqwest=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "rustls=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location,
                "thread": self.include_thread
            }
        });

        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {}",
            config_summary
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Application-specific logging utilities
pub struct AppLogger;

impl AppLogger {
    /// Log a committed batch of log entries
    pub fn log_entries_appended(count: usize, batch_calories: f64, store_size: usize) {
        info!(
            log.appended = count,
            log.batch_kcal = batch_calories,
            log.size = store_size,
            "Food log entries appended"
        );
    }

    /// Log which source produced the active goals
    pub fn log_plan_resolved(source: &str, calories: f64, protein: f64) {
        info!(
            plan.source = %source,
            plan.calories = calories,
            plan.protein = protein,
            "Nutrition plan resolved"
        );
    }

    /// Log a call to the AI collaborator
    pub fn log_collaborator_call(operation: &str, success: bool, duration_ms: u64) {
        if success {
            info!(
                collaborator.operation = %operation,
                collaborator.success = success,
                collaborator.duration_ms = duration_ms,
                "AI collaborator call"
            );
        } else {
            error!(
                collaborator.operation = %operation,
                collaborator.success = success,
                collaborator.duration_ms = duration_ms,
                "AI collaborator call failed"
            );
        }
    }

    /// Log a persistence operation
    pub fn log_storage_operation(operation: &str, key: &str, success: bool) {
        if success {
            debug!(
                storage.operation = %operation,
                storage.key = %key,
                "Storage operation"
            );
        } else {
            warn!(
                storage.operation = %operation,
                storage.key = %key,
                "Storage operation failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_quiet_compact() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.level, "warn");
        assert_eq!(config.service_name, "calai");
    }

    #[test]
    fn test_env_filter_accepts_custom_level() {
        let config = LoggingConfig {
            level: "calai=debug".into(),
            ..LoggingConfig::default()
        };
        let filter = config.env_filter().to_string();
        assert!(filter.contains("calai=debug"));
        assert!(filter.contains("reqwest=warn"));
    }

    // Only test in this binary that installs the global subscriber
    #[test]
    fn test_pretty_format_installs_subscriber() {
        let config = LoggingConfig {
            format: LogFormat::Pretty,
            include_location: true,
            ..LoggingConfig::default()
        };
        assert!(config.init().is_ok());
        assert!(config.init().is_err());
    }
}
