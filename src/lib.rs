// ABOUTME: Main library entry point for the CalAI nutrition tracking engine
// ABOUTME: Wires configuration, logging, storage, the AI collaborator, and the tracker controller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

#![deny(unsafe_code)]

//! # CalAI
//!
//! A personal nutrition tracking engine. Food is logged from free text or a
//! photo through an AI collaborator, stored in an append-only log, and turned
//! into daily totals, goal progress, charts, and a plain-text digest.
//!
//! ## Architecture
//!
//! - **`calai_core`**: Domain models, error types, and constants
//! - **`calai_intelligence`**: Pure computation (plan calculator, aggregation, comparison)
//! - **Store**: Ordered log store and the persistence boundary
//! - **Advisor**: AI collaborator contract and its LLM-backed implementation
//! - **Tracker**: The controller that owns state and persists every mutation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use calai::config::{AppConfig, IntelligenceConfig};
//! use calai::store::FileRepository;
//! use calai::tracker::NutritionTracker;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let repository = Arc::new(FileRepository::new(&config.data_dir));
//!     let tracker = NutritionTracker::load(
//!         repository,
//!         None,
//!         IntelligenceConfig::global().plan.clone(),
//!     )
//!     .await?;
//!     println!("Onboarding required: {}", tracker.needs_onboarding());
//!     Ok(())
//! }
//! ```

/// AI collaborator contract and LLM-backed advisor
pub mod advisor;

/// Environment and plan calculator configuration
pub mod config;

/// Unified error handling
pub mod errors;

/// LLM provider abstraction and the Gemini provider
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Log store and persistence
pub mod store;

/// Application controller
pub mod tracker;
