// ABOUTME: Core types and constants for the CalAI nutrition tracker
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

#![deny(unsafe_code)]

//! # CalAI Core
//!
//! Foundation crate providing shared types and constants for the CalAI
//! nutrition tracker. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Storage keys, aggregation windows, and reference values
//! - **models**: Food-log entries, profiles, goals, and collaborator shapes

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Domain data models
pub mod models;
