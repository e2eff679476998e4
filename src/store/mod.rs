// ABOUTME: Food-log storage and the persistence boundary for logs, profile, and goals
// ABOUTME: In-memory ordered LogStore plus pluggable file and memory repositories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

/// Ordered, id-keyed collection of log entries
pub mod log_store;
/// Snapshot repositories
pub mod persistence;

pub use log_store::LogStore;
pub use persistence::{FileRepository, MemoryRepository, StateRepository};
