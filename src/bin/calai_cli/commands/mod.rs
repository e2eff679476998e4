// ABOUTME: Re-exports command modules for calai-cli
// ABOUTME: Profile, food logging, and insight commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

pub mod food;
pub mod insights;
pub mod profile;
