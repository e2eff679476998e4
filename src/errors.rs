// ABOUTME: Unified error handling for the application crate
// ABOUTME: Re-exports AppError, ErrorCode, and AppResult from calai-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

pub use calai_core::errors::*;
