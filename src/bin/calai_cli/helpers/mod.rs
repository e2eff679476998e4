// ABOUTME: Helper modules for calai-cli
// ABOUTME: Terminal output formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

pub mod display;
