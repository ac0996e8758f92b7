//! This module handles configuration and logging.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

/// Configuration file parsing and management.
pub mod config;
/// Enumerations used in configuration and on the wire.
pub mod enums;
/// Logger initialization.
pub mod logger;
