// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use anyhow::Result;
use smpp_client_rs::cfg::logger::init_logger;

// One test owns the process-global subscriber; everything logger-related
// lives here so nothing else races the registration.
#[test]
fn test_init_logger_from_yaml() -> Result<()> {
    let guard = init_logger("tests/config_logger.yaml")?;
    tracing::debug!("logger initialized for the unit suite");

    // A second registration must fail cleanly rather than panic.
    assert!(init_logger("tests/config_logger.yaml").is_err());

    drop(guard);
    Ok(())
}

#[test]
fn test_missing_logger_config_is_an_error() {
    assert!(init_logger("tests/no_such_logger.yaml").is_err());
}
