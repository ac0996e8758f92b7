// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::fmt::Write;

use rand::RngExt;

/// Generates a random session identity (4 bytes) and returns:
/// - `[u8; 4]` raw bytes
/// - `String` containing its hexadecimal representation (no prefix)
///
/// The identity is used only for logging and task naming; it never goes on
/// the wire.
pub fn generate_session_id() -> ([u8; 4], String) {
    let mut id = [0u8; 4];
    rand::rng().fill(&mut id);

    let mut hex = String::with_capacity(8);
    for byte in &id {
        write!(&mut hex, "{byte:02x}").expect("Writing to String cannot fail");
    }

    (id, hex)
}
