// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::sync::atomic::{AtomicU32, Ordering};

use crate::session::pending::PendingTable;

const SEQ_MAX: u32 = 0x7FFF_FFFF;

/// Request sequence-number generator: 1..=0x7FFF_FFFF in increasing order,
/// skipping 0, wrapping back to 1.
#[derive(Debug, Default)]
pub struct Sequence {
    value: AtomicU32,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            value: AtomicU32::new(0),
        }
    }

    /// Next sequence number, unconditionally.
    pub fn next(&self) -> u32 {
        loop {
            let cur = self.value.load(Ordering::Relaxed);
            let next = if cur >= SEQ_MAX { 1 } else { cur + 1 };
            if self
                .value
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return next;
            }
        }
    }

    /// Next sequence number not colliding with a still-pending entry. A wrap
    /// landing on an outstanding value advances past it.
    pub fn next_free(&self, pending: &PendingTable) -> u32 {
        loop {
            let seq = self.next();
            if !pending.contains(seq) {
                return seq;
            }
        }
    }
}
