// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::time::Duration;

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::{sync::oneshot, time::timeout};
use tracing::debug;

use crate::{
    error::{Error, Result},
    models::pdu::Pdu,
};

/// Why a pending entry was failed instead of completed.
#[derive(Debug)]
pub enum FailReason {
    /// The session closed underneath the waiter.
    Closed,
    /// A response arrived for this sequence number but could not be decoded.
    Invalid(String),
}

impl FailReason {
    fn into_error(self) -> Error {
        match self {
            FailReason::Closed => Error::SessionClosed,
            FailReason::Invalid(msg) => Error::InvalidResponse(msg),
        }
    }
}

#[derive(Debug)]
enum Completion {
    Response(Box<Pdu>),
    Failed(FailReason),
}

/// Ticket for one outstanding request; redeemed with [`PendingTable::wait`].
#[derive(Debug)]
pub struct PendingHandle {
    seq: u32,
    rx: oneshot::Receiver<Completion>,
}

impl PendingHandle {
    #[inline]
    pub fn sequence_number(&self) -> u32 {
        self.seq
    }
}

/// Correlates outstanding sequence numbers with their awaiting callers.
///
/// Each entry completes exactly once: `complete`, `fail` and the waiter's own
/// timeout all remove the entry before signalling, so late arrivals find
/// nothing and are dropped by the caller with a log line.
#[derive(Debug, Default)]
pub struct PendingTable {
    entries: DashMap<u32, oneshot::Sender<Completion>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Reserves the slot for `seq`. Two live entries for one sequence number
    /// indicate a caller bug, not a peer condition.
    pub fn insert(&self, seq: u32) -> Result<PendingHandle> {
        let (tx, rx) = oneshot::channel();
        match self.entries.entry(seq) {
            Entry::Occupied(_) => Err(Error::DuplicateSequence(seq)),
            Entry::Vacant(slot) => {
                slot.insert(tx);
                Ok(PendingHandle { seq, rx })
            },
        }
    }

    /// Hands `pdu` to the waiter for `seq`. Returns false when the sequence
    /// number is unknown (already timed out, drained, or never ours).
    pub fn complete(&self, seq: u32, pdu: Pdu) -> bool {
        let Some((_, tx)) = self.entries.remove(&seq) else {
            return false;
        };
        if tx.send(Completion::Response(Box::new(pdu))).is_err() {
            debug!("seq={seq}: waiter left before completion");
        }
        true
    }

    /// Fails the waiter for `seq` with `reason`.
    pub fn fail(&self, seq: u32, reason: FailReason) -> bool {
        let Some((_, tx)) = self.entries.remove(&seq) else {
            return false;
        };
        if tx.send(Completion::Failed(reason)).is_err() {
            debug!("seq={seq}: waiter left before failure delivery");
        }
        true
    }

    /// Drops the entry without signalling (the waiter itself is leaving).
    pub fn remove(&self, seq: u32) {
        self.entries.remove(&seq);
    }

    #[inline]
    pub fn contains(&self, seq: u32) -> bool {
        self.entries.contains_key(&seq)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails every outstanding waiter. Used on close; new inserts racing this
    /// drain fail on their own when the closed session refuses the write.
    pub fn drain_all(&self) {
        let seqs: Vec<u32> = self.entries.iter().map(|e| *e.key()).collect();
        for seq in seqs {
            self.fail(seq, FailReason::Closed);
        }
    }

    /// Blocks the caller until the entry completes or `deadline` elapses.
    /// On timeout the entry is removed before returning.
    pub async fn wait(&self, handle: PendingHandle, deadline: Duration) -> Result<Pdu> {
        let seq = handle.seq;
        match timeout(deadline, handle.rx).await {
            Err(_) => {
                self.remove(seq);
                Err(Error::ResponseTimeout(deadline))
            },
            Ok(Err(_)) => Err(Error::SessionClosed),
            Ok(Ok(Completion::Response(pdu))) => Ok(*pdu),
            Ok(Ok(Completion::Failed(reason))) => Err(reason.into_error()),
        }
    }
}
