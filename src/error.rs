// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::time::Duration;

use thiserror::Error;

use crate::{models::status::CommandStatus, session::state::SessionState};

/// Errors surfaced by the session engine.
///
/// Request failures are returned to the direct caller; background failures
/// (reader, keepalive) are logged and close or unbind-and-close the session.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation invoked while the session is in a state forbidding it.
    #[error("operation not allowed in session state {0}")]
    IllegalState(SessionState),

    /// A user-supplied field violates SMPP string-length rules. Raised while
    /// building the request, before any I/O.
    #[error("PDU encoding: {0}")]
    PduEncoding(String),

    /// Socket read/write failure. Always closes the session.
    #[error("I/O failure")]
    Io(#[from] std::io::Error),

    /// No response arrived within the transaction timer. The pending entry is
    /// removed; the session stays open unless raised by the keepalive.
    #[error("no response within {0:?}")]
    ResponseTimeout(Duration),

    /// A received response body cannot be decoded, or fails a consistency
    /// check (e.g. query_sm_resp carrying a different message_id).
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Well-formed response with a non-zero command_status.
    #[error("negative response: {0}")]
    NegativeResponse(CommandStatus),

    /// Processor queue overflowed for a peer request; the peer was throttled.
    #[error("processor queue full")]
    QueueMax,

    /// The session closed while the operation was outstanding.
    #[error("session closed")]
    SessionClosed,

    /// A sequence number was inserted twice into the pending table. This is a
    /// caller bug, not a peer condition.
    #[error("sequence number {0} already pending")]
    DuplicateSequence(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// True for failures that leave the session usable (the caller may retry
    /// the request on the same bound session).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ResponseTimeout(_)
                | Error::NegativeResponse(_)
                | Error::PduEncoding(_)
                | Error::QueueMax
        )
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Error::PduEncoding(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidResponse(msg.into())
    }
}
