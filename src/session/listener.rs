// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use core::fmt;

use crate::{
    models::{
        alert::AlertNotification,
        data::{DataSm, DataSmResp},
        deliver::DeliverSm,
        status::CommandStatus,
    },
    session::state::SessionState,
};

/// Observer of session state transitions.
///
/// Listeners are invoked on a snapshot outside the transition lock, so a
/// listener may call back into the session (including `close`). A panicking
/// listener is logged and skipped; it neither aborts the transition nor
/// starves the other listeners.
pub trait SessionStateListener: Send + Sync {
    fn on_state_change(&self, new: SessionState, old: SessionState, session_id: &str);
}

/// A refusal from a [`MessageReceiverListener`], carrying the command_status
/// to put on the negative response.
#[derive(Debug)]
pub struct ProcessRequestError {
    pub status: CommandStatus,
    pub message: String,
}

impl ProcessRequestError {
    pub fn new(status: CommandStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The generic "receiver application error" refusal.
    pub fn appn(message: impl Into<String>) -> Self {
        Self::new(CommandStatus::ReceiverAppnError, message)
    }
}

impl fmt::Display for ProcessRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ProcessRequestError {}

/// Application callbacks for SMSC-initiated PDUs, invoked on processor-pool
/// workers. Returning an error (or panicking) turns into a negative response
/// on the wire; the defaults refuse everything with ESME_RX_T_APPN.
pub trait MessageReceiverListener: Send + Sync {
    fn on_accept_deliver_sm(
        &self,
        deliver_sm: &DeliverSm,
    ) -> Result<(), ProcessRequestError> {
        let _ = deliver_sm;
        Err(ProcessRequestError::appn("deliver_sm not handled"))
    }

    fn on_accept_data_sm(
        &self,
        data_sm: &DataSm,
    ) -> Result<DataSmResp, ProcessRequestError> {
        let _ = data_sm;
        Err(ProcessRequestError::appn("data_sm not handled"))
    }

    fn on_accept_alert_notification(&self, alert: &AlertNotification) {
        let _ = alert;
    }
}
