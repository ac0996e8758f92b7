// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

//! Per-state dispatch of inbound PDUs: what is legal in the current session
//! state, what gets a negative response, and what is dropped with a log line.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use tracing::{debug, warn};

use crate::{
    client::common::RawFrame,
    models::{
        command_id::CommandId,
        data::DataSmResp,
        deliver::DeliverSmResp,
        link::{EnquireLinkResp, GenericNack, UnbindResp},
        pdu::{Body, Pdu, PduBody},
        status::CommandStatus,
        submit::SubmitSmResp,
        submit_multi::SubmitMultiResp,
    },
    session::{
        listener::ProcessRequestError,
        pending::FailReason,
        session::SessionInner,
        state::SessionState,
    },
};

/// One row of the dispatch table.
enum Action {
    /// A response: resolve through the pending table, no state transition.
    Resolve,
    /// A request this state accepts; run its handler.
    Handle,
    /// A request this state forbids; answer ESME_RINVBNDSTS.
    Illegal,
    /// Nothing sensible to do; drop with a log line.
    IgnoreLog,
}

/// The per-state table. Responses resolve in any state; request legality
/// depends on where the session is in its lifecycle.
fn dispatch_row(state: SessionState, command: CommandId) -> Action {
    if command.is_response() {
        return Action::Resolve;
    }
    match state {
        // A client session in OPEN is waiting for its own bind response;
        // nothing the peer initiates is welcome yet.
        SessionState::Open | SessionState::Outbound => Action::Illegal,
        SessionState::BoundTx => match command {
            CommandId::EnquireLink | CommandId::Unbind => Action::Handle,
            CommandId::AlertNotification => Action::IgnoreLog,
            _ => Action::Illegal,
        },
        SessionState::BoundRx | SessionState::BoundTrx => match command {
            CommandId::EnquireLink
            | CommandId::Unbind
            | CommandId::DeliverSm
            | CommandId::DataSm
            | CommandId::AlertNotification => Action::Handle,
            _ => Action::Illegal,
        },
        SessionState::Unbound | SessionState::Closed => Action::IgnoreLog,
    }
}

/// Entry point for processor workers: one inbound frame, start to finish.
pub(crate) async fn process(inner: &Arc<SessionInner>, frame: RawFrame) {
    let raw_id = frame.header.command_id.get();
    let seq = frame.sequence_number();

    let Some(command) = CommandId::from_u32(raw_id) else {
        warn!(
            "session {}: unknown command_id {raw_id:#010x} (seq={seq}), sending generic_nack",
            inner.id()
        );
        inner
            .send_response_logged(Pdu::response(
                seq,
                CommandStatus::InvalidCommandId,
                GenericNack,
            ))
            .await;
        return;
    };

    let state = inner.state();
    match dispatch_row(state, command) {
        Action::Resolve => resolve_response(inner, command, frame).await,
        Action::Handle => handle_request(inner, command, frame).await,
        Action::Illegal => {
            debug!(
                "session {}: {command} (seq={seq}) illegal in {state}",
                inner.id()
            );
            inner
                .send_response_logged(negative_response(
                    command,
                    seq,
                    CommandStatus::InvalidBindStatus,
                ))
                .await;
        },
        Action::IgnoreLog => {
            debug!(
                "session {}: dropping {command} (seq={seq}) in {state}",
                inner.id()
            );
        },
    }
}

/// Responses resolve via the pending table; a stray one is logged and
/// discarded without touching the connection.
async fn resolve_response(inner: &Arc<SessionInner>, command: CommandId, frame: RawFrame) {
    let seq = frame.sequence_number();
    match Pdu::decode(command, &frame.header, frame.body) {
        Ok(pdu) => {
            if !inner.pending.complete(seq, pdu) {
                warn!(
                    "session {}: {command} with unknown seq={seq}, discarded",
                    inner.id()
                );
            }
        },
        Err(e) => {
            warn!(
                "session {}: undecodable {command} (seq={seq}): {e}",
                inner.id()
            );
            if !inner.pending.fail(seq, FailReason::Invalid(e.to_string())) {
                debug!("session {}: no waiter for broken seq={seq}", inner.id());
            }
        },
    }
}

async fn handle_request(inner: &Arc<SessionInner>, command: CommandId, frame: RawFrame) {
    let seq = frame.sequence_number();
    let pdu = match Pdu::decode(command, &frame.header, frame.body) {
        Ok(pdu) => pdu,
        Err(e) => {
            warn!(
                "session {}: undecodable {command} (seq={seq}): {e}",
                inner.id()
            );
            inner
                .send_response_logged(Pdu::response(
                    seq,
                    CommandStatus::SystemError,
                    GenericNack,
                ))
                .await;
            return;
        },
    };

    match pdu.body {
        PduBody::EnquireLink(_) => {
            inner
                .send_response_logged(Pdu::response(seq, CommandStatus::Ok, EnquireLinkResp))
                .await;
        },
        PduBody::Unbind(_) => {
            debug!("session {}: peer requested unbind (seq={seq})", inner.id());
            inner
                .send_response_logged(Pdu::response(seq, CommandStatus::Ok, UnbindResp))
                .await;
            inner.ctx.unbound().await;
            inner.close().await;
        },
        PduBody::DeliverSm(ref deliver) => {
            let status = match inner.receiver() {
                Some(listener) => {
                    let outcome = catch_unwind(AssertUnwindSafe(|| {
                        listener.on_accept_deliver_sm(deliver)
                    }));
                    listener_status(inner, "deliver_sm", outcome)
                },
                None => no_receiver(inner, "deliver_sm"),
            };
            inner
                .send_response_logged(Pdu::response(seq, status, DeliverSmResp::default()))
                .await;
        },
        PduBody::DataSm(ref data) => {
            let (status, body) = match inner.receiver() {
                Some(listener) => {
                    let outcome =
                        catch_unwind(AssertUnwindSafe(|| listener.on_accept_data_sm(data)));
                    match outcome {
                        Ok(Ok(resp)) => (CommandStatus::Ok, resp),
                        Ok(Err(e)) => {
                            warn!("session {}: data_sm refused: {e}", inner.id());
                            (e.status, DataSmResp::default())
                        },
                        Err(_) => {
                            warn!("session {}: data_sm listener panicked", inner.id());
                            (CommandStatus::ReceiverAppnError, DataSmResp::default())
                        },
                    }
                },
                None => (no_receiver(inner, "data_sm"), DataSmResp::default()),
            };
            inner
                .send_response_logged(Pdu::response(seq, status, body))
                .await;
        },
        PduBody::AlertNotification(ref alert) => {
            if let Some(listener) = inner.receiver() {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    listener.on_accept_alert_notification(alert)
                }));
                if outcome.is_err() {
                    warn!("session {}: alert_notification listener panicked", inner.id());
                }
            } else {
                debug!("session {}: alert_notification with no receiver", inner.id());
            }
        },
        ref other => {
            // dispatch_row only routes the five commands above here.
            warn!(
                "session {}: unexpected {} in handler",
                inner.id(),
                other.command_id()
            );
        },
    }
}

fn listener_status(
    inner: &Arc<SessionInner>,
    what: &'static str,
    outcome: std::thread::Result<Result<(), ProcessRequestError>>,
) -> CommandStatus {
    match outcome {
        Ok(Ok(())) => CommandStatus::Ok,
        Ok(Err(e)) => {
            warn!("session {}: {what} refused: {e}", inner.id());
            e.status
        },
        Err(_) => {
            warn!("session {}: {what} listener panicked", inner.id());
            CommandStatus::ReceiverAppnError
        },
    }
}

fn no_receiver(inner: &Arc<SessionInner>, what: &'static str) -> CommandStatus {
    warn!(
        "session {}: {what} received but no receiver listener registered",
        inner.id()
    );
    CommandStatus::ReceiverAppnError
}

/// The negative response matching a request: its proper `*_resp` where one
/// exists, generic_nack otherwise.
pub(crate) fn negative_response(
    command: CommandId,
    seq: u32,
    status: CommandStatus,
) -> Pdu {
    let body: PduBody = match command {
        CommandId::SubmitSm => SubmitSmResp::default().into(),
        CommandId::SubmitMulti => SubmitMultiResp::default().into(),
        CommandId::DeliverSm => DeliverSmResp::default().into(),
        CommandId::DataSm => DataSmResp::default().into(),
        CommandId::EnquireLink => EnquireLinkResp.into(),
        CommandId::Unbind => UnbindResp.into(),
        _ => GenericNack.into(),
    };
    Pdu::response(seq, status, body)
}
