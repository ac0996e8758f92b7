// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    client::common::{IoOutcome, RawFrame},
    models::{
        command_id::CommandId,
        header::{HEADER_LEN, PduHeader},
        link::GenericNack,
        pdu::Pdu,
        status::CommandStatus,
    },
    session::{
        dispatch::negative_response,
        processor::{Enqueued, ProcessTask},
        session::SessionInner,
    },
};

/// The single reader loop: frames inbound PDUs off the socket and hands them
/// to the processor pool. A header-read timeout is not an error — it is the
/// idle signal that drives the enquire-link sender.
pub(crate) async fn run(inner: Arc<SessionInner>) {
    let read_timeout = inner.cfg.runtime.enquire_link_timer;
    let mut header_buf = [0u8; HEADER_LEN];

    loop {
        if inner.cancel.is_cancelled() || !inner.state().can_read() {
            break;
        }

        match inner.conn.read_exact(&mut header_buf, read_timeout).await {
            Ok(IoOutcome::Done(())) => {},
            Ok(IoOutcome::TimedOut) => {
                inner.notify_no_activity();
                continue;
            },
            Ok(IoOutcome::Cancelled) => break,
            Err(e) => {
                if !inner.is_closed() {
                    warn!("session {}: socket read failed: {e}", inner.id());
                    inner.close().await;
                }
                break;
            },
        }

        let header = PduHeader::from_bytes(&header_buf);
        let seq = header.sequence_number.get();

        let body_len = match header.body_len() {
            Ok(n) => n,
            Err(e) => {
                warn!("session {}: unframeable PDU: {e}", inner.id());
                inner
                    .send_response_logged(Pdu::response(
                        seq,
                        CommandStatus::InvalidCommandLength,
                        GenericNack,
                    ))
                    .await;
                inner.unbind_and_close().await;
                break;
            },
        };

        let mut body = vec![0u8; body_len];
        if body_len > 0 {
            match inner.conn.read_exact(&mut body, read_timeout).await {
                Ok(IoOutcome::Done(())) => {},
                Ok(IoOutcome::TimedOut) => {
                    warn!(
                        "session {}: peer stalled mid-PDU ({body_len} body octets)",
                        inner.id()
                    );
                    inner.close().await;
                    break;
                },
                Ok(IoOutcome::Cancelled) => break,
                Err(e) => {
                    if !inner.is_closed() {
                        warn!("session {}: socket read failed: {e}", inner.id());
                        inner.close().await;
                    }
                    break;
                },
            }
        }

        // Every fully framed inbound PDU refreshes the idle clock, stray
        // responses included.
        inner.notify_activity();

        let frame = RawFrame {
            header,
            body: Bytes::from(body),
        };
        let task = ProcessTask {
            session: Arc::clone(&inner),
            frame,
        };

        match inner.pool_submit(task).await {
            Ok(Enqueued::Queued) => {},
            Ok(Enqueued::Throttled) => {
                warn!(
                    "session {}: processor queue full, throttling peer (seq={seq})",
                    inner.id()
                );
                let nack = match CommandId::from_u32(header.command_id.get()) {
                    Some(command) => negative_response(command, seq, CommandStatus::Throttled),
                    None => Pdu::response(seq, CommandStatus::Throttled, GenericNack),
                };
                inner.send_response_logged(nack).await;
            },
            Err(e) => {
                warn!("session {}: processor rejected task: {e}", inner.id());
                inner.close().await;
                break;
            },
        }
    }

    debug!("session {}: reader exiting", inner.id());
    inner.on_reader_exit().await;
}
