// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::time::Duration;

use bytes::Bytes;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::models::header::PduHeader;

/// How a socket operation ended when raced against its deadline and the
/// session's cancellation token. Timeouts are not errors here: on the read
/// path a timeout is the enquire-link trigger.
#[derive(Debug)]
pub(crate) enum IoOutcome<T> {
    Done(T),
    TimedOut,
    Cancelled,
}

pub(crate) async fn io_with_timeout<F, T>(
    label: &'static str,
    fut: F,
    io_timeout: Duration,
    cancel: &CancellationToken,
) -> std::io::Result<IoOutcome<T>>
where
    F: Future<Output = std::io::Result<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => {
            debug!("{label} cancelled");
            Ok(IoOutcome::Cancelled)
        },
        res = timeout(io_timeout, fut) => {
            match res {
                Ok(Ok(v)) => Ok(IoOutcome::Done(v)),
                Ok(Err(e)) => Err(e),
                Err(_) => {
                    debug!("{label} timed out after {io_timeout:?}");
                    Ok(IoOutcome::TimedOut)
                },
            }
        }
    }
}

/// One framed inbound PDU: the parsed fixed header plus the undecoded body.
/// Decoding happens on a processor worker, not on the reader.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub header: PduHeader,
    pub body: Bytes,
}

impl RawFrame {
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    #[inline]
    pub fn sequence_number(&self) -> u32 {
        self.header.sequence_number.get()
    }
}
