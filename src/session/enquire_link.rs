// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{sync::Notify, time::timeout};
use tracing::{debug, warn};

use crate::{error::Error, session::session::SessionInner};

/// How long each wait slice lasts before the loop re-checks liveness.
const WAIT_SLICE: Duration = Duration::from_millis(500);

/// The "probe requested" flag with proper wait/notify semantics: the flag is
/// cleared under its lock before a probe is issued, so signals arriving while
/// one probe is outstanding coalesce into at most one follow-up.
#[derive(Debug, Default)]
pub(crate) struct ProbeSignal {
    requested: Mutex<bool>,
    notify: Notify,
}

impl ProbeSignal {
    /// Called by the reader on a socket read timeout.
    pub fn request(&self) {
        let mut flag = self.requested.lock().unwrap_or_else(|e| e.into_inner());
        *flag = true;
        drop(flag);
        self.notify.notify_one();
    }

    /// Waits up to `dur` for a signal. A pending notification returns
    /// immediately.
    pub async fn wait(&self, dur: Duration) -> bool {
        timeout(dur, self.notify.notified()).await.is_ok()
    }

    /// Takes the flag, clearing it under the lock.
    pub fn take(&self) -> bool {
        let mut flag = self.requested.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *flag)
    }
}

/// The keepalive driver: waits for probe requests from the reader and sends
/// enquire_link through the ordinary correlated request path.
pub(crate) async fn run(inner: Arc<SessionInner>) {
    loop {
        if inner.cancel.is_cancelled() || !inner.state().can_read() {
            break;
        }

        let signaled = inner.probe.wait(WAIT_SLICE).await;
        if inner.cancel.is_cancelled() {
            break;
        }
        if !signaled || !inner.probe.take() {
            continue;
        }
        if !inner.state().is_bound() {
            continue;
        }

        debug!("session {}: idle link, probing", inner.id());
        match inner.enquire_link().await {
            Ok(()) => {},
            Err(Error::ResponseTimeout(d)) => {
                warn!("session {}: enquire_link unanswered after {d:?}, closing", inner.id());
                inner.close().await;
                break;
            },
            Err(Error::Io(e)) => {
                warn!("session {}: enquire_link I/O failure: {e}, closing", inner.id());
                inner.close().await;
                break;
            },
            Err(Error::SessionClosed) => break,
            Err(e @ (Error::InvalidResponse(_) | Error::NegativeResponse(_))) => {
                warn!(
                    "session {}: enquire_link got invalid reply: {e}, unbinding",
                    inner.id()
                );
                inner.unbind_and_close().await;
                break;
            },
            Err(e) => {
                warn!("session {}: enquire_link failed: {e}", inner.id());
            },
        }
    }
    debug!("session {}: enquire-link sender exiting", inner.id());
}
