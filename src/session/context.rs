// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc, RwLock,
        atomic::{AtomicU8, AtomicU64, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use tokio::{sync::Mutex, time::timeout};
use tracing::{debug, warn};

use crate::{
    cfg::enums::BindType,
    session::{listener::SessionStateListener, state::SessionState},
};

/// Owns the session state variable, the last-activity clock and the state
/// listener list.
///
/// Transitions are serialized by one async mutex; reads of the state and the
/// activity clock are lock-free atomics, so the reader and keepalive never
/// contend with a transition in progress.
pub struct SessionContext {
    session_id: String,
    state: AtomicU8,
    last_activity_ms: AtomicU64,
    transition: Mutex<()>,
    listeners: RwLock<Vec<Arc<dyn SessionStateListener>>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(session_id: String) -> Self {
        let ctx = Self {
            session_id,
            state: AtomicU8::new(SessionState::Closed.as_u8()),
            last_activity_ms: AtomicU64::new(0),
            transition: Mutex::new(()),
            listeners: RwLock::new(Vec::new()),
        };
        ctx.notify_activity();
        ctx
    }

    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Stamps the activity clock (milliseconds since the epoch) without
    /// locking.
    pub fn notify_activity(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_activity_ms.store(now, Ordering::Relaxed);
    }

    #[inline]
    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms.load(Ordering::Relaxed)
    }

    pub fn add_listener(&self, listener: Arc<dyn SessionStateListener>) {
        let mut guard = self
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner());
        guard.push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn SessionStateListener>) {
        let mut guard = self
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner());
        guard.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub async fn open(&self) -> bool {
        self.transition(SessionState::Open).await
    }

    pub async fn bound(&self, bind_type: BindType) -> bool {
        self.transition(SessionState::bound_for(bind_type)).await
    }

    pub async fn unbound(&self) -> bool {
        self.transition(SessionState::Unbound).await
    }

    pub async fn close(&self) -> bool {
        self.transition(SessionState::Closed).await
    }

    /// Blocking transition: waits for the transition mutex.
    pub async fn transition(&self, new: SessionState) -> bool {
        let _guard = self.transition.lock().await;
        self.apply(new)
    }

    /// Bounded-wait transition. When the mutex cannot be acquired in time —
    /// a listener may be calling back into the session — a move to CLOSED
    /// degrades to a bare state store without listener notification, so the
    /// terminal state always sticks; any other target returns false.
    pub async fn transition_within(&self, new: SessionState, wait: Duration) -> bool {
        match timeout(wait, self.transition.lock()).await {
            Ok(_guard) => self.apply(new),
            Err(_) if new == SessionState::Closed => {
                warn!(
                    "session {}: transition lock busy, forcing CLOSED without listeners",
                    self.session_id
                );
                self.state.store(new.as_u8(), Ordering::Release);
                false
            },
            Err(_) => {
                warn!(
                    "session {}: transition to {new} timed out acquiring the lock",
                    self.session_id
                );
                false
            },
        }
    }

    /// Performs the state change under the (held) transition lock and fans
    /// out to listeners on a snapshot.
    fn apply(&self, new: SessionState) -> bool {
        let old = self.state();
        if old == new {
            return true;
        }
        if old == SessionState::Closed {
            debug!("session {}: ignoring {old} -> {new}, CLOSED is terminal", self.session_id);
            return false;
        }
        if !old.can_transition_to(new) {
            warn!("session {}: illegal transition {old} -> {new}", self.session_id);
            return false;
        }

        self.state.store(new.as_u8(), Ordering::Release);
        debug!("session {}: {old} -> {new}", self.session_id);

        let snapshot: Vec<Arc<dyn SessionStateListener>> = {
            let guard = self
                .listeners
                .read()
                .unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };
        for listener in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                listener.on_state_change(new, old, &self.session_id)
            }));
            if outcome.is_err() {
                warn!(
                    "session {}: state listener panicked on {old} -> {new}, skipped",
                    self.session_id
                );
            }
        }
        true
    }
}
