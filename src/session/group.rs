// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    cfg::config::Config,
    error::Result,
    session::{
        listener::MessageReceiverListener, processor::ProcessorPool, session::Session,
    },
};

/// A set of sessions sharing one processor pool.
///
/// Sessions created through a group do not stop the pool when they close;
/// the group owns it and tears it down in [`SessionGroup::shutdown`]. The
/// per-session `PduProcessorDegree`/`QueueCapacity` settings are ignored for
/// group members — the pool here is sized once, up front.
pub struct SessionGroup {
    pool: Arc<ProcessorPool>,
    degree: usize,
}

impl SessionGroup {
    pub fn new(pdu_processor_degree: usize, queue_capacity: usize) -> Self {
        let degree = pdu_processor_degree.max(1);
        // Group pools serve sessions at every lifecycle stage, so they run
        // at full width from the start.
        let pool = ProcessorPool::new(degree, queue_capacity, degree);
        Self { pool, degree }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Tasks currently waiting for a worker across all member sessions.
    pub fn queued_tasks(&self) -> usize {
        self.pool.queued()
    }

    /// Opens a session on the shared pool; it still needs `bind()`.
    pub async fn connect(
        &self,
        cfg: Config,
        receiver: Option<Arc<dyn MessageReceiverListener>>,
    ) -> Result<Session> {
        Session::connect_with_pool(cfg, receiver, Some(Arc::clone(&self.pool))).await
    }

    /// Connect-and-bind convenience on the shared pool.
    pub async fn connect_and_bind(
        &self,
        cfg: Config,
        receiver: Option<Arc<dyn MessageReceiverListener>>,
    ) -> Result<(Session, String)> {
        let session = self.connect(cfg, receiver).await?;
        match session.bind().await {
            Ok(system_id) => Ok((session, system_id)),
            Err(e) => {
                session.close().await;
                Err(e)
            },
        }
    }

    /// Stops the shared pool: intake closes immediately, queued work gets
    /// `1000ms + single_task_timeout * queued / degree` to drain, stragglers
    /// are aborted. Close the member sessions first.
    pub async fn shutdown(&self, single_task_timeout: Duration) {
        info!("session group: shutting down shared processor pool");
        self.pool.shutdown_with_grace(single_task_timeout).await;
    }
}

impl std::fmt::Debug for SessionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGroup")
            .field("degree", &self.degree)
            .finish_non_exhaustive()
    }
}
