// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{
    sync::{
        Arc, Mutex as StdMutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::{Instant, timeout},
};
use tracing::{debug, warn};

use crate::{
    client::common::RawFrame,
    error::{Error, Result},
    session::{dispatch, session::SessionInner},
};

/// Responses must never be dropped; this bounds how long we are willing to
/// wait for a queue slot before declaring the pool wedged.
const RESPONSE_ENQUEUE_TIMEOUT: Duration = Duration::from_secs(60);

/// One queued unit of inbound-PDU work.
pub(crate) struct ProcessTask {
    pub session: Arc<SessionInner>,
    pub frame: RawFrame,
}

/// How `submit` disposed of a task.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Enqueued {
    Queued,
    /// The queue was full and the task carried a peer request; the caller
    /// owes the peer an ESME_RTHROTTLED response.
    Throttled,
}

/// Bounded worker pool for inbound PDU processing.
///
/// The queue is a bounded mpsc channel; workers share the receiver behind an
/// async mutex, holding it only while idle-waiting. Backpressure is
/// asymmetric: responses block for a slot (dropping one would leak a pending
/// entry), peer requests are rejected when the queue is full.
pub struct ProcessorPool {
    tx: StdMutex<Option<mpsc::Sender<ProcessTask>>>,
    rx: Arc<Mutex<mpsc::Receiver<ProcessTask>>>,
    degree: usize,
    spawned: AtomicUsize,
    workers: StdMutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for ProcessorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorPool")
            .field("degree", &self.degree)
            .field("spawned", &self.spawned.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ProcessorPool {
    /// Creates the pool with `initial_workers` running (bind-time resizing
    /// brings a per-session pool up to `degree`; group pools start full).
    pub fn new(degree: usize, capacity: usize, initial_workers: usize) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let pool = Arc::new(Self {
            tx: StdMutex::new(Some(tx)),
            rx: Arc::new(Mutex::new(rx)),
            degree: degree.max(1),
            spawned: AtomicUsize::new(0),
            workers: StdMutex::new(Vec::new()),
        });
        pool.spawn_workers(initial_workers.clamp(1, pool.degree));
        pool
    }

    /// Brings the worker count up to the configured degree. Idempotent.
    pub fn activate(&self) {
        self.spawn_workers(self.degree);
    }

    fn spawn_workers(&self, target: usize) {
        let mut workers = self
            .workers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        while self.spawned.load(Ordering::Relaxed) < target {
            self.spawned.fetch_add(1, Ordering::Relaxed);
            let rx = Arc::clone(&self.rx);
            workers.push(tokio::spawn(worker_loop(rx)));
        }
    }

    /// Enqueues a task, applying the response/request asymmetry.
    pub(crate) async fn submit(&self, task: ProcessTask) -> Result<Enqueued> {
        let tx = {
            let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };
        let Some(tx) = tx else {
            return Err(Error::SessionClosed);
        };

        if task.frame.is_response() {
            match timeout(RESPONSE_ENQUEUE_TIMEOUT, tx.send(task)).await {
                Ok(Ok(())) => Ok(Enqueued::Queued),
                Ok(Err(_)) => Err(Error::SessionClosed),
                Err(_) => {
                    warn!("processor queue wedged: response not accepted in {RESPONSE_ENQUEUE_TIMEOUT:?}");
                    Err(Error::QueueMax)
                },
            }
        } else {
            match tx.try_send(task) {
                Ok(()) => Ok(Enqueued::Queued),
                Err(mpsc::error::TrySendError::Full(_)) => Ok(Enqueued::Throttled),
                Err(mpsc::error::TrySendError::Closed(_)) => Err(Error::SessionClosed),
            }
        }
    }

    /// Tasks currently waiting for a worker.
    pub fn queued(&self) -> usize {
        let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0)
    }

    /// Stops accepting new tasks; workers drain what is queued and exit.
    pub fn close_intake(&self) {
        let mut guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        guard.take();
    }

    /// Group shutdown: closes intake, then grants
    /// `1000ms + single_task_timeout * queued / degree` for the drain before
    /// aborting what is left.
    pub async fn shutdown_with_grace(&self, single_task_timeout: Duration) {
        let queued = self.queued() as u32;
        let grace = Duration::from_millis(1000)
            + single_task_timeout * queued / self.degree as u32;
        self.close_intake();

        let handles: Vec<JoinHandle<()>> = {
            let mut guard = self.workers.lock().unwrap_or_else(|e| e.into_inner());
            guard.drain(..).collect()
        };

        let deadline = Instant::now() + grace;
        for mut handle in handles {
            let left = deadline.saturating_duration_since(Instant::now());
            if timeout(left, &mut handle).await.is_err() {
                warn!("processor worker did not drain within {grace:?}, aborting");
                handle.abort();
            }
        }
    }
}

async fn worker_loop(rx: Arc<Mutex<mpsc::Receiver<ProcessTask>>>) {
    loop {
        // The receiver lock is held only while idle; processing below runs
        // with the lock released so up to `degree` tasks overlap.
        let task = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };
        let Some(task) = task else {
            debug!("processor intake closed, worker exiting");
            break;
        };
        dispatch::process(&task.session, task.frame).await;
    }
}
