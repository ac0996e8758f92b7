// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    cfg::config::Config,
    client::connection::Connection,
    error::{Error, Result},
    models::{
        bind::BindRequest,
        cancel::CancelSm,
        data::{DataSm, DataSmResp},
        link::{EnquireLink, Unbind},
        pdu::{Body, Pdu, PduBody},
        query::{QuerySm, QuerySmResp},
        replace::ReplaceSm,
        submit::{SubmitSm, SubmitSmResp},
        submit_multi::{SubmitMulti, SubmitMultiResp},
    },
    session::{
        context::SessionContext,
        enquire_link::{self, ProbeSignal},
        listener::{MessageReceiverListener, SessionStateListener},
        pending::PendingTable,
        processor::{Enqueued, ProcessTask, ProcessorPool},
        reader,
        sequence::Sequence,
        state::SessionState,
    },
    utils::generate_session_id,
};
use tokio_util::sync::CancellationToken;

/// Which processor pool a session runs on, and whether it owns it.
pub(crate) struct PoolHandle {
    pool: Arc<ProcessorPool>,
    owned: bool,
}

impl PoolHandle {
    fn owned(pool: Arc<ProcessorPool>) -> Self {
        Self { pool, owned: true }
    }

    fn shared(pool: Arc<ProcessorPool>) -> Self {
        Self { pool, owned: false }
    }

    /// Bind-time resize to the configured degree. Shared pools are already
    /// fully active and stay untouched.
    fn activate(&self) {
        if self.owned {
            self.pool.activate();
        }
    }

    fn close_if_owned(&self) {
        if self.owned {
            self.pool.close_intake();
        }
    }

    async fn submit(&self, task: ProcessTask) -> Result<Enqueued> {
        self.pool.submit(task).await
    }
}

/// Everything the background tasks and the façade share. Held in an `Arc`;
/// the reader, the keepalive sender and every pool task keep it alive until
/// the session is fully torn down.
pub(crate) struct SessionInner {
    pub(crate) cfg: Config,
    pub(crate) conn: Connection,
    pub(crate) sequence: Sequence,
    pub(crate) pending: PendingTable,
    pub(crate) ctx: SessionContext,
    pub(crate) probe: ProbeSignal,
    pub(crate) cancel: CancellationToken,
    pool: PoolHandle,
    receiver: Option<Arc<dyn MessageReceiverListener>>,
    closed: AtomicBool,
    enquire_task: OnceCell<JoinHandle<()>>,
}

impl SessionInner {
    #[inline]
    pub(crate) fn id(&self) -> &str {
        self.ctx.session_id()
    }

    #[inline]
    pub(crate) fn state(&self) -> SessionState {
        self.ctx.state()
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn receiver(&self) -> Option<Arc<dyn MessageReceiverListener>> {
        self.receiver.clone()
    }

    pub(crate) fn notify_activity(&self) {
        self.ctx.notify_activity();
    }

    /// Reader-side idle signal: ask the keepalive sender for a probe when
    /// bound.
    pub(crate) fn notify_no_activity(&self) {
        if self.state().is_bound() {
            self.probe.request();
        }
    }

    pub(crate) async fn pool_submit(&self, task: ProcessTask) -> Result<Enqueued> {
        self.pool.submit(task).await
    }

    /// The shared request skeleton: sequence, pending slot, serialized write,
    /// correlated await. A failed write removes the slot and closes the
    /// session before surfacing the I/O error.
    pub(crate) async fn send_request(&self, body: PduBody) -> Result<Pdu> {
        let deadline = self.cfg.runtime.transaction_timer;
        let seq = self.sequence.next_free(&self.pending);
        let pdu = Pdu::request(seq, body);
        debug!("session {}: SEND {} seq={seq}", self.id(), pdu.command_id());
        let frame = pdu.encode()?;
        let handle = self.pending.insert(seq)?;
        if let Err(e) = self.conn.write_frame(&frame).await {
            self.pending.remove(seq);
            self.close().await;
            return Err(e);
        }
        self.pending.wait(handle, deadline).await
    }

    /// `send_request` plus the command_status check.
    pub(crate) async fn request_ok(&self, body: PduBody) -> Result<Pdu> {
        let pdu = self.send_request(body).await?;
        if !pdu.command_status.is_ok() {
            return Err(Error::NegativeResponse(pdu.command_status));
        }
        Ok(pdu)
    }

    /// The keepalive variant of the skeleton: a failed write is logged and
    /// tolerated, leaving the pending entry to its deadline. Persistent
    /// trouble then surfaces as a response timeout.
    pub(crate) async fn enquire_link(&self) -> Result<()> {
        let deadline = self.cfg.runtime.transaction_timer;
        let seq = self.sequence.next_free(&self.pending);
        let pdu = Pdu::request(seq, EnquireLink);
        let frame = pdu.encode()?;
        let handle = self.pending.insert(seq)?;
        if let Err(e) = self.conn.write_frame(&frame).await {
            warn!("session {}: enquire_link write failed: {e}", self.id());
        }
        let resp = self.pending.wait(handle, deadline).await?;
        if !resp.command_status.is_ok() {
            return Err(Error::NegativeResponse(resp.command_status));
        }
        Ok(())
    }

    pub(crate) async fn send_response(&self, pdu: Pdu) -> Result<()> {
        debug!(
            "session {}: SEND {} seq={} status={}",
            self.id(),
            pdu.command_id(),
            pdu.sequence_number,
            pdu.command_status
        );
        let frame = pdu.encode()?;
        self.conn.write_frame(&frame).await
    }

    /// Response write whose failure only warrants a log line (the peer may
    /// have hung up already).
    pub(crate) async fn send_response_logged(&self, pdu: Pdu) {
        let command = pdu.command_id();
        if let Err(e) = self.send_response(pdu).await
            && !self.is_closed()
        {
            warn!("session {}: failed to send {command}: {e}", self.id());
        }
    }

    /// Idempotent teardown: cancel background work, shut the socket, force
    /// CLOSED with a bounded wait, drain all waiters, stop an owned pool.
    pub(crate) async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("session {}: closing", self.id());
        self.cancel.cancel();

        // Stop the keepalive task promptly, unless close() is running on it.
        if let Some(handle) = self.enquire_task.get() {
            let on_keepalive =
                tokio::task::try_id().is_some_and(|current| current == handle.id());
            if !on_keepalive {
                handle.abort();
            }
        }

        self.conn.shutdown().await;
        let wait = self.cfg.runtime.transaction_timer;
        self.ctx
            .transition_within(SessionState::Closed, wait)
            .await;
        self.pending.drain_all();
        self.pool.close_if_owned();
    }

    /// Best-effort graceful shutdown: unbind bounded by the transaction
    /// timer, then close regardless of how the unbind went.
    pub(crate) async fn unbind_and_close(&self) {
        if self.state().is_bound() {
            match self.request_ok(Unbind.into()).await {
                Ok(_) => {
                    self.ctx.unbound().await;
                },
                Err(e) => warn!("session {}: graceful unbind failed: {e}", self.id()),
            }
        }
        self.close().await;
    }

    /// A session without its reader cannot make progress; make sure teardown
    /// runs no matter why the loop ended.
    pub(crate) async fn on_reader_exit(&self) {
        self.close().await;
    }
}

/// An ESME client session: one connection, one reader, one keepalive sender,
/// and the request API.
///
/// All methods take `&self`; the session is freely shareable across tasks.
/// Dropping the last clone does not close the connection — call
/// [`Session::close`] or [`Session::unbind_and_close`].
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Opens the TCP connection (CLOSED → OPEN) and starts the background
    /// tasks. The session still needs [`Session::bind`].
    pub async fn connect(
        cfg: Config,
        receiver: Option<Arc<dyn MessageReceiverListener>>,
    ) -> Result<Self> {
        Self::connect_with_pool(cfg, receiver, None).await
    }

    pub(crate) async fn connect_with_pool(
        cfg: Config,
        receiver: Option<Arc<dyn MessageReceiverListener>>,
        shared_pool: Option<Arc<ProcessorPool>>,
    ) -> Result<Self> {
        let (_, session_id) = generate_session_id();
        let cancel = CancellationToken::new();
        let conn = Connection::connect(
            &cfg.runtime.target_address,
            cfg.runtime.connect_timeout,
            cfg.runtime.connect_timeout,
            cancel.clone(),
        )
        .await?;

        let pool = match shared_pool {
            Some(pool) => PoolHandle::shared(pool),
            // Serial processing until bind completes; activate() widens it.
            None => PoolHandle::owned(ProcessorPool::new(
                cfg.runtime.pdu_processor_degree,
                cfg.runtime.queue_capacity,
                1,
            )),
        };

        let inner = Arc::new(SessionInner {
            cfg,
            conn,
            sequence: Sequence::new(),
            pending: PendingTable::new(),
            ctx: SessionContext::new(session_id),
            probe: ProbeSignal::default(),
            cancel,
            pool,
            receiver,
            closed: AtomicBool::new(false),
            enquire_task: OnceCell::new(),
        });

        inner.ctx.open().await;
        tokio::spawn(reader::run(Arc::clone(&inner)));
        let keepalive = tokio::spawn(enquire_link::run(Arc::clone(&inner)));
        let _ = inner.enquire_task.set(keepalive);

        info!(
            "session {}: open, {} -> {}",
            inner.id(),
            inner.conn.local_port(),
            inner.conn.remote_address()
        );
        Ok(Session { inner })
    }

    /// Connect and bind in one step. Any bind failure closes the connection
    /// before the error is returned.
    pub async fn connect_and_bind(
        cfg: Config,
        receiver: Option<Arc<dyn MessageReceiverListener>>,
    ) -> Result<(Self, String)> {
        let session = Self::connect(cfg, receiver).await?;
        match session.bind().await {
            Ok(system_id) => Ok((session, system_id)),
            Err(e) => {
                session.close().await;
                Err(e)
            },
        }
    }

    /// Issues the configured bind request (OPEN → BOUND_*). Returns the
    /// SMSC's system_id.
    pub async fn bind(&self) -> Result<String> {
        let state = self.inner.state();
        if state != SessionState::Open {
            return Err(Error::IllegalState(state));
        }
        let request = BindRequest::from_config(&self.inner.cfg.bind);
        let bind_type = request.bind_type;
        match self.inner.request_ok(request.into()).await {
            Ok(pdu) => match pdu.body {
                PduBody::BindResp(resp) => {
                    self.inner.ctx.bound(bind_type).await;
                    self.inner.pool.activate();
                    info!(
                        "session {}: bound as {bind_type} to \"{}\"",
                        self.inner.id(),
                        resp.system_id
                    );
                    Ok(resp.system_id)
                },
                other => {
                    self.inner.close().await;
                    Err(Error::invalid(format!(
                        "expected a bind response, got {}",
                        other.command_id()
                    )))
                },
            },
            Err(e) => {
                self.inner.close().await;
                Err(e)
            },
        }
    }

    /// Submits one short message; returns the SMSC-assigned message id.
    pub async fn submit_sm(&self, submit: SubmitSm) -> Result<SubmitSmResp> {
        self.ensure_transmittable()?;
        let pdu = self.inner.request_ok(submit.into()).await?;
        match pdu.body {
            PduBody::SubmitSmResp(resp) => Ok(resp),
            other => Err(unexpected("submit_sm_resp", &other)),
        }
    }

    pub async fn submit_multi(&self, submit: SubmitMulti) -> Result<SubmitMultiResp> {
        self.ensure_transmittable()?;
        let pdu = self.inner.request_ok(submit.into()).await?;
        match pdu.body {
            PduBody::SubmitMultiResp(resp) => Ok(resp),
            other => Err(unexpected("submit_multi_resp", &other)),
        }
    }

    pub async fn data_sm(&self, data: DataSm) -> Result<DataSmResp> {
        self.ensure_transmittable()?;
        let pdu = self.inner.request_ok(data.into()).await?;
        match pdu.body {
            PduBody::DataSmResp(resp) => Ok(resp),
            other => Err(unexpected("data_sm_resp", &other)),
        }
    }

    /// Queries message state. The response must echo the queried message_id;
    /// a mismatch is an invalid response.
    pub async fn query_sm(&self, query: QuerySm) -> Result<QuerySmResp> {
        self.ensure_transmittable()?;
        let message_id = query.message_id.clone();
        let pdu = self.inner.request_ok(query.into()).await?;
        match pdu.body {
            PduBody::QuerySmResp(resp) => {
                if resp.message_id != message_id {
                    return Err(Error::invalid(format!(
                        "query_sm_resp for \"{}\", asked about \"{message_id}\"",
                        resp.message_id
                    )));
                }
                Ok(resp)
            },
            other => Err(unexpected("query_sm_resp", &other)),
        }
    }

    pub async fn cancel_sm(&self, cancel: CancelSm) -> Result<()> {
        self.ensure_transmittable()?;
        let pdu = self.inner.request_ok(cancel.into()).await?;
        match pdu.body {
            PduBody::CancelSmResp(_) => Ok(()),
            other => Err(unexpected("cancel_sm_resp", &other)),
        }
    }

    pub async fn replace_sm(&self, replace: ReplaceSm) -> Result<()> {
        self.ensure_transmittable()?;
        let pdu = self.inner.request_ok(replace.into()).await?;
        match pdu.body {
            PduBody::ReplaceSmResp(_) => Ok(()),
            other => Err(unexpected("replace_sm_resp", &other)),
        }
    }

    /// Manual liveness probe over the ordinary correlated path.
    pub async fn enquire_link(&self) -> Result<()> {
        self.ensure_bound()?;
        self.inner.enquire_link().await
    }

    /// Graceful unbind (BOUND_* → UNBOUND). The connection stays up; follow
    /// with [`Session::close`], or use [`Session::unbind_and_close`].
    pub async fn unbind(&self) -> Result<()> {
        self.ensure_bound()?;
        self.inner.request_ok(Unbind.into()).await?;
        self.inner.ctx.unbound().await;
        Ok(())
    }

    /// Best-effort unbind, then close. Never fails; unbind trouble is logged.
    pub async fn unbind_and_close(&self) {
        self.inner.unbind_and_close().await;
    }

    /// Idempotent close; safe to call any number of times, from listeners
    /// included.
    pub async fn close(&self) {
        self.inner.close().await;
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    #[inline]
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    pub fn local_port(&self) -> u16 {
        self.inner.conn.local_port()
    }

    pub fn remote_address(&self) -> std::net::SocketAddr {
        self.inner.conn.remote_address()
    }

    /// Milliseconds-since-epoch stamp of the last inbound activity.
    pub fn last_activity_ms(&self) -> u64 {
        self.inner.ctx.last_activity_ms()
    }

    /// Outstanding request count, mostly useful to tests and monitoring.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn add_state_listener(&self, listener: Arc<dyn SessionStateListener>) {
        self.inner.ctx.add_listener(listener);
    }

    pub fn remove_state_listener(&self, listener: &Arc<dyn SessionStateListener>) {
        self.inner.ctx.remove_listener(listener);
    }

    fn ensure_transmittable(&self) -> Result<()> {
        let state = self.inner.state();
        if !state.is_transmittable() {
            return Err(Error::IllegalState(state));
        }
        Ok(())
    }

    fn ensure_bound(&self) -> Result<()> {
        let state = self.inner.state();
        if !state.is_bound() {
            return Err(Error::IllegalState(state));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id())
            .field("state", &self.inner.state())
            .finish_non_exhaustive()
    }
}

fn unexpected(wanted: &'static str, got: &PduBody) -> Error {
    Error::invalid(format!("expected {wanted}, got {}", got.command_id()))
}
