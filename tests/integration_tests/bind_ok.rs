// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::sync::{Arc, Mutex};

use anyhow::Result;
use smpp_client_rs::{
    cfg::enums::BindType,
    session::{Session, SessionState, SessionStateListener},
};

use super::common::{accept_bind, serve_link_management, spawn_smsc, test_config};

struct TransitionLog {
    seen: Mutex<Vec<(SessionState, SessionState)>>,
}

impl SessionStateListener for TransitionLog {
    fn on_state_change(&self, new: SessionState, old: SessionState, _id: &str) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((old, new));
    }
}

#[tokio::test]
async fn successful_bind_reaches_bound_trx() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_ok() {
            serve_link_management(&mut stream).await;
        }
    })
    .await?;

    let log = Arc::new(TransitionLog {
        seen: Mutex::new(Vec::new()),
    });

    let session = Session::connect(test_config(addr, BindType::Transceiver), None).await?;
    session.add_state_listener(log.clone());
    assert_eq!(session.state(), SessionState::Open);

    let system_id = session.bind().await?;
    assert_eq!(system_id, "SMSC");
    assert_eq!(session.state(), SessionState::BoundTrx);

    let seen = log.seen.lock().unwrap_or_else(|e| e.into_inner()).clone();
    assert_eq!(seen, vec![(SessionState::Open, SessionState::BoundTrx)]);

    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);
    Ok(())
}

#[tokio::test]
async fn transmitter_bind_cannot_receive() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_ok() {
            serve_link_management(&mut stream).await;
        }
    })
    .await?;

    let (session, _) =
        Session::connect_and_bind(test_config(addr, BindType::Transmitter), None).await?;
    assert_eq!(session.state(), SessionState::BoundTx);
    assert!(session.state().is_transmittable());
    assert!(!session.state().is_receivable());
    session.close().await;
    Ok(())
}
