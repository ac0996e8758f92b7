// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::Result;
use serial_test::serial;
use smpp_client_rs::{
    cfg::enums::BindType,
    models::{link::EnquireLinkResp, pdu::{Pdu, PduBody}, status::CommandStatus},
    session::{Session, SessionState},
};

use super::common::{accept_bind, eventually, read_pdu, spawn_smsc, test_config, write_pdu};

#[tokio::test]
#[serial]
async fn idle_link_is_probed_and_stays_bound() -> Result<()> {
    let probes = Arc::new(AtomicUsize::new(0));
    let probes_smsc = probes.clone();

    let addr = spawn_smsc(move |mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }
        // Stay silent; answer every probe the idle client sends.
        while let Ok(pdu) = read_pdu(&mut stream).await {
            if matches!(pdu.body, PduBody::EnquireLink(_)) {
                probes_smsc.fetch_add(1, Ordering::SeqCst);
                let resp =
                    Pdu::response(pdu.sequence_number, CommandStatus::Ok, EnquireLinkResp);
                if write_pdu(&mut stream, &resp).await.is_err() {
                    break;
                }
            }
        }
    })
    .await?;

    let mut cfg = test_config(addr, BindType::Transceiver);
    cfg.runtime.enquire_link_timer = Duration::from_millis(200);
    cfg.runtime.transaction_timer = Duration::from_millis(500);

    let (session, _) = Session::connect_and_bind(cfg, None).await?;

    // Several idle windows pass; each one produces a probe that is answered.
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert!(session.state().is_bound(), "keepalive must hold the bind");
    assert!(
        probes.load(Ordering::SeqCst) >= 1,
        "idle link produced no enquire_link"
    );

    session.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn unanswered_probe_closes_the_session() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }
        // Read everything, answer nothing: the probe will go unanswered.
        let mut sink = vec![0u8; 1024];
        loop {
            match tokio::io::AsyncReadExt::read(&mut stream, &mut sink).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {},
            }
        }
    })
    .await?;

    let mut cfg = test_config(addr, BindType::Transceiver);
    cfg.runtime.enquire_link_timer = Duration::from_millis(200);
    cfg.runtime.transaction_timer = Duration::from_millis(300);

    let (session, _) = Session::connect_and_bind(cfg, None).await?;
    assert!(session.state().is_bound());

    // Idle timeout (200ms) + probe deadline (300ms) + margin.
    assert!(
        eventually(Duration::from_secs(3), || session.state()
            == SessionState::Closed)
        .await,
        "unanswered enquire_link must close the session"
    );
    assert_eq!(session.pending_requests(), 0);
    Ok(())
}
