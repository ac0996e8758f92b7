// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::time::Duration;

use anyhow::Result;
use smpp_client_rs::{
    cfg::enums::BindType,
    error::Error,
    models::{pdu::Pdu, status::CommandStatus, submit::SubmitSmResp},
    session::{Session, SessionState},
};

use super::common::{
    accept_bind, serve_link_management, spawn_smsc, test_config, write_pdu,
};

#[tokio::test]
async fn stray_response_is_dropped_without_disconnect() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }
        // A response nobody asked for.
        let stray = Pdu::response(777, CommandStatus::Ok, SubmitSmResp::new("ghost"));
        if write_pdu(&mut stream, &stray).await.is_err() {
            return;
        }
        serve_link_management(&mut stream).await;
    })
    .await?;

    let (session, _) =
        Session::connect_and_bind(test_config(addr, BindType::Transceiver), None).await?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(session.state().is_bound(), "stray response must not kill the link");

    // The link still works end to end.
    session.enquire_link().await?;

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn close_is_idempotent() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_ok() {
            serve_link_management(&mut stream).await;
        }
    })
    .await?;

    let (session, _) =
        Session::connect_and_bind(test_config(addr, BindType::Transceiver), None).await?;

    session.close().await;
    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);

    // Operations after close fail cleanly.
    let err = session.enquire_link().await.expect_err("session is closed");
    assert!(matches!(err, Error::IllegalState(SessionState::Closed)));
    Ok(())
}

#[tokio::test]
async fn pending_drains_on_close() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }
        // Swallow whatever comes next; the client will close underneath it.
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    })
    .await?;

    let mut cfg = test_config(addr, BindType::Transceiver);
    cfg.runtime.transaction_timer = Duration::from_millis(3_000);

    let (session, _) = Session::connect_and_bind(cfg, None).await?;

    let racer = session.clone();
    let submit = tokio::spawn(async move {
        racer
            .submit_sm(
                smpp_client_rs::models::submit::SubmitSm::builder()
                    .short_message(bytes::Bytes::from_static(b"doomed"))
                    .build(),
            )
            .await
    });

    // Let the submit get on the wire, then close underneath it.
    tokio::time::sleep(Duration::from_millis(200)).await;
    session.close().await;

    let err = submit.await?.expect_err("closing must fail the waiter");
    assert!(matches!(err, Error::SessionClosed));
    assert_eq!(session.pending_requests(), 0);
    Ok(())
}
