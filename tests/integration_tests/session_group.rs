// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::time::Duration;

use anyhow::Result;
use smpp_client_rs::{
    cfg::enums::BindType,
    session::{SessionGroup, SessionState},
};

use super::common::{accept_bind, serve_link_management, spawn_smsc, test_config};

async fn accommodating_smsc() -> Result<std::net::SocketAddr> {
    spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_ok() {
            serve_link_management(&mut stream).await;
        }
    })
    .await
}

#[tokio::test]
async fn closing_one_member_leaves_the_pool_running() -> Result<()> {
    let group = SessionGroup::new(2, 50);

    let addr_a = accommodating_smsc().await?;
    let addr_b = accommodating_smsc().await?;

    let (a, _) = group
        .connect_and_bind(test_config(addr_a, BindType::Transceiver), None)
        .await?;
    let (b, _) = group
        .connect_and_bind(test_config(addr_b, BindType::Transceiver), None)
        .await?;

    a.close().await;
    assert_eq!(a.state(), SessionState::Closed);

    // The shared pool survived the member close: B still processes inbound
    // PDUs (the enquire_link response travels through it).
    b.enquire_link().await?;
    assert!(b.state().is_bound());

    b.unbind_and_close().await;
    group.shutdown(Duration::from_millis(100)).await;
    Ok(())
}

#[tokio::test]
async fn group_shutdown_is_prompt_when_idle() -> Result<()> {
    let group = SessionGroup::new(3, 10);
    assert_eq!(group.degree(), 3);
    assert_eq!(group.queued_tasks(), 0);

    let started = tokio::time::Instant::now();
    group.shutdown(Duration::from_millis(500)).await;
    // Idle pool: workers exit as soon as intake closes, well inside the
    // 1000ms base grace.
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}
