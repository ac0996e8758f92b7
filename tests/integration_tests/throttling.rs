// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::Result;
use bytes::Bytes;
use smpp_client_rs::{
    cfg::enums::BindType,
    models::{
        command_id::CommandId,
        deliver::DeliverSm,
        link::EnquireLinkResp,
        pdu::Pdu,
        status::CommandStatus,
        types::Address,
    },
    session::{MessageReceiverListener, ProcessRequestError, Session},
};

use super::common::{
    accept_bind, read_pdu, serve_link_management, spawn_smsc, test_config, write_pdu,
};

/// Holds its worker long enough for the queue to back up.
struct SlowReceiver {
    handled: AtomicUsize,
}

impl MessageReceiverListener for SlowReceiver {
    fn on_accept_deliver_sm(&self, _deliver: &DeliverSm) -> Result<(), ProcessRequestError> {
        std::thread::sleep(Duration::from_millis(150));
        self.handled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn deliver(seq: u32) -> Pdu {
    let body = DeliverSm {
        source: Address::international("1000"),
        dest: Address::international("2000"),
        short_message: Bytes::from_static(b"pipelined"),
        ..DeliverSm::default()
    };
    Pdu::request(seq, body)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pipelined_deliveries_throttle_but_never_reset() -> Result<()> {
    const BURST: u32 = 5;

    let addr = spawn_smsc(move |mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }
        // Wait for the client's post-bind probe so the burst lands on a
        // fully bound session.
        let probe = read_pdu(&mut stream).await.expect("post-bind probe");
        assert_eq!(probe.command_id(), CommandId::EnquireLink);
        let ok = Pdu::response(probe.sequence_number, CommandStatus::Ok, EnquireLinkResp);
        if write_pdu(&mut stream, &ok).await.is_err() {
            return;
        }
        // Pipeline the burst without waiting for any response.
        for seq in 100..100 + BURST {
            if write_pdu(&mut stream, &deliver(seq)).await.is_err() {
                return;
            }
        }
        // Collect one response per delivery, in whatever order they come.
        let mut statuses: HashMap<u32, CommandStatus> = HashMap::new();
        while statuses.len() < BURST as usize {
            let Ok(pdu) = read_pdu(&mut stream).await else {
                return;
            };
            if pdu.command_id() == CommandId::DeliverSmResp {
                statuses.insert(pdu.sequence_number, pdu.command_status);
            }
        }
        let throttled = statuses
            .values()
            .filter(|s| **s == CommandStatus::Throttled)
            .count();
        let ok = statuses
            .values()
            .filter(|s| **s == CommandStatus::Ok)
            .count();
        assert!(throttled >= 1, "expected at least one ESME_RTHROTTLED");
        assert_eq!(throttled + ok, BURST as usize);
        // Keep the connection up so the client-side checks see a live bind.
        serve_link_management(&mut stream).await;
    })
    .await?;

    let receiver = Arc::new(SlowReceiver {
        handled: AtomicUsize::new(0),
    });

    let mut cfg = test_config(addr, BindType::Transceiver);
    cfg.runtime.pdu_processor_degree = 1;
    cfg.runtime.queue_capacity = 2;
    cfg.runtime.transaction_timer = Duration::from_millis(2_000);

    let (session, _) = Session::connect_and_bind(cfg, Some(receiver.clone())).await?;
    session.enquire_link().await?;

    // Give the burst time to be processed or throttled.
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let handled = receiver.handled.load(Ordering::SeqCst);
    assert!(
        (1..=BURST as usize).contains(&handled),
        "some deliveries must reach the listener, got {handled}"
    );
    // No connection reset: the session is still bound and alive.
    assert!(session.state().is_bound());

    session.close().await;
    Ok(())
}
