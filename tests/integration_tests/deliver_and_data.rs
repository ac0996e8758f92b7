// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::sync::{Arc, Mutex};

use anyhow::Result;
use bytes::Bytes;
use smpp_client_rs::{
    cfg::enums::BindType,
    models::{
        alert::AlertNotification,
        command_id::CommandId,
        data::{DataSm, DataSmResp},
        deliver::DeliverSm,
        link::EnquireLinkResp,
        pdu::Pdu,
        status::CommandStatus,
        tlv::{Tlv, tags},
        types::Address,
    },
    session::{MessageReceiverListener, ProcessRequestError, Session},
};

use super::common::{
    accept_bind, read_pdu, serve_link_management, spawn_smsc, test_config, write_pdu,
};

#[derive(Default)]
struct RecordingReceiver {
    deliveries: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl MessageReceiverListener for RecordingReceiver {
    fn on_accept_deliver_sm(&self, deliver: &DeliverSm) -> Result<(), ProcessRequestError> {
        let text = String::from_utf8_lossy(&deliver.short_message).into_owned();
        if text == "reject me" {
            return Err(ProcessRequestError::new(
                CommandStatus::SystemError,
                "scripted refusal",
            ));
        }
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text);
        Ok(())
    }

    fn on_accept_data_sm(&self, data: &DataSm) -> Result<DataSmResp, ProcessRequestError> {
        let payload = data
            .message_payload()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .unwrap_or_default();
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(payload);
        Ok(DataSmResp::new("data-accepted"))
    }

    fn on_accept_alert_notification(&self, alert: &AlertNotification) {
        self.alerts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert.source.addr.clone());
    }
}

fn deliver(seq: u32, text: &'static str) -> Pdu {
    Pdu::request(
        seq,
        DeliverSm {
            source: Address::international("1000"),
            dest: Address::international("2000"),
            short_message: Bytes::from_static(text.as_bytes()),
            ..DeliverSm::default()
        },
    )
}

#[tokio::test]
async fn smsc_initiated_traffic_reaches_the_listener() -> Result<()> {
    let addr = spawn_smsc(|mut stream| async move {
        if accept_bind(&mut stream).await.is_err() {
            return;
        }

        // The client probes once after binding; answering it guarantees the
        // session is fully bound before we push traffic at it.
        let probe = read_pdu(&mut stream).await.expect("post-bind probe");
        assert_eq!(probe.command_id(), CommandId::EnquireLink);
        let _ = write_pdu(
            &mut stream,
            &Pdu::response(probe.sequence_number, CommandStatus::Ok, EnquireLinkResp),
        )
        .await;

        // 1. A message the listener accepts.
        let _ = write_pdu(&mut stream, &deliver(201, "hello esme")).await;
        let resp = read_pdu(&mut stream).await.expect("deliver_sm_resp");
        assert_eq!(resp.command_id(), CommandId::DeliverSmResp);
        assert_eq!(resp.sequence_number, 201);
        assert_eq!(resp.command_status, CommandStatus::Ok);

        // 2. A message the listener refuses with its own status.
        let _ = write_pdu(&mut stream, &deliver(202, "reject me")).await;
        let resp = read_pdu(&mut stream).await.expect("deliver_sm_resp");
        assert_eq!(resp.sequence_number, 202);
        assert_eq!(resp.command_status, CommandStatus::SystemError);

        // 3. data_sm answered with the listener-provided message id.
        let data = DataSm::builder()
            .source(Address::international("1000"))
            .dest(Address::international("2000"))
            .message_payload(Bytes::from_static(b"tlv payload"))
            .build();
        let _ = write_pdu(&mut stream, &Pdu::request(203, data)).await;
        let resp = read_pdu(&mut stream).await.expect("data_sm_resp");
        assert_eq!(resp.command_id(), CommandId::DataSmResp);
        assert_eq!(resp.command_status, CommandStatus::Ok);

        // 4. An unacknowledged alert_notification.
        let alert = AlertNotification {
            source: Address::international("777"),
            esme_addr: Address::international("2000"),
            tlvs: vec![Tlv::new(tags::MS_AVAILABILITY_STATUS, vec![0u8])],
        };
        let _ = write_pdu(&mut stream, &Pdu::request(204, alert)).await;

        // Hold the connection open for the client-side assertions.
        serve_link_management(&mut stream).await;
    })
    .await?;

    let receiver = Arc::new(RecordingReceiver::default());
    let (session, _) = Session::connect_and_bind(
        test_config(addr, BindType::Transceiver),
        Some(receiver.clone()),
    )
    .await?;
    session.enquire_link().await?;

    // Let the scripted exchange play out.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    let deliveries = receiver
        .deliveries
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    assert_eq!(deliveries, vec!["hello esme", "tlv payload"]);

    let alerts = receiver.alerts.lock().unwrap_or_else(|e| e.into_inner()).clone();
    assert_eq!(alerts, vec!["777"]);

    assert!(session.state().is_bound());
    session.close().await;
    Ok(())
}
