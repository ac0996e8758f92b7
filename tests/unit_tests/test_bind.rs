// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use anyhow::Result;
use smpp_client_rs::{
    cfg::{
        config::Config,
        enums::{BindType, InterfaceVersion},
    },
    models::{
        bind::{BindRequest, BindResponse},
        command_id::CommandId,
        pdu::{Body, Pdu, PduBody},
        status::CommandStatus,
    },
};

use super::load_fixture;

#[test]
fn test_bind_transceiver_matches_fixture() -> Result<()> {
    let expected = load_fixture("tests/unit_tests/fixtures/bind/bind_transceiver.hex")?;

    let cfg = Config::for_target("127.0.0.1:2775", BindType::Transceiver, "ESME", "pw");
    let request = BindRequest::from_config(&cfg.bind);
    assert_eq!(request.command_id(), CommandId::BindTransceiver);
    assert_eq!(request.interface_version, InterfaceVersion::V34);

    let frame = Pdu::request(1, request).encode()?;
    assert_eq!(&frame[..], &expected[..], "bind_transceiver frame mismatch");
    Ok(())
}

#[test]
fn test_bind_request_decode() -> Result<()> {
    let bytes = load_fixture("tests/unit_tests/fixtures/bind/bind_transceiver.hex")?;
    let pdu = Pdu::decode_frame(&bytes)?;
    let PduBody::Bind(request) = pdu.body else {
        panic!("expected a bind request");
    };
    assert_eq!(request.bind_type, BindType::Transceiver);
    assert_eq!(request.system_id, "ESME");
    assert_eq!(request.password, "pw");
    assert_eq!(request.system_type, "");
    assert_eq!(request.address_range, "");
    Ok(())
}

#[test]
fn test_bind_response_round_trip() -> Result<()> {
    let resp = BindResponse::new(BindType::Transmitter, "SMSC");
    let frame = Pdu::response(7, CommandStatus::Ok, resp.clone()).encode()?;
    let decoded = Pdu::decode_frame(&frame)?;
    assert_eq!(decoded.sequence_number, 7);
    assert_eq!(decoded.command_id(), CommandId::BindTransmitterResp);
    let PduBody::BindResp(got) = decoded.body else {
        panic!("expected a bind response");
    };
    assert_eq!(got, resp);
    Ok(())
}

#[test]
fn test_negative_bind_response_without_body() -> Result<()> {
    // An SMSC refusing a bind may send a header-only response.
    let header_only = Pdu::response(
        3,
        CommandStatus::BindFailed,
        BindResponse::empty(BindType::Transceiver),
    );
    let mut frame = header_only.encode()?.to_vec();
    // Strip the empty-string body down to the bare header.
    frame.truncate(16);
    frame[3] = 16;

    let decoded = Pdu::decode_frame(&frame)?;
    assert_eq!(decoded.command_status, CommandStatus::BindFailed);
    let PduBody::BindResp(resp) = decoded.body else {
        panic!("expected a bind response");
    };
    assert_eq!(resp.system_id, "");
    Ok(())
}

#[test]
fn test_oversized_system_id_rejected_before_io() {
    let request = BindRequest {
        bind_type: BindType::Transmitter,
        system_id: "an-esme-identity-way-too-long".into(),
        password: String::new(),
        system_type: String::new(),
        interface_version: InterfaceVersion::V34,
        addr_ton: Default::default(),
        addr_npi: Default::default(),
        address_range: String::new(),
    };
    let err = Pdu::request(1, request).encode().expect_err("must fail");
    assert!(err.to_string().contains("system_id"));
}
