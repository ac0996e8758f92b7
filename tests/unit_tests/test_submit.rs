// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use anyhow::Result;
use bytes::Bytes;
use smpp_client_rs::models::{
    command_id::CommandId,
    pdu::{Pdu, PduBody},
    status::CommandStatus,
    submit::{SubmitSm, SubmitSmResp},
    submit_multi::{DestAddress, SubmitMulti, SubmitMultiResp, UnsuccessSme},
    types::{Address, EsmClass, RegisteredDelivery},
};

#[test]
fn test_submit_sm_round_trip() -> Result<()> {
    let submit = SubmitSm::builder()
        .source(Address::international("491700000001"))
        .dest(Address::international("491700000002"))
        .registered_delivery(RegisteredDelivery::SMSC_RECEIPT)
        .short_message(Bytes::from_static(b"hello from the test suite"))
        .build();

    let frame = Pdu::request(11, submit.clone()).encode()?;
    let decoded = Pdu::decode_frame(&frame)?;
    assert_eq!(decoded.command_id(), CommandId::SubmitSm);
    assert_eq!(decoded.sequence_number, 11);
    let PduBody::SubmitSm(got) = decoded.body else {
        panic!("expected submit_sm");
    };
    assert_eq!(got, submit);
    Ok(())
}

#[test]
fn test_submit_sm_resp_message_id() -> Result<()> {
    let frame = Pdu::response(11, CommandStatus::Ok, SubmitSmResp::new("msg0001")).encode()?;
    let decoded = Pdu::decode_frame(&frame)?;
    let PduBody::SubmitSmResp(resp) = decoded.body else {
        panic!("expected submit_sm_resp");
    };
    assert_eq!(resp.message_id, "msg0001");
    Ok(())
}

#[test]
fn test_short_message_over_254_rejected() {
    let submit = SubmitSm::builder()
        .short_message(Bytes::from(vec![0x41u8; 255]))
        .build();
    let err = Pdu::request(1, submit).encode().expect_err("over limit");
    assert!(err.to_string().contains("short_message"));
}

#[test]
fn test_interior_nul_rejected() {
    let submit = SubmitSm::builder().service_type("C\0MT").build();
    let err = Pdu::request(1, submit).encode().expect_err("interior NUL");
    assert!(err.to_string().contains("service_type"));
}

#[test]
fn test_submit_multi_round_trip_with_unsuccess() -> Result<()> {
    let submit = SubmitMulti {
        source: Address::international("1000"),
        dests: vec![
            DestAddress::Sme(Address::international("2000")),
            DestAddress::DistributionList("vip-list".into()),
        ],
        esm_class: EsmClass::default(),
        short_message: Bytes::from_static(b"fanout"),
        ..SubmitMulti::default()
    };
    let frame = Pdu::request(21, submit.clone()).encode()?;
    let PduBody::SubmitMulti(got) = Pdu::decode_frame(&frame)?.body else {
        panic!("expected submit_multi");
    };
    assert_eq!(got, submit);

    let resp = SubmitMultiResp {
        message_id: "m42".into(),
        unsuccess: vec![UnsuccessSme {
            address: Address::international("2000"),
            error_status: CommandStatus::InvalidDestAddress,
        }],
    };
    let frame = Pdu::response(21, CommandStatus::Ok, resp.clone()).encode()?;
    let PduBody::SubmitMultiResp(got) = Pdu::decode_frame(&frame)?.body else {
        panic!("expected submit_multi_resp");
    };
    assert_eq!(got, resp);
    Ok(())
}

#[test]
fn test_submit_multi_requires_destinations() {
    let submit = SubmitMulti::default();
    let err = Pdu::request(1, submit).encode().expect_err("no destinations");
    assert!(err.to_string().contains("destinations"));
}
