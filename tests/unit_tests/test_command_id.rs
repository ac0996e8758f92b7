// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use smpp_client_rs::models::{
    command_id::{CommandId, RESPONSE_MASK},
    status::CommandStatus,
};

#[test]
fn test_request_response_pairing() {
    let pairs = [
        (CommandId::BindTransmitter, CommandId::BindTransmitterResp),
        (CommandId::BindReceiver, CommandId::BindReceiverResp),
        (CommandId::BindTransceiver, CommandId::BindTransceiverResp),
        (CommandId::SubmitSm, CommandId::SubmitSmResp),
        (CommandId::SubmitMulti, CommandId::SubmitMultiResp),
        (CommandId::DeliverSm, CommandId::DeliverSmResp),
        (CommandId::DataSm, CommandId::DataSmResp),
        (CommandId::QuerySm, CommandId::QuerySmResp),
        (CommandId::CancelSm, CommandId::CancelSmResp),
        (CommandId::ReplaceSm, CommandId::ReplaceSmResp),
        (CommandId::Unbind, CommandId::UnbindResp),
        (CommandId::EnquireLink, CommandId::EnquireLinkResp),
    ];
    for (req, resp) in pairs {
        assert!(!req.is_response());
        assert!(resp.is_response());
        assert_eq!(req.response(), Some(resp));
        assert_eq!(resp.as_u32(), req.as_u32() | RESPONSE_MASK);
    }
}

#[test]
fn test_unacknowledged_commands() {
    assert_eq!(CommandId::Outbind.response(), None);
    assert_eq!(CommandId::AlertNotification.response(), None);
}

#[test]
fn test_round_trip_every_id() {
    let all = [
        CommandId::BindReceiver,
        CommandId::BindReceiverResp,
        CommandId::BindTransmitter,
        CommandId::BindTransmitterResp,
        CommandId::QuerySm,
        CommandId::QuerySmResp,
        CommandId::SubmitSm,
        CommandId::SubmitSmResp,
        CommandId::DeliverSm,
        CommandId::DeliverSmResp,
        CommandId::Unbind,
        CommandId::UnbindResp,
        CommandId::ReplaceSm,
        CommandId::ReplaceSmResp,
        CommandId::CancelSm,
        CommandId::CancelSmResp,
        CommandId::BindTransceiver,
        CommandId::BindTransceiverResp,
        CommandId::Outbind,
        CommandId::EnquireLink,
        CommandId::EnquireLinkResp,
        CommandId::SubmitMulti,
        CommandId::SubmitMultiResp,
        CommandId::AlertNotification,
        CommandId::DataSm,
        CommandId::DataSmResp,
        CommandId::GenericNack,
    ];
    for id in all {
        assert_eq!(CommandId::from_u32(id.as_u32()), Some(id));
    }
    assert_eq!(CommandId::from_u32(0x0000_00FF), None);
}

#[test]
fn test_status_codes() {
    assert_eq!(CommandStatus::from_u32(0), CommandStatus::Ok);
    assert!(CommandStatus::Ok.is_ok());
    assert_eq!(CommandStatus::InvalidBindStatus.as_u32(), 0x0000_0004);
    assert_eq!(CommandStatus::Throttled.as_u32(), 0x0000_0058);
    assert_eq!(CommandStatus::BindFailed.as_u32(), 0x0000_000D);
    assert_eq!(CommandStatus::ReceiverAppnError.as_u32(), 0x0000_0064);
    // Vendor codes survive a round trip untouched.
    assert_eq!(
        CommandStatus::from_u32(0x0000_0400).as_u32(),
        0x0000_0400
    );
}
