// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use core::fmt;

/// Bit 31 of command_id distinguishes responses from requests.
pub const RESPONSE_MASK: u32 = 0x8000_0000;

/// SMPP command identifiers (v3.4 Table 4-1, plus the v3.4 extension range
/// entries we speak).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    BindReceiver,
    BindReceiverResp,
    BindTransmitter,
    BindTransmitterResp,
    QuerySm,
    QuerySmResp,
    SubmitSm,
    SubmitSmResp,
    DeliverSm,
    DeliverSmResp,
    Unbind,
    UnbindResp,
    ReplaceSm,
    ReplaceSmResp,
    CancelSm,
    CancelSmResp,
    BindTransceiver,
    BindTransceiverResp,
    Outbind,
    EnquireLink,
    EnquireLinkResp,
    SubmitMulti,
    SubmitMultiResp,
    AlertNotification,
    DataSm,
    DataSmResp,
    GenericNack,
}

impl CommandId {
    pub fn as_u32(self) -> u32 {
        match self {
            CommandId::BindReceiver => 0x0000_0001,
            CommandId::BindReceiverResp => 0x8000_0001,
            CommandId::BindTransmitter => 0x0000_0002,
            CommandId::BindTransmitterResp => 0x8000_0002,
            CommandId::QuerySm => 0x0000_0003,
            CommandId::QuerySmResp => 0x8000_0003,
            CommandId::SubmitSm => 0x0000_0004,
            CommandId::SubmitSmResp => 0x8000_0004,
            CommandId::DeliverSm => 0x0000_0005,
            CommandId::DeliverSmResp => 0x8000_0005,
            CommandId::Unbind => 0x0000_0006,
            CommandId::UnbindResp => 0x8000_0006,
            CommandId::ReplaceSm => 0x0000_0007,
            CommandId::ReplaceSmResp => 0x8000_0007,
            CommandId::CancelSm => 0x0000_0008,
            CommandId::CancelSmResp => 0x8000_0008,
            CommandId::BindTransceiver => 0x0000_0009,
            CommandId::BindTransceiverResp => 0x8000_0009,
            CommandId::Outbind => 0x0000_000B,
            CommandId::EnquireLink => 0x0000_0015,
            CommandId::EnquireLinkResp => 0x8000_0015,
            CommandId::SubmitMulti => 0x0000_0021,
            CommandId::SubmitMultiResp => 0x8000_0021,
            CommandId::AlertNotification => 0x0000_0102,
            CommandId::DataSm => 0x0000_0103,
            CommandId::DataSmResp => 0x8000_0103,
            CommandId::GenericNack => 0x8000_0000,
        }
    }

    pub fn from_u32(v: u32) -> Option<Self> {
        Some(match v {
            0x0000_0001 => CommandId::BindReceiver,
            0x8000_0001 => CommandId::BindReceiverResp,
            0x0000_0002 => CommandId::BindTransmitter,
            0x8000_0002 => CommandId::BindTransmitterResp,
            0x0000_0003 => CommandId::QuerySm,
            0x8000_0003 => CommandId::QuerySmResp,
            0x0000_0004 => CommandId::SubmitSm,
            0x8000_0004 => CommandId::SubmitSmResp,
            0x0000_0005 => CommandId::DeliverSm,
            0x8000_0005 => CommandId::DeliverSmResp,
            0x0000_0006 => CommandId::Unbind,
            0x8000_0006 => CommandId::UnbindResp,
            0x0000_0007 => CommandId::ReplaceSm,
            0x8000_0007 => CommandId::ReplaceSmResp,
            0x0000_0008 => CommandId::CancelSm,
            0x8000_0008 => CommandId::CancelSmResp,
            0x0000_0009 => CommandId::BindTransceiver,
            0x8000_0009 => CommandId::BindTransceiverResp,
            0x0000_000B => CommandId::Outbind,
            0x0000_0015 => CommandId::EnquireLink,
            0x8000_0015 => CommandId::EnquireLinkResp,
            0x0000_0021 => CommandId::SubmitMulti,
            0x8000_0021 => CommandId::SubmitMultiResp,
            0x0000_0102 => CommandId::AlertNotification,
            0x0000_0103 => CommandId::DataSm,
            0x8000_0103 => CommandId::DataSmResp,
            0x8000_0000 => CommandId::GenericNack,
            _ => return None,
        })
    }

    /// True for responses (bit 31 set). generic_nack counts as a response.
    #[inline]
    pub fn is_response(self) -> bool {
        self.as_u32() & RESPONSE_MASK != 0
    }

    /// The response command paired with this request, where one exists.
    /// outbind and alert_notification are unacknowledged.
    pub fn response(self) -> Option<CommandId> {
        if self.is_response() {
            return Some(self);
        }
        CommandId::from_u32(self.as_u32() | RESPONSE_MASK)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandId::BindReceiver => "bind_receiver",
            CommandId::BindReceiverResp => "bind_receiver_resp",
            CommandId::BindTransmitter => "bind_transmitter",
            CommandId::BindTransmitterResp => "bind_transmitter_resp",
            CommandId::QuerySm => "query_sm",
            CommandId::QuerySmResp => "query_sm_resp",
            CommandId::SubmitSm => "submit_sm",
            CommandId::SubmitSmResp => "submit_sm_resp",
            CommandId::DeliverSm => "deliver_sm",
            CommandId::DeliverSmResp => "deliver_sm_resp",
            CommandId::Unbind => "unbind",
            CommandId::UnbindResp => "unbind_resp",
            CommandId::ReplaceSm => "replace_sm",
            CommandId::ReplaceSmResp => "replace_sm_resp",
            CommandId::CancelSm => "cancel_sm",
            CommandId::CancelSmResp => "cancel_sm_resp",
            CommandId::BindTransceiver => "bind_transceiver",
            CommandId::BindTransceiverResp => "bind_transceiver_resp",
            CommandId::Outbind => "outbind",
            CommandId::EnquireLink => "enquire_link",
            CommandId::EnquireLinkResp => "enquire_link_resp",
            CommandId::SubmitMulti => "submit_multi",
            CommandId::SubmitMultiResp => "submit_multi_resp",
            CommandId::AlertNotification => "alert_notification",
            CommandId::DataSm => "data_sm",
            CommandId::DataSmResp => "data_sm_resp",
            CommandId::GenericNack => "generic_nack",
        })
    }
}
