// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    cfg::enums::{Npi, Ton},
    error::{Error, Result},
};

// C-octet string capacities (including the terminating null) from the
// v3.4 field tables.
pub const MAX_SYSTEM_ID: usize = 16;
pub const MAX_PASSWORD: usize = 9;
pub const MAX_SYSTEM_TYPE: usize = 13;
pub const MAX_ADDRESS_RANGE: usize = 41;
pub const MAX_SERVICE_TYPE: usize = 6;
pub const MAX_ADDR: usize = 21;
pub const MAX_ALERT_ADDR: usize = 65;
pub const MAX_MESSAGE_ID: usize = 65;
pub const MAX_TIME: usize = 17;
pub const MAX_SHORT_MESSAGE: usize = 254;

/// Appends a null-terminated string, enforcing the field's maximum size
/// (null included). Interior nulls are rejected; both violations surface
/// before any I/O happens.
pub fn put_cstring(
    buf: &mut BytesMut,
    s: &str,
    max: usize,
    field: &'static str,
) -> Result<()> {
    if s.len() + 1 > max {
        return Err(Error::encoding(format!(
            "{field} exceeds {} octets: {:?}",
            max - 1,
            s
        )));
    }
    if s.as_bytes().contains(&0) {
        return Err(Error::encoding(format!("{field} contains an interior NUL")));
    }
    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Reads a null-terminated string of at most `max` octets (null included).
pub fn get_cstring(buf: &mut Bytes, max: usize, field: &'static str) -> Result<String> {
    let Some(nul) = buf.iter().take(max).position(|b| *b == 0) else {
        return Err(Error::invalid(format!(
            "{field}: unterminated C-octet string (max {max} octets)"
        )));
    };
    let raw = buf.split_to(nul);
    buf.advance(1);
    String::from_utf8(raw.to_vec())
        .map_err(|_| Error::invalid(format!("{field}: non-UTF8 C-octet string")))
}

pub fn get_u8(buf: &mut Bytes, field: &'static str) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(Error::invalid(format!("{field}: truncated body")));
    }
    Ok(buf.get_u8())
}

pub fn get_u32(buf: &mut Bytes, field: &'static str) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(Error::invalid(format!("{field}: truncated body")));
    }
    Ok(buf.get_u32())
}

/// A (ton, npi, digits) address triple as carried by every addressed PDU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub ton: Ton,
    pub npi: Npi,
    pub addr: String,
}

impl Address {
    pub fn new(ton: Ton, npi: Npi, addr: impl Into<String>) -> Self {
        Self {
            ton,
            npi,
            addr: addr.into(),
        }
    }

    /// International-TON / ISDN-NPI shorthand for the common case.
    pub fn international(addr: impl Into<String>) -> Self {
        Self::new(Ton::International, Npi::Isdn, addr)
    }

    pub fn encode(
        &self,
        buf: &mut BytesMut,
        max: usize,
        field: &'static str,
    ) -> Result<()> {
        buf.put_u8(self.ton.as_byte());
        buf.put_u8(self.npi.as_byte());
        put_cstring(buf, &self.addr, max, field)
    }

    pub fn decode(buf: &mut Bytes, max: usize, field: &'static str) -> Result<Self> {
        let ton = Ton::from_byte(get_u8(buf, field)?);
        let npi = Npi::from_byte(get_u8(buf, field)?);
        let addr = get_cstring(buf, max, field)?;
        Ok(Self { ton, npi, addr })
    }
}

bitflags! {
    /// esm_class bit field: messaging mode (bits 0-1), message type
    /// (bits 2-5), GSM network features (bits 6-7).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EsmClass: u8 {
        const MODE_DATAGRAM = 0x01;
        const MODE_FORWARD = 0x02;
        const TYPE_DELIVERY_RECEIPT = 0x04;
        const TYPE_DELIVERY_ACK = 0x08;
        const TYPE_USER_ACK = 0x10;
        const FEATURE_UDHI = 0x40;
        const FEATURE_REPLY_PATH = 0x80;
        const _ = !0;
    }
}

bitflags! {
    /// registered_delivery bit field: SMSC receipt (bits 0-1), SME ack
    /// (bits 2-3), intermediate notification (bit 4).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RegisteredDelivery: u8 {
        const SMSC_RECEIPT = 0x01;
        const SMSC_RECEIPT_FAILURE_ONLY = 0x02;
        const SME_ACK_DELIVERY = 0x04;
        const SME_ACK_USER = 0x08;
        const INTERMEDIATE_NOTIFICATION = 0x10;
        const _ = !0;
    }
}

/// message_state values reported by query_sm_resp and the message_state TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    Enroute,
    Delivered,
    Expired,
    Deleted,
    Undeliverable,
    Accepted,
    Unknown,
    Rejected,
    Other(u8),
}

impl MessageState {
    pub fn as_byte(self) -> u8 {
        match self {
            MessageState::Enroute => 1,
            MessageState::Delivered => 2,
            MessageState::Expired => 3,
            MessageState::Deleted => 4,
            MessageState::Undeliverable => 5,
            MessageState::Accepted => 6,
            MessageState::Unknown => 7,
            MessageState::Rejected => 8,
            MessageState::Other(v) => v,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => MessageState::Enroute,
            2 => MessageState::Delivered,
            3 => MessageState::Expired,
            4 => MessageState::Deleted,
            5 => MessageState::Undeliverable,
            6 => MessageState::Accepted,
            7 => MessageState::Unknown,
            8 => MessageState::Rejected,
            other => MessageState::Other(other),
        }
    }
}
