// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Optional-parameter tags we know by name. Unknown tags pass through intact.
pub mod tags {
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const SC_INTERFACE_VERSION: u16 = 0x0210;
    pub const MS_AVAILABILITY_STATUS: u16 = 0x0422;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const MESSAGE_STATE: u16 = 0x0427;
}

/// One optional parameter: u16 tag, u16 length, opaque value.
///
/// TLVs always trail the mandatory body; decoding stops at the end of the
/// PDU, so a body decoder drains the remainder with [`Tlv::decode_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u16,
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.value.len() > u16::MAX as usize {
            return Err(Error::encoding(format!(
                "TLV {:#06x} value exceeds u16 length",
                self.tag
            )));
        }
        buf.put_u16(self.tag);
        buf.put_u16(self.value.len() as u16);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        if buf.remaining() < 4 {
            return Err(Error::invalid("truncated TLV header"));
        }
        let tag = buf.get_u16();
        let len = buf.get_u16() as usize;
        if buf.remaining() < len {
            return Err(Error::invalid(format!(
                "TLV {tag:#06x} claims {len} value octets, {} remain",
                buf.remaining()
            )));
        }
        let value = buf.split_to(len);
        Ok(Self { tag, value })
    }

    /// Drains the buffer into a TLV list.
    pub fn decode_all(buf: &mut Bytes) -> Result<Vec<Tlv>> {
        let mut tlvs = Vec::new();
        while buf.has_remaining() {
            tlvs.push(Tlv::decode(buf)?);
        }
        Ok(tlvs)
    }

    pub fn find(tlvs: &[Tlv], tag: u16) -> Option<&Tlv> {
        tlvs.iter().find(|t| t.tag == tag)
    }
}

pub fn encode_all(tlvs: &[Tlv], buf: &mut BytesMut) -> Result<()> {
    for tlv in tlvs {
        tlv.encode(buf)?;
    }
    Ok(())
}
