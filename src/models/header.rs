// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use zerocopy::{BigEndian, FromBytes as ZFromBytes, Immutable, IntoBytes, KnownLayout, U32};

use crate::{
    error::{Error, Result},
    models::command_id::RESPONSE_MASK,
};

pub const HEADER_LEN: usize = 16;

/// Upper bound on command_length we are willing to frame. Large enough for a
/// maximal message_payload TLV, small enough to bound what a misbehaving peer
/// can make us allocate.
pub const MAX_PDU_LEN: usize = 64 * 1024;

/// The fixed SMPP PDU header: four big-endian u32 fields.
///
/// command_length counts the whole PDU including these 16 bytes.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, ZFromBytes, IntoBytes, KnownLayout, Immutable,
)]
pub struct PduHeader {
    pub command_length: U32<BigEndian>,
    pub command_id: U32<BigEndian>,
    pub command_status: U32<BigEndian>,
    pub sequence_number: U32<BigEndian>,
}

impl PduHeader {
    pub fn new(command_length: u32, command_id: u32, command_status: u32, sequence_number: u32) -> Self {
        Self {
            command_length: U32::new(command_length),
            command_id: U32::new(command_id),
            command_status: U32::new(command_status),
            sequence_number: U32::new(sequence_number),
        }
    }

    pub fn from_bytes(buf: &[u8; HEADER_LEN]) -> Self {
        <Self as ZFromBytes>::read_from_bytes(buf.as_slice())
            .unwrap_or_else(|_| unreachable!("header buffer is exactly {HEADER_LEN} bytes"))
    }

    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() != HEADER_LEN {
            return Err(Error::encoding(format!(
                "header buffer must be {HEADER_LEN} bytes, got {}",
                buf.len()
            )));
        }
        buf.copy_from_slice(self.as_bytes());
        Ok(())
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.command_id.get() & RESPONSE_MASK != 0
    }

    /// Number of body bytes following the header, after validating the
    /// framing bounds `HEADER_LEN <= command_length <= MAX_PDU_LEN`.
    pub fn body_len(&self) -> Result<usize> {
        let total = self.command_length.get() as usize;
        if !(HEADER_LEN..=MAX_PDU_LEN).contains(&total) {
            return Err(Error::invalid(format!(
                "command_length {total} outside [{HEADER_LEN}, {MAX_PDU_LEN}]"
            )));
        }
        Ok(total - HEADER_LEN)
    }
}
