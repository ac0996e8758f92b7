// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::{Error, Result},
    models::{
        command_id::CommandId,
        pdu::Body,
        types::{
            Address, MAX_ADDR, MAX_MESSAGE_ID, MAX_SHORT_MESSAGE, MAX_TIME,
            RegisteredDelivery, get_cstring, get_u8, put_cstring,
        },
    },
};

/// replace_sm: swap the content of a queued message in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceSm {
    pub message_id: String,
    pub source: Address,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: RegisteredDelivery,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
}

impl ReplaceSm {
    pub fn new(
        message_id: impl Into<String>,
        source: Address,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            source,
            short_message: short_message.into(),
            ..Self::default()
        }
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let schedule_delivery_time =
            get_cstring(buf, MAX_TIME, "schedule_delivery_time")?;
        let validity_period = get_cstring(buf, MAX_TIME, "validity_period")?;
        let registered_delivery =
            RegisteredDelivery::from_bits_retain(get_u8(buf, "registered_delivery")?);
        let sm_default_msg_id = get_u8(buf, "sm_default_msg_id")?;
        let sm_length = get_u8(buf, "sm_length")? as usize;
        if buf.remaining() < sm_length {
            return Err(Error::invalid("sm_length exceeds remaining body"));
        }
        let short_message = buf.split_to(sm_length);
        Ok(Self {
            message_id,
            source,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            sm_default_msg_id,
            short_message,
        })
    }
}

impl Body for ReplaceSm {
    fn command_id(&self) -> CommandId {
        CommandId::ReplaceSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.short_message.len() > MAX_SHORT_MESSAGE {
            return Err(Error::encoding(format!(
                "short_message exceeds {MAX_SHORT_MESSAGE} octets"
            )));
        }
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        put_cstring(
            buf,
            &self.schedule_delivery_time,
            MAX_TIME,
            "schedule_delivery_time",
        )?;
        put_cstring(buf, &self.validity_period, MAX_TIME, "validity_period")?;
        buf.put_u8(self.registered_delivery.bits());
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);
        Ok(())
    }
}

/// replace_sm_resp carries no body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSmResp;

impl Body for ReplaceSmResp {
    fn command_id(&self) -> CommandId {
        CommandId::ReplaceSmResp
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}
