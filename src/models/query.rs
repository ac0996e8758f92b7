// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        types::{
            Address, MAX_ADDR, MAX_MESSAGE_ID, MAX_TIME, MessageState, get_cstring,
            get_u8, put_cstring,
        },
    },
};

/// query_sm: ask the SMSC for the state of a previously submitted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySm {
    pub message_id: String,
    pub source: Address,
}

impl QuerySm {
    pub fn new(message_id: impl Into<String>, source: Address) -> Self {
        Self {
            message_id: message_id.into(),
            source,
        }
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        Ok(Self { message_id, source })
    }
}

impl Body for QuerySm {
    fn command_id(&self) -> CommandId {
        CommandId::QuerySm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")
    }
}

/// query_sm_resp: message state and, for final states, the final date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySmResp {
    pub message_id: String,
    pub final_date: String,
    pub message_state: MessageState,
    pub error_code: u8,
}

impl Default for QuerySmResp {
    fn default() -> Self {
        Self {
            message_id: String::new(),
            final_date: String::new(),
            message_state: MessageState::Unknown,
            error_code: 0,
        }
    }
}

impl QuerySmResp {
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let final_date = get_cstring(buf, MAX_TIME, "final_date")?;
        let message_state = MessageState::from_byte(get_u8(buf, "message_state")?);
        let error_code = get_u8(buf, "error_code")?;
        Ok(Self {
            message_id,
            final_date,
            message_state,
            error_code,
        })
    }
}

impl Body for QuerySmResp {
    fn command_id(&self) -> CommandId {
        CommandId::QuerySmResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        put_cstring(buf, &self.final_date, MAX_TIME, "final_date")?;
        buf.put_u8(self.message_state.as_byte());
        buf.put_u8(self.error_code);
        Ok(())
    }
}
