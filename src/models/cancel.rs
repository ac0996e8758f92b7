// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Bytes, BytesMut};

use crate::{
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        types::{
            Address, MAX_ADDR, MAX_MESSAGE_ID, MAX_SERVICE_TYPE, get_cstring,
            put_cstring,
        },
    },
};

/// cancel_sm: withdraw a queued message, either by message id or by
/// (service_type, source, dest) triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelSm {
    pub service_type: String,
    pub message_id: String,
    pub source: Address,
    pub dest: Address,
}

impl CancelSm {
    pub fn by_message_id(message_id: impl Into<String>, source: Address) -> Self {
        Self {
            message_id: message_id.into(),
            source,
            ..Self::default()
        }
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let service_type = get_cstring(buf, MAX_SERVICE_TYPE, "service_type")?;
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let dest = Address::decode(buf, MAX_ADDR, "destination_addr")?;
        Ok(Self {
            service_type,
            message_id,
            source,
            dest,
        })
    }
}

impl Body for CancelSm {
    fn command_id(&self) -> CommandId {
        CommandId::CancelSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.service_type, MAX_SERVICE_TYPE, "service_type")?;
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        self.dest.encode(buf, MAX_ADDR, "destination_addr")
    }
}

/// cancel_sm_resp carries no body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelSmResp;

impl Body for CancelSmResp {
    fn command_id(&self) -> CommandId {
        CommandId::CancelSmResp
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}
