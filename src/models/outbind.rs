// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Bytes, BytesMut};

use crate::{
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        types::{MAX_PASSWORD, MAX_SYSTEM_ID, get_cstring, put_cstring},
    },
};

/// outbind: an SMSC-initiated invitation to bind as receiver. Only relevant
/// for listening ESMEs; a client session logs and refuses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbind {
    pub system_id: String,
    pub password: String,
}

impl Outbind {
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let system_id = get_cstring(buf, MAX_SYSTEM_ID, "system_id")?;
        let password = get_cstring(buf, MAX_PASSWORD, "password")?;
        Ok(Self {
            system_id,
            password,
        })
    }
}

impl Body for Outbind {
    fn command_id(&self) -> CommandId {
        CommandId::Outbind
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.system_id, MAX_SYSTEM_ID, "system_id")?;
        put_cstring(buf, &self.password, MAX_PASSWORD, "password")
    }
}
