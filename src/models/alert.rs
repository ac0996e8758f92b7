// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Bytes, BytesMut};

use crate::{
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        tlv::{self, Tlv, tags},
        types::{Address, MAX_ALERT_ADDR},
    },
};

/// alert_notification: the SMSC tells a receiver that a previously
/// unavailable mobile is reachable again. Unacknowledged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertNotification {
    pub source: Address,
    pub esme_addr: Address,
    pub tlvs: Vec<Tlv>,
}

impl AlertNotification {
    pub fn ms_availability_status(&self) -> Option<u8> {
        Tlv::find(&self.tlvs, tags::MS_AVAILABILITY_STATUS)
            .and_then(|t| t.value.first().copied())
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let source = Address::decode(buf, MAX_ALERT_ADDR, "source_addr")?;
        let esme_addr = Address::decode(buf, MAX_ALERT_ADDR, "esme_addr")?;
        let tlvs = Tlv::decode_all(buf)?;
        Ok(Self {
            source,
            esme_addr,
            tlvs,
        })
    }
}

impl Body for AlertNotification {
    fn command_id(&self) -> CommandId {
        CommandId::AlertNotification
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        self.source.encode(buf, MAX_ALERT_ADDR, "source_addr")?;
        self.esme_addr.encode(buf, MAX_ALERT_ADDR, "esme_addr")?;
        tlv::encode_all(&self.tlvs, buf)
    }
}
