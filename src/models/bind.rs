// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    cfg::{
        config::BindConfig,
        enums::{BindType, InterfaceVersion, Npi, Ton},
    },
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        tlv::{self, Tlv, tags},
        types::{
            MAX_ADDRESS_RANGE, MAX_PASSWORD, MAX_SYSTEM_ID, MAX_SYSTEM_TYPE, get_cstring,
            get_u8, put_cstring,
        },
    },
};

/// Body shared by bind_transmitter, bind_receiver and bind_transceiver;
/// `bind_type` selects which command id goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub bind_type: BindType,
    pub system_id: String,
    pub password: String,
    pub system_type: String,
    pub interface_version: InterfaceVersion,
    pub addr_ton: Ton,
    pub addr_npi: Npi,
    pub address_range: String,
}

impl BindRequest {
    pub fn from_config(bind: &BindConfig) -> Self {
        Self {
            bind_type: bind.bind_type,
            system_id: bind.system_id.clone(),
            password: bind.password.clone(),
            system_type: bind.system_type.clone(),
            interface_version: bind.interface_version,
            addr_ton: bind.addr_ton,
            addr_npi: bind.addr_npi,
            address_range: bind.address_range.clone(),
        }
    }

    pub fn decode(bind_type: BindType, buf: &mut Bytes) -> Result<Self> {
        let system_id = get_cstring(buf, MAX_SYSTEM_ID, "system_id")?;
        let password = get_cstring(buf, MAX_PASSWORD, "password")?;
        let system_type = get_cstring(buf, MAX_SYSTEM_TYPE, "system_type")?;
        let interface_version = match get_u8(buf, "interface_version")? {
            0x50 => InterfaceVersion::V50,
            _ => InterfaceVersion::V34,
        };
        let addr_ton = Ton::from_byte(get_u8(buf, "addr_ton")?);
        let addr_npi = Npi::from_byte(get_u8(buf, "addr_npi")?);
        let address_range = get_cstring(buf, MAX_ADDRESS_RANGE, "address_range")?;
        Ok(Self {
            bind_type,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

impl Body for BindRequest {
    fn command_id(&self) -> CommandId {
        match self.bind_type {
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.system_id, MAX_SYSTEM_ID, "system_id")?;
        put_cstring(buf, &self.password, MAX_PASSWORD, "password")?;
        put_cstring(buf, &self.system_type, MAX_SYSTEM_TYPE, "system_type")?;
        buf.put_u8(self.interface_version.as_byte());
        buf.put_u8(self.addr_ton.as_byte());
        buf.put_u8(self.addr_npi.as_byte());
        put_cstring(buf, &self.address_range, MAX_ADDRESS_RANGE, "address_range")?;
        Ok(())
    }
}

/// Body of the three bind responses: the SMSC identity plus an optional
/// sc_interface_version TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindResponse {
    pub bind_type: BindType,
    pub system_id: String,
    pub sc_interface_version: Option<u8>,
}

impl BindResponse {
    pub fn new(bind_type: BindType, system_id: impl Into<String>) -> Self {
        Self {
            bind_type,
            system_id: system_id.into(),
            sc_interface_version: None,
        }
    }

    /// Error responses may omit the body entirely.
    pub fn empty(bind_type: BindType) -> Self {
        Self::new(bind_type, "")
    }

    pub fn decode(bind_type: BindType, buf: &mut Bytes) -> Result<Self> {
        let system_id = get_cstring(buf, MAX_SYSTEM_ID, "system_id")?;
        let tlvs = Tlv::decode_all(buf)?;
        let sc_interface_version = Tlv::find(&tlvs, tags::SC_INTERFACE_VERSION)
            .and_then(|t| t.value.first().copied());
        Ok(Self {
            bind_type,
            system_id,
            sc_interface_version,
        })
    }
}

impl Body for BindResponse {
    fn command_id(&self) -> CommandId {
        match self.bind_type {
            BindType::Transmitter => CommandId::BindTransmitterResp,
            BindType::Receiver => CommandId::BindReceiverResp,
            BindType::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.system_id, MAX_SYSTEM_ID, "system_id")?;
        if let Some(v) = self.sc_interface_version {
            tlv::encode_all(
                &[Tlv::new(tags::SC_INTERFACE_VERSION, vec![v])],
                buf,
            )?;
        }
        Ok(())
    }
}
