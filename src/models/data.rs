// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    error::Result,
    models::{
        command_id::CommandId,
        pdu::Body,
        tlv::{self, Tlv, tags},
        types::{
            Address, EsmClass, MAX_ADDR, MAX_MESSAGE_ID, MAX_SERVICE_TYPE,
            RegisteredDelivery, get_cstring, get_u8, put_cstring,
        },
    },
};

/// data_sm: the TLV-only message operation; the payload travels in a
/// message_payload optional parameter instead of short_message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSm {
    pub service_type: String,
    pub source: Address,
    pub dest: Address,
    pub esm_class: EsmClass,
    pub registered_delivery: RegisteredDelivery,
    pub data_coding: u8,
    pub tlvs: Vec<Tlv>,
}

impl DataSm {
    pub fn builder() -> DataSmBuilder {
        DataSmBuilder::default()
    }

    pub fn message_payload(&self) -> Option<&Bytes> {
        Tlv::find(&self.tlvs, tags::MESSAGE_PAYLOAD).map(|t| &t.value)
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let service_type = get_cstring(buf, MAX_SERVICE_TYPE, "service_type")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let dest = Address::decode(buf, MAX_ADDR, "destination_addr")?;
        let esm_class = EsmClass::from_bits_retain(get_u8(buf, "esm_class")?);
        let registered_delivery =
            RegisteredDelivery::from_bits_retain(get_u8(buf, "registered_delivery")?);
        let data_coding = get_u8(buf, "data_coding")?;
        let tlvs = Tlv::decode_all(buf)?;
        Ok(Self {
            service_type,
            source,
            dest,
            esm_class,
            registered_delivery,
            data_coding,
            tlvs,
        })
    }
}

impl Body for DataSm {
    fn command_id(&self) -> CommandId {
        CommandId::DataSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.service_type, MAX_SERVICE_TYPE, "service_type")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        self.dest.encode(buf, MAX_ADDR, "destination_addr")?;
        buf.put_u8(self.esm_class.bits());
        buf.put_u8(self.registered_delivery.bits());
        buf.put_u8(self.data_coding);
        tlv::encode_all(&self.tlvs, buf)
    }
}

#[derive(Debug, Default)]
pub struct DataSmBuilder {
    inner: DataSm,
}

impl DataSmBuilder {
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.inner.service_type = service_type.into();
        self
    }

    pub fn source(mut self, source: Address) -> Self {
        self.inner.source = source;
        self
    }

    pub fn dest(mut self, dest: Address) -> Self {
        self.inner.dest = dest;
        self
    }

    pub fn esm_class(mut self, esm_class: EsmClass) -> Self {
        self.inner.esm_class = esm_class;
        self
    }

    pub fn registered_delivery(mut self, rd: RegisteredDelivery) -> Self {
        self.inner.registered_delivery = rd;
        self
    }

    pub fn data_coding(mut self, data_coding: u8) -> Self {
        self.inner.data_coding = data_coding;
        self
    }

    pub fn message_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.inner
            .tlvs
            .push(Tlv::new(tags::MESSAGE_PAYLOAD, payload.into()));
        self
    }

    pub fn tlv(mut self, tlv: Tlv) -> Self {
        self.inner.tlvs.push(tlv);
        self
    }

    pub fn build(self) -> DataSm {
        self.inner
    }
}

/// data_sm_resp: message id plus optional TLVs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSmResp {
    pub message_id: String,
    pub tlvs: Vec<Tlv>,
}

impl DataSmResp {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            tlvs: Vec::new(),
        }
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let tlvs = Tlv::decode_all(buf)?;
        Ok(Self { message_id, tlvs })
    }
}

impl Body for DataSmResp {
    fn command_id(&self) -> CommandId {
        CommandId::DataSmResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        tlv::encode_all(&self.tlvs, buf)
    }
}
