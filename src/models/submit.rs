// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::{Error, Result},
    models::{
        command_id::CommandId,
        pdu::Body,
        tlv::{self, Tlv},
        types::{
            Address, EsmClass, MAX_ADDR, MAX_MESSAGE_ID, MAX_SERVICE_TYPE,
            MAX_SHORT_MESSAGE, MAX_TIME, RegisteredDelivery, get_cstring, get_u8,
            put_cstring,
        },
    },
};

/// submit_sm: one short message from the ESME to a single destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitSm {
    pub service_type: String,
    pub source: Address,
    pub dest: Address,
    pub esm_class: EsmClass,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: RegisteredDelivery,
    pub replace_if_present: bool,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl SubmitSm {
    pub fn builder() -> SubmitSmBuilder {
        SubmitSmBuilder::default()
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let service_type = get_cstring(buf, MAX_SERVICE_TYPE, "service_type")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let dest = Address::decode(buf, MAX_ADDR, "destination_addr")?;
        let esm_class = EsmClass::from_bits_retain(get_u8(buf, "esm_class")?);
        let protocol_id = get_u8(buf, "protocol_id")?;
        let priority_flag = get_u8(buf, "priority_flag")?;
        let schedule_delivery_time =
            get_cstring(buf, MAX_TIME, "schedule_delivery_time")?;
        let validity_period = get_cstring(buf, MAX_TIME, "validity_period")?;
        let registered_delivery =
            RegisteredDelivery::from_bits_retain(get_u8(buf, "registered_delivery")?);
        let replace_if_present = get_u8(buf, "replace_if_present_flag")? != 0;
        let data_coding = get_u8(buf, "data_coding")?;
        let sm_default_msg_id = get_u8(buf, "sm_default_msg_id")?;
        let sm_length = get_u8(buf, "sm_length")? as usize;
        if buf.remaining() < sm_length {
            return Err(Error::invalid("sm_length exceeds remaining body"));
        }
        let short_message = buf.split_to(sm_length);
        let tlvs = Tlv::decode_all(buf)?;
        Ok(Self {
            service_type,
            source,
            dest,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present,
            data_coding,
            sm_default_msg_id,
            short_message,
            tlvs,
        })
    }
}

impl Body for SubmitSm {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.short_message.len() > MAX_SHORT_MESSAGE {
            return Err(Error::encoding(format!(
                "short_message exceeds {MAX_SHORT_MESSAGE} octets; use a message_payload TLV"
            )));
        }
        put_cstring(buf, &self.service_type, MAX_SERVICE_TYPE, "service_type")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        self.dest.encode(buf, MAX_ADDR, "destination_addr")?;
        buf.put_u8(self.esm_class.bits());
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        put_cstring(
            buf,
            &self.schedule_delivery_time,
            MAX_TIME,
            "schedule_delivery_time",
        )?;
        put_cstring(buf, &self.validity_period, MAX_TIME, "validity_period")?;
        buf.put_u8(self.registered_delivery.bits());
        buf.put_u8(self.replace_if_present as u8);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);
        tlv::encode_all(&self.tlvs, buf)
    }
}

/// Chained constructor for [`SubmitSm`]; length rules are checked at encode
/// time so building never fails.
#[derive(Debug, Default)]
pub struct SubmitSmBuilder {
    inner: SubmitSm,
}

impl SubmitSmBuilder {
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

    pub fn protocol_id(mut self, protocol_id: u8) -> Self {
        self.inner.protocol_id = protocol_id;
        self
    }

    pub fn priority_flag(mut self, priority_flag: u8) -> Self {
        self.inner.priority_flag = priority_flag;
        self
    }

    pub fn schedule_delivery_time(mut self, t: impl Into<String>) -> Self {
        self.inner.schedule_delivery_time = t.into();
        self
    }

    pub fn validity_period(mut self, t: impl Into<String>) -> Self {
        self.inner.validity_period = t.into();
        self
    }

    pub fn registered_delivery(mut self, rd: RegisteredDelivery) -> Self {
        self.inner.registered_delivery = rd;
        self
    }

    pub fn replace_if_present(mut self) -> Self {
        self.inner.replace_if_present = true;
        self
    }

    pub fn data_coding(mut self, data_coding: u8) -> Self {
        self.inner.data_coding = data_coding;
        self
    }

    pub fn sm_default_msg_id(mut self, id: u8) -> Self {
        self.inner.sm_default_msg_id = id;
        self
    }

    pub fn short_message(mut self, payload: impl Into<Bytes>) -> Self {
        self.inner.short_message = payload.into();
        self
    }

    pub fn tlv(mut self, tlv: Tlv) -> Self {
        self.inner.tlvs.push(tlv);
        self
    }

    pub fn build(self) -> SubmitSm {
        self.inner
    }
}

/// submit_sm_resp: the SMSC-assigned message id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitSmResp {
    pub message_id: String,
}

impl SubmitSmResp {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        Ok(Self { message_id })
    }
}

impl Body for SubmitSmResp {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitSmResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")
    }
}
