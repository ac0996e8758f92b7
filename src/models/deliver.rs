// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::{Error, Result},
    models::{
        command_id::CommandId,
        pdu::Body,
        tlv::{self, Tlv, tags},
        types::{
            Address, EsmClass, MAX_ADDR, MAX_MESSAGE_ID, MAX_SERVICE_TYPE,
            MAX_SHORT_MESSAGE, MAX_TIME, RegisteredDelivery, get_cstring, get_u8,
            put_cstring,
        },
    },
};

/// deliver_sm: an SMSC-originated message or delivery receipt. Same field
/// list as submit_sm; schedule_delivery_time and validity_period are null on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverSm {
    pub service_type: String,
    pub source: Address,
    pub dest: Address,
    pub esm_class: EsmClass,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub registered_delivery: RegisteredDelivery,
    pub data_coding: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl DeliverSm {
    /// esm_class message-type bits mark delivery receipts.
    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class.contains(EsmClass::TYPE_DELIVERY_RECEIPT)
    }

    /// The receipted_message_id TLV, when the SMSC sends receipts with it.
    /// The value is a C-octet string; a trailing NUL is stripped.
    pub fn receipted_message_id(&self) -> Option<String> {
        Tlv::find(&self.tlvs, tags::RECEIPTED_MESSAGE_ID).map(|t| {
            let raw = t.value.strip_suffix(&[0u8]).unwrap_or(&t.value);
            String::from_utf8_lossy(raw).into_owned()
        })
    }

    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let service_type = get_cstring(buf, MAX_SERVICE_TYPE, "service_type")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let dest = Address::decode(buf, MAX_ADDR, "destination_addr")?;
        let esm_class = EsmClass::from_bits_retain(get_u8(buf, "esm_class")?);
        let protocol_id = get_u8(buf, "protocol_id")?;
        let priority_flag = get_u8(buf, "priority_flag")?;
        // Fixed-null in deliver_sm, still framed as C-octet strings.
        let _ = get_cstring(buf, MAX_TIME, "schedule_delivery_time")?;
        let _ = get_cstring(buf, MAX_TIME, "validity_period")?;
        let registered_delivery =
            RegisteredDelivery::from_bits_retain(get_u8(buf, "registered_delivery")?);
        let _ = get_u8(buf, "replace_if_present_flag")?;
        let data_coding = get_u8(buf, "data_coding")?;
        let _ = get_u8(buf, "sm_default_msg_id")?;
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
            registered_delivery,
            data_coding,
            short_message,
            tlvs,
        })
    }
}

impl Body for DeliverSm {
    fn command_id(&self) -> CommandId {
        CommandId::DeliverSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.short_message.len() > MAX_SHORT_MESSAGE {
            return Err(Error::encoding(format!(
                "short_message exceeds {MAX_SHORT_MESSAGE} octets"
            )));
        }
        put_cstring(buf, &self.service_type, MAX_SERVICE_TYPE, "service_type")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        self.dest.encode(buf, MAX_ADDR, "destination_addr")?;
        buf.put_u8(self.esm_class.bits());
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        buf.put_u8(0); // schedule_delivery_time
        buf.put_u8(0); // validity_period
        buf.put_u8(self.registered_delivery.bits());
        buf.put_u8(0); // replace_if_present_flag
        buf.put_u8(self.data_coding);
        buf.put_u8(0); // sm_default_msg_id
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);
        tlv::encode_all(&self.tlvs, buf)
    }
}

/// deliver_sm_resp: message_id is unused and null on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverSmResp {
    pub message_id: String,
}

impl DeliverSmResp {
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        Ok(Self { message_id })
    }
}

impl Body for DeliverSmResp {
    fn command_id(&self) -> CommandId {
        CommandId::DeliverSmResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")
    }
}
