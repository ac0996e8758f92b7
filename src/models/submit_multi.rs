// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::{Error, Result},
    models::{
        command_id::CommandId,
        pdu::Body,
        status::CommandStatus,
        tlv::{self, Tlv},
        types::{
            Address, EsmClass, MAX_ADDR, MAX_MESSAGE_ID, MAX_SERVICE_TYPE,
            MAX_SHORT_MESSAGE, MAX_TIME, RegisteredDelivery, get_cstring, get_u8,
            get_u32, put_cstring,
        },
    },
};

const DEST_FLAG_SME: u8 = 1;
const DEST_FLAG_DIST_LIST: u8 = 2;

/// One destination of a submit_multi: either an SME address or a
/// distribution-list name held by the SMSC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestAddress {
    Sme(Address),
    DistributionList(String),
}

impl DestAddress {
    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        match self {
            DestAddress::Sme(addr) => {
                buf.put_u8(DEST_FLAG_SME);
                addr.encode(buf, MAX_ADDR, "destination_addr")
            },
            DestAddress::DistributionList(name) => {
                buf.put_u8(DEST_FLAG_DIST_LIST);
                put_cstring(buf, name, MAX_ADDR, "dl_name")
            },
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        match get_u8(buf, "dest_flag")? {
            DEST_FLAG_SME => Ok(DestAddress::Sme(Address::decode(
                buf,
                MAX_ADDR,
                "destination_addr",
            )?)),
            DEST_FLAG_DIST_LIST => Ok(DestAddress::DistributionList(get_cstring(
                buf, MAX_ADDR, "dl_name",
            )?)),
            other => Err(Error::invalid(format!("dest_flag {other} unknown"))),
        }
    }
}

/// submit_multi: one short message fanned out to up to 255 destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitMulti {
    pub service_type: String,
    pub source: Address,
    pub dests: Vec<DestAddress>,
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

impl SubmitMulti {
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let service_type = get_cstring(buf, MAX_SERVICE_TYPE, "service_type")?;
        let source = Address::decode(buf, MAX_ADDR, "source_addr")?;
        let number_of_dests = get_u8(buf, "number_of_dests")? as usize;
        let mut dests = Vec::with_capacity(number_of_dests);
        for _ in 0..number_of_dests {
            dests.push(DestAddress::decode(buf)?);
        }
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
            dests,
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

impl Body for SubmitMulti {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitMulti
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.dests.is_empty() || self.dests.len() > u8::MAX as usize {
            return Err(Error::encoding(format!(
                "submit_multi requires 1..=255 destinations, got {}",
                self.dests.len()
            )));
        }
        if self.short_message.len() > MAX_SHORT_MESSAGE {
            return Err(Error::encoding(format!(
                "short_message exceeds {MAX_SHORT_MESSAGE} octets; use a message_payload TLV"
            )));
        }
        put_cstring(buf, &self.service_type, MAX_SERVICE_TYPE, "service_type")?;
        self.source.encode(buf, MAX_ADDR, "source_addr")?;
        buf.put_u8(self.dests.len() as u8);
        for dest in &self.dests {
            dest.encode(buf)?;
        }
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

/// A destination the SMSC refused, with its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsuccessSme {
    pub address: Address,
    pub error_status: CommandStatus,
}

/// submit_multi_resp: assigned message id plus the refused destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitMultiResp {
    pub message_id: String,
    pub unsuccess: Vec<UnsuccessSme>,
}

impl SubmitMultiResp {
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        let message_id = get_cstring(buf, MAX_MESSAGE_ID, "message_id")?;
        let no_unsuccess = get_u8(buf, "no_unsuccess")? as usize;
        let mut unsuccess = Vec::with_capacity(no_unsuccess);
        for _ in 0..no_unsuccess {
            let address = Address::decode(buf, MAX_ADDR, "unsuccess_sme")?;
            let error_status = CommandStatus::from_u32(get_u32(buf, "error_status_code")?);
            unsuccess.push(UnsuccessSme {
                address,
                error_status,
            });
        }
        Ok(Self {
            message_id,
            unsuccess,
        })
    }
}

impl Body for SubmitMultiResp {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitMultiResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_cstring(buf, &self.message_id, MAX_MESSAGE_ID, "message_id")?;
        buf.put_u8(self.unsuccess.len() as u8);
        for sme in &self.unsuccess {
            sme.address.encode(buf, MAX_ADDR, "unsuccess_sme")?;
            buf.put_u32(sme.error_status.as_u32());
        }
        Ok(())
    }
}
