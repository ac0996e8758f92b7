// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use bytes::{Buf, BufMut, Bytes, BytesMut};
use enum_dispatch::enum_dispatch;
use tracing::debug;

use crate::{
    cfg::enums::BindType,
    error::{Error, Result},
    models::{
        alert::AlertNotification,
        bind::{BindRequest, BindResponse},
        cancel::{CancelSm, CancelSmResp},
        command_id::CommandId,
        data::{DataSm, DataSmResp},
        deliver::{DeliverSm, DeliverSmResp},
        header::{HEADER_LEN, MAX_PDU_LEN, PduHeader},
        link::{EnquireLink, EnquireLinkResp, GenericNack, Unbind, UnbindResp},
        outbind::Outbind,
        query::{QuerySm, QuerySmResp},
        replace::{ReplaceSm, ReplaceSmResp},
        status::CommandStatus,
        submit::{SubmitSm, SubmitSmResp},
        submit_multi::{SubmitMulti, SubmitMultiResp},
    },
};

/// Serialization half of a PDU body. Decoding is per-type (`T::decode`) and
/// dispatched by [`Pdu::decode`], since the command id is only known from the
/// header.
#[enum_dispatch]
pub trait Body {
    /// Command id this body travels under.
    fn command_id(&self) -> CommandId;

    /// Appends the mandatory fields and trailing TLVs to `buf`.
    fn encode(&self, buf: &mut BytesMut) -> Result<()>;
}

/// Every PDU body we speak, requests and responses alike. The three bind
/// requests share [`BindRequest`] (its `bind_type` picks the command id), as
/// do the three bind responses.
#[enum_dispatch(Body)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PduBody {
    Bind(BindRequest),
    BindResp(BindResponse),
    Outbind(Outbind),
    Unbind(Unbind),
    UnbindResp(UnbindResp),
    SubmitSm(SubmitSm),
    SubmitSmResp(SubmitSmResp),
    SubmitMulti(SubmitMulti),
    SubmitMultiResp(SubmitMultiResp),
    DeliverSm(DeliverSm),
    DeliverSmResp(DeliverSmResp),
    DataSm(DataSm),
    DataSmResp(DataSmResp),
    QuerySm(QuerySm),
    QuerySmResp(QuerySmResp),
    CancelSm(CancelSm),
    CancelSmResp(CancelSmResp),
    ReplaceSm(ReplaceSm),
    ReplaceSmResp(ReplaceSmResp),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResp),
    AlertNotification(AlertNotification),
    GenericNack(GenericNack),
}

/// One framed SMPP PDU: header bookkeeping plus a typed body.
/// command_length and command_id are derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub body: PduBody,
}

impl Pdu {
    pub fn request(sequence_number: u32, body: impl Into<PduBody>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            body: body.into(),
        }
    }

    pub fn response(
        sequence_number: u32,
        command_status: CommandStatus,
        body: impl Into<PduBody>,
    ) -> Self {
        Self {
            command_status,
            sequence_number,
            body: body.into(),
        }
    }

    #[inline]
    pub fn command_id(&self) -> CommandId {
        self.body.command_id()
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }

    /// Serializes header and body into one wire frame.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_bytes(0, HEADER_LEN);
        self.body.encode(&mut buf)?;
        let total = buf.len();
        if total > MAX_PDU_LEN {
            return Err(Error::encoding(format!(
                "encoded PDU is {total} octets, limit {MAX_PDU_LEN}"
            )));
        }
        let header = PduHeader::new(
            total as u32,
            self.command_id().as_u32(),
            self.command_status.as_u32(),
            self.sequence_number,
        );
        header.write_to(&mut buf[..HEADER_LEN])?;
        Ok(buf.freeze())
    }

    /// Decodes the body for an already-parsed header. Error responses are
    /// allowed to omit their body entirely.
    pub fn decode(command: CommandId, header: &PduHeader, mut body: Bytes) -> Result<Self> {
        let command_status = CommandStatus::from_u32(header.command_status.get());
        let sequence_number = header.sequence_number.get();

        let decoded = if command.is_response()
            && !command_status.is_ok()
            && !body.has_remaining()
        {
            empty_response_body(command)
        } else {
            let parsed = decode_body(command, &mut body)?;
            if body.has_remaining() {
                debug!(
                    "{command}: {} trailing octets ignored",
                    body.remaining()
                );
            }
            parsed
        };

        Ok(Pdu {
            command_status,
            sequence_number,
            body: decoded,
        })
    }

    /// Parses a whole frame (header + body). Mostly for tests and tooling;
    /// the reader frames incrementally off the socket.
    pub fn decode_frame(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_LEN {
            return Err(Error::invalid("frame shorter than a PDU header"));
        }
        let mut header_buf = [0u8; HEADER_LEN];
        header_buf.copy_from_slice(&frame[..HEADER_LEN]);
        let header = PduHeader::from_bytes(&header_buf);
        if header.command_length.get() as usize != frame.len() {
            return Err(Error::invalid(format!(
                "command_length {} does not match frame size {}",
                header.command_length.get(),
                frame.len()
            )));
        }
        let command = CommandId::from_u32(header.command_id.get()).ok_or_else(|| {
            Error::invalid(format!("unknown command_id {:#010x}", header.command_id.get()))
        })?;
        Pdu::decode(command, &header, Bytes::copy_from_slice(&frame[HEADER_LEN..]))
    }
}

fn decode_body(command: CommandId, buf: &mut Bytes) -> Result<PduBody> {
    Ok(match command {
        CommandId::BindTransmitter => BindRequest::decode(BindType::Transmitter, buf)?.into(),
        CommandId::BindReceiver => BindRequest::decode(BindType::Receiver, buf)?.into(),
        CommandId::BindTransceiver => BindRequest::decode(BindType::Transceiver, buf)?.into(),
        CommandId::BindTransmitterResp => {
            BindResponse::decode(BindType::Transmitter, buf)?.into()
        },
        CommandId::BindReceiverResp => BindResponse::decode(BindType::Receiver, buf)?.into(),
        CommandId::BindTransceiverResp => {
            BindResponse::decode(BindType::Transceiver, buf)?.into()
        },
        CommandId::Outbind => Outbind::decode(buf)?.into(),
        CommandId::Unbind => Unbind.into(),
        CommandId::UnbindResp => UnbindResp.into(),
        CommandId::SubmitSm => SubmitSm::decode(buf)?.into(),
        CommandId::SubmitSmResp => SubmitSmResp::decode(buf)?.into(),
        CommandId::SubmitMulti => SubmitMulti::decode(buf)?.into(),
        CommandId::SubmitMultiResp => SubmitMultiResp::decode(buf)?.into(),
        CommandId::DeliverSm => DeliverSm::decode(buf)?.into(),
        CommandId::DeliverSmResp => DeliverSmResp::decode(buf)?.into(),
        CommandId::DataSm => DataSm::decode(buf)?.into(),
        CommandId::DataSmResp => DataSmResp::decode(buf)?.into(),
        CommandId::QuerySm => QuerySm::decode(buf)?.into(),
        CommandId::QuerySmResp => QuerySmResp::decode(buf)?.into(),
        CommandId::CancelSm => CancelSm::decode(buf)?.into(),
        CommandId::CancelSmResp => CancelSmResp.into(),
        CommandId::ReplaceSm => ReplaceSm::decode(buf)?.into(),
        CommandId::ReplaceSmResp => ReplaceSmResp.into(),
        CommandId::EnquireLink => EnquireLink.into(),
        CommandId::EnquireLinkResp => EnquireLinkResp.into(),
        CommandId::AlertNotification => AlertNotification::decode(buf)?.into(),
        CommandId::GenericNack => GenericNack.into(),
    })
}

/// Stand-in bodies for error responses that arrive with nothing after the
/// header.
fn empty_response_body(command: CommandId) -> PduBody {
    match command {
        CommandId::BindTransmitterResp => BindResponse::empty(BindType::Transmitter).into(),
        CommandId::BindReceiverResp => BindResponse::empty(BindType::Receiver).into(),
        CommandId::BindTransceiverResp => BindResponse::empty(BindType::Transceiver).into(),
        CommandId::SubmitSmResp => SubmitSmResp::default().into(),
        CommandId::SubmitMultiResp => SubmitMultiResp::default().into(),
        CommandId::DeliverSmResp => DeliverSmResp::default().into(),
        CommandId::DataSmResp => DataSmResp::default().into(),
        CommandId::QuerySmResp => QuerySmResp::default().into(),
        CommandId::CancelSmResp => CancelSmResp.into(),
        CommandId::ReplaceSmResp => ReplaceSmResp.into(),
        CommandId::UnbindResp => UnbindResp.into(),
        CommandId::EnquireLinkResp => EnquireLinkResp.into(),
        // Requests never take this path; give them their empty-body forms
        // anyway rather than panicking on a hostile peer.
        CommandId::GenericNack => GenericNack.into(),
        CommandId::Unbind => Unbind.into(),
        CommandId::EnquireLink => EnquireLink.into(),
        _ => GenericNack.into(),
    }
}
