// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

//! Bodiless session-management PDUs: enquire_link, unbind and generic_nack.

use bytes::BytesMut;

use crate::{error::Result, models::{command_id::CommandId, pdu::Body}};

/// enquire_link: the liveness probe. Always legal on a bound session and
/// must be answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnquireLink;

impl Body for EnquireLink {
    fn command_id(&self) -> CommandId {
        CommandId::EnquireLink
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnquireLinkResp;

impl Body for EnquireLinkResp {
    fn command_id(&self) -> CommandId {
        CommandId::EnquireLinkResp
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}

/// unbind: either side asks to end the SMPP session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbind;

impl Body for Unbind {
    fn command_id(&self) -> CommandId {
        CommandId::Unbind
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnbindResp;

impl Body for UnbindResp {
    fn command_id(&self) -> CommandId {
        CommandId::UnbindResp
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}

/// generic_nack: the response of last resort, used when the offending PDU's
/// command id is unknown or its framing is broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericNack;

impl Body for GenericNack {
    fn command_id(&self) -> CommandId {
        CommandId::GenericNack
    }

    fn encode(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}
