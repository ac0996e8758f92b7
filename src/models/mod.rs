//! SMPP PDU model layer: the fixed 16-byte header, command and status
//! enumerations, per-command bodies and the decode dispatch.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

pub mod alert;
pub mod bind;
pub mod cancel;
pub mod command_id;
pub mod data;
pub mod deliver;
pub mod header;
pub mod link;
pub mod outbind;
pub mod pdu;
pub mod query;
pub mod replace;
pub mod status;
pub mod submit;
pub mod submit_multi;
pub mod tlv;
pub mod types;
