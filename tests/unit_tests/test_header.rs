// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use anyhow::Result;
use smpp_client_rs::models::{
    command_id::CommandId,
    header::{HEADER_LEN, MAX_PDU_LEN, PduHeader},
    pdu::{Pdu, PduBody},
};

use super::load_fixture;

#[test]
fn test_enquire_link_frame() -> Result<()> {
    let bytes = load_fixture("tests/unit_tests/fixtures/link/enquire_link.hex")?;
    assert_eq!(bytes.len(), HEADER_LEN);

    let mut buf = [0u8; HEADER_LEN];
    buf.copy_from_slice(&bytes);
    let header = PduHeader::from_bytes(&buf);

    assert_eq!(header.command_length.get(), 16);
    assert_eq!(header.command_id.get(), CommandId::EnquireLink.as_u32());
    assert_eq!(header.command_status.get(), 0);
    assert_eq!(header.sequence_number.get(), 5);
    assert!(!header.is_response());
    assert_eq!(header.body_len()?, 0);

    let pdu = Pdu::decode_frame(&bytes)?;
    assert!(matches!(pdu.body, PduBody::EnquireLink(_)));
    assert_eq!(pdu.sequence_number, 5);

    // Round-trip back to the fixture bytes.
    let encoded = pdu.encode()?;
    assert_eq!(&encoded[..], &bytes[..]);
    Ok(())
}

#[test]
fn test_command_length_bounds() {
    let short = PduHeader::new(8, 0x15, 0, 1);
    assert!(short.body_len().is_err());

    let huge = PduHeader::new((MAX_PDU_LEN + 1) as u32, 0x15, 0, 1);
    assert!(huge.body_len().is_err());

    let ok = PduHeader::new(16, 0x15, 0, 1);
    assert_eq!(ok.body_len().expect("in bounds"), 0);
}

#[test]
fn test_response_bit() {
    let resp = PduHeader::new(16, 0x8000_0004, 0, 9);
    assert!(resp.is_response());
    let req = PduHeader::new(16, 0x0000_0004, 0, 9);
    assert!(!req.is_response());
}
