// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use core::fmt;

use serde::{Deserialize, Serialize};

/// SMPP bind direction.
///
/// Chooses which of the three bind commands the session issues and therefore
/// which bound state it reaches: transmitter (submit only), receiver
/// (deliveries only) or transceiver (both over one connection).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    #[serde(rename = "Transmitter", alias = "transmitter", alias = "TX", alias = "tx")]
    Transmitter,
    #[serde(rename = "Receiver", alias = "receiver", alias = "RX", alias = "rx")]
    Receiver,
    #[serde(
        rename = "Transceiver",
        alias = "transceiver",
        alias = "TRX",
        alias = "trx"
    )]
    Transceiver,
}

impl fmt::Display for BindType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindType::Transmitter => "Transmitter",
            BindType::Receiver => "Receiver",
            BindType::Transceiver => "Transceiver",
        })
    }
}

/// interface_version byte carried in bind requests.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceVersion {
    #[default]
    #[serde(rename = "3.4", alias = "v34", alias = "34")]
    V34,
    #[serde(rename = "5.0", alias = "v50", alias = "50")]
    V50,
}

impl InterfaceVersion {
    pub fn as_byte(self) -> u8 {
        match self {
            InterfaceVersion::V34 => 0x34,
            InterfaceVersion::V50 => 0x50,
        }
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InterfaceVersion::V34 => "3.4",
            InterfaceVersion::V50 => "5.0",
        })
    }
}

/// Type-of-number for source, destination and ESME addresses.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ton {
    #[default]
    #[serde(rename = "Unknown", alias = "unknown")]
    Unknown,
    #[serde(rename = "International", alias = "international")]
    International,
    #[serde(rename = "National", alias = "national")]
    National,
    #[serde(rename = "NetworkSpecific", alias = "network-specific")]
    NetworkSpecific,
    #[serde(rename = "SubscriberNumber", alias = "subscriber-number")]
    SubscriberNumber,
    #[serde(rename = "Alphanumeric", alias = "alphanumeric")]
    Alphanumeric,
    #[serde(rename = "Abbreviated", alias = "abbreviated")]
    Abbreviated,
}

impl Ton {
    pub fn as_byte(self) -> u8 {
        match self {
            Ton::Unknown => 0x00,
            Ton::International => 0x01,
            Ton::National => 0x02,
            Ton::NetworkSpecific => 0x03,
            Ton::SubscriberNumber => 0x04,
            Ton::Alphanumeric => 0x05,
            Ton::Abbreviated => 0x06,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            0x01 => Ton::International,
            0x02 => Ton::National,
            0x03 => Ton::NetworkSpecific,
            0x04 => Ton::SubscriberNumber,
            0x05 => Ton::Alphanumeric,
            0x06 => Ton::Abbreviated,
            _ => Ton::Unknown,
        }
    }
}

/// Numbering-plan indicator.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Npi {
    #[default]
    #[serde(rename = "Unknown", alias = "unknown")]
    Unknown,
    #[serde(rename = "ISDN", alias = "isdn")]
    Isdn,
    #[serde(rename = "Data", alias = "data")]
    Data,
    #[serde(rename = "Telex", alias = "telex")]
    Telex,
    #[serde(rename = "LandMobile", alias = "land-mobile")]
    LandMobile,
    #[serde(rename = "National", alias = "national")]
    National,
    #[serde(rename = "Private", alias = "private")]
    Private,
    #[serde(rename = "ERMES", alias = "ermes")]
    Ermes,
    #[serde(rename = "Internet", alias = "internet")]
    Internet,
    #[serde(rename = "WapClientId", alias = "wap-client-id")]
    WapClientId,
}

impl Npi {
    pub fn as_byte(self) -> u8 {
        match self {
            Npi::Unknown => 0x00,
            Npi::Isdn => 0x01,
            Npi::Data => 0x03,
            Npi::Telex => 0x04,
            Npi::LandMobile => 0x06,
            Npi::National => 0x08,
            Npi::Private => 0x09,
            Npi::Ermes => 0x0a,
            Npi::Internet => 0x0e,
            Npi::WapClientId => 0x12,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            0x01 => Npi::Isdn,
            0x03 => Npi::Data,
            0x04 => Npi::Telex,
            0x06 => Npi::LandMobile,
            0x08 => Npi::National,
            0x09 => Npi::Private,
            0x0a => Npi::Ermes,
            0x0e => Npi::Internet,
            0x12 => Npi::WapClientId,
            _ => Npi::Unknown,
        }
    }
}
