// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::enums::{BindType, InterfaceVersion, Npi, Ton};

// C-octet string capacities from the bind_* field table, including the
// terminating null.
const MAX_SYSTEM_ID: usize = 16;
const MAX_PASSWORD: usize = 9;
const MAX_SYSTEM_TYPE: usize = 13;
const MAX_ADDRESS_RANGE: usize = 41;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Parameters that travel over the wire in the bind request.
    pub bind: BindConfig,
    /// Implementation/runtime parameters that live outside the SMPP protocol.
    pub runtime: RuntimeConfig,
}

/// Everything the SMSC sees during session establishment.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BindConfig {
    #[serde(rename = "BindType")]
    /// Requested bind direction (Transmitter, Receiver or Transceiver).
    pub bind_type: BindType,

    #[serde(rename = "SystemId")]
    /// ESME identity presented to the SMSC (mandatory).
    pub system_id: String,

    #[serde(default, rename = "Password")]
    /// Authentication secret; may be empty when the SMSC does not require one.
    pub password: String,

    #[serde(default, rename = "SystemType")]
    /// ESME categorisation string, often empty.
    pub system_type: String,

    #[serde(default, rename = "InterfaceVersion")]
    /// Protocol version advertised in the bind request.
    pub interface_version: InterfaceVersion,

    #[serde(default, rename = "AddrTon")]
    /// Type-of-number for the address range.
    pub addr_ton: Ton,

    #[serde(default, rename = "AddrNpi")]
    /// Numbering-plan indicator for the address range.
    pub addr_npi: Npi,

    #[serde(default, rename = "AddressRange")]
    /// Routing hint telling the SMSC which addresses this receiver serves.
    pub address_range: String,
}

/// Runtime-only settings that never go on the wire.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RuntimeConfig {
    #[serde(rename = "TargetAddress")]
    /// SMSC endpoint as `host:port`.
    pub target_address: String,

    #[serde(
        default = "default_connect_timeout",
        rename = "ConnectTimeout",
        with = "serde_millis"
    )]
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,

    #[serde(
        default = "default_enquire_link_timer",
        rename = "EnquireLinkTimer",
        with = "serde_millis"
    )]
    /// Socket read timeout and keepalive cadence.
    pub enquire_link_timer: Duration,

    #[serde(
        default = "default_transaction_timer",
        rename = "TransactionTimer",
        with = "serde_millis"
    )]
    /// Default per-request response deadline.
    pub transaction_timer: Duration,

    #[serde(default = "default_processor_degree", rename = "PduProcessorDegree")]
    /// Worker count for inbound PDU processing once bound. Fixed at session
    /// construction.
    pub pdu_processor_degree: usize,

    #[serde(default = "default_queue_capacity", rename = "QueueCapacity")]
    /// Bounded queue length for the processor pool.
    pub queue_capacity: usize,
}

fn default_connect_timeout() -> Duration {
    Duration::from_millis(10_000)
}

fn default_enquire_link_timer() -> Duration {
    Duration::from_millis(60_000)
}

fn default_transaction_timer() -> Duration {
    Duration::from_millis(2_000)
}

fn default_processor_degree() -> usize {
    3
}

fn default_queue_capacity() -> usize {
    100
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_address: String::new(),
            connect_timeout: default_connect_timeout(),
            enquire_link_timer: default_enquire_link_timer(),
            transaction_timer: default_transaction_timer(),
            pdu_processor_degree: default_processor_degree(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value. Relative paths resolve against the current working
    /// directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = resolve_path(path.as_ref())?;
        let s = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {path:?}"))?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Minimal in-memory configuration, mostly for tests and embedding.
    pub fn for_target(
        target_address: impl Into<String>,
        bind_type: BindType,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Config {
            bind: BindConfig {
                bind_type,
                system_id: system_id.into(),
                password: password.into(),
                system_type: String::new(),
                interface_version: InterfaceVersion::default(),
                addr_ton: Ton::default(),
                addr_npi: Npi::default(),
                address_range: String::new(),
            },
            runtime: RuntimeConfig {
                target_address: target_address.into(),
                ..RuntimeConfig::default()
            },
        }
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            !self.bind.system_id.is_empty(),
            "SystemId must not be empty"
        );
        ensure!(
            self.bind.system_id.len() < MAX_SYSTEM_ID,
            "SystemId must be shorter than {MAX_SYSTEM_ID} octets"
        );
        ensure!(
            self.bind.password.len() < MAX_PASSWORD,
            "Password must be shorter than {MAX_PASSWORD} octets"
        );
        ensure!(
            self.bind.system_type.len() < MAX_SYSTEM_TYPE,
            "SystemType must be shorter than {MAX_SYSTEM_TYPE} octets"
        );
        ensure!(
            self.bind.address_range.len() < MAX_ADDRESS_RANGE,
            "AddressRange must be shorter than {MAX_ADDRESS_RANGE} octets"
        );

        ensure!(
            !self.runtime.target_address.is_empty(),
            "TargetAddress must not be empty"
        );
        ensure!(
            self.runtime.pdu_processor_degree >= 1,
            "PduProcessorDegree must be >= 1"
        );
        ensure!(
            self.runtime.queue_capacity >= 1,
            "QueueCapacity must be >= 1"
        );
        ensure!(
            !self.runtime.transaction_timer.is_zero(),
            "TransactionTimer must be > 0"
        );
        ensure!(
            !self.runtime.enquire_link_timer.is_zero(),
            "EnquireLinkTimer must be > 0"
        );

        Ok(())
    }
}

fn resolve_path(p: &Path) -> Result<std::path::PathBuf> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };
    Ok(abs)
}

/// Serde helpers for representing `Duration` as a number of milliseconds.
mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}
