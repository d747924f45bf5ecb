//! Moby inspection from memory dumps

use anyhow::{Context, Result, bail};
use geoswap_common::{BinarySerializable, MobyRecord, ProfileSet};
use std::path::Path;

use crate::parse_hex;

/// Where to find a moby: a raw address or a named profile address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MobyTarget {
    Address(usize),
    Named(String),
}

impl MobyTarget {
    /// `0x`-prefixed values are addresses; anything else is looked up by
    /// name first (see [`MobyTarget::resolve`]).
    pub fn parse(s: &str) -> Self {
        if s.starts_with("0x") || s.starts_with("0X") {
            if let Ok(address) = parse_hex(s) {
                return Self::Address(address);
            }
        }
        Self::Named(s.to_string())
    }

    pub fn resolve(&self, profiles: &ProfileSet, title_id: &str) -> Result<usize> {
        match self {
            Self::Address(address) => Ok(*address),
            Self::Named(name) => {
                let named = profiles
                    .get(title_id)
                    .and_then(|profile| profile.address(name));
                if let Some(address) = named {
                    return Ok(address as usize);
                }
                // Bare hex without a prefix, when no profile name matches
                if let Ok(address) = parse_hex(name) {
                    return Ok(address);
                }
                if profiles.get(title_id).is_none() {
                    bail!("Unknown game title id: {}", title_id);
                }
                bail!("No address named {:?} for {}", name, title_id)
            }
        }
    }
}

/// Read the moby at `address` from a dump whose first byte maps to `base`.
pub fn read_moby(dump: &Path, address: usize, base: usize) -> Result<MobyRecord> {
    let bytes = std::fs::read(dump).with_context(|| format!("Failed to read dump: {:?}", dump))?;
    let Some(offset) = address.checked_sub(base) else {
        bail!("Address {:#x} is below dump base {:#x}", address, base);
    };

    let record = MobyRecord::deserialize_at(&bytes, offset)
        .with_context(|| format!("Failed to decode moby at {:#x}", address))?;
    tracing::info!(
        "Decoded moby at {:#x}: type={:#x}, state={}",
        address,
        record.moby_type,
        record.state
    );
    Ok(record)
}
