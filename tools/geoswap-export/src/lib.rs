//! geoswap-export library
//!
//! File-level commands over `geoswap-common`: shrub and moby inspection, OBJ
//! to collision conversion, and profile loading. The codec crate never
//! touches the filesystem; everything that reads or writes files lives here.

pub mod collision;
pub mod moby;
pub mod obj;
pub mod profiles;
pub mod shrub;

use anyhow::{Context, Result};

pub use collision::{convert_obj_to_collision, convert_obj_to_memory};
pub use moby::{MobyTarget, read_moby};
pub use obj::parse_obj;
pub use profiles::load_profiles;
pub use shrub::{ShrubSummary, read_shrub};

/// Parse a hexadecimal number, with or without a `0x` prefix.
pub fn parse_hex(s: &str) -> Result<usize> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    usize::from_str_radix(digits, 16).with_context(|| format!("Invalid hex value: {:?}", s))
}
