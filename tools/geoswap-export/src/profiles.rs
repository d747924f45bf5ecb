//! Profile loading for the tool

use anyhow::{Context, Result};
use geoswap_common::ProfileSet;
use std::path::Path;

/// Load profiles from `path`, or fall back to the built-in set.
pub fn load_profiles(path: Option<&Path>) -> Result<ProfileSet> {
    match path {
        Some(path) => ProfileSet::load(path)
            .with_context(|| format!("Failed to load profiles: {:?}", path)),
        None => Ok(ProfileSet::builtin()),
    }
}
