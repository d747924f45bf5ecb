//! Per-game-version profiles
//!
//! A profile names a game build by its title id and records the planet list
//! and the fixed memory addresses tooling needs for that build. Profiles are
//! loaded once from TOML and passed around by reference.
//!
//! ```toml
//! [[profile]]
//! title_id = "NPEA00385"
//! name = "Ratchet & Clank (HD)"
//! planets = ["Veldin", "Novalis"]
//!
//! [profile.addresses]
//! n_gold_bolts_collected = 0x00aff000
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title id of the build the built-in profile describes.
pub const BUILTIN_TITLE_ID: &str = "NPEA00385";

/// Errors that can occur while loading profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate profile for title id {0}")]
    DuplicateTitle(String),
}

/// Static tables for one game build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProfile {
    pub title_id: String,
    pub name: String,
    #[serde(default)]
    pub planets: Vec<String>,
    #[serde(default)]
    pub addresses: BTreeMap<String, u32>,
}

impl GameProfile {
    pub fn address(&self, name: &str) -> Option<u32> {
        self.addresses.get(name).copied()
    }

    /// Index of a planet by name, case-insensitive.
    pub fn planet_index(&self, name: &str) -> Option<usize> {
        self.planets
            .iter()
            .position(|planet| planet.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profile: Vec<GameProfile>,
}

/// Immutable set of profiles keyed by title id.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: HashMap<String, GameProfile>,
}

impl ProfileSet {
    /// Build a set, rejecting duplicate title ids.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = GameProfile>,
    ) -> Result<Self, ProfileError> {
        let mut map = HashMap::new();
        for profile in profiles {
            if map.contains_key(&profile.title_id) {
                return Err(ProfileError::DuplicateTitle(profile.title_id));
            }
            map.insert(profile.title_id.clone(), profile);
        }
        Ok(Self { profiles: map })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = toml::from_str(content)?;
        let set = Self::from_profiles(file.profile)?;
        tracing::debug!(count = set.len(), "Parsed game profiles");
        Ok(set)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), count = set.len(), "Loaded game profiles");
        Ok(set)
    }

    /// Profiles shipped with the library.
    pub fn builtin() -> Self {
        let profile = GameProfile {
            title_id: BUILTIN_TITLE_ID.to_string(),
            name: "Ratchet & Clank (HD)".to_string(),
            planets: [
                "Veldin",
                "Novalis",
                "Aridia",
                "Kerwan",
                "Eudora",
                "Rilgar",
                "Blarg",
                "Umbris",
                "Batalia",
                "Gaspar",
                "Orxon",
                "Pokitaru",
                "Hoven",
                "Gemlik",
                "Oltanis",
                "Quartu",
                "Kalebo III",
                "Drek's Fleet",
                "Veldin 2",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            addresses: [
                ("n_gold_bolts_collected", 0x00AF_F000),
                ("collected_bolt", 0x00AF_F004),
                ("gold_bolt_update_func", 0x001D_9D48),
            ]
            .into_iter()
            .map(|(name, address)| (name.to_string(), address))
            .collect(),
        };

        let mut profiles = HashMap::new();
        profiles.insert(profile.title_id.clone(), profile);
        Self { profiles }
    }

    pub fn get(&self, title_id: &str) -> Option<&GameProfile> {
        self.profiles.get(title_id)
    }

    /// Look up a named address for a title.
    pub fn resolve_address(&self, title_id: &str, name: &str) -> Option<u32> {
        self.get(title_id)?.address(name)
    }

    /// Profiles sorted by title id.
    pub fn iter(&self) -> impl Iterator<Item = &GameProfile> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.title_id.cmp(&b.title_id));
        profiles.into_iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
