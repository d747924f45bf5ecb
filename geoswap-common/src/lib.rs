//! Big-endian record codecs for console game geometry
//!
//! This crate converts between flat big-endian byte buffers (as found in game
//! files and memory dumps) and typed in-memory records:
//!
//! - [`primitives`] - Bounds-checked big-endian scalar, vector and string access
//! - [`align`] - Offset alignment helpers
//! - [`layout`] - Static record layout tables and the generic field codec
//! - [`formats`] - Texture configs, shrub models, collision chunks, mobys
//! - [`profile`] - Per-game-version address and planet tables
//!
//! Codecs are pure functions of their arguments. Malformed input yields a
//! [`CodecError`]; callers drop the record and carry on.

pub mod align;
pub mod error;
pub mod formats;
pub mod layout;
pub mod primitives;
pub mod profile;

pub use error::{CodecError, Result};
pub use layout::{FieldDesc, FieldKind, FieldValue, Fields, RecordLayout};
pub use profile::{GameProfile, ProfileError, ProfileSet};

// Re-export commonly used format items
pub use formats::{
    BinarySerializable,
    CollisionChunk,
    // Collision
    CollisionMesh,
    CullingSphere,
    MobyRecord,
    ShrubHeader,
    // Shrub
    ShrubModel,
    TextureConfig,
};
