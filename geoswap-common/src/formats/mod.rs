//! Binary asset record formats
//!
//! All formats are big-endian with no magic bytes; which codec applies is
//! decided by where the data came from. Fixed-size records implement the
//! [`BinarySerializable`] trait on top of a static layout table.

pub mod collision;
pub mod moby;
mod serialization;
pub mod shrub;
pub mod texture_config;

pub use collision::{CollisionChunk, CollisionFace, CollisionMesh, decode_chunk};
pub use moby::{MOBY_LAYOUT, MobyRecord};
pub use serialization::BinarySerializable;
pub use shrub::{
    CullingSphere, SHRUB_HEADER_LAYOUT, SHRUB_HEADER_SIZE, ShrubBodyLayout, ShrubHeader,
    ShrubModel, ShrubPassthrough,
};
pub use texture_config::{TEXTURE_CONFIG_LAYOUT, TextureConfig};
