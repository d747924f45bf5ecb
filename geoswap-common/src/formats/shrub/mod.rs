//! Shrub model format
//!
//! Static decoration models. A fixed 64-byte header is followed (somewhere)
//! by four sub-buffers it points at. All values big-endian.
//!
//! # Header layout
//! ```text
//! 0x00: culling sphere   f32 x4 (x, y, z, radius)
//! 0x10: vertex_ptr       u32
//! 0x14: uv_ptr           u32
//! 0x18: index_ptr        u32
//! 0x1C: texture_ptr      u32
//! 0x20: off_20           u32
//! 0x24: vertex_count     i32
//! 0x28: texture_count    i16
//! 0x2A: off_2a           i16
//! 0x2C: off_2c           u32
//! 0x30: id               i16
//! 0x32: padding          2 bytes
//! 0x34: off_34           u32
//! 0x38: off_38           u32
//! 0x3C: off_3c           u32
//! ```
//!
//! # Sub-buffers
//! ```text
//! texture configs: texture_count x 16 bytes
//! vertices:        vertex_count x 24 bytes (position xyz, normal xyz)
//! uvs:             vertex_count x 8 bytes (u, v)
//! indices:         face_count x 3 x u16
//! ```
//!
//! The face count is not stored in the header; it comes from the file that
//! embeds the shrub.

mod body;
mod header;
mod model;

#[cfg(test)]
mod tests;

pub use body::ShrubBodyLayout;
pub use header::{SHRUB_HEADER_LAYOUT, ShrubHeader};
pub use model::{CullingSphere, ShrubModel, ShrubPassthrough};

/// Header size in bytes.
pub const SHRUB_HEADER_SIZE: usize = 0x40;
/// Position + normal element (6 x f32).
pub const VERTEX_ELEMENT_SIZE: usize = 0x18;
/// UV element (2 x f32).
pub const UV_ELEMENT_SIZE: usize = 0x08;
/// Index element (u16).
pub const INDEX_ELEMENT_SIZE: usize = 2;
/// Floats per vertex in the decoded interleaved buffer.
pub const VERTEX_STRIDE: usize = 8;
