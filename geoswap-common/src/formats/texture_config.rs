//! Shrub texture configuration record
//!
//! # Layout
//! ```text
//! 0x00: id    u32 (texture index)
//! 0x04: start u32 (first index of the draw range)
//! 0x08: size  u32 (index count of the draw range)
//! 0x0C: mode  u32 (wrap/blend mode)
//! ```

use super::BinarySerializable;
use crate::error::Result;
use crate::layout::{FieldDesc, FieldKind, FieldValue, Fields, RecordLayout};

pub const TEXTURE_CONFIG_LAYOUT: RecordLayout = RecordLayout {
    name: "texture_config",
    size: 0x10,
    fields: &[
        FieldDesc::new("id", 0x00, FieldKind::U32),
        FieldDesc::new("start", 0x04, FieldKind::U32),
        FieldDesc::new("size", 0x08, FieldKind::U32),
        FieldDesc::new("mode", 0x0C, FieldKind::U32),
    ],
};
const _: () = assert!(TEXTURE_CONFIG_LAYOUT.is_well_formed());

/// Texture configuration (16 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextureConfig {
    pub id: u32,
    pub start: u32,
    pub size: u32,
    pub mode: u32,
}

impl TextureConfig {
    pub fn new(id: u32, start: u32, size: u32, mode: u32) -> Self {
        Self {
            id,
            start,
            size,
            mode,
        }
    }
}

impl BinarySerializable for TextureConfig {
    const LAYOUT: &'static RecordLayout = &TEXTURE_CONFIG_LAYOUT;

    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            id: fields.u32("id")?,
            start: fields.u32("start")?,
            size: fields.u32("size")?,
            mode: fields.u32("mode")?,
        })
    }

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::U32(self.id),
            FieldValue::U32(self.start),
            FieldValue::U32(self.size),
            FieldValue::U32(self.mode),
        ]
    }
}
