//! Shrub header structure and layout table

use glam::Vec4;

use crate::error::{CodecError, Result};
use crate::formats::BinarySerializable;
use crate::layout::{FieldDesc, FieldKind, FieldValue, Fields, RecordLayout};

pub const SHRUB_HEADER_LAYOUT: RecordLayout = RecordLayout {
    name: "shrub_header",
    size: 0x40,
    fields: &[
        FieldDesc::new("culling", 0x00, FieldKind::Vec4F32),
        FieldDesc::new("vertex_ptr", 0x10, FieldKind::Pointer),
        FieldDesc::new("uv_ptr", 0x14, FieldKind::Pointer),
        FieldDesc::new("index_ptr", 0x18, FieldKind::Pointer),
        FieldDesc::new("texture_ptr", 0x1C, FieldKind::Pointer),
        FieldDesc::new("off_20", 0x20, FieldKind::U32),
        FieldDesc::new("vertex_count", 0x24, FieldKind::I32),
        FieldDesc::new("texture_count", 0x28, FieldKind::I16),
        FieldDesc::new("off_2a", 0x2A, FieldKind::I16),
        FieldDesc::new("off_2c", 0x2C, FieldKind::U32),
        FieldDesc::new("id", 0x30, FieldKind::I16),
        FieldDesc::new("pad_32", 0x32, FieldKind::Opaque(2)),
        FieldDesc::new("off_34", 0x34, FieldKind::U32),
        FieldDesc::new("off_38", 0x38, FieldKind::U32),
        FieldDesc::new("off_3c", 0x3C, FieldKind::U32),
    ],
};
const _: () = assert!(SHRUB_HEADER_LAYOUT.is_well_formed());

/// Shrub model header (64 bytes)
///
/// Pointer fields are stored exactly as found; what they are relative to
/// depends on who wrote the header (see [`super::ShrubBodyLayout`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrubHeader {
    /// Culling sphere: x, y, z, radius
    pub culling: Vec4,
    pub vertex_ptr: u32,
    pub uv_ptr: u32,
    pub index_ptr: u32,
    pub texture_ptr: u32,
    pub off_20: u32,
    pub vertex_count: i32,
    pub texture_count: i16,
    pub off_2a: i16,
    pub off_2c: u32,
    pub id: i16,
    pub pad_32: [u8; 2],
    pub off_34: u32,
    pub off_38: u32,
    pub off_3c: u32,
}

impl BinarySerializable for ShrubHeader {
    const LAYOUT: &'static RecordLayout = &SHRUB_HEADER_LAYOUT;

    fn from_fields(fields: &Fields) -> Result<Self> {
        let pad_32: [u8; 2] = fields
            .opaque("pad_32")?
            .try_into()
            .map_err(|_| CodecError::LayoutMismatch {
                record: SHRUB_HEADER_LAYOUT.name,
                field: "pad_32",
            })?;
        Ok(Self {
            culling: fields.vec4("culling")?,
            vertex_ptr: fields.pointer("vertex_ptr")?,
            uv_ptr: fields.pointer("uv_ptr")?,
            index_ptr: fields.pointer("index_ptr")?,
            texture_ptr: fields.pointer("texture_ptr")?,
            off_20: fields.u32("off_20")?,
            vertex_count: fields.i32("vertex_count")?,
            texture_count: fields.i16("texture_count")?,
            off_2a: fields.i16("off_2a")?,
            off_2c: fields.u32("off_2c")?,
            id: fields.i16("id")?,
            pad_32,
            off_34: fields.u32("off_34")?,
            off_38: fields.u32("off_38")?,
            off_3c: fields.u32("off_3c")?,
        })
    }

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Vec4(self.culling),
            FieldValue::Pointer(self.vertex_ptr),
            FieldValue::Pointer(self.uv_ptr),
            FieldValue::Pointer(self.index_ptr),
            FieldValue::Pointer(self.texture_ptr),
            FieldValue::U32(self.off_20),
            FieldValue::I32(self.vertex_count),
            FieldValue::I16(self.texture_count),
            FieldValue::I16(self.off_2a),
            FieldValue::U32(self.off_2c),
            FieldValue::I16(self.id),
            FieldValue::Opaque(self.pad_32.to_vec()),
            FieldValue::U32(self.off_34),
            FieldValue::U32(self.off_38),
            FieldValue::U32(self.off_3c),
        ]
    }
}
