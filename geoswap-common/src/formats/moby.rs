//! Runtime object (moby) records
//!
//! A moby is a live game object instance as it sits in memory: position,
//! render state, animation frame and a pointer to its per-type variables.
//! Records are 0x100 bytes, big-endian, and contain three regions whose
//! layout is unknown; those are carried through byte for byte.

use glam::Vec4;

use crate::error::{CodecError, Result};
use crate::formats::BinarySerializable;
use crate::layout::{FieldDesc, FieldKind, FieldValue, Fields, RecordLayout};

/// Size of one moby record in bytes.
pub const MOBY_SIZE: usize = 0x100;

const UNK_53_LEN: usize = 0x25;
const UNK_7C_LEN: usize = 0x2A;
const UNK_A8_LEN: usize = 0x58;

pub const MOBY_LAYOUT: RecordLayout = RecordLayout {
    name: "moby",
    size: MOBY_SIZE,
    fields: &[
        FieldDesc::new("coll_pos", 0x00, FieldKind::Vec4F32),
        FieldDesc::new("pos", 0x10, FieldKind::Vec4F32),
        FieldDesc::new("state", 0x20, FieldKind::U8),
        FieldDesc::new("texture_mode", 0x21, FieldKind::U8),
        FieldDesc::new("opacity", 0x22, FieldKind::U16),
        FieldDesc::new("model", 0x24, FieldKind::Pointer),
        FieldDesc::new("parent", 0x28, FieldKind::Pointer),
        FieldDesc::new("scale", 0x2C, FieldKind::F32),
        FieldDesc::new("unk_30", 0x30, FieldKind::U8),
        FieldDesc::new("visible", 0x31, FieldKind::U8),
        FieldDesc::new("render_distance", 0x32, FieldKind::I16),
        FieldDesc::new("unk_34", 0x34, FieldKind::Pointer),
        FieldDesc::new("color", 0x38, FieldKind::U32),
        FieldDesc::new("shading", 0x3C, FieldKind::U32),
        FieldDesc::new("rot", 0x40, FieldKind::Vec4F32),
        FieldDesc::new("prev_anim_frame", 0x50, FieldKind::U8),
        FieldDesc::new("curr_anim_frame", 0x51, FieldKind::U8),
        FieldDesc::new("update_id", 0x52, FieldKind::U8),
        FieldDesc::new("unk_53", 0x53, FieldKind::Opaque(UNK_53_LEN)),
        FieldDesc::new("pvars", 0x78, FieldKind::Pointer),
        FieldDesc::new("unk_7c", 0x7C, FieldKind::Opaque(UNK_7C_LEN)),
        FieldDesc::new("type", 0xA6, FieldKind::U16),
        FieldDesc::new("unk_a8", 0xA8, FieldKind::Opaque(UNK_A8_LEN)),
    ],
};
const _: () = assert!(MOBY_LAYOUT.is_well_formed());

/// Decoded moby record.
///
/// The `unk_*` byte regions always hold exactly their layout width after
/// decoding. When encoding, shorter regions are zero-filled and longer ones
/// are rejected.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MobyRecord {
    pub coll_pos: Vec4,
    pub pos: Vec4,
    pub state: u8,
    pub texture_mode: u8,
    pub opacity: u16,
    pub model: u32,
    pub parent: u32,
    pub scale: f32,
    pub unk_30: u8,
    pub visible: u8,
    pub render_distance: i16,
    pub unk_34: u32,
    pub color: u32,
    pub shading: u32,
    pub rot: Vec4,
    pub prev_anim_frame: u8,
    pub curr_anim_frame: u8,
    pub update_id: u8,
    pub unk_53: Vec<u8>,
    pub pvars: u32,
    pub unk_7c: Vec<u8>,
    /// Object class id
    #[serde(rename = "type")]
    pub moby_type: u16,
    pub unk_a8: Vec<u8>,
}

impl Default for MobyRecord {
    fn default() -> Self {
        Self {
            coll_pos: Vec4::ZERO,
            pos: Vec4::ZERO,
            state: 0,
            texture_mode: 0,
            opacity: 0,
            model: 0,
            parent: 0,
            scale: 0.0,
            unk_30: 0,
            visible: 0,
            render_distance: 0,
            unk_34: 0,
            color: 0,
            shading: 0,
            rot: Vec4::ZERO,
            prev_anim_frame: 0,
            curr_anim_frame: 0,
            update_id: 0,
            unk_53: vec![0; UNK_53_LEN],
            pvars: 0,
            unk_7c: vec![0; UNK_7C_LEN],
            moby_type: 0,
            unk_a8: vec![0; UNK_A8_LEN],
        }
    }
}

impl MobyRecord {
    /// Whether the record points at per-type variables.
    pub fn has_pvars(&self) -> bool {
        self.pvars != 0
    }

    /// Decode `count` consecutive records starting at `offset`.
    ///
    /// A record that fails to decode stops the scan; the records before it
    /// are returned alongside the error.
    pub fn decode_table(
        buf: &[u8],
        offset: usize,
        count: usize,
    ) -> (Vec<Self>, Option<CodecError>) {
        let mut records = Vec::new();
        for i in 0..count {
            let at = i
                .checked_mul(MOBY_SIZE)
                .and_then(|delta| offset.checked_add(delta))
                .unwrap_or(usize::MAX);
            match Self::deserialize_at(buf, at) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::debug!(index = i, %err, "Moby table ended early");
                    return (records, Some(err));
                }
            }
        }
        (records, None)
    }
}

impl BinarySerializable for MobyRecord {
    const LAYOUT: &'static RecordLayout = &MOBY_LAYOUT;

    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            coll_pos: fields.vec4("coll_pos")?,
            pos: fields.vec4("pos")?,
            state: fields.u8("state")?,
            texture_mode: fields.u8("texture_mode")?,
            opacity: fields.u16("opacity")?,
            model: fields.pointer("model")?,
            parent: fields.pointer("parent")?,
            scale: fields.f32("scale")?,
            unk_30: fields.u8("unk_30")?,
            visible: fields.u8("visible")?,
            render_distance: fields.i16("render_distance")?,
            unk_34: fields.pointer("unk_34")?,
            color: fields.u32("color")?,
            shading: fields.u32("shading")?,
            rot: fields.vec4("rot")?,
            prev_anim_frame: fields.u8("prev_anim_frame")?,
            curr_anim_frame: fields.u8("curr_anim_frame")?,
            update_id: fields.u8("update_id")?,
            unk_53: fields.opaque("unk_53")?.to_vec(),
            pvars: fields.pointer("pvars")?,
            unk_7c: fields.opaque("unk_7c")?.to_vec(),
            moby_type: fields.u16("type")?,
            unk_a8: fields.opaque("unk_a8")?.to_vec(),
        })
    }

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Vec4(self.coll_pos),
            FieldValue::Vec4(self.pos),
            FieldValue::U8(self.state),
            FieldValue::U8(self.texture_mode),
            FieldValue::U16(self.opacity),
            FieldValue::Pointer(self.model),
            FieldValue::Pointer(self.parent),
            FieldValue::F32(self.scale),
            FieldValue::U8(self.unk_30),
            FieldValue::U8(self.visible),
            FieldValue::I16(self.render_distance),
            FieldValue::Pointer(self.unk_34),
            FieldValue::U32(self.color),
            FieldValue::U32(self.shading),
            FieldValue::Vec4(self.rot),
            FieldValue::U8(self.prev_anim_frame),
            FieldValue::U8(self.curr_anim_frame),
            FieldValue::U8(self.update_id),
            FieldValue::Opaque(self.unk_53.clone()),
            FieldValue::Pointer(self.pvars),
            FieldValue::Opaque(self.unk_7c.clone()),
            FieldValue::U16(self.moby_type),
            FieldValue::Opaque(self.unk_a8.clone()),
        ]
    }
}
