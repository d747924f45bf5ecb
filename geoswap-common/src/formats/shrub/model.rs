//! Decoded shrub model and its two-pass encoder

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::align::pad_to_16;
use crate::error::{CodecError, Result};
use crate::formats::{BinarySerializable, TextureConfig};
use crate::primitives::{read_f32_array, read_u16, write_f32, write_u16};

use super::{
    INDEX_ELEMENT_SIZE, ShrubBodyLayout, ShrubHeader, UV_ELEMENT_SIZE, VERTEX_ELEMENT_SIZE,
    VERTEX_STRIDE,
};

/// Bounding sphere used for visibility culling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CullingSphere {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
}

impl From<Vec4> for CullingSphere {
    fn from(v: Vec4) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            radius: v.w,
        }
    }
}

impl From<CullingSphere> for Vec4 {
    fn from(s: CullingSphere) -> Self {
        Vec4::new(s.x, s.y, s.z, s.radius)
    }
}

/// Header words with no known meaning, carried through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrubPassthrough {
    pub off_20: u32,
    pub off_2a: i16,
    pub off_2c: u32,
    pub off_34: u32,
    pub off_38: u32,
    pub off_3c: u32,
}

/// A decoded shrub (static decoration) model.
///
/// `vertex_buffer` is interleaved with a stride of 8 floats:
/// position xyz, normal xyz, uv. `index_buffer` holds three indices per face.
///
/// Not everything survives an encode/decode cycle: `size_scale` has no header
/// field and decodes as 1.0, and the header's two padding bytes at 0x32 are
/// always written as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShrubModel {
    pub id: i16,
    pub culling: CullingSphere,
    /// Shrub headers carry no scale; decoded models always use 1.0
    pub size_scale: f32,
    pub texture_configs: Vec<TextureConfig>,
    pub vertex_buffer: Vec<f32>,
    pub index_buffer: Vec<u16>,
    pub passthrough: ShrubPassthrough,
}

/// Convert a stored signed count, rejecting negatives.
fn count(field: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| CodecError::InvalidCount { field, value })
}

/// Validate that `count` elements of `stride` bytes at `pointer` lie inside
/// `body`, returning the start offset. Empty regions are never dereferenced.
fn region(
    body: &[u8],
    field: &'static str,
    pointer: u32,
    count: usize,
    stride: usize,
) -> Result<usize> {
    let start = pointer as usize;
    let malformed = CodecError::MalformedPointer {
        field,
        pointer: start,
        len: body.len(),
    };
    let len = count.checked_mul(stride).ok_or(malformed.clone())?;
    if len == 0 {
        return Ok(start);
    }
    match start.checked_add(len) {
        Some(end) if end <= body.len() => Ok(start),
        _ => Err(malformed),
    }
}

fn to_pointer(what: &'static str, offset: usize) -> Result<u32> {
    u32::try_from(offset).map_err(|_| CodecError::CapacityExceeded {
        what,
        count: offset,
        max: u32::MAX as usize,
    })
}

impl ShrubModel {
    /// Empty model for authoring.
    pub fn empty(id: i16) -> Self {
        Self {
            id,
            culling: CullingSphere::default(),
            size_scale: 1.0,
            texture_configs: Vec::new(),
            vertex_buffer: Vec::new(),
            index_buffer: Vec::new(),
            passthrough: ShrubPassthrough::default(),
        }
    }

    /// Decode the header at `head[offset..]` and its sub-buffers from `body`.
    ///
    /// Header pointers are offsets into `body`; pass the same slice twice
    /// when header and data live in one contiguous image. `face_count`
    /// comes from the surrounding file format (three indices per face).
    pub fn decode(head: &[u8], offset: usize, body: &[u8], face_count: usize) -> Result<Self> {
        let header = ShrubHeader::deserialize_at(head, offset)?;
        Self::from_header(&header, body, face_count)
    }

    /// Resolve an already decoded header against `body`.
    pub fn from_header(header: &ShrubHeader, body: &[u8], face_count: usize) -> Result<Self> {
        let vertex_count = count("vertex_count", header.vertex_count.into())?;
        let texture_count = count("texture_count", header.texture_count.into())?;
        let index_count = face_count
            .checked_mul(3)
            .ok_or(CodecError::CapacityExceeded {
                what: "shrub face",
                count: face_count,
                max: usize::MAX / 3,
            })?;

        let texture_base = region(
            body,
            "texture_ptr",
            header.texture_ptr,
            texture_count,
            TextureConfig::SIZE,
        )?;
        let vertex_base = region(
            body,
            "vertex_ptr",
            header.vertex_ptr,
            vertex_count,
            VERTEX_ELEMENT_SIZE,
        )?;
        let uv_base = region(body, "uv_ptr", header.uv_ptr, vertex_count, UV_ELEMENT_SIZE)?;
        let index_base = region(
            body,
            "index_ptr",
            header.index_ptr,
            index_count,
            INDEX_ELEMENT_SIZE,
        )?;

        let texture_configs = (0..texture_count)
            .map(|i| TextureConfig::deserialize_at(body, texture_base + i * TextureConfig::SIZE))
            .collect::<Result<Vec<_>>>()?;

        let mut vertex_buffer = Vec::with_capacity(vertex_count * VERTEX_STRIDE);
        for i in 0..vertex_count {
            let position_normal =
                read_f32_array::<6>(body, vertex_base + i * VERTEX_ELEMENT_SIZE)?;
            let uv = read_f32_array::<2>(body, uv_base + i * UV_ELEMENT_SIZE)?;
            vertex_buffer.extend_from_slice(&position_normal);
            vertex_buffer.extend_from_slice(&uv);
        }

        let index_buffer = (0..index_count)
            .map(|i| read_u16(body, index_base + i * INDEX_ELEMENT_SIZE))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            id = header.id,
            vertices = vertex_count,
            textures = texture_count,
            indices = index_count,
            "Decoded shrub model"
        );

        Ok(Self {
            id: header.id,
            culling: header.culling.into(),
            size_scale: 1.0,
            texture_configs,
            vertex_buffer,
            index_buffer,
            passthrough: ShrubPassthrough {
                off_20: header.off_20,
                off_2a: header.off_2a,
                off_2c: header.off_2c,
                off_34: header.off_34,
                off_38: header.off_38,
                off_3c: header.off_3c,
            },
        })
    }

    /// Number of vertices in the interleaved buffer.
    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer.len() / VERTEX_STRIDE
    }

    /// Number of triangles described by the index buffer.
    pub fn face_count(&self) -> usize {
        self.index_buffer.len() / 3
    }

    /// Check buffer shapes and header field capacities.
    fn validate_for_encode(&self) -> Result<()> {
        if self.vertex_buffer.len() % VERTEX_STRIDE != 0 {
            return Err(CodecError::InvalidStride {
                what: "shrub vertex buffer",
                len: self.vertex_buffer.len(),
                stride: VERTEX_STRIDE,
            });
        }
        if self.index_buffer.len() % 3 != 0 {
            return Err(CodecError::InvalidStride {
                what: "shrub index buffer",
                len: self.index_buffer.len(),
                stride: 3,
            });
        }
        if self.vertex_count() > i32::MAX as usize {
            return Err(CodecError::CapacityExceeded {
                what: "shrub vertex",
                count: self.vertex_count(),
                max: i32::MAX as usize,
            });
        }
        if self.texture_configs.len() > i16::MAX as usize {
            return Err(CodecError::CapacityExceeded {
                what: "shrub texture config",
                count: self.texture_configs.len(),
                max: i16::MAX as usize,
            });
        }
        Ok(())
    }

    /// Sub-buffer placement for this model relative to `base`.
    pub fn body_layout(&self, base: usize) -> Result<ShrubBodyLayout> {
        ShrubBodyLayout::compute(
            base,
            self.texture_configs.len(),
            self.vertex_count(),
            self.index_buffer.len(),
        )
    }

    /// Build the header, with pointers relative to `record_start`.
    pub fn header(&self, record_start: usize) -> Result<ShrubHeader> {
        self.validate_for_encode()?;
        let layout = self.body_layout(record_start)?;
        to_pointer("shrub body end", layout.end)?;

        Ok(ShrubHeader {
            culling: self.culling.into(),
            vertex_ptr: to_pointer("shrub vertex pointer", layout.vertex_ptr)?,
            uv_ptr: to_pointer("shrub uv pointer", layout.uv_ptr)?,
            index_ptr: to_pointer("shrub index pointer", layout.index_ptr)?,
            texture_ptr: to_pointer("shrub texture pointer", layout.texture_ptr)?,
            off_20: self.passthrough.off_20,
            vertex_count: self.vertex_count() as i32,
            texture_count: self.texture_configs.len() as i16,
            off_2a: self.passthrough.off_2a,
            off_2c: self.passthrough.off_2c,
            id: self.id,
            pad_32: [0; 2],
            off_34: self.passthrough.off_34,
            off_38: self.passthrough.off_38,
            off_3c: self.passthrough.off_3c,
        })
    }

    /// Serialize the 64-byte header. Pointers are relative to
    /// `record_start`, the header's position in the final file.
    pub fn serialize_head(&self, record_start: usize) -> Result<Vec<u8>> {
        self.header(record_start)?.serialize()
    }

    /// Serialize texture configs, vertices, UVs and indices.
    ///
    /// Positions are relative to the start of the returned blob (base zero),
    /// not to the record's position in the final file. The blob is padded
    /// to a multiple of 0x10 bytes.
    pub fn serialize_body(&self) -> Result<Vec<u8>> {
        self.validate_for_encode()?;
        let layout = self.body_layout(0)?;
        let mut out = vec![0u8; layout.end];

        for (i, config) in self.texture_configs.iter().enumerate() {
            config.serialize_into(&mut out, layout.texture_ptr + i * TextureConfig::SIZE)?;
        }

        for (i, vertex) in self.vertex_buffer.chunks_exact(VERTEX_STRIDE).enumerate() {
            let vertex_at = layout.vertex_ptr + i * VERTEX_ELEMENT_SIZE;
            for (j, value) in vertex[..6].iter().enumerate() {
                write_f32(&mut out, vertex_at + j * 4, *value)?;
            }
            let uv_at = layout.uv_ptr + i * UV_ELEMENT_SIZE;
            write_f32(&mut out, uv_at, vertex[6])?;
            write_f32(&mut out, uv_at + 4, vertex[7])?;
        }

        for (i, index) in self.index_buffer.iter().enumerate() {
            write_u16(&mut out, layout.index_ptr + i * INDEX_ELEMENT_SIZE, *index)?;
        }

        pad_to_16(&mut out);

        tracing::debug!(
            id = self.id,
            bytes = out.len(),
            vertex_ptr = layout.vertex_ptr,
            "Serialized shrub body"
        );
        Ok(out)
    }
}
