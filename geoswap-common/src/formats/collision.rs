//! Collision container and grid chunk format
//!
//! A collision container starts with 16 big-endian u32 pointer slots. Slot 4
//! points at a z/y/x grid. Each grid level stores a shift, a cell count and
//! a relative offset to the next level; the innermost level points at a
//! vertex block holding quantized vertices and packed faces.
//!
//! This codec writes single-cell grids (one z, one y, one x cell).
//!
//! # Layout
//! ```text
//! 0x00: slots[16]           u32 (only slot 4 used, = 0x40)
//! 0x40: z_shift u16, z_count u16
//! 0x44: y_offset i32        (relative to its own position)
//! 0x48: y_shift u16, y_count u16
//! 0x4C: x_offset i32
//! 0x50: x_shift u16, x_count u16
//! 0x54: v_offset i32
//! 0x58: face_count u16, vertex_count u8, r_count u8
//! 0x5C: vertices            vertex_count x f32x3 (scaled by 1024)
//! var:  faces               face_count x [i0 u8, i1 u8, i2 u8, type u8]
//! ```

use serde::{Deserialize, Serialize};

use crate::align::pad_to_16;
use crate::error::{CodecError, Result};
use crate::primitives::{
    read_f32_array, read_i32, read_u8, read_u16, read_u32, write_f32, write_i32, write_u8,
    write_u16, write_u32,
};

/// Fixed-point scale applied to vertex coordinates on disk.
pub const COLLISION_SCALE: f32 = 1024.0;
/// Face type written for every face.
pub const DEFAULT_FACE_TYPE: u8 = 0x1F;
/// Number of pointer slots in the container header.
pub const COLLISION_SLOT_COUNT: usize = 16;
/// Container header size in bytes.
pub const COLLISION_HEADER_SIZE: usize = COLLISION_SLOT_COUNT * 4;
/// Index of the slot pointing at the grid chunk.
pub const COLLISION_CHUNK_SLOT: usize = 4;
/// Vertex count is stored in a u8.
pub const MAX_COLLISION_VERTICES: usize = u8::MAX as usize;
/// Face count is stored in a u16.
pub const MAX_COLLISION_FACES: usize = u16::MAX as usize;

const VERTEX_SIZE: usize = 12;
const FACE_SIZE: usize = 4;
const GRID_LEVEL_SIZE: usize = 8;
const VERTEX_BLOCK_HEADER_SIZE: usize = 4;

/// Triangle collision mesh.
///
/// `vertex_buffer` holds xyz triples, `index_buffer` holds one triple per
/// triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionMesh {
    pub vertex_buffer: Vec<f32>,
    pub index_buffer: Vec<u32>,
}

/// One packed face record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFace {
    pub indices: [u8; 3],
    pub face_type: u8,
}

/// A decoded grid cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionChunk {
    pub z_shift: u16,
    pub y_shift: u16,
    pub x_shift: u16,
    /// Vertices with the fixed-point scale removed
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<CollisionFace>,
}

impl CollisionMesh {
    pub fn new(vertex_buffer: Vec<f32>, index_buffer: Vec<u32>) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.index_buffer.len() / 3
    }

    fn validate_for_encode(&self) -> Result<()> {
        if self.vertex_buffer.len() % 3 != 0 {
            return Err(CodecError::InvalidStride {
                what: "collision vertex buffer",
                len: self.vertex_buffer.len(),
                stride: 3,
            });
        }
        if self.index_buffer.len() % 3 != 0 {
            return Err(CodecError::InvalidStride {
                what: "collision index buffer",
                len: self.index_buffer.len(),
                stride: 3,
            });
        }
        if self.vertex_count() > MAX_COLLISION_VERTICES {
            return Err(CodecError::CapacityExceeded {
                what: "collision vertex",
                count: self.vertex_count(),
                max: MAX_COLLISION_VERTICES,
            });
        }
        if self.face_count() > MAX_COLLISION_FACES {
            return Err(CodecError::CapacityExceeded {
                what: "collision face",
                count: self.face_count(),
                max: MAX_COLLISION_FACES,
            });
        }
        Ok(())
    }

    /// Encode into a container with one single-cell grid chunk.
    ///
    /// Indices are truncated to 8 bits; meshes are limited to 255 vertices
    /// so every valid index fits.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate_for_encode()?;
        let vertex_count = self.vertex_count();
        let face_count = self.face_count();

        let chunk_at = COLLISION_HEADER_SIZE;
        let vertex_block_at = chunk_at + 3 * GRID_LEVEL_SIZE;
        let size = vertex_block_at
            + VERTEX_BLOCK_HEADER_SIZE
            + vertex_count * VERTEX_SIZE
            + face_count * FACE_SIZE;
        let mut out = vec![0u8; size];

        write_u32(&mut out, COLLISION_CHUNK_SLOT * 4, chunk_at as u32)?;

        // Z level, then Y and X levels, each followed by a placeholder offset
        let mut at = chunk_at;
        write_u16(&mut out, at, 0)?;
        write_u16(&mut out, at + 2, 1)?;
        let y_offset_at = at + 4;
        at += GRID_LEVEL_SIZE;

        let y_block_at = at;
        write_u16(&mut out, at, 0)?;
        write_u16(&mut out, at + 2, 1)?;
        let x_offset_at = at + 4;
        at += GRID_LEVEL_SIZE;

        let x_block_at = at;
        write_u16(&mut out, at, 0)?;
        write_u16(&mut out, at + 2, 1)?;
        let v_offset_at = at + 4;
        at += GRID_LEVEL_SIZE;

        debug_assert_eq!(at, vertex_block_at);
        write_u16(&mut out, at, face_count as u16)?;
        write_u8(&mut out, at + 2, vertex_count as u8)?;
        write_u8(&mut out, at + 3, 0)?;
        at += VERTEX_BLOCK_HEADER_SIZE;

        for vertex in self.vertex_buffer.chunks_exact(3) {
            for (i, coord) in vertex.iter().enumerate() {
                write_f32(&mut out, at + i * 4, coord * COLLISION_SCALE)?;
            }
            at += VERTEX_SIZE;
        }

        for face in self.index_buffer.chunks_exact(3) {
            for (i, index) in face.iter().enumerate() {
                write_u8(&mut out, at + i, *index as u8)?;
            }
            write_u8(&mut out, at + 3, DEFAULT_FACE_TYPE)?;
            at += FACE_SIZE;
        }

        patch_relative(&mut out, y_offset_at, y_block_at)?;
        patch_relative(&mut out, x_offset_at, x_block_at)?;
        patch_relative(&mut out, v_offset_at, vertex_block_at)?;

        pad_to_16(&mut out);

        tracing::debug!(
            vertices = vertex_count,
            faces = face_count,
            bytes = out.len(),
            "Encoded collision chunk"
        );
        Ok(out)
    }

    /// Decode a container produced by [`CollisionMesh::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let chunk = decode_chunk(bytes)?;
        Ok(Self {
            vertex_buffer: chunk.vertices.iter().flatten().copied().collect(),
            index_buffer: chunk
                .faces
                .iter()
                .flat_map(|face| face.indices.map(u32::from))
                .collect(),
        })
    }
}

/// Write the distance from `field_at` to `target` into the i32 at `field_at`.
fn patch_relative(out: &mut [u8], field_at: usize, target: usize) -> Result<()> {
    write_i32(out, field_at, (target as i64 - field_at as i64) as i32)
}

/// Follow a relative offset stored at `field_at`, requiring `need` bytes at
/// the target.
fn follow_relative(
    bytes: &[u8],
    field: &'static str,
    field_at: usize,
    need: usize,
) -> Result<usize> {
    let offset = read_i32(bytes, field_at)?;
    let target = field_at as i64 + offset as i64;
    match usize::try_from(target) {
        Ok(t) if t.checked_add(need).is_some_and(|end| end <= bytes.len()) => Ok(t),
        _ => Err(CodecError::MalformedPointer {
            field,
            pointer: target.max(0) as usize,
            len: bytes.len(),
        }),
    }
}

/// Decode the grid chunk referenced by slot 4 of a collision container.
pub fn decode_chunk(bytes: &[u8]) -> Result<CollisionChunk> {
    if bytes.len() < COLLISION_HEADER_SIZE {
        return Err(CodecError::TruncatedRecord {
            record: "collision_header",
            expected: COLLISION_HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let chunk_at = read_u32(bytes, COLLISION_CHUNK_SLOT * 4)? as usize;
    if chunk_at
        .checked_add(GRID_LEVEL_SIZE)
        .is_none_or(|end| end > bytes.len())
    {
        return Err(CodecError::MalformedPointer {
            field: "chunk_slot",
            pointer: chunk_at,
            len: bytes.len(),
        });
    }

    let z_shift = read_u16(bytes, chunk_at)?;
    let z_count = read_u16(bytes, chunk_at + 2)?;
    let y_at = follow_relative(bytes, "y_offset", chunk_at + 4, GRID_LEVEL_SIZE)?;

    let y_shift = read_u16(bytes, y_at)?;
    let y_count = read_u16(bytes, y_at + 2)?;
    let x_at = follow_relative(bytes, "x_offset", y_at + 4, GRID_LEVEL_SIZE)?;

    let x_shift = read_u16(bytes, x_at)?;
    let x_count = read_u16(bytes, x_at + 2)?;

    if (z_count, y_count, x_count) != (1, 1, 1) {
        return Err(CodecError::UnsupportedGrid {
            z: z_count,
            y: y_count,
            x: x_count,
        });
    }

    let v_at = follow_relative(bytes, "v_offset", x_at + 4, VERTEX_BLOCK_HEADER_SIZE)?;
    let face_count = read_u16(bytes, v_at)? as usize;
    let vertex_count = read_u8(bytes, v_at + 2)? as usize;
    let r_count = read_u8(bytes, v_at + 3)?;
    if r_count != 0 {
        tracing::warn!(r_count, "Ignoring reserved collision records");
    }

    let mut at = v_at + VERTEX_BLOCK_HEADER_SIZE;
    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let v = read_f32_array::<3>(bytes, at)?;
        vertices.push(v.map(|c| c / COLLISION_SCALE));
        at += VERTEX_SIZE;
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        faces.push(CollisionFace {
            indices: [
                read_u8(bytes, at)?,
                read_u8(bytes, at + 1)?,
                read_u8(bytes, at + 2)?,
            ],
            face_type: read_u8(bytes, at + 3)?,
        });
        at += FACE_SIZE;
    }

    tracing::debug!(
        vertices = vertex_count,
        faces = face_count,
        "Decoded collision chunk"
    );

    Ok(CollisionChunk {
        z_shift,
        y_shift,
        x_shift,
        vertices,
        faces,
    })
}
