//! Sub-buffer placement for shrub bodies

use crate::align::{ALIGN_16, ALIGN_128, checked_align_up};
use crate::error::{CodecError, Result};
use crate::formats::{BinarySerializable, TextureConfig};

use super::{INDEX_ELEMENT_SIZE, UV_ELEMENT_SIZE, VERTEX_ELEMENT_SIZE};

/// Positions of the four sub-buffers that follow a shrub header.
///
/// Blocks are placed in the fixed order texture configs, vertices, UVs,
/// indices. The texture block starts on a 0x10 boundary, the vertex block on
/// a 0x80 boundary, the UV and index blocks on 0x10 boundaries.
///
/// All positions include `base`. The head pass uses the record's start
/// offset as `base`; the body pass uses zero, so the body blob is laid out
/// relative to its own first byte. When `base` is not a multiple of 0x80 the
/// two passes disagree on the vertex gap, and the file assembler that joins
/// head and body is responsible for reconciling them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShrubBodyLayout {
    pub texture_ptr: usize,
    pub vertex_ptr: usize,
    pub uv_ptr: usize,
    pub index_ptr: usize,
    /// One past the last index byte (before trailing padding)
    pub end: usize,
}

impl ShrubBodyLayout {
    /// Place the blocks after `base`.
    ///
    /// Fails with `CapacityExceeded` when a block would end past
    /// `usize::MAX`.
    pub fn compute(
        base: usize,
        texture_count: usize,
        vertex_count: usize,
        index_count: usize,
    ) -> Result<Self> {
        Self::try_compute(base, texture_count, vertex_count, index_count).ok_or(
            CodecError::CapacityExceeded {
                what: "shrub body offset",
                count: base,
                max: usize::MAX,
            },
        )
    }

    fn try_compute(
        base: usize,
        texture_count: usize,
        vertex_count: usize,
        index_count: usize,
    ) -> Option<Self> {
        let texture_ptr = checked_align_up(base, ALIGN_16)?;
        let texture_end = block_end(texture_ptr, texture_count, TextureConfig::SIZE)?;

        let vertex_ptr = checked_align_up(texture_end, ALIGN_128)?;
        let vertex_end = block_end(vertex_ptr, vertex_count, VERTEX_ELEMENT_SIZE)?;

        let uv_ptr = checked_align_up(vertex_end, ALIGN_16)?;
        let uv_end = block_end(uv_ptr, vertex_count, UV_ELEMENT_SIZE)?;

        let index_ptr = checked_align_up(uv_end, ALIGN_16)?;
        let end = block_end(index_ptr, index_count, INDEX_ELEMENT_SIZE)?;

        Some(Self {
            texture_ptr,
            vertex_ptr,
            uv_ptr,
            index_ptr,
            end,
        })
    }
}

fn block_end(start: usize, count: usize, stride: usize) -> Option<usize> {
    start.checked_add(count.checked_mul(stride)?)
}
