//! Tests for the shrub format

use super::*;
use crate::error::CodecError;
use crate::formats::{BinarySerializable, TextureConfig};
use crate::primitives::{read_f32, read_u16, read_u32, write_i16, write_i32, write_u32};

fn sample_model() -> ShrubModel {
    ShrubModel {
        id: 0x0123,
        culling: CullingSphere {
            x: 1.5,
            y: -2.0,
            z: 10.0,
            radius: 4.25,
        },
        size_scale: 1.0,
        texture_configs: vec![
            TextureConfig::new(3, 0, 3, 1),
            TextureConfig::new(7, 3, 0, 2),
        ],
        vertex_buffer: vec![
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
        ],
        index_buffer: vec![0, 1, 2],
        passthrough: ShrubPassthrough {
            off_20: 0xAABB_CCDD,
            off_2a: -1,
            off_2c: 0x10,
            off_34: 0,
            off_38: 0x8000_0000,
            off_3c: 7,
        },
    }
}

// ========================================================================
// Header Tests
// ========================================================================

#[test]
fn test_header_size() {
    assert_eq!(ShrubHeader::SIZE, SHRUB_HEADER_SIZE);
    assert_eq!(SHRUB_HEADER_LAYOUT.opaque_fields().count(), 1);
}

#[test]
fn test_header_field_offsets() {
    let model = sample_model();
    let head = model.serialize_head(0).unwrap();
    assert_eq!(head.len(), 0x40);

    assert_eq!(read_f32(&head, 0x00).unwrap(), 1.5);
    assert_eq!(read_f32(&head, 0x04).unwrap(), -2.0);
    assert_eq!(read_f32(&head, 0x0C).unwrap(), 4.25);
    assert_eq!(read_u32(&head, 0x20).unwrap(), 0xAABB_CCDD);
    assert_eq!(read_u32(&head, 0x24).unwrap(), 3);
    assert_eq!(read_u16(&head, 0x28).unwrap(), 2);
    assert_eq!(read_u16(&head, 0x2A).unwrap(), 0xFFFF);
    assert_eq!(read_u16(&head, 0x30).unwrap(), 0x0123);
    assert_eq!(&head[0x32..0x34], &[0, 0]);
    assert_eq!(read_u32(&head, 0x38).unwrap(), 0x8000_0000);
    assert_eq!(read_u32(&head, 0x3C).unwrap(), 7);
}

#[test]
fn test_header_blob_roundtrip_keeps_padding() {
    let mut blob: Vec<u8> = (0..0x40).map(|i| (i * 3) as u8).collect();
    blob[0x32] = 0xEE;
    blob[0x33] = 0xFF;
    let header = ShrubHeader::deserialize(&blob).unwrap();
    assert_eq!(header.pad_32, [0xEE, 0xFF]);
    assert_eq!(header.serialize().unwrap(), blob);
}

#[test]
fn test_truncated_header() {
    let head = vec![0u8; 63];
    let err = ShrubModel::decode(&head, 0, &head, 0).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedRecord {
            record: "shrub_header",
            expected: 0x40,
            actual: 63
        }
    );

    // Offset into a longer buffer that leaves less than a header
    let head = vec![0u8; 0x80];
    assert!(matches!(
        ShrubModel::decode(&head, 0x41, &head, 0),
        Err(CodecError::TruncatedRecord { actual: 0x3F, .. })
    ));
}

// ========================================================================
// Body Layout Tests
// ========================================================================

#[test]
fn test_body_layout_from_zero() {
    let layout = ShrubBodyLayout::compute(0, 2, 3, 3).unwrap();
    assert_eq!(layout.texture_ptr, 0x00);
    assert_eq!(layout.vertex_ptr, 0x80);
    assert_eq!(layout.uv_ptr, 0xD0);
    assert_eq!(layout.index_ptr, 0xF0);
    assert_eq!(layout.end, 0xF6);
}

#[test]
fn test_body_layout_empty() {
    let layout = ShrubBodyLayout::compute(0, 0, 0, 0).unwrap();
    assert_eq!(
        layout,
        ShrubBodyLayout {
            texture_ptr: 0,
            vertex_ptr: 0,
            uv_ptr: 0,
            index_ptr: 0,
            end: 0
        }
    );
}

/// Pins the head/body pointer basis: head pointers are computed from the
/// record start, body positions from zero, and the vertex gap is aligned
/// independently in each.
#[test]
fn test_head_and_body_pointer_basis() {
    let model = sample_model();
    let record_start = 0x1234;

    let head = model.header(record_start).unwrap();
    assert_eq!(head.texture_ptr, 0x1240);
    assert_eq!(head.vertex_ptr, 0x1280);
    assert_eq!(head.uv_ptr, 0x12D0);
    assert_eq!(head.index_ptr, 0x12F0);

    let body = model.body_layout(0).unwrap();
    assert_eq!(body.texture_ptr, 0x00);
    assert_eq!(body.vertex_ptr, 0x80);
    assert_eq!(body.uv_ptr, 0xD0);
    assert_eq!(body.index_ptr, 0xF0);

    // Not a constant shift of each other
    assert_eq!(head.vertex_ptr as usize - head.texture_ptr as usize, 0x40);
    assert_eq!(body.vertex_ptr - body.texture_ptr, 0x80);

    let blob = model.serialize_body().unwrap();
    assert_eq!(blob.len(), 0x100);
}

/// A body placed after a header whose start is not 0x80-aligned does not
/// line up with the head pointers past the texture block.
#[test]
fn test_unaligned_record_start_through_decode() {
    let model = sample_model();
    let body = model.serialize_body().unwrap();

    // Aligned start: head and body agree, full round trip
    let mut image = model.serialize_head(0x1280).unwrap();
    image.resize(0x1280, 0);
    image.extend_from_slice(&body);
    assert_eq!(ShrubModel::decode(&image, 0, &image, 1).unwrap(), model);

    // Unaligned start: body placed where the head expects textures
    let mut image = model.serialize_head(0x1234).unwrap();
    image.resize(0x1240, 0);
    image.extend_from_slice(&body);

    let decoded = ShrubModel::decode(&image, 0, &image, 1).unwrap();
    assert_eq!(decoded.texture_configs, model.texture_configs);
    // vertex_ptr 0x1280 lands in the zero gap of the body (offset 0x40)
    assert!(decoded.vertex_buffer[..6].iter().all(|&v| v == 0.0));
    assert_ne!(decoded.vertex_buffer, model.vertex_buffer);
}

#[test]
fn test_body_layout_overflow() {
    assert!(matches!(
        ShrubBodyLayout::compute(usize::MAX - 4, 0, 0, 0),
        Err(CodecError::CapacityExceeded { .. })
    ));
    assert!(matches!(
        ShrubBodyLayout::compute(0, 0, usize::MAX / 8, 0),
        Err(CodecError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_huge_record_start_is_an_error() {
    let model = sample_model();
    assert!(matches!(
        model.serialize_head(usize::MAX - 4),
        Err(CodecError::CapacityExceeded { .. })
    ));
    // Body end no longer fits a 32-bit pointer
    assert!(matches!(
        model.serialize_head(u32::MAX as usize - 0x10),
        Err(CodecError::CapacityExceeded { .. })
    ));
}

// ========================================================================
// Model Tests
// ========================================================================

#[test]
fn test_body_bytes() {
    let model = sample_model();
    let body = model.serialize_body().unwrap();

    // Texture configs at 0x00
    assert_eq!(&body[0x00..0x04], &[0, 0, 0, 3]);
    assert_eq!(&body[0x1C..0x20], &[0, 0, 0, 2]);
    // Gap up to the 0x80 vertex block is zero
    assert!(body[0x20..0x80].iter().all(|&b| b == 0));
    // Second vertex position x = 1.0
    assert_eq!(read_f32(&body, 0x80 + 0x18).unwrap(), 1.0);
    // Third vertex normal y = 1.0
    assert_eq!(read_f32(&body, 0x80 + 0x30 + 0x10).unwrap(), 1.0);
    // Second uv u = 1.0, third uv v = 1.0
    assert_eq!(read_f32(&body, 0xD0 + 0x08).unwrap(), 1.0);
    assert_eq!(read_f32(&body, 0xD0 + 0x14).unwrap(), 1.0);
    // Indices
    assert_eq!(&body[0xF0..0xF6], &[0, 0, 0, 1, 0, 2]);
    assert!(body[0xF6..].iter().all(|&b| b == 0));
}

#[test]
fn test_model_roundtrip() {
    let model = sample_model();
    let head = model.serialize_head(0).unwrap();
    let body = model.serialize_body().unwrap();

    let decoded = ShrubModel::decode(&head, 0, &body, model.face_count()).unwrap();
    assert_eq!(decoded, model);
    assert_eq!(decoded.vertex_count(), 3);
    assert_eq!(decoded.vertex_buffer.len(), decoded.vertex_count() * VERTEX_STRIDE);
}

#[test]
fn test_decode_contiguous_image() {
    // Header at 0x100 in a file image, body placed from 0x200 with pointers
    // computed for that position.
    let model = sample_model();
    let mut image = vec![0u8; 0x200];
    let head = model.serialize_head(0x200).unwrap();
    image[0x100..0x140].copy_from_slice(&head);
    image.extend_from_slice(&model.serialize_body().unwrap());

    let decoded = ShrubModel::decode(&image, 0x100, &image, 1).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn test_empty_model_roundtrip() {
    let model = ShrubModel::empty(42);
    let head = model.serialize_head(0).unwrap();
    let body = model.serialize_body().unwrap();
    assert!(body.is_empty());

    let decoded = ShrubModel::decode(&head, 0, &body, 0).unwrap();
    assert_eq!(decoded, model);
    assert_eq!(decoded.size_scale, 1.0);
}

#[test]
fn test_encoding_is_deterministic() {
    let model = sample_model();
    assert_eq!(
        model.serialize_head(0x40).unwrap(),
        model.serialize_head(0x40).unwrap()
    );
    assert_eq!(model.serialize_body().unwrap(), model.serialize_body().unwrap());
}

#[test]
fn test_bad_vertex_stride() {
    let mut model = sample_model();
    model.vertex_buffer.pop();
    assert_eq!(
        model.serialize_body(),
        Err(CodecError::InvalidStride {
            what: "shrub vertex buffer",
            len: 23,
            stride: 8
        })
    );
    assert!(model.serialize_head(0).is_err());
}

#[test]
fn test_bad_index_stride() {
    let mut model = sample_model();
    model.index_buffer.push(1);
    assert_eq!(
        model.serialize_body(),
        Err(CodecError::InvalidStride {
            what: "shrub index buffer",
            len: 4,
            stride: 3
        })
    );
    assert!(model.serialize_head(0).is_err());
}

#[test]
fn test_malformed_pointer() {
    let model = sample_model();
    let mut head = model.serialize_head(0).unwrap();
    let body = model.serialize_body().unwrap();

    // UV pointer past the end of the body
    write_u32(&mut head, 0x14, 0xFFF0).unwrap();
    assert_eq!(
        ShrubModel::decode(&head, 0, &body, 1),
        Err(CodecError::MalformedPointer {
            field: "uv_ptr",
            pointer: 0xFFF0,
            len: 0x100
        })
    );
}

#[test]
fn test_face_count_past_index_block() {
    let model = sample_model();
    let head = model.serialize_head(0).unwrap();
    let body = model.serialize_body().unwrap();

    // 0xF0 + 6 * 3 * 2 = 0x114 > 0x100
    assert!(matches!(
        ShrubModel::decode(&head, 0, &body, 6),
        Err(CodecError::MalformedPointer {
            field: "index_ptr",
            ..
        })
    ));
    // Two faces still fit inside the padded body
    assert!(ShrubModel::decode(&head, 0, &body, 2).is_ok());
}

#[test]
fn test_negative_counts() {
    let model = sample_model();
    let body = model.serialize_body().unwrap();

    let mut head = model.serialize_head(0).unwrap();
    write_i32(&mut head, 0x24, -1).unwrap();
    assert_eq!(
        ShrubModel::decode(&head, 0, &body, 1),
        Err(CodecError::InvalidCount {
            field: "vertex_count",
            value: -1
        })
    );

    let mut head = model.serialize_head(0).unwrap();
    write_i16(&mut head, 0x28, -5).unwrap();
    assert!(matches!(
        ShrubModel::decode(&head, 0, &body, 1),
        Err(CodecError::InvalidCount {
            field: "texture_count",
            ..
        })
    ));
}

#[test]
fn test_sibling_records_survive_a_bad_one() {
    // Two headers back to back; the first has a broken pointer.
    let model = sample_model();
    let body = model.serialize_body().unwrap();
    let mut heads = model.serialize_head(0).unwrap();
    heads.extend(model.serialize_head(0).unwrap());
    write_u32(&mut heads, 0x10, 0x7FFF_FFFF).unwrap();

    let results: Vec<_> = (0..2)
        .map(|i| ShrubModel::decode(&heads, i * SHRUB_HEADER_SIZE, &body, 1))
        .collect();
    assert!(results[0].is_err());
    assert_eq!(results[1].as_ref().unwrap(), &model);
}
