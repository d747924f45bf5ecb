//! Static record layouts and the generic big-endian marshaller.
//!
//! A [`RecordLayout`] is a `const` table of field descriptors. Decoding reads
//! each non-opaque field big-endian at its declared offset; encoding writes it
//! back. Opaque regions are copied verbatim and never byte-swapped.
//!
//! Layouts are meant to be checked at compile time:
//!
//! ```
//! use geoswap_common::layout::{FieldDesc, FieldKind, RecordLayout};
//!
//! const PAIR: RecordLayout = RecordLayout {
//!     name: "pair",
//!     size: 8,
//!     fields: &[
//!         FieldDesc::new("a", 0x0, FieldKind::U16),
//!         FieldDesc::new("pad", 0x2, FieldKind::Opaque(2)),
//!         FieldDesc::new("b", 0x4, FieldKind::F32),
//!     ],
//! };
//! const _: () = assert!(PAIR.is_well_formed());
//! ```

use glam::Vec4;

use crate::error::{CodecError, Result};
use crate::primitives::*;

/// Element kind of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    /// Four independent big-endian f32 values (not one 16-byte swap)
    Vec4F32,
    /// 32-bit pointer, kept as the raw stored value
    Pointer,
    /// Raw bytes of the given length, never swapped
    Opaque(usize),
}

impl FieldKind {
    /// Width of the field in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::I8 => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U32 | FieldKind::I32 | FieldKind::F32 | FieldKind::Pointer => 4,
            FieldKind::U64 | FieldKind::I64 => 8,
            FieldKind::Vec4F32 => 16,
            FieldKind::Opaque(len) => len,
        }
    }

    pub const fn is_opaque(self) -> bool {
        matches!(self, FieldKind::Opaque(_))
    }
}

/// One field descriptor: name, byte offset, byte width, element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl FieldDesc {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            width: kind.width(),
            kind,
        }
    }
}

/// Immutable layout of a fixed-size big-endian record.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [FieldDesc],
}

impl RecordLayout {
    /// True when the fields are in offset order, contiguous, non-empty and
    /// cover exactly `size` bytes. Gaps must be declared as opaque fields.
    pub const fn is_well_formed(&self) -> bool {
        let mut cursor = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            if field.offset != cursor || field.width == 0 || field.width != field.kind.width() {
                return false;
            }
            cursor = field.offset + field.width;
            i += 1;
        }
        cursor == self.size
    }

    /// Look up a field by name, returning its index and descriptor.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDesc)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Fields that are converted between big-endian and host order.
    pub fn swapped_fields(&self) -> impl Iterator<Item = &FieldDesc> {
        self.fields.iter().filter(|f| !f.kind.is_opaque())
    }

    /// Fields copied verbatim.
    pub fn opaque_fields(&self) -> impl Iterator<Item = &FieldDesc> {
        self.fields.iter().filter(|f| f.kind.is_opaque())
    }
}

/// A decoded field value in host representation.
///
/// Equality on float-carrying variants compares bit patterns, so NaN
/// payloads and signed zeros take part in round-trip comparisons.
#[derive(Debug, Clone)]
pub enum FieldValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    Vec4(Vec4),
    Pointer(u32),
    Opaque(Vec<u8>),
}

impl FieldValue {
    /// Whether this value can be stored in a field of `kind`.
    pub fn matches(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (FieldValue::U8(_), FieldKind::U8)
            | (FieldValue::I8(_), FieldKind::I8)
            | (FieldValue::U16(_), FieldKind::U16)
            | (FieldValue::I16(_), FieldKind::I16)
            | (FieldValue::U32(_), FieldKind::U32)
            | (FieldValue::I32(_), FieldKind::I32)
            | (FieldValue::U64(_), FieldKind::U64)
            | (FieldValue::I64(_), FieldKind::I64)
            | (FieldValue::F32(_), FieldKind::F32)
            | (FieldValue::Vec4(_), FieldKind::Vec4F32)
            | (FieldValue::Pointer(_), FieldKind::Pointer) => true,
            (FieldValue::Opaque(bytes), FieldKind::Opaque(len)) => bytes.len() <= len,
            _ => false,
        }
    }
}

fn vec4_bits(v: &Vec4) -> [u32; 4] {
    v.to_array().map(f32::to_bits)
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        use FieldValue::*;
        match (self, other) {
            (U8(a), U8(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (Vec4(a), Vec4(b)) => vec4_bits(a) == vec4_bits(b),
            (Pointer(a), Pointer(b)) => a == b,
            (Opaque(a), Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// Decoded values of one record, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    layout: &'static RecordLayout,
    values: Vec<FieldValue>,
}

macro_rules! typed_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(&self, name: &'static str) -> Result<$ty> {
            match self.value(name)? {
                FieldValue::$variant(v) => Ok(*v),
                _ => Err(self.mismatch(name)),
            }
        }
    };
}

impl Fields {
    pub fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }

    fn mismatch(&self, name: &'static str) -> CodecError {
        CodecError::LayoutMismatch {
            record: self.layout.name,
            field: name,
        }
    }

    /// Value of the named field.
    pub fn value(&self, name: &'static str) -> Result<&FieldValue> {
        self.layout
            .field(name)
            .and_then(|(index, _)| self.values.get(index))
            .ok_or_else(|| self.mismatch(name))
    }

    typed_accessor!(u8, U8, u8);
    typed_accessor!(i8, I8, i8);
    typed_accessor!(u16, U16, u16);
    typed_accessor!(i16, I16, i16);
    typed_accessor!(u32, U32, u32);
    typed_accessor!(i32, I32, i32);
    typed_accessor!(u64, U64, u64);
    typed_accessor!(i64, I64, i64);
    typed_accessor!(f32, F32, f32);
    typed_accessor!(vec4, Vec4, Vec4);
    typed_accessor!(pointer, Pointer, u32);

    /// Raw bytes of an opaque field.
    pub fn opaque(&self, name: &'static str) -> Result<&[u8]> {
        match self.value(name)? {
            FieldValue::Opaque(bytes) => Ok(bytes),
            _ => Err(self.mismatch(name)),
        }
    }
}

fn read_field(bytes: &[u8], field: &FieldDesc) -> Result<FieldValue> {
    let at = field.offset;
    Ok(match field.kind {
        FieldKind::U8 => FieldValue::U8(read_u8(bytes, at)?),
        FieldKind::I8 => FieldValue::I8(read_i8(bytes, at)?),
        FieldKind::U16 => FieldValue::U16(read_u16(bytes, at)?),
        FieldKind::I16 => FieldValue::I16(read_i16(bytes, at)?),
        FieldKind::U32 => FieldValue::U32(read_u32(bytes, at)?),
        FieldKind::I32 => FieldValue::I32(read_i32(bytes, at)?),
        FieldKind::U64 => FieldValue::U64(read_u64(bytes, at)?),
        FieldKind::I64 => FieldValue::I64(read_i64(bytes, at)?),
        FieldKind::F32 => FieldValue::F32(read_f32(bytes, at)?),
        FieldKind::Vec4F32 => FieldValue::Vec4(Vec4::from_array(read_vec4(bytes, at)?)),
        FieldKind::Pointer => FieldValue::Pointer(read_u32(bytes, at)?),
        FieldKind::Opaque(len) => FieldValue::Opaque(read_bytes(bytes, at, len)?.to_vec()),
    })
}

fn write_field(buf: &mut [u8], base: usize, field: &FieldDesc, value: &FieldValue) -> Result<()> {
    let at = base + field.offset;
    match value {
        FieldValue::U8(v) => write_u8(buf, at, *v),
        FieldValue::I8(v) => write_i8(buf, at, *v),
        FieldValue::U16(v) => write_u16(buf, at, *v),
        FieldValue::I16(v) => write_i16(buf, at, *v),
        FieldValue::U32(v) => write_u32(buf, at, *v),
        FieldValue::I32(v) => write_i32(buf, at, *v),
        FieldValue::U64(v) => write_u64(buf, at, *v),
        FieldValue::I64(v) => write_i64(buf, at, *v),
        FieldValue::F32(v) => write_f32(buf, at, *v),
        FieldValue::Vec4(v) => write_vec4(buf, at, &v.to_array()),
        FieldValue::Pointer(v) => write_u32(buf, at, *v),
        FieldValue::Opaque(bytes) => {
            let mut region = vec![0u8; field.width];
            let len = bytes.len().min(field.width);
            region[..len].copy_from_slice(&bytes[..len]);
            write_bytes(buf, at, &region)
        }
    }
}

/// Reject layouts built without the compile-time check.
fn check_well_formed(layout: &RecordLayout) -> Result<()> {
    if layout.is_well_formed() {
        return Ok(());
    }
    let mut cursor = 0;
    let field = layout
        .fields
        .iter()
        .find(|f| {
            let bad = f.offset != cursor || f.width == 0 || f.width != f.kind.width();
            cursor = f.offset.saturating_add(f.width);
            bad
        })
        .map_or("<size>", |f| f.name);
    Err(CodecError::LayoutMismatch {
        record: layout.name,
        field,
    })
}

/// Decode a record from the start of `bytes`.
///
/// Fails with [`CodecError::TruncatedRecord`] before reading any field when
/// `bytes` is shorter than the layout, and with
/// [`CodecError::LayoutMismatch`] when the layout itself is malformed.
pub fn decode_fields(layout: &'static RecordLayout, bytes: &[u8]) -> Result<Fields> {
    check_well_formed(layout)?;
    if bytes.len() < layout.size {
        return Err(CodecError::TruncatedRecord {
            record: layout.name,
            expected: layout.size,
            actual: bytes.len(),
        });
    }
    let values = layout
        .fields
        .iter()
        .map(|field| read_field(bytes, field))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fields { layout, values })
}

/// Decode a record located at `offset` inside a larger buffer.
pub fn decode_fields_at(layout: &'static RecordLayout, buf: &[u8], offset: usize) -> Result<Fields> {
    decode_fields(layout, buf.get(offset..).unwrap_or_default())
}

/// Encode values into a fresh, zero-initialized buffer of the layout's size.
pub fn encode_fields(layout: &'static RecordLayout, values: &[FieldValue]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; layout.size];
    encode_fields_into(layout, values, &mut out, 0)?;
    Ok(out)
}

/// Encode values into `buf` at `offset`.
///
/// All values are checked against their descriptors before anything is
/// written. Short opaque values are zero-filled to the field width.
pub fn encode_fields_into(
    layout: &'static RecordLayout,
    values: &[FieldValue],
    buf: &mut [u8],
    offset: usize,
) -> Result<()> {
    check_well_formed(layout)?;
    if values.len() != layout.fields.len() {
        let field = layout
            .fields
            .get(values.len().min(layout.fields.len().saturating_sub(1)))
            .map_or("<none>", |f| f.name);
        return Err(CodecError::LayoutMismatch {
            record: layout.name,
            field,
        });
    }
    if let Some(field) = layout
        .fields
        .iter()
        .zip(values)
        .find_map(|(field, value)| (!value.matches(field.kind)).then_some(field))
    {
        return Err(CodecError::LayoutMismatch {
            record: layout.name,
            field: field.name,
        });
    }

    let available = buf.len().saturating_sub(offset);
    if offset > buf.len() || available < layout.size {
        return Err(CodecError::TruncatedRecord {
            record: layout.name,
            expected: layout.size,
            actual: available,
        });
    }

    for (field, value) in layout.fields.iter().zip(values) {
        write_field(buf, offset, field, value)?;
    }
    Ok(())
}
