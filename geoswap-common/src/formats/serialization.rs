//! Binary serialization trait for fixed-layout records.
//!
//! Every fixed-size record in the asset formats implements
//! `BinarySerializable` on top of a static [`RecordLayout`]. The layout table
//! decides which bytes are swapped and which are copied verbatim; the
//! implementing type only maps its fields to and from [`FieldValue`]s.

use crate::error::Result;
use crate::layout::{
    FieldValue, Fields, RecordLayout, decode_fields, decode_fields_at, encode_fields,
    encode_fields_into,
};

/// Trait for records described by a static big-endian layout.
///
/// # Example
///
/// ```
/// use geoswap_common::formats::{BinarySerializable, TextureConfig};
///
/// let config = TextureConfig::new(3, 128, 256, 1);
/// let bytes = config.serialize().unwrap();
/// assert_eq!(bytes.len(), TextureConfig::SIZE);
///
/// let parsed = TextureConfig::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, config);
/// ```
pub trait BinarySerializable: Sized {
    /// Static layout of the record.
    const LAYOUT: &'static RecordLayout;

    /// Size of the serialized record in bytes.
    const SIZE: usize = Self::LAYOUT.size;

    /// Build the typed record from decoded field values.
    fn from_fields(fields: &Fields) -> Result<Self>;

    /// Field values in layout order.
    fn to_fields(&self) -> Vec<FieldValue>;

    /// Serialize to a fresh buffer of [`Self::SIZE`] bytes.
    fn serialize(&self) -> Result<Vec<u8>> {
        encode_fields(Self::LAYOUT, &self.to_fields())
    }

    /// Serialize in place at `offset` inside a larger buffer.
    fn serialize_into(&self, buf: &mut [u8], offset: usize) -> Result<()> {
        encode_fields_into(Self::LAYOUT, &self.to_fields(), buf, offset)
    }

    /// Deserialize from the start of `bytes`.
    ///
    /// Returns `TruncatedRecord` if the slice is shorter than the layout.
    fn deserialize(bytes: &[u8]) -> Result<Self> {
        Self::from_fields(&decode_fields(Self::LAYOUT, bytes)?)
    }

    /// Deserialize the record located at `offset`.
    fn deserialize_at(buf: &[u8], offset: usize) -> Result<Self> {
        Self::from_fields(&decode_fields_at(Self::LAYOUT, buf, offset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::formats::{MobyRecord, ShrubHeader, TextureConfig};

    /// Generic helper using only the trait
    fn record_size<T: BinarySerializable>() -> usize {
        T::SIZE
    }

    #[test]
    fn test_generic_usage() {
        assert_eq!(record_size::<TextureConfig>(), 0x10);
        assert_eq!(record_size::<ShrubHeader>(), 0x40);
        assert_eq!(record_size::<MobyRecord>(), 0x100);
    }

    #[test]
    fn test_deserialize_insufficient_bytes() {
        assert!(matches!(
            TextureConfig::deserialize(&[0; 15]),
            Err(CodecError::TruncatedRecord { .. })
        ));
        assert!(ShrubHeader::deserialize(&[0; 63]).is_err());
        assert!(MobyRecord::deserialize(&[0; 0xFF]).is_err());
    }

    #[test]
    fn test_serialize_into_at_offset() {
        let mut buf = vec![0u8; 0x30];
        TextureConfig::new(1, 2, 3, 4)
            .serialize_into(&mut buf, 0x10)
            .unwrap();
        let parsed = TextureConfig::deserialize_at(&buf, 0x10).unwrap();
        assert_eq!(parsed, TextureConfig::new(1, 2, 3, 4));
        assert!(buf[..0x10].iter().all(|&b| b == 0));
    }
}
