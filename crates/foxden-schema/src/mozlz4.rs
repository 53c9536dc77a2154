//! The mozlz4 container format.
//!
//! Firefox stores `search.json.mozlz4` as an 8-byte magic tag, a 4-byte
//! little-endian length of the uncompressed payload, and a single LZ4
//! block. The whole input is compressed in one shot; there is no framing,
//! checksum, or streaming.

use lz4_flex::block;
use thiserror::Error;

use crate::MOZLZ4_MAGIC;

/// Size of the fixed container header: magic plus length field.
const HEADER_LEN: usize = MOZLZ4_MAGIC.len() + 4;

/// Errors produced by the container codec.
#[derive(Error, Debug)]
pub enum Mozlz4Error {
    /// The input does not fit the 4-byte length field.
    #[error("input of {0} bytes exceeds the container's u32 length field")]
    TooLarge(usize),

    /// The LZ4 block compressor rejected the input.
    #[error("LZ4 compression failed: {0}")]
    Compress(#[from] block::CompressError),

    /// The LZ4 block decompressor rejected the payload.
    #[error("LZ4 decompression failed: {0}")]
    Decompress(#[from] block::DecompressError),

    /// The container does not start with the mozlz4 magic tag.
    #[error("missing mozlz4 magic header")]
    BadMagic,

    /// The container is shorter than the fixed header.
    #[error("truncated container: {0} bytes is shorter than the fixed header")]
    Truncated(usize),

    /// The payload decompressed to a different size than the header claims.
    #[error("length field claims {expected} bytes but payload decompressed to {actual}")]
    LengthMismatch {
        /// Byte count recorded in the length field.
        expected: usize,
        /// Byte count actually produced by decompression.
        actual: usize,
    },
}

/// Encode `raw` into a mozlz4 container.
///
/// # Errors
///
/// Returns [`Mozlz4Error::TooLarge`] if `raw` exceeds `u32::MAX` bytes, or
/// [`Mozlz4Error::Compress`] if block compression fails. Either failure is
/// fatal to the caller; the artifact has no fallback representation.
pub fn encode(raw: &[u8]) -> Result<Vec<u8>, Mozlz4Error> {
    let raw_len = u32::try_from(raw.len()).map_err(|_| Mozlz4Error::TooLarge(raw.len()))?;

    let mut compressed = vec![0u8; block::get_maximum_output_size(raw.len())];
    let compressed_len = block::compress_into(raw, &mut compressed)?;

    let mut out = Vec::with_capacity(HEADER_LEN + compressed_len);
    out.extend_from_slice(&MOZLZ4_MAGIC);
    out.extend_from_slice(&raw_len.to_le_bytes());
    out.extend_from_slice(&compressed[..compressed_len]);
    Ok(out)
}

/// Decode a mozlz4 container back into the original bytes.
///
/// The decompressed payload must match the header's length field exactly;
/// the codec never silently truncates or pads.
///
/// # Errors
///
/// Returns [`Mozlz4Error::Truncated`] or [`Mozlz4Error::BadMagic`] for a
/// malformed header, [`Mozlz4Error::Decompress`] if the payload is not a
/// valid LZ4 block, or [`Mozlz4Error::LengthMismatch`] if the decompressed
/// size disagrees with the length field.
pub fn decode(container: &[u8]) -> Result<Vec<u8>, Mozlz4Error> {
    if container.len() < HEADER_LEN {
        return Err(Mozlz4Error::Truncated(container.len()));
    }
    if container[..MOZLZ4_MAGIC.len()] != MOZLZ4_MAGIC {
        return Err(Mozlz4Error::BadMagic);
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&container[MOZLZ4_MAGIC.len()..HEADER_LEN]);
    let expected = u32::from_le_bytes(len_bytes) as usize;

    let raw = block::decompress(&container[HEADER_LEN..], expected)?;
    if raw.len() != expected {
        return Err(Mozlz4Error::LengthMismatch {
            expected,
            actual: raw.len(),
        });
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_typical_payload() {
        let raw = br#"{"version":6,"engines":[{"_name":"Google"}]}"#;
        let container = encode(raw).unwrap();
        assert_eq!(decode(&container).unwrap(), raw);
    }

    #[test]
    fn round_trip_empty_input() {
        let container = encode(b"").unwrap();
        assert_eq!(decode(&container).unwrap(), b"");
    }

    #[test]
    fn round_trip_incompressible_input() {
        // A pseudo-random byte pattern that LZ4 cannot shrink.
        let raw: Vec<u8> = (0u32..4096)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        let container = encode(&raw).unwrap();
        assert_eq!(decode(&container).unwrap(), raw);
    }

    #[test]
    fn header_layout_is_fixed() {
        let raw = b"hello mozlz4";
        let container = encode(raw).unwrap();
        assert_eq!(&container[..8], b"mozLz40\0");
        let len = u32::from_le_bytes(container[8..12].try_into().unwrap());
        assert_eq!(len as usize, raw.len());
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut container = encode(b"payload").unwrap();
        container[0] = b'X';
        assert!(matches!(decode(&container), Err(Mozlz4Error::BadMagic)));
    }

    #[test]
    fn decode_rejects_truncated_header() {
        assert!(matches!(
            decode(b"mozLz40"),
            Err(Mozlz4Error::Truncated(7))
        ));
    }

    #[test]
    fn decode_rejects_length_field_lies() {
        let mut container = encode(b"twelve bytes").unwrap();
        // Inflate the claimed uncompressed length.
        container[8..12].copy_from_slice(&100u32.to_le_bytes());
        assert!(decode(&container).is_err());
    }
}
