//! Record encoding
//!
//! Builds the full on-disk byte image of a new record. Decoding lives on
//! [`RecordHeader`](super::RecordHeader); record bodies are read directly from
//! the file by the scan layer.

use crate::error::{Result, StashError};

use super::RecordHeader;

/// Encode a new live record: `[0x01][key_len BE][value_len BE][key][value]`
///
/// The live bit is always set for freshly written records. Key and value are
/// arbitrary bytes (empty allowed); each length must fit the on-disk u32
/// field, otherwise `RecordTooLarge`.
pub fn encode_record(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let (key_len, value_len) = match (u32::try_from(key.len()), u32::try_from(value.len())) {
        (Ok(k), Ok(v)) => (k, v),
        _ => {
            return Err(StashError::RecordTooLarge {
                key_len: key.len(),
                value_len: value.len(),
            })
        }
    };

    let header = RecordHeader::new(key_len, value_len);

    let mut bytes = Vec::with_capacity(header.total_size() as usize);
    bytes.extend_from_slice(&header.encode());
    bytes.extend_from_slice(key);
    bytes.extend_from_slice(value);

    Ok(bytes)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::HEADER_SIZE;

    #[test]
    fn encodes_header_then_key_then_value() {
        let bytes = encode_record(b"abc", b"wxyz").unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE + 3 + 4);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[1..5], &3u32.to_be_bytes());
        assert_eq!(&bytes[5..9], &4u32.to_be_bytes());
        assert_eq!(&bytes[9..12], b"abc");
        assert_eq!(&bytes[12..], b"wxyz");
    }

    #[test]
    fn encodes_empty_key_and_value() {
        let bytes = encode_record(b"", b"").unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE);
        let header = RecordHeader::decode(&bytes, 0).unwrap();
        assert!(header.is_live());
        assert_eq!(header.body_size(), 0);
    }

    #[test]
    fn encoded_header_round_trips_through_decode() {
        let bytes = encode_record(b"key-1", b"value-1").unwrap();
        let header = RecordHeader::decode(&bytes, 0).unwrap();

        assert_eq!(header.key_len(), 5);
        assert_eq!(header.value_len(), 7);
        assert_eq!(header.total_size() as usize, bytes.len());
    }
}
