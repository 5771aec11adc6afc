//! Packed bitstream container.
//!
//! Layout: bit count as `u64` little-endian, then `ceil(count / 8)` payload
//! bytes holding the bits MSB-first, the final byte zero-padded. The payload
//! length is never stored; it is whatever follows the header.

use std::io::{self, Read, Write};

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};

pub const HEADER_LEN: usize = 8;

pub fn pack(bits: &BitVec) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + bits.as_bytes().len());
    // Vec<u8> writes cannot fail
    let _ = write_to(&mut bytes, bits);
    bytes
}

pub fn write_to<W: Write>(writer: &mut W, bits: &BitVec) -> io::Result<()> {
    // write the total bit count
    let bit_count = bits.bit_count() as u64;
    writer.write_all(&bit_count.to_le_bytes())?;

    // then the payload, already padded
    writer.write_all(bits.as_bytes())?;
    Ok(())
}

/// Reads exactly the declared number of bits; padding and trailing bytes are ignored.
pub fn unpack(bytes: &[u8]) -> Result<BitVec> {
    let (header, payload) = match bytes.split_first_chunk::<HEADER_LEN>() {
        Some(split) => split,
        None => {
            return Err(HuffmanError::TruncatedStream {
                expected: HEADER_LEN,
                actual: bytes.len(),
            })
        }
    };

    let declared = u64::from_le_bytes(*header);
    let too_long = || HuffmanError::TruncatedStream {
        expected: usize::MAX,
        actual: payload.len(),
    };
    let bit_count = usize::try_from(declared).map_err(|_| too_long())?;
    let expected = bit_count.div_ceil(8);

    if payload.len() < expected {
        return Err(HuffmanError::TruncatedStream {
            expected,
            actual: payload.len(),
        });
    }

    Ok(BitVec::from_prefix(payload, bit_count))
}

pub fn read_from<R: Read>(reader: &mut R) -> Result<BitVec> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    unpack(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_aaab_blob() {
        let bits: BitVec = "1110".parse().unwrap();
        assert_eq!(pack(&bits), vec![4, 0, 0, 0, 0, 0, 0, 0, 0xE0]);
    }

    #[test]
    fn test_thirteen_bits_ignore_padding() {
        let bits: BitVec = "1011001110001".parse().unwrap();
        let mut blob = pack(&bits);
        assert_eq!(blob.len(), HEADER_LEN + 2);
        assert_eq!(blob[HEADER_LEN + 1] & 0b0000_0111, 0);

        assert_eq!(unpack(&blob).unwrap(), bits);

        // whatever sits in the three padding bits is dropped
        blob[HEADER_LEN + 1] |= 0b0000_0111;
        let unpacked = unpack(&blob).unwrap();
        assert_eq!(unpacked.len(), 13);
        assert_eq!(unpacked.to_string(), "1011001110001");
    }

    #[test]
    fn test_empty_stream() {
        let blob = pack(&BitVec::new());
        assert_eq!(blob, vec![0; HEADER_LEN]);
        assert!(unpack(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_extra_bytes_ignored() {
        let mut blob = pack(&"101".parse().unwrap());
        blob.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(unpack(&blob).unwrap().to_string(), "101");
    }

    #[test]
    fn test_truncated_payload() {
        let bits: BitVec = "1".repeat(17).parse().unwrap();
        let blob = pack(&bits);
        assert!(matches!(
            unpack(&blob[..blob.len() - 1]),
            Err(HuffmanError::TruncatedStream { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            unpack(&[1, 0, 0]),
            Err(HuffmanError::TruncatedStream { expected: 8, actual: 3 })
        ));
    }

    #[test]
    fn test_reader_writer() {
        let bits: BitVec = "0110100111".parse().unwrap();
        let mut buffer = Vec::new();
        write_to(&mut buffer, &bits).unwrap();
        assert_eq!(read_from(&mut Cursor::new(buffer)).unwrap(), bits);
    }
}
