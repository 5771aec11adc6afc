use std::fmt;
use std::str::FromStr;

/// Bit sequence packed MSB-first into bytes, with an exact bit count.
///
/// Bits past `bit_count` in the last byte are always zero.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            // set bit with OR  and mask
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Appends every bit of `other`, whatever the current alignment.
    pub fn extend(&mut self, other: &BitVec) {
        if self.bit_count % 8 == 0 {
            // byte aligned, copy whole bytes
            self.bits.truncate(self.bit_count / 8);
            self.bits.extend_from_slice(&other.bits);
            self.bit_count += other.bit_count;
            return;
        }
        for bit in other.iter() {
            self.push_bit(bit);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some((self.bits[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| (self.bits[i / 8] >> (7 - i % 8)) & 1 == 1)
    }

    /// Takes the first `bit_count` bits of `bytes`, zeroing any padding.
    ///
    /// `bytes` must hold at least `ceil(bit_count / 8)` bytes; extra bytes are dropped.
    pub(crate) fn from_prefix(bytes: &[u8], bit_count: usize) -> Self {
        let byte_len = bit_count.div_ceil(8);
        let mut bits = bytes[..byte_len].to_vec();

        let tail = bit_count % 8;
        if tail != 0 {
            if let Some(last) = bits.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }

        BitVec { bits, bit_count }
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBitChar(pub char);

impl fmt::Display for InvalidBitChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected '0' or '1', found {:?}", self.0)
    }
}

impl std::error::Error for InvalidBitChar {}

impl FromStr for BitVec {
    type Err = InvalidBitChar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = BitVec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push_bit(false),
                '1' => bits.push_bit(true),
                other => return Err(InvalidBitChar(other)),
            }
        }
        Ok(bits)
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitVec::new();
        for bit in iter {
            bits.push_bit(bit);
        }
        bits
    }
}
