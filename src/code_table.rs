use std::collections::BTreeMap;

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};

/// Symbol to code, one entry per leaf of the tree it was generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, BitVec>,
}

impl CodeTable {
    pub(crate) fn insert(&mut self, symbol: u8, code: BitVec) {
        self.codes.insert(symbol, code);
    }

    pub fn get(&self, symbol: u8) -> Option<&BitVec> {
        self.codes.get(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Appends the code of every byte of `data`, in input order.
    pub fn encode_into(&self, data: &[u8], out: &mut BitVec) -> Result<()> {
        for &byte in data {
            let code = self.get(byte).ok_or(HuffmanError::UnknownSymbol(byte))?;
            out.extend(code);
        }
        Ok(())
    }

    /// Exact number of bits `encode_into` produces for input with these counts.
    pub fn encoded_bit_len(&self, counts: impl IntoIterator<Item = (u8, u64)>) -> Option<u64> {
        counts.into_iter().try_fold(0u64, |total, (symbol, count)| {
            let len = self.get(symbol)?.len() as u64;
            total.checked_add(len.checked_mul(count)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::hufftree::HuffmanTree;

    fn is_prefix(a: &BitVec, b: &BitVec) -> bool {
        a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; 1 + b as usize % 7]).collect();
        let table = HuffmanTree::from_bytes(&data).unwrap().generate_table();
        assert_eq!(table.len(), 256);

        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(!is_prefix(code_a, code_b), "{a} prefixes {b}");
                }
            }
        }
    }

    #[test]
    fn test_encode_aaab() {
        let table = HuffmanTree::from_bytes(b"aaab").unwrap().generate_table();
        let mut bits = BitVec::new();
        table.encode_into(b"aaab", &mut bits).unwrap();
        assert_eq!(bits.to_string(), "1110");
    }

    #[test]
    fn test_unknown_symbol() {
        let table = HuffmanTree::from_bytes(b"ab").unwrap().generate_table();
        let mut bits = BitVec::new();
        assert!(matches!(
            table.encode_into(b"abc", &mut bits),
            Err(HuffmanError::UnknownSymbol(b'c'))
        ));
    }

    #[test]
    fn test_encoded_bit_len_matches_encoding() {
        let data = b"mississippi river";
        let table = HuffmanTree::from_bytes(data).unwrap().generate_table();
        let mut bits = BitVec::new();
        table.encode_into(data, &mut bits).unwrap();

        let counts = FrequencyTable::from_bytes(data);
        assert_eq!(table.encoded_bit_len(counts.iter()), Some(bits.len() as u64));
    }
}
