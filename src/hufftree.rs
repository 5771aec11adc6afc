use std::cmp::Ordering;

use log::debug;

use crate::bit_vec::BitVec;
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn new(root: HuffNode) -> Self {
        HuffmanTree { root }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Greedy Huffman construction.
    ///
    /// Leaves enter the heap in ascending symbol order and every merged node
    /// takes the next sequence number. Entries of equal weight come out in
    /// insertion order; the first one extracted becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let mut sequence = 0u64;
        let mut next_order = || {
            sequence += 1;
            sequence
        };

        let leaves: Vec<QueuedNode> = frequencies
            .iter()
            .map(|(symbol, count)| QueuedNode {
                order: next_order(),
                node: HuffNode::new(symbol, count),
            })
            .collect();
        let mut heap = MinHeap::build(leaves);

        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            heap.insert(QueuedNode {
                order: next_order(),
                node: HuffNode::merge(x.node, y.node),
            });
        }

        let root = heap.extract_min()?.node;
        let tree = HuffmanTree { root };
        debug!(
            "built tree over {} symbols, depth {}, weight {}",
            tree.leaf_count(),
            tree.depth(),
            tree.weight()
        );
        Ok(tree)
    }

    pub fn generate_table(&self) -> CodeTable {
        let mut table = CodeTable::default();
        self.root.generate_table(&mut table, BitVec::new());
        table
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Longest root-to-leaf path; 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Leaf weights gathered back into a frequency table.
    pub fn frequencies(&self) -> FrequencyTable {
        let mut leaves = Vec::with_capacity(self.leaf_count());
        self.root.collect_leaves(&mut leaves);
        leaves.into_iter().collect()
    }

    /// True when every internal weight equals the sum of its children.
    ///
    /// Always holds for built trees; a parsed tree keeps whatever weights the text held.
    pub fn validate_weights(&self) -> bool {
        self.root.validate_weights()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: u8, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn merge(left: Self, right: Self) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn generate_table(&self, code_table: &mut CodeTable, code: BitVec) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                code_table.insert(*symbol, code);
            }
            HuffNode::Internal { left, right, .. } => {
                // Left = 0, Right = 1
                let mut left_code = code.clone();
                left_code.push_bit(false);
                left.generate_table(code_table, left_code);

                let mut right_code = code;
                right_code.push_bit(true);
                right.generate_table(code_table, right_code);
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<(u8, u64)>) {
        match self {
            HuffNode::Leaf { symbol, weight } => leaves.push((*symbol, *weight)),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    fn validate_weights(&self) -> bool {
        match self {
            HuffNode::Leaf { .. } => true,
            HuffNode::Internal {
                weight,
                left,
                right,
            } => {
                left.weight().checked_add(right.weight()) == Some(*weight)
                    && left.validate_weights()
                    && right.validate_weights()
            }
        }
    }
}

/// Heap entry ordered by weight, then by insertion sequence.
struct QueuedNode {
    order: u64,
    node: HuffNode,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .weight()
            .cmp(&other.node.weight())
            .then(self.order.cmp(&other.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(table: &CodeTable, symbol: u8) -> String {
        table.get(symbol).unwrap().to_string()
    }

    #[test]
    fn test_aaab_tree() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        assert_eq!(tree.weight(), 4);
        assert_eq!(
            tree.root,
            HuffNode::merge(HuffNode::new(b'b', 1), HuffNode::new(b'a', 3))
        );

        let table = tree.generate_table();
        assert_eq!(code_of(&table, b'a'), "1");
        assert_eq!(code_of(&table, b'b'), "0");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            HuffmanTree::from_bytes(&[]),
            Err(HuffmanError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_symbol_is_leaf_root() {
        let tree = HuffmanTree::from_bytes(b"zzzzzz").unwrap();
        assert_eq!(tree.root, HuffNode::new(b'z', 6));
        assert_eq!(tree.depth(), 0);

        let table = tree.generate_table();
        assert!(table.get(b'z').unwrap().is_empty());
    }

    #[test]
    fn test_equal_weights_follow_insertion_order() {
        // a, b, c, d all weight 1: (a,b) then (c,d) then the two pairs
        let tree = HuffmanTree::from_bytes(b"abcd").unwrap();
        let table = tree.generate_table();
        assert_eq!(code_of(&table, b'a'), "00");
        assert_eq!(code_of(&table, b'b'), "01");
        assert_eq!(code_of(&table, b'c'), "10");
        assert_eq!(code_of(&table, b'd'), "11");
    }

    #[test]
    fn test_frequency_conservation() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let frequencies = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();

        assert_eq!(tree.weight(), data.len() as u64);
        assert_eq!(tree.leaf_count(), frequencies.len());
        assert_eq!(tree.frequencies(), frequencies);
        assert!(tree.validate_weights());
    }

    #[test]
    fn test_skewed_weights_give_shorter_codes() {
        let mut data = vec![b'e'; 100];
        data.extend_from_slice(b"xyzw");
        let table = HuffmanTree::from_bytes(&data).unwrap().generate_table();

        let e_len = table.get(b'e').unwrap().len();
        for symbol in *b"xyzw" {
            assert!(table.get(symbol).unwrap().len() > e_len);
        }
    }

    #[test]
    fn test_validate_weights_detects_mismatch() {
        let tree = HuffmanTree::new(HuffNode::Internal {
            weight: 9,
            left: Box::new(HuffNode::new(1, 2)),
            right: Box::new(HuffNode::new(2, 3)),
        });
        assert!(!tree.validate_weights());
    }
}
