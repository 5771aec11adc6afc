use std::io;

use log::warn;

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

#[derive(Debug, Clone, Copy)]
enum State<'t> {
    AtRoot,
    AtInternal(&'t HuffNode),
}

/// Bit-at-a-time tree walker.
///
/// Each bit moves one level down, left on 0 and right on 1. Reaching a leaf
/// emits its symbol and returns to the root. [`Decoder::finish`] consumes the
/// decoder and fails if the last code was left incomplete.
///
/// A tree whose root is a leaf has an empty code, so its stream carries no
/// bits at all: finishing emits the leaf symbol as many times as its weight.
pub struct Decoder<'t> {
    root: &'t HuffNode,
    state: State<'t>,
    bits_consumed: usize,
    output: Vec<u8>,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Decoder {
            root: &tree.root,
            state: State::AtRoot,
            bits_consumed: 0,
            output: Vec::new(),
        }
    }

    pub fn with_capacity(tree: &'t HuffmanTree, capacity: usize) -> Self {
        Decoder {
            output: Vec::with_capacity(capacity),
            ..Decoder::new(tree)
        }
    }

    pub fn push_bit(&mut self, bit: bool) -> Result<()> {
        let current = match self.state {
            State::AtRoot => self.root,
            State::AtInternal(node) => node,
        };

        let next = match current {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            // only a leaf root gets here, and its code has no bits
            HuffNode::Leaf { .. } => {
                return Err(HuffmanError::CorruptStream {
                    bits_consumed: self.bits_consumed,
                })
            }
        };
        self.bits_consumed += 1;

        self.state = match next {
            HuffNode::Leaf { symbol, .. } => {
                self.output.push(*symbol);
                State::AtRoot
            }
            internal => State::AtInternal(internal),
        };
        Ok(())
    }

    pub fn bits_consumed(&self) -> usize {
        self.bits_consumed
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        if let State::AtInternal(_) = self.state {
            return Err(HuffmanError::CorruptStream {
                bits_consumed: self.bits_consumed,
            });
        }

        if let HuffNode::Leaf { symbol, weight } = *self.root {
            let repeat = usize::try_from(weight).map_err(|_| out_of_memory(weight))?;
            self.output
                .try_reserve_exact(repeat)
                .map_err(|_| out_of_memory(weight))?;
            self.output.resize(repeat, symbol);
        }

        Ok(self.output)
    }
}

fn out_of_memory(weight: u64) -> HuffmanError {
    HuffmanError::Io(io::Error::new(
        io::ErrorKind::OutOfMemory,
        format!("cannot hold {weight} decoded bytes"),
    ))
}

/// Decodes a whole bitstream against `tree`.
pub fn decode(tree: &HuffmanTree, bits: &BitVec) -> Result<Vec<u8>> {
    // every symbol of a multi-leaf tree costs at least one bit
    let capacity = usize::try_from(tree.weight()).map_or(bits.len(), |w| w.min(bits.len()));
    let mut decoder = Decoder::with_capacity(tree, capacity);

    for bit in bits.iter() {
        decoder.push_bit(bit)?;
    }
    let output = decoder.finish()?;

    if output.len() as u64 != tree.weight() {
        warn!(
            "decoded {} bytes but the tree root weighs {}",
            output.len(),
            tree.weight()
        );
    }
    Ok(output)
}
