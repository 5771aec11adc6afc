//! # rust_huffman
//!
//! Static Huffman compression. The encoder counts byte frequencies, builds a
//! tree, writes that tree as text and packs the symbol codes behind a 64-bit
//! bit-count header. Counting and encoding can run fork-join over a fixed
//! number of workers and produce exactly the bits of the sequential path.
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_huffman::huffman_codec::{compress, decompress, read_tree_text};
//! use rust_huffman::packed;
//!
//! let encoded = compress(b"abracadabra")?;
//! let tree_file = encoded.tree_text();
//! let bin_file = encoded.packed();
//!
//! let tree = read_tree_text(&tree_file)?;
//! let bits = packed::unpack(&bin_file)?;
//! assert_eq!(decompress(tree.as_ref(), &bits)?, b"abracadabra");
//! # Ok::<(), rust_huffman::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod config;
pub mod decoder;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod packed;
pub mod parallel;
pub mod tree_codec;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use code_table::CodeTable;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{Encoded, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
pub use parallel::WorkerPool;
