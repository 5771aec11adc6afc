//! Error type shared by every stage of the codec.

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Errors produced while counting, building, encoding, packing or decoding.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// File missing, unreadable or unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tree text
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset into the tree text where parsing stopped
        offset: usize,
        /// What the parser expected
        message: String,
    },

    /// A tree cannot be built from zero symbols
    #[error("empty input: cannot build a tree from an empty frequency table")]
    EmptyInput,

    /// Payload shorter than its bit-count header requires
    #[error("truncated stream: expected {expected} bytes, found {actual}")]
    TruncatedStream {
        /// Bytes required by the header
        expected: usize,
        /// Bytes physically present
        actual: usize,
    },

    /// Bitstream ended in the middle of a code
    #[error("corrupt stream: bits ended mid-code after {bits_consumed} bits")]
    CorruptStream {
        /// Number of bits walked before the stream ran out
        bits_consumed: usize,
    },

    /// Byte with no entry in the code table
    #[error("byte {0} is not in the code table")]
    UnknownSymbol(u8),

    #[error("priority queue error: {0:?}")]
    Heap(HeapErr),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not start worker pool: {0}")]
    ThreadPool(String),
}

impl From<HeapErr> for HuffmanError {
    fn from(e: HeapErr) -> Self {
        HuffmanError::Heap(e)
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;

impl HuffmanError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        HuffmanError::Parse {
            offset,
            message: message.into(),
        }
    }
}
