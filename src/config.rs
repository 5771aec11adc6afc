//! Settings for the file-level encode and decode runs.

use std::path::PathBuf;

use crate::error::{HuffmanError, Result};

pub const DEFAULT_TREE_PATH: &str = "tree.json";
pub const DEFAULT_ENCODED_PATH: &str = "encoded_output.bin";
pub const DEFAULT_DECODED_PATH: &str = "decoded_output.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub input: PathBuf,
    pub tree_path: PathBuf,
    pub encoded_path: PathBuf,
    /// 1 runs the sequential encoder, more runs the fork-join one
    pub workers: usize,
    /// Write the tree indented instead of compact
    pub pretty_tree: bool,
}

impl EncoderConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        EncoderConfig {
            input: input.into(),
            tree_path: PathBuf::from(DEFAULT_TREE_PATH),
            encoded_path: PathBuf::from(DEFAULT_ENCODED_PATH),
            workers: 1,
            pretty_tree: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(HuffmanError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.tree_path == self.encoded_path {
            return Err(HuffmanError::InvalidConfig(format!(
                "tree and encoded output are both {}",
                self.tree_path.display()
            )));
        }
        Ok(())
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    pub tree_path: PathBuf,
    pub encoded_path: PathBuf,
    pub output_path: PathBuf,
}

impl DecoderConfig {
    pub fn new(tree_path: impl Into<PathBuf>, encoded_path: impl Into<PathBuf>) -> Self {
        DecoderConfig {
            tree_path: tree_path.into(),
            encoded_path: encoded_path.into(),
            output_path: PathBuf::from(DEFAULT_DECODED_PATH),
        }
    }
}
