use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};

use crate::bit_vec::BitVec;
use crate::code_table::CodeTable;
use crate::config::{DecoderConfig, EncoderConfig};
use crate::decoder;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::packed;
use crate::parallel::WorkerPool;
use crate::tree_codec;

/// One tree and the code table generated from it.
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = tree.generate_table();
        HuffmanCodec { tree, encode_table }
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_frequencies(frequencies)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    pub fn into_tree(self) -> HuffmanTree {
        self.tree
    }

    pub fn encode(&self, data: &[u8]) -> Result<BitVec> {
        let mut bits = BitVec::new();
        self.encode_table.encode_into(data, &mut bits)?;
        Ok(bits)
    }

    fn encode_sized(&self, data: &[u8], frequencies: &FrequencyTable) -> Result<BitVec> {
        let expected = self
            .encode_table
            .encoded_bit_len(frequencies.iter())
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        debug!("payload will hold {expected} bits");

        let mut bits = BitVec::with_capacity(expected);
        self.encode_table.encode_into(data, &mut bits)?;
        Ok(bits)
    }

    /// Encodes every partition on `pool` into a private bitstream, then
    /// concatenates them by partition index.
    pub fn encode_parallel(&self, data: &[u8], pool: &WorkerPool) -> Result<BitVec> {
        let parts = pool.map_partitions(data, |chunk| self.encode(chunk));

        let mut bits = BitVec::new();
        for part in parts {
            bits.extend(&part?);
        }
        Ok(bits)
    }

    pub fn decode(&self, bits: &BitVec) -> Result<Vec<u8>> {
        decoder::decode(&self.tree, bits)
    }
}

/// Result of compressing one input: the tree (absent for empty input) and the bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub tree: Option<HuffmanTree>,
    pub bits: BitVec,
}

impl Encoded {
    /// Tree file contents; empty when there is no tree.
    pub fn tree_text(&self) -> String {
        self.tree.as_ref().map(tree_codec::to_json).unwrap_or_default()
    }

    pub fn packed(&self) -> Vec<u8> {
        packed::pack(&self.bits)
    }
}

pub fn compress(data: &[u8]) -> Result<Encoded> {
    let frequencies = FrequencyTable::from_bytes(data);
    compress_counted(data, &frequencies, |codec| codec.encode_sized(data, &frequencies))
}

pub fn compress_parallel(data: &[u8], pool: &WorkerPool) -> Result<Encoded> {
    let frequencies = FrequencyTable::from_bytes_parallel(data, pool);
    compress_counted(data, &frequencies, |codec| codec.encode_parallel(data, pool))
}

fn compress_counted<F>(data: &[u8], frequencies: &FrequencyTable, encode: F) -> Result<Encoded>
where
    F: FnOnce(&HuffmanCodec) -> Result<BitVec>,
{
    if data.is_empty() {
        return Ok(Encoded {
            tree: None,
            bits: BitVec::new(),
        });
    }
    let codec = HuffmanCodec::from_frequencies(frequencies)?;
    let bits = encode(&codec)?;
    Ok(Encoded {
        tree: Some(codec.into_tree()),
        bits,
    })
}

pub fn decompress(tree: Option<&HuffmanTree>, bits: &BitVec) -> Result<Vec<u8>> {
    match tree {
        Some(tree) => decoder::decode(tree, bits),
        None if bits.is_empty() => Ok(Vec::new()),
        None => Err(HuffmanError::CorruptStream { bits_consumed: 0 }),
    }
}

/// Reads a tree file's contents. Blank text means "no tree" (the encoding of empty input).
pub fn read_tree_text(text: &str) -> Result<Option<HuffmanTree>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let mut parser = tree_codec::Parser::new(text);
    let tree = parser.parse_tree()?;

    let rest = parser.rest();
    if !rest.is_empty() {
        warn!(
            "ignoring {} bytes after the tree object at offset {}",
            rest.len(),
            parser.offset()
        );
    }
    if !tree.validate_weights() {
        warn!("tree file has internal weights that differ from the sum of their children");
    }
    Ok(Some(tree))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeReport {
    pub input_bytes: u64,
    pub encoded_bytes: u64,
    pub bit_count: u64,
}

impl EncodeReport {
    /// Encoded file size over input size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.encoded_bytes as f64 / self.input_bytes as f64
    }
}

fn timed<T>(what: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let value = f();
    info!("{what} in {} ms", start.elapsed().as_millis());
    value
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        HuffmanError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read {}: {e}", path.display()),
        ))
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        HuffmanError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot write {}: {e}", path.display()),
        ))
    })
}

/// Reads the input file and writes the tree file and the packed bitstream.
pub fn encode_file(config: &EncoderConfig) -> Result<EncodeReport> {
    config.validate()?;

    let data = timed("read input file", || read_file(&config.input))?;

    let pool = if config.is_parallel() {
        let pool = WorkerPool::new(config.workers)?;
        debug!("encoding with {} workers", pool.workers());
        Some(pool)
    } else {
        None
    };

    let frequencies = timed("built frequency table", || match &pool {
        Some(pool) => FrequencyTable::from_bytes_parallel(&data, pool),
        None => FrequencyTable::from_bytes(&data),
    });
    debug!("{} distinct symbols", frequencies.len());

    let encoded = if data.is_empty() {
        Encoded {
            tree: None,
            bits: BitVec::new(),
        }
    } else {
        let codec = timed("built Huffman tree", || {
            HuffmanCodec::from_frequencies(&frequencies)
        })?;
        let bits = timed("encoded input", || match &pool {
            Some(pool) => codec.encode_parallel(&data, pool),
            None => codec.encode_sized(&data, &frequencies),
        })?;
        Encoded {
            tree: Some(codec.into_tree()),
            bits,
        }
    };

    let tree_text = match (&encoded.tree, config.pretty_tree) {
        (Some(tree), true) => tree_codec::to_json_pretty(tree),
        _ => encoded.tree_text(),
    };
    let blob = encoded.packed();

    timed("wrote output files", || -> Result<()> {
        write_file(&config.tree_path, tree_text.as_bytes())?;
        write_file(&config.encoded_path, &blob)
    })?;

    let report = EncodeReport {
        input_bytes: data.len() as u64,
        encoded_bytes: blob.len() as u64,
        bit_count: encoded.bits.len() as u64,
    };
    info!("compression ratio: {:.4}", report.ratio());
    Ok(report)
}

/// Reads the tree file and the packed bitstream and writes the decoded bytes.
pub fn decode_file(config: &DecoderConfig) -> Result<u64> {
    let tree_bytes = read_file(&config.tree_path)?;
    let tree_text = std::str::from_utf8(&tree_bytes)
        .map_err(|e| HuffmanError::parse(e.valid_up_to(), "tree file is not valid UTF-8"))?;
    let tree = timed("read Huffman tree", || read_tree_text(tree_text))?;

    let blob = read_file(&config.encoded_path)?;
    let bits = timed("read encoded file", || packed::unpack(&blob))?;
    debug!("payload holds {} bits", bits.len());

    let output = timed("decoded bits", || decompress(tree.as_ref(), &bits))?;
    write_file(&config.output_path, &output)?;
    info!(
        "wrote {} bytes to {}",
        output.len(),
        config.output_path.display()
    );
    Ok(output.len() as u64)
}
