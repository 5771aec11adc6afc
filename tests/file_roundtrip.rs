//! File-level encode/decode runs through the public API.

use std::fs;
use std::path::Path;

use rust_huffman::config::{DecoderConfig, EncoderConfig};
use rust_huffman::huffman_codec::{decode_file, encode_file};
use rust_huffman::HuffmanError;
use tempfile::tempdir;

fn run(dir: &Path, data: &[u8], workers: usize, pretty: bool) -> Vec<u8> {
    let input = dir.join("input.txt");
    fs::write(&input, data).unwrap();

    let encoder = EncoderConfig {
        tree_path: dir.join("tree.json"),
        encoded_path: dir.join("encoded_output.bin"),
        workers,
        pretty_tree: pretty,
        ..EncoderConfig::new(&input)
    };
    let report = encode_file(&encoder).unwrap();
    assert_eq!(report.input_bytes, data.len() as u64);
    assert_eq!(
        report.encoded_bytes,
        fs::metadata(&encoder.encoded_path).unwrap().len()
    );

    let decoder = DecoderConfig {
        output_path: dir.join("decoded_output.txt"),
        ..DecoderConfig::new(&encoder.tree_path, &encoder.encoded_path)
    };
    let written = decode_file(&decoder).unwrap();
    assert_eq!(written, data.len() as u64);

    fs::read(&decoder.output_path).unwrap()
}

const TEXT: &[u8] = b"Huffman encoding is a greedy algorithm that builds optimal prefix codes. \
The quick brown fox jumps over the lazy dog.\n";

#[test]
fn test_text_sequential() {
    let dir = tempdir().unwrap();
    assert_eq!(run(dir.path(), TEXT, 1, false), TEXT);
}

#[test]
fn test_text_parallel() {
    let dir = tempdir().unwrap();
    let data = TEXT.repeat(50);
    assert_eq!(run(dir.path(), &data, 4, false), data);
}

#[test]
fn test_parallel_and_sequential_files_identical() {
    let data = TEXT.repeat(20);
    let seq = tempdir().unwrap();
    let par = tempdir().unwrap();
    run(seq.path(), &data, 1, false);
    run(par.path(), &data, 3, false);

    for name in ["tree.json", "encoded_output.bin"] {
        assert_eq!(
            fs::read(seq.path().join(name)).unwrap(),
            fs::read(par.path().join(name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn test_pretty_tree() {
    let dir = tempdir().unwrap();
    assert_eq!(run(dir.path(), TEXT, 2, true), TEXT);
    let tree = fs::read_to_string(dir.path().join("tree.json")).unwrap();
    assert!(tree.starts_with("{\n  \"freq\": "));
}

#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    assert!(run(dir.path(), &[], 2, false).is_empty());
    assert!(fs::read(dir.path().join("tree.json")).unwrap().is_empty());
    assert_eq!(fs::read(dir.path().join("encoded_output.bin")).unwrap(), vec![0; 8]);
}

#[test]
fn test_identical_bytes() {
    let dir = tempdir().unwrap();
    let data = vec![0u8; 777];
    assert_eq!(run(dir.path(), &data, 1, false), data);
    assert_eq!(
        fs::read_to_string(dir.path().join("tree.json")).unwrap(),
        r#"{"ch":0,"freq":777}"#
    );
}

#[test]
fn test_all_byte_values() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..=255u8).rev().cycle().take(3000).collect();
    assert_eq!(run(dir.path(), &data, 8, false), data);
}

#[test]
fn test_missing_input() {
    let dir = tempdir().unwrap();
    let config = EncoderConfig {
        tree_path: dir.path().join("tree.json"),
        encoded_path: dir.path().join("out.bin"),
        ..EncoderConfig::new(dir.path().join("nope.txt"))
    };
    let err = encode_file(&config).unwrap_err();
    assert!(matches!(err, HuffmanError::Io(_)));
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn test_malformed_tree_file() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree.json");
    let bin = dir.path().join("encoded.bin");
    fs::write(&tree, r#"{"ch":97;"freq":3}"#).unwrap();
    fs::write(&bin, [0u8; 8]).unwrap();

    let err = decode_file(&DecoderConfig {
        output_path: dir.path().join("out.txt"),
        ..DecoderConfig::new(&tree, &bin)
    })
    .unwrap_err();
    assert!(matches!(err, HuffmanError::Parse { offset: 8, .. }));
}

#[test]
fn test_truncated_encoded_file() {
    let dir = tempdir().unwrap();
    run(dir.path(), TEXT, 1, false);

    let bin = dir.path().join("encoded_output.bin");
    let mut blob = fs::read(&bin).unwrap();
    blob.truncate(blob.len() - 1);
    fs::write(&bin, &blob).unwrap();

    let err = decode_file(&DecoderConfig {
        output_path: dir.path().join("again.txt"),
        ..DecoderConfig::new(dir.path().join("tree.json"), &bin)
    })
    .unwrap_err();
    assert!(matches!(err, HuffmanError::TruncatedStream { .. }));
}
