//! Huffman encoder.
//!
//! Writes the tree to `tree.json` and the packed bitstream to
//! `encoded_output.bin` unless told otherwise. `--threads N` with N above 1
//! counts and encodes on N workers.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rust_huffman::config::{EncoderConfig, DEFAULT_ENCODED_PATH, DEFAULT_TREE_PATH};
use rust_huffman::huffman_codec::encode_file;

#[derive(Parser)]
#[command(author, version, about = "Compress a file with a static Huffman code")]
struct Args {
    /// File to compress
    input: PathBuf,

    /// Number of workers for counting and encoding
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Where to write the tree
    #[arg(long, default_value = DEFAULT_TREE_PATH)]
    tree: PathBuf,

    /// Where to write the packed bitstream
    #[arg(short, long, default_value = DEFAULT_ENCODED_PATH)]
    output: PathBuf,

    /// Indent the tree file
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = EncoderConfig {
        input: args.input,
        tree_path: args.tree,
        encoded_path: args.output,
        workers: args.threads,
        pretty_tree: args.pretty,
    };

    match encode_file(&config) {
        Ok(report) => {
            println!(
                "Encoded {} bytes into {} bits ({} bytes on disk)",
                report.input_bytes, report.bit_count, report.encoded_bytes
            );
        }
        Err(e) => {
            println!("Error: {e}");
            process::exit(1);
        }
    }
}
