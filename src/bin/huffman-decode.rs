//! Huffman decoder.
//!
//! Reads a tree file and a packed bitstream written by `huffman-encode` and
//! writes the original bytes to `decoded_output.txt` unless told otherwise.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rust_huffman::config::{DecoderConfig, DEFAULT_DECODED_PATH};
use rust_huffman::huffman_codec::decode_file;

#[derive(Parser)]
#[command(author, version, about = "Restore a file compressed by huffman-encode")]
struct Args {
    /// Tree file written by the encoder
    tree: PathBuf,

    /// Packed bitstream written by the encoder
    encoded: PathBuf,

    /// Where to write the decoded bytes
    #[arg(short, long, default_value = DEFAULT_DECODED_PATH)]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = DecoderConfig {
        tree_path: args.tree,
        encoded_path: args.encoded,
        output_path: args.output,
    };

    match decode_file(&config) {
        Ok(written) => println!("Decoded {written} bytes to {}", config.output_path.display()),
        Err(e) => {
            println!("Error: {e}");
            process::exit(1);
        }
    }
}
