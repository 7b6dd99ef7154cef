//! OxiPack CLI
//!
//! Compress, decompress and inspect files with the LZ77, Huffman,
//! Deflate-style and LZW codecs.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{CodecArgs, cmd_compress, cmd_decompress, cmd_stats, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxipack")]
#[command(author, version, about = "Pure Rust byte-stream codecs")]
#[command(long_about = "
OxiPack compresses single files with a choice of codecs.
Supported codecs: deflate (LZ77 + Huffman), lz77, huffman, lzw

Examples:
  oxipack compress notes.txt notes.oxp
  oxipack compress notes.txt notes.lzw --codec lzw
  oxipack decompress notes.oxp notes.txt
  oxipack compress big.log big.oxp --window-size 32768 --lookahead 64
  oxipack test *.txt --codec huffman
  oxipack stats notes.txt --json
")]
struct Cli {
    /// Emit diagnostics on stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// Input file
        src: PathBuf,

        /// Output file
        dest: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Decompress a file
    #[command(alias = "d")]
    Decompress {
        /// Compressed input file
        src: PathBuf,

        /// Output file
        dest: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Round-trip files in memory and verify the result
    #[command(alias = "t")]
    Test {
        /// Files to test
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show entropy, token counts and ratio per codec
    #[command(alias = "s")]
    Stats {
        /// File to analyze
        file: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Compress { src, dest, codec } => cmd_compress(&src, &dest, &codec),
        Commands::Decompress { src, dest, codec } => cmd_decompress(&src, &dest, &codec),
        Commands::Test {
            files,
            codec,
            no_progress,
        } => cmd_test(&files, &codec, !no_progress),
        Commands::Stats { file, codec, json } => cmd_stats(&file, &codec, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
