//! Bitpress CLI
//!
//! Compresses and restores single files with bit-granular LZSS or two-pass
//! Shannon-Fano coding.

mod commands;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{cmd_compress, cmd_decompress, cmd_info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bitpress")]
#[command(author, version, about = "Bit-granular LZSS and Shannon-Fano compression")]
#[command(long_about = "
Bitpress compresses single files with one of two codecs:
  lzss          sliding history with literal and back-reference records
  shannon-fano  static prefix codes over fixed-width words

Compressed files carry no format marker, so the codec must be named
again when decompressing or inspecting a file.

Examples:
  bitpress compress --codec lzss notes.txt notes.lzss
  bitpress compress --codec lzss --history-bits 14 --match-bits 6 data.bin data.lzss
  bitpress compress --codec shannon-fano --word-bits 12 data.bin data.sf
  bitpress decompress --codec shannon-fano data.sf data.bin
  bitpress info --codec lzss --json notes.lzss
")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
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
        /// File to compress
        input: PathBuf,

        /// Compressed output file
        output: PathBuf,

        #[command(flatten)]
        options: CodecOptions,
    },

    /// Restore a compressed file
    #[command(alias = "d")]
    Decompress {
        /// Compressed file
        input: PathBuf,

        /// Restored output file
        output: PathBuf,

        /// Codec the file was compressed with
        #[arg(short, long, value_enum)]
        codec: Codec,
    },

    /// Show the header of a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        file: PathBuf,

        /// Codec the file was compressed with
        #[arg(short, long, value_enum)]
        codec: Codec,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Codec {
    /// Bit-granular LZSS
    Lzss,
    /// Two-pass static Shannon-Fano
    ShannonFano,
}

/// Encoder parameters shared by every codec; each codec reads its own.
#[derive(Debug, Clone, Copy, Args)]
pub struct CodecOptions {
    /// Codec to compress with
    #[arg(short, long, value_enum)]
    pub codec: Codec,

    /// LZSS: offset field width (history holds up to 2^N - 1 bytes)
    #[arg(long, default_value_t = 12)]
    pub history_bits: u8,

    /// LZSS: length field width (matches span up to 2^N - 1 bytes)
    #[arg(long, default_value_t = 4)]
    pub match_bits: u8,

    /// LZSS: match candidates examined (0 = all, 1 = first, N = best of N)
    #[arg(long, default_value_t = 0)]
    pub search_depth: u32,

    /// Shannon-Fano: word width in bits
    #[arg(long, default_value_t = 8)]
    pub word_bits: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            options,
        } => cmd_compress(&input, &output, &options),
        Commands::Decompress {
            input,
            output,
            codec,
        } => cmd_decompress(&input, &output, codec),
        Commands::Info { file, codec, json } => cmd_info(&file, codec, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
