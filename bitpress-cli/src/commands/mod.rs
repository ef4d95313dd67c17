//! Command implementations for the bitpress CLI.

pub mod compress;
pub mod decompress;
pub mod info;

pub use compress::cmd_compress;
pub use decompress::cmd_decompress;
pub use info::cmd_info;

use crate::Codec;
use bitpress_core::traits::FileCodec;
use bitpress_lzss::LzssCodec;
use bitpress_shannon::ShannonFanoCodec;

/// Codec with default encoder parameters. Decoding reads every parameter
/// from the file header, so this is all `decompress` needs.
pub fn file_codec(codec: Codec) -> Box<dyn FileCodec> {
    match codec {
        Codec::Lzss => Box::new(LzssCodec::default()),
        Codec::ShannonFano => Box::new(ShannonFanoCodec::default()),
    }
}
