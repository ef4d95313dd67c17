//! Pad-count header field shared by every bitpress file format.
//!
//! Every compressed file starts with a 3-bit field holding the number of
//! zero bits used to pad the final byte. The encoder cannot know that number
//! until the whole payload is written, so it writes a zero placeholder first
//! and patches the top three bits of byte 0 once the stream is finished.
//!
//! ```text
//! byte 0:  [p p p x x x x x]   p = pad count (0-7), x = first header bits
//! ```

use crate::bitstream::{BitReader, BitWriter};
use crate::error::Result;
use std::io::{Read, Seek, Write};

/// Width of the pad-count field.
pub const PAD_FIELD_BITS: u8 = 3;

const PAD_SHIFT: u8 = 8 - PAD_FIELD_BITS;
const PAYLOAD_MASK: u8 = (1 << PAD_SHIFT) - 1;

/// Write the zero placeholder that [`finish_with_pad_count`] later patches.
///
/// Must be the first thing written to the sink.
pub fn write_pad_placeholder<W: Write>(writer: &mut BitWriter<W>) -> Result<()> {
    writer.write_value(0, PAD_FIELD_BITS)
}

/// Read the pad-count field and arm the reader to drop that many bits at EOF.
pub fn read_pad_count<R: Read>(reader: &mut BitReader<R>) -> Result<u8> {
    let pad = reader.read_value(PAD_FIELD_BITS)? as u8;
    reader.ignore_last_bits_at_eof(pad as usize)?;
    Ok(pad)
}

/// Merge a pad count into the first byte of a stream.
pub fn patch_first_byte(first: u8, pad: u8) -> u8 {
    (first & PAYLOAD_MASK) | (pad << PAD_SHIFT)
}

/// Pad the final byte, flush, and backpatch the pad count at offset 0.
///
/// Returns the number of padding bits. The sink is left positioned at its end.
pub fn finish_with_pad_count<W: Write + Seek>(writer: &mut BitWriter<W>) -> Result<u8> {
    let pad = writer.fill_remainder()?;
    writer.flush()?;

    if pad > 0 {
        if let Some(first) = writer.first_byte() {
            writer.seek_to_beginning()?;
            writer.write_raw(&[patch_first_byte(first, pad)])?;
            writer.seek_to_end()?;
        }
    }

    Ok(pad)
}
