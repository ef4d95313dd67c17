//! Elias-gamma codes for header integers.
//!
//! Every header integer whose magnitude is not fixed ahead of time is stored
//! as an Elias-gamma code, which is self-delimiting and needs no length
//! prefix. Zero is made representable by coding `n + 1`:
//!
//! ```text
//! n = 0   ->  1
//! n = 1   ->  010
//! n = 4   ->  00101
//! n = 99  ->  0000001100100
//! ```
//!
//! The code for `n` is `floor(log2(n + 1))` zero bits followed by the plain
//! binary form of `n + 1`, whose leading bit is always 1.

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{BitpressError, Result};
use std::io::{Read, Write};

/// Largest value that can be encoded (`n + 1` must fit in a `u64`).
pub const MAX_VALUE: u64 = u64::MAX - 1;

/// Number of bits in the code for `n`.
pub fn encoded_len(n: u64) -> u32 {
    let m = n.saturating_add(1);
    2 * m.ilog2() + 1
}

/// Encode `n` as a sequence of `0`/`1` values.
pub fn encode(n: u64) -> Result<Vec<u8>> {
    let m = n
        .checked_add(1)
        .ok_or_else(|| BitpressError::value_too_wide(n, 64))?;
    let significant = m.ilog2();

    let mut bits = vec![0u8; significant as usize];
    bits.extend((0..=significant).rev().map(|shift| ((m >> shift) & 1) as u8));
    Ok(bits)
}

/// Write the code for `n`.
pub fn write<W: Write>(writer: &mut BitWriter<W>, n: u64) -> Result<()> {
    writer.write(&encode(n)?)
}

/// Read one code and return the integer it represents.
pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<u64> {
    let mut zeros = 0u8;
    loop {
        match reader.read_bit()? {
            Some(1) => break,
            Some(0) => {
                zeros += 1;
                if zeros > 63 {
                    return Err(BitpressError::malformed(
                        reader.bit_position(),
                        "Elias-gamma prefix longer than 63 zero bits",
                    ));
                }
            }
            Some(bit) => {
                return Err(BitpressError::malformed(
                    reader.bit_position(),
                    format!("bit value {bit} is not 0 or 1"),
                ));
            }
            None => return Err(BitpressError::unexpected_eof(reader.bit_position())),
        }
    }

    let rest = reader.read_value(zeros)?;
    let m = (1u64 << zeros) | rest;
    Ok(m - 1)
}
