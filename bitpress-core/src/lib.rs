//! # Bitpress Core
//!
//! Core components for the bitpress compression toolkit.
//!
//! This crate provides the building blocks shared by every codec:
//!
//! - [`bitstream`]: Bit-granular reader/writer over byte sources and sinks
//! - [`gamma`]: Elias-gamma codes for self-delimiting header integers
//! - [`pending`]: Queue for bits carried across buffer refills
//! - [`header`]: The pad-count field and its end-of-stream backpatch
//! - [`traits`]: The [`FileCodec`] trait
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI                                                     │
//! │     compress / decompress / info                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec                                                   │
//! │     LZSS, Shannon-Fano                                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Header                                                  │
//! │     pad count, Elias-gamma parameters                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ BitStream (this crate)                                  │
//! │     BitReader/BitWriter, PendingBits                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bitpress_core::bitstream::{BitReader, BitWriter};
//! use bitpress_core::gamma;
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     gamma::write(&mut writer, 99).unwrap();
//!     writer.fill_remainder().unwrap();
//!     writer.flush().unwrap();
//! }
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! assert_eq!(gamma::read(&mut reader).unwrap(), 99);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod gamma;
pub mod header;
pub mod pending;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{BitpressError, Result};
pub use pending::PendingBits;
pub use traits::FileCodec;

