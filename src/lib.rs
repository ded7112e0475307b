//! # huffpack
//!
//! Byte-oriented Huffman coding. `compress` turns any non-empty byte slice
//! into a self-contained artifact (codebook, padding count, packed payload)
//! and `decompress` restores it.
//!
//! ```rust
//! let artifact = huffpack::compress(b"aaabbbbcc")?;
//! assert_eq!(huffpack::decompress(&artifact)?, b"aaabbbbcc");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bits;
pub mod codebook;
pub mod codec;
pub mod config;
pub mod error;
pub mod files;
pub mod huffman;

pub use codec::{CompressionReport, compress, compress_with_report, decompress};
pub use error::{HuffmanError, Result};
