//! Compressor and decompressor: the two directions share the code tables and
//! the bit helpers but nothing else.
//!
//! An artifact is the serialized codebook, one byte holding the payload's
//! padding count (0..=7) and then the packed payload.

use std::fmt;

use log::{debug, info};

use crate::bits::{decode_bits, pack_codes, unpack_bits};
use crate::codebook::{deserialize_codebook, serialize_codebook};
use crate::error::{HuffmanError, Result};
use crate::huffman::{
    build_code_table, build_huffman_tree, count_frequencies, entropy_from_freq, reverse_table,
};

pub use crate::codebook::codebook_span;

/// Size and shape of a single compression run, for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub original_len: usize,
    pub compressed_len: usize,
    pub codebook_len: usize,
    pub payload_bits: usize,
    pub padding: u8,
    pub unique_symbols: usize,
    /// Shannon entropy of the input, bits/symbol.
    pub entropy: f64,
}

impl CompressionReport {
    /// compressed / original
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.compressed_len as f64 / self.original_len as f64
    }

    pub fn savings_percent(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.ratio())
    }

    /// Average payload bits spent per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.original_len as f64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes (codebook {} bytes, {} symbols), ratio {:.4}, {:.4} bits/symbol, entropy {:.4}",
            self.original_len,
            self.compressed_len,
            self.codebook_len,
            self.unique_symbols,
            self.ratio(),
            self.bits_per_symbol(),
            self.entropy
        )
    }
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_report(data).map(|(artifact, _)| artifact)
}

pub fn compress_with_report(data: &[u8]) -> Result<(Vec<u8>, CompressionReport)> {
    info!("Compressing {} bytes", data.len());

    let freq = count_frequencies(data);
    let tree = build_huffman_tree(&freq)?;
    let table = build_code_table(&tree);
    drop(tree);

    let codebook = serialize_codebook(&table);

    if let Some(&byte) = data.iter().find(|&&b| !table.contains_key(&b)) {
        return Err(HuffmanError::UnknownSymbol(byte));
    }
    let packed = pack_codes(data.iter().map(|b| table[b].as_str()));
    debug!(
        "Packed {} payload bits into {} bytes, {} padding bits",
        packed.bit_len(),
        packed.bytes.len(),
        packed.padding
    );

    let mut artifact = Vec::with_capacity(codebook.len() + 1 + packed.bytes.len());
    artifact.extend_from_slice(&codebook);
    artifact.push(packed.padding);
    artifact.extend_from_slice(&packed.bytes);

    let report = CompressionReport {
        original_len: data.len(),
        compressed_len: artifact.len(),
        codebook_len: codebook.len(),
        payload_bits: packed.bit_len(),
        padding: packed.padding,
        unique_symbols: table.len(),
        entropy: entropy_from_freq(&freq),
    };
    info!("Compression finished: {}", report);

    Ok((artifact, report))
}

pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>> {
    info!("Decompressing {} bytes", artifact.len());

    let (table, codebook_len) = deserialize_codebook(artifact)?;
    let (&padding, payload) = artifact[codebook_len..]
        .split_first()
        .ok_or_else(|| HuffmanError::malformed_payload("missing padding byte"))?;
    // Non-empty input always yields at least one payload bit.
    if payload.is_empty() {
        return Err(HuffmanError::malformed_payload("payload is empty"));
    }
    debug!(
        "Payload: {} bytes, {} padding bits",
        payload.len(),
        padding
    );

    let bits = unpack_bits(payload, padding)?;
    let data = decode_bits(&bits, &reverse_table(&table))?;

    info!("Decompression finished: {} bytes", data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_symbol_scenario() {
        let (artifact, report) = compress_with_report(b"aaabbbbcc").unwrap();
        assert_eq!(report.payload_bits, 14);
        assert_eq!(report.padding, 2);
        assert_eq!(report.unique_symbols, 3);
        assert_eq!(artifact.len(), report.codebook_len + 1 + 2);
        assert_eq!(artifact[report.codebook_len], 2);
        assert_eq!(
            &artifact[report.codebook_len + 1..],
            &[0b1111_1100, 0b0010_1000]
        );

        assert_eq!(decompress(&artifact).unwrap(), b"aaabbbbcc");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(compress(&[]), Err(HuffmanError::EmptyInput)));
    }

    #[test]
    fn test_single_repeated_byte() {
        let data = vec![b'A'; 1000];
        let (artifact, report) = compress_with_report(&data).unwrap();
        assert_eq!(report.payload_bits, 1000);
        assert_eq!(report.padding, 0);
        assert_eq!(decompress(&artifact).unwrap(), data);
    }

    #[test]
    fn test_single_byte_input() {
        let artifact = compress(&[0x00]).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_missing_padding_byte() {
        let artifact = compress(b"hello").unwrap();
        let span = codebook_span(&artifact).unwrap();
        assert!(matches!(
            decompress(&artifact[..span.end]),
            Err(HuffmanError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_payload_cut_after_padding_byte() {
        let artifact = compress(b"AAAAAAAA").unwrap();
        let span = codebook_span(&artifact).unwrap();
        assert_eq!(artifact[span.end], 0);
        assert!(matches!(
            decompress(&artifact[..span.end + 1]),
            Err(HuffmanError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        // Payload is 11 11 11 0 0 0 0 10 10; one more padding bit cuts the last 'c'.
        let artifact = compress(b"aaabbbbcc").unwrap();
        let span = codebook_span(&artifact).unwrap();

        let mut damaged = artifact.clone();
        damaged[span.end] = 3;
        match decompress(&damaged) {
            Err(HuffmanError::UnmatchedTrailingBits { offset, residue }) => {
                assert_eq!(offset, 12);
                assert_eq!(residue, "1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_report_math() {
        let report = CompressionReport {
            original_len: 200,
            compressed_len: 50,
            codebook_len: 20,
            payload_bits: 240,
            padding: 0,
            unique_symbols: 4,
            entropy: 1.2,
        };
        assert!((report.ratio() - 0.25).abs() < 1e-12);
        assert!((report.savings_percent() - 75.0).abs() < 1e-9);
        assert!((report.bits_per_symbol() - 1.2).abs() < 1e-12);
        assert!(report.to_string().starts_with("200 -> 50 bytes"));
    }
}
