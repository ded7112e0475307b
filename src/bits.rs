//! Packing of '0'/'1' code strings into bytes (MSB first) and the reverse,
//! including prefix decoding of an unpacked bit stream.

use log::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::huffman::ReverseCodeTable;

#[derive(Default, Debug)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        BitWriter {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_index] |= 1 << (7 - bit_offset);
        }
        self.bit_count += 1;
    }

    /// Appends a code given as a string of '0'/'1'. Any character other than
    /// '1' is written as a zero bit.
    pub fn push_code(&mut self, code: &str) {
        for c in code.bytes() {
            self.push_bit(c == b'1');
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Zero bits needed to fill the last byte: `(8 - bits % 8) % 8`.
    pub fn padding(&self) -> u8 {
        ((8 - self.bit_count % 8) % 8) as u8
    }

    pub fn finish(self) -> PackedBits {
        let padding = self.padding();
        PackedBits {
            padding,
            bytes: self.bytes,
        }
    }
}

/// Packed payload plus the count of zero bits filling the low end of its
/// final byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub padding: u8,
    pub bytes: Vec<u8>,
}

impl PackedBits {
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 - self.padding as usize
    }
}

pub fn pack_codes<'a, I>(codes: I) -> PackedBits
where
    I: IntoIterator<Item = &'a str>,
{
    let mut writer = BitWriter::new();
    for code in codes {
        writer.push_code(code);
    }
    writer.finish()
}

/// Expands `bytes` MSB first and drops the trailing `padding` bits.
pub fn unpack_bits(bytes: &[u8], padding: u8) -> Result<Vec<bool>> {
    if padding > 7 {
        return Err(HuffmanError::malformed_payload(format!(
            "padding count {} is out of range 0..=7",
            padding
        )));
    }
    if bytes.is_empty() && padding != 0 {
        return Err(HuffmanError::malformed_payload(
            "padding declared for an empty payload",
        ));
    }

    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 == 1);
        }
    }
    bits.truncate(bits.len() - padding as usize);

    trace!(
        "Expanded {} bytes into {} bits ({} padding)",
        bytes.len(),
        bits.len(),
        padding
    );
    Ok(bits)
}

/// Greedy prefix matching: grow a candidate one bit at a time and emit a
/// symbol as soon as it equals a known code.
pub fn decode_bits(bits: &[bool], reverse: &ReverseCodeTable) -> Result<Vec<u8>> {
    let max_len = match reverse.keys().map(String::len).max() {
        Some(len) => len,
        None if bits.is_empty() => return Ok(Vec::new()),
        None => return Err(HuffmanError::malformed_codebook("code table is empty")),
    };

    let mut result = Vec::new();
    let mut candidate = String::with_capacity(max_len);
    let mut candidate_start = 0;

    for (offset, &bit) in bits.iter().enumerate() {
        if candidate.is_empty() {
            candidate_start = offset;
        }
        candidate.push(if bit { '1' } else { '0' });

        if let Some(&symbol) = reverse.get(&candidate) {
            result.push(symbol);
            candidate.clear();
        } else if candidate.len() >= max_len {
            // Longer than every code, nothing can match any more.
            return Err(HuffmanError::UnmatchedTrailingBits {
                offset: candidate_start,
                residue: candidate,
            });
        }
    }

    if !candidate.is_empty() {
        return Err(HuffmanError::UnmatchedTrailingBits {
            offset: candidate_start,
            residue: candidate,
        });
    }

    debug!("Decoded {} bits into {} bytes", bits.len(), result.len());
    Ok(result)
}
