//! Binary codebook: the symbol -> code mapping shipped ahead of the payload.
//!
//! Layout, integers little-endian:
//!
//! ```text
//! u64  codebook_len   bytes following this field, through the last record
//! u64  record_count
//! per record:
//!   u8   symbol
//!   u64  code_len
//!   [u8] ceil(code_len / 8) bytes of code bits, MSB first
//! ```
//!
//! The zero bits filling the last code byte are implied by `code_len` and are
//! unrelated to the payload padding.

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::ops::Range;

use log::{debug, trace};

use crate::bits::BitWriter;
use crate::error::{HuffmanError, Result};
use crate::huffman::{CodeTable, Symbol, is_prefix_free};

const LEN_FIELD: usize = 8;
const MAX_RECORDS: u64 = 256;
/// Deepest leaf possible in a tree over 256 symbols.
const MAX_CODE_LEN: u64 = 255;

pub fn serialize_codebook(table: &CodeTable) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(table.len() as u64).to_le_bytes());

    for (&symbol, code) in table {
        let mut writer = BitWriter::with_capacity(code.len());
        writer.push_code(code);
        let packed = writer.finish();

        trace!(
            "Codebook record: {:#04x} len {} bytes {:02x?}",
            symbol,
            code.len(),
            packed.bytes
        );
        body.push(symbol);
        body.extend_from_slice(&(code.len() as u64).to_le_bytes());
        body.extend_from_slice(&packed.bytes);
    }

    let mut bytes = Vec::with_capacity(LEN_FIELD + body.len());
    bytes.extend_from_slice(&(body.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&body);

    debug!(
        "Serialized codebook: {} records, {} bytes",
        table.len(),
        bytes.len()
    );
    bytes
}

/// Byte range of the codebook (framing field included) at the start of
/// `data`; the payload section begins at `range.end`.
pub fn codebook_span(data: &[u8]) -> Result<Range<usize>> {
    let header: [u8; LEN_FIELD] = data
        .get(..LEN_FIELD)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| HuffmanError::malformed_codebook("missing codebook length header"))?;
    let declared = u64::from_le_bytes(header);

    let remaining = (data.len() - LEN_FIELD) as u64;
    if declared > remaining {
        return Err(HuffmanError::malformed_codebook(format!(
            "declared length {} exceeds the {} bytes available",
            declared, remaining
        )));
    }
    Ok(0..LEN_FIELD + declared as usize)
}

/// Parses a codebook at the start of `data`, returning the table and the
/// number of bytes it occupied.
pub fn deserialize_codebook(data: &[u8]) -> Result<(CodeTable, usize)> {
    let span = codebook_span(data)?;
    let mut cursor = Cursor::new(&data[LEN_FIELD..span.end]);

    let count = read_u64(&mut cursor, "record count")?;
    if count == 0 || count > MAX_RECORDS {
        return Err(HuffmanError::malformed_codebook(format!(
            "record count {} is out of range 1..={}",
            count, MAX_RECORDS
        )));
    }

    let mut table = CodeTable::new();
    let mut seen_codes = HashSet::with_capacity(count as usize);

    for index in 0..count {
        let symbol: Symbol = read_array::<1>(&mut cursor, "record symbol")?[0];
        let code_len = read_u64(&mut cursor, "code length")?;
        if code_len == 0 || code_len > MAX_CODE_LEN {
            return Err(HuffmanError::malformed_codebook(format!(
                "record {} has code length {}",
                index, code_len
            )));
        }

        let code_len = code_len as usize;
        let mut code_bytes = vec![0u8; code_len.div_ceil(8)];
        cursor.read_exact(&mut code_bytes).map_err(|_| {
            HuffmanError::malformed_codebook(format!("record {} code bits are truncated", index))
        })?;

        let code: String = (0..code_len)
            .map(|j| {
                if (code_bytes[j / 8] >> (7 - j % 8)) & 1 == 1 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect();
        trace!("Decoded codebook record: {:#04x} => '{}'", symbol, code);

        if !seen_codes.insert(code.clone()) {
            return Err(HuffmanError::malformed_codebook(format!(
                "code '{}' appears twice",
                code
            )));
        }
        if table.insert(symbol, code).is_some() {
            return Err(HuffmanError::malformed_codebook(format!(
                "symbol {:#04x} appears twice",
                symbol
            )));
        }
    }

    let consumed = LEN_FIELD + cursor.position() as usize;
    if consumed != span.end {
        return Err(HuffmanError::malformed_codebook(format!(
            "{} unused bytes after the last record",
            span.end - consumed
        )));
    }
    if !is_prefix_free(table.values().map(String::as_str)) {
        return Err(HuffmanError::malformed_codebook("codes are not prefix-free"));
    }

    debug!(
        "Deserialized codebook: {} records, {} bytes",
        table.len(),
        consumed
    );
    Ok((table, consumed))
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| HuffmanError::malformed_codebook(format!("{} is truncated", what)))?;
    Ok(buf)
}

fn read_u64(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u64> {
    read_array::<8>(cursor, what).map(u64::from_le_bytes)
}
