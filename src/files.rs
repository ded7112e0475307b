//! Named-file byte source and sink around the codec. Handles are opened,
//! drained or filled, and closed inside each call.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::codec::{CompressionReport, compress_with_report, decompress};
use crate::error::{HuffmanError, Result};

pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    let unreadable = |source| HuffmanError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(unreadable)?);
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(unreadable)?;

    info!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

pub fn write_sink(path: &Path, data: &[u8]) -> Result<()> {
    let unwritable = |source| HuffmanError::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(unwritable)?);
    writer.write_all(data).map_err(unwritable)?;
    writer.flush().map_err(unwritable)?;

    info!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

pub fn compress_file(input: &Path, output: &Path) -> Result<CompressionReport> {
    let data = read_source(input)?;
    let (artifact, report) = compress_with_report(&data)?;
    write_sink(output, &artifact)?;
    Ok(report)
}

/// Returns the number of bytes restored.
pub fn decompress_file(input: &Path, output: &Path) -> Result<usize> {
    let artifact = read_source(input)?;
    let data = decompress(&artifact)?;
    write_sink(output, &data)?;
    Ok(data.len())
}
