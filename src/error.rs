//! Error kinds reported by the coding engine and its file collaborators.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Nothing to build a tree from.
    #[error("input is empty, no symbols to build a tree from")]
    EmptyInput,

    #[error("cannot read source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write sink {path}: {source}")]
    SinkUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Record count or lengths disagree with the bytes actually present.
    #[error("malformed codebook: {message}")]
    MalformedCodebook { message: String },

    #[error("malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Bits left over that match no code; the artifact is truncated or corrupt.
    #[error("unmatched bits at payload bit {offset}: residue '{residue}'")]
    UnmatchedTrailingBits { offset: usize, residue: String },

    #[error("symbol {0:#04x} has no code in the table")]
    UnknownSymbol(u8),
}

impl HuffmanError {
    pub fn malformed_codebook<S: Into<String>>(message: S) -> Self {
        Self::MalformedCodebook {
            message: message.into(),
        }
    }

    pub fn malformed_payload<S: Into<String>>(message: S) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// True for the kinds that mean the artifact itself is bad, as opposed to
    /// the input or the filesystem.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::MalformedCodebook { .. }
                | Self::MalformedPayload { .. }
                | Self::UnmatchedTrailingBits { .. }
        )
    }
}
