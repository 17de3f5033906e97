// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinloadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unable to open input file {}: {source}", .path.display())]
    InputOpen { path: PathBuf, source: io::Error },

    #[error("Unable to open output file {}: {source}", .path.display())]
    OutputOpen { path: PathBuf, source: io::Error },

    #[error("The input file is not a binary load file (header {found:02X?}, expected [FF, FF])")]
    BadMagic { found: Vec<u8> },

    #[error("Truncated segment header at offset {offset}")]
    TruncatedHeader { offset: u64 },

    #[error("Truncated segment ${first:04X}-${last:04X}: expected {expected} bytes, found {actual}")]
    TruncatedSegment { first: u16, last: u16, expected: usize, actual: usize },

    #[error("Truncated LZ4 block at offset {offset} while reading {context}")]
    TruncatedBlock { offset: u64, context: &'static str },

    #[error("Corrupt LZ4 block at offset {offset}: {defect}")]
    CorruptBlock { offset: u64, defect: BlockDefect },
}

/// What made an LZ4 block undecodable
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDefect {
    #[error("zero match distance")]
    ZeroDistance,

    #[error("match distance {distance} exceeds {available} decoded bytes")]
    DistanceTooFar { distance: u16, available: usize },

    #[error("sequence length overflows")]
    LengthOverflow,
}

impl BinloadError {
    /// True for errors caused by malformed input rather than I/O failure
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            BinloadError::Io(_) | BinloadError::InputOpen { .. } | BinloadError::OutputOpen { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BinloadError>;
