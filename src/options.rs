// src/options.rs
//! Conversion options.
//!
//! Options carry configuration only; the input and output streams are
//! passed separately to [`crate::convert`] and [`crate::HybridReader`].

use crate::lz4::BlockEnd;

/// Options controlling how a hybrid load file is parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Where an embedded LZ4 block is considered finished
    pub block_end: BlockEnd,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that accept only standard LZ4 blocks ending at end of input
    pub fn strict() -> Self {
        ConvertOptions { block_end: BlockEnd::EndOfInput }
    }

    pub fn with_block_end(mut self, block_end: BlockEnd) -> Self {
        self.block_end = block_end;
        self
    }
}
