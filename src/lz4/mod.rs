// src/lz4/mod.rs
//! Raw LZ4 block decoding.
//!
//! Blocks embedded in a hybrid load file carry no length prefix, so the
//! decoder works directly on the shared [`InputCursor`] and stops on its own.
//! A block ends after the literals of a sequence when either no input is
//! left where the match offset would be, or (with [`BlockEnd::ZeroOffset`])
//! the offset field holds the end mark `0x0000`.

mod decoder;

pub use decoder::BlockDecoder;

use crate::cursor::InputCursor;
use crate::error::Result;
use std::io::Read;

/// Smallest match the block format can express
pub const MIN_MATCH: usize = 4;

/// Rule deciding where a block without a declared length stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockEnd {
    /// Only running out of input after a sequence's literals ends the block.
    /// A zero offset is rejected as corrupt.
    EndOfInput,
    /// A zero offset after the literals also ends the block, which lets a
    /// compressed segment be followed by further segments.
    #[default]
    ZeroOffset,
}

/// Decode one block starting at the cursor's current position.
///
/// On success the cursor sits on the first byte after the block.
pub fn decode_block<R: Read>(input: &mut InputCursor<R>, block_end: BlockEnd) -> Result<Vec<u8>> {
    BlockDecoder::new(input, block_end).decode()
}

/// Decode a standalone block held entirely in memory.
///
/// The block must end where the slice ends.
///
/// ```
/// use binload_lz4::lz4::decompress_block;
///
/// // one sequence: 3 literals, no match
/// let block = [0x30, b'a', b'b', b'c'];
/// assert_eq!(decompress_block(&block).unwrap(), b"abc");
/// ```
pub fn decompress_block(block: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = InputCursor::new(block);
    decode_block(&mut cursor, BlockEnd::EndOfInput)
}
