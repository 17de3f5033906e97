// src/lz4/decoder.rs
use super::{BlockEnd, MIN_MATCH};
use crate::cursor::InputCursor;
use crate::error::{BinloadError, BlockDefect, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::io::Read;
use tracing::{debug, trace};

/// Length code meaning "more length bytes follow"
const RUN_MASK: u8 = 0x0F;

/// Streaming decoder for a single LZ4 block
pub struct BlockDecoder<'a, R> {
    input: &'a mut InputCursor<R>,
    output: Vec<u8>,
    block_end: BlockEnd,
    sequences: usize,
}

impl<'a, R: Read> BlockDecoder<'a, R> {
    pub fn new(input: &'a mut InputCursor<R>, block_end: BlockEnd) -> Self {
        BlockDecoder {
            input,
            output: Vec::with_capacity(4096),
            block_end,
            sequences: 0,
        }
    }

    /// Decode sequences until the block ends and return the output
    pub fn decode(mut self) -> Result<Vec<u8>> {
        let start = self.input.position();

        loop {
            let token = self.read_token()?;
            let literal_len = self.read_length(token >> 4, "literal length")?;
            self.copy_literals(literal_len)?;
            self.sequences += 1;

            let offset_pos = self.input.position();
            let distance = match self.read_offset()? {
                Some(distance) => distance,
                None => break,
            };

            let match_code = token & RUN_MASK;
            if distance == 0 && self.block_end == BlockEnd::ZeroOffset {
                // the end mark may still carry match-length bytes
                self.read_length(match_code, "match length")?;
                break;
            }
            if distance == 0 {
                return Err(corrupt(offset_pos, BlockDefect::ZeroDistance));
            }
            if distance as usize > self.output.len() {
                let defect = BlockDefect::DistanceTooFar {
                    distance,
                    available: self.output.len(),
                };
                return Err(corrupt(offset_pos, defect));
            }

            let length_pos = self.input.position();
            let match_len = self.read_length(match_code, "match length")?;
            let match_len = add_length(match_len, MIN_MATCH, length_pos)?;
            trace!(literal_len, distance, match_len, "lz4 sequence");
            self.copy_match(distance as usize, match_len);
        }

        debug!(
            sequences = self.sequences,
            encoded = self.input.position() - start,
            decoded = self.output.len(),
            "lz4 block decoded"
        );
        Ok(self.output)
    }

    fn truncated(&self, context: &'static str) -> BinloadError {
        BinloadError::TruncatedBlock {
            offset: self.input.position(),
            context,
        }
    }

    fn read_token(&mut self) -> Result<u8> {
        self.input
            .read_byte()?
            .ok_or_else(|| self.truncated("token"))
    }

    /// Expand a 4-bit length code with its 255-continued extension bytes
    fn read_length(&mut self, code: u8, context: &'static str) -> Result<usize> {
        let mut len = code as usize;
        if code != RUN_MASK {
            return Ok(len);
        }
        let start = self.input.position();
        loop {
            let extra = self
                .input
                .read_byte()?
                .ok_or_else(|| self.truncated(context))?;
            len = add_length(len, extra as usize, start)?;
            if extra != 0xFF {
                return Ok(len);
            }
        }
    }

    fn copy_literals(&mut self, len: usize) -> Result<()> {
        let read = self.input.read_into(&mut self.output, len)?;
        if read < len {
            return Err(self.truncated("literals"));
        }
        Ok(())
    }

    /// `None` when the input is exhausted right where the offset would start
    fn read_offset(&mut self) -> Result<Option<u16>> {
        let mut bytes = [0u8; 2];
        match self.input.fill(&mut bytes)? {
            0 => Ok(None),
            1 => Err(self.truncated("match offset")),
            _ => Ok(Some(LittleEndian::read_u16(&bytes))),
        }
    }

    fn copy_match(&mut self, distance: usize, len: usize) {
        let start = self.output.len() - distance;
        if distance >= len {
            self.output.extend_from_within(start..start + len);
        } else {
            // overlapping source: each byte may depend on one just written
            self.output.reserve(len);
            for i in 0..len {
                let byte = self.output[start + i];
                self.output.push(byte);
            }
        }
    }
}

fn corrupt(offset: u64, defect: BlockDefect) -> BinloadError {
    BinloadError::CorruptBlock { offset, defect }
}

/// Sum length parts, failing instead of wrapping on narrow `usize` targets
fn add_length(len: usize, extra: usize, offset: u64) -> Result<usize> {
    len.checked_add(extra)
        .ok_or_else(|| corrupt(offset, BlockDefect::LengthOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz4::{decode_block, decompress_block};
    use std::io::Cursor;

    fn decode_with(data: &[u8], block_end: BlockEnd) -> (Result<Vec<u8>>, u64) {
        let mut cursor = InputCursor::new(Cursor::new(data.to_vec()));
        let result = decode_block(&mut cursor, block_end);
        (result, cursor.position())
    }

    #[test]
    fn test_literals_only() {
        assert_eq!(decompress_block(&[0x50, 1, 2, 3, 4, 5]).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_overlapping_match_repeats_byte() {
        // 'b', then offset 1 length 8, then an empty final sequence
        let block = [0x14, b'b', 0x01, 0x00, 0x00];
        let out = decompress_block(&block).unwrap();
        assert_eq!(out.len(), 9);
        assert!(out.iter().all(|&b| b == b'b'));
    }

    #[test]
    fn test_overlapping_match_repeats_pattern() {
        // "ab" then offset 2 length 6 -> "abababab"
        let block = [0x22, b'a', b'b', 0x02, 0x00, 0x00];
        assert_eq!(decompress_block(&block).unwrap(), b"abababab");
    }

    #[test]
    fn test_non_overlapping_match() {
        // "abcde" then offset 5 length 4 -> "abcdeabcd", then literal "z"
        let block = [0x50, b'a', b'b', b'c', b'd', b'e', 0x05, 0x00, 0x10, b'z'];
        // token 0x50 has match code 0 -> length 4
        assert_eq!(decompress_block(&block).unwrap(), b"abcdeabcdz");
    }

    #[test]
    fn test_literal_length_extension() {
        // 15 + 255 + 10 = 280 literals
        let mut block = vec![0xF0, 0xFF, 0x0A];
        block.extend((0..280u32).map(|i| i as u8));
        let out = decompress_block(&block).unwrap();
        assert_eq!(out.len(), 280);
        assert_eq!(out[279], (279u32 % 256) as u8);
    }

    #[test]
    fn test_match_length_extension() {
        // 1 literal, match code 15 + ext 0 -> length 19, offset 1
        let block = [0x1F, 0xAA, 0x01, 0x00, 0x00, 0x00];
        let out = decompress_block(&block).unwrap();
        assert_eq!(out, vec![0xAA; 20]);
    }

    #[test]
    fn test_zero_offset_ends_block_mid_stream() {
        let data = [0x20, b'h', b'i', 0x00, 0x00, 0xDE, 0xAD];
        let (result, position) = decode_with(&data, BlockEnd::ZeroOffset);
        assert_eq!(result.unwrap(), b"hi");
        assert_eq!(position, 5);
    }

    #[test]
    fn test_zero_offset_consumes_match_extension() {
        let data = [0x2F, b'h', b'i', 0x00, 0x00, 0xFF, 0x03, 0x77];
        let (result, position) = decode_with(&data, BlockEnd::ZeroOffset);
        assert_eq!(result.unwrap(), b"hi");
        assert_eq!(position, 7);
    }

    #[test]
    fn test_zero_offset_rejected_when_strict() {
        let data = [0x20, b'h', b'i', 0x00, 0x00];
        let (result, _) = decode_with(&data, BlockEnd::EndOfInput);
        assert!(matches!(
            result,
            Err(BinloadError::CorruptBlock { defect: BlockDefect::ZeroDistance, offset: 3 })
        ));
    }

    #[test]
    fn test_distance_beyond_output() {
        let block = [0x10, b'x', 0x02, 0x00, 0x00];
        assert!(matches!(
            decompress_block(&block),
            Err(BinloadError::CorruptBlock {
                defect: BlockDefect::DistanceTooFar { distance: 2, available: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_empty_input_is_truncated_token() {
        assert!(matches!(
            decompress_block(&[]),
            Err(BinloadError::TruncatedBlock { context: "token", offset: 0 })
        ));
    }

    #[test]
    fn test_truncated_literals() {
        assert!(matches!(
            decompress_block(&[0x40, 1, 2]),
            Err(BinloadError::TruncatedBlock { context: "literals", .. })
        ));
    }

    #[test]
    fn test_truncated_extension() {
        assert!(matches!(
            decompress_block(&[0xF0, 0xFF]),
            Err(BinloadError::TruncatedBlock { context: "literal length", offset: 2 })
        ));
    }

    #[test]
    fn test_single_offset_byte_is_truncated() {
        assert!(matches!(
            decompress_block(&[0x10, b'x', 0x01]),
            Err(BinloadError::TruncatedBlock { context: "match offset", .. })
        ));
    }

    #[test]
    fn test_missing_final_sequence_is_truncated() {
        // a block may not end on a match
        assert!(matches!(
            decompress_block(&[0x10, b'x', 0x01, 0x00]),
            Err(BinloadError::TruncatedBlock { context: "token", offset: 4 })
        ));
    }

    #[test]
    fn test_truncated_match_extension() {
        assert!(matches!(
            decompress_block(&[0x1F, b'x', 0x01, 0x00, 0xFF]),
            Err(BinloadError::TruncatedBlock { context: "match length", offset: 5 })
        ));
    }

    #[test]
    fn test_length_overflow_is_corrupt() {
        assert_eq!(add_length(usize::MAX - 3, 3, 9).unwrap(), usize::MAX);
        assert!(matches!(
            add_length(usize::MAX - 3, MIN_MATCH, 9),
            Err(BinloadError::CorruptBlock { defect: BlockDefect::LengthOverflow, offset: 9 })
        ));
    }

    #[test]
    fn test_corrupt_messages() {
        let zero = corrupt(3, BlockDefect::ZeroDistance);
        assert_eq!(zero.to_string(), "Corrupt LZ4 block at offset 3: zero match distance");
        let far = corrupt(7, BlockDefect::DistanceTooFar { distance: 9, available: 2 });
        assert_eq!(
            far.to_string(),
            "Corrupt LZ4 block at offset 7: match distance 9 exceeds 2 decoded bytes"
        );
    }
}
