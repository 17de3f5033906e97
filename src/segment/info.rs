// src/segment/info.rs
use super::{SegmentHeader, SegmentKind};

/// What the parser saw and produced for one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Input offset of the segment header (dummy markers excluded)
    pub offset: u64,
    pub kind: SegmentKind,
    /// Header exactly as stored in the input
    pub input_header: SegmentHeader,
    /// Header written to the output; `None` when an empty decode was dropped
    pub output_header: Option<SegmentHeader>,
    /// Compression-type byte, only present for compressed segments
    pub compression_type: Option<u8>,
    /// Input bytes consumed after the 4-byte header
    pub stored_size: u64,
    /// Length of the (decoded) payload
    pub payload_len: usize,
}
