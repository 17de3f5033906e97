// src/segment/mod.rs
mod header;
mod info;

pub use header::{SegmentHeader, SegmentKind};
pub use info::SegmentInfo;

/// A parsed segment whose payload is always uncompressed
#[derive(Debug, Clone)]
pub struct Segment {
    pub info: SegmentInfo,
    pub payload: Vec<u8>,
}

impl Segment {
    /// Header to write for this segment, if it can be written at all
    pub fn header(&self) -> Option<SegmentHeader> {
        self.info.output_header
    }

    pub fn kind(&self) -> SegmentKind {
        self.info.kind
    }

    /// Address of the first payload byte
    pub fn load_address(&self) -> u16 {
        self.info.input_header.first
    }
}
