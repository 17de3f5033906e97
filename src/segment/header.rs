// src/segment/header.rs
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// How a segment's payload is stored in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Raw payload of `last - first + 1` bytes
    Normal,
    /// Compression-type byte followed by a raw LZ4 block
    Compressed,
}

/// Segment header: an inclusive 16-bit address range
///
/// On disk the header is `firstLo firstHi lastLo lastHi`. A `last` below
/// `first` is not a real range; it marks the payload as compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHeader {
    pub first: u16,
    pub last: u16,
}

impl SegmentHeader {
    pub const SIZE: usize = 4;
    pub const FILE_MAGIC: [u8; 2] = [0xFF, 0xFF];
    pub const DUMMY_MARKER: [u8; 2] = [0xFF, 0xFF];

    pub fn new(first: u16, last: u16) -> Self {
        SegmentHeader { first, last }
    }

    pub fn parse(bytes: &[u8; Self::SIZE]) -> Self {
        SegmentHeader {
            first: LittleEndian::read_u16(&bytes[0..2]),
            last: LittleEndian::read_u16(&bytes[2..4]),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        LittleEndian::write_u16(&mut bytes[0..2], self.first);
        LittleEndian::write_u16(&mut bytes[2..4], self.last);
        bytes
    }

    /// Check whether the first two header bytes are a padding marker
    pub fn is_dummy(prefix: [u8; 2]) -> bool {
        prefix == Self::DUMMY_MARKER
    }

    pub fn kind(&self) -> SegmentKind {
        if self.last >= self.first {
            SegmentKind::Normal
        } else {
            SegmentKind::Compressed
        }
    }

    /// Raw payload length for a normal segment, `None` for a compressed one
    pub fn payload_len(&self) -> Option<usize> {
        match self.kind() {
            SegmentKind::Normal => Some((self.last - self.first) as usize + 1),
            SegmentKind::Compressed => None,
        }
    }

    /// Header for `len` decoded bytes starting at `first`.
    ///
    /// `last` wraps at 16 bits. Returns `None` for an empty payload, which
    /// has no normal-segment representation.
    pub fn with_decoded_len(&self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let last = (self.first as usize + len - 1) % 0x10000;
        Some(SegmentHeader::new(self.first, last as u16))
    }
}

impl fmt::Display for SegmentHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:04X} - ${:04X}", self.first, self.last)
    }
}
