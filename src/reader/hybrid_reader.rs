// src/reader/hybrid_reader.rs
use crate::cursor::InputCursor;
use crate::error::{BinloadError, Result};
use crate::lz4;
use crate::options::ConvertOptions;
use crate::segment::{Segment, SegmentHeader, SegmentInfo, SegmentKind};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(feature = "mmap")]
use memmap2::Mmap;
#[cfg(feature = "mmap")]
use std::io::Cursor;

/// Sequential reader for hybrid binary load files
///
/// Yields every segment with an uncompressed payload: normal segments as
/// stored, compressed segments decoded, dummy headers skipped.
pub struct HybridReader<R: Read> {
    input: InputCursor<R>,
    options: ConvertOptions,
    header_read: bool,
    finished: bool,
    dummy_headers: usize,
}

/// Constructor for standard file I/O
impl HybridReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ConvertOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: ConvertOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BinloadError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_options(BufReader::with_capacity(65536, file), options))
    }
}

/// Constructor for memory-mapped file I/O (requires "mmap" feature)
#[cfg(feature = "mmap")]
impl HybridReader<Cursor<Mmap>> {
    pub fn open_mmap(path: impl AsRef<Path>, options: ConvertOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BinloadError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::with_options(Cursor::new(mmap), options))
    }
}

impl<R: Read> HybridReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ConvertOptions::default())
    }

    pub fn with_options(reader: R, options: ConvertOptions) -> Self {
        HybridReader {
            input: InputCursor::new(reader),
            options,
            header_read: false,
            finished: false,
            dummy_headers: 0,
        }
    }

    /// Read and check the `FF FF` file header.
    ///
    /// Called implicitly by the first [`next_segment`](Self::next_segment).
    pub fn read_header(&mut self) -> Result<[u8; 2]> {
        if self.header_read {
            return Ok(SegmentHeader::FILE_MAGIC);
        }
        let mut magic = [0u8; 2];
        let count = self.input.fill(&mut magic)?;
        if count < magic.len() || magic != SegmentHeader::FILE_MAGIC {
            self.finished = true;
            return Err(BinloadError::BadMagic { found: magic[..count].to_vec() });
        }
        self.header_read = true;
        Ok(magic)
    }

    /// Read the next segment, or `None` once the input is cleanly exhausted
    pub fn next_segment(&mut self) -> Result<Option<Segment>> {
        if self.finished {
            return Ok(None);
        }
        if !self.header_read {
            self.read_header()?;
        }

        let (offset, header) = match self.read_segment_header()? {
            Some(found) => found,
            None => {
                self.finished = true;
                return Ok(None);
            }
        };

        let segment = match header.kind() {
            SegmentKind::Normal => self.read_normal(offset, header)?,
            SegmentKind::Compressed => self.read_compressed(offset, header)?,
        };
        Ok(Some(segment))
    }

    /// Bytes consumed from the input so far
    pub fn position(&self) -> u64 {
        self.input.position()
    }

    /// Dummy headers skipped so far
    pub fn dummy_headers(&self) -> usize {
        self.dummy_headers
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    fn read_segment_header(&mut self) -> Result<Option<(u64, SegmentHeader)>> {
        let mut bytes = [0u8; SegmentHeader::SIZE];

        let offset = loop {
            let at = self.input.position();
            match self.input.fill(&mut bytes[..2])? {
                0 => return Ok(None),
                1 => return Err(BinloadError::TruncatedHeader { offset: at }),
                _ => {}
            }
            if SegmentHeader::is_dummy([bytes[0], bytes[1]]) {
                self.dummy_headers += 1;
                debug!(offset = at, "skipping dummy header");
                continue;
            }
            break at;
        };

        if self.input.fill(&mut bytes[2..])? < 2 {
            return Err(BinloadError::TruncatedHeader { offset });
        }
        Ok(Some((offset, SegmentHeader::parse(&bytes))))
    }

    fn read_normal(&mut self, offset: u64, header: SegmentHeader) -> Result<Segment> {
        let expected = header.payload_len().unwrap_or_default();
        info!("Normal segment: {}", header);

        let mut payload = Vec::with_capacity(expected);
        let actual = self.input.read_into(&mut payload, expected)?;
        if actual < expected {
            return Err(BinloadError::TruncatedSegment {
                first: header.first,
                last: header.last,
                expected,
                actual,
            });
        }

        Ok(Segment {
            info: SegmentInfo {
                offset,
                kind: SegmentKind::Normal,
                input_header: header,
                output_header: Some(header),
                compression_type: None,
                stored_size: expected as u64,
                payload_len: expected,
            },
            payload,
        })
    }

    fn read_compressed(&mut self, offset: u64, header: SegmentHeader) -> Result<Segment> {
        let type_pos = self.input.position();
        let compression_type = self
            .input
            .read_byte()?
            .ok_or(BinloadError::TruncatedHeader { offset })?;
        info!("Compressed segment: {} CP: ${:02X}", header, compression_type);

        let payload = lz4::decode_block(&mut self.input, self.options.block_end)?;
        info!("Decompressed ${:04X} bytes", payload.len());

        let output_header = header.with_decoded_len(payload.len());
        match output_header {
            None => warn!(
                offset,
                "compressed segment at ${:04X} decoded to nothing and is dropped", header.first
            ),
            Some(_) if payload.len() > 0x10000 => warn!(
                offset,
                len = payload.len(),
                "decoded segment at ${:04X} is larger than the address space", header.first
            ),
            Some(_) => {}
        }

        Ok(Segment {
            info: SegmentInfo {
                offset,
                kind: SegmentKind::Compressed,
                input_header: header,
                output_header,
                compression_type: Some(compression_type),
                stored_size: self.input.position() - type_pos,
                payload_len: payload.len(),
            },
            payload,
        })
    }
}

impl<R: Read> Iterator for HybridReader<R> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_segment() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
