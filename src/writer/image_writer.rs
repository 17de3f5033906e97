// src/writer/image_writer.rs
use crate::error::{BinloadError, Result};
use crate::segment::{Segment, SegmentHeader};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for plain (uncompressed) binary load files
pub struct ImageWriter<W: Write> {
    out: W,
    header_written: bool,
    bytes_written: u64,
    segments_written: usize,
}

impl ImageWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BinloadError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ImageWriter::new(BufWriter::new(file)))
    }
}

impl<W: Write> ImageWriter<W> {
    pub fn new(out: W) -> Self {
        ImageWriter {
            out,
            header_written: false,
            bytes_written: 0,
            segments_written: 0,
        }
    }

    /// Write the `FF FF` file header (once)
    pub fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.out.write_all(&SegmentHeader::FILE_MAGIC)?;
        self.bytes_written += SegmentHeader::FILE_MAGIC.len() as u64;
        self.header_written = true;
        Ok(())
    }

    /// Write one segment record: the 4-byte header followed by the payload.
    ///
    /// The header is written as given; a decoded segment whose range wraps
    /// past `$FFFF` keeps its wrapped `last` value.
    pub fn write_segment(&mut self, header: SegmentHeader, payload: &[u8]) -> Result<()> {
        self.write_header()?;
        self.out.write_u16::<LittleEndian>(header.first)?;
        self.out.write_u16::<LittleEndian>(header.last)?;
        self.out.write_all(payload)?;
        self.bytes_written += (SegmentHeader::SIZE + payload.len()) as u64;
        self.segments_written += 1;
        Ok(())
    }

    /// Write a parsed segment, returning `false` if it has no output form
    pub fn write_parsed(&mut self, segment: &Segment) -> Result<bool> {
        match segment.header() {
            Some(header) => {
                self.write_segment(header, &segment.payload)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn segments_written(&self) -> usize {
        self.segments_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying sink
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
