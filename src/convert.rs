// src/convert.rs
use crate::error::Result;
use crate::options::ConvertOptions;
use crate::reader::HybridReader;
use crate::segment::{SegmentInfo, SegmentKind};
use crate::writer::ImageWriter;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Summary of one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub segments: Vec<SegmentInfo>,
    pub dummy_headers: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl ConversionReport {
    pub fn normal_segments(&self) -> usize {
        self.count(SegmentKind::Normal)
    }

    pub fn compressed_segments(&self) -> usize {
        self.count(SegmentKind::Compressed)
    }

    /// Segments that decoded to nothing and were left out of the output
    pub fn dropped_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.output_header.is_none()).count()
    }

    fn count(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }
}

/// Convert a hybrid load file read from `input` into a plain one on `output`.
///
/// Segments are written as soon as they are parsed. On error everything
/// written before the failing segment stays in `output`.
pub fn convert<R: Read, W: Write>(
    input: R,
    output: W,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let reader = HybridReader::with_options(input, *options);
    let mut writer = ImageWriter::new(output);

    run(reader, &mut writer)
}

fn copy_segments<R: Read, W: Write>(
    reader: &mut HybridReader<R>,
    writer: &mut ImageWriter<W>,
    report: &mut ConversionReport,
) -> Result<()> {
    while let Some(segment) = reader.next_segment()? {
        writer.write_parsed(&segment)?;
        report.segments.push(segment.info);
    }
    Ok(())
}

/// Convert the file at `source` into a new file at `dest`
pub fn convert_file(
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let reader = HybridReader::open_with_options(source, *options)?;
    let mut writer = ImageWriter::create(dest)?;

    run(reader, &mut writer)
}

/// Memory-mapped variant of [`convert_file`] (requires "mmap" feature)
#[cfg(feature = "mmap")]
pub fn convert_file_mmap(
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let reader = HybridReader::open_mmap(source, *options)?;
    let mut writer = ImageWriter::create(dest)?;

    run(reader, &mut writer)
}

fn run<R: Read, W: Write>(
    mut reader: HybridReader<R>,
    writer: &mut ImageWriter<W>,
) -> Result<ConversionReport> {
    let mut report = ConversionReport::default();

    reader.read_header()?;
    writer.write_header()?;

    let result = copy_segments(&mut reader, writer, &mut report);
    // keep whatever made it out, even on failure; a parse error wins
    let flushed = writer.flush();
    result?;
    flushed?;

    report.dummy_headers = reader.dummy_headers();
    report.bytes_read = reader.position();
    report.bytes_written = writer.bytes_written();
    debug!(
        segments = report.segments.len(),
        dummy_headers = report.dummy_headers,
        bytes_read = report.bytes_read,
        bytes_written = report.bytes_written,
        "conversion finished"
    );
    Ok(report)
}

/// Convert an in-memory hybrid load file
pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    convert(input, &mut output, options)?;
    Ok(output)
}
