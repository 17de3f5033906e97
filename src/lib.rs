// src/lib.rs
//! # binload-lz4
//!
//! A Rust library for turning "hybrid" binary load files, where some memory
//! segments are stored as raw LZ4 blocks, back into plain binary load files
//! that emulators and flashers can load.
//!
//! ## File Format
//!
//! ```text
//! FF FF                                  file header
//! [FF FF]*                               optional dummy markers
//! firstLo firstHi lastLo lastHi payload  normal segment (last >= first)
//! firstLo firstHi lastLo lastHi cp block compressed segment (last < first)
//! ```
//!
//! ## Features
//!
//! - 🔁 **Lossless**: normal segments are copied byte for byte
//! - 🧩 **Self-delimiting LZ4**: embedded blocks are decoded straight off the
//!   input stream, no length prefix needed
//! - 🧹 **Dummy elision**: `FF FF` padding markers are dropped
//! - 🛑 **Fail fast**: truncated or corrupt input stops the run with a typed error
//!
//! ## Quick Start
//!
//! ### Converting Files
//!
//! ```rust,no_run
//! use binload_lz4::*;
//!
//! fn main() -> Result<()> {
//!     let report = convert_file("game.xex", "game-plain.xex", &ConvertOptions::default())?;
//!     println!("{} segments decoded", report.compressed_segments());
//!     Ok(())
//! }
//! ```
//!
//! ### Iterating Segments
//!
//! ```rust
//! use binload_lz4::*;
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let data = vec![0xFF, 0xFF, 0x00, 0x06, 0x01, 0x06, 0xA9, 0x00];
//!     let mut reader = HybridReader::new(Cursor::new(data));
//!
//!     while let Some(segment) = reader.next_segment()? {
//!         assert_eq!(segment.load_address(), 0x0600);
//!         assert_eq!(segment.payload, vec![0xA9, 0x00]);
//!     }
//!     Ok(())
//! }
//! ```

// Modules
pub mod error;
pub mod cursor;
pub mod segment;
pub mod lz4;
pub mod options;
pub mod reader;
pub mod writer;
pub mod convert;

// Re-export commonly used types at the crate root for convenience
pub use error::{BinloadError, BlockDefect, Result};

pub use cursor::InputCursor;

pub use segment::{
    Segment,
    SegmentHeader,
    SegmentInfo,
    SegmentKind,
};

pub use lz4::{BlockEnd, decode_block, decompress_block};

pub use options::ConvertOptions;

pub use reader::HybridReader;

pub use writer::ImageWriter;

pub use convert::{convert, convert_bytes, convert_file, ConversionReport};

#[cfg(feature = "mmap")]
pub use convert::convert_file_mmap;

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use binload_lz4::prelude::*;
    //! ```

    pub use crate::error::{BinloadError, Result};
    pub use crate::options::ConvertOptions;
    pub use crate::reader::HybridReader;
    pub use crate::writer::ImageWriter;
    pub use crate::convert::{convert, convert_file};
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!LIBRARY_VERSION.is_empty());
    }

    #[test]
    fn test_format_constants() {
        assert_eq!(SegmentHeader::SIZE, 4);
        assert_eq!(SegmentHeader::FILE_MAGIC, [0xFF, 0xFF]);
        assert_eq!(SegmentHeader::DUMMY_MARKER, [0xFF, 0xFF]);
        assert_eq!(lz4::MIN_MATCH, 4);
    }

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.block_end, BlockEnd::ZeroOffset);
        assert_eq!(ConvertOptions::strict().block_end, BlockEnd::EndOfInput);
        assert_eq!(
            ConvertOptions::new().with_block_end(BlockEnd::EndOfInput),
            ConvertOptions::strict()
        );
    }

    #[test]
    fn test_format_error_classification() {
        assert!(BinloadError::BadMagic { found: vec![] }.is_format_error());
        assert!(BinloadError::TruncatedHeader { offset: 2 }.is_format_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!BinloadError::Io(io).is_format_error());
    }

    #[test]
    fn test_error_messages() {
        let err = BinloadError::TruncatedSegment { first: 0x2000, last: 0x20FF, expected: 256, actual: 10 };
        assert_eq!(
            err.to_string(),
            "Truncated segment $2000-$20FF: expected 256 bytes, found 10"
        );
        let err = BinloadError::BadMagic { found: vec![0x12, 0x34] };
        assert_eq!(
            err.to_string(),
            "The input file is not a binary load file (header [12, 34], expected [FF, FF])"
        );
    }
}
