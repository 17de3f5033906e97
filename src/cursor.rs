// src/cursor.rs
use crate::error::Result;
use std::io::{self, Read};

/// Position-tracking byte source shared by the segment parser and the LZ4
/// block decoder.
///
/// Unlike [`Read::read_exact`], the helpers here report how many bytes were
/// actually available, so callers can tell a clean end of stream apart from a
/// record that was cut short.
#[derive(Debug)]
pub struct InputCursor<R> {
    inner: R,
    position: u64,
}

impl<R: Read> InputCursor<R> {
    pub fn new(inner: R) -> Self {
        InputCursor { inner, position: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read one byte, or `None` at the true end of the stream
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.fill(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Fill as much of `buf` as the stream allows and return the count.
    ///
    /// A short count means the stream is exhausted.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Append up to `len` bytes to `out`, returning how many were appended.
    ///
    /// `out` only grows by the bytes actually read.
    pub fn read_into(&mut self, out: &mut Vec<u8>, len: usize) -> Result<usize> {
        let read = (&mut self.inner).take(len as u64).read_to_end(out)?;
        self.position += read as u64;
        Ok(read)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_byte_reports_end() {
        let mut cursor = InputCursor::new(Cursor::new(vec![7u8]));
        assert_eq!(cursor.read_byte().unwrap(), Some(7));
        assert_eq!(cursor.read_byte().unwrap(), None);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_fill_short_count() {
        let mut cursor = InputCursor::new(Cursor::new(vec![1u8, 2, 3]));
        let mut buf = [0u8; 4];
        assert_eq!(cursor.fill(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_read_into_appends() {
        let mut cursor = InputCursor::new(Cursor::new(b"abcdef".to_vec()));
        let mut out = b"xy".to_vec();
        assert_eq!(cursor.read_into(&mut out, 4).unwrap(), 4);
        assert_eq!(out, b"xyabcd");
        assert_eq!(cursor.read_into(&mut out, 10).unwrap(), 2);
        assert_eq!(out, b"xyabcdef");
        assert_eq!(cursor.position(), 6);
    }
}
