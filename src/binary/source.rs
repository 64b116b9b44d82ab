//! Random-access byte sources the range search reads from.

use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Positioned reads against an index.
///
/// The buffered strategy reads from a slice, the direct and b-tree
/// strategies from a seekable reader; the search code does not care which.
pub trait ByteSource {
    /// Fill `buf` with the bytes starting at `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

/// Byte source over an in-memory buffer.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Borrow `len` bytes at `offset` without copying.
    pub fn slice(&self, offset: u64, len: usize) -> Result<&'a [u8]> {
        usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(len)?))
            .and_then(|range| self.data.get(range))
            .ok_or_else(|| {
                Error::corrupt(format!(
                    "read of {} bytes at offset {} exceeds index size {}",
                    len,
                    offset,
                    self.data.len()
                ))
            })
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(self.slice(offset, buf.len())?);
        Ok(())
    }
}

/// Byte source over a seekable reader: one seek and one read per call.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Total length of the underlying stream.
    pub fn stream_len(&mut self) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::End(0))?)
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }
}
