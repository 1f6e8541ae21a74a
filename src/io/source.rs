//! Bounded, shareable views over a [`ReadAt`] source.
//!
//! A [`ByteSource`] never owns its bytes: it pairs a shared reader with a
//! logical window `[offset, offset + len)`. Narrowing a view with
//! [`ByteSource::subrange`] is cheap and never touches the underlying data,
//! which is what lets the walker strip a prefix or carve out the central
//! directory without copying.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use super::{LocalFileReader, ReadAt};
use crate::error::{Error, Result};

/// How a [`SourceStream`] expects to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAccess {
    /// The range is read start to finish exactly once, so it is fetched
    /// with a single read when the stream is opened.
    Once,
    /// Every `read` call goes straight to the underlying source.
    PerRead,
}

/// Immutable view over a contiguous byte range of a [`ReadAt`] source.
#[derive(Clone)]
pub struct ByteSource {
    reader: Arc<dyn ReadAt>,
    offset: u64,
    len: u64,
}

impl ByteSource {
    /// View covering the whole of `reader`.
    pub fn new(reader: Arc<dyn ReadAt>) -> Self {
        let len = reader.size();
        Self {
            reader,
            offset: 0,
            len,
        }
    }

    /// Open a local file as a source.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Arc::new(LocalFileReader::new(path)?)))
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::new(Arc::new(data))
    }

    /// Length of this view in bytes.
    pub fn size(&self) -> u64 {
        self.len
    }

    /// Absolute position of this view within the underlying reader.
    pub fn absolute_offset(&self) -> u64 {
        self.offset
    }

    /// Narrower view over the same storage, `offset` relative to this view.
    ///
    /// # Errors
    ///
    /// Returns a format error if the requested range does not fit inside
    /// this view. Ranges usually come from sizes declared inside the
    /// archive, so an overrun means the archive is lying about itself.
    pub fn subrange(&self, offset: u64, len: u64) -> Result<ByteSource> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(ByteSource {
                reader: Arc::clone(&self.reader),
                offset: self.offset + offset,
                len,
            }),
            _ => Err(Error::format(format!(
                "range {}+{} lies outside a {}-byte source",
                offset, len, self.len
            ))),
        }
    }

    /// Fill `buf` from position `pos` of this view.
    pub fn read_exact_at(&self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let fits = pos
            .checked_add(buf.len() as u64)
            .is_some_and(|end| end <= self.len);
        if !fits {
            return Err(Error::format(format!(
                "read of {} bytes at {} lies outside a {}-byte source",
                buf.len(),
                pos,
                self.len
            )));
        }

        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .reader
                .read_at(self.offset + pos + filled as u64, &mut buf[filled..])?;
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            filled += n;
        }
        Ok(())
    }

    /// Single-pass forward stream over this view.
    ///
    /// The stream holds its own handle on the underlying reader; dropping it
    /// releases everything it fetched.
    pub fn open_stream(&self, access: ResourceAccess) -> Result<SourceStream> {
        let inner = match access {
            ResourceAccess::Once => {
                let len = usize::try_from(self.len)
                    .map_err(|_| Error::format("range too large to buffer"))?;
                let mut data = vec![0u8; len];
                self.read_exact_at(0, &mut data)?;
                StreamInner::Buffered(Cursor::new(data))
            }
            ResourceAccess::PerRead => StreamInner::Direct {
                source: self.clone(),
                position: 0,
            },
        };
        Ok(SourceStream { inner })
    }

    /// True if both views cover the same range of the same reader.
    pub fn same_range(&self, other: &ByteSource) -> bool {
        Arc::as_ptr(&self.reader).cast::<()>() == Arc::as_ptr(&other.reader).cast::<()>()
            && self.offset == other.offset
            && self.len == other.len
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSource")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

enum StreamInner {
    Buffered(Cursor<Vec<u8>>),
    Direct { source: ByteSource, position: u64 },
}

/// Forward-only reader produced by [`ByteSource::open_stream`].
pub struct SourceStream {
    inner: StreamInner,
}

impl Read for SourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            StreamInner::Buffered(cursor) => cursor.read(buf),
            StreamInner::Direct { source, position } => {
                let remaining = source.len - *position;
                let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
                if want == 0 {
                    return Ok(0);
                }
                let n = source
                    .reader
                    .read_at(source.offset + *position, &mut buf[..want])?;
                *position += n as u64;
                Ok(n)
            }
        }
    }
}
