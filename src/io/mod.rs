mod local;
mod source;

pub use local::LocalFileReader;
pub use source::{ByteSource, ResourceAccess, SourceStream};

use std::io;

/// Trait for random access reading from a data source
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    ///
    /// May return fewer bytes than requested; returns 0 at end of data.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

/// In-memory archives, mostly useful for tests and nested entries
/// that were already inflated.
impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}
