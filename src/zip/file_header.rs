use byteorder::{LittleEndian, ReadBytesExt};
use std::borrow::Cow;
use std::io::{self, Cursor, Read};

use crate::error::{Error, Result};

use super::structures::{CDFH_BASE_SIZE, CDFH_SIGNATURE, CompressionMethod};

/// One decoded Central Directory File Header.
///
/// Name, extra field and comment are kept as raw bytes; their lengths are
/// what ties one record to the next.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    pub lfh_offset: u32,
    pub name: Vec<u8>,
    pub extra: Vec<u8>,
    pub comment: Vec<u8>,
}

impl FileHeader {
    /// Decode the next header from a forward-only reader.
    ///
    /// Consumes exactly [`FileHeader::encoded_size`] bytes on success:
    /// the 46 fixed bytes, then name, extra and comment, in that order.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut fixed = [0u8; CDFH_BASE_SIZE];
        reader.read_exact(&mut fixed).map_err(truncated)?;

        if &fixed[0..4] != CDFH_SIGNATURE {
            return Err(Error::format("Invalid Central Directory File Header"));
        }

        let mut cursor = Cursor::new(&fixed[4..]);
        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let name_len = cursor.read_u16::<LittleEndian>()?;
        let extra_len = cursor.read_u16::<LittleEndian>()?;
        let comment_len = cursor.read_u16::<LittleEndian>()?;
        let disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()?;

        let name = read_field(reader, name_len)?;
        let extra = read_field(reader, extra_len)?;
        let comment = read_field(reader, comment_len)?;

        Ok(Self {
            version_made_by,
            version_needed,
            flags,
            method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number_start,
            internal_attrs,
            external_attrs,
            lfh_offset,
            name,
            extra,
            comment,
        })
    }

    /// Bytes this record occupies in the central directory.
    pub fn encoded_size(&self) -> u64 {
        (CDFH_BASE_SIZE + self.name.len() + self.extra.len() + self.comment.len()) as u64
    }

    /// Entry name, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Directory entries end with '/'
    pub fn is_directory(&self) -> bool {
        self.name.last() == Some(&b'/')
    }

    pub fn compression_method(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.method)
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

fn read_field<R: Read>(reader: &mut R, len: u16) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).map_err(truncated)?;
    Ok(buf)
}

// The directory ran out before the record did.
fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::format("Central Directory truncated inside a file header")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn cdfh(name: &[u8], extra: &[u8], comment: &[u8]) -> Vec<u8> {
        let mut buf = CDFH_SIGNATURE.to_vec();
        buf.write_u16::<LittleEndian>(20).unwrap(); // version made by
        buf.write_u16::<LittleEndian>(20).unwrap(); // version needed
        buf.write_u16::<LittleEndian>(0).unwrap(); // flags
        buf.write_u16::<LittleEndian>(8).unwrap(); // deflate
        buf.write_u16::<LittleEndian>(0x6B5A).unwrap(); // 13:26:52
        buf.write_u16::<LittleEndian>(0x5A91).unwrap(); // 2025-04-17
        buf.write_u32::<LittleEndian>(0xDEADBEEF).unwrap();
        buf.write_u32::<LittleEndian>(12).unwrap();
        buf.write_u32::<LittleEndian>(34).unwrap();
        buf.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        buf.write_u16::<LittleEndian>(extra.len() as u16).unwrap();
        buf.write_u16::<LittleEndian>(comment.len() as u16).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(77).unwrap(); // local header offset
        buf.extend_from_slice(name);
        buf.extend_from_slice(extra);
        buf.extend_from_slice(comment);
        buf
    }

    #[test]
    fn test_parse_file_header() {
        let data = cdfh(b"dir/b.class", b"\xCA\xFE\x00\x00", b"hi");
        let mut cursor = Cursor::new(&data);
        let header = FileHeader::read_from(&mut cursor).unwrap();

        assert_eq!(header.name, b"dir/b.class");
        assert_eq!(header.extra, b"\xCA\xFE\x00\x00");
        assert_eq!(header.comment, b"hi");
        assert_eq!(header.compression_method(), CompressionMethod::Deflate);
        assert_eq!(header.crc32, 0xDEADBEEF);
        assert_eq!(header.compressed_size, 12);
        assert_eq!(header.uncompressed_size, 34);
        assert_eq!(header.lfh_offset, 77);
        assert_eq!(header.encoded_size(), 46 + 11 + 4 + 2);
        assert_eq!(cursor.position(), header.encoded_size());
        assert!(!header.is_directory());
    }

    #[test]
    fn test_dos_timestamp() {
        let data = cdfh(b"META-INF/", b"", b"");
        let header = FileHeader::read_from(&mut Cursor::new(&data)).unwrap();
        assert_eq!(header.mod_date(), (2025, 4, 17));
        assert_eq!(header.mod_time(), (13, 26, 52));
        assert!(header.is_directory());
    }

    #[test]
    fn test_consecutive_headers() {
        let mut data = cdfh(b"a.txt", b"", b"");
        data.extend(cdfh(b"c", b"xy", b"note"));
        let mut cursor = Cursor::new(&data);

        let first = FileHeader::read_from(&mut cursor).unwrap();
        let second = FileHeader::read_from(&mut cursor).unwrap();
        assert_eq!(first.name_lossy(), "a.txt");
        assert_eq!(second.name_lossy(), "c");
        assert_eq!(second.comment, b"note");
        assert_eq!(cursor.position(), data.len() as u64);
    }

    #[test]
    fn test_bad_signature() {
        let mut data = cdfh(b"a", b"", b"");
        data[2] = 0x03;
        let err = FileHeader::read_from(&mut Cursor::new(&data)).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_truncated_header() {
        let data = cdfh(b"truncated.txt", b"", b"");
        let err = FileHeader::read_from(&mut Cursor::new(&data[..50])).unwrap_err();
        assert!(err.is_format());

        let err = FileHeader::read_from(&mut Cursor::new(&data[..20])).unwrap_err();
        assert!(err.is_format());
    }
}
