//! End of Central Directory (EOCD) location and decoding.
//!
//! The EOCD is the only structure of a ZIP archive found at a known place:
//! the end of the file, give or take a trailing comment of at most 65535
//! bytes. Everything else, the central directory included, is reached
//! through the offsets it declares.
//!
//! Those offsets are relative to the start of the archive, which is not
//! necessarily the start of the file. Self-executing archives and launcher
//! scripts prepend arbitrary bytes; [`EndRecord::start_of_archive`] recovers
//! the length of that prefix by comparing where the central directory is
//! declared to be with where it actually ends (right before the EOCD).

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::ByteSource;

use super::structures::{EOCD_SIGNATURE, EOCD_SIZE, MAX_COMMENT_SIZE};

/// Decoded End of Central Directory record.
#[derive(Debug, Clone)]
pub struct EndRecord {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
    /// Archive comment, `comment_len` bytes
    pub comment: Vec<u8>,
    /// Position of the record's signature in the located source
    record_offset: u64,
}

impl EndRecord {
    /// Decode the fixed 22-byte portion of an EOCD.
    ///
    /// The comment is left empty and the record offset at zero; use
    /// [`EndRecord::locate`] to get a fully populated record.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < EOCD_SIZE || &data[0..4] != EOCD_SIGNATURE {
            return Err(Error::format("Invalid End of Central Directory"));
        }

        let mut cursor = Cursor::new(&data[4..]);

        Ok(Self {
            disk_number: cursor.read_u16::<LittleEndian>()?,
            disk_with_cd: cursor.read_u16::<LittleEndian>()?,
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
            comment: Vec::new(),
            record_offset: 0,
        })
    }

    /// Find and decode the EOCD of `source`.
    ///
    /// The record must end exactly at the end of the source: a signature is
    /// only accepted if its declared comment length accounts for every
    /// remaining byte. The search never looks further back than the largest
    /// possible record.
    ///
    /// # Errors
    ///
    /// Returns a format error if no record is found, if the record uses
    /// ZIP64 sentinels, or if its central directory cannot fit in front of it.
    pub fn locate(source: &ByteSource) -> Result<Self> {
        let size = source.size();

        // Common case first: no comment, record flush with the end.
        if size >= EOCD_SIZE as u64 {
            let offset = size - EOCD_SIZE as u64;
            let mut buf = [0u8; EOCD_SIZE];
            source.read_exact_at(offset, &mut buf)?;

            if &buf[0..4] == EOCD_SIGNATURE && buf[20..22] == [0, 0] {
                let record = Self::from_bytes(&buf)?;
                return record.accept(offset, Vec::new());
            }
        }

        let search_size = ((MAX_COMMENT_SIZE + EOCD_SIZE) as u64).min(size);
        let search_start = size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        source.read_exact_at(search_start, &mut buf)?;

        // The flush position was covered above, so start one byte earlier.
        for i in (0..buf.len().saturating_sub(EOCD_SIZE)).rev() {
            if &buf[i..i + 4] != EOCD_SIGNATURE {
                continue;
            }
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            if comment_len == buf.len() - i - EOCD_SIZE {
                let record = Self::from_bytes(&buf[i..i + EOCD_SIZE])?;
                let comment = buf[i + EOCD_SIZE..].to_vec();
                return record.accept(search_start + i as u64, comment);
            }
        }

        Err(Error::format(format!(
            "Not a valid ZIP file: no end of central directory in the last {} bytes",
            search_size
        )))
    }

    fn accept(mut self, record_offset: u64, comment: Vec<u8>) -> Result<Self> {
        self.record_offset = record_offset;
        self.comment = comment;

        if self.is_zip64() {
            return Err(Error::format("ZIP64 archives are not supported"));
        }
        if self.central_directory_size() > record_offset {
            return Err(Error::format(format!(
                "central directory of {} bytes does not fit before end record at {}",
                self.cd_size, record_offset
            )));
        }

        debug!(
            record_offset,
            entries = self.total_entries,
            cd_size = self.cd_size,
            cd_offset = self.cd_offset,
            comment_len = self.comment_len,
            "located end of central directory"
        );
        Ok(self)
    }

    /// Position of the record within the source it was located in.
    pub fn record_offset(&self) -> u64 {
        self.record_offset
    }

    /// On-disk size of the record, comment included.
    pub fn size(&self) -> u64 {
        EOCD_SIZE as u64 + self.comment_len as u64
    }

    pub fn number_of_records(&self) -> u64 {
        self.total_entries as u64
    }

    /// Central directory offset as declared, relative to the archive start.
    pub fn central_directory_offset(&self) -> u64 {
        self.cd_offset as u64
    }

    pub fn central_directory_size(&self) -> u64 {
        self.cd_size as u64
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }

    /// Number of leading bytes of `source` that are not part of the archive.
    ///
    /// `source` must be the source the record was located in. Returns 0 for
    /// an archive without prefix.
    ///
    /// # Errors
    ///
    /// Returns a format error if the central directory is declared to start
    /// after the position it actually occupies.
    pub fn start_of_archive(&self, source: &ByteSource) -> Result<u64> {
        let actual = source
            .size()
            .checked_sub(self.size() + self.central_directory_size())
            .ok_or_else(|| Error::format("end record larger than its source"))?;

        actual
            .checked_sub(self.central_directory_offset())
            .ok_or_else(|| {
                Error::format(format!(
                    "central directory declared at {} but found at {}",
                    self.cd_offset, actual
                ))
            })
    }

    /// The central directory of an archive whose data starts at the
    /// beginning of `source`.
    pub fn central_directory(&self, source: &ByteSource) -> Result<ByteSource> {
        source.subrange(
            self.central_directory_offset(),
            self.central_directory_size(),
        )
    }
}
