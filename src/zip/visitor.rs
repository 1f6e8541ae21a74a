use crate::io::ByteSource;

use super::end_record::EndRecord;
use super::file_header::FileHeader;
use super::structures::CompressionMethod;

/// Callbacks fired by [`CentralDirectoryParser`](super::CentralDirectoryParser)
/// while it walks a central directory.
///
/// For one parse, `visit_start` fires once, then `visit_file_header` once
/// per entry in on-disk order, then `visit_end` once. A failed parse stops
/// the sequence wherever the failure happened; nothing already delivered is
/// taken back.
pub trait CentralDirectoryVisitor {
    fn visit_start(&mut self, _end_record: &EndRecord, _central_directory: &ByteSource) {}

    /// `data_offset` is the sum of the encoded sizes of all preceding
    /// directory records.
    fn visit_file_header(&mut self, header: &FileHeader, data_offset: u64);

    fn visit_end(&mut self) {}
}

/// Summary of one entry as seen by [`EntryCollector`].
#[derive(Debug, Clone)]
pub struct CollectedEntry {
    pub file_name: String,
    pub data_offset: u64,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
    pub mod_date: (u16, u8, u8),
    pub mod_time: (u8, u8, u8),
    pub is_directory: bool,
}

/// Visitor that keeps a listing of every entry it is shown.
#[derive(Debug, Default)]
pub struct EntryCollector {
    entries: Vec<CollectedEntry>,
    comment: Vec<u8>,
    finished: bool,
}

impl EntryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CollectedEntry] {
        &self.entries
    }

    /// Archive comment from the end record.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// True once the walk reached the end of the directory.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl CentralDirectoryVisitor for EntryCollector {
    fn visit_start(&mut self, end_record: &EndRecord, _central_directory: &ByteSource) {
        self.entries.clear();
        self.entries.reserve(end_record.number_of_records() as usize);
        self.comment = end_record.comment.clone();
        self.finished = false;
    }

    fn visit_file_header(&mut self, header: &FileHeader, data_offset: u64) {
        self.entries.push(CollectedEntry {
            file_name: header.name_lossy().into_owned(),
            data_offset,
            compression_method: header.compression_method(),
            compressed_size: header.compressed_size as u64,
            uncompressed_size: header.uncompressed_size as u64,
            crc32: header.crc32,
            lfh_offset: header.lfh_offset as u64,
            mod_date: header.mod_date(),
            mod_time: header.mod_time(),
            is_directory: header.is_directory(),
        });
    }

    fn visit_end(&mut self) {
        self.finished = true;
    }
}
