#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use cdwalk::zip::{CDFH_SIGNATURE, EOCD_SIGNATURE, LFH_SIGNATURE};
use cdwalk::{ByteSource, CentralDirectoryVisitor, EndRecord, FileHeader};

/// One entry to be written by [`ArchiveBuilder`]. Data is always stored.
pub struct TestEntry {
    pub name: Vec<u8>,
    pub extra: Vec<u8>,
    pub comment: Vec<u8>,
    pub data: Vec<u8>,
}

impl TestEntry {
    pub fn encoded_cd_size(&self) -> u64 {
        (46 + self.name.len() + self.extra.len() + self.comment.len()) as u64
    }
}

/// Writes minimal but well-formed ZIP archives.
#[derive(Default)]
pub struct ArchiveBuilder {
    prefix: Vec<u8>,
    entries: Vec<TestEntry>,
    comment: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: Vec<u8>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn entry(self, name: &str, data: &[u8]) -> Self {
        self.entry_with(name, b"", b"", data)
    }

    pub fn entry_with(mut self, name: &str, extra: &[u8], comment: &[u8], data: &[u8]) -> Self {
        self.entries.push(TestEntry {
            name: name.as_bytes().to_vec(),
            extra: extra.to_vec(),
            comment: comment.to_vec(),
            data: data.to_vec(),
        });
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn entries(&self) -> &[TestEntry] {
        &self.entries
    }

    pub fn build(&self) -> Vec<u8> {
        let mut archive = Vec::new();
        let mut lfh_offsets = Vec::new();

        for entry in &self.entries {
            lfh_offsets.push(archive.len() as u32);
            archive.extend_from_slice(LFH_SIGNATURE);
            archive.write_u16::<LittleEndian>(20).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u32::<LittleEndian>(0).unwrap();
            archive.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            archive.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            archive.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            archive.write_u16::<LittleEndian>(entry.extra.len() as u16).unwrap();
            archive.extend_from_slice(&entry.name);
            archive.extend_from_slice(&entry.extra);
            archive.extend_from_slice(&entry.data);
        }

        let cd_offset = archive.len() as u32;
        for (entry, lfh_offset) in self.entries.iter().zip(lfh_offsets) {
            archive.extend_from_slice(CDFH_SIGNATURE);
            archive.write_u16::<LittleEndian>(20).unwrap();
            archive.write_u16::<LittleEndian>(20).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0x21).unwrap();
            archive.write_u32::<LittleEndian>(0).unwrap();
            archive.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            archive.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            archive.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            archive.write_u16::<LittleEndian>(entry.extra.len() as u16).unwrap();
            archive.write_u16::<LittleEndian>(entry.comment.len() as u16).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u16::<LittleEndian>(0).unwrap();
            archive.write_u32::<LittleEndian>(0).unwrap();
            archive.write_u32::<LittleEndian>(lfh_offset).unwrap();
            archive.extend_from_slice(&entry.name);
            archive.extend_from_slice(&entry.extra);
            archive.extend_from_slice(&entry.comment);
        }
        let cd_size = archive.len() as u32 - cd_offset;

        archive.extend_from_slice(EOCD_SIGNATURE);
        archive.write_u16::<LittleEndian>(0).unwrap();
        archive.write_u16::<LittleEndian>(0).unwrap();
        archive.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        archive.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        archive.write_u32::<LittleEndian>(cd_size).unwrap();
        archive.write_u32::<LittleEndian>(cd_offset).unwrap();
        archive.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        archive.extend_from_slice(&self.comment);

        let mut out = self.prefix.clone();
        out.extend(archive);
        out
    }

    pub fn source(&self) -> ByteSource {
        ByteSource::from_bytes(self.build())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start { entries: u64, cd_size: u64 },
    Entry { name: String, data_offset: u64 },
    End,
}

/// Visitor that records every notification it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn entry_offsets(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Entry { data_offset, .. } => Some(*data_offset),
                _ => None,
            })
            .collect()
    }
}

impl CentralDirectoryVisitor for Recorder {
    fn visit_start(&mut self, end_record: &EndRecord, central_directory: &ByteSource) {
        self.events.push(Event::Start {
            entries: end_record.number_of_records(),
            cd_size: central_directory.size(),
        });
    }

    fn visit_file_header(&mut self, header: &FileHeader, data_offset: u64) {
        self.events.push(Event::Entry {
            name: header.name_lossy().into_owned(),
            data_offset,
        });
    }

    fn visit_end(&mut self) {
        self.events.push(Event::End);
    }
}
