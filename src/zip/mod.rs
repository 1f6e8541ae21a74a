//! ZIP central directory walking.
//!
//! This module locates the central directory of a ZIP (or JAR) archive and
//! streams its records to pluggable visitors. It deliberately stops at the
//! directory: entry data is never read, inflated or checked.
//!
//! ## Architecture
//!
//! - [`structures`]: signatures, fixed sizes and small shared enums
//! - [`end_record`]: finding and decoding the End of Central Directory
//! - [`file_header`]: decoding one Central Directory File Header
//! - [`parser`]: the walker that ties the above together
//! - [`visitor`]: the callback trait and a ready-made listing visitor
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Anything may precede item 1. Offsets inside the archive are relative to
//! where the archive starts, not to where the file starts, so a prefixed
//! archive has to be re-based before those offsets mean anything.
//!
//! ## Limitations
//!
//! - No ZIP64 support
//! - No multi-disk archive support

pub mod end_record;
pub mod file_header;
pub mod parser;
pub mod structures;
pub mod visitor;

pub use end_record::EndRecord;
pub use file_header::FileHeader;
pub use parser::CentralDirectoryParser;
pub use structures::*;
pub use visitor::{CentralDirectoryVisitor, CollectedEntry, EntryCollector};
