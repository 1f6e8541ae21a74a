//! # cdwalk
//!
//! Walks the central directory of ZIP/JAR archives, including archives that
//! sit behind arbitrary prefix bytes such as a launcher script or stub
//! executable.
//!
//! The walk is a single forward pass: records are decoded one at a time and
//! handed to registered [`CentralDirectoryVisitor`]s together with their
//! running offset, without building an in-memory tree of the directory.
//!
//! ## Features
//!
//! - Read archives from the local filesystem or from memory
//! - Locate the End of Central Directory behind comments of any legal size
//! - Detect and strip prefix bytes in front of the archive
//! - Fan out directory records to any number of visitors
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use cdwalk::{ByteSource, CentralDirectoryParser, EntryCollector};
//!
//! fn main() -> anyhow::Result<()> {
//!     let source = ByteSource::open(Path::new("launcher.jar"))?;
//!
//!     let mut parser = CentralDirectoryParser::new();
//!     let listing = parser.add_visitor(EntryCollector::new());
//!     parser.parse(&source, true)?;
//!
//!     for entry in listing.borrow().entries() {
//!         println!("{}", entry.file_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{ByteSource, LocalFileReader, ReadAt, ResourceAccess, SourceStream};
pub use zip::{
    CentralDirectoryParser, CentralDirectoryVisitor, CollectedEntry, EndRecord, EntryCollector,
    FileHeader,
};
