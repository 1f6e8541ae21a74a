//! Central directory walker.
//!
//! [`CentralDirectoryParser`] streams the central directory once, front to
//! back, and hands every decoded record to the registered visitors instead
//! of building a list of its own. Which visitors are registered decides what
//! a parse produces: a listing, an index, nothing at all.
//!
//! ## Parsing Strategy
//!
//! 1. Locate the End of Central Directory in the full source
//! 2. Optionally drop the prefix bytes in front of the archive
//! 3. Carve the central directory out of the archive view
//! 4. Decode one File Header per declared entry, in order, notifying
//!    visitors as each one comes off the stream

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::io::{ByteSource, ResourceAccess};

use super::end_record::EndRecord;
use super::file_header::FileHeader;
use super::visitor::CentralDirectoryVisitor;

/// Walks a central directory and reports it to registered visitors.
///
/// ## Example
///
/// ```no_run
/// use std::path::Path;
/// use cdwalk::{ByteSource, CentralDirectoryParser, EntryCollector};
///
/// # fn main() -> cdwalk::Result<()> {
/// let source = ByteSource::open(Path::new("app.jar"))?;
/// let mut parser = CentralDirectoryParser::new();
/// let listing = parser.add_visitor(EntryCollector::new());
///
/// let archive = parser.parse(&source, true)?;
/// println!("archive data is {} bytes", archive.size());
/// for entry in listing.borrow().entries() {
///     println!("{:>8}  {}", entry.data_offset, entry.file_name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct CentralDirectoryParser {
    visitors: Vec<Rc<RefCell<dyn CentralDirectoryVisitor>>>,
}

impl CentralDirectoryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visitor and get a handle on it back.
    ///
    /// Visitors are notified in registration order. The returned handle is
    /// how the caller reads whatever the visitor gathered after the parse.
    pub fn add_visitor<V>(&mut self, visitor: V) -> Rc<RefCell<V>>
    where
        V: CentralDirectoryVisitor + 'static,
    {
        let visitor = Rc::new(RefCell::new(visitor));
        self.visitors.push(visitor.clone());
        visitor
    }

    pub fn visitor_count(&self) -> usize {
        self.visitors.len()
    }

    /// Parse `data`, triggering the registered visitors.
    ///
    /// With `skip_prefix`, any bytes in front of the archive are stripped
    /// and the returned view starts at the archive's first byte; otherwise
    /// the returned view is `data` itself.
    ///
    /// # Errors
    ///
    /// Fails if the end record cannot be located, if the declared central
    /// directory does not fit the source, or if any file header fails to
    /// decode. Visitors notified before the failure are not rolled back.
    pub fn parse(&self, data: &ByteSource, skip_prefix: bool) -> Result<ByteSource> {
        let end_record = EndRecord::locate(data)?;
        let data = if skip_prefix {
            archive_data(&end_record, data)?
        } else {
            data.clone()
        };

        let central_directory = end_record.central_directory(&data)?;
        self.visit_start(&end_record, &central_directory);

        {
            let mut stream = central_directory.open_stream(ResourceAccess::Once)?;
            let mut data_offset = 0u64;
            for _ in 0..end_record.number_of_records() {
                let header = FileHeader::read_from(&mut stream)?;
                trace!(name = %header.name_lossy(), data_offset, "file header");
                self.visit_file_header(&header, data_offset);
                data_offset += header.encoded_size();
            }
        }

        self.visit_end();
        debug!(
            entries = end_record.number_of_records(),
            archive_size = data.size(),
            "finished central directory"
        );
        Ok(data)
    }

    fn visit_start(&self, end_record: &EndRecord, central_directory: &ByteSource) {
        for visitor in &self.visitors {
            visitor
                .borrow_mut()
                .visit_start(end_record, central_directory);
        }
    }

    fn visit_file_header(&self, header: &FileHeader, data_offset: u64) {
        for visitor in &self.visitors {
            visitor.borrow_mut().visit_file_header(header, data_offset);
        }
    }

    fn visit_end(&self) {
        for visitor in &self.visitors {
            visitor.borrow_mut().visit_end();
        }
    }
}

fn archive_data(end_record: &EndRecord, data: &ByteSource) -> Result<ByteSource> {
    let offset = end_record.start_of_archive(data)?;
    if offset == 0 {
        return Ok(data.clone());
    }
    debug!(prefix = offset, "skipping bytes in front of the archive");
    data.subrange(offset, data.size() - offset)
}
