//! Main entry point for the cdwalk CLI application.
//!
//! Walks the central directory of a local archive and prints what the
//! walk reported.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cdwalk::{ByteSource, CentralDirectoryParser, Cli, EntryCollector};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("CDWALK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = ByteSource::open(Path::new(&cli.file))
        .with_context(|| format!("cannot open {}", cli.file))?;

    let mut parser = CentralDirectoryParser::new();
    let listing = parser.add_visitor(EntryCollector::new());
    let archive = parser
        .parse(&source, cli.skip_prefix)
        .with_context(|| format!("{} is not a readable archive", cli.file))?;

    let prefix = source.size() - archive.size();
    if prefix > 0 && !cli.quiet {
        eprintln!("Archive starts after {} of prefix", format_size(prefix));
    }

    print_listing(&listing.borrow(), &cli);
    Ok(())
}

/// Print the collected entries.
///
/// - Simple format: just file names, one per line
/// - Verbose format (`-v`): directory offset, sizes, method and timestamp
fn print_listing(listing: &EntryCollector, cli: &Cli) {
    if cli.verbose {
        println!(
            "{:>10}  {:>10}  {:>10}  {:>6}  {:>10}  {:>5}  Name",
            "Offset", "Length", "Size", "Method", "Date", "Time"
        );
        println!("{}", "-".repeat(78));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in listing.entries() {
        if cli.verbose {
            let (year, month, day) = entry.mod_date;
            let (hour, minute, _second) = entry.mod_time;
            println!(
                "{:>10}  {:>10}  {:>10}  {:>6}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
                entry.data_offset,
                entry.uncompressed_size,
                entry.compressed_size,
                entry.compression_method.as_u16(),
                year,
                month,
                day,
                hour,
                minute,
                entry.file_name
            );
        } else {
            println!("{}", entry.file_name);
        }

        if !entry.is_directory {
            total_uncompressed += entry.uncompressed_size;
            total_compressed += entry.compressed_size;
            file_count += 1;
        }
    }

    if cli.quiet {
        return;
    }
    if cli.verbose {
        println!("{}", "-".repeat(78));
        println!(
            "{:>10}  {:>10}  {:>10}  {} files",
            "", total_uncompressed, total_compressed, file_count
        );
    }
    if !listing.comment().is_empty() {
        println!("comment: {}", String::from_utf8_lossy(listing.comment()));
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
