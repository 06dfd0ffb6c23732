//! # Backing File
//!
//! Reading and writing the delimited inventory file.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Backing File Lifecycle                             │
//! │                                                                         │
//! │  Inventory::open                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataFile::load ── missing file? ──► empty store                       │
//! │       │          ── unreadable?  ──► warn, empty store                 │
//! │       │          ── bad record?  ──► warn, skip, keep going            │
//! │       ▼                                                                 │
//! │  every successful mutation                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataFile::save                                                        │
//! │    1. write header + records to  .tmpXXXX  (same directory)            │
//! │    2. fsync                                                            │
//! │    3. rename over inventory_data.csv                                   │
//! │                                                                         │
//! │  A crash between 1 and 3 leaves the previous file intact.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use tally_core::codec::{self, RecordReader};
use tally_core::{IdSequence, Item};

// =============================================================================
// Import Summary
// =============================================================================

/// Outcome of reading records into a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records decoded and added.
    pub imported: usize,
    /// Records skipped (malformed, invalid, unreadable or duplicate id).
    pub errors: usize,
}

// =============================================================================
// Data File
// =============================================================================

/// The store's backing file.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DataFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every valid record. Never fails: problems are logged and the
    /// affected records (or the whole file) are treated as absent.
    pub fn load(&self, ids: &mut IdSequence) -> Vec<Item> {
        let mut items = Vec::new();

        match open_records(&self.path) {
            Ok(records) => {
                let summary = ingest(records, &self.path, ids, &mut items);
                info!(
                    path = %self.path.display(),
                    loaded = summary.imported,
                    skipped = summary.errors,
                    "Loaded inventory"
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No data file yet, starting empty");
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not read data file, starting empty"
                );
            }
        }

        items
    }

    /// Rewrites the whole file.
    pub fn save(&self, items: &[Item]) -> io::Result<()> {
        write_records(&self.path, items)?;
        debug!(path = %self.path.display(), count = items.len(), "Saved inventory");
        Ok(())
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Opens a record file for reading.
pub fn open_records(path: &Path) -> io::Result<RecordReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(RecordReader::new(BufReader::new(file)))
}

/// Decodes records into `items`, skipping the first record (the header)
/// and blank records.
///
/// A record whose id is already present in `items` is skipped and counted
/// as an error. A record spanning several lines that fails to decode counts
/// as one error for its first line; the lines after it are read again.
/// Every failure is logged with its line number.
pub fn ingest<R: BufRead>(
    mut records: RecordReader<R>,
    source: &Path,
    ids: &mut IdSequence,
    items: &mut Vec<Item>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    // header
    let _ = records.next();

    while let Some(record) = records.next() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %source.display(), error = %e, "Skipping unreadable record");
                summary.errors += 1;
                continue;
            }
            Err(e) => {
                warn!(path = %source.display(), error = %e, "Read failed, stopping");
                summary.errors += 1;
                break;
            }
        };

        if record.is_blank() {
            continue;
        }

        match codec::decode(&record.text, ids) {
            Ok(item) if items.iter().any(|existing| existing.id() == item.id()) => {
                warn!(
                    path = %source.display(),
                    line = record.line,
                    id = item.id(),
                    "Skipping record with duplicate ID"
                );
                summary.errors += 1;
            }
            Ok(item) => {
                items.push(item);
                summary.imported += 1;
            }
            Err(e) => {
                warn!(
                    path = %source.display(),
                    line = record.line,
                    error = %e,
                    "Skipping malformed record"
                );
                summary.errors += 1;
                if records.reread_tail() {
                    debug!(line = record.line, "Re-reading lines joined by a stray quote");
                }
            }
        }
    }

    summary
}

// =============================================================================
// Writing
// =============================================================================

/// Writes the header and one record per item, atomically replacing `path`.
///
/// Missing parent directories are created.
pub fn write_records(path: &Path, items: &[Item]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        writeln!(out, "{}", codec::header())?;
        for item in items {
            writeln!(out, "{}", codec::encode(item))?;
        }
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tally_core::{Money, NewItem};

    fn sample(ids: &mut IdSequence, name: &str) -> Item {
        let draft = NewItem::new(name, "Tools", 10, Money::from_cents(250));
        Item::new(ids.allocate().unwrap(), draft).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path().join("inventory.csv"));

        let mut ids = IdSequence::new();
        let items = vec![sample(&mut ids, "Widget"), sample(&mut ids, "Bolt, M6\nzinc")];
        file.save(&items).unwrap();

        let mut reloaded_ids = IdSequence::new();
        let loaded = file.load(&mut reloaded_ids);
        assert_eq!(loaded, items);
        assert_eq!(reloaded_ids.peek(), Ok(3));
    }

    #[test]
    fn test_saved_file_starts_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");

        write_records(&path, &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{}\n", codec::HEADER));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("inventory.csv");

        write_records(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path().join("inventory.csv"));
        let mut ids = IdSequence::new();

        file.save(&[sample(&mut ids, "Widget")]).unwrap();
        file.save(&[sample(&mut ids, "Gadget")]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path().join("absent.csv"));
        let mut ids = IdSequence::new();

        assert!(file.load(&mut ids).is_empty());
        assert_eq!(ids.peek(), Ok(1));
    }

    #[test]
    fn test_load_directory_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path());
        let mut ids = IdSequence::new();

        assert!(file.load(&mut ids).is_empty());
    }

    #[test]
    fn test_ingest_skips_bad_and_duplicate_records() {
        let mut ids = IdSequence::new();
        let widget = sample(&mut ids, "Widget");
        let text = format!(
            "{}\n{}\n\nnot,a,record\n{}\n",
            codec::HEADER,
            codec::encode(&widget),
            codec::encode(&widget),
        );

        let mut items = Vec::new();
        let mut fresh = IdSequence::new();
        let summary = ingest(
            RecordReader::new(Cursor::new(text)),
            Path::new("test.csv"),
            &mut fresh,
            &mut items,
        );

        assert_eq!(
            summary,
            ImportSummary {
                imported: 1,
                errors: 2
            }
        );
        assert_eq!(items, vec![widget]);
    }
}
