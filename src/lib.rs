//! # hostwalk
//!
//! Host filesystem listings for query engines: resumable, chunked, and cheap
//! to abandon.
//!
//! hostwalk owns the pieces a host needs to expose directory listings as a
//! table function: path resolution against a per-session working directory,
//! single-level directory reads, a depth-first walk that can be paused after
//! any row, and a `fill(capacity)` cursor that hands rows out in batches. It
//! does **not** own function registration or result materialisation; those
//! belong to the host.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hostwalk::WorkingDirectory;
//!
//! let cwd = WorkingDirectory::from_process()?;
//! let mut cursor = hostwalk::list_recursive(&cwd)
//!     .path("src")
//!     .max_depth(3)
//!     .sorted(true)
//!     .bind()?;
//!
//! loop {
//!     let batch = cursor.fill(1024)?;
//!     for row in &batch.rows {
//!         println!("{} {} {}", row.depth, row.kind, row.full_path.display());
//!     }
//!     if batch.done {
//!         break;
//!     }
//! }
//!
//! for skipped in cursor.errors() {
//!     eprintln!("skipped: {skipped}");
//! }
//! # Ok::<(), hostwalk::PathError>(())
//! ```
//!
//! # Custom Readers
//!
//! Implement [`LevelReader`] to walk something other than the local disk:
//!
//! ```rust
//! use std::path::{Path, PathBuf};
//! use hostwalk::{DirectoryEntry, LevelReader, PathError, ReadPolicy};
//!
//! struct Empty;
//!
//! impl LevelReader for Empty {
//!     fn read_level(&self, _dir: &Path, _depth: usize, _policy: &ReadPolicy)
//!         -> Result<Vec<DirectoryEntry>, PathError>
//!     {
//!         Ok(Vec::new())
//!     }
//!
//!     fn real_path(&self, path: &Path) -> Option<PathBuf> {
//!         Some(path.to_path_buf())
//!     }
//! }
//!
//! let cwd = hostwalk::WorkingDirectory::new(std::env::temp_dir()).unwrap();
//! let mut cursor = hostwalk::list(&cwd).reader(Empty).bind().unwrap();
//! let batch = cursor.fill(16).unwrap();
//! assert!(batch.rows.is_empty() && batch.done);
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod scalar;

mod builder;
mod entry;
mod error;
mod producer;
mod reader;
mod resolver;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::{schema, Column, ColumnType, ListingBuilder};
pub use entry::{DirectoryEntry, EntryKind};
pub use error::PathError;
pub use producer::{Batch, ListingCursor};
pub use reader::{is_hidden, FsReader, LevelReader, ReadPolicy};
pub use resolver::{normalize, WorkingDirectory};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Single-level listing (`ls`): the root's children, no descent.
pub fn list(cwd: &WorkingDirectory) -> ListingBuilder<'_> {
    ListingBuilder::new(cwd, Some(0))
}

/// Recursive listing (`lsr`): unbounded unless
/// [`max_depth`](ListingBuilder::max_depth) is set.
pub fn list_recursive(cwd: &WorkingDirectory) -> ListingBuilder<'_> {
    ListingBuilder::new(cwd, None)
}

/// Change directory (`cd`). Produces no rows; on failure `cwd` is untouched.
pub fn change_directory(cwd: &mut WorkingDirectory, path: &str) -> Result<(), PathError> {
    cwd.set(path).map(|_| ())
}
