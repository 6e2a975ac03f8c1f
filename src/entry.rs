use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A single row produced while listing a directory level.
///
/// Built fresh by a [`LevelReader`](crate::reader::LevelReader) on every read
/// and never mutated afterwards. `full_path` is always the parent's full path
/// joined with `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The entry's base name. Never contains a path separator.
    pub name: String,

    /// Absolute, normalised path to the entry.
    pub full_path: PathBuf,

    /// What kind of filesystem object this is.
    pub kind: EntryKind,

    /// Size in bytes. Always 0 for directories.
    pub size_bytes: u64,

    /// Last modification time. The Unix epoch when the platform can't report it.
    pub modified_time: DateTime<Utc>,

    /// Where a symlink points, as stored in the link.
    pub symlink_target: Option<PathBuf>,

    /// Distance from the traversal root. The root's children are depth 1.
    pub depth: usize,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// `depth` as the schema's `INTEGER` column. Saturates at `i32::MAX`.
    pub fn depth_i32(&self) -> i32 {
        i32::try_from(self.depth).unwrap_or(i32::MAX)
    }
}

/// The kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Directory,

    /// A symbolic link that was not dereferenced.
    Symlink,

    /// Anything else (device files, pipes, sockets, dangling links when following).
    Other,
}

impl EntryKind {
    /// The string form used in the `kind` output column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }

    pub(crate) fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::File
        } else if ft.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
