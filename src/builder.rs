use std::path::PathBuf;

use log::debug;

use crate::engine::{TraversalState, WalkConfig};
use crate::error::PathError;
use crate::producer::ListingCursor;
use crate::reader::{FsReader, LevelReader, ReadPolicy};
use crate::resolver::WorkingDirectory;

// ---------------------------------------------------------------------------
// Output schema
// ---------------------------------------------------------------------------

/// Column types a host needs to declare for the listing relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Varchar,
    UBigInt,
    Timestamp,
    Integer,
}

/// One output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const LISTING_SCHEMA: [Column; 6] = [
    Column { name: "name", ty: ColumnType::Varchar },
    Column { name: "full_path", ty: ColumnType::Varchar },
    Column { name: "kind", ty: ColumnType::Varchar },
    Column { name: "size_bytes", ty: ColumnType::UBigInt },
    Column { name: "modified_time", ty: ColumnType::Timestamp },
    Column { name: "depth", ty: ColumnType::Integer },
];

/// The row schema every listing produces, in column order.
///
/// `depth` is declared `INTEGER`; fill it from [`DirectoryEntry::depth_i32`](crate::DirectoryEntry::depth_i32).
pub fn schema() -> &'static [Column] {
    &LISTING_SCHEMA
}

// ---------------------------------------------------------------------------
// ListingBuilder
// ---------------------------------------------------------------------------

/// Bind-time arguments for a listing.
///
/// Created via [`hostwalk::list()`](crate::list) or
/// [`hostwalk::list_recursive()`](crate::list_recursive). Configure with chained
/// builder methods, then call [`bind()`](ListingBuilder::bind) to get a cursor.
///
/// # Example
///
/// ```rust,ignore
/// let mut cursor = hostwalk::list_recursive(&cwd)
///     .path("src")
///     .max_depth(2)
///     .include_hidden(true)
///     .bind()?;
///
/// let batch = cursor.fill(2048)?;
/// ```
pub struct ListingBuilder<'a> {
    cwd:             &'a WorkingDirectory,
    path:            PathBuf,
    max_depth:       Option<i64>,
    include_hidden:  bool,
    follow_symlinks: bool,
    sorted:          bool,
    reader:          Option<Box<dyn LevelReader>>,
}

impl<'a> ListingBuilder<'a> {
    pub(crate) fn new(cwd: &'a WorkingDirectory, max_depth: Option<i64>) -> Self {
        Self {
            cwd,
            path:            PathBuf::new(),
            max_depth,
            include_hidden:  false,
            follow_symlinks: false,
            sorted:          false,
            reader:          None,
        }
    }

    // ── Root ──────────────────────────────────────────────────────────────

    /// Where to start. Relative paths resolve against the working directory;
    /// an empty path (the default) means the working directory itself.
    pub fn path(mut self, p: impl Into<PathBuf>) -> Self {
        self.path = p.into();
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Deepest level whose directories are descended into. `0` lists the
    /// root's children only. Negative values fail at [`bind()`](Self::bind).
    pub fn max_depth(mut self, d: i64) -> Self {
        self.max_depth = Some(d);
        self
    }

    /// Remove any depth limit.
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Include entries whose name starts with `.`. Off by default.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    /// Dereference symlinks and descend into linked directories. Off by
    /// default. Each real directory is entered at most once, so cycles terminate.
    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    /// Sort every level by name for reproducible output. Off by default,
    /// in which case rows follow the OS enumeration order.
    pub fn sorted(mut self, yes: bool) -> Self {
        self.sorted = yes;
        self
    }

    /// Read levels through a custom [`LevelReader`] instead of the filesystem.
    pub fn reader(mut self, r: impl LevelReader + 'static) -> Self {
        self.reader = Some(Box::new(r));
        self
    }

    // ── Bind ──────────────────────────────────────────────────────────────

    /// Validate the arguments, resolve the root and create a cursor.
    ///
    /// The root is only opened on the first [`fill`](ListingCursor::fill), which
    /// is where a missing or unreadable root is reported.
    ///
    /// # Errors
    ///
    /// [`PathError::InvalidArgument`] for a negative depth.
    pub fn bind(self) -> Result<ListingCursor, PathError> {
        let max_depth = match self.max_depth {
            Some(d) => Some(usize::try_from(d).map_err(|_| {
                PathError::InvalidArgument(format!("max_depth must be non-negative, got {d}"))
            })?),
            None => None,
        };

        let root = self.cwd.resolve(&self.path);
        let config = WalkConfig {
            max_depth,
            policy: ReadPolicy {
                include_hidden:  self.include_hidden,
                follow_symlinks: self.follow_symlinks,
                sorted:          self.sorted,
            },
        };
        debug!("bound listing of {} with {:?}", root.display(), config);

        let reader = self.reader.unwrap_or_else(|| Box::new(FsReader));
        Ok(ListingCursor::new(TraversalState::new(root, config, reader)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn cwd() -> WorkingDirectory {
        WorkingDirectory::new("/srv/data").unwrap()
    }

    #[test]
    fn schema_columns_in_order() {
        let names: Vec<_> = schema().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["name", "full_path", "kind", "size_bytes", "modified_time", "depth"]
        );
        assert_eq!(schema()[5].ty, ColumnType::Integer);
        assert_eq!(schema()[3].ty, ColumnType::UBigInt);
    }

    #[test]
    fn negative_depth_is_invalid() {
        let err = crate::list_recursive(&cwd()).max_depth(-1).bind().err();
        assert!(matches!(err, Some(PathError::InvalidArgument(_))));
    }

    #[test]
    fn root_defaults_to_working_directory() {
        let cursor = crate::list(&cwd()).bind().unwrap();
        assert_eq!(cursor.root(), std::path::Path::new("/srv/data"));
    }

    #[test]
    fn relative_root_resolves_against_working_directory() {
        let cursor = crate::list(&cwd()).path("../logs/./app").bind().unwrap();
        assert_eq!(cursor.root(), std::path::Path::new("/srv/logs/app"));
    }
}
