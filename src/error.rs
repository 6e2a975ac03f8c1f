use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    // Resolution / reading
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    // Arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Everything else the OS can throw at us
    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PathError {
    /// Map an `io::Error` raised while touching `path` to the matching variant.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path),
            _ => Self::Io { path, source },
        }
    }

    /// The path this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. } => Some(p),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Whether a traversal can continue after this error.
    ///
    /// Only meaningful below the traversal root: a subdirectory that cannot be
    /// read is skipped and the walk keeps going. Any failure on the root itself
    /// is fatal regardless of what this returns.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidArgument(_))
    }
}
