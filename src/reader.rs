use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{trace, warn};

use crate::entry::{DirectoryEntry, EntryKind};
use crate::error::PathError;

/// Per-level read options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadPolicy {
    /// Keep entries whose name starts with `.`.
    pub include_hidden: bool,

    /// Report what a symlink points at instead of the link itself.
    pub follow_symlinks: bool,

    /// Sort each level by name. Off by default: OS enumeration order.
    pub sorted: bool,
}

/// Reads one directory level.
///
/// Implement this to list something other than the local filesystem, or to
/// drive the traversal engine from a fixture in tests. [`FsReader`] is the
/// implementation used by default.
///
/// # Contract
///
/// - Missing directories fail with [`PathError::NotFound`], non-directories
///   with [`PathError::NotADirectory`], access failures with
///   [`PathError::PermissionDenied`].
/// - A single bad entry never fails the whole level.
/// - Hidden filtering and symlink dereferencing happen here, per `policy`.
/// - No handle outlives the call.
pub trait LevelReader: Send {
    /// List the children of `dir`, stamping each with `depth`.
    fn read_level(
        &self,
        dir: &Path,
        depth: usize,
        policy: &ReadPolicy,
    ) -> Result<Vec<DirectoryEntry>, PathError>;

    /// Canonical identity of a directory, used to avoid re-entering it when
    /// following symlinks. `None` when it can't be determined.
    fn real_path(&self, path: &Path) -> Option<PathBuf>;
}

/// [`LevelReader`] over the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl LevelReader for FsReader {
    fn read_level(
        &self,
        dir: &Path,
        depth: usize,
        policy: &ReadPolicy,
    ) -> Result<Vec<DirectoryEntry>, PathError> {
        let read_dir = fs::read_dir(dir).map_err(|e| open_error(dir, e))?;

        let mut entries = Vec::new();
        for res in read_dir {
            let dirent = match res {
                Ok(d) => d,
                Err(e) => {
                    warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let os_name = dirent.file_name();
            let name = os_name.to_string_lossy().into_owned();
            if !policy.include_hidden && is_hidden(&name) {
                continue;
            }

            entries.push(build_entry(dir.join(&os_name), name, depth, policy));
        }

        if policy.sorted {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        trace!("read {} entries from {}", entries.len(), dir.display());
        Ok(entries)
    }

    fn real_path(&self, path: &Path) -> Option<PathBuf> {
        fs::canonicalize(path).ok()
    }
}

/// Whether a name carries the hidden-file marker.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn build_entry(full_path: PathBuf, name: String, depth: usize, policy: &ReadPolicy) -> DirectoryEntry {
    // The entry may vanish between readdir and stat; report it rather than fail.
    let link_meta = match fs::symlink_metadata(&full_path) {
        Ok(m) => m,
        Err(_) => {
            return DirectoryEntry {
                name,
                full_path,
                kind: EntryKind::Other,
                size_bytes: 0,
                modified_time: DateTime::<Utc>::UNIX_EPOCH,
                symlink_target: None,
                depth,
            };
        }
    };

    let mut symlink_target = None;
    let mut kind = EntryKind::from_file_type(link_meta.file_type());
    let mut meta = link_meta;

    if kind == EntryKind::Symlink {
        symlink_target = fs::read_link(&full_path).ok();
        if policy.follow_symlinks {
            match fs::metadata(&full_path) {
                Ok(target) => {
                    kind = EntryKind::from_file_type(target.file_type());
                    meta = target;
                }
                Err(_) => kind = EntryKind::Other,
            }
        }
    }

    let size_bytes = if kind == EntryKind::Directory { 0 } else { meta.len() };

    DirectoryEntry {
        name,
        full_path,
        kind,
        size_bytes,
        modified_time: modified_of(&meta),
        symlink_target,
        depth,
    }
}

pub(crate) fn modified_of(meta: &fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// `read_dir` reports a plain file as a generic error on some platforms.
fn open_error(dir: &Path, e: std::io::Error) -> PathError {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => PathError::NotADirectory(dir.to_path_buf()),
        _ => PathError::from_io(dir, e),
    }
}
