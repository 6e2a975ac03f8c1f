//! One-shot path helpers exposed to the host as scalar functions.
//!
//! Everything that takes a path resolves it against the caller's
//! [`WorkingDirectory`] first, same as the listing functions.

use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use chrono::{DateTime, Utc};

use crate::entry::EntryKind;
use crate::error::PathError;
use crate::reader::modified_of;
use crate::resolver::WorkingDirectory;

const SIZE_UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// The current directory as a string (`pwd`).
pub fn pwd(cwd: &WorkingDirectory) -> String {
    cwd.current().to_string_lossy().into_owned()
}

/// The platform path separator.
pub fn path_separator() -> &'static str {
    MAIN_SEPARATOR_STR
}

/// `1536` → `"1.50 KB"`. Powers of 1024; plain bytes below 1 KB.
pub fn human_readable_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // 1023.999 KB rounds to "1024.00"; carry it into the next unit.
    if format!("{value:.2}") == "1024.00" && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", SIZE_UNITS[unit])
}

pub fn is_file(cwd: &WorkingDirectory, path: &str) -> bool {
    cwd.resolve(path).is_file()
}

pub fn is_dir(cwd: &WorkingDirectory, path: &str) -> bool {
    cwd.resolve(path).is_dir()
}

pub fn path_exists(cwd: &WorkingDirectory, path: &str) -> bool {
    cwd.resolve(path).exists()
}

/// Final component of `path`, or an empty string if there is none.
pub fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension including the leading dot (`".gz"`), or an empty string.
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

pub fn absolute_path(cwd: &WorkingDirectory, path: &str) -> PathBuf {
    cwd.resolve(path)
}

/// Size of a file in bytes. Directories are rejected.
pub fn file_size(cwd: &WorkingDirectory, path: &str) -> Result<u64, PathError> {
    let target = cwd.resolve(path);
    let meta = fs::metadata(&target).map_err(|e| PathError::from_io(&target, e))?;
    if meta.is_dir() {
        return Err(PathError::InvalidArgument(format!(
            "{} is a directory",
            target.display()
        )));
    }
    Ok(meta.len())
}

/// What `path` is, without following a final symlink.
pub fn path_type(cwd: &WorkingDirectory, path: &str) -> Result<EntryKind, PathError> {
    let target = cwd.resolve(path);
    let meta = fs::symlink_metadata(&target).map_err(|e| PathError::from_io(&target, e))?;
    Ok(EntryKind::from_file_type(meta.file_type()))
}

pub fn file_last_modified(cwd: &WorkingDirectory, path: &str) -> Result<DateTime<Utc>, PathError> {
    let target = cwd.resolve(path);
    let meta = fs::metadata(&target).map_err(|e| PathError::from_io(&target, e))?;
    Ok(modified_of(&meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_humanised() {
        assert_eq!(human_readable_size(0), "0 B");
        assert_eq!(human_readable_size(1023), "1023 B");
        assert_eq!(human_readable_size(1536), "1.50 KB");
        assert_eq!(human_readable_size(1024 * 1024), "1.00 MB");
        assert_eq!(human_readable_size(1_048_575), "1.00 MB");
        assert_eq!(human_readable_size(1024 * 1024 * 1024 - 1), "1.00 GB");
        assert_eq!(human_readable_size(u64::MAX), "16.00 EB");
    }

    #[test]
    fn names_and_extensions() {
        assert_eq!(file_name("dir/archive.tar.gz"), "archive.tar.gz");
        assert_eq!(file_extension("dir/archive.tar.gz"), ".gz");
        assert_eq!(file_extension("Makefile"), "");
        assert_eq!(file_name(""), "");
    }

    #[test]
    fn filesystem_queries_resolve_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("data.bin"), [0u8; 10]).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let cwd = WorkingDirectory::new(tmp.path()).unwrap();

        assert!(is_file(&cwd, "data.bin"));
        assert!(is_dir(&cwd, "sub"));
        assert!(!path_exists(&cwd, "missing"));
        assert_eq!(file_size(&cwd, "data.bin").unwrap(), 10);
        assert!(matches!(file_size(&cwd, "sub"), Err(PathError::InvalidArgument(_))));
        assert!(matches!(file_size(&cwd, "missing"), Err(PathError::NotFound(_))));
        assert_eq!(path_type(&cwd, "sub").unwrap(), EntryKind::Directory);
        assert_eq!(path_type(&cwd, "data.bin").unwrap().as_str(), "file");
        assert!(file_last_modified(&cwd, "data.bin").unwrap() > DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(absolute_path(&cwd, "sub/../data.bin"), tmp.path().join("data.bin"));
    }

    #[test]
    fn pwd_follows_change_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let mut cwd = WorkingDirectory::new(tmp.path()).unwrap();
        assert_eq!(pwd(&cwd), tmp.path().to_string_lossy());

        cwd.set("sub").unwrap();
        assert_eq!(pwd(&cwd), tmp.path().join("sub").to_string_lossy());
    }

    #[cfg(unix)]
    #[test]
    fn separator_and_symlink_type_on_unix() {
        use std::os::unix::fs::symlink;

        assert_eq!(path_separator(), "/");

        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("data.bin"), "x").unwrap();
        symlink(tmp.path().join("data.bin"), tmp.path().join("link")).unwrap();
        let cwd = WorkingDirectory::new(tmp.path()).unwrap();

        assert_eq!(path_type(&cwd, "link").unwrap(), EntryKind::Symlink);
        assert!(is_file(&cwd, "link"), "is_file follows the link");
    }
}
