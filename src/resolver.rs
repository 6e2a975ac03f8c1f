//! Path resolution against an explicit working directory.
//!
//! The working directory is a plain value owned by whoever drives the listing
//! (usually one per host session) rather than the process-global cwd, so two
//! sessions can `cd` independently without stepping on each other.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::info;

use crate::error::PathError;

/// The "current directory" used to resolve relative path arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    current: PathBuf,
}

impl WorkingDirectory {
    /// Start from the directory the process was launched in.
    pub fn from_process() -> Result<Self, PathError> {
        let cwd = env::current_dir().map_err(|e| PathError::from_io(".", e))?;
        Ok(Self {
            current: normalize(&cwd),
        })
    }

    /// Start from an explicit absolute directory. Existence is not checked.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, PathError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(PathError::InvalidArgument(format!(
                "working directory must be absolute, got {}",
                path.display()
            )));
        }
        Ok(Self {
            current: normalize(&path),
        })
    }

    /// The current directory (what `pwd` reports).
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Resolve `input` into an absolute, normalised path.
    ///
    /// Empty input means the current directory. This is pure path manipulation:
    /// whether the result exists is for the caller to find out.
    pub fn resolve(&self, input: impl AsRef<Path>) -> PathBuf {
        let input = input.as_ref();
        if input.as_os_str().is_empty() {
            self.current.clone()
        } else if input.is_absolute() {
            normalize(input)
        } else {
            normalize(&self.current.join(input))
        }
    }

    /// Change directory. Only an existing directory replaces the current one;
    /// on any error the working directory is left untouched.
    pub fn set(&mut self, input: impl AsRef<Path>) -> Result<&Path, PathError> {
        let target = self.resolve(input);
        let meta = fs::metadata(&target).map_err(|e| PathError::from_io(&target, e))?;
        if !meta.is_dir() {
            return Err(PathError::NotADirectory(target));
        }

        info!("working directory changed to {}", target.display());
        self.current = target;
        Ok(&self.current)
    }
}

/// Lexically normalise an absolute path: drop `.`, apply `..`, collapse
/// repeated and trailing separators. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}
