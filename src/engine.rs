use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::entry::DirectoryEntry;
use crate::error::PathError;
use crate::reader::{LevelReader, ReadPolicy};

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters passed from the builder to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkConfig {
    /// Deepest level whose directories are still descended into. `None` is
    /// unbounded; `Some(0)` lists only the root's children.
    pub max_depth: Option<usize>,

    /// Hidden / symlink / ordering policy applied to every level read.
    pub policy: ReadPolicy,
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// The not-yet-emitted entries of one directory level.
///
/// Never pushed empty; popped as soon as the last entry is taken.
#[derive(Debug)]
struct TraversalFrame {
    directory_path: PathBuf,
    pending: VecDeque<DirectoryEntry>,
    depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Exhausted,
}

// ---------------------------------------------------------------------------
// TraversalState
// ---------------------------------------------------------------------------

/// Resumable depth-first, pre-order walk below a single root.
///
/// Each [`step`](TraversalState::step) yields at most one entry and leaves the
/// state consistent, so a caller can stop after any step and pick up later
/// without losing or repeating rows. No directory handle is held between steps.
pub struct TraversalState {
    root: PathBuf,
    config: WalkConfig,
    reader: Box<dyn LevelReader>,
    phase: Phase,
    stack: Vec<TraversalFrame>,
    visited: HashSet<PathBuf>,
    errors: Vec<PathError>,
}

impl TraversalState {
    /// Create an idle traversal. Nothing touches the filesystem until the
    /// first [`step`](TraversalState::step).
    pub fn new(root: PathBuf, config: WalkConfig, reader: Box<dyn LevelReader>) -> Self {
        Self {
            root,
            config,
            reader,
            phase: Phase::Idle,
            stack: Vec::new(),
            visited: HashSet::new(),
            errors: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// `true` once every reachable entry has been yielded (or the root failed).
    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    /// Number of directory levels with entries still pending.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Subdirectories skipped so far: unreadable ones, and real directories
    /// reached a second time through a followed symlink.
    pub fn errors(&self) -> &[PathError] {
        &self.errors
    }

    /// Drain the recorded subdirectory failures.
    pub fn take_errors(&mut self) -> Vec<PathError> {
        std::mem::take(&mut self.errors)
    }

    /// Advance by one entry.
    ///
    /// Returns `Ok(None)` once exhausted. The only error is a failure to read
    /// the root, which is terminal: the state becomes exhausted and the error
    /// is handed to the caller before any row is produced.
    pub fn step(&mut self) -> Result<Option<DirectoryEntry>, PathError> {
        match self.phase {
            Phase::Exhausted => return Ok(None),
            Phase::Idle => self.start()?,
            Phase::Active => {}
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some(entry) = frame.pending.pop_front() else {
                self.stack.pop();
                continue;
            };
            if frame.pending.is_empty() {
                trace!("finished {}", frame.directory_path.display());
                self.stack.pop();
            }

            // Pre-order: the directory's own row goes out now, its children
            // sit on top of the stack for the following steps.
            self.descend(&entry);

            if self.stack.is_empty() {
                self.phase = Phase::Exhausted;
            }
            return Ok(Some(entry));
        }

        self.phase = Phase::Exhausted;
        Ok(None)
    }

    fn start(&mut self) -> Result<(), PathError> {
        debug!(
            "starting traversal at {} (max_depth={:?})",
            self.root.display(),
            self.config.max_depth
        );

        let children = match self.reader.read_level(&self.root, 1, &self.config.policy) {
            Ok(children) => children,
            Err(err) => {
                self.phase = Phase::Exhausted;
                return Err(err);
            }
        };

        if self.config.policy.follow_symlinks {
            if let Some(real) = self.reader.real_path(&self.root) {
                self.visited.insert(real);
            }
        }

        self.phase = Phase::Active;
        self.push_frame(self.root.clone(), children, 0);
        if self.stack.is_empty() {
            self.phase = Phase::Exhausted;
        }
        Ok(())
    }

    fn descend(&mut self, entry: &DirectoryEntry) {
        if !entry.is_dir() {
            return;
        }
        if let Some(max) = self.config.max_depth {
            if entry.depth >= max {
                return;
            }
        }

        // Only symlinks can make a directory reachable twice.
        if self.config.policy.follow_symlinks {
            let Some(real) = self.reader.real_path(&entry.full_path) else {
                debug!("cannot resolve {}, not descending", entry.full_path.display());
                return;
            };
            if !self.visited.insert(real) {
                debug!("already visited {}, skipping", entry.full_path.display());
                self.errors.push(PathError::SymlinkLoop(entry.full_path.clone()));
                return;
            }
        }

        match self
            .reader
            .read_level(&entry.full_path, entry.depth + 1, &self.config.policy)
        {
            Ok(children) => self.push_frame(entry.full_path.clone(), children, entry.depth),
            Err(err) => {
                warn!("skipping {}: {}", entry.full_path.display(), err);
                self.errors.push(err);
            }
        }
    }

    fn push_frame(&mut self, directory_path: PathBuf, children: Vec<DirectoryEntry>, depth: usize) {
        if children.is_empty() {
            return;
        }
        debug!("entering {} ({} entries)", directory_path.display(), children.len());
        self.stack.push(TraversalFrame {
            directory_path,
            pending: children.into(),
            depth,
        });
        debug_assert!(self.frames_within_bound());
    }

    fn frames_within_bound(&self) -> bool {
        match self.config.max_depth {
            Some(max) => self.stack.iter().all(|f| f.depth == 0 || f.depth < max),
            None => true,
        }
    }
}

impl Iterator for TraversalState {
    type Item = Result<DirectoryEntry, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}
