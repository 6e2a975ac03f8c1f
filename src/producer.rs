use std::path::Path;

use crate::engine::TraversalState;
use crate::entry::DirectoryEntry;
use crate::error::PathError;

/// One batch of rows handed back by [`ListingCursor::fill`].
#[derive(Debug)]
pub struct Batch {
    /// At most `capacity` rows, continuing exactly where the previous batch ended.
    pub rows: Vec<DirectoryEntry>,

    /// No rows remain. Further calls return empty, done batches.
    pub done: bool,
}

/// Pull-based, chunked view over a traversal.
///
/// The host calls [`fill`](ListingCursor::fill) with whatever capacity its
/// output vector has, as many times as it likes. Rows come out exactly once
/// and in order no matter how the capacities vary between calls.
///
/// Dropping a cursor mid-traversal is fine: it holds no open handles.
pub struct ListingCursor {
    state: TraversalState,
    emitted: usize,
}

impl ListingCursor {
    pub fn new(state: TraversalState) -> Self {
        Self { state, emitted: 0 }
    }

    /// Produce up to `capacity` rows.
    ///
    /// # Errors
    ///
    /// A root that is missing, not a directory, or unreadable fails the first
    /// call, before any row is produced. `capacity == 0` is rejected.
    /// Subdirectories that can't be read further down are skipped and show up
    /// in [`errors`](ListingCursor::errors) instead.
    pub fn fill(&mut self, capacity: usize) -> Result<Batch, PathError> {
        if capacity == 0 {
            return Err(PathError::InvalidArgument(
                "batch capacity must be at least 1".into(),
            ));
        }

        let mut rows = Vec::with_capacity(capacity.min(1024));
        while rows.len() < capacity {
            match self.state.step()? {
                Some(entry) => rows.push(entry),
                None => break,
            }
        }

        self.emitted += rows.len();
        Ok(Batch {
            rows,
            done: self.state.is_exhausted(),
        })
    }

    /// The resolved traversal root.
    pub fn root(&self) -> &Path {
        self.state.root()
    }

    pub fn is_done(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Rows handed out so far across all batches.
    pub fn rows_emitted(&self) -> usize {
        self.emitted
    }

    /// Non-fatal failures (unreadable subdirectories) seen so far.
    pub fn errors(&self) -> &[PathError] {
        self.state.errors()
    }

    pub fn take_errors(&mut self) -> Vec<PathError> {
        self.state.take_errors()
    }
}

impl Iterator for ListingCursor {
    type Item = Result<DirectoryEntry, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.state.next();
        if let Some(Ok(_)) = item {
            self.emitted += 1;
        }
        item
    }
}
