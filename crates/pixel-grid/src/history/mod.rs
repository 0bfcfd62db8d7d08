//! Bounded, cursor-based undo/redo over grid snapshots.
//!
//! The history is a sliding window of at most `limit` snapshots plus a
//! cursor pointing at the active one:
//!
//! ```text
//! commit(g)   drop snapshots after the cursor, push a copy of g,
//!             evict the oldest past `limit`, cursor = last
//! undo()      cursor - 1 if cursor > 0, returns a copy
//! redo()      cursor + 1 if not at the end, returns a copy
//! clear()     empty, no cursor
//! ```
//!
//! Undo past the first snapshot and redo past the last are no-ops that
//! return `None`. Snapshots are stored by value and handed out as clones
//! (O(width * height) each), so nothing outside the history can change a
//! committed snapshot.

use std::collections::VecDeque;

use crate::grid::Grid;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Undo/redo log of grid snapshots.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, EditHistory, GridBuilder, Palette};
///
/// let palette = Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
/// let first = GridBuilder::new(1, 1, palette.clone()).build(&[0]).unwrap();
/// let second = GridBuilder::new(1, 1, palette).build(&[1]).unwrap();
///
/// let mut history = EditHistory::new();
/// history.commit(&first);
/// history.commit(&second);
///
/// assert_eq!(history.undo(), Some(first));
/// assert_eq!(history.redo(), Some(second));
/// assert_eq!(history.redo(), None);
/// ```
#[derive(Debug, Clone)]
pub struct EditHistory {
    snapshots: VecDeque<Grid>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Empty history keeping up to [`DEFAULT_HISTORY_LIMIT`] snapshots.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Empty history keeping up to `limit` snapshots (at least 1).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            snapshots: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            cursor: None,
            limit,
        }
    }

    /// Record a copy of `grid` as the newest snapshot.
    ///
    /// Snapshots after the cursor (the redo branch) are discarded first.
    pub fn commit(&mut self, grid: &Grid) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push_back(grid.clone());
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back one snapshot and return a copy of it.
    pub fn undo(&mut self) -> Option<Grid> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.snapshots.get(c - 1).cloned()
            }
            _ => None,
        }
    }

    /// Step forward one snapshot and return a copy of it.
    pub fn redo(&mut self) -> Option<Grid> {
        match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => {
                self.cursor = Some(c + 1);
                self.snapshots.get(c + 1).cloned()
            }
            _ => None,
        }
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&Grid> {
        self.cursor.and_then(|c| self.snapshots.get(c))
    }

    /// Position of the active snapshot, `None` when empty.
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of stored snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots kept.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.snapshots.len())
    }
}
