//! The bounded snapshot stack behind undo and redo.

use crate::PixelGrid;
use std::collections::VecDeque;

/// A bounded stack of grid snapshots with a cursor.
///
/// Always holds at least one snapshot, and `index < len <= limit`.
#[derive(Debug, Clone)]
pub(crate) struct History {
    /// The snapshots, oldest first.
    snapshots: VecDeque<PixelGrid>,
    /// The position of the current snapshot.
    index: usize,
    /// The maximum number of snapshots kept.
    limit: usize,
}

impl History {
    /// Creates a history holding only `initial`. A `limit` of zero is treated as one.
    pub fn new(initial: PixelGrid, limit: usize) -> Self {
        Self {
            snapshots: VecDeque::from([initial]),
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Drops every snapshot and starts over from `initial`.
    pub fn reset(&mut self, initial: PixelGrid) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.index = 0;
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &PixelGrid {
        &self.snapshots[self.index]
    }

    /// Discards any redo entries, appends `grid` and moves the cursor to it.
    ///
    /// The oldest snapshot is evicted once the limit is exceeded.
    pub fn push(&mut self, grid: PixelGrid) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(grid);
        if self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Moves the cursor back, returning the new current snapshot.
    pub fn undo(&mut self) -> Option<&PixelGrid> {
        if self.can_undo() {
            self.index -= 1;
            Some(self.current())
        } else {
            None
        }
    }

    /// Moves the cursor forward, returning the new current snapshot.
    pub fn redo(&mut self) -> Option<&PixelGrid> {
        if self.can_redo() {
            self.index += 1;
            Some(self.current())
        } else {
            None
        }
    }

    /// Whether there is an older snapshot.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether there is a newer snapshot.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// The position of the cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The maximum number of snapshots kept.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
