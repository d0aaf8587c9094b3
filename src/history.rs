use std::collections::VecDeque;

use image::RgbaImage;

/// Maximum number of snapshots kept, the initial state included.
pub const HISTORY_LIMIT: usize = 11;

/// Bounded stack of full-buffer snapshots backing undo.
///
/// The top entry always matches the buffer as it stood after the last
/// settled operation. The oldest entry is dropped once the limit is hit.
pub struct SnapshotHistory {
    snapshots: VecDeque<RgbaImage>,
    limit: usize,
}

impl std::fmt::Debug for SnapshotHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHistory")
            .field("depth", &self.snapshots.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHistory {
    /// Creates an empty history holding up to [`HISTORY_LIMIT`] snapshots
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit.max(1)),
            limit: limit.max(1),
        }
    }

    /// Drop everything and start over from `initial`
    pub fn reset(&mut self, initial: &RgbaImage) {
        self.snapshots.clear();
        self.snapshots.push_back(initial.clone());
    }

    /// Record the buffer after a settled operation
    pub fn snapshot(&mut self, buffer: &RgbaImage) {
        self.snapshots.push_back(buffer.clone());
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
    }

    /// Discard the top snapshot and return the one beneath it.
    ///
    /// The bottom entry is never removed; with one or fewer entries this is a no-op.
    pub fn undo(&mut self) -> Option<&RgbaImage> {
        if !self.can_undo() {
            return None;
        }
        self.snapshots.pop_back();
        self.snapshots.back()
    }

    pub fn can_undo(&self) -> bool {
        self.snapshots.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }
}
