//! Linear undo/redo history of scene snapshots.

use crate::scene::Scene;

/// Append-only log of scene snapshots with a cursor.
///
/// The snapshot at the cursor is the scene currently shown. Committing after
/// an undo truncates everything past the cursor, so the redo branch is
/// discarded rather than kept as a tree.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Scene>,
    cursor: usize,
    /// Maximum number of snapshots kept. `None` is unbounded.
    max_depth: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// History holding a single empty snapshot.
    pub fn new() -> Self {
        Self::with_initial(Scene::new(), None)
    }

    /// History starting from `initial`, optionally capped at `max_depth` snapshots.
    pub fn with_initial(initial: Scene, max_depth: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_depth: max_depth.map(|d| d.max(1)),
        }
    }

    /// Record `scene` as the newest snapshot.
    ///
    /// Snapshots after the cursor are dropped first. When a depth cap is set
    /// the oldest snapshots are evicted to stay within it.
    pub fn commit(&mut self, scene: &Scene) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(scene.clone());
        self.cursor = self.snapshots.len() - 1;

        if let Some(max) = self.max_depth {
            if self.snapshots.len() > max {
                let excess = self.snapshots.len() - max;
                self.snapshots.drain(..excess);
                self.cursor -= excess;
            }
        }
        log::debug!(
            "history commit: {} snapshots, cursor {}",
            self.snapshots.len(),
            self.cursor
        );
    }

    /// Step back one snapshot. Returns the newly current scene, or `None` at the bottom.
    pub fn undo(&mut self) -> Option<&Scene> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Returns the newly current scene, or `None` at the top.
    pub fn redo(&mut self) -> Option<&Scene> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &Scene {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: history holds at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
