//! Snapshot-based undo/redo over whole scenes.
//!
//! The history is a bounded list of `Scene` snapshots plus a cursor. The
//! snapshot under the cursor is always the scene on screen. Committing while
//! the cursor is behind the end drops the redo branch first.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::consts::HISTORY_CAPACITY;
use crate::scene::Scene;

/// Linear undo/redo history of scene snapshots.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Scene>,
    step: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Scene::new())
    }
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: Scene) -> Self {
        Self::with_capacity(initial, HISTORY_CAPACITY)
    }

    /// Start a history holding at most `capacity` snapshots (minimum 1).
    #[must_use]
    pub fn with_capacity(initial: Scene, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(1));
        entries.push_back(initial);
        Self { entries, step: 0, capacity: capacity.max(1) }
    }

    /// The scene currently on screen.
    #[must_use]
    pub fn current(&self) -> &Scene {
        // `entries` is never empty and `step` always indexes it.
        &self.entries[self.step]
    }

    /// Record `scene` as the new current state.
    pub fn commit(&mut self, scene: Scene) {
        self.entries.truncate(self.step + 1);
        self.entries.push_back(scene);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.step = self.entries.len() - 1;
        debug!(step = self.step, len = self.entries.len(), "history commit");
    }

    /// Step back one snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        debug!(step = self.step, "history undo");
        true
    }

    /// Step forward one snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.step + 1 >= self.entries.len() {
            return false;
        }
        self.step += 1;
        debug!(step = self.step, "history redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len()
    }

    /// Index of the current snapshot.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never `true` in practice: `new` and `reset` seed one snapshot and
    /// eviction only runs past capacity, which is at least 1.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every snapshot and start over from `initial`.
    pub fn reset(&mut self, initial: Scene) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.step = 0;
    }
}
