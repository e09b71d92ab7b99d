//! Selection set and the contextual affordances it unlocks.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::scene::{ElementId, ElementKind, Scene};

/// Ordered set of selected element ids. The most recently added id is the
/// primary selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

/// What the UI may offer for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Nothing selected: no handles, canvas drag pans.
    None,
    /// One element selected: handles for rectangles plus per-element actions.
    Single {
        kind: ElementKind,
        /// Measurement labels can be attached.
        can_measure: bool,
        /// Fill/stroke color can be changed.
        can_recolor: bool,
    },
    /// Several elements selected: bulk delete only.
    Multiple { count: usize },
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// The selected id when exactly one element is selected.
    #[must_use]
    pub fn single(&self) -> Option<&ElementId> {
        match self.ids.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Replace the selection with `id`. Returns `true` if it changed.
    pub fn replace(&mut self, id: ElementId) -> bool {
        if self.ids.len() == 1 && self.ids[0] == id {
            return false;
        }
        self.ids.clear();
        self.ids.push(id);
        true
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|sel| *sel == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Deselect everything. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        had_any
    }

    /// Drop ids that no longer exist in `scene`. Returns `true` if any were dropped.
    pub fn prune(&mut self, scene: &Scene) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| scene.contains(id));
        self.ids.len() != before
    }

    /// Contextual affordance for this selection against `scene`.
    #[must_use]
    pub fn affordance(&self, scene: &Scene) -> Affordance {
        match self.ids.len() {
            0 => Affordance::None,
            1 => {
                let Some(el) = self.single().and_then(|id| scene.get(id)) else {
                    return Affordance::None;
                };
                let kind = el.kind();
                let is_rect = kind == ElementKind::Rectangle;
                Affordance::Single { kind, can_measure: is_rect, can_recolor: is_rect }
            }
            count => Affordance::Multiple { count },
        }
    }
}
