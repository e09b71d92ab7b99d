//! Inline text editing overlay state.
//!
//! An `EditingSession` binds one text or measurement element to a draft
//! string and a screen position for the host's overlay. The engine owns at
//! most one session and is responsible for committing or discarding it.

#[cfg(test)]
#[path = "text_edit_test.rs"]
mod text_edit_test;

use crate::consts::{TEXT_FALLBACK, TEXT_PLACEHOLDER};
use crate::scene::{Element, ElementId, Scene};
use crate::viewport::{Point, Viewport};

/// The transient state of editing one text-bearing element.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingSession {
    /// Element whose text is being edited. Hidden from normal rendering.
    pub element_id: ElementId,
    /// Screen-space position of the overlay's top-left corner.
    pub screen: Point,
    /// Live, unconfirmed text.
    pub draft: String,
}

impl EditingSession {
    /// Open a session for `el`, or `None` if it carries no text.
    ///
    /// The untouched placeholder is presented as an empty draft.
    #[must_use]
    pub fn open(el: &Element, viewport: &Viewport) -> Option<Self> {
        let text = el.as_text()?;
        let draft = if text.text == TEXT_PLACEHOLDER { String::new() } else { text.text.clone() };
        Some(Self { element_id: el.id.clone(), screen: viewport.to_screen(el.position()), draft })
    }

    /// Replace the live draft.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Text to write on confirm: the trimmed draft, or the fallback label
    /// when nothing but whitespace was typed.
    #[must_use]
    pub fn resolved_text(&self) -> String {
        let trimmed = self.draft.trim();
        if trimmed.is_empty() { TEXT_FALLBACK.to_owned() } else { trimmed.to_owned() }
    }

    /// Recompute the overlay position after the element or viewport moved.
    pub fn reproject(&mut self, scene: &Scene, viewport: &Viewport) {
        if let Some(el) = scene.get(&self.element_id) {
            self.screen = viewport.to_screen(el.position());
        }
    }
}
