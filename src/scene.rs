//! Scene model: sketch elements, sparse patches, and the immutable scene.
//!
//! This module defines what is on the canvas (`Element`, `Shape`), a sparse
//! update type for edits (`ElementPatch`), and the ordered collection that
//! the history snapshots (`Scene`).
//!
//! A `Scene` is never mutated in place. `create_element`, `update_element`,
//! and `delete_elements` each return a fresh scene, which the engine then
//! commits to history. Insertion order is paint order: later elements draw
//! on top.
//!
//! The serde shape is the persisted wire format: a JSON array of flat
//! records tagged by `type`, with camelCase style keys.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_FONT_SIZE, DEFAULT_RECT_FILL, DEFAULT_RECT_HEIGHT, DEFAULT_RECT_STROKE, DEFAULT_RECT_WIDTH,
    DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_COLOR, MEASUREMENT_COLOR, MEASUREMENT_FONT_SIZE, TEXT_PLACEHOLDER,
};
use crate::viewport::Point;

/// Opaque identifier of an element, stable for the element's lifetime.
///
/// Ids loaded from storage are kept verbatim; fresh ids are `<kind>-<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh identifier for an element of `kind`.
    #[must_use]
    pub fn generate(kind: ElementKind) -> Self {
        Self(format!("{}-{}", kind.as_str(), Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The discriminant of an element's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Text,
    Measurement,
}

impl ElementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Text => "text",
            Self::Measurement => "measurement",
        }
    }

    /// Whether elements of this kind carry editable text.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::Measurement)
    }
}

/// Geometry and style of a rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectShape {
    /// Width in world units, never negative.
    pub width: f64,
    /// Height in world units, never negative.
    pub height: f64,
    /// Fill color as a CSS color string.
    #[serde(default = "default_rect_fill")]
    pub fill: String,
    /// Outline color as a CSS color string.
    #[serde(default = "default_rect_stroke")]
    pub stroke: String,
    /// Outline width in world units.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

/// Content and style of a text or measurement label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Glyph color. Stored under `fill` on the wire.
    #[serde(rename = "fill", default = "default_text_color")]
    pub color: String,
}

fn default_rect_fill() -> String {
    DEFAULT_RECT_FILL.to_owned()
}

fn default_rect_stroke() -> String {
    DEFAULT_RECT_STROKE.to_owned()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(RectShape),
    Text(TextShape),
    /// A text label carrying a user-entered dimension string.
    Measurement(TextShape),
}

/// A single drawable unit of the sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner for rectangles; anchor origin for text.
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Element {
    /// A default-sized rectangle with its top-left corner at `at`.
    #[must_use]
    pub fn rectangle(at: Point) -> Self {
        Self {
            id: ElementId::generate(ElementKind::Rectangle),
            x: at.x,
            y: at.y,
            shape: Shape::Rectangle(RectShape {
                width: DEFAULT_RECT_WIDTH,
                height: DEFAULT_RECT_HEIGHT,
                fill: default_rect_fill(),
                stroke: default_rect_stroke(),
                stroke_width: DEFAULT_STROKE_WIDTH,
            }),
        }
    }

    /// A free text element holding the placeholder content.
    #[must_use]
    pub fn text(at: Point) -> Self {
        Self {
            id: ElementId::generate(ElementKind::Text),
            x: at.x,
            y: at.y,
            shape: Shape::Text(TextShape {
                text: TEXT_PLACEHOLDER.to_owned(),
                font_size: DEFAULT_FONT_SIZE,
                color: default_text_color(),
            }),
        }
    }

    /// A measurement label reading `value`.
    #[must_use]
    pub fn measurement(at: Point, value: impl Into<String>) -> Self {
        Self {
            id: ElementId::generate(ElementKind::Measurement),
            x: at.x,
            y: at.y,
            shape: Shape::Measurement(TextShape {
                text: value.into(),
                font_size: MEASUREMENT_FONT_SIZE,
                color: MEASUREMENT_COLOR.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self.shape {
            Shape::Rectangle(_) => ElementKind::Rectangle,
            Shape::Text(_) => ElementKind::Text,
            Shape::Measurement(_) => ElementKind::Measurement,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rectangle payload, if this is a rectangle.
    #[must_use]
    pub fn as_rect(&self) -> Option<&RectShape> {
        match &self.shape {
            Shape::Rectangle(rect) => Some(rect),
            _ => None,
        }
    }

    /// Text payload, if this is a text or measurement.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextShape> {
        match &self.shape {
            Shape::Text(text) | Shape::Measurement(text) => Some(text),
            Shape::Rectangle(_) => None,
        }
    }

    /// Apply the fields of `patch` that are meaningful for this kind.
    /// Returns `true` if anything changed.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        match &mut self.shape {
            Shape::Rectangle(rect) => {
                if let Some(w) = patch.width {
                    rect.width = w.max(0.0);
                }
                if let Some(h) = patch.height {
                    rect.height = h.max(0.0);
                }
                if let Some(fill) = &patch.fill {
                    rect.fill.clone_from(fill);
                }
                if let Some(stroke) = &patch.stroke {
                    rect.stroke.clone_from(stroke);
                }
                if let Some(sw) = patch.stroke_width {
                    rect.stroke_width = sw;
                }
            }
            Shape::Text(text) | Shape::Measurement(text) => {
                if let Some(content) = &patch.text {
                    text.text.clone_from(content);
                }
                if let Some(size) = patch.font_size {
                    text.font_size = size;
                }
                if let Some(color) = &patch.text_color {
                    text.color.clone_from(color);
                }
            }
        }
        *self != before
    }

    fn normalize(&mut self) {
        if let Shape::Rectangle(rect) = &mut self.shape {
            rect.width = rect.width.max(0.0);
            rect.height = rect.height.max(0.0);
        }
    }
}

/// Sparse update for an element. Only present fields are applied, and only
/// where they make sense for the element's kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub text_color: Option<String>,
}

impl ElementPatch {
    /// A patch that moves an element.
    #[must_use]
    pub fn position(at: Point) -> Self {
        Self { x: Some(at.x), y: Some(at.y), ..Self::default() }
    }

    /// A patch that replaces a text element's content.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self { text: Some(content.into()), ..Self::default() }
    }
}

/// Ordered, id-unique collection of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scene {
    elements: Vec<Element>,
}

impl<'de> Deserialize<'de> for Scene {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Element>::deserialize(deserializer).map(Scene::from_elements)
    }
}

impl Scene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from arbitrary elements. Later duplicates of an id are
    /// dropped and negative rectangle sizes are clamped to zero.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut seen = HashSet::new();
        let elements = elements
            .into_iter()
            .filter(|el| seen.insert(el.id.clone()))
            .map(|mut el| {
                el.normalize();
                el
            })
            .collect();
        Self { elements }
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `element` on top. An element with the same id is replaced in
    /// place instead, keeping ids unique.
    #[must_use]
    pub fn create_element(&self, element: Element) -> (Scene, ElementId) {
        let id = element.id.clone();
        let mut elements = self.elements.clone();
        match elements.iter_mut().find(|el| el.id == id) {
            Some(slot) => *slot = element,
            None => elements.push(element),
        }
        let mut scene = Scene { elements };
        if let Some(el) = scene.elements.iter_mut().find(|el| el.id == id) {
            el.normalize();
        }
        (scene, id)
    }

    /// Apply `patch` to the element `id`. Unknown ids leave the scene as is.
    #[must_use]
    pub fn update_element(&self, id: &ElementId, patch: &ElementPatch) -> Scene {
        let mut scene = self.clone();
        if let Some(el) = scene.elements.iter_mut().find(|el| &el.id == id) {
            el.apply(patch);
        }
        scene
    }

    /// Drop every element whose id is in `ids`.
    #[must_use]
    pub fn delete_elements(&self, ids: &[ElementId]) -> Scene {
        let doomed: HashSet<&ElementId> = ids.iter().collect();
        Scene { elements: self.elements.iter().filter(|el| !doomed.contains(&el.id)).cloned().collect() }
    }

    /// First rectangle in paint order.
    #[must_use]
    pub fn first_rectangle(&self) -> Option<&Element> {
        self.elements.iter().find(|el| el.kind() == ElementKind::Rectangle)
    }

    /// Serialize to the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error; with string-keyed records
    /// and finite numbers this does not occur in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error for malformed or foreign-shaped input.
    pub fn from_json(raw: &str) -> Result<Scene, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
