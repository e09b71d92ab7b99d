//! Shared numeric and style constants for the sketch editor.

use std::time::Duration;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 5.0;

/// Multiplicative scale change per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.05;

/// Multiplicative scale change for the zoom-in / zoom-out controls.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of scene snapshots retained for undo/redo.
pub const HISTORY_CAPACITY: usize = 50;

// ── Element defaults ────────────────────────────────────────────

/// Width of a freshly placed rectangle, in world units.
pub const DEFAULT_RECT_WIDTH: f64 = 100.0;

/// Height of a freshly placed rectangle, in world units.
pub const DEFAULT_RECT_HEIGHT: f64 = 80.0;

/// Translucent fill of a freshly placed rectangle.
pub const DEFAULT_RECT_FILL: &str = "rgba(66, 135, 245, 0.1)";

/// Outline color of a freshly placed rectangle.
pub const DEFAULT_RECT_STROKE: &str = "#4287f5";

/// Outline width of a freshly placed rectangle.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Font size of free text.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Color of free text.
pub const DEFAULT_TEXT_COLOR: &str = "#000";

/// Content of a text element that has never been edited.
pub const TEXT_PLACEHOLDER: &str = "Type here...";

/// Content written when an edit is confirmed with blank text.
pub const TEXT_FALLBACK: &str = "Text";

/// Hex alpha suffix appended to a picked color to derive the rectangle fill.
pub const FILL_ALPHA_SUFFIX: &str = "33";

// ── Measurements ────────────────────────────────────────────────

/// Font size of measurement labels.
pub const MEASUREMENT_FONT_SIZE: f64 = 14.0;

/// Color of measurement labels.
pub const MEASUREMENT_COLOR: &str = "#e03131";

/// Gap between a rectangle edge and a top/right/bottom label.
pub const MEASUREMENT_OFFSET: f64 = 20.0;

/// Gap between a rectangle's left edge and its label; wider because the
/// label is left-aligned and grows toward the rectangle.
pub const MEASUREMENT_LEFT_OFFSET: f64 = 40.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for transform handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Approximate glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Screen distance a pointer must travel before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

// ── Drafts ──────────────────────────────────────────────────────

/// Quiet period after the last scene change before a draft is written.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);
