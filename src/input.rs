//! Input model: tools, modifier keys, the normalized event stream, and the
//! gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputEvent` is the single stream the host feeds to the engine.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to preview the gesture and to
//! commit exactly one history entry on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::hit::ResizeAnchor;
use crate::scene::ElementId;
use crate::viewport::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a rectangle on the next empty-canvas press.
    CreateRectangle,
    /// Place a text element on the next empty-canvas press.
    CreateText,
}

impl Tool {
    /// Whether this tool places a new element.
    #[must_use]
    pub fn is_create(self) -> bool {
        matches!(self, Self::CreateRectangle | Self::CreateText)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Command: the platform command accelerator.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// Any key that turns a click into a selection toggle.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g.
/// `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// Normalized input event consumed by [`crate::engine::Engine::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { screen: Point, button: Button, modifiers: Modifiers },
    PointerMove { screen: Point, modifiers: Modifiers },
    PointerUp { screen: Point, button: Button, modifiers: Modifiers },
    /// Double click or double tap.
    DoubleClick { screen: Point },
    Wheel { screen: Point, delta: WheelDelta, modifiers: Modifiers },
    /// Current distance between two active touch points.
    PinchUpdate { distance: f64 },
    /// Fewer than two touch points remain.
    PinchEnd,
    KeyDown { key: Key, modifiers: Modifiers },
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to preview the
/// gesture and emit a single commit on pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is dragging empty canvas with nothing selected.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
        /// Set once the pointer has actually moved. The pointer-up that ends a
        /// moved pan is not treated as a canvas click.
        moved: bool,
    },
    /// The user pressed on a selected element and may be moving the selection.
    DraggingElements {
        /// Ids of the elements that follow the pointer.
        ids: Vec<ElementId>,
        /// Screen-space position at pointer-down, used for the drag threshold.
        start_screen: Point,
        /// World-space position at pointer-down.
        start_world: Point,
        /// World-space translation applied so far.
        delta: Point,
        /// Whether the pointer has passed the drag threshold.
        moved: bool,
        /// Element to select alone if the press ends without moving.
        collapse_to: Option<ElementId>,
    },
    /// The user is dragging one of the eight transform handles of a rectangle.
    ResizingElement {
        /// Id of the rectangle being resized.
        id: ElementId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// World-space pointer position at the start of the resize.
        start_world: Point,
        /// Rectangle x at the start of the resize.
        orig_x: f64,
        /// Rectangle y at the start of the resize.
        orig_y: f64,
        /// Rectangle width at the start of the resize.
        orig_w: f64,
        /// Rectangle height at the start of the resize.
        orig_h: f64,
        /// Live horizontal scale factor relative to `orig_w`.
        scale_x: f64,
        /// Live vertical scale factor relative to `orig_h`.
        scale_y: f64,
    },
    /// Two fingers are on the surface.
    Pinching {
        /// Finger distance at the previous update.
        last_distance: f64,
    },
}
