//! Interaction state machine for one open sketch.
//!
//! `Engine` owns the scene history, viewport, selection, tool mode, the
//! in-flight gesture, the inline text session, and any pending measurement.
//! The host feeds it normalized [`InputEvent`]s (or calls the explicit
//! toolbar operations) and reacts to the returned [`Action`]s.
//!
//! Gesture disambiguation lives here: a press on a handle resizes, a press on
//! a selected body drags, a press on empty canvas creates (create tools),
//! pans (nothing selected), or deselects. Transient gesture geometry is kept
//! in [`InputState`] and only committed to history on release, so one drag or
//! resize is one history entry.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::consts::{DRAG_THRESHOLD_PX, FILL_ALPHA_SUFFIX, WHEEL_ZOOM_FACTOR};
use crate::hit::{self, HitPart, ResizeAnchor};
use crate::history::History;
use crate::input::{Button, InputEvent, InputState, Key, Modifiers, Tool, WheelDelta};
use crate::measure::{self, MeasurementError, PendingMeasurement, Side};
use crate::scene::{Element, ElementId, ElementKind, ElementPatch, Scene};
use crate::selection::{Affordance, Selection};
use crate::text_edit::EditingSession;
use crate::viewport::{Point, Viewport};

/// Smallest width or height a handle drag can produce, in world units.
const MIN_RESIZE_SIZE: f64 = 1.0;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The displayed scene changed (commit, undo, or redo). Drives draft autosave.
    SceneChanged,
    /// A new element was placed.
    ElementCreated(ElementId),
    /// Show the inline editor overlay.
    EditTextStarted { id: ElementId, screen: Point, text: String },
    /// Hide the inline editor overlay.
    EditTextEnded,
    /// Change the pointer cursor (CSS cursor name).
    SetCursor(String),
    /// Something visible changed.
    RenderNeeded,
}

/// Editor state for a single sketch.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    history: History,
    viewport: Viewport,
    selection: Selection,
    tool: Tool,
    input: InputState,
    editing: Option<EditingSession>,
    measurement: Option<PendingMeasurement>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `scene` with a fresh history.
    #[must_use]
    pub fn with_scene(scene: Scene) -> Self {
        Self { history: History::new(scene), ..Self::default() }
    }

    // --- Queries ---

    /// The scene currently on screen.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The gesture currently being tracked.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The open inline text session, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&EditingSession> {
        self.editing.as_ref()
    }

    /// The measurement flow waiting for a value, if any.
    #[must_use]
    pub fn pending_measurement(&self) -> Option<&PendingMeasurement> {
        self.measurement.as_ref()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Contextual controls for the current selection.
    #[must_use]
    pub fn affordance(&self) -> Affordance {
        self.selection.affordance(self.scene())
    }

    /// CSS cursor for the current tool and gesture.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        if matches!(self.input, InputState::Panning { .. }) {
            "grabbing"
        } else if self.tool.is_create() {
            "crosshair"
        } else if self.selection.is_empty() {
            "grab"
        } else {
            "move"
        }
    }

    /// Elements to paint, in order, with any in-flight drag or resize applied
    /// and the element under inline edit left out.
    #[must_use]
    pub fn visible_elements(&self) -> Vec<Element> {
        let hidden = self.editing.as_ref().map(|s| &s.element_id);
        self.scene()
            .iter()
            .filter(|el| Some(&el.id) != hidden)
            .map(|el| {
                let mut el = el.clone();
                if let Some(patch) = self.preview_patch(&el.id) {
                    el.apply(&patch);
                }
                el
            })
            .collect()
    }

    /// Screen-space transform handles for a single selected rectangle.
    #[must_use]
    pub fn handles(&self) -> Vec<(ResizeAnchor, Point)> {
        let Some(id) = self.selection.single() else {
            return Vec::new();
        };
        let Some(el) = self.visible_elements().into_iter().find(|el| &el.id == id) else {
            return Vec::new();
        };
        hit::handles(&el, &self.viewport)
    }

    // --- Scene lifecycle ---

    /// Replace the scene wholesale (load / new sketch): history restarts,
    /// transient state is dropped, and the view is recentered.
    pub fn load_scene(&mut self, scene: Scene) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.editing.take().is_some() {
            actions.push(Action::EditTextEnded);
        }
        self.history.reset(scene);
        self.selection.clear();
        self.measurement = None;
        self.input = InputState::Idle;
        self.tool = Tool::Select;
        self.reset_view();
        debug!(len = self.scene().len(), "scene loaded");
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record the size of the rendering surface.
    pub fn set_surface(&mut self, width: f64, height: f64) {
        self.viewport.set_surface(width, height);
    }

    // --- Tool ---

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if self.tool == tool {
            return Vec::new();
        }
        self.tool = tool;
        vec![Action::SetCursor(self.cursor().to_owned())]
    }

    // --- Event stream ---

    /// Route one normalized input event.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { screen, button, modifiers } => self.on_pointer_down(screen, button, modifiers),
            InputEvent::PointerMove { screen, modifiers } => self.on_pointer_move(screen, modifiers),
            InputEvent::PointerUp { screen, button, modifiers } => self.on_pointer_up(screen, button, modifiers),
            InputEvent::DoubleClick { screen } => self.on_double_click(screen),
            InputEvent::Wheel { screen, delta, modifiers } => self.on_wheel(screen, delta, modifiers),
            InputEvent::PinchUpdate { distance } => self.on_pinch(distance),
            InputEvent::PinchEnd => self.on_pinch_end(),
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
        }
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        let world = self.viewport.to_world(screen);
        let handle_target = if self.tool == Tool::Select { self.selection.single() } else { None };
        let hidden = self.editing.as_ref().map(|s| &s.element_id);
        let hit = hit::hit_test(world, self.scene(), &self.viewport, handle_target, hidden);

        match (self.tool, hit) {
            (_, Some(hit)) => {
                if let HitPart::ResizeHandle(anchor) = hit.part {
                    return self.begin_resize(hit.element_id, anchor, world);
                }
                self.press_element(hit.element_id, screen, world, modifiers)
            }
            (Tool::CreateRectangle, None) => self.place(Element::rectangle(world)),
            (Tool::CreateText, None) => {
                let el = Element::text(world);
                let id = el.id.clone();
                let mut actions = self.place(el);
                actions.extend(self.start_editing(&id));
                actions
            }
            (Tool::Select, None) => {
                if self.selection.clear() {
                    debug!("selection cleared by empty-canvas press");
                    return vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded];
                }
                self.input = InputState::Panning { last_screen: screen, moved: false };
                vec![Action::SetCursor(self.cursor().to_owned())]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.to_world(screen);
        match &mut self.input {
            InputState::Idle | InputState::Pinching { .. } => Vec::new(),
            InputState::Panning { last_screen, moved } => {
                let (dx, dy) = (screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                *moved = true;
                self.viewport.pan_by(dx, dy);
                self.reproject_editing();
                vec![Action::RenderNeeded]
            }
            InputState::DraggingElements { start_screen, start_world, delta, moved, .. } => {
                if !*moved && screen.distance(*start_screen) < DRAG_THRESHOLD_PX {
                    return Vec::new();
                }
                *moved = true;
                *delta = Point::new(world.x - start_world.x, world.y - start_world.y);
                vec![Action::RenderNeeded]
            }
            InputState::ResizingElement { anchor, start_world, orig_w, orig_h, scale_x, scale_y, .. } => {
                let dx = (world.x - start_world.x) * anchor.x_sign();
                let dy = (world.y - start_world.y) * anchor.y_sign();
                *scale_x = resize_scale(*orig_w, dx);
                *scale_y = resize_scale(*orig_h, dy);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Pinching { last_distance } => {
                self.input = InputState::Pinching { last_distance };
                Vec::new()
            }
            InputState::Panning { moved, .. } => {
                // A moved pan ends with a release that is not a canvas click.
                debug!(moved, "pan finished");
                vec![Action::SetCursor(self.cursor().to_owned())]
            }
            InputState::DraggingElements { ids, delta, moved, collapse_to, .. } => {
                if !moved || (delta.x == 0.0 && delta.y == 0.0) {
                    let Some(id) = collapse_to else {
                        return Vec::new();
                    };
                    self.selection.replace(id);
                    return vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded];
                }
                let mut scene = self.scene().clone();
                for id in &ids {
                    if let Some(el) = scene.get(id) {
                        let at = Point::new(el.x + delta.x, el.y + delta.y);
                        scene = scene.update_element(id, &ElementPatch::position(at));
                    }
                }
                if &scene == self.scene() {
                    return Vec::new();
                }
                debug!(count = ids.len(), dx = delta.x, dy = delta.y, "drag committed");
                self.commit(scene)
            }
            state @ InputState::ResizingElement { .. } => {
                let InputState::ResizingElement { id, .. } = &state else {
                    return Vec::new();
                };
                let Some(patch) = resize_patch(&state) else {
                    return Vec::new();
                };
                let scene = self.scene().update_element(id, &patch);
                if &scene == self.scene() {
                    return Vec::new();
                }
                debug!(id = %id, "resize committed");
                self.commit(scene)
            }
        }
    }

    /// Double click or tap: open the inline editor on a text element.
    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        if self.editing.is_some() {
            return Vec::new();
        }
        let world = self.viewport.to_world(screen);
        let Some(hit) = hit::hit_test(world, self.scene(), &self.viewport, None, None) else {
            return Vec::new();
        };
        let is_text = self.scene().get(&hit.element_id).is_some_and(|el| el.kind().is_text());
        if !is_text {
            return Vec::new();
        }
        self.input = InputState::Idle;
        self.start_editing(&hit.element_id)
    }

    /// Zoom around the pointer. Scrolling down zooms out.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        let factor = if delta.dy > 0.0 { 1.0 / WHEEL_ZOOM_FACTOR } else { WHEEL_ZOOM_FACTOR };
        self.viewport.zoom_at(screen, factor);
        self.reproject_editing();
        vec![Action::RenderNeeded]
    }

    /// Two-finger distance update. The first update abandons any
    /// single-pointer gesture and records the starting distance.
    pub fn on_pinch(&mut self, distance: f64) -> Vec<Action> {
        if !distance.is_finite() || distance <= 0.0 {
            return Vec::new();
        }
        if let InputState::Pinching { last_distance } = &mut self.input {
            let ratio = distance / *last_distance;
            *last_distance = distance;
            self.viewport.zoom_pinch(ratio);
            self.reproject_editing();
            return vec![Action::RenderNeeded];
        }
        let had_gesture = !matches!(self.input, InputState::Idle);
        self.input = InputState::Pinching { last_distance: distance };
        if had_gesture { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn on_pinch_end(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Pinching { .. }) {
            self.input = InputState::Idle;
        }
        Vec::new()
    }

    /// Keyboard accelerators. While the inline editor is open only Escape is
    /// interpreted; everything else belongs to the overlay.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.editing.is_some() {
            return if key.is("Escape") { self.cancel_editing() } else { Vec::new() };
        }
        if modifiers.command() && key.is("z") && !modifiers.shift {
            return self.undo();
        }
        if modifiers.command() && (key.is("y") || (modifiers.shift && key.is("z"))) {
            return self.redo();
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selection();
        }
        if key.is("Escape") {
            if self.measurement.take().is_some() {
                return vec![Action::RenderNeeded];
            }
            if self.selection.clear() {
                return vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded];
            }
        }
        Vec::new()
    }

    // --- History ---

    /// Step back one snapshot. Drops any unconfirmed gesture or text edit.
    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.abandon_transients();
        if self.history.undo() {
            actions.extend(self.after_scene_change());
        }
        actions
    }

    /// Step forward one snapshot. Drops any unconfirmed gesture or text edit.
    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.abandon_transients();
        if self.history.redo() {
            actions.extend(self.after_scene_change());
        }
        actions
    }

    // --- Toolbar operations ---

    /// Remove every selected element.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        // A drag or resize in flight would otherwise commit against deleted ids.
        if matches!(self.input, InputState::DraggingElements { .. } | InputState::ResizingElement { .. }) {
            self.input = InputState::Idle;
        }
        let scene = self.scene().delete_elements(self.selection.ids());
        debug!(count = self.selection.len(), "deleting selection");
        let mut actions = self.commit(scene);
        self.selection.clear();
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions
    }

    /// Recolor the single selected rectangle: `color` becomes the stroke and a
    /// translucent variant becomes the fill.
    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        let Some(id) = self.selection.single().cloned() else {
            return Vec::new();
        };
        if self.scene().get(&id).is_none_or(|el| el.kind() != ElementKind::Rectangle) {
            return Vec::new();
        }
        let (fill, stroke) = fill_and_stroke(color);
        let patch = ElementPatch { fill: Some(fill), stroke: Some(stroke), ..ElementPatch::default() };
        let scene = self.scene().update_element(&id, &patch);
        if &scene == self.scene() {
            return Vec::new();
        }
        self.commit(scene)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.viewport.zoom_in();
        self.reproject_editing();
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.viewport.zoom_out();
        self.reproject_editing();
        vec![Action::RenderNeeded]
    }

    /// Scale back to 1 and center on the first rectangle, else the first
    /// element, else a comfortable default.
    pub fn reset_view(&mut self) -> Vec<Action> {
        let scene = self.scene();
        let focus = scene
            .first_rectangle()
            .map(|rect| hit::element_bounds(rect).center())
            .or_else(|| scene.elements().first().map(Element::position));
        self.viewport.reset_and_center(focus);
        self.reproject_editing();
        vec![Action::RenderNeeded]
    }

    // --- Inline text editing ---

    /// Open the inline editor on a text or measurement element. An already
    /// open session is confirmed first.
    pub fn start_editing(&mut self, id: &ElementId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.editing.as_ref().is_some_and(|s| &s.element_id == id) {
            return actions;
        }
        if self.editing.is_some() {
            actions.extend(self.confirm_editing());
        }
        let Some(session) = self.scene().get(id).and_then(|el| EditingSession::open(el, &self.viewport)) else {
            return actions;
        };
        debug!(id = %id, "text edit started");
        actions.push(Action::EditTextStarted { id: id.clone(), screen: session.screen, text: session.draft.clone() });
        actions.push(Action::RenderNeeded);
        self.editing = Some(session);
        actions
    }

    /// Update the live draft. Nothing is committed.
    pub fn set_editing_draft(&mut self, draft: impl Into<String>) {
        if let Some(session) = &mut self.editing {
            session.set_draft(draft);
        }
    }

    /// Write the trimmed draft (or the fallback label) and close the session.
    pub fn confirm_editing(&mut self) -> Vec<Action> {
        let Some(session) = self.editing.take() else {
            return Vec::new();
        };
        let mut actions = vec![Action::EditTextEnded];
        let scene = self.scene().update_element(&session.element_id, &ElementPatch::text(session.resolved_text()));
        if &scene == self.scene() {
            actions.push(Action::RenderNeeded);
        } else {
            debug!(id = %session.element_id, "text edit confirmed");
            actions.extend(self.commit(scene));
        }
        actions
    }

    /// Discard the draft and close the session without touching the scene.
    pub fn cancel_editing(&mut self) -> Vec<Action> {
        if self.editing.take().is_none() {
            return Vec::new();
        }
        vec![Action::EditTextEnded, Action::RenderNeeded]
    }

    // --- Measurement flow ---

    /// Start attaching a measurement to `side` of the single selected rectangle.
    ///
    /// # Errors
    ///
    /// [`MeasurementError::NotARectangle`] unless exactly one rectangle is
    /// selected, [`MeasurementError::Degenerate`] if it has no area.
    pub fn begin_measurement(&mut self, side: Side) -> Result<(), MeasurementError> {
        let el = self.selection.single().and_then(|id| self.scene().get(id)).ok_or(MeasurementError::NotARectangle)?;
        let rect = el.as_rect().ok_or(MeasurementError::NotARectangle)?;
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(MeasurementError::Degenerate(el.id.clone()));
        }
        self.measurement = Some(PendingMeasurement { rect_id: el.id.clone(), side });
        Ok(())
    }

    /// Place the pending measurement with the literal `value`.
    ///
    /// # Errors
    ///
    /// [`MeasurementError::NotStarted`] without a pending flow,
    /// [`MeasurementError::EmptyValue`] for blank input (the flow stays open),
    /// [`MeasurementError::RectangleGone`] if the rectangle was removed (the
    /// flow is closed).
    pub fn confirm_measurement(&mut self, value: &str) -> Result<Vec<Action>, MeasurementError> {
        let pending = self.measurement.clone().ok_or(MeasurementError::NotStarted)?;
        let Some(rect) = self.scene().get(&pending.rect_id) else {
            self.measurement = None;
            return Err(MeasurementError::RectangleGone(pending.rect_id));
        };
        let label = measure::build(rect, pending.side, value)?;
        self.measurement = None;
        debug!(rect = %pending.rect_id, side = ?pending.side, "measurement added");
        Ok(self.place_keeping_tool(label))
    }

    /// Drop the pending measurement without touching the scene.
    pub fn cancel_measurement(&mut self) {
        self.measurement = None;
    }

    // --- Internals ---

    fn commit(&mut self, scene: Scene) -> Vec<Action> {
        self.history.commit(scene);
        self.after_scene_change()
    }

    /// Keep selection and the text session consistent with the displayed scene.
    fn after_scene_change(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::SceneChanged];
        self.selection.prune(self.history.current());
        let session_orphaned =
            self.editing.as_ref().is_some_and(|s| !self.history.current().contains(&s.element_id));
        if session_orphaned {
            self.editing = None;
            actions.push(Action::EditTextEnded);
        }
        self.reproject_editing();
        actions.push(Action::RenderNeeded);
        actions
    }

    fn abandon_transients(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.editing.take().is_some() {
            actions.push(Action::EditTextEnded);
        }
        if !matches!(self.input, InputState::Idle) {
            self.input = InputState::Idle;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Place a new element and return to the select tool.
    fn place(&mut self, el: Element) -> Vec<Action> {
        let mut actions = self.place_keeping_tool(el);
        self.tool = Tool::Select;
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions
    }

    fn place_keeping_tool(&mut self, el: Element) -> Vec<Action> {
        let (scene, id) = self.scene().create_element(el);
        debug!(id = %id, "element created");
        let mut actions = vec![Action::ElementCreated(id)];
        actions.extend(self.commit(scene));
        actions
    }

    fn press_element(&mut self, id: ElementId, screen: Point, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = vec![Action::RenderNeeded];
        let mut collapse = false;
        if modifiers.multi_select() {
            self.selection.toggle(id.clone());
        } else if !self.selection.contains(&id) {
            self.selection.replace(id.clone());
        } else {
            // Pressing a member of a multi-selection without a modifier keeps
            // the group for dragging; a plain click collapses it on release.
            collapse = self.selection.len() > 1;
        }
        actions.push(Action::SetCursor(self.cursor().to_owned()));

        if self.tool == Tool::Select && self.selection.contains(&id) {
            self.input = InputState::DraggingElements {
                ids: self.selection.ids().to_vec(),
                start_screen: screen,
                start_world: world,
                delta: Point::default(),
                moved: false,
                collapse_to: collapse.then_some(id),
            };
        }
        actions
    }

    fn begin_resize(&mut self, id: ElementId, anchor: ResizeAnchor, world: Point) -> Vec<Action> {
        let Some((el, rect)) = self.scene().get(&id).and_then(|el| el.as_rect().map(|r| (el, r))) else {
            return Vec::new();
        };
        self.input = InputState::ResizingElement {
            anchor,
            start_world: world,
            orig_x: el.x,
            orig_y: el.y,
            orig_w: rect.width,
            orig_h: rect.height,
            scale_x: 1.0,
            scale_y: 1.0,
            id,
        };
        Vec::new()
    }

    /// Geometry override for `id` from the in-flight gesture.
    fn preview_patch(&self, id: &ElementId) -> Option<ElementPatch> {
        match &self.input {
            InputState::DraggingElements { ids, delta, moved: true, .. } if ids.contains(id) => {
                let el = self.scene().get(id)?;
                Some(ElementPatch::position(Point::new(el.x + delta.x, el.y + delta.y)))
            }
            state @ InputState::ResizingElement { id: target, .. } if target == id => resize_patch(state),
            _ => None,
        }
    }

    fn reproject_editing(&mut self) {
        if let Some(session) = &mut self.editing {
            session.reproject(self.history.current(), &self.viewport);
        }
    }
}

/// Scale factor for a handle drag of `delta` world units along one axis.
fn resize_scale(orig: f64, delta: f64) -> f64 {
    if orig <= 0.0 {
        return 1.0;
    }
    (orig + delta).max(MIN_RESIZE_SIZE) / orig
}

/// Absolute geometry for a resize gesture: the live scale factors are folded
/// into width/height so the stored rectangle never carries a multiplier.
fn resize_patch(state: &InputState) -> Option<ElementPatch> {
    let InputState::ResizingElement { anchor, orig_x, orig_y, orig_w, orig_h, scale_x, scale_y, .. } = state else {
        return None;
    };
    let width = orig_w * scale_x;
    let height = orig_h * scale_y;
    let x = if anchor.x_sign() < 0.0 { orig_x + orig_w - width } else { *orig_x };
    let y = if anchor.y_sign() < 0.0 { orig_y + orig_h - height } else { *orig_y };
    Some(ElementPatch { x: Some(x), y: Some(y), width: Some(width), height: Some(height), ..ElementPatch::default() })
}

/// Derive `(fill, stroke)` from one picked color. Hex colors get a fixed
/// alpha suffix for the fill; anything else is used as-is for both.
fn fill_and_stroke(color: &str) -> (String, String) {
    let color = color.trim();
    let Some(hex) = color.strip_prefix('#') else {
        return (color.to_owned(), color.to_owned());
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return (color.to_owned(), color.to_owned());
    }
    let opaque = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_owned(),
        8 => hex[..6].to_owned(),
        _ => return (color.to_owned(), color.to_owned()),
    };
    let stroke = format!("#{opaque}");
    (format!("{stroke}{FILL_ALPHA_SUFFIX}"), stroke)
}
