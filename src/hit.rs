//! Hit-testing against sketch elements and the transform handles of a
//! single selected rectangle.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{GLYPH_WIDTH_RATIO, HANDLE_RADIUS_PX, LINE_HEIGHT_RATIO};
use crate::scene::{Element, ElementId, Scene, Shape};
use crate::viewport::{Point, Viewport};

/// Axis-aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Every handle, clockwise from the top edge.
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// World-space position of this handle on `bounds`.
    #[must_use]
    pub fn position(self, bounds: &Bounds) -> Point {
        let left = bounds.x;
        let right = bounds.x + bounds.width;
        let top = bounds.y;
        let bottom = bounds.y + bounds.height;
        let mid_x = bounds.x + bounds.width / 2.0;
        let mid_y = bounds.y + bounds.height / 2.0;
        match self {
            Self::N => Point::new(mid_x, top),
            Self::Ne => Point::new(right, top),
            Self::E => Point::new(right, mid_y),
            Self::Se => Point::new(right, bottom),
            Self::S => Point::new(mid_x, bottom),
            Self::Sw => Point::new(left, bottom),
            Self::W => Point::new(left, mid_y),
            Self::Nw => Point::new(left, top),
        }
    }

    /// Horizontal edge this handle drags: -1 left, 1 right, 0 neither.
    #[must_use]
    pub fn x_sign(self) -> f64 {
        match self {
            Self::Ne | Self::E | Self::Se => 1.0,
            Self::Nw | Self::W | Self::Sw => -1.0,
            Self::N | Self::S => 0.0,
        }
    }

    /// Vertical edge this handle drags: -1 top, 1 bottom, 0 neither.
    #[must_use]
    pub fn y_sign(self) -> f64 {
        match self {
            Self::Se | Self::S | Self::Sw => 1.0,
            Self::Ne | Self::N | Self::Nw => -1.0,
            Self::E | Self::W => 0.0,
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// World-space bounding box of an element. Text extents are estimated from
/// the font size since no font metrics are available to the core.
#[must_use]
pub fn element_bounds(el: &Element) -> Bounds {
    match &el.shape {
        Shape::Rectangle(rect) => Bounds::new(el.x, el.y, rect.width, rect.height),
        Shape::Text(text) | Shape::Measurement(text) => {
            let lines = text.text.lines().count().max(1);
            let longest = text.text.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
            #[allow(clippy::cast_precision_loss)]
            let (cols, rows) = (longest as f64, lines as f64);
            Bounds::new(
                el.x,
                el.y,
                cols * text.font_size * GLYPH_WIDTH_RATIO,
                rows * text.font_size * LINE_HEIGHT_RATIO,
            )
        }
    }
}

/// Screen-space handle positions for `el`, or nothing for non-rectangles.
#[must_use]
pub fn handles(el: &Element, viewport: &Viewport) -> Vec<(ResizeAnchor, Point)> {
    if el.as_rect().is_none() {
        return Vec::new();
    }
    let bounds = element_bounds(el);
    ResizeAnchor::ALL.iter().map(|&a| (a, viewport.to_screen(a.position(&bounds)))).collect()
}

/// Find what lies under `world_pt`.
///
/// Handles of `handle_target` (the single selected element, when it is a
/// rectangle) are checked first, then bodies from topmost to bottommost.
/// `hidden` is skipped entirely.
#[must_use]
pub fn hit_test(
    world_pt: Point,
    scene: &Scene,
    viewport: &Viewport,
    handle_target: Option<&ElementId>,
    hidden: Option<&ElementId>,
) -> Option<Hit> {
    if let Some(target) = handle_target.and_then(|id| scene.get(id)) {
        if target.as_rect().is_some() && Some(&target.id) != hidden {
            let slop = viewport.screen_dist_to_world(HANDLE_RADIUS_PX);
            let bounds = element_bounds(target);
            for anchor in ResizeAnchor::ALL {
                let handle = anchor.position(&bounds);
                if (world_pt.x - handle.x).abs() <= slop && (world_pt.y - handle.y).abs() <= slop {
                    return Some(Hit { element_id: target.id.clone(), part: HitPart::ResizeHandle(anchor) });
                }
            }
        }
    }

    scene
        .iter()
        .rev()
        .filter(|el| Some(&el.id) != hidden)
        .find(|el| element_bounds(el).contains(world_pt))
        .map(|el| Hit { element_id: el.id.clone(), part: HitPart::Body })
}
