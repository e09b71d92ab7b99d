//! Measurement labels anchored to a side of a rectangle.
//!
//! The flow is two-step: `begin` records which rectangle side the user
//! picked, `confirm` turns a free-text value into a `Measurement` element.
//! Values are stored verbatim; units are never parsed.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MEASUREMENT_LEFT_OFFSET, MEASUREMENT_OFFSET};
use crate::scene::{Element, ElementId};
use crate::viewport::Point;

/// Error returned by the measurement flow.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeasurementError {
    /// Measurements attach to exactly one selected rectangle.
    #[error("select a single rectangle to measure")]
    NotARectangle,
    /// A zero-width or zero-height rectangle has no side to label.
    #[error("rectangle {0} has no area to measure")]
    Degenerate(ElementId),
    /// The value was empty after trimming.
    #[error("measurement value is required")]
    EmptyValue,
    /// `confirm` was called without a preceding `begin`.
    #[error("no measurement in progress")]
    NotStarted,
    /// The rectangle was deleted while the flow was open.
    #[error("rectangle {0} no longer exists")]
    RectangleGone(ElementId),
}

/// Side of a rectangle a measurement is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// A measurement flow waiting for its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMeasurement {
    pub rect_id: ElementId,
    pub side: Side,
}

/// Where a label for `side` of `rect` is placed, or `None` for non-rectangles.
#[must_use]
pub fn label_anchor(rect: &Element, side: Side) -> Option<Point> {
    let shape = rect.as_rect()?;
    let (x, y, w, h) = (rect.x, rect.y, shape.width, shape.height);
    Some(match side {
        Side::Top => Point::new(x + w / 2.0, y - MEASUREMENT_OFFSET),
        Side::Right => Point::new(x + w + MEASUREMENT_OFFSET, y + h / 2.0),
        Side::Bottom => Point::new(x + w / 2.0, y + h + MEASUREMENT_OFFSET),
        Side::Left => Point::new(x - MEASUREMENT_LEFT_OFFSET, y + h / 2.0),
    })
}

/// Build the measurement element for `pending` against `rect`.
///
/// # Errors
///
/// [`MeasurementError::EmptyValue`] for blank input and
/// [`MeasurementError::NotARectangle`] if `rect` is not a rectangle.
pub fn build(rect: &Element, side: Side, value: &str) -> Result<Element, MeasurementError> {
    if value.trim().is_empty() {
        return Err(MeasurementError::EmptyValue);
    }
    let at = label_anchor(rect, side).ok_or(MeasurementError::NotARectangle)?;
    Ok(Element::measurement(at, value))
}
