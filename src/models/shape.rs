//! Drawable shape primitives for procedurally generated components.

use serde::{Deserialize, Serialize};

/// A shape painted onto a component canvas.
///
/// Coordinates are component-local pixels. `color` is a palette token or a
/// literal color string.
///
/// # Examples
///
/// ```
/// use digrig::models::Shape;
///
/// let shape: Shape = serde_json::from_str(
///     r#"{"type": "rect", "x": 0, "y": 0, "w": 4, "h": 2, "color": "wood"}"#
/// ).unwrap();
/// assert_eq!(shape.color(), "wood");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Pixel { x: i32, y: i32, color: String },
    /// Filled rectangle
    Rect { x: i32, y: i32, w: u32, h: u32, color: String },
    /// One pixel wide rectangle border
    Outline { x: i32, y: i32, w: u32, h: u32, color: String },
    Line { from: [i32; 2], to: [i32; 2], color: String },
    /// Filled ellipse centered on a pixel
    Ellipse { cx: i32, cy: i32, rx: u32, ry: u32, color: String },
    /// Filled polygon (even-odd rule) including its edges
    Polygon { points: Vec<[i32; 2]>, color: String },
}

impl Shape {
    pub fn color(&self) -> &str {
        match self {
            Shape::Pixel { color, .. }
            | Shape::Rect { color, .. }
            | Shape::Outline { color, .. }
            | Shape::Line { color, .. }
            | Shape::Ellipse { color, .. }
            | Shape::Polygon { color, .. } => color,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Pixel { .. } => "pixel",
            Shape::Rect { .. } => "rect",
            Shape::Outline { .. } => "outline",
            Shape::Line { .. } => "line",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Polygon { .. } => "polygon",
        }
    }
}
