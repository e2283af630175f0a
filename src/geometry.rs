//! 2D rotation and placement math for rigged components.
//!
//! All points live in continuous pixel space: pixel `(x, y)` covers
//! `[x, x+1) × [y, y+1)`, so its center is `(x + 0.5, y + 0.5)`. The y axis
//! points down and positive angles rotate clockwise on screen, which is the
//! same direction as `image::imageops::rotate90`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Tolerance used to snap angles and canvas sizes against float noise.
const EPSILON: f64 = 1e-6;

/// A point or displacement in continuous pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the pixel at integer coordinates `(x, y)`.
    ///
    /// Fractional inputs are allowed and shift the point accordingly.
    pub fn pixel_center(x: f64, y: f64) -> Self {
        Self { x: x + 0.5, y: y + 0.5 }
    }

    /// Rotate about the origin by `degrees` (clockwise on screen).
    pub fn rotate(self, degrees: f64) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Round each coordinate to the nearest integer, halves rounding up.
    pub fn round(self) -> (i32, i32) {
        ((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(p: [f64; 2]) -> Self {
        Vec2::new(p[0], p[1])
    }
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if d >= 360.0 - EPSILON {
        0.0
    } else {
        d
    }
}

/// If `degrees` is a whole number of quarter turns, return how many (0..4).
pub fn quarter_turns(degrees: f64) -> Option<u8> {
    let quarters = normalize_degrees(degrees) / 90.0;
    let rounded = quarters.round();
    if (quarters - rounded).abs() < EPSILON {
        Some((rounded as i64).rem_euclid(4) as u8)
    } else {
        None
    }
}

/// Sine and cosine of an angle in degrees, exact for quarter turns.
pub fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    match quarter_turns(degrees) {
        Some(0) => (0.0, 1.0),
        Some(1) => (1.0, 0.0),
        Some(2) => (0.0, -1.0),
        Some(3) => (-1.0, 0.0),
        _ => degrees.to_radians().sin_cos(),
    }
}

/// Canvas size of an image of `width × height` after an expanding rotate.
///
/// # Examples
///
/// ```
/// use digrig::geometry::rotated_size;
///
/// assert_eq!(rotated_size(4, 2, 90.0), (2, 4));
/// assert_eq!(rotated_size(4, 2, 180.0), (4, 2));
/// assert_eq!(rotated_size(10, 10, 45.0), (15, 15));
/// ```
pub fn rotated_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let (sin, cos) = sin_cos_degrees(degrees);
    let (w, h) = (width as f64, height as f64);
    let new_w = (w * cos.abs() + h * sin.abs() - EPSILON).ceil().max(1.0);
    let new_h = (w * sin.abs() + h * cos.abs() - EPSILON).ceil().max(1.0);
    (new_w as u32, new_h as u32)
}

/// Where a point of a `size` image lands in the expanded canvas after
/// rotating by `degrees` about the image center.
pub fn rotate_point_expanded(point: Vec2, size: (u32, u32), degrees: f64) -> Vec2 {
    let center = Vec2::new(size.0 as f64 / 2.0, size.1 as f64 / 2.0);
    let (new_w, new_h) = rotated_size(size.0, size.1, degrees);
    let new_center = Vec2::new(new_w as f64 / 2.0, new_h as f64 / 2.0);
    new_center + (point - center).rotate(degrees)
}

/// Inverse of [`rotate_point_expanded`]: map a point of the rotated canvas
/// back into the source image.
pub fn unrotate_point_expanded(point: Vec2, size: (u32, u32), degrees: f64) -> Vec2 {
    let center = Vec2::new(size.0 as f64 / 2.0, size.1 as f64 / 2.0);
    let (new_w, new_h) = rotated_size(size.0, size.1, degrees);
    let new_center = Vec2::new(new_w as f64 / 2.0, new_h as f64 / 2.0);
    center + (point - new_center).rotate(-degrees)
}

/// Where a component sits in the frame.
///
/// The component's local `pivot` is pinned on the frame-space `anchor` and
/// the component is rotated by `angle` about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub anchor: Vec2,
    pub pivot: Vec2,
    pub angle: f64,
}

impl Placement {
    /// Placement of a root component. `anchor` and `offset` are frame space.
    pub fn root(anchor: Vec2, pivot: Vec2, angle: f64, offset: Vec2) -> Self {
        Self { anchor: anchor + offset, pivot, angle }
    }

    /// Map a component-local point into frame space.
    pub fn to_frame(&self, local: Vec2) -> Vec2 {
        self.anchor + (local - self.pivot).rotate(self.angle)
    }

    /// Placement of a child pinned at `joint` (local to this component).
    ///
    /// The child inherits this component's rotation; `offset` is applied in
    /// frame space after the joint is located.
    pub fn child(&self, joint: Vec2, child_pivot: Vec2, child_angle: f64, offset: Vec2) -> Self {
        Self {
            anchor: self.to_frame(joint) + offset,
            pivot: child_pivot,
            angle: self.angle + child_angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(a.distance(b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_rotate_clockwise_on_screen() {
        // Right of origin goes below it after a quarter turn
        assert_close(Vec2::new(1.0, 0.0).rotate(90.0), Vec2::new(0.0, 1.0));
        assert_close(Vec2::new(0.0, 1.0).rotate(90.0), Vec2::new(-1.0, 0.0));
        assert_close(Vec2::new(1.0, 0.0).rotate(-90.0), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(quarter_turns(0.0), Some(0));
        assert_eq!(quarter_turns(-90.0), Some(3));
        assert_eq!(quarter_turns(450.0), Some(1));
        assert_eq!(quarter_turns(359.9999999), Some(0));
        assert_eq!(quarter_turns(45.0), None);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }

    #[test]
    fn test_rotated_size_quarter_turns_are_exact() {
        assert_eq!(rotated_size(7, 3, 90.0), (3, 7));
        assert_eq!(rotated_size(7, 3, -270.0), (3, 7));
        assert_eq!(rotated_size(7, 3, 0.0), (7, 3));
    }

    #[test]
    fn test_rotated_size_diagonal() {
        // 4x2 at 30°: 4*0.866+2*0.5 = 4.46 -> 5, 4*0.5+2*0.866 = 3.73 -> 4
        assert_eq!(rotated_size(4, 2, 30.0), (5, 4));
    }

    #[test]
    fn test_rotate_point_matches_quarter_turn_pixels() {
        // imageops::rotate90 moves src pixel (x, y) to (h-1-y, x)
        let (w, h) = (5u32, 3u32);
        for (x, y) in [(0, 0), (4, 2), (1, 2)] {
            let p = rotate_point_expanded(Vec2::pixel_center(x as f64, y as f64), (w, h), 90.0);
            assert_close(p, Vec2::pixel_center((h - 1 - y) as f64, x as f64));
        }
    }

    #[test]
    fn test_unrotate_inverts_rotate() {
        let size = (9, 4);
        let p = Vec2::new(2.25, 3.75);
        for deg in [0.0, 17.0, 90.0, 135.0, 200.0, -45.0] {
            let back = unrotate_point_expanded(rotate_point_expanded(p, size, deg), size, deg);
            assert_close(back, p);
        }
    }

    #[test]
    fn test_placement_identity() {
        let placement = Placement::root(Vec2::new(10.5, 10.5), Vec2::new(2.5, 3.5), 0.0, Vec2::ZERO);
        assert_close(placement.to_frame(Vec2::new(2.5, 3.5)), Vec2::new(10.5, 10.5));
        assert_close(placement.to_frame(Vec2::new(3.5, 3.5)), Vec2::new(11.5, 10.5));
    }

    #[test]
    fn test_child_follows_parent_rotation() {
        // Arm pinned at origin pointing right, hand 4px further along
        let arm = Placement::root(Vec2::ZERO, Vec2::ZERO, 90.0, Vec2::ZERO);
        let pick = arm.child(Vec2::new(4.0, 0.0), Vec2::ZERO, 10.0, Vec2::ZERO);
        // After a clockwise quarter turn the hand points straight down
        assert_close(pick.anchor, Vec2::new(0.0, 4.0));
        assert!((pick.angle - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_child_offset_is_frame_space() {
        let body = Placement::root(Vec2::new(5.0, 5.0), Vec2::ZERO, 180.0, Vec2::new(0.0, 1.0));
        let head = body.child(Vec2::new(0.0, -3.0), Vec2::ZERO, 0.0, Vec2::new(1.0, 0.0));
        assert_close(body.anchor, Vec2::new(5.0, 6.0));
        // (0,-3) flipped by 180° is (0,3)
        assert_close(head.anchor, Vec2::new(6.0, 9.0));
    }

    #[test]
    fn test_lerp() {
        let a = Vec2::new(0.0, -2.0);
        let b = Vec2::new(4.0, 2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.25), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_round_halves_up() {
        assert_eq!(Vec2::new(1.5, -0.5).round(), (2, 0));
        assert_eq!(Vec2::new(-1.6, 2.49).round(), (-2, 2));
    }
}
