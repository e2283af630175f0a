//! Pivot-preserving rotation of component images.
//!
//! Rotation always expands the canvas so no opaque pixel is cut off, and
//! samples nearest-neighbour so pixel art never gains new colors.

use crate::color::TRANSPARENT;
use crate::geometry::{self, Vec2};
use image::imageops;
use image::RgbaImage;

/// A rotated image together with the new location of its pivot.
#[derive(Debug, Clone)]
pub struct RotatedImage {
    pub image: RgbaImage,
    /// The source pivot, expressed in the rotated image's pixel space.
    pub pivot: Vec2,
}

impl RotatedImage {
    /// Integer blit position that puts the rotated pivot on `anchor`.
    pub fn top_left_for(&self, anchor: Vec2) -> (i32, i32) {
        (anchor - self.pivot).round()
    }
}

/// Rotate an image clockwise by `degrees` into an expanded canvas.
///
/// Quarter turns are exact pixel permutations; any other angle is
/// resampled nearest-neighbour with a transparent background.
pub fn rotate_expand(image: &RgbaImage, degrees: f64) -> RgbaImage {
    match geometry::quarter_turns(degrees) {
        Some(0) => image.clone(),
        Some(1) => imageops::rotate90(image),
        Some(2) => imageops::rotate180(image),
        Some(3) => imageops::rotate270(image),
        _ => rotate_resampled(image, degrees),
    }
}

fn rotate_resampled(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let size = image.dimensions();
    let (new_w, new_h) = geometry::rotated_size(size.0, size.1, degrees);
    let mut out = RgbaImage::from_pixel(new_w, new_h, TRANSPARENT);

    for y in 0..new_h {
        for x in 0..new_w {
            let src = geometry::unrotate_point_expanded(
                Vec2::pixel_center(x as f64, y as f64),
                size,
                degrees,
            );
            let (sx, sy) = (src.x.floor(), src.y.floor());
            if sx < 0.0 || sy < 0.0 || sx >= size.0 as f64 || sy >= size.1 as f64 {
                continue;
            }
            out.put_pixel(x, y, *image.get_pixel(sx as u32, sy as u32));
        }
    }

    out
}

/// Rotate an image about `pivot`, tracking where the pivot ends up.
///
/// # Examples
///
/// ```
/// use digrig::geometry::Vec2;
/// use digrig::rotate::rotate_about_pivot;
/// use image::{Rgba, RgbaImage};
///
/// // A 4x1 arm pivoting on its leftmost pixel
/// let arm = RgbaImage::from_pixel(4, 1, Rgba([255, 0, 0, 255]));
/// let rotated = rotate_about_pivot(&arm, Vec2::pixel_center(0.0, 0.0), 90.0);
///
/// // Hanging straight down, the pivot is now the top pixel
/// assert_eq!(rotated.image.dimensions(), (1, 4));
/// assert_eq!(rotated.pivot, Vec2::pixel_center(0.0, 0.0));
/// assert_eq!(rotated.top_left_for(Vec2::pixel_center(10.0, 5.0)), (10, 5));
/// ```
pub fn rotate_about_pivot(image: &RgbaImage, pivot: Vec2, degrees: f64) -> RotatedImage {
    RotatedImage {
        image: rotate_expand(image, degrees),
        pivot: geometry::rotate_point_expanded(pivot, image.dimensions(), degrees),
    }
}

/// Mirror an image left to right, carrying the pivot along.
pub fn flip_horizontal(image: &RgbaImage, pivot: Vec2) -> RotatedImage {
    RotatedImage {
        image: imageops::flip_horizontal(image),
        pivot: Vec2::new(image.width() as f64 - pivot.x, pivot.y),
    }
}
