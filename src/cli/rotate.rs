//! Rotate command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::geometry::Vec2;
use crate::output::save_png;
use crate::rotate::rotate_about_pivot;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Default output: `{dir}/{stem}_rot{degrees}.png`.
fn default_output(png: &Path, degrees: f64) -> PathBuf {
    let stem = png.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    png.with_file_name(format!("{}_rot{}.png", stem, degrees))
}

/// Pixel containing a continuous point.
fn pixel_of(point: Vec2) -> (i64, i64) {
    (point.x.floor() as i64, point.y.floor() as i64)
}

/// Execute the rotate command
pub fn run_rotate(png: &Path, degrees: f64, pivot: (f64, f64), output: Option<&Path>) -> ExitCode {
    let image = match image::open(png) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", png.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (w, h) = image.dimensions();
    if pivot.0 < 0.0 || pivot.1 < 0.0 || pivot.0 >= w as f64 || pivot.1 >= h as f64 {
        eprintln!("Warning: pivot ({}, {}) is outside the {}x{} image", pivot.0, pivot.1, w, h);
    }

    let rotated = rotate_about_pivot(&image, Vec2::pixel_center(pivot.0, pivot.1), degrees);
    let out = output.map(Path::to_path_buf).unwrap_or_else(|| default_output(png, degrees));
    if let Err(e) = save_png(&rotated.image, &out) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    let (px, py) = pixel_of(rotated.pivot);
    println!("Saved: {}", out.display());
    println!("Size: {}x{} -> {}x{}", w, h, rotated.image.width(), rotated.image.height());
    println!(
        "Pivot: ({}, {}) -> ({}, {}) [center {:.2}, {:.2}]",
        pivot.0, pivot.1, px, py, rotated.pivot.x, rotated.pivot.y
    );
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(default_output(Path::new("parts/arm.png"), -45.0), PathBuf::from("parts/arm_rot-45.png"));
        assert_eq!(default_output(Path::new("arm.png"), 22.5), PathBuf::from("arm_rot22.5.png"));
    }

    #[test]
    fn test_pixel_of_center() {
        assert_eq!(pixel_of(Vec2::pixel_center(3.0, 0.0)), (3, 0));
        assert_eq!(pixel_of(Vec2::new(2.99, 4.01)), (2, 4));
    }
}
