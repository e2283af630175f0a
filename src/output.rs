//! PNG output and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        OutputError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn image(path: &Path, source: image::ImageError) -> Self {
        OutputError::Image { path: path.to_path_buf(), source }
    }
}

/// Create the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save(path).map_err(|e| OutputError::image(path, e))?;
    log::debug!("wrote {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. A factor of 0 or 1
/// returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Sheet file for one animation: `{out_dir}/{rig}_{animation}.png`.
pub fn sheet_output_path(out_dir: &Path, rig: &str, animation: &str) -> PathBuf {
    out_dir.join(format!("{}_{}.png", file_safe(rig), file_safe(animation)))
}

/// Output path for a single rendered frame.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{rig dir}/{rig}_{animation}_{index}.png` |
/// | `-o dir/` (or an existing directory) | `dir/{rig}_{animation}_{index}.png` |
/// | `-o frame.png` | `frame.png` |
pub fn frame_output_path(
    rig_path: &Path,
    rig: &str,
    animation: &str,
    index: usize,
    output_arg: Option<&Path>,
) -> PathBuf {
    let name = format!("{}_{}_{}.png", file_safe(rig), file_safe(animation), index);
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(name)
            } else {
                output.to_path_buf()
            }
        }
        None => match rig_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
            _ => PathBuf::from(name),
        },
    }
}

/// Replace path separators and other awkward characters in a name.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_sheet_output_path() {
        assert_eq!(
            sheet_output_path(Path::new("build"), "miner", "dig"),
            PathBuf::from("build/miner_dig.png")
        );
        assert_eq!(
            sheet_output_path(Path::new("out"), "miner", "swing/left"),
            PathBuf::from("out/miner_swing_left.png")
        );
    }

    #[test]
    fn test_frame_output_path_default_next_to_rig() {
        let path = frame_output_path(Path::new("rigs/miner.rig.json"), "miner", "dig", 3, None);
        assert_eq!(path, PathBuf::from("rigs/miner_dig_3.png"));

        let bare = frame_output_path(Path::new("miner.rig.json"), "miner", "dig", 0, None);
        assert_eq!(bare, PathBuf::from("miner_dig_0.png"));
    }

    #[test]
    fn test_frame_output_path_explicit() {
        let file = frame_output_path(Path::new("m.rig.json"), "m", "idle", 1, Some(Path::new("f.png")));
        assert_eq!(file, PathBuf::from("f.png"));

        let dir = frame_output_path(Path::new("m.rig.json"), "m", "idle", 1, Some(Path::new("shots/")));
        assert_eq!(dir, PathBuf::from("shots/m_idle_1.png"));
    }

    #[test]
    fn test_scale_image() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let scaled = scale_image(img.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(*scaled.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*scaled.get_pixel(3, 0), Rgba([0, 0, 255, 255]));

        assert_eq!(scale_image(img.clone(), 1), img);
        assert_eq!(scale_image(img.clone(), 0), img);
    }

    #[test]
    fn test_save_png_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sheet.png");
        save_png(&RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255])), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(*loaded.get_pixel(2, 1), Rgba([1, 2, 3, 255]));
    }
}
