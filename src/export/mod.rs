//! Export formats for sprite sheet metadata.
//!
//! # Supported Formats
//!
//! - **JSON**: one metadata file per sheet with frame rectangles, timing and
//!   the rig's origin
//! - **Godot**: a single `SpriteFrames` `.tres` covering every animation of a
//!   rig, ready for `AnimatedSprite2D`

pub mod godot;
pub mod json;

pub use godot::GodotExporter;
pub use json::JsonExporter;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error writing exported metadata.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// One frame's cell on a sheet, plus its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Relative hold time (1.0 = one tick)
    pub duration: f64,
    pub duration_ms: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tweened: bool,
}

/// Metadata for one animation's sprite sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMetadata {
    /// Sheet file name, relative to the metadata file
    pub image: String,
    pub animation: String,
    pub size: [u32; 2],
    pub frame_size: [u32; 2],
    pub fps: u32,
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Root component's anchor within a frame, in output pixels
    pub origin: [f64; 2],
    pub frames: Vec<FrameMetadata>,
}

/// Every sheet rendered for one rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigMetadata {
    pub rig: String,
    pub sheets: Vec<SheetMetadata>,
}

/// Trait for export format implementations.
pub trait Exporter {
    /// Write metadata for `rig` into `output_dir`, returning the files written.
    fn export(&self, rig: &RigMetadata, output_dir: &Path) -> Result<Vec<PathBuf>>;

    fn format_name(&self) -> &'static str;

    fn extension(&self) -> &'static str;
}

/// Write `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
