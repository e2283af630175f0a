//! Data model for rig files.
//!
//! A rig file (`*.rig.json` or `*.rig.json5`) describes a character as a tree
//! of components joined at pivots, the palette they are painted with, and
//! the animations that pose them.

mod animation;
mod shape;

pub use animation::{AnimationDef, FrameDef, Pose};
pub use shape::Shape;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::geometry::Vec2;

/// Error loading or validating a rig file.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("cannot read rig file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rig JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid rig JSON5: {0}")]
    Json5(#[from] json5::Error),
    #[error("rig '{name}' is invalid:\n{}", .errors.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation { name: String, errors: Vec<String> },
}

/// Syntax of a rig file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigFormat {
    Json,
    Json5,
}

impl RigFormat {
    /// Pick the format from a file extension; anything but `.json5` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json5") => RigFormat::Json5,
            _ => RigFormat::Json,
        }
    }
}

/// Palette reference: `"@builtin"` or an inline token map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PaletteRef {
    Named(String),
    Inline(BTreeMap<String, String>),
}

impl Default for PaletteRef {
    fn default() -> Self {
        PaletteRef::Inline(BTreeMap::new())
    }
}

fn default_opacity() -> f64 {
    1.0
}

/// An independently drawn body part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    /// PNG to start from, relative to the rig file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Canvas size `[w, h]`; required when there is no source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
    /// Painted in order over the source (or the empty canvas)
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Pixel the component rotates about and is attached by
    #[serde(default)]
    pub pivot: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Joint pixel on the parent, or the frame position for root components
    #[serde(default)]
    pub anchor: [f64; 2],
    /// Layer order; higher draws later
    #[serde(default)]
    pub z: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ComponentDef {
    /// Pivot as a point in continuous pixel space.
    pub fn pivot_point(&self) -> Vec2 {
        Vec2::pixel_center(self.pivot[0], self.pivot[1])
    }

    /// Anchor as a point in continuous pixel space.
    pub fn anchor_point(&self) -> Vec2 {
        Vec2::pixel_center(self.anchor[0], self.anchor[1])
    }
}

/// A complete rig: frame size, palette, components and animations.
///
/// # Examples
///
/// ```
/// use digrig::models::{parse_rig, RigFormat};
///
/// let rig = parse_rig(r##"{
///     "name": "dot",
///     "size": [4, 4],
///     "components": [{"name": "body", "size": [1, 1], "anchor": [2, 2],
///                     "shapes": [{"type": "pixel", "x": 0, "y": 0, "color": "#FFF"}]}],
///     "animations": [{"name": "idle", "frames": [{}]}]
/// }"##, RigFormat::Json).unwrap();
/// assert_eq!(rig.frame_size(), (4, 4));
/// assert_eq!(rig.animations[0].fps, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rig {
    pub name: String,
    /// Output frame size `[w, h]`
    pub size: [u32; 2],
    #[serde(default)]
    pub palette: PaletteRef,
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

impl Rig {
    pub fn frame_size(&self) -> (u32, u32) {
        (self.size[0], self.size[1])
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDef> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationDef> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Check the rig for problems that would make rendering meaningless.
    ///
    /// Tree structure (unknown parents, cycles) is checked separately when
    /// the skeleton is built.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("rig name must not be empty".to_string());
        }
        if self.size[0] == 0 || self.size[1] == 0 {
            errors.push(format!("frame size {}x{} must be non-zero", self.size[0], self.size[1]));
        }
        if self.components.is_empty() {
            errors.push("rig has no components".to_string());
        }

        let mut names = HashSet::new();
        for component in &self.components {
            if !names.insert(component.name.as_str()) {
                errors.push(format!("duplicate component name '{}'", component.name));
            }
            if component.source.is_none() && component.size.is_none() {
                errors.push(format!("component '{}' needs a source or a size", component.name));
            }
            if let Some([w, h]) = component.size {
                if w == 0 || h == 0 {
                    errors.push(format!("component '{}' has zero size", component.name));
                }
            }
            if !(0.0..=1.0).contains(&component.opacity) {
                errors.push(format!(
                    "component '{}' opacity {} is outside 0.0-1.0",
                    component.name, component.opacity
                ));
            }
        }

        let mut animation_names = HashSet::new();
        for anim in &self.animations {
            if !animation_names.insert(anim.name.as_str()) {
                errors.push(format!("duplicate animation name '{}'", anim.name));
            }
            if anim.fps == 0 {
                errors.push(format!("animation '{}' fps must be greater than 0", anim.name));
            }
            if anim.frames.is_empty() {
                errors.push(format!("animation '{}' has no frames", anim.name));
            }
            for (i, frame) in anim.frames.iter().enumerate() {
                if frame.duration.is_nan() || frame.duration <= 0.0 {
                    errors.push(format!(
                        "animation '{}' frame {} duration must be positive",
                        anim.name, i
                    ));
                }
                for pose_target in frame.poses.keys() {
                    if !names.contains(pose_target.as_str()) {
                        errors.push(format!(
                            "animation '{}' frame {} poses unknown component '{}'",
                            anim.name, i, pose_target
                        ));
                    }
                }
            }
        }

        errors
    }
}

/// Parse and validate rig text.
pub fn parse_rig(text: &str, format: RigFormat) -> Result<Rig, RigError> {
    let rig: Rig = match format {
        RigFormat::Json => serde_json::from_str(text)?,
        RigFormat::Json5 => json5::from_str(text)?,
    };

    let errors = rig.validate();
    if !errors.is_empty() {
        return Err(RigError::Validation { name: rig.name.clone(), errors });
    }
    Ok(rig)
}

/// Load a rig file, choosing JSON or JSON5 by extension.
pub fn load_rig(path: &Path) -> Result<Rig, RigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| RigError::Io { path: path.to_path_buf(), source })?;
    log::debug!("parsing rig {}", path.display());
    parse_rig(&text, RigFormat::from_path(path))
}
