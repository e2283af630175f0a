//! Configuration schema types for `digrig.toml`
//!
//! Defines the structure and validation rules for digrig project configuration.

use crate::spritesheet::{SheetLayout, SheetOptions, MAX_PADDING};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Directory searched for rig files
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Build output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("rigs")
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

fn default_scale() -> u8 {
    1
}

/// Sheet settings applied to every rendered animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Integer upscale applied to sheets
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Transparent pixels between cells (before scaling)
    #[serde(default)]
    pub padding: u32,
    /// Columns for the grid layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default)]
    pub layout: SheetLayout,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { scale: default_scale(), padding: 0, columns: None, layout: SheetLayout::default() }
    }
}

/// Godot SpriteFrames export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GodotConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Godot path prefix of the output directory
    #[serde(default = "default_godot_resource_path")]
    pub resource_path: String,
}

fn default_godot_resource_path() -> String {
    "res://sprites".to_string()
}

impl Default for GodotConfig {
    fn default() -> Self {
        Self { enabled: false, resource_path: default_godot_resource_path() }
    }
}

/// Animated GIF previews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub gif: bool,
    #[serde(default = "default_scale")]
    pub scale: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { gif: false, scale: default_scale() }
    }
}

/// Validation settings for the build process
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidateConfig {
    /// Treat warnings as errors
    #[serde(default)]
    pub strict: bool,
}

/// Complete digrig.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigrigConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub godot: GodotConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub validate: ValidateConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "defaults.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "digrig.toml: '{}' {}", self.field, self.message)
    }
}

impl DigrigConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError { field: field.to_string(), message: message.to_string() })
        };

        if self.project.name.trim().is_empty() {
            push("project.name", "must be a non-empty string");
        }
        if self.defaults.scale == 0 {
            push("defaults.scale", "must be a positive integer");
        }
        if self.defaults.padding > MAX_PADDING {
            push("defaults.padding", &format!("must be at most {}", MAX_PADDING));
        }
        if self.defaults.columns == Some(0) {
            push("defaults.columns", "must be a positive integer");
        }
        if self.preview.scale == 0 {
            push("preview.scale", "must be a positive integer");
        }
        if self.godot.enabled && !self.godot.resource_path.starts_with("res://") {
            push("godot.resource_path", "must start with res://");
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Sheet packing options from the `[defaults]` section.
    ///
    /// A column count with the default horizontal layout means a grid.
    pub fn sheet_options(&self) -> SheetOptions {
        let layout = match (self.defaults.layout, self.defaults.columns) {
            (SheetLayout::Horizontal, Some(_)) => SheetLayout::Grid,
            (layout, _) => layout,
        };
        SheetOptions {
            layout,
            columns: self.defaults.columns,
            padding: self.defaults.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parse() {
        let toml = r#"
[project]
name = "dig-game"
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.project.name, "dig-game");
        assert_eq!(config.project.src, PathBuf::from("rigs"));
        assert_eq!(config.project.out, PathBuf::from("build"));
        assert_eq!(config.defaults.scale, 1);
        assert_eq!(config.defaults.layout, SheetLayout::Horizontal);
        assert!(!config.godot.enabled);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[project]
name = "dig-game"
src = "art/rigs"
out = "game/sprites"

[defaults]
scale = 2
padding = 1
columns = 4
layout = "grid"

[godot]
enabled = true
resource_path = "res://sprites/miner"

[preview]
gif = true
scale = 4

[validate]
strict = true
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.project.src, PathBuf::from("art/rigs"));
        assert_eq!(config.defaults.scale, 2);
        assert_eq!(config.defaults.columns, Some(4));
        assert_eq!(config.defaults.layout, SheetLayout::Grid);
        assert_eq!(config.godot.resource_path, "res://sprites/miner");
        assert!(config.preview.gif);
        assert_eq!(config.preview.scale, 4);
        assert!(config.validate.strict);

        let options = config.sheet_options();
        assert_eq!(options.columns, Some(4));
        assert_eq!(options.padding, 1);
    }

    #[test]
    fn test_validation_errors() {
        let toml = r#"
[project]
name = " "

[defaults]
scale = 0
padding = 3000000000
columns = 0

[godot]
enabled = true
resource_path = "sprites"
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["project.name", "defaults.scale", "defaults.padding", "defaults.columns", "godot.resource_path"]);
    }

    #[test]
    fn test_columns_without_layout_pack_a_grid() {
        let toml = r#"
[project]
name = "x"

[defaults]
columns = 4
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        let options = config.sheet_options();
        assert_eq!(options.layout, SheetLayout::Grid);
        assert_eq!(options.columns, Some(4));

        let toml = r#"
[project]
name = "x"

[defaults]
columns = 4
layout = "vertical"
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.sheet_options().layout, SheetLayout::Vertical);
    }

    #[test]
    fn test_resource_path_ignored_when_godot_disabled() {
        let toml = r#"
[project]
name = "x"

[godot]
resource_path = "sprites"
"#;
        let config: DigrigConfig = toml::from_str(toml).unwrap();
        assert!(config.is_valid());
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let toml = r#"
[project]
name = "x"

[defaults]
layout = "spiral"
"#;
        assert!(toml::from_str::<DigrigConfig>(toml).is_err());
    }

    #[test]
    fn test_missing_project_rejected() {
        assert!(toml::from_str::<DigrigConfig>("[defaults]\nscale = 2\n").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError { field: "defaults.scale".into(), message: "bad".into() };
        assert_eq!(err.to_string(), "digrig.toml: 'defaults.scale' bad");
    }
}
