//! Configuration loading and discovery for `digrig.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{
    DefaultsConfig, DigrigConfig, GodotConfig, PreviewConfig, ProjectConfig, ValidateConfig,
};
use crate::spritesheet::SheetLayout;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "digrig.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse digrig.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub out: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub scale: Option<u8>,
    pub padding: Option<u32>,
    pub columns: Option<u32>,
    pub layout: Option<SheetLayout>,
    pub gif: Option<bool>,
    pub godot: Option<bool>,
    pub strict: Option<bool>,
}

/// A loaded configuration and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DigrigConfig,
    /// `None` when no digrig.toml was found and defaults are in use
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory relative paths in the config resolve against.
    pub fn root(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(project_root)
            .map(Path::to_path_buf)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Find digrig.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find digrig.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one the config is discovered with
/// [`find_config`]; if none is found, [`default_config`] is used.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            let config = load_config_file(&p)?;
            Ok(LoadedConfig { config, path: Some(p) })
        }
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(LoadedConfig { config: default_config(), path: None })
        }
    }
}

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<DigrigConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate config text.
pub fn parse_config(contents: &str) -> Result<DigrigConfig, ConfigError> {
    let config: DigrigConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no digrig.toml is found.
///
/// The project is named after the current directory.
pub fn default_config() -> DigrigConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    DigrigConfig {
        project: ProjectConfig {
            name: project_name,
            src: PathBuf::from("rigs"),
            out: PathBuf::from("build"),
        },
        defaults: DefaultsConfig::default(),
        godot: GodotConfig::default(),
        preview: PreviewConfig::default(),
        validate: ValidateConfig::default(),
    }
}

/// Merge CLI overrides into a configuration. CLI values win.
pub fn merge_cli_overrides(config: &mut DigrigConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }
    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }
    if let Some(scale) = overrides.scale {
        config.defaults.scale = scale;
    }
    if let Some(padding) = overrides.padding {
        config.defaults.padding = padding;
    }
    if let Some(columns) = overrides.columns {
        config.defaults.columns = Some(columns);
        // A column count only means something for grids
        if overrides.layout.is_none() {
            config.defaults.layout = SheetLayout::Grid;
        }
    }
    if let Some(layout) = overrides.layout {
        config.defaults.layout = layout;
    }
    if let Some(gif) = overrides.gif {
        config.preview.gif = gif;
    }
    if let Some(godot) = overrides.godot {
        config.godot.enabled = godot;
    }
    if let Some(strict) = overrides.strict {
        config.validate.strict = strict;
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root. Absolute paths pass through.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
