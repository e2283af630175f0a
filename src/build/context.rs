//! Build context containing configuration and state for a build.

use crate::config::{resolve_path, DigrigConfig, LoadedConfig};
use crate::pipeline::{OutputOptions, RenderOptions};
use std::path::{Path, PathBuf};

/// Configuration and resolved paths for a build.
#[derive(Debug, Clone)]
pub struct BuildContext {
    config: DigrigConfig,
    /// Directory holding digrig.toml (or the working directory)
    project_root: PathBuf,
}

impl BuildContext {
    pub fn new(config: DigrigConfig, project_root: PathBuf) -> Self {
        Self { config, project_root }
    }

    pub fn from_loaded(loaded: &LoadedConfig) -> Self {
        Self::new(loaded.config.clone(), loaded.root())
    }

    pub fn config(&self) -> &DigrigConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Directory searched for rig files.
    pub fn src_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.project.src)
    }

    pub fn out_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.project.out)
    }

    /// Whether strict mode is enabled (warnings are errors).
    pub fn is_strict(&self) -> bool {
        self.config.validate.strict
    }

    /// Render every animation, honouring strict mode.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { animation: None, strict: self.is_strict() }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            sheet: self.config.sheet_options(),
            scale: self.config.defaults.scale,
            gif: self.config.preview.gif,
            gif_scale: self.config.preview.scale,
            godot: self.config.godot.enabled.then(|| self.config.godot.resource_path.clone()),
        }
    }
}
