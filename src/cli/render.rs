//! Render command implementations (render, frame)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::build::BuildContext;
use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::output::{frame_output_path, save_png, scale_image};
use crate::pipeline::{render_rig, render_single_frame, write_outputs, PipelineError, RenderOptions};
use crate::spritesheet::SheetLayout;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of `digrig render`.
pub struct RenderArgs {
    pub rig: PathBuf,
    pub output: Option<PathBuf>,
    pub animation: Option<String>,
    pub scale: Option<u8>,
    pub padding: Option<u32>,
    pub columns: Option<u32>,
    pub layout: Option<SheetLayout>,
    pub gif: bool,
    pub godot: bool,
    pub strict: bool,
}

impl RenderArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            scale: self.scale,
            padding: self.padding,
            columns: self.columns,
            layout: self.layout,
            gif: self.gif.then_some(true),
            godot: self.godot.then_some(true),
            strict: self.strict.then_some(true),
            ..Default::default()
        }
    }
}

/// Exit status for a pipeline failure: bad selections are argument errors.
fn exit_status(error: &PipelineError) -> u8 {
    match error {
        PipelineError::UnknownAnimation { .. } | PipelineError::FrameIndex { .. } => EXIT_INVALID_ARGS,
        _ => EXIT_ERROR,
    }
}

/// Execute the render command
pub fn run_render(args: RenderArgs) -> ExitCode {
    let mut loaded = match load_config(None) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut loaded.config, &args.overrides());

    let ctx = BuildContext::from_loaded(&loaded);
    // An explicit -o is relative to the working directory, not the project
    let out_dir = args.output.clone().unwrap_or_else(|| ctx.out_dir());
    let options = RenderOptions { animation: args.animation.clone(), strict: ctx.is_strict() };

    let rendered = match render_rig(&args.rig, &options) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error: {}: {}", args.rig.display(), e);
            return ExitCode::from(exit_status(&e));
        }
    };
    print_warnings(&rendered.warnings);

    match write_outputs(&rendered, &out_dir, &ctx.output_options()) {
        Ok(written) => {
            for path in &written {
                println!("Saved: {}", path.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the frame command
pub fn run_frame(
    rig_path: &Path,
    animation: Option<&str>,
    index: usize,
    output: Option<&Path>,
    scale: u8,
) -> ExitCode {
    let (rig, image, warnings) = match render_single_frame(rig_path, animation, index) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}: {}", rig_path.display(), e);
            return ExitCode::from(exit_status(&e));
        }
    };
    print_warnings(&warnings);

    let anim_name = animation
        .map(str::to_string)
        .or_else(|| rig.animations.first().map(|a| a.name.clone()))
        .unwrap_or_else(|| crate::pipeline::REST_ANIMATION.to_string());
    let path = frame_output_path(rig_path, &rig.name, &anim_name, index, output);

    match save_png(&scale_image(image, scale), &path) {
        Ok(()) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let args = RenderArgs {
            rig: PathBuf::from("miner.rig.json"),
            output: Some(PathBuf::from("out")),
            animation: None,
            scale: Some(4),
            padding: None,
            columns: Some(2),
            layout: None,
            gif: true,
            godot: false,
            strict: false,
        };
        let overrides = args.overrides();
        assert_eq!(overrides.out, None);
        assert_eq!(overrides.scale, Some(4));
        assert_eq!(overrides.columns, Some(2));
        assert_eq!(overrides.gif, Some(true));
        // Unset switches leave the config value alone
        assert_eq!(overrides.godot, None);
        assert_eq!(overrides.strict, None);
    }

    #[test]
    fn test_selection_errors_are_invalid_args() {
        let err = PipelineError::FrameIndex { animation: "idle".to_string(), index: 9, count: 2 };
        assert_eq!(exit_status(&err), EXIT_INVALID_ARGS);
        let err = PipelineError::Strict { rig: "miner".to_string(), warnings: vec![] };
        assert_eq!(exit_status(&err), EXIT_ERROR);
    }
}
