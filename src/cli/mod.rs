//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod inspect;
mod palettes;
mod render;
mod rotate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::spritesheet::{SheetLayout, MAX_PADDING};
use crate::warning::Warning;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// digrig - Assemble jointed pixel-art rigs into animation sprite sheets
#[derive(Parser)]
#[command(name = "digrig")]
#[command(about = "digrig - Assemble jointed pixel-art rigs into animation sprite sheets")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every animation of a rig into sprite sheets and metadata
    Render {
        /// Rig file (.rig.json or .rig.json5)
        rig: PathBuf,

        /// Output directory (default: the configured out directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only render the animation with this name
        #[arg(long)]
        animation: Option<String>,

        /// Scale output by integer factor (1-64)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=64))]
        scale: Option<u8>,

        /// Padding between frames in the sheet (pixels, 0-256)
        #[arg(long, value_parser = clap::value_parser!(u32).range(..=MAX_PADDING as i64))]
        padding: Option<u32>,

        /// Frames per row (implies --layout grid)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        columns: Option<u32>,

        /// Sheet layout: horizontal, vertical or grid
        #[arg(long, value_parser = parse_layout)]
        layout: Option<SheetLayout>,

        /// Also write an animated GIF preview per animation
        #[arg(long)]
        gif: bool,

        /// Also write a Godot SpriteFrames resource
        #[arg(long)]
        godot: bool,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Render a single frame of an animation to PNG
    Frame {
        /// Rig file (.rig.json or .rig.json5)
        rig: PathBuf,

        /// Animation to take the frame from (default: the first one)
        #[arg(long)]
        animation: Option<String>,

        /// Frame index after tween expansion
        #[arg(long, default_value = "0")]
        index: usize,

        /// Output file or directory (ends with /)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-64)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=64))]
        scale: u8,
    },

    /// Rotate a PNG about a pivot pixel and report where the pivot lands
    Rotate {
        /// Input PNG
        png: PathBuf,

        /// Clockwise rotation in degrees
        #[arg(long, allow_hyphen_values = true)]
        degrees: f64,

        /// Pivot pixel as X,Y
        #[arg(long, value_parser = parse_pivot)]
        pivot: (f64, f64),

        /// Output PNG (default: {input}_rot{degrees}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a rig's component tree, pivots and animations
    Inspect {
        /// Rig file (.rig.json or .rig.json5)
        rig: PathBuf,
    },

    /// Build every rig of the project described by digrig.toml
    Build {
        /// Config file (default: digrig.toml found from the working directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory override
        #[arg(long)]
        out: Option<PathBuf>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Create a starter project (digrig.toml and a miner rig)
    Init {
        /// Project directory (default: current directory)
        dir: Option<PathBuf>,
    },

    /// List built-in palettes, or print one
    Palettes {
        /// Palette to print
        name: Option<String>,
    },
}

fn parse_layout(s: &str) -> Result<SheetLayout, String> {
    s.parse()
}

/// Parse `X,Y` into a pivot pixel.
fn parse_pivot(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let parse = |v: &str| {
        v.trim().parse::<f64>().map_err(|_| format!("'{}' is not a number", v.trim()))
    };
    Ok((parse(x)?, parse(y)?))
}

/// Print warnings to stderr.
pub(crate) fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Run a parsed command.
pub fn run_command(command: Commands) -> ExitCode {
    match command {
        Commands::Render {
            rig,
            output,
            animation,
            scale,
            padding,
            columns,
            layout,
            gif,
            godot,
            strict,
        } => render::run_render(render::RenderArgs {
            rig,
            output,
            animation,
            scale,
            padding,
            columns,
            layout,
            gif,
            godot,
            strict,
        }),
        Commands::Frame { rig, animation, index, output, scale } => {
            render::run_frame(&rig, animation.as_deref(), index, output.as_deref(), scale)
        }
        Commands::Rotate { png, degrees, pivot, output } => {
            rotate::run_rotate(&png, degrees, pivot, output.as_deref())
        }
        Commands::Inspect { rig } => inspect::run_inspect(&rig),
        Commands::Build { config, out, strict } => {
            build::run_build(config.as_deref(), out.as_deref(), strict)
        }
        Commands::Init { dir } => build::run_init(dir.as_deref()),
        Commands::Palettes { name } => palettes::run_palettes(name.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pivot() {
        assert_eq!(parse_pivot("3,4"), Ok((3.0, 4.0)));
        assert_eq!(parse_pivot(" 1.5 , 0 "), Ok((1.5, 0.0)));
        assert!(parse_pivot("3").is_err());
        assert!(parse_pivot("a,4").is_err());
    }

    #[test]
    fn test_render_flags() {
        let cli = Cli::try_parse_from([
            "digrig", "-vv", "render", "miner.rig.json", "--columns", "4", "--gif", "--layout", "grid",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Render { columns, gif, layout, scale, .. } => {
                assert_eq!(columns, Some(4));
                assert!(gif);
                assert_eq!(layout, Some(SheetLayout::Grid));
                assert_eq!(scale, None);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_rotate_accepts_negative_degrees() {
        let cli =
            Cli::try_parse_from(["digrig", "rotate", "arm.png", "--degrees", "-45", "--pivot", "1,0"])
                .unwrap();
        match cli.command {
            Commands::Rotate { degrees, pivot, .. } => {
                assert_eq!(degrees, -45.0);
                assert_eq!(pivot, (1.0, 0.0));
            }
            _ => panic!("expected rotate"),
        }
    }

    #[test]
    fn test_invalid_scale_rejected() {
        assert!(Cli::try_parse_from(["digrig", "render", "a.rig.json", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["digrig", "render", "a.rig.json", "--columns", "0"]).is_err());
    }

    #[test]
    fn test_padding_range() {
        assert!(Cli::try_parse_from(["digrig", "render", "a.rig.json", "--padding", "256"]).is_ok());
        assert!(Cli::try_parse_from(["digrig", "render", "a.rig.json", "--padding", "257"]).is_err());
        assert!(Cli::try_parse_from(["digrig", "render", "a.rig.json", "--padding", "3000000000"]).is_err());
    }
}
