//! Palettes command implementation

use std::process::ExitCode;

use crate::color::color_to_hex;
use crate::palettes;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the palettes command
pub fn run_palettes(name: Option<&str>) -> ExitCode {
    match name {
        None => {
            println!("Built-in palettes:");
            for name in palettes::list_builtins() {
                println!("  @{}", name);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Some(name) => {
            let name = name.strip_prefix('@').unwrap_or(name);
            match palettes::get_builtin(name) {
                Some(palette) => {
                    println!("Palette: @{}", palette.name);
                    for (token, color) in palette.entries() {
                        println!("  {:<16} {}", token, color_to_hex(color));
                    }
                    ExitCode::from(EXIT_SUCCESS)
                }
                None => {
                    eprintln!("Error: unknown palette '{}'", name);
                    eprintln!("Available: {}", palettes::list_builtins().join(", "));
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
    }
}
