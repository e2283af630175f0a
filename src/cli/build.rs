//! Build command implementations (build, init)

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::build::{build_project, BuildContext};
use crate::config::{load_config, merge_cli_overrides, CliOverrides, CONFIG_FILE};
use crate::templates::{generate_config, MINER_RIG};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Run the build command
pub fn run_build(config: Option<&Path>, out: Option<&Path>, strict: bool) -> ExitCode {
    let mut loaded = match load_config(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    match &loaded.path {
        Some(path) => log::info!("using config {}", path.display()),
        None => log::info!("no {} found, using defaults", CONFIG_FILE),
    }

    let overrides = CliOverrides {
        out: out.map(Path::to_path_buf),
        strict: strict.then_some(true),
        ..Default::default()
    };
    merge_cli_overrides(&mut loaded.config, &overrides);

    let ctx = BuildContext::from_loaded(&loaded);
    match build_project(&ctx) {
        Ok(report) => {
            for path in report.all_outputs() {
                println!("Saved: {}", path.display());
            }
            println!("{}", report.summary());
            if report.is_success() {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Files written by `init`, relative to the project directory.
fn init_files(name: &str) -> Vec<(PathBuf, String)> {
    vec![
        (PathBuf::from(CONFIG_FILE), generate_config(name)),
        (Path::new("rigs").join("miner.rig.json"), MINER_RIG.to_string()),
    ]
}

/// Write a starter project into `dir`. Existing files are left alone.
fn init_project(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "digrig-project".to_string());

    let mut written = Vec::new();
    for (relative, contents) in init_files(&name) {
        let path = dir.join(relative);
        if path.exists() {
            log::warn!("{} already exists, skipping", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}

/// Run the init command
pub fn run_init(dir: Option<&Path>) -> ExitCode {
    let dir = dir.unwrap_or(Path::new("."));
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Error: cannot create '{}': {}", dir.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    match init_project(dir) {
        Ok(written) => {
            for path in &written {
                println!("Created: {}", path.display());
            }
            if written.is_empty() {
                println!("Nothing to do: project files already exist");
            } else {
                println!("Run `digrig build` in {} to render the sheets", dir.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
