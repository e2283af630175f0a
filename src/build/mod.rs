//! Project build: render every rig under the source directory.
//!
//! # Overview
//!
//! - **Discovery**: find `*.rig.json` / `*.rig.json5` files under `[project] src`
//! - **Rendering**: rigs are rendered in parallel; one failing rig does not
//!   stop the others
//! - **Output**: sheets, metadata and previews land in `[project] out`
//!
//! # Example
//!
//! ```no_run
//! use digrig::build::{build_project, BuildContext};
//! use digrig::config::load_config;
//!
//! let loaded = load_config(None).unwrap();
//! let report = build_project(&BuildContext::from_loaded(&loaded)).unwrap();
//! println!("{}", report.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod result;

pub use context::*;
pub use discovery::*;
pub use result::*;

use crate::pipeline::{render_rig, write_outputs};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Error that stops a build before any rig is rendered.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Discover and build every rig of a project.
pub fn build_project(ctx: &BuildContext) -> Result<BuildReport, BuildError> {
    let start = Instant::now();
    let rigs = discover_rigs(&ctx.src_dir())?;
    if rigs.is_empty() {
        log::warn!("no rig files found under {}", ctx.src_dir().display());
    }

    let out_dir = ctx.out_dir();
    let results: Vec<RigResult> = rigs.par_iter().map(|path| build_rig(ctx, path, &out_dir)).collect();

    let mut report = BuildReport::new();
    for result in results {
        report.add_result(result);
    }
    report.total_duration = start.elapsed();
    Ok(report)
}

/// Render one rig file and write its outputs.
pub fn build_rig(ctx: &BuildContext, path: &Path, out_dir: &Path) -> RigResult {
    let start = Instant::now();
    log::info!("building {}", path.display());

    let outcome = render_rig(path, &ctx.render_options())
        .and_then(|rendered| Ok((write_outputs(&rendered, out_dir, &ctx.output_options())?, rendered)));

    match outcome {
        Ok((outputs, rendered)) => {
            let warnings = rendered.warnings.iter().map(|w| format!("{}: {}", rendered.name, w)).collect();
            RigResult::success(path.to_path_buf(), outputs, start.elapsed()).with_warnings(warnings)
        }
        Err(e) => {
            log::error!("{}: {}", path.display(), e);
            RigResult::failed(path.to_path_buf(), e.to_string(), start.elapsed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use std::fs;
    use tempfile::TempDir;

    const GOOD: &str = r##"{
        "name": "blob",
        "size": [4, 4],
        "components": [{"name": "body", "size": [2, 2], "anchor": [1, 1],
                        "shapes": [{"type": "rect", "x": 0, "y": 0, "w": 2, "h": 2, "color": "#0F0"}]}],
        "animations": [{"name": "idle", "frames": [{}, {"poses": {"body": {"offset": [1, 0]}}}]}]
    }"##;

    fn project(rigs: &[(&str, &str)]) -> (TempDir, BuildContext) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("rigs")).unwrap();
        for (name, contents) in rigs {
            fs::write(temp.path().join("rigs").join(name), contents).unwrap();
        }
        let ctx = BuildContext::new(default_config(), temp.path().to_path_buf());
        (temp, ctx)
    }

    #[test]
    fn test_build_project_writes_outputs() {
        let (temp, ctx) = project(&[("blob.rig.json", GOOD)]);
        let report = build_project(&ctx).unwrap();

        assert!(report.is_success(), "{}", report.summary());
        assert!(temp.path().join("build/blob_idle.png").exists());
        assert!(temp.path().join("build/blob_idle.json").exists());
    }

    #[test]
    fn test_failing_rig_does_not_stop_others() {
        let (temp, ctx) = project(&[("blob.rig.json", GOOD), ("broken.rig.json", "{ not json")]);
        let report = build_project(&ctx).unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.failures()[0].path.ends_with("broken.rig.json"));
        assert!(temp.path().join("build/blob_idle.png").exists());
    }

    #[test]
    fn test_missing_source_dir_is_error() {
        let temp = TempDir::new().unwrap();
        let ctx = BuildContext::new(default_config(), temp.path().to_path_buf());
        assert!(matches!(build_project(&ctx), Err(BuildError::Discovery(_))));
    }
}
