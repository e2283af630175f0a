//! Rig file discovery for the build system.

use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Patterns (relative to the source directory) that select rig files.
pub const RIG_PATTERNS: &[&str] = &["**/*.rig.json", "**/*.rig.json5"];

/// Error during rig discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("source directory '{0}' does not exist")]
    MissingSourceDir(PathBuf),
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Discover files under `base_dir` matching a glob pattern, sorted.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let full_pattern = base_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let paths = glob(&pattern_str)
        .map_err(|source| DiscoveryError::InvalidPattern { pattern: pattern.to_string(), source })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("error reading path: {}", e),
        }
    }

    files.sort();
    Ok(files)
}

/// Discover every rig file under `src_dir`.
pub fn discover_rigs(src_dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !src_dir.is_dir() {
        return Err(DiscoveryError::MissingSourceDir(src_dir.to_path_buf()));
    }

    let mut all = BTreeSet::new();
    for pattern in RIG_PATTERNS {
        all.extend(discover_files(src_dir, pattern)?);
    }
    log::debug!("found {} rig file(s) under {}", all.len(), src_dir.display());
    Ok(all.into_iter().collect())
}
