//! Build result types.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single rig build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    Failed(String),
}

impl BuildStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of building one rig file.
#[derive(Debug, Clone)]
pub struct RigResult {
    pub path: PathBuf,
    pub status: BuildStatus,
    /// Files written
    pub outputs: Vec<PathBuf>,
    pub duration: Duration,
    pub warnings: Vec<String>,
}

impl RigResult {
    pub fn success(path: PathBuf, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { path, status: BuildStatus::Success, outputs, duration, warnings: vec![] }
    }

    pub fn failed(path: PathBuf, error: String, duration: Duration) -> Self {
        Self { path, status: BuildStatus::Failed(error), outputs: vec![], duration, warnings: vec![] }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub rigs: Vec<RigResult>,
    pub total_duration: Duration,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: RigResult) {
        self.rigs.push(result);
    }

    pub fn success_count(&self) -> usize {
        self.rigs.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.rigs.iter().filter(|r| r.status.is_failure()).count()
    }

    /// True when no rig failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.rigs.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    pub fn all_warnings(&self) -> Vec<&String> {
        self.rigs.iter().flat_map(|r| r.warnings.iter()).collect()
    }

    pub fn failures(&self) -> Vec<&RigResult> {
        self.rigs.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Human-readable summary of the build.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let (success, failed, total) = (self.success_count(), self.failed_count(), self.rigs.len());

        if failed > 0 {
            lines.push(format!("Build failed: {} succeeded, {} failed ({} total)", success, failed, total));
            for rig in self.failures() {
                lines.push(format!("  - {}: {}", rig.path.display(), rig.status));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} rig(s), {} file(s) in {:?}",
                total,
                self.all_outputs().len(),
                self.total_duration
            ));
        }

        let warnings = self.all_warnings();
        if !warnings.is_empty() {
            lines.push(format!("Warnings ({}):", warnings.len()));
            for warning in warnings.iter().take(5) {
                lines.push(format!("  - {}", warning));
            }
            if warnings.len() > 5 {
                lines.push(format!("  ... and {} more", warnings.len() - 5));
            }
        }

        lines.join("\n")
    }
}
