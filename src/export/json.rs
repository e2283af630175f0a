//! Generic JSON export format.
//!
//! Each sheet gets a metadata file next to its PNG, named after the image
//! (`miner_dig.png` gets `miner_dig.json`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "image": "miner_dig.png",
//!   "animation": "dig",
//!   "size": [96, 32],
//!   "frame_size": [32, 32],
//!   "fps": 12,
//!   "loop": true,
//!   "origin": [16.5, 28.5],
//!   "frames": [
//!     { "x": 0, "y": 0, "w": 32, "h": 32, "duration": 1.0, "duration_ms": 83 }
//!   ]
//! }
//! ```

use crate::export::{write_file, Exporter, Result, RigMetadata, SheetMetadata};
use std::path::{Path, PathBuf};

/// JSON format exporter.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize one sheet's metadata.
    pub fn export_to_string(&self, sheet: &SheetMetadata) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(sheet)?
        } else {
            serde_json::to_string(sheet)?
        };
        Ok(json)
    }

    /// Metadata file name for a sheet image.
    pub fn metadata_name(image: &str) -> String {
        let stem = Path::new(image).file_stem().and_then(|s| s.to_str()).unwrap_or(image);
        format!("{}.json", stem)
    }
}

impl Exporter for JsonExporter {
    fn export(&self, rig: &RigMetadata, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(rig.sheets.len());
        for sheet in &rig.sheets {
            let path = output_dir.join(Self::metadata_name(&sheet.image));
            write_file(&path, &self.export_to_string(sheet)?)?;
            log::debug!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn format_name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
