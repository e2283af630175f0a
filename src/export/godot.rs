//! Godot engine export format.
//!
//! Writes one `SpriteFrames` resource per rig, usable directly by an
//! `AnimatedSprite2D`. Each sheet is referenced once as a `Texture2D` and
//! every frame is an `AtlasTexture` sub-resource cut from it:
//!
//! ```text
//! [gd_resource type="SpriteFrames" load_steps=4 format=3]
//!
//! [ext_resource type="Texture2D" path="res://sprites/miner_dig.png" id="1_dig"]
//!
//! [sub_resource type="AtlasTexture" id="AtlasTexture_dig_0"]
//! atlas = ExtResource("1_dig")
//! region = Rect2(0, 0, 32, 32)
//!
//! [resource]
//! animations = [{
//! "frames": [{
//! "duration": 1.0,
//! "texture": SubResource("AtlasTexture_dig_0")
//! }],
//! "loop": true,
//! "name": &"dig",
//! "speed": 12.0
//! }]
//! ```

use crate::export::{write_file, Exporter, Result, RigMetadata};
use std::path::{Path, PathBuf};

/// Godot format exporter.
#[derive(Debug, Clone)]
pub struct GodotExporter {
    /// Resource path prefix of the sheet images (e.g. "res://sprites")
    resource_path: String,
}

impl Default for GodotExporter {
    fn default() -> Self {
        Self { resource_path: "res://sprites".to_string() }
    }
}

impl GodotExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_path(mut self, path: &str) -> Self {
        self.resource_path = path.trim_end_matches('/').to_string();
        self
    }

    /// Generate the `SpriteFrames` resource text for a rig.
    pub fn sprite_frames(&self, rig: &RigMetadata) -> String {
        let sub_count: usize = rig.sheets.iter().map(|s| s.frames.len()).sum();
        let load_steps = 1 + rig.sheets.len() + sub_count;

        let mut lines = Vec::new();
        lines.push(format!("[gd_resource type=\"SpriteFrames\" load_steps={} format=3]", load_steps));
        lines.push(String::new());

        let ext_ids: Vec<String> = rig
            .sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| format!("{}_{}", i + 1, resource_id(&sheet.animation)))
            .collect();

        for (sheet, id) in rig.sheets.iter().zip(&ext_ids) {
            lines.push(format!(
                "[ext_resource type=\"Texture2D\" path=\"{}/{}\" id=\"{}\"]",
                self.resource_path,
                escape(&sheet.image),
                id
            ));
        }
        lines.push(String::new());

        for (sheet, ext_id) in rig.sheets.iter().zip(&ext_ids) {
            for (i, frame) in sheet.frames.iter().enumerate() {
                lines.push(format!(
                    "[sub_resource type=\"AtlasTexture\" id=\"{}\"]",
                    atlas_id(&sheet.animation, i)
                ));
                lines.push(format!("atlas = ExtResource(\"{}\")", ext_id));
                lines.push(format!("region = Rect2({}, {}, {}, {})", frame.x, frame.y, frame.w, frame.h));
                lines.push(String::new());
            }
        }

        lines.push("[resource]".to_string());
        let animations: Vec<String> = rig
            .sheets
            .iter()
            .map(|sheet| {
                let frames: Vec<String> = sheet
                    .frames
                    .iter()
                    .enumerate()
                    .map(|(i, frame)| {
                        format!(
                            "{{\n\"duration\": {},\n\"texture\": SubResource(\"{}\")\n}}",
                            godot_float(frame.duration),
                            atlas_id(&sheet.animation, i)
                        )
                    })
                    .collect();
                format!(
                    "{{\n\"frames\": [{}],\n\"loop\": {},\n\"name\": &\"{}\",\n\"speed\": {}\n}}",
                    frames.join(", "),
                    sheet.looping,
                    escape(&sheet.animation),
                    godot_float(sheet.fps as f64)
                )
            })
            .collect();
        lines.push(format!("animations = [{}]", animations.join(", ")));
        lines.push(String::new());

        lines.join("\n")
    }
}

impl Exporter for GodotExporter {
    fn export(&self, rig: &RigMetadata, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = output_dir.join(format!("{}.{}", rig.rig, self.extension()));
        write_file(&path, &self.sprite_frames(rig))?;
        log::debug!("wrote {}", path.display());
        Ok(vec![path])
    }

    fn format_name(&self) -> &'static str {
        "godot"
    }

    fn extension(&self) -> &'static str {
        "tres"
    }
}

fn atlas_id(animation: &str, index: usize) -> String {
    format!("AtlasTexture_{}_{}", resource_id(animation), index)
}

/// Resource ids may only hold identifier characters.
fn resource_id(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Godot wants a decimal point on float literals.
fn godot_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}
