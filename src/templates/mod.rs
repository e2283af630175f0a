//! Starter files written by `digrig init`.

/// Rig written to `rigs/miner.rig.json` by `digrig init`.
pub const MINER_RIG: &str = include_str!("miner.rig.json");

const CONFIG_TEMPLATE: &str = include_str!("digrig.toml");

/// A starter `digrig.toml` for a project called `name`.
pub fn generate_config(name: &str) -> String {
    CONFIG_TEMPLATE.replace("{name}", &name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::models::{parse_rig, RigFormat};
    use crate::pipeline::{render_loaded, RenderOptions};
    use std::path::Path;

    #[test]
    fn test_config_template_parses() {
        let config = parse_config(&generate_config("cave \"crew\"")).unwrap();
        assert_eq!(config.project.name, "cave \"crew\"");
        assert_eq!(config.defaults.scale, 2);
        assert!(config.preview.gif);
    }

    #[test]
    fn test_miner_rig_renders_cleanly() {
        let rig = parse_rig(MINER_RIG, RigFormat::Json).unwrap();
        let options = RenderOptions { animation: None, strict: true };
        let rendered = render_loaded(&rig, Path::new("."), &options).unwrap();

        let names: Vec<&str> = rendered.animations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["idle", "dig"]);
        // Looping, so the last keyframe also tweens back to the first
        assert_eq!(rendered.animations[1].frames.len(), 9);
    }
}
