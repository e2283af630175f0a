//! Inspect command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::animation::expand_frames;
use crate::models::{load_rig, ComponentDef, PaletteRef, Rig};
use crate::skeleton::{Skeleton, SkeletonError};

use super::{EXIT_ERROR, EXIT_SUCCESS};

fn describe_component(def: &ComponentDef, is_root: bool) -> String {
    let size = match (def.size, &def.source) {
        (Some([w, h]), _) => format!("{}x{}", w, h),
        (None, Some(source)) => source.display().to_string(),
        (None, None) => "?".to_string(),
    };
    let attach = if is_root { "anchor" } else { "joint" };
    let mut line = format!(
        "{} [{}] pivot ({}, {}) {} ({}, {}) z {}",
        def.name, size, def.pivot[0], def.pivot[1], attach, def.anchor[0], def.anchor[1], def.z
    );
    if def.opacity < 1.0 {
        line.push_str(&format!(" opacity {}", def.opacity));
    }
    line
}

/// The component tree, one indented line per component.
fn component_tree(rig: &Rig) -> Result<Vec<String>, SkeletonError> {
    let skeleton = Skeleton::new(&rig.components)?;
    let mut lines = Vec::with_capacity(skeleton.len());

    // Depth-first from each root, children in declaration order
    let mut stack: Vec<usize> =
        (0..skeleton.len()).rev().filter(|&i| skeleton.parent(i).is_none()).collect();
    while let Some(i) = stack.pop() {
        let depth = skeleton.depth(i);
        let def = &rig.components[i];
        lines.push(format!("{}{}", "  ".repeat(depth + 1), describe_component(def, depth == 0)));
        stack.extend((0..skeleton.len()).rev().filter(|&c| skeleton.parent(c) == Some(i)));
    }
    Ok(lines)
}

fn animation_lines(rig: &Rig) -> Vec<String> {
    rig.animations
        .iter()
        .map(|anim| {
            let frames = expand_frames(anim).len();
            let mut line = format!("  {}: {} keyframe(s), {} frame(s)", anim.name, anim.frames.len(), frames);
            if anim.tween > 0 {
                line.push_str(&format!(" (tween {})", anim.tween));
            }
            line.push_str(&format!(", {} fps", anim.fps));
            if anim.looping {
                line.push_str(", loop");
            }
            line
        })
        .collect()
}

/// Execute the inspect command
pub fn run_inspect(rig_path: &Path) -> ExitCode {
    let rig = match load_rig(rig_path) {
        Ok(rig) => rig,
        Err(e) => {
            eprintln!("Error: {}: {}", rig_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let tree = match component_tree(&rig) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: rig '{}': {}", rig.name, e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let palette = match &rig.palette {
        PaletteRef::Named(name) => name.clone(),
        PaletteRef::Inline(entries) => format!("inline, {} token(s)", entries.len()),
    };
    println!("Rig: {} ({}x{}, palette {})", rig.name, rig.size[0], rig.size[1], palette);
    println!("Components:");
    for line in tree {
        println!("{}", line);
    }
    println!("Animations:");
    if rig.animations.is_empty() {
        println!("  (none, renders the rest pose)");
    }
    for line in animation_lines(&rig) {
        println!("{}", line);
    }
    ExitCode::from(EXIT_SUCCESS)
}
