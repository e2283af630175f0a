//! End-to-end rendering of a rig file into sheets, metadata and previews.

use crate::animation::{expand_frames, ResolvedFrame};
use crate::component::{build_components, ComponentError};
use crate::compose::FrameRenderer;
use crate::export::{
    ExportError, Exporter, FrameMetadata, GodotExporter, JsonExporter, RigMetadata, SheetMetadata,
};
use crate::geometry::Vec2;
use crate::gif::render_gif;
use crate::models::{load_rig, AnimationDef, FrameDef, Rig, RigError};
use crate::output::{save_png, scale_image, sheet_output_path, OutputError};
use crate::palettes::{resolve_palette, PaletteError};
use crate::skeleton::SkeletonError;
use crate::spritesheet::{pack_sheet, SheetError, SheetOptions};
use crate::warning::Warning;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single-frame animation rendered for rigs without animations.
pub const REST_ANIMATION: &str = "rest";

/// Error rendering a rig or writing its outputs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Rig(#[from] RigError),
    #[error("rig '{rig}': {source}")]
    Palette {
        rig: String,
        #[source]
        source: PaletteError,
    },
    #[error("rig '{rig}': {source}")]
    Component {
        rig: String,
        #[source]
        source: ComponentError,
    },
    #[error("rig '{rig}': {source}")]
    Skeleton {
        rig: String,
        #[source]
        source: SkeletonError,
    },
    #[error("rig '{rig}' has no animation named '{name}'")]
    UnknownAnimation { rig: String, name: String },
    #[error("animation '{animation}' has {count} frame(s), index {index} is out of range")]
    FrameIndex { animation: String, index: usize, count: usize },
    #[error("rig '{rig}' produced {} warning(s) in strict mode:\n{}", .warnings.len(), .warnings.iter().map(|w| format!("  - {}", w)).collect::<Vec<_>>().join("\n"))]
    Strict { rig: String, warnings: Vec<Warning> },
    #[error("rig '{rig}', animation '{animation}': {source}")]
    Sheet {
        rig: String,
        animation: String,
        #[source]
        source: SheetError,
    },
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What to render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render only this animation
    pub animation: Option<String>,
    /// Fail on any warning
    pub strict: bool,
}

/// One rendered frame with its timing.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbaImage,
    pub duration: f64,
    pub duration_ms: u32,
    pub tweened: bool,
}

#[derive(Debug, Clone)]
pub struct RenderedAnimation {
    pub name: String,
    pub fps: u32,
    pub looping: bool,
    pub frames: Vec<RenderedFrame>,
}

/// Every rendered animation of a rig, plus what went wrong along the way.
#[derive(Debug, Clone)]
pub struct RenderedRig {
    pub name: String,
    pub frame_size: (u32, u32),
    /// Anchor of the first root component, in frame pixels
    pub origin: Vec2,
    pub animations: Vec<RenderedAnimation>,
    pub warnings: Vec<Warning>,
}

/// How rendered rigs are written to disk.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub sheet: SheetOptions,
    /// Integer upscale of sheets and metadata rectangles
    pub scale: u8,
    pub gif: bool,
    pub gif_scale: u8,
    /// Godot resource path; `None` skips the `.tres` export
    pub godot: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { sheet: SheetOptions::default(), scale: 1, gif: false, gif_scale: 1, godot: None }
    }
}

/// Build the frame renderer for a loaded rig.
///
/// Component sources resolve against `base_dir`. Returns the warnings raised
/// while building components.
pub fn prepare_renderer(rig: &Rig, base_dir: &Path) -> Result<(FrameRenderer, Vec<Warning>), PipelineError> {
    let palette = resolve_palette(&rig.palette, &rig.name)
        .map_err(|source| PipelineError::Palette { rig: rig.name.clone(), source })?;
    let (components, warnings) = build_components(rig, &palette, base_dir)
        .map_err(|source| PipelineError::Component { rig: rig.name.clone(), source })?;
    let renderer = FrameRenderer::new(rig, components)
        .map_err(|source| PipelineError::Skeleton { rig: rig.name.clone(), source })?;
    Ok((renderer, warnings))
}

/// Load and render a rig file.
pub fn render_rig(path: &Path, options: &RenderOptions) -> Result<RenderedRig, PipelineError> {
    let rig = load_rig(path)?;
    render_loaded(&rig, base_dir_of(path), options)
}

/// Render an already loaded rig.
pub fn render_loaded(
    rig: &Rig,
    base_dir: &Path,
    options: &RenderOptions,
) -> Result<RenderedRig, PipelineError> {
    let (renderer, mut warnings) = prepare_renderer(rig, base_dir)?;

    let rest = rest_animation();
    let selected: Vec<&AnimationDef> = match &options.animation {
        Some(name) => vec![rig.animation(name).ok_or_else(|| PipelineError::UnknownAnimation {
            rig: rig.name.clone(),
            name: name.clone(),
        })?],
        None if rig.animations.is_empty() => vec![&rest],
        None => rig.animations.iter().collect(),
    };

    let mut animations = Vec::with_capacity(selected.len());
    for anim in selected {
        let (rendered, mut anim_warnings) = render_animation(&renderer, anim);
        log::info!("rig '{}': rendered '{}' ({} frames)", rig.name, anim.name, rendered.frames.len());
        warnings.append(&mut anim_warnings);
        animations.push(rendered);
    }

    if options.strict && !warnings.is_empty() {
        return Err(PipelineError::Strict { rig: rig.name.clone(), warnings });
    }
    for warning in &warnings {
        log::debug!("rig '{}': {}", rig.name, warning);
    }

    Ok(RenderedRig {
        name: rig.name.clone(),
        frame_size: rig.frame_size(),
        origin: root_origin(rig),
        animations,
        warnings,
    })
}

/// Render every frame of one animation, in parallel.
///
/// Frame warnings are tagged with the animation and frame index.
pub fn render_animation(renderer: &FrameRenderer, anim: &AnimationDef) -> (RenderedAnimation, Vec<Warning>) {
    let resolved = expand_frames(anim);
    let rendered: Vec<(RenderedFrame, Vec<Warning>)> = resolved
        .par_iter()
        .map(|frame| {
            let (image, warnings) = renderer.render_frame(frame);
            (rendered_frame(image, frame, anim.fps), warnings)
        })
        .collect();

    let mut frames = Vec::with_capacity(rendered.len());
    let mut warnings = Vec::new();
    for (index, (frame, frame_warnings)) in rendered.into_iter().enumerate() {
        warnings.extend(frame_warnings.into_iter().map(|w| Warning {
            message: format!("animation '{}' frame {}: {}", anim.name, index, w.message),
            ..w
        }));
        frames.push(frame);
    }

    let animation = RenderedAnimation { name: anim.name.clone(), fps: anim.fps, looping: anim.looping, frames };
    (animation, warnings)
}

/// Render a single frame (after tween expansion) of a rig file.
pub fn render_single_frame(
    path: &Path,
    animation: Option<&str>,
    index: usize,
) -> Result<(Rig, RgbaImage, Vec<Warning>), PipelineError> {
    let rig = load_rig(path)?;
    let (renderer, mut warnings) = prepare_renderer(&rig, base_dir_of(path))?;

    let rest = rest_animation();
    let anim = match animation {
        Some(name) => rig.animation(name).ok_or_else(|| PipelineError::UnknownAnimation {
            rig: rig.name.clone(),
            name: name.to_string(),
        })?,
        None => rig.animations.first().unwrap_or(&rest),
    };

    let frames = expand_frames(anim);
    let frame = frames.get(index).ok_or_else(|| PipelineError::FrameIndex {
        animation: anim.name.clone(),
        index,
        count: frames.len(),
    })?;
    let (image, mut frame_warnings) = renderer.render_frame(frame);
    warnings.append(&mut frame_warnings);
    Ok((rig, image, warnings))
}

/// Write sheets, JSON metadata, and optionally Godot resources and GIF
/// previews for a rendered rig. Returns every file written.
pub fn write_outputs(
    rendered: &RenderedRig,
    out_dir: &Path,
    options: &OutputOptions,
) -> Result<Vec<PathBuf>, PipelineError> {
    let scale = options.scale.max(1) as u32;
    let mut written = Vec::new();
    let mut sheets = Vec::with_capacity(rendered.animations.len());

    for anim in &rendered.animations {
        let images: Vec<RgbaImage> = anim.frames.iter().map(|f| f.image.clone()).collect();
        let packed = pack_sheet(&images, &options.sheet).map_err(|source| PipelineError::Sheet {
            rig: rendered.name.clone(),
            animation: anim.name.clone(),
            source,
        })?;
        let sheet = scale_image(packed.image, options.scale);
        let sheet_path = sheet_output_path(out_dir, &rendered.name, &anim.name);
        save_png(&sheet, &sheet_path)?;
        written.push(sheet_path.clone());

        let frames = packed
            .cells
            .iter()
            .zip(&anim.frames)
            .map(|(cell, frame)| FrameMetadata {
                x: cell.x * scale,
                y: cell.y * scale,
                w: cell.w * scale,
                h: cell.h * scale,
                duration: frame.duration,
                duration_ms: frame.duration_ms,
                tweened: frame.tweened,
            })
            .collect();
        sheets.push(SheetMetadata {
            image: file_name(&sheet_path),
            animation: anim.name.clone(),
            size: [sheet.width(), sheet.height()],
            frame_size: [rendered.frame_size.0 * scale, rendered.frame_size.1 * scale],
            fps: anim.fps,
            looping: anim.looping,
            origin: [rendered.origin.x * scale as f64, rendered.origin.y * scale as f64],
            frames,
        });

        if options.gif {
            let gif_frames: Vec<RgbaImage> =
                images.into_iter().map(|img| scale_image(img, options.gif_scale)).collect();
            let durations: Vec<u32> = anim.frames.iter().map(|f| f.duration_ms).collect();
            let gif_path = sheet_path.with_extension("gif");
            render_gif(&gif_frames, &durations, anim.looping, &gif_path)?;
            written.push(gif_path);
        }
    }

    let metadata = RigMetadata { rig: rendered.name.clone(), sheets };
    written.extend(JsonExporter::new().export(&metadata, out_dir)?);
    if let Some(resource_path) = &options.godot {
        let exporter = GodotExporter::new().with_resource_path(resource_path);
        written.extend(exporter.export(&metadata, out_dir)?);
    }

    Ok(written)
}

fn rendered_frame(image: RgbaImage, frame: &ResolvedFrame, fps: u32) -> RenderedFrame {
    RenderedFrame { image, duration: frame.duration, duration_ms: frame.duration_ms(fps), tweened: frame.tweened }
}

fn rest_animation() -> AnimationDef {
    AnimationDef {
        name: REST_ANIMATION.to_string(),
        fps: 1,
        looping: false,
        tween: 0,
        frames: vec![FrameDef::default()],
    }
}

fn root_origin(rig: &Rig) -> Vec2 {
    rig.components
        .iter()
        .find(|c| c.parent.is_none())
        .map(|c| c.anchor_point())
        .unwrap_or(Vec2::ZERO)
}

fn base_dir_of(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
