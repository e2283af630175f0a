//! Component generation: source images plus painted shapes.

use crate::color::TRANSPARENT;
use crate::draw::paint_shapes;
use crate::geometry::Vec2;
use crate::models::{ComponentDef, Rig};
use crate::palettes::{Palette, PaletteError};
use crate::warning::Warning;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error building a component image.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("component '{component}': cannot load source '{path}': {source}")]
    Source {
        component: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("component '{component}': {source}")]
    Palette {
        component: String,
        #[source]
        source: PaletteError,
    },
    #[error("component '{component}' has neither a source image nor a size")]
    NoCanvas { component: String },
    #[error("component '{component}': source is {}x{} but size is {}x{}", actual.0, actual.1, declared.0, declared.1)]
    SizeMismatch { component: String, actual: (u32, u32), declared: (u32, u32) },
}

/// A component ready to be posed: its pixels and its pivot.
#[derive(Debug, Clone)]
pub struct ComponentImage {
    pub name: String,
    pub image: RgbaImage,
    pub pivot: Vec2,
}

/// Build one component image.
///
/// The canvas is the source PNG (resolved against `base_dir`) or a
/// transparent canvas of the declared size; shapes are painted on top.
pub fn build_component(
    def: &ComponentDef,
    palette: &Palette,
    base_dir: &Path,
) -> Result<(ComponentImage, Vec<Warning>), ComponentError> {
    let mut canvas = match (&def.source, def.size) {
        (Some(relative), declared) => {
            let path = base_dir.join(relative);
            let image = image::open(&path)
                .map_err(|source| ComponentError::Source {
                    component: def.name.clone(),
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            if let Some([w, h]) = declared {
                if image.dimensions() != (w, h) {
                    return Err(ComponentError::SizeMismatch {
                        component: def.name.clone(),
                        actual: image.dimensions(),
                        declared: (w, h),
                    });
                }
            }
            log::debug!("component '{}': loaded {}", def.name, path.display());
            image
        }
        (None, Some([w, h])) => RgbaImage::from_pixel(w, h, TRANSPARENT),
        (None, None) => return Err(ComponentError::NoCanvas { component: def.name.clone() }),
    };

    paint_shapes(&mut canvas, &def.shapes, palette).map_err(|source| {
        ComponentError::Palette { component: def.name.clone(), source }
    })?;

    let mut warnings = Vec::new();
    let pivot = def.pivot_point();
    let (w, h) = canvas.dimensions();
    if pivot.x < 0.0 || pivot.y < 0.0 || pivot.x > w as f64 || pivot.y > h as f64 {
        warnings.push(Warning::for_component(
            &def.name,
            format!("pivot ({}, {}) lies outside the {}x{} image", def.pivot[0], def.pivot[1], w, h),
        ));
    }
    if canvas.pixels().all(|p| p[3] == 0) {
        warnings.push(Warning::for_component(&def.name, "image is fully transparent"));
    }

    Ok((ComponentImage { name: def.name.clone(), image: canvas, pivot }, warnings))
}

/// Build every component of a rig, in declaration order.
pub fn build_components(
    rig: &Rig,
    palette: &Palette,
    base_dir: &Path,
) -> Result<(Vec<ComponentImage>, Vec<Warning>), ComponentError> {
    let mut images = Vec::with_capacity(rig.components.len());
    let mut warnings = Vec::new();
    for def in &rig.components {
        let (image, mut w) = build_component(def, palette, base_dir)?;
        images.push(image);
        warnings.append(&mut w);
    }
    Ok((images, warnings))
}
