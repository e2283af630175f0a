//! Layered frame assembly.
//!
//! Each visible component is optionally mirrored and then rotated about its
//! pivot. It is positioned so the rotated pivot lands on its solved anchor
//! and alpha-composited onto the frame in z-order.

use crate::animation::ResolvedFrame;
use crate::color::TRANSPARENT;
use crate::component::ComponentImage;
use crate::models::{Pose, Rig};
use crate::rotate::{flip_horizontal, rotate_about_pivot};
use crate::skeleton::{Skeleton, SkeletonError};
use crate::warning::Warning;
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;

/// Pixel counts from a single blit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlitStats {
    /// Visible layer pixels written to the canvas
    pub drawn: u32,
    /// Visible layer pixels that fell outside the canvas
    pub clipped: u32,
}

/// Composite `layer` over `canvas` with its top-left at `(x, y)`.
///
/// Offsets may be negative; whatever falls outside the canvas is clipped.
/// `opacity` scales the layer's alpha, and only pixels still visible after
/// that are drawn or counted as clipped.
pub fn blit(canvas: &mut RgbaImage, layer: &RgbaImage, x: i32, y: i32, opacity: f64) -> BlitStats {
    let opacity = opacity.clamp(0.0, 1.0) as f32;
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let mut stats = BlitStats::default();

    for (lx, ly, src) in layer.enumerate_pixels() {
        let src_alpha = (src[3] as f32 / 255.0) * opacity;
        // Below half a step of alpha the pixel would not show
        if src_alpha * 255.0 < 0.5 {
            continue;
        }
        let (dx, dy) = (x as i64 + lx as i64, y as i64 + ly as i64);
        if dx < 0 || dy < 0 || dx >= cw || dy >= ch {
            stats.clipped += 1;
            continue;
        }

        let dst = canvas.get_pixel(dx as u32, dy as u32);
        let out = blend_over(src, dst, src_alpha);
        canvas.put_pixel(dx as u32, dy as u32, out);
        stats.drawn += 1;
    }

    stats
}

/// Porter-Duff "source over" with an explicit source alpha.
pub fn blend_over(src: &Rgba<u8>, dst: &Rgba<u8>, src_alpha: f32) -> Rgba<u8> {
    if src_alpha >= 1.0 {
        return Rgba([src[0], src[1], src[2], 255]);
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return TRANSPARENT;
    }

    let channel = |s: u8, d: u8| -> u8 {
        let (s, d) = (s as f32 / 255.0, d as f32 / 255.0);
        let c = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[derive(Debug, Clone)]
struct Layer {
    name: String,
    image: RgbaImage,
    z: i32,
    opacity: f64,
}

/// Renders frames of one rig. Owns everything it needs so frames can be
/// rendered from several threads at once.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    skeleton: Skeleton,
    layers: Vec<Layer>,
    frame_size: (u32, u32),
}

impl FrameRenderer {
    /// `components` must be in the rig's component order.
    pub fn new(rig: &Rig, components: Vec<ComponentImage>) -> Result<Self, SkeletonError> {
        let skeleton = Skeleton::new(&rig.components)?;
        let layers = rig
            .components
            .iter()
            .zip(components)
            .map(|(def, c)| Layer { name: c.name, image: c.image, z: def.z, opacity: def.opacity })
            .collect();
        Ok(Self { skeleton, layers, frame_size: rig.frame_size() })
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    /// Render one frame from per-component poses (missing = rest pose).
    pub fn render(&self, poses: &BTreeMap<String, Pose>) -> (RgbaImage, Vec<Warning>) {
        let indexed: Vec<Pose> = self
            .layers
            .iter()
            .map(|l| poses.get(&l.name).cloned().unwrap_or_default())
            .collect();
        let placements = self.skeleton.solve(&indexed);

        // Stable sort keeps declaration order among equal z
        let mut draw_order: Vec<usize> =
            (0..self.layers.len()).filter(|&i| indexed[i].visible).collect();
        draw_order.sort_by_key(|&i| indexed[i].z.unwrap_or(self.layers[i].z));

        let (w, h) = self.frame_size;
        let mut canvas = RgbaImage::from_pixel(w, h, TRANSPARENT);
        let mut warnings = Vec::new();

        for i in draw_order {
            let layer = &self.layers[i];
            let placement = &placements[i];
            let rotated = if indexed[i].flip_h {
                let flipped = flip_horizontal(&layer.image, placement.pivot);
                rotate_about_pivot(&flipped.image, flipped.pivot, placement.angle)
            } else {
                rotate_about_pivot(&layer.image, placement.pivot, placement.angle)
            };
            let (x, y) = rotated.top_left_for(placement.anchor);
            let stats = blit(&mut canvas, &rotated.image, x, y, layer.opacity);
            log::trace!("{} at ({}, {}) angle {:.1}: {:?}", layer.name, x, y, placement.angle, stats);

            if stats.clipped > 0 {
                warnings.push(Warning::for_component(
                    &layer.name,
                    format!("{} pixel(s) fall outside the {}x{} frame", stats.clipped, w, h),
                ));
            }
        }

        (canvas, warnings)
    }

    pub fn render_frame(&self, frame: &ResolvedFrame) -> (RgbaImage, Vec<Warning>) {
        self.render(&frame.poses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::build_components;
    use crate::models::{parse_rig, RigFormat};
    use crate::palettes::get_builtin;
    use std::path::Path;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// Body 3x3 pinned at frame (5,5); a 1x4 arm hanging from the body's
    /// center pixel; a 1x1 "hand" marker at the arm's tip.
    const RIG: &str = r##"{
        "name": "test",
        "size": [11, 11],
        "components": [
            {"name": "body", "size": [3, 3], "pivot": [1, 1], "anchor": [5, 5], "z": 0,
             "shapes": [{"type": "rect", "x": 0, "y": 0, "w": 3, "h": 3, "color": "#F00"}]},
            {"name": "arm", "size": [1, 4], "pivot": [0, 0], "parent": "body", "anchor": [1, 1], "z": 1,
             "shapes": [{"type": "rect", "x": 0, "y": 0, "w": 1, "h": 4, "color": "#00F"}]},
            {"name": "hand", "size": [1, 1], "pivot": [0, 0], "parent": "arm", "anchor": [0, 3], "z": 2,
             "shapes": [{"type": "pixel", "x": 0, "y": 0, "color": "#0F0"}]}
        ]
    }"##;

    fn renderer() -> FrameRenderer {
        let rig = parse_rig(RIG, RigFormat::Json).unwrap();
        let palette = get_builtin("grayscale").unwrap();
        let (components, _) = build_components(&rig, &palette, Path::new(".")).unwrap();
        FrameRenderer::new(&rig, components).unwrap()
    }

    fn pose(angle: f64) -> Pose {
        Pose { angle, ..Pose::default() }
    }

    #[test]
    fn test_blit_clips_negative_offsets() {
        let mut canvas = RgbaImage::from_pixel(2, 2, TRANSPARENT);
        let layer = RgbaImage::from_pixel(2, 2, RED);
        let stats = blit(&mut canvas, &layer, -1, 1, 1.0);
        assert_eq!(stats, BlitStats { drawn: 1, clipped: 3 });
        assert_eq!(*canvas.get_pixel(0, 1), RED);
        assert_eq!(*canvas.get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_blit_counts_only_visible_clipped_pixels() {
        let mut canvas = RgbaImage::from_pixel(1, 1, TRANSPARENT);
        let mut layer = RgbaImage::from_pixel(3, 1, RED);
        layer.put_pixel(1, 0, Rgba([255, 0, 0, 1]));
        layer.put_pixel(2, 0, TRANSPARENT);

        // Faint pixel survives at full opacity
        assert_eq!(blit(&mut canvas, &layer, -1, 0, 1.0), BlitStats { drawn: 1, clipped: 1 });
        // At 10% it rounds to nothing, so only the solid pixel is clipped
        let mut canvas = RgbaImage::from_pixel(1, 1, TRANSPARENT);
        assert_eq!(blit(&mut canvas, &layer, 1, 0, 0.1), BlitStats { drawn: 0, clipped: 1 });
        // A hidden layer clips nothing
        assert_eq!(blit(&mut canvas, &layer, 5, 5, 0.0), BlitStats::default());
    }

    #[test]
    fn test_blit_skips_transparent_pixels() {
        let mut canvas = RgbaImage::from_pixel(2, 1, BLUE);
        let mut layer = RgbaImage::from_pixel(2, 1, RED);
        layer.put_pixel(1, 0, TRANSPARENT);
        blit(&mut canvas, &layer, 0, 0, 1.0);
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(1, 0), BLUE);
    }

    #[test]
    fn test_blend_over_half_opacity() {
        let out = blend_over(&RED, &BLUE, 0.5);
        assert_eq!(out, Rgba([128, 0, 128, 255]));
        let over_empty = blend_over(&RED, &TRANSPARENT, 0.5);
        assert_eq!(over_empty, Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn test_rest_pose_layout() {
        let (frame, warnings) = renderer().render(&BTreeMap::new());
        assert!(warnings.is_empty());
        // body occupies 4..=6; arm covers the body center downward
        assert_eq!(*frame.get_pixel(4, 4), RED);
        assert_eq!(*frame.get_pixel(5, 5), BLUE);
        assert_eq!(*frame.get_pixel(5, 7), BLUE);
        // hand at the arm tip: arm pivot (5,5) + 3
        assert_eq!(*frame.get_pixel(5, 8), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_arm_rotation_keeps_shoulder_and_moves_hand() {
        let mut poses = BTreeMap::new();
        poses.insert("arm".to_string(), pose(-90.0));
        let (frame, _) = renderer().render(&poses);

        // Shoulder stays put, arm now extends to the right
        assert_eq!(*frame.get_pixel(5, 5), BLUE);
        assert_eq!(*frame.get_pixel(7, 5), BLUE);
        assert_eq!(*frame.get_pixel(5, 7), TRANSPARENT);
        assert_eq!(*frame.get_pixel(8, 5), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_hidden_component_and_z_override() {
        let mut poses = BTreeMap::new();
        poses.insert("hand".to_string(), Pose { visible: false, ..Pose::default() });
        poses.insert("arm".to_string(), Pose { z: Some(-1), ..Pose::default() });
        let (frame, _) = renderer().render(&poses);

        // arm tip shows where the hand was
        assert_eq!(*frame.get_pixel(5, 8), BLUE);
        // arm now under the body
        assert_eq!(*frame.get_pixel(5, 5), RED);
        assert_eq!(*frame.get_pixel(5, 7), BLUE);
    }

    #[test]
    fn test_flip_mirrors_about_pivot() {
        let rig = parse_rig(
            r##"{"name": "f", "size": [5, 5], "components": [
                {"name": "flag", "size": [3, 1], "pivot": [0, 0], "anchor": [2, 2],
                 "shapes": [{"type": "rect", "x": 0, "y": 0, "w": 3, "h": 1, "color": "#F00"}]}
            ]}"##,
            RigFormat::Json,
        )
        .unwrap();
        let palette = get_builtin("grayscale").unwrap();
        let (components, _) = build_components(&rig, &palette, Path::new(".")).unwrap();
        let renderer = FrameRenderer::new(&rig, components).unwrap();

        let (rest, _) = renderer.render(&BTreeMap::new());
        assert_eq!(*rest.get_pixel(4, 2), RED);
        assert_eq!(*rest.get_pixel(0, 2), TRANSPARENT);

        let mut poses = BTreeMap::new();
        poses.insert("flag".to_string(), Pose { flip_h: true, ..Pose::default() });
        let (flipped, _) = renderer.render(&poses);
        assert_eq!(*flipped.get_pixel(0, 2), RED);
        assert_eq!(*flipped.get_pixel(2, 2), RED);
        assert_eq!(*flipped.get_pixel(4, 2), TRANSPARENT);
    }

    #[test]
    fn test_clipping_warns() {
        let mut poses = BTreeMap::new();
        poses.insert("body".to_string(), Pose { offset: [-5.0, 0.0], ..Pose::default() });
        let (_, warnings) = renderer().render(&poses);
        assert!(warnings.iter().any(|w| w.component == "body"));
    }
}
