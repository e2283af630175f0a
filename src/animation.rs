//! Keyframe expansion: tweening and frame timing.

use crate::geometry::Vec2;
use crate::models::{AnimationDef, FrameDef, Pose};
use std::collections::{BTreeMap, BTreeSet};

/// A frame ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrame {
    pub poses: BTreeMap<String, Pose>,
    /// Relative hold time, in ticks of the animation's fps
    pub duration: f64,
    /// Index of the keyframe this frame was produced from
    pub keyframe: usize,
    /// True for interpolated in-between frames
    pub tweened: bool,
}

impl ResolvedFrame {
    /// Display time in milliseconds at the given fps.
    pub fn duration_ms(&self, fps: u32) -> u32 {
        (1000.0 * self.duration / fps.max(1) as f64).round() as u32
    }
}

/// Expand an animation's keyframes into the frames to render.
///
/// With `tween = N`, N linearly interpolated frames are inserted between
/// consecutive keyframes (and from the last back to the first when the
/// animation loops). Angles interpolate linearly without wrapping, so a
/// swing from -120° to 60° passes through 0°. Visibility, flips and z-order
/// come from the earlier keyframe. In-between frames last one tick.
///
/// # Examples
///
/// ```
/// use digrig::animation::expand_frames;
/// use digrig::models::AnimationDef;
///
/// let anim: AnimationDef = serde_json::from_str(r#"{
///     "name": "swing", "loop": false, "tween": 1,
///     "frames": [{"poses": {"arm": {"angle": 0}}}, {"poses": {"arm": {"angle": 90}}}]
/// }"#).unwrap();
///
/// let frames = expand_frames(&anim);
/// assert_eq!(frames.len(), 3);
/// assert_eq!(frames[1].poses["arm"].angle, 45.0);
/// ```
pub fn expand_frames(anim: &AnimationDef) -> Vec<ResolvedFrame> {
    let count = anim.frames.len();
    let mut frames = Vec::with_capacity(count * (anim.tween as usize + 1));

    for (i, frame) in anim.frames.iter().enumerate() {
        frames.push(ResolvedFrame {
            poses: frame.poses.clone(),
            duration: frame.duration,
            keyframe: i,
            tweened: false,
        });

        let has_next = i + 1 < count || (anim.looping && count > 1);
        if anim.tween == 0 || !has_next {
            continue;
        }

        let next = &anim.frames[(i + 1) % count];
        for step in 1..=anim.tween {
            let t = step as f64 / (anim.tween + 1) as f64;
            frames.push(ResolvedFrame {
                poses: interpolate_poses(frame, next, t),
                duration: 1.0,
                keyframe: i,
                tweened: true,
            });
        }
    }

    frames
}

fn interpolate_poses(from: &FrameDef, to: &FrameDef, t: f64) -> BTreeMap<String, Pose> {
    let rest = Pose::default();
    let names: BTreeSet<&String> = from.poses.keys().chain(to.poses.keys()).collect();

    names
        .into_iter()
        .map(|name| {
            let a = from.poses.get(name).unwrap_or(&rest);
            let b = to.poses.get(name).unwrap_or(&rest);
            (name.clone(), interpolate_pose(a, b, t))
        })
        .collect()
}

fn interpolate_pose(a: &Pose, b: &Pose, t: f64) -> Pose {
    let offset = Vec2::from(a.offset).lerp(Vec2::from(b.offset), t);
    Pose {
        angle: a.angle + (b.angle - a.angle) * t,
        offset: [offset.x, offset.y],
        visible: a.visible,
        flip_h: a.flip_h,
        z: a.z,
    }
}
