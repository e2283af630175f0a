//! Animation, frame and pose definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_fps() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

fn default_duration() -> f64 {
    1.0
}

/// A named animation made of keyframes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationDef {
    pub name: String,
    /// Playback speed in frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(rename = "loop", default = "default_true")]
    pub looping: bool,
    /// Number of interpolated frames inserted between consecutive keyframes
    #[serde(default)]
    pub tween: u32,
    pub frames: Vec<FrameDef>,
}

/// One keyframe: a pose per component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameDef {
    /// Relative hold time (1.0 = one tick at the animation's fps)
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Component name → pose. Components without an entry keep the rest pose.
    #[serde(default)]
    pub poses: BTreeMap<String, Pose>,
}

impl Default for FrameDef {
    fn default() -> Self {
        Self { duration: default_duration(), poses: BTreeMap::new() }
    }
}

/// How one component is posed within a frame.
///
/// # Examples
///
/// ```
/// use digrig::models::Pose;
///
/// let pose: Pose = serde_json::from_str(r#"{"angle": -45}"#).unwrap();
/// assert_eq!(pose.angle, -45.0);
/// assert!(pose.visible);
/// assert_eq!(pose.offset, [0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    /// Rotation in degrees relative to the parent, clockwise
    #[serde(default)]
    pub angle: f64,
    /// Frame-space translation applied to the joint `[dx, dy]`
    #[serde(default)]
    pub offset: [f64; 2],
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Mirror the component's own pixels about its pivot column
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flip_h: bool,
    /// Overrides the component's z-order for this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self { angle: 0.0, offset: [0.0, 0.0], visible: true, flip_h: false, z: None }
    }
}
