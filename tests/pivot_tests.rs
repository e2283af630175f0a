//! Pivot preservation tests
//!
//! A rotated component must stay attached: for every angle, the pixel under
//! a joint's anchor belongs to the child's pivot region, and grandchildren
//! follow the rotated joint.

use digrig::compose::FrameRenderer;
use digrig::geometry::Vec2;
use digrig::models::{parse_rig, Pose, RigFormat};
use digrig::pipeline::prepare_renderer;
use digrig::rotate::rotate_about_pivot;
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::path::Path;

const JOINT: Rgba<u8> = Rgba([255, 255, 0, 255]);
const ARM: Rgba<u8> = Rgba([0, 0, 255, 255]);
const HAND: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Body with an arm whose 3x3 shoulder block surrounds its pivot, and a 3x3
/// hand centered on the end of the arm.
const SHOULDER_RIG: &str = r##"{
    name: "shoulder",
    size: [40, 40],
    palette: {body: "#FF0000", joint: "#FFFF00", arm: "#0000FF", hand: "#00FF00"},
    components: [
        {name: "body", size: [9, 9], pivot: [4, 4], anchor: [20, 20],
         shapes: [{type: "rect", x: 0, y: 0, w: 9, h: 9, color: "body"}]},
        {name: "arm", parent: "body", size: [3, 10], pivot: [1, 1], anchor: [4, 4], z: 1,
         shapes: [
            {type: "rect", x: 0, y: 0, w: 3, h: 10, color: "arm"},
            {type: "rect", x: 0, y: 0, w: 3, h: 3, color: "joint"},
         ]},
        {name: "hand", parent: "arm", size: [3, 3], pivot: [1, 1], anchor: [1, 9], z: 2,
         shapes: [{type: "rect", x: 0, y: 0, w: 3, h: 3, color: "hand"}]},
    ],
}"##;

fn renderer() -> FrameRenderer {
    let rig = parse_rig(SHOULDER_RIG, RigFormat::Json5).unwrap();
    let (renderer, warnings) = prepare_renderer(&rig, Path::new(".")).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);
    renderer
}

fn arm_pose(angle: f64) -> BTreeMap<String, Pose> {
    BTreeMap::from([("arm".to_string(), Pose { angle, ..Pose::default() })])
}

fn block_image() -> (RgbaImage, Vec2) {
    let mut image = RgbaImage::from_pixel(7, 5, ARM);
    for y in 1..4 {
        for x in 2..5 {
            image.put_pixel(x, y, JOINT);
        }
    }
    (image, Vec2::pixel_center(3.0, 2.0))
}

#[test]
fn test_rotated_pivot_pixel_keeps_its_color() {
    let (image, pivot) = block_image();
    for step in 0..72 {
        let degrees = step as f64 * 5.0 - 180.0;
        let rotated = rotate_about_pivot(&image, pivot, degrees);
        let (px, py) = (rotated.pivot.x.floor() as u32, rotated.pivot.y.floor() as u32);
        assert_eq!(*rotated.image.get_pixel(px, py), JOINT, "pivot lost at {} degrees", degrees);
    }
}

#[test]
fn test_shoulder_stays_on_anchor_at_every_angle() {
    let renderer = renderer();
    for step in 0..24 {
        let angle = step as f64 * 15.0 - 180.0;
        let (frame, warnings) = renderer.render(&arm_pose(angle));
        assert!(warnings.is_empty(), "{} degrees: {:?}", angle, warnings);
        // The arm's joint is the body's pivot pixel, which sits on (20, 20)
        assert_eq!(*frame.get_pixel(20, 20), JOINT, "arm detached at {} degrees", angle);
    }
}

#[test]
fn test_hand_follows_quarter_turns() {
    let renderer = renderer();
    // Shoulder pivot pixel is at (20, 20); the hand sits 8 pixels along the arm
    let cases = [(0.0, (20, 28)), (90.0, (12, 20)), (180.0, (20, 12)), (-90.0, (28, 20))];
    for (angle, (x, y)) in cases {
        let (frame, _) = renderer.render(&arm_pose(angle));
        assert_eq!(*frame.get_pixel(x, y), HAND, "hand misplaced at {} degrees", angle);
    }
}

#[test]
fn test_hand_tracks_arbitrary_angles() {
    let renderer = renderer();
    for angle in [-135.0, -30.0, 45.0, 120.0] {
        let (frame, _) = renderer.render(&arm_pose(angle));
        let expected = Vec2::pixel_center(20.0, 20.0) + Vec2::new(0.0, 8.0).rotate(angle);
        let hand: Vec<Vec2> = frame
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == HAND)
            .map(|(x, y, _)| Vec2::pixel_center(x as f64, y as f64))
            .collect();
        assert!(!hand.is_empty(), "hand vanished at {} degrees", angle);
        let n = hand.len() as f64;
        let centroid = Vec2::new(hand.iter().map(|p| p.x).sum::<f64>() / n, hand.iter().map(|p| p.y).sum::<f64>() / n);
        assert!(
            centroid.distance(expected) <= 1.5,
            "{} degrees: hand at {:?}, expected {:?}",
            angle,
            centroid,
            expected
        );
    }
}

#[test]
fn test_body_offset_moves_whole_tree() {
    let renderer = renderer();
    let poses = BTreeMap::from([("body".to_string(), Pose { offset: [3.0, -2.0], ..Pose::default() })]);
    let (frame, _) = renderer.render(&poses);
    assert_eq!(*frame.get_pixel(23, 18), JOINT);
    assert_eq!(*frame.get_pixel(23, 26), HAND);
}
