//! Digrig - Library for assembling pivot-rigged pixel-art sprites
//!
//! This library provides functionality to:
//! - Generate component images from PNG sources and drawn shapes
//! - Rotate components about their pivots without losing the joint
//! - Pose component trees per frame and composite them in z-order
//! - Pack animations into sprite sheets with JSON and Godot metadata
//! - Support both lenient and strict error modes

pub mod animation;
pub mod build;
pub mod cli;
pub mod color;
pub mod component;
pub mod compose;
pub mod config;
pub mod draw;
pub mod export;
pub mod geometry;
pub mod gif;
pub mod models;
pub mod output;
pub mod palettes;
pub mod pipeline;
pub mod rotate;
pub mod skeleton;
pub mod spritesheet;
pub mod templates;
pub mod warning;
