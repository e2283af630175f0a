//! Configuration module for digrig projects
//!
//! Provides types, discovery and parsing for `digrig.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
