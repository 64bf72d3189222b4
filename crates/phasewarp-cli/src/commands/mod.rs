//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod params;
pub mod render;
