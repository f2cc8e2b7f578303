// src/data/mod.rs
//! Data handling modules for the spiral viewer.
//!
//! This module provides functionality for:
//! - Loading column metadata and luminance pages from disk.
//! - Generating a synthetic strip when no scan is available.
//! - Defining the data structures shared with the GPU.

pub mod assets;
pub mod types;

// Re-export commonly used types for convenience.
pub use self::types::{CoreAssets, LuminancePage, SpiralUniforms};
