// src/lib.rs
//! Interactive viewer for scanned core strips wound into a spiral.
//!
//! The geometry and camera live in `strata`; this crate owns the window,
//! the GPU resources and the asset loading around them.

pub mod app;
pub mod camera;
pub mod config;
pub mod data;
pub mod renderer;
pub mod ui;
