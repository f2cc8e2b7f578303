//! strata: geometry and view state for scanned core strips.
//!
//! A core scan is stored as a run of fixed-width image columns tiled side by
//! side across one or more texture pages. This crate turns that column layout
//! into a ribbon mesh wound as a spiral and keeps the 2D camera used to look
//! at it. Nothing here touches the GPU or a window.
//!
//! Pipeline:
//!   ColumnMetadata -> ColumnIndex -> SpiralMeshBuilder -> SpiralMesh (built once)
//!   CameraInput    -> Camera2D::handle_input / update -> view matrix (per frame)
//!
//! Texture space:
//!   u = (column * width) mod 1   column position inside its page
//!   v = height within the column
//!   page = floor(column * width) texture array layer

pub mod camera;
pub mod columns;
pub mod error;
pub mod spiral;

pub use camera::{Camera2D, CameraInput, CameraMode};
pub use columns::{ColumnIndex, ColumnMetadata, ColumnSample, TexCoord};
pub use error::{Result, StrataError};
pub use spiral::{SpiralMesh, SpiralMeshBuilder, SpiralParams, SpiralVertex};
