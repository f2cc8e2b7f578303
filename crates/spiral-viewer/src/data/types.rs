//! Core data types for the spiral viewer, focused on GPU data representation.

use strata::ColumnMetadata;

/// One texture page of column images as 8-bit luminance, rows top to bottom.
#[derive(Debug, Clone)]
pub struct LuminancePage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Everything the viewer needs from disk before it can build the mesh.
#[derive(Debug, Clone)]
pub struct CoreAssets {
    pub metadata: ColumnMetadata,
    /// All pages share one size; index = texture array layer.
    pub pages: Vec<LuminancePage>,
}

impl CoreAssets {
    /// Pixel size shared by all pages.
    pub fn page_size(&self) -> (u32, u32) {
        self.pages
            .first()
            .map(|p| (p.width, p.height))
            .unwrap_or((1, 1))
    }
}

/// Per-frame uniform buffer data, respecting std140 layout.
/// Must match the layout of `SpiralUniforms` in `spiral.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpiralUniforms {
    pub proj: [[f32; 4]; 4],  // 64 B
    pub view: [[f32; 4]; 4],  // +64 -> 128
    /// 0 = spiral layout, 1 = straight layout.
    pub blend: f32,           // +4
    pub _pad: [f32; 3],       // +12 -> 144
}

// Compile‑time safety check: buffer size must match WGSL‑reflected size.
const _: [(); 144] = [(); core::mem::size_of::<SpiralUniforms>()];

impl Default for SpiralUniforms {
    fn default() -> Self {
        Self {
            proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            blend: 0.0,
            _pad: [0.0; 3],
        }
    }
}
