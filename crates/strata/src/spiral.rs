//! Spiral ribbon mesh built from a column index.
//!
//! The ribbon is a triangle strip: two vertices (inner edge, outer edge) per
//! step. Wherever the strip crosses a column boundary between two steps, two
//! extra vertex pairs are inserted at the same position with texture
//! coordinates taken just before and just after the boundary. The triangles
//! between them have zero area, so the texture jumps columns without the GPU
//! interpolating across two unrelated columns.

use crate::columns::ColumnIndex;
use crate::error::{Result, StrataError};
use rayon::prelude::*;
use std::f64::consts::TAU;

/// Per-vertex data uploaded to the GPU vertex buffer.
/// Must match the vertex inputs in `spiral.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpiralVertex {
    /// Position on the spiral layout.
    pub spiral_pos: [f32; 2],
    /// Position on the straight (unwound) layout.
    pub linear_pos: [f32; 2],
    /// `(u, v)` inside the texture page.
    pub tex_coord: [f32; 2],
    /// Texture array layer.
    pub page: u32,
    pub _pad: u32,
}

// Vertex stride expected by the pipeline.
const _: [(); 32] = [(); core::mem::size_of::<SpiralVertex>()];

/// Largest step count whose vertex pairs still fit a `u32` draw range.
pub const MAX_SEGMENTS: usize = (u32::MAX / 2) as usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Steps along the spiral; each emits one inner/outer vertex pair.
    pub num_segment: usize,
    /// Full turns from the inner to the outer end.
    pub num_rotation: u32,
    /// Radial thickness of the ribbon.
    pub band_width: f64,
    /// Radius of the first step. Keeps the ribbon clear of the origin.
    pub min_radius: f64,
    /// Radius of the last step.
    pub max_radius: f64,
    /// Offset either side of a column boundary, in normalized strip units,
    /// used to sample the texture at seam breaks.
    pub seam_epsilon: f64,
    /// Length of the strip in the unwound layout.
    pub linear_length: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        let band_width = 0.05;
        Self {
            num_segment: 30_000,
            num_rotation: 10,
            band_width,
            min_radius: 5.0 * band_width,
            max_radius: 1.0,
            seam_epsilon: 1e-6,
            linear_length: 4.0,
        }
    }
}

impl SpiralParams {
    fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(StrataError::InvalidParameter(msg));

        if self.num_segment == 0 {
            return bad("num_segment must be > 0".into());
        }
        if self.num_segment > MAX_SEGMENTS {
            return bad(format!(
                "num_segment must be <= {MAX_SEGMENTS}, got {}",
                self.num_segment
            ));
        }
        if self.num_rotation == 0 {
            return bad("num_rotation must be > 0".into());
        }
        if !(self.band_width.is_finite() && self.band_width > 0.0) {
            return bad(format!("band_width must be > 0, got {}", self.band_width));
        }
        if !(self.min_radius.is_finite() && self.min_radius >= 0.0) {
            return bad(format!("min_radius must be >= 0, got {}", self.min_radius));
        }
        if !(self.max_radius.is_finite() && self.max_radius > self.min_radius) {
            return bad(format!(
                "max_radius ({}) must exceed min_radius ({})",
                self.max_radius, self.min_radius
            ));
        }
        if !(self.seam_epsilon > 0.0 && self.seam_epsilon < 1e-2) {
            return bad(format!(
                "seam_epsilon must lie in (0, 0.01), got {}",
                self.seam_epsilon
            ));
        }
        if !(self.linear_length.is_finite() && self.linear_length > 0.0) {
            return bad(format!("linear_length must be > 0, got {}", self.linear_length));
        }
        Ok(())
    }
}

/// Immutable triangle-strip vertex list.
#[derive(Debug, Clone)]
pub struct SpiralMesh {
    vertices: Vec<SpiralVertex>,
    seam_breaks: usize,
}

impl SpiralMesh {
    #[inline]
    pub fn vertices(&self) -> &[SpiralVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Column boundaries that received a seam break.
    #[inline]
    pub fn seam_breaks(&self) -> usize {
        self.seam_breaks
    }

    /// Raw bytes for the vertex buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Geometry of one spiral step before texturing.
#[derive(Debug, Clone, Copy)]
struct Step {
    angle: f64,
    radius: f64,
    /// Strip position after the power-law warp.
    warped_t: f64,
}

pub struct SpiralMeshBuilder<'a> {
    index: &'a ColumnIndex,
    params: SpiralParams,
}

impl<'a> SpiralMeshBuilder<'a> {
    pub fn new(index: &'a ColumnIndex, params: SpiralParams) -> Result<Self> {
        params.validate()?;

        // Every boundary can add at most one break of four vertices.
        let worst_case = 2 * params.num_segment as u64 + 4 * (index.column_count() as u64 - 1);
        if worst_case > u32::MAX as u64 {
            return Err(StrataError::InvalidParameter(format!(
                "{} segments over {} columns may need {} vertices, more than one draw can address",
                params.num_segment,
                index.column_count(),
                worst_case
            )));
        }

        let eps_height = params.seam_epsilon * index.total_height();
        if eps_height >= index.min_column_height() * 0.5 {
            log::warn!(
                "seam epsilon spans {:.3e} height units, shortest column is {:.3e}; \
                 seam samples may land in the wrong column",
                eps_height,
                index.min_column_height()
            );
        }

        Ok(Self { index, params })
    }

    fn step(&self, i: usize) -> Step {
        let p = &self.params;
        let segment_t = i as f64 / p.num_segment as f64;
        Step {
            angle: TAU * p.num_rotation as f64 * segment_t,
            radius: p.min_radius + (p.max_radius - p.min_radius) * segment_t,
            // Outer turns cover more circumference per step; the warp puts
            // more of the strip there.
            warped_t: segment_t.powf(1.5),
        }
    }

    /// Emits the inner/outer pair at `(angle, radius)` with the unwound layout
    /// placed at `layout_t` and the texture sampled at `tex_t`.
    fn push_pair(
        &self,
        out: &mut Vec<SpiralVertex>,
        angle: f64,
        radius: f64,
        layout_t: f64,
        tex_t: f64,
    ) {
        let half = self.params.band_width * 0.5;
        let (sin, cos) = angle.sin_cos();
        let tc = self.index.texture_coord_at(tex_t);
        let linear_x = ((layout_t - 0.5) * self.params.linear_length) as f32;

        let inner_r = radius - half;
        let outer_r = radius + half;

        out.push(SpiralVertex {
            spiral_pos: [(cos * inner_r) as f32, (sin * inner_r) as f32],
            linear_pos: [linear_x, half as f32],
            tex_coord: [tc.u as f32, tc.v as f32],
            page: tc.page,
            _pad: 0,
        });
        out.push(SpiralVertex {
            spiral_pos: [(cos * outer_r) as f32, (sin * outer_r) as f32],
            linear_pos: [linear_x, -half as f32],
            tex_coord: [(tc.u + self.index.column_width()) as f32, tc.v as f32],
            page: tc.page,
            _pad: 0,
        });
    }

    pub fn build(&self) -> SpiralMesh {
        let n = self.params.num_segment;
        let eps = self.params.seam_epsilon;

        let steps: Vec<Step> = (0..n).into_par_iter().map(|i| self.step(i)).collect();

        let mut vertices = Vec::with_capacity(2 * n);
        let mut seam_breaks = 0usize;

        for (i, step) in steps.iter().enumerate() {
            self.push_pair(&mut vertices, step.angle, step.radius, step.warped_t, step.warped_t);

            let Some(next) = steps.get(i + 1) else {
                break;
            };
            let span = next.warped_t - step.warped_t;

            for break_t in self.index.boundaries_between(step.warped_t, next.warped_t) {
                let f = (break_t - step.warped_t) / span;
                let angle = lerp(step.angle, next.angle, f);
                let radius = lerp(step.radius, next.radius, f);

                self.push_pair(&mut vertices, angle, radius, break_t, (break_t - eps).max(0.0));
                self.push_pair(&mut vertices, angle, radius, break_t, (break_t + eps).min(1.0));
                seam_breaks += 1;
            }
        }

        log::debug!(
            "spiral mesh: {} steps, {} seam breaks, {} vertices",
            n,
            seam_breaks,
            vertices.len()
        );

        SpiralMesh {
            vertices,
            seam_breaks,
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a + (b - a) * f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnMetadata;

    fn index(heights: &[f64]) -> ColumnIndex {
        ColumnIndex::new(&ColumnMetadata {
            width: 0.1,
            heights: heights.to_vec(),
        })
        .unwrap()
    }

    fn params(num_segment: usize) -> SpiralParams {
        SpiralParams {
            num_segment,
            ..SpiralParams::default()
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let idx = index(&[10.0]);
        let zero_segments = SpiralMeshBuilder::new(&idx, params(0));
        assert!(matches!(zero_segments, Err(StrataError::InvalidParameter(_))));

        let zero_rotations = SpiralParams {
            num_rotation: 0,
            ..params(10)
        };
        assert!(matches!(
            SpiralMeshBuilder::new(&idx, zero_rotations),
            Err(StrataError::InvalidParameter(_))
        ));

        let inverted = SpiralParams {
            min_radius: 2.0,
            max_radius: 1.0,
            ..params(10)
        };
        assert!(SpiralMeshBuilder::new(&idx, inverted).is_err());

        let no_epsilon = SpiralParams {
            seam_epsilon: 0.0,
            ..params(10)
        };
        assert!(SpiralMeshBuilder::new(&idx, no_epsilon).is_err());
    }

    #[test]
    fn rejects_vertex_counts_past_u32() {
        let idx = index(&[10.0]);
        let too_many = SpiralMeshBuilder::new(&idx, params(MAX_SEGMENTS + 1));
        assert!(matches!(too_many, Err(StrataError::InvalidParameter(_))));

        // Fits alone, but the seam breaks of a second column push it over.
        let two = index(&[5.0, 5.0]);
        let at_limit = SpiralMeshBuilder::new(&two, params(MAX_SEGMENTS));
        assert!(matches!(at_limit, Err(StrataError::InvalidParameter(_))));
    }

    #[test]
    fn single_column_has_no_seams() {
        let idx = index(&[10.0]);
        for n in [1, 2, 7, 100, 1000] {
            let mesh = SpiralMeshBuilder::new(&idx, params(n)).unwrap().build();
            assert_eq!(mesh.seam_breaks(), 0);
            assert_eq!(mesh.vertex_count() as usize, 2 * n);
        }
    }

    #[test]
    fn first_step_sits_at_min_radius() {
        let idx = index(&[10.0]);
        let p = params(16);
        let mesh = SpiralMeshBuilder::new(&idx, p).unwrap().build();
        let v = mesh.vertices();

        let half = (p.band_width * 0.5) as f32;
        let min_r = p.min_radius as f32;
        assert!((v[0].spiral_pos[0] - (min_r - half)).abs() < 1e-6);
        assert!((v[1].spiral_pos[0] - (min_r + half)).abs() < 1e-6);
        assert!(v[0].spiral_pos[1].abs() < 1e-6);
        assert_eq!(v[0].tex_coord, [0.0, 0.0]);
        assert!((v[1].tex_coord[0] - 0.1).abs() < 1e-6);
        assert_eq!(v[0].tex_coord[1], v[1].tex_coord[1]);
    }

    #[test]
    fn seam_pairs_share_position_and_split_columns() {
        let idx = index(&[5.0, 5.0]);
        let mesh = SpiralMeshBuilder::new(&idx, params(10)).unwrap().build();
        assert_eq!(mesh.seam_breaks(), 1);
        assert_eq!(mesh.vertex_count(), 2 * 10 + 4);

        // warped_t crosses 0.5 between step 6 (0.6^1.5 ~ 0.46) and step 7 (0.7^1.5 ~ 0.59).
        let v = mesh.vertices();
        let before = &v[2 * 7..2 * 7 + 2];
        let after = &v[2 * 7 + 2..2 * 7 + 4];
        assert_eq!(before[0].spiral_pos, after[0].spiral_pos);
        assert_eq!(before[1].spiral_pos, after[1].spiral_pos);
        assert_eq!(before[0].linear_pos, after[0].linear_pos);

        // Column 0 at its top edge, then column 1 at its bottom edge.
        assert!(before[0].tex_coord[0].abs() < 1e-6);
        assert!((before[0].tex_coord[1] - 5.0).abs() < 1e-4);
        assert!((after[0].tex_coord[0] - 0.1).abs() < 1e-6);
        assert!(after[0].tex_coord[1] < 1e-4);
    }

    #[test]
    fn every_boundary_gets_a_break() {
        // Ten equal columns and very few steps: most steps skip several columns.
        let idx = index(&[1.0; 10]);
        let mesh = SpiralMeshBuilder::new(&idx, params(4)).unwrap().build();
        // warped_t of the last step is 0.75^1.5 ~ 0.65, so boundaries 1..=6 are crossed.
        assert_eq!(mesh.seam_breaks(), 6);
        assert_eq!(mesh.vertex_count() as usize, 2 * 4 + 4 * 6);
    }

    #[test]
    fn bytes_match_vertex_stride() {
        let idx = index(&[3.0, 5.0, 2.0]);
        let mesh = SpiralMeshBuilder::new(&idx, params(50)).unwrap().build();
        assert_eq!(mesh.as_bytes().len(), mesh.vertices().len() * 32);
    }
}
