//! The rendering orchestrator. Owns the GPU context, the spiral pass and the
//! egui renderer drawn on top of it.

pub mod context;
pub mod spiral;

use self::{context::GfxContext, spiral::SpiralRenderable};
use crate::data::types::LuminancePage;
use std::sync::Arc;
use strata::SpiralMesh;
use winit::window::Window;

const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.06, g: 0.06, b: 0.07, a: 1.0 };

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub spiral: SpiralRenderable,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        vsync: bool,
        mesh: &SpiralMesh,
        pages: &[LuminancePage],
    ) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window, vsync).await?;

        let max_layers = gfx.device.limits().max_texture_array_layers;
        if pages.len() as u32 > max_layers {
            anyhow::bail!(
                "{} texture pages exceed the device limit of {} array layers",
                pages.len(),
                max_layers
            );
        }

        let spiral = SpiralRenderable::new(&gfx.device, &gfx.queue, gfx.config.format, mesh, pages);
        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            spiral,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }

    /// Clears the swap image and draws the ribbon into it.
    pub fn render(&mut self, swap_view: &wgpu::TextureView) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Spiral Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.spiral.draw(&mut pass, &self.gfx.queue);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
