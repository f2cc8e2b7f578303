use crate::{
    camera::CameraController,
    config::Args,
    data::assets,
    renderer::Renderer,
    ui::{self, HudInfo},
};
use anyhow::Result;
use glam::Mat4;
use std::sync::Arc;
use strata::{Camera2D, CameraInput, ColumnIndex, SpiralMeshBuilder};
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

const FOV_Y_DEG: f32 = 90.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 10.0;
/// Fraction of the remaining layout morph covered each frame.
const LAYOUT_EASING: f32 = 0.1;

/// Perspective for the given aspect; wgpu clip depth is [0, 1] like `perspective_rh`.
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR)
}

/// One easing step of the layout blend toward its target.
pub fn ease_layout(current: f32, target: f32) -> f32 {
    current + (target - current) * LAYOUT_EASING
}

/// Counters shown in the HUD that never change after start-up.
#[derive(Debug, Clone, Copy)]
struct MeshStats {
    seam_breaks: usize,
    columns: usize,
    pages: u32,
}

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera2D,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    stats: MeshStats,
    layout_blend: f32,
    layout_target: f32,
}

impl App {
    pub async fn new(window: Arc<Window>, args: &Args) -> Result<Self> {
        let source = args.asset_source()?;
        let core = assets::load(&source)?;

        let index = ColumnIndex::new(&core.metadata)?;
        assets::check_pages(&index, &core.pages)?;

        let params = args.spiral_params();
        let (_, page_height) = core.page_size();
        if !assets::seam_epsilon_fits(&index, params.seam_epsilon, page_height) {
            log::warn!(
                "Seam epsilon {} is wider than one texel of a {} px page; seams may bleed",
                params.seam_epsilon,
                page_height
            );
        }

        let mesh = SpiralMeshBuilder::new(&index, params)?.build();
        log::info!(
            "Spiral mesh: {} vertices, {} seam breaks over {} columns",
            mesh.vertex_count(),
            mesh.seam_breaks(),
            index.column_count()
        );

        let stats = MeshStats {
            seam_breaks: mesh.seam_breaks(),
            columns: index.column_count(),
            pages: index.page_count(),
        };

        let mut renderer = Renderer::new(window.clone(), !args.no_vsync, &mesh, &core.pages).await?;
        renderer.spiral.set_projection(projection(renderer.gfx.aspect()));

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            camera: Camera2D::default(),
            camera_controller: CameraController::new(),
            egui_ctx,
            egui_state,
            stats,
            layout_blend: 0.0,
            layout_target: 0.0,
        })
    }

    pub fn on_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.renderer
                .spiral
                .set_projection(projection(self.renderer.gfx.aspect()));
        }
    }

    pub fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyR => self.camera.handle_input(CameraInput::Reset),
            KeyCode::Space => self.toggle_layout(),
            _ => {}
        }
    }

    fn toggle_layout(&mut self) {
        self.layout_target = if self.layout_target < 0.5 { 1.0 } else { 0.0 };
        log::debug!("Layout target -> {}", self.layout_target);
    }

    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        self.camera_controller.handle_event(event, &mut self.camera);

        match event {
            WindowEvent::Resized(physical_size) => self.on_resize(*physical_size),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(code);
                }
            }
            _ => {}
        }

        false
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.camera.update();
        self.layout_blend = ease_layout(self.layout_blend, self.layout_target);

        self.renderer.spiral.set_view(self.camera.view());
        self.renderer.spiral.set_blend(self.layout_blend);
        self.renderer.render(&swap_view);

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let actions = ui::draw_hud(
            &self.egui_ctx,
            &HudInfo {
                zoom: self.camera.zoom_level(),
                mode: self.camera.mode(),
                vertices: self.renderer.spiral.vertex_count(),
                seam_breaks: self.stats.seam_breaks,
                columns: self.stats.columns,
                pages: self.stats.pages,
                layout_blend: self.layout_blend,
            },
        );

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        // Buttons act on the next frame, like the keys do.
        if actions.reset {
            self.on_key(KeyCode::KeyR);
        }
        if actions.toggle_layout {
            self.on_key(KeyCode::Space);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn default_eye_sees_unit_ribbon() {
        // Eye at z = 2 looking at the origin: the outer ring (r = 1) is in view.
        let cam = Camera2D::default();
        let clip = projection(1.0) * cam.view() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!(ndc.z >= 0.0 && ndc.z <= 1.0);
    }

    #[test]
    fn layout_blend_converges_to_target() {
        let mut blend = 0.0;
        for _ in 0..200 {
            blend = ease_layout(blend, 1.0);
        }
        assert!((blend - 1.0).abs() < 1e-4);
        assert!(ease_layout(0.5, 0.5) == 0.5);
    }
}
