//! On-screen readout and the two buttons that mirror the keyboard shortcuts.

use strata::CameraMode;

/// What the HUD shows for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub zoom: f32,
    pub mode: CameraMode,
    pub vertices: u32,
    pub seam_breaks: usize,
    pub columns: usize,
    pub pages: u32,
    /// 0 = spiral, 1 = straight.
    pub layout_blend: f32,
}

/// Buttons pressed this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HudActions {
    pub reset: bool,
    pub toggle_layout: bool,
}

pub fn draw_hud(ctx: &egui::Context, info: &HudInfo) -> HudActions {
    let mut actions = HudActions::default();

    egui::Window::new("Core")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            egui::Grid::new("hud_stats").num_columns(2).show(ui, |ui| {
                ui.label("Zoom");
                ui.label(format!("{:.3}", info.zoom));
                ui.end_row();

                ui.label("Camera");
                ui.label(format!("{:?}", info.mode));
                ui.end_row();

                ui.label("Columns");
                ui.label(info.columns.to_string());
                ui.end_row();

                ui.label("Pages");
                ui.label(info.pages.to_string());
                ui.end_row();

                ui.label("Vertices");
                ui.label(info.vertices.to_string());
                ui.end_row();

                ui.label("Seam breaks");
                ui.label(info.seam_breaks.to_string());
                ui.end_row();
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset view (R)").clicked() {
                    actions.reset = true;
                }
                let label = if info.layout_blend < 0.5 {
                    "Straighten (Space)"
                } else {
                    "Wind up (Space)"
                };
                if ui.button(label).clicked() {
                    actions.toggle_layout = true;
                }
            });
            ui.weak("Drag to pan, scroll to zoom.");
        });

    actions
}
