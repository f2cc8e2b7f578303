use strata::{Camera2D, CameraInput};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels per wheel "line", matching what browsers report for one notch.
const PIXELS_PER_LINE: f32 = 100.0;

/// Translates winit window events into [`CameraInput`].
pub struct CameraController {
    last_cursor: Option<(f64, f64)>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    /// Creates a new controller with default state.
    pub fn new() -> Self {
        Self { last_cursor: None }
    }

    /// Handles window events and updates the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera2D) {
        if let Some(input) = self.translate(event) {
            camera.handle_input(input);
        }
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<CameraInput> {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => Some(match state {
                ElementState::Pressed => CameraInput::DragStart,
                ElementState::Released => CameraInput::DragEnd,
            }),
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved((position.x, position.y)),
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => Some(CameraInput::Wheel {
                delta: wheel_pixels(delta),
            }),
            _ => None,
        }
    }

    /// Movement since the previous cursor sample; the first sample only primes it.
    fn cursor_moved(&mut self, xy: (f64, f64)) -> Option<CameraInput> {
        let last = self.last_cursor.replace(xy)?;
        Some(CameraInput::PointerMoved {
            dx: (xy.0 - last.0) as f32,
            dy: (xy.1 - last.1) as f32,
        })
    }
}

/// Wheel movement in browser-style pixels: positive scrolls down (zooms out).
pub fn wheel_pixels(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn wheel_up_zooms_in() {
        assert_eq!(wheel_pixels(&MouseScrollDelta::LineDelta(0.0, 1.0)), -100.0);
        assert_eq!(
            wheel_pixels(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))),
            40.0
        );
    }

    #[test]
    fn first_cursor_sample_only_primes() {
        let mut ctl = CameraController::new();
        assert_eq!(ctl.cursor_moved((10.0, 10.0)), None);
        assert_eq!(
            ctl.cursor_moved((15.0, 7.0)),
            Some(CameraInput::PointerMoved { dx: 5.0, dy: -3.0 })
        );
    }

    #[test]
    fn drag_pans_camera() {
        let mut ctl = CameraController::new();
        let mut cam = Camera2D::default();
        ctl.cursor_moved((0.0, 0.0));

        cam.handle_input(CameraInput::DragStart);
        if let Some(input) = ctl.cursor_moved((100.0, 0.0)) {
            cam.handle_input(input);
        }
        assert!((cam.focus().x - 0.1).abs() < 1e-6);
        assert!((cam.eye().x - 0.1).abs() < 1e-6);
    }
}
