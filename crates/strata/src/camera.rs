//! Pan/zoom camera for looking at the flat spiral, with an eased reset.

use glam::{Mat4, Vec3};

/// World units moved per pointer pixel.
pub const PAN_SPEED: f32 = 0.001;
/// Relative zoom change per wheel pixel.
pub const ZOOM_SPEED: f32 = 0.0005;
pub const MIN_ZOOM: f32 = 0.01;
pub const MAX_ZOOM: f32 = 5.0;
/// Fraction of the remaining distance to the default pose covered per `update`.
pub const RESET_EASING: f32 = 0.1;

/// Windowing-agnostic input understood by [`Camera2D::handle_input`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraInput {
    DragStart,
    DragEnd,
    /// Pointer movement in screen pixels (`dy` grows downwards).
    PointerMoved { dx: f32, dy: f32 },
    /// Wheel movement in pixels; positive moves the camera away.
    Wheel { delta: f32 },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Idle,
    Dragging,
    Resetting,
}

#[derive(Debug, Clone)]
pub struct Camera2D {
    // --- Pose captured at construction, never mutated ---
    default_eye: Vec3,
    default_focus: Vec3,
    default_up: Vec3,

    // --- Current pose ---
    eye: Vec3,
    focus: Vec3,
    up: Vec3,
    /// Always equal to `|eye - focus|`.
    zoom: f32,

    dragging: bool,
    resetting: bool,

    /// `look_at(eye, focus, up)`, refreshed whenever the pose changes.
    view: Mat4,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y)
    }
}

impl Camera2D {
    /// Creates a camera whose default pose (the reset target) is the given one.
    pub fn new(eye: Vec3, focus: Vec3, up: Vec3) -> Self {
        Self {
            default_eye: eye,
            default_focus: focus,
            default_up: up,
            eye,
            focus,
            up,
            zoom: eye.distance(focus),
            dragging: false,
            resetting: false,
            view: Mat4::look_at_rh(eye, focus, up),
        }
    }

    pub fn handle_input(&mut self, input: CameraInput) {
        match input {
            CameraInput::DragStart => {
                self.dragging = true;
                self.resetting = false;
            }
            CameraInput::DragEnd => self.dragging = false,
            CameraInput::PointerMoved { dx, dy } => {
                if self.dragging {
                    self.pan(dx, -dy);
                }
            }
            CameraInput::Wheel { delta } => self.zoom(delta),
            CameraInput::Reset => self.reset(),
        }
    }

    /// Moves eye and focus together along the camera's right/up axes.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        self.resetting = false;

        let forward = (self.focus - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let (right, up) = if right == Vec3::ZERO {
            // Degenerate basis (looking along `up`); fall back to world axes.
            (Vec3::X, Vec3::Y)
        } else {
            (right, right.cross(forward))
        };

        let translate = (right * delta_x + up * delta_y) * PAN_SPEED;
        self.eye += translate;
        self.focus += translate;
        self.refresh_view();
    }

    /// Scales the eye-to-focus distance by `1 + delta * ZOOM_SPEED`, clamped
    /// to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom(&mut self, delta: f32) {
        self.resetting = false;

        let look_dir = (self.eye - self.focus).try_normalize().unwrap_or(Vec3::Z);
        self.zoom = (self.zoom * (1.0 + delta * ZOOM_SPEED)).clamp(MIN_ZOOM, MAX_ZOOM);
        self.eye = self.focus + look_dir * self.zoom;
        self.refresh_view();
    }

    /// Starts easing back to the default pose over the following `update` calls.
    pub fn reset(&mut self) {
        self.resetting = true;
    }

    /// Per-frame step. Eases towards the default pose while resetting.
    pub fn update(&mut self) {
        if !self.resetting {
            return;
        }
        self.eye = self.eye.lerp(self.default_eye, RESET_EASING);
        self.focus = self.focus.lerp(self.default_focus, RESET_EASING);
        self.up = self.up.lerp(self.default_up, RESET_EASING);

        self.zoom = self.eye.distance(self.focus);
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.focus, self.up);
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// The reset target as `(eye, focus, up)`.
    pub fn default_pose(&self) -> (Vec3, Vec3, Vec3) {
        (self.default_eye, self.default_focus, self.default_up)
    }

    /// Resetting wins over dragging while the easing runs; the next pan ends it.
    pub fn mode(&self) -> CameraMode {
        if self.resetting {
            CameraMode::Resetting
        } else if self.dragging {
            CameraMode::Dragging
        } else {
            CameraMode::Idle
        }
    }
}
