use glam::{Quat, Vec2, Vec3};

use crate::camera::core::{Camera, CameraUniform};
use crate::camera::framing::CameraPlacement;
use crate::options::CameraOptions;

/// Recorded per-event rotation velocity is roughly per-frame; this
/// converts it to a per-second coasting rate.
const INERTIA_FRAME_RATE: f32 = 60.0;

/// Exponential decay rate of coasting rotation, per second.
const INERTIA_DAMPING: f32 = 4.0;

/// Coasting stops once the squared velocity falls below this.
const INERTIA_CUTOFF: f32 = 1e-6;

/// Orbital camera controller.
///
/// Maintains an orientation quaternion, a focus point, and an eye
/// distance; rotate, pan, and zoom gestures each honor an independent
/// enable flag, and zoom is clamped to the distance limits produced by
/// the auto-framer. When inertia is enabled, rotation coasts after the
/// drag ends, decaying exponentially.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    min_distance: f32,
    max_distance: f32,

    /// The perspective camera driven by this controller.
    pub camera: Camera,
    /// CPU copy of the camera GPU uniform, refreshed by
    /// [`update_uniform`](Self::update_uniform).
    pub uniform: CameraUniform,

    /// Whether pan gestures move the focus point.
    pub enable_pan: bool,
    /// Whether zoom gestures change the eye distance.
    pub enable_zoom: bool,
    /// Whether rotate gestures change the orientation.
    pub enable_rotate: bool,
    /// Whether rotation coasts after the drag ends.
    pub inertia: bool,

    rotate_velocity: Vec2,
    coasting: bool,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Controller with the given projection options and viewport aspect.
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let focus_point = Vec3::ZERO;
        let distance = 10.0;
        let orientation = Quat::IDENTITY;

        let camera = Camera {
            eye: focus_point + Vec3::new(0.0, 0.0, distance),
            target: focus_point,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        Self {
            orientation,
            distance,
            focus_point,
            min_distance: options.znear,
            max_distance: options.zfar,
            camera,
            uniform,
            enable_pan: true,
            enable_zoom: true,
            enable_rotate: true,
            inertia: false,
            rotate_velocity: Vec2::ZERO,
            coasting: false,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Refresh the CPU uniform from the current camera state.
    pub fn update_uniform(&mut self) {
        self.uniform.update_view_proj(&self.camera);
    }

    /// Update the projection aspect for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = width as f32 / height as f32;
    }

    /// Current eye distance from the focus point.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current zoom-distance clamps `(min, max)`.
    #[must_use]
    pub fn zoom_limits(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Place the camera from an auto-framing result: eye at
    /// `placement.position`, looking at `placement.look_at`, with the
    /// placement's zoom clamps.
    ///
    /// The initial distance is taken as-is (not clamped) — the clamps
    /// bound user zoom gestures only.
    pub fn apply_placement(&mut self, placement: &CameraPlacement) {
        self.focus_point = placement.look_at;
        self.min_distance = placement.min_distance;
        self.max_distance = placement.max_distance;
        self.distance = placement.distance();

        let dir = (placement.position - placement.look_at)
            .normalize_or(Vec3::Z);
        self.orientation = Quat::from_rotation_arc(Vec3::Z, dir);

        self.rotate_velocity = Vec2::ZERO;
        self.coasting = false;
        self.update_camera_pos();
    }

    /// Rotate by a screen-space drag delta. No-op when rotation is
    /// disabled.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.enable_rotate {
            return;
        }
        self.apply_rotation(delta);
        self.rotate_velocity = delta;
    }

    fn apply_rotation(&mut self, delta: Vec2) {
        // Horizontal rotation around the camera's up vector
        let up = self.orientation * Vec3::Y;
        let horizontal =
            Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.orientation = horizontal * self.orientation;

        // Vertical rotation around the camera's right vector
        let right = self.orientation * Vec3::X;
        let vertical =
            Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.orientation = vertical * self.orientation;

        self.update_camera_pos();
    }

    /// Pan by a screen-space drag delta. No-op when panning is disabled.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.enable_pan {
            return;
        }
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;

        let translation = right * (-delta.x * self.pan_speed)
            + up * (delta.y * self.pan_speed);

        self.focus_point += translation;
        self.update_camera_pos();
    }

    /// Zoom by a scroll delta (positive = closer), clamped to the
    /// framing limits. No-op when zoom is disabled.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enable_zoom {
            return;
        }
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance =
            self.distance.clamp(self.min_distance, self.max_distance);
        self.update_camera_pos();
    }

    /// A rotate drag started — stop any coasting.
    pub fn begin_drag(&mut self) {
        self.coasting = false;
        self.rotate_velocity = Vec2::ZERO;
    }

    /// The rotate drag ended — start coasting if inertia is on.
    pub fn end_drag(&mut self) {
        if self.inertia && self.rotate_velocity.length_squared() > 0.0 {
            self.coasting = true;
        }
    }

    /// Advance coasting rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.coasting {
            return;
        }
        if !self.inertia
            || self.rotate_velocity.length_squared() < INERTIA_CUTOFF
        {
            self.coasting = false;
            self.rotate_velocity = Vec2::ZERO;
            return;
        }
        let step = self.rotate_velocity * (dt * INERTIA_FRAME_RATE);
        self.apply_rotation(step);
        self.rotate_velocity *= (-INERTIA_DAMPING * dt).exp();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 1.0)
    }

    #[test]
    fn placement_puts_eye_on_axis_at_distance() {
        let mut c = controller();
        c.apply_placement(&CameraPlacement {
            position: Vec3::new(0.0, 0.0, 2.6),
            look_at: Vec3::ZERO,
            min_distance: 0.4,
            max_distance: 4.0,
        });
        assert_relative_eq!(c.camera.eye.z, 2.6, epsilon = 1e-5);
        assert_relative_eq!(c.camera.eye.x, 0.0, epsilon = 1e-5);
        assert_eq!(c.camera.target, Vec3::ZERO);
        assert_eq!(c.zoom_limits(), (0.4, 4.0));
    }

    #[test]
    fn zoom_respects_clamps() {
        let mut c = controller();
        c.apply_placement(&CameraPlacement {
            position: Vec3::new(0.0, 0.0, 2.0),
            look_at: Vec3::ZERO,
            min_distance: 1.0,
            max_distance: 3.0,
        });
        for _ in 0..100 {
            c.zoom(1.0);
        }
        assert_relative_eq!(c.distance(), 1.0);
        for _ in 0..100 {
            c.zoom(-1.0);
        }
        assert_relative_eq!(c.distance(), 3.0);
    }

    #[test]
    fn disabled_gestures_are_ignored() {
        let mut c = controller();
        c.enable_rotate = false;
        c.enable_pan = false;
        c.enable_zoom = false;

        let eye = c.camera.eye;
        c.rotate(Vec2::new(10.0, 5.0));
        c.pan(Vec2::new(10.0, 5.0));
        c.zoom(2.0);
        assert_eq!(c.camera.eye, eye);
    }

    #[test]
    fn inertia_coasts_then_decays() {
        let mut c = controller();
        c.inertia = true;
        c.begin_drag();
        c.rotate(Vec2::new(4.0, 0.0));
        c.end_drag();

        let eye_before = c.camera.eye;
        c.update(1.0 / 60.0);
        assert_ne!(c.camera.eye, eye_before, "coasting should rotate");

        // Velocity decays to below the cutoff eventually.
        for _ in 0..2000 {
            c.update(1.0 / 60.0);
        }
        let eye_settled = c.camera.eye;
        c.update(1.0 / 60.0);
        assert_eq!(c.camera.eye, eye_settled, "coasting should stop");
    }

    #[test]
    fn no_inertia_means_no_coasting() {
        let mut c = controller();
        c.inertia = false;
        c.begin_drag();
        c.rotate(Vec2::new(4.0, 0.0));
        c.end_drag();

        let eye = c.camera.eye;
        c.update(0.1);
        assert_eq!(c.camera.eye, eye);
    }
}
