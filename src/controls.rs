//! Orbit camera controller with optional damping.
//!
//! Pointer drags and wheel steps only accumulate deltas; [`OrbitControls::update`]
//! applies them to the camera once per frame. With damping enabled each update
//! consumes `damping_factor` of the pending rotation and leaves the rest to
//! decay over following frames.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Y-up spherical coordinates: `phi` from +Y, `theta` around Y from +Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    delta: Spherical,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta: Spherical::default(),
            scale: 1.0,
        }
    }

    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.enable_damping = enabled;
        self
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Pointer moved by `(dx, dy)` CSS pixels on an element `client_height` tall.
    pub fn drag(&mut self, dx: f32, dy: f32, client_height: f32) {
        if client_height <= 0.0 {
            return;
        }
        self.rotate_left(TAU * dx / client_height * self.rotate_speed);
        self.rotate_up(TAU * dy / client_height * self.rotate_speed);
    }

    /// Wheel step; negative `delta_y` moves the camera closer.
    pub fn wheel(&mut self, delta_y: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale /= step;
        } else if delta_y > 0.0 {
            self.scale *= step;
        }
    }

    /// Apply pending input to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let old_position = camera.position();
        let mut spherical = Spherical::from_offset(old_position - self.target);

        if self.enable_damping {
            spherical.theta += self.delta.theta * self.damping_factor;
            spherical.phi += self.delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.delta.theta;
            spherical.phi += self.delta.phi;
        }
        spherical.phi = spherical.phi.clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius / self.scale).clamp(self.min_distance, self.max_distance);

        camera.set_position(self.target + spherical.to_offset());
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
        }
        self.scale = 1.0;

        old_position.distance_squared(camera.position()) > EPS
    }

    /// True while damped rotation is still settling.
    pub fn is_settling(&self) -> bool {
        self.delta.theta.abs() > EPS || self.delta.phi.abs() > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::fitted(&Viewport::new(800, 600).unwrap())
    }

    #[test]
    fn idle_update_does_not_move_camera() {
        let mut cam = camera();
        let before = cam.position();
        let mut controls = OrbitControls::new().with_damping(true);
        assert!(!controls.update(&mut cam));
        assert!(cam.position().abs_diff_eq(before, 1e-3));
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut cam = camera();
        let radius = cam.distance();
        let mut controls = OrbitControls::new().with_damping(true);
        controls.rotate_left(0.5);

        assert!(controls.update(&mut cam));
        let first = Spherical::from_offset(cam.position()).theta;
        assert!((first + 0.5 * 0.05).abs() < 1e-4);
        assert!(controls.is_settling());

        for _ in 0..400 {
            controls.update(&mut cam);
        }
        let settled = Spherical::from_offset(cam.position()).theta;
        assert!((settled + 0.5).abs() < 1e-3, "theta {settled}");
        assert!((cam.distance() - radius).abs() < 1e-2);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        controls.drag(100.0, 0.0, 600.0);
        controls.update(&mut cam);
        let theta = Spherical::from_offset(cam.position()).theta;
        assert!((theta + TAU * 100.0 / 600.0).abs() < 1e-4);
        assert!(!controls.is_settling());
    }

    #[test]
    fn wheel_dollies_toward_target() {
        let mut cam = camera();
        let radius = cam.distance();
        let mut controls = OrbitControls::new();
        controls.wheel(-1.0);
        controls.update(&mut cam);
        assert!((cam.distance() - radius * 0.95).abs() < 1e-2);

        controls.wheel(1.0);
        controls.update(&mut cam);
        assert!((cam.distance() - radius).abs() < 1e-2);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        assert!(cam.position().y > 0.0);
        assert!(cam.position().is_finite());
    }
}
