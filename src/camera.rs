//! Perspective camera fitted so one world unit maps to one CSS pixel at the
//! origin plane.

use glam::{Mat4, Vec3};

use crate::viewport::Viewport;

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 1.0;

/// Distance at which a frustum of `fov_degrees` exactly spans `height` units.
pub fn fit_distance(height: f32, fov_degrees: f32) -> f32 {
    let half_fov = (fov_degrees / 2.0).to_radians();
    (height / 2.0) / half_fov.tan()
}

pub struct PerspectiveCamera {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Vec3,
    target: Vec3,

    // Cached matrices
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl PerspectiveCamera {
    /// Camera at `(0, 0, d)` looking at the origin, with `far = 2d`.
    pub fn fitted(viewport: &Viewport) -> Self {
        let distance = fit_distance(viewport.height() as f32, FOV_DEGREES);
        let mut camera = Self {
            fov: FOV_DEGREES,
            aspect: viewport.aspect(),
            near: NEAR,
            far: distance * 2.0,
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.look_at(Vec3::ZERO);
        camera.update_projection_matrix();
        camera
    }

    /// Field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Stores the new aspect; the projection is stale until
    /// [`update_projection_matrix`](Self::update_projection_matrix).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Distance from the camera to its look-at target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}
