//! Scene graph: one camera, two lights, one box.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::camera::PerspectiveCamera;
use crate::viewport::Viewport;

/// Radians added to the mesh rotation on x and y every frame.
pub const ROTATION_STEP: f32 = 0.01;

/// sRGB color stored as normalized channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Color(Vec3::new(r, g, b))
    }

    pub fn to_linear(self) -> Vec3 {
        fn channel(c: f32) -> f32 {
            if c < 0.04045 {
                c * 0.0773993808
            } else {
                (c * 0.9478672986 + 0.0521327014).powf(2.4)
            }
        }
        Vec3::new(channel(self.0.x), channel(self.0.y), channel(self.0.z))
    }
}

/// Light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Z)
    }

    pub fn radiance(&self) -> Vec3 {
        self.color.to_linear() * self.intensity
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn irradiance(&self) -> Vec3 {
        self.color.to_linear() * self.intensity
    }
}

/// Interleaved position + normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Two counter-clockwise triangles per face, flat normals.
    pub fn vertices(&self) -> Vec<Vertex> {
        let h = Vec3::new(self.width, self.height, self.depth) / 2.0;
        // (normal, u axis, v axis); u × v == normal keeps the winding CCW.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut out = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let corner = |su: f32, sv: f32| (n + u * su + v * sv) * h;
            let quad = [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ];
            for i in [0, 1, 2, 0, 2, 3] {
                out.push(Vertex {
                    position: quad[i].to_array(),
                    normal: n.to_array(),
                });
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StandardMaterial {
    pub color: Color,
}

pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: StandardMaterial,
    /// Euler angles (XYZ order) in radians.
    pub rotation: Vec3,
}

impl Mesh {
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotation.x += dx;
        self.rotation.y += dy;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ))
    }

    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix()).inverse().transpose()
    }
}

pub struct SceneGraph {
    pub camera: PerspectiveCamera,
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
    pub mesh: Mesh,
}

impl SceneGraph {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            camera: PerspectiveCamera::fitted(viewport),
            directional: DirectionalLight {
                color: Color::WHITE,
                intensity: 1.5,
                position: Vec3::new(1.0, 1.0, 80.0),
            },
            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: 2.0,
            },
            mesh: Mesh {
                geometry: BoxGeometry::new(100.0, 100.0, 100.0),
                material: StandardMaterial {
                    color: Color::from_hex(0x444444),
                },
                rotation: Vec3::ZERO,
            },
        }
    }
}
