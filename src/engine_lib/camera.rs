// src/engine_lib/camera.rs

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_y_rad: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(90.0, 0.1, 180.0)
    }
}

impl Camera {
    pub fn new(fov_y_deg: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fov_y_rad: fov_y_deg.to_radians(),
            znear,
            zfar,
        }
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, aspect, self.znear, self.zfar)
    }

    /// Perspective times a y-up look-at from `eye` towards `target`.
    pub fn view_projection(&self, eye: Vec3, target: Vec3, aspect: f32) -> Mat4 {
        self.projection(aspect) * Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}
