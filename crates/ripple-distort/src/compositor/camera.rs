use glam::{Mat4, Vec3};
use ripple_engine::coords::Viewport;

use crate::config::CameraConfig;

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    viewport: Viewport,
}

impl Camera {
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    fn half_fov_tan(&self) -> f32 {
        (self.config.fov_y_degrees.to_radians() * 0.5).tan()
    }

    /// Distance from the eye to the z = 0 plane.
    pub fn distance(&self) -> f32 {
        if self.config.fit_viewport && self.viewport.is_valid() {
            (self.viewport.height * 0.5) / self.half_fov_tan()
        } else {
            self.config.distance
        }
    }

    /// Far plane, pushed out if a fitted distance would clip the image plane.
    fn far(&self) -> f32 {
        self.config.far.max(self.distance() * 2.0)
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            self.viewport.aspect(),
            self.config.near,
            self.far(),
        );
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance()), Vec3::ZERO, Vec3::Y);
        proj * view
    }
}

/// Model matrix for a unit quad stretched to `width` x `height`.
pub(crate) fn plane_model(width: f32, height: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(width, height, 1.0))
}
