//! Effect configuration.
//!
//! Plain structs with defaults that give the stock look; override
//! fields directly before handing the config to [`DistortApp`](crate::DistortApp).

use crate::mode::Mode;

/// Pointer smoothing parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Largest distance the tracked pointer may travel per frame, in
    /// normalized pointer units.
    pub max_step: f32,
    /// Multiplier from per-frame displacement to the shader's velocity value.
    pub gain: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_step: 0.05,
            gain: 20.0,
        }
    }
}

/// Perspective camera looking down -Z at the image planes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the camera to the z = 0 plane.
    pub distance: f32,
    /// When set, `distance` is ignored and derived from the viewport height so
    /// one world unit maps to one logical pixel on the z = 0 plane.
    pub fit_viewport: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            near: 0.001,
            far: 1000.0,
            distance: 400.0,
            fit_viewport: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistortConfig {
    pub tracker: TrackerConfig,
    pub camera: CameraConfig,
    pub initial_mode: Mode,
    /// Background of the scene pass, visible around the image planes.
    pub clear_color: wgpu::Color,
}

impl Default for DistortConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            camera: CameraConfig::default(),
            initial_mode: Mode::Color,
            clear_color: wgpu::Color::BLACK,
        }
    }
}
