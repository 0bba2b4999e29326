//! Shader parameter state and its GPU block layouts.
//!
//! Uniform contract (names and types must change in lockstep with the WGSL):
//! - distortion pass: `resolution: vec2<f32>`, `mouse: vec2<f32>`,
//!   `velocity: f32`, `mode: i32`
//! - base texture pass: `resolution: vec2<f32>` next to the camera matrix,
//!   plus a per-mesh `model` matrix and texture/sampler pair
//!
//! The texture shader does not read its `resolution` yet; it is uploaded so
//! the block keeps the layout the contract names.

use bytemuck::{Pod, Zeroable};
use ripple_engine::coords::{Vec2, Viewport};

use crate::mode::Mode;

/// CPU-side source of truth for the distortion pass uniforms.
///
/// Written by the render loop once per frame (mouse, velocity) and by mode
/// selection; read through [`snapshot`](Self::snapshot) when the pass is
/// encoded. The GPU picks up a change through the per-frame buffer write, so
/// there is no dirty tracking.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DistortUniforms {
    resolution: Vec2,
    mouse: Vec2,
    velocity: f32,
    mode: Mode,
}

impl Default for DistortUniforms {
    fn default() -> Self {
        Self {
            resolution: Vec2::new(1.0, 1.0),
            mouse: Vec2::zero(),
            velocity: 0.0,
            mode: Mode::default(),
        }
    }
}

impl DistortUniforms {
    pub fn new(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    #[inline]
    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    #[inline]
    pub fn set_resolution(&mut self, resolution: Vec2) {
        self.resolution = resolution;
    }

    /// Sets the aspect-corrected resolution `(1, width / height)`.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.resolution = aspect_resolution(viewport);
    }

    #[inline]
    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    #[inline]
    pub fn set_mouse(&mut self, mouse: Vec2) {
        self.mouse = mouse;
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Packs the current values into the layout the distortion shader reads.
    pub fn snapshot(&self) -> DistortUniformBlock {
        DistortUniformBlock {
            resolution: self.resolution.to_array(),
            mouse: self.mouse.to_array(),
            velocity: self.velocity,
            mode: self.mode.uniform_value(),
            _pad: [0.0; 2],
        }
    }
}

/// `(1, width / height)`; a degenerate viewport yields `(1, 1)`.
pub fn aspect_resolution(viewport: Viewport) -> Vec2 {
    Vec2::new(1.0, viewport.aspect())
}

// ── GPU blocks ────────────────────────────────────────────────────────────

/// Distortion pass uniform block (32 bytes).
///
///  offset  0  resolution  vec2<f32>
///  offset  8  mouse       vec2<f32>
///  offset 16  velocity    f32
///  offset 20  mode        i32
///  offset 24  _pad        vec2<f32>
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DistortUniformBlock {
    pub resolution: [f32; 2],
    pub mouse: [f32; 2],
    pub velocity: f32,
    pub mode: i32,
    pub _pad: [f32; 2],
}

/// Base texture pass, shared by every mesh (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniformBlock {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

/// Base texture pass, one per mesh (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshUniformBlock {
    pub model: [[f32; 4]; 4],
}
