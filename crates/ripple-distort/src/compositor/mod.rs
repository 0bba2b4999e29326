//! Scene composition: image meshes, the base scene pass and the distortion
//! post-process.
//!
//! [`Compositor`] is the seam between the frame loop and the GPU. The wgpu
//! implementation is [`GpuCompositor`]; tests drive the loop with recording
//! fakes.

mod camera;
mod distort_pass;
mod geometry;
mod gpu;
mod material;
mod target;

pub use camera::Camera;
pub use gpu::GpuCompositor;

use ripple_engine::coords::Viewport;

use crate::mode::Mode;
use crate::queue::ImageNode;
use crate::uniforms::DistortUniforms;

/// Owner of the render graph and the live meshes.
pub trait Compositor {
    /// What `render` draws into for one frame.
    type Frame<'f>;

    /// Turns `node` into a live mesh. Ownership of its pixels moves into the
    /// mesh's material.
    fn add_node(&mut self, node: ImageNode);

    fn uniforms(&self) -> &DistortUniforms;

    fn uniforms_mut(&mut self) -> &mut DistortUniforms;

    /// Selects the distortion function used from the next render on.
    fn set_mode(&mut self, mode: Mode) {
        self.uniforms_mut().set_mode(mode);
    }

    fn mesh_count(&self) -> usize;

    /// Adapts to a new drawable size. `viewport` is in logical pixels,
    /// `surface_size` in physical pixels.
    fn resize(&mut self, viewport: Viewport, surface_size: (u32, u32)) {
        let _ = surface_size;
        self.uniforms_mut().set_viewport(viewport);
    }

    /// Runs the full pass chain with the current uniform values.
    fn render(&mut self, frame: Self::Frame<'_>);
}
