//! wgpu device and window surface.
//!
//! [`Gpu`] owns the adapter, device, queue and swapchain of one window and
//! hands out [`GpuFrame`]s. Format and error policy live in `surface` as
//! plain functions.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
