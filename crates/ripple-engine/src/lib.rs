//! Ripple engine crate.
//!
//! Owns the platform + GPU runtime pieces the distortion effect is built on:
//! the wgpu device/surface, the winit event loop, platform-agnostic input and
//! logger setup.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
