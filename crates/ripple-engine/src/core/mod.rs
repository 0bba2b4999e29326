//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the layers above it. Runtime internals stay private; callbacks receive
//! small per-surface and per-frame contexts.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SurfaceCtx, WindowCtx};
