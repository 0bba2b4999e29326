//! Renderer-facing GPU handles.
//!
//! Renderers own their GPU resources (pipelines, buffers, textures) and receive
//! device access through [`RenderCtx`] and a frame to record into through
//! [`RenderTarget`].

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
