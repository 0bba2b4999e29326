//! Small coordinate types shared by the runtime and the effect layers.
//!
//! Pointer space conventions:
//! - window events arrive in logical pixels, origin top-left, +Y down
//! - the effect works in normalized pointer space, origin bottom-left, +Y up

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
