//! Velocity-reactive image distortion.
//!
//! A photo is drawn onto a textured plane, then warped by a post-processing
//! pass whose strength follows pointer velocity. Per frame:
//!
//! ```text
//! Host ─┬─> PendingQueue ──┐
//!       └─> pointer target ─┴─> RenderLoop ─> DistortUniforms ─> Compositor ─> GPU
//! ```
//!
//! Everything runs on the event-loop thread; the queue and pointer target are
//! the only state shared between event callbacks and the frame tick.

pub mod app;
pub mod compositor;
pub mod config;
pub mod host;
pub mod mode;
pub mod queue;
pub mod render_loop;
pub mod scheduler;
pub mod uniforms;
pub mod velocity;

pub use app::DistortApp;
pub use compositor::{Compositor, GpuCompositor};
pub use config::{CameraConfig, DistortConfig, TrackerConfig};
pub use host::{Command, Host, MountHandle};
pub use mode::{Mode, ModeError};
pub use queue::{ImageNode, PendingQueue, PixelSource, PixelSourceError};
pub use render_loop::{LoopState, RenderLoop};
pub use scheduler::{FrameRequest, FrameScheduler, RedrawScheduler};
pub use uniforms::DistortUniforms;
pub use velocity::{Advance, PointerState, PointerTarget, VelocityTracker};
