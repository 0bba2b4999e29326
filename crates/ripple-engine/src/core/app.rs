use winit::window::WindowId;

use crate::input::InputEvent;

use super::ctx::{FrameCtx, SurfaceCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Surface callbacks bracket the lifetime of a window's GPU surface: every
/// `on_surface_created` is followed by exactly one `on_surface_destroyed` for
/// the same window, including when the event loop exits.
pub trait App {
    /// Called once after a window and its GPU surface have been created.
    fn on_surface_created(&mut self, ctx: &mut SurfaceCtx<'_, '_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured for a new size.
    fn on_surface_resized(&mut self, ctx: &mut SurfaceCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called right before a window and its surface are released.
    fn on_surface_destroyed(&mut self, window_id: WindowId) {
        let _ = window_id;
    }

    /// Called for translated input events.
    fn on_input(&mut self, window: &WindowCtx<'_>, event: &InputEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called for every redraw the platform delivers.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
