use std::collections::HashMap;

use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::window::WindowId;

use ripple_engine::coords::Viewport;
use ripple_engine::core::{App as EngineApp, AppControl, FrameCtx, SurfaceCtx, WindowCtx};
use ripple_engine::device::GpuInit;
use ripple_engine::input::{InputEvent, Key, KeyState};
use ripple_engine::window::{Runtime, RuntimeConfig};

use crate::compositor::{Compositor, GpuCompositor};
use crate::config::DistortConfig;
use crate::host::{Command, Host, MountHandle};
use crate::queue::ImageNode;
use crate::scheduler::RedrawScheduler;

type KeyHandler = Box<dyn FnMut() -> Option<Command>>;

// ── DistortApp ────────────────────────────────────────────────────────────

/// Windowed shell around the distortion effect.
///
/// ```rust,ignore
/// DistortApp::new(DistortConfig::default())
///     .title("ripple")
///     .image(node)
///     .on_key(Key::N, move || Some(Command::EnqueueImage(next_image())))
///     .run()?;
/// ```
///
/// Unbound digit keys select the distortion mode by index (only 1 to 3 are
/// accepted) and Escape quits. [`on_key`](Self::on_key) bindings take
/// precedence.
pub struct DistortApp {
    title: String,
    width: f64,
    height: f64,
    config: DistortConfig,
    images: Vec<ImageNode>,
    key_handlers: HashMap<Key, KeyHandler>,
}

impl DistortApp {
    pub fn new(config: DistortConfig) -> Self {
        Self {
            title: "ripple".to_string(),
            width: 1280.0,
            height: 720.0,
            config,
            images: Vec::new(),
            key_handlers: HashMap::new(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Queues an image for the first frame.
    pub fn image(mut self, node: ImageNode) -> Self {
        self.images.push(node);
        self
    }

    /// Binds `key` to a command producer. Returning `None` does nothing.
    pub fn on_key(mut self, key: Key, f: impl FnMut() -> Option<Command> + 'static) -> Self {
        self.key_handlers.insert(key, Box::new(f));
        self
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        Runtime::run(config, GpuInit::default(), DistortShell::new(self))
    }
}

// ── DistortShell ──────────────────────────────────────────────────────────

/// Engine-facing side of [`DistortApp`].
struct DistortShell {
    config: DistortConfig,
    host: Host<GpuCompositor, RedrawScheduler>,
    mount: Option<(WindowId, MountHandle)>,
    key_handlers: HashMap<Key, KeyHandler>,
}

impl DistortShell {
    fn new(app: DistortApp) -> Self {
        let host = Host::new(app.config.tracker);
        for node in app.images {
            host.enqueue_image(node);
        }
        Self {
            config: app.config,
            host,
            mount: None,
            key_handlers: app.key_handlers,
        }
    }

    fn dispatch(&mut self, command: Command) {
        // Rejections are already logged by the host.
        let _ = self.host.dispatch(command);
    }

    /// Turns a newly scheduled frame into a window redraw.
    fn sync_redraw(&mut self, window: &WindowCtx<'_>) {
        let wants_redraw = self
            .host
            .render_loop_mut()
            .is_some_and(|l| l.scheduler_mut().take_redraw());
        if wants_redraw {
            window.request_redraw();
        }
    }

    fn on_key(&mut self, key: Key) -> AppControl {
        let action = match self.key_handlers.get_mut(&key) {
            Some(handler) => handler().map_or(KeyAction::Ignore, KeyAction::Dispatch),
            None => default_key_action(key),
        };
        match action {
            KeyAction::Dispatch(command) => self.dispatch(command),
            KeyAction::Exit => return AppControl::Exit,
            KeyAction::Ignore => {}
        }
        AppControl::Continue
    }
}

#[derive(Debug, PartialEq)]
enum KeyAction {
    Dispatch(Command),
    Exit,
    Ignore,
}

fn default_key_action(key: Key) -> KeyAction {
    if key == Key::Escape {
        return KeyAction::Exit;
    }
    match key.digit() {
        Some(index) => KeyAction::Dispatch(Command::SetMode(index)),
        None => KeyAction::Ignore,
    }
}

/// A frame that never reached the surface is retried, except while the window
/// has no area: the next resize schedules a redraw then.
fn retry_missed_frame(frame_pending: bool, surface_size: (u32, u32)) -> bool {
    frame_pending && surface_size.0 > 0 && surface_size.1 > 0
}

impl EngineApp for DistortShell {
    fn on_surface_created(&mut self, ctx: &mut SurfaceCtx<'_, '_>) -> AppControl {
        if self.mount.is_some() {
            log::warn!("ignoring additional window {:?}", ctx.window.id);
            return AppControl::Continue;
        }

        let compositor = GpuCompositor::new(&ctx.render_ctx(), &self.config);
        let handle = self.host.mount(compositor, RedrawScheduler::new());
        self.mount = Some((ctx.window.id, handle));
        self.sync_redraw(&ctx.window);
        AppControl::Continue
    }

    fn on_surface_resized(&mut self, ctx: &mut SurfaceCtx<'_, '_>) {
        let (w, h) = ctx.window.logical_size();
        let size = ctx.gpu.size();
        if let Some(l) = self.host.render_loop_mut() {
            l.compositor_mut().resize(Viewport::new(w, h), (size.width, size.height));
        }
    }

    fn on_surface_destroyed(&mut self, window_id: WindowId) {
        match self.mount {
            Some((id, handle)) if id == window_id => {
                self.host.unmount(handle);
                self.mount = None;
            }
            _ => {}
        }
    }

    fn on_input(&mut self, window: &WindowCtx<'_>, event: &InputEvent) -> AppControl {
        match event {
            InputEvent::PointerMoved(p) => {
                let (w, h) = window.logical_size();
                self.dispatch(Command::SetPointer {
                    x: p.x,
                    y: p.y,
                    surface_width: w,
                    surface_height: h,
                });
                AppControl::Continue
            }
            InputEvent::Key { key, state: KeyState::Pressed, repeat: false } => self.on_key(*key),
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let host = &mut self.host;
        let mut ticked = false;
        let control = ctx.render(|_, target| {
            ticked = host.run_frame(target.reborrow());
        });

        let size = ctx.gpu.size();
        if ticked {
            self.sync_redraw(&ctx.window);
        } else if retry_missed_frame(self.host.frame_pending(), (size.width, size.height)) {
            ctx.window.request_redraw();
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn digits_select_mode_by_index() {
        assert_eq!(default_key_action(Key::Digit2), KeyAction::Dispatch(Command::SetMode(2)));
        // Out-of-range digits still dispatch; the host rejects them.
        assert_eq!(default_key_action(Key::Digit7), KeyAction::Dispatch(Command::SetMode(7)));
    }

    #[test]
    fn escape_exits_and_other_keys_are_ignored() {
        assert_eq!(default_key_action(Key::Escape), KeyAction::Exit);
        assert_eq!(default_key_action(Key::Q), KeyAction::Ignore);
    }

    // ── redraw ────────────────────────────────────────────────────────────

    #[test]
    fn missed_frame_is_retried_on_visible_surface() {
        assert!(retry_missed_frame(true, (800, 600)));
        assert!(!retry_missed_frame(false, (800, 600)));
    }

    #[test]
    fn minimized_surface_waits_for_resize() {
        assert!(!retry_missed_frame(true, (0, 0)));
        assert!(!retry_missed_frame(true, (800, 0)));
    }
}
