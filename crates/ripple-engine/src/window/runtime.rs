use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SurfaceCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ripple".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Redraws are demand-driven: the runtime only delivers `on_frame` after the
/// app asked for one through `WindowCtx::request_redraw` (or after a resize).
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.windows.insert(id, entry);
        log::debug!("window {id:?} created");

        let mut control = AppControl::Continue;
        if let Some(entry) = self.windows.get(&id) {
            let app = &mut self.app;
            entry.with(|fields| {
                let mut ctx = SurfaceCtx {
                    window: WindowCtx { id, window: fields.window },
                    gpu: fields.gpu,
                };
                control = app.on_surface_created(&mut ctx);
            });
        }

        if control == AppControl::Exit {
            self.destroy_window_entry(id);
            anyhow::bail!("application rejected surface for window {id:?}");
        }

        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if self.windows.contains_key(&id) {
            // The app releases its GPU resources before the surface goes away.
            self.app.on_surface_destroyed(id);
            self.windows.remove(&id);
            log::debug!("window {id:?} destroyed");
        }
    }

    fn destroy_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.destroy_window_entry(id);
        }
    }

    fn resize_surface(&mut self, window_id: WindowId, new_size: Option<winit::dpi::PhysicalSize<u32>>) {
        let (app, windows) = (&mut self.app, &mut self.windows);
        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        entry.with_mut(|fields| {
            let size = new_size.unwrap_or_else(|| fields.window.inner_size());
            fields.gpu.resize(size);
            if size.width == 0 || size.height == 0 {
                return;
            }

            let mut ctx = SurfaceCtx {
                window: WindowCtx { id: window_id, window: fields.window },
                gpu: &*fields.gpu,
            };
            app.on_surface_resized(&mut ctx);
            fields.window.request_redraw();
        });
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit(event_loop);
                }
                return;
            }

            WindowEvent::Resized(new_size) => {
                self.resize_surface(window_id, Some(*new_size));
                return;
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_surface(window_id, None);
                return;
            }

            _ => {}
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut control = AppControl::Continue;

        if let WindowEvent::RedrawRequested = event {
            entry.with_mut(|fields| {
                let mut ctx = FrameCtx {
                    window: WindowCtx { id: window_id, window: fields.window },
                    gpu: fields.gpu,
                };
                control = app.on_frame(&mut ctx);
            });
        } else {
            entry.with(|fields| {
                if let Some(ev) = translate_window_event(fields.window, &event) {
                    let window = WindowCtx { id: window_id, window: fields.window };
                    control = app.on_input(&window, &ev);
                }
            });
        }

        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Every created surface gets its destroy callback, including on exit.
        self.destroy_all();
    }
}
