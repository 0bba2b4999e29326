//! Command surface between the UI layer and the render core.
//!
//! The host owns everything that outlives a mount (pending images, the
//! pointer target, the selected mode) and, while mounted, the render loop.

use ripple_engine::coords::Vec2;

use crate::compositor::Compositor;
use crate::config::TrackerConfig;
use crate::mode::{Mode, ModeError};
use crate::queue::{ImageNode, PendingQueue};
use crate::render_loop::RenderLoop;
use crate::scheduler::FrameScheduler;
use crate::velocity::{PointerTarget, VelocityTracker};

/// Message from the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Adds an image to the scene on the next frame.
    EnqueueImage(ImageNode),
    /// Pointer position in surface pixels, origin top-left.
    SetPointer {
        x: f32,
        y: f32,
        surface_width: f32,
        surface_height: f32,
    },
    /// 1-based distortion mode selector.
    SetMode(u32),
}

/// Identifies one mount. Unmounting with an outdated handle does nothing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MountHandle(u64);

struct Mounted<C: Compositor, F: FrameScheduler> {
    handle: MountHandle,
    render_loop: RenderLoop<C, F>,
}

pub struct Host<C: Compositor, F: FrameScheduler> {
    queue: PendingQueue,
    pointer: PointerTarget,
    tracker: TrackerConfig,
    mode: Option<Mode>,
    mounted: Option<Mounted<C, F>>,
    next_handle: u64,
}

impl<C: Compositor, F: FrameScheduler> Host<C, F> {
    pub fn new(tracker: TrackerConfig) -> Self {
        Self {
            queue: PendingQueue::new(),
            pointer: PointerTarget::new(),
            tracker,
            mode: None,
            mounted: None,
            next_handle: 0,
        }
    }

    /// Applies one command. Only an invalid mode index fails.
    pub fn dispatch(&mut self, command: Command) -> Result<(), ModeError> {
        match command {
            Command::EnqueueImage(node) => self.enqueue_image(node),
            Command::SetPointer { x, y, surface_width, surface_height } => {
                self.set_pointer(x, y, surface_width, surface_height)
            }
            Command::SetMode(index) => {
                self.set_mode(index)?;
            }
        }
        Ok(())
    }

    /// Queues `node`; accepted whether or not a surface is mounted.
    pub fn enqueue_image(&self, node: ImageNode) {
        log::debug!("queued {}x{} image", node.width, node.height);
        self.queue.enqueue(node);
    }

    /// Converts a top-left pixel position into the normalized pointer target.
    ///
    /// Ignored while the surface has no area.
    pub fn set_pointer(&self, x: f32, y: f32, surface_width: f32, surface_height: f32) {
        if !(surface_width > 0.0 && surface_height > 0.0) {
            return;
        }
        self.pointer.set(Vec2::new(x / surface_width, 1.0 - y / surface_height));
    }

    /// Selects a distortion mode by its 1-based index.
    ///
    /// The choice survives remounts.
    pub fn set_mode(&mut self, index: u32) -> Result<Mode, ModeError> {
        let mode = Mode::try_from(index).map_err(|e| {
            log::warn!("rejected mode change: {e}");
            e
        })?;

        self.mode = Some(mode);
        if let Some(m) = self.mounted.as_mut() {
            m.render_loop.compositor_mut().set_mode(mode);
        }
        log::info!("distortion mode: {mode}");
        Ok(mode)
    }

    /// Starts rendering into `compositor`. A previous mount is stopped and
    /// dropped first.
    pub fn mount(&mut self, mut compositor: C, scheduler: F) -> MountHandle {
        if let Some(previous) = self.mounted.take() {
            log::debug!("replacing mount {:?}", previous.handle);
        }

        if let Some(mode) = self.mode {
            compositor.set_mode(mode);
        }

        self.next_handle += 1;
        let handle = MountHandle(self.next_handle);

        let mut render_loop = RenderLoop::new(
            compositor,
            scheduler,
            self.queue.clone(),
            self.pointer.clone(),
            VelocityTracker::new(self.tracker),
        );
        render_loop.start();

        log::info!("mounted {handle:?}");
        self.mounted = Some(Mounted { handle, render_loop });
        handle
    }

    /// Stops and drops the loop mounted under `handle`. Returns false for a
    /// stale or unknown handle.
    pub fn unmount(&mut self, handle: MountHandle) -> bool {
        match &self.mounted {
            Some(m) if m.handle == handle => {}
            _ => {
                log::debug!("ignoring unmount of stale {handle:?}");
                return false;
            }
        }
        if let Some(mut m) = self.mounted.take() {
            m.render_loop.stop();
        }
        log::info!("unmounted {handle:?}");
        true
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn mount_handle(&self) -> Option<MountHandle> {
        self.mounted.as_ref().map(|m| m.handle)
    }

    /// True while a mounted loop is waiting for its next frame.
    pub fn frame_pending(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.render_loop.scheduler().pending().is_some())
    }

    /// Fires the pending frame request, if any, into the mounted loop.
    pub fn run_frame(&mut self, frame: C::Frame<'_>) -> bool {
        let Some(m) = self.mounted.as_mut() else { return false };
        let Some(request) = m.render_loop.scheduler().pending() else { return false };
        m.render_loop.run_frame(request, frame)
    }

    pub fn render_loop(&self) -> Option<&RenderLoop<C, F>> {
        self.mounted.as_ref().map(|m| &m.render_loop)
    }

    pub fn render_loop_mut(&mut self) -> Option<&mut RenderLoop<C, F>> {
        self.mounted.as_mut().map(|m| &mut m.render_loop)
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn pointer(&self) -> &PointerTarget {
        &self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::PixelSource;
    use crate::scheduler::RedrawScheduler;
    use crate::uniforms::DistortUniforms;

    #[derive(Default)]
    struct Fake {
        uniforms: DistortUniforms,
        meshes: usize,
        renders: usize,
    }

    impl Compositor for Fake {
        type Frame<'f> = ();

        fn add_node(&mut self, _node: ImageNode) {
            self.meshes += 1;
        }

        fn uniforms(&self) -> &DistortUniforms {
            &self.uniforms
        }

        fn uniforms_mut(&mut self) -> &mut DistortUniforms {
            &mut self.uniforms
        }

        fn mesh_count(&self) -> usize {
            self.meshes
        }

        fn render(&mut self, _frame: ()) {
            self.renders += 1;
        }
    }

    fn host() -> Host<Fake, RedrawScheduler> {
        Host::new(TrackerConfig::default())
    }

    fn image() -> ImageNode {
        ImageNode::new(4.0, 4.0, PixelSource::solid(1, 1, [0, 0, 0, 255]))
    }

    fn compositor(h: &Host<Fake, RedrawScheduler>) -> &Fake {
        h.render_loop().unwrap().compositor()
    }

    // ── commands ──────────────────────────────────────────────────────────

    #[test]
    fn pointer_is_normalized_and_flipped() {
        let h = host();
        h.set_pointer(200.0, 150.0, 800.0, 600.0);
        assert_eq!(h.pointer().get(), Vec2::new(0.25, 0.75));

        h.set_pointer(0.0, 0.0, 800.0, 600.0);
        assert_eq!(h.pointer().get(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn pointer_over_empty_surface_is_ignored() {
        let h = host();
        h.set_pointer(25.0, 25.0, 100.0, 100.0);
        h.set_pointer(5.0, 5.0, 0.0, 100.0);
        assert_eq!(h.pointer().get(), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn invalid_mode_is_rejected() {
        let mut h = host();
        h.mount(Fake::default(), RedrawScheduler::new());
        assert_eq!(h.dispatch(Command::SetMode(4)), Err(ModeError::UnknownIndex(4)));
        assert_eq!(h.set_mode(0), Err(ModeError::UnknownIndex(0)));
        assert_eq!(compositor(&h).uniforms.mode(), Mode::Color);
    }

    #[test]
    fn mode_applies_to_mounted_compositor() {
        let mut h = host();
        h.mount(Fake::default(), RedrawScheduler::new());
        h.dispatch(Command::SetMode(3)).unwrap();
        assert_eq!(compositor(&h).uniforms.mode(), Mode::Random);
    }

    #[test]
    fn mode_set_before_mount_is_applied_on_mount() {
        let mut h = host();
        h.set_mode(2).unwrap();
        h.mount(Fake::default(), RedrawScheduler::new());
        assert_eq!(compositor(&h).uniforms.mode(), Mode::Zoom);
    }

    #[test]
    fn images_queued_before_mount_arrive_on_first_tick() {
        let mut h = host();
        h.dispatch(Command::EnqueueImage(image())).unwrap();
        h.dispatch(Command::EnqueueImage(image())).unwrap();
        h.mount(Fake::default(), RedrawScheduler::new());
        assert_eq!(compositor(&h).mesh_count(), 0);

        assert!(h.run_frame(()));
        assert_eq!(compositor(&h).mesh_count(), 2);
        assert!(h.queue().is_empty());
    }

    // ── mount lifecycle ───────────────────────────────────────────────────

    #[test]
    fn mount_starts_loop() {
        let mut h = host();
        assert!(!h.frame_pending());
        let handle = h.mount(Fake::default(), RedrawScheduler::new());
        assert_eq!(h.mount_handle(), Some(handle));
        assert!(h.frame_pending());
        assert!(h.render_loop().unwrap().is_running());
    }

    #[test]
    fn remount_replaces_previous_loop() {
        let mut h = host();
        let first = h.mount(Fake::default(), RedrawScheduler::new());
        h.run_frame(());
        let second = h.mount(Fake::default(), RedrawScheduler::new());
        assert_ne!(first, second);
        assert_eq!(compositor(&h).renders, 0);

        assert!(!h.unmount(first));
        assert!(h.is_mounted());
        assert!(h.unmount(second));
        assert!(!h.is_mounted());
    }

    #[test]
    fn unmount_stops_ticking() {
        let mut h = host();
        let handle = h.mount(Fake::default(), RedrawScheduler::new());
        assert!(h.run_frame(()));
        assert!(h.unmount(handle));
        assert!(!h.unmount(handle));
        assert!(!h.frame_pending());
        assert!(!h.run_frame(()));
    }
}
