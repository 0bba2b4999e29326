//! Per-frame driver.
//!
//! ```text
//! Stopped --start()--> Running { pending } --stop()--> Stopped
//!                        |    ^
//!             run_frame  |    |  request_frame
//!                        v    |
//!                    drain -> advance -> render
//! ```

use crate::compositor::Compositor;
use crate::queue::PendingQueue;
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::velocity::{PointerState, PointerTarget, VelocityTracker};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Stopped,
    Running { pending: FrameRequest },
}

/// Drains new images into the compositor, advances the tracked pointer and
/// renders, once per scheduled frame.
pub struct RenderLoop<C: Compositor, F: FrameScheduler> {
    state: LoopState,
    compositor: C,
    scheduler: F,
    queue: PendingQueue,
    pointer: PointerTarget,
    tracker: VelocityTracker,
    pointer_state: PointerState,
    ticks: u64,
}

impl<C: Compositor, F: FrameScheduler> RenderLoop<C, F> {
    /// Creates a stopped loop reading from `queue` and `pointer`.
    pub fn new(
        compositor: C,
        scheduler: F,
        queue: PendingQueue,
        pointer: PointerTarget,
        tracker: VelocityTracker,
    ) -> Self {
        Self {
            state: LoopState::Stopped,
            compositor,
            scheduler,
            queue,
            pointer,
            tracker,
            pointer_state: PointerState::default(),
            ticks: 0,
        }
    }

    /// Schedules the first frame. No-op while running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let pending = self.scheduler.request_frame();
        self.state = LoopState::Running { pending };
        log::debug!("render loop started");
    }

    /// Cancels the pending frame. Idempotent.
    pub fn stop(&mut self) {
        if let LoopState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
            self.state = LoopState::Stopped;
            log::debug!("render loop stopped after {} ticks", self.ticks);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Handles a fired frame callback.
    ///
    /// Ticks only if the loop is running and `request` is the one it is
    /// waiting for; returns whether a tick ran.
    pub fn run_frame(&mut self, request: FrameRequest, frame: C::Frame<'_>) -> bool {
        match self.state {
            LoopState::Running { pending } if pending == request => {}
            _ => return false,
        }

        for node in self.queue.drain_all() {
            self.compositor.add_node(node);
        }

        self.pointer_state.target = self.pointer.get();
        self.tracker.step(&mut self.pointer_state);

        let uniforms = self.compositor.uniforms_mut();
        uniforms.set_mouse(self.pointer_state.current);
        uniforms.set_velocity(self.pointer_state.speed);

        self.compositor.render(frame);
        self.ticks += 1;

        let pending = self.scheduler.request_frame();
        self.state = LoopState::Running { pending };
        true
    }

    /// Number of completed ticks.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pointer_state(&self) -> &PointerState {
        &self.pointer_state
    }

    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut C {
        &mut self.compositor
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

impl<C: Compositor, F: FrameScheduler> Drop for RenderLoop<C, F> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use ripple_engine::coords::Vec2;

    use super::*;
    use crate::config::TrackerConfig;
    use crate::queue::{ImageNode, PixelSource};
    use crate::scheduler::RedrawScheduler;
    use crate::uniforms::{DistortUniformBlock, DistortUniforms};

    #[derive(Default)]
    struct Recorder {
        uniforms: DistortUniforms,
        meshes: Vec<(f32, f32)>,
        renders: Vec<DistortUniformBlock>,
    }

    impl Compositor for Recorder {
        type Frame<'f> = ();

        fn add_node(&mut self, node: ImageNode) {
            self.meshes.push((node.width, node.height));
        }

        fn uniforms(&self) -> &DistortUniforms {
            &self.uniforms
        }

        fn uniforms_mut(&mut self) -> &mut DistortUniforms {
            &mut self.uniforms
        }

        fn mesh_count(&self) -> usize {
            self.meshes.len()
        }

        fn render(&mut self, _frame: ()) {
            self.renders.push(self.uniforms.snapshot());
        }
    }

    type TestLoop = RenderLoop<Recorder, RedrawScheduler>;

    fn make_loop() -> (TestLoop, PendingQueue, PointerTarget) {
        let queue = PendingQueue::new();
        let pointer = PointerTarget::new();
        let l = RenderLoop::new(
            Recorder::default(),
            RedrawScheduler::new(),
            queue.clone(),
            pointer.clone(),
            VelocityTracker::new(TrackerConfig::default()),
        );
        (l, queue, pointer)
    }

    fn fire(l: &mut TestLoop) -> bool {
        match l.scheduler().pending() {
            Some(req) => l.run_frame(req, ()),
            None => false,
        }
    }

    fn node(w: f32, h: f32) -> ImageNode {
        ImageNode::new(w, h, PixelSource::solid(1, 1, [255; 4]))
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn new_loop_is_stopped_and_schedules_nothing() {
        let (l, _, _) = make_loop();
        assert_eq!(l.state(), LoopState::Stopped);
        assert_eq!(l.scheduler().pending(), None);
    }

    #[test]
    fn start_twice_keeps_one_pending_frame() {
        let (mut l, _, _) = make_loop();
        l.start();
        let first = l.state();
        l.start();
        assert_eq!(l.state(), first);
    }

    #[test]
    fn stop_is_idempotent_and_cancels() {
        let (mut l, _, _) = make_loop();
        l.start();
        l.stop();
        l.stop();
        assert!(!l.is_running());
        assert_eq!(l.scheduler().pending(), None);
    }

    #[test]
    fn stale_request_does_not_tick() {
        let (mut l, _, _) = make_loop();
        l.start();
        let stale = l.scheduler().pending().unwrap();
        assert!(fire(&mut l));
        assert!(!l.run_frame(stale, ()));
        assert_eq!(l.ticks(), 1);
    }

    #[test]
    fn no_ticks_after_stop() {
        let (mut l, _, pointer) = make_loop();
        l.start();
        pointer.set(Vec2::new(1.0, 1.0));
        fire(&mut l);
        let request = l.scheduler().pending().unwrap();
        l.stop();

        let before = l.compositor().uniforms;
        for _ in 0..5 {
            assert!(!l.run_frame(request, ()));
            assert!(!fire(&mut l));
        }
        assert_eq!(l.compositor().uniforms, before);
        assert_eq!(l.compositor().renders.len(), 1);
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_drains_queue_into_meshes() {
        let (mut l, queue, _) = make_loop();
        l.start();
        queue.enqueue(node(10.0, 20.0));
        queue.enqueue(node(30.0, 40.0));
        fire(&mut l);
        assert_eq!(l.compositor().mesh_count(), 2);
        assert!(queue.is_empty());

        queue.enqueue(node(5.0, 5.0));
        fire(&mut l);
        assert_eq!(l.compositor().meshes, vec![(10.0, 20.0), (30.0, 40.0), (5.0, 5.0)]);
    }

    #[test]
    fn tick_writes_pointer_before_render() {
        let (mut l, _, pointer) = make_loop();
        l.start();
        pointer.set(Vec2::new(0.0, 0.025));
        fire(&mut l);

        let block = l.compositor().renders[0];
        assert_eq!(block.mouse, [0.0, 0.025]);
        assert!((block.velocity - 0.5).abs() < 1e-5);
    }

    #[test]
    fn mode_change_reaches_next_render() {
        let (mut l, _, _) = make_loop();
        l.start();
        fire(&mut l);
        l.compositor_mut().set_mode(crate::Mode::Zoom);
        fire(&mut l);
        let renders = &l.compositor().renders;
        assert_eq!(renders[0].mode, 1);
        assert_eq!(renders[1].mode, 2);
    }

    #[test]
    fn velocity_decays_when_pointer_rests() {
        let (mut l, _, pointer) = make_loop();
        l.start();
        pointer.set(Vec2::new(0.2, 0.0));
        for _ in 0..6 {
            fire(&mut l);
        }
        let last = l.compositor().renders.last().unwrap();
        assert_eq!(last.velocity, 0.0);
        assert_eq!(last.mouse, [0.2, 0.0]);
    }
}
