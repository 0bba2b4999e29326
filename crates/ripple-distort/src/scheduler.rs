//! Per-frame callback scheduling.
//!
//! The render loop never calls itself: it asks a [`FrameScheduler`] for the
//! next frame and gets a [`FrameRequest`] token back. The platform later fires
//! the pending token into the loop. Cancelling the token is how `stop()`
//! guarantees no further ticks.

/// Token for one scheduled frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Platform per-frame callback primitive.
pub trait FrameScheduler {
    /// Schedules one frame callback and returns its token.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancels `request` if it is still pending. Unknown tokens are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// The request the platform should fire next, if any.
    fn pending(&self) -> Option<FrameRequest>;
}

/// Scheduler backed by the window's redraw requests.
///
/// Holds at most one pending request. Whoever owns the window polls
/// [`take_redraw`](Self::take_redraw) into `request_redraw()` and, when the
/// redraw arrives, fires [`pending`](FrameScheduler::pending) into the render
/// loop. A redraw that arrives after cancellation finds nothing pending and
/// ticks nothing.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
    redraw: bool,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once per request that still needs a window redraw.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw) && self.pending.is_some()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id = self.next_id.wrapping_add(1);
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        self.redraw = true;
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }
}
