//! # Stroke renderer
//!
//! Turns pointer events into smoothed strokes. Input and drawing run at different rates: pointer moves
//! only append to a buffer, and the buffer is drained once per frame through
//! [`draw_smooth_segment`]. A burst of moves between two frames therefore costs one flush, not one flush
//! per sample.
//!
//! The renderer knows nothing about windows or event loops. It needs two capabilities from its host:
//! exclusive capture of a pointer ([`InputSurface`]) and a cancellable per-frame callback
//! ([`FrameScheduler`]). [`PointerCapture`] and [`FrameQueue`] are the plain implementations used by
//! headless hosts and tests.

use crate::{
    geometry::{apply_style, draw_smooth_segment, is_allowed_pointer_type, Point, SmoothState},
    style::DrawingStyle,
    surface::Surface,
};

pub type PointerId = u32;

/// The bits of a pointer event the renderer cares about.
pub trait PointerLike {
    fn id(&self) -> PointerId;
    /// `"pen"`, `"mouse"`, `"touch"`, or anything else the platform reports.
    fn pointer_type(&self) -> &str;
    /// Position in canvas pixels.
    fn position(&self) -> Point;
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct PointerSample {
    pub id: PointerId,
    pub pointer_type: String,
    pub x: f32,
    pub y: f32,
}
impl PointerSample {
    #[must_use]
    pub fn new(id: PointerId, pointer_type: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id,
            pointer_type: pointer_type.into(),
            x,
            y,
        }
    }
}
impl PointerLike for PointerSample {
    fn id(&self) -> PointerId {
        self.id
    }
    fn pointer_type(&self) -> &str {
        &self.pointer_type
    }
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("pointer {0} is held by pointer {1}")]
    Busy(PointerId, PointerId),
    #[error("pointer {0} is not captured")]
    NotCaptured(PointerId),
}

/// Routes every event of one pointer to the canvas until released, even once it leaves the canvas bounds.
pub trait InputSurface {
    /// # Errors
    /// If the platform refuses the capture.
    fn capture(&mut self, id: PointerId) -> Result<(), CaptureError>;
    /// # Errors
    /// If `id` wasn't captured. Callers treat this as best-effort.
    fn release(&mut self, id: PointerId) -> Result<(), CaptureError>;
}

/// Bookkeeping-only capture, for hosts where routing is implicit.
#[derive(Default, Debug)]
pub struct PointerCapture {
    captured: Option<PointerId>,
}
impl PointerCapture {
    #[must_use]
    pub fn captured(&self) -> Option<PointerId> {
        self.captured
    }
}
impl InputSurface for PointerCapture {
    fn capture(&mut self, id: PointerId) -> Result<(), CaptureError> {
        match self.captured {
            Some(holder) if holder != id => Err(CaptureError::Busy(id, holder)),
            _ => {
                self.captured = Some(id);
                Ok(())
            }
        }
    }
    fn release(&mut self, id: PointerId) -> Result<(), CaptureError> {
        if self.captured == Some(id) {
            self.captured = None;
            Ok(())
        } else {
            Err(CaptureError::NotCaptured(id))
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameHandle(u64);

/// Requests a callback on the next display frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancelling a handle that already fired or was never issued is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A cooperative scheduler: requests pile up until the host collects them with [`Self::take_due`]
/// on its next frame or timer tick.
#[derive(Default, Debug)]
pub struct FrameQueue {
    next_handle: u64,
    requested: smallvec::SmallVec<[FrameHandle; 2]>,
}
impl FrameQueue {
    /// Collect every request made since the last call.
    pub fn take_due(&mut self) -> smallvec::SmallVec<[FrameHandle; 2]> {
        std::mem::take(&mut self.requested)
    }
    /// Whether nothing is waiting for a frame.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.requested.is_empty()
    }
}
impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.requested.push(handle);
        handle
    }
    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requested.retain(|requested| *requested != handle);
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum StrokeState {
    Idle,
    Drawing { pointer: PointerId },
}

pub struct StrokeRenderer<I, F> {
    input: I,
    scheduler: F,
    style: DrawingStyle,
    state: StrokeState,
    /// Samples received since the last flush.
    pending: smallvec::SmallVec<[Point; 16]>,
    smooth: SmoothState,
    frame: Option<FrameHandle>,
    on_draw_end: Option<Box<dyn FnMut()>>,
}
impl<I: InputSurface, F: FrameScheduler> StrokeRenderer<I, F> {
    pub fn new(input: I, scheduler: F, style: DrawingStyle) -> Self {
        Self {
            input,
            scheduler,
            style,
            state: StrokeState::Idle,
            pending: smallvec::SmallVec::new(),
            smooth: SmoothState::default(),
            frame: None,
            on_draw_end: None,
        }
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }
    #[must_use]
    pub fn style(&self) -> &DrawingStyle {
        &self.style
    }
    /// Style used by every flush from now on, including the rest of a stroke in progress.
    pub fn set_style(&mut self, style: DrawingStyle) {
        self.style = style;
    }
    /// Called once for every completed stroke.
    pub fn set_on_draw_end(&mut self, hook: impl FnMut() + 'static) {
        self.on_draw_end = Some(Box::new(hook));
    }
    pub fn input(&self) -> &I {
        &self.input
    }
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
    fn allowed(&self, event: &impl PointerLike) -> bool {
        is_allowed_pointer_type(event.pointer_type(), self.style.pen_only)
    }
    /// Whether `event` belongs to the stroke in progress. The pointer type was vetted at the start, so a
    /// style change mid-stroke can't strand it.
    fn owns(&self, event: &impl PointerLike) -> bool {
        self.state == StrokeState::Drawing { pointer: event.id() }
    }
    fn schedule(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }
    fn unschedule(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
    }
    fn release(&mut self, pointer: PointerId) {
        if let Err(e) = self.input.release(pointer) {
            log::debug!("Ignoring failed pointer release: {e}");
        }
    }
    fn flush<S: Surface>(&mut self, surface: &mut S) {
        if self.pending.is_empty() {
            return;
        }
        let points = std::mem::take(&mut self.pending);
        apply_style(surface, &self.style);
        self.smooth = draw_smooth_segment(
            surface,
            &points,
            self.smooth.last_pos,
            self.smooth.mid_point,
        );
        log::trace!("Flushed {} samples", points.len());
    }
    /// Begin a stroke, if idle and the pointer type may draw.
    pub fn on_pointer_start(&mut self, event: &impl PointerLike) {
        if self.is_drawing() || !self.allowed(event) {
            return;
        }
        let pointer = event.id();
        if let Err(e) = self.input.capture(pointer) {
            // Drawing still works, it just stops at the canvas edge.
            log::warn!("Failed to capture pointer: {e}");
        }
        let start = event.position();
        self.state = StrokeState::Drawing { pointer };
        // Degenerate first segment, so a tap still leaves a dot.
        self.smooth = SmoothState {
            last_pos: start,
            mid_point: start,
        };
        self.pending.clear();
        self.pending.push(start);
        self.schedule();
    }
    /// Buffer a sample. Never draws.
    pub fn on_pointer_move(&mut self, event: &impl PointerLike) {
        if self.owns(event) {
            self.pending.push(event.position());
        }
    }
    /// Run the frame callback for `handle`. Handles this renderer didn't request, or already
    /// cancelled, are ignored.
    pub fn on_frame<S: Surface>(&mut self, handle: FrameHandle, surface: &mut S) {
        if self.frame != Some(handle) {
            return;
        }
        self.frame = None;
        self.flush(surface);
        if self.is_drawing() {
            self.schedule();
        }
    }
    /// Finish the stroke: final flush, stop the loop, release the pointer, fire `on_draw_end`.
    /// Returns whether a stroke completed. Events for anything but the stroke's own pointer are ignored.
    pub fn on_pointer_end<S: Surface>(&mut self, event: &impl PointerLike, surface: &mut S) -> bool {
        if !self.owns(event) {
            return false;
        }
        self.state = StrokeState::Idle;
        self.release(event.id());
        self.flush(surface);
        self.unschedule();
        if let Some(hook) = self.on_draw_end.as_mut() {
            hook();
        }
        true
    }
    /// Identical to [`Self::on_pointer_end`], so a pointer dragged off the canvas can't leave a stroke hanging.
    pub fn on_pointer_leave<S: Surface>(&mut self, event: &impl PointerLike, surface: &mut S) -> bool {
        self.on_pointer_end(event, surface)
    }
    /// Abandon any stroke in progress without drawing what's buffered or firing `on_draw_end`.
    pub fn cancel(&mut self) {
        self.unschedule();
        if let StrokeState::Drawing { pointer } = self.state {
            self.release(pointer);
        }
        self.state = StrokeState::Idle;
        self.pending.clear();
    }
}
impl<I: InputSurface> StrokeRenderer<I, FrameQueue> {
    /// Collect due frames from the queue and run them. Returns how many ran.
    pub fn run_due_frames<S: Surface>(&mut self, surface: &mut S) -> usize {
        let due = self.scheduler.take_due();
        for &handle in &due {
            self.on_frame(handle, surface);
        }
        due.len()
    }
}
