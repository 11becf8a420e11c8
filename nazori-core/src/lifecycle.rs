//! # Canvas lifecycle
//!
//! Keeps the canvas the size of its container. Resizing reallocates the bitmap, so the old pixels are
//! copied back at the origin; whatever falls outside the new bounds is lost. Because resizing also
//! resets pen state on real surfaces, the current style is reapplied afterwards.

use crate::{
    canvas::Canvas,
    geometry::{apply_style, Size},
    style::DrawingStyle,
    surface::Surface,
};

/// Match the canvas to `bounds`. Returns `false` without touching anything if the size already
/// matches, so spurious layout notifications don't cost a reallocation.
///
/// A container with no area (collapsed, hidden) is ignored and also returns `false`.
pub fn resize_to_container(canvas: &mut Canvas, bounds: Size, style: &DrawingStyle) -> bool {
    if canvas.size() == bounds {
        return false;
    }
    if let Err(e) = canvas.resize(bounds) {
        log::debug!("Not resizing canvas: {e}");
        return false;
    }
    apply_style(canvas, style);
    log::trace!("Canvas resized to {}x{}", bounds.width, bounds.height);
    true
}

/// Tracks container size, holding resizes back while a stroke is in progress.
#[derive(Default, Debug)]
pub struct CanvasLifecycle {
    bounds: Option<Size>,
    deferred: bool,
}
impl CanvasLifecycle {
    /// Last container size reported.
    #[must_use]
    pub fn bounds(&self) -> Option<Size> {
        self.bounds
    }
    /// Whether a resize is waiting for the current stroke to end.
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        self.deferred
    }
    /// The container changed size (or was first laid out). Returns whether the canvas was resized now.
    pub fn on_container_resize(
        &mut self,
        canvas: &mut Canvas,
        bounds: Size,
        style: &DrawingStyle,
        stroke_active: bool,
    ) -> bool {
        self.bounds = Some(bounds);
        if stroke_active {
            self.deferred = true;
            return false;
        }
        self.deferred = false;
        resize_to_container(canvas, bounds, style)
    }
    /// Apply a resize held back during the stroke that just ended or was abandoned.
    pub fn on_stroke_end(&mut self, canvas: &mut Canvas, style: &DrawingStyle) -> bool {
        if !std::mem::take(&mut self.deferred) {
            return false;
        }
        self.bounds
            .is_some_and(|bounds| resize_to_container(canvas, bounds, style))
    }
    pub fn on_style_changed<S: Surface>(&self, surface: &mut S, style: &DrawingStyle) {
        apply_style(surface, style);
    }
}
