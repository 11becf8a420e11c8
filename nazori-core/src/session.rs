//! # Drawing session
//!
//! One open canvas, wired to everything else. Pointer events go to the [`StrokeRenderer`]; when a stroke
//! completes its snapshot is pushed to the [`HistoryEngine`] and saved as the drawing's image.
//!
//! None of the persistence here is allowed to stop drawing. A failed save is logged and kept in
//! [`DrawingSession::last_error`], the canvas keeps its pixels, and the history only moves once a
//! write is confirmed.

use std::sync::Arc;

use crate::{
    canvas::{Canvas, CanvasError},
    drawing_store::{DrawingStore, DrawingStoreError},
    geometry::{self, apply_style, Size},
    history::{HistoryEngine, HistoryError, DEFAULT_MAX_LEN},
    io::{self, Blob, CodecError, EMPTY_CANVAS_SIZE},
    lifecycle::CanvasLifecycle,
    renderer::{FrameQueue, PointerCapture, PointerLike, StrokeRenderer},
    state::{DrawingHistory, DrawingId},
    store::SharedStore,
    style::{DrawingStyle, StylePatch},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Snapshots kept per drawing.
    pub max_history: usize,
    /// Canvas size until the host reports its container.
    pub canvas_size: Size,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_LEN,
            canvas_size: Size::new(EMPTY_CANVAS_SIZE, EMPTY_CANVAS_SIZE),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum SessionError {
    #[error(transparent)]
    Drawings(#[from] DrawingStoreError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error("bitmap codec failed: {0}")]
    Codec(Arc<CodecError>),
}
impl From<CodecError> for SessionError {
    fn from(value: CodecError) -> Self {
        Self::Codec(Arc::new(value))
    }
}

pub struct DrawingSession {
    canvas: Canvas,
    renderer: StrokeRenderer<PointerCapture, FrameQueue>,
    lifecycle: CanvasLifecycle,
    drawings: DrawingStore,
    history: HistoryEngine,
    /// Last confirmed state of the active drawing's history.
    current_history: Option<DrawingHistory>,
    last_error: Option<SessionError>,
}
impl DrawingSession {
    /// Load the profile and reopen its most recent drawing with that drawing's history intact,
    /// or start a new drawing if there are none.
    /// # Errors
    /// If the profile can't be loaded or the canvas can't be allocated. Failures after that point are
    /// soft and end up in [`Self::last_error`].
    pub async fn open(store: SharedStore, config: SessionConfig) -> Result<Self, SessionError> {
        let drawings = DrawingStore::load(store.clone()).await?;
        let history = HistoryEngine::with_max_len(store, config.max_history);
        let style = drawings.drawing_style();
        let mut canvas = Canvas::new(config.canvas_size)?;
        apply_style(&mut canvas, &style);

        let mut this = Self {
            canvas,
            renderer: StrokeRenderer::new(PointerCapture::default(), FrameQueue::default(), style),
            lifecycle: CanvasLifecycle::default(),
            drawings,
            history,
            current_history: None,
            last_error: None,
        };

        match this.drawings.drawings().first().map(|drawing| drawing.id) {
            Some(latest) => {
                this.show_drawing(latest);
                this.open_history(false).await;
            }
            None => {
                this.create_drawing().await;
            }
        }
        Ok(this)
    }
    /// Log and keep a soft failure.
    fn note(&mut self, error: impl Into<SessionError>) {
        let error = error.into();
        log::warn!("{error}");
        // The store keeps its own copy. This one supersedes it.
        self.drawings.take_error();
        self.last_error = Some(error);
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
    #[must_use]
    pub fn drawings(&self) -> &DrawingStore {
        &self.drawings
    }
    #[must_use]
    pub fn history(&self) -> Option<&DrawingHistory> {
        self.current_history.as_ref()
    }
    #[must_use]
    pub fn style(&self) -> DrawingStyle {
        self.drawings.drawing_style()
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.renderer.is_drawing()
    }
    #[must_use]
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }
    pub fn take_error(&mut self) -> Option<SessionError> {
        self.last_error.take()
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current_history
            .as_ref()
            .is_some_and(DrawingHistory::can_undo)
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.current_history
            .as_ref()
            .is_some_and(DrawingHistory::can_redo)
    }
    /// Called once per completed stroke, before its snapshot is saved.
    pub fn set_on_draw_end(&mut self, hook: impl FnMut() + 'static) {
        self.renderer.set_on_draw_end(hook);
    }

    pub fn pointer_down(&mut self, event: &impl PointerLike) {
        self.renderer.on_pointer_start(event);
    }
    pub fn pointer_move(&mut self, event: &impl PointerLike) {
        self.renderer.on_pointer_move(event);
    }
    /// Returns whether a stroke completed.
    pub async fn pointer_up(&mut self, event: &impl PointerLike) -> bool {
        if !self.renderer.on_pointer_end(event, &mut self.canvas) {
            return false;
        }
        self.finish_stroke().await;
        true
    }
    /// Same as [`Self::pointer_up`].
    pub async fn pointer_leave(&mut self, event: &impl PointerLike) -> bool {
        if !self.renderer.on_pointer_leave(event, &mut self.canvas) {
            return false;
        }
        self.finish_stroke().await;
        true
    }
    /// Run the render loop for one frame. Returns how many frame callbacks ran.
    pub fn tick(&mut self) -> usize {
        self.renderer.run_due_frames(&mut self.canvas)
    }
    async fn finish_stroke(&mut self) {
        // Snapshot what was drawn before a deferred resize gets a chance to clip it.
        let snapshot = io::canvas_to_blob(&self.canvas);
        let style = self.style();
        self.lifecycle.on_stroke_end(&mut self.canvas, &style);
        match snapshot {
            Ok(snapshot) => self.commit(snapshot).await,
            Err(e) => self.note(e),
        }
    }
    /// Drop any stroke in progress, then catch up on a resize it was holding back.
    fn abandon_stroke(&mut self) {
        self.renderer.cancel();
        let style = self.style();
        self.lifecycle.on_stroke_end(&mut self.canvas, &style);
    }
    /// Push to history, then save as the drawing's image.
    async fn commit(&mut self, snapshot: Blob) {
        if let Some(id) = self.current_history.as_ref().map(|history| history.id) {
            match self.history.push(id, snapshot.clone()).await {
                Ok(Some(history)) => self.current_history = Some(history),
                Ok(None) => {
                    log::warn!("History {id} disappeared, starting over");
                    self.open_history(true).await;
                    if let Some(id) = self.current_history.as_ref().map(|history| history.id) {
                        match self.history.push(id, snapshot.clone()).await {
                            Ok(Some(history)) => self.current_history = Some(history),
                            Ok(None) => (),
                            Err(e) => self.note(e),
                        }
                    }
                }
                Err(e) => self.note(e),
            }
        }
        self.save_image(snapshot).await;
    }
    async fn save_image(&mut self, image: Blob) {
        if let Err(e) = self.drawings.update_current_drawing(image).await {
            self.note(e);
        }
    }
    /// Load (or reset) the history scope of the active drawing. The canvas must already show the
    /// drawing: it becomes what undoing past the first snapshot returns to.
    async fn open_history(&mut self, fresh: bool) {
        let Some(drawing) = self.drawings.current_drawing_id() else {
            self.current_history = None;
            return;
        };
        let profile = self.drawings.profile().id;
        let base = match io::canvas_to_blob(&self.canvas) {
            Ok(base) => Some(base),
            Err(e) => {
                self.note(e);
                None
            }
        };
        let result = if fresh {
            self.history.open_fresh(profile, drawing, base).await
        } else {
            match self.history.open_for_drawing(profile, drawing).await {
                // Nothing recorded yet, so the drawing as loaded is the starting point.
                Ok(history) if history.is_empty() && history.base_image.is_none() => self
                    .history
                    .set_base(history.id, base)
                    .await
                    .map(|based| based.unwrap_or(history)),
                other => other,
            }
        };
        match result {
            Ok(history) => self.current_history = Some(history),
            Err(e) => {
                self.current_history = None;
                self.note(e);
            }
        }
    }
    /// Select `id` and put its image on the canvas.
    fn show_drawing(&mut self, id: DrawingId) -> bool {
        let image = match self.drawings.select_drawing(id) {
            Ok(drawing) => drawing.image.clone(),
            Err(e) => {
                self.note(e);
                return false;
            }
        };
        if let Err(e) = io::draw_blob_to_canvas(&mut self.canvas, &image) {
            // Unreadable image: start from nothing rather than showing the previous drawing.
            geometry::clear(&mut self.canvas);
            self.note(e);
        }
        let style = self.style();
        apply_style(&mut self.canvas, &style);
        true
    }
    /// Redraw the canvas from the history cursor, then save it as the drawing's image.
    async fn restore_from_history(&mut self) {
        let image = self
            .current_history
            .as_ref()
            .and_then(|history| history.restore_image().cloned());
        match image {
            Some(image) => {
                if let Err(e) = io::draw_blob_to_canvas(&mut self.canvas, &image) {
                    self.note(e);
                    return;
                }
            }
            None => geometry::clear(&mut self.canvas),
        }
        let style = self.style();
        apply_style(&mut self.canvas, &style);
        match io::canvas_to_blob(&self.canvas) {
            Ok(blob) => self.save_image(blob).await,
            Err(e) => self.note(e),
        }
    }
    async fn step(&mut self, forward: bool) -> bool {
        if self.renderer.is_drawing() {
            log::debug!("Ignoring history step mid-stroke");
            return false;
        }
        let Some(before) = self.current_history.as_ref().map(|h| (h.id, h.current_index)) else {
            return false;
        };
        let (id, index) = before;
        let result = if forward {
            self.history.redo(id).await
        } else {
            self.history.undo(id).await
        };
        match result {
            Ok(Some(history)) => {
                let moved = history.current_index != index;
                self.current_history = Some(history);
                if moved {
                    self.restore_from_history().await;
                }
                moved
            }
            Ok(None) => false,
            Err(e) => {
                self.note(e);
                false
            }
        }
    }
    /// Step back one snapshot. Returns whether anything changed.
    pub async fn undo(&mut self) -> bool {
        self.step(false).await
    }
    /// Step forward one snapshot. Returns whether anything changed.
    pub async fn redo(&mut self) -> bool {
        self.step(true).await
    }
    /// Wipe the canvas. Recorded in history like any stroke, so it can be undone.
    pub async fn clear_canvas(&mut self) {
        self.abandon_stroke();
        geometry::clear(&mut self.canvas);
        let style = self.style();
        apply_style(&mut self.canvas, &style);
        match io::canvas_to_blob(&self.canvas) {
            Ok(snapshot) => self.commit(snapshot).await,
            Err(e) => self.note(e),
        }
    }
    /// Start and switch to a new blank drawing with an empty history.
    pub async fn create_drawing(&mut self) -> Option<DrawingId> {
        self.abandon_stroke();
        let id = match self.drawings.create_drawing().await {
            Ok(drawing) => drawing.id,
            Err(e) => {
                self.note(e);
                return None;
            }
        };
        self.show_drawing(id);
        self.open_history(true).await;
        Some(id)
    }
    /// Switch to another drawing. Its history always starts empty, and undoing all the way returns to the
    /// picture as it was when selected.
    pub async fn select_drawing(&mut self, id: DrawingId) -> bool {
        self.abandon_stroke();
        if !self.show_drawing(id) {
            return false;
        }
        self.open_history(true).await;
        true
    }
    /// Delete a drawing. If it was the active one, the newest remaining drawing takes its place, or a
    /// new one is started.
    pub async fn delete_drawing(&mut self, id: DrawingId) -> bool {
        let was_current = self.drawings.current_drawing_id() == Some(id);
        if was_current {
            self.abandon_stroke();
        }
        if let Err(e) = self.drawings.delete_drawing(id).await {
            self.note(e);
            return false;
        }
        if let Err(e) = self.history.delete_for_drawing(id).await {
            // Only costs space. The drawing itself is gone.
            self.note(e);
        }
        if was_current {
            match self.drawings.drawings().first().map(|drawing| drawing.id) {
                Some(next) => {
                    self.select_drawing(next).await;
                }
                None => {
                    self.create_drawing().await;
                }
            }
        }
        true
    }
    /// Change the pen. Takes effect immediately, even mid-stroke, whether or not it could be saved.
    pub async fn update_style(&mut self, patch: StylePatch) {
        if let Err(e) = self.drawings.update_style(patch).await {
            self.note(e);
        }
        let style = self.style();
        self.renderer.set_style(style);
        self.lifecycle.on_style_changed(&mut self.canvas, &style);
    }
    /// The container was laid out at `bounds`. Held back while a stroke is in progress.
    /// Returns whether the canvas was resized now.
    pub fn on_container_resize(&mut self, bounds: Size) -> bool {
        let style = self.style();
        let drawing = self.renderer.is_drawing();
        self.lifecycle
            .on_container_resize(&mut self.canvas, bounds, &style, drawing)
    }
    /// Encode the canvas as it is right now.
    /// # Errors
    /// Encoder failures.
    pub fn export(&self) -> Result<Blob, SessionError> {
        Ok(io::canvas_to_blob(&self.canvas)?)
    }
    /// Stop the render loop and drop any stroke in progress. Call before discarding the session.
    pub fn unmount(&mut self) {
        self.abandon_stroke();
    }
}

#[cfg(test)]
mod test {
    use super::{DrawingSession, SessionConfig};
    use crate::{
        color::HexColor,
        geometry::Size,
        history::HistoryEngine,
        renderer::PointerSample,
        repositories::{test::FlakyStore, DrawingRepository},
        store::{InMemoryStore, SharedStore, StoreName},
        style::StylePatch,
        surface::Surface,
    };
    use std::{cell::Cell, rc::Rc, sync::Arc};

    fn mouse(x: f32, y: f32) -> PointerSample {
        PointerSample::new(1, "mouse", x, y)
    }
    async fn stroke(session: &mut DrawingSession, from: (f32, f32), to: (f32, f32)) -> bool {
        session.pointer_down(&mouse(from.0, from.1));
        session.pointer_move(&mouse(to.0, to.1));
        session.tick();
        session.pointer_up(&mouse(to.0, to.1)).await
    }
    async fn open(store: SharedStore) -> DrawingSession {
        DrawingSession::open(store, SessionConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn basic_stroke() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        let ends = Rc::new(Cell::new(0));
        let counter = ends.clone();
        session.set_on_draw_end(move || counter.set(counter.get() + 1));

        let history = session.history().unwrap();
        assert_eq!((history.len(), history.current_index), (0, -1));
        // Fresh drawings are white.
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::WHITE));

        assert!(stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await);
        assert_eq!(ends.get(), 1);
        let history = session.history().unwrap();
        assert_eq!((history.len(), history.current_index), (1, 0));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert!(session.last_error().is_none());

        // Saved as the drawing's image too.
        let saved = session.drawings().current_drawing().unwrap().image.clone();
        assert_eq!(&saved, history.current_image().unwrap());
    }
    #[tokio::test]
    async fn undo_redo_redraws() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
        stroke(&mut session, (100.0, 100.0), (120.0, 120.0)).await;
        assert_eq!(session.canvas().pixel(105, 105), Some(HexColor::BLACK));

        assert!(session.undo().await);
        assert_eq!(session.canvas().pixel(105, 105), Some(HexColor::WHITE));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));

        // Back to the blank page the drawing started as.
        assert!(session.undo().await);
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::WHITE));
        assert!(!session.can_undo());
        assert!(!session.undo().await);

        assert!(session.redo().await);
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert_eq!(session.canvas().pixel(105, 105), Some(HexColor::WHITE));

        // Drawing after undo drops the redo tail.
        stroke(&mut session, (200.0, 200.0), (220.0, 220.0)).await;
        assert!(!session.can_redo());
        assert_eq!(session.history().unwrap().len(), 2);
    }
    #[tokio::test]
    async fn switching_drawing_resets_history() {
        let store: SharedStore = Arc::new(InMemoryStore::default());
        let mut session = open(store.clone()).await;
        let a = session.drawings().current_drawing_id().unwrap();
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
        assert_eq!(session.history().unwrap().len(), 1);

        let b = session.create_drawing().await.unwrap();
        let history = session.history().unwrap();
        assert_eq!(history.drawing_id, b);
        assert_eq!((history.len(), history.current_index), (0, -1));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::WHITE));
        stroke(&mut session, (50.0, 50.0), (60.0, 60.0)).await;

        assert!(session.select_drawing(a).await);
        let history = session.history().unwrap();
        assert_eq!(history.drawing_id, a);
        assert_eq!((history.len(), history.current_index), (0, -1));
        // A's image is back on the canvas.
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));

        // B's history was left alone.
        let profile = session.drawings().profile().id;
        let b_history = HistoryEngine::new(store)
            .open_for_drawing(profile, b)
            .await
            .unwrap();
        assert_eq!(b_history.len(), 1);
    }
    #[tokio::test]
    async fn reselected_drawing_survives_undo() {
        let store: SharedStore = Arc::new(InMemoryStore::default());
        let mut session = open(store.clone()).await;
        let a = session.drawings().current_drawing_id().unwrap();
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
        session.create_drawing().await.unwrap();
        assert!(session.select_drawing(a).await);

        stroke(&mut session, (100.0, 100.0), (120.0, 120.0)).await;
        assert!(session.undo().await);
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert_eq!(session.canvas().pixel(105, 105), Some(HexColor::WHITE));
        // Nothing older to go back to.
        assert!(!session.undo().await);
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));

        let saved = DrawingRepository::new(store)
            .get_by_id(a)
            .await
            .unwrap()
            .unwrap();
        let saved = crate::io::blob_to_canvas(&saved.image).unwrap();
        assert_eq!(saved.pixel(12, 12), Some(HexColor::BLACK));
        assert_eq!(saved.pixel(105, 105), Some(HexColor::WHITE));
    }
    #[tokio::test]
    async fn resize_preserves_content() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;

        assert!(session.on_container_resize(Size::new(800, 600)));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert!(!session.on_container_resize(Size::new(800, 600)));

        assert!(session.on_container_resize(Size::new(14, 14)));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        // Still drawable afterwards.
        assert!(stroke(&mut session, (2.0, 2.0), (6.0, 6.0)).await);
    }
    #[tokio::test]
    async fn resize_waits_for_stroke() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        session.pointer_down(&mouse(10.0, 10.0));
        assert!(!session.on_container_resize(Size::new(64, 64)));
        assert_eq!(session.canvas().size(), Size::new(512, 512));
        session.pointer_move(&mouse(300.0, 300.0));
        session.tick();
        session.pointer_up(&mouse(300.0, 300.0)).await;
        assert_eq!(session.canvas().size(), Size::new(64, 64));
        // The snapshot was taken before the resize clipped the stroke.
        let history = session.history().unwrap();
        let snapshot = crate::io::blob_to_canvas(history.current_image().unwrap()).unwrap();
        assert_eq!(snapshot.size(), Size::new(512, 512));
    }
    #[tokio::test]
    async fn abandoned_stroke_releases_resize() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        session.pointer_down(&mouse(10.0, 10.0));
        assert!(!session.on_container_resize(Size::new(800, 600)));
        session.create_drawing().await.unwrap();
        assert!(!session.is_drawing());
        assert_eq!(session.canvas().size(), Size::new(800, 600));

        session.pointer_down(&mouse(10.0, 10.0));
        assert!(!session.on_container_resize(Size::new(300, 200)));
        session.clear_canvas().await;
        assert_eq!(session.canvas().size(), Size::new(300, 200));
        // The recorded clear is already at the new size.
        let history = session.history().unwrap();
        let snapshot = crate::io::blob_to_canvas(history.current_image().unwrap()).unwrap();
        assert_eq!(snapshot.size(), Size::new(300, 200));
    }
    #[tokio::test]
    async fn failed_save_keeps_drawing() {
        let store = Arc::new(FlakyStore::default());
        let mut session = open(store.clone()).await;
        store.fail_writes(true);

        assert!(stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await);
        // Pixels stay, history doesn't advance, the failure is reported.
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert_eq!(session.history().unwrap().len(), 0);
        assert!(!session.can_undo());
        assert!(session.take_error().is_some());

        store.fail_writes(false);
        assert!(stroke(&mut session, (30.0, 30.0), (40.0, 40.0)).await);
        assert_eq!(session.history().unwrap().len(), 1);
        assert!(session.last_error().is_none());
    }
    #[tokio::test]
    async fn reload_restores_drawing_and_history() {
        let store: SharedStore = Arc::new(InMemoryStore::default());
        let drawing = {
            let mut session = open(store.clone()).await;
            stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
            stroke(&mut session, (50.0, 50.0), (60.0, 60.0)).await;
            session.undo().await;
            session.unmount();
            session.drawings().current_drawing_id().unwrap()
        };
        let session = open(store).await;
        assert_eq!(session.drawings().current_drawing_id(), Some(drawing));
        let history = session.history().unwrap();
        assert_eq!((history.len(), history.current_index), (2, 0));
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
        assert_eq!(session.canvas().pixel(52, 52), Some(HexColor::WHITE));
        assert!(session.can_redo());
    }
    #[tokio::test]
    async fn clear_is_undoable() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
        session.clear_canvas().await;
        assert!(session.canvas().is_blank());
        assert_eq!(session.history().unwrap().len(), 2);

        assert!(session.undo().await);
        assert_eq!(session.canvas().pixel(12, 12), Some(HexColor::BLACK));
    }
    #[tokio::test]
    async fn deleting_current_moves_on() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        let first = session.drawings().current_drawing_id().unwrap();
        let second = session.create_drawing().await.unwrap();

        assert!(session.delete_drawing(second).await);
        assert_eq!(session.drawings().current_drawing_id(), Some(first));

        assert!(session.delete_drawing(first).await);
        // Nothing left, so a new one was started.
        let replacement = session.drawings().current_drawing_id().unwrap();
        assert_ne!(replacement, first);
        assert_eq!(session.drawings().drawings().len(), 1);
        assert!(session.history().is_some());
    }
    #[tokio::test]
    async fn deleting_drawing_drops_its_history() {
        let store = Arc::new(InMemoryStore::default());
        let mut session = open(store.clone()).await;
        let a = session.drawings().current_drawing_id().unwrap();
        stroke(&mut session, (10.0, 10.0), (20.0, 20.0)).await;
        session.create_drawing().await.unwrap();
        assert_eq!(store.len(StoreName::DrawingHistories), 2);

        assert!(session.delete_drawing(a).await);
        assert_eq!(store.len(StoreName::Drawings), 1);
        assert_eq!(store.len(StoreName::DrawingHistories), 1);
        assert!(session.last_error().is_none());
    }
    #[tokio::test]
    async fn eraser_and_pen_only() {
        let mut session = open(Arc::new(InMemoryStore::default())).await;
        stroke(&mut session, (10.0, 10.0), (40.0, 40.0)).await;

        session
            .update_style(StylePatch {
                line_width: Some(20.0),
                is_eraser: Some(true),
                ..StylePatch::default()
            })
            .await;
        assert!(session.style().is_eraser);
        stroke(&mut session, (20.0, 20.0), (30.0, 30.0)).await;
        assert_eq!(session.canvas().pixel(25, 25).unwrap().a, 0);

        session
            .update_style(StylePatch {
                pen_only: Some(true),
                ..StylePatch::default()
            })
            .await;
        session.pointer_down(&mouse(100.0, 100.0));
        assert!(!session.is_drawing());
        session.pointer_down(&PointerSample::new(4, "pen", 100.0, 100.0));
        assert!(session.is_drawing());
    }
}
