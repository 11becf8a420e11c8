//! # History engine
//!
//! Persisted undo/redo for a single drawing. Every operation reads the stored record, applies the
//! in-memory operation from [`DrawingHistory`] to a copy, and writes it back. The copy is only handed
//! out once the write succeeded, so a failed save never leaves the caller holding uncommitted state.

use crate::{
    io::Blob,
    repositories::HistoryRepository,
    state::{DrawingHistory, DrawingId, HistoryId, ProfileId},
    store::{SharedStore, StoreError},
};

/// Number of snapshots kept per drawing unless configured otherwise.
pub const DEFAULT_MAX_LEN: usize = 50;

#[derive(thiserror::Error, Debug, Clone)]
pub enum HistoryError {
    #[error("history storage failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct HistoryEngine {
    repository: HistoryRepository,
    max_len: usize,
}
impl HistoryEngine {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self::with_max_len(store, DEFAULT_MAX_LEN)
    }
    #[must_use]
    pub fn with_max_len(store: SharedStore, max_len: usize) -> Self {
        Self {
            repository: HistoryRepository::new(store),
            max_len,
        }
    }
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }
    /// Load the history kept for `drawing_id`, creating an empty one if there is none.
    /// # Errors
    /// Storage failures.
    pub async fn open_for_drawing(
        &self,
        profile_id: ProfileId,
        drawing_id: DrawingId,
    ) -> Result<DrawingHistory, HistoryError> {
        match self
            .repository
            .get_by_drawing_id(profile_id, drawing_id)
            .await?
        {
            Some(mut history) => {
                if history.repair() {
                    log::warn!(
                        "History {} had an out-of-range cursor, clamped to {}",
                        history.id,
                        history.current_index
                    );
                    self.repository.put(&history).await?;
                }
                Ok(history)
            }
            None => Ok(self.repository.create(profile_id, drawing_id).await?),
        }
    }
    /// Like [`Self::open_for_drawing`], but the history always comes back empty, with `base` as what
    /// undoing all the way shows.
    /// # Errors
    /// Storage failures.
    pub async fn open_fresh(
        &self,
        profile_id: ProfileId,
        drawing_id: DrawingId,
        base: Option<Blob>,
    ) -> Result<DrawingHistory, HistoryError> {
        let history = self.open_for_drawing(profile_id, drawing_id).await?;
        let reset = self
            .apply(history.id, move |history| {
                let cleared = history.clear();
                history.set_base(base) || cleared
            })
            .await?;
        Ok(reset.unwrap_or(history))
    }
    /// Load, modify, store. `op` returns whether it changed anything; unchanged records are not written.
    async fn apply(
        &self,
        id: HistoryId,
        op: impl FnOnce(&mut DrawingHistory) -> bool,
    ) -> Result<Option<DrawingHistory>, HistoryError> {
        let Some(mut history) = self.repository.get_by_id(id).await? else {
            log::debug!("No history {id}, nothing to do");
            return Ok(None);
        };
        history.repair();
        if op(&mut history) {
            self.repository.put(&history).await?;
            log::debug!(
                "History {id} now at {} of {}",
                history.current_index,
                history.len()
            );
        }
        Ok(Some(history))
    }
    /// Record a new snapshot after the cursor, discarding the redo tail and evicting past the cap.
    /// # Errors
    /// Storage failures. Nothing is recorded in that case.
    pub async fn push(
        &self,
        id: HistoryId,
        snapshot: Blob,
    ) -> Result<Option<DrawingHistory>, HistoryError> {
        let max_len = self.max_len;
        self.apply(id, move |history| {
            history.push(snapshot, max_len);
            true
        })
        .await
    }
    /// Step back. A no-op on the empty canvas.
    /// # Errors
    /// Storage failures.
    pub async fn undo(&self, id: HistoryId) -> Result<Option<DrawingHistory>, HistoryError> {
        self.apply(id, DrawingHistory::undo).await
    }
    /// Step forward. A no-op on the newest snapshot.
    /// # Errors
    /// Storage failures.
    pub async fn redo(&self, id: HistoryId) -> Result<Option<DrawingHistory>, HistoryError> {
        self.apply(id, DrawingHistory::redo).await
    }
    /// Drop every snapshot.
    /// # Errors
    /// Storage failures.
    pub async fn clear(&self, id: HistoryId) -> Result<Option<DrawingHistory>, HistoryError> {
        self.apply(id, DrawingHistory::clear).await
    }
    /// Set what undoing past the first snapshot shows.
    /// # Errors
    /// Storage failures.
    pub async fn set_base(
        &self,
        id: HistoryId,
        base: Option<Blob>,
    ) -> Result<Option<DrawingHistory>, HistoryError> {
        self.apply(id, move |history| history.set_base(base)).await
    }
    /// Forget the history of a drawing that no longer exists.
    /// # Errors
    /// Storage failures.
    pub async fn delete_for_drawing(&self, drawing_id: DrawingId) -> Result<(), HistoryError> {
        self.repository.delete_for_drawing(drawing_id).await?;
        log::debug!("Deleted history of drawing {drawing_id}");
        Ok(())
    }
    /// The snapshot under the cursor, if any.
    /// # Errors
    /// Storage failures.
    pub async fn current_image(&self, id: HistoryId) -> Result<Option<Blob>, HistoryError> {
        Ok(self
            .repository
            .get_by_id(id)
            .await?
            .and_then(|history| history.current_image().cloned()))
    }
}

#[cfg(test)]
mod test {
    use super::{HistoryEngine, HistoryError};
    use crate::{
        io::Blob,
        repositories::test::FlakyStore,
        state::{DrawingId, HistoryId, ProfileId},
        store::{InMemoryStore, StoreName},
    };
    use std::sync::Arc;

    fn snap(tag: u8) -> Blob {
        Blob::from_bytes(vec![tag])
    }

    #[tokio::test]
    async fn persisted_branch_discard() {
        let engine = HistoryEngine::new(Arc::new(InMemoryStore::default()));
        let (profile, drawing) = (ProfileId::new(), DrawingId::new());
        let id = engine.open_for_drawing(profile, drawing).await.unwrap().id;

        for tag in [b'A', b'B', b'C'] {
            engine.push(id, snap(tag)).await.unwrap();
        }
        engine.undo(id).await.unwrap();
        let history = engine.undo(id).await.unwrap().unwrap();
        assert_eq!(history.current_index, 0);

        engine.push(id, snap(b'D')).await.unwrap();
        // Reopen from storage.
        let history = engine.open_for_drawing(profile, drawing).await.unwrap();
        assert_eq!(history.id, id);
        let tags: Vec<u8> = history.image_list.iter().map(|b| b.as_bytes()[0]).collect();
        assert_eq!(tags, b"AD");
        assert_eq!(history.current_index, 1);
        assert_eq!(
            engine.current_image(id).await.unwrap().unwrap().as_bytes(),
            b"D"
        );
    }
    #[tokio::test]
    async fn cap_is_configurable() {
        let engine = HistoryEngine::with_max_len(Arc::new(InMemoryStore::default()), 3);
        let id = engine
            .open_for_drawing(ProfileId::new(), DrawingId::new())
            .await
            .unwrap()
            .id;
        for tag in 0..5 {
            engine.push(id, snap(tag)).await.unwrap();
        }
        let history = engine.redo(id).await.unwrap().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index, 2);
        assert_eq!(history.image_list[0].as_bytes(), &[2]);
    }
    #[tokio::test]
    async fn unknown_id_is_nothing_to_do() {
        let engine = HistoryEngine::new(Arc::new(InMemoryStore::default()));
        let ghost = HistoryId::new();
        assert!(engine.push(ghost, snap(1)).await.unwrap().is_none());
        assert!(engine.undo(ghost).await.unwrap().is_none());
        assert!(engine.redo(ghost).await.unwrap().is_none());
        assert!(engine.clear(ghost).await.unwrap().is_none());
        assert!(engine.current_image(ghost).await.unwrap().is_none());
    }
    #[tokio::test]
    async fn boundary_noops_do_not_write() {
        let store = Arc::new(FlakyStore::default());
        let engine = HistoryEngine::new(store.clone());
        let id = engine
            .open_for_drawing(ProfileId::new(), DrawingId::new())
            .await
            .unwrap()
            .id;
        // Any write would fail now, so success proves none was attempted.
        store.fail_writes(true);
        let history = engine.undo(id).await.unwrap().unwrap();
        assert_eq!(history.current_index, -1);
        let history = engine.redo(id).await.unwrap().unwrap();
        assert_eq!(history.current_index, -1);
    }
    #[tokio::test]
    async fn failed_write_commits_nothing() {
        let store = Arc::new(FlakyStore::default());
        let engine = HistoryEngine::new(store.clone());
        let id = engine
            .open_for_drawing(ProfileId::new(), DrawingId::new())
            .await
            .unwrap()
            .id;
        engine.push(id, snap(1)).await.unwrap();

        store.fail_writes(true);
        assert!(matches!(
            engine.push(id, snap(2)).await,
            Err(HistoryError::Store(_))
        ));
        assert!(engine.undo(id).await.is_err());

        store.fail_writes(false);
        let history = engine.redo(id).await.unwrap().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index, 0);
    }
    #[tokio::test]
    async fn fresh_scope_is_empty() {
        let engine = HistoryEngine::new(Arc::new(InMemoryStore::default()));
        let (profile, drawing) = (ProfileId::new(), DrawingId::new());
        let id = engine.open_for_drawing(profile, drawing).await.unwrap().id;
        engine.push(id, snap(1)).await.unwrap();

        let fresh = engine
            .open_fresh(profile, drawing, Some(snap(b'B')))
            .await
            .unwrap();
        assert_eq!(fresh.id, id);
        assert!(fresh.is_empty());
        assert_eq!(fresh.current_index, -1);
        assert_eq!(fresh.restore_image().unwrap().as_bytes(), b"B");
        // And it stuck.
        let reopened = engine.open_for_drawing(profile, drawing).await.unwrap();
        assert_eq!(reopened, fresh);
    }
    #[tokio::test]
    async fn unreadable_store_reports_errors() {
        let store = Arc::new(FlakyStore::default());
        let engine = HistoryEngine::new(store.clone());
        let (profile, drawing) = (ProfileId::new(), DrawingId::new());
        let id = engine.open_for_drawing(profile, drawing).await.unwrap().id;
        engine.push(id, snap(1)).await.unwrap();

        store.fail_reads(true);
        assert!(matches!(engine.undo(id).await, Err(HistoryError::Store(_))));
        assert!(engine.open_for_drawing(profile, drawing).await.is_err());

        store.fail_reads(false);
        // The failed undo never happened.
        let history = engine.open_for_drawing(profile, drawing).await.unwrap();
        assert_eq!(history.current_index, 0);
    }
    #[tokio::test]
    async fn deleted_with_drawing() {
        let store = Arc::new(InMemoryStore::default());
        let engine = HistoryEngine::new(store.clone());
        let (profile, drawing) = (ProfileId::new(), DrawingId::new());
        let id = engine.open_for_drawing(profile, drawing).await.unwrap().id;
        engine.push(id, snap(1)).await.unwrap();

        engine.delete_for_drawing(drawing).await.unwrap();
        assert_eq!(store.len(StoreName::DrawingHistories), 0);
        // Reopening starts over.
        let history = engine.open_for_drawing(profile, drawing).await.unwrap();
        assert!(history.is_empty());
    }
    #[tokio::test]
    async fn histories_are_per_drawing() {
        let engine = HistoryEngine::new(Arc::new(InMemoryStore::default()));
        let profile = ProfileId::new();
        let a = engine
            .open_for_drawing(profile, DrawingId::new())
            .await
            .unwrap();
        let b = engine
            .open_for_drawing(profile, DrawingId::new())
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        engine.push(a.id, snap(1)).await.unwrap();
        assert!(engine.current_image(b.id).await.unwrap().is_none());
    }
}
