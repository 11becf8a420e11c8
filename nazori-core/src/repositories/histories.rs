use super::Table;
use crate::{
    state::{DrawingHistory, DrawingId, HistoryId, ProfileId},
    store::{SharedStore, StoreError},
};

#[derive(Clone)]
pub struct HistoryRepository {
    table: Table<DrawingHistory>,
}
impl HistoryRepository {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            table: Table::new(store),
        }
    }
    pub async fn get_by_id(&self, id: HistoryId) -> Result<Option<DrawingHistory>, StoreError> {
        self.table.get(&id.to_string()).await
    }
    /// The history kept for `drawing_id`, if it belongs to `profile_id`.
    pub async fn get_by_drawing_id(
        &self,
        profile_id: ProfileId,
        drawing_id: DrawingId,
    ) -> Result<Option<DrawingHistory>, StoreError> {
        Ok(self
            .get_by_id(drawing_id.cast())
            .await?
            .filter(|history| history.profile_id == profile_id && history.drawing_id == drawing_id))
    }
    pub async fn create(
        &self,
        profile_id: ProfileId,
        drawing_id: DrawingId,
    ) -> Result<DrawingHistory, StoreError> {
        let history = DrawingHistory::new(profile_id, drawing_id);
        self.table.add(&history).await?;
        log::debug!("Created history {} for drawing {drawing_id}", history.id);
        Ok(history)
    }
    pub async fn put(&self, history: &DrawingHistory) -> Result<(), StoreError> {
        self.table.put(history).await
    }
    pub async fn delete(&self, id: HistoryId) -> Result<(), StoreError> {
        self.table.delete(&id.to_string()).await
    }
    /// Drop the history of a deleted drawing. Missing histories are fine.
    pub async fn delete_for_drawing(&self, drawing_id: DrawingId) -> Result<(), StoreError> {
        self.delete(drawing_id.cast()).await
    }
}
