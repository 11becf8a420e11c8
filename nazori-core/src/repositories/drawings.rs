use super::Table;
use crate::{
    io::Blob,
    state::{Drawing, DrawingId, ProfileId},
    store::{SharedStore, StoreError},
};

#[derive(Clone)]
pub struct DrawingRepository {
    table: Table<Drawing>,
}
impl DrawingRepository {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            table: Table::new(store),
        }
    }
    pub async fn get_by_id(&self, id: DrawingId) -> Result<Option<Drawing>, StoreError> {
        self.table.get(&id.to_string()).await
    }
    /// All of a profile's drawings, newest first.
    pub async fn get_by_profile_id(&self, profile_id: ProfileId) -> Result<Vec<Drawing>, StoreError> {
        let mut drawings = self.table.by_profile(&profile_id.to_string()).await?;
        drawings.reverse();
        Ok(drawings)
    }
    pub async fn create(&self, profile_id: ProfileId, image: Blob) -> Result<Drawing, StoreError> {
        let drawing = Drawing::new(profile_id, image);
        self.table.add(&drawing).await?;
        log::debug!("Created drawing {} ({:?})", drawing.id, drawing.image);
        Ok(drawing)
    }
    /// Replace a drawing's image wholesale. `Ok(None)` if it doesn't exist.
    pub async fn update_image(&self, id: DrawingId, image: Blob) -> Result<Option<Drawing>, StoreError> {
        let Some(mut drawing) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        drawing.image = image;
        drawing.updated_at = chrono::Utc::now();
        self.table.put(&drawing).await?;
        log::debug!("Saved drawing {} ({:?})", drawing.id, drawing.image);
        Ok(Some(drawing))
    }
    pub async fn delete(&self, id: DrawingId) -> Result<(), StoreError> {
        self.table.delete(&id.to_string()).await
    }
}
