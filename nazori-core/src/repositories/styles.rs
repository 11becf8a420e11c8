use super::Table;
use crate::{
    state::ProfileId,
    store::{SharedStore, StoreError},
    style::{DrawingStyleRecord, StylePreferences, StyleRecordId},
};

#[derive(Clone)]
pub struct DrawingStyleRepository {
    table: Table<DrawingStyleRecord>,
}
impl DrawingStyleRepository {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            table: Table::new(store),
        }
    }
    /// The profile's most recent style record.
    pub async fn get_by_profile_id(
        &self,
        profile_id: ProfileId,
    ) -> Result<Option<DrawingStyleRecord>, StoreError> {
        Ok(self.table.by_profile(&profile_id.to_string()).await?.pop())
    }
    pub async fn create(
        &self,
        profile_id: ProfileId,
        style: StylePreferences,
    ) -> Result<DrawingStyleRecord, StoreError> {
        let now = chrono::Utc::now();
        let record = DrawingStyleRecord {
            id: StyleRecordId::new(),
            profile_id,
            style,
            created_at: now,
            updated_at: now,
        };
        self.table.add(&record).await?;
        Ok(record)
    }
    /// Overwrite the preferences of an existing record. `Ok(None)` if it doesn't exist.
    pub async fn update(
        &self,
        id: StyleRecordId,
        style: StylePreferences,
    ) -> Result<Option<DrawingStyleRecord>, StoreError> {
        let Some(mut record) = self.table.get(&id.to_string()).await? else {
            return Ok(None);
        };
        record.style = style;
        record.updated_at = chrono::Utc::now();
        self.table.put(&record).await?;
        Ok(Some(record))
    }
}
