use super::Table;
use crate::{
    state::{Profile, ProfileId},
    store::{SharedStore, StoreError},
};

#[derive(Clone)]
pub struct ProfileRepository {
    table: Table<Profile>,
}
impl ProfileRepository {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            table: Table::new(store),
        }
    }
    pub async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        self.table.get(&id.to_string()).await
    }
    /// The most recently created profile, if there is any.
    pub async fn get_first(&self) -> Result<Option<Profile>, StoreError> {
        Ok(self.table.all().await?.pop())
    }
    pub async fn create(&self, name: Option<String>) -> Result<Profile, StoreError> {
        let profile = Profile::new(name);
        self.table.add(&profile).await?;
        log::debug!("Created profile {}", profile.id);
        Ok(profile)
    }
    /// Rename a profile. `Ok(None)` if it doesn't exist.
    pub async fn update(
        &self,
        id: ProfileId,
        name: Option<String>,
    ) -> Result<Option<Profile>, StoreError> {
        let Some(mut profile) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        profile.name = name;
        profile.updated_at = chrono::Utc::now();
        self.table.put(&profile).await?;
        Ok(Some(profile))
    }
}
