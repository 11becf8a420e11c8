//! # Repositories
//!
//! Typed access to the [`ObjectStore`](crate::store::ObjectStore). Each repository knows which store its records live in and how to
//! (de)serialize them; the store itself only ever sees [`StoredRecord`]s.

mod drawings;
mod histories;
mod profiles;
mod styles;

pub use drawings::DrawingRepository;
pub use histories::HistoryRepository;
pub use profiles::ProfileRepository;
pub use styles::DrawingStyleRepository;

use crate::store::{IndexKey, SharedStore, StoreError, StoreName, StoredRecord};

/// A type that is persisted as one record in one store.
pub trait Record: serde::Serialize + serde::de::DeserializeOwned + Send + Sync {
    const STORE: StoreName;
    fn key(&self) -> String;
    /// The owning profile, for the profile index.
    fn owner(&self) -> Option<String>;
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
}

impl Record for crate::state::Profile {
    const STORE: StoreName = StoreName::Profiles;
    fn key(&self) -> String {
        self.id.to_string()
    }
    fn owner(&self) -> Option<String> {
        None
    }
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}
impl Record for crate::state::Drawing {
    const STORE: StoreName = StoreName::Drawings;
    fn key(&self) -> String {
        self.id.to_string()
    }
    fn owner(&self) -> Option<String> {
        Some(self.profile_id.to_string())
    }
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}
impl Record for crate::state::DrawingHistory {
    const STORE: StoreName = StoreName::DrawingHistories;
    fn key(&self) -> String {
        self.id.to_string()
    }
    fn owner(&self) -> Option<String> {
        Some(self.profile_id.to_string())
    }
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}
impl Record for crate::style::DrawingStyleRecord {
    const STORE: StoreName = StoreName::DrawingStyles;
    fn key(&self) -> String {
        self.id.to_string()
    }
    fn owner(&self) -> Option<String> {
        Some(self.profile_id.to_string())
    }
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

/// Untyped plumbing shared by every repository.
pub(crate) struct Table<R> {
    store: SharedStore,
    _phantom: std::marker::PhantomData<fn() -> R>,
}
impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<R: Record> Table<R> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }
    fn encode(record: &R) -> Result<StoredRecord, StoreError> {
        Ok(StoredRecord {
            id: record.key(),
            profile_id: record.owner(),
            created_at: record.created_at(),
            body: serde_json::to_value(record)?,
        })
    }
    fn decode(stored: StoredRecord) -> Result<R, StoreError> {
        Ok(serde_json::from_value(stored.body)?)
    }
    pub async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.store
            .get(R::STORE, id)
            .await?
            .map(Self::decode)
            .transpose()
    }
    /// All records owned by `profile_id`, oldest first.
    pub async fn by_profile(&self, profile_id: &str) -> Result<Vec<R>, StoreError> {
        self.store
            .get_all_by_index(R::STORE, &IndexKey::ProfileId(profile_id.to_owned()))
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }
    /// Every record, oldest first.
    pub async fn all(&self) -> Result<Vec<R>, StoreError> {
        self.store
            .get_all(R::STORE)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }
    pub async fn add(&self, record: &R) -> Result<(), StoreError> {
        self.store.add(R::STORE, Self::encode(record)?).await
    }
    pub async fn put(&self, record: &R) -> Result<(), StoreError> {
        self.store.put(R::STORE, Self::encode(record)?).await
    }
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(R::STORE, id).await
    }
}
