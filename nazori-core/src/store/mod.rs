//! # Object stores
//!
//! The durable storage contract everything else persists through: a handful of named stores, each a
//! keyed collection of records with a secondary lookup by owning profile and by creation time.
//! Any backend satisfying [`ObjectStore`] will do - [`memory::InMemoryStore`] for tests and ephemeral
//! sessions, [`fs::FsStore`] for data that must survive a restart.

pub mod fs;
pub mod memory;

use std::sync::Arc;

pub use fs::FsStore;
pub use memory::InMemoryStore;

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::AsRefStr, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum StoreName {
    Profiles,
    Drawings,
    DrawingHistories,
    DrawingStyles,
}

/// Secondary lookups available on every store. Results of any lookup come back in creation order, so
/// "most recent" is the last element.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum IndexKey {
    /// All records owned by this profile.
    ProfileId(String),
}
impl IndexKey {
    #[must_use]
    pub fn matches(&self, record: &StoredRecord) -> bool {
        match self {
            Self::ProfileId(id) => record.profile_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// A record as the store sees it: a primary key, the indexed fields, and an opaque body.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: String,
    pub profile_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub body: serde_json::Value,
}
impl StoredRecord {
    /// Ordering used for every multi-record result: oldest first, ties broken by id.
    pub(crate) fn sort(records: &mut [StoredRecord]) {
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum StoreError {
    #[error("record {id} already exists in {store}")]
    Conflict { store: StoreName, id: String },
    #[error("record {id} not found in {store}")]
    NotFound { store: StoreName, id: String },
    #[error("{0:?} is not a usable record id")]
    InvalidId(String),
    #[error("malformed record: {0}")]
    Malformed(Arc<serde_json::Error>),
    #[error("storage unavailable: {0}")]
    Io(Arc<std::io::Error>),
}
impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}
impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(Arc::new(value))
    }
}

/// Minimal CRUD over named stores. Calls against one store are expected to be issued one at a time.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch by primary key.
    async fn get(&self, store: StoreName, id: &str) -> Result<Option<StoredRecord>, StoreError>;
    /// Fetch all records matching the index key, oldest first.
    async fn get_all_by_index(
        &self,
        store: StoreName,
        key: &IndexKey,
    ) -> Result<Vec<StoredRecord>, StoreError>;
    /// Fetch every record in the store, oldest first.
    async fn get_all(&self, store: StoreName) -> Result<Vec<StoredRecord>, StoreError>;
    /// Insert a new record.
    /// # Errors
    /// [`StoreError::Conflict`] if the id is taken.
    async fn add(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError>;
    /// Insert or replace by primary key.
    async fn put(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError>;
    /// Remove by primary key. Removing a missing record is not an error.
    async fn delete(&self, store: StoreName, id: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn ObjectStore>;

/// Get the process-wide store, opening it with `init` on first use.
///
/// Concurrent first callers share a single initialization. A failed `init` is not cached - the next
/// caller tries again.
pub async fn global<F, Fut>(init: F) -> Result<SharedStore, StoreError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<SharedStore, StoreError>>,
{
    static STORE: tokio::sync::OnceCell<SharedStore> = tokio::sync::OnceCell::const_new();
    STORE.get_or_try_init(init).await.cloned()
}
