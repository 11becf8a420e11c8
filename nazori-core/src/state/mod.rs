//! # State
//!
//! Plain data records, as persisted. Nothing in here touches a store - see [`crate::repositories`].

pub mod drawing_history;

pub use drawing_history::{DrawingHistory, HistoryId};

use crate::io::Blob;

pub type ProfileId = crate::Id<Profile>;
pub type DrawingId = crate::Id<Drawing>;

/// Whoever is holding the crayons. Owns drawings, histories and a style record.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
impl Profile {
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ProfileId::new(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
    /// The name to show, falling back to a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed artist")
    }
}

/// A single picture, stored as its latest snapshot.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: DrawingId,
    pub profile_id: ProfileId,
    pub image: Blob,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
impl Drawing {
    #[must_use]
    pub fn new(profile_id: ProfileId, image: Blob) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: DrawingId::new(),
            profile_id,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}
