//! # IDs
//! Records need identifiers that survive a reload and sort by creation time. This is implemented via the `Id<T>`
//! type, a UUIDv7 namespaced by the type T, so a `DrawingId` can never be handed to the profile store by accident.
//!
//! To get a fresh ID, use `Id<YourNamespaceTy>`'s `Default` impl or [`Id::new`].

use std::str::FromStr;

/// ID that is unique across sessions and ordered by its creation time (millisecond precision).
/// IDs with different types may share a value but should not be considered equal.
pub struct Id<T: 'static> {
    id: uuid::Uuid,
    // Namespace marker
    _phantom: std::marker::PhantomData<fn() -> T>,
}
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}
impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        // Namespace already checked at compile time - Self::T == Other::T of course!
        self.id == other.id
    }
}
impl<T> Eq for Id<T> {}
impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Id<T> {
    /// Allocate a new, time-ordered ID.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(uuid::Uuid::now_v7())
    }
    #[must_use]
    pub const fn from_uuid(id: uuid::Uuid) -> Self {
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
    #[must_use]
    pub fn uuid(&self) -> uuid::Uuid {
        self.id
    }
    /// Re-label this ID into another namespace. Only meaningful where two records are
    /// deliberately keyed by the same value.
    #[must_use]
    pub fn cast<U>(self) -> Id<U> {
        Id::from_uuid(self.id)
    }
}
impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}
/// The storage key form: the bare hyphenated UUID.
impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id.hyphenated())
    }
}
impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let full = std::any::type_name::<T>();
        write!(f, "{}#{}", full.rsplit("::").next().unwrap_or(full), self.id)
    }
}
impl<T> FromStr for Id<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self::from_uuid)
    }
}
impl<T> serde::Serialize for Id<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        uuid::Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}
