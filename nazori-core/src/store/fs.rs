//! A directory-backed store. Each record is a JSON file at `<root>/<store>/<id>.json`.

use super::{IndexKey, ObjectStore, StoreError, StoreName, StoredRecord};

pub struct FsStore {
    root: std::path::PathBuf,
}
impl FsStore {
    /// Open a store rooted at `root`, creating a directory for every [`StoreName`].
    /// # Errors
    /// If the directories cannot be created.
    pub async fn open(root: impl Into<std::path::PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for store in <StoreName as strum::IntoEnumIterator>::iter() {
            tokio::fs::create_dir_all(root.join(store.as_ref())).await?;
        }
        log::info!("Opened store at {}", root.display());
        Ok(Self { root })
    }
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
    fn path_of(&self, store: StoreName, id: &str) -> Result<std::path::PathBuf, StoreError> {
        // Ids become file names. Keep them to a charset that can't escape the directory.
        let usable = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !usable {
            return Err(StoreError::InvalidId(id.to_owned()));
        }
        Ok(self
            .root
            .join(store.as_ref())
            .join(id)
            .with_extension("json"))
    }
    async fn read(path: &std::path::Path) -> Result<Option<StoredRecord>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
    /// Write through a temporary sibling, so a crash mid-write never leaves a torn record.
    async fn write(path: &std::path::Path, record: &StoredRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record)?;
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, path).await?;
        Ok(())
    }
    async fn collect(
        &self,
        store: StoreName,
        filter: impl Fn(&StoredRecord) -> bool + Send,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let mut entries = tokio::fs::read_dir(self.root.join(store.as_ref())).await?;
        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(std::ffi::OsStr::to_str) != Some("json") {
                continue;
            }
            match Self::read(&path).await {
                Ok(Some(record)) if filter(&record) => records.push(record),
                Ok(_) => (),
                // One bad file shouldn't hide the rest of the store.
                Err(StoreError::Malformed(e)) => {
                    log::warn!("Skipping malformed record {}: {e}", path.display());
                }
                Err(e) => return Err(e),
            }
        }
        StoredRecord::sort(&mut records);
        Ok(records)
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, store: StoreName, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        Self::read(&self.path_of(store, id)?).await
    }
    async fn get_all_by_index(
        &self,
        store: StoreName,
        key: &IndexKey,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.collect(store, |record| key.matches(record)).await
    }
    async fn get_all(&self, store: StoreName) -> Result<Vec<StoredRecord>, StoreError> {
        self.collect(store, |_| true).await
    }
    async fn add(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError> {
        let path = self.path_of(store, &record.id)?;
        if tokio::fs::try_exists(&path).await? {
            return Err(StoreError::Conflict {
                store,
                id: record.id,
            });
        }
        Self::write(&path, &record).await
    }
    async fn put(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError> {
        let path = self.path_of(store, &record.id)?;
        Self::write(&path, &record).await
    }
    async fn delete(&self, store: StoreName, id: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_of(store, id)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::FsStore;
    use crate::store::{test::record, IndexKey, ObjectStore, StoreError, StoreName};

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FsStore::open(dir.path()).await.unwrap();
            store
                .add(StoreName::Profiles, record("p1", None, 5))
                .await
                .unwrap();
        }
        let store = FsStore::open(dir.path()).await.unwrap();
        let got = store.get(StoreName::Profiles, "p1").await.unwrap().unwrap();
        assert_eq!(got, record("p1", None, 5));
    }
    #[tokio::test]
    async fn add_conflicts_put_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        store
            .add(StoreName::Drawings, record("a", Some("p"), 1))
            .await
            .unwrap();
        assert!(matches!(
            store
                .add(StoreName::Drawings, record("a", Some("p"), 2))
                .await,
            Err(StoreError::Conflict { .. })
        ));
        store
            .put(StoreName::Drawings, record("a", Some("p"), 3))
            .await
            .unwrap();
        let all = store.get_all(StoreName::Drawings).await.unwrap();
        assert_eq!(all, [record("a", Some("p"), 3)]);
    }
    #[tokio::test]
    async fn index_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        for (id, profile, secs) in [("b", "p1", 20), ("a", "p1", 10), ("c", "p2", 5)] {
            store
                .put(StoreName::DrawingStyles, record(id, Some(profile), secs))
                .await
                .unwrap();
        }
        tokio::fs::write(
            dir.path().join("drawing_styles").join("junk.json"),
            b"{ nope",
        )
        .await
        .unwrap();

        let ids: Vec<_> = store
            .get_all_by_index(StoreName::DrawingStyles, &IndexKey::ProfileId("p1".into()))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }
    #[tokio::test]
    async fn hostile_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        for id in ["../escape", "a/b", "", "."] {
            assert!(matches!(
                store.get(StoreName::Drawings, id).await,
                Err(StoreError::InvalidId(_))
            ));
        }
        // Deleting what was never there is fine.
        store.delete(StoreName::Drawings, "missing").await.unwrap();
    }
}
