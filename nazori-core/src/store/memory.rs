use super::{IndexKey, ObjectStore, StoreError, StoreName, StoredRecord};

type Records = hashbrown::HashMap<String, StoredRecord>;

/// A store that keeps every record in-memory. Contents are lost on drop.
#[derive(Default)]
pub struct InMemoryStore {
    // Locks are only ever held for the duration of a single call, never across an await.
    stores: parking_lot::RwLock<hashbrown::HashMap<StoreName, Records>>,
}
impl InMemoryStore {
    /// Number of records currently held in `store`.
    #[must_use]
    pub fn len(&self, store: StoreName) -> usize {
        self.stores.read().get(&store).map_or(0, Records::len)
    }
    fn collect(&self, store: StoreName, filter: impl Fn(&StoredRecord) -> bool) -> Vec<StoredRecord> {
        let mut records: Vec<_> = self
            .stores
            .read()
            .get(&store)
            .into_iter()
            .flat_map(Records::values)
            .filter(|record| filter(*record))
            .cloned()
            .collect();
        StoredRecord::sort(&mut records);
        records
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, store: StoreName, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self
            .stores
            .read()
            .get(&store)
            .and_then(|records| records.get(id))
            .cloned())
    }
    async fn get_all_by_index(
        &self,
        store: StoreName,
        key: &IndexKey,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.collect(store, |record| key.matches(record)))
    }
    async fn get_all(&self, store: StoreName) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.collect(store, |_| true))
    }
    async fn add(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError> {
        let mut stores = self.stores.write();
        match stores.entry(store).or_default().entry(record.id.clone()) {
            hashbrown::hash_map::Entry::Occupied(o) => Err(StoreError::Conflict {
                store,
                id: o.key().clone(),
            }),
            hashbrown::hash_map::Entry::Vacant(v) => {
                v.insert(record);
                Ok(())
            }
        }
    }
    async fn put(&self, store: StoreName, record: StoredRecord) -> Result<(), StoreError> {
        self.stores
            .write()
            .entry(store)
            .or_default()
            .insert(record.id.clone(), record);
        Ok(())
    }
    async fn delete(&self, store: StoreName, id: &str) -> Result<(), StoreError> {
        if let Some(records) = self.stores.write().get_mut(&store) {
            records.remove(id);
        }
        Ok(())
    }
}
