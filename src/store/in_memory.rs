//! InMemoryStore - HashMap-backed key-value store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{KeyVal, Precondition, Scan, StoreError, StoreRecord};
use crate::id::Id;

/// In-memory store backed by a HashMap.
///
/// Records are kept bitcode-encoded under their full key. Clone-friendly via
/// Arc: clones share the same table.
#[derive(Clone)]
pub struct InMemoryStore {
    table: String,
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::named("memory")
    }

    /// Create a new empty store with a table name (only used for display).
    pub fn named(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn encode(record: &StoreRecord) -> Result<Vec<u8>, StoreError> {
        bitcode::serialize(record).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<StoreRecord, StoreError> {
        bitcode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn key_of(record: &StoreRecord) -> Result<Id, StoreError> {
        record
            .key()
            .ok_or_else(|| StoreError::Codec("record has no key attribute".into()))
    }
}

impl KeyVal for InMemoryStore {
    fn get(&self, key: &Id) -> Result<StoreRecord, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        match storage.get(key.as_str()) {
            Some(bytes) => Self::decode(bytes),
            None => Err(StoreError::NotFound(key.clone())),
        }
    }

    fn put(&self, record: StoreRecord) -> Result<(), StoreError> {
        let key = Self::key_of(&record)?;
        let bytes = Self::encode(&record)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("put"))?;

        storage.insert(key.as_str().to_string(), bytes);
        Ok(())
    }

    fn update(
        &self,
        record: StoreRecord,
        precondition: Precondition,
    ) -> Result<StoreRecord, StoreError> {
        let key = Self::key_of(&record)?;

        // Read-merge-write under one write guard so the precondition check
        // and the write are atomic.
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        let mut stored = match (storage.get(key.as_str()), precondition) {
            (Some(bytes), _) => Self::decode(bytes)?,
            (None, Precondition::Always) => StoreRecord::new(),
            (None, Precondition::Exists) => return Err(StoreError::PreconditionFailed(key)),
        };

        stored.merge(record);
        let bytes = Self::encode(&stored)?;
        storage.insert(key.as_str().to_string(), bytes);

        Ok(stored)
    }

    fn remove(&self, key: &Id) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?;

        storage.remove(key.as_str());
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Scan<'_>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("scan"))?;

        // Snapshot the matching bytes; decoding is deferred to iteration.
        let matching: Vec<Vec<u8>> = storage
            .iter()
            .filter(|(key, _)| Id::from(key.as_str()).in_namespace(prefix))
            .map(|(_, bytes)| bytes.clone())
            .collect();

        Ok(Box::new(
            matching.into_iter().map(|bytes| Self::decode(&bytes)),
        ))
    }
}
