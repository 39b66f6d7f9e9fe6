//! Map-backed record cache

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CacheError, RecordCache, validate_id};
use crate::record::Record;

/// In-memory record cache, mostly useful in tests
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Record>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Stored ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.entries().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Record>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordCache for MemoryCache {
    async fn exists(&self, id: &str) -> bool {
        self.entries().contains_key(id)
    }

    async fn load(&self, id: &str) -> Result<Record, CacheError> {
        self.entries()
            .get(id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(id.to_string()))
    }

    async fn store(&self, record: &Record, id: &str) -> Result<(), CacheError> {
        validate_id(id)?;
        self.entries().insert(id.to_string(), record.clone());
        Ok(())
    }
}
