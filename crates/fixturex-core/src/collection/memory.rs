use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{FixtureError, Result};
use crate::ids::{IdGenerator, RandomIds};
use crate::model::Record;
use crate::path;

use super::{assign_id, Collection};

/// In-memory collection
///
/// Keeps insertion order. Lock poisoning surfaces as a `Persistence` error.
pub struct MemoryCollection {
    name: String,
    ids: Arc<dyn IdGenerator>,
    records: RwLock<Vec<(String, Record)>>,
}

impl MemoryCollection {
    /// Create an empty collection using random 17-character ids
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_ids(name, RandomIds::default())
    }

    /// Create an empty collection with a custom id generator
    pub fn with_ids(name: impl Into<String>, ids: impl IdGenerator + 'static) -> Self {
        Self {
            name: name.into(),
            ids: Arc::new(ids),
            records: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<(String, Record)>>> {
        self.records
            .read()
            .map_err(|_| FixtureError::persistence(&self.name, "collection lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<(String, Record)>>> {
        self.records
            .write()
            .map_err(|_| FixtureError::persistence(&self.name, "collection lock poisoned"))
    }
}

impl std::fmt::Debug for MemoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCollection")
            .field("name", &self.name)
            .field("len", &self.read().map(|r| r.len()).unwrap_or_default())
            .finish()
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, mut record: Record) -> Result<String> {
        let id = assign_id(&mut record, self.ids.as_ref());
        let mut records = self.write()?;
        if records.iter().any(|(existing, _)| *existing == id) {
            return Err(FixtureError::persistence(
                &self.name,
                format!("duplicate id {}", id),
            ));
        }
        records.push((id.clone(), record));
        Ok(id)
    }

    fn find_one(&self, id: &str) -> Result<Option<Record>> {
        Ok(self
            .read()?
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, record)| record.clone()))
    }

    fn find(&self, filter: &Record) -> Result<Vec<Record>> {
        Ok(self
            .read()?
            .iter()
            .filter(|(_, record)| path::matches(record, filter))
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn remove_all(&self) -> Result<usize> {
        let mut records = self.write()?;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
