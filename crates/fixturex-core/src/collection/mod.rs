//! Store boundary
//!
//! A [`Collection`] is the backing store a blueprint persists into. This
//! crate ships an in-memory implementation; `fixturex-store` adds SQLite.

mod memory;

pub use memory::MemoryCollection;

use serde_json::Value;

use crate::errors::Result;
use crate::ids::IdGenerator;
use crate::model::{Record, ID_FIELD};

/// A named store of records
pub trait Collection: Send + Sync {
    /// Collection name, used in errors and logs
    fn name(&self) -> &str;

    /// Persist `record` and return its identifier
    ///
    /// A string `_id` already present in the record is kept; otherwise one is
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store rejects the record (e.g. duplicate id).
    fn insert(&self, record: Record) -> Result<String>;

    /// Record stored under `id`, if any
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot be read.
    fn find_one(&self, id: &str) -> Result<Option<Record>>;

    /// Records whose dotted paths equal every value in `filter`
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot be read.
    fn find(&self, filter: &Record) -> Result<Vec<Record>>;

    /// Remove every record, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot be written.
    fn remove_all(&self) -> Result<usize>;

    /// Number of stored records
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot be read.
    fn count(&self) -> Result<usize> {
        Ok(self.find(&Record::new())?.len())
    }
}

/// Ensure `record` carries an `_id`, returning it
///
/// The id is placed first so stored documents read naturally.
pub fn assign_id(record: &mut Record, ids: &dyn IdGenerator) -> String {
    if let Some(Value::String(id)) = record.get(ID_FIELD) {
        return id.clone();
    }
    let id = ids.new_id();
    let mut with_id = Record::new();
    with_id.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    with_id.extend(std::mem::take(record).into_iter().filter(|(k, _)| k != ID_FIELD));
    *record = with_id;
    id
}
