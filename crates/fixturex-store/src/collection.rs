//! SQLite-backed collections
//!
//! All collections of one [`SqliteStore`] live in the `records` table of a
//! single connection, keyed by `(collection, id)`. Documents are stored as
//! JSON text with their key order intact.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use fixturex_core::collection::{assign_id, Collection};
use fixturex_core::errors::FixtureError;
use fixturex_core::ids::{IdGenerator, RandomIds};
use fixturex_core::{path, Record};

use crate::db;
use crate::errors::{in_collection, is_constraint_violation, Result};
use crate::migrations::apply_migrations;

/// Shared SQLite connection handing out collections
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store file, configure it and apply migrations
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the file cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// Open a migrated in-memory store
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when SQLite cannot be initialized.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure and migrate an existing connection
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when configuration or migration fails.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Collection `name` using random 17-character ids
    pub fn collection(&self, name: impl Into<String>) -> Arc<SqliteCollection> {
        self.collection_with_ids(name, RandomIds::default())
    }

    /// Collection `name` with a custom id generator
    pub fn collection_with_ids(
        &self,
        name: impl Into<String>,
        ids: impl IdGenerator + 'static,
    ) -> Arc<SqliteCollection> {
        Arc::new(SqliteCollection {
            name: name.into(),
            conn: Arc::clone(&self.conn),
            ids: Arc::new(ids),
        })
    }
}

/// One named collection inside a [`SqliteStore`]
pub struct SqliteCollection {
    name: String,
    conn: Arc<Mutex<Connection>>,
    ids: Arc<dyn IdGenerator>,
}

impl SqliteCollection {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FixtureError::persistence(&self.name, "connection lock poisoned"))
    }

    fn decode(&self, body: &str) -> Result<Record> {
        serde_json::from_str(body)
            .map_err(|e| FixtureError::persistence(&self.name, format!("corrupt record body: {}", e)))
    }

    fn bodies(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT body FROM records WHERE collection = ?1 ORDER BY rowid")
            .map_err(in_collection(&self.name))?;
        let bodies = stmt
            .query_map([&self.name], |row| row.get(0))
            .map_err(in_collection(&self.name))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(in_collection(&self.name))?;
        Ok(bodies)
    }
}

impl std::fmt::Debug for SqliteCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCollection")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Collection for SqliteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, mut record: Record) -> Result<String> {
        let id = assign_id(&mut record, self.ids.as_ref());
        let body = serde_json::to_string(&record)?;
        let inserted_at = chrono::Utc::now().to_rfc3339();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO records (collection, id, body, inserted_at) VALUES (?1, ?2, ?3, ?4)",
            params![self.name, id, body, inserted_at],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                FixtureError::persistence(&self.name, format!("duplicate id {}", id))
            } else {
                in_collection(&self.name)(e)
            }
        })?;

        debug!(collection = %self.name, record_id = %id, "record inserted");
        Ok(id)
    }

    fn find_one(&self, id: &str) -> Result<Option<Record>> {
        let body: Option<String> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                params![self.name, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(in_collection(&self.name))?
        };
        body.map(|b| self.decode(&b)).transpose()
    }

    fn find(&self, filter: &Record) -> Result<Vec<Record>> {
        let mut found = Vec::new();
        for body in self.bodies()? {
            let record = self.decode(&body)?;
            if path::matches(&record, filter) {
                found.push(record);
            }
        }
        Ok(found)
    }

    fn remove_all(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM records WHERE collection = ?1", [&self.name])
            .map_err(in_collection(&self.name))
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1",
                [&self.name],
                |row| row.get(0),
            )
            .map_err(in_collection(&self.name))?;
        usize::try_from(count)
            .map_err(|_| FixtureError::persistence(&self.name, format!("invalid row count {}", count)))
    }
}
