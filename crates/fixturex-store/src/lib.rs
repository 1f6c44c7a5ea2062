//! fixturex-store: SQLite-backed collections for fixturex
//!
//! Provides:
//! - Connection helpers and pragmas
//! - Embedded migrations with checksums
//! - [`SqliteStore`], handing out [`SqliteCollection`]s that share one connection

pub mod collection;
pub mod db;
pub mod errors;
pub mod migrations;

pub use collection::{SqliteCollection, SqliteStore};
pub use errors::Result;
