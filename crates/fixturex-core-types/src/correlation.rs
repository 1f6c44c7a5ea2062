//! Correlation types for tracking a single resolution
//!
//! Every top-level `build`/`create`/`tree` call is tagged with a
//! [`ResolutionId`] so that nested reference resolutions can be tied back to
//! the call that triggered them in the logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema;

/// Unique identifier for one top-level resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionId(String);

impl ResolutionId {
    /// Generate a new ResolutionId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ResolutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution mode
///
/// Controls whether the top-level record is persisted and how relationship
/// references are materialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Resolve without persisting; references become store ids
    Build,
    /// Resolve and persist; references become store ids
    Create,
    /// Resolve without persisting; references are embedded as records
    Tree,
}

impl Mode {
    /// Stable lowercase name, also used as the logging `op`
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Build => schema::OP_BUILD,
            Mode::Create => schema::OP_CREATE,
            Mode::Tree => schema::OP_TREE,
        }
    }

    /// Whether references resolve to identifiers (as opposed to embedded records)
    pub fn links_by_id(&self) -> bool {
        matches!(self, Mode::Build | Mode::Create)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
