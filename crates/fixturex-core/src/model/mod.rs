//! Blueprint data model
//!
//! Templates are ordered lists of `(key, AttributeNode)` pairs. Records and
//! caller options are plain JSON objects.

pub mod node;
pub mod reference;
pub mod template;

pub use node::{AttributeNode, Computed};
pub use reference::{get, get_with, Reference};
pub use template::Template;

/// A resolved record
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Caller-supplied options passed to every computed attribute
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Reserved identifier key, assigned by the store (or faked by `build`)
pub const ID_FIELD: &str = "_id";
