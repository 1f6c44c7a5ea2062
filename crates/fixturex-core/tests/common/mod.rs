use std::sync::Arc;

use fixturex_core::{Factory, MemoryCollection, Options, Record};
use serde_json::Value;

/// Create an isolated factory for one test
#[allow(dead_code)]
pub fn new_factory() -> Factory {
    Factory::new()
}

/// Create an empty in-memory collection
#[allow(dead_code)]
pub fn collection(name: &str) -> Arc<MemoryCollection> {
    Arc::new(MemoryCollection::new(name))
}

/// Convert a JSON object literal into a record
///
/// Panics if `value` is not an object.
#[allow(dead_code)]
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Convert a JSON object literal into caller options
#[allow(dead_code)]
pub fn options(value: Value) -> Options {
    record(value)
}

/// String at a dotted path, panicking with context if absent
#[allow(dead_code)]
pub fn str_at<'a>(record: &'a Record, path: &str) -> &'a str {
    fixturex_core::path::get_path(record, path)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("no string at '{path}' in {record:?}"))
}
