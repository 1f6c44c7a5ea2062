//! Dotted-path access into records
//!
//! `"profile.name"` addresses `record["profile"]["name"]`. Writing through a
//! path creates missing intermediate objects and replaces non-object
//! intermediates. Reading also accepts numeric segments as array indexes.

use serde_json::Value;

use crate::model::Record;

/// Join an attribute path prefix and a key
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Write `value` at `path`, expanding dotted segments into nested objects
pub fn set_path(record: &mut Record, path: &str, value: Value) {
    let (target, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (ensure_object(record, parents), last),
        None => (record, path),
    };
    target.insert(last.to_string(), value);
}

/// Object at `path`, created if missing
///
/// An existing object is kept so that `{"profile.name": ..}` and
/// `{"profile": {"age": ..}}` merge into the same sub-object.
pub fn ensure_object<'a>(record: &'a mut Record, path: &str) -> &'a mut Record {
    let mut current = record;
    for segment in path.split('.') {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Record::new()));
        current = object_slot(slot);
    }
    current
}

fn object_slot(slot: &mut Value) -> &mut Record {
    if !slot.is_object() {
        *slot = Value::Object(Record::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

/// Read the value at `path`
pub fn get_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Whether every `(path, value)` pair of `filter` is present in `record`
pub fn matches(record: &Record, filter: &Record) -> bool {
    filter
        .iter()
        .all(|(path, expected)| get_path(record, path) == Some(expected))
}
