//! Helper handed to computed attributes

use serde_json::Value;
use tracing::debug;

use crate::model::{Record, Reference, Template};
use crate::path;
use crate::sequence::{SequenceKey, SequenceTable};

/// Context of one computed attribute evaluation
///
/// `this()` is the partial result: attributes declared earlier are visible,
/// later ones are not yet set.
pub struct Helper<'a> {
    this: &'a Record,
    sequences: &'a SequenceTable,
    key: SequenceKey,
}

impl<'a> Helper<'a> {
    pub(crate) fn new(this: &'a Record, sequences: &'a SequenceTable, key: SequenceKey) -> Self {
        Self {
            this,
            sequences,
            key,
        }
    }

    /// The partial result built so far
    pub fn this(&self) -> &'a Record {
        self.this
    }

    /// Value at a dotted path of the partial result
    pub fn field(&self, path: &str) -> Option<&'a Value> {
        path::get_path(self.this, path)
    }

    /// String value at a dotted path of the partial result
    pub fn str_field(&self, path: &str) -> Option<&'a str> {
        self.field(path).and_then(Value::as_str)
    }

    /// Attribute path of the computed node being evaluated
    pub fn path(&self) -> &str {
        self.key.path()
    }

    /// Next value of this attribute's counter, passed through `gen`
    pub fn sequence<T>(&self, gen: impl FnOnce(u64) -> T) -> T {
        let n = self.sequences.next(&self.key);
        debug!(
            blueprint = self.key.blueprint(),
            path = self.key.path(),
            n,
            "sequence"
        );
        gen(n)
    }

    /// Reference to another blueprint
    pub fn get(&self, name: impl Into<String>) -> Reference {
        Reference::new(name)
    }

    /// Reference to another blueprint, resolved with overrides
    pub fn get_with(&self, name: impl Into<String>, overrides: Template) -> Reference {
        Reference::with_overrides(name, overrides)
    }
}
