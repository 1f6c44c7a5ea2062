use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Options, Reference, Template};
use crate::helper::Helper;

/// Signature of a computed attribute
///
/// The helper exposes the partial result built so far (`helper.this()`),
/// sequence counters and reference creation.
pub type ComputeFn = dyn Fn(&Helper<'_>, &Options) -> anyhow::Result<AttributeNode> + Send + Sync;

/// A computed attribute callback
///
/// Cloning shares the underlying function.
#[derive(Clone)]
pub struct Computed(Arc<ComputeFn>);

impl Computed {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Helper<'_>, &Options) -> anyhow::Result<AttributeNode> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, helper: &Helper<'_>, options: &Options) -> anyhow::Result<AttributeNode> {
        (self.0)(helper, options)
    }

    /// Whether both handles point at the same callback
    pub fn ptr_eq(&self, other: &Computed) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(..)")
    }
}

/// One node of an attribute template
#[derive(Debug, Clone)]
pub enum AttributeNode {
    /// A fixed value; objects met during the record walk are expanded key by key
    Literal(Value),
    /// Evaluated at resolution time against the partial result
    Computed(Computed),
    /// A sub-object whose keys may be dotted paths
    Nested(Template),
    /// An array whose elements are resolved independently, in order
    Sequence(Vec<AttributeNode>),
    /// Deferred relationship to another blueprint
    Reference(Reference),
}

impl AttributeNode {
    pub fn literal(value: impl Into<Value>) -> Self {
        AttributeNode::Literal(value.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Helper<'_>, &Options) -> anyhow::Result<AttributeNode> + Send + Sync + 'static,
    {
        AttributeNode::Computed(Computed::new(f))
    }

    pub fn sequence<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<AttributeNode>,
    {
        AttributeNode::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Short variant name, used in debug logs
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeNode::Literal(_) => "literal",
            AttributeNode::Computed(_) => "computed",
            AttributeNode::Nested(_) => "nested",
            AttributeNode::Sequence(_) => "sequence",
            AttributeNode::Reference(_) => "reference",
        }
    }
}

impl From<Value> for AttributeNode {
    fn from(value: Value) -> Self {
        AttributeNode::Literal(value)
    }
}

impl From<&str> for AttributeNode {
    fn from(value: &str) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<String> for AttributeNode {
    fn from(value: String) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<bool> for AttributeNode {
    fn from(value: bool) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<i32> for AttributeNode {
    fn from(value: i32) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<i64> for AttributeNode {
    fn from(value: i64) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<u64> for AttributeNode {
    fn from(value: u64) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<f64> for AttributeNode {
    fn from(value: f64) -> Self {
        AttributeNode::Literal(Value::from(value))
    }
}

impl From<Computed> for AttributeNode {
    fn from(computed: Computed) -> Self {
        AttributeNode::Computed(computed)
    }
}

impl From<Template> for AttributeNode {
    fn from(template: Template) -> Self {
        AttributeNode::Nested(template)
    }
}

impl From<Vec<AttributeNode>> for AttributeNode {
    fn from(items: Vec<AttributeNode>) -> Self {
        AttributeNode::Sequence(items)
    }
}

impl From<Reference> for AttributeNode {
    fn from(reference: Reference) -> Self {
        AttributeNode::Reference(reference)
    }
}
