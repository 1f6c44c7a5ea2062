use serde_json::Value;

use super::node::AttributeNode;
use super::{Options, Record};
use crate::errors::{FixtureError, Result};
use crate::helper::Helper;

/// Ordered attribute template
///
/// Keys keep declaration order. Setting an existing key replaces its node in
/// place; a new key is appended.
#[derive(Debug, Clone, Default)]
pub struct Template {
    entries: Vec<(String, AttributeNode)>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Template::set`]
    pub fn with(mut self, key: impl Into<String>, node: impl Into<AttributeNode>) -> Self {
        self.set(key, node);
        self
    }

    /// Builder shorthand for a computed attribute
    pub fn computed<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Helper<'_>, &Options) -> anyhow::Result<AttributeNode> + Send + Sync + 'static,
    {
        self.with(key, AttributeNode::computed(f))
    }

    /// Set `key`, returning the node it replaced
    pub fn set(&mut self, key: impl Into<String>, node: impl Into<AttributeNode>) -> Option<AttributeNode> {
        let key = key.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeNode> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of `self` with `overrides` applied at the top level
    ///
    /// Each override replaces the whole node under its key (no deep merge);
    /// keys only present in `self` are carried through unchanged.
    pub fn merged(&self, overrides: &Template) -> Template {
        let mut merged = self.clone();
        for (key, node) in overrides.iter() {
            merged.set(key, node.clone());
        }
        merged
    }

    /// Literal-only template from a JSON object
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` when `value` is not an object.
    pub fn from_json(value: Value) -> Result<Template> {
        match value {
            Value::Object(map) => Ok(Template::from(map)),
            other => Err(FixtureError::InvalidTemplate {
                reason: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<Record> for Template {
    fn from(map: Record) -> Self {
        map.into_iter().collect()
    }
}

impl<K, N> FromIterator<(K, N)> for Template
where
    K: Into<String>,
    N: Into<AttributeNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut template = Template::new();
        for (key, node) in iter {
            template.set(key, node);
        }
        template
    }
}

impl IntoIterator for Template {
    type Item = (String, AttributeNode);
    type IntoIter = std::vec::IntoIter<(String, AttributeNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn literal_of(template: &Template, key: &str) -> Option<Value> {
        match template.get(key) {
            Some(AttributeNode::Literal(v)) => Some(v.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut template = Template::new().with("a", 1).with("b", 2).with("c", 3);
        let previous = template.set("b", 20);

        assert!(matches!(previous, Some(AttributeNode::Literal(_))));
        assert_eq!(template.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(literal_of(&template, "b"), Some(json!(20)));
    }

    #[test]
    fn test_merged_appends_new_keys_and_leaves_original() {
        let parent = Template::new().with("name", "John Smith").with("age", 40);
        let overrides = Template::new().with("age", 41).with("test", "testing!");

        let child = parent.merged(&overrides);

        assert_eq!(child.keys().collect::<Vec<_>>(), vec!["name", "age", "test"]);
        assert_eq!(literal_of(&child, "age"), Some(json!(41)));
        assert_eq!(literal_of(&parent, "age"), Some(json!(40)));
        assert!(!parent.contains_key("test"));
    }

    #[test]
    fn test_merge_replaces_whole_nested_node() {
        let parent = Template::new().with(
            "profile",
            Template::new().with("name", "John").with("bio", "x"),
        );
        let overrides = Template::new().with("profile", Template::new().with("name", "Jane"));

        let child = parent.merged(&overrides);

        match child.get("profile") {
            Some(AttributeNode::Nested(nested)) => {
                assert_eq!(nested.len(), 1);
                assert!(!nested.contains_key("bio"));
            }
            other => panic!("expected nested profile, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_requires_object() {
        let template = Template::from_json(json!({"name": "John", "age": 3})).unwrap();
        assert_eq!(template.len(), 2);

        let err = Template::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_remove() {
        let mut template = Template::new().with("a", 1).with("b", 2);
        assert!(template.remove("a").is_some());
        assert!(template.remove("a").is_none());
        assert_eq!(template.keys().collect::<Vec<_>>(), vec!["b"]);
    }
}
