//! Attribute resolver
//!
//! Walks an effective template in declaration order and produces a record.
//! Each value lands at its dotted path in the record being built; computed
//! attributes see that partial record as their receiver, so an attribute can
//! read anything declared before it and nothing after.
//!
//! Sub-objects reached from a template entry are written into the record in
//! place. Sub-objects reached through an array element or a computed result
//! are resolved into a detached object first, with the root record still
//! serving as receiver.
//!
//! A top-level `_id` in the blueprint's own template is ignored; one supplied
//! through caller overrides is resolved like any other attribute.

use serde_json::Value;

use fixturex_core_types::Mode;

use crate::errors::{FixtureError, Result};
use crate::factory::{Factory, Invocation};
use crate::helper::Helper;
use crate::model::{AttributeNode, Record, Template, ID_FIELD};
use crate::path;
use crate::registry::BlueprintDefinition;
use crate::sequence::SequenceKey;

/// One resolution of one blueprint
pub(crate) struct Resolver<'a> {
    factory: &'a Factory,
    definition: &'a BlueprintDefinition,
    mode: Mode,
    call: Invocation<'a>,
}

/// Where an entry is written (`rel`, inside the target object) and its
/// attribute path from the record root (`abs`, used for sequence keys and errors)
struct Scope {
    rel: String,
    abs: String,
}

impl Scope {
    fn root() -> Self {
        Scope {
            rel: String::new(),
            abs: String::new(),
        }
    }

    fn detached(abs: &str) -> Self {
        Scope {
            rel: String::new(),
            abs: abs.to_string(),
        }
    }

    fn child(&self, key: &str) -> Scope {
        Scope {
            rel: path::join(&self.rel, key),
            abs: path::join(&self.abs, key),
        }
    }
}

#[derive(Clone, Copy)]
enum Slot<'n> {
    Node(&'n AttributeNode),
    Value(&'n Value),
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        factory: &'a Factory,
        definition: &'a BlueprintDefinition,
        mode: Mode,
        call: Invocation<'a>,
    ) -> Self {
        Self {
            factory,
            definition,
            mode,
            call,
        }
    }

    /// Resolve the definition's template merged with `overrides`
    pub(crate) fn resolve(&self, overrides: &Template) -> Result<Record> {
        let mut template = self.definition.template().clone();
        template.remove(ID_FIELD);
        let template = template.merged(overrides);
        let mut record = Record::new();
        self.walk(&mut record, None, &Scope::root(), &template_slots(&template))?;
        Ok(record)
    }

    /// Write `entries` into `target`
    ///
    /// `receiver` is the record computed attributes see; `None` means
    /// `target` is itself the root record.
    fn walk(
        &self,
        target: &mut Record,
        receiver: Option<&Record>,
        scope: &Scope,
        entries: &[(&str, Slot<'_>)],
    ) -> Result<()> {
        for &(key, slot) in entries {
            let child = scope.child(key);
            match slot {
                Slot::Node(AttributeNode::Nested(template)) => {
                    path::ensure_object(target, &child.rel);
                    self.walk(target, receiver, &child, &template_slots(template))?;
                }
                Slot::Node(AttributeNode::Literal(Value::Object(map))) | Slot::Value(Value::Object(map)) => {
                    path::ensure_object(target, &child.rel);
                    self.walk(target, receiver, &child, &object_slots(map))?;
                }
                Slot::Node(node) => {
                    let value = self.resolve_node(node, receiver.unwrap_or(&*target), &child.abs)?;
                    path::set_path(target, &child.rel, value);
                }
                Slot::Value(value) => {
                    path::set_path(target, &child.rel, value.clone());
                }
            }
        }
        Ok(())
    }

    fn resolve_node(&self, node: &AttributeNode, this: &Record, at: &str) -> Result<Value> {
        self.resolve_chained(node, this, at, 0)
    }

    /// `hop` counts computed nodes already evaluated at `at` for this value
    fn resolve_chained(&self, node: &AttributeNode, this: &Record, at: &str, hop: u32) -> Result<Value> {
        match node {
            AttributeNode::Literal(value) => Ok(value.clone()),
            AttributeNode::Computed(computed) => {
                let key = SequenceKey::new(self.definition.name(), self.definition.generation(), at)
                    .with_hop(hop);
                let helper = Helper::new(this, self.factory.sequences(), key);
                let produced = computed
                    .call(&helper, self.call.options)
                    .map_err(|source| FixtureError::Computation {
                        blueprint: self.definition.name().to_string(),
                        path: at.to_string(),
                        source,
                    })?;
                self.resolve_chained(&produced, this, at, hop + 1)
            }
            AttributeNode::Nested(template) => {
                let mut sub = Record::new();
                self.walk(&mut sub, Some(this), &Scope::detached(at), &template_slots(template))?;
                Ok(Value::Object(sub))
            }
            AttributeNode::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.resolve_node(item, this, &path::join(at, &i.to_string())))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            AttributeNode::Reference(reference) => {
                self.factory.resolve_reference(reference, self.mode, self.call)
            }
        }
    }
}

fn template_slots(template: &Template) -> Vec<(&str, Slot<'_>)> {
    template.iter().map(|(k, n)| (k, Slot::Node(n))).collect()
}

fn object_slots(map: &Record) -> Vec<(&str, Slot<'_>)> {
    map.iter().map(|(k, v)| (k.as_str(), Slot::Value(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MemoryCollection;
    use crate::model::Options;
    use crate::registry::Registry;
    use fixturex_core_types::ResolutionId;
    use serde_json::json;
    use std::sync::Arc;

    fn resolve(factory: &Factory, template: Template, options: &Options) -> Result<Record> {
        let registry = Registry::new();
        let definition = registry.define("author", Arc::new(MemoryCollection::new("authors")), template);
        let resolution_id = ResolutionId::new();
        let call = Invocation::new(&resolution_id, options);
        Resolver::new(factory, &definition, Mode::Tree, call).resolve(&Template::new())
    }

    #[test]
    fn test_literals_and_dotted_keys() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new()
                .with("name", "John Smith")
                .with("profile.age", 40)
                .with("profile", Template::new().with("city", "Oslo")),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(
            Value::Object(record),
            json!({"name": "John Smith", "profile": {"age": 40, "city": "Oslo"}})
        );
    }

    #[test]
    fn test_literal_object_is_walked() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new().with("meta", json!({"a.b": 1, "c": [{"d": true}]})),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(Value::Object(record), json!({"meta": {"a": {"b": 1}, "c": [{"d": true}]}}));
    }

    #[test]
    fn test_computed_sees_only_earlier_attributes() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new()
                .with("first", "John")
                .computed("seen", |h, _| {
                    Ok(json!([h.field("first").is_some(), h.field("last").is_some()]).into())
                })
                .with("last", "Smith"),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(record.get("seen"), Some(&json!([true, false])));
    }

    #[test]
    fn test_nested_computed_reads_root() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new().with("name", "John").with(
                "profile",
                Template::new().computed("name", |h, _| Ok(h.str_field("name").unwrap_or_default().into())),
            ),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(path::get_path(&record, "profile.name"), Some(&json!("John")));
    }

    #[test]
    fn test_sequence_elements_in_order() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new().with("name", "John").with(
                "items",
                AttributeNode::sequence([
                    AttributeNode::literal(json!({"fixed": true})),
                    AttributeNode::computed(|h, _| Ok(format!("{} @ {}", h.str_field("name").unwrap_or_default(), h.path()).into())),
                    AttributeNode::Nested(Template::new().with("x.y", 1)),
                    AttributeNode::sequence([1, 2]),
                ]),
            ),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(
            record.get("items"),
            Some(&json!([{"fixed": true}, "John @ items.1", {"x": {"y": 1}}, [1, 2]]))
        );
    }

    #[test]
    fn test_computed_result_is_resolved_again() {
        let factory = Factory::new();
        let record = resolve(
            &factory,
            Template::new().computed("tags", |_, _| {
                Ok(AttributeNode::sequence([AttributeNode::computed(|_, _| Ok("inner".into()))]))
            }),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(record.get("tags"), Some(&json!(["inner"])));
    }

    #[test]
    fn test_options_reach_computed() {
        let factory = Factory::new();
        let mut options = Options::new();
        options.insert("count".to_string(), json!(3));
        let record = resolve(
            &factory,
            Template::new().computed("pages", |_, opts| {
                let count = opts.get("count").and_then(Value::as_u64).unwrap_or(2);
                Ok(AttributeNode::sequence((1..=count).map(|n| format!("Page {}", n))))
            }),
            &options,
        )
        .unwrap();

        assert_eq!(record.get("pages"), Some(&json!(["Page 1", "Page 2", "Page 3"])));
    }

    #[test]
    fn test_id_key_is_skipped() {
        let factory = Factory::new();
        let record = resolve(&factory, Template::new().with("_id", "fixed").with("name", "x"), &Options::new()).unwrap();
        assert!(!record.contains_key(ID_FIELD));
    }

    #[test]
    fn test_computation_error_carries_path() {
        let factory = Factory::new();
        let err = resolve(
            &factory,
            Template::new().with("profile", Template::new().computed("age", |_, _| anyhow::bail!("no age"))),
            &Options::new(),
        )
        .unwrap_err();

        match err {
            FixtureError::Computation { blueprint, path, source } => {
                assert_eq!(blueprint, "author");
                assert_eq!(path, "profile.age");
                assert_eq!(source.to_string(), "no age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
