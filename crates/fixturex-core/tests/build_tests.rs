#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{collection, new_factory, options, str_at};
use fixturex_core::{get, AttributeNode, Collection, Options, Template, DEFAULT_ID_LENGTH, ID_FIELD};
use serde_json::{json, Value};

#[test]
fn test_basic_build() {
    let factory = new_factory();
    factory.define("author", collection("authors"), Template::new().with("name", "John Smith"));

    let author = factory.build("author").unwrap();

    assert_eq!(str_at(&author, "name"), "John Smith");
}

#[test]
fn test_build_does_not_persist() {
    let factory = new_factory();
    let authors = collection("authors");
    factory.define("author", authors.clone(), Template::new().with("name", "John Smith"));

    let author = factory.build("author").unwrap();

    assert_eq!(str_at(&author, ID_FIELD).len(), DEFAULT_ID_LENGTH);
    assert_eq!(authors.count().unwrap(), 0);
}

#[test]
fn test_each_build_gets_a_fresh_record() {
    let factory = new_factory();
    factory.define("author", collection("authors"), Template::new().with("name", "John Smith"));

    let mut first = factory.build("author").unwrap();
    first.insert("name".to_string(), json!("Changed"));
    let second = factory.build("author").unwrap();

    assert_eq!(str_at(&second, "name"), "John Smith");
    assert_ne!(first.get(ID_FIELD), second.get(ID_FIELD));
}

#[test]
fn test_computed_basic() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().computed("name", |_, _| Ok("John Smith".into())),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "name"), "John Smith");
}

#[test]
fn test_computed_reads_earlier_sibling() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new()
            .with("test", "John Smith")
            .computed("name", |h, _| Ok(h.field("test").cloned().unwrap_or(Value::Null).into())),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "name"), "John Smith");
}

#[test]
fn test_dotted_key() {
    let factory = new_factory();
    factory.define("author", collection("authors"), Template::new().with("profile.name", "John Smith"));

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_dotted_computed_reads_sibling() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new()
            .with("name", "John Smith")
            .computed("profile.name", |h, _| Ok(h.str_field("name").unwrap_or_default().into())),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_deep_object() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().with("profile", Template::new().with("name", "John Smith")),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_deep_object_from_json_literal() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::from_json(json!({"profile": {"name": "John Smith"}})).unwrap(),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_deep_computed() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().with(
            "profile",
            Template::new().computed("name", |_, _| Ok("John Smith".into())),
        ),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_deep_computed_reads_root_sibling() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().with("name", "John Smith").with(
            "profile",
            Template::new().computed("name", |h, _| Ok(h.str_field("name").unwrap_or_default().into())),
        ),
    );

    assert_eq!(str_at(&factory.build("author").unwrap(), "profile.name"), "John Smith");
}

#[test]
fn test_array_with_reference_yields_store_id() {
    let factory = new_factory();
    let authors = collection("authors");
    factory.define("author", authors.clone(), Template::new().with("name", "John Smith"));
    factory.define(
        "book",
        collection("books"),
        Template::new().with(
            "authorIds",
            AttributeNode::sequence([AttributeNode::from(get("author")), "PXm6dye7A8vgoB7uY".into()]),
        ),
    );

    let book = factory.build("book").unwrap();
    let ids = book["authorIds"].as_array().unwrap();

    assert_eq!(ids.len(), 2);
    let author_id = ids[0].as_str().unwrap();
    assert_eq!(author_id.len(), DEFAULT_ID_LENGTH);
    assert!(authors.find_one(author_id).unwrap().is_some(), "referenced author is persisted");
    assert_eq!(ids[1], "PXm6dye7A8vgoB7uY");
}

#[test]
fn test_array_with_computed_returning_reference() {
    let factory = new_factory();
    factory.define("author", collection("authors"), Template::new().with("name", "John Smith"));
    factory.define(
        "book",
        collection("books"),
        Template::new().with(
            "authorIds",
            AttributeNode::sequence([
                AttributeNode::computed(|h, _| Ok(h.get("author").into())),
                "PXm6dye7A8vgoB7uY".into(),
            ]),
        ),
    );

    let book = factory.build("book").unwrap();
    let ids = book["authorIds"].as_array().unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].as_str().unwrap().len(), DEFAULT_ID_LENGTH);
}

#[test]
fn test_array_with_object_is_copied() {
    let factory = new_factory();
    factory.define(
        "book",
        collection("books"),
        Template::new().with("array", json!([{"objectInArray": true}])),
    );

    let book = factory.build("book").unwrap();

    assert_eq!(book["array"][0]["objectInArray"], json!(true));
}

#[test]
fn test_options_reach_computed() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().with("name", "John Smith").computed("books", |h, opts| {
            let count = opts.get("bookCount").and_then(Value::as_u64).unwrap_or(2);
            let name = h.str_field("name").unwrap_or_default().to_string();
            Ok(AttributeNode::sequence((1..=count).map(|n| format!("{} book by {}", n, name))))
        }),
    );

    let author = factory
        .build_with("author", &Template::new(), &options(json!({"bookCount": 3})))
        .unwrap();

    assert_eq!(
        author["books"],
        json!(["1 book by John Smith", "2 book by John Smith", "3 book by John Smith"])
    );

    let default = factory.build("author").unwrap();
    assert_eq!(default["books"].as_array().unwrap().len(), 2);
}

#[test]
fn test_overrides_replace_in_place_and_append() {
    let factory = new_factory();
    factory.define(
        "author",
        collection("authors"),
        Template::new().with("name", "John Smith").with("age", 40),
    );

    let author = factory
        .build_with(
            "author",
            &Template::new().with("name", "Jane Doe").with("email", "jane@example.com"),
            &Options::new(),
        )
        .unwrap();

    let keys: Vec<&str> = author.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![ID_FIELD, "name", "age", "email"]);
    assert_eq!(str_at(&author, "name"), "Jane Doe");
}

#[test]
fn test_redefinition_replaces_template() {
    let factory = new_factory();
    factory.define("author", collection("authors"), Template::new().with("name", "John Smith"));
    factory.define("author", collection("authors"), Template::new().with("name", "Jane Doe"));

    assert_eq!(str_at(&factory.build("author").unwrap(), "name"), "Jane Doe");
}

#[test]
fn test_redefinition_during_build_uses_snapshot() {
    let factory = Arc::new(new_factory());
    let authors = collection("authors");
    let weak = Arc::downgrade(&factory);
    let redefine_with = authors.clone();
    factory.define(
        "author",
        authors,
        Template::new()
            .computed("x", move |_, _| {
                if let Some(factory) = weak.upgrade() {
                    factory.define("author", redefine_with.clone(), Template::new().with("name", "new"));
                }
                Ok("x".into())
            })
            .with("name", "old"),
    );

    let first = factory.build("author").unwrap();
    let second = factory.build("author").unwrap();

    assert_eq!(str_at(&first, "x"), "x");
    assert_eq!(str_at(&first, "name"), "old");
    assert_eq!(str_at(&second, "name"), "new");
    assert!(second.get("x").is_none());
}
