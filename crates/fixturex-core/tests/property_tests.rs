#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{collection, new_factory};
use fixturex_core::{Template, ID_FIELD};
use proptest::prelude::*;
use serde_json::Value;

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    #[test]
    fn prop_dotted_key_equals_nested_template(outer in key(), inner in key(), value in any::<i64>()) {
        let factory = new_factory();
        factory.define("dotted", collection("a"), Template::new().with(format!("{}.{}", outer, inner), value));
        factory.define("nested", collection("a"), Template::new().with(outer.clone(), Template::new().with(inner.clone(), value)));

        prop_assert_eq!(factory.tree("dotted").unwrap(), factory.tree("nested").unwrap());
    }

    #[test]
    fn prop_literal_build_and_create_agree(
        entries in prop::collection::vec((key(), any::<i32>()), 0..8)
    ) {
        let factory = new_factory();
        let template: Template = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        factory.define("literal", collection("a"), template);

        let mut built = factory.build("literal").unwrap();
        let mut created = factory.create("literal").unwrap();
        built.remove(ID_FIELD);
        created.remove(ID_FIELD);

        prop_assert_eq!(&built, &created);
        prop_assert_eq!(built, factory.tree("literal").unwrap());
    }

    #[test]
    fn prop_sequence_is_monotonic(builds in 1usize..20) {
        let factory = new_factory();
        factory.define(
            "counted",
            collection("a"),
            Template::new().computed("n", |h, _| Ok(h.sequence(|n| n).into())),
        );

        for expected in 1..=builds {
            let record = factory.build("counted").unwrap();
            prop_assert_eq!(record.get("n"), Some(&Value::from(expected as u64)));
        }
    }
}
