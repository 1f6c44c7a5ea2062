//! fixturex-core: blueprint-driven test fixtures
//!
//! Define a blueprint once, then produce records from it:
//!
//! ```
//! use std::sync::Arc;
//! use fixturex_core::{Factory, MemoryCollection, Template, get};
//!
//! let factory = Factory::new();
//! let authors = Arc::new(MemoryCollection::new("authors"));
//! let books = Arc::new(MemoryCollection::new("books"));
//!
//! factory.define("author", authors, Template::new().with("name", "John Smith"));
//! factory.define(
//!     "book",
//!     books,
//!     Template::new()
//!         .with("authorId", get("author"))
//!         .computed("email", |h, _| Ok(h.sequence(|n| format!("person{}@example.com", n)).into())),
//! );
//!
//! let book = factory.create("book").unwrap();
//! assert!(book["authorId"].is_string());
//! assert_eq!(book["email"], "person1@example.com");
//! ```

pub mod collection;
pub mod config;
pub mod errors;
pub mod factory;
pub mod helper;
pub mod ids;
pub mod logging_facility;
pub mod model;
pub mod path;
pub mod registry;
mod resolver;
pub mod sequence;

pub use collection::{Collection, MemoryCollection};
pub use config::FactoryConfig;
pub use errors::{FixtureError, FxError, FxErrorKind, Result};
pub use factory::{BlueprintHandle, Factory};
pub use fixturex_core_types::{Mode, ResolutionId};
pub use helper::Helper;
pub use ids::{IdGenerator, RandomIds, SequentialIds, UuidIds, DEFAULT_ID_LENGTH};
pub use model::{get, get_with, AttributeNode, Computed, Options, Record, Reference, Template, ID_FIELD};
pub use registry::{AfterHook, BlueprintDefinition};

#[doc(hidden)]
pub mod __private {
    pub use fixturex_core_types::schema;
    pub use tracing;
}

use std::sync::Arc;

/// Register a blueprint on the process-wide factory
pub fn define(
    name: impl Into<String>,
    collection: Arc<dyn Collection>,
    template: impl Into<Template>,
) -> BlueprintHandle<'static> {
    Factory::global().define(name, collection, template)
}

/// Attach an after-hook on the process-wide factory
///
/// # Errors
///
/// Returns `UnknownBlueprint` when `name` is not registered.
pub fn after<F>(name: &str, hook: F) -> Result<()>
where
    F: Fn(&Record) + Send + Sync + 'static,
{
    Factory::global().after(name, hook)
}

/// Extend a blueprint of the process-wide factory
///
/// # Errors
///
/// Returns `UnknownBlueprint` when `parent` is not registered.
pub fn extend(parent: &str, overrides: impl Into<Template>) -> Result<Template> {
    Factory::global().extend(parent, overrides)
}

/// Build on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn build(name: &str) -> Result<Record> {
    Factory::global().build(name)
}

/// Build with overrides and options on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn build_with(name: &str, overrides: &Template, options: &Options) -> Result<Record> {
    Factory::global().build_with(name, overrides, options)
}

/// Create on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn create(name: &str) -> Result<Record> {
    Factory::global().create(name)
}

/// Create with overrides and options on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn create_with(name: &str, overrides: &Template, options: &Options) -> Result<Record> {
    Factory::global().create_with(name, overrides, options)
}

/// Tree on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn tree(name: &str) -> Result<Record> {
    Factory::global().tree(name)
}

/// Tree with overrides and options on the process-wide factory
///
/// # Errors
///
/// See [`Factory::build`].
pub fn tree_with(name: &str, overrides: &Template, options: &Options) -> Result<Record> {
    Factory::global().tree_with(name, overrides, options)
}

/// Forget every sequence counter of the process-wide factory
pub fn reset_sequences() {
    Factory::global().reset_sequences();
}
