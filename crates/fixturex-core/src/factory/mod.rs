//! Blueprint API
//!
//! A [`Factory`] owns a blueprint registry, a sequence table and its
//! configuration. Each test may build its own; [`Factory::global`] backs the
//! crate-level free functions.
//!
//! ## Operations
//! - `define` / `after` / `extend` manage blueprints
//! - `build` resolves without persisting and assigns an unpersisted `_id`
//! - `create` resolves, persists, reads back and runs the after-hook
//! - `tree` resolves without persisting, embedding referenced records

mod global;

pub use global::global;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use fixturex_core_types::{Mode, ResolutionId};

use crate::collection::{assign_id, Collection};
use crate::config::FactoryConfig;
use crate::errors::{FixtureError, Result};
use crate::model::{Options, Record, Reference, Template, ID_FIELD};
use crate::registry::{AfterHook, BlueprintDefinition, Registry};
use crate::resolver::Resolver;
use crate::sequence::SequenceTable;
use crate::{log_op_end, log_op_error, log_op_start};

/// Per-call state threaded through nested resolutions
#[derive(Clone, Copy)]
pub(crate) struct Invocation<'a> {
    pub(crate) resolution_id: &'a ResolutionId,
    pub(crate) options: &'a Options,
    pub(crate) depth: usize,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(resolution_id: &'a ResolutionId, options: &'a Options) -> Self {
        Self {
            resolution_id,
            options,
            depth: 0,
        }
    }

    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

/// Fixture engine: registry, sequence counters and configuration
#[derive(Debug, Default)]
pub struct Factory {
    registry: Registry,
    sequences: SequenceTable,
    config: FactoryConfig,
}

/// Returned by [`Factory::define`] to attach an after-hook
pub struct BlueprintHandle<'f> {
    factory: &'f Factory,
    definition: Arc<BlueprintDefinition>,
}

impl BlueprintHandle<'_> {
    /// Attach a hook run with every record `create` persists for this blueprint
    ///
    /// Replaces a previously attached hook. Has no effect if the blueprint has
    /// been redefined since this handle was returned.
    pub fn after<F>(self, hook: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        let attached = self.factory.registry.set_after_for(
            self.definition.name(),
            self.definition.generation(),
            Arc::new(hook),
        );
        if !attached {
            tracing::warn!(
                blueprint = self.definition.name(),
                "after-hook ignored: blueprint was redefined or removed"
            );
        }
        self
    }

    pub fn definition(&self) -> &Arc<BlueprintDefinition> {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            registry: Registry::new(),
            sequences: SequenceTable::new(),
            config,
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sequences(&self) -> &SequenceTable {
        &self.sequences
    }

    /// Register a blueprint, replacing any previous one with the same name
    ///
    /// Sequence counters of the replaced definition are dropped.
    pub fn define(
        &self,
        name: impl Into<String>,
        collection: Arc<dyn Collection>,
        template: impl Into<Template>,
    ) -> BlueprintHandle<'_> {
        let definition = self.registry.define(name, collection, template.into());
        self.sequences
            .retain_generation(definition.name(), definition.generation());
        debug!(
            blueprint = definition.name(),
            generation = definition.generation(),
            "blueprint defined"
        );
        BlueprintHandle {
            factory: self,
            definition,
        }
    }

    /// Attach an after-hook to the current definition of `name`
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlueprint` when `name` is not registered.
    pub fn after<F>(&self, name: &str, hook: F) -> Result<()>
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        let hook: AfterHook = Arc::new(hook);
        if self.registry.set_after(name, hook) {
            Ok(())
        } else {
            Err(FixtureError::UnknownBlueprint {
                name: name.to_string(),
            })
        }
    }

    /// Template of `parent` with `overrides` applied at the top level
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlueprint` when `parent` is not registered.
    pub fn extend(&self, parent: &str, overrides: impl Into<Template>) -> Result<Template> {
        self.registry.extend(parent, &overrides.into())
    }

    /// Resolve `name` without persisting
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlueprint`, `Computation`, `Persistence` (from nested
    /// references) or `ReferenceDepthExceeded`.
    pub fn build(&self, name: &str) -> Result<Record> {
        self.build_with(name, &Template::new(), &Options::new())
    }

    /// [`Factory::build`] with attribute overrides and options
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn build_with(&self, name: &str, overrides: &Template, options: &Options) -> Result<Record> {
        self.run(Mode::Build, name, overrides, options)
    }

    /// Resolve `name`, persist it and return the stored record
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn create(&self, name: &str) -> Result<Record> {
        self.create_with(name, &Template::new(), &Options::new())
    }

    /// [`Factory::create`] with attribute overrides and options
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn create_with(&self, name: &str, overrides: &Template, options: &Options) -> Result<Record> {
        self.run(Mode::Create, name, overrides, options)
    }

    /// Resolve `name` with references embedded as records
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn tree(&self, name: &str) -> Result<Record> {
        self.tree_with(name, &Template::new(), &Options::new())
    }

    /// [`Factory::tree`] with attribute overrides and options
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn tree_with(&self, name: &str, overrides: &Template, options: &Options) -> Result<Record> {
        self.run(Mode::Tree, name, overrides, options)
    }

    /// Forget every sequence counter
    pub fn reset_sequences(&self) {
        self.sequences.reset();
    }

    fn run(&self, mode: Mode, name: &str, overrides: &Template, options: &Options) -> Result<Record> {
        let op = mode.as_str();
        let resolution_id = ResolutionId::new();
        log_op_start!(op, blueprint = name, resolution_id = resolution_id.as_str());
        let start = Instant::now();

        let record = self
            .produce(name, mode, overrides, Invocation::new(&resolution_id, options))
            .map_err(|e| {
                log_op_error!(
                    op,
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    blueprint = name,
                    resolution_id = resolution_id.as_str()
                );
                e
            })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            blueprint = name,
            resolution_id = resolution_id.as_str()
        );
        Ok(record)
    }

    fn produce(&self, name: &str, mode: Mode, overrides: &Template, call: Invocation<'_>) -> Result<Record> {
        if call.depth > self.config.max_reference_depth {
            return Err(FixtureError::ReferenceDepthExceeded {
                blueprint: name.to_string(),
                depth: call.depth,
            });
        }

        let snapshot = self.registry.lookup(name)?;
        let definition = snapshot.definition.as_ref();
        let record = Resolver::new(self, definition, mode, call).resolve(overrides)?;

        match mode {
            Mode::Build => {
                let mut record = record;
                assign_id(&mut record, self.config.ids.as_ref());
                Ok(record)
            }
            Mode::Tree => Ok(record),
            Mode::Create => {
                let collection = definition.collection();
                let id = collection.insert(record)?;
                let persisted = collection.find_one(&id)?.ok_or_else(|| {
                    FixtureError::persistence(
                        collection.name(),
                        format!("record {} missing after insert", id),
                    )
                })?;
                if let Some(hook) = snapshot.after.as_ref() {
                    hook(&persisted);
                }
                Ok(persisted)
            }
        }
    }

    /// Materialise a reference met while resolving in `mode`
    ///
    /// Id-linking modes persist the referenced record and yield its id; tree
    /// mode embeds the referenced record.
    pub(crate) fn resolve_reference(
        &self,
        reference: &Reference,
        mode: Mode,
        call: Invocation<'_>,
    ) -> Result<Value> {
        let nested_mode = if mode.links_by_id() { Mode::Create } else { Mode::Tree };
        let call = call.nested();
        debug!(
            blueprint = reference.blueprint(),
            mode = nested_mode.as_str(),
            depth = call.depth,
            resolution_id = call.resolution_id.as_str(),
            "resolving reference"
        );

        let mut record = self.produce(reference.blueprint(), nested_mode, reference.overrides(), call)?;
        if nested_mode.links_by_id() {
            match record.remove(ID_FIELD) {
                Some(id @ Value::String(_)) => Ok(id),
                _ => Err(FixtureError::persistence(
                    reference.blueprint(),
                    "persisted record has no string _id",
                )),
            }
        } else {
            Ok(Value::Object(record))
        }
    }
}
