//! Blueprint registry
//!
//! Name → definition map. Lookups hand out `Arc` snapshots so a resolution in
//! progress is unaffected by a concurrent redefinition.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::collection::Collection;
use crate::errors::{FixtureError, Result};
use crate::model::{Record, Template};

/// Post-build hook, called with the persisted record after `create`
pub type AfterHook = Arc<dyn Fn(&Record) + Send + Sync>;

/// A registered blueprint
pub struct BlueprintDefinition {
    name: String,
    collection: Arc<dyn Collection>,
    template: Template,
    generation: u64,
}

impl BlueprintDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.collection
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Registry-wide counter value at definition time
    ///
    /// Distinguishes successive definitions under the same name.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for BlueprintDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintDefinition")
            .field("name", &self.name)
            .field("collection", &self.collection.name())
            .field("template", &self.template.keys().collect::<Vec<_>>())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Definition plus its hook, as seen by one resolution
#[derive(Clone)]
pub struct Snapshot {
    pub definition: Arc<BlueprintDefinition>,
    pub after: Option<AfterHook>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("definition", &self.definition)
            .field("after", &self.after.is_some())
            .finish()
    }
}

struct Entry {
    definition: Arc<BlueprintDefinition>,
    after: Option<AfterHook>,
}

/// Registry of blueprint definitions
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Entry>>,
    generation: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` under `name`, replacing any previous definition
    ///
    /// The replaced definition's hook is dropped. Returns the new definition.
    pub fn define(
        &self,
        name: impl Into<String>,
        collection: Arc<dyn Collection>,
        template: Template,
    ) -> Arc<BlueprintDefinition> {
        let name = name.into();
        let definition = Arc::new(BlueprintDefinition {
            name: name.clone(),
            collection,
            template,
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
        });
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                name,
                Entry {
                    definition: Arc::clone(&definition),
                    after: None,
                },
            );
        definition
    }

    /// Attach `hook` to the current definition of `name`
    ///
    /// Returns `false` when `name` is not registered.
    pub fn set_after(&self, name: &str, hook: AfterHook) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(name) {
            Some(entry) => {
                entry.after = Some(hook);
                true
            }
            None => false,
        }
    }

    /// Attach `hook` only if `name` still maps to `generation`
    pub(crate) fn set_after_for(&self, name: &str, generation: u64, hook: AfterHook) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(name) {
            Some(entry) if entry.definition.generation == generation => {
                entry.after = Some(hook);
                true
            }
            _ => false,
        }
    }

    /// Current definition and hook of `name`
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlueprint` when `name` is not registered.
    pub fn lookup(&self, name: &str) -> Result<Snapshot> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|entry| Snapshot {
                definition: Arc::clone(&entry.definition),
                after: entry.after.clone(),
            })
            .ok_or_else(|| FixtureError::UnknownBlueprint {
                name: name.to_string(),
            })
    }

    /// Parent template with `overrides` applied at the top level
    ///
    /// The parent definition is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlueprint` when `parent` is not registered.
    pub fn extend(&self, parent: &str, overrides: &Template) -> Result<Template> {
        let snapshot = self.lookup(parent)?;
        Ok(snapshot.definition.template().merged(overrides))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Remove `name`, returning its definition
    pub fn undefine(&self, name: &str) -> Option<Arc<BlueprintDefinition>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .map(|entry| entry.definition)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}
