//! Factory configuration

use std::fmt;
use std::sync::Arc;

use crate::ids::{IdGenerator, RandomIds};

/// Default limit on nested reference resolution
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 32;

/// Settings of a [`Factory`](crate::Factory)
#[derive(Clone)]
pub struct FactoryConfig {
    /// References nested deeper than this fail with `ReferenceDepthExceeded`
    pub max_reference_depth: usize,
    /// Source of the unpersisted `_id` that `build` assigns
    pub ids: Arc<dyn IdGenerator>,
}

impl FactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            ids: Arc::new(RandomIds::default()),
        }
    }
}

impl fmt::Debug for FactoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryConfig")
            .field("max_reference_depth", &self.max_reference_depth)
            .finish_non_exhaustive()
    }
}
