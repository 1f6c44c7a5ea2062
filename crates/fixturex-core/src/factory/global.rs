use std::sync::OnceLock;

use super::Factory;

static GLOBAL: OnceLock<Factory> = OnceLock::new();

/// Process-wide factory behind the crate-level free functions
///
/// Created with the default configuration on first use. Blueprints and
/// sequence counters defined here are shared by every caller in the process.
pub fn global() -> &'static Factory {
    GLOBAL.get_or_init(Factory::new)
}

impl Factory {
    /// See [`global`]
    pub fn global() -> &'static Factory {
        global()
    }
}
