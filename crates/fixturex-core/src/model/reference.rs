use super::template::Template;

/// Deferred relationship marker
///
/// Created by [`get`]; the registry is not consulted until the resolver
/// reaches the node.
#[derive(Debug, Clone)]
pub struct Reference {
    blueprint: String,
    overrides: Template,
}

impl Reference {
    pub fn new(blueprint: impl Into<String>) -> Self {
        Self::with_overrides(blueprint, Template::new())
    }

    pub fn with_overrides(blueprint: impl Into<String>, overrides: Template) -> Self {
        Self {
            blueprint: blueprint.into(),
            overrides,
        }
    }

    /// Name of the referenced blueprint
    pub fn blueprint(&self) -> &str {
        &self.blueprint
    }

    /// Overrides applied when the referenced blueprint is resolved
    pub fn overrides(&self) -> &Template {
        &self.overrides
    }
}

/// Reference to blueprint `name`
pub fn get(name: impl Into<String>) -> Reference {
    Reference::new(name)
}

/// Reference to blueprint `name`, resolved with `overrides`
pub fn get_with(name: impl Into<String>, overrides: Template) -> Reference {
    Reference::with_overrides(name, overrides)
}
