use thiserror::Error;

/// Result type alias using FixtureError
pub type Result<T> = std::result::Result<T, FixtureError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and assertions in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxErrorKind {
    // Registry
    NotFound,
    InvalidInput,

    // Resolution
    Computation,
    DepthExceeded,

    // Integration/IO
    Persistence,
    Serialization,

    // Internal
    Internal,
}

impl FxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            FxErrorKind::NotFound => "ERR_NOT_FOUND",
            FxErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            FxErrorKind::Computation => "ERR_COMPUTATION",
            FxErrorKind::DepthExceeded => "ERR_DEPTH_EXCEEDED",
            FxErrorKind::Persistence => "ERR_PERSISTENCE",
            FxErrorKind::Serialization => "ERR_SERIALIZATION",
            FxErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of a [`FixtureError`] with classification fields, used by
/// the logging facility and by callers that only care about the error code.
#[derive(Debug, Clone)]
pub struct FxError {
    kind: FxErrorKind,
    op: Option<String>,
    blueprint: Option<String>,
    path: Option<String>,
    message: String,
}

impl FxError {
    /// Create a new error with the specified kind
    pub fn new(kind: FxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            blueprint: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add blueprint context
    pub fn with_blueprint(mut self, name: impl Into<String>) -> Self {
        self.blueprint = Some(name.into());
        self
    }

    /// Add attribute path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> FxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the blueprint context, if any
    pub fn blueprint(&self) -> Option<&str> {
        self.blueprint.as_deref()
    }

    /// Get the attribute path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for FxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(blueprint) = &self.blueprint {
            write!(f, " (blueprint: {})", blueprint)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for FxError {}

// ========== End Error Facility ==========

/// Error taxonomy for fixture resolution
#[derive(Error, Debug)]
pub enum FixtureError {
    /// No blueprint is registered under this name
    #[error("Unknown blueprint: {name}")]
    UnknownBlueprint { name: String },

    /// A computed attribute returned an error; the original error is kept as source
    #[error("Computed attribute '{path}' of blueprint '{blueprint}' failed: {source}")]
    Computation {
        blueprint: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// The backing collection rejected or lost a record
    #[error("Persistence failed in collection '{collection}': {message}")]
    Persistence { collection: String, message: String },

    /// Relationship references nested deeper than the configured limit
    #[error("Reference depth {depth} exceeded while resolving blueprint '{blueprint}'")]
    ReferenceDepthExceeded { blueprint: String, depth: usize },

    /// Template could not be built from the given input
    #[error("Invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl FixtureError {
    /// Shorthand for a persistence failure
    pub fn persistence(collection: impl Into<String>, message: impl Into<String>) -> Self {
        FixtureError::Persistence {
            collection: collection.into(),
            message: message.into(),
        }
    }
}

/// Conversion from FixtureError to FxError
impl From<FixtureError> for FxError {
    fn from(err: FixtureError) -> Self {
        FxError::from(&err)
    }
}

impl From<&FixtureError> for FxError {
    fn from(err: &FixtureError) -> Self {
        match err {
            FixtureError::UnknownBlueprint { name } => FxError::new(FxErrorKind::NotFound)
                .with_blueprint(name.clone())
                .with_message("Blueprint is not defined"),

            FixtureError::Computation {
                blueprint,
                path,
                source,
            } => FxError::new(FxErrorKind::Computation)
                .with_blueprint(blueprint.clone())
                .with_path(path.clone())
                .with_message(source.to_string()),

            FixtureError::Persistence {
                collection,
                message,
            } => FxError::new(FxErrorKind::Persistence)
                .with_message(format!("{}: {}", collection, message)),

            FixtureError::ReferenceDepthExceeded { blueprint, depth } => {
                FxError::new(FxErrorKind::DepthExceeded)
                    .with_blueprint(blueprint.clone())
                    .with_message(format!("Reference depth {} exceeded", depth))
            }

            FixtureError::InvalidTemplate { reason } => {
                FxError::new(FxErrorKind::InvalidInput).with_message(reason.clone())
            }

            FixtureError::Serialization { message } => {
                FxError::new(FxErrorKind::Serialization).with_message(message.clone())
            }
        }
    }
}

/// Conversion from serde_json::Error to FixtureError
impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        FixtureError::Serialization {
            message: err.to_string(),
        }
    }
}
