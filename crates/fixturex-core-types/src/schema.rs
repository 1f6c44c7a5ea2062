//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RESOLUTION_ID: &str = "resolution_id";

// Entity identifiers
pub const FIELD_BLUEPRINT: &str = "blueprint";
pub const FIELD_MODE: &str = "mode";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_COLLECTION: &str = "collection";
pub const FIELD_PATH: &str = "path";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_BUILD: &str = "build";
pub const OP_CREATE: &str = "create";
pub const OP_TREE: &str = "tree";
