//! Core types shared across fixturex facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities of the fixture engine:
//!
//! - **Correlation types**: ResolutionId, Mode
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{Mode, ResolutionId};
