//! Error types.
//!
//! Constraint violations are not errors: they are rejection signals
//! consumed by the perturbers. The enums here cover the failures that
//! end a run before or during the search.

use thiserror::Error;

/// A malformed program or schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("section {section} references unknown property {property}")]
    UnknownProperty { section: String, property: usize },

    #[error("room {room} references unknown property {property}")]
    UnknownRoomProperty { room: String, property: usize },

    #[error("section {section} references unknown teacher {teacher}")]
    UnknownTeacher { section: String, teacher: usize },

    #[error("section {section} prefers unknown time block {block}")]
    UnknownPreferredBlock { section: String, block: usize },

    #[error("section {section} has zero duration")]
    ZeroDuration { section: String },

    #[error("assignment references unknown section {0}")]
    UnknownSection(usize),

    #[error("assignment references unknown room {0}")]
    UnknownRoom(usize),

    #[error("assignment references unknown time block {0}")]
    UnknownTimeBlock(usize),

    #[error("initial schedule was built for a different program")]
    ProgramMismatch,
}

/// An optimizer configuration that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("no {kind} registered for selector {tag}")]
    UnknownSelector { kind: &'static str, tag: String },

    #[error("{0} strategy list must not be empty")]
    EmptyStrategy(&'static str),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// A failed optimization run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("sub-optimizer {trajectory} failed in round {round}: {message}")]
    SubOptimizer {
        round: usize,
        trajectory: usize,
        message: String,
    },
}
