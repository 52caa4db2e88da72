//! Engine error types.
//!
//! Fatal conditions surface as [`EngineError`] from the public entry
//! points; recoverable conditions (a single offspring failing to
//! evaluate, cooperative cancellation) never cross the engine boundary
//! as errors.

use thiserror::Error;

use crate::validation::ValidationIssue;

/// Fatal engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input data is unusable (pre-run).
    #[error(transparent)]
    Input(#[from] InputError),

    /// Configuration is unusable (pre-run).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operator produced a malformed individual (in-run bug).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The evaluation worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Pre-run input failure.
#[derive(Debug, Error)]
pub enum InputError {
    /// A cross-reference points at a missing entity.
    #[error("unknown {entity} reference '{id}'")]
    UnknownReference {
        /// Entity table the reference targets.
        entity: &'static str,
        /// The dangling id.
        id: String,
    },

    /// A session-producing course has no qualified instructor.
    #[error("course '{0}' has no qualified instructors")]
    NoQualifiedInstructor(String),

    /// A session-producing course has no candidate room.
    #[error("course '{0}' has no candidate rooms")]
    NoCandidateRoom(String),

    /// The validation collaborator reported a failing verdict.
    #[error("input validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<ValidationIssue>),
}

/// Pre-run configuration failure.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Population size below the minimum of 2.
    #[error("population_size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),

    /// Generation count below 1.
    #[error("generations must be at least 1")]
    NoGenerations,

    /// A probability outside [0, 1].
    #[error("{name} must be within [0, 1] (got {value})")]
    ProbabilityOutOfRange {
        /// Which probability field.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Seeding retry budget below 1.
    #[error("seeding_max_tries must be at least 1")]
    NoSeedingTries,

    /// Fixed worker count of zero.
    #[error("worker_count must be at least 1")]
    NoWorkers,

    /// A constraint name that matches no known constraint.
    #[error("unknown constraint name '{0}'")]
    UnknownConstraint(String),

    /// A negative soft-constraint weight.
    #[error("weight for '{name}' must be non-negative (got {value})")]
    NegativeWeight {
        /// Constraint name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}
