//! NSGA-II search engine.
//!
//! Elitist multi-objective evolution over the (hard, soft) fitness pair:
//! binary tournament on rank and crowding, block crossover and targeted
//! mutation, parent+offspring combination, and front-wise survival with
//! crowding-distance truncation.
//!
//! # Submodules
//!
//! - [`sorting`]: fast non-dominated sort and crowding distance
//! - [`engine`]: the generational loop and run results
//! - [`metrics`]: per-generation quality snapshots

pub mod engine;
pub mod metrics;
pub mod sorting;

pub use engine::{
    CancelToken, EvolutionEngine, ParetoEntry, RunResult, SessionAssignment, TerminationReason,
};
pub use metrics::GenerationMetrics;
pub use sorting::{crowding_distance, fast_non_dominated_sort, rank_and_crowding};
