//! Evolutionary encoding for timetabling.
//!
//! # Encoding
//!
//! An individual is a flat vector of genes laid out by the canonical
//! [`SessionPlan`]: one contiguous block per (course, group, component)
//! requirement. A gene binds one required session occurrence to an
//! (instructor, room, quantum) triple. Identity fields never move or
//! mutate, so every individual in a run shares the same shape and the
//! operators need no repair step.
//!
//! # Submodules
//!
//! - [`chromosome`]: gene layout, session plan, decoding
//! - [`seeding`]: conflict-avoiding initial population
//! - [`operators`]: block crossover and targeted mutation

pub mod chromosome;
pub mod operators;
pub mod seeding;

pub use chromosome::{
    Chromosome, DecodeError, Gene, RequirementBlock, Session, SessionPlan, UNASSIGNED,
};
pub use operators::{block_crossover, targeted_mutation};
pub use seeding::{ConflictTracker, Seeder};
