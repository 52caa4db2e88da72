//! University course timetabling for the U-Engine ecosystem.
//!
//! Solves the UCTP: assign every required course session to an
//! (instructor, room, quantum) triple so that hard constraints are
//! satisfied and soft penalties are minimized. The search is an elitist
//! NSGA-II over a two-objective fitness (hard-violation count, weighted
//! soft penalty) with conflict-avoiding seeding, block crossover, and
//! targeted gene mutation.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `Group`, `Instructor`,
//!   `Room`, `QuantumCalendar`, `SchedulingContext`
//! - **`validation`**: Input integrity checks producing a pass /
//!   pass-with-warnings / fail verdict
//! - **`config`**: Engine configuration and constraint weights
//! - **`ga`**: Chromosome encoding, seeding, variation operators
//! - **`evaluator`**: Hard and soft constraint scoring
//! - **`nsga`**: Non-dominated sorting, crowding, the generational loop
//! - **`kpi`**: Summary indicators for finished timetables
//!
//! # Quick Start
//!
//! ```no_run
//! use u_timetable::config::EngineConfig;
//! use u_timetable::models::{Course, Group, Instructor, QuantumCalendar, Room, SchedulingContext};
//! use u_timetable::nsga::EvolutionEngine;
//! use u_timetable::validation::validate_input;
//!
//! let courses = vec![Course::new("algo")
//!     .with_theory_quanta(3.0)
//!     .with_practical_quanta(2.0)
//!     .with_practical_feature("lab")
//!     .with_instructor("turing")
//!     .with_group("cs-2")];
//! let groups = vec![Group::new("cs-2").with_headcount(28)];
//! let instructors = vec![Instructor::new("turing")];
//! let rooms = vec![Room::new("a-101").with_capacity(40), Room::new("lab-1").with_feature("lab")];
//! let calendar = QuantumCalendar::new(5, 6);
//!
//! let report = validate_input(&courses, &groups, &instructors, &rooms, &calendar);
//! assert!(report.is_runnable(), "{:?}", report.errors);
//!
//! let ctx = SchedulingContext::build(courses, groups, instructors, rooms, calendar)?;
//! let engine = EvolutionEngine::new(&ctx, EngineConfig::default().with_seed(42))?;
//! let result = engine.run()?;
//! println!("hard={} soft={}", result.best_fitness.hard, result.best_fitness.soft);
//! # Ok::<(), u_timetable::error::EngineError>(())
//! ```
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II"
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod config;
pub mod error;
pub mod evaluator;
pub mod ga;
pub mod kpi;
pub mod models;
pub mod nsga;
pub mod validation;

pub use config::{EngineConfig, SoftWeights, WorkerCount};
pub use error::EngineError;
pub use evaluator::{Fitness, HardConstraint, SoftConstraint};
pub use models::{
    ComponentKind, Course, Group, Instructor, QuantumCalendar, Room, SchedulingContext,
};
pub use nsga::{CancelToken, EvolutionEngine, RunResult, SessionAssignment, TerminationReason};
pub use validation::{validate_input, ValidationReport, Verdict};
