//! Timetabling domain models.
//!
//! Core data types for the university course timetabling problem:
//! courses with theory/practical components, student groups, instructors
//! with availability masks, rooms with feature sets, the quantum-time
//! calendar, and the immutable [`SchedulingContext`] that bundles them
//! with precomputed adjacency indexes.

mod calendar;
mod context;
mod course;
mod group;
mod instructor;
mod room;

pub use calendar::QuantumCalendar;
pub use context::SchedulingContext;
pub use course::{ComponentKind, Course};
pub use group::Group;
pub use instructor::Instructor;
pub use room::Room;
