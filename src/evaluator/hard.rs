//! Hard-constraint counting.
//!
//! Each function returns an integer violation count over a decoded
//! session list. Conflict constraints count *pairs*: k sessions sharing
//! a resource on one quantum contribute k·(k−1)/2.

use std::collections::HashMap;

use crate::ga::chromosome::{Session, SessionPlan};
use crate::models::{ComponentKind, SchedulingContext};

/// Pairs of sessions sharing a group and a quantum.
pub(super) fn group_conflicts(sessions: &[Session]) -> u64 {
    colliding_pairs(sessions.iter().map(|s| (s.group, s.quantum)))
}

/// Pairs of sessions sharing an instructor and a quantum.
pub(super) fn instructor_conflicts(sessions: &[Session]) -> u64 {
    colliding_pairs(sessions.iter().map(|s| (s.instructor, s.quantum)))
}

fn colliding_pairs(keys: impl Iterator<Item = (u32, u32)>) -> u64 {
    let mut occupancy: HashMap<(u32, u32), u64> = HashMap::new();
    for key in keys {
        *occupancy.entry(key).or_insert(0) += 1;
    }
    occupancy.values().map(|&k| k * (k - 1) / 2).sum()
}

/// Sessions whose instructor is not qualified for the course.
pub(super) fn unqualified_sessions(sessions: &[Session], ctx: &SchedulingContext) -> u64 {
    sessions
        .iter()
        .filter(|s| {
            ctx.qualified_instructors(s.course)
                .binary_search(&s.instructor)
                .is_err()
        })
        .count() as u64
}

/// Practical sessions in rooms lacking the course's required features.
pub(super) fn room_feature_mismatches(sessions: &[Session], ctx: &SchedulingContext) -> u64 {
    sessions
        .iter()
        .filter(|s| {
            s.kind == ComponentKind::Practical
                && !ctx
                    .room(s.room)
                    .supports_all(&ctx.course(s.course).practical_features)
        })
        .count() as u64
}

/// Sessions scheduled outside the instructor's availability mask.
pub(super) fn availability_violations(sessions: &[Session], ctx: &SchedulingContext) -> u64 {
    sessions
        .iter()
        .filter(|s| !ctx.is_instructor_available(s.instructor, s.quantum))
        .count() as u64
}

/// Requirement blocks whose session count differs from the plan.
///
/// Zero by construction under the shape invariant; counted anyway to
/// catch operator bugs. Session groups with no plan entry count too.
pub(super) fn session_count_drift(sessions: &[Session], plan: &SessionPlan) -> u64 {
    let mut actual: HashMap<(u32, u32, ComponentKind), u64> = HashMap::new();
    for s in sessions {
        *actual.entry((s.course, s.group, s.kind)).or_insert(0) += 1;
    }

    let mut drift = 0u64;
    for block in plan.blocks() {
        let got = actual
            .remove(&(block.course, block.group, block.kind))
            .unwrap_or(0);
        if got != block.len as u64 {
            drift += 1;
        }
    }
    // Anything left over belongs to no requirement at all.
    drift + actual.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Group, Instructor, QuantumCalendar, Room};

    fn session(group: u32, instructor: u32, quantum: u32) -> Session {
        Session {
            course: 0,
            group,
            instructor,
            room: 0,
            quantum,
            kind: ComponentKind::Theory,
        }
    }

    #[test]
    fn test_colliding_pairs_counts_combinations() {
        // Three sessions of one group on the same quantum = 3 pairs.
        let sessions = vec![session(0, 0, 4), session(0, 1, 4), session(0, 2, 4)];
        assert_eq!(group_conflicts(&sessions), 3);

        // Two separate collisions = 2 pairs.
        let sessions = vec![
            session(0, 0, 1),
            session(0, 1, 1),
            session(1, 2, 2),
            session(1, 3, 2),
        ];
        assert_eq!(group_conflicts(&sessions), 2);
    }

    #[test]
    fn test_no_conflicts() {
        let sessions = vec![session(0, 0, 0), session(0, 0, 1), session(1, 1, 0)];
        assert_eq!(group_conflicts(&sessions), 0);
        assert_eq!(instructor_conflicts(&sessions), 0);
    }

    #[test]
    fn test_instructor_conflicts_cross_group() {
        // Same instructor, different groups, same quantum.
        let sessions = vec![session(0, 0, 3), session(1, 0, 3)];
        assert_eq!(instructor_conflicts(&sessions), 1);
        assert_eq!(group_conflicts(&sessions), 0);
    }

    #[test]
    fn test_session_count_drift() {
        let courses = vec![Course::new("C1")
            .with_theory_quanta(2.0)
            .with_instructor("I1")
            .with_group("G1")];
        let ctx = SchedulingContext::build(
            courses,
            vec![Group::new("G1")],
            vec![Instructor::new("I1")],
            vec![Room::new("R1")],
            QuantumCalendar::new(1, 6),
        )
        .unwrap();
        let plan = SessionPlan::build(&ctx);

        // Exact count: no drift.
        let ok = vec![session(0, 0, 0), session(0, 0, 1)];
        assert_eq!(session_count_drift(&ok, &plan), 0);

        // One session missing: the block drifts.
        let short = vec![session(0, 0, 0)];
        assert_eq!(session_count_drift(&short, &plan), 1);

        // An alien (course, group, kind) triple: block drift is 0 but the
        // extra group counts.
        let mut alien = ok.clone();
        alien.push(Session {
            course: 0,
            group: 0,
            instructor: 0,
            room: 0,
            quantum: 2,
            kind: ComponentKind::Practical,
        });
        assert_eq!(session_count_drift(&alien, &plan), 1);
    }
}
