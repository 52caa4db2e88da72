//! Constraint evaluation.
//!
//! Scores a decoded individual on two objectives:
//!
//! 1. **hard** — the number of hard-constraint violations (conflicts,
//!    qualification, room features, availability, block counts);
//! 2. **soft** — a weighted sum of schedule-quality penalties
//!    (compactness, midday breaks, coalescence, early/late sessions).
//!
//! Lower is better on both axes. Room double-booking and room capacity
//! are deliberately not counted.
//!
//! The evaluator also returns a per-constraint breakdown for metrics;
//! the engine itself only reads the aggregate pair.

mod hard;
mod soft;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::ga::chromosome::{Session, SessionPlan};
use crate::models::SchedulingContext;

/// The two-objective fitness pair. Lower is better on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Total hard-constraint violations.
    pub hard: u64,
    /// Weighted soft penalty.
    pub soft: f64,
}

impl Fitness {
    /// The fitness assigned to individuals that failed evaluation.
    pub const WORST: Fitness = Fitness {
        hard: u64::MAX,
        soft: f64::INFINITY,
    };

    /// Pareto dominance: no worse on both axes, strictly better on one.
    pub fn dominates(&self, other: &Fitness) -> bool {
        self.hard <= other.hard
            && self.soft <= other.soft
            && (self.hard < other.hard || self.soft < other.soft)
    }

    /// Whether every hard constraint is satisfied.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }
}

/// Hard constraint kinds. Each counts violations as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardConstraint {
    /// A group scheduled twice on one quantum (counted per pair).
    GroupConflict,
    /// An instructor scheduled twice on one quantum (counted per pair).
    InstructorConflict,
    /// A session taught by an unqualified instructor.
    Qualification,
    /// A practical session in a room lacking required features.
    RoomFeature,
    /// A session outside the instructor's availability mask.
    Availability,
    /// A requirement block with the wrong number of sessions.
    SessionCount,
}

impl HardConstraint {
    /// Number of hard constraint kinds.
    pub const COUNT: usize = 6;

    /// All kinds in breakdown-array order.
    pub const ALL: [HardConstraint; Self::COUNT] = [
        HardConstraint::GroupConflict,
        HardConstraint::InstructorConflict,
        HardConstraint::Qualification,
        HardConstraint::RoomFeature,
        HardConstraint::Availability,
        HardConstraint::SessionCount,
    ];

    /// Position in breakdown arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            HardConstraint::GroupConflict => 0,
            HardConstraint::InstructorConflict => 1,
            HardConstraint::Qualification => 2,
            HardConstraint::RoomFeature => 3,
            HardConstraint::Availability => 4,
            HardConstraint::SessionCount => 5,
        }
    }

    /// Stable configuration name.
    pub fn name(self) -> &'static str {
        match self {
            HardConstraint::GroupConflict => "group_conflict",
            HardConstraint::InstructorConflict => "instructor_conflict",
            HardConstraint::Qualification => "qualification",
            HardConstraint::RoomFeature => "room_feature",
            HardConstraint::Availability => "availability",
            HardConstraint::SessionCount => "session_count",
        }
    }

    /// Parses a configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Soft constraint kinds. Each yields a non-negative raw score that is
/// weighted into the soft objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftConstraint {
    /// Idle gaps inside a group's teaching day.
    GroupCompactness,
    /// Idle gaps inside an instructor's teaching day.
    InstructorCompactness,
    /// A group teaching through the designated midday slot.
    MiddayBreak,
    /// A requirement block fragmented across non-contiguous quanta.
    Coalescence,
    /// Sessions in the first or last slot of a day.
    EarlyLate,
}

impl SoftConstraint {
    /// Number of soft constraint kinds.
    pub const COUNT: usize = 5;

    /// All kinds in breakdown-array order.
    pub const ALL: [SoftConstraint; Self::COUNT] = [
        SoftConstraint::GroupCompactness,
        SoftConstraint::InstructorCompactness,
        SoftConstraint::MiddayBreak,
        SoftConstraint::Coalescence,
        SoftConstraint::EarlyLate,
    ];

    /// Position in breakdown arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SoftConstraint::GroupCompactness => 0,
            SoftConstraint::InstructorCompactness => 1,
            SoftConstraint::MiddayBreak => 2,
            SoftConstraint::Coalescence => 3,
            SoftConstraint::EarlyLate => 4,
        }
    }

    /// Stable configuration name.
    pub fn name(self) -> &'static str {
        match self {
            SoftConstraint::GroupCompactness => "group_compactness",
            SoftConstraint::InstructorCompactness => "instructor_compactness",
            SoftConstraint::MiddayBreak => "midday_break",
            SoftConstraint::Coalescence => "coalescence",
            SoftConstraint::EarlyLate => "early_late",
        }
    }

    /// Parses a configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Evaluation result: the aggregate pair plus per-constraint breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The aggregate fitness pair.
    pub fitness: Fitness,
    /// Violation count per hard constraint, indexed by
    /// [`HardConstraint::index`].
    pub hard_counts: [u64; HardConstraint::COUNT],
    /// Raw (unweighted) score per soft constraint, indexed by
    /// [`SoftConstraint::index`].
    pub soft_scores: [f64; SoftConstraint::COUNT],
}

/// Scores decoded session lists against the context.
///
/// Configured once per run; `evaluate` is pure and safe to call from
/// any worker thread.
#[derive(Debug, Clone)]
pub struct ConstraintEvaluator<'a> {
    ctx: &'a SchedulingContext,
    plan: &'a SessionPlan,
    weights: [f64; SoftConstraint::COUNT],
    enabled_hard: [bool; HardConstraint::COUNT],
    enabled_soft: [bool; SoftConstraint::COUNT],
    midday_slot: Option<u32>,
}

impl<'a> ConstraintEvaluator<'a> {
    /// Creates an evaluator from a validated configuration.
    pub fn new(ctx: &'a SchedulingContext, plan: &'a SessionPlan, config: &EngineConfig) -> Self {
        let mut enabled_hard = [false; HardConstraint::COUNT];
        for c in &config.enabled_hard {
            enabled_hard[c.index()] = true;
        }
        let mut enabled_soft = [false; SoftConstraint::COUNT];
        for c in &config.enabled_soft {
            enabled_soft[c.index()] = true;
        }
        Self {
            ctx,
            plan,
            weights: config.soft_weights.as_array(),
            enabled_hard,
            enabled_soft,
            midday_slot: config.midday_slot,
        }
    }

    /// Scores a decoded session list.
    pub fn evaluate(&self, sessions: &[Session]) -> Evaluation {
        let mut hard_counts = [0u64; HardConstraint::COUNT];
        for c in HardConstraint::ALL {
            if !self.enabled_hard[c.index()] {
                continue;
            }
            hard_counts[c.index()] = match c {
                HardConstraint::GroupConflict => hard::group_conflicts(sessions),
                HardConstraint::InstructorConflict => hard::instructor_conflicts(sessions),
                HardConstraint::Qualification => hard::unqualified_sessions(sessions, self.ctx),
                HardConstraint::RoomFeature => hard::room_feature_mismatches(sessions, self.ctx),
                HardConstraint::Availability => hard::availability_violations(sessions, self.ctx),
                HardConstraint::SessionCount => hard::session_count_drift(sessions, self.plan),
            };
        }

        let calendar = self.ctx.calendar();
        let mut soft_scores = [0.0f64; SoftConstraint::COUNT];
        for c in SoftConstraint::ALL {
            // Zero-weight constraints are skipped entirely.
            if !self.enabled_soft[c.index()] || self.weights[c.index()] == 0.0 {
                continue;
            }
            soft_scores[c.index()] = match c {
                SoftConstraint::GroupCompactness => soft::group_gaps(sessions, calendar),
                SoftConstraint::InstructorCompactness => {
                    soft::instructor_gaps(sessions, calendar)
                }
                SoftConstraint::MiddayBreak => match self.midday_slot {
                    Some(slot) => soft::midday_straddles(sessions, calendar, slot),
                    None => 0.0,
                },
                SoftConstraint::Coalescence => soft::block_fragmentation(sessions, calendar),
                SoftConstraint::EarlyLate => soft::edge_slot_sessions(sessions, calendar),
            };
        }

        let hard = hard_counts.iter().sum();
        let soft = soft_scores
            .iter()
            .zip(self.weights.iter())
            .map(|(score, weight)| score * weight)
            .sum();

        Evaluation {
            fitness: Fitness { hard, soft },
            hard_counts,
            soft_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentKind, Course, Group, Instructor, QuantumCalendar, Room};

    fn session(
        course: u32,
        group: u32,
        instructor: u32,
        room: u32,
        quantum: u32,
        kind: ComponentKind,
    ) -> Session {
        Session {
            course,
            group,
            instructor,
            room,
            quantum,
            kind,
        }
    }

    fn lab_context() -> SchedulingContext {
        let courses = vec![
            Course::new("C1")
                .with_theory_quanta(2.0)
                .with_instructor("I1")
                .with_group("G1"),
            Course::new("C2")
                .with_practical_quanta(2.0)
                .with_practical_feature("lab")
                .with_instructor("I2")
                .with_group("G1"),
        ];
        let groups = vec![Group::new("G1").with_headcount(20)];
        let instructors = vec![
            Instructor::new("I1"),
            Instructor::new("I2").with_availability(vec![0, 1, 2, 3]),
        ];
        let rooms = vec![Room::new("R1"), Room::new("R2").with_feature("lab")];
        SchedulingContext::build(courses, groups, instructors, rooms, QuantumCalendar::new(2, 4))
            .unwrap()
    }

    fn evaluator_fixture(
        ctx: &SchedulingContext,
        config: &EngineConfig,
    ) -> (SessionPlan, EngineConfig) {
        (SessionPlan::build(ctx), config.clone())
    }

    #[test]
    fn test_dominance() {
        let a = Fitness { hard: 0, soft: 2.0 };
        let b = Fitness { hard: 1, soft: 1.0 };
        let c = Fitness { hard: 0, soft: 3.0 };

        assert!(!a.dominates(&b)); // trade-off
        assert!(!b.dominates(&a));
        assert!(a.dominates(&c));
        assert!(!c.dominates(&a));
        assert!(!a.dominates(&a)); // equal never dominates
    }

    #[test]
    fn test_worst_never_dominates() {
        let any = Fitness { hard: 5, soft: 100.0 };
        assert!(!Fitness::WORST.dominates(&any));
        assert!(any.dominates(&Fitness::WORST));
        assert!(!Fitness::WORST.dominates(&Fitness::WORST));
    }

    #[test]
    fn test_constraint_names_roundtrip() {
        for c in HardConstraint::ALL {
            assert_eq!(HardConstraint::from_name(c.name()), Some(c));
        }
        for c in SoftConstraint::ALL {
            assert_eq!(SoftConstraint::from_name(c.name()), Some(c));
        }
        assert_eq!(HardConstraint::from_name("bogus"), None);
    }

    #[test]
    fn test_clean_schedule_scores_zero_hard() {
        let ctx = lab_context();
        let config = EngineConfig::default();
        let (plan, config) = evaluator_fixture(&ctx, &config);
        let evaluator = ConstraintEvaluator::new(&ctx, &plan, &config);

        // C1 theory twice (I1, any room), C2 practical twice (I2, lab room),
        // no overlaps, inside I2's availability.
        let sessions = vec![
            session(0, 0, 0, 0, 0, ComponentKind::Theory),
            session(0, 0, 0, 0, 1, ComponentKind::Theory),
            session(1, 0, 1, 1, 2, ComponentKind::Practical),
            session(1, 0, 1, 1, 3, ComponentKind::Practical),
        ];
        let eval = evaluator.evaluate(&sessions);
        assert_eq!(eval.fitness.hard, 0, "{:?}", eval.hard_counts);
        assert!(eval.fitness.is_feasible());
    }

    #[test]
    fn test_aggregate_equals_breakdown_sum() {
        let ctx = lab_context();
        let config = EngineConfig::default();
        let (plan, config) = evaluator_fixture(&ctx, &config);
        let evaluator = ConstraintEvaluator::new(&ctx, &plan, &config);

        // Deliberately broken: group overlap, wrong instructor, wrong room,
        // outside availability.
        let sessions = vec![
            session(0, 0, 1, 0, 5, ComponentKind::Theory), // I2 unqualified + off-mask
            session(0, 0, 0, 0, 5, ComponentKind::Theory), // group overlap at q5
            session(1, 0, 1, 0, 2, ComponentKind::Practical), // plain room for lab course
            session(1, 0, 1, 1, 3, ComponentKind::Practical),
        ];
        let eval = evaluator.evaluate(&sessions);
        assert_eq!(eval.fitness.hard, eval.hard_counts.iter().sum::<u64>());
        assert!(eval.fitness.hard > 0);
        assert_eq!(eval.hard_counts[HardConstraint::GroupConflict.index()], 1);
        assert_eq!(eval.hard_counts[HardConstraint::Qualification.index()], 1);
        assert_eq!(eval.hard_counts[HardConstraint::RoomFeature.index()], 1);
        assert_eq!(eval.hard_counts[HardConstraint::Availability.index()], 1);
    }

    #[test]
    fn test_disabled_constraint_not_counted() {
        let ctx = lab_context();
        let config = EngineConfig::default()
            .without_hard_constraint(HardConstraint::Availability);
        let plan = SessionPlan::build(&ctx);
        let evaluator = ConstraintEvaluator::new(&ctx, &plan, &config);

        let sessions = vec![session(1, 0, 1, 1, 7, ComponentKind::Practical)]; // off-mask
        let eval = evaluator.evaluate(&sessions);
        assert_eq!(eval.hard_counts[HardConstraint::Availability.index()], 0);
    }

    #[test]
    fn test_zero_weight_skips_soft() {
        let ctx = lab_context();
        let mut config = EngineConfig::default();
        config.soft_weights.early_late = 0.0;
        let plan = SessionPlan::build(&ctx);
        let evaluator = ConstraintEvaluator::new(&ctx, &plan, &config);

        let sessions = vec![session(0, 0, 0, 0, 0, ComponentKind::Theory)]; // first slot
        let eval = evaluator.evaluate(&sessions);
        assert_eq!(eval.soft_scores[SoftConstraint::EarlyLate.index()], 0.0);
    }

    #[test]
    fn test_midday_disabled_without_slot() {
        let ctx = lab_context();
        let config = EngineConfig::default(); // midday_slot: None
        let plan = SessionPlan::build(&ctx);
        let evaluator = ConstraintEvaluator::new(&ctx, &plan, &config);

        let sessions = vec![
            session(0, 0, 0, 0, 0, ComponentKind::Theory),
            session(0, 0, 0, 0, 1, ComponentKind::Theory),
            session(0, 0, 0, 0, 2, ComponentKind::Theory),
        ];
        let eval = evaluator.evaluate(&sessions);
        assert_eq!(eval.soft_scores[SoftConstraint::MiddayBreak.index()], 0.0);
    }
}
