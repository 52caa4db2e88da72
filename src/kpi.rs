//! Timetable quality indicators.
//!
//! Computes summary statistics over a finished schedule for reporting.
//! Not used by the search itself.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Session count | Number of scheduled sessions |
//! | Room utilization | Sessions in a room / calendar quanta |
//! | Instructor load | Sessions taught per instructor |
//! | Sessions per day | Histogram over calendar days |
//! | Group gap total | Idle slots inside group teaching days |

use std::collections::HashMap;

use crate::models::SchedulingContext;
use crate::nsga::SessionAssignment;

/// Summary indicators for a decoded timetable.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Total scheduled sessions.
    pub session_count: usize,
    /// Per-room utilization (sessions / quantum count).
    pub utilization_by_room: HashMap<String, f64>,
    /// Sessions taught per instructor.
    pub load_by_instructor: HashMap<String, usize>,
    /// Sessions per calendar day.
    pub sessions_by_day: HashMap<u32, usize>,
    /// The day carrying the most sessions.
    pub busiest_day: Option<u32>,
    /// Total idle slots between groups' first and last daily sessions.
    pub group_gap_total: u64,
}

impl TimetableKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(sessions: &[SessionAssignment], ctx: &SchedulingContext) -> Self {
        let quanta = ctx.calendar().quantum_count().max(1) as f64;

        let mut room_sessions: HashMap<String, usize> = HashMap::new();
        let mut load_by_instructor: HashMap<String, usize> = HashMap::new();
        let mut sessions_by_day: HashMap<u32, usize> = HashMap::new();
        let mut group_day_slots: HashMap<(String, u32), Vec<u32>> = HashMap::new();

        for s in sessions {
            *room_sessions.entry(s.room_id.clone()).or_insert(0) += 1;
            *load_by_instructor.entry(s.instructor_id.clone()).or_insert(0) += 1;
            *sessions_by_day.entry(s.day).or_insert(0) += 1;
            let slots = group_day_slots
                .entry((s.group_id.clone(), s.day))
                .or_default();
            if !slots.contains(&s.slot) {
                slots.push(s.slot);
            }
        }

        let group_gap_total = group_day_slots
            .values()
            .map(|slots| {
                let span = slots.iter().max().unwrap() - slots.iter().min().unwrap() + 1;
                span as u64 - slots.len() as u64
            })
            .sum();

        let busiest_day = sessions_by_day
            .iter()
            .max_by_key(|&(day, count)| (*count, std::cmp::Reverse(*day)))
            .map(|(day, _)| *day);

        Self {
            session_count: sessions.len(),
            utilization_by_room: room_sessions
                .into_iter()
                .map(|(room, count)| (room, count as f64 / quanta))
                .collect(),
            load_by_instructor,
            sessions_by_day,
            busiest_day,
            group_gap_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentKind, Course, Group, Instructor, QuantumCalendar, Room};

    fn sample_context() -> SchedulingContext {
        SchedulingContext::build(
            vec![Course::new("C1")
                .with_theory_quanta(3.0)
                .with_instructor("I1")
                .with_group("G1")],
            vec![Group::new("G1")],
            vec![Instructor::new("I1")],
            vec![Room::new("R1"), Room::new("R2")],
            QuantumCalendar::new(2, 5),
        )
        .unwrap()
    }

    fn assignment(room: &str, day: u32, slot: u32) -> SessionAssignment {
        SessionAssignment {
            course_id: "C1".into(),
            group_id: "G1".into(),
            instructor_id: "I1".into(),
            room_id: room.into(),
            quantum: day * 5 + slot,
            day,
            slot,
            kind: ComponentKind::Theory,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let ctx = sample_context();
        let sessions = vec![
            assignment("R1", 0, 0),
            assignment("R1", 0, 1),
            assignment("R2", 1, 2),
        ];
        let kpi = TimetableKpi::calculate(&sessions, &ctx);

        assert_eq!(kpi.session_count, 3);
        assert_eq!(kpi.load_by_instructor["I1"], 3);
        assert_eq!(kpi.sessions_by_day[&0], 2);
        assert_eq!(kpi.sessions_by_day[&1], 1);
        assert_eq!(kpi.busiest_day, Some(0));
        assert!((kpi.utilization_by_room["R1"] - 0.2).abs() < 1e-10); // 2/10
        assert_eq!(kpi.group_gap_total, 0);
    }

    #[test]
    fn test_kpi_counts_gaps() {
        let ctx = sample_context();
        // Slots 0 and 3 on day 0: two idle slots between them.
        let sessions = vec![assignment("R1", 0, 0), assignment("R1", 0, 3)];
        let kpi = TimetableKpi::calculate(&sessions, &ctx);
        assert_eq!(kpi.group_gap_total, 2);
    }

    #[test]
    fn test_kpi_empty_schedule() {
        let ctx = sample_context();
        let kpi = TimetableKpi::calculate(&[], &ctx);
        assert_eq!(kpi.session_count, 0);
        assert_eq!(kpi.busiest_day, None);
        assert_eq!(kpi.group_gap_total, 0);
        assert!(kpi.utilization_by_room.is_empty());
    }
}
