//! Soft-constraint scoring.
//!
//! Each function returns a non-negative raw score; the evaluator applies
//! the configured weights. All scores are per-day measures summed over
//! the week.

use std::collections::HashMap;

use crate::ga::chromosome::Session;
use crate::models::{ComponentKind, QuantumCalendar};

/// Idle gaps inside group teaching days: for each (group, day), the
/// number of unused slots between the group's earliest and latest
/// occupied slot.
pub(super) fn group_gaps(sessions: &[Session], calendar: &QuantumCalendar) -> f64 {
    day_gaps(sessions.iter().map(|s| (s.group, s.quantum)), calendar)
}

/// Idle gaps inside instructor teaching days.
pub(super) fn instructor_gaps(sessions: &[Session], calendar: &QuantumCalendar) -> f64 {
    day_gaps(sessions.iter().map(|s| (s.instructor, s.quantum)), calendar)
}

fn day_gaps(keys: impl Iterator<Item = (u32, u32)>, calendar: &QuantumCalendar) -> f64 {
    let by_day = slots_by_entity_day(keys, calendar);
    let mut gaps = 0u64;
    for slots in by_day.values() {
        let span = slots.iter().max().unwrap() - slots.iter().min().unwrap() + 1;
        gaps += (span as usize - slots.len()) as u64;
    }
    gaps as f64
}

/// Groups teaching straight through the designated midday slot: one
/// penalty per (group, day) with sessions on both sides of the slot and
/// the slot itself occupied.
pub(super) fn midday_straddles(
    sessions: &[Session],
    calendar: &QuantumCalendar,
    midday_slot: u32,
) -> f64 {
    let by_day = slots_by_entity_day(sessions.iter().map(|s| (s.group, s.quantum)), calendar);
    let mut straddles = 0u64;
    for slots in by_day.values() {
        let before = slots.iter().any(|&s| s < midday_slot);
        let after = slots.iter().any(|&s| s > midday_slot);
        let through = slots.contains(&midday_slot);
        if before && after && through {
            straddles += 1;
        }
    }
    straddles as f64
}

/// Fragmentation of requirement blocks: for each (course, group, kind),
/// the number of its sessions minus its longest same-day run of
/// consecutive slots.
pub(super) fn block_fragmentation(sessions: &[Session], calendar: &QuantumCalendar) -> f64 {
    let mut by_block: HashMap<(u32, u32, ComponentKind), Vec<u32>> = HashMap::new();
    for s in sessions {
        by_block
            .entry((s.course, s.group, s.kind))
            .or_default()
            .push(s.quantum);
    }

    let mut fragmentation = 0u64;
    for quanta in by_block.values() {
        let total = quanta.len() as u64;
        let mut by_day: HashMap<u32, Vec<u32>> = HashMap::new();
        for &q in quanta {
            by_day.entry(calendar.day_of(q)).or_default().push(calendar.slot_of(q));
        }
        let best_run = by_day
            .values_mut()
            .map(|slots| {
                slots.sort_unstable();
                slots.dedup();
                longest_run(slots)
            })
            .max()
            .unwrap_or(0);
        fragmentation += total.saturating_sub(best_run);
    }
    fragmentation as f64
}

/// Sessions in the first or last slot of their day, one penalty each.
pub(super) fn edge_slot_sessions(sessions: &[Session], calendar: &QuantumCalendar) -> f64 {
    sessions
        .iter()
        .filter(|s| calendar.is_first_slot(s.quantum) || calendar.is_last_slot(s.quantum))
        .count() as f64
}

/// Distinct occupied slots per (entity, day).
fn slots_by_entity_day(
    keys: impl Iterator<Item = (u32, u32)>,
    calendar: &QuantumCalendar,
) -> HashMap<(u32, u32), Vec<u32>> {
    let mut by_day: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
    for (entity, quantum) in keys {
        let slots = by_day.entry((entity, calendar.day_of(quantum))).or_default();
        let slot = calendar.slot_of(quantum);
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    by_day
}

/// Longest run of consecutive values in a sorted, deduplicated slice.
fn longest_run(slots: &[u32]) -> u64 {
    let mut best = 0u64;
    let mut run = 0u64;
    let mut prev: Option<u32> = None;
    for &s in slots {
        run = match prev {
            Some(p) if s == p + 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(s);
    }
    best
}
