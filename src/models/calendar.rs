//! Quantum-time calendar.
//!
//! Time is discretized into *quanta*, the smallest indivisible teaching
//! unit. The calendar is a fixed grid of `days × slots_per_day` quanta,
//! numbered row-major: quantum `q` lies on day `q / slots_per_day` at
//! slot `q % slots_per_day`.
//!
//! Quantum ids are stable for the lifetime of a run; every other module
//! refers to time only through them.

use serde::{Deserialize, Serialize};

/// A fixed weekly grid of time quanta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumCalendar {
    /// Number of teaching days.
    pub days: u32,
    /// Number of slots per day.
    pub slots_per_day: u32,
}

impl QuantumCalendar {
    /// Creates a calendar with the given grid dimensions.
    pub fn new(days: u32, slots_per_day: u32) -> Self {
        Self { days, slots_per_day }
    }

    /// Total number of quanta on the calendar.
    #[inline]
    pub fn quantum_count(&self) -> u32 {
        self.days * self.slots_per_day
    }

    /// All quantum ids in ascending order.
    pub fn all_quanta(&self) -> Vec<u32> {
        (0..self.quantum_count()).collect()
    }

    /// Whether a quantum id is on this calendar.
    #[inline]
    pub fn contains(&self, quantum: u32) -> bool {
        quantum < self.quantum_count()
    }

    /// Day index of a quantum.
    #[inline]
    pub fn day_of(&self, quantum: u32) -> u32 {
        quantum / self.slots_per_day
    }

    /// Slot index of a quantum within its day.
    #[inline]
    pub fn slot_of(&self, quantum: u32) -> u32 {
        quantum % self.slots_per_day
    }

    /// Whether two quanta fall on the same day.
    #[inline]
    pub fn same_day(&self, q1: u32, q2: u32) -> bool {
        self.day_of(q1) == self.day_of(q2)
    }

    /// Whether two quanta are consecutive slots on the same day.
    pub fn adjacent(&self, q1: u32, q2: u32) -> bool {
        self.same_day(q1, q2) && q1.abs_diff(q2) == 1
    }

    /// Whether a quantum is the first slot of its day.
    #[inline]
    pub fn is_first_slot(&self, quantum: u32) -> bool {
        self.slot_of(quantum) == 0
    }

    /// Whether a quantum is the last slot of its day.
    #[inline]
    pub fn is_last_slot(&self, quantum: u32) -> bool {
        self.slot_of(quantum) + 1 == self.slots_per_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let cal = QuantumCalendar::new(5, 6);
        assert_eq!(cal.quantum_count(), 30);
        assert_eq!(cal.all_quanta().len(), 30);

        // Quantum 7 = day 1, slot 1
        assert_eq!(cal.day_of(7), 1);
        assert_eq!(cal.slot_of(7), 1);
        assert!(cal.contains(29));
        assert!(!cal.contains(30));
    }

    #[test]
    fn test_same_day() {
        let cal = QuantumCalendar::new(5, 6);
        assert!(cal.same_day(0, 5)); // both day 0
        assert!(!cal.same_day(5, 6)); // last slot of day 0 vs first of day 1
    }

    #[test]
    fn test_adjacent() {
        let cal = QuantumCalendar::new(5, 6);
        assert!(cal.adjacent(2, 3));
        assert!(cal.adjacent(3, 2)); // symmetric
        assert!(!cal.adjacent(2, 4)); // gap
        assert!(!cal.adjacent(5, 6)); // day boundary
        assert!(!cal.adjacent(3, 3)); // same quantum
    }

    #[test]
    fn test_day_edges() {
        let cal = QuantumCalendar::new(2, 4);
        assert!(cal.is_first_slot(0));
        assert!(cal.is_first_slot(4));
        assert!(cal.is_last_slot(3));
        assert!(cal.is_last_slot(7));
        assert!(!cal.is_first_slot(1));
        assert!(!cal.is_last_slot(5));
    }

    #[test]
    fn test_single_day() {
        let cal = QuantumCalendar::new(1, 5);
        assert_eq!(cal.quantum_count(), 5);
        assert!(cal.same_day(0, 4));
        assert!(cal.is_first_slot(0));
        assert!(cal.is_last_slot(4));
    }
}
