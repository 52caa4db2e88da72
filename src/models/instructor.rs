//! Instructor model.

use serde::{Deserialize, Serialize};

/// An instructor qualified for a set of courses.
///
/// The availability mask lists the time quanta the instructor can teach.
/// An absent mask means every quantum on the calendar; a present but empty
/// mask is rejected by input validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// IDs of courses this instructor is qualified to teach.
    pub course_ids: Vec<String>,
    /// Teachable quantum ids. `None` = every quantum.
    pub availability: Option<Vec<u32>>,
}

impl Instructor {
    /// Creates a new instructor with unrestricted availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            course_ids: Vec::new(),
            availability: None,
        }
    }

    /// Sets the instructor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualified course.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_ids.push(course_id.into());
        self
    }

    /// Restricts availability to the given quantum ids.
    pub fn with_availability(mut self, quanta: Vec<u32>) -> Self {
        self.availability = Some(quanta);
        self
    }

    /// Whether this instructor is qualified for a course.
    pub fn is_qualified_for(&self, course_id: &str) -> bool {
        self.course_ids.iter().any(|c| c == course_id)
    }

    /// Checks availability at a given quantum.
    ///
    /// Returns `true` if no mask is set (always available) or if the
    /// mask contains the quantum.
    pub fn is_available_at(&self, quantum: u32) -> bool {
        match &self.availability {
            None => true,
            Some(mask) => mask.contains(&quantum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_builder() {
        let i = Instructor::new("I1")
            .with_name("Dr. Ada")
            .with_course("C1")
            .with_course("C2");

        assert_eq!(i.id, "I1");
        assert!(i.is_qualified_for("C1"));
        assert!(!i.is_qualified_for("C3"));
    }

    #[test]
    fn test_availability_no_mask() {
        let i = Instructor::new("I1");
        assert!(i.is_available_at(0));
        assert!(i.is_available_at(999));
    }

    #[test]
    fn test_availability_with_mask() {
        let i = Instructor::new("I1").with_availability(vec![0, 1, 5]);
        assert!(i.is_available_at(0));
        assert!(i.is_available_at(5));
        assert!(!i.is_available_at(2));
    }
}
