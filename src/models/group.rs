//! Student group model.

use serde::{Deserialize, Serialize};

/// A student group (cohort) attending courses together.
///
/// A group occupies at most one session per time quantum; this is the
/// primary hard constraint the evaluator enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Number of students in the group.
    pub headcount: i32,
    /// IDs of courses this group is enrolled in.
    pub course_ids: Vec<String>,
}

impl Group {
    /// Creates a new group with headcount 1.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            headcount: 1,
            course_ids: Vec::new(),
        }
    }

    /// Sets the group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the headcount.
    pub fn with_headcount(mut self, headcount: i32) -> Self {
        self.headcount = headcount;
        self
    }

    /// Adds an enrolled course.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_ids.push(course_id.into());
        self
    }

    /// Whether the group is enrolled in a course.
    pub fn is_enrolled_in(&self, course_id: &str) -> bool {
        self.course_ids.iter().any(|c| c == course_id)
    }
}
