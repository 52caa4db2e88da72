//! Course model.
//!
//! A course is the unit of teaching demand. It carries a weekly quota of
//! time quanta for its theory component and, optionally, for a practical
//! component that needs specially equipped rooms.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Ch. 2

use serde::{Deserialize, Serialize};

/// Which part of a course a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Lecture component. Any room is a candidate.
    Theory,
    /// Lab/exercise component. Only rooms with the required features qualify.
    Practical,
}

/// A course to be timetabled.
///
/// Weekly quotas are expressed in time quanta per week and may be
/// fractional; fractional quotas are rounded up once when the session
/// plan is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Display code (e.g. "CS-201").
    pub code: String,
    /// Theory quanta per week.
    pub theory_qpw: f64,
    /// Practical quanta per week. Zero = no practical component.
    pub practical_qpw: f64,
    /// Room features required by practical sessions (e.g. "lab").
    pub practical_features: Vec<String>,
    /// IDs of instructors qualified to teach this course.
    pub instructor_ids: Vec<String>,
    /// IDs of groups enrolled in this course.
    pub group_ids: Vec<String>,
}

impl Course {
    /// Creates a new course with zero quotas.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            theory_qpw: 0.0,
            practical_qpw: 0.0,
            practical_features: Vec::new(),
            instructor_ids: Vec::new(),
            group_ids: Vec::new(),
        }
    }

    /// Sets the display code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the theory quota (quanta per week).
    pub fn with_theory_quanta(mut self, qpw: f64) -> Self {
        self.theory_qpw = qpw;
        self
    }

    /// Sets the practical quota (quanta per week).
    pub fn with_practical_quanta(mut self, qpw: f64) -> Self {
        self.practical_qpw = qpw;
        self
    }

    /// Adds a required room feature for practical sessions.
    pub fn with_practical_feature(mut self, feature: impl Into<String>) -> Self {
        self.practical_features.push(feature.into());
        self
    }

    /// Adds a qualified instructor.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.instructor_ids.push(instructor_id.into());
        self
    }

    /// Adds an enrolled group.
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    /// Whether the course has a practical component.
    #[inline]
    pub fn has_practical(&self) -> bool {
        self.practical_qpw > 0.0
    }

    /// Weekly quota for a component kind.
    #[inline]
    pub fn quota_for(&self, kind: ComponentKind) -> f64 {
        match kind {
            ComponentKind::Theory => self.theory_qpw,
            ComponentKind::Practical => self.practical_qpw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("C1")
            .with_code("CS-201")
            .with_theory_quanta(3.0)
            .with_practical_quanta(1.5)
            .with_practical_feature("lab")
            .with_instructor("I1")
            .with_group("G1")
            .with_group("G2");

        assert_eq!(c.id, "C1");
        assert_eq!(c.code, "CS-201");
        assert!(c.has_practical());
        assert_eq!(c.quota_for(ComponentKind::Theory), 3.0);
        assert_eq!(c.quota_for(ComponentKind::Practical), 1.5);
        assert_eq!(c.group_ids.len(), 2);
    }

    #[test]
    fn test_course_no_practical() {
        let c = Course::new("C2").with_theory_quanta(2.0);
        assert!(!c.has_practical());
        assert_eq!(c.quota_for(ComponentKind::Practical), 0.0);
    }

    #[test]
    fn test_course_serde_roundtrip() {
        let c = Course::new("C1").with_theory_quanta(2.0).with_instructor("I1");
        let json = serde_json::to_string(&c).unwrap();
        let back: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "C1");
        assert_eq!(back.instructor_ids, vec!["I1"]);
    }
}
