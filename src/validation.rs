//! Input validation for timetabling problems.
//!
//! Checks structural integrity of courses, groups, instructors, and rooms
//! before the engine runs. Detects:
//! - Duplicate IDs
//! - Unknown cross-references
//! - Courses that produce sessions but have no qualified instructor or
//!   no candidate room
//! - Non-positive capacities/headcounts, negative quotas
//! - Availability masks that are empty or reference off-calendar quanta
//!
//! All issues are collected; run-blocking ones are reported as errors,
//! the rest as warnings. The engine refuses to start on a `Fail` verdict.

use std::collections::HashSet;

use crate::models::{Course, Group, Instructor, QuantumCalendar, Room};

/// Overall validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No issues found.
    Pass,
    /// Only warnings found; the engine may run.
    PassWithWarnings,
    /// At least one error found; the engine refuses to start.
    Fail,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A reference points at an entity that doesn't exist.
    UnknownReference,
    /// A course produces sessions but no instructor is qualified for it.
    NoQualifiedInstructor,
    /// A course's practical sessions match no room, or no rooms exist.
    NoCandidateRoom,
    /// A group headcount below 1.
    NonPositiveHeadcount,
    /// A room capacity below 1.
    NonPositiveCapacity,
    /// A negative quanta-per-week quota.
    NegativeQuota,
    /// An availability mask present but empty (never schedulable).
    EmptyAvailability,
    /// An availability mask references a quantum off the calendar.
    UnknownQuantum,
    /// One side of a course↔group or course↔instructor link is missing.
    LinkAsymmetry,
    /// An entity that takes no part in any session.
    Unused,
}

impl ValidationIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Collected validation findings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Run-blocking findings.
    pub errors: Vec<ValidationIssue>,
    /// Non-blocking findings.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// The overall verdict.
    pub fn verdict(&self) -> Verdict {
        if !self.errors.is_empty() {
            Verdict::Fail
        } else if !self.warnings.is_empty() {
            Verdict::PassWithWarnings
        } else {
            Verdict::Pass
        }
    }

    /// Whether the engine may run on this input.
    pub fn is_runnable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the report into the engine's pre-run verdict: the
    /// warnings on pass, the collected errors on fail.
    pub fn into_result(self) -> Result<Vec<ValidationIssue>, crate::error::InputError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(crate::error::InputError::ValidationFailed(self.errors))
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Returns all detected issues; never panics on malformed input.
pub fn validate_input(
    courses: &[Course],
    groups: &[Group],
    instructors: &[Instructor],
    rooms: &[Room],
    calendar: &QuantumCalendar,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let course_ids = check_duplicates(courses.iter().map(|c| c.id.as_str()), "course", &mut report);
    let group_ids = check_duplicates(groups.iter().map(|g| g.id.as_str()), "group", &mut report);
    let instructor_ids =
        check_duplicates(instructors.iter().map(|i| i.id.as_str()), "instructor", &mut report);
    check_duplicates(rooms.iter().map(|r| r.id.as_str()), "room", &mut report);

    // Scalar sanity
    for group in groups {
        if group.headcount < 1 {
            report.errors.push(ValidationIssue::new(
                IssueKind::NonPositiveHeadcount,
                format!("Group '{}' has headcount {}", group.id, group.headcount),
            ));
        }
    }
    for room in rooms {
        if room.capacity < 1 {
            report.errors.push(ValidationIssue::new(
                IssueKind::NonPositiveCapacity,
                format!("Room '{}' has capacity {}", room.id, room.capacity),
            ));
        }
    }
    for course in courses {
        if course.theory_qpw < 0.0 || course.practical_qpw < 0.0 {
            report.errors.push(ValidationIssue::new(
                IssueKind::NegativeQuota,
                format!("Course '{}' has a negative weekly quota", course.id),
            ));
        }
    }

    // Cross-references
    for course in courses {
        for iid in &course.instructor_ids {
            if !instructor_ids.contains(iid.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueKind::UnknownReference,
                    format!("Course '{}' references unknown instructor '{}'", course.id, iid),
                ));
            }
        }
        for gid in &course.group_ids {
            if !group_ids.contains(gid.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueKind::UnknownReference,
                    format!("Course '{}' references unknown group '{}'", course.id, gid),
                ));
            }
        }
    }
    for group in groups {
        for cid in &group.course_ids {
            if !course_ids.contains(cid.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueKind::UnknownReference,
                    format!("Group '{}' references unknown course '{}'", group.id, cid),
                ));
            }
        }
    }
    for instructor in instructors {
        for cid in &instructor.course_ids {
            if !course_ids.contains(cid.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueKind::UnknownReference,
                    format!(
                        "Instructor '{}' references unknown course '{}'",
                        instructor.id, cid
                    ),
                ));
            }
        }
    }

    // Availability masks
    for instructor in instructors {
        match &instructor.availability {
            Some(mask) if mask.is_empty() => {
                report.errors.push(ValidationIssue::new(
                    IssueKind::EmptyAvailability,
                    format!("Instructor '{}' has an empty availability mask", instructor.id),
                ));
            }
            Some(mask) => {
                for &q in mask {
                    if !calendar.contains(q) {
                        report.errors.push(ValidationIssue::new(
                            IssueKind::UnknownQuantum,
                            format!(
                                "Instructor '{}' availability references quantum {} outside the calendar",
                                instructor.id, q
                            ),
                        ));
                    }
                }
            }
            None => {}
        }
    }

    // Link asymmetries (warnings): either side of an enrollment or
    // qualification link may be declared alone.
    for course in courses {
        for gid in &course.group_ids {
            if let Some(group) = groups.iter().find(|g| &g.id == gid) {
                if !group.is_enrolled_in(&course.id) {
                    report.warnings.push(ValidationIssue::new(
                        IssueKind::LinkAsymmetry,
                        format!(
                            "Course '{}' lists group '{}' but the group does not list the course",
                            course.id, gid
                        ),
                    ));
                }
            }
        }
        for iid in &course.instructor_ids {
            if let Some(instructor) = instructors.iter().find(|i| &i.id == iid) {
                if !instructor.is_qualified_for(&course.id) {
                    report.warnings.push(ValidationIssue::new(
                        IssueKind::LinkAsymmetry,
                        format!(
                            "Course '{}' lists instructor '{}' but the instructor does not list the course",
                            course.id, iid
                        ),
                    ));
                }
            }
        }
    }

    // Session-producing courses need an instructor and rooms. Enrollment
    // is the union of both link directions.
    for course in courses {
        let enrolled = course.group_ids.iter().any(|gid| group_ids.contains(gid.as_str()))
            || groups.iter().any(|g| g.is_enrolled_in(&course.id));
        let total_quota = course.theory_qpw.max(0.0) + course.practical_qpw.max(0.0);
        let produces_sessions = enrolled && total_quota > 0.0;

        let qualified = course.instructor_ids.iter().any(|iid| instructor_ids.contains(iid.as_str()))
            || instructors.iter().any(|i| i.is_qualified_for(&course.id));

        if !qualified {
            if produces_sessions {
                report.errors.push(ValidationIssue::new(
                    IssueKind::NoQualifiedInstructor,
                    format!("Course '{}' has no qualified instructors", course.id),
                ));
            } else {
                report.warnings.push(ValidationIssue::new(
                    IssueKind::NoQualifiedInstructor,
                    format!("Course '{}' has no qualified instructors (and no sessions)", course.id),
                ));
            }
        }

        if produces_sessions {
            if course.theory_qpw > 0.0 && rooms.is_empty() {
                report.errors.push(ValidationIssue::new(
                    IssueKind::NoCandidateRoom,
                    format!("Course '{}' has theory sessions but no rooms exist", course.id),
                ));
            }
            if course.has_practical()
                && !rooms.iter().any(|r| r.supports_all(&course.practical_features))
            {
                report.errors.push(ValidationIssue::new(
                    IssueKind::NoCandidateRoom,
                    format!(
                        "Course '{}' practical sessions match no room (required features: {:?})",
                        course.id, course.practical_features
                    ),
                ));
            }
        } else if !enrolled {
            report.warnings.push(ValidationIssue::new(
                IssueKind::Unused,
                format!("Course '{}' has no enrolled groups", course.id),
            ));
        }
    }

    for instructor in instructors {
        let teaches_something = !instructor.course_ids.is_empty()
            || courses.iter().any(|c| c.instructor_ids.contains(&instructor.id));
        if !teaches_something {
            report.warnings.push(ValidationIssue::new(
                IssueKind::Unused,
                format!("Instructor '{}' is qualified for no courses", instructor.id),
            ));
        }
    }

    report
}

fn check_duplicates<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
    report: &mut ValidationReport,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.errors.push(ValidationIssue::new(
                IssueKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
    seen
}
