//! Immutable scheduling context.
//!
//! Bundles the entity tables and the calendar, plus adjacency indexes
//! derived once at load: qualified instructors, candidate rooms, and
//! enrolled groups per course. Entities are kept in flat tables and all
//! engine modules address them by dense `u32` index, so genes stay
//! `Copy` and comparisons stay cheap. String ids appear only at the
//! construction and reporting boundaries.
//!
//! Enrollment and qualification links may be declared on either side
//! (course→group or group→course); the context indexes their union.

use std::collections::HashMap;

use crate::error::InputError;

use super::{ComponentKind, Course, Group, Instructor, QuantumCalendar, Room};

/// Entity tables plus derived lookup indexes, shared read-only by the
/// seeder, operators, evaluator, and engine.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    courses: Vec<Course>,
    groups: Vec<Group>,
    instructors: Vec<Instructor>,
    rooms: Vec<Room>,
    calendar: QuantumCalendar,

    course_index: HashMap<String, u32>,
    group_index: HashMap<String, u32>,
    instructor_index: HashMap<String, u32>,
    room_index: HashMap<String, u32>,

    /// course idx → qualified instructor idxs (sorted).
    qualified_by_course: Vec<Vec<u32>>,
    /// course idx → rooms matching the practical feature set (sorted).
    practical_rooms_by_course: Vec<Vec<u32>>,
    /// course idx → enrolled group idxs (sorted).
    groups_by_course: Vec<Vec<u32>>,
    /// Every room idx; the theory candidate set for all courses.
    all_rooms: Vec<u32>,
    /// instructor idx → sorted allowed quanta. `None` = every quantum.
    availability: Vec<Option<Vec<u32>>>,
}

impl SchedulingContext {
    /// Builds the context, deriving all adjacency indexes.
    ///
    /// Fails on dangling cross-references. Completeness checks (every
    /// session-producing course has instructors and rooms) are separate,
    /// see [`SchedulingContext::ensure_schedulable`].
    pub fn build(
        courses: Vec<Course>,
        groups: Vec<Group>,
        instructors: Vec<Instructor>,
        rooms: Vec<Room>,
        calendar: QuantumCalendar,
    ) -> Result<Self, InputError> {
        let course_index = index_of(courses.iter().map(|c| c.id.clone()));
        let group_index = index_of(groups.iter().map(|g| g.id.clone()));
        let instructor_index = index_of(instructors.iter().map(|i| i.id.clone()));
        let room_index = index_of(rooms.iter().map(|r| r.id.clone()));

        // Qualification: union of course→instructor and instructor→course.
        let mut qualified_by_course = vec![Vec::new(); courses.len()];
        for (ci, course) in courses.iter().enumerate() {
            for iid in &course.instructor_ids {
                let ii = *instructor_index.get(iid).ok_or_else(|| {
                    InputError::UnknownReference {
                        entity: "instructor",
                        id: iid.clone(),
                    }
                })?;
                qualified_by_course[ci].push(ii);
            }
        }
        for (ii, instructor) in instructors.iter().enumerate() {
            for cid in &instructor.course_ids {
                let ci = *course_index.get(cid).ok_or_else(|| {
                    InputError::UnknownReference {
                        entity: "course",
                        id: cid.clone(),
                    }
                })?;
                qualified_by_course[ci as usize].push(ii as u32);
            }
        }

        // Enrollment: union of course→group and group→course.
        let mut groups_by_course = vec![Vec::new(); courses.len()];
        for (ci, course) in courses.iter().enumerate() {
            for gid in &course.group_ids {
                let gi = *group_index.get(gid).ok_or_else(|| {
                    InputError::UnknownReference {
                        entity: "group",
                        id: gid.clone(),
                    }
                })?;
                groups_by_course[ci].push(gi);
            }
        }
        for (gi, group) in groups.iter().enumerate() {
            for cid in &group.course_ids {
                let ci = *course_index.get(cid).ok_or_else(|| {
                    InputError::UnknownReference {
                        entity: "course",
                        id: cid.clone(),
                    }
                })?;
                groups_by_course[ci as usize].push(gi as u32);
            }
        }

        for list in qualified_by_course.iter_mut().chain(groups_by_course.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        let practical_rooms_by_course = courses
            .iter()
            .map(|course| {
                rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.supports_all(&course.practical_features))
                    .map(|(ri, _)| ri as u32)
                    .collect()
            })
            .collect();

        let all_rooms = (0..rooms.len() as u32).collect();

        let availability = instructors
            .iter()
            .map(|instructor| {
                instructor.availability.as_ref().map(|mask| {
                    let mut quanta: Vec<u32> = mask
                        .iter()
                        .copied()
                        .filter(|&q| calendar.contains(q))
                        .collect();
                    quanta.sort_unstable();
                    quanta.dedup();
                    quanta
                })
            })
            .collect();

        Ok(Self {
            courses,
            groups,
            instructors,
            rooms,
            calendar,
            course_index,
            group_index,
            instructor_index,
            room_index,
            qualified_by_course,
            practical_rooms_by_course,
            groups_by_course,
            all_rooms,
            availability,
        })
    }

    /// Verifies that every session-producing course can be placed at all:
    /// at least one qualified instructor and at least one candidate room
    /// per required component.
    pub fn ensure_schedulable(&self) -> Result<(), InputError> {
        for (ci, course) in self.courses.iter().enumerate() {
            let ci = ci as u32;
            if self.enrolled_groups(ci).is_empty() {
                continue;
            }
            let needs_theory = course.theory_qpw > 0.0;
            let needs_practical = course.has_practical();
            if !needs_theory && !needs_practical {
                continue;
            }
            if self.qualified_instructors(ci).is_empty() {
                return Err(InputError::NoQualifiedInstructor(course.id.clone()));
            }
            if needs_theory && self.candidate_rooms(ci, ComponentKind::Theory).is_empty() {
                return Err(InputError::NoCandidateRoom(course.id.clone()));
            }
            if needs_practical && self.candidate_rooms(ci, ComponentKind::Practical).is_empty() {
                return Err(InputError::NoCandidateRoom(course.id.clone()));
            }
        }
        Ok(())
    }

    /// The calendar.
    pub fn calendar(&self) -> &QuantumCalendar {
        &self.calendar
    }

    /// All courses.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All instructors.
    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// All rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Course by dense index.
    #[inline]
    pub fn course(&self, idx: u32) -> &Course {
        &self.courses[idx as usize]
    }

    /// Group by dense index.
    #[inline]
    pub fn group(&self, idx: u32) -> &Group {
        &self.groups[idx as usize]
    }

    /// Instructor by dense index.
    #[inline]
    pub fn instructor(&self, idx: u32) -> &Instructor {
        &self.instructors[idx as usize]
    }

    /// Room by dense index.
    #[inline]
    pub fn room(&self, idx: u32) -> &Room {
        &self.rooms[idx as usize]
    }

    /// Dense index of a course id.
    pub fn course_idx(&self, id: &str) -> Option<u32> {
        self.course_index.get(id).copied()
    }

    /// Dense index of a group id.
    pub fn group_idx(&self, id: &str) -> Option<u32> {
        self.group_index.get(id).copied()
    }

    /// Dense index of an instructor id.
    pub fn instructor_idx(&self, id: &str) -> Option<u32> {
        self.instructor_index.get(id).copied()
    }

    /// Dense index of a room id.
    pub fn room_idx(&self, id: &str) -> Option<u32> {
        self.room_index.get(id).copied()
    }

    /// Instructors qualified for a course.
    #[inline]
    pub fn qualified_instructors(&self, course: u32) -> &[u32] {
        &self.qualified_by_course[course as usize]
    }

    /// Candidate rooms for a course component. Theory sessions may use
    /// any room; practical sessions only feature-matching ones.
    #[inline]
    pub fn candidate_rooms(&self, course: u32, kind: ComponentKind) -> &[u32] {
        match kind {
            ComponentKind::Theory => &self.all_rooms,
            ComponentKind::Practical => &self.practical_rooms_by_course[course as usize],
        }
    }

    /// Groups enrolled in a course (union of both link directions).
    #[inline]
    pub fn enrolled_groups(&self, course: u32) -> &[u32] {
        &self.groups_by_course[course as usize]
    }

    /// Sorted allowed quanta for an instructor; `None` = every quantum.
    #[inline]
    pub fn availability_of(&self, instructor: u32) -> Option<&[u32]> {
        self.availability[instructor as usize].as_deref()
    }

    /// Whether an instructor may teach at a quantum.
    #[inline]
    pub fn is_instructor_available(&self, instructor: u32, quantum: u32) -> bool {
        match &self.availability[instructor as usize] {
            None => true,
            Some(mask) => mask.binary_search(&quantum).is_ok(),
        }
    }
}

fn index_of(ids: impl Iterator<Item = String>) -> HashMap<String, u32> {
    ids.enumerate().map(|(i, id)| (id, i as u32)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> SchedulingContext {
        let courses = vec![
            Course::new("C1")
                .with_theory_quanta(2.0)
                .with_instructor("I1")
                .with_group("G1"),
            Course::new("C2")
                .with_theory_quanta(1.0)
                .with_practical_quanta(1.0)
                .with_practical_feature("lab")
                .with_group("G1"),
        ];
        let groups = vec![Group::new("G1").with_headcount(20).with_course("C1")];
        let instructors = vec![
            Instructor::new("I1"),
            Instructor::new("I2").with_course("C2").with_availability(vec![0, 1, 2]),
        ];
        let rooms = vec![
            Room::new("R1").with_capacity(30),
            Room::new("R2").with_capacity(16).with_feature("lab"),
        ];
        SchedulingContext::build(
            courses,
            groups,
            instructors,
            rooms,
            QuantumCalendar::new(5, 6),
        )
        .unwrap()
    }

    #[test]
    fn test_indexes_built() {
        let ctx = sample_context();
        assert_eq!(ctx.course_idx("C1"), Some(0));
        assert_eq!(ctx.course_idx("C2"), Some(1));
        assert_eq!(ctx.group_idx("G1"), Some(0));
        assert_eq!(ctx.room_idx("R2"), Some(1));
        assert!(ctx.course_idx("C99").is_none());
    }

    #[test]
    fn test_qualification_union() {
        let ctx = sample_context();
        // C1 declared course→instructor, C2 declared instructor→course
        assert_eq!(ctx.qualified_instructors(0), &[0]);
        assert_eq!(ctx.qualified_instructors(1), &[1]);
    }

    #[test]
    fn test_enrollment_union() {
        let ctx = sample_context();
        // G1 enrolled in C1 from both sides, in C2 only via the course
        assert_eq!(ctx.enrolled_groups(0), &[0]);
        assert_eq!(ctx.enrolled_groups(1), &[0]);
    }

    #[test]
    fn test_candidate_rooms() {
        let ctx = sample_context();
        assert_eq!(ctx.candidate_rooms(0, ComponentKind::Theory), &[0, 1]);
        assert_eq!(ctx.candidate_rooms(1, ComponentKind::Practical), &[1]);
    }

    #[test]
    fn test_availability() {
        let ctx = sample_context();
        assert!(ctx.is_instructor_available(0, 29)); // no mask
        assert!(ctx.is_instructor_available(1, 2));
        assert!(!ctx.is_instructor_available(1, 3));
        assert_eq!(ctx.availability_of(1), Some(&[0, 1, 2][..]));
        assert_eq!(ctx.availability_of(0), None);
    }

    #[test]
    fn test_unknown_reference_fails() {
        let courses = vec![Course::new("C1").with_instructor("NOPE")];
        let err = SchedulingContext::build(
            courses,
            vec![],
            vec![],
            vec![],
            QuantumCalendar::new(1, 4),
        )
        .unwrap_err();
        assert!(matches!(err, InputError::UnknownReference { entity: "instructor", .. }));
    }

    #[test]
    fn test_ensure_schedulable() {
        let ctx = sample_context();
        // C2 produces sessions but has no instructor? It has I2 → ok.
        assert!(ctx.ensure_schedulable().is_ok());

        let courses = vec![Course::new("C1").with_theory_quanta(1.0).with_group("G1")];
        let groups = vec![Group::new("G1")];
        let ctx = SchedulingContext::build(
            courses,
            groups,
            vec![],
            vec![Room::new("R1")],
            QuantumCalendar::new(1, 4),
        )
        .unwrap();
        assert!(matches!(
            ctx.ensure_schedulable(),
            Err(InputError::NoQualifiedInstructor(_))
        ));
    }

    #[test]
    fn test_unenrolled_course_is_schedulable() {
        let courses = vec![Course::new("C1").with_theory_quanta(1.0)];
        let ctx = SchedulingContext::build(
            courses,
            vec![],
            vec![],
            vec![],
            QuantumCalendar::new(1, 4),
        )
        .unwrap();
        // No enrollment → no sessions → nothing to check.
        assert!(ctx.ensure_schedulable().is_ok());
    }
}
