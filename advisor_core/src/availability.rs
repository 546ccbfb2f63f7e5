//! Enrollment eligibility from completed coursework.
//!
//! A course is available when every declared prerequisite is in the
//! completed set. Matching is exact on normalized codes; a prerequisite that
//! does not resolve in the catalog simply stays unmet.

use crate::types::{Catalog, CompletedSet, Course, CourseCode};
use serde::Serialize;

/// A course the student cannot take yet, with what is missing
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableCourse {
    pub course: Course,
    pub missing_prerequisites: Vec<CourseCode>,
}

pub fn is_available(course: &Course, completed: &CompletedSet) -> bool {
    course
        .prerequisites
        .iter()
        .all(|prereq| completed.contains(prereq))
}

/// Prerequisites of `course` not in `completed`, in declared order
pub fn missing_prerequisites(course: &Course, completed: &CompletedSet) -> Vec<CourseCode> {
    course
        .prerequisites
        .iter()
        .filter(|prereq| !completed.contains(*prereq))
        .cloned()
        .collect()
}

/// All catalog courses whose prerequisites are met
pub fn available_courses<'a>(catalog: &'a Catalog, completed: &CompletedSet) -> Vec<&'a Course> {
    catalog
        .courses()
        .iter()
        .filter(|c| is_available(c, completed))
        .collect()
}

/// Courses with at least one unmet prerequisite
pub fn unavailable_courses(catalog: &Catalog, completed: &CompletedSet) -> Vec<UnavailableCourse> {
    catalog
        .courses()
        .iter()
        .filter_map(|course| {
            let missing = missing_prerequisites(course, completed);
            (!missing.is_empty()).then(|| UnavailableCourse {
                course: course.clone(),
                missing_prerequisites: missing,
            })
        })
        .collect()
}

/// Courses newly opened up by completed work.
///
/// Not yet completed, has prerequisites, and all of them are met.
pub fn next_level_courses<'a>(catalog: &'a Catalog, completed: &CompletedSet) -> Vec<&'a Course> {
    catalog
        .courses()
        .iter()
        .filter(|c| !completed.contains(&c.code))
        .filter(|c| !c.prerequisites.is_empty() && is_available(c, completed))
        .collect()
}
