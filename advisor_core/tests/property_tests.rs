//! # Property-Based Tests
//!
//! Availability and prerequisite-graph invariants over randomly generated
//! catalogs, including cyclic ones.

use advisor_core::{
    completed_set, is_available, missing_prerequisites, Catalog, CompletedSet, Course, CourseCode,
    PrerequisiteGraph,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

const MAX_COURSES: usize = 12;

fn code_for(i: usize) -> String {
    format!("T {}", 100 + i)
}

/// Catalog of `n` courses with prerequisite edges `(dependent, prerequisite)`
fn build_catalog(n: usize, edges: &[(usize, usize)]) -> Catalog {
    let courses = (0..n)
        .map(|i| {
            let mut prereqs: Vec<String> = Vec::new();
            for &(dep, pre) in edges {
                let (dep, pre) = (dep % n, pre % n);
                let pre_code = code_for(pre);
                if dep == i && !prereqs.contains(&pre_code) {
                    prereqs.push(pre_code);
                }
            }
            let refs: Vec<&str> = prereqs.iter().map(String::as_str).collect();
            Course::new(&code_for(i), &format!("Course {}", i), 3, &refs)
        })
        .collect();
    Catalog::from_courses(courses).expect("generated codes are unique")
}

fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (1usize..=MAX_COURSES, vec((0usize..MAX_COURSES, 0usize..MAX_COURSES), 0..40))
        .prop_map(|(n, edges)| build_catalog(n, &edges))
}

fn arb_completed() -> impl Strategy<Value = CompletedSet> {
    btree_set(0usize..MAX_COURSES, 0..MAX_COURSES)
        .prop_map(|picked| completed_set(picked.into_iter().map(code_for)))
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A course is available exactly when nothing is missing.
    #[test]
    fn available_iff_nothing_missing(catalog in arb_catalog(), completed in arb_completed()) {
        for course in catalog.courses() {
            let missing = missing_prerequisites(course, &completed);
            prop_assert_eq!(is_available(course, &completed), missing.is_empty());
            for code in &missing {
                prop_assert!(course.prerequisites.contains(code));
                prop_assert!(!completed.contains(code));
            }
        }
    }

    /// Courses without prerequisites are available whatever has been completed.
    #[test]
    fn no_prerequisites_always_available(catalog in arb_catalog(), completed in arb_completed()) {
        for course in catalog.courses().iter().filter(|c| c.prerequisites.is_empty()) {
            prop_assert!(is_available(course, &completed));
        }
    }

    /// P unlocks C exactly when C lists P as a direct prerequisite.
    #[test]
    fn reverse_edges_mirror_forward_edges(catalog in arb_catalog()) {
        let graph = PrerequisiteGraph::build(&catalog);
        for p in catalog.courses() {
            for c in catalog.courses() {
                let unlocks = graph.unlocks(&p.code).contains(&c.code);
                let requires = graph.direct_prerequisites(&c.code).contains(&p.code);
                prop_assert_eq!(unlocks, requires);
            }
        }
    }

    /// Traversals finish on cyclic graphs and never repeat a course.
    #[test]
    fn traversals_terminate(catalog in arb_catalog()) {
        let graph = PrerequisiteGraph::build(&catalog);
        for course in catalog.courses() {
            let closure = graph.transitive_prerequisites(&course.code);
            let mut sorted: Vec<&CourseCode> = closure.iter().collect();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), closure.len());
            prop_assert!(closure.len() <= catalog.len());

            let indirect = graph.indirect_prerequisites(&course.code);
            prop_assert!(!indirect.contains(&course.code));
            for code in &indirect {
                prop_assert!(!graph.direct_prerequisites(&course.code).contains(code));
            }
        }

        for cycle in graph.find_cycles() {
            prop_assert!(cycle.len() >= 2);
            prop_assert_eq!(cycle.first(), cycle.last());
        }
    }
}

#[test]
fn two_course_cycle_is_reported() {
    let catalog = build_catalog(2, &[(0, 1), (1, 0)]);
    let graph = PrerequisiteGraph::build(&catalog);
    assert_eq!(graph.find_cycles().len(), 1);
    assert_eq!(graph.transitive_prerequisites(&CourseCode::new("T 100")), vec![CourseCode::new("T 101")]);
}
