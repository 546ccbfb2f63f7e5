//! Prerequisite graph derived from a catalog.
//!
//! Edges run from prerequisite to dependent. The forward lists keep the
//! catalog-declared order and the reverse ("unlocks") lists keep catalog
//! order of the dependents. The graph is rebuilt per catalog snapshot and is
//! never mutated afterwards.
//!
//! Catalog data is hand-authored and may contain cycles, so every traversal
//! carries a visited set.

use crate::types::{Catalog, CourseCode};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Clone, Debug, Default)]
pub struct PrerequisiteGraph {
    /// course -> direct prerequisites (declared order)
    forward: HashMap<CourseCode, Vec<CourseCode>>,
    /// prerequisite -> courses that list it (catalog order)
    reverse: HashMap<CourseCode, Vec<CourseCode>>,
    /// catalog order, for deterministic cycle reporting
    order: Vec<CourseCode>,
}

impl PrerequisiteGraph {
    pub fn build(catalog: &Catalog) -> Self {
        let mut forward = HashMap::with_capacity(catalog.len());
        let mut reverse: HashMap<CourseCode, Vec<CourseCode>> = HashMap::new();
        let mut order = Vec::with_capacity(catalog.len());

        for course in catalog.courses() {
            order.push(course.code.clone());
            forward.insert(course.code.clone(), course.prerequisites.clone());

            for prereq in &course.prerequisites {
                let dependents = reverse.entry(prereq.clone()).or_default();
                if !dependents.contains(&course.code) {
                    dependents.push(course.code.clone());
                }
            }
        }

        tracing::debug!(
            "Built prerequisite graph: {} courses, {} prerequisite targets",
            forward.len(),
            reverse.len()
        );

        Self {
            forward,
            reverse,
            order,
        }
    }

    /// Direct prerequisites of `code`; empty when unknown
    pub fn direct_prerequisites(&self, code: &CourseCode) -> &[CourseCode] {
        self.forward.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Prerequisites of the direct prerequisites, one level removed.
    ///
    /// Deduplicated against the direct set and against `code` itself. This is
    /// deliberately not a transitive closure.
    pub fn indirect_prerequisites(&self, code: &CourseCode) -> Vec<CourseCode> {
        let direct = self.direct_prerequisites(code);
        let mut seen: HashSet<&CourseCode> = direct.iter().collect();
        seen.insert(code);

        let mut indirect = Vec::new();
        for prereq in direct {
            for candidate in self.direct_prerequisites(prereq) {
                if seen.insert(candidate) {
                    indirect.push(candidate.clone());
                }
            }
        }
        indirect
    }

    /// Every course reachable through prerequisite edges, breadth-first
    pub fn transitive_prerequisites(&self, code: &CourseCode) -> Vec<CourseCode> {
        let mut visited: HashSet<&CourseCode> = HashSet::from([code]);
        let mut queue: VecDeque<&CourseCode> = VecDeque::from([code]);
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            for prereq in self.direct_prerequisites(current) {
                if visited.insert(prereq) {
                    result.push(prereq.clone());
                    queue.push_back(prereq);
                }
            }
        }
        result
    }

    /// Courses that list `code` as a direct prerequisite
    pub fn unlocks(&self, code: &CourseCode) -> &[CourseCode] {
        self.reverse.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unlock_count(&self, code: &CourseCode) -> usize {
        self.unlocks(code).len()
    }

    /// Find prerequisite cycles among catalog courses.
    ///
    /// Each cycle is reported once, starting and ending at the same code.
    pub fn find_cycles(&self) -> Vec<Vec<CourseCode>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit<'a>(
            graph: &'a PrerequisiteGraph,
            node: &'a CourseCode,
            marks: &mut HashMap<&'a CourseCode, Mark>,
            stack: &mut Vec<&'a CourseCode>,
            cycles: &mut Vec<Vec<CourseCode>>,
        ) {
            marks.insert(node, Mark::InProgress);
            stack.push(node);

            for next in graph.direct_prerequisites(node) {
                if !graph.forward.contains_key(next) {
                    continue;
                }
                match marks.get(next) {
                    None => visit(graph, next, marks, stack, cycles),
                    Some(Mark::InProgress) => {
                        if let Some(start) = stack.iter().position(|c| *c == next) {
                            let mut cycle: Vec<CourseCode> =
                                stack[start..].iter().map(|c| (*c).clone()).collect();
                            cycle.push(next.clone());
                            cycles.push(cycle);
                        }
                    }
                    Some(Mark::Done) => {}
                }
            }

            stack.pop();
            marks.insert(node, Mark::Done);
        }

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut cycles = Vec::new();

        for code in &self.order {
            if !marks.contains_key(code) {
                visit(self, code, &mut marks, &mut stack, &mut cycles);
            }
        }

        if !cycles.is_empty() {
            tracing::warn!("Catalog contains {} prerequisite cycle(s)", cycles.len());
        }
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::types::Course;

    fn code(s: &str) -> CourseCode {
        CourseCode::new(s)
    }

    fn cyclic_catalog() -> Catalog {
        Catalog::from_courses(vec![
            Course::new("A 100", "Alpha", 3, &["B 100"]),
            Course::new("B 100", "Beta", 3, &["A 100", "C 100"]),
            Course::new("C 100", "Gamma", 3, &[]),
            Course::new("D 200", "Delta", 3, &["A 100"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_direct_and_unlocks() {
        let graph = PrerequisiteGraph::build(&build_default_catalog());

        assert_eq!(
            graph.direct_prerequisites(&code("CS 310")),
            &[code("CS 211"), code("MATH 113")]
        );
        assert!(graph.unlocks(&code("CS 310")).contains(&code("CS 471")));
        assert!(graph.direct_prerequisites(&code("NOPE 101")).is_empty());
        assert!(graph.unlocks(&code("NOPE 101")).is_empty());
    }

    #[test]
    fn test_unlocks_includes_unresolved_prerequisite_targets() {
        let catalog = Catalog::from_courses(vec![Course::new("X 300", "X", 3, &["GONE 100"])]).unwrap();
        let graph = PrerequisiteGraph::build(&catalog);
        assert_eq!(graph.unlocks(&code("GONE 100")), &[code("X 300")]);
    }

    #[test]
    fn test_indirect_is_one_level_and_deduplicated() {
        let graph = PrerequisiteGraph::build(&build_default_catalog());

        // CS 321 -> CS 310 -> {CS 211, MATH 113}; ENGH 302 has none
        let indirect = graph.indirect_prerequisites(&code("CS 321"));
        assert_eq!(indirect, vec![code("CS 211"), code("MATH 113")]);

        // CS 211 -> CS 112 is two levels removed and must not appear
        assert!(!indirect.contains(&code("CS 112")));
    }

    #[test]
    fn test_indirect_skips_direct_duplicates() {
        // CS 367 needs CS 262 and CS 222; CS 262 also needs CS 222
        let graph = PrerequisiteGraph::build(&build_default_catalog());
        let indirect = graph.indirect_prerequisites(&code("CS 367"));
        assert!(!indirect.contains(&code("CS 222")));
        assert!(indirect.contains(&code("CS 211")));
    }

    #[test]
    fn test_traversals_terminate_on_cycles() {
        let graph = PrerequisiteGraph::build(&cyclic_catalog());

        let indirect = graph.indirect_prerequisites(&code("A 100"));
        assert_eq!(indirect, vec![code("C 100")]);

        let all = graph.transitive_prerequisites(&code("D 200"));
        assert_eq!(all, vec![code("A 100"), code("B 100"), code("C 100")]);

        let all = graph.transitive_prerequisites(&code("A 100"));
        assert!(!all.contains(&code("A 100")));
    }

    #[test]
    fn test_find_cycles() {
        let graph = PrerequisiteGraph::build(&cyclic_catalog());
        let cycles = graph.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec![code("A 100"), code("B 100"), code("A 100")]);

        let clean = PrerequisiteGraph::build(&build_default_catalog());
        assert!(clean.find_cycles().is_empty());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let catalog = Catalog::from_courses(vec![Course::new("S 100", "Self", 3, &["S 100"])]).unwrap();
        let graph = PrerequisiteGraph::build(&catalog);
        assert_eq!(graph.find_cycles(), vec![vec![code("S 100"), code("S 100")]]);
        assert!(graph.transitive_prerequisites(&code("S 100")).is_empty());
        assert!(graph.indirect_prerequisites(&code("S 100")).is_empty());
    }
}
