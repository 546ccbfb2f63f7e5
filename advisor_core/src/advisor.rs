//! Query façade over one catalog snapshot.
//!
//! An [`Advisor`] owns a shared catalog and rule set and answers every
//! read-only question about them. The prerequisite graph is built the first
//! time a query needs it and reused for the lifetime of the advisor.

use crate::availability::{self, UnavailableCourse};
use crate::catalog::get_default_catalog;
use crate::graph::PrerequisiteGraph;
use crate::ranking::{self, RankingContext, RankingWeights, ScoredCourse};
use crate::requirements::{default_requirements, CreditCategory, CreditDecision, DegreeRequirements};
use crate::search::{self, Alternatives};
use crate::types::{
    AcademicHistory, Catalog, CompletedCourseRecord, CompletedSet, Course, CourseCode, Grade,
};
use crate::Result;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// A course with its immediate neighbourhood in the prerequisite graph
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteChain {
    pub course: Course,
    pub direct_prerequisites: Vec<Course>,
    pub indirect_prerequisites: Vec<Course>,
    pub unlocked_courses: Vec<Course>,
}

#[derive(Debug)]
pub struct Advisor {
    catalog: Arc<Catalog>,
    requirements: Arc<DegreeRequirements>,
    weights: RankingWeights,
    graph: OnceCell<PrerequisiteGraph>,
}

impl Advisor {
    pub fn new(catalog: Arc<Catalog>, requirements: Arc<DegreeRequirements>) -> Self {
        Self {
            catalog,
            requirements,
            weights: RankingWeights::default(),
            graph: OnceCell::new(),
        }
    }

    /// Advisor over the built-in catalog and rule set
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(get_default_catalog().clone()),
            Arc::new(default_requirements().clone()),
        )
    }

    pub fn with_weights(mut self, weights: RankingWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn requirements(&self) -> &DegreeRequirements {
        &self.requirements
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    pub fn graph(&self) -> &PrerequisiteGraph {
        self.graph.get_or_init(|| {
            tracing::debug!("Building prerequisite graph for {} courses", self.catalog.len());
            PrerequisiteGraph::build(&self.catalog)
        })
    }

    fn resolve(&self, codes: &[CourseCode]) -> Vec<Course> {
        codes
            .iter()
            .filter_map(|c| self.catalog.get_code(c))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Catalog lookups
    // ========================================================================

    pub fn lookup(&self, code: &CourseCode) -> Option<Course> {
        self.catalog.get_code(code).cloned()
    }

    pub fn contains(&self, code: &CourseCode) -> bool {
        self.catalog.contains(code)
    }

    pub fn courses_by_subject(&self, subject: &str) -> Vec<Course> {
        self.catalog.by_subject(subject).into_iter().cloned().collect()
    }

    pub fn subject_summary(&self) -> BTreeMap<String, usize> {
        self.catalog.subject_summary()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<Course> {
        search::search(&self.catalog, query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========================================================================
    // Availability
    // ========================================================================

    /// False for codes that are not in the catalog
    pub fn is_available(&self, code: &CourseCode, completed: &CompletedSet) -> bool {
        self.catalog
            .get_code(code)
            .map_or(false, |course| availability::is_available(course, completed))
    }

    /// Empty for codes that are not in the catalog
    pub fn missing_prerequisites(&self, code: &CourseCode, completed: &CompletedSet) -> Vec<CourseCode> {
        self.catalog
            .get_code(code)
            .map(|course| availability::missing_prerequisites(course, completed))
            .unwrap_or_default()
    }

    pub fn available_courses(&self, completed: &CompletedSet) -> Vec<Course> {
        availability::available_courses(&self.catalog, completed)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn unavailable_courses(&self, completed: &CompletedSet) -> Vec<UnavailableCourse> {
        availability::unavailable_courses(&self.catalog, completed)
    }

    pub fn next_level_courses(&self, completed: &CompletedSet) -> Vec<Course> {
        availability::next_level_courses(&self.catalog, completed)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========================================================================
    // Prerequisite graph
    // ========================================================================

    /// Direct and one-step indirect prerequisites plus direct dependents.
    ///
    /// Codes that do not resolve in the catalog are left out of every list.
    pub fn prerequisite_chain(&self, code: &CourseCode) -> Option<PrerequisiteChain> {
        let course = self.catalog.get_code(code)?;
        let graph = self.graph();

        Some(PrerequisiteChain {
            course: course.clone(),
            direct_prerequisites: self.resolve(graph.direct_prerequisites(&course.code)),
            indirect_prerequisites: self.resolve(&graph.indirect_prerequisites(&course.code)),
            unlocked_courses: self.resolve(graph.unlocks(&course.code)),
        })
    }

    // ========================================================================
    // Degree credit
    // ========================================================================

    pub fn classify(&self, code: &CourseCode) -> Option<CreditCategory> {
        self.requirements.classify(code, &self.catalog)
    }

    pub fn counts_toward_degree(&self, code: &CourseCode, grade: Grade) -> bool {
        self.requirements.counts_toward_degree(code, grade, &self.catalog)
    }

    pub fn evaluate(&self, code: &CourseCode, grade: Option<Grade>) -> CreditDecision {
        self.requirements.evaluate(code, grade, &self.catalog)
    }

    /// Record an attempt in `history` against this advisor's catalog and rules
    pub fn record_attempt<'h>(
        &self,
        history: &'h mut AcademicHistory,
        code: &CourseCode,
        grade: Grade,
        semester: &str,
    ) -> Result<&'h CompletedCourseRecord> {
        history.record_attempt(code, grade, semester, &self.catalog, &self.requirements)
    }

    /// Remove a recorded attempt and replay the remaining attempts at that course
    pub fn remove_attempt(
        &self,
        history: &mut AcademicHistory,
        id: Uuid,
    ) -> Result<CompletedCourseRecord> {
        history.remove(id, &self.catalog, &self.requirements)
    }

    // ========================================================================
    // Planning
    // ========================================================================

    pub fn rank(&self, completed: &CompletedSet, major: &str, year: u32) -> Vec<ScoredCourse> {
        let ctx = RankingContext::new(major, year, &self.weights);
        ranking::rank(&self.catalog, self.graph(), completed, &ctx)
    }

    pub fn recommend(&self, completed: &CompletedSet, major: &str, year: u32, limit: usize) -> Vec<Course> {
        ranking::recommend(
            &self.catalog,
            self.graph(),
            completed,
            major,
            year,
            limit,
            &self.weights,
        )
    }

    pub fn alternatives(&self, code: &CourseCode, completed: &CompletedSet, major: &str) -> Option<Alternatives> {
        search::alternatives(&self.catalog, code, completed, major)
    }

    pub fn required_courses(&self) -> Vec<CourseCode> {
        self.requirements.required_courses()
    }

    /// Required courses with no attempt currently earning degree credit
    pub fn remaining_requirements(&self, history: &AcademicHistory) -> Vec<CourseCode> {
        let credited = history.credited_codes();
        self.required_courses()
            .into_iter()
            .filter(|code| !credited.contains(code))
            .collect()
    }
}
