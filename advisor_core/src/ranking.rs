//! Relevance ranking for course recommendations.
//!
//! Scoring rules:
//! - Course subject is one of the major's subjects: large bonus
//! - Course subject is a related subject (includes the major's own): medium bonus
//! - Each course this one unlocks: small bonus
//! - Level alignment with class year: at or one above scores best, two above
//!   scores less, below the student's year is penalized per level
//!
//! Candidates more than two levels above the student's year are not offered.

use crate::availability::is_available;
use crate::graph::PrerequisiteGraph;
use crate::types::{Catalog, CompletedSet, Course};
use serde::{Deserialize, Serialize};

/// Score weights, configurable under `[ranking]`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RankingWeights {
    #[serde(default = "default_major_match")]
    pub major_match: i64,

    #[serde(default = "default_related_match")]
    pub related_match: i64,

    #[serde(default = "default_per_unlock")]
    pub per_unlock: i64,

    #[serde(default = "default_level_match")]
    pub level_match: i64,

    #[serde(default = "default_level_ahead")]
    pub level_ahead: i64,

    #[serde(default = "default_level_behind_penalty")]
    pub level_behind_penalty: i64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            major_match: default_major_match(),
            related_match: default_related_match(),
            per_unlock: default_per_unlock(),
            level_match: default_level_match(),
            level_ahead: default_level_ahead(),
            level_behind_penalty: default_level_behind_penalty(),
        }
    }
}

fn default_major_match() -> i64 {
    100
}

fn default_related_match() -> i64 {
    50
}

fn default_per_unlock() -> i64 {
    10
}

fn default_level_match() -> i64 {
    30
}

fn default_level_ahead() -> i64 {
    15
}

fn default_level_behind_penalty() -> i64 {
    10
}

/// Levels above the class year still offered as candidates
const MAX_LEVELS_AHEAD: i64 = 2;

/// Major name (or abbreviation) to its subject codes, checked in order
const MAJOR_SUBJECTS: &[(&str, &[&str])] = &[
    ("COMPUTER SCIENCE", &["CS", "IT", "CYSE"]),
    ("CS", &["CS", "IT", "CYSE"]),
    ("SOFTWARE ENGINEERING", &["CS", "SWE", "IT"]),
    ("INFORMATION TECHNOLOGY", &["IT", "CS", "CYSE"]),
    ("IT", &["IT", "CS", "CYSE"]),
    ("CYBERSECURITY", &["CYSE", "CS", "IT"]),
    ("CYSE", &["CYSE", "CS", "IT"]),
    ("ELECTRICAL ENGINEERING", &["ECE", "PHYS", "MATH"]),
    ("ECE", &["ECE", "PHYS", "MATH"]),
    ("COMPUTER ENGINEERING", &["ECE", "CS", "PHYS"]),
    ("MECHANICAL ENGINEERING", &["ME", "PHYS", "MATH"]),
    ("CIVIL ENGINEERING", &["CE", "PHYS", "MATH"]),
    ("MATHEMATICS", &["MATH", "STAT", "CS"]),
    ("MATH", &["MATH", "STAT", "CS"]),
    ("PHYSICS", &["PHYS", "MATH"]),
    ("BIOLOGY", &["BIOL", "CHEM"]),
    ("CHEMISTRY", &["CHEM", "BIOL"]),
    ("BUSINESS", &["MBUS", "ACCT", "ECON", "FNAN"]),
    ("ACCOUNTING", &["ACCT", "MBUS", "FNAN"]),
    ("ECONOMICS", &["ECON", "MBUS", "MATH"]),
    ("PSYCHOLOGY", &["PSYC", "NEUR"]),
    ("ENGLISH", &["ENGH", "WRIT"]),
];

/// Subjects always considered related, whatever the major
const GENERAL_EDUCATION_SUBJECTS: &[&str] = &["ENGH", "HNRS"];

fn is_abbreviation(key: &str) -> bool {
    key.len() <= 4 && !key.contains(' ')
}

/// Subject codes for a declared major
///
/// Full names match anywhere in the major; abbreviations only as whole
/// words, so "Physics" does not match "CS". Unknown majors fall back to any
/// 2-4 letter all-caps words in the name.
pub fn major_subjects(major: &str) -> Vec<String> {
    let upper = major.to_uppercase();
    let words: Vec<&str> = upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (key, subjects) in MAJOR_SUBJECTS {
        let hit = if is_abbreviation(key) {
            words.contains(key)
        } else {
            upper.contains(key)
        };
        if hit {
            return subjects.iter().map(|s| s.to_string()).collect();
        }
    }

    major
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| (2..=4).contains(&w.len()) && w.chars().all(|c| c.is_ascii_uppercase()))
        .map(str::to_string)
        .collect()
}

/// Major subjects plus commonly taken supporting subjects
pub fn related_subjects(major: &str) -> Vec<String> {
    let mut related = major_subjects(major);
    let upper = major.to_uppercase();

    let mut add = |subject: &str| {
        if !related.iter().any(|s| s == subject) {
            related.push(subject.to_string());
        }
    };

    if ["ENGINEERING", "COMPUTER", "SCIENCE"]
        .iter()
        .any(|k| upper.contains(k))
    {
        add("MATH");
        add("PHYS");
    }
    for subject in GENERAL_EDUCATION_SUBJECTS.iter().copied() {
        add(subject);
    }

    related
}

/// A candidate with its relevance score
#[derive(Clone, Debug, Serialize)]
pub struct ScoredCourse {
    pub course: Course,
    pub score: i64,
}

/// Everything needed to score a course for one student
#[derive(Clone, Debug)]
pub struct RankingContext<'w> {
    pub major_subjects: Vec<String>,
    pub related_subjects: Vec<String>,
    pub year: u32,
    pub weights: &'w RankingWeights,
}

impl<'w> RankingContext<'w> {
    pub fn new(major: &str, year: u32, weights: &'w RankingWeights) -> Self {
        Self {
            major_subjects: major_subjects(major),
            related_subjects: related_subjects(major),
            year,
            weights,
        }
    }

    fn level_diff(&self, course: &Course) -> Option<i64> {
        course
            .level()
            .map(|level| i64::from(level) - i64::from(self.year))
    }

    /// Whether the course is within reach of the student's year
    pub fn in_range(&self, course: &Course) -> bool {
        self.level_diff(course)
            .map_or(true, |diff| diff <= MAX_LEVELS_AHEAD)
    }

    pub fn score(&self, course: &Course, unlock_count: usize) -> i64 {
        let w = self.weights;
        let mut score = 0;

        if self.major_subjects.iter().any(|s| *s == course.subject) {
            score += w.major_match;
        }
        if self.related_subjects.iter().any(|s| *s == course.subject) {
            score += w.related_match;
        }

        score += w.per_unlock * unlock_count as i64;

        score += match self.level_diff(course) {
            Some(0 | 1) => w.level_match,
            Some(2) => w.level_ahead,
            Some(diff) if diff < 0 => -(w.level_behind_penalty * diff.abs()),
            _ => 0,
        };

        score
    }
}

/// Score and order every eligible candidate, best first.
///
/// Candidates are not completed, currently available and in range. The sort
/// is stable, so equal scores keep catalog order.
pub fn rank(
    catalog: &Catalog,
    graph: &PrerequisiteGraph,
    completed: &CompletedSet,
    ctx: &RankingContext<'_>,
) -> Vec<ScoredCourse> {
    let mut scored: Vec<ScoredCourse> = catalog
        .courses()
        .iter()
        .filter(|c| !completed.contains(&c.code))
        .filter(|c| is_available(c, completed))
        .filter(|c| ctx.in_range(c))
        .map(|c| ScoredCourse {
            score: ctx.score(c, graph.unlock_count(&c.code)),
            course: c.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        "Ranked {} candidates for year {} ({:?})",
        scored.len(),
        ctx.year,
        ctx.major_subjects
    );
    scored
}

/// Top `limit` recommended courses
pub fn recommend(
    catalog: &Catalog,
    graph: &PrerequisiteGraph,
    completed: &CompletedSet,
    major: &str,
    year: u32,
    limit: usize,
    weights: &RankingWeights,
) -> Vec<Course> {
    let ctx = RankingContext::new(major, year, weights);
    rank(catalog, graph, completed, &ctx)
        .into_iter()
        .take(limit)
        .map(|s| s.course)
        .collect()
}
