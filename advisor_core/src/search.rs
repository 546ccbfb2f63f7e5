//! Course search and alternative suggestions.

use crate::availability::{is_available, missing_prerequisites};
use crate::ranking::related_subjects;
use crate::types::{Catalog, CompletedSet, Course, CourseCode};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Hard cap on search results before the caller's limit is applied
pub const MAX_SEARCH_RESULTS: usize = 30;

/// Cap on the fallback token scan
const MAX_FALLBACK_RESULTS: usize = 20;

/// Cap on each alternatives list
pub const MAX_ALTERNATIVES: usize = 5;

/// Course-number distance for an alternative to count as a similar level
const LEVEL_WINDOW: u32 = 100;

static COURSE_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z]{2,4})\s*(\d{3,4}[A-Z]?)\b").expect("course code pattern is valid")
});

/// Topic phrases recognized in free-text queries
const KNOWN_TOPICS: &[&str] = &[
    "data structures",
    "algorithms",
    "programming",
    "database",
    "networking",
    "operating systems",
    "software engineering",
    "web development",
    "machine learning",
    "artificial intelligence",
    "computer graphics",
    "security",
    "cybersecurity",
    "calculus",
    "linear algebra",
    "statistics",
    "physics",
    "chemistry",
    "biology",
];

/// Collects results in priority order, skipping codes already taken
struct Hits<'a> {
    courses: Vec<&'a Course>,
    seen: HashSet<&'a CourseCode>,
}

impl<'a> Hits<'a> {
    fn new() -> Self {
        Self {
            courses: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, course: &'a Course) {
        if self.seen.insert(&course.code) {
            self.courses.push(course);
        }
    }
}

fn haystack(course: &Course) -> String {
    format!("{} {} {}", course.code, course.title, course.description).to_lowercase()
}

fn extract_codes(upper: &str) -> Vec<CourseCode> {
    let mut codes = Vec::new();
    for caps in COURSE_CODE_PATTERN.captures_iter(upper) {
        let code = CourseCode::new(&format!("{} {}", &caps[1], &caps[2]));
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn extract_subjects(upper: &str) -> Vec<&str> {
    let mut subjects = Vec::new();
    for word in upper.split(|c: char| !c.is_ascii_alphanumeric()) {
        if (2..=4).contains(&word.len())
            && word.chars().all(|c| c.is_ascii_alphabetic())
            && !subjects.contains(&word)
        {
            subjects.push(word);
        }
    }
    subjects
}

/// Search the catalog by code, subject, topic and free text.
///
/// Priority order: course codes named in the query, then whole subjects,
/// then topic and substring matches on code/title/description. When none of
/// those hit, any query word longer than three letters is tried. Results are
/// unique by code.
pub fn search<'a>(catalog: &'a Catalog, query: &str, limit: usize) -> Vec<&'a Course> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Vec::new();
    }

    let upper = query.to_uppercase();
    let lower = query.to_lowercase();
    let mut hits = Hits::new();

    for code in extract_codes(&upper) {
        if let Some(course) = catalog.get_code(&code) {
            hits.push(course);
        }
    }

    for subject in extract_subjects(&upper) {
        for course in catalog.by_subject(subject) {
            hits.push(course);
        }
    }

    let mut phrases: Vec<&str> = KNOWN_TOPICS
        .iter()
        .copied()
        .filter(|topic| lower.contains(topic))
        .collect();
    phrases.push(&lower);
    for phrase in phrases {
        for course in catalog.courses() {
            if haystack(course).contains(phrase) {
                hits.push(course);
            }
        }
    }

    if hits.courses.is_empty() {
        let tokens: Vec<&str> = lower
            .split_whitespace()
            .filter(|t| t.chars().count() > 3)
            .collect();
        let fallback = catalog
            .courses()
            .iter()
            .filter(|c| {
                let text = haystack(c);
                tokens.iter().any(|t| text.contains(t))
            })
            .take(MAX_FALLBACK_RESULTS);
        for course in fallback {
            hits.push(course);
        }
    }

    tracing::debug!("Search '{}' matched {} courses", query, hits.courses.len());

    hits.courses.truncate(MAX_SEARCH_RESULTS.min(limit));
    hits.courses
}

/// Suggestions when a student cannot, or would rather not, take a course
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternatives {
    pub target_course: Course,
    pub same_subject_alternatives: Vec<Course>,
    pub related_subject_alternatives: Vec<Course>,
    /// Missing prerequisites of the target, as a path toward it
    pub prerequisite_alternatives: Vec<Course>,
}

fn similar_level(course: &Course, target_number: Option<u32>) -> bool {
    match (course.code.number(), target_number) {
        (Some(n), Some(t)) => n.abs_diff(t) <= LEVEL_WINDOW,
        _ => true,
    }
}

/// Alternatives to `code`; `None` when the course is not in the catalog
pub fn alternatives(
    catalog: &Catalog,
    code: &CourseCode,
    completed: &CompletedSet,
    major: &str,
) -> Option<Alternatives> {
    let target = catalog.get_code(code)?;
    let target_number = target.code.number();
    let related = related_subjects(major);

    let candidates = || {
        catalog.courses().iter().filter(move |c| {
            c.code != target.code
                && !completed.contains(&c.code)
                && is_available(c, completed)
                && similar_level(c, target_number)
        })
    };

    let same_subject_alternatives = candidates()
        .filter(|c| c.subject == target.subject)
        .take(MAX_ALTERNATIVES)
        .cloned()
        .collect();

    let related_subject_alternatives = candidates()
        .filter(|c| c.subject != target.subject && related.contains(&c.subject))
        .take(MAX_ALTERNATIVES)
        .cloned()
        .collect();

    let prerequisite_alternatives = missing_prerequisites(target, completed)
        .iter()
        .filter_map(|p| catalog.get_code(p))
        .take(MAX_ALTERNATIVES)
        .cloned()
        .collect();

    Some(Alternatives {
        target_course: target.clone(),
        same_subject_alternatives,
        related_subject_alternatives,
        prerequisite_alternatives,
    })
}
