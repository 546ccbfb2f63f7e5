//! Core domain types for the degree advisor.
//!
//! This module defines the fundamental types used throughout the system:
//! - Course codes and their normalization
//! - Courses and the catalog container
//! - The letter-grade scale
//! - Completed-course records kept in a student's history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Course Codes
// ============================================================================

/// A normalized course code such as `CS 310`.
///
/// Codes are upper-cased, interior whitespace is collapsed to one space, and
/// a missing space between subject and number is inserted (`cs310` becomes
/// `CS 310`). Two codes are equal iff their normalized text is equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new(raw: &str) -> Self {
        Self(normalize_code(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading alphabetic part of the code (`CS` for `CS 310`).
    pub fn subject(&self) -> &str {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Leading integer of the numeric part (`112` for `CS 112C`).
    pub fn number(&self) -> Option<u32> {
        let rest = self.0[self.subject().len()..].trim_start();
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Course level: the number integer-divided by 100 (`3` for `CS 310`).
    pub fn level(&self) -> Option<u32> {
        self.number().map(|n| n / 100)
    }
}

fn normalize_code(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let collapsed = upper.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.find(|c: char| c.is_ascii_digit()) {
        Some(idx) if idx > 0 && collapsed[..idx].chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{} {}", &collapsed[..idx], &collapsed[idx..])
        }
        _ => collapsed,
    }
}

impl From<String> for CourseCode {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for CourseCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of completed course codes used for prerequisite checks
pub type CompletedSet = HashSet<CourseCode>;

/// Build a completed set from raw code strings, normalizing each one.
pub fn completed_set<I, S>(codes: I) -> CompletedSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes.into_iter().map(|c| CourseCode::new(c.as_ref())).collect()
}

// ============================================================================
// Courses and Catalog
// ============================================================================

/// A course as published in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub code: CourseCode,
    /// Derived from `code` when absent in the source data
    #[serde(default)]
    pub subject: String,
    pub title: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<CourseCode>,
}

impl Course {
    pub fn new(code: &str, title: &str, credits: u32, prerequisites: &[&str]) -> Self {
        let code = CourseCode::new(code);
        Self {
            subject: code.subject().to_string(),
            code,
            title: title.into(),
            credits,
            description: String::new(),
            prerequisites: prerequisites.iter().map(|p| CourseCode::new(p)).collect(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn level(&self) -> Option<u32> {
        self.code.level()
    }
}

/// The immutable table of known courses.
///
/// Catalog order is preserved and used to break ranking ties.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub(crate) courses: Vec<Course>,
    pub(crate) index: HashMap<CourseCode, usize>,
}

// ============================================================================
// Grades
// ============================================================================

/// Letter grade on the fixed university scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
}

/// Where a grade falls relative to the degree-credit threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStanding {
    /// C or better
    Passing,
    /// C- through D-: recorded, never credited
    BelowPassing,
    Failing,
}

impl Grade {
    pub const ALL: [Grade; 13] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
    ];

    pub fn letter(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }

    /// Grade points in tenths (A = 40, B- = 27, F = 0).
    pub fn points_tenths(self) -> u32 {
        match self {
            Grade::APlus | Grade::A => 40,
            Grade::AMinus => 37,
            Grade::BPlus => 33,
            Grade::B => 30,
            Grade::BMinus => 27,
            Grade::CPlus => 23,
            Grade::C => 20,
            Grade::CMinus => 17,
            Grade::DPlus => 13,
            Grade::D => 10,
            Grade::DMinus => 7,
            Grade::F => 0,
        }
    }

    /// Grade points on the 4.0 scale
    pub fn grade_points(self) -> f64 {
        f64::from(self.points_tenths()) / 10.0
    }

    pub fn standing(self) -> GradeStanding {
        match self {
            Grade::F => GradeStanding::Failing,
            Grade::CMinus | Grade::DPlus | Grade::D | Grade::DMinus => GradeStanding::BelowPassing,
            _ => GradeStanding::Passing,
        }
    }

    pub fn is_passing(self) -> bool {
        self.standing() == GradeStanding::Passing
    }
}

impl FromStr for Grade {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim().to_uppercase();
        Grade::ALL
            .into_iter()
            .find(|g| g.letter() == wanted)
            .ok_or_else(|| crate::Error::InvalidGrade(s.to_string()))
    }
}

impl TryFrom<String> for Grade {
    type Error = crate::Error;

    fn try_from(s: String) -> crate::Result<Self> {
        s.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.letter().to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

// ============================================================================
// Academic History Records
// ============================================================================

/// One attempt at a course in a student's history.
///
/// `counts_toward_degree` is decided when the record is written and stored;
/// it is not recomputed on read. Superseded attempts are kept with
/// `nullified` set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCourseRecord {
    pub id: Uuid,
    pub course_code: CourseCode,
    pub grade: Grade,
    pub semester: String,
    pub credits: u32,
    #[serde(default)]
    pub nullified: bool,
    pub counts_toward_degree: bool,
    pub recorded_at: DateTime<Utc>,
}

/// A student's ordered, append-only list of course attempts
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicHistory {
    pub records: Vec<CompletedCourseRecord>,
}
