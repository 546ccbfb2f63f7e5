//! Degree requirement rules and the degree-credit classifier.
//!
//! Rules are evaluated in order and the first one that matches decides the
//! credit category of a course. A grade below C never earns degree credit,
//! whatever the category.

use crate::types::{Catalog, CourseCode, Grade};
use crate::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category a course's credit is applied to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CreditCategory {
    RequiredCs,
    RequiredMath,
    /// MATH 351 + MATH 352 in place of STAT 344
    MathAlternative,
    SeniorCs,
    MasonCore,
    NaturalScience,
    CsRelatedElective,
    UpperDivisionElective,
    GeneralElective,
}

impl CreditCategory {
    /// Categories whose listed courses must all be completed
    pub fn is_required(self) -> bool {
        matches!(self, CreditCategory::RequiredCs | CreditCategory::RequiredMath)
    }
}

/// A single degree requirement predicate
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementRule {
    /// Explicit list of course codes
    Listed {
        category: CreditCategory,
        courses: Vec<CourseCode>,
    },
    /// Any course of `subject` numbered above `above`, minus `except`
    NumberAbove {
        category: CreditCategory,
        subject: String,
        above: u32,
        #[serde(default)]
        except: Vec<u32>,
    },
    /// Any catalog course that is not excluded
    GeneralElective {
        #[serde(default)]
        excluded: Vec<CourseCode>,
    },
}

impl RequirementRule {
    fn category_for(&self, code: &CourseCode, catalog: &Catalog) -> Option<CreditCategory> {
        match self {
            RequirementRule::Listed { category, courses } => {
                courses.contains(code).then_some(*category)
            }
            RequirementRule::NumberAbove {
                category,
                subject,
                above,
                except,
            } => {
                let number = code.number()?;
                (code.subject().eq_ignore_ascii_case(subject)
                    && number > *above
                    && !except.contains(&number))
                .then_some(*category)
            }
            RequirementRule::GeneralElective { excluded } => {
                (catalog.contains(code) && !excluded.contains(code))
                    .then_some(CreditCategory::GeneralElective)
            }
        }
    }
}

/// Outcome of classifying one course (and optionally one grade)
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditDecision {
    pub course_code: CourseCode,
    pub grade: Option<Grade>,
    pub category: Option<CreditCategory>,
    pub counts_toward_degree: bool,
}

/// The ordered rule set for a degree program
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DegreeRequirements {
    #[serde(default = "default_program_name")]
    pub name: String,

    #[serde(default = "default_credits_required")]
    pub credits_required: u32,

    pub rules: Vec<RequirementRule>,
}

fn default_program_name() -> String {
    "BS Computer Science".into()
}

fn default_credits_required() -> u32 {
    120
}

static DEFAULT_REQUIREMENTS: Lazy<DegreeRequirements> = Lazy::new(build_default_requirements);

/// Cached built-in computer-science rule set
pub fn default_requirements() -> &'static DegreeRequirements {
    &DEFAULT_REQUIREMENTS
}

fn listed(category: CreditCategory, codes: &[&str]) -> RequirementRule {
    RequirementRule::Listed {
        category,
        courses: codes.iter().map(|c| CourseCode::new(c)).collect(),
    }
}

fn build_default_requirements() -> DegreeRequirements {
    use CreditCategory::*;

    let rules = vec![
        listed(
            RequiredCs,
            &[
                "CS 110", "CS 112", "CS 211", "CS 262", "CS 306", "CS 310", "CS 321", "CS 330",
                "CS 367", "CS 471", "CS 483",
            ],
        ),
        listed(
            RequiredMath,
            &["MATH 113", "MATH 114", "MATH 125", "MATH 203", "MATH 213", "STAT 344"],
        ),
        listed(MathAlternative, &["MATH 351", "MATH 352"]),
        listed(
            SeniorCs,
            &[
                "CS 425", "CS 440", "CS 450", "CS 451", "CS 455", "CS 463", "CS 465", "CS 468",
                "CS 469", "CS 475", "CS 477", "CS 480", "CS 482", "CS 484", "CS 485", "CS 490",
                "CS 491", "CS 499", "MATH 446", "OR 481",
            ],
        ),
        listed(MasonCore, &["ENGH 101", "ENGH 302", "COMM 100", "COMM 101"]),
        listed(
            NaturalScience,
            &[
                "BIOL 103", "BIOL 106", "BIOL 107", "CHEM 211", "CHEM 213", "CHEM 212",
                "CHEM 214", "GEOL 101", "GEOL 102", "PHYS 160", "PHYS 161", "PHYS 260",
                "PHYS 261",
            ],
        ),
        listed(
            CsRelatedElective,
            &[
                "ECE 301", "ECE 331", "ECE 332", "ECE 350", "ECE 446", "ECE 447", "ECE 511",
                "OR 335", "OR 441", "OR 442", "PHIL 371", "PHIL 376", "STAT 354", "SWE 432",
                "SWE 437", "SWE 443", "SYST 371", "SYST 470", "ENGH 388",
            ],
        ),
        RequirementRule::NumberAbove {
            category: UpperDivisionElective,
            subject: "MATH".into(),
            above: 300,
            except: vec![351],
        },
        RequirementRule::NumberAbove {
            category: UpperDivisionElective,
            subject: "CS".into(),
            above: 300,
            except: vec![],
        },
        // TODO: enforce the 8-credit cap on general electives once the history
        // summary tracks credits per category.
        RequirementRule::GeneralElective {
            excluded: vec![
                CourseCode::new("MATH 104"),
                CourseCode::new("MATH 105"),
                CourseCode::new("MATH 108"),
            ],
        },
    ];

    DegreeRequirements {
        name: default_program_name(),
        credits_required: default_credits_required(),
        rules,
    }
}

impl DegreeRequirements {
    /// Load a rule set from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let requirements: DegreeRequirements = toml::from_str(&contents)?;
        tracing::info!(
            "Loaded {} requirement rules for '{}' from {:?}",
            requirements.rules.len(),
            requirements.name,
            path
        );
        Ok(requirements)
    }

    /// Load from `path` when given, otherwise the built-in rule set
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(default_requirements().clone()),
        }
    }

    /// Category of the first matching rule; `None` when nothing matches
    pub fn classify(&self, code: &CourseCode, catalog: &Catalog) -> Option<CreditCategory> {
        self.rules
            .iter()
            .find_map(|rule| rule.category_for(code, catalog))
    }

    /// Whether an attempt at `code` with `grade` earns degree credit
    pub fn counts_toward_degree(&self, code: &CourseCode, grade: Grade, catalog: &Catalog) -> bool {
        grade.is_passing() && self.classify(code, catalog).is_some()
    }

    /// Classify a course; without a grade, a passing grade is assumed
    pub fn evaluate(&self, code: &CourseCode, grade: Option<Grade>, catalog: &Catalog) -> CreditDecision {
        let category = self.classify(code, catalog);
        let counts = category.is_some() && grade.map_or(true, Grade::is_passing);

        tracing::debug!(
            "Credit decision for {} ({:?}): {:?}, counts={}",
            code,
            grade,
            category,
            counts
        );

        CreditDecision {
            course_code: code.clone(),
            grade,
            category,
            counts_toward_degree: counts,
        }
    }

    /// Every course listed under a required category, in rule order
    pub fn required_courses(&self) -> Vec<CourseCode> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                RequirementRule::Listed { category, courses } if category.is_required() => {
                    Some(courses.iter().cloned())
                }
                _ => None,
            })
            .flatten()
            .collect()
    }
}
