//! Academic history: recording attempts, retakes, and credit totals.
//!
//! History is append-only. A retake adds a new record; whichever attempt
//! loses under the retake policy is marked `nullified` and kept for audit.
//! The only destructive operation is [`AcademicHistory::remove`], which
//! replays the remaining attempts at that course.

use crate::requirements::DegreeRequirements;
use crate::types::{
    AcademicHistory, Catalog, CompletedCourseRecord, CompletedSet, CourseCode, Grade,
    GradeStanding,
};
use crate::{Error, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// What happens to an earlier active attempt when a new one is recorded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetakeOutcome {
    /// Earlier attempt is superseded
    NullifyOld,
    /// Earlier attempt keeps its credit; the new one stays on record without credit
    KeepOld,
    /// New attempt is superseded by the earlier one
    NullifyNew,
}

/// Decide between an earlier attempt and a new attempt of the same course.
///
/// A passing attempt always beats a below-passing one. Otherwise the higher
/// grade wins, and on a tie the newer attempt is kept.
pub fn resolve_retake(old: Grade, new: Grade) -> RetakeOutcome {
    match (old.is_passing(), new.is_passing()) {
        (false, true) => RetakeOutcome::NullifyOld,
        (true, false) => RetakeOutcome::KeepOld,
        _ if new.points_tenths() >= old.points_tenths() => RetakeOutcome::NullifyOld,
        _ => RetakeOutcome::NullifyNew,
    }
}

/// Apply the retake policy between `record` and each active earlier attempt
/// at the same course, oldest first.
fn settle_retake(earlier: &mut [CompletedCourseRecord], record: &mut CompletedCourseRecord) {
    let target = record.course_code.clone();
    for old in earlier
        .iter_mut()
        .filter(|r| r.course_code == target && !r.nullified)
    {
        let outcome = resolve_retake(old.grade, record.grade);
        tracing::debug!(
            "Retake of {}: earlier {} vs new {} -> {:?}",
            target,
            old.grade,
            record.grade,
            outcome
        );

        match outcome {
            RetakeOutcome::NullifyOld => {
                old.nullified = true;
                old.counts_toward_degree = false;
            }
            RetakeOutcome::KeepOld => {
                record.counts_toward_degree = false;
            }
            RetakeOutcome::NullifyNew => {
                record.nullified = true;
                record.counts_toward_degree = false;
                break;
            }
        }
    }
}

/// Credit and GPA totals derived from a history
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditSummary {
    pub earned_credits: u32,
    pub required_for_degree: u32,
    pub remaining_credits: u32,
    pub graded_credits: u32,
    pub gpa: f64,
    pub attempts: usize,
    pub nullified_attempts: usize,
}

impl AcademicHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new attempt and apply the retake policy.
    ///
    /// Credits are copied from the catalog, and degree credit is decided now
    /// and stored with the record.
    pub fn record_attempt(
        &mut self,
        code: &CourseCode,
        grade: Grade,
        semester: &str,
        catalog: &Catalog,
        rules: &DegreeRequirements,
    ) -> Result<&CompletedCourseRecord> {
        let course = catalog
            .get_code(code)
            .ok_or_else(|| Error::UnknownCourse(code.to_string()))?;

        let mut record = CompletedCourseRecord {
            id: Uuid::new_v4(),
            course_code: course.code.clone(),
            grade,
            semester: semester.to_string(),
            credits: course.credits,
            nullified: false,
            counts_toward_degree: rules.counts_toward_degree(&course.code, grade, catalog),
            recorded_at: Utc::now(),
        };

        settle_retake(&mut self.records, &mut record);

        tracing::info!(
            "Recorded {} {} ({}), counts toward degree: {}",
            record.course_code,
            record.grade,
            record.semester,
            record.counts_toward_degree
        );

        let idx = self.records.len();
        self.records.push(record);
        Ok(&self.records[idx])
    }

    /// Physically remove a record.
    ///
    /// The remaining attempts at the same course are replayed oldest first
    /// through the retake policy, so an attempt that only lost to the removed
    /// one becomes active again. Degree credit is re-evaluated against `rules`.
    pub fn remove(
        &mut self,
        id: Uuid,
        catalog: &Catalog,
        rules: &DegreeRequirements,
    ) -> Result<CompletedCourseRecord> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::RecordNotFound(id))?;
        let removed = self.records.remove(idx);
        tracing::info!("Removed {} {} from history", removed.course_code, removed.grade);

        let siblings: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.course_code == removed.course_code)
            .map(|(i, _)| i)
            .collect();
        for &i in &siblings {
            let record = &mut self.records[i];
            record.nullified = false;
            record.counts_toward_degree =
                rules.counts_toward_degree(&record.course_code, record.grade, catalog);
        }
        for &i in &siblings {
            let (earlier, rest) = self.records.split_at_mut(i);
            settle_retake(earlier, &mut rest[0]);
        }

        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<&CompletedCourseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All attempts at `code`, oldest first
    pub fn attempts_of(&self, code: &CourseCode) -> Vec<&CompletedCourseRecord> {
        self.records
            .iter()
            .filter(|r| &r.course_code == code)
            .collect()
    }

    /// Courses treated as completed for prerequisite checks
    ///
    /// Any active attempt that did not fail.
    pub fn completed_codes(&self) -> CompletedSet {
        self.records
            .iter()
            .filter(|r| !r.nullified && r.grade.standing() != GradeStanding::Failing)
            .map(|r| r.course_code.clone())
            .collect()
    }

    /// Courses with an attempt currently earning degree credit
    pub fn credited_codes(&self) -> HashSet<CourseCode> {
        self.records
            .iter()
            .filter(|r| !r.nullified && r.counts_toward_degree)
            .map(|r| r.course_code.clone())
            .collect()
    }

    /// Recompute earned credits and GPA from the stored records
    pub fn credit_summary(&self, rules: &DegreeRequirements) -> CreditSummary {
        let active = self.records.iter().filter(|r| !r.nullified);

        let mut earned = 0;
        let mut graded_credits = 0;
        let mut quality_tenths = 0;
        for record in active {
            if record.counts_toward_degree {
                earned += record.credits;
            }
            graded_credits += record.credits;
            quality_tenths += record.grade.points_tenths() * record.credits;
        }

        let gpa = if graded_credits > 0 {
            let raw = f64::from(quality_tenths) / 10.0 / f64::from(graded_credits);
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        CreditSummary {
            earned_credits: earned,
            required_for_degree: rules.credits_required,
            remaining_credits: rules.credits_required.saturating_sub(earned),
            graded_credits,
            gpa,
            attempts: self.records.len(),
            nullified_attempts: self.records.iter().filter(|r| r.nullified).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::requirements::default_requirements;

    fn code(s: &str) -> CourseCode {
        CourseCode::new(s)
    }

    fn record(history: &mut AcademicHistory, catalog: &Catalog, c: &str, grade: Grade, semester: &str) -> Uuid {
        history
            .record_attempt(&code(c), grade, semester, catalog, default_requirements())
            .unwrap()
            .id
    }

    fn counting(history: &AcademicHistory, c: &str) -> Vec<Grade> {
        history
            .attempts_of(&code(c))
            .into_iter()
            .filter(|r| r.counts_toward_degree)
            .map(|r| r.grade)
            .collect()
    }

    #[test]
    fn test_resolve_retake_table() {
        assert_eq!(resolve_retake(Grade::D, Grade::B), RetakeOutcome::NullifyOld);
        assert_eq!(resolve_retake(Grade::F, Grade::C), RetakeOutcome::NullifyOld);
        assert_eq!(resolve_retake(Grade::B, Grade::D), RetakeOutcome::KeepOld);
        assert_eq!(resolve_retake(Grade::A, Grade::B), RetakeOutcome::NullifyNew);
        assert_eq!(resolve_retake(Grade::B, Grade::A), RetakeOutcome::NullifyOld);
        assert_eq!(resolve_retake(Grade::B, Grade::B), RetakeOutcome::NullifyOld);
        assert_eq!(resolve_retake(Grade::D, Grade::CMinus), RetakeOutcome::NullifyOld);
        assert_eq!(resolve_retake(Grade::CMinus, Grade::F), RetakeOutcome::NullifyNew);
    }

    #[test]
    fn test_first_attempt_records_catalog_credits() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let rec = history
            .record_attempt(&code("cs112"), Grade::B, "Fall 2024", &catalog, default_requirements())
            .unwrap();

        assert_eq!(rec.course_code.as_str(), "CS 112");
        assert_eq!(rec.credits, 4);
        assert!(rec.counts_toward_degree);
        assert!(!rec.nullified);
    }

    #[test]
    fn test_unknown_course_rejected() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let result = history.record_attempt(&code("ART 101"), Grade::A, "Fall 2024", &catalog, default_requirements());
        assert!(matches!(result, Err(Error::UnknownCourse(_))));
        assert!(history.records.is_empty());
    }

    #[test]
    fn test_below_passing_then_passing_retake() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 211", Grade::D, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 211", Grade::B, "Spring 2024");

        assert_eq!(counting(&history, "CS 211"), vec![Grade::B]);
        assert!(history.get(old).unwrap().nullified);
        assert!(history.get(new).unwrap().counts_toward_degree);
        assert_eq!(history.records.len(), 2);
    }

    #[test]
    fn test_passing_then_lower_passing_retake() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 211", Grade::A, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 211", Grade::CPlus, "Spring 2024");

        assert_eq!(counting(&history, "CS 211"), vec![Grade::A]);
        assert!(!history.get(old).unwrap().nullified);
        assert!(history.get(new).unwrap().nullified);
    }

    #[test]
    fn test_passing_then_below_passing_keeps_both_active() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 211", Grade::B, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 211", Grade::D, "Spring 2024");

        let old = history.get(old).unwrap();
        let new = history.get(new).unwrap();
        assert!(old.counts_toward_degree && !old.nullified);
        assert!(!new.counts_toward_degree && !new.nullified);
    }

    #[test]
    fn test_at_most_one_active_below_passing_attempt() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        record(&mut history, &catalog, "MATH 113", Grade::B, "Fall 2022");
        record(&mut history, &catalog, "MATH 113", Grade::D, "Spring 2023");
        record(&mut history, &catalog, "MATH 113", Grade::CMinus, "Fall 2023");

        let active_low = history
            .attempts_of(&code("MATH 113"))
            .into_iter()
            .filter(|r| !r.nullified && !r.grade.is_passing())
            .count();
        assert_eq!(active_low, 1);
        assert_eq!(counting(&history, "MATH 113"), vec![Grade::B]);
    }

    #[test]
    fn test_equal_grades_keep_newest() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 110", Grade::B, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 110", Grade::B, "Spring 2024");

        assert!(history.get(old).unwrap().nullified);
        assert!(history.get(new).unwrap().counts_toward_degree);
    }

    #[test]
    fn test_completed_codes_skip_failed_and_nullified() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        record(&mut history, &catalog, "CS 112", Grade::A, "Fall 2023");
        record(&mut history, &catalog, "MATH 113", Grade::F, "Fall 2023");
        record(&mut history, &catalog, "MATH 125", Grade::D, "Fall 2023");

        let completed = history.completed_codes();
        assert!(completed.contains(&code("CS 112")));
        assert!(!completed.contains(&code("MATH 113")));
        assert!(completed.contains(&code("MATH 125")));

        let credited = history.credited_codes();
        assert!(!credited.contains(&code("MATH 125")));
    }

    #[test]
    fn test_credit_summary() {
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        record(&mut history, &catalog, "CS 112", Grade::A, "Fall 2023"); // 4 cr, 4.0
        record(&mut history, &catalog, "MATH 113", Grade::D, "Fall 2023"); // 4 cr, 1.0
        record(&mut history, &catalog, "MATH 113", Grade::B, "Spring 2024"); // 4 cr, 3.0; nullifies D

        let summary = history.credit_summary(default_requirements());
        assert_eq!(summary.earned_credits, 8);
        assert_eq!(summary.graded_credits, 8);
        assert_eq!(summary.gpa, 3.5);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.nullified_attempts, 1);
        assert_eq!(summary.remaining_credits, 112);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AcademicHistory::new().credit_summary(default_requirements());
        assert_eq!(summary.gpa, 0.0);
        assert_eq!(summary.earned_credits, 0);
    }

    #[test]
    fn test_remove_record() {
        crate::logging::init_test();
        let catalog = build_default_catalog();
        let mut history = AcademicHistory::new();
        let id = record(&mut history, &catalog, "CS 112", Grade::A, "Fall 2023");

        let rules = default_requirements();
        let removed = history.remove(id, &catalog, rules).unwrap();
        assert_eq!(removed.course_code.as_str(), "CS 112");
        assert!(history.records.is_empty());
        assert!(matches!(
            history.remove(id, &catalog, rules),
            Err(Error::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_removing_winning_retake_reinstates_earlier_attempt() {
        let catalog = build_default_catalog();
        let rules = default_requirements();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 211", Grade::B, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 211", Grade::A, "Spring 2024");
        assert!(history.get(old).unwrap().nullified);

        history.remove(new, &catalog, rules).unwrap();

        let old = history.get(old).unwrap();
        assert!(!old.nullified);
        assert!(old.counts_toward_degree);
        assert_eq!(history.credit_summary(rules).earned_credits, 3);
        assert!(history.completed_codes().contains(&code("CS 211")));
    }

    #[test]
    fn test_remove_replays_remaining_attempts_in_order() {
        let catalog = build_default_catalog();
        let rules = default_requirements();
        let mut history = AcademicHistory::new();
        let first = record(&mut history, &catalog, "CS 211", Grade::D, "Fall 2023");
        let second = record(&mut history, &catalog, "CS 211", Grade::C, "Spring 2024");
        let third = record(&mut history, &catalog, "CS 211", Grade::B, "Fall 2024");

        history.remove(third, &catalog, rules).unwrap();

        assert!(history.get(first).unwrap().nullified);
        let second = history.get(second).unwrap();
        assert!(!second.nullified && second.counts_toward_degree);
        assert_eq!(counting(&history, "CS 211"), vec![Grade::C]);
    }

    #[test]
    fn test_removing_kept_attempt_leaves_below_passing_retake_uncredited() {
        let catalog = build_default_catalog();
        let rules = default_requirements();
        let mut history = AcademicHistory::new();
        let old = record(&mut history, &catalog, "CS 211", Grade::B, "Fall 2023");
        let new = record(&mut history, &catalog, "CS 211", Grade::D, "Spring 2024");

        history.remove(old, &catalog, rules).unwrap();

        let new = history.get(new).unwrap();
        assert!(!new.nullified);
        assert!(!new.counts_toward_degree);
        assert!(history.credited_codes().is_empty());
    }
}
