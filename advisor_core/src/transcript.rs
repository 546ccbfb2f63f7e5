//! Transcript import from CSV.
//!
//! Expected header: `course,grade,semester`. Each row is recorded through the
//! retake policy in file order, so later rows behave as later attempts.

use crate::advisor::Advisor;
use crate::{AcademicHistory, CourseCode, Grade, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;

/// CSV row format for transcript files
#[derive(Debug, Deserialize)]
struct CsvRow {
    course: String,
    grade: String,
    #[serde(default)]
    semester: Option<String>,
}

/// One parsed transcript line
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub course_code: CourseCode,
    pub grade: Grade,
    pub semester: String,
}

impl TryFrom<CsvRow> for TranscriptEntry {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        if row.course.trim().is_empty() {
            return Err(crate::Error::Other("Empty course code".into()));
        }

        Ok(TranscriptEntry {
            course_code: CourseCode::new(&row.course),
            grade: row.grade.parse()?,
            semester: row.semester.unwrap_or_default(),
        })
    }
}

/// Parse every well-formed row of a transcript CSV, skipping bad rows
pub fn read_transcript(path: &Path) -> Result<Vec<TranscriptEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut entries = Vec::new();
    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => match TranscriptEntry::try_from(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Skipping transcript row {}: {}", line + 1, e),
            },
            Err(e) => tracing::warn!("Failed to deserialize transcript row {}: {}", line + 1, e),
        }
    }

    tracing::debug!("Read {} transcript entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Record every transcript row into `history`; returns how many were recorded.
///
/// Rows naming courses outside the catalog are logged and skipped.
pub fn import_transcript(path: &Path, advisor: &Advisor, history: &mut AcademicHistory) -> Result<usize> {
    let mut imported = 0;
    for entry in read_transcript(path)? {
        match advisor.record_attempt(history, &entry.course_code, entry.grade, &entry.semester) {
            Ok(_) => imported += 1,
            Err(e) => tracing::warn!("Skipping {}: {}", entry.course_code, e),
        }
    }

    tracing::info!("Imported {} transcript rows from {:?}", imported, path);
    Ok(imported)
}
