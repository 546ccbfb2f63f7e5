//! Error types for the advisor_core library.
//!
//! Engine queries never fail; these errors belong to the load and write
//! edges (catalog files, requirement rules, history files, transcripts).

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for advisor_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Grade outside the letter-grade scale
    #[error("Invalid grade: {0}")]
    InvalidGrade(String),

    /// Course code not present in the catalog
    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    /// No history record with the given id
    #[error("Record not found: {0}")]
    RecordNotFound(uuid::Uuid),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
