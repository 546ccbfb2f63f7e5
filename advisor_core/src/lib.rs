#![forbid(unsafe_code)]

//! Core domain model and business logic for the degree advisor.
//!
//! This crate provides:
//! - Domain types (course codes, courses, grades, history records)
//! - Catalog management and the prerequisite graph
//! - Availability, degree-credit and retake rules
//! - Recommendation ranking, search and alternatives
//! - Persistence for the course history and transcript import

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod graph;
pub mod availability;
pub mod requirements;
pub mod history;
pub mod ranking;
pub mod search;
pub mod advisor;
pub mod snapshot;
pub mod store;
pub mod transcript;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, load_catalog, load_catalog_or_default};
pub use config::Config;
pub use graph::PrerequisiteGraph;
pub use availability::{is_available, missing_prerequisites, UnavailableCourse};
pub use requirements::{default_requirements, CreditCategory, CreditDecision, DegreeRequirements};
pub use history::{resolve_retake, CreditSummary, RetakeOutcome};
pub use ranking::{recommend, RankingWeights, ScoredCourse};
pub use search::Alternatives;
pub use advisor::{Advisor, PrerequisiteChain};
pub use transcript::import_transcript;
