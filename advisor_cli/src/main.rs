use advisor_core::*;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "Degree requirement and prerequisite advisor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to the standard config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Course catalog JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Requirement rules TOML file
    #[arg(long, global = true)]
    requirements: Option<PathBuf>,

    /// Course history file (defaults to history.json in the data directory)
    #[arg(long, global = true)]
    history: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one course
    Lookup { code: String },

    /// Search courses by code, subject or keyword
    Search {
        query: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Direct and indirect prerequisites, and what a course unlocks
    Chain { code: String },

    /// Courses whose prerequisites are met
    Available {
        /// Comma-separated completed courses instead of the recorded history
        #[arg(long)]
        completed: Option<String>,

        /// Only courses newly opened up by completed work
        #[arg(long, conflicts_with = "blocked")]
        next: bool,

        /// Courses still blocked, with their missing prerequisites
        #[arg(long)]
        blocked: bool,
    },

    /// Ranked course recommendations
    Recommend {
        #[arg(long)]
        major: Option<String>,

        #[arg(long)]
        year: Option<u32>,

        #[arg(long)]
        limit: Option<usize>,

        /// Comma-separated completed courses instead of the recorded history
        #[arg(long)]
        completed: Option<String>,

        /// Include scores in the output
        #[arg(long)]
        scores: bool,
    },

    /// Alternatives to a course that cannot be taken yet
    Alternatives {
        code: String,

        #[arg(long)]
        major: Option<String>,

        /// Comma-separated completed courses instead of the recorded history
        #[arg(long)]
        completed: Option<String>,
    },

    /// Whether a course (and optionally a grade) earns degree credit
    Counts {
        code: String,

        #[arg(long)]
        grade: Option<String>,
    },

    /// Record a completed attempt
    Record {
        code: String,
        grade: String,

        #[arg(long, default_value = "")]
        semester: String,
    },

    /// Remove a recorded attempt by id
    Remove { id: Uuid },

    /// Import a transcript CSV (course,grade,semester)
    Import { path: PathBuf },

    /// Credit and GPA summary of the recorded history
    Summary,

    /// Required courses not yet credited
    Remaining,

    /// Check the catalog for problems
    Validate,
}

fn main() -> Result<()> {
    advisor_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let history_path = cli
        .history
        .clone()
        .unwrap_or_else(|| data_dir.join("history.json"));
    tracing::debug!("Using history file {:?}", history_path);

    snapshot::install(build_advisor(&cli, &config)?);
    let advisor = snapshot::current();

    match cli.command {
        Commands::Lookup { code } => {
            let code = CourseCode::new(&code);
            let course = advisor
                .lookup(&code)
                .ok_or_else(|| Error::UnknownCourse(code.to_string()))?;
            print_json(&course)
        }
        Commands::Search { query, limit } => print_json(&advisor.search(&query, limit)),
        Commands::Chain { code } => {
            let code = CourseCode::new(&code);
            let chain = advisor
                .prerequisite_chain(&code)
                .ok_or_else(|| Error::UnknownCourse(code.to_string()))?;
            print_json(&chain)
        }
        Commands::Available {
            completed,
            next,
            blocked,
        } => {
            let completed = completed_from(completed.as_deref(), &history_path)?;
            if blocked {
                print_json(&advisor.unavailable_courses(&completed))
            } else if next {
                print_json(&advisor.next_level_courses(&completed))
            } else {
                print_json(&advisor.available_courses(&completed))
            }
        }
        Commands::Recommend {
            major,
            year,
            limit,
            completed,
            scores,
        } => {
            let completed = completed_from(completed.as_deref(), &history_path)?;
            let major = major.unwrap_or_else(|| config.student.major.clone());
            let year = year.unwrap_or(config.student.year);
            let limit = limit.unwrap_or(config.ranking.default_limit);

            if scores {
                let mut ranked = advisor.rank(&completed, &major, year);
                ranked.truncate(limit);
                print_json(&ranked)
            } else {
                print_json(&advisor.recommend(&completed, &major, year, limit))
            }
        }
        Commands::Alternatives {
            code,
            major,
            completed,
        } => {
            let completed = completed_from(completed.as_deref(), &history_path)?;
            let major = major.unwrap_or_else(|| config.student.major.clone());
            let code = CourseCode::new(&code);
            let alternatives = advisor
                .alternatives(&code, &completed, &major)
                .ok_or_else(|| Error::UnknownCourse(code.to_string()))?;
            print_json(&alternatives)
        }
        Commands::Counts { code, grade } => {
            let grade = grade.map(|g| g.parse::<Grade>()).transpose()?;
            print_json(&advisor.evaluate(&CourseCode::new(&code), grade))
        }
        Commands::Record {
            code,
            grade,
            semester,
        } => {
            let code = CourseCode::new(&code);
            let grade: Grade = grade.parse()?;
            let record = AcademicHistory::update(&history_path, |history| {
                advisor
                    .record_attempt(history, &code, grade, &semester)
                    .map(|r| r.clone())
            })?;
            print_json(&record)
        }
        Commands::Remove { id } => {
            let removed = AcademicHistory::update(&history_path, |history| {
                advisor.remove_attempt(history, id)
            })?;
            print_json(&removed)
        }
        Commands::Import { path } => {
            let (imported, total) = AcademicHistory::update(&history_path, |history| {
                let imported = import_transcript(&path, &advisor, history)?;
                Ok((imported, history.records.len()))
            })?;
            print_json(&json!({ "imported": imported, "records": total }))
        }
        Commands::Summary => {
            let history = AcademicHistory::load(&history_path)?;
            print_json(&history.credit_summary(advisor.requirements()))
        }
        Commands::Remaining => {
            let history = AcademicHistory::load(&history_path)?;
            print_json(&json!({
                "remaining": advisor.remaining_requirements(&history),
                "summary": history.credit_summary(advisor.requirements()),
            }))
        }
        Commands::Validate => cmd_validate(advisor.catalog()),
    }
}

/// Build the advisor from command-line overrides, then config, then built-ins
fn build_advisor(cli: &Cli, config: &Config) -> Result<Advisor> {
    let catalog_path = cli.catalog.as_ref().or(config.data.catalog_path.as_ref());
    let catalog = match catalog_path {
        Some(path) => load_catalog_or_default(path)?,
        None => get_default_catalog().clone(),
    };

    let requirements_path = cli
        .requirements
        .as_ref()
        .or(config.data.requirements_path.as_ref());
    let requirements = DegreeRequirements::load_or_default(requirements_path.map(PathBuf::as_path))?;

    Ok(Advisor::new(Arc::new(catalog), Arc::new(requirements))
        .with_weights(config.ranking.weights.clone()))
}

/// Completed courses from an explicit list, or from the recorded history
fn completed_from(list: Option<&str>, history_path: &Path) -> Result<CompletedSet> {
    match list {
        Some(list) => Ok(completed_set(
            list.split(',').map(str::trim).filter(|s| !s.is_empty()),
        )),
        None => Ok(AcademicHistory::load(history_path)?.completed_codes()),
    }
}

fn cmd_validate(catalog: &Catalog) -> Result<()> {
    let errors = catalog.validate();
    print_json(&json!({
        "courses": catalog.len(),
        "subjects": catalog.subject_summary(),
        "errors": errors,
    }))?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::CatalogValidation(format!("{} problem(s) found", errors.len())))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
