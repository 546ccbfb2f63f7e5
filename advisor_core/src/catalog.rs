//! Course catalog construction, loading and validation.
//!
//! The built-in catalog covers the computer-science program and the
//! mathematics, science, general-education and CS-related elective courses
//! its requirements refer to. A scraped catalog can be loaded from JSON
//! instead; either way the result is immutable once built.

use crate::graph::PrerequisiteGraph;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// (code, title, credits, prerequisites, description)
type Row = (&'static str, &'static str, u32, &'static [&'static str], &'static str);

const DEFAULT_COURSES: &[Row] = &[
    // ========================================================================
    // Computer Science
    // ========================================================================
    ("CS 100", "Principles of Computing", 3, &[], "Introduction to computational thinking and the breadth of computing."),
    ("CS 105", "Computer Ethics and Society", 1, &[], "Ethical and social issues raised by computing technology."),
    ("CS 110", "Essentials of Computer Science", 3, &[], "Survey of the discipline: algorithms, hardware, networks and software."),
    ("CS 112", "Introduction to Computer Programming", 4, &[], "Problem solving and programming fundamentals in a high-level language."),
    ("CS 211", "Object-Oriented Programming", 3, &["CS 112"], "Classes, inheritance, interfaces and object-oriented design."),
    ("CS 222", "Computer Programming for Engineers", 3, &["CS 112"], "Programming in C for engineering applications."),
    ("CS 262", "Introduction to Low-Level Programming", 3, &["CS 211", "CS 222"], "C programming, memory management and the Unix environment."),
    ("CS 306", "Synthesis of Ethics and Law for the Computing Professional", 3, &["CS 105", "CS 110"], "Professional responsibility, law and ethics in computing."),
    ("CS 310", "Data Structures", 3, &["CS 211", "MATH 113"], "Lists, trees, hash tables, graphs and their algorithms."),
    ("CS 321", "Software Engineering", 3, &["CS 310", "ENGH 302"], "Software process, requirements, design and testing in teams."),
    ("CS 325", "Introduction to Game Design", 3, &["CS 211"], "Game mechanics, prototyping and playtesting."),
    ("CS 330", "Formal Methods and Models", 3, &["CS 211", "MATH 125"], "Logic, automata, grammars and formal models of computation."),
    ("CS 332", "Object-Oriented Software Design and Implementation", 3, &["CS 310", "MATH 125"], "Design patterns and large-scale object-oriented development."),
    ("CS 351", "Visual Computing", 3, &["CS 262", "CS 310"], "Images, geometry and the foundations of computer graphics and vision."),
    ("CS 367", "Computer Systems and Programming", 4, &["CS 110", "CS 262", "CS 222", "MATH 125"], "Machine-level representation, processes and systems programming."),
    ("CS 390", "Research and Project Design Principles in Computing", 3, &["CS 262"], "Research methods and project planning in computing."),
    ("CS 391", "Advanced Programming Lab", 1, &["CS 310"], "Competitive programming and advanced problem solving."),
    ("CS 425", "Game Programming I", 3, &["CS 310", "CS 351"], "Game engines, rendering loops and interactive simulation."),
    ("CS 426", "Game Programming II", 3, &["CS 325", "CS 425"], "Advanced game programming team project."),
    ("CS 440", "Language Processors and Programming Environments", 3, &["CS 310", "CS 330", "CS 367"], "Compilers, interpreters, parsing and code generation."),
    ("CS 450", "Database Concepts", 3, &["CS 310", "CS 330"], "Relational database design, SQL and transaction processing."),
    ("CS 451", "Computer Graphics", 3, &["CS 310", "CS 367", "MATH 203"], "Rendering pipelines, shading and geometric transformations."),
    ("CS 455", "Computer Communications and Networking Systems", 3, &["CS 310", "CS 367", "STAT 344"], "Networking protocols, layered architectures and performance."),
    ("CS 463", "Comparative Programming Languages", 3, &["CS 310", "CS 330", "CS 367"], "Programming paradigms, semantics and language design."),
    ("CS 465", "Computer Systems Architecture", 3, &["CS 367"], "Processor design, pipelining and memory hierarchies."),
    ("CS 468", "Secure Programming and Systems", 3, &["CS 310", "CS 367"], "Security vulnerabilities, secure coding and system defenses."),
    ("CS 469", "Secure Engineering", 3, &["CS 330", "CS 367", "STAT 344"], "Engineering secure systems, threat modeling and cybersecurity practice."),
    ("CS 471", "Operating Systems", 3, &["CS 310", "CS 367"], "Processes, scheduling, memory management and file systems."),
    ("CS 475", "Concurrent and Distributed Systems", 3, &["CS 310", "CS 367"], "Concurrency, synchronization and distributed algorithms."),
    ("CS 477", "Mobile Application Development", 3, &["CS 310", "CS 367"], "Design and implementation of mobile applications."),
    ("CS 480", "Introduction to Artificial Intelligence", 3, &["CS 310", "CS 330"], "Search, knowledge representation and machine learning basics."),
    ("CS 482", "Computer Vision", 3, &["MATH 203", "STAT 344", "CS 310"], "Image formation, feature detection and recognition."),
    ("CS 483", "Analysis of Algorithms", 3, &["MATH 125", "CS 310", "CS 330"], "Algorithm design techniques and complexity analysis."),
    ("CS 484", "Data Mining", 3, &["CS 310", "STAT 344", "STAT 334"], "Classification, clustering and pattern discovery in large data sets."),
    ("CS 485", "Autonomous Robotics", 3, &["CS 262", "CS 310", "MATH 203"], "Robot perception, planning and control."),
    ("CS 490", "Design Exhibition", 3, &["CS 321", "CS 483"], "Capstone design project and public exhibition."),
    ("CS 491", "Industry-Sponsored Senior Design Project", 6, &["CS 367"], "Year-long capstone with an industry sponsor."),
    ("CS 498", "Independent Study in Computer Science", 3, &[], "Directed independent study."),
    ("CS 499", "Special Topics in Computer Science", 3, &["CS 310", "CS 330"], "Selected topics of current interest."),
    // ========================================================================
    // Mathematics and Statistics
    // ========================================================================
    ("MATH 104", "Trigonometry", 1, &[], "Trigonometric functions and identities."),
    ("MATH 105", "Precalculus Mathematics", 3, &[], "Functions, polynomials and exponentials in preparation for calculus."),
    ("MATH 108", "Introductory Calculus with Business Applications", 3, &[], "Calculus for business and economics."),
    ("MATH 113", "Analytic Geometry and Calculus I", 4, &[], "Limits, derivatives and integrals of one variable."),
    ("MATH 114", "Analytic Geometry and Calculus II", 4, &["MATH 113"], "Integration techniques, sequences and series."),
    ("MATH 125", "Discrete Mathematics I", 3, &[], "Sets, logic, counting, relations and proof techniques."),
    ("MATH 203", "Linear Algebra", 3, &["MATH 114"], "Matrices, vector spaces, eigenvalues and linear transformations."),
    ("MATH 213", "Calculus III", 3, &["MATH 114"], "Multivariable calculus and vector analysis."),
    ("MATH 351", "Probability", 3, &["MATH 114"], "Probability spaces, random variables and distributions."),
    ("MATH 352", "Mathematical Statistics", 3, &["MATH 351"], "Estimation, hypothesis testing and statistical inference."),
    ("MATH 446", "Numerical Analysis", 3, &[], "Numerical methods for equations, interpolation and integration."),
    ("STAT 334", "Introduction to Data Science", 3, &[], "Data wrangling, visualization and exploratory statistics."),
    ("STAT 344", "Probability and Statistics for Engineers & Scientists I", 3, &[], "Probability and statistics for engineering applications."),
    ("STAT 354", "Probability and Statistics for Engineers & Scientists II", 3, &[], "Regression, design of experiments and further inference."),
    // ========================================================================
    // Natural Science
    // ========================================================================
    ("PHYS 160", "University Physics I", 3, &[], "Mechanics, motion and energy."),
    ("PHYS 161", "University Physics I Laboratory", 1, &[], "Laboratory companion to University Physics I."),
    ("PHYS 260", "University Physics II", 3, &["PHYS 160"], "Electricity, magnetism and waves."),
    ("PHYS 261", "University Physics II Laboratory", 1, &["PHYS 161"], "Laboratory companion to University Physics II."),
    ("BIOL 103", "Contemporary Biology", 4, &[], "Cells, genetics, evolution and ecology."),
    ("BIOL 106", "Biology Laboratory I", 1, &[], "Introductory biology laboratory."),
    ("BIOL 107", "Biology Laboratory II", 3, &[], "Continuation of the introductory biology laboratory."),
    ("CHEM 211", "General Chemistry I", 3, &[], "Atomic structure, bonding and stoichiometry."),
    ("CHEM 213", "General Chemistry Laboratory I", 1, &[], "Laboratory companion to General Chemistry I."),
    ("CHEM 212", "General Chemistry II", 3, &[], "Kinetics, equilibrium and thermodynamics."),
    ("CHEM 214", "General Chemistry Laboratory II", 1, &[], "Laboratory companion to General Chemistry II."),
    ("GEOL 101", "Physical Geology", 4, &[], "Earth materials, plate tectonics and surface processes."),
    ("GEOL 102", "Historical Geology", 4, &[], "History of the Earth and its life."),
    // ========================================================================
    // Mason Core
    // ========================================================================
    ("ENGH 101", "Composition", 3, &[], "Academic writing and rhetoric."),
    ("ENGH 302", "Advanced Composition", 3, &[], "Writing in the disciplines."),
    ("COMM 100", "Public Speaking", 3, &[], "Preparation and delivery of speeches."),
    ("COMM 101", "Fundamentals of Communication", 3, &[], "Interpersonal, group and public communication."),
    // ========================================================================
    // CS-Related Electives
    // ========================================================================
    ("ECE 301", "Digital Electronics", 3, &[], "Transistor circuits and digital logic families."),
    ("ECE 331", "Digital System Design", 3, &[], "Combinational and sequential logic design."),
    ("ECE 332", "Digital Electronics Laboratory", 1, &[], "Laboratory in digital electronics."),
    ("ECE 350", "Introduction to Computer Engineering", 3, &[], "Embedded systems and hardware-software interfaces."),
    ("ECE 446", "Computer Architecture", 3, &[], "Instruction sets, processor organization and memory."),
    ("ECE 447", "Computer Architecture Laboratory", 1, &[], "Laboratory in computer architecture."),
    ("ECE 511", "Computer Architecture", 3, &[], "Graduate-level computer architecture."),
    ("OR 335", "Operations Research", 3, &[], "Linear programming and decision models."),
    ("OR 441", "Optimization", 3, &[], "Deterministic optimization methods."),
    ("OR 442", "Stochastic Models", 3, &[], "Markov chains, queues and stochastic processes."),
    ("OR 481", "Operations Research Methods", 3, &[], "Numerical methods in operations research."),
    ("PHIL 371", "Philosophy of Science", 3, &[], "Explanation, confirmation and scientific change."),
    ("PHIL 376", "Philosophy of Technology", 3, &[], "Technology, society and human values."),
    ("SWE 432", "Software Engineering", 3, &[], "Design and implementation of web applications."),
    ("SWE 437", "Software Testing", 3, &[], "Test design, coverage criteria and test automation."),
    ("SWE 443", "Software Architecture", 3, &[], "Architectural styles and large-system design."),
    ("SYST 371", "Systems Engineering", 3, &[], "Systems engineering management and lifecycle."),
    ("SYST 470", "Systems Design", 3, &[], "Human-machine systems design."),
];

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    let courses = DEFAULT_COURSES
        .iter()
        .map(|(code, title, credits, prereqs, description)| {
            Course::new(code, title, *credits, prereqs).with_description(description)
        })
        .collect();

    // Codes in the table are unique; an error here leaves the catalog empty.
    Catalog::from_courses(courses).unwrap_or_else(|e| {
        tracing::error!("Built-in catalog is invalid: {}", e);
        Catalog::default()
    })
}

/// Load a catalog from a JSON array of courses
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path)?;
    let courses: Vec<Course> = serde_json::from_str(&contents)?;
    let catalog = Catalog::from_courses(courses)?;
    tracing::info!("Loaded {} courses from catalog {:?}", catalog.len(), path);
    Ok(catalog)
}

/// Load a catalog from `path`, or the built-in catalog when the file is absent
///
/// A file that exists but cannot be parsed is an error.
pub fn load_catalog_or_default(path: &Path) -> Result<Catalog> {
    if path.exists() {
        load_catalog(path)
    } else {
        tracing::warn!(
            "Course catalog not found at {:?}, using built-in catalog",
            path
        );
        Ok(build_default_catalog())
    }
}

impl Catalog {
    /// Build a catalog, keeping the given order
    ///
    /// Fails on duplicate codes. Missing subjects are derived from the code.
    pub fn from_courses(courses: Vec<Course>) -> Result<Self> {
        let mut index = HashMap::with_capacity(courses.len());
        let mut ordered = Vec::with_capacity(courses.len());

        for mut course in courses {
            if course.subject.trim().is_empty() {
                course.subject = course.code.subject().to_string();
            } else {
                course.subject = course.subject.trim().to_uppercase();
            }
            if index.insert(course.code.clone(), ordered.len()).is_some() {
                return Err(Error::CatalogValidation(format!(
                    "duplicate course code '{}'",
                    course.code
                )));
            }
            ordered.push(course);
        }

        Ok(Self {
            courses: ordered,
            index,
        })
    }

    /// Look up a course; the code is normalized first
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.get_code(&CourseCode::new(code))
    }

    pub fn get_code(&self, code: &CourseCode) -> Option<&Course> {
        self.index.get(code).map(|&i| &self.courses[i])
    }

    pub fn contains(&self, code: &CourseCode) -> bool {
        self.index.contains_key(code)
    }

    /// All courses in catalog order
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn by_subject(&self, subject: &str) -> Vec<&Course> {
        let wanted = subject.trim().to_uppercase();
        self.courses.iter().filter(|c| c.subject == wanted).collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Number of courses per subject
    pub fn subject_summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for course in &self.courses {
            *summary.entry(course.subject.clone()).or_insert(0) += 1;
        }
        summary
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of diagnostics, or empty Vec if clean. None of these are
    /// fatal: unresolved prerequisites are treated as never satisfied and
    /// cycles are tolerated by every traversal.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for course in &self.courses {
            if course.code.as_str().is_empty() {
                errors.push("Course has empty code".to_string());
            }
            if course.title.trim().is_empty() {
                errors.push(format!("Course '{}' has empty title", course.code));
            }
            for prereq in &course.prerequisites {
                if prereq == &course.code {
                    errors.push(format!("Course '{}' lists itself as a prerequisite", course.code));
                } else if !self.contains(prereq) {
                    errors.push(format!(
                        "Course '{}' references unknown prerequisite '{}'",
                        course.code, prereq
                    ));
                }
            }
        }

        for cycle in PrerequisiteGraph::build(self).find_cycles() {
            let path: Vec<&str> = cycle.iter().map(|c| c.as_str()).collect();
            errors.push(format!("Prerequisite cycle: {}", path.join(" -> ")));
        }

        errors
    }
}
