//! The import verifier: a fixed, fail-fast sequence of capability checks.
//!
//! Steps run strictly in order (framework, analyzer, database). The first
//! resolution error stops the run; it is reported once with its full cause
//! chain and a captured backtrace, and the verdict becomes [`Verdict::Failed`].

use crate::capability::{
    ImportPath, Resolver, ANALYZER_IMPORT, DATABASE_IMPORT, FRAMEWORK_IMPORTS,
};
use crate::error::{ResolveError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::io::{self, Write};

pub const BANNER: &str = "🧪 Testing MCP Imports";
pub const SUCCESS_BANNER: &str = "🎉 All imports successful!";
const SEPARATOR_WIDTH: usize = 30;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Step {
    pub number: usize,
    pub subject: &'static str,
    pub confirmation: &'static str,
    pub imports: Vec<ImportPath>,
}

/// The three checks, in the order they must run.
pub fn standard_plan() -> Result<Vec<Step>> {
    Ok(vec![
        Step {
            number: 1,
            subject: "basic MCP imports",
            confirmation: "Basic MCP imports successful",
            imports: ImportPath::parse_all(FRAMEWORK_IMPORTS)?,
        },
        Step {
            number: 2,
            subject: "analyzer import",
            confirmation: "Analyzer import successful",
            imports: vec![ImportPath::parse(ANALYZER_IMPORT)?],
        },
        Step {
            number: 3,
            subject: "database import",
            confirmation: "Database import successful",
            imports: vec![ImportPath::parse(DATABASE_IMPORT)?],
        },
    ])
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn passed(self) -> bool {
        self == Verdict::Passed
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Passed => 0,
            Verdict::Failed => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed {
        import: String,
        error: String,
        causes: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub number: usize,
    pub subject: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Outcomes of the steps that were attempted, in order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub verdict: Verdict,
    pub steps: Vec<StepOutcome>,
    pub checked_at: DateTime<Utc>,
}

impl Report {
    fn new(steps: Vec<StepOutcome>, planned: usize) -> Self {
        let all_passed = steps.iter().all(|s| s.status == StepStatus::Passed);
        let verdict = if all_passed && steps.len() == planned {
            Verdict::Passed
        } else {
            Verdict::Failed
        };
        Self {
            verdict,
            steps,
            checked_at: Utc::now(),
        }
    }

    pub fn failed_step(&self) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| matches!(s.status, StepStatus::Failed { .. }))
    }
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

struct StepFailure {
    import: ImportPath,
    error: ResolveError,
    backtrace: Backtrace,
}

impl StepFailure {
    fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(&self.error);
        while let Some(err) = source {
            causes.push(err.to_string());
            source = std::error::Error::source(err);
        }
        causes
    }

    fn write_trace(&self, step: &Step, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Trace:")?;
        writeln!(w, "  step {} ({})", step.number, step.subject)?;
        writeln!(w, "  import {}", self.import)?;
        writeln!(w, "  error: {}", self.error)?;
        for cause in self.causes() {
            writeln!(w, "  caused by: {cause}")?;
        }
        writeln!(w, "stack backtrace:")?;
        writeln!(w, "{}", self.backtrace)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

pub struct Verifier<'r, R: Resolver + ?Sized> {
    resolver: &'r R,
    steps: Vec<Step>,
}

impl<'r, R: Resolver + ?Sized> Verifier<'r, R> {
    pub fn new(resolver: &'r R) -> Result<Self> {
        Ok(Self {
            resolver,
            steps: standard_plan()?,
        })
    }

    /// Run every step, writing the console contract to `out` and the
    /// diagnostic trace of a failure to `diag`.
    ///
    /// Resolution errors never escape; only write errors are returned.
    pub fn run(&self, out: &mut dyn Write, diag: &mut dyn Write) -> io::Result<Report> {
        writeln!(out, "{BANNER}")?;
        writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;

        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            writeln!(out, "{}. Testing {}...", step.number, step.subject)?;

            match self.attempt(step) {
                Ok(()) => {
                    writeln!(out, "✅ {}", step.confirmation)?;
                    outcomes.push(StepOutcome {
                        number: step.number,
                        subject: step.subject.to_string(),
                        status: StepStatus::Passed,
                    });
                }
                Err(failure) => {
                    tracing::debug!(
                        step = step.number,
                        import = %failure.import,
                        error = %failure.error,
                        "capability unavailable"
                    );
                    writeln!(out, "❌ Import failed: {}", failure.error)?;
                    failure.write_trace(step, diag)?;
                    outcomes.push(StepOutcome {
                        number: step.number,
                        subject: step.subject.to_string(),
                        status: StepStatus::Failed {
                            import: failure.import.to_string(),
                            error: failure.error.to_string(),
                            causes: failure.causes(),
                        },
                    });
                    return Ok(Report::new(outcomes, self.steps.len()));
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "{SUCCESS_BANNER}")?;
        Ok(Report::new(outcomes, self.steps.len()))
    }

    fn attempt(&self, step: &Step) -> std::result::Result<(), StepFailure> {
        for import in &step.imports {
            tracing::debug!(step = step.number, import = %import, "resolving");
            if let Err(error) = self.resolver.resolve(import) {
                return Err(StepFailure {
                    import: import.clone(),
                    error,
                    backtrace: Backtrace::force_capture(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
