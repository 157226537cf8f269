use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PREFLIGHT_DIR: &str = ".preflight";
pub const CONFIG_FILE: &str = ".preflight/config.yaml";

pub const CACHE_DIR: &str = "data/cache";
pub const PROCESSED_DIR: &str = "data/processed";
pub const RAW_DIR: &str = "data/raw";
pub const CONFIG_DIR: &str = "config";
pub const DOCS_DIR: &str = "docs";
pub const TESTS_DIR: &str = "tests";

pub const CLINICAL_TRIALS_DB: &str = "data/processed/clinical_trials.db";
pub const RESULTS_DB: &str = "data/processed/trial_analysis_results.db";

/// Directories the deployment expects, with their display names.
pub const LAYOUT_DIRS: &[(&str, &str)] = &[
    ("Cache Directory", CACHE_DIR),
    ("Processed Directory", PROCESSED_DIR),
    ("Raw Directory", RAW_DIR),
    ("Config Directory", CONFIG_DIR),
    ("Docs Directory", DOCS_DIR),
    ("Tests Directory", TESTS_DIR),
];

pub const DATABASES: &[(&str, &str)] = &[
    ("Clinical trials database", CLINICAL_TRIALS_DB),
    ("Results database", RESULTS_DB),
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn preflight_dir(root: &Path) -> PathBuf {
    root.join(PREFLIGHT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn cache_file(root: &Path, filename: &str) -> PathBuf {
    root.join(CACHE_DIR).join(filename)
}

pub fn processed_file(root: &Path, filename: &str) -> PathBuf {
    root.join(PROCESSED_DIR).join(filename)
}

pub fn raw_file(root: &Path, filename: &str) -> PathBuf {
    root.join(RAW_DIR).join(filename)
}

// ---------------------------------------------------------------------------
// Layout validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    NotADirectory,
    MissingDatabase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutIssue {
    pub kind: IssueKind,
    pub name: String,
    pub path: PathBuf,
}

impl LayoutIssue {
    pub fn message(&self) -> String {
        let path = self.path.display();
        match self.kind {
            IssueKind::Missing => format!("{} does not exist: {path}", self.name),
            IssueKind::NotADirectory => format!("{} is not a directory: {path}", self.name),
            IssueKind::MissingDatabase => format!("{} not found: {path}", self.name),
        }
    }
}

/// Check the data layout under `root`. Directories are reported first, then
/// databases.
pub fn validate_layout(root: &Path) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();

    for (name, rel) in LAYOUT_DIRS {
        let path = root.join(rel);
        let kind = if !path.exists() {
            IssueKind::Missing
        } else if !path.is_dir() {
            IssueKind::NotADirectory
        } else {
            continue;
        };
        issues.push(LayoutIssue {
            kind,
            name: name.to_string(),
            path,
        });
    }

    for (name, rel) in DATABASES {
        let path = root.join(rel);
        if !path.exists() {
            issues.push(LayoutIssue {
                kind: IssueKind::MissingDatabase,
                name: name.to_string(),
                path,
            });
        }
    }

    issues
}

/// Create any missing layout directories. Returns the ones created.
/// Databases are never created here.
pub fn ensure_layout(root: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for (_, rel) in LAYOUT_DIRS {
        let path = root.join(rel);
        if path.is_dir() {
            continue;
        }
        std::fs::create_dir_all(&path)?;
        tracing::info!(path = %path.display(), "created directory");
        created.push(path);
    }
    Ok(created)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
