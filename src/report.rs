/// Run reports
///
/// Plain serializable records of what a repair did, printed as JSON with `--json`.

use serde::Serialize;
use std::path::PathBuf;

/// What happened to a single file in the executable directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Changed,
    Unchanged,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    pub fn new(path: PathBuf, status: FileStatus) -> Self {
        Self { path, status }
    }

    pub fn is_changed(&self) -> bool {
        self.status == FileStatus::Changed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Overall result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Help,
    MissingArgument,
    MarkerNotFound,
    MalformedMarker,
    UpToDate,
    Updated,
    DryRun,
    Incomplete,
}

impl Outcome {
    /// Whether the outcome counts as success for the exit code
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Incomplete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub outcome: Outcome,
    pub env_path: Option<String>,
    pub previous_path: Option<String>,
    pub files: Vec<FileReport>,
}

impl RepairReport {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            env_path: None,
            previous_path: None,
            files: Vec::new(),
        }
    }

    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_changed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_failed())
    }
}
