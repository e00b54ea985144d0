/// Error types for venv-repair
///
/// This module defines all possible errors that can occur while repairing an environment.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for venv-repair operations
#[derive(Error, Debug)]
pub enum RepairError {
    /// No env-path was given on the command line
    #[error("Argument env-path missing")]
    MissingArgument,

    /// The marker script does not exist inside the executable directory
    #[error("Marker script not found: {0}")]
    MarkerNotFound(PathBuf),

    /// The marker script exists but its first line is not a usable interpreter line
    #[error("Malformed interpreter line in {path}: {line:?}")]
    MalformedShebang { path: PathBuf, line: String },

    /// I/O errors tied to a specific path
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content could not be decoded as UTF-8 text
    #[error("Not a text file: {0}")]
    NotText(PathBuf),

    /// Writing status output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Regex compilation error
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for venv-repair operations
pub type Result<T> = std::result::Result<T, RepairError>;

impl RepairError {
    /// Wrap an I/O error together with the path it happened on.
    ///
    /// Invalid UTF-8 is reported as [`RepairError::NotText`] rather than a generic I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::InvalidData {
            RepairError::NotText(path)
        } else {
            RepairError::Io { path, source }
        }
    }

    /// Convert RepairError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RepairError::MissingArgument => "Argument env-path missing".to_string(),
            RepairError::MarkerNotFound(_) => "cannot find pip inside bin directory".to_string(),
            RepairError::MalformedShebang { path, line } => {
                format!(
                    "cannot read the original env path from {} (first line: {:?})",
                    path.display(),
                    line
                )
            }
            RepairError::Io { path, source } => {
                format!(
                    "File system error on {}. Check permissions. Details: {}",
                    path.display(),
                    source
                )
            }
            RepairError::NotText(path) => {
                format!("{} is not a text file, nothing was rewritten", path.display())
            }
            RepairError::Output(e) => format!("Could not write output: {}", e),
            RepairError::Pattern(e) => format!("Internal pattern error: {}", e),
            RepairError::Logging(msg) => format!("Could not set up logging: {}", msg),
            RepairError::Serialization(e) => format!("Data format error: {}", e),
        }
    }
}
