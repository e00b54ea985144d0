/// venv-repair library
///
/// Fixes the shebang lines of a virtual environment after it has been moved.

pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod report;
pub mod status;

// Re-exports for convenience
pub use error::{RepairError, Result};
pub use report::{FileReport, FileStatus, Outcome, RepairReport};
