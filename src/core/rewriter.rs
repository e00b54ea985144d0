// Rewrites the old env root to the new one in every script of the bin directory.
//
// Runs in two passes: every eligible file is read first, so an unreadable or
// binary file stops the run before anything is written. Writes are then applied
// one by one and each failure is recorded in that file's report.

use crate::error::{RepairError, Result};
use crate::report::{FileReport, FileStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Replace every occurrence of `old` with `new` in a single file
///
/// Returns true if the file was rewritten, false if it was left alone.
/// Nothing is opened when `old == new`.
pub fn replace_in_file<P: AsRef<Path>>(path: P, old: &str, new: &str) -> Result<bool> {
    if old == new {
        return Ok(false);
    }

    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RepairError::io(path, e))?;

    match substitute(&content, old, new) {
        Some(updated) => {
            fs::write(path, updated).map_err(|e| RepairError::io(path, e))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn substitute(content: &str, old: &str, new: &str) -> Option<String> {
    if content.contains(old) {
        Some(content.replace(old, new))
    } else {
        None
    }
}

/// List the regular files of a directory, sorted by name
///
/// Symlinks are skipped without following them, as are directories and
/// anything else that is not a plain file.
pub fn eligible_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| RepairError::io(dir, e))? {
        let entry = entry.map_err(|e| RepairError::io(dir, e))?;
        let path = entry.path();
        let file_type = fs::symlink_metadata(&path)
            .map_err(|e| RepairError::io(&path, e))?
            .file_type();

        if file_type.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-regular entry");
        }
    }

    files.sort();
    Ok(files)
}

pub(crate) struct PlannedFile {
    path: PathBuf,
    updated: Option<String>,
}

/// Bulk rewriter for one old/new root pair
pub struct Rewriter {
    old: String,
    new: String,
    dry_run: bool,
}

impl Rewriter {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            dry_run: false,
        }
    }

    /// Report what would change without writing anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite every eligible file in `dir`
    ///
    /// # Returns
    /// * `Ok(Vec<FileReport>)` - One entry per regular file; empty when old and new match
    /// * `Err(RepairError)` - A file could not be listed, read or decoded; nothing was written
    pub fn run<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<FileReport>> {
        if self.old == self.new {
            debug!("old and new path are equal, nothing to rewrite");
            return Ok(Vec::new());
        }

        let plan = self.plan(dir.as_ref())?;
        Ok(self.apply(plan))
    }

    /// Read every eligible file in `dir` and work out its new content
    pub(crate) fn plan(&self, dir: &Path) -> Result<Vec<PlannedFile>> {
        eligible_files(dir)?
            .into_iter()
            .map(|path| -> Result<PlannedFile> {
                let content = fs::read_to_string(&path).map_err(|e| RepairError::io(&path, e))?;
                let updated = substitute(&content, &self.old, &self.new);
                Ok(PlannedFile { path, updated })
            })
            .collect()
    }

    /// Write a plan out, one report per file; a failed write does not stop the rest
    pub(crate) fn apply(&self, plan: Vec<PlannedFile>) -> Vec<FileReport> {
        let reports: Vec<FileReport> = plan.into_iter().map(|file| self.commit(file)).collect();

        info!(
            files = reports.len(),
            changed = reports.iter().filter(|r| r.is_changed()).count(),
            dry_run = self.dry_run,
            "rewrite finished"
        );

        reports
    }

    fn commit(&self, file: PlannedFile) -> FileReport {
        let Some(updated) = file.updated else {
            return FileReport::new(file.path, FileStatus::Unchanged);
        };

        if self.dry_run {
            return FileReport::new(file.path, FileStatus::Changed);
        }

        match fs::write(&file.path, updated) {
            Ok(()) => {
                debug!(path = %file.path.display(), "rewrote");
                FileReport::new(file.path, FileStatus::Changed)
            }
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "write failed");
                FileReport::new(
                    file.path,
                    FileStatus::Failed {
                        error: e.to_string(),
                    },
                )
            }
        }
    }
}
