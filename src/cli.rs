// Command dispatcher: turns the argument list into a repair run and prints status lines.
//
// Kept out of main.rs so the whole flow can be driven from tests with a fake
// working directory and a captured output buffer.

use crate::core::{EnvLayout, PathDetector, Rewriter};
use crate::error::{RepairError, Result};
use crate::report::{FileStatus, Outcome, RepairReport};
use crate::status::Status;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

pub const USAGE: &str = "Usage: venv-repair <env-path> [--dry-run] [--json]";

/// Options parsed from the command line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    pub env_path: Option<String>,
    pub help: bool,
    pub dry_run: bool,
    pub json: bool,
}

impl RepairOptions {
    /// Parse arguments (without the program name)
    ///
    /// Only the first positional argument is used; later ones are ignored.
    pub fn parse(args: &[String]) -> Self {
        let mut options = Self::default();

        for arg in args {
            match arg.as_str() {
                "--help" => options.help = true,
                "--dry-run" => options.dry_run = true,
                "--json" => options.json = true,
                flag if flag.starts_with("--") => warn!("ignoring unknown flag {}", flag),
                positional => {
                    if options.env_path.is_none() {
                        options.env_path = Some(positional.to_string());
                    } else {
                        debug!("ignoring extra argument {}", positional);
                    }
                }
            }
        }

        options
    }
}

// Status lines are suppressed in JSON mode; the report is printed instead.
struct Printer<'a, W: Write> {
    out: &'a mut W,
    quiet: bool,
}

impl<W: Write> Printer<'_, W> {
    fn status(&mut self, status: Status, message: &str) -> Result<()> {
        if !self.quiet {
            writeln!(self.out, "{} {}", status, message)?;
        }
        Ok(())
    }

    fn line(&mut self, message: &str) -> Result<()> {
        if !self.quiet {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }
}

/// Run the tool
///
/// # Arguments
/// * `args` - Command-line arguments without the program name
/// * `cwd` - Directory relative env paths are resolved against
/// * `out` - Where status lines (or the JSON report) go
///
/// # Returns
/// * `Ok(RepairReport)` - What happened, including handled failures like a missing marker
/// * `Err(RepairError)` - A file could not be read or decoded; nothing was written
pub fn run<W: Write>(args: &[String], cwd: &Path, out: &mut W) -> Result<RepairReport> {
    let options = RepairOptions::parse(args);

    if options.help {
        writeln!(out, "{}", USAGE)?;
        return Ok(RepairReport::new(Outcome::Help));
    }

    let mut printer = Printer {
        out: &mut *out,
        quiet: options.json,
    };
    let report = repair(&options, cwd, &mut printer)?;

    if options.json {
        let json = serde_json::to_string_pretty(&report)?;
        writeln!(out, "{}", json)?;
    }

    Ok(report)
}

fn repair<W: Write>(
    options: &RepairOptions,
    cwd: &Path,
    printer: &mut Printer<'_, W>,
) -> Result<RepairReport> {
    let Some(env_path) = options.env_path.as_deref() else {
        printer.status(Status::Error, &RepairError::MissingArgument.user_message())?;
        printer.line("Use --help for usage instructions")?;
        return Ok(RepairReport::new(Outcome::MissingArgument));
    };

    let layout = EnvLayout::resolve(env_path, cwd);
    let new_path = layout.root_str();

    let mut report = RepairReport::new(Outcome::Updated);
    report.env_path = Some(new_path.clone());

    let detector = PathDetector::new()?;
    let old_path = match detector.detect(&layout) {
        Ok(Some(old_path)) => old_path,
        Ok(None) => {
            let err = RepairError::MarkerNotFound(layout.marker_path());
            printer.status(Status::Error, &err.user_message())?;
            printer.line("Please check if the given env path is correct")?;
            report.outcome = Outcome::MarkerNotFound;
            return Ok(report);
        }
        Err(err @ RepairError::MalformedShebang { .. }) => {
            printer.status(Status::Error, &err.user_message())?;
            report.outcome = Outcome::MalformedMarker;
            return Ok(report);
        }
        Err(err) => return Err(err),
    };
    report.previous_path = Some(old_path.clone());

    if old_path == new_path {
        printer.status(Status::Ok, "Already up-to-date")?;
        report.outcome = Outcome::UpToDate;
        return Ok(report);
    }

    report.files = Rewriter::new(old_path, new_path)
        .dry_run(options.dry_run)
        .run(layout.bin_dir())?;

    if options.dry_run {
        report.outcome = Outcome::DryRun;
        printer.status(
            Status::Ok,
            &format!("Dry run, {} file(s) would change", report.changed_count()),
        )?;
        for file in report.files.iter().filter(|f| f.is_changed()) {
            printer.line(&format!("  {}", file.path.display()))?;
        }
        return Ok(report);
    }

    finish_update(&mut report, printer)?;
    Ok(report)
}

// Prints the final status of a real (non dry-run) rewrite and settles the outcome.
fn finish_update<W: Write>(report: &mut RepairReport, printer: &mut Printer<'_, W>) -> Result<()> {
    let failures: Vec<String> = report
        .failures()
        .filter_map(|f| match &f.status {
            FileStatus::Failed { error } => {
                Some(format!("could not write {}: {}", f.path.display(), error))
            }
            _ => None,
        })
        .collect();

    if failures.is_empty() {
        report.outcome = Outcome::Updated;
        printer.status(Status::Ok, "Updated")?;
    } else {
        for failure in &failures {
            printer.status(Status::Error, failure)?;
        }
        printer.status(Status::Error, "Update incomplete")?;
        report.outcome = Outcome::Incomplete;
    }

    Ok(())
}
