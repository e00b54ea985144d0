// venv-repair - fixes a virtualenv's scripts after the env directory was moved
//
// This is the main entry point. Sets up logging and hands the args to the dispatcher.

use anyhow::Context;
use std::env;
use std::io;
use std::process::ExitCode;
use venv_repair_lib::{cli, logging, status::Status};

fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging().context("failed to initialize logging")?;

    let args: Vec<String> = env::args().skip(1).collect();
    let cwd = env::current_dir().context("could not determine the working directory")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli::run(&args, &cwd, &mut out) {
        Ok(report) if report.outcome.is_success() => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(e) => {
            eprintln!("{} {}", Status::Error, e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
