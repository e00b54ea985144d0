use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::error::{RepairError, Result};

static LOGGING_INIT: Once = Once::new();

/// Initializes diagnostic logging on stderr.
///
/// Stdout carries the status lines, so log output never goes there. The level
/// comes from `RUST_LOG` and defaults to `warn`. Repeated calls are no-ops.
pub fn init_logging() -> Result<()> {
    let mut init_result = Ok(());

    LOGGING_INIT.call_once(|| {
        init_result = tracing_subscriber::fmt()
            .with_env_filter(default_env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| RepairError::Logging(error.to_string()));
    });

    init_result
}

fn default_env_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn"),
    }
}
