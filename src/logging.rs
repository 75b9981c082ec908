//! Log setup.
//!
//! The terminal belongs to the UI, so log output goes to a file. Without a
//! file no subscriber is installed and `tracing` macros are no-ops.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides `level` when set.
pub fn init_logging(path: Option<&Path>, level: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(())
}
