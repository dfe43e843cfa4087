//! Tracing setup.
//!
//! In terminal mode the alternate screen owns stdout/stderr, so events go to a
//! file. Headless runs log to stderr. `RUST_LOG` filters as usual and defaults
//! to `info`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default log file for terminal mode.
pub const DEFAULT_LOG_FILE: &str = "tetris-view.log";

/// Install the global subscriber. Fails if one is already set.
pub fn init(target: &LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
