//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout, so in TUI mode logs go to
//! `~/.guild-dash/guild-dash.log`. Headless runs log to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "guild_dash=info";
const LOG_DIR: &str = ".guild-dash";
const LOG_FILE: &str = "guild-dash.log";

/// Where the TUI log file lives, if a home directory exists.
pub fn log_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_DIR).join(LOG_FILE))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(headless: bool) -> std::io::Result<()> {
    if headless {
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return Ok(());
    }

    // No home directory: run without a log file rather than draw over the UI
    let Some(path) = log_file_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}
