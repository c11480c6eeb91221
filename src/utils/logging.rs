//! Optional diagnostic logging for ie.
//!
//! The screen belongs to the TUI, so nothing is ever logged to stdout or stderr. When
//! `IE_LOG` is set (an `EnvFilter` directive such as `debug` or `ie_tui=trace`), events
//! are appended to `IE_LOG_FILE`, or to `ie/ie.log` under the user's cache directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "IE_LOG";
pub const LOG_FILE_ENV: &str = "IE_LOG_FILE";

/// Where log output goes when logging is enabled.
pub fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::cache_dir().map(|dir| dir.join("ie").join("ie.log"))
}

/// Installs the global subscriber if `IE_LOG` is set. Returns whether logging is on.
///
/// An unparsable directive falls back to `warn`. Failing to open the log file is an error.
pub fn init_logging() -> io::Result<bool> {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return Ok(false);
    };
    let Some(path) = log_path() else {
        return Ok(false);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(path = %path.display(), "logging started");
    }
    Ok(installed)
}
