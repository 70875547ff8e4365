//! Log file naming and placement for sync passes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};

use crate::errors::CoreError;

/// Namespace for the per-user cache and config directories.
pub const PROGRAM_NAME: &str = "rsync-via-ssh";

/// Timestamp format shared by both log files of one run.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";

/// The two log files of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub dir: PathBuf,
    pub run: PathBuf,
    pub dry_run: PathBuf,
}

impl LogPaths {
    pub fn new<Tz: TimeZone>(dir: impl Into<PathBuf>, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let dir = dir.into();
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        Self {
            run: dir.join(format!("{}.log", stamp)),
            dry_run: dir.join(format!("DRY-RUN-{}.log", stamp)),
            dir,
        }
    }
}

/// `<cache_dir>/rsync-via-ssh/log`, falling back to `~/.cache` when the
/// platform reports no cache directory.
pub fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(PROGRAM_NAME)
        .join("log")
}

/// Pick the log directory.
///
/// `flag` (from `--log-dir`) wins if it is an existing directory; otherwise a
/// warning is returned and the choice falls through. A `configured`
/// directory is taken as is and created when the first log is opened.
/// `fallback` is used last.
pub fn resolve_log_dir(
    flag: Option<&Path>,
    configured: Option<PathBuf>,
    fallback: PathBuf,
) -> (PathBuf, Option<String>) {
    if let Some(dir) = flag {
        if dir.is_dir() {
            return (dir.to_path_buf(), None);
        }
    }
    let chosen = configured.unwrap_or(fallback);
    let warning = flag.map(|dir| {
        let msg = format!(
            "log directory '{}' is not accessible, using '{}'",
            dir.display(),
            chosen.display()
        );
        warn!("{}", msg);
        msg
    });
    (chosen, warning)
}

/// Open `path` for appending, creating it and its parent directories.
pub fn open_append(path: &Path) -> Result<File, CoreError> {
    let log_err = |source: std::io::Error| CoreError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(log_err)?;
        }
    }
    debug!(path = %path.display(), "opening log file");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_err)
}
