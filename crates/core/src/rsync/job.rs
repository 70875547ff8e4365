//! Backup job definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One directory copied to the remote host per sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    /// Short label used in logs and summaries.
    pub name: String,

    /// Local directory. Copied as a directory (no trailing slash), so it
    /// lands as `<remote_dir>/<basename>` on the remote side.
    pub source: PathBuf,

    /// Remote parent directory, relative to the remote home when not
    /// absolute. Empty means the remote home itself.
    #[serde(default)]
    pub remote_dir: String,

    /// rsync `--exclude` patterns.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Remove remote files that no longer exist locally.
    #[serde(default)]
    pub delete: bool,
}

impl SyncJob {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            remote_dir: String::new(),
            excludes: Vec::new(),
            delete: false,
        }
    }

    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    /// Source path as handed to rsync, with any trailing separator removed.
    pub fn source_arg(&self) -> String {
        let s = self.source.to_string_lossy();
        let trimmed = s.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Installer bundles kept out of the scripts backup.
pub const INSTALLER_BUNDLE_PATTERNS: &[&str] = &["*.AppImage", "*.run", "*.deb", "*.rpm"];

/// The two built-in jobs: personal scripts and configuration files.
pub fn default_jobs(home: &Path) -> Vec<SyncJob> {
    vec![
        SyncJob::new("bin", home.join("bin")).with_excludes(INSTALLER_BUNDLE_PATTERNS.iter().copied()),
        SyncJob::new("config-files", home.join("config-files")).with_delete(true),
    ]
}
