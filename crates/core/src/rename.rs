//! Whitespace-to-underscore filename normalization.
//!
//! A [`RenamePlan`] is built from a single, non-recursive pass over one
//! directory. Hidden entries (leading `.`) are never touched. Every other
//! entry whose name contains a space is mapped to the same name with each
//! space replaced by `_`.
//!
//! Applying a plan attempts every entry and reports per-entry failures in a
//! [`RenameReport`] instead of stopping at the first one. Existing files are
//! never overwritten.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::errors::RenameError;

/// Compute the normalized name for a single directory entry.
///
/// Returns `None` when the entry should be left alone: hidden names and
/// names without a space.
pub fn normalized_name(name: &str) -> Option<String> {
    if name.starts_with('.') || !name.contains(' ') {
        return None;
    }
    Some(name.replace(' ', "_"))
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Mapping from original path to normalized path, ordered by source path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    entries: BTreeMap<PathBuf, PathBuf>,
}

/// A target path that cannot be reached without losing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameConflict {
    /// Several sources normalize to the same target.
    SharedTarget {
        target: PathBuf,
        sources: Vec<PathBuf>,
    },
    /// The target already exists on disk and is not part of the plan.
    TargetExists { source: PathBuf, target: PathBuf },
}

impl RenamePlan {
    /// Scan `dir` and build the plan.
    pub fn scan(dir: &Path) -> Result<Self, RenameError> {
        Self::scan_filtered(dir, &[])
    }

    /// Scan `dir`, leaving alone any name that matches one of the glob
    /// `ignore_patterns`.
    #[instrument(skip(ignore_patterns), fields(dir = %dir.display()))]
    pub fn scan_filtered(dir: &Path, ignore_patterns: &[String]) -> Result<Self, RenameError> {
        if !dir.is_dir() {
            return Err(RenameError::NotADirectory(dir.to_path_buf()));
        }

        let read_err = |source: std::io::Error| RenameError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = BTreeMap::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!(name = ?file_name, "skipping non-UTF-8 file name");
                continue;
            };

            if let Some(pattern) = ignore_patterns
                .iter()
                .find(|p| glob_match::glob_match(p, name))
            {
                debug!(name, pattern = %pattern, "skipping ignored file name");
                continue;
            }

            if let Some(new_name) = normalized_name(name) {
                entries.insert(dir.join(name), dir.join(new_name));
            }
        }

        info!(count = entries.len(), "rename plan built");
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate `(from, to)` pairs in source-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_path(), v.as_path()))
    }

    /// Report targets that would collide, either with each other or with
    /// files already on disk. Nothing is resolved here.
    pub fn conflicts(&self) -> Vec<RenameConflict> {
        let mut by_target: HashMap<&Path, Vec<PathBuf>> = HashMap::new();
        for (from, to) in &self.entries {
            by_target.entry(to.as_path()).or_default().push(from.clone());
        }

        let mut conflicts = Vec::new();
        for (from, to) in &self.entries {
            let sources = &by_target[to.as_path()];
            if sources.len() > 1 {
                if sources[0] == *from {
                    conflicts.push(RenameConflict::SharedTarget {
                        target: to.clone(),
                        sources: sources.clone(),
                    });
                }
            } else if to.symlink_metadata().is_ok() && !self.entries.contains_key(to) {
                conflicts.push(RenameConflict::TargetExists {
                    source: from.clone(),
                    target: to.clone(),
                });
            }
        }
        conflicts
    }

    /// Apply every rename in the plan.
    ///
    /// Each entry is attempted independently. A destination that already
    /// exists is refused with [`RenameError::DestinationExists`].
    #[instrument(skip(self), fields(count = self.entries.len()))]
    pub fn apply(&self) -> RenameReport {
        let mut report = RenameReport::default();

        for (from, to) in &self.entries {
            if to.symlink_metadata().is_ok() {
                warn!(from = %from.display(), to = %to.display(), "destination exists, skipping");
                report
                    .failed
                    .push((from.clone(), RenameError::DestinationExists(to.clone())));
                continue;
            }

            match std::fs::rename(from, to) {
                Ok(()) => {
                    debug!(from = %from.display(), to = %to.display(), "renamed");
                    report.renamed.push((from.clone(), to.clone()));
                }
                Err(source) => {
                    warn!(from = %from.display(), error = %source, "rename failed");
                    report.failed.push((
                        from.clone(),
                        RenameError::RenameFailed {
                            from: from.clone(),
                            to: to.clone(),
                            source,
                        },
                    ));
                }
            }
        }

        info!(
            renamed = report.renamed.len(),
            failed = report.failed.len(),
            "rename plan applied"
        );
        report
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of [`RenamePlan::apply`].
#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, RenameError)>,
}

impl RenameReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
