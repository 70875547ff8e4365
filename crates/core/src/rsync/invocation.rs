//! rsync command-line construction.

use std::fmt;

use super::job::SyncJob;
use super::transport::{Destination, RemoteShell};

/// Simulate or really transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    DryRun,
    Real,
}

impl RunMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => write!(f, "dry run"),
            Self::Real => write!(f, "run"),
        }
    }
}

/// Update-if-newer, keep permissions and timestamps, report what changed.
const BASE_FLAGS: &[&str] = &[
    "--recursive",
    "--update",
    "--perms",
    "--times",
    "--verbose",
    "--human-readable",
];

/// Everything needed to spell out one rsync command line.
#[derive(Debug, Clone)]
pub struct RsyncInvocation<'a> {
    pub job: &'a SyncJob,
    pub destination: &'a Destination,
    pub shell: RemoteShell,
    pub mode: RunMode,
}

impl<'a> RsyncInvocation<'a> {
    pub fn new(job: &'a SyncJob, destination: &'a Destination, shell: RemoteShell, mode: RunMode) -> Self {
        Self {
            job,
            destination,
            shell,
            mode,
        }
    }

    /// Arguments after the `rsync` program name.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = BASE_FLAGS.iter().map(|s| s.to_string()).collect();

        if self.mode.is_dry_run() {
            args.push("--dry-run".into());
        }
        if self.job.delete {
            args.push("--delete".into());
        }
        args.extend(self.job.excludes.iter().map(|p| format!("--exclude={}", p)));
        if let Some(rsh) = self.shell.rsh_arg() {
            args.push(rsh);
        }

        args.push(self.job.source_arg());
        args.push(self.destination.remote_spec(&self.job.remote_dir));
        args
    }

    /// Human-readable command line for log headers.
    pub fn display_line(&self) -> String {
        let quoted: Vec<String> = self
            .args()
            .into_iter()
            .map(|a| if a.contains(' ') { format!("'{}'", a) } else { a })
            .collect();
        format!("rsync {}", quoted.join(" "))
    }
}
