//! Running rsync jobs with output redirected into a pass log.

use std::fs::File;
use std::io::Write;
use std::process::Stdio;

use chrono::Local;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::invocation::{RsyncInvocation, RunMode};
use super::job::SyncJob;
use super::transport::{Destination, RemoteShell};
use crate::errors::RsyncError;

/// Successful completion of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job: String,
    pub exit_code: i32,
}

/// Executes one rsync invocation, sending its output to `log`.
#[allow(async_fn_in_trait)]
pub trait SyncRunner {
    async fn run_job(&self, invocation: &RsyncInvocation<'_>, log: &File) -> Result<JobOutcome, RsyncError>;
}

/// [`SyncRunner`] that spawns the real `rsync` binary.
#[derive(Debug, Clone)]
pub struct RsyncRunner {
    binary: String,
}

impl RsyncRunner {
    pub fn new() -> Self {
        Self {
            binary: "rsync".into(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for RsyncRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRunner for RsyncRunner {
    #[instrument(skip(self, invocation, log), fields(job = %invocation.job.name, mode = %invocation.mode))]
    async fn run_job(&self, invocation: &RsyncInvocation<'_>, log: &File) -> Result<JobOutcome, RsyncError> {
        let job = invocation.job;
        if !job.source.is_dir() {
            return Err(RsyncError::SourceMissing {
                job: job.name.clone(),
                path: job.source.clone(),
            });
        }

        let args = invocation.args();
        debug!(cmd = %invocation.display_line(), "running rsync");

        let status = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::from(log.try_clone()?))
            .stderr(Stdio::from(log.try_clone()?))
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RsyncError::BinaryNotFound(self.binary.clone())
                } else {
                    RsyncError::IoError(e)
                }
            })?;

        match status.code() {
            Some(0) => {
                info!("rsync job completed");
                Ok(JobOutcome {
                    job: job.name.clone(),
                    exit_code: 0,
                })
            }
            Some(exit_code) => {
                warn!(exit_code, "rsync job failed");
                Err(RsyncError::JobFailed {
                    job: job.name.clone(),
                    exit_code,
                })
            }
            None => Err(RsyncError::Terminated(job.name.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Per-job results of one sync pass.
#[derive(Debug)]
pub struct PassSummary {
    pub mode: RunMode,
    pub succeeded: Vec<JobOutcome>,
    pub failed: Vec<(String, RsyncError)>,
}

impl PassSummary {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Run every job in order, one after another.
///
/// A failing job is recorded and the remaining jobs still run. Each job gets
/// a header line in `log` before its output.
#[instrument(skip_all, fields(destination = %destination, mode = %mode, jobs = jobs.len()))]
pub async fn run_pass<R: SyncRunner>(
    runner: &R,
    jobs: &[SyncJob],
    destination: &Destination,
    shell: RemoteShell,
    mode: RunMode,
    log: &File,
) -> PassSummary {
    let mut summary = PassSummary::new(mode);

    for job in jobs {
        let invocation = RsyncInvocation::new(job, destination, shell, mode);
        let result = match write_header(log, &invocation) {
            Ok(()) => runner.run_job(&invocation, log).await,
            Err(e) => Err(RsyncError::IoError(e)),
        };

        match result {
            Ok(outcome) => summary.succeeded.push(outcome),
            Err(e) => {
                warn!(job = %job.name, error = %e, "job failed, continuing with the next one");
                let _ = writeln!(&*log, "!!! {}", e);
                summary.failed.push((job.name.clone(), e));
            }
        }
    }

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "sync pass finished"
    );
    summary
}

fn write_header(mut log: &File, invocation: &RsyncInvocation<'_>) -> std::io::Result<()> {
    writeln!(
        log,
        "### [{}] {} ({}): {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        invocation.job.name,
        invocation.mode,
        invocation.display_line()
    )?;
    log.flush()
}
