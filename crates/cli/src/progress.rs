//! Spinner shown while an rsync job runs.

use std::fs::File;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use homeutils_core::errors::RsyncError;
use homeutils_core::rsync::{JobOutcome, RsyncInvocation, SyncRunner};

use crate::style;

/// Wraps another [`SyncRunner`] with a spinner and a one-line result.
#[derive(Debug, Clone)]
pub struct SpinnerRunner<R> {
    inner: R,
}

impl<R> SpinnerRunner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: SyncRunner> SyncRunner for SpinnerRunner<R> {
    async fn run_job(&self, invocation: &RsyncInvocation<'_>, log: &File) -> Result<JobOutcome, RsyncError> {
        let label = format!(
            "{} {}",
            style::mode_label(invocation.mode.is_dry_run()),
            invocation.job.name
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(format!("{} ...", label));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.run_job(invocation, log).await;

        spinner.finish_and_clear();
        match &result {
            Ok(_) => println!("  {}", style::success(&label)),
            Err(e) => println!("  {}", style::error(&format!("{}: {}", label, e))),
        }
        result
    }
}
