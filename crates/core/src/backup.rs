//! The rsync-via-ssh backup workflow.
//!
//! A linear sequence of stages; only the input loops go backwards:
//!
//! 1. discover the local outbound address (fatal on failure)
//! 2. resolve the destination address and port (prompted or from flags)
//! 3. build the `user@host` identity and SSH transport
//! 4. optionally run a dry pass, log it, and show the log
//! 5. confirm, then run the real pass into the main log
//!
//! Every pass runs all jobs in order and collects per-job failures rather
//! than aborting on the first one.

use std::net::Ipv4Addr;

use tracing::{info, instrument, warn};

use crate::errors::{CoreError, PromptError};
use crate::logs::{open_append, LogPaths};
use crate::network::RouteProbe;
use crate::pager::LogViewer;
use crate::prompt::{ask_until, confirm, confirm_default_yes, Prompter};
use crate::rsync::{run_pass, Destination, PassSummary, RemoteShell, RunMode, SyncJob, SyncRunner};
use crate::validate::{parse_ipv4, parse_port};

pub const PROMPT_DEST: &str = "IP address of Destination";
pub const PROMPT_PORT: &str = "Port number";
pub const PROMPT_DRY_RUN: &str = "Do a DRY RUN? [Y/n]";
pub const PROMPT_RUN: &str = "Run rsync now? [y/n]";

/// Destination inputs as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    /// Prompt for destination and port instead of reading flags.
    pub interactive: bool,
    pub dest: Option<String>,
    pub port: Option<String>,
}

/// Everything resolved before the workflow starts.
#[derive(Debug, Clone)]
pub struct BackupSettings {
    pub user: String,
    pub jobs: Vec<SyncJob>,
    pub logs: LogPaths,
}

/// How a workflow run ended, short of a fatal error.
#[derive(Debug)]
pub enum BackupOutcome {
    /// The real pass ran (possibly with failed jobs).
    Completed {
        dry_run: Option<PassSummary>,
        run: PassSummary,
    },
    /// The user answered no to the final question.
    Declined { dry_run: Option<PassSummary> },
}

impl BackupOutcome {
    pub fn dry_run(&self) -> Option<&PassSummary> {
        match self {
            Self::Completed { dry_run, .. } | Self::Declined { dry_run } => dry_run.as_ref(),
        }
    }
}

/// Backup workflow bound to its external collaborators.
pub struct BackupWorkflow<'a, P, R, V> {
    probe: &'a P,
    runner: &'a R,
    viewer: &'a V,
}

impl<'a, P, R, V> BackupWorkflow<'a, P, R, V>
where
    P: RouteProbe,
    R: SyncRunner,
    V: LogViewer,
{
    pub fn new(probe: &'a P, runner: &'a R, viewer: &'a V) -> Self {
        Self {
            probe,
            runner,
            viewer,
        }
    }

    /// Run every stage in order.
    #[instrument(skip_all, fields(interactive = options.interactive, user = %settings.user))]
    pub async fn run(
        &self,
        prompter: &mut dyn Prompter,
        options: &BackupOptions,
        settings: &BackupSettings,
    ) -> Result<BackupOutcome, CoreError> {
        let source = self.probe.source_address().await?;
        prompter.inform(&format!("IP address of Source: {}", source));

        let (host, port) = if options.interactive {
            prompt_destination(prompter)?
        } else {
            destination_from_flags(options)?
        };

        let destination = Destination::new(settings.user.clone(), host);
        let shell = RemoteShell::with_port(port);
        info!(destination = %destination, port = ?port, "destination resolved");
        prompter.inform(&match port {
            Some(p) => format!("Destination: {} (port {})", destination, p),
            None => format!("Destination: {}", destination),
        });

        let dry_run = if confirm_default_yes(prompter, PROMPT_DRY_RUN)? {
            let summary = self
                .pass(settings, &destination, shell, RunMode::DryRun)
                .await?;
            let path = &settings.logs.dry_run;
            prompter.inform(&format!("\nLogs of the dry run saved to:\n{}", path.display()));
            if let Err(e) = self.viewer.show(path).await {
                warn!(error = %e, "could not display dry-run log");
                prompter.warn(&format!("Could not open the dry-run log: {}", e));
            }
            Some(summary)
        } else {
            None
        };

        if !confirm(prompter, PROMPT_RUN)? {
            info!("user declined the real run");
            return Ok(BackupOutcome::Declined { dry_run });
        }

        let run = self
            .pass(settings, &destination, shell, RunMode::Real)
            .await?;
        prompter.inform(&format!(
            "\nLogs of the run saved to:\n{}",
            settings.logs.run.display()
        ));

        Ok(BackupOutcome::Completed { dry_run, run })
    }

    async fn pass(
        &self,
        settings: &BackupSettings,
        destination: &Destination,
        shell: RemoteShell,
        mode: RunMode,
    ) -> Result<PassSummary, CoreError> {
        let path = if mode.is_dry_run() {
            &settings.logs.dry_run
        } else {
            &settings.logs.run
        };
        let log = open_append(path)?;
        Ok(run_pass(self.runner, &settings.jobs, destination, shell, mode, &log).await)
    }
}

fn prompt_destination(prompter: &mut dyn Prompter) -> Result<(Ipv4Addr, Option<u16>), PromptError> {
    let host = ask_until(prompter, PROMPT_DEST, "Invalid IP address. Try again.", parse_ipv4)?;
    let port = ask_until(prompter, PROMPT_PORT, "Invalid port number. Try again.", parse_port)?;
    Ok((host, Some(port)))
}

fn destination_from_flags(options: &BackupOptions) -> Result<(Ipv4Addr, Option<u16>), CoreError> {
    let dest = options
        .dest
        .as_deref()
        .ok_or_else(|| CoreError::Missing("IP address of Destination is not set.".into()))?;
    let host = parse_ipv4(dest)?;
    let port = options.port.as_deref().map(parse_port).transpose()?;
    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_from_flags() {
        let options = BackupOptions {
            interactive: false,
            dest: Some("10.0.0.5".into()),
            port: Some("2222".into()),
        };
        assert_eq!(
            destination_from_flags(&options).unwrap(),
            (Ipv4Addr::new(10, 0, 0, 5), Some(2222))
        );
    }

    #[test]
    fn test_destination_from_flags_without_port() {
        let options = BackupOptions {
            dest: Some("10.0.0.5".into()),
            ..Default::default()
        };
        assert_eq!(destination_from_flags(&options).unwrap().1, None);
    }

    #[test]
    fn test_missing_destination_is_fatal() {
        assert!(matches!(
            destination_from_flags(&BackupOptions::default()),
            Err(CoreError::Missing(_))
        ));
    }

    #[test]
    fn test_invalid_flags_are_fatal() {
        let options = BackupOptions {
            dest: Some("10.0.0.500".into()),
            ..Default::default()
        };
        assert!(matches!(
            destination_from_flags(&options),
            Err(CoreError::Validation(_))
        ));

        let options = BackupOptions {
            dest: Some("10.0.0.5".into()),
            port: Some("70000".into()),
            ..Default::default()
        };
        assert!(matches!(
            destination_from_flags(&options),
            Err(CoreError::Validation(_))
        ));
    }
}
