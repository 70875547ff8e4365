//! Back up home-directory folders to another host with rsync over SSH.
//!
//! Shows the local outbound address, resolves the destination (prompted or
//! from flags), offers a dry run whose log is paged, then asks before the
//! real run. Both passes are logged under the log directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::debug;

use homeutils_cli::logging::init_tracing;
use homeutils_cli::progress::SpinnerRunner;
use homeutils_cli::report::pass_table;
use homeutils_cli::style;
use homeutils_cli::terminal::TerminalPrompter;
use homeutils_core::backup::{BackupOptions, BackupOutcome, BackupSettings, BackupWorkflow};
use homeutils_core::config::BackupConfig;
use homeutils_core::errors::CoreError;
use homeutils_core::logs::{default_log_dir, resolve_log_dir, LogPaths};
use homeutils_core::network::IpRouteProbe;
use homeutils_core::pager::PagerViewer;
use homeutils_core::rsync::{PassSummary, RsyncRunner};

/// Sync files and directories between two hosts with rsync via SSH.
#[derive(Parser, Debug)]
#[command(name = "rsync-via-ssh", version, about)]
struct Cli {
    /// Prompt for the destination address and port.
    #[arg(short, long)]
    interactive: bool,

    /// IP address of the destination host.
    #[arg(short, long = "dest", value_name = "IP")]
    dest: Option<String>,

    /// SSH port on the destination host.
    #[arg(short, long)]
    port: Option<String>,

    /// Directory where the log files of this run are saved.
    #[arg(long, value_name = "PATH")]
    log_dir: Option<PathBuf>,

    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Remote login name (defaults to the config value, then $USER).
    #[arg(long)]
    user: Option<String>,

    /// Do not open the dry-run log in a pager.
    #[arg(long)]
    no_pager: bool,

    /// Show debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config =
        BackupConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let home = dirs::home_dir().context("could not determine the home directory")?;
    let user = config
        .resolve_user(cli.user.as_deref())
        .context("could not determine the remote user")?;

    let (log_dir, warning) = resolve_log_dir(
        cli.log_dir.as_deref(),
        config.log_dir(&home),
        default_log_dir(),
    );
    if let Some(warning) = warning {
        eprintln!("{}", style::warn(&format!("Warning: {}", warning)));
    }
    println!("{}", style::dim(&format!("Log directory: {}", log_dir.display())));

    let jobs = config.resolve_jobs(&home);
    debug!(user = %user, jobs = jobs.len(), "configuration resolved");

    let settings = BackupSettings {
        user,
        jobs,
        logs: LogPaths::new(log_dir, &Local::now()),
    };
    let options = BackupOptions {
        interactive: cli.interactive,
        dest: cli.dest,
        port: cli.port,
    };

    let probe = IpRouteProbe::new(config.probe_address()?);
    let runner = SpinnerRunner::new(RsyncRunner::new());
    let viewer = PagerViewer::new(if cli.no_pager {
        None
    } else {
        config.pager_command()
    });

    let outcome = BackupWorkflow::new(&probe, &runner, &viewer)
        .run(&mut TerminalPrompter::new(), &options, &settings)
        .await
        .map_err(explain)?;

    match &outcome {
        BackupOutcome::Declined { .. } => println!("No changes made."),
        BackupOutcome::Completed { dry_run, run } => {
            if let Some(dry_run) = dry_run {
                print_summary("Dry run", dry_run);
            }
            print_summary("Run", run);
        }
    }
    Ok(exit_code(&outcome))
}

/// Success only when the real pass ran and every job in it succeeded.
fn exit_code(outcome: &BackupOutcome) -> ExitCode {
    match outcome {
        BackupOutcome::Completed { run, .. } if run.is_success() => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Attach a user-facing hint to fatal workflow errors.
fn explain(err: CoreError) -> anyhow::Error {
    match err {
        CoreError::Network(_) => anyhow::Error::new(err).context(
            "could not get a valid IP address for the source (this machine); check your network connection",
        ),
        other => other.into(),
    }
}

fn print_summary(title: &str, summary: &PassSummary) {
    println!();
    println!(
        "{}",
        style::header(&format!(
            "{}: {}/{} job(s) succeeded",
            title,
            summary.succeeded.len(),
            summary.total()
        ))
    );
    println!("{}", pass_table(summary));
}
