//! Configuration for the rsync-via-ssh backup runner.
//!
//! Everything has a built-in default, so the TOML file is optional:
//!
//! ```toml
//! [remote]
//! user = "ana"
//! probe_address = "8.8.8.8"
//!
//! [logging]
//! log_dir = "~/backups/logs"
//!
//! [pager]
//! command = "less"
//! enabled = true
//!
//! [[jobs]]
//! name = "bin"
//! source = "~/bin"
//! excludes = ["*.AppImage"]
//!
//! [[jobs]]
//! name = "config-files"
//! source = "~/config-files"
//! delete = true
//! ```
//!
//! Command-line flags override file values, which override defaults.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::logs::PROGRAM_NAME;
use crate::network::DEFAULT_PROBE_ADDRESS;
use crate::rsync::job::{default_jobs, SyncJob};
use crate::validate::parse_ipv4;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pager: PagerConfig,

    /// Jobs to run each pass. Empty means the built-in jobs.
    #[serde(default)]
    pub jobs: Vec<SyncJob>,
}

/// Remote identity and route probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Remote login name. Defaults to `$USER`.
    #[serde(default)]
    pub user: Option<String>,

    /// Address whose route reveals the local outbound address.
    #[serde(default = "default_probe_address")]
    pub probe_address: String,
}

fn default_probe_address() -> String {
    DEFAULT_PROBE_ADDRESS.to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: None,
            probe_address: default_probe_address(),
        }
    }
}

/// Where run logs go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// How the dry-run log is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Pager program. Defaults to `$PAGER`, then `less`.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            command: None,
            enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

/// `<config_dir>/rsync-via-ssh/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(PROGRAM_NAME).join("config.toml"))
}

impl BackupConfig {
    /// Load a [`BackupConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading backup configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: BackupConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(jobs = config.jobs.len(), "backup configuration parsed successfully");
        Ok(config)
    }

    /// Load the explicitly given file, or the default file if it exists, or
    /// fall back to built-in defaults. The result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => {
                    debug!("no configuration file, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.probe_address()?;

        if let Some(user) = &self.remote.user {
            check_login_name(user, "remote.user")?;
        }

        let mut seen = HashSet::new();
        for (i, job) in self.jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("jobs[{}].name", i),
                    detail: "job name must not be empty".into(),
                });
            }
            if job.source.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("jobs[{}].source", i),
                    detail: "job source must not be empty".into(),
                });
            }
            if !seen.insert(job.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("jobs[{}].name", i),
                    detail: format!("duplicate job name '{}'", job.name),
                });
            }
        }

        if let Some(cmd) = &self.pager.command {
            if cmd.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "pager.command".into(),
                    detail: "pager command must not be empty".into(),
                });
            }
        }

        Ok(())
    }

    pub fn probe_address(&self) -> Result<Ipv4Addr, ConfigError> {
        parse_ipv4(&self.remote.probe_address).map_err(|e| ConfigError::InvalidValue {
            field: "remote.probe_address".into(),
            detail: e.to_string(),
        })
    }

    /// Remote login name: flag, then config, then `$USER`.
    pub fn resolve_user(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        if let Some(user) = flag {
            check_login_name(user, "--user")?;
            return Ok(user.to_string());
        }
        if let Some(user) = self.remote.user.as_deref() {
            return Ok(user.to_string());
        }
        match std::env::var("USER") {
            Ok(user) if !user.is_empty() => Ok(user),
            _ => Err(ConfigError::EnvVarMissing {
                var: "USER".into(),
                field: "remote.user".into(),
            }),
        }
    }

    /// Configured jobs with `~/` expanded against `home`, or the built-in
    /// jobs when none are configured.
    pub fn resolve_jobs(&self, home: &Path) -> Vec<SyncJob> {
        if self.jobs.is_empty() {
            return default_jobs(home);
        }
        self.jobs
            .iter()
            .map(|job| SyncJob {
                source: expand_tilde(&job.source, home),
                ..job.clone()
            })
            .collect()
    }

    /// Configured log directory with `~/` expanded.
    pub fn log_dir(&self, home: &Path) -> Option<PathBuf> {
        self.logging.log_dir.as_deref().map(|d| expand_tilde(d, home))
    }

    /// Pager program, or `None` when disabled.
    pub fn pager_command(&self) -> Option<String> {
        if !self.pager.enabled {
            return None;
        }
        self.pager
            .command
            .clone()
            .or_else(|| std::env::var("PAGER").ok().filter(|p| !p.trim().is_empty()))
            .or_else(|| Some("less".to_string()))
    }
}

/// A login name ends up in `user@host`, so it may not be blank or carry
/// `@` or whitespace.
fn check_login_name(user: &str, field: &str) -> Result<(), ConfigError> {
    if user.trim().is_empty() || user.contains('@') || user.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            detail: format!("'{}' is not a usable login name", user),
        });
    }
    Ok(())
}

/// Expand a leading `~` or `~/` against `home`.
pub fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
