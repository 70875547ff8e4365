//! Error types for the homeutils core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Rsync(#[from] RsyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// A required value (destination, user) could not be determined.
    #[error("{0}")]
    Missing(String),

    /// A log file could not be created or opened.
    #[error("log file error at '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Errors from validating user-supplied addresses and ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Not four dot-separated groups of 1-3 digits.
    #[error("invalid IPv4 address '{0}': expected four dot-separated numbers")]
    MalformedIpv4(String),

    /// Well-formed, but an octet is above 255.
    #[error("invalid IPv4 address '{address}': octet {octet} is out of range 0-255")]
    OctetOutOfRange { address: String, octet: String },

    /// Contains something other than ASCII decimal digits.
    #[error("invalid port '{0}': expected a decimal number")]
    PortNotNumeric(String),

    /// Numeric, but outside 1-65535.
    #[error("invalid port '{0}': must be between 1 and 65535")]
    PortOutOfRange(String),
}

// ---------------------------------------------------------------------------
// Rename errors
// ---------------------------------------------------------------------------

/// Errors from scanning a directory or applying a rename plan.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The path does not exist or is not a directory.
    #[error("not a directory: '{0}'")]
    NotADirectory(PathBuf),

    /// The destination of a rename is already taken.
    #[error("destination already exists: '{0}'")]
    DestinationExists(PathBuf),

    /// Reading the directory failed.
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single `rename(2)` failed.
    #[error("failed to rename '{from}' -> '{to}': {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

/// Errors from discovering the outbound source address.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The routing tool is not installed.
    #[error("{0} binary not found")]
    BinaryNotFound(String),

    /// The routing query exited with a non-zero status.
    #[error("route lookup failed (exit {exit_code}): {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },

    /// The routing output had no `src` field.
    #[error("route lookup output has no source address: {0}")]
    NoSourceAddress(String),

    /// The `src` field was not a valid IPv4 address.
    #[error("route lookup returned an invalid source address: {0}")]
    InvalidSourceAddress(#[from] ValidationError),

    /// Generic I/O wrapper.
    #[error("route lookup I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Rsync errors
// ---------------------------------------------------------------------------

/// Errors from running a single rsync job.
#[derive(Debug, Error)]
pub enum RsyncError {
    /// The `rsync` binary was not found on `$PATH`.
    #[error("rsync binary not found: {0}")]
    BinaryNotFound(String),

    /// The job's source directory is missing.
    #[error("source directory for job '{job}' does not exist: '{path}'")]
    SourceMissing { job: String, path: PathBuf },

    /// rsync exited with a non-zero status.
    #[error("rsync job '{job}' failed (exit {exit_code}); see the log for details")]
    JobFailed { job: String, exit_code: i32 },

    /// rsync was terminated by a signal.
    #[error("rsync job '{0}' was terminated by a signal")]
    Terminated(String),

    /// Generic I/O wrapper (spawn, log redirection).
    #[error("rsync I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A required environment variable is not set.
    #[error("required environment variable '{var}' is not set (needed for '{field}')")]
    EnvVarMissing { var: String, field: String },

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

/// Errors from reading interactive answers.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Standard input was closed before an answer was given.
    #[error("no more input while waiting for an answer to '{0}'")]
    EndOfInput(String),

    /// The terminal could not be read.
    #[error("failed to read from terminal: {0}")]
    Terminal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = ValidationError::PortOutOfRange("70000".into());
        assert_eq!(
            err.to_string(),
            "invalid port '70000': must be between 1 and 65535"
        );

        let err = RenameError::DestinationExists(PathBuf::from("/tmp/a_b.txt"));
        assert_eq!(
            err.to_string(),
            "destination already exists: '/tmp/a_b.txt'"
        );

        let err = RsyncError::JobFailed {
            job: "bin".into(),
            exit_code: 23,
        };
        assert!(err.to_string().contains("exit 23"));

        let err = ConfigError::EnvVarMissing {
            var: "USER".into(),
            field: "remote.user".into(),
        };
        assert!(err.to_string().contains("USER"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let err: CoreError = ValidationError::MalformedIpv4("x".into()).into();
        assert!(matches!(err, CoreError::Validation(_)));

        let err: CoreError = PromptError::EndOfInput("Port number".into()).into();
        assert!(matches!(err, CoreError::Prompt(_)));
    }
}
