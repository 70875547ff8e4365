//! Remote identity and SSH transport settings.

use std::fmt;
use std::net::Ipv4Addr;

/// `user@host` identity on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub user: String,
    pub host: Ipv4Addr,
}

impl Destination {
    pub fn new(user: impl Into<String>, host: Ipv4Addr) -> Self {
        Self {
            user: user.into(),
            host,
        }
    }

    /// rsync remote spec: `user@host:<remote_dir>`.
    pub fn remote_spec(&self, remote_dir: &str) -> String {
        format!("{}:{}", self, remote_dir)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Remote-shell configuration handed to every rsync invocation.
///
/// A non-default port becomes an explicit `--rsh` option on the command
/// line; nothing is exported into the process environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteShell {
    pub port: Option<u16>,
}

impl RemoteShell {
    pub fn with_port(port: Option<u16>) -> Self {
        Self { port }
    }

    /// The shell command rsync should use, if it differs from plain `ssh`.
    pub fn command(&self) -> Option<String> {
        self.port.map(|port| format!("ssh -p {}", port))
    }

    /// `--rsh=...` argument, if one is needed.
    pub fn rsh_arg(&self) -> Option<String> {
        self.command().map(|cmd| format!("--rsh={}", cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_display() {
        let dest = Destination::new("ana", Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(dest.to_string(), "ana@10.0.0.5");
        assert_eq!(dest.remote_spec(""), "ana@10.0.0.5:");
        assert_eq!(dest.remote_spec("backups"), "ana@10.0.0.5:backups");
    }

    #[test]
    fn test_remote_shell() {
        assert_eq!(RemoteShell::default().rsh_arg(), None);
        assert_eq!(
            RemoteShell::with_port(Some(2222)).rsh_arg().as_deref(),
            Some("--rsh=ssh -p 2222")
        );
    }
}
