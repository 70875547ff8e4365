//! Outbound source address discovery.
//!
//! Asks the kernel routing table which local address would be used to reach
//! a public probe address. The result is only displayed; nothing is ever
//! sent to the probe address.

use std::net::Ipv4Addr;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::errors::NetworkError;
use crate::validate::parse_ipv4;

/// Default address whose route is looked up.
pub const DEFAULT_PROBE_ADDRESS: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

/// Something that can report the local outbound IPv4 address.
#[allow(async_fn_in_trait)]
pub trait RouteProbe {
    async fn source_address(&self) -> Result<Ipv4Addr, NetworkError>;
}

/// [`RouteProbe`] backed by `ip route get <probe>`.
#[derive(Debug, Clone)]
pub struct IpRouteProbe {
    probe: Ipv4Addr,
    binary: String,
}

impl IpRouteProbe {
    pub fn new(probe: Ipv4Addr) -> Self {
        Self {
            probe,
            binary: "ip".into(),
        }
    }

    /// Use a different routing binary (must accept `route get <addr>`).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn probe(&self) -> Ipv4Addr {
        self.probe
    }
}

impl Default for IpRouteProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ADDRESS)
    }
}

impl RouteProbe for IpRouteProbe {
    #[instrument(skip(self), fields(probe = %self.probe))]
    async fn source_address(&self) -> Result<Ipv4Addr, NetworkError> {
        let probe = self.probe.to_string();
        let output = Command::new(&self.binary)
            .args(["route", "get", &probe])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NetworkError::BinaryNotFound(self.binary.clone())
                } else {
                    NetworkError::IoError(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "route lookup failed");
            return Err(NetworkError::CommandFailed { exit_code, stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(output = %stdout.trim(), "route lookup output");
        let src = parse_route_source(&stdout)
            .ok_or_else(|| NetworkError::NoSourceAddress(stdout.trim().to_string()))?;
        let addr = parse_ipv4(src)?;
        info!(source = %addr, "discovered outbound source address");
        Ok(addr)
    }
}

/// Extract the token following `src` in `ip route get` output.
///
/// ```text
/// 8.8.8.8 via 192.168.1.1 dev wlan0 src 192.168.1.23 uid 1000
/// ```
pub fn parse_route_source(output: &str) -> Option<&str> {
    let mut tokens = output.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "src" {
            return tokens.next();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_source() {
        let out = "8.8.8.8 via 192.168.1.1 dev wlan0 src 192.168.1.23 uid 1000 \n    cache \n";
        assert_eq!(parse_route_source(out), Some("192.168.1.23"));
    }

    #[test]
    fn test_parse_route_source_missing() {
        assert_eq!(parse_route_source("unreachable 8.8.8.8"), None);
        assert_eq!(parse_route_source("8.8.8.8 dev eth0 src"), None);
        assert_eq!(parse_route_source(""), None);
    }

    #[test]
    fn test_default_probe() {
        assert_eq!(IpRouteProbe::default().probe(), Ipv4Addr::new(8, 8, 8, 8));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let probe = IpRouteProbe::default().with_binary("definitely-not-a-routing-tool-xyz");
        assert!(matches!(
            probe.source_address().await,
            Err(NetworkError::BinaryNotFound(_))
        ));
    }
}
