//! Validation of user-supplied IPv4 addresses and SSH ports.

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::errors::ValidationError;

fn dotted_quad() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
            .expect("dotted-quad pattern is valid")
    })
}

/// Parse a dotted-quad IPv4 address, requiring every octet to be 0-255.
///
/// Leading zeros are tolerated (`010.0.0.1` is `10.0.0.1`); surrounding
/// whitespace is not.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, ValidationError> {
    let caps = dotted_quad()
        .captures(input)
        .ok_or_else(|| ValidationError::MalformedIpv4(input.to_string()))?;

    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        let group = &caps[i + 1];
        *octet = group
            .parse::<u8>()
            .map_err(|_| ValidationError::OctetOutOfRange {
                address: input.to_string(),
                octet: group.to_string(),
            })?;
    }
    Ok(Ipv4Addr::from(octets))
}

/// `true` if `input` is a well-formed IPv4 address with in-range octets.
pub fn is_valid_ipv4(input: &str) -> bool {
    parse_ipv4(input).is_ok()
}

/// Parse an SSH port: ASCII decimal digits only, 1-65535.
pub fn parse_port(input: &str) -> Result<u16, ValidationError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::PortNotNumeric(input.to_string()));
    }
    match input.parse::<u16>() {
        Ok(0) | Err(_) => Err(ValidationError::PortOutOfRange(input.to_string())),
        Ok(port) => Ok(port),
    }
}

/// `true` if `input` is a usable port number.
pub fn is_valid_port(input: &str) -> bool {
    parse_port(input).is_ok()
}
