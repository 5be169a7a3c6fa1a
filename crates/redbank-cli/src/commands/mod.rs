pub mod repl;
pub mod server;
pub mod sim;

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};

/// Parses an address string, accepting a bare port as shorthand for
/// `127.0.0.1:<port>` (mirrors how most of these demonstrator addresses
/// get typed by hand on one machine).
pub(crate) fn parse_address(address: &str) -> Result<SocketAddr> {
    if let Ok(addr) = address.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(port) = address.parse::<u16>() {
        return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
    }
    bail!("invalid address '{address}': use host:port or a bare port number")
}

pub(crate) fn parse_addresses(addrs: &[String]) -> Result<Vec<SocketAddr>> {
    addrs.iter().map(|a| parse_address(a)).collect::<Result<Vec<_>>>().context("parsing cluster addresses")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_port_defaults_to_loopback() {
        let addr = parse_address("6000").unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 6000)));
    }

    #[test]
    fn full_socket_address_passes_through() {
        let addr = parse_address("10.0.0.5:9000").unwrap();
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn garbage_address_is_rejected() {
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn parse_addresses_preserves_order() {
        let addrs = vec!["6000".to_string(), "6001".to_string(), "6002".to_string()];
        let parsed = parse_addresses(&addrs).unwrap();
        assert_eq!(parsed[0].port(), 6000);
        assert_eq!(parsed[2].port(), 6002);
    }
}
