// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Minimal `resolv.conf` line scanner (§6): `nameserver` and `options
//! ndots:` lines only, a read-only interface. This intentionally mirrors
//! the shape of the `resolv-conf` crate present in the workspace dependency
//! table without depending on it, since this tool never reads the live
//! host file -- only whatever path the caller hands it (the Out-of-scope
//! note in §1 excludes built-in resolv.conf *content*, only the loading
//! *interface* is specified).

use std::net::SocketAddr;

/// The handful of settings this tool reads out of a resolv.conf-shaped file.
#[derive(Clone, Debug, Default)]
pub struct ResolvConf {
    /// `nameserver` lines, in file order.
    pub nameservers: Vec<SocketAddr>,
    /// `options ndots:N`, if present.
    pub ndots: Option<u32>,
}

/// Parses `text` line by line. Unrecognized directives and malformed
/// addresses are skipped rather than treated as fatal -- this file is
/// read-only advisory configuration, not something the tool validates
/// strictly.
pub fn parse(text: &str) -> ResolvConf {
    let mut conf = ResolvConf::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("nameserver") => {
                if let Some(addr) = parts.next() {
                    if let Some(socket_addr) = parse_nameserver_addr(addr) {
                        conf.nameservers.push(socket_addr);
                    }
                }
            }
            Some("options") => {
                for option in parts {
                    if let Some(n) = option.strip_prefix("ndots:") {
                        conf.ndots = n.parse().ok();
                    }
                }
            }
            _ => {}
        }
    }

    conf
}

fn parse_nameserver_addr(addr: &str) -> Option<SocketAddr> {
    if let Ok(sa) = addr.parse::<SocketAddr>() {
        return Some(sa);
    }
    let ip: std::net::IpAddr = addr.parse().ok()?;
    Some(SocketAddr::new(ip, 53))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nameserver_and_ndots() {
        let text = "nameserver 8.8.8.8\noptions ndots:2 timeout:5\n";
        let conf = parse(text);
        assert_eq!(conf.nameservers.len(), 1);
        assert_eq!(conf.nameservers[0].port(), 53);
        assert_eq!(conf.ndots, Some(2));
    }

    #[test]
    fn ignores_comments_and_unknown_directives() {
        let text = "; a comment\n# also a comment\nsortlist 10.0.0.0/8\nnameserver ::1\n";
        let conf = parse(text);
        assert_eq!(conf.nameservers.len(), 1);
        assert!(conf.nameservers[0].is_ipv6());
    }
}
