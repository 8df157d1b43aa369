// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration threaded immutably into one `resolve()` call (§3
//! `[EXPANSION]` `ResolveOpts`). Never a module-level global: every setting
//! here is read-only for the lifetime of a single query.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// One upstream nameserver to try, in order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NameServerConfig {
    /// The server's address and port.
    pub socket_addr: SocketAddr,
}

impl NameServerConfig {
    /// Builds a config for `addr` on the standard DNS port.
    pub fn new(addr: SocketAddr) -> Self {
        Self { socket_addr: addr }
    }
}

/// Which address families a server (or the local host) is allowed to use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressFamily {
    /// Either v4 or v6, whichever the server address is.
    Any,
    /// v4 only (`-4`).
    Ipv4Only,
    /// v6 only (`-6`).
    Ipv6Only,
}

impl AddressFamily {
    /// True if `addr` is usable under this restriction.
    pub fn allows(self, addr: &SocketAddr) -> bool {
        match (self, addr.ip()) {
            (Self::Any, _) => true,
            (Self::Ipv4Only, IpAddr::V4(_)) => true,
            (Self::Ipv6Only, IpAddr::V6(_)) => true,
            _ => false,
        }
    }
}

/// Options for one `resolve()` invocation (§3 `[EXPANSION]`).
#[derive(Clone, Debug)]
pub struct ResolveOpts {
    /// Display-only: whether the user passed `+nocd` (the wire `CD` bit is
    /// always 1 regardless, see DESIGN.md's Open Question decision).
    pub no_cd_flag: bool,
    /// `+nodnssec`: do not set the `DO` bit and skip validation outright.
    pub no_dnssec: bool,
    /// `+noroot`/validation explicitly disabled even though DNSSEC records
    /// may still be requested and displayed unvalidated.
    pub no_validate: bool,
    /// `+tcp`: always use TCP, skipping the UDP attempt.
    pub tcp: bool,
    /// Per-attempt timeout (`-d` scales retry count, not this).
    pub timeout: Duration,
    /// Maximum UDP attempts before giving up on a server (≤3 per §5).
    pub attempts: u8,
    /// Upstream servers to try, in order.
    pub servers: Vec<NameServerConfig>,
    /// Local source address to bind before sending (`-b`), if any.
    pub source_addr_v4: Option<SocketAddr>,
    /// Local source address to bind before sending (`-b`), if any.
    pub source_addr_v6: Option<SocketAddr>,
    /// Address family restriction (`-4`/`-6`).
    pub af: AddressFamily,
}

impl Default for ResolveOpts {
    fn default() -> Self {
        Self {
            no_cd_flag: false,
            no_dnssec: false,
            no_validate: false,
            tcp: false,
            timeout: Duration::from_secs(5),
            attempts: 3,
            servers: Vec::new(),
            source_addr_v4: None,
            source_addr_v6: None,
            af: AddressFamily::Any,
        }
    }
}

impl ResolveOpts {
    /// Servers left after applying the address-family restriction.
    pub fn compatible_servers(&self) -> Vec<NameServerConfig> {
        self.servers
            .iter()
            .filter(|s| self.af.allows(&s.socket_addr))
            .copied()
            .collect()
    }
}
