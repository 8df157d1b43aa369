// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Reverse-lookup name construction for `-x` (§6): IPv6 nibble-reversed
//! `.ip6.arpa.`, IPv4 octet-reversed `.in-addr.arpa.`, falling back to
//! non-strict token reversal for a partial address (RFC 2317 classless
//! delegation, e.g. `-x 192.0.2` without the final octet).

use std::net::IpAddr;

use delv_proto::rr::Name;

use crate::error::{CliError, CliResult};

/// Builds the PTR query name for `target`, per the rules above.
pub fn reverse_name(target: &str) -> CliResult<Name> {
    if let Ok(addr) = target.parse::<IpAddr>() {
        return Ok(match addr {
            IpAddr::V4(v4) => ipv4_reverse_name(&v4.octets()),
            IpAddr::V6(v6) => ipv6_reverse_name(&v6.octets()),
        });
    }

    // Not a complete address: treat `target` as dot-separated IPv4 octets
    // (possibly fewer than four) and reverse whatever tokens were given.
    partial_ipv4_reverse_name(target)
}

fn ipv4_reverse_name(octets: &[u8; 4]) -> Name {
    let labels: Vec<String> = octets.iter().rev().map(u8::to_string).collect();
    build_arpa_name(&labels, "in-addr.arpa.")
}

fn ipv6_reverse_name(octets: &[u8; 16]) -> Name {
    let mut nibbles = Vec::with_capacity(32);
    for byte in octets {
        nibbles.push(format!("{:x}", byte >> 4));
        nibbles.push(format!("{:x}", byte & 0x0f));
    }
    nibbles.reverse();
    build_arpa_name(&nibbles, "ip6.arpa.")
}

fn partial_ipv4_reverse_name(target: &str) -> CliResult<Name> {
    let tokens: Vec<&str> = target.split('.').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() || tokens.len() > 4 {
        return Err(CliError::BadArgument(format!("not a reversible address: {target}")));
    }
    for token in &tokens {
        if token.parse::<u8>().is_err() {
            return Err(CliError::BadArgument(format!("not a reversible address: {target}")));
        }
    }
    let reversed: Vec<&str> = tokens.into_iter().rev().collect();
    Ok(build_arpa_name(&reversed, "in-addr.arpa."))
}

fn build_arpa_name(labels: &[impl AsRef<str>], suffix: &str) -> Name {
    let mut all: Vec<Vec<u8>> = labels.iter().map(|l| l.as_ref().as_bytes().to_vec()).collect();
    for label in suffix.trim_end_matches('.').split('.') {
        all.push(label.as_bytes().to_vec());
    }
    Name::from_labels(all).expect("arpa reverse names never exceed wire-form limits")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_reverses_octets() {
        let name = reverse_name("192.0.2.1").unwrap();
        assert_eq!(name.to_string(), "1.2.0.192.in-addr.arpa.");
    }

    #[test]
    fn ipv6_reverses_nibbles() {
        let name = reverse_name("2001:db8::1").unwrap();
        assert_eq!(
            name.to_string(),
            "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa."
        );
        assert_eq!(name.num_labels(), 32 + 2);
    }

    #[test]
    fn partial_ipv4_reverses_available_tokens() {
        let name = reverse_name("192.0.2").unwrap();
        assert_eq!(name.to_string(), "2.0.192.in-addr.arpa.");
    }

    #[test]
    fn garbage_target_is_rejected() {
        assert!(reverse_name("not-an-address").is_err());
    }
}
