// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `delv`: a validating DNS stub resolver CLI (§6 end to end). Parses
//! arguments, loads trust anchors and upstream servers, runs a single
//! query on a current-thread `tokio` runtime, and formats the result.
//! Exits nonzero only for a setup failure (§7) -- a successfully produced
//! `ResponseSet`, even a `Bogus` one, always exits 0.

mod args;
mod display;
mod error;
mod resolv_conf;
mod reverse;
mod trust_anchor_file;

use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use delv_proto::dnssec::{Algorithm, DigestType, TrustAnchor, TrustAnchorStore};
use delv_proto::rr::Name;
use delv_resolver::config::{AddressFamily, NameServerConfig, ResolveOpts};
use delv_resolver::{resolve_query, Query};
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use crate::args::Invocation;
use crate::error::{CliError, CliResult};

/// The IANA root zone's current KSK, as a DS record (§4.3 built-in root
/// anchor, used when no `-a`/`+root=` file is given).
const BUILTIN_ROOT_DS: &str = r#"
trust-anchors {
    . initial-ds 20326 8 2 "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D0";
};
"#;

const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "delv failed");
            err.exit_code()
        }
    };

    std::process::exit(exit_code);
}

/// Does the actual work, tearing the `tokio` runtime down before returning
/// so the final `std::process::exit` in `main` is the only exit call in
/// the whole binary (§7: no `exit()` from inside async code).
fn run() -> CliResult<i32> {
    let invocation = args::parse(std::env::args().skip(1))?;
    init_tracing(&invocation);

    if invocation.show_help {
        print_help();
        return Ok(0);
    }
    if invocation.show_version {
        println!("delv {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let anchors = load_trust_anchors(&invocation)?;
    let opts = build_resolve_opts(&invocation)?;

    let query = Query {
        qname: invocation.qname.clone(),
        qtype: invocation.qtype,
        qclass: invocation.qclass,
        opts,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Io {
            path: "tokio runtime".to_string(),
            source: e,
        })?;

    let response = runtime.block_on(resolve_query(query, &anchors))?;
    drop(runtime);

    let text = display::render(&response, &invocation.qname, invocation.qtype, &invocation.display)?;
    println!("{text}");

    if invocation.memstats {
        eprintln!("; this build does not track allocator statistics");
    }

    Ok(0)
}

fn load_trust_anchors(invocation: &Invocation) -> CliResult<TrustAnchorStore> {
    if let Some(path) = invocation.anchor_file.as_deref().or(invocation.display.root_anchor.as_deref()) {
        let text = fs::read_to_string(path).map_err(|e| CliError::Io {
            path: path.to_string(),
            source: e,
        })?;
        return trust_anchor_file::parse(&text);
    }

    if invocation.no_validate {
        return Ok(TrustAnchorStore::empty());
    }

    trust_anchor_file::parse(BUILTIN_ROOT_DS)
}

fn build_resolve_opts(invocation: &Invocation) -> CliResult<ResolveOpts> {
    let mut servers: Vec<NameServerConfig> = invocation.servers.iter().map(|addr| NameServerConfig::new(*addr)).collect();

    if servers.is_empty() {
        if let Ok(text) = fs::read_to_string(DEFAULT_RESOLV_CONF) {
            servers = resolv_conf::parse(&text).nameservers.into_iter().map(NameServerConfig::new).collect();
        }
    }

    let af = match (invocation.ipv4_only, invocation.ipv6_only) {
        (true, false) => AddressFamily::Ipv4Only,
        (false, true) => AddressFamily::Ipv6Only,
        _ => AddressFamily::Any,
    };

    let source_addr_v4 = invocation.source_addr.filter(SocketAddr::is_ipv4);
    let source_addr_v6 = invocation.source_addr.filter(SocketAddr::is_ipv6);

    Ok(ResolveOpts {
        no_cd_flag: !invocation.display.cdflag,
        no_dnssec: invocation.no_dnssec,
        no_validate: invocation.no_validate,
        tcp: invocation.tcp,
        timeout: Duration::from_secs(5),
        attempts: 3,
        servers,
        source_addr_v4,
        source_addr_v6,
        af,
    })
}

/// Sets the tracing verbosity from `-d <level>` and the `+[no]{m,r,v}trace`
/// flags (message, resolver, and validator tracing, per §6); any of the
/// three bumps the whole process to `DEBUG` rather than gating individually,
/// since this tool has no per-subsystem logger split.
fn init_tracing(invocation: &Invocation) {
    let level = if invocation.display.mtrace || invocation.display.rtrace || invocation.display.vtrace || invocation.debug_level > 0 {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init();
}

fn print_help() {
    println!(
        "usage: delv [@server] [-4] [-6] [-a anchor-file] [-b address[#port]] \
         [-c class] [-d level] [-i] [-m] [-p port] [-q name] [-t type] [-x addr] \
         [name] [type] [class] [+[no]option ...]"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_root_ds_parses() {
        let store = trust_anchor_file::parse(BUILTIN_ROOT_DS).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.find(&Name::root()).len(), 1);
    }

    #[test]
    fn root_ds_uses_expected_key_tag() {
        let store = trust_anchor_file::parse(BUILTIN_ROOT_DS).unwrap();
        let anchors = store.find(&Name::root());
        let Some(TrustAnchor::InitialDS(ds)) = anchors.first().map(|a| (*a).clone()) else {
            panic!("expected an InitialDS anchor");
        };
        assert_eq!(ds.key_tag(), 20326);
        assert_eq!(ds.algorithm(), Algorithm::from(8));
        assert_eq!(ds.digest_type(), DigestType::from(2));
    }
}
