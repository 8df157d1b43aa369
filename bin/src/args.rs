// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Argument parsing (§6, §4.4 expansion): dash-flags via `clap`'s derive
//! API, `+keyword`/`@server` tokens via a hand-rolled pre-pass `clap`
//! cannot express natively. The pre-pass runs first and removes every
//! `+token` from argv before handing the rest to `clap::Parser::parse_from`.

use std::net::SocketAddr;
use std::str::FromStr;

use clap::Parser;
use delv_proto::rr::{DNSClass, Name, RecordType};
use tracing::warn;

use crate::error::{CliError, CliResult};
use crate::reverse::reverse_name;

/// The dash-flag surface clap understands directly (§6). Bare positional
/// tokens and `@server` are collected into `rest` and classified afterward,
/// since their meaning (server / type / class / qname) depends on what
/// they look like, not their position.
#[derive(Parser, Debug)]
#[command(name = "delv", about = "Validating DNS stub resolver", disable_help_flag = true)]
struct DashArgs {
    #[arg(short = '4')]
    ipv4_only: bool,
    #[arg(short = '6')]
    ipv6_only: bool,
    #[arg(short = 'a', value_name = "FILE")]
    anchor_file: Option<String>,
    #[arg(short = 'b', value_name = "ADDR[#PORT]")]
    source_addr: Option<String>,
    #[arg(short = 'c', value_name = "CLASS")]
    class: Option<String>,
    #[arg(short = 'd', value_name = "LEVEL")]
    debug_level: Option<u8>,
    #[arg(short = 'h')]
    help: bool,
    #[arg(short = 'i')]
    insecure: bool,
    #[arg(short = 'm')]
    memstats: bool,
    #[arg(short = 'p', value_name = "PORT")]
    port: Option<u16>,
    #[arg(short = 'q', value_name = "NAME")]
    qname: Option<String>,
    #[arg(short = 't', value_name = "TYPE")]
    qtype: Option<String>,
    #[arg(short = 'v')]
    version: bool,
    #[arg(short = 'x', value_name = "ADDR")]
    reverse: Option<String>,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

/// Every `+keyword`/`+nokeyword` display and behavior flag (§6), already
/// resolved to its final boolean/numeric value.
#[derive(Clone, Debug)]
pub struct PlusOptions {
    pub class: bool,
    pub cdflag: bool,
    pub comments: bool,
    pub crypto: bool,
    pub dnssec: bool,
    pub multiline: bool,
    pub rrcomments: bool,
    pub short: bool,
    pub split: u32,
    pub tcp: bool,
    pub trust: bool,
    pub ttl: bool,
    pub unknownformat: bool,
    pub yaml: bool,
    pub root_enabled: bool,
    pub root_anchor: Option<String>,
    pub mtrace: bool,
    pub rtrace: bool,
    pub vtrace: bool,
}

impl Default for PlusOptions {
    fn default() -> Self {
        Self {
            class: true,
            cdflag: true,
            comments: true,
            crypto: true,
            dnssec: true,
            multiline: false,
            rrcomments: true,
            short: false,
            split: 0,
            tcp: false,
            trust: true,
            ttl: true,
            unknownformat: false,
            yaml: false,
            root_enabled: true,
            root_anchor: None,
            mtrace: false,
            rtrace: false,
            vtrace: false,
        }
    }
}

impl PlusOptions {
    fn set_all(&mut self, value: bool) {
        self.class = value;
        self.cdflag = value;
        self.comments = value;
        self.crypto = value;
        self.dnssec = value;
        self.rrcomments = value;
        self.trust = value;
        self.ttl = value;
    }

    fn apply(&mut self, token: &str) -> CliResult<()> {
        let body = token.strip_prefix('+').ok_or_else(|| CliError::BadArgument(format!("not a +option: {token}")))?;
        let (negated, body) = match body.strip_prefix("no") {
            Some(rest) if KNOWN_KEYWORDS.contains(&keyword_name(rest)) => (true, rest),
            _ => (false, body),
        };
        let (keyword, value) = match body.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (body, None),
        };

        match keyword {
            "all" => self.set_all(!negated),
            "class" => self.class = !negated,
            "cdflag" => self.cdflag = !negated,
            "comments" => self.comments = !negated,
            "crypto" => self.crypto = !negated,
            "dnssec" => self.dnssec = !negated,
            "multiline" => self.multiline = !negated,
            "rrcomments" => self.rrcomments = !negated,
            "short" => self.short = !negated,
            "split" => {
                self.split = if negated {
                    0
                } else {
                    value
                        .ok_or_else(|| CliError::BadArgument("+split requires =<N>".into()))?
                        .parse()
                        .map_err(|_| CliError::BadArgument(format!("bad +split value in {token}")))?
                }
            }
            "tcp" => self.tcp = !negated,
            "trust" => self.trust = !negated,
            "ttl" => self.ttl = !negated,
            "unknownformat" => self.unknownformat = !negated,
            "yaml" => self.yaml = !negated,
            "root" => {
                self.root_enabled = !negated;
                self.root_anchor = if negated { None } else { value.map(str::to_string) };
            }
            "mtrace" => self.mtrace = !negated,
            "rtrace" => self.rtrace = !negated,
            "vtrace" => self.vtrace = !negated,
            "dlv" => {
                // `+dlv` only exists in its negated form (§6): DLV is
                // already unsupported, so the only legal use is turning it
                // off explicitly.
                if !negated {
                    return Err(CliError::BadArgument("+dlv is only accepted as +nodlv".into()));
                }
            }
            other => return Err(CliError::BadArgument(format!("unknown +option: +{other}"))),
        }
        Ok(())
    }
}

/// Strips a possible `=value` suffix for keyword-membership checks.
fn keyword_name(s: &str) -> &str {
    s.split('=').next().unwrap_or(s)
}

const KNOWN_KEYWORDS: &[&str] = &[
    "all",
    "class",
    "cdflag",
    "comments",
    "crypto",
    "dnssec",
    "multiline",
    "rrcomments",
    "short",
    "split",
    "tcp",
    "trust",
    "ttl",
    "unknownformat",
    "yaml",
    "root",
    "mtrace",
    "rtrace",
    "vtrace",
    "dlv",
];

/// Fully resolved input to one `delv` invocation, ready to drive the
/// resolver and formatter.
pub struct Invocation {
    pub qname: Name,
    pub qtype: RecordType,
    pub qclass: DNSClass,
    pub servers: Vec<SocketAddr>,
    pub ipv4_only: bool,
    pub ipv6_only: bool,
    pub source_addr: Option<SocketAddr>,
    pub port: u16,
    pub tcp: bool,
    pub anchor_file: Option<String>,
    pub no_validate: bool,
    pub no_dnssec: bool,
    pub debug_level: u8,
    pub memstats: bool,
    pub display: PlusOptions,
    pub show_help: bool,
    pub show_version: bool,
}

/// Parses raw `argv` (excluding the program name) into a fully resolved
/// `Invocation`.
pub fn parse(argv: impl IntoIterator<Item = String>) -> CliResult<Invocation> {
    let argv: Vec<String> = argv.into_iter().collect();

    let (plus_tokens, other_tokens): (Vec<String>, Vec<String>) = argv.into_iter().partition(|a| a.starts_with('+'));

    let mut display = PlusOptions::default();
    for token in &plus_tokens {
        display.apply(token)?;
    }

    let mut clap_argv = vec!["delv".to_string()];
    clap_argv.extend(other_tokens);
    let dash = DashArgs::try_parse_from(clap_argv).map_err(|e| CliError::BadArgument(e.to_string()))?;

    if dash.port.is_some() && dash.port == Some(0) {
        return Err(CliError::BadArgument("port must be nonzero".into()));
    }

    let mut server: Option<SocketAddr> = None;
    let mut qtype: Option<RecordType> = None;
    let mut qclass: Option<DNSClass> = None;
    let mut qname: Option<Name> = None;

    for token in &dash.rest {
        if let Some(host) = token.strip_prefix('@') {
            server = Some(parse_host_port(host, dash.port.unwrap_or(53))?);
            continue;
        }
        if qtype.is_none() {
            if let Ok(rt) = RecordType::from_str(token) {
                if rt.is_zone_transfer() {
                    return Err(CliError::UnsupportedQuery(rt.to_string()));
                }
                qtype = Some(rt);
                continue;
            }
        }
        if qclass.is_none() {
            if let Ok(class) = DNSClass::from_str(token) {
                if !matches!(class, DNSClass::IN) {
                    warn!(class = %class, "only the IN class is supported, ignoring extra token");
                }
                qclass = Some(class);
                continue;
            }
        }
        if qname.is_none() {
            qname = Some(token.parse().map_err(|e: delv_proto::ProtoError| CliError::BadArgument(e.to_string()))?);
        } else {
            warn!(token, "extra command-line token ignored");
        }
    }

    if let Some(name) = &dash.qname {
        qname = Some(name.parse().map_err(|e: delv_proto::ProtoError| CliError::BadArgument(e.to_string()))?);
    }
    if let Some(t) = &dash.qtype {
        let rt = RecordType::from_str(t).map_err(|e| CliError::BadArgument(e.to_string()))?;
        if rt.is_zone_transfer() {
            return Err(CliError::UnsupportedQuery(rt.to_string()));
        }
        qtype = Some(rt);
    }
    if let Some(c) = &dash.class {
        qclass = Some(DNSClass::from_str(c).map_err(|e| CliError::BadArgument(e.to_string()))?);
    }
    if let Some(target) = &dash.reverse {
        qname = Some(reverse_name(target)?);
        qtype = Some(RecordType::PTR);
    }

    // Defaults (§6): qname `.`, qtype `NS` if no qname else `A`.
    let qname = qname.unwrap_or_else(Name::root);
    let qtype = qtype.unwrap_or(if qname.is_root() { RecordType::NS } else { RecordType::A });
    let qclass = qclass.unwrap_or(DNSClass::IN);

    let mut servers = Vec::new();
    if let Some(s) = server {
        servers.push(s);
    }

    let source_addr = dash.source_addr.as_deref().map(parse_source_addr).transpose()?;

    Ok(Invocation {
        qname,
        qtype,
        qclass,
        servers,
        ipv4_only: dash.ipv4_only,
        ipv6_only: dash.ipv6_only,
        source_addr,
        port: dash.port.unwrap_or(53),
        tcp: display.tcp,
        anchor_file: dash.anchor_file.clone(),
        no_validate: !display.root_enabled || dash.insecure,
        no_dnssec: dash.insecure,
        debug_level: dash.debug_level.unwrap_or(0),
        memstats: dash.memstats,
        display,
        show_help: dash.help,
        show_version: dash.version,
    })
}

fn parse_host_port(host: &str, default_port: u16) -> CliResult<SocketAddr> {
    if let Ok(sa) = format!("{host}:{default_port}").parse::<SocketAddr>() {
        return Ok(sa);
    }
    let ip: std::net::IpAddr = host.parse().map_err(|_| CliError::BadAddress(host.to_string()))?;
    Ok(SocketAddr::new(ip, default_port))
}

/// Parses `-b addr[#port]` (`#` rather than `:` so IPv6 literals don't need
/// bracketing for the common case).
fn parse_source_addr(spec: &str) -> CliResult<SocketAddr> {
    let (addr, port) = match spec.split_once('#') {
        Some((a, p)) => (a, p.parse().map_err(|_| CliError::BadAddress(spec.to_string()))?),
        None => (spec, 0),
    };
    let ip: std::net::IpAddr = addr.parse().map_err(|_| CliError::BadAddress(spec.to_string()))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_root_ns() {
        let inv = parse(std::iter::empty()).unwrap();
        assert!(inv.qname.is_root());
        assert_eq!(inv.qtype, RecordType::NS);
    }

    #[test]
    fn bare_qname_defaults_to_a() {
        let inv = parse(["example.com.".to_string()]).unwrap();
        assert_eq!(inv.qname.to_string(), "example.com.");
        assert_eq!(inv.qtype, RecordType::A);
    }

    #[test]
    fn at_server_and_bare_type_are_classified() {
        let inv = parse(["@8.8.8.8".to_string(), "example.com.".to_string(), "MX".to_string()]).unwrap();
        assert_eq!(inv.servers.len(), 1);
        assert_eq!(inv.qtype, RecordType::MX);
    }

    #[test]
    fn axfr_is_rejected() {
        let err = parse(["example.com.".to_string(), "AXFR".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::UnsupportedQuery(_)));
    }

    #[test]
    fn plus_nodnssec_only_affects_display() {
        let inv = parse(["+nodnssec".to_string()]).unwrap();
        assert!(!inv.display.dnssec);
        assert!(!inv.no_dnssec);
    }

    #[test]
    fn dash_i_disables_validation() {
        let inv = parse(["-i".to_string()]).unwrap();
        assert!(inv.no_dnssec);
        assert!(inv.no_validate);
    }

    #[test]
    fn plus_split_sets_width() {
        let inv = parse(["+split=4".to_string()]).unwrap();
        assert_eq!(inv.display.split, 4);
    }

    #[test]
    fn bare_dlv_is_rejected() {
        let err = parse(["+dlv".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::BadArgument(_)));
    }
}
