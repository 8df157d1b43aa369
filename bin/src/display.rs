// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Output formatting (§4.5, §6): zone-file text (the default), `+short`
//! RDATA-only lines, and `+yaml`. Trust banners use the literal strings
//! already carried by `TrustLevel`/`ValidationStatus`; this module only
//! decides layout.

use delv_proto::rr::{Name, Record, RecordType};
use delv_resolver::response_set::{ResponseSet, ValidationStatus};

use crate::args::PlusOptions;
use crate::error::{CliError, CliResult};

/// Renders a completed query according to `opts`.
pub fn render(response: &ResponseSet, qname: &Name, qtype: RecordType, opts: &PlusOptions) -> CliResult<String> {
    if opts.yaml {
        render_yaml(response, qname, qtype, opts)
    } else if opts.short {
        Ok(render_short(response, opts))
    } else {
        Ok(render_zone(response, opts))
    }
}

/// True for RRSIG/DNSKEY/DS/NSEC/NSEC3/NSEC3PARAM -- the record types
/// `+[no]dnssec` (`showdnssec`) gates in the original tool's output. This
/// only ever hides display; it has no bearing on whether validation ran.
fn is_dnssec_type(rtype: RecordType) -> bool {
    matches!(
        rtype,
        RecordType::RRSIG | RecordType::DNSKEY | RecordType::DS | RecordType::NSEC | RecordType::NSEC3 | RecordType::NSEC3PARAM
    )
}

fn render_zone(response: &ResponseSet, opts: &PlusOptions) -> String {
    let mut out = String::new();
    let mut last_banner: Option<String> = None;

    for entry in response.entries() {
        if opts.trust {
            // A negative entry's trust comes from the overall proof status,
            // not the per-RRset ladder `TrustLevel::Answer` carries it at;
            // a positive entry's banner is the ladder rung itself.
            let banner = if entry.negative() {
                response.status().banner(true).to_string()
            } else {
                format!("; {}", entry.trust_level().banner(false))
            };
            if last_banner.as_deref() != Some(banner.as_str()) {
                out.push_str(&banner);
                out.push('\n');
                last_banner = Some(banner);
            }
        }
        for record in entry.rrset().records() {
            if !opts.dnssec && is_dnssec_type(record.record_type()) {
                continue;
            }
            out.push_str(&format_record(record, opts));
            out.push('\n');
        }
        if opts.rrcomments && opts.dnssec {
            for rrsig in entry.rrset().rrsigs() {
                if let Some(sig) = rrsig.data().as_rrsig() {
                    out.push_str(&format!(
                        "; signed by {}, expires {}\n",
                        sig.signer_name(),
                        sig.signature_expiration()
                    ));
                }
            }
        }
    }

    if response.entries().is_empty() {
        if opts.comments {
            out.push_str(&format!("; {}\n", response.status().banner(false)));
        }
        if let Some(reason) = response.reason() {
            out.push_str(&format!("; {reason}\n"));
        }
    }

    out
}

fn render_short(response: &ResponseSet, opts: &PlusOptions) -> String {
    let mut lines = Vec::new();
    for entry in response.entries() {
        if entry.negative() {
            continue;
        }
        for record in entry.rrset().records() {
            if !opts.dnssec && is_dnssec_type(record.record_type()) {
                continue;
            }
            lines.push(record.data().to_string());
        }
    }
    lines.join("\n")
}

#[derive(serde::Serialize)]
struct YamlRecord {
    name: String,
    ttl: u32,
    class: String,
    #[serde(rename = "type")]
    rtype: String,
    rdata: String,
    trust: String,
}

#[derive(serde::Serialize)]
struct YamlDocument {
    #[serde(rename = "type")]
    qtype: String,
    query_name: String,
    status: String,
    records: Vec<YamlRecord>,
}

fn render_yaml(response: &ResponseSet, qname: &Name, qtype: RecordType, opts: &PlusOptions) -> CliResult<String> {
    let mut records = Vec::new();
    for entry in response.entries() {
        for record in entry.rrset().records() {
            if !opts.dnssec && is_dnssec_type(record.record_type()) {
                continue;
            }
            records.push(YamlRecord {
                name: record.name().to_string(),
                ttl: record.ttl(),
                class: record.dns_class().to_string(),
                rtype: record.record_type().to_string(),
                rdata: record.data().to_string(),
                trust: if entry.negative() {
                    response.status().banner(true).trim_start_matches("; ").replace(' ', "_")
                } else {
                    entry.trust_level().yaml_tag(false)
                },
            });
        }
    }

    let doc = YamlDocument {
        qtype: qtype.to_string(),
        query_name: qname.to_string(),
        status: status_tag(response.status()),
        records,
    };

    serde_yaml::to_string(&doc).map_err(|e| CliError::BadArgument(e.to_string()))
}

fn status_tag(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Secure => "secure",
        ValidationStatus::Insecure => "insecure",
        ValidationStatus::Bogus => "bogus",
        ValidationStatus::Indeterminate => "indeterminate",
    }
}

fn format_record(record: &Record, opts: &PlusOptions) -> String {
    let mut cols = vec![record.name().to_string()];
    if opts.ttl {
        cols.push(record.ttl().to_string());
    }
    if opts.class {
        cols.push(record.dns_class().to_string());
    }
    cols.push(record.record_type().to_string());
    cols.push(format_rdata(record, opts));
    cols.join("\t")
}

fn format_rdata(record: &Record, opts: &PlusOptions) -> String {
    let text = record.data().to_string();
    if !opts.crypto && matches!(record.record_type(), RecordType::RRSIG | RecordType::DNSKEY | RecordType::DS) {
        return suppress_crypto_blob(&text);
    }
    apply_split(&text, opts)
}

/// Drops the trailing base64/hex blob of a signature or key record,
/// keeping the leading fixed fields readable.
fn suppress_crypto_blob(text: &str) -> String {
    match text.rsplit_once(' ') {
        Some((head, _blob)) => format!("{head} [omitted by +nocrypto]"),
        None => "[omitted by +nocrypto]".to_string(),
    }
}

/// Wraps the trailing base64/hex blob of a signature or key record across
/// `+split`-width columns, only under `+multiline`.
fn apply_split(text: &str, opts: &PlusOptions) -> String {
    if !opts.multiline || opts.split == 0 {
        return text.to_string();
    }
    let width = split_width(opts.split) as usize;
    match text.rsplit_once(' ') {
        Some((head, blob)) if is_encoded_blob(blob) && blob.len() > width => {
            let chunks: Vec<&str> = blob.as_bytes().chunks(width).map(|c| std::str::from_utf8(c).unwrap_or_default()).collect();
            format!("{head} (\n\t\t\t\t{} )", chunks.join("\n\t\t\t\t"))
        }
        _ => text.to_string(),
    }
}

fn is_encoded_blob(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
}

/// Reproduces the original tool's `+split` width quirk bit-for-bit: a
/// requested width of `n` columns actually wraps at `((n + 3) / 4) * 4 + 3`.
/// `0` means "no splitting" and passes through unchanged.
pub fn split_width(raw: u32) -> u32 {
    if raw == 0 {
        0
    } else {
        ((raw + 3) / 4) * 4 + 3
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use delv_proto::dnssec::TrustLevel;
    use delv_proto::op::ResponseCode;
    use delv_proto::rr::rdata::A;
    use delv_proto::rr::{RData, RRset};
    use delv_resolver::response_set::ResponseEntry;

    use super::*;

    fn fixture_entry() -> ResponseEntry {
        let record = Record::from_rdata(Name::from_str("example.com.").unwrap(), 300, RData::A(A::new(93, 184, 215, 14)));
        ResponseEntry::new(Name::from_str("example.com.").unwrap(), RRset::new(record), TrustLevel::Secure, false)
    }

    #[test]
    fn split_width_matches_quirk_formula() {
        assert_eq!(split_width(0), 0);
        assert_eq!(split_width(1), 7);
        assert_eq!(split_width(4), 7);
        assert_eq!(split_width(28), 31);
    }

    #[test]
    fn zone_mode_prepends_trust_banner() {
        let mut set = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);
        set.push(fixture_entry());
        let opts = PlusOptions::default();
        let text = render_zone(&set, &opts);
        assert!(text.starts_with("; fully validated\n"));
        assert!(text.contains("example.com."));
    }

    #[test]
    fn negative_banner_reflects_actual_status() {
        let record = Record::from_rdata(Name::from_str("example.com.").unwrap(), 300, RData::A(A::new(93, 184, 215, 14)));
        let entry = ResponseEntry::new(Name::from_str("example.com.").unwrap(), RRset::new(record), TrustLevel::Answer, true);

        let mut insecure = ResponseSet::new(ValidationStatus::Insecure, ResponseCode::NXDomain);
        insecure.push(entry.clone());
        let text = render_zone(&insecure, &PlusOptions::default());
        assert!(text.starts_with("; unsigned answer\n"));
        assert!(!text.contains("negative response, fully validated"));

        let mut secure = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NXDomain);
        secure.push(entry);
        let text = render_zone(&secure, &PlusOptions::default());
        assert!(text.starts_with("; negative response, fully validated\n"));
    }

    #[test]
    fn notrust_suppresses_banner() {
        let mut set = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);
        set.push(fixture_entry());
        let mut opts = PlusOptions::default();
        opts.trust = false;
        let text = render_zone(&set, &opts);
        assert!(!text.starts_with(';'));
    }

    #[test]
    fn short_mode_is_rdata_only() {
        let mut set = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);
        set.push(fixture_entry());
        let text = render_short(&set, &PlusOptions::default());
        assert_eq!(text, "93.184.215.14");
    }

    #[test]
    fn nodnssec_hides_ds_records() {
        use delv_proto::dnssec::{Algorithm, DigestType};
        use delv_proto::rr::rdata::DS;

        let ds = Record::from_rdata(
            Name::from_str("example.com.").unwrap(),
            300,
            RData::DS(DS::new(12345, Algorithm::from(8), DigestType::from(2), vec![0xab; 32])),
        );
        let entry = ResponseEntry::new(Name::from_str("example.com.").unwrap(), RRset::new(ds), TrustLevel::Secure, false);
        let mut set = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);
        set.push(entry);

        let mut opts = PlusOptions::default();
        opts.dnssec = false;
        let text = render_zone(&set, &opts);
        assert!(!text.contains("DS"));
    }

    #[test]
    fn noclass_and_nottl_drop_columns() {
        let mut opts = PlusOptions::default();
        opts.class = false;
        opts.ttl = false;
        let record = Record::from_rdata(Name::from_str("example.com.").unwrap(), 300, RData::A(A::new(1, 2, 3, 4)));
        let line = format_record(&record, &opts);
        assert_eq!(line, "example.com.\tA\t1.2.3.4");
    }

    #[test]
    fn yaml_mode_includes_trust_tag() {
        let mut set = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);
        set.push(fixture_entry());
        let text = render(&set, &Name::from_str("example.com.").unwrap(), RecordType::A, &PlusOptions {
            yaml: true,
            ..PlusOptions::default()
        })
        .unwrap();
        assert!(text.contains("fully_validated"));
        assert!(text.contains("query_name"));
    }
}
