// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The public entry point (§4.4): `resolve`/`resolve_query` perform one
//! recursive-upstream lookup and return a fully classified `ResponseSet`.

use delv_proto::dnssec::{check_nsec, check_nsec3, NsecProof, TrustAnchorStore, TrustLevel};
use delv_proto::op::{Edns, Message, MessageType, OpCode, Query as WireQuery, ResponseCode};
use delv_proto::rr::{DNSClass, Name, RRset, Record, RecordType};

use crate::config::ResolveOpts;
use crate::error::{ResolveError, ResolveResult};
use crate::name_server;
use crate::response_set::{ResponseEntry, ResponseSet, ValidationStatus};
use crate::validator::{ChainCache, Validator};

/// The input to one `resolve()` call (§3 `[EXPANSION]` `Query`).
#[derive(Clone, Debug)]
pub struct Query {
    pub qname: Name,
    pub qtype: RecordType,
    pub qclass: DNSClass,
    pub opts: ResolveOpts,
}

/// Performs one query against the configured upstreams, validates every
/// RRset it finds against `anchors`, and returns the classified result.
pub async fn resolve(
    qname: &Name,
    qtype: RecordType,
    qclass: DNSClass,
    anchors: &TrustAnchorStore,
    opts: &ResolveOpts,
) -> ResolveResult<ResponseSet> {
    reject_zone_transfer(qtype)?;
    if !opts.no_dnssec && !opts.no_validate && anchors.is_empty() {
        return Err(ResolveError::NoTrustedKeys);
    }

    let message = build_outgoing_query(qname, qtype, qclass, opts);
    let response = name_server::query_servers(&message, opts).await?;

    let mut cache = ChainCache::new();
    let validator = Validator::new(anchors, opts);

    match response.response_code() {
        ResponseCode::NoError => classify_positive(&response, qname, &validator, &mut cache, opts).await,
        ResponseCode::NXDomain => classify_negative(&response, qname, true, &validator, &mut cache, opts).await,
        rcode => Ok(ResponseSet::new(ValidationStatus::Insecure, rcode).with_reason(format!("server returned {rcode}"))),
    }
}

/// Convenience wrapper taking a single `Query` value, for direct use by a
/// CLI driver (§4.4 expansion).
pub async fn resolve_query(query: Query, anchors: &TrustAnchorStore) -> ResolveResult<ResponseSet> {
    resolve(&query.qname, query.qtype, query.qclass, anchors, &query.opts).await
}

fn reject_zone_transfer(qtype: RecordType) -> ResolveResult<()> {
    if qtype.is_zone_transfer() {
        return Err(ResolveError::UnsupportedQuery(qtype.to_string()));
    }
    Ok(())
}

fn build_outgoing_query(qname: &Name, qtype: RecordType, qclass: DNSClass, opts: &ResolveOpts) -> Message {
    let mut message = Message::new(rand::random(), MessageType::Query, OpCode::Query);
    // Always CD=1 on the wire: the user-visible `+cd`/`+nocd` only affects
    // display (DESIGN.md's Open Question decision), this engine always
    // wants to see the evidence itself rather than trust the upstream.
    message.set_recursion_desired(true).set_checking_disabled(true);

    let mut query = WireQuery::query(qname.clone(), qtype);
    query.set_query_class(qclass);
    message.add_query(query);

    if !opts.no_dnssec {
        let mut edns = Edns::default();
        edns.set_dnssec_ok(true);
        message.set_edns(edns);
    }
    message
}

/// Groups `records` into `RRset`s keyed by `(name, type)`, in first-seen
/// order (no `Ord` impl on `RecordType` rules out a `BTreeMap`, and answer
/// order is itself meaningful per §3's "ordered ... list"). RRSIGs are
/// attached to their covered set rather than kept as their own entry; OPT
/// never appears here (handled at the message level).
fn group_rrsets(records: &[Record]) -> Vec<(Name, RecordType, RRset)> {
    let mut sets: Vec<(Name, RecordType, RRset)> = Vec::new();

    for record in records {
        let rtype = record.record_type();
        if matches!(rtype, RecordType::RRSIG | RecordType::OPT) {
            continue;
        }
        match sets.iter_mut().find(|(name, t, _)| name == record.name() && *t == rtype) {
            Some((_, _, set)) => set.push(record.clone()),
            None => sets.push((record.name().clone(), rtype, RRset::new(record.clone()))),
        }
    }

    for record in records {
        let Some(rrsig) = record.data().as_rrsig() else { continue };
        if let Some((_, _, set)) = sets
            .iter_mut()
            .find(|(name, t, _)| name == record.name() && *t == rrsig.type_covered())
        {
            set.push_rrsig(record.clone());
        }
    }

    sets
}

async fn classify_positive(
    response: &Message,
    qname: &Name,
    validator: &Validator<'_>,
    cache: &mut ChainCache,
    opts: &ResolveOpts,
) -> ResolveResult<ResponseSet> {
    let sets = group_rrsets(response.answers());

    if sets.is_empty() {
        // NOERROR with no matching data: NODATA, proven the same way
        // NXDOMAIN is (§4.4 step 5, negative answers).
        return classify_negative(response, qname, false, validator, cache, opts).await;
    }

    let mut overall = ValidationStatus::Secure;
    let mut out = ResponseSet::new(ValidationStatus::Secure, ResponseCode::NoError);

    for (name, _rtype, rrset) in sets {
        let (trust_level, status) = if opts.no_dnssec || opts.no_validate {
            (TrustLevel::Answer, ValidationStatus::Insecure)
        } else {
            validator.validate_rrset(rrset.records(), rrset.rrsigs(), cache).await
        };

        overall = worse_of(overall, status);

        let mut rrset = rrset;
        rrset.set_trust_level(trust_level);
        // Bogus per §4.4's result taxonomy: suppressed from output, not
        // from the overall status (which must still reflect the failure).
        if !matches!(status, ValidationStatus::Bogus) {
            out.push(ResponseEntry::new(name, rrset, trust_level, false));
        }
    }

    out.set_status(overall);
    Ok(out)
}

async fn classify_negative(
    response: &Message,
    qname: &Name,
    is_nxdomain: bool,
    validator: &Validator<'_>,
    cache: &mut ChainCache,
    opts: &ResolveOpts,
) -> ResolveResult<ResponseSet> {
    let rcode = if is_nxdomain { ResponseCode::NXDomain } else { ResponseCode::NoError };

    if opts.no_dnssec || opts.no_validate {
        return Ok(ResponseSet::new(ValidationStatus::Insecure, rcode));
    }

    let nsec_sets = group_rrsets(response.authorities());
    let mut proof_status = ValidationStatus::Indeterminate;
    let mut covered = false;
    let mut proven: Vec<(Name, RRset, ValidationStatus)> = Vec::new();

    for (owner, rtype, rrset) in &nsec_sets {
        let proof = match rtype {
            RecordType::NSEC => rrset
                .records()
                .first()
                .and_then(|r| r.data().as_nsec())
                .map(|nsec| check_nsec(owner, nsec, qname)),
            RecordType::NSEC3 => {
                let zone = owner.base_name().unwrap_or_else(|| owner.clone());
                rrset
                    .records()
                    .first()
                    .and_then(|r| r.data().as_nsec3())
                    .map(|nsec3| check_nsec3(&zone, owner, nsec3, qname))
            }
            _ => None,
        };

        if !matches!(proof, Some(NsecProof::Match) | Some(NsecProof::Covers)) {
            continue;
        }
        covered = true;

        let (_, status) = validator.validate_rrset(rrset.records(), rrset.rrsigs(), cache).await;
        proof_status = worse_of(proof_status, status);
        proven.push((owner.clone(), rrset.clone(), status));
    }

    let status = if covered { proof_status } else { ValidationStatus::Indeterminate };

    let mut out = ResponseSet::new(status, rcode);
    // Bogus per-RRset, same as classify_positive: suppressed from output,
    // not from the overall status.
    for (owner, rrset, rrset_status) in proven {
        if !matches!(rrset_status, ValidationStatus::Bogus) {
            out.push(ResponseEntry::new(owner, rrset, TrustLevel::Answer, true));
        }
    }
    Ok(out)
}

/// Combines two statuses, keeping the more severe one: `Bogus` outranks
/// `Indeterminate`, which outranks `Insecure`, which outranks `Secure`.
fn worse_of(a: ValidationStatus, b: ValidationStatus) -> ValidationStatus {
    fn rank(s: ValidationStatus) -> u8 {
        match s {
            ValidationStatus::Secure => 0,
            ValidationStatus::Insecure => 1,
            ValidationStatus::Indeterminate => 2,
            ValidationStatus::Bogus => 3,
        }
    }
    if rank(b) > rank(a) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use delv_proto::rr::rdata::A;
    use delv_proto::rr::RData;

    use super::*;

    #[test]
    fn group_rrsets_attaches_matching_rrsigs_only() {
        let name = Name::from_str("example.com.").unwrap();
        let a = Record::from_rdata(name, 300, RData::A(A::new(93, 184, 215, 14)));
        let sets = group_rrsets(&[a]);
        assert_eq!(sets.len(), 1);
        assert!(sets[0].2.rrsigs().is_empty());
    }

    #[test]
    fn worse_of_prefers_bogus_over_everything() {
        assert_eq!(worse_of(ValidationStatus::Secure, ValidationStatus::Bogus), ValidationStatus::Bogus);
        assert_eq!(worse_of(ValidationStatus::Bogus, ValidationStatus::Secure), ValidationStatus::Bogus);
        assert_eq!(
            worse_of(ValidationStatus::Insecure, ValidationStatus::Indeterminate),
            ValidationStatus::Indeterminate
        );
    }
}
