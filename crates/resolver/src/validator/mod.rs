// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The DNSSEC validation walk (§4.4): find the signing zone, establish
//! trust in its `DNSKEY` set, verify the answer's `RRSIG`s against it,
//! repeating up the chain to a trust anchor. State lives in `ChainCache`
//! and `ValidationState`, both scoped to a single `resolve()` call.

mod state;

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use delv_proto::dnssec::{digest_dnskey, verify_rrsig, TrustAnchorStore, TrustLevel};
use delv_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use delv_proto::rr::{Name, RData, Record, RecordType};

use crate::config::ResolveOpts;
use crate::error::ResolveResult;
use crate::name_server;
use crate::response_set::ValidationStatus;

pub use state::ValidationState;

/// Validated `DNSKEY` evidence gathered while walking one query's chain of
/// trust, keyed by `(zone, DNSKEY)` so repeated links (a DS walk
/// revisiting an already-fetched parent, or a CNAME chain crossing back
/// into an already-proven zone) are not re-fetched or re-verified.
///
/// Created per `resolve()` call and dropped at its end (§4.4 expansion,
/// §5's "MAY be maintained across a single resolve call").
#[derive(Default)]
pub struct ChainCache {
    entries: HashMap<Name, (Vec<Record>, TrustLevel)>,
}

impl ChainCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, zone: &Name) -> Option<&(Vec<Record>, TrustLevel)> {
        self.entries.get(zone)
    }

    fn insert(&mut self, zone: Name, records: Vec<Record>, level: TrustLevel) {
        self.entries.insert(zone, (records, level));
    }
}

/// Splits `records` into the subset owned by `(owner, rtype)` and the
/// RRSIGs covering that type at that owner.
fn split_rrset_and_sigs(records: &[Record], owner: &Name, rtype: RecordType) -> (Vec<Record>, Vec<Record>) {
    let mut data = Vec::new();
    let mut sigs = Vec::new();
    for record in records {
        if record.name() != owner {
            continue;
        }
        if record.record_type() == rtype {
            data.push(record.clone());
        } else if let Some(rrsig) = record.data().as_rrsig() {
            if rrsig.type_covered() == rtype {
                sigs.push(record.clone());
            }
        }
    }
    (data, sigs)
}

fn now() -> u32 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as u32).unwrap_or(0)
}

/// Builds a query message with `DO=1, CD=1` (§4.4's iteration strategy is
/// independent of the user-visible `+cd`; see DESIGN.md's Open Question
/// decision for why the wire bit never follows `opts.no_cd_flag`).
fn build_query(qname: &Name, qtype: RecordType) -> Message {
    let mut message = Message::new(rand::random(), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true).set_checking_disabled(true);
    message.add_query(Query::query(qname.clone(), qtype));

    let mut edns = Edns::default();
    edns.set_dnssec_ok(true);
    message.set_edns(edns);
    message
}

/// Fetches the RRset for `(qname, qtype)` from the configured upstreams,
/// returning the positive records and the RRSIGs covering them. A missing
/// answer (NXDOMAIN/NODATA) comes back as two empty vectors rather than an
/// error: the validator treats "could not prove the chain" as a trust
/// downgrade, not a transport failure.
async fn fetch_rrset(qname: &Name, qtype: RecordType, opts: &ResolveOpts) -> ResolveResult<(Vec<Record>, Vec<Record>)> {
    let query = build_query(qname, qtype);
    let response = name_server::query_servers(&query, opts).await?;
    if response.response_code() != ResponseCode::NoError {
        return Ok((Vec::new(), Vec::new()));
    }
    Ok(split_rrset_and_sigs(response.answers(), qname, qtype))
}

/// Checks whether any record in `sigs` verifies `records` under some key in
/// `keys`, skipping unsupported algorithms and expired/not-yet-valid
/// signatures rather than treating them as failures (§4.4's algorithm rule).
fn verify_with_any_key(records: &[Record], sigs: &[Record], keys: &[Record]) -> bool {
    sigs.iter().any(|sig| {
        sig.data().as_rrsig().is_some_and(|rrsig| {
            rrsig.algorithm().is_supported()
                && rrsig.is_in_validity_window(now())
                && keys.iter().any(|key_rec| {
                    key_rec
                        .data()
                        .as_dnskey()
                        .is_some_and(|key| verify_rrsig(records, rrsig, key))
                })
        })
    })
}

/// Drives the DNSSEC validation walk for one `resolve()` call.
pub struct Validator<'a> {
    anchors: &'a TrustAnchorStore,
    opts: &'a ResolveOpts,
}

impl<'a> Validator<'a> {
    pub fn new(anchors: &'a TrustAnchorStore, opts: &'a ResolveOpts) -> Self {
        Self { anchors, opts }
    }

    /// Establishes trust in `zone`'s `DNSKEY` RRset, per §4.4's five-step
    /// walk (steps 1-2 folded together: the caller already knows `zone`
    /// from an RRSIG's signer name). Returns the zone's `DNSKEY` records
    /// and the `TrustLevel` reached; `TrustLevel::None` means the chain
    /// could not be established (`Indeterminate`, not `Bogus`, at the
    /// caller).
    #[async_recursion::async_recursion]
    pub async fn establish_zone_trust(&self, zone: &Name, cache: &mut ChainCache) -> (Vec<Record>, TrustLevel) {
        if let Some((keys, level)) = cache.get(zone) {
            return (keys.clone(), *level);
        }

        // Anchor-as-DNSKEY seeds directly as `Ultimate`: the anchor key
        // itself is trusted, no fetch or signature check needed.
        let key_anchors: Vec<Record> = self
            .anchors
            .find(zone)
            .into_iter()
            .filter_map(|a| a.as_key())
            .map(|k| Record::from_rdata(zone.clone(), 0, RData::DNSKEY(k.clone())))
            .collect();
        if !key_anchors.is_empty() {
            cache.insert(zone.clone(), key_anchors.clone(), TrustLevel::Ultimate);
            return (key_anchors, TrustLevel::Ultimate);
        }

        let Ok((dnskey_records, dnskey_sigs)) = fetch_rrset(zone, RecordType::DNSKEY, self.opts).await else {
            return (Vec::new(), TrustLevel::None);
        };
        if dnskey_records.is_empty() {
            return (Vec::new(), TrustLevel::None);
        }

        // Anchor-as-DS requires a DNSKEY hash match plus a self-signed KSK
        // step over the zone's own DNSKEY RRset.
        let ds_anchors: Vec<_> = self.anchors.find(zone).into_iter().filter_map(|a| a.as_ds()).collect();
        if !ds_anchors.is_empty() {
            let matches_anchor = dnskey_records
                .iter()
                .filter_map(|r| r.data().as_dnskey())
                .any(|key| self.anchors.matches_ds_anchor(zone, key));
            if matches_anchor && verify_with_any_key(&dnskey_records, &dnskey_sigs, &dnskey_records) {
                cache.insert(zone.clone(), dnskey_records.clone(), TrustLevel::Secure);
                return (dnskey_records, TrustLevel::Secure);
            }
            return (Vec::new(), TrustLevel::None);
        }

        // No anchor here: walk up to the parent zone, fetch a DS for this
        // zone, and validate it the same way an anchor DS would be used.
        let Some(parent) = zone.base_name() else {
            return (Vec::new(), TrustLevel::None);
        };
        let (parent_keys, parent_level) = self.establish_zone_trust(&parent, cache).await;
        if parent_level == TrustLevel::None {
            return (Vec::new(), TrustLevel::None);
        }

        let Ok((ds_records, ds_sigs)) = fetch_rrset(zone, RecordType::DS, self.opts).await else {
            return (Vec::new(), TrustLevel::None);
        };
        if ds_records.is_empty() || !verify_with_any_key(&ds_records, &ds_sigs, &parent_keys) {
            return (Vec::new(), TrustLevel::None);
        }

        let ds_matches_a_key = dnskey_records.iter().filter_map(|r| r.data().as_dnskey()).any(|key| {
            ds_records.iter().any(|ds_rec| {
                ds_rec.data().as_ds().is_some_and(|ds| {
                    ds.key_tag() == key.key_tag() && digest_dnskey(ds.digest_type(), zone, key).as_deref() == Some(ds.digest())
                })
            })
        });
        if ds_matches_a_key && verify_with_any_key(&dnskey_records, &dnskey_sigs, &dnskey_records) {
            cache.insert(zone.clone(), dnskey_records.clone(), TrustLevel::Secure);
            return (dnskey_records, TrustLevel::Secure);
        }
        (Vec::new(), TrustLevel::None)
    }

    /// Validates one answer RRset: finds its signing zone from an RRSIG's
    /// `signer_name`, establishes trust in that zone, and checks the
    /// RRset's signatures against it. Returns the trust level to record
    /// alongside the RRset and the overall status this evidence implies.
    pub async fn validate_rrset(
        &self,
        records: &[Record],
        rrsigs: &[Record],
        cache: &mut ChainCache,
    ) -> (TrustLevel, ValidationStatus) {
        if self.opts.no_dnssec || self.opts.no_validate {
            return (TrustLevel::Answer, ValidationStatus::Insecure);
        }
        if rrsigs.is_empty() {
            return (TrustLevel::Answer, ValidationStatus::Insecure);
        }

        let mut any_supported = false;
        let mut any_chain_unreachable = false;
        for sig in rrsigs {
            let Some(rrsig) = sig.data().as_rrsig() else { continue };
            if !rrsig.algorithm().is_supported() {
                continue;
            }
            any_supported = true;
            if !rrsig.is_in_validity_window(now()) {
                continue;
            }
            let (keys, zone_level) = self.establish_zone_trust(rrsig.signer_name(), cache).await;
            if zone_level == TrustLevel::None {
                any_chain_unreachable = true;
                continue;
            }
            if keys
                .iter()
                .filter_map(|k| k.data().as_dnskey())
                .any(|key| verify_rrsig(records, rrsig, key))
            {
                return (TrustLevel::Secure, ValidationStatus::Secure);
            }
        }

        if !any_supported {
            // Every RRSIG used an algorithm this resolver cannot verify:
            // treated as unsigned, not failed (§4.4's algorithm-support rule).
            return (TrustLevel::Answer, ValidationStatus::Insecure);
        }
        if any_chain_unreachable {
            return (TrustLevel::Answer, ValidationStatus::Indeterminate);
        }
        (TrustLevel::Answer, ValidationStatus::Bogus)
    }
}
