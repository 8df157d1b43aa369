// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Denial-of-existence proofs: NSEC (RFC 4034 §4) and NSEC3 (RFC 5155 §5,
//! §8) covering and match checks used to validate NXDOMAIN/NODATA
//! responses (§4.4.2 step 5).

use data_encoding::BASE32_DNSSEC;
use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};

use crate::rr::rdata::{NSEC, NSEC3};
use crate::rr::{Name, RecordType};

/// The outcome of checking a single NSEC/NSEC3 record against a query name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NsecProof {
    /// The record's owner exactly matches the query name (a NODATA proof).
    Match,
    /// The record's span covers (but does not match) the query name.
    Covers,
    /// The record is unrelated to the query name.
    NoProof,
}

/// Computes the RFC 5155 §5 iterated hash of `name` under `salt` and
/// `iterations`, base32hex-encoded the way NSEC3 owner names are formed.
pub fn nsec3_hash(name: &Name, salt: &[u8], iterations: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    name.emit_canonical(&mut buf);
    buf.extend_from_slice(salt);

    let mut h = digest(&SHA1_FOR_LEGACY_USE_ONLY, &buf).as_ref().to_vec();
    for _ in 0..iterations {
        let mut input = h;
        input.extend_from_slice(salt);
        h = digest(&SHA1_FOR_LEGACY_USE_ONLY, &input).as_ref().to_vec();
    }
    h
}

/// Renders an NSEC3 hash as the lowercase base32hex label used as an owner
/// name, e.g. `q04jkcevqvmu85r014c7dkba38o0ji5r`.
pub fn nsec3_hash_label(hash: &[u8]) -> String {
    BASE32_DNSSEC.encode(hash).to_ascii_lowercase()
}

/// Checks an NSEC record against `qname`: does its owner match, does its
/// `(owner, next_domain_name)` span cover it, or is it unrelated?
pub fn check_nsec(owner: &Name, nsec: &NSEC, qname: &Name) -> NsecProof {
    if owner == qname {
        return NsecProof::Match;
    }
    if covers(owner, nsec.next_domain_name(), qname) {
        NsecProof::Covers
    } else {
        NsecProof::NoProof
    }
}

/// Checks an NSEC3 record against the hash of `qname` under the record's
/// own zone parameters, by comparing the hashed owner label to the hashed
/// query name and the record's `next_hashed_owner_name`.
pub fn check_nsec3(zone: &Name, owner: &Name, nsec3: &NSEC3, qname: &Name) -> NsecProof {
    let Some(owner_hash) = owner_hash_label(owner, zone) else {
        return NsecProof::NoProof;
    };
    let qname_hash = nsec3_hash(qname, nsec3.salt(), nsec3.iterations());
    let qname_hash_label = nsec3_hash_label(&qname_hash);

    if owner_hash.eq_ignore_ascii_case(&qname_hash_label) {
        return NsecProof::Match;
    }

    let next_hash_label = nsec3_hash_label(nsec3.next_hashed_owner_name());
    if hash_covers(&owner_hash, &next_hash_label, &qname_hash_label) {
        NsecProof::Covers
    } else {
        NsecProof::NoProof
    }
}

/// Extracts an NSEC3 record's owner hash (its leftmost label) if the record
/// lives directly under `zone`.
fn owner_hash_label(owner: &Name, zone: &Name) -> Option<String> {
    if !owner.zone_of(zone) || owner.num_labels() != zone.num_labels() + 1 {
        return None;
    }
    owner.iter().next().map(|l| String::from_utf8_lossy(l).to_ascii_lowercase())
}

/// True if `qname` falls strictly between `owner` and `next` in canonical
/// zone order, including the wraparound span at the end of the zone where
/// `next` sorts before `owner` (the last NSEC record in a zone).
fn covers(owner: &Name, next: &Name, qname: &Name) -> bool {
    if owner < next {
        owner < qname && qname < next
    } else {
        // Wraparound: this is the last NSEC in the zone, pointing back to
        // the apex.
        qname > owner || qname < next
    }
}

/// Same span check as `covers`, but over already base32hex-encoded hash
/// strings rather than `Name`s (hash labels compare correctly byte-wise
/// since the alphabet is monotonic).
fn hash_covers(owner_hash: &str, next_hash: &str, qname_hash: &str) -> bool {
    if owner_hash < next_hash {
        owner_hash < qname_hash && qname_hash < next_hash
    } else {
        qname_hash > owner_hash || qname_hash < next_hash
    }
}

/// True if any NSEC3 record's type bitmap omits `rtype` at `qname`'s
/// owner, proving the query name exists but lacks that type (NODATA).
pub fn nsec3_type_absent(nsec3: &NSEC3, rtype: RecordType) -> bool {
    !nsec3.type_bit_maps().contains(&rtype)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn covers_detects_span_membership() {
        let a = Name::from_str("a.example.com.").unwrap();
        let m = Name::from_str("m.example.com.").unwrap();
        let z = Name::from_str("z.example.com.").unwrap();
        assert!(covers(&a, &z, &m));
        assert!(!covers(&a, &m, &z));
    }

    #[test]
    fn covers_handles_zone_wraparound() {
        let z = Name::from_str("z.example.com.").unwrap();
        let a = Name::from_str("a.example.com.").unwrap();
        let mid = Name::from_str("q.example.com.").unwrap();
        // Last NSEC in the zone: owner z, next wraps back to a.
        assert!(covers(&z, &a, &mid));
    }

    #[test]
    fn nsec3_hash_is_deterministic() {
        let name = Name::from_str("example.com.").unwrap();
        let h1 = nsec3_hash(&name, &[0xAB, 0xCD], 3);
        let h2 = nsec3_hash(&name, &[0xAB, 0xCD], 3);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 20);
    }

    #[test]
    fn nsec3_hash_differs_by_iteration_count() {
        let name = Name::from_str("example.com.").unwrap();
        let h1 = nsec3_hash(&name, &[], 0);
        let h2 = nsec3_hash(&name, &[], 1);
        assert_ne!(h1, h2);
    }
}
