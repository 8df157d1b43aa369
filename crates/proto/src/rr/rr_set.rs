// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `RRset`: a set of records sharing an owner, type, and class, together
//! with the trust level the validator has established for it.

use tracing::debug;

use crate::dnssec::TrustLevel;
use crate::rr::{DNSClass, Name, Record, RecordType};

/// A set of resource records that share `(owner, type, class)`, plus
/// whatever RRSIGs cover them and the trust level the validator assigned.
#[derive(Clone, Debug)]
pub struct RRset {
    name: Name,
    record_type: RecordType,
    dns_class: DNSClass,
    ttl: u32,
    records: Vec<Record>,
    rrsigs: Vec<Record>,
    trust_level: TrustLevel,
}

impl RRset {
    /// Builds an `RRset` from its first record; further records are added
    /// with `push` and must match owner, type, and class.
    pub fn new(first: Record) -> Self {
        Self {
            name: first.name().clone(),
            record_type: first.record_type(),
            dns_class: first.dns_class(),
            ttl: first.ttl(),
            records: vec![first],
            rrsigs: Vec::new(),
            trust_level: TrustLevel::None,
        }
    }

    /// The owner name shared by every record in the set.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The record type shared by every record in the set.
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// The class shared by every record in the set.
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// The TTL to use when displaying or re-signing this set; per RFC 2181
    /// §5.2 all records in an RRset must share one TTL, so the minimum of
    /// the wire TTLs observed is kept.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The member records, excluding RRSIGs.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The RRSIG records covering this set, if any were received alongside it.
    pub fn rrsigs(&self) -> &[Record] {
        &self.rrsigs
    }

    /// The trust level the validator has assigned this set so far.
    pub fn trust_level(&self) -> TrustLevel {
        self.trust_level
    }

    /// Raises the trust level, never lowering it (monotonicity invariant).
    pub fn set_trust_level(&mut self, level: TrustLevel) {
        if level > self.trust_level {
            self.trust_level = level;
        }
    }

    /// Adds a record to the set, asserting it matches owner/type/class, and
    /// shrinking the set's TTL to the minimum seen (RFC 2181 §5.2).
    pub fn push(&mut self, record: Record) {
        debug_assert_eq!(record.name(), &self.name);
        debug_assert_eq!(record.record_type(), self.record_type);
        if record.ttl() < self.ttl {
            debug!(
                "rrset {} {} ttl shrunk from {} to {}",
                self.name,
                self.record_type,
                self.ttl,
                record.ttl()
            );
            self.ttl = record.ttl();
        }
        self.records.push(record);
    }

    /// Adds an RRSIG record believed to cover this set.
    pub fn push_rrsig(&mut self, rrsig: Record) {
        self.rrsigs.push(rrsig);
    }

    /// True if the set has no member records (RRSIG-only placeholders
    /// never occur in this resolver, which builds sets from answers).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::rr::rdata::A;
    use crate::rr::RData;

    fn a_record(ttl: u32) -> Record {
        Record::from_rdata(
            Name::from_str("example.com.").unwrap(),
            ttl,
            RData::A(A::new(93, 184, 215, 14)),
        )
    }

    #[test]
    fn ttl_shrinks_to_minimum_member() {
        let mut set = RRset::new(a_record(300));
        set.push(a_record(60));
        assert_eq!(set.ttl(), 60);
    }

    #[test]
    fn trust_level_never_decreases() {
        let mut set = RRset::new(a_record(300));
        set.set_trust_level(TrustLevel::Secure);
        set.set_trust_level(TrustLevel::Additional);
        assert_eq!(set.trust_level(), TrustLevel::Secure);
    }
}
