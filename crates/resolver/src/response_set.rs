// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `ResponseSet` (§3): the ordered `(Name, RRset, TrustLevel, negative)`
//! list a `resolve()` call produces, plus a final status.

use delv_proto::dnssec::TrustLevel;
use delv_proto::op::ResponseCode;
use delv_proto::rr::{Name, RRset};

/// One RRset entered into a `ResponseSet`, with the trust level the
/// validator settled on and whether it stands for a negative (NXDOMAIN/
/// NODATA) answer rather than positive data.
#[derive(Clone, Debug)]
pub struct ResponseEntry {
    name: Name,
    rrset: RRset,
    trust_level: TrustLevel,
    negative: bool,
}

impl ResponseEntry {
    pub fn new(name: Name, rrset: RRset, trust_level: TrustLevel, negative: bool) -> Self {
        Self {
            name,
            rrset,
            trust_level,
            negative,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn rrset(&self) -> &RRset {
        &self.rrset
    }

    pub fn trust_level(&self) -> TrustLevel {
        self.trust_level
    }

    pub fn negative(&self) -> bool {
        self.negative
    }
}

/// The overall classification a `resolve()` call settles on, independent of
/// the per-RRset `TrustLevel`s recorded alongside each answer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationStatus {
    /// A full chain of trust was verified down to the answer.
    Secure,
    /// No DNSSEC evidence was available (unsigned zone, or validation
    /// skipped by `+nodnssec`/`+noroot`).
    Insecure,
    /// DNSSEC evidence was present but failed to verify.
    Bogus,
    /// Not enough evidence to tell `Insecure` from `Bogus` apart (e.g. a
    /// chain link could not be fetched at all).
    Indeterminate,
}

impl ValidationStatus {
    /// The trust banner text the formatter prepends, matching the literal
    /// `dns_trust` strings the original tool prints ahead of each group.
    pub fn banner(self, negative: bool) -> &'static str {
        match (self, negative) {
            (Self::Secure, false) => "; fully validated",
            (Self::Secure, true) => "; negative response, fully validated",
            (Self::Insecure, _) => "; unsigned answer",
            (Self::Bogus, _) => "; answer not validated",
            (Self::Indeterminate, _) => "; answer not validated",
        }
    }
}

/// The complete result of one `resolve()` call (§3 `ResponseSet`).
#[derive(Clone, Debug)]
pub struct ResponseSet {
    entries: Vec<ResponseEntry>,
    status: ValidationStatus,
    rcode: ResponseCode,
    reason: Option<String>,
}

impl ResponseSet {
    pub fn new(status: ValidationStatus, rcode: ResponseCode) -> Self {
        Self {
            entries: Vec::new(),
            status,
            rcode,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Records one RRset. Bogus RRsets are still recorded here; the
    /// formatter is responsible for suppressing a `Bogus` answer from
    /// output (§4.4's result taxonomy), not this type.
    pub fn push(&mut self, entry: ResponseEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    /// Overrides the overall status once every entry has been classified
    /// (callers accumulate the worst status across entries as they go).
    pub fn set_status(&mut self, status: ValidationStatus) {
        self.status = status;
    }

    pub fn rcode(&self) -> ResponseCode {
        self.rcode
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// True if any recorded RRset was marked `Bogus` at the top level; the
    /// formatter uses this to decide whether to suppress the answer.
    pub fn is_bogus(&self) -> bool {
        matches!(self.status, ValidationStatus::Bogus)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use delv_proto::rr::rdata::A;
    use delv_proto::rr::{RData, Record};

    use super::*;

    fn fixture_rrset() -> RRset {
        RRset::new(Record::from_rdata(
            Name::from_str("example.com.").unwrap(),
            300,
            RData::A(A::new(93, 184, 215, 14)),
        ))
    }

    #[test]
    fn bogus_status_is_detected() {
        let mut set = ResponseSet::new(ValidationStatus::Bogus, ResponseCode::NoError);
        set.push(ResponseEntry::new(
            Name::from_str("example.com.").unwrap(),
            fixture_rrset(),
            TrustLevel::Answer,
            false,
        ));
        assert!(set.is_bogus());
    }

    #[test]
    fn banner_matches_negative_secure_wording() {
        assert_eq!(
            ValidationStatus::Secure.banner(true),
            "; negative response, fully validated"
        );
        assert_eq!(ValidationStatus::Insecure.banner(false), "; unsigned answer");
    }
}
