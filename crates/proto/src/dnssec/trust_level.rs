// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The trust ladder a validated RRset is annotated with (§3, Data Model).
//!
//! Mirrors `dns_trust_t` from the original `bind9` validator: every rung
//! above `Answer` requires an actual cryptographic check to have passed, so
//! that a broken chain can never be "upgraded" just by visiting more of it
//! (testable property 3, §8).

use std::fmt;

/// Totally ordered trust ladder. Derives `Ord` from declaration order, so
/// `TrustLevel::None < TrustLevel::Ultimate` and so on down the list in §3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TrustLevel {
    /// No trust has been established at all.
    None,
    /// Came from the additional section of a response still in flight.
    PendingAdditional,
    /// Came from the answer section of a response still in flight.
    PendingAnswer,
    /// Additional-section data from a fully processed response.
    Additional,
    /// Glue records accompanying a delegation.
    Glue,
    /// Plain answer-section data with no DNSSEC verification attempted.
    Answer,
    /// Authority-section data from an authoritative server.
    AuthAuthority,
    /// Answer-section data from an authoritative server.
    AuthAnswer,
    /// At least one RRSIG chain to a trust anchor verified (§4.4.5).
    Secure,
    /// Matches a configured trust anchor exactly.
    Ultimate,
}

impl TrustLevel {
    /// The literal banner text the original `delv` prints for this level
    /// (see `showtrust`/`trust_totext` in the original source), used
    /// verbatim by the output formatter.
    pub fn banner(self, negative: bool) -> &'static str {
        if negative {
            return "negative response, fully validated";
        }
        match self {
            Self::None => "untrusted",
            Self::PendingAdditional => "pending additional",
            Self::PendingAnswer => "pending answer",
            Self::Additional => "additional",
            Self::Glue => "glue",
            Self::Answer => "answer not validated",
            Self::AuthAuthority => "authority",
            Self::AuthAnswer => "authoritative",
            Self::Secure => "fully validated",
            Self::Ultimate => "ultimate trust",
        }
    }

    /// The YAML-mode trust string: the banner with spaces replaced by
    /// underscores (§4.5, §8 end-to-end scenario for `+yaml`).
    pub fn yaml_tag(self, negative: bool) -> String {
        self.banner(negative).replace(' ', "_")
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.banner(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_totally_ordered_per_spec() {
        let ladder = [
            TrustLevel::None,
            TrustLevel::PendingAdditional,
            TrustLevel::PendingAnswer,
            TrustLevel::Additional,
            TrustLevel::Glue,
            TrustLevel::Answer,
            TrustLevel::AuthAuthority,
            TrustLevel::AuthAnswer,
            TrustLevel::Secure,
            TrustLevel::Ultimate,
        ];
        for window in ladder.windows(2) {
            assert!(window[0] < window[1], "{:?} !< {:?}", window[0], window[1]);
        }
    }

    #[test]
    fn yaml_tag_replaces_spaces() {
        assert_eq!(TrustLevel::Answer.yaml_tag(false), "answer_not_validated");
        assert_eq!(
            TrustLevel::Secure.yaml_tag(true),
            "negative_response,_fully_validated"
        );
    }
}
