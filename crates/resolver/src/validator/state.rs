// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `ValidationState` and the per-query state machine (§3 Data Model, §4.4
//! "State machine"). `Validator::validate_rrset`/`establish_zone_trust`
//! drive this machine through `.await` suspension points rather than a
//! hand-rolled poll loop; this type exists so the phase a query is in can
//! be inspected and logged, matching §4.4's named phases exactly.

use delv_proto::dnssec::TrustLevel;
use delv_proto::rr::{Name, Record};

/// One phase of a single `resolve()` call's validation walk. Transitions
/// only forward; `AwaitingChainDeps` may be entered more than once if a
/// CNAME chain or a DS walk requires more than one dependent fetch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Init,
    AwaitingAnswer,
    AwaitingChainDeps,
    Validating,
    Done,
}

/// Tracks the zone currently being established and what has been fetched
/// so far for it (§3's `ValidationState`). One instance exists per
/// in-flight chain link; `establish_zone_trust`'s recursion creates a new
/// one per zone visited, all sharing the same `ChainCache` for memoization.
#[derive(Clone, Debug)]
pub struct ValidationState {
    /// The name a trust anchor was (or would be) configured under for this
    /// chain link -- usually the zone itself once an anchor matches.
    pub anchor_name: Option<Name>,
    /// The zone whose `DNSKEY` set is being established.
    pub current_zone: Name,
    /// `DNSKEY` records fetched for `current_zone`, once available.
    pub zone_dnskeys: Vec<Record>,
    /// Sub-queries (`DS`, `DNSKEY`, occasionally `NS`) still outstanding
    /// before this link can be validated.
    pub pending_fetches: Vec<Name>,
    phase: Phase,
}

impl ValidationState {
    pub fn new(current_zone: Name) -> Self {
        Self {
            anchor_name: None,
            current_zone,
            zone_dnskeys: Vec::new(),
            pending_fetches: Vec::new(),
            phase: Phase::Init,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn advance_to(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Records the zone's established keys and moves to `Validating`.
    pub fn resolve_dnskeys(&mut self, keys: Vec<Record>) {
        self.zone_dnskeys = keys;
        self.pending_fetches.clear();
        self.advance_to(Phase::Validating);
    }

    /// Finishes the walk, reporting the level reached at `current_zone`.
    pub fn finish(&mut self) -> TrustLevel {
        self.advance_to(Phase::Done);
        if self.zone_dnskeys.is_empty() {
            TrustLevel::None
        } else {
            TrustLevel::Secure
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn phases_advance_in_order() {
        let mut state = ValidationState::new(Name::from_str("example.com.").unwrap());
        assert_eq!(*state.phase(), Phase::Init);
        state.advance_to(Phase::AwaitingAnswer);
        state.pending_fetches.push(Name::from_str("com.").unwrap());
        state.advance_to(Phase::AwaitingChainDeps);
        state.resolve_dnskeys(Vec::new());
        assert_eq!(*state.phase(), Phase::Validating);
        assert!(state.pending_fetches.is_empty());
        assert_eq!(state.finish(), TrustLevel::None);
        assert_eq!(*state.phase(), Phase::Done);
    }
}
