// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Trust anchors: the immutable, startup-loaded roots of the chain of trust
//! (§4.3, Data Model's `TrustAnchor`).

use tracing::warn;

use crate::dnssec::DigestType;
use crate::error::{ProtoError, ProtoResult};
use crate::rr::rdata::{DNSKEY, DS};
use crate::rr::Name;

/// One configured trust anchor. `Static*` anchors come from an
/// operator-supplied file; `Initial*` anchors are the built-in root anchors
/// used for RFC 5011 style initial trust (this tool does not implement
/// automated rollover, so `Initial*` behaves identically to `Static*` except
/// for how the CLI reports its provenance).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TrustAnchor {
    /// An operator-configured DNSKEY.
    StaticKey(DNSKEY),
    /// A built-in (e.g. root) DNSKEY.
    InitialKey(DNSKEY),
    /// An operator-configured DS.
    StaticDS(DS),
    /// A built-in (e.g. root) DS.
    InitialDS(DS),
}

impl TrustAnchor {
    /// True if this anchor is itself a key (rather than a DS hash of one).
    pub fn is_key(&self) -> bool {
        matches!(self, Self::StaticKey(_) | Self::InitialKey(_))
    }

    /// Borrows the DNSKEY, if this anchor carries one directly.
    pub fn as_key(&self) -> Option<&DNSKEY> {
        match self {
            Self::StaticKey(k) | Self::InitialKey(k) => Some(k),
            _ => None,
        }
    }

    /// Borrows the DS, if this anchor is a DS-style anchor.
    pub fn as_ds(&self) -> Option<&DS> {
        match self {
            Self::StaticDS(ds) | Self::InitialDS(ds) => Some(ds),
            _ => None,
        }
    }
}

/// The immutable set of trust anchors loaded at startup, indexed by owner
/// name. `find` is an exact-owner lookup only: a `DS` anchor for
/// `example.com.` never matches a query for `www.example.com.` directly, the
/// validator's walk-up handles that.
#[derive(Clone, Debug, Default)]
pub struct TrustAnchorStore {
    anchors: Vec<(Name, TrustAnchor)>,
}

impl TrustAnchorStore {
    /// An empty store (DNSSEC validation trivially fails `NoTrustedKeys` if
    /// validation is still requested against it).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds an anchor, enforcing the digest-length invariant for DS anchors
    /// (§4.3): an anchor whose digest length does not match its declared
    /// digest type can never validate anything, so it is rejected up front
    /// rather than silently ignored later during verification.
    pub fn add(&mut self, name: Name, anchor: TrustAnchor) -> ProtoResult<()> {
        if let Some(ds) = anchor.as_ds() {
            match ds.digest_type().digest_len() {
                Some(expected) if expected == ds.digest().len() => {}
                Some(expected) => {
                    return Err(ProtoError::Invalid(format!(
                        "trust anchor for {name}: digest length {} does not match {} bytes required for {}",
                        ds.digest().len(),
                        expected,
                        ds.digest_type()
                    )));
                }
                None => {
                    warn!(
                        "trust anchor for {name} uses an unsupported digest type {}, skipping",
                        ds.digest_type()
                    );
                    return Ok(());
                }
            }
        }

        if let Some(key) = anchor.as_key() {
            if !key.algorithm().is_supported() {
                warn!(
                    "trust anchor for {name} uses an unsupported algorithm {}, skipping",
                    key.algorithm()
                );
                return Ok(());
            }
        }

        self.anchors.push((name, anchor));
        Ok(())
    }

    /// Exact-owner lookup of every anchor configured for `name`.
    pub fn find(&self, name: &Name) -> Vec<&TrustAnchor> {
        self.anchors
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, a)| a)
            .collect()
    }

    /// True if no anchors were successfully loaded. A caller requesting
    /// validation against an empty store must fail with `NoTrustedKeys`
    /// rather than silently validating nothing.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// True if `key` matches an anchor for `name` exactly: same flags,
    /// protocol, algorithm, and public key bytes (§8 property 4). This is
    /// the only way a chain reaches `TrustLevel::Ultimate`.
    pub fn matches_key_anchor(&self, name: &Name, key: &DNSKEY) -> bool {
        self.find(name).iter().any(|a| a.as_key() == Some(key))
    }

    /// True if `key`'s digest matches a DS anchor for `name` under that
    /// anchor's declared digest type.
    pub fn matches_ds_anchor(&self, name: &Name, key: &DNSKEY) -> bool {
        self.find(name).iter().any(|a| {
            a.as_ds().is_some_and(|ds| {
                digest_dnskey(ds.digest_type(), name, key).as_deref() == Some(ds.digest())
            })
        })
    }
}

/// Computes the DS digest of `key` as seen at `name`, for the digest type
/// `dt`, using `ring`. Returns `None` for unsupported digest types.
pub fn digest_dnskey(dt: DigestType, name: &Name, key: &DNSKEY) -> Option<Vec<u8>> {
    use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY, SHA256, SHA384};

    let input = key.digest_input_for(name);
    let algorithm = match dt {
        DigestType::SHA1 => &SHA1_FOR_LEGACY_USE_ONLY,
        DigestType::SHA256 => &SHA256,
        DigestType::SHA384 => &SHA384,
        DigestType::Other(_) => return None,
    };
    Some(digest(algorithm, &input).as_ref().to_vec())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::dnssec::Algorithm;

    #[test]
    fn digest_length_mismatch_is_rejected() {
        let mut store = TrustAnchorStore::empty();
        let name = Name::from_str("example.com.").unwrap();
        let ds = DS::new(1, Algorithm::RSASHA256, DigestType::SHA256, vec![0u8; 4]);
        let err = store.add(name, TrustAnchor::StaticDS(ds)).unwrap_err();
        assert!(matches!(err, ProtoError::Invalid(_)));
    }

    #[test]
    fn exact_owner_lookup_only() {
        let mut store = TrustAnchorStore::empty();
        let root = Name::root();
        let ds = DS::new(1, Algorithm::RSASHA256, DigestType::SHA256, vec![0u8; 32]);
        store.add(root.clone(), TrustAnchor::StaticDS(ds)).unwrap();

        assert_eq!(store.find(&root).len(), 1);
        assert!(store.find(&Name::from_str("com.").unwrap()).is_empty());
    }
}
