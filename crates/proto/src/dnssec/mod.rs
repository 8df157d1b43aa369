// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC primitives: algorithm/digest identifiers, trust levels, trust
//! anchors, signature verification, and denial-of-existence proofs.
//! The validation walk itself (building a chain from these primitives)
//! lives in the resolver crate, which is the only thing that knows how to
//! fetch the records a walk needs.

mod algorithm;
mod digest_type;
mod nsec_proof;
mod trust_anchor;
mod trust_level;
mod verify;

pub use algorithm::Algorithm;
pub use digest_type::DigestType;
pub use nsec_proof::{check_nsec, check_nsec3, nsec3_hash, nsec3_hash_label, nsec3_type_absent, NsecProof};
pub use trust_anchor::{digest_dnskey, TrustAnchor, TrustAnchorStore};
pub use trust_level::TrustLevel;
pub use verify::verify_rrsig;
