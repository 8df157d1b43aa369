// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! RRSIG signature verification (§4.4.2): builds the RFC 4034 §3.1.8.1
//! canonical signing input for an RRset and checks it against a candidate
//! key using `ring`.

use ring::signature;

use crate::dnssec::Algorithm;
use crate::error::ProtoResult;
use crate::rr::rdata::{DNSKEY, RRSIG};
use crate::rr::{DNSClass, Name, Record};
use crate::serialize::binary::{BinEncodable, BinEncoder, EncodeMode};

/// Builds the wildcard-synthesized owner name used as the signed name when
/// `rrsig.labels()` is fewer than the RRset owner's actual label count
/// (RFC 4034 §3.1.3).
fn signed_owner_name(owner: &Name, labels: u8) -> ProtoResult<Name> {
    if owner.num_labels() == labels {
        return Ok(owner.clone());
    }
    let mut name = owner.clone();
    while name.num_labels() > labels {
        name = name.base_name().expect("num_labels > labels implies a parent exists");
    }
    name.prepend_label(b"*" as &[u8])
}

/// Builds the exact signing input fed to the signature algorithm: the
/// RRSIG's fixed fields followed by every covered record in canonical
/// form, sorted and de-duplicated per RFC 4034 §6.3.
fn canonical_signing_input(records: &[Record], rrsig: &RRSIG) -> ProtoResult<Vec<u8>> {
    let owner = signed_owner_name(records[0].name(), rrsig.labels())?;

    let mut rdata_blobs: Vec<Vec<u8>> = Vec::with_capacity(records.len());
    for record in records {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::with_mode(&mut buf, EncodeMode::Canonical);
        record.data().emit(&mut encoder)?;
        rdata_blobs.push(buf);
    }
    rdata_blobs.sort();
    rdata_blobs.dedup();

    let mut input = rrsig.canonical_prefix();
    for rdata in &rdata_blobs {
        owner.emit_canonical(&mut input);
        input.extend_from_slice(&rrsig.type_covered().value().to_be_bytes());
        input.extend_from_slice(&DNSClass::IN.value().to_be_bytes());
        input.extend_from_slice(&rrsig.original_ttl().to_be_bytes());
        input.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        input.extend_from_slice(rdata);
    }
    Ok(input)
}

/// Verifies that `rrsig` validates `records` under `key`, per §4.4.2 step 2.
/// Any mismatch -- algorithm, key tag, malformed key material, or a failed
/// cryptographic check -- returns `false` rather than an error: a failed
/// verification is a normal outcome the validator downgrades trust for, not
/// a protocol error.
pub fn verify_rrsig(records: &[Record], rrsig: &RRSIG, key: &DNSKEY) -> bool {
    if records.is_empty() {
        return false;
    }
    if key.algorithm() != rrsig.algorithm() {
        return false;
    }
    if key.key_tag() != rrsig.key_tag() {
        return false;
    }

    let Ok(signing_input) = canonical_signing_input(records, rrsig) else {
        return false;
    };

    verify_signature(key.algorithm(), key.public_key(), &signing_input, rrsig.signature())
}

fn verify_signature(algorithm: Algorithm, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match algorithm {
        Algorithm::RSASHA1 => verify_rsa(&signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY, public_key, message, signature),
        Algorithm::RSASHA256 => verify_rsa(&signature::RSA_PKCS1_2048_8192_SHA256, public_key, message, signature),
        Algorithm::RSASHA512 => verify_rsa(&signature::RSA_PKCS1_2048_8192_SHA512, public_key, message, signature),
        Algorithm::ECDSAP256SHA256 => {
            verify_ecdsa(&signature::ECDSA_P256_SHA256_FIXED, public_key, message, signature)
        }
        Algorithm::ECDSAP384SHA384 => {
            verify_ecdsa(&signature::ECDSA_P384_SHA384_FIXED, public_key, message, signature)
        }
        Algorithm::ED25519 => {
            let key = signature::UnparsedPublicKey::new(&signature::ED25519, public_key);
            key.verify(message, signature).is_ok()
        }
        // ring has no ED448 support; RFC 8624 lists it as optional and no
        // production resolver in this corpus implements it either.
        Algorithm::ED448 | Algorithm::Other(_) => false,
    }
}

fn verify_rsa(
    parameters: &'static dyn signature::VerificationAlgorithm,
    public_key: &[u8],
    message: &[u8],
    sig: &[u8],
) -> bool {
    // RFC 3110: the public key is `exponent_len (1 or 3 bytes) | exponent |
    // modulus`. `ring` wants the DER-free raw `(n, e)` pair via
    // `RsaPublicKeyComponents`.
    let Some((exponent, modulus)) = split_rsa_key(public_key) else {
        return false;
    };
    let key = signature::RsaPublicKeyComponents { n: modulus, e: exponent };
    key.verify(parameters, message, sig).is_ok()
}

fn split_rsa_key(public_key: &[u8]) -> Option<(&[u8], &[u8])> {
    let (exp_len, rest) = match public_key.first()? {
        0 => {
            if public_key.len() < 3 {
                return None;
            }
            let len = u16::from_be_bytes([public_key[1], public_key[2]]) as usize;
            (len, &public_key[3..])
        }
        &len => (len as usize, &public_key[1..]),
    };
    if rest.len() < exp_len {
        return None;
    }
    let (exponent, modulus) = rest.split_at(exp_len);
    if modulus.is_empty() {
        return None;
    }
    Some((exponent, modulus))
}

fn verify_ecdsa(
    parameters: &'static signature::EcdsaVerificationAlgorithm,
    public_key: &[u8],
    message: &[u8],
    sig: &[u8],
) -> bool {
    // DNSKEY stores raw X||Y; ring's fixed-signature ECDSA verifier expects
    // an uncompressed SEC1 point, which just needs the 0x04 prefix restored.
    let mut point = Vec::with_capacity(public_key.len() + 1);
    point.push(0x04);
    point.extend_from_slice(public_key);
    let key = signature::UnparsedPublicKey::new(parameters, &point);
    key.verify(message, sig).is_ok()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};

    use super::*;
    use crate::rr::rdata::A;
    use crate::rr::RData;
    use crate::rr::RecordType;

    fn a_record(name: &str, ttl: u32) -> Record {
        Record::from_rdata(Name::from_str(name).unwrap(), ttl, RData::A(A::new(93, 184, 215, 14)))
    }

    #[test]
    fn ed25519_round_trip_signs_and_verifies() {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
        let public_key = key_pair.public_key().as_ref().to_vec();

        let dnskey = DNSKEY::new(256, 3, Algorithm::ED25519, public_key);
        let records = vec![a_record("example.com.", 300)];
        let rrsig = RRSIG::new(
            RecordType::A,
            Algorithm::ED25519,
            2,
            300,
            2_000_000_000,
            1_000_000_000,
            dnskey.key_tag(),
            Name::from_str("example.com.").unwrap(),
            vec![],
        );

        let signing_input = canonical_signing_input(&records, &rrsig).unwrap();
        let signature = key_pair.sign(&signing_input);
        let signed = RRSIG::new(
            RecordType::A,
            Algorithm::ED25519,
            2,
            300,
            2_000_000_000,
            1_000_000_000,
            dnskey.key_tag(),
            Name::from_str("example.com.").unwrap(),
            signature.as_ref().to_vec(),
        );

        assert!(verify_rrsig(&records, &signed, &dnskey));
    }

    #[test]
    fn mismatched_key_tag_fails_fast() {
        let dnskey = DNSKEY::new(256, 3, Algorithm::ED25519, vec![0u8; 32]);
        let records = vec![a_record("example.com.", 300)];
        let rrsig = RRSIG::new(
            RecordType::A,
            Algorithm::ED25519,
            2,
            300,
            2_000_000_000,
            1_000_000_000,
            dnskey.key_tag().wrapping_add(1),
            Name::from_str("example.com.").unwrap(),
            vec![0u8; 64],
        );
        assert!(!verify_rrsig(&records, &rrsig, &dnskey));
    }

    #[test]
    fn wildcard_owner_is_synthesized_when_labels_is_smaller() {
        let owner = Name::from_str("www.example.com.").unwrap();
        let synthesized = signed_owner_name(&owner, 2).unwrap();
        assert_eq!(synthesized.to_string(), "*.example.com.");
    }
}
