// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use data_encoding::BASE64;

use crate::dnssec::Algorithm;
use crate::error::ProtoResult;
use crate::rr::{Name, RecordType};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// RDATA of an `RRSIG` record: a signature over one RRset (RFC 4034 §3).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RRSIG {
    type_covered: RecordType,
    algorithm: Algorithm,
    labels: u8,
    original_ttl: u32,
    signature_expiration: u32,
    signature_inception: u32,
    key_tag: u16,
    signer_name: Name,
    signature: Vec<u8>,
}

impl RRSIG {
    /// Builds an RRSIG RDATA from its ten fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: RecordType,
        algorithm: Algorithm,
        labels: u8,
        original_ttl: u32,
        signature_expiration: u32,
        signature_inception: u32,
        key_tag: u16,
        signer_name: Name,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            signature_expiration,
            signature_inception,
            key_tag,
            signer_name,
            signature,
        }
    }

    /// The RR type this signature covers.
    pub fn type_covered(&self) -> RecordType {
        self.type_covered
    }

    /// The signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of labels in the original owner name, used to detect
    /// wildcard expansion.
    pub fn labels(&self) -> u8 {
        self.labels
    }

    /// The RRset's original TTL, used in place of the possibly-decremented
    /// TTL seen on the wire when reconstructing the canonical RRset.
    pub fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    /// Signature expiration, seconds since the epoch.
    pub fn signature_expiration(&self) -> u32 {
        self.signature_expiration
    }

    /// Signature inception, seconds since the epoch.
    pub fn signature_inception(&self) -> u32 {
        self.signature_inception
    }

    /// The key tag of the signing DNSKEY, a fast pre-filter before the
    /// full comparison the validator still performs (§4.4.2).
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// The name of the zone whose key signed this RRset -- the "closest
    /// enclosing signing zone" `Z` of §4.4.2 step 1.
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// The raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Checks `now` (seconds since the epoch) against the inception/
    /// expiration window (§4.4.2 step 3), including RFC 4034's own wrap-
    /// safe serial arithmetic.
    pub fn is_in_validity_window(&self, now: u32) -> bool {
        serial_le(self.signature_inception, now) && serial_le(now, self.signature_expiration)
    }

    /// The fixed-width portion of the canonical RDATA used as the
    /// signature input, per RFC 4034 §3.1.8.1 -- everything up to but
    /// excluding the signature bytes themselves.
    pub fn canonical_prefix(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.type_covered.value().to_be_bytes());
        buf.push(self.algorithm.value());
        buf.push(self.labels);
        buf.extend_from_slice(&self.original_ttl.to_be_bytes());
        buf.extend_from_slice(&self.signature_expiration.to_be_bytes());
        buf.extend_from_slice(&self.signature_inception.to_be_bytes());
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        self.signer_name.emit_canonical(&mut buf);
        buf
    }
}

/// RFC 1982 serial-number "less than or equal" comparison, used because
/// inception/expiration timestamps can wrap around a 32-bit epoch.
fn serial_le(a: u32, b: u32) -> bool {
    a == b || b.wrapping_sub(a) < (1u32 << 31)
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm.value(),
            self.labels,
            self.original_ttl,
            self.signature_expiration,
            self.signature_inception,
            self.key_tag,
            self.signer_name,
            BASE64.encode(&self.signature)
        )
    }
}

impl BinEncodable for RRSIG {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.type_covered.emit(encoder)?;
        self.algorithm.emit(encoder)?;
        encoder.emit_u8(self.labels)?;
        encoder.emit_u32(self.original_ttl)?;
        encoder.emit_u32(self.signature_expiration)?;
        encoder.emit_u32(self.signature_inception)?;
        encoder.emit_u16(self.key_tag)?;
        self.signer_name.emit(encoder)?;
        encoder.emit_vec(&self.signature)
    }
}

impl RRSIG {
    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let start = decoder.position();
        let type_covered = RecordType::read(decoder)?;
        let algorithm = Algorithm::read(decoder)?;
        let labels = decoder.read_u8()?;
        let original_ttl = decoder.read_u32()?;
        let signature_expiration = decoder.read_u32()?;
        let signature_inception = decoder.read_u32()?;
        let key_tag = decoder.read_u16()?;
        let signer_name = Name::read(decoder)?;
        let consumed = decoder.position() - start;
        let signature = decoder.read_slice(rdlength - consumed)?.to_vec();
        Ok(Self {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            signature_expiration,
            signature_inception,
            key_tag,
            signer_name,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_window_excludes_before_inception_and_after_expiration() {
        let rrsig = RRSIG::new(
            RecordType::A,
            Algorithm::RSASHA256,
            2,
            3600,
            2_000_000,
            1_000_000,
            1234,
            Name::root(),
            vec![],
        );
        assert!(!rrsig.is_in_validity_window(999_999));
        assert!(rrsig.is_in_validity_window(1_000_000));
        assert!(rrsig.is_in_validity_window(1_500_000));
        assert!(rrsig.is_in_validity_window(2_000_000));
        assert!(!rrsig.is_in_validity_window(2_000_001));
    }
}
