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
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// Zone Key flag bit (RFC 4034 §2.1.1).
const ZONE_KEY_FLAG: u16 = 0x0100;
/// Secure Entry Point flag bit (RFC 3757); set on KSKs by convention.
const SEP_FLAG: u16 = 0x0001;

/// RDATA of a `DNSKEY` record: a zone's public key (RFC 4034 §2).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DNSKEY {
    flags: u16,
    protocol: u8,
    algorithm: Algorithm,
    public_key: Vec<u8>,
}

impl DNSKEY {
    /// Builds a DNSKEY RDATA. `protocol` must be 3 per RFC 4034 §2.1.2 but
    /// is preserved verbatim rather than asserted, to round-trip malformed
    /// input rather than panic on it.
    pub fn new(flags: u16, protocol: u8, algorithm: Algorithm, public_key: Vec<u8>) -> Self {
        Self {
            flags,
            protocol,
            algorithm,
            public_key,
        }
    }

    /// The raw flags field.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// True if the Zone Key flag is set; non-zone-key DNSKEYs are never
    /// used to verify RRSIGs.
    pub fn is_zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    /// True if the Secure Entry Point flag is set (conventionally, a KSK).
    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & SEP_FLAG != 0
    }

    /// The signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The raw public key material.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Computes the RFC 4034 Appendix B key tag used to match RRSIGs and DS
    /// records to this key.
    pub fn key_tag(&self) -> u16 {
        if self.algorithm.value() == 1 {
            // RSA/MD5 uses a different, legacy tag algorithm; not in the
            // required set (§4.4.4) but kept so encode/decode never panics.
            let len = self.public_key.len();
            if len < 2 {
                return 0;
            }
            return u16::from_be_bytes([self.public_key[len - 3], self.public_key[len - 2]]);
        }

        let mut bytes = Vec::with_capacity(4 + self.public_key.len());
        bytes.extend_from_slice(&self.flags.to_be_bytes());
        bytes.push(self.protocol);
        bytes.push(self.algorithm.value());
        bytes.extend_from_slice(&self.public_key);

        let mut ac: u32 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if i % 2 == 0 {
                ac += u32::from(b) << 8;
            } else {
                ac += u32::from(b);
            }
        }
        ac += (ac >> 16) & 0xffff;
        (ac & 0xffff) as u16
    }

    /// Builds the canonical RDATA bytes used both for wire emission and for
    /// hashing into a DS digest (RFC 4034 §5.1.4).
    pub fn to_digest_input(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.public_key.len());
        bytes.extend_from_slice(&self.flags.to_be_bytes());
        bytes.push(self.protocol);
        bytes.push(self.algorithm.value());
        bytes.extend_from_slice(&self.public_key);
        bytes
    }

    /// Computes the DS digest input for a given owner name: `owner ||
    /// DNSKEY RDATA`, both in canonical form, per RFC 4034 §5.1.4.
    pub fn digest_input_for(&self, owner: &Name) -> Vec<u8> {
        let mut buf = Vec::new();
        owner.emit_canonical(&mut buf);
        buf.extend_from_slice(&self.to_digest_input());
        buf
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm.value(),
            BASE64.encode(&self.public_key)
        )
    }
}

impl BinEncodable for DNSKEY {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.flags)?;
        encoder.emit_u8(self.protocol)?;
        self.algorithm.emit(encoder)?;
        encoder.emit_vec(&self.public_key)
    }
}

impl DNSKEY {
    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let flags = decoder.read_u16()?;
        let protocol = decoder.read_u8()?;
        let algorithm = Algorithm::read(decoder)?;
        let public_key = decoder.read_slice(rdlength - 4)?.to_vec();
        Ok(Self {
            flags,
            protocol,
            algorithm,
            public_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tag_is_stable_for_same_key() {
        let key = DNSKEY::new(257, 3, Algorithm::RSASHA256, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let tag1 = key.key_tag();
        let tag2 = key.key_tag();
        assert_eq!(tag1, tag2);
    }

    #[test]
    fn zone_key_and_sep_flags_are_read_independently() {
        let ksk = DNSKEY::new(257, 3, Algorithm::RSASHA256, vec![0; 8]);
        assert!(ksk.is_zone_key());
        assert!(ksk.is_secure_entry_point());

        let zsk = DNSKEY::new(256, 3, Algorithm::RSASHA256, vec![0; 8]);
        assert!(zsk.is_zone_key());
        assert!(!zsk.is_secure_entry_point());
    }
}
