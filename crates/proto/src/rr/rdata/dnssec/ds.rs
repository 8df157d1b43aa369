// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use crate::dnssec::{Algorithm, DigestType};
use crate::error::fmt_hex;
use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// RDATA of a `DS` record: a hash of a child zone's DNSKEY (RFC 4034 §5).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DS {
    key_tag: u16,
    algorithm: Algorithm,
    digest_type: DigestType,
    digest: Vec<u8>,
}

impl DS {
    /// Builds a DS RDATA, without validating the digest length (callers
    /// establishing a trust anchor must check that themselves via
    /// `digest_type.digest_len()`, per the `BadAnchorDigestLength`
    /// invariant in §4.3).
    pub fn new(key_tag: u16, algorithm: Algorithm, digest_type: DigestType, digest: Vec<u8>) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        }
    }

    /// The key tag of the DNSKEY this DS covers.
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// The algorithm of the DNSKEY this DS covers.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The digest algorithm used to hash the DNSKEY.
    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    /// The digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.key_tag,
            self.algorithm.value(),
            self.digest_type.value()
        )?;
        fmt_hex(&self.digest, f)
    }
}

impl BinEncodable for DS {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.key_tag)?;
        self.algorithm.emit(encoder)?;
        self.digest_type.emit(encoder)?;
        encoder.emit_vec(&self.digest)
    }
}

impl DS {
    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let key_tag = decoder.read_u16()?;
        let algorithm = Algorithm::read(decoder)?;
        let digest_type = DigestType::read(decoder)?;
        let digest = decoder.read_slice(rdlength - 4)?.to_vec();
        Ok(Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }
}
