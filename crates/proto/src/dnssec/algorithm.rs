// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC signature algorithm numbers (RFC 8624 §3.1).

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A DNSSEC signing algorithm. `Other` preserves unrecognized/unsupported
/// algorithm numbers so an RRSIG can still round-trip through the wire
/// codec even when the validator will ignore it (§4.4.4).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    RSASHA1,
    RSASHA256,
    RSASHA512,
    ECDSAP256SHA256,
    ECDSAP384SHA384,
    ED25519,
    ED448,
    Other(u8),
}

impl Algorithm {
    /// The required-support set enumerated in §4.4.4.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// The wire-form numeric value.
    pub fn value(self) -> u8 {
        match self {
            Self::RSASHA1 => 5,
            Self::RSASHA256 => 8,
            Self::RSASHA512 => 10,
            Self::ECDSAP256SHA256 => 13,
            Self::ECDSAP384SHA384 => 14,
            Self::ED25519 => 15,
            Self::ED448 => 16,
            Self::Other(v) => v,
        }
    }
}

impl From<u8> for Algorithm {
    fn from(v: u8) -> Self {
        match v {
            5 => Self::RSASHA1,
            8 => Self::RSASHA256,
            10 => Self::RSASHA512,
            13 => Self::ECDSAP256SHA256,
            14 => Self::ECDSAP384SHA384,
            15 => Self::ED25519,
            16 => Self::ED448,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RSASHA1 => "RSASHA1",
            Self::RSASHA256 => "RSASHA256",
            Self::RSASHA512 => "RSASHA512",
            Self::ECDSAP256SHA256 => "ECDSAP256SHA256",
            Self::ECDSAP384SHA384 => "ECDSAP384SHA384",
            Self::ED25519 => "ED25519",
            Self::ED448 => "ED448",
            Self::Other(_) => return write!(f, "ALG{}", self.value()),
        };
        write!(f, "{name}")
    }
}

impl BinEncodable for Algorithm {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u8(self.value())
    }
}

impl BinDecodable for Algorithm {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self::from(decoder.read_u8()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_algorithms_are_supported() {
        for alg in [
            Algorithm::RSASHA1,
            Algorithm::RSASHA256,
            Algorithm::RSASHA512,
            Algorithm::ECDSAP256SHA256,
            Algorithm::ECDSAP384SHA384,
            Algorithm::ED25519,
            Algorithm::ED448,
        ] {
            assert!(alg.is_supported());
            assert_eq!(Algorithm::from(alg.value()), alg);
        }
    }

    #[test]
    fn unrecognized_algorithm_is_unsupported_not_an_error() {
        let alg = Algorithm::from(253);
        assert!(!alg.is_supported());
    }
}
