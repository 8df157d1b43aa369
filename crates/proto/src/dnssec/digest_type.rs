// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DS/digest algorithm numbers and their required digest lengths (§4.3).

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A DS record digest algorithm.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DigestType {
    SHA1,
    SHA256,
    SHA384,
    Other(u8),
}

impl DigestType {
    /// The wire-form numeric value.
    pub fn value(self) -> u8 {
        match self {
            Self::SHA1 => 1,
            Self::SHA256 => 2,
            Self::SHA384 => 4,
            Self::Other(v) => v,
        }
    }

    /// The exact digest length this algorithm produces, or `None` if the
    /// algorithm itself is unrecognized. Used to enforce the
    /// `BadAnchorDigestLength` invariant in §4.3.
    pub fn digest_len(self) -> Option<usize> {
        match self {
            Self::SHA1 => Some(20),
            Self::SHA256 => Some(32),
            Self::SHA384 => Some(48),
            Self::Other(_) => None,
        }
    }

    /// True for the digest types required by §4.4.4.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::SHA1 | Self::SHA256 | Self::SHA384)
    }
}

impl From<u8> for DigestType {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::SHA1,
            2 => Self::SHA256,
            4 => Self::SHA384,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl BinEncodable for DigestType {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u8(self.value())
    }
}

impl BinDecodable for DigestType {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self::from(decoder.read_u8()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_lengths_match_spec() {
        assert_eq!(DigestType::SHA1.digest_len(), Some(20));
        assert_eq!(DigestType::SHA256.digest_len(), Some(32));
        assert_eq!(DigestType::SHA384.digest_len(), Some(48));
        assert_eq!(DigestType::Other(99).digest_len(), None);
    }
}
