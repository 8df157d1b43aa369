// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtoError, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The RR CLASS field. Only `IN` is actually supported for queries; `CH`
/// and `HS` parse but are rejected with a warning at the CLI layer (§6).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DNSClass {
    IN,
    CH,
    HS,
    /// Used in OPT records to carry the requestor's UDP payload size.
    Opt(u16),
}

impl DNSClass {
    /// The wire-form numeric value.
    pub fn value(self) -> u16 {
        match self {
            Self::IN => 1,
            Self::CH => 3,
            Self::HS => 4,
            Self::Opt(v) => v,
        }
    }
}

impl From<u16> for DNSClass {
    fn from(v: u16) -> Self {
        match v {
            1 => Self::IN,
            3 => Self::CH,
            4 => Self::HS,
            other => Self::Opt(other),
        }
    }
}

impl fmt::Display for DNSClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IN => write!(f, "IN"),
            Self::CH => write!(f, "CH"),
            Self::HS => write!(f, "HS"),
            Self::Opt(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for DNSClass {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(Self::IN),
            "CH" => Ok(Self::CH),
            "HS" => Ok(Self::HS),
            other => Err(ProtoError::from(format!("unknown class {other}"))),
        }
    }
}

impl BinEncodable for DNSClass {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.value())
    }
}

impl BinDecodable for DNSClass {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self::from(decoder.read_u16()?))
    }
}
