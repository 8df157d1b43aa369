// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// RDATA of an `MX` record: preference and mail exchange host.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MX {
    preference: u16,
    exchange: Name,
}

impl MX {
    /// Builds an MX RDATA.
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

impl BinEncodable for MX {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.preference)?;
        self.exchange.emit(encoder)
    }
}

impl BinDecodable for MX {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self {
            preference: decoder.read_u16()?,
            exchange: Name::read(decoder)?,
        })
    }
}
