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

/// RDATA of an `SOA` record (RFC 1035 §3.3.13).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SOA {
    mname: Name,
    rname: Name,
    serial: u32,
    refresh: i32,
    retry: i32,
    expire: i32,
    minimum: u32,
}

impl SOA {
    /// Builds an SOA RDATA from its seven fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: i32,
        retry: i32,
        expire: i32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// The primary nameserver for the zone.
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// The zone-minimum TTL, used as the negative-caching TTL.
    pub fn minimum(&self) -> u32 {
        self.minimum
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}

impl BinEncodable for SOA {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.mname.emit(encoder)?;
        self.rname.emit(encoder)?;
        encoder.emit_u32(self.serial)?;
        encoder.emit_u32(self.refresh as u32)?;
        encoder.emit_u32(self.retry as u32)?;
        encoder.emit_u32(self.expire as u32)?;
        encoder.emit_u32(self.minimum)
    }
}

impl BinDecodable for SOA {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self {
            mname: Name::read(decoder)?,
            rname: Name::read(decoder)?,
            serial: decoder.read_u32()?,
            refresh: decoder.read_u32()? as i32,
            retry: decoder.read_u32()? as i32,
            expire: decoder.read_u32()? as i32,
            minimum: decoder.read_u32()?,
        })
    }
}
