// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::{DNSClass, Name, RData, RecordType};
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder};

/// A single resource record: owner name, type, class, TTL, and RDATA.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Record {
    name: Name,
    dns_class: DNSClass,
    ttl: u32,
    rdata: RData,
}

impl Record {
    /// Builds a record from its parts. `record_type` is implied by `rdata`.
    pub fn from_rdata(name: Name, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            dns_class: DNSClass::IN,
            ttl,
            rdata,
        }
    }

    /// The owner name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The record type, taken from the RDATA tag.
    pub fn record_type(&self) -> RecordType {
        self.rdata.record_type()
    }

    /// The record class.
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Sets the class, returning `self` for chaining.
    pub fn set_dns_class(&mut self, dns_class: DNSClass) -> &mut Self {
        self.dns_class = dns_class;
        self
    }

    /// The TTL in seconds, as seen on the wire (not necessarily the
    /// RRSIG's `original_ttl`).
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The decoded RDATA.
    pub fn data(&self) -> &RData {
        &self.rdata
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.name.emit(encoder)?;
        self.record_type().emit(encoder)?;
        encoder.emit_u16(self.dns_class.value())?;
        encoder.emit_u32(self.ttl)?;

        let place = encoder.emit_placeholder_u16();
        self.rdata.emit(encoder)?;
        encoder.set_u16_len(place);
        Ok(())
    }

    pub(crate) fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let name = Name::read(decoder)?;
        let record_type = RecordType::read(decoder)?;
        let dns_class = DNSClass::read(decoder)?;
        let ttl = decoder.read_u32()?;
        let rdlength = decoder.read_u16()? as usize;
        let rdata = RData::read(decoder, record_type, rdlength)?;
        Ok(Self {
            name,
            dns_class,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name,
            self.ttl,
            self.dns_class,
            self.record_type(),
            self.rdata
        )
    }
}
