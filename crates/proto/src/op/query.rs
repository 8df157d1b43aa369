// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The question section (RFC 1035 §4.1.2): `(QNAME, QTYPE, QCLASS)`.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::{DNSClass, Name, RecordType};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A single question.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Query {
    name: Name,
    query_type: RecordType,
    query_class: DNSClass,
}

impl Query {
    /// Builds a query for `name`, defaulting to `ANY`/`IN` (callers should
    /// set both explicitly for anything other than a throwaway value).
    pub fn query(name: Name, query_type: RecordType) -> Self {
        Self {
            name,
            query_type,
            query_class: DNSClass::IN,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn query_type(&self) -> RecordType {
        self.query_type
    }

    pub fn set_query_type(&mut self, query_type: RecordType) -> &mut Self {
        self.query_type = query_type;
        self
    }

    pub fn query_class(&self) -> DNSClass {
        self.query_class
    }

    pub fn set_query_class(&mut self, query_class: DNSClass) -> &mut Self {
        self.query_class = query_class;
        self
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.name.emit(encoder)?;
        self.query_type.emit(encoder)?;
        encoder.emit_u16(self.query_class.value())
    }

    pub(crate) fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let name = Name::read(decoder)?;
        let query_type = RecordType::read(decoder)?;
        let query_class = DNSClass::read(decoder)?;
        Ok(Self {
            name,
            query_type,
            query_class,
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.query_class, self.query_type)
    }
}
