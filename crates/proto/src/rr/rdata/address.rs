// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A and AAAA RDATA.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// RDATA of an `A` record: an IPv4 address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct A(pub Ipv4Addr);

impl A {
    /// Builds an `A` from four octets, matching the teacher's `A::new` shape.
    pub fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(Ipv4Addr::new(a, b, c, d))
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BinEncodable for A {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_vec(&self.0.octets())
    }
}

impl BinDecodable for A {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let bytes = decoder.read_slice(4)?;
        Ok(Self(Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])))
    }
}

/// RDATA of an `AAAA` record: an IPv6 address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AAAA(pub Ipv6Addr);

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BinEncodable for AAAA {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_vec(&self.0.octets())
    }
}

impl BinDecodable for AAAA {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let bytes = decoder.read_slice(16)?;
        let mut octets = [0u8; 16];
        octets.copy_from_slice(bytes);
        Ok(Self(Ipv6Addr::from(octets)))
    }
}
