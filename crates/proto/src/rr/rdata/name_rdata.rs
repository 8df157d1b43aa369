// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! RDATA whose entire payload is a single domain name: NS, CNAME, PTR.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::Name;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

macro_rules! name_rdata {
    ($name:ident) => {
        #[doc = concat!("RDATA of a `", stringify!($name), "` record: a single domain name.")]
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $name(pub Name);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl BinEncodable for $name {
            fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
                self.0.emit(encoder)
            }
        }

        impl BinDecodable for $name {
            fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
                Ok(Self(Name::read(decoder)?))
            }
        }
    };
}

name_rdata!(NS);
name_rdata!(CNAME);
name_rdata!(PTR);
