// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! RFC 3597 "unknown RR" representation: an opaque byte blob for any record
//! type this codec does not natively understand.

use std::fmt;

use crate::error::fmt_hex;
use crate::error::ProtoResult;
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// RDATA for an unrecognized record type, preserved verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Unknown {
    record_type: RecordType,
    data: Vec<u8>,
}

impl Unknown {
    /// Builds an opaque RDATA blob for the given type.
    pub fn new(record_type: RecordType, data: Vec<u8>) -> Self {
        Self { record_type, data }
    }

    /// The raw RDATA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The record type this blob was decoded as.
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_vec(&self.data)
    }

    pub(crate) fn read_data(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdlength: usize,
    ) -> ProtoResult<Self> {
        let data = decoder.read_slice(rdlength)?.to_vec();
        Ok(Self { record_type, data })
    }
}

/// Renders in the RFC 3597 `\# <len> <hex>` unknown-format syntax.
impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\# {} ", self.data.len())?;
        fmt_hex(&self.data, f)
    }
}
