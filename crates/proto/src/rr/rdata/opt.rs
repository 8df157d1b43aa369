// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! OPT pseudo-RR RDATA: a list of EDNS options.
//!
//! The OPT record's CLASS and TTL fields carry the requestor UDP payload
//! size and the extended RCODE/version/flags (including the DO bit) rather
//! than the usual meaning of those fields; that repurposing lives on
//! [`crate::op::Edns`], not here. This module only covers the option list
//! that makes up the RDATA itself.

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// One `(OPTION-CODE, OPTION-DATA)` pair from an OPT RDATA.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EdnsOption {
    /// The option code (e.g. 10 for COOKIE).
    pub code: u16,
    /// Opaque option payload.
    pub data: Vec<u8>,
}

/// RDATA of an OPT pseudo-record: zero or more EDNS options.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct OPT {
    options: Vec<EdnsOption>,
}

impl OPT {
    /// Builds an OPT RDATA from a list of options.
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self { options }
    }

    /// The option list.
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        for opt in &self.options {
            encoder.emit_u16(opt.code)?;
            encoder.emit_u16(opt.data.len() as u16)?;
            encoder.emit_vec(&opt.data)?;
        }
        Ok(())
    }

    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let mut options = Vec::new();
        let mut consumed = 0;
        while consumed < rdlength {
            let code = decoder.read_u16()?;
            let len = decoder.read_u16()? as usize;
            let data = decoder.read_slice(len)?.to_vec();
            consumed += 4 + len;
            options.push(EdnsOption { code, data });
        }
        Ok(Self { options })
    }
}
