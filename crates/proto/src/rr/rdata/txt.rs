// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// RDATA of a `TXT` record: one or more length-prefixed character-strings.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TXT {
    strings: Vec<Vec<u8>>,
}

impl TXT {
    /// Builds a TXT RDATA from raw character-strings.
    pub fn new(strings: Vec<Vec<u8>>) -> Self {
        Self { strings }
    }

    /// The individual character-strings.
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.strings
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        for s in &self.strings {
            encoder.emit_u8(s.len() as u8)?;
            encoder.emit_vec(s)?;
        }
        Ok(())
    }

    /// TXT RDATA is not self-delimiting; it runs to the end of the RDLENGTH.
    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let mut strings = Vec::new();
        let mut consumed = 0;
        while consumed < rdlength {
            let len = decoder.read_u8()? as usize;
            let s = decoder.read_slice(len)?.to_vec();
            consumed += len + 1;
            strings.push(s);
        }
        Ok(Self { strings })
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.strings.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "\"{}\"", String::from_utf8_lossy(s))?;
        }
        Ok(())
    }
}
