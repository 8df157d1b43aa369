// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use super::type_bit_maps;
use crate::error::ProtoResult;
use crate::rr::{Name, RecordType};
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// RDATA of an `NSEC` record: proves the non-existence of a name or type
/// by pointing to the next owner name in canonical order (RFC 4034 §4).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NSEC {
    next_domain_name: Name,
    type_bit_maps: Vec<RecordType>,
}

impl NSEC {
    /// Builds an NSEC RDATA.
    pub fn new(next_domain_name: Name, type_bit_maps: Vec<RecordType>) -> Self {
        Self {
            next_domain_name,
            type_bit_maps,
        }
    }

    /// The next owner name in canonical zone order.
    pub fn next_domain_name(&self) -> &Name {
        &self.next_domain_name
    }

    /// The set of types that exist at this owner name.
    pub fn type_bit_maps(&self) -> &[RecordType] {
        &self.type_bit_maps
    }

    /// True if the given type is absent from this NSEC's owner (used for
    /// NODATA proofs, §4.4.2 step 5).
    pub fn type_is_absent(&self, rtype: RecordType) -> bool {
        !self.type_bit_maps.contains(&rtype)
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.next_domain_name.emit(encoder)?;
        type_bit_maps::emit(encoder, &self.type_bit_maps)
    }

    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let start = decoder.position();
        let next_domain_name = Name::read(decoder)?;
        let consumed = decoder.position() - start;
        let type_bit_maps = type_bit_maps::read(decoder, rdlength - consumed)?;
        Ok(Self {
            next_domain_name,
            type_bit_maps,
        })
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next_domain_name)?;
        for t in &self.type_bit_maps {
            write!(f, " {t}")?;
        }
        Ok(())
    }
}
