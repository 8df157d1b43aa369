// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use data_encoding::{BASE32_DNSSEC, HEXUPPER};

use super::type_bit_maps;
use crate::error::ProtoResult;
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// RDATA of an `NSEC3` record: a hashed-name analog of NSEC (RFC 5155 §3).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NSEC3 {
    hash_algorithm: u8,
    flags: u8,
    iterations: u16,
    salt: Vec<u8>,
    next_hashed_owner_name: Vec<u8>,
    type_bit_maps: Vec<RecordType>,
}

impl NSEC3 {
    /// Builds an NSEC3 RDATA.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hash_algorithm: u8,
        flags: u8,
        iterations: u16,
        salt: Vec<u8>,
        next_hashed_owner_name: Vec<u8>,
        type_bit_maps: Vec<RecordType>,
    ) -> Self {
        Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed_owner_name,
            type_bit_maps,
        }
    }

    /// The hash algorithm identifier.
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// True if the Opt-Out flag is set (delegations may be unsigned).
    pub fn opt_out(&self) -> bool {
        self.flags & 0x01 != 0
    }

    /// Number of additional hash iterations.
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// The salt used when hashing names into this chain.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The raw (unencoded) hash of the next owner name in the chain.
    pub fn next_hashed_owner_name(&self) -> &[u8] {
        &self.next_hashed_owner_name
    }

    /// The set of types that exist at the name this NSEC3 covers.
    pub fn type_bit_maps(&self) -> &[RecordType] {
        &self.type_bit_maps
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u8(self.hash_algorithm)?;
        encoder.emit_u8(self.flags)?;
        encoder.emit_u16(self.iterations)?;
        encoder.emit_u8(self.salt.len() as u8)?;
        encoder.emit_vec(&self.salt)?;
        encoder.emit_u8(self.next_hashed_owner_name.len() as u8)?;
        encoder.emit_vec(&self.next_hashed_owner_name)?;
        type_bit_maps::emit(encoder, &self.type_bit_maps)
    }

    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>, rdlength: usize) -> ProtoResult<Self> {
        let start = decoder.position();
        let hash_algorithm = decoder.read_u8()?;
        let flags = decoder.read_u8()?;
        let iterations = decoder.read_u16()?;
        let salt_len = decoder.read_u8()? as usize;
        let salt = decoder.read_slice(salt_len)?.to_vec();
        let hash_len = decoder.read_u8()? as usize;
        let next_hashed_owner_name = decoder.read_slice(hash_len)?.to_vec();
        let consumed = decoder.position() - start;
        let type_bit_maps = type_bit_maps::read(decoder, rdlength - consumed)?;
        Ok(Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed_owner_name,
            type_bit_maps,
        })
    }
}

impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXUPPER.encode(&self.salt)
        };
        write!(
            f,
            "{} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt,
            BASE32_DNSSEC.encode(&self.next_hashed_owner_name)
        )?;
        for t in &self.type_bit_maps {
            write!(f, " {t}")?;
        }
        Ok(())
    }
}
