// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use data_encoding::HEXUPPER;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// RDATA of an `NSEC3PARAM` record: the hash parameters a zone uses for its
/// NSEC3 chain (RFC 5155 §4).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NSEC3PARAM {
    hash_algorithm: u8,
    flags: u8,
    iterations: u16,
    salt: Vec<u8>,
}

impl NSEC3PARAM {
    /// Builds an NSEC3PARAM RDATA.
    pub fn new(hash_algorithm: u8, flags: u8, iterations: u16, salt: Vec<u8>) -> Self {
        Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
        }
    }

    /// The hash algorithm (1 = SHA-1, the only one defined by RFC 5155).
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// Number of additional hash iterations.
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// The salt bytes.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u8(self.hash_algorithm)?;
        encoder.emit_u8(self.flags)?;
        encoder.emit_u16(self.iterations)?;
        encoder.emit_u8(self.salt.len() as u8)?;
        encoder.emit_vec(&self.salt)
    }

    pub(crate) fn read_data(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let hash_algorithm = decoder.read_u8()?;
        let flags = decoder.read_u8()?;
        let iterations = decoder.read_u16()?;
        let salt_len = decoder.read_u8()? as usize;
        let salt = decoder.read_slice(salt_len)?.to_vec();
        Ok(Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
        })
    }
}

impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXUPPER.encode(&self.salt)
        };
        write!(
            f,
            "{} {} {} {}",
            self.hash_algorithm, self.flags, self.iterations, salt
        )
    }
}
