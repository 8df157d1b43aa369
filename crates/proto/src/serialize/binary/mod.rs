// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Encoder/decoder primitives shared by every record and message type.

mod decoder;
mod encoder;

pub use decoder::BinDecoder;
pub use encoder::{BinEncoder, EncodeMode};

use crate::error::ProtoResult;

/// Implemented by anything that can serialize itself to the DNS wire format.
pub trait BinEncodable {
    /// Writes `self` into the encoder.
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()>;

    /// Convenience: encode to a fresh `Vec<u8>`.
    fn to_bytes(&self) -> ProtoResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        self.emit(&mut encoder)?;
        Ok(bytes)
    }
}

/// Implemented by anything that can deserialize itself from the DNS wire
/// format. `read` receives the already-decoded RDLENGTH where applicable.
pub trait BinDecodable: Sized {
    /// Reads `Self` from the decoder.
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self>;

    /// Convenience: decode a standalone value from a byte slice.
    fn from_bytes(bytes: &[u8]) -> ProtoResult<Self> {
        let mut decoder = BinDecoder::new(bytes);
        Self::read(&mut decoder)
    }
}
