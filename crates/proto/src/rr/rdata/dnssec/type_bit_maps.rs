// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The windowed RR-type bitmap shared by NSEC and NSEC3 RDATA (RFC 4034
//! §4.1.2 / RFC 5155 §3.2).

use crate::error::ProtoResult;
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// Encodes a set of record types into the windowed bitmap format.
pub(crate) fn emit(encoder: &mut BinEncoder<'_>, types: &[RecordType]) -> ProtoResult<()> {
    let mut values: Vec<u16> = types.iter().map(|t| t.value()).collect();
    values.sort_unstable();
    values.dedup();

    let mut window = 0u8;
    while (window as usize) <= values.iter().map(|v| (v >> 8) as usize).max().unwrap_or(0) {
        let in_window: Vec<u16> = values
            .iter()
            .copied()
            .filter(|v| (v >> 8) as u8 == window)
            .collect();
        if !in_window.is_empty() {
            let max_byte = in_window.iter().map(|v| (v & 0xff) / 8).max().unwrap() as usize;
            let mut bitmap = vec![0u8; max_byte + 1];
            for v in &in_window {
                let low = (v & 0xff) as usize;
                bitmap[low / 8] |= 0x80 >> (low % 8);
            }
            encoder.emit_u8(window)?;
            encoder.emit_u8(bitmap.len() as u8)?;
            encoder.emit_vec(&bitmap)?;
        }
        if window == 255 {
            break;
        }
        window += 1;
    }
    Ok(())
}

/// Decodes a windowed bitmap spanning `len` remaining bytes into the
/// record types it represents.
pub(crate) fn read(decoder: &mut BinDecoder<'_>, len: usize) -> ProtoResult<Vec<RecordType>> {
    let mut types = Vec::new();
    let mut consumed = 0;
    while consumed < len {
        let window = decoder.read_u8()? as u16;
        let block_len = decoder.read_u8()? as usize;
        let bitmap = decoder.read_slice(block_len)?;
        consumed += 2 + block_len;
        for (byte_index, byte) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) != 0 {
                    let value = (window << 8) | ((byte_index * 8 + bit) as u16);
                    types.push(RecordType::from(value));
                }
            }
        }
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_type_set() {
        let types = vec![
            RecordType::A,
            RecordType::RRSIG,
            RecordType::NSEC,
            RecordType::Unknown(1234),
        ];
        let mut buf = Vec::new();
        {
            let mut encoder = BinEncoder::new(&mut buf);
            emit(&mut encoder, &types).unwrap();
        }
        let mut decoder = BinDecoder::new(&buf);
        let mut decoded = read(&mut decoder, buf.len()).unwrap();
        let mut expected = types;
        decoded.sort_by_key(|t| t.value());
        expected.sort_by_key(|t| t.value());
        assert_eq!(decoded, expected);
    }
}
