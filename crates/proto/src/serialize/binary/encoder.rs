// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::collections::HashMap;

use crate::error::ProtoResult;
use crate::rr::Name;

/// Controls whether the encoder may compress names and whether it should
/// force RRSIG canonical form (lowercased, uncompressed) instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodeMode {
    /// Ordinary wire encoding; names may be compressed.
    Normal,
    /// RFC 4034 §6.2 canonical form for signature verification: names are
    /// lowercased and never compressed.
    Canonical,
}

/// Accumulates an outgoing DNS message, tracking name-compression offsets.
pub struct BinEncoder<'a> {
    buf: &'a mut Vec<u8>,
    mode: EncodeMode,
    name_pointers: HashMap<Vec<Vec<u8>>, u16>,
}

impl<'a> BinEncoder<'a> {
    /// Wraps a buffer for normal (compression-eligible) encoding.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self {
            buf,
            mode: EncodeMode::Normal,
            name_pointers: HashMap::new(),
        }
    }

    /// Wraps a buffer for canonical-form encoding (no compression).
    pub fn with_mode(buf: &'a mut Vec<u8>, mode: EncodeMode) -> Self {
        Self {
            buf,
            mode,
            name_pointers: HashMap::new(),
        }
    }

    /// Current write offset.
    pub fn position(&self) -> u16 {
        self.buf.len() as u16
    }

    /// The configured encoding mode.
    pub fn mode(&self) -> EncodeMode {
        self.mode
    }

    /// Appends one byte.
    pub fn emit_u8(&mut self, value: u8) -> ProtoResult<()> {
        self.buf.push(value);
        Ok(())
    }

    /// Appends a big-endian u16.
    pub fn emit_u16(&mut self, value: u16) -> ProtoResult<()> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Appends a big-endian u32.
    pub fn emit_u32(&mut self, value: u32) -> ProtoResult<()> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Appends raw bytes verbatim.
    pub fn emit_vec(&mut self, bytes: &[u8]) -> ProtoResult<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Reserves two bytes now, to be patched later (RDLENGTH pattern).
    pub fn emit_placeholder_u16(&mut self) -> usize {
        let offset = self.buf.len();
        self.buf.extend_from_slice(&[0, 0]);
        offset
    }

    /// Patches a placeholder previously reserved by `emit_placeholder_u16`
    /// with the number of bytes written since.
    pub fn set_u16_len(&mut self, placeholder_offset: usize) {
        let len = (self.buf.len() - placeholder_offset - 2) as u16;
        self.buf[placeholder_offset..placeholder_offset + 2].copy_from_slice(&len.to_be_bytes());
    }

    /// Emits a name, compressing against previously emitted names unless in
    /// canonical mode.
    pub fn emit_name(&mut self, name: &Name) -> ProtoResult<()> {
        if self.mode == EncodeMode::Canonical {
            name.emit_canonical(self.buf);
            return Ok(());
        }

        let labels = name.to_canonical_labels();
        if let Some(&offset) = self.name_pointers.get(&labels) {
            self.buf.push(0xc0 | ((offset >> 8) as u8 & 0x3f));
            self.buf.push((offset & 0xff) as u8);
            return Ok(());
        }

        if self.buf.len() < 0x3fff {
            self.name_pointers.insert(labels.clone(), self.buf.len() as u16);
        }

        for (i, label) in name.iter().enumerate() {
            let suffix_labels = &labels[i..];
            if i > 0 {
                if let Some(&offset) = self.name_pointers.get(suffix_labels) {
                    self.buf.push(0xc0 | ((offset >> 8) as u8 & 0x3f));
                    self.buf.push((offset & 0xff) as u8);
                    return Ok(());
                }
                if self.buf.len() < 0x3fff {
                    self.name_pointers
                        .insert(suffix_labels.to_vec(), self.buf.len() as u16);
                }
            }
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label);
        }
        self.buf.push(0);
        Ok(())
    }

    /// Emits every item in an iterator in order.
    pub fn emit_all<'i, T: crate::serialize::binary::BinEncodable + 'i>(
        &mut self,
        items: impl Iterator<Item = &'i T>,
    ) -> ProtoResult<()> {
        for item in items {
            item.emit(self)?;
        }
        Ok(())
    }
}
