// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Domain names: label sequences, compression, and canonical comparison.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProtoError, ProtoResult};
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder};

/// Maximum wire-form length of a name, per RFC 1035 §3.1.
pub const MAX_WIRE_LEN: usize = 255;
/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;
/// Maximum number of labels permitted while following compression pointers.
const MAX_POINTER_HOPS: usize = 255;

/// An absolute (root-terminated), ordered sequence of labels.
///
/// Canonical comparison is label-wise and case-insensitive, as required for
/// RRset canonical ordering (RFC 4034 §6.1).
#[derive(Clone, Debug, Default, Eq)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    /// The root name, `.`.
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// True if this is the root name.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Builds a name from already-split label bytes (not wire-escaped).
    pub fn from_labels<I, L>(labels: I) -> ProtoResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let labels: Vec<Vec<u8>> = labels.into_iter().map(|l| l.as_ref().to_vec()).collect();
        for label in &labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(ProtoError::InvalidLabelLength(label.len()));
            }
        }
        let name = Self { labels };
        if name.wire_len() > MAX_WIRE_LEN {
            return Err(ProtoError::NameTooLong);
        }
        Ok(name)
    }

    /// Number of labels, excluding the implicit root.
    pub fn num_labels(&self) -> u8 {
        self.labels.len() as u8
    }

    /// Iterates labels from the leftmost (most specific) to the root.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(|l| l.as_slice())
    }

    /// The wire-form length, including the root terminator and length
    /// octets, not counting any compression.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Returns the parent name (drops the leftmost label), or `None` for root.
    pub fn base_name(&self) -> Option<Self> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Self {
                labels: self.labels[1..].to_vec(),
            })
        }
    }

    /// Prepends a label (e.g. to build `*.example.com.` from `example.com.`).
    pub fn prepend_label(&self, label: impl AsRef<[u8]>) -> ProtoResult<Self> {
        let mut labels = Vec::with_capacity(self.labels.len() + 1);
        labels.push(label.as_ref().to_vec());
        labels.extend(self.labels.iter().cloned());
        Self::from_labels(labels)
    }

    /// True if `self` is equal to or a subdomain of `other`.
    pub fn zone_of(&self, other: &Self) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - other.labels.len();
        self.labels[offset..]
            .iter()
            .zip(other.labels.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns the canonical (lowercased) wire-form label sequence used for
    /// signature verification (RFC 4034 §6.2): owner names in RRSIG
    /// canonical form are always fully lowercased and uncompressed.
    pub fn to_canonical_labels(&self) -> Vec<Vec<u8>> {
        self.labels
            .iter()
            .map(|l| l.to_ascii_lowercase())
            .collect()
    }

    /// Emits the canonical (lowercased, uncompressed) wire form.
    pub fn emit_canonical(&self, buf: &mut Vec<u8>) {
        for label in self.to_canonical_labels() {
            buf.push(label.len() as u8);
            buf.extend_from_slice(&label);
        }
        buf.push(0);
    }

    /// The name with all labels lowercased.
    pub fn to_lowercase(&self) -> Self {
        Self {
            labels: self.to_canonical_labels(),
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            label.to_ascii_lowercase().hash(state);
        }
    }
}

/// Canonical ordering per RFC 4034 §6.1: compare labels right-to-left
/// (root first), case-insensitively.
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.labels.iter().rev();
        let b = other.labels.iter().rev();
        for (la, lb) in a.zip(b) {
            let la = la.to_ascii_lowercase();
            let lb = lb.to_ascii_lowercase();
            match la.cmp(&lb) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.labels.len().cmp(&other.labels.len())
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for label in &self.labels {
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7e => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{b:03}")?,
                }
            }
            write!(f, ".")?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "." || s.is_empty() {
            return Ok(Self::root());
        }
        let s = s.strip_suffix('.').unwrap_or(s);
        let mut labels = Vec::new();
        let mut current = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    labels.push(std::mem::take(&mut current));
                }
                '\\' => {
                    // Either \DDD (decimal escape) or \<literal char>.
                    let mut digits = String::new();
                    for _ in 0..3 {
                        if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                            digits.push(chars.next().unwrap());
                        }
                    }
                    if digits.len() == 3 {
                        let byte: u8 = digits
                            .parse()
                            .map_err(|_| ProtoError::from(format!("bad escape \\{digits}")))?;
                        current.push(byte);
                    } else if let Some(next) = chars.next() {
                        current.push(next as u8);
                    }
                }
                other => {
                    let mut buf = [0u8; 4];
                    for b in other.encode_utf8(&mut buf).as_bytes() {
                        current.push(*b);
                    }
                }
            }
        }
        labels.push(current);
        Self::from_labels(labels)
    }
}

impl BinEncodable for Name {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        // The encoder decides whether to compress; canonical form (used only
        // for signature verification) always goes through emit_canonical.
        encoder.emit_name(self)
    }
}

impl Name {
    /// Decodes a name, following compression pointers with a bounded hop
    /// count to guard against pointer cycles (§4.1).
    pub fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let mut labels = Vec::new();
        let mut hops = 0usize;
        let mut total_len = 0usize;
        let start_pos = decoder.position();
        let mut jumped = false;
        let mut return_pos = 0usize;

        loop {
            let len = decoder.peek_u8()? as usize;
            if len == 0 {
                decoder.read_u8()?;
                break;
            }
            if len & 0xc0 == 0xc0 {
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(ProtoError::CompressionLoop);
                }
                let hi = decoder.read_u8()? as usize & 0x3f;
                let lo = decoder.read_u8()? as usize;
                let pointer = (hi << 8) | lo;
                if pointer >= start_pos && !jumped {
                    // A pointer may only ever point backward.
                    return Err(ProtoError::CompressionLoop);
                }
                if !jumped {
                    return_pos = decoder.position();
                    jumped = true;
                }
                decoder.seek(pointer)?;
                continue;
            }
            if len > MAX_LABEL_LEN {
                return Err(ProtoError::InvalidLabelLength(len));
            }
            decoder.read_u8()?;
            let label = decoder.read_slice(len)?.to_vec();
            total_len += label.len() + 1;
            if total_len + 1 > MAX_WIRE_LEN {
                return Err(ProtoError::NameTooLong);
            }
            labels.push(label);
        }

        if jumped {
            decoder.seek(return_pos)?;
        }
        Self::from_labels(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::BinEncoder;

    #[test]
    fn parses_and_displays_round_trip() {
        let name = Name::from_str("www.example.com.").unwrap();
        assert_eq!(name.to_string(), "www.example.com.");
        assert_eq!(name.num_labels(), 3);
    }

    #[test]
    fn root_is_dot() {
        assert_eq!(Name::root().to_string(), ".");
        assert!(Name::root().is_root());
    }

    #[test]
    fn case_insensitive_equality_and_ordering() {
        let a = Name::from_str("WWW.Example.COM.").unwrap();
        let b = Name::from_str("www.example.com.").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn zone_of_checks_suffix() {
        let child = Name::from_str("www.example.com.").unwrap();
        let zone = Name::from_str("example.com.").unwrap();
        assert!(child.zone_of(&zone));
        assert!(!zone.zone_of(&child));
    }

    #[test]
    fn rejects_oversized_label() {
        let label = vec![b'a'; 64];
        let err = Name::from_labels([label]).unwrap_err();
        assert!(matches!(err, ProtoError::InvalidLabelLength(64)));
    }

    #[test]
    fn compression_pointer_cycle_is_rejected() {
        // Two bytes forming a pointer to themselves: 0xc0 0x00 -> offset 0,
        // which is not strictly backward from the read start, so it must
        // be rejected rather than looping forever.
        let bytes = [0xc0u8, 0x00];
        let mut decoder = BinDecoder::new(&bytes);
        let err = Name::read(&mut decoder).unwrap_err();
        assert!(matches!(err, ProtoError::CompressionLoop));
    }

    #[test]
    fn canonical_form_is_lowercase() {
        let name = Name::from_str("WWW.Example.com.").unwrap();
        let mut buf = Vec::new();
        name.emit_canonical(&mut buf);
        let mut expected = Vec::new();
        expected.push(3);
        expected.extend_from_slice(b"www");
        expected.push(7);
        expected.extend_from_slice(b"example");
        expected.push(3);
        expected.extend_from_slice(b"com");
        expected.push(0);
        assert_eq!(buf, expected);
    }
}
