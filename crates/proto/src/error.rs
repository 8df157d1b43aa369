// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the wire codec and resource-record layer.

use std::fmt;

/// Alias used throughout the codec and rr modules.
pub type ProtoResult<T> = Result<T, ProtoError>;

/// All errors a decode/encode of a DNS message can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The message failed to parse for a reason not covered below.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A domain name exceeded the 255 octet wire-form limit.
    #[error("name exceeded the maximum wire length of 255 octets")]
    NameTooLong,

    /// A compression pointer chain loops back on itself.
    #[error("compression pointer loop detected")]
    CompressionLoop,

    /// RDATA claimed a length that the remaining buffer does not have.
    #[error("truncated rdata: expected {expected} bytes, had {available}")]
    TruncatedRdata {
        /// bytes the RDLENGTH field promised
        expected: usize,
        /// bytes actually remaining in the buffer
        available: usize,
    },

    /// A label was outside the 1-63 octet range required by RFC 1035.
    #[error("label length {0} is out of the 1-63 octet range")]
    InvalidLabelLength(usize),

    /// Decoded a record/rdata type not covered by this codec.
    #[error("unsupported record type: {0}")]
    UnsupportedRecordType(u16),

    /// Ran out of buffer while decoding a fixed-size field.
    #[error("unexpected end of input while decoding {0}")]
    UnexpectedEof(&'static str),

    /// A caller-supplied constraint (e.g. digest length) was violated.
    #[error("{0}")]
    Invalid(String),

    /// Wraps a lower-level IO error (used by the transport/serialize layers).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<String> for ProtoError {
    fn from(s: String) -> Self {
        Self::MalformedMessage(s)
    }
}

impl From<&str> for ProtoError {
    fn from(s: &str) -> Self {
        Self::MalformedMessage(s.to_string())
    }
}

impl ProtoError {
    /// True for errors that should drop the inbound message wholesale rather
    /// than accept a partially decoded result (wire codec invariant, §4.1).
    pub fn is_fatal_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedMessage(_)
                | Self::NameTooLong
                | Self::CompressionLoop
                | Self::TruncatedRdata { .. }
                | Self::InvalidLabelLength(_)
                | Self::UnexpectedEof(_)
        )
    }
}

/// Helper used by Display impls that need to print opaque byte blobs.
pub(crate) fn fmt_hex(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}
