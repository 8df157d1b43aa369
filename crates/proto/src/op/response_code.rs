// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNS response codes (RFC 1035 §4.1.1, extended by RFC 6891 §6.1.3 EDNS).

use std::fmt;

/// A 12-bit response code: the low 4 bits travel in the header, the high 8
/// bits (always zero unless EDNS is present) travel in the OPT record's TTL.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    YXDomain,
    YXRRSet,
    NXRRSet,
    NotAuth,
    NotZone,
    BadVers,
    BadSig,
    BadKey,
    BadTime,
    BadMode,
    BadName,
    BadAlg,
    BadTrunc,
    BadCookie,
    Unknown(u16),
}

impl ResponseCode {
    /// The full 12-bit numeric value.
    pub fn value(self) -> u16 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::YXDomain => 6,
            Self::YXRRSet => 7,
            Self::NXRRSet => 8,
            Self::NotAuth => 9,
            Self::NotZone => 10,
            Self::BadVers | Self::BadSig => 16,
            Self::BadKey => 17,
            Self::BadTime => 18,
            Self::BadMode => 19,
            Self::BadName => 20,
            Self::BadAlg => 21,
            Self::BadTrunc => 22,
            Self::BadCookie => 23,
            Self::Unknown(v) => v,
        }
    }

    /// The low 4 bits, as stored directly in the header's RCODE field.
    pub fn low(self) -> u8 {
        (self.value() & 0x0f) as u8
    }

    /// The high 8 bits, as stored in the EDNS OPT record's extended-RCODE
    /// byte (RFC 6891 §6.1.3).
    pub fn high(self) -> u8 {
        (self.value() >> 4) as u8
    }

    /// Reconstructs a full response code from the header's low 4 bits and
    /// EDNS's high 8 bits.
    pub fn from_parts(low: u8, high: u8) -> Self {
        Self::from(((high as u16) << 4) | (low as u16 & 0x0f))
    }
}

impl From<u16> for ResponseCode {
    fn from(v: u16) -> Self {
        match v {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            6 => Self::YXDomain,
            7 => Self::YXRRSet,
            8 => Self::NXRRSet,
            9 => Self::NotAuth,
            10 => Self::NotZone,
            16 => Self::BadVers,
            17 => Self::BadKey,
            18 => Self::BadTime,
            19 => Self::BadMode,
            20 => Self::BadName,
            21 => Self::BadAlg,
            22 => Self::BadTrunc,
            23 => Self::BadCookie,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::YXDomain => "YXDOMAIN",
            Self::YXRRSet => "YXRRSET",
            Self::NXRRSet => "NXRRSET",
            Self::NotAuth => "NOTAUTH",
            Self::NotZone => "NOTZONE",
            Self::BadVers | Self::BadSig => "BADVERS/BADSIG",
            Self::BadKey => "BADKEY",
            Self::BadTime => "BADTIME",
            Self::BadMode => "BADMODE",
            Self::BadName => "BADNAME",
            Self::BadAlg => "BADALG",
            Self::BadTrunc => "BADTRUNC",
            Self::BadCookie => "BADCOOKIE",
            Self::Unknown(v) => return write!(f, "RCODE{v}"),
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_high_split_round_trips() {
        for rcode in [ResponseCode::NXDomain, ResponseCode::BadCookie, ResponseCode::Unknown(4000)] {
            let roundtrip = ResponseCode::from_parts(rcode.low(), rcode.high());
            assert_eq!(roundtrip.value(), rcode.value());
        }
    }
}
