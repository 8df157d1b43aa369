// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The RR TYPE field.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtoError, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A DNS resource record type, covering the types this tool understands and
/// an opaque fallback for everything else (RFC 3597).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    NSEC3,
    NSEC3PARAM,
    ANY,
    AXFR,
    IXFR,
    /// RFC 3597 opaque type.
    Unknown(u16),
}

impl RecordType {
    /// The wire-form numeric value.
    pub fn value(self) -> u16 {
        match self {
            Self::A => 1,
            Self::NS => 2,
            Self::CNAME => 5,
            Self::SOA => 6,
            Self::PTR => 12,
            Self::MX => 15,
            Self::TXT => 16,
            Self::AAAA => 28,
            Self::OPT => 41,
            Self::DS => 43,
            Self::RRSIG => 46,
            Self::NSEC => 47,
            Self::DNSKEY => 48,
            Self::NSEC3 => 50,
            Self::NSEC3PARAM => 51,
            Self::IXFR => 251,
            Self::AXFR => 252,
            Self::ANY => 255,
            Self::Unknown(v) => v,
        }
    }

    /// True for record types this tool will query for or interpret as
    /// DNSSEC chain-of-trust evidence.
    pub fn is_dnssec(self) -> bool {
        matches!(
            self,
            Self::DS | Self::RRSIG | Self::NSEC | Self::DNSKEY | Self::NSEC3 | Self::NSEC3PARAM
        )
    }

    /// Zone transfer types are rejected by this tool's CLI (§6).
    pub fn is_zone_transfer(self) -> bool {
        matches!(self, Self::AXFR | Self::IXFR)
    }
}

impl From<u16> for RecordType {
    fn from(v: u16) -> Self {
        match v {
            1 => Self::A,
            2 => Self::NS,
            5 => Self::CNAME,
            6 => Self::SOA,
            12 => Self::PTR,
            15 => Self::MX,
            16 => Self::TXT,
            28 => Self::AAAA,
            41 => Self::OPT,
            43 => Self::DS,
            46 => Self::RRSIG,
            47 => Self::NSEC,
            48 => Self::DNSKEY,
            50 => Self::NSEC3,
            51 => Self::NSEC3PARAM,
            251 => Self::IXFR,
            252 => Self::AXFR,
            255 => Self::ANY,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::NS => write!(f, "NS"),
            Self::CNAME => write!(f, "CNAME"),
            Self::SOA => write!(f, "SOA"),
            Self::PTR => write!(f, "PTR"),
            Self::MX => write!(f, "MX"),
            Self::TXT => write!(f, "TXT"),
            Self::AAAA => write!(f, "AAAA"),
            Self::OPT => write!(f, "OPT"),
            Self::DS => write!(f, "DS"),
            Self::RRSIG => write!(f, "RRSIG"),
            Self::NSEC => write!(f, "NSEC"),
            Self::DNSKEY => write!(f, "DNSKEY"),
            Self::NSEC3 => write!(f, "NSEC3"),
            Self::NSEC3PARAM => write!(f, "NSEC3PARAM"),
            Self::ANY => write!(f, "ANY"),
            Self::AXFR => write!(f, "AXFR"),
            Self::IXFR => write!(f, "IXFR"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl FromStr for RecordType {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "NS" => Self::NS,
            "CNAME" => Self::CNAME,
            "SOA" => Self::SOA,
            "PTR" => Self::PTR,
            "MX" => Self::MX,
            "TXT" => Self::TXT,
            "AAAA" => Self::AAAA,
            "OPT" => Self::OPT,
            "DS" => Self::DS,
            "RRSIG" => Self::RRSIG,
            "NSEC" => Self::NSEC,
            "DNSKEY" => Self::DNSKEY,
            "NSEC3" => Self::NSEC3,
            "NSEC3PARAM" => Self::NSEC3PARAM,
            "ANY" => Self::ANY,
            "AXFR" => Self::AXFR,
            "IXFR" => Self::IXFR,
            other => {
                if let Some(num) = other.strip_prefix("TYPE") {
                    Self::Unknown(
                        num.parse()
                            .map_err(|_| ProtoError::from(format!("unknown record type {s}")))?,
                    )
                } else {
                    return Err(ProtoError::from(format!("unknown record type {s}")));
                }
            }
        })
    }
}

impl BinEncodable for RecordType {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.value())
    }
}

impl BinDecodable for RecordType {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self::from(decoder.read_u16()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_types() {
        for rt in [
            RecordType::A,
            RecordType::AAAA,
            RecordType::DNSKEY,
            RecordType::RRSIG,
            RecordType::NSEC3,
        ] {
            assert_eq!(RecordType::from(rt.value()), rt);
            assert_eq!(rt.to_string().parse::<RecordType>().unwrap(), rt);
        }
    }

    #[test]
    fn unknown_type_round_trips_numerically() {
        let rt = RecordType::from(9999);
        assert_eq!(rt, RecordType::Unknown(9999));
        assert_eq!(rt.to_string(), "TYPE9999");
    }

    #[test]
    fn zone_transfer_types_are_flagged() {
        assert!(RecordType::AXFR.is_zone_transfer());
        assert!(RecordType::IXFR.is_zone_transfer());
        assert!(!RecordType::A.is_zone_transfer());
    }
}
