// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Type-tagged record data (§3, Data Model).

mod address;
pub mod dnssec;
mod mx;
mod name_rdata;
mod opt;
mod soa;
mod txt;
mod unknown;

pub use address::{A, AAAA};
pub use mx::MX;
pub use name_rdata::{CNAME, NS, PTR};
pub use opt::{EdnsOption, OPT};
pub use soa::SOA;
pub use txt::TXT;
pub use unknown::Unknown;

pub use dnssec::{DNSKEY, DS, NSEC, NSEC3, NSEC3PARAM, RRSIG};

use std::fmt;

use crate::error::{ProtoError, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder};

/// The decoded payload of a resource record, tagged by its `RecordType`.
/// Unknown types (RFC 3597) are preserved as an opaque blob rather than
/// rejected, so this codec never needs to drop a record it cannot fully
/// interpret.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum RData {
    A(A),
    AAAA(AAAA),
    NS(NS),
    CNAME(CNAME),
    SOA(SOA),
    PTR(PTR),
    MX(MX),
    TXT(TXT),
    OPT(OPT),
    DS(DS),
    DNSKEY(DNSKEY),
    RRSIG(RRSIG),
    NSEC(NSEC),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),
    Unknown(Unknown),
}

impl RData {
    /// The record type this RDATA corresponds to.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::AAAA(_) => RecordType::AAAA,
            Self::NS(_) => RecordType::NS,
            Self::CNAME(_) => RecordType::CNAME,
            Self::SOA(_) => RecordType::SOA,
            Self::PTR(_) => RecordType::PTR,
            Self::MX(_) => RecordType::MX,
            Self::TXT(_) => RecordType::TXT,
            Self::OPT(_) => RecordType::OPT,
            Self::DS(_) => RecordType::DS,
            Self::DNSKEY(_) => RecordType::DNSKEY,
            Self::RRSIG(_) => RecordType::RRSIG,
            Self::NSEC(_) => RecordType::NSEC,
            Self::NSEC3(_) => RecordType::NSEC3,
            Self::NSEC3PARAM(_) => RecordType::NSEC3PARAM,
            Self::Unknown(u) => u.record_type(),
        }
    }

    /// Borrows the OPT payload, if this is one.
    pub fn as_opt(&self) -> Option<&OPT> {
        match self {
            Self::OPT(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows the RRSIG payload, if this is one.
    pub fn as_rrsig(&self) -> Option<&RRSIG> {
        match self {
            Self::RRSIG(r) => Some(r),
            _ => None,
        }
    }

    /// Borrows the DNSKEY payload, if this is one.
    pub fn as_dnskey(&self) -> Option<&DNSKEY> {
        match self {
            Self::DNSKEY(d) => Some(d),
            _ => None,
        }
    }

    /// Borrows the DS payload, if this is one.
    pub fn as_ds(&self) -> Option<&DS> {
        match self {
            Self::DS(d) => Some(d),
            _ => None,
        }
    }

    /// Borrows the NSEC payload, if this is one.
    pub fn as_nsec(&self) -> Option<&NSEC> {
        match self {
            Self::NSEC(n) => Some(n),
            _ => None,
        }
    }

    /// Borrows the NSEC3 payload, if this is one.
    pub fn as_nsec3(&self) -> Option<&NSEC3> {
        match self {
            Self::NSEC3(n) => Some(n),
            _ => None,
        }
    }

    /// Emits the raw RDATA bytes in the requested mode (normal or
    /// canonical), without the RDLENGTH prefix.
    pub fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self {
            Self::A(r) => r.emit(encoder),
            Self::AAAA(r) => r.emit(encoder),
            Self::NS(r) => r.emit(encoder),
            Self::CNAME(r) => r.emit(encoder),
            Self::SOA(r) => r.emit(encoder),
            Self::PTR(r) => r.emit(encoder),
            Self::MX(r) => r.emit(encoder),
            Self::TXT(r) => r.emit(encoder),
            Self::OPT(r) => r.emit(encoder),
            Self::DS(r) => r.emit(encoder),
            Self::DNSKEY(r) => r.emit(encoder),
            Self::RRSIG(r) => r.emit(encoder),
            Self::NSEC(r) => r.emit(encoder),
            Self::NSEC3(r) => r.emit(encoder),
            Self::NSEC3PARAM(r) => r.emit(encoder),
            Self::Unknown(r) => r.emit(encoder),
        }
    }

    /// Decodes RDATA for the given type and RDLENGTH. Any parse error here
    /// is fatal for the whole message per the wire-codec invariant (§4.1):
    /// callers must not accept a partially decoded message.
    pub fn read(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdlength: usize,
    ) -> ProtoResult<Self> {
        if rdlength == 0 && !matches!(record_type, RecordType::TXT) {
            return match record_type {
                RecordType::NS | RecordType::CNAME | RecordType::PTR => {
                    Err(ProtoError::TruncatedRdata {
                        expected: 1,
                        available: 0,
                    })
                }
                _ => Ok(Self::Unknown(Unknown::new(record_type, Vec::new()))),
            };
        }

        Ok(match record_type {
            RecordType::A => Self::A(A::read(decoder)?),
            RecordType::AAAA => Self::AAAA(AAAA::read(decoder)?),
            RecordType::NS => Self::NS(NS::read(decoder)?),
            RecordType::CNAME => Self::CNAME(CNAME::read(decoder)?),
            RecordType::SOA => Self::SOA(SOA::read(decoder)?),
            RecordType::PTR => Self::PTR(PTR::read(decoder)?),
            RecordType::MX => Self::MX(MX::read(decoder)?),
            RecordType::TXT => Self::TXT(TXT::read_data(decoder, rdlength)?),
            RecordType::OPT => Self::OPT(OPT::read_data(decoder, rdlength)?),
            RecordType::DS => Self::DS(DS::read_data(decoder, rdlength)?),
            RecordType::DNSKEY => Self::DNSKEY(DNSKEY::read_data(decoder, rdlength)?),
            RecordType::RRSIG => Self::RRSIG(RRSIG::read_data(decoder, rdlength)?),
            RecordType::NSEC => Self::NSEC(NSEC::read_data(decoder, rdlength)?),
            RecordType::NSEC3 => Self::NSEC3(NSEC3::read_data(decoder, rdlength)?),
            RecordType::NSEC3PARAM => Self::NSEC3PARAM(NSEC3PARAM::read_data(decoder)?),
            other => Self::Unknown(Unknown::read_data(decoder, other, rdlength)?),
        })
    }
}

impl BinEncodable for RData {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        RData::emit(self, encoder)
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(r) => write!(f, "{r}"),
            Self::AAAA(r) => write!(f, "{r}"),
            Self::NS(r) => write!(f, "{r}"),
            Self::CNAME(r) => write!(f, "{r}"),
            Self::SOA(r) => write!(f, "{r}"),
            Self::PTR(r) => write!(f, "{r}"),
            Self::MX(r) => write!(f, "{r}"),
            Self::TXT(r) => write!(f, "{r}"),
            Self::OPT(_) => write!(f, ""),
            Self::DS(r) => write!(f, "{r}"),
            Self::DNSKEY(r) => write!(f, "{r}"),
            Self::RRSIG(r) => write!(f, "{r}"),
            Self::NSEC(r) => write!(f, "{r}"),
            Self::NSEC3(r) => write!(f, "{r}"),
            Self::NSEC3PARAM(r) => write!(f, "{r}"),
            Self::Unknown(r) => write!(f, "{r}"),
        }
    }
}
