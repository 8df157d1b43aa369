// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! EDNS0 (RFC 6891): the pseudo-OPT-record extension mechanism. The OPT
//! record repurposes CLASS (requestor UDP payload size) and TTL (extended
//! RCODE, version, and flags including the DO bit) rather than using them
//! as a class/TTL; this module is the typed view over that repurposing.

use crate::rr::rdata::{EdnsOption, OPT};
use crate::rr::{DNSClass, Name, RData, Record};

/// Bit 15 of the OPT TTL field: DNSSEC OK (RFC 3225).
const DO_BIT: u32 = 1 << 15;

/// The EDNS pseudo-header carried as an OPT record in the additional section.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Edns {
    rcode_high: u8,
    version: u8,
    dnssec_ok: bool,
    max_payload: u16,
    options: Vec<EdnsOption>,
}

impl Default for Edns {
    fn default() -> Self {
        Self {
            rcode_high: 0,
            version: 0,
            dnssec_ok: false,
            max_payload: 1232,
            options: Vec::new(),
        }
    }
}

impl Edns {
    /// The high 8 bits of the 12-bit extended response code.
    pub fn rcode_high(&self) -> u8 {
        self.rcode_high
    }

    pub fn set_rcode_high(&mut self, rcode_high: u8) -> &mut Self {
        self.rcode_high = rcode_high;
        self
    }

    /// The EDNS version; this tool only ever speaks version 0.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn set_version(&mut self, version: u8) -> &mut Self {
        self.version = version;
        self
    }

    /// The DO (DNSSEC OK) bit: requests RRSIG/DNSKEY/etc. in responses.
    pub fn dnssec_ok(&self) -> bool {
        self.dnssec_ok
    }

    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        self.dnssec_ok = dnssec_ok;
        self
    }

    /// The requestor's advertised maximum UDP payload size.
    pub fn max_payload(&self) -> u16 {
        self.max_payload
    }

    pub fn set_max_payload(&mut self, max_payload: u16) -> &mut Self {
        self.max_payload = max_payload;
        self
    }

    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    pub fn set_options(&mut self, options: Vec<EdnsOption>) -> &mut Self {
        self.options = options;
        self
    }
}

impl From<&Record> for Edns {
    fn from(record: &Record) -> Self {
        let ttl = record.ttl();
        let rcode_high = (ttl >> 24) as u8;
        let version = (ttl >> 16) as u8;
        let flags = ttl & 0xffff;
        let dnssec_ok = flags & DO_BIT != 0;
        let max_payload = record.dns_class().value();
        let options = record
            .data()
            .as_opt()
            .map(|opt| opt.options().to_vec())
            .unwrap_or_default();

        Self {
            rcode_high,
            version,
            dnssec_ok,
            max_payload,
            options,
        }
    }
}

impl From<&Edns> for Record {
    fn from(edns: &Edns) -> Self {
        let mut ttl: u32 = (edns.rcode_high as u32) << 24 | (edns.version as u32) << 16;
        if edns.dnssec_ok {
            ttl |= DO_BIT;
        }
        let mut record = Record::from_rdata(Name::root(), ttl, RData::OPT(OPT::new(edns.options.clone())));
        record.set_dns_class(DNSClass::Opt(edns.max_payload));
        record
    }
}
