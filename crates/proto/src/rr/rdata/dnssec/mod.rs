// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! RDATA for the DNSSEC record types: DS, DNSKEY, RRSIG, NSEC, NSEC3,
//! NSEC3PARAM.

mod ds;
mod dnskey;
mod nsec;
mod nsec3;
mod nsec3param;
mod rrsig;
mod type_bit_maps;

pub use ds::DS;
pub use dnskey::DNSKEY;
pub use nsec::NSEC;
pub use nsec3::NSEC3;
pub use nsec3param::NSEC3PARAM;
pub use rrsig::RRSIG;
