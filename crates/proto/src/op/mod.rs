// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The DNS message: header, question, and the three record sections (§3).

mod edns;
mod header;
mod message;
mod op_code;
mod query;
mod response_code;

pub use edns::Edns;
pub use header::{Header, MessageType};
pub use message::Message;
pub use op_code::OpCode;
pub use query::Query;
pub use response_code::ResponseCode;
