// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The fixed 12-byte message header (RFC 1035 §4.1.1).

use crate::error::ProtoResult;
use crate::op::{OpCode, ResponseCode};
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// Whether a `Message` is a query or a response (the header's QR bit).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MessageType {
    Query,
    Response,
}

/// The 12-byte fixed header every DNS message starts with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Header {
    id: u16,
    message_type: MessageType,
    op_code: OpCode,
    authoritative: bool,
    truncated: bool,
    recursion_desired: bool,
    recursion_available: bool,
    authentic_data: bool,
    checking_disabled: bool,
    response_code_low: u8,
    query_count: u16,
    answer_count: u16,
    authority_count: u16,
    additional_count: u16,
}

impl Header {
    /// Builds a fresh header with every flag cleared except the given type/opcode.
    pub fn new(id: u16, message_type: MessageType, op_code: OpCode) -> Self {
        Self {
            id,
            message_type,
            op_code,
            authoritative: false,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            authentic_data: false,
            checking_disabled: false,
            response_code_low: 0,
            query_count: 0,
            answer_count: 0,
            authority_count: 0,
            additional_count: 0,
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.id = id;
        self
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.message_type = message_type;
        self
    }

    pub fn op_code(&self) -> OpCode {
        self.op_code
    }

    pub fn set_op_code(&mut self, op_code: OpCode) -> &mut Self {
        self.op_code = op_code;
        self
    }

    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.authoritative = authoritative;
        self
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.truncated = truncated;
        self
    }

    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.recursion_desired = recursion_desired;
        self
    }

    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.recursion_available = recursion_available;
        self
    }

    /// The AD bit (RFC 4035 §3.2.3): the server claims everything returned
    /// was validated per its own policy. This tool treats its own `AD`
    /// setting on outgoing queries as meaningless noise and instead trusts
    /// only its own validation walk on the response.
    pub fn authentic_data(&self) -> bool {
        self.authentic_data
    }

    pub fn set_authentic_data(&mut self, authentic_data: bool) -> &mut Self {
        self.authentic_data = authentic_data;
        self
    }

    /// The CD bit (RFC 4035 §3.2.2): "Checking Disabled". This tool always
    /// sends `CD=1` upstream so the recursive server does not discard
    /// evidence this validator wants to see for itself.
    pub fn checking_disabled(&self) -> bool {
        self.checking_disabled
    }

    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.checking_disabled = checking_disabled;
        self
    }

    /// The header's 4-bit response code. Combine with an EDNS extended
    /// RCODE via `ResponseCode::from_parts` for the full 12-bit value.
    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.response_code_low as u16)
    }

    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.response_code_low = response_code.low();
        self
    }

    /// Folds in the EDNS extended RCODE byte once the OPT record (if any)
    /// has been decoded.
    pub fn merge_response_code(&mut self, high: u8) {
        self.response_code_low = ResponseCode::from_parts(self.response_code_low, high).low();
    }

    pub fn query_count(&self) -> u16 {
        self.query_count
    }

    pub fn set_query_count(&mut self, count: u16) -> &mut Self {
        self.query_count = count;
        self
    }

    pub fn answer_count(&self) -> u16 {
        self.answer_count
    }

    pub fn set_answer_count(&mut self, count: u16) -> &mut Self {
        self.answer_count = count;
        self
    }

    pub fn authority_count(&self) -> u16 {
        self.authority_count
    }

    pub fn set_authority_count(&mut self, count: u16) -> &mut Self {
        self.authority_count = count;
        self
    }

    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }

    pub fn set_additional_count(&mut self, count: u16) -> &mut Self {
        self.additional_count = count;
        self
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.id)?;

        let mut flags: u16 = 0;
        if matches!(self.message_type, MessageType::Response) {
            flags |= 1 << 15;
        }
        flags |= (self.op_code.value() as u16 & 0x0f) << 11;
        if self.authoritative {
            flags |= 1 << 10;
        }
        if self.truncated {
            flags |= 1 << 9;
        }
        if self.recursion_desired {
            flags |= 1 << 8;
        }
        if self.recursion_available {
            flags |= 1 << 7;
        }
        // bit 6 is the reserved `Z` bit, always 0.
        if self.authentic_data {
            flags |= 1 << 5;
        }
        if self.checking_disabled {
            flags |= 1 << 4;
        }
        flags |= self.response_code_low as u16 & 0x0f;
        encoder.emit_u16(flags)?;

        encoder.emit_u16(self.query_count)?;
        encoder.emit_u16(self.answer_count)?;
        encoder.emit_u16(self.authority_count)?;
        encoder.emit_u16(self.additional_count)
    }

    pub(crate) fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let id = decoder.read_u16()?;
        let flags = decoder.read_u16()?;
        let query_count = decoder.read_u16()?;
        let answer_count = decoder.read_u16()?;
        let authority_count = decoder.read_u16()?;
        let additional_count = decoder.read_u16()?;

        let message_type = if flags & (1 << 15) != 0 {
            MessageType::Response
        } else {
            MessageType::Query
        };
        let op_code = OpCode::from(((flags >> 11) & 0x0f) as u8);

        Ok(Self {
            id,
            message_type,
            op_code,
            authoritative: flags & (1 << 10) != 0,
            truncated: flags & (1 << 9) != 0,
            recursion_desired: flags & (1 << 8) != 0,
            recursion_available: flags & (1 << 7) != 0,
            authentic_data: flags & (1 << 5) != 0,
            checking_disabled: flags & (1 << 4) != 0,
            response_code_low: (flags & 0x0f) as u8,
            query_count,
            answer_count,
            authority_count,
            additional_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_through_wire() {
        let mut header = Header::new(0x1234, MessageType::Query, OpCode::Query);
        header
            .set_recursion_desired(true)
            .set_checking_disabled(true)
            .set_authentic_data(false);

        let mut buf = Vec::new();
        {
            let mut encoder = BinEncoder::new(&mut buf);
            header.emit(&mut encoder).unwrap();
        }
        let mut decoder = BinDecoder::new(&buf);
        let decoded = Header::read(&mut decoder).unwrap();

        assert_eq!(decoded.id(), 0x1234);
        assert!(decoded.recursion_desired());
        assert!(decoded.checking_disabled());
        assert!(!decoded.authentic_data());
        assert_eq!(decoded.message_type(), MessageType::Query);
    }

    #[test]
    fn response_code_survives_round_trip() {
        let mut header = Header::new(1, MessageType::Response, OpCode::Query);
        header.set_response_code(ResponseCode::NXDomain);
        assert_eq!(header.response_code(), ResponseCode::NXDomain);
    }
}
