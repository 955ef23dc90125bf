//! ENABLE (RFC 5161).

use nom::{
    bytes::streaming::tag_no_case,
    combinator::map,
    multi::many1,
    sequence::preceded,
};

use crate::{
    decode::ImapResult,
    grammar::core::{atom, sp},
    types::{command::CommandBody, core::Vec1, response::Capability, response::Data},
};

/// `enable = "ENABLE" 1*(SP capability)`
pub(crate) fn enable(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(
        preceded(tag_no_case(b"ENABLE"), many1(preceded(sp, atom))),
        |capabilities| CommandBody::Enable {
            capabilities: Vec1::unvalidated(capabilities),
        },
    )(input)
}

/// `enable-data = "ENABLED" *(SP capability)`
pub(crate) fn enable_data(input: &[u8]) -> ImapResult<'_, Data> {
    map(
        preceded(
            tag_no_case(b"ENABLED"),
            nom::multi::many0(preceded(sp, map(atom, Capability::from))),
        ),
        |capabilities| Data::Enabled { capabilities },
    )(input)
}
