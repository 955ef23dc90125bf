//! ID (RFC 2971).
//!
//! Parameter values may carry modified-UTF-7 runs (`&...-`); they are
//! decoded here, with malformed runs passing through verbatim.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, value},
    multi::separated_list0,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{nil, nstring, sp, string},
    types::{
        command::CommandBody,
        core::{IString, NString, Quoted},
        response::Data,
    },
    utils::mutf7,
};

/// `id = "ID" SP id-params-list`
pub(crate) fn id(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(preceded(tag_no_case(b"ID "), id_params_list), |parameters| {
        CommandBody::Id { parameters }
    })(input)
}

/// `id-response = "ID" SP id-params-list`
pub(crate) fn id_response(input: &[u8]) -> ImapResult<'_, Data> {
    map(preceded(tag_no_case(b"ID "), id_params_list), |parameters| {
        Data::Id { parameters }
    })(input)
}

/// `id-params-list = "(" *(string SP nstring) ")" / nil`
#[allow(clippy::type_complexity)]
fn id_params_list(input: &[u8]) -> ImapResult<'_, Option<Vec<(IString, NString)>>> {
    alt((
        map(
            delimited(
                tag(b"("),
                separated_list0(
                    sp,
                    map(tuple((string, sp, nstring)), |(key, _, value)| {
                        (decode_mutf7(key), NString(value.0.map(decode_mutf7)))
                    }),
                ),
                tag(b")"),
            ),
            Some,
        ),
        value(None, nil),
    ))(input)
}

/// Decodes `&...-` runs in quoted ID fields; literals are binary-safe
/// and stay untouched.
fn decode_mutf7(value: IString) -> IString {
    match value {
        IString::Quoted(quoted) => {
            IString::Quoted(Quoted::unvalidated(mutf7::decode(quoted.inner())))
        }
        literal => literal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_params() {
        let (_, got) = id(b"ID (\"name\" \"sin\" \"version\" NIL)\r\n").unwrap();
        match got {
            CommandBody::Id {
                parameters: Some(parameters),
            } => {
                assert_eq!(2, parameters.len());
                assert_eq!(b"name", parameters[0].0.as_bytes());
                assert_eq!(None, parameters[1].1.as_bytes());
            }
            _ => panic!("expected ID with parameters"),
        }
    }

    #[test]
    fn test_id_nil() {
        let (_, got) = id(b"ID NIL\r\n").unwrap();
        assert_eq!(CommandBody::Id { parameters: None }, got);
    }

    #[test]
    fn test_id_decodes_mutf7_values() {
        let (_, got) = id_response(b"ID (\"vendor\" \"&Jjo-Mail\")\r\n").unwrap();
        match got {
            Data::Id {
                parameters: Some(parameters),
            } => {
                assert_eq!("☺Mail".as_bytes(), parameters[0].1.as_bytes().unwrap());
            }
            _ => panic!("expected ID with parameters"),
        }
    }
}
