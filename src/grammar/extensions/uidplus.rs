//! UIDPLUS (RFC 4315): `UID EXPUNGE` and the APPENDUID/COPYUID codes.

use std::num::NonZeroU32;

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    multi::separated_list1,
    sequence::{preceded, separated_pair, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{core::nz_number, sequence::sequence_set},
    types::{
        command::CommandBody,
        response::Code,
        sequence::{SeqOrUid, Sequence, SequenceSet},
    },
};

/// `uid-expunge = "UID" SP "EXPUNGE" SP sequence-set`
pub(crate) fn uid_expunge(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(
        preceded(tag_no_case(b"UID EXPUNGE "), sequence_set),
        |sequence_set| CommandBody::ExpungeUid { sequence_set },
    )(input)
}

/// `resp-code-apnd = "APPENDUID" SP nz-number SP append-uid`
///
/// MULTIAPPEND widens `append-uid` to a uid-set.
pub(crate) fn resp_code_apnd(input: &[u8]) -> ImapResult<'_, Code> {
    let (remaining, (_, uid_validity, _, uids)) =
        tuple((tag_no_case(b"APPENDUID "), nz_number, tag(b" "), uid_set))(input)?;

    Ok((remaining, Code::AppendUid { uid_validity, uids }))
}

/// `resp-code-copy = "COPYUID" SP nz-number SP uid-set SP uid-set`
pub(crate) fn resp_code_copy(input: &[u8]) -> ImapResult<'_, Code> {
    let (remaining, (_, uid_validity, _, source, _, destination)) = tuple((
        tag_no_case(b"COPYUID "),
        nz_number,
        tag(b" "),
        uid_set,
        tag(b" "),
        uid_set,
    ))(input)?;

    Ok((
        remaining,
        Code::CopyUid {
            uid_validity,
            source,
            destination,
        },
    ))
}

/// `uid-set = (uniqueid / uid-range) *("," (uniqueid / uid-range))`
///
/// Unlike `sequence-set`, neither `*` nor `$` is allowed here.
fn uid_set(input: &[u8]) -> ImapResult<'_, SequenceSet> {
    map(
        separated_list1(
            tag(b","),
            alt((
                map(uid_range, |(from, to)| {
                    Sequence::Range(SeqOrUid::Value(from), SeqOrUid::Value(to))
                }),
                map(nz_number, |uid| Sequence::Single(SeqOrUid::Value(uid))),
            )),
        ),
        SequenceSet::Sequences,
    )(input)
}

/// `uid-range = uniqueid ":" uniqueid`
fn uid_range(input: &[u8]) -> ImapResult<'_, (NonZeroU32, NonZeroU32)> {
    separated_pair(nz_number, tag(b":"), nz_number)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resp_code_copy() {
        let (_, got) = resp_code_copy(b"COPYUID 38505 304,319:320 3956:3958]").unwrap();
        match got {
            Code::CopyUid {
                uid_validity,
                source,
                destination,
            } => {
                assert_eq!(38505, uid_validity.get());
                assert!(matches!(source, SequenceSet::Sequences(ref s) if s.len() == 2));
                assert!(matches!(destination, SequenceSet::Sequences(ref s) if s.len() == 1));
            }
            _ => panic!("expected COPYUID"),
        }
    }

    #[test]
    fn test_uid_set_rejects_star() {
        assert!(uid_set(b"*]").is_err());
    }
}
