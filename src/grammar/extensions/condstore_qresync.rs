//! CONDSTORE and QRESYNC (RFC 7162): SELECT/EXAMINE parameters, FETCH
//! modifiers, and the STORE UNCHANGEDSINCE modifier.
//!
//! The VANISHED response and the HIGHESTMODSEQ/NOMODSEQ/MODIFIED codes
//! are wired into [`crate::grammar::response`].

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        core::{number64, nz_number, sp},
        sequence::sequence_set,
    },
    types::command::{FetchModifier, SelectParameter},
};

/// `select-param *(SP select-param)` inside `SELECT mailbox (params)`.
pub(crate) fn select_params(input: &[u8]) -> ImapResult<'_, Vec<SelectParameter>> {
    delimited(tag(b"("), separated_list1(sp, select_param), tag(b")"))(input)
}

/// `select-param = "CONDSTORE" / "QRESYNC" SP "(" uidvalidity SP
///                 mod-sequence-value [SP known-uids] ")"`
fn select_param(input: &[u8]) -> ImapResult<'_, SelectParameter> {
    alt((
        value(SelectParameter::CondStore, tag_no_case(b"CONDSTORE")),
        map(
            preceded(
                tag_no_case(b"QRESYNC "),
                delimited(
                    tag(b"("),
                    tuple((
                        nz_number,
                        sp,
                        number64,
                        opt(preceded(sp, sequence_set)),
                    )),
                    tag(b")"),
                ),
            ),
            |(uid_validity, _, mod_seq, known_uids)| SelectParameter::Qresync {
                uid_validity,
                mod_seq,
                known_uids,
            },
        ),
    ))(input)
}

/// `fetch-modifier *(SP fetch-modifier)` inside `FETCH ... (mods)`.
pub(crate) fn fetch_modifiers(input: &[u8]) -> ImapResult<'_, Vec<FetchModifier>> {
    delimited(tag(b"("), separated_list1(sp, fetch_modifier), tag(b")"))(input)
}

/// `fetch-modifier = "CHANGEDSINCE" SP mod-sequence-value / "VANISHED"`
fn fetch_modifier(input: &[u8]) -> ImapResult<'_, FetchModifier> {
    alt((
        map(
            preceded(tag_no_case(b"CHANGEDSINCE "), number64),
            FetchModifier::ChangedSince,
        ),
        value(FetchModifier::Vanished, tag_no_case(b"VANISHED")),
    ))(input)
}

/// `"(" "UNCHANGEDSINCE" SP mod-sequence-valzer ")"`: the STORE
/// modifier.
pub(crate) fn store_unchangedsince(input: &[u8]) -> ImapResult<'_, u64> {
    delimited(
        tag(b"("),
        preceded(tag_no_case(b"UNCHANGEDSINCE "), number64),
        tag(b")"),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_params() {
        let (_, got) = select_params(b"(CONDSTORE) ").unwrap();
        assert_eq!(vec![SelectParameter::CondStore], got);

        let (_, got) = select_params(b"(QRESYNC (67890007 20050715194045000 41,43:211)) ").unwrap();
        assert!(matches!(
            got.as_slice(),
            [SelectParameter::Qresync {
                known_uids: Some(_),
                ..
            }]
        ));
    }

    #[test]
    fn test_fetch_modifiers() {
        let (_, got) = fetch_modifiers(b"(CHANGEDSINCE 12345 VANISHED) ").unwrap();
        assert_eq!(
            vec![FetchModifier::ChangedSince(12345), FetchModifier::Vanished],
            got
        );
    }
}
