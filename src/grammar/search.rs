//! SEARCH keys and ESEARCH return options.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::{check_recursion, ImapResult},
    grammar::{
        core::{astring, atom, number, number64, sp},
        datetime::date,
        sequence::sequence_set,
    },
    types::{
        core::Vec1,
        search::{SearchKey, SearchReturnOption},
    },
};

/// `search-key`, including the parenthesised list form.
///
/// `OR`, `NOT`, and `(...)` nest, hence the recursion budget.
pub(crate) fn search_key(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> ImapResult<'_, SearchKey> {
    move |input: &[u8]| search_key_limited(input, remaining_recursion)
}

fn search_key_limited(input: &[u8], remaining_recursion: usize) -> ImapResult<'_, SearchKey> {
    check_recursion(input, remaining_recursion)?;

    let inner = move |input| search_key_limited(input, remaining_recursion.saturating_sub(1));

    alt((
        // Keywords taking arguments carry their separating space in the
        // tag, so a bare prefix never half-matches.
        value(SearchKey::All, tag_no_case(b"ALL")),
        value(SearchKey::Answered, tag_no_case(b"ANSWERED")),
        map(preceded(tag_no_case(b"BCC "), astring), SearchKey::Bcc),
        map(
            preceded(tag_no_case(b"BEFORE "), date),
            SearchKey::Before,
        ),
        map(preceded(tag_no_case(b"BODY "), astring), SearchKey::Body),
        map(preceded(tag_no_case(b"CC "), astring), SearchKey::Cc),
        value(SearchKey::Deleted, tag_no_case(b"DELETED")),
        value(SearchKey::Draft, tag_no_case(b"DRAFT")),
        value(SearchKey::Flagged, tag_no_case(b"FLAGGED")),
        map(preceded(tag_no_case(b"FROM "), astring), SearchKey::From),
        map(
            preceded(
                tag_no_case(b"HEADER "),
                tuple((astring, preceded(sp, astring))),
            ),
            |(name, value)| SearchKey::Header(name, value),
        ),
        map(
            preceded(tag_no_case(b"KEYWORD "), atom),
            SearchKey::Keyword,
        ),
        map(
            preceded(tag_no_case(b"LARGER "), number),
            SearchKey::Larger,
        ),
        value(SearchKey::New, tag_no_case(b"NEW")),
        map(
            preceded(tag_no_case(b"NOT "), inner),
            |key| SearchKey::Not(Box::new(key)),
        ),
        value(SearchKey::Old, tag_no_case(b"OLD")),
        map(preceded(tag_no_case(b"ON "), date), SearchKey::On),
        map(
            preceded(
                tag_no_case(b"OR "),
                tuple((inner, preceded(sp, inner))),
            ),
            |(a, b)| SearchKey::Or(Box::new(a), Box::new(b)),
        ),
        value(SearchKey::Recent, tag_no_case(b"RECENT")),
        alt((
            map(
                preceded(tag_no_case(b"SENTBEFORE "), date),
                SearchKey::SentBefore,
            ),
            map(preceded(tag_no_case(b"SENTON "), date), SearchKey::SentOn),
            map(
                preceded(tag_no_case(b"SENTSINCE "), date),
                SearchKey::SentSince,
            ),
            value(SearchKey::Seen, tag_no_case(b"SEEN")),
            map(preceded(tag_no_case(b"SINCE "), date), SearchKey::Since),
            map(
                preceded(tag_no_case(b"SMALLER "), number),
                SearchKey::Smaller,
            ),
            map(
                preceded(tag_no_case(b"SUBJECT "), astring),
                SearchKey::Subject,
            ),
            map(preceded(tag_no_case(b"TEXT "), astring), SearchKey::Text),
            map(preceded(tag_no_case(b"TO "), astring), SearchKey::To),
            map(
                preceded(tag_no_case(b"UNKEYWORD "), atom),
                SearchKey::Unkeyword,
            ),
            map(
                preceded(tag_no_case(b"UID "), sequence_set),
                SearchKey::Uid,
            ),
            value(SearchKey::Unanswered, tag_no_case(b"UNANSWERED")),
            value(SearchKey::Undeleted, tag_no_case(b"UNDELETED")),
            value(SearchKey::Undraft, tag_no_case(b"UNDRAFT")),
            value(SearchKey::Unflagged, tag_no_case(b"UNFLAGGED")),
            value(SearchKey::Unseen, tag_no_case(b"UNSEEN")),
            // `MODSEQ` key (RFC 7162); the optional entry-name prefix is
            // accepted and ignored.
            map(
                preceded(
                    tag_no_case(b"MODSEQ "),
                    preceded(opt(modseq_entry_prefix), number64),
                ),
                SearchKey::ModSeq,
            ),
            map(sequence_set, SearchKey::SequenceSet),
            map(
                delimited(
                    tag(b"("),
                    separated_list1(sp, inner),
                    tag(b")"),
                ),
                |keys| SearchKey::And(Vec1::unvalidated(keys)),
            ),
        )),
    ))(input)
}

/// `"/flags/..." SP ("priv" / "shared" / "all")`: the optional entry
/// qualifier of the MODSEQ key.
fn modseq_entry_prefix(input: &[u8]) -> ImapResult<'_, ()> {
    map(
        tuple((
            crate::grammar::core::quoted,
            sp,
            alt((
                tag_no_case(b"priv"),
                tag_no_case(b"shared"),
                tag_no_case(b"all"),
            )),
            sp,
        )),
        |_| (),
    )(input)
}

/// `search-return-opts = SP "RETURN" SP "(" [search-return-opt *(SP ...)] ")"`
pub(crate) fn search_return_opts(input: &[u8]) -> ImapResult<'_, Vec<SearchReturnOption>> {
    preceded(
        tuple((tag_no_case(b"RETURN"), sp)),
        delimited(
            tag(b"("),
            map(
                opt(separated_list1(sp, search_return_opt)),
                Option::unwrap_or_default,
            ),
            tag(b")"),
        ),
    )(input)
}

fn search_return_opt(input: &[u8]) -> ImapResult<'_, SearchReturnOption> {
    alt((
        value(SearchReturnOption::Min, tag_no_case(b"MIN")),
        value(SearchReturnOption::Max, tag_no_case(b"MAX")),
        value(SearchReturnOption::All, tag_no_case(b"ALL")),
        value(SearchReturnOption::Count, tag_no_case(b"COUNT")),
        value(SearchReturnOption::Save, tag_no_case(b"SAVE")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key() {
        assert_eq!(SearchKey::All, search_key(8)(b"ALL ").unwrap().1);
        assert_eq!(SearchKey::Unseen, search_key(8)(b"unseen ").unwrap().1);

        let (_, got) = search_key(8)(b"OR SEEN NOT FLAGGED ").unwrap();
        assert_eq!(
            SearchKey::Or(
                Box::new(SearchKey::Seen),
                Box::new(SearchKey::Not(Box::new(SearchKey::Flagged)))
            ),
            got
        );

        let (_, got) = search_key(8)(b"(SEEN FLAGGED) ").unwrap();
        assert!(matches!(got, SearchKey::And(_)));

        let (_, got) = search_key(8)(b"MODSEQ 620162338 ").unwrap();
        assert_eq!(SearchKey::ModSeq(620162338), got);

        let (_, got) =
            search_key(8)(b"MODSEQ \"/flags/\\\\draft\" all 620162338 ").unwrap();
        assert_eq!(SearchKey::ModSeq(620162338), got);

        let (_, got) = search_key(8)(b"$ ").unwrap();
        assert_eq!(
            SearchKey::SequenceSet(crate::types::sequence::SequenceSet::SavedResult),
            got
        );
    }

    #[test]
    fn test_search_key_recursion_limit() {
        let mut input = Vec::new();
        for _ in 0..64 {
            input.extend_from_slice(b"NOT ");
        }
        input.extend_from_slice(b"SEEN ");

        assert!(search_key(8)(&input).is_err());
    }

    #[test]
    fn test_search_return_opts() {
        let (_, got) = search_return_opts(b"RETURN (MIN MAX COUNT) ").unwrap();
        assert_eq!(
            vec![
                SearchReturnOption::Min,
                SearchReturnOption::Max,
                SearchReturnOption::Count
            ],
            got
        );

        let (_, got) = search_return_opts(b"RETURN () ").unwrap();
        assert!(got.is_empty());
    }
}
