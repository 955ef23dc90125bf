//! Sequence-set rules.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::separated_list1,
    sequence::tuple,
};

use crate::{
    decode::ImapResult,
    grammar::core::nz_number,
    types::sequence::{SeqOrUid, Sequence, SequenceSet},
};

/// `sequence-set = (seq-number / seq-range) *("," (seq-number / seq-range)) / "$"`
///
/// `$` is the SEARCHRES saved result (RFC 5182). Source order and
/// overlaps are preserved.
pub(crate) fn sequence_set(input: &[u8]) -> ImapResult<'_, SequenceSet> {
    alt((
        value(SequenceSet::SavedResult, tag(b"$")),
        map(
            separated_list1(
                tag(b","),
                alt((
                    // The range must be tried first: `2:4` starts like `2`.
                    map(seq_range, |(from, to)| Sequence::Range(from, to)),
                    map(seq_number, Sequence::Single),
                )),
            ),
            SequenceSet::Sequences,
        ),
    ))(input)
}

/// `seq-range = seq-number ":" seq-number`
fn seq_range(input: &[u8]) -> ImapResult<'_, (SeqOrUid, SeqOrUid)> {
    let (remaining, (from, _, to)) = tuple((seq_number, tag(b":"), seq_number))(input)?;

    Ok((remaining, (from, to)))
}

/// `seq-number = nz-number / "*"`
fn seq_number(input: &[u8]) -> ImapResult<'_, SeqOrUid> {
    alt((
        map(nz_number, SeqOrUid::Value),
        value(SeqOrUid::Asterisk, tag(b"*")),
    ))(input)
}
