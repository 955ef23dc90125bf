//! STATUS attribute rules.

use nom::{
    branch::alt,
    bytes::streaming::tag_no_case,
    combinator::{map, value},
    multi::separated_list1,
    sequence::{preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{number, number64, nz_number, sp},
    types::status::{StatusDataItem, StatusDataItemName},
};

/// `status-att = "MESSAGES" / "RECENT" / "UIDNEXT" / "UIDVALIDITY" /
///               "UNSEEN" / "HIGHESTMODSEQ"`
pub(crate) fn status_att(input: &[u8]) -> ImapResult<'_, StatusDataItemName> {
    alt((
        value(StatusDataItemName::Messages, tag_no_case(b"MESSAGES")),
        value(StatusDataItemName::Recent, tag_no_case(b"RECENT")),
        value(StatusDataItemName::UidNext, tag_no_case(b"UIDNEXT")),
        value(
            StatusDataItemName::UidValidity,
            tag_no_case(b"UIDVALIDITY"),
        ),
        value(StatusDataItemName::Unseen, tag_no_case(b"UNSEEN")),
        value(
            StatusDataItemName::HighestModSeq,
            tag_no_case(b"HIGHESTMODSEQ"),
        ),
    ))(input)
}

/// `status-att-list = status-att SP number *(SP status-att SP number)`
pub(crate) fn status_att_list(input: &[u8]) -> ImapResult<'_, Vec<StatusDataItem>> {
    separated_list1(sp, status_att_value)(input)
}

fn status_att_value(input: &[u8]) -> ImapResult<'_, StatusDataItem> {
    alt((
        map(
            preceded(tuple((tag_no_case(b"MESSAGES"), sp)), number),
            StatusDataItem::Messages,
        ),
        map(
            preceded(tuple((tag_no_case(b"RECENT"), sp)), number),
            StatusDataItem::Recent,
        ),
        map(
            preceded(tuple((tag_no_case(b"UIDNEXT"), sp)), nz_number),
            StatusDataItem::UidNext,
        ),
        map(
            preceded(tuple((tag_no_case(b"UIDVALIDITY"), sp)), nz_number),
            StatusDataItem::UidValidity,
        ),
        map(
            preceded(tuple((tag_no_case(b"UNSEEN"), sp)), number),
            StatusDataItem::Unseen,
        ),
        map(
            preceded(tuple((tag_no_case(b"HIGHESTMODSEQ"), sp)), number64),
            StatusDataItem::HighestModSeq,
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_att_list() {
        let (_, got) = status_att_list(b"MESSAGES 231 UIDNEXT 44292 HIGHESTMODSEQ 7011231777)").unwrap();
        assert_eq!(
            vec![
                StatusDataItem::Messages(231),
                StatusDataItem::UidNext(44292u32.try_into().unwrap()),
                StatusDataItem::HighestModSeq(7011231777),
            ],
            got
        );
    }
}
