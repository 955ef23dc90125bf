//! Mailbox rules, including the LIST/LSUB response shapes.

use abnf_core::streaming::dquote;
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_while1},
    combinator::{map, map_opt, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{astring, atom, nil, quoted_char, sp, string},
    types::{
        core::{Atom, QuotedChar},
        flag::MailboxAttribute,
        mailbox::{ListCharString, ListMailbox, Mailbox},
    },
    utils::indicators::is_list_char,
};

/// `mailbox = "INBOX" / astring`
///
/// Every case variant of INBOX is interpreted as INBOX, even when sent
/// as a quoted string or literal.
pub(crate) fn mailbox(input: &[u8]) -> ImapResult<'_, Mailbox> {
    map(astring, Mailbox::interpret)(input)
}

/// `list-mailbox = 1*list-char / string`
pub(crate) fn list_mailbox(input: &[u8]) -> ImapResult<'_, ListMailbox> {
    alt((
        map(take_while1(is_list_char), |bytes: &[u8]| {
            // list-char is an ASCII subset, so the unwrap can't fire.
            ListMailbox::Token(ListCharString::unvalidated(
                std::str::from_utf8(bytes).unwrap().to_owned(),
            ))
        }),
        map(string, ListMailbox::String),
    ))(input)
}

/// `mailbox-list = "(" [mbx-list-flags] ")" SP
///                 (DQUOTE QUOTED-CHAR DQUOTE / nil) SP mailbox
///                 [SP "(" "CHILDINFO" SP "(" ... ")" ")"]`
///
/// The optional tail is the LIST-EXTENDED `mbox-list-extended` item; only
/// `CHILDINFO` is interpreted, per RFC 5258.
#[allow(clippy::type_complexity)]
pub(crate) fn mailbox_list(
    input: &[u8],
) -> ImapResult<'_, (Vec<MailboxAttribute>, Option<QuotedChar>, Mailbox, Vec<Atom>)> {
    let mut parser = tuple((
        delimited(tag(b"("), opt(crate::grammar::flag::mbx_list_flags), tag(b")")),
        sp,
        alt((
            map(delimited(dquote, quoted_char, dquote), Some),
            value(None, nil),
        )),
        sp,
        mailbox,
        opt(preceded(sp, child_info)),
    ));

    let (remaining, (attributes, _, delimiter, _, mailbox, child_info)) = parser(input)?;

    Ok((
        remaining,
        (
            attributes.unwrap_or_default(),
            delimiter,
            mailbox,
            child_info.unwrap_or_default(),
        ),
    ))
}

/// `"(" "CHILDINFO" SP "(" astring *(SP astring) ")" ")"`
///
/// The selection options are kept as atoms (`"SUBSCRIBED"` etc. arrive
/// quoted on the wire, unquoted here for comparison).
fn child_info(input: &[u8]) -> ImapResult<'_, Vec<Atom>> {
    delimited(
        tuple((tag(b"("), tag_no_case(b"CHILDINFO"), sp, tag(b"("))),
        separated_list1(
            sp,
            alt((
                atom,
                map_opt(crate::grammar::core::quoted, |quoted| {
                    Atom::try_from(quoted.inner().to_ascii_uppercase()).ok()
                }),
            )),
        ),
        tag(b"))"),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox() {
        assert!(matches!(mailbox(b"\"iNbOx\" ").unwrap().1, Mailbox::Inbox));
        assert!(matches!(
            mailbox(b"{5}\r\nInBoX\r\n").unwrap().1,
            Mailbox::Inbox
        ));
        assert!(matches!(
            mailbox(b"Sent ").unwrap().1,
            Mailbox::Other(_)
        ));
        assert!(matches!(mailbox(b"Sent"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_list_mailbox_wildcards() {
        assert!(matches!(
            list_mailbox(b"% ").unwrap().1,
            ListMailbox::Token(_)
        ));
        assert!(matches!(
            list_mailbox(b"INBOX.* ").unwrap().1,
            ListMailbox::Token(_)
        ));
    }

    #[test]
    fn test_mailbox_list() {
        let (_, (attributes, delimiter, mailbox, child_info)) =
            mailbox_list(b"(\\Noselect \\HasChildren) \"/\" foo\r\n").unwrap();
        assert_eq!(
            vec![MailboxAttribute::Noselect, MailboxAttribute::HasChildren],
            attributes
        );
        assert_eq!('/', delimiter.unwrap().inner());
        assert!(matches!(mailbox, Mailbox::Other(_)));
        assert!(child_info.is_empty());

        let (_, (_, delimiter, _, child_info)) =
            mailbox_list(b"() NIL inbox.foo (CHILDINFO (\"SUBSCRIBED\"))\r\n").unwrap();
        assert!(delimiter.is_none());
        assert_eq!(1, child_info.len());
    }
}
