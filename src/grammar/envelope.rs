//! ENVELOPE rules.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::map,
    multi::many1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{nil, nstring, sp},
    types::envelope::{Address, Envelope},
};

/// `envelope = "(" env-date SP env-subject SP env-from SP env-sender SP
///             env-reply-to SP env-to SP env-cc SP env-bcc SP
///             env-in-reply-to SP env-message-id ")"`
///
/// The date, subject, in-reply-to, and message-id slots are plain
/// nstrings; the six address slots are parenthesised address lists or
/// NIL.
pub(crate) fn envelope(input: &[u8]) -> ImapResult<'_, Envelope> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            nstring,
            preceded(sp, nstring),
            preceded(sp, address_list),
            preceded(sp, address_list),
            preceded(sp, address_list),
            preceded(sp, address_list),
            preceded(sp, address_list),
            preceded(sp, address_list),
            preceded(sp, nstring),
            preceded(sp, nstring),
        )),
        tag(b")"),
    );

    let (remaining, (date, subject, from, sender, reply_to, to, cc, bcc, in_reply_to, message_id)) =
        parser(input)?;

    Ok((
        remaining,
        Envelope {
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        },
    ))
}

/// `env-from =/ env-to =/ ... = "(" 1*address ")" / nil`
///
/// Some servers put spaces between the addresses; tolerated.
fn address_list(input: &[u8]) -> ImapResult<'_, Vec<Address>> {
    alt((
        delimited(
            tag(b"("),
            many1(preceded(nom::combinator::opt(sp), address)),
            tag(b")"),
        ),
        map(nil, |_| Vec::new()),
    ))(input)
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
pub(crate) fn address(input: &[u8]) -> ImapResult<'_, Address> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            nstring,
            preceded(sp, nstring),
            preceded(sp, nstring),
            preceded(sp, nstring),
        )),
        tag(b")"),
    );

    let (remaining, (name, adl, mailbox, host)) = parser(input)?;

    Ok((
        remaining,
        Address {
            name,
            adl,
            mailbox,
            host,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::core::NString;

    #[test]
    fn test_envelope() {
        let input = b"(\"Wed, 17 Jul 1996 02:23:25 -0700 (PDT)\" \"subject\" ((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) NIL NIL ((NIL NIL \"imap\" \"cac.washington.edu\")) NIL NIL NIL \"<B27397-0100000@cac.washington.edu>\")\r\n";

        let (rem, got) = envelope(input).unwrap();
        assert_eq!(b"\r\n", rem);
        assert_eq!(1, got.from.len());
        assert_eq!(Some(b"Terry Gray".as_ref()), got.from[0].name.as_bytes());
        assert!(got.sender.is_empty());
        assert_eq!(NString::NIL, got.in_reply_to);
    }

    #[test]
    fn test_address_spaces_tolerated() {
        let input = b"((NIL NIL \"a\" \"b\") (NIL NIL \"c\" \"d\"))x";
        let (_, got) = address_list(input).unwrap();
        assert_eq!(2, got.len());
    }
}
