//! Flag rules.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    character::streaming::char,
    combinator::{map, opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{atom, sp},
    types::flag::{Flag, FlagFetch, FlagPerm, MailboxAttribute},
};

/// `flag = "\Answered" / "\Flagged" / "\Deleted" / "\Seen" / "\Draft" /
///         flag-keyword / flag-extension`
///
/// System flags are recognised case-insensitively; `\Recent` is not a
/// `flag` (see [`flag_fetch`]).
pub(crate) fn flag(input: &[u8]) -> ImapResult<'_, Flag> {
    alt((
        map(preceded(char('\\'), atom), Flag::system),
        map(atom, Flag::Keyword),
    ))(input)
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
///
/// A trailing space before the closing parenthesis (`(\Seen )`) is
/// tolerated; some servers emit it.
pub(crate) fn flag_list(input: &[u8]) -> ImapResult<'_, Vec<Flag>> {
    delimited(
        tag(b"("),
        map(
            opt(terminated(separated_list1(sp, flag), opt(sp))),
            Option::unwrap_or_default,
        ),
        tag(b")"),
    )(input)
}

/// `flag-fetch = flag / "\Recent"`
pub(crate) fn flag_fetch(input: &[u8]) -> ImapResult<'_, FlagFetch> {
    let peeked: ImapResult<'_, &[u8]> = recognize(tuple((char('\\'), atom)))(input);

    if let Ok((rem, peeked)) = peeked {
        if peeked.eq_ignore_ascii_case(b"\\recent") {
            return Ok((rem, FlagFetch::Recent));
        }
    }

    map(flag, FlagFetch::Flag)(input)
}

/// `flag-perm = flag / "\*"`
pub(crate) fn flag_perm(input: &[u8]) -> ImapResult<'_, FlagPerm> {
    alt((
        value(FlagPerm::Asterisk, tag("\\*")),
        map(flag, FlagPerm::Flag),
    ))(input)
}

/// ```abnf
/// mbx-list-flags = *(mbx-list-oflag SP) mbx-list-sflag *(SP mbx-list-oflag) /
///                  mbx-list-oflag *(SP mbx-list-oflag)
/// ```
///
/// Parsed as a flat `\`-atom list; selectability flags are not enforced
/// to be unique.
pub(crate) fn mbx_list_flags(input: &[u8]) -> ImapResult<'_, Vec<MailboxAttribute>> {
    separated_list1(sp, map(preceded(char('\\'), atom), MailboxAttribute::from))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::core::Atom;

    #[test]
    fn test_flag_classification() {
        let tests: &[(&[u8], Flag)] = &[
            (b"\\Seen ", Flag::Seen),
            (b"\\seen ", Flag::Seen),
            (b"\\ANSWERED ", Flag::Answered),
            (
                b"\\Unknown ",
                Flag::Extension(Atom::try_from("Unknown").unwrap()),
            ),
            (b"forwarded ", Flag::Keyword(Atom::try_from("forwarded").unwrap())),
        ];

        for (test, expected) in tests {
            let (_, got) = flag(test).unwrap();
            assert_eq!(*expected, got);
        }
    }

    #[test]
    fn test_flag_list_accepts_trailing_space() {
        let (_, got) = flag_list(b"(\\Seen \\Answered) ").unwrap();
        assert_eq!(vec![Flag::Seen, Flag::Answered], got);

        let (_, got) = flag_list(b"(\\Seen ) ").unwrap();
        assert_eq!(vec![Flag::Seen], got);

        let (_, got) = flag_list(b"() ").unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_flag_fetch_recent() {
        let (_, got) = flag_fetch(b"\\Recent ").unwrap();
        assert_eq!(FlagFetch::Recent, got);

        let (_, got) = flag_fetch(b"\\rEcEnT ").unwrap();
        assert_eq!(FlagFetch::Recent, got);
    }
}
