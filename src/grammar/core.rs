//! Leaf rules of the formal syntax: numbers, strings, atoms, base64.
//!
//! Every rule is a streaming nom parser; see [`crate::decode`] for the
//! result-kind contract.

use std::num::NonZeroU32;

use abnf_core::streaming::{crlf_relaxed, dquote};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use nom::{
    branch::alt,
    bytes::streaming::{escaped, tag, tag_no_case, take, take_while, take_while1, take_while_m_n},
    character::streaming::{char, digit1, one_of},
    combinator::{map, map_res, opt, peek, recognize},
    sequence::{delimited, terminated, tuple},
};

use crate::{
    decode::{GrammarError, GrammarErrorKind, ImapResult},
    types::core::{
        AString, Atom, AtomExt, Charset, IString, Literal, LiteralMode, NString, Quoted,
        QuotedChar, Tag, Text,
    },
    utils::{
        indicators::{
            is_any_text_char_except_quoted_specials, is_astring_char, is_atom_char,
            is_quoted_specials, is_text_char,
        },
        unescape_quoted,
    },
};

/// Line terminator: `CRLF`, with a bare `LF` tolerated (servers in the
/// wild produce both).
pub(crate) fn crlf(input: &[u8]) -> ImapResult<'_, ()> {
    map(crlf_relaxed, |_| ())(input)
}

/// `SP`: one or more spaces.
///
/// The formal syntax wants exactly one; runs of spaces are tolerated
/// because real peers emit them.
pub(crate) fn sp(input: &[u8]) -> ImapResult<'_, ()> {
    map(take_while1(|b| b == b' '), |_| ())(input)
}

// ----- numbers -----

/// `number = 1*DIGIT`
///
/// Values that do not fit into 32 bits are a parser error, not a wrap.
pub(crate) fn number(input: &[u8]) -> ImapResult<'_, u32> {
    map_res(
        // `digit1` guarantees ASCII, so the unwrap can't fire.
        map(digit1, |bytes| std::str::from_utf8(bytes).unwrap()),
        str::parse::<u32>,
    )(input)
}

/// `number64 = 1*DIGIT` (RFC 9051 width)
pub(crate) fn number64(input: &[u8]) -> ImapResult<'_, u64> {
    map_res(
        map(digit1, |bytes| std::str::from_utf8(bytes).unwrap()),
        str::parse::<u64>,
    )(input)
}

/// `nz-number = digit-nz *DIGIT`
///
/// Rejects both the value zero and a leading zero.
pub(crate) fn nz_number(input: &[u8]) -> ImapResult<'_, NonZeroU32> {
    let (_, first) = peek(take(1usize))(input)?;

    if first == b"0" {
        return Err(nom::Err::Error(GrammarError::new(
            input,
            GrammarErrorKind::BadNumber,
        )));
    }

    map_res(number, NonZeroU32::try_from)(input)
}

// ----- strings -----

/// `string = quoted / literal`
pub(crate) fn string(input: &[u8]) -> ImapResult<'_, IString> {
    alt((map(quoted, IString::Quoted), map(literal, IString::Literal)))(input)
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
///
/// Allocates only when escaped characters need replacing.
pub(crate) fn quoted(input: &[u8]) -> ImapResult<'_, Quoted> {
    let mut parser = tuple((
        dquote,
        map(
            opt(escaped(
                take_while1(is_any_text_char_except_quoted_specials),
                '\\',
                one_of("\\\""),
            )),
            // Quoted contents are 7-bit, so the unwrap can't fire.
            |val| std::str::from_utf8(val.unwrap_or_default()).unwrap(),
        ),
        dquote,
    ));

    let (remaining, (_, quoted, _)) = parser(input)?;

    Ok((
        remaining,
        Quoted::unvalidated(unescape_quoted(quoted).into_owned()),
    ))
}

/// `QUOTED-CHAR = <any TEXT-CHAR except quoted-specials> / "\" quoted-specials`
pub(crate) fn quoted_char(input: &[u8]) -> ImapResult<'_, QuotedChar> {
    map(
        alt((
            map(
                take_while_m_n(1, 1, is_any_text_char_except_quoted_specials),
                |bytes: &[u8]| bytes[0] as char,
            ),
            map(
                tuple((tag("\\"), take_while_m_n(1, 1, is_quoted_specials))),
                |(_, bytes): (_, &[u8])| bytes[0] as char,
            ),
        )),
        QuotedChar::unvalidated,
    )(input)
}

/// `literal = "{" number ["+"] "}" CRLF *CHAR8`
///
/// This rule materialises the payload in memory and is therefore only
/// used for *structured* literals (mailbox names, header blobs, …); the
/// state machines intercept streaming positions before this rule runs
/// and also enforce the buffered-literal size limit at the marker.
pub(crate) fn literal(input: &[u8]) -> ImapResult<'_, Literal> {
    let (remaining, (length, mode)) = terminated(literal_marker, crlf)(input)?;

    let (remaining, data) = take(length)(remaining)?;

    match Literal::try_from(data) {
        Ok(mut literal) => {
            literal.mode = mode;

            Ok((remaining, literal))
        }
        Err(_) => Err(GrammarError::failure(
            input,
            GrammarErrorKind::LiteralContainsNull,
        )),
    }
}

/// `literal8 = "~" literal` (RFC 3516)
///
/// NUL bytes are allowed in the payload.
pub(crate) fn literal8(input: &[u8]) -> ImapResult<'_, Literal> {
    let (remaining, (length, mode)) =
        terminated(tuple((tag(b"~"), literal_marker)), crlf)(input)
            .map(|(rem, (_, marker))| (rem, marker))?;

    let (remaining, data) = take(length)(remaining)?;

    Ok((remaining, Literal::unvalidated_binary(data.to_vec(), mode)))
}

/// `"{" number ["+"] "}"`: the marker alone, no payload.
pub(crate) fn literal_marker(input: &[u8]) -> ImapResult<'_, (u32, LiteralMode)> {
    delimited(
        tag(b"{"),
        tuple((
            number,
            map(opt(char('+')), |plus| match plus {
                Some(_) => LiteralMode::NonSync,
                None => LiteralMode::Sync,
            }),
        )),
        tag(b"}"),
    )(input)
}

// ----- astring / atom / nstring / text -----

/// `astring = 1*ASTRING-CHAR / string`
pub(crate) fn astring(input: &[u8]) -> ImapResult<'_, AString> {
    alt((
        map(take_while1(is_astring_char), |bytes: &[u8]| {
            // ASTRING-CHAR is an ASCII subset, so the unwrap can't fire.
            AString::Atom(AtomExt::unvalidated(
                std::str::from_utf8(bytes).unwrap().to_owned(),
            ))
        }),
        map(string, AString::String),
    ))(input)
}

/// `atom = 1*ATOM-CHAR`
pub(crate) fn atom(input: &[u8]) -> ImapResult<'_, Atom> {
    let (remaining, parsed) = take_while1(is_atom_char)(input)?;

    Ok((
        remaining,
        Atom::unvalidated(std::str::from_utf8(parsed).unwrap().to_owned()),
    ))
}

/// `nil = "NIL"`
#[inline]
pub(crate) fn nil(input: &[u8]) -> ImapResult<'_, &[u8]> {
    tag_no_case(b"NIL")(input)
}

/// `nstring = string / nil`
pub(crate) fn nstring(input: &[u8]) -> ImapResult<'_, NString> {
    alt((
        map(string, |item| NString(Some(item))),
        map(nil, |_| NString(None)),
    ))(input)
}

/// `text = 1*TEXT-CHAR`
pub(crate) fn text(input: &[u8]) -> ImapResult<'_, Text> {
    map(take_while1(is_text_char), |bytes| {
        Text::unvalidated(std::str::from_utf8(bytes).unwrap().to_owned())
    })(input)
}

/// `tag = 1*<any ASTRING-CHAR except "+">`
pub(crate) fn tag_imap(input: &[u8]) -> ImapResult<'_, Tag> {
    map(
        take_while1(|b| is_astring_char(b) && b != b'+'),
        |bytes: &[u8]| Tag::unvalidated(std::str::from_utf8(bytes).unwrap().to_owned()),
    )(input)
}

/// `charset = atom / quoted`
pub(crate) fn charset(input: &[u8]) -> ImapResult<'_, Charset> {
    alt((map(atom, Charset::Atom), map(quoted, Charset::Quoted)))(input)
}

// ----- base64 -----

fn is_base64_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

/// `base64 = *(4base64-char) [base64-terminal]`
pub(crate) fn base64(input: &[u8]) -> ImapResult<'_, Vec<u8>> {
    map_res(
        recognize(tuple((
            take_while(is_base64_char),
            opt(alt((tag("=="), tag("=")))),
        ))),
        |bytes| BASE64.decode(bytes),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rejects_overflow() {
        let (rem, got) = number(b"4294967295 ").unwrap();
        assert_eq!(u32::MAX, got);
        assert_eq!(b" ", rem);

        assert!(matches!(
            number(b"4294967296 "),
            Err(nom::Err::Error(GrammarError {
                kind: GrammarErrorKind::BadNumber,
                ..
            }))
        ));
    }

    #[test]
    fn test_nz_number_rejects_zero_and_leading_zero() {
        assert!(nz_number(b"0 ").is_err());
        assert!(nz_number(b"07 ").is_err());
        assert_eq!(7, nz_number(b"7 ").unwrap().1.get());
    }

    #[test]
    fn test_number_incomplete() {
        // All digits so far: more digits may follow.
        assert!(matches!(number(b"123"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_quoted() {
        let tests: &[(&[u8], &str, &[u8])] = &[
            (b"\"\" ", "", b" "),
            (b"\"a\" ", "a", b" "),
            (b"\"a\\\"b\" ", "a\"b", b" "),
            (b"\"\\\\\" ", "\\", b" "),
        ];

        for (test, expected, expected_rem) in tests {
            let (rem, got) = quoted(test).unwrap();
            assert_eq!(*expected, got.inner());
            assert_eq!(*expected_rem, rem);
        }

        assert!(matches!(quoted(b"\"abc"), Err(nom::Err::Incomplete(_))));
        assert!(quoted(b"abc").is_err());
    }

    #[test]
    fn test_literal() {
        let (rem, got) = literal(b"{3}\r\nabcdef").unwrap();
        assert_eq!(b"abc", got.data());
        assert_eq!(LiteralMode::Sync, got.mode());
        assert_eq!(b"def", rem);

        let (_, got) = literal(b"{3+}\r\nabc").unwrap();
        assert_eq!(LiteralMode::NonSync, got.mode());

        let (rem, got) = literal(b"{0}\r\nrest").unwrap();
        assert_eq!(b"", got.data());
        assert_eq!(b"rest", rem);

        // Bare LF tolerated.
        assert!(literal(b"{2}\nxy").is_ok());

        // Payload not there yet.
        assert!(matches!(literal(b"{3}\r\nab"), Err(nom::Err::Incomplete(_))));

        // NUL inside a plain literal.
        assert!(matches!(
            literal(b"{1}\r\n\x00"),
            Err(nom::Err::Failure(GrammarError {
                kind: GrammarErrorKind::LiteralContainsNull,
                ..
            }))
        ));

        // NUL inside a binary literal is fine.
        assert!(literal8(b"~{1}\r\n\x00").is_ok());
    }

    #[test]
    fn test_astring_and_atom() {
        let (_, got) = astring(b"atom ").unwrap();
        assert!(matches!(got, AString::Atom(_)));

        let (_, got) = astring(b"\"quoted\" ").unwrap();
        assert!(matches!(got, AString::String(IString::Quoted(_))));

        assert!(atom(b"(x").is_err());
        assert!(matches!(atom(b"atom"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_base64() {
        let (rem, got) = base64(b"VGVzdA==\r\n").unwrap();
        assert_eq!(b"Test", got.as_slice());
        assert_eq!(b"\r\n", rem);

        assert!(base64(b"VGVzdA=\r\n").is_err());
    }
}
