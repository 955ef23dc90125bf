//! CATENATE (RFC 4469).
//!
//! `cat-part = ("URL" SP url) / ("TEXT" SP literal)`. The TEXT literal is
//! streamed by the command state machine, so its rule here stops at the
//! marker; only the URL form is parsed to completion.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    sequence::{preceded, terminated, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::core::{astring, crlf, literal_marker, sp},
    types::core::{AString, LiteralMode},
};

/// `"CATENATE" SP "("`: the switch from APPEND data to part list.
pub(crate) fn catenate_start(input: &[u8]) -> ImapResult<'_, ()> {
    map(tuple((tag_no_case(b"CATENATE"), sp, tag(b"("))), |_| ())(input)
}

/// `"URL" SP url`: the URL itself is transported as an astring.
pub(crate) fn cat_url(input: &[u8]) -> ImapResult<'_, AString> {
    preceded(tuple((tag_no_case(b"URL"), sp)), astring)(input)
}

/// `"TEXT" SP literal`, consumed up to and including the marker's CRLF.
pub(crate) fn cat_text_marker(input: &[u8]) -> ImapResult<'_, (u32, LiteralMode)> {
    preceded(
        tuple((tag_no_case(b"TEXT"), sp)),
        terminated(
            alt((literal_marker, preceded(tag(b"~"), literal_marker))),
            crlf,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::extensions::url::parse_imap_url;

    #[test]
    fn test_cat_url() {
        let (_, got) = cat_url(b"URL \"/INBOX/;UID=20\" ").unwrap();
        let url = parse_imap_url(got.as_bytes()).unwrap();
        assert_eq!(20, url.uid.unwrap().get());
    }

    #[test]
    fn test_cat_text_marker() {
        let (rem, (length, mode)) = cat_text_marker(b"TEXT {42}\r\n").unwrap();
        assert!(rem.is_empty());
        assert_eq!(42, length);
        assert_eq!(LiteralMode::Sync, mode);

        let (_, (_, mode)) = cat_text_marker(b"TEXT {42+}\r\n").unwrap();
        assert_eq!(LiteralMode::NonSync, mode);
    }
}
