//! IMAP URLs (RFC 5092), as referenced by CATENATE and URLAUTH.
//!
//! A URL always arrives inside an astring, i.e. as a complete byte
//! string, so this is a plain decomposition over the whole input rather
//! than a streaming rule.

use std::num::NonZeroU32;

use crate::types::url::{ImapUrl, UrlAuth};

/// Decomposes `raw` into an [`ImapUrl`]. Returns `None` when a numeric
/// component does not parse; unknown trailing parameters fail the same
/// way.
pub(crate) fn parse_imap_url(raw: &[u8]) -> Option<ImapUrl> {
    let raw = std::str::from_utf8(raw).ok()?;

    let mut url = ImapUrl {
        raw: raw.to_owned(),
        user: None,
        auth_mechanism: None,
        server: None,
        port: None,
        mailbox: None,
        uid_validity: None,
        uid: None,
        section: None,
        partial: None,
        urlauth: None,
    };

    let mut rest = raw;

    if let Some(stripped) = strip_prefix_ignore_case(rest, "imap://") {
        let (authority, tail) = match stripped.split_once('/') {
            Some((authority, tail)) => (authority, tail),
            None => (stripped, ""),
        };

        let hostport = match authority.rsplit_once('@') {
            Some((userinfo, hostport)) => {
                let (user, mechanism) = match split_once_ignore_case(userinfo, ";AUTH=") {
                    Some((user, mechanism)) => (user, Some(mechanism.to_owned())),
                    None => (userinfo, None),
                };

                if !user.is_empty() {
                    url.user = Some(percent_decode(user));
                }
                url.auth_mechanism = mechanism;

                hostport
            }
            None => authority,
        };

        match hostport.rsplit_once(':') {
            Some((host, port)) => {
                url.server = Some(host.to_owned());
                url.port = Some(port.parse().ok()?);
            }
            None => url.server = Some(hostport.to_owned()),
        }

        rest = tail;
    } else {
        // Relative form: an optional leading "/" before the mailbox.
        rest = rest.strip_prefix('/').unwrap_or(rest);
    }

    if let Some((head, urlauth)) = split_once_ignore_case(rest, ";URLAUTH=") {
        let mut pieces = urlauth.splitn(3, ':');

        let access = pieces.next()?.to_owned();
        if access.is_empty() {
            return None;
        }

        url.urlauth = Some(UrlAuth {
            access,
            mechanism: pieces.next().map(str::to_owned),
            token: pieces.next().map(str::to_owned),
        });
        rest = head;
    }

    if let Some((head, partial)) = split_once_ignore_case(rest, "/;PARTIAL=") {
        url.partial = Some(match partial.split_once('.') {
            Some((offset, length)) => (offset.parse().ok()?, Some(length.parse().ok()?)),
            None => (partial.parse().ok()?, None),
        });
        rest = head;
    }

    if let Some((head, section)) = split_once_ignore_case(rest, "/;SECTION=") {
        url.section = Some(percent_decode(section));
        rest = head;
    }

    if let Some((head, uid)) = split_once_ignore_case(rest, "/;UID=") {
        url.uid = Some(uid.parse::<NonZeroU32>().ok()?);
        rest = head;
    }

    if let Some((head, uid_validity)) = split_once_ignore_case(rest, ";UIDVALIDITY=") {
        url.uid_validity = Some(uid_validity.parse::<NonZeroU32>().ok()?);
        rest = head;
    }

    if !rest.is_empty() {
        url.mailbox = Some(percent_decode(rest));
    }

    Some(url)
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    if input.len() >= prefix.len() && input[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}

fn split_once_ignore_case<'a>(input: &'a str, needle: &str) -> Option<(&'a str, &'a str)> {
    let position = input
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))?;

    Some((&input[..position], &input[position + needle.len()..]))
}

/// `%XX` decoding; malformed escapes stay verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = |b: u8| -> Option<u8> {
                match b {
                    b'0'..=b'9' => Some(b - b'0'),
                    b'a'..=b'f' => Some(b - b'a' + 10),
                    b'A'..=b'F' => Some(b - b'A' + 10),
                    _ => None,
                }
            };

            if let (Some(high), Some(low)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }

        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let url = parse_imap_url(
            b"imap://joe@example.com/INBOX;UIDVALIDITY=785799047/;UID=113330/;SECTION=1.5.9",
        )
        .unwrap();

        assert_eq!(Some("joe".into()), url.user);
        assert_eq!(Some("example.com".into()), url.server);
        assert_eq!(Some("INBOX".into()), url.mailbox);
        assert_eq!(785799047, url.uid_validity.unwrap().get());
        assert_eq!(113330, url.uid.unwrap().get());
        assert_eq!(Some("1.5.9".into()), url.section);
        assert!(url.urlauth.is_none());
    }

    #[test]
    fn test_urlauth_suffix() {
        let url = parse_imap_url(
            b"imap://joe@example.com/INBOX/;UID=20;URLAUTH=anonymous:INTERNAL:91354a473744909de610943775f92038",
        )
        .unwrap();

        let urlauth = url.urlauth.unwrap();
        assert_eq!("anonymous", urlauth.access);
        assert_eq!(Some("INTERNAL".into()), urlauth.mechanism);
        assert!(urlauth.token.is_some());
    }

    #[test]
    fn test_relative_url() {
        let url = parse_imap_url(b"/Drafts;UIDVALIDITY=385759045/;UID=20").unwrap();
        assert!(url.server.is_none());
        assert_eq!(Some("Drafts".into()), url.mailbox);
        assert_eq!(20, url.uid.unwrap().get());
    }

    #[test]
    fn test_percent_decoding() {
        let url = parse_imap_url(b"imap://joe%40corp@example.com/funny%20folder/;UID=1").unwrap();
        assert_eq!(Some("joe@corp".into()), url.user);
        assert_eq!(Some("funny folder".into()), url.mailbox);
    }

    #[test]
    fn test_bad_numbers_fail() {
        assert!(parse_imap_url(b"/INBOX/;UID=abc").is_none());
        assert!(parse_imap_url(b"/INBOX;UIDVALIDITY=0").is_none());
    }
}
