//! Helpers shared across the grammar and the state machines.

use std::borrow::Cow;

/// Character-class predicates for the IMAP formal syntax.
pub mod indicators {
    /// `CHAR = %x01-7F`
    pub fn is_char(byte: u8) -> bool {
        matches!(byte, 0x01..=0x7f)
    }

    /// `CTL = %x00-1F / %x7F`
    pub fn is_ctl(byte: u8) -> bool {
        matches!(byte, 0x00..=0x1f | 0x7f)
    }

    /// `quoted-specials = DQUOTE / "\"`
    pub fn is_quoted_specials(byte: u8) -> bool {
        byte == b'"' || byte == b'\\'
    }

    /// `list-wildcards = "%" / "*"`
    pub fn is_list_wildcards(byte: u8) -> bool {
        byte == b'%' || byte == b'*'
    }

    /// `resp-specials = "]"`
    #[inline]
    pub fn is_resp_specials(byte: u8) -> bool {
        byte == b']'
    }

    /// `atom-specials = "(" / ")" / "{" / SP / CTL / list-wildcards / quoted-specials / resp-specials`
    pub fn is_atom_specials(byte: u8) -> bool {
        match byte {
            b'(' | b')' | b'{' | b' ' => true,
            c if is_ctl(c) => true,
            c if is_list_wildcards(c) => true,
            c if is_quoted_specials(c) => true,
            c if is_resp_specials(c) => true,
            _ => false,
        }
    }

    /// `ATOM-CHAR = <any CHAR except atom-specials>`
    pub fn is_atom_char(byte: u8) -> bool {
        is_char(byte) && !is_atom_specials(byte)
    }

    /// `ASTRING-CHAR = ATOM-CHAR / resp-specials`
    pub fn is_astring_char(byte: u8) -> bool {
        is_atom_char(byte) || is_resp_specials(byte)
    }

    /// `TEXT-CHAR = <any CHAR except CR and LF>`
    pub fn is_text_char(byte: u8) -> bool {
        matches!(byte, 0x01..=0x09 | 0x0b..=0x0c | 0x0e..=0x7f)
    }

    pub(crate) fn is_any_text_char_except_quoted_specials(byte: u8) -> bool {
        is_text_char(byte) && !is_quoted_specials(byte)
    }

    /// `CHAR8 = %x01-ff`
    #[inline]
    pub fn is_char8(byte: u8) -> bool {
        byte != 0
    }

    /// `list-char = ATOM-CHAR / list-wildcards / resp-specials`
    pub fn is_list_char(byte: u8) -> bool {
        is_atom_char(byte) || is_list_wildcards(byte) || is_resp_specials(byte)
    }
}

/// Undo the backslash escaping inside a quoted string.
pub fn unescape_quoted(escaped: &str) -> Cow<str> {
    let mut unescaped = Cow::Borrowed(escaped);

    if unescaped.contains("\\\\") {
        unescaped = Cow::Owned(unescaped.replace("\\\\", "\\"));
    }

    if unescaped.contains("\\\"") {
        unescaped = Cow::Owned(unescaped.replace("\\\"", "\""));
    }

    unescaped
}

/// Converts bytes into a ready-to-be-printed form.
pub fn escape_byte_string<B>(bytes: B) -> String
where
    B: AsRef<[u8]>,
{
    bytes
        .as_ref()
        .iter()
        .map(|byte| match byte {
            0x09 => String::from("\\t"),
            0x0a => String::from("\\n"),
            0x0d => String::from("\\r"),
            0x22 => String::from("\\\""),
            0x5c => String::from("\\\\"),
            0x20..=0x21 | 0x23..=0x5b | 0x5d..=0x7e => format!("{}", *byte as char),
            _ => format!("\\x{:02x}", byte),
        })
        .collect::<Vec<String>>()
        .join("")
}

pub mod mutf7 {
    //! Modified UTF-7 (RFC 3501, section 5.1.3).
    //!
    //! Only decoding is needed here: ID parameter values and mailbox names
    //! seen on the wire may contain `&...-` runs. A malformed run is kept
    //! verbatim instead of failing the surrounding parse.

    use base64::{
        alphabet,
        engine::{general_purpose, GeneralPurpose},
        Engine,
    };

    // Modified base64: "," instead of "/", no padding.
    const MUTF7: GeneralPurpose = GeneralPurpose::new(
        &alphabet::IMAP_MUTF7,
        general_purpose::NO_PAD.with_decode_allow_trailing_bits(true),
    );

    /// Decodes all `&...-` runs in `input`; `&-` stands for a literal `&`.
    pub fn decode(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find('&') {
            out.push_str(&rest[..start]);
            rest = &rest[start + 1..];

            match rest.find('-') {
                Some(0) => {
                    out.push('&');
                    rest = &rest[1..];
                }
                Some(end) => {
                    match decode_run(&rest[..end]) {
                        Some(decoded) => out.push_str(&decoded),
                        None => {
                            // Malformed: keep the run as it appeared.
                            out.push('&');
                            out.push_str(&rest[..=end]);
                        }
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    // Unterminated run.
                    out.push('&');
                    out.push_str(rest);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }

    fn decode_run(run: &str) -> Option<String> {
        let bytes = MUTF7.decode(run).ok()?;

        if bytes.len() % 2 != 0 {
            return None;
        }

        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        String::from_utf16(&units).ok()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_decode() {
            let tests = [
                ("", ""),
                ("INBOX", "INBOX"),
                ("&-", "&"),
                ("a&-b", "a&b"),
                ("~peter/mail/&U,BTFw-/&ZeVnLIqe-", "~peter/mail/台北/日本語"),
                ("&Jjo-!", "☺!"),
                // Malformed runs pass through verbatim.
                ("&abc", "&abc"),
                ("&§§-x", "&§§-x"),
            ];

            for (test, expected) in tests {
                assert_eq!(expected, decode(test));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_quoted() {
        let tests = [
            ("", ""),
            ("\\\\", "\\"),
            ("\\\"", "\""),
            ("alice", "alice"),
            ("alice\\\"", "alice\""),
        ];

        for (test, expected) in tests {
            assert_eq!(expected, unescape_quoted(test));
        }
    }

    #[test]
    fn test_escape_byte_string() {
        let tests = [(b"Hallo \"\\\x00".as_ref(), String::from(r#"Hallo \"\\\x00"#))];

        for (test, expected) in tests {
            assert_eq!(expected, escape_byte_string(test));
        }
    }
}
