//! IMAP URLs (RFC 5092) as used by CATENATE and URLAUTH.
//!
//! The parser keeps the raw URL verbatim next to the decomposed fields:
//! URLAUTH verification needs the exact bytes that were signed, while
//! CATENATE handling needs the parts.

use std::num::NonZeroU32;

/// `imapurl = "imap://" iserver [ "/" [ enc-mailbox [uidvalidity]
///            [iuid [isection [ipartial]]] ] ] [iurlauth]`
///
/// Relative forms (no scheme/server) are also accepted, since CATENATE
/// URLs commonly refer to the same server and mailbox.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ImapUrl {
    /// The URL exactly as transmitted.
    pub raw: String,
    /// `enc-user` (percent-decoded).
    pub user: Option<String>,
    /// `;AUTH=` mechanism, `*` meaning "any".
    pub auth_mechanism: Option<String>,
    /// Host, when the URL is absolute.
    pub server: Option<String>,
    pub port: Option<u16>,
    /// `enc-mailbox` (percent-decoded).
    pub mailbox: Option<String>,
    /// `;UIDVALIDITY=nz-number`
    pub uid_validity: Option<NonZeroU32>,
    /// `/;UID=nz-number`
    pub uid: Option<NonZeroU32>,
    /// `/;SECTION=enc-section`
    pub section: Option<String>,
    /// `/;PARTIAL=offset[.length]`
    pub partial: Option<(u32, Option<NonZeroU32>)>,
    /// `;URLAUTH=access[:mech:token]`
    pub urlauth: Option<UrlAuth>,
}

/// The `;URLAUTH=` suffix (RFC 4467).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UrlAuth {
    /// `submit+user`, `user+user`, `authuser`, or `anonymous`.
    pub access: String,
    /// Authorization mechanism, e.g. `INTERNAL`.
    pub mechanism: Option<String>,
    /// Hex-encoded token.
    pub token: Option<String>,
}
