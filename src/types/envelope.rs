//! ENVELOPE data.

use crate::types::core::NString;

/// `envelope = "(" env-date SP env-subject SP env-from SP
///             env-sender SP env-reply-to SP env-to SP env-cc SP
///             env-bcc SP env-in-reply-to SP env-message-id ")"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Envelope {
    pub date: NString,
    pub subject: NString,
    pub from: Vec<Address>,
    pub sender: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub in_reply_to: NString,
    pub message_id: NString,
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
///
/// A group is encoded as an address whose `host` is NIL; see RFC 3501,
/// section 7.4.2.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Address {
    /// Personal name.
    pub name: NString,
    /// At-domain-list (source route).
    pub adl: NString,
    /// Mailbox name or, if `host` is NIL, a group name.
    pub mailbox: NString,
    /// Host name.
    pub host: NString,
}
