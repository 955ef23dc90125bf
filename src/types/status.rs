//! STATUS attributes.

use std::num::NonZeroU32;

/// `status-att`: attribute names in a STATUS command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusDataItemName {
    Messages,
    Recent,
    UidNext,
    UidValidity,
    Unseen,
    /// RFC 7162
    HighestModSeq,
}

/// `status-att-list` member: attribute values in a STATUS response.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusDataItem {
    Messages(u32),
    Recent(u32),
    UidNext(NonZeroU32),
    UidValidity(NonZeroU32),
    Unseen(u32),
    /// RFC 7162; 0 means the server does not report mod-sequences for
    /// the mailbox.
    HighestModSeq(u64),
}
