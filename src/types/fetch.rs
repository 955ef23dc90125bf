//! FETCH attributes: the items a client can request and the items a
//! server returns per message.

use std::num::NonZeroU32;

use chrono::{DateTime, FixedOffset};

use crate::types::{
    body::BodyStructure,
    core::{AString, Atom, NString, Vec1},
    envelope::Envelope,
    flag::FlagFetch,
};

/// `section-part = nz-number *("." nz-number)`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Part(pub Vec1<NonZeroU32>);

/// `section = "[" [section-spec] "]"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Section {
    Part(Part),
    Header(Option<Part>),
    HeaderFields(Option<Part>, Vec1<AString>),
    HeaderFieldsNot(Option<Part>, Vec1<AString>),
    Text(Option<Part>),
    Mime(Part),
}

/// `fetch-att`: an item *name* in a FETCH command.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MessageDataItemName {
    Body,
    /// `BODY[section]<partial>` or `BODY.PEEK[section]<partial>`
    BodyExt {
        section: Option<Section>,
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },
    BodyStructure,
    /// `BINARY[section-binary]<partial>` (RFC 3516)
    Binary {
        section: Vec<NonZeroU32>,
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },
    /// `BINARY.SIZE[section-binary]` (RFC 3516)
    BinarySize { section: Vec<NonZeroU32> },
    Envelope,
    Flags,
    InternalDate,
    Rfc822,
    Rfc822Header,
    Rfc822Size,
    Rfc822Text,
    Uid,
    /// `MODSEQ` (RFC 7162)
    ModSeq,
}

/// `fetch = ... ("ALL" / "FULL" / "FAST" / fetch-att / "(" ...)`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Macro {
    All,
    Fast,
    Full,
}

impl Macro {
    pub fn expand(&self) -> Vec<MessageDataItemName> {
        use MessageDataItemName::*;

        match self {
            Self::All => vec![Flags, InternalDate, Rfc822Size, Envelope],
            Self::Fast => vec![Flags, InternalDate, Rfc822Size],
            Self::Full => vec![Flags, InternalDate, Rfc822Size, Envelope, Body],
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MacroOrMessageDataItemNames {
    Macro(Macro),
    MessageDataItemNames(Vec<MessageDataItemName>),
}

/// `msg-att-static / msg-att-dynamic`: an item *value* in a FETCH
/// response.
///
/// Large literal-valued items (`BODY[..]`, `RFC822`, `RFC822.TEXT`,
/// `BINARY[..]`) normally arrive through the streaming events instead of
/// this type; they appear here only when the server sent them as quoted
/// strings or NIL.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MessageDataItem {
    /// The non-extensible BODY form.
    Body(BodyStructure),
    BodyExt {
        section: Option<Section>,
        origin: Option<u32>,
        data: NString,
    },
    BodyStructure(BodyStructure),
    Binary {
        section: Vec<NonZeroU32>,
        value: NString,
    },
    BinarySize {
        section: Vec<NonZeroU32>,
        size: u32,
    },
    Envelope(Envelope),
    Flags(Vec<FlagFetch>),
    InternalDate(DateTime<FixedOffset>),
    Rfc822(NString),
    Rfc822Header(NString),
    Rfc822Size(u32),
    Rfc822Text(NString),
    Uid(NonZeroU32),
    /// `MODSEQ (nz-number64)` (RFC 7162)
    ModSeq(u64),
    /// `X-GM-MSGID` (Gmail)
    GmailMessageId(u64),
    /// `X-GM-THRID` (Gmail)
    GmailThreadId(u64),
    /// `X-GM-LABELS` (Gmail)
    GmailLabels(Vec<GmailLabel>),
}

/// A Gmail label: either a `\`-prefixed system label (`\Inbox`) or a
/// user label given as an astring.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GmailLabel {
    System(Atom),
    User(AString),
}
