//! Responses as seen by a client.

use std::num::NonZeroU32;

use crate::types::{
    core::{AString, Atom, Charset, IString, NString, QuotedChar, Tag, Text, Vec1},
    flag::{Flag, FlagPerm, MailboxAttribute},
    mailbox::Mailbox,
    sequence::SequenceSet,
    status::StatusDataItem,
    url::ImapUrl,
};

/// `greeting = "*" SP (resp-cond-auth / resp-cond-bye) CRLF`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Greeting {
    pub kind: GreetingKind,
    pub code: Option<Code>,
    pub text: Text,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GreetingKind {
    /// Connection is usable, authentication required.
    Ok,
    /// Connection is already authenticated.
    PreAuth,
    /// Server refuses the connection.
    Bye,
}

/// Well-known capabilities; anything unrecognised lands in `Other`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Capability {
    Imap4Rev1,
    Auth(Atom),
    Binary,
    Catenate,
    CondStore,
    Enable,
    ESearch,
    Id,
    Idle,
    ListExtended,
    ListStatus,
    LiteralMinus,
    LiteralPlus,
    Metadata,
    MetadataServer,
    Move,
    MultiAppend,
    Namespace,
    Qresync,
    Quota,
    SearchRes,
    SpecialUse,
    UidPlus,
    UrlAuth,
    Other(Atom),
}

impl From<Atom> for Capability {
    fn from(atom: Atom) -> Self {
        let upper = atom.as_ref().to_ascii_uppercase();

        if upper.starts_with("AUTH=") {
            // The mechanism keeps its original spelling.
            if let Ok(mechanism) = Atom::try_from(&atom.as_ref()[5..]) {
                return Self::Auth(mechanism);
            }
            return Self::Other(atom);
        }

        match upper.as_ref() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "BINARY" => Self::Binary,
            "CATENATE" => Self::Catenate,
            "CONDSTORE" => Self::CondStore,
            "ENABLE" => Self::Enable,
            "ESEARCH" => Self::ESearch,
            "ID" => Self::Id,
            "IDLE" => Self::Idle,
            "LIST-EXTENDED" => Self::ListExtended,
            "LIST-STATUS" => Self::ListStatus,
            "LITERAL-" => Self::LiteralMinus,
            "LITERAL+" => Self::LiteralPlus,
            "METADATA" => Self::Metadata,
            "METADATA-SERVER" => Self::MetadataServer,
            "MOVE" => Self::Move,
            "MULTIAPPEND" => Self::MultiAppend,
            "NAMESPACE" => Self::Namespace,
            "QRESYNC" => Self::Qresync,
            "QUOTA" => Self::Quota,
            "SEARCHRES" => Self::SearchRes,
            "SPECIAL-USE" => Self::SpecialUse,
            "UIDPLUS" => Self::UidPlus,
            "URLAUTH" => Self::UrlAuth,
            _ => Self::Other(atom),
        }
    }
}

/// `resp-text-code`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Code {
    Alert,
    BadCharset {
        allowed: Vec<Charset>,
    },
    Capability(Vec1<Capability>),
    Parse,
    PermanentFlags(Vec<FlagPerm>),
    ReadOnly,
    ReadWrite,
    TryCreate,
    UidNext(NonZeroU32),
    UidValidity(NonZeroU32),
    Unseen(NonZeroU32),
    // UIDPLUS (RFC 4315)
    AppendUid {
        uid_validity: NonZeroU32,
        uids: SequenceSet,
    },
    CopyUid {
        uid_validity: NonZeroU32,
        source: SequenceSet,
        destination: SequenceSet,
    },
    UidNotSticky,
    // CONDSTORE/QRESYNC (RFC 7162)
    HighestModSeq(u64),
    NoModSeq,
    Modified(SequenceSet),
    Closed,
    /// Anything else, kept verbatim up to the closing `]`.
    Other(CodeOther),
}

/// An unknown response code.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CodeOther(pub(crate) Vec<u8>);

impl CodeOther {
    pub(crate) fn unvalidated(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusKind {
    Ok,
    No,
    Bad,
}

/// `resp-cond-state = ("OK" / "NO" / "BAD") SP resp-text`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StatusBody {
    pub kind: StatusKind,
    pub code: Option<Code>,
    pub text: Text,
}

/// A tagged status response.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tagged {
    pub tag: Tag,
    pub body: StatusBody,
}

/// `resp-cond-bye = "BYE" SP resp-text`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Bye {
    pub code: Option<Code>,
    pub text: Text,
}

/// `continue-req = "+" SP (resp-text / base64) CRLF`
///
/// A bare `+` CRLF (no space, no text) is tolerated and yields an empty
/// `Basic` text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ContinuationRequest {
    Basic { code: Option<Code>, text: Text },
    Base64(Vec<u8>),
}

/// Untagged data responses, except `* N FETCH` which is delivered through
/// the fetch event stream.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Data {
    Capability(Vec1<Capability>),
    List {
        attributes: Vec<MailboxAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
        /// LIST-EXTENDED `CHILDINFO` tail.
        child_info: Vec<Atom>,
    },
    Lsub {
        attributes: Vec<MailboxAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
    },
    Status {
        mailbox: Mailbox,
        items: Vec<StatusDataItem>,
    },
    Search {
        seqs: Vec<NonZeroU32>,
        /// CONDSTORE: trailing `(MODSEQ n)`.
        mod_seq: Option<u64>,
    },
    /// RFC 4731
    ESearch {
        correlator: Option<Tag>,
        uid: bool,
        returns: Vec<ESearchReturn>,
    },
    Flags(Vec<Flag>),
    Exists(u32),
    Recent(u32),
    Expunge(NonZeroU32),
    /// QRESYNC (RFC 7162)
    Vanished {
        earlier: bool,
        uids: SequenceSet,
    },
    /// RFC 5161
    Enabled {
        capabilities: Vec<Capability>,
    },
    /// RFC 9208
    Quota {
        root: AString,
        quotas: Vec1<QuotaGet>,
    },
    QuotaRoot {
        mailbox: Mailbox,
        roots: Vec<AString>,
    },
    /// RFC 2971
    Id {
        parameters: Option<Vec<(IString, NString)>>,
    },
    /// RFC 2342
    Namespace {
        personal: Vec<NamespaceDescr>,
        other_users: Vec<NamespaceDescr>,
        shared: Vec<NamespaceDescr>,
    },
    /// RFC 5464
    Metadata {
        mailbox: Mailbox,
        items: MetadataResponse,
    },
    /// RFC 4467
    GenUrlAuth(Vec1<ImapUrl>),
    UrlFetch(Vec<(ImapUrl, NString)>),
}

/// `search-return-data` (RFC 4731)
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ESearchReturn {
    Min(NonZeroU32),
    Max(NonZeroU32),
    All(SequenceSet),
    Count(u32),
    ModSeq(u64),
}

/// `quota-resource = resource-name SP resource-usage SP resource-limit`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QuotaGet {
    pub resource: crate::types::command::Resource,
    pub usage: u64,
    pub limit: u64,
}

/// One namespace entry: `"(" string SP (DQUOTE QUOTED-CHAR DQUOTE / nil) ")"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NamespaceDescr {
    pub prefix: IString,
    pub delimiter: Option<QuotedChar>,
}

/// METADATA response payload: entries with values (untagged fetch reply)
/// or entry names only (unsolicited change notice).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MetadataResponse {
    WithValues(Vec1<(AString, NString)>),
    WithoutValues(Vec1<AString>),
}
