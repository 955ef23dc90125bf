//! Commands as seen by a server.
//!
//! APPEND and IDLE never appear as a finished [`Command`]: their payloads
//! are surfaced incrementally through the command event stream. The
//! grammar still recognises their *line* forms; the state machine owns
//! the rest.

use std::num::NonZeroU32;

use chrono::{DateTime, FixedOffset};

use crate::types::{
    core::{AString, Atom, Charset, IString, NString, Tag, Vec1},
    fetch::MacroOrMessageDataItemNames,
    flag::{Flag, StoreResponse, StoreType},
    mailbox::{ListMailbox, Mailbox},
    search::{SearchKey, SearchReturnOption},
    sequence::SequenceSet,
    status::StatusDataItemName,
    url::ImapUrl,
};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Command {
    pub tag: Tag,
    pub body: CommandBody,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CommandBody {
    // -- any state --
    Capability,
    Noop,
    Logout,
    /// RFC 2971
    Id {
        parameters: Option<Vec<(IString, NString)>>,
    },

    // -- not authenticated --
    Login {
        username: AString,
        password: AString,
    },
    Authenticate {
        mechanism: Atom,
        /// SASL-IR (RFC 4959): `=` stands for an empty initial response.
        initial_response: Option<Vec<u8>>,
    },

    // -- authenticated --
    Select {
        mailbox: Mailbox,
        parameters: Vec<SelectParameter>,
    },
    Examine {
        mailbox: Mailbox,
        parameters: Vec<SelectParameter>,
    },
    Create {
        mailbox: Mailbox,
        parameters: Vec<CreateParameter>,
    },
    Delete {
        mailbox: Mailbox,
    },
    Rename {
        from: Mailbox,
        to: Mailbox,
    },
    Subscribe {
        mailbox: Mailbox,
    },
    Unsubscribe {
        mailbox: Mailbox,
    },
    List {
        /// LIST-EXTENDED (RFC 5258) selection options.
        selection_options: Vec<ListSelectionOption>,
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
        /// LIST-EXTENDED return options.
        return_options: Vec<ListReturnOption>,
    },
    Lsub {
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
    },
    Status {
        mailbox: Mailbox,
        items: Vec<StatusDataItemName>,
    },
    /// RFC 5161
    Enable {
        capabilities: Vec1<Atom>,
    },
    Idle,
    /// RFC 9208 / RFC 2087
    GetQuota {
        root: AString,
    },
    GetQuotaRoot {
        mailbox: Mailbox,
    },
    SetQuota {
        root: AString,
        quotas: Vec<QuotaSet>,
    },
    Namespace,
    /// RFC 5464
    GetMetadata {
        options: Vec<GetMetadataOption>,
        mailbox: Mailbox,
        entries: Vec1<AString>,
    },
    SetMetadata {
        mailbox: Mailbox,
        entries: Vec1<(AString, NString)>,
    },
    /// RFC 4467
    GenUrlAuth {
        rumps: Vec1<(AString, Atom)>,
    },
    UrlFetch {
        urls: Vec1<ImapUrl>,
    },
    ResetKey {
        mailbox: Option<Mailbox>,
        mechanisms: Vec<Atom>,
    },

    // -- selected --
    Check,
    Close,
    Expunge,
    /// UIDPLUS (RFC 4315)
    ExpungeUid {
        sequence_set: SequenceSet,
    },
    Search {
        charset: Option<Charset>,
        /// ESEARCH (RFC 4731) / SEARCHRES (RFC 5182)
        return_options: Vec<SearchReturnOption>,
        criteria: Vec1<SearchKey>,
        uid: bool,
    },
    Fetch {
        sequence_set: SequenceSet,
        items: MacroOrMessageDataItemNames,
        modifiers: Vec<FetchModifier>,
        uid: bool,
    },
    Store {
        sequence_set: SequenceSet,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        /// CONDSTORE (RFC 7162)
        unchanged_since: Option<u64>,
        uid: bool,
    },
    Copy {
        sequence_set: SequenceSet,
        mailbox: Mailbox,
        uid: bool,
    },
    /// RFC 6851
    Move {
        sequence_set: SequenceSet,
        mailbox: Mailbox,
        uid: bool,
    },
}

/// `select-param` (RFC 7162): CONDSTORE enabling and QRESYNC
/// resynchronisation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SelectParameter {
    CondStore,
    Qresync {
        uid_validity: NonZeroU32,
        mod_seq: u64,
        known_uids: Option<SequenceSet>,
    },
}

/// `create-param` (RFC 4466 / RFC 6154).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CreateParameter {
    /// `USE (\Drafts ...)`: SPECIAL-USE assignment.
    Use(Vec<Atom>),
    /// Any other extension parameter, kept verbatim.
    Other {
        name: Atom,
        value: Option<Vec<u8>>,
    },
}

/// LIST-EXTENDED `select-opts` member.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListSelectionOption {
    Subscribed,
    Remote,
    RecursiveMatch,
    SpecialUse,
    Other(Atom),
}

/// LIST-EXTENDED `return-opt` member.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListReturnOption {
    Subscribed,
    Children,
    SpecialUse,
    /// LIST-STATUS (RFC 5819)
    Status(Vec<StatusDataItemName>),
    Other(Atom),
}

/// `setquota-resource = atom SP resource-limit`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QuotaSet {
    pub resource: Resource,
    pub limit: u64,
}

/// Quota resource names (RFC 9208).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Resource {
    Storage,
    Message,
    Mailbox,
    AnnotationStorage,
    Other(Atom),
}

impl From<Atom> for Resource {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "STORAGE" => Self::Storage,
            "MESSAGE" => Self::Message,
            "MAILBOX" => Self::Mailbox,
            "ANNOTATION-STORAGE" => Self::AnnotationStorage,
            _ => Self::Other(atom),
        }
    }
}

/// GETMETADATA option (RFC 5464).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GetMetadataOption {
    MaxSize(u32),
    Depth(MetadataDepth),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MetadataDepth {
    Zero,
    One,
    Infinity,
}

/// FETCH modifier (RFC 7162).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FetchModifier {
    ChangedSince(u64),
    /// QRESYNC: report expunged messages via VANISHED.
    Vanished,
}

/// Flags and/or date attached to one APPEND message.
///
/// Options are consumed greedily before the data item, resolving the
/// RFC 4466 grammar ambiguity in favour of options.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct AppendOptions {
    pub flags: Vec<Flag>,
    pub date_time: Option<DateTime<FixedOffset>>,
}
