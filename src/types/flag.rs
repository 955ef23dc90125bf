//! Flag-related types.

use std::fmt;

use crate::types::core::Atom;

/// A message flag: a pre-defined system flag, a `\`-prefixed extension
/// flag, or a server-defined keyword.
///
/// System flag names are matched case-insensitively; anything else that
/// starts with `\` is an extension flag, bare words are keywords.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Flag {
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is "deleted" for removal by later EXPUNGE (`\Deleted`).
    Deleted,
    /// Message has not completed composition (`\Draft`).
    Draft,
    /// Message is "flagged" for urgent/special attention (`\Flagged`).
    Flagged,
    /// Message has been read (`\Seen`).
    Seen,
    /// A future expansion of a system flag.
    Extension(Atom),
    /// A server-defined keyword.
    Keyword(Atom),
}

impl Flag {
    /// Classifies a `\`-prefixed flag by its (case-insensitive) name.
    pub fn system(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "answered" => Self::Answered,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "flagged" => Self::Flagged,
            "seen" => Self::Seen,
            _ => Self::Extension(atom),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Answered => f.write_str("\\Answered"),
            Flag::Deleted => f.write_str("\\Deleted"),
            Flag::Draft => f.write_str("\\Draft"),
            Flag::Flagged => f.write_str("\\Flagged"),
            Flag::Seen => f.write_str("\\Seen"),
            Flag::Extension(atom) => write!(f, "\\{atom}"),
            Flag::Keyword(atom) => write!(f, "{atom}"),
        }
    }
}

/// `flag-fetch = flag / "\Recent"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlagFetch {
    Flag(Flag),
    /// Message "recently" arrived in this mailbox (`\Recent`).
    ///
    /// Can not be altered by the client.
    Recent,
}

/// `flag-perm = flag / "\*"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlagPerm {
    Flag(Flag),
    /// New keywords may be created (`\*`).
    Asterisk,
}

/// Name attribute in LIST/LSUB responses, including the SPECIAL-USE set
/// (RFC 6154).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MailboxAttribute {
    Noinferiors,
    Noselect,
    Marked,
    Unmarked,
    // RFC 3348
    HasChildren,
    HasNoChildren,
    // RFC 6154
    All,
    Archive,
    Drafts,
    Flagged,
    Junk,
    Sent,
    Trash,
    Extension(Atom),
}

impl From<Atom> for MailboxAttribute {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "noinferiors" => Self::Noinferiors,
            "noselect" => Self::Noselect,
            "marked" => Self::Marked,
            "unmarked" => Self::Unmarked,
            "haschildren" => Self::HasChildren,
            "hasnochildren" => Self::HasNoChildren,
            "all" => Self::All,
            "archive" => Self::Archive,
            "drafts" => Self::Drafts,
            "flagged" => Self::Flagged,
            "junk" => Self::Junk,
            "sent" => Self::Sent,
            "trash" => Self::Trash,
            _ => Self::Extension(atom),
        }
    }
}

/// How STORE changes the flag set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreType {
    /// `FLAGS`
    Replace,
    /// `+FLAGS`
    Add,
    /// `-FLAGS`
    Remove,
}

/// Whether STORE asks for an untagged FETCH echo.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreResponse {
    Answer,
    /// `.SILENT`
    Silent,
}
