//! SEARCH criteria and ESEARCH return options.

use chrono::NaiveDate;

use crate::types::{
    core::{AString, Atom, Vec1},
    sequence::SequenceSet,
};

/// `search-key`
///
/// `And` models a parenthesised key list; `Or` and `Not` nest, which is
/// why parsing this type is recursion-limited.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchKey {
    All,
    Answered,
    Bcc(AString),
    Before(NaiveDate),
    Body(AString),
    Cc(AString),
    Deleted,
    Draft,
    Flagged,
    From(AString),
    Header(AString, AString),
    Keyword(Atom),
    Larger(u32),
    New,
    Old,
    On(NaiveDate),
    Recent,
    Seen,
    SentBefore(NaiveDate),
    SentOn(NaiveDate),
    SentSince(NaiveDate),
    Since(NaiveDate),
    Smaller(u32),
    Subject(AString),
    Text(AString),
    To(AString),
    Uid(SequenceSet),
    Unanswered,
    Undeleted,
    Undraft,
    Unflagged,
    Unkeyword(Atom),
    Unseen,
    /// `MODSEQ [entry-name SP entry-type-req SP] mod-sequence-valzer`
    /// (RFC 7162)
    ModSeq(u64),
    SequenceSet(SequenceSet),
    And(Vec1<SearchKey>),
    Not(Box<SearchKey>),
    Or(Box<SearchKey>, Box<SearchKey>),
}

/// `search-return-opt` (RFC 4731 / RFC 5182)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchReturnOption {
    Min,
    Max,
    All,
    Count,
    /// RFC 5182: save the result for later `$` references.
    Save,
}
