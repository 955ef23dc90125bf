//! Events emitted by the streaming parsers.
//!
//! Events for one logical command share a tag and arrive in a fixed
//! order; streamed payload chunks concatenate to exactly the announced
//! byte count.

use std::num::NonZeroU32;

use crate::types::{
    command::{AppendOptions, Command},
    core::{LiteralMode, Tag},
    fetch::{MessageDataItem, Section},
    mailbox::Mailbox,
    response::{Bye, ContinuationRequest, Data, Greeting, StatusBody, Tagged},
    url::ImapUrl,
};

/// A literal marker `{N}`, `{N+}`, or `~{N}` found at the end of a line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LiteralAnnouncement {
    pub length: u32,
    pub mode: LiteralMode,
    /// `~{N}`: a binary literal (RFC 3516), no content-transfer-encoding.
    pub binary: bool,
}

/// One parsed step of the client's command stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandEvent {
    /// A complete non-APPEND, non-IDLE command.
    Command {
        command: Command,
        /// How many synchronising literals the command contained. The
        /// server must have answered each with a continuation request;
        /// the count lets it audit that bookkeeping per command.
        sync_literals: u32,
    },

    /// `tag APPEND mailbox` recognised; message payloads follow.
    AppendStart { tag: Tag, mailbox: Mailbox },
    /// One message payload of `length` bytes begins (MULTIAPPEND allows
    /// several per command).
    AppendBeginMessage {
        options: AppendOptions,
        length: u32,
        mode: LiteralMode,
    },
    /// A chunk of message payload. Chunks concatenate to exactly the
    /// announced length; `is_last` marks the final chunk.
    AppendMessageBytes { chunk: Vec<u8>, is_last: bool },
    AppendEndMessage,
    /// `CATENATE (` recognised in message position.
    AppendBeginCatenate { options: AppendOptions },
    AppendCatenateUrl { url: ImapUrl },
    AppendCatenateDataBegin { length: u32, mode: LiteralMode },
    AppendCatenateDataBytes { chunk: Vec<u8>, is_last: bool },
    AppendCatenateDataEnd,
    AppendEndCatenate,
    /// The APPEND command line is complete.
    AppendFinish,

    /// `tag IDLE` recognised; the connection is idling.
    IdleStart { tag: Tag },
    /// The client sent `DONE`.
    IdleDone,
}

/// What kind of payload a fetch streaming sequence carries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StreamingKind {
    /// `RFC822`
    Rfc822,
    /// `RFC822.TEXT`
    Rfc822Text,
    /// `BODY[section]`
    Body { section: Option<Section> },
    /// `BINARY[section-binary]`
    Binary { section: Vec<NonZeroU32> },
}

/// One parsed step of the server's response stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponseEvent {
    /// The connection greeting (always first).
    Greeting(Greeting),
    /// `+ ...`: may appear between any two complete events, never
    /// inside a streaming sequence.
    ContinuationRequest(ContinuationRequest),
    Tagged(Tagged),
    /// `* OK/NO/BAD ...`
    UntaggedStatus(StatusBody),
    /// `* BYE ...`
    Bye(Bye),
    /// Any other untagged data response.
    Untagged(Data),

    /// `* N FETCH (` seen; attribute events for message `N` follow.
    FetchStart(NonZeroU32),
    /// A fully parsed, in-memory attribute.
    FetchSimpleAttribute(MessageDataItem),
    /// A literal-valued attribute of `length` bytes begins.
    FetchStreamingBegin {
        kind: StreamingKind,
        /// `<origin>` octet offset from a partial fetch, if any.
        origin: Option<u32>,
        length: u32,
    },
    FetchStreamingBytes { chunk: Vec<u8> },
    FetchStreamingEnd,
    /// The closing `)` of the FETCH response.
    FetchFinish,
}
