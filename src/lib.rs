//! # imap-stream
//!
//! An incremental, event-based streaming parser for the IMAP4rev1 wire
//! protocol (RFC 3501) and common extensions (CONDSTORE, QRESYNC,
//! QUOTA, ESEARCH, ID, NAMESPACE, LIST-EXTENDED, ENABLE, METADATA,
//! CATENATE, URLAUTH, MOVE, UIDPLUS, BINARY, LITERAL+/LITERAL-,
//! SEARCHRES, IDLE, SPECIAL-USE).
//!
//! Two parsers exist: [`CommandParser`] reads what a client sent,
//! [`ResponseParser`] reads what a server sent. Both turn an
//! append-only byte stream into a sequence of typed events, emitting
//! each event as soon as enough bytes are available and suspending
//! (`Ok(None)`) without data loss when they are not. Large payloads
//! (APPEND messages, CATENATE segments, FETCH bodies) are surfaced as
//! byte-chunk events instead of being buffered.
//!
//! ```
//! use imap_stream::{CommandParser, ParserConfig, CommandEvent};
//!
//! let mut parser = CommandParser::new(ParserConfig::default());
//!
//! parser.enqueue_bytes(b"1 NOO");
//! assert!(matches!(parser.next_event(), Ok(None)));
//!
//! parser.enqueue_bytes(b"P\r\n");
//! match parser.next_event() {
//!     Ok(Some(CommandEvent::Command { command, .. })) => {
//!         assert_eq!("1", command.tag.inner());
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! The parsers are single-threaded and single-use: one connection owns
//! one parser, and an error leaves it poisoned (see
//! [`StreamError`](error::StreamError)).

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod config;
mod decode;
pub mod error;
mod grammar;
mod scanner;
pub mod stream;
pub mod types;
pub mod utils;

pub use config::{ParserConfig, StringCache};
pub use error::{LimitError, StreamError};
pub use stream::{CommandParser, ResponseParser};
pub use types::event::{CommandEvent, LiteralAnnouncement, ResponseEvent, StreamingKind};
