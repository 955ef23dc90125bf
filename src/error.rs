//! Errors surfaced by the streaming parsers.

use thiserror::Error;

/// Terminal outcome of [`next_event`](crate::stream::CommandParser::next_event).
///
/// "Need more bytes" is not an error: it is the `Ok(None)` return. The
/// two variants here differ in severity:
///
/// * [`StreamError::Parser`] poisons the current line. A caller that
///   wants to limp along can call the parser's `recover_to_next_line`
///   and reject the offending command/response.
/// * [`StreamError::Limit`] marks adversarial or misconfigured input and
///   poisons the parser permanently. Close the connection.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StreamError {
    #[error("Syntax error while parsing {context}")]
    Parser {
        /// Which construct failed, for diagnostics only.
        context: &'static str,
    },
    #[error(transparent)]
    Limit(#[from] LimitError),
}

/// A configured policy limit was exceeded.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LimitError {
    #[error("Line exceeds the configured maximum of {limit} bytes")]
    LineTooLong { limit: u32 },
    #[error("Message carries more than {limit} FETCH attributes")]
    TooManyAttributes { limit: u32 },
    #[error("Streamed body of {length} bytes exceeds the configured maximum of {limit} bytes")]
    BodyTooLarge { limit: u32, length: u32 },
    #[error("Buffered literal of {length} bytes exceeds the configured maximum of {limit} bytes")]
    LiteralTooLarge { limit: u32, length: u32 },
    #[error("Nesting exceeds the configured maximum depth of {limit}")]
    TooDeep { limit: usize },
}
