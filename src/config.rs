//! Parser configuration.

use std::{fmt, rc::Rc};

/// Interning hook applied to parsed keyword flags.
///
/// Long FETCH streams repeat the same handful of keyword strings
/// thousands of times; a caller-supplied cache deduplicates them. The
/// function must be pure: same input, same output.
pub type StringCache = Rc<dyn Fn(&str) -> String>;

/// All limits and hooks of a parser, fixed at construction.
#[derive(Clone)]
pub struct ParserConfig {
    /// Maximum length of a single structured line, in bytes. Streaming
    /// literal payloads are exempt. Default: 8 KiB.
    pub buffer_limit: u32,
    /// Maximum number of FETCH attributes per message. Default:
    /// unbounded.
    pub message_attribute_limit: Option<u32>,
    /// Maximum byte count of any single streamed body payload. Default:
    /// unbounded.
    pub body_size_limit: Option<u32>,
    /// Maximum byte count of a literal that must be fully buffered
    /// (mailbox names, header blobs, ...). Default: unbounded.
    pub literal_size_limit: Option<u32>,
    /// Ceiling for recursive grammar nesting (BODYSTRUCTURE, search
    /// keys). Default: 30.
    pub max_parser_depth: usize,
    /// Optional string interning hook, see [`StringCache`].
    pub parsed_string_cache: Option<StringCache>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            buffer_limit: 8 * 1024,
            message_attribute_limit: None,
            body_size_limit: None,
            literal_size_limit: None,
            max_parser_depth: 30,
            parsed_string_cache: None,
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("buffer_limit", &self.buffer_limit)
            .field("message_attribute_limit", &self.message_attribute_limit)
            .field("body_size_limit", &self.body_size_limit)
            .field("literal_size_limit", &self.literal_size_limit)
            .field("max_parser_depth", &self.max_parser_depth)
            .field(
                "parsed_string_cache",
                &self.parsed_string_cache.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}
