//! The command (client-side input) state machine.

use std::collections::VecDeque;

use crate::{
    config::ParserConfig,
    decode::GrammarErrorKind,
    error::{LimitError, StreamError},
    grammar::{
        command::{
            append_data_start, append_header, append_options, append_prefix, command,
            AppendDataStart,
        },
        extensions::{
            catenate::{cat_text_marker, cat_url},
            idle::idle_done,
            url::parse_imap_url,
        },
    },
    stream::{check_buffered_literal, Accumulator},
    types::{
        command::CommandBody,
        core::LiteralMode,
        event::{CommandEvent, LiteralAnnouncement},
    },
};

/// Where the parser currently is in the client's byte stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Assembling a complete command (lines plus buffered literals).
    Lines,
    /// `IDLE` was seen; only `DONE` may follow.
    IdleAwaitingDone,
    /// `tag APPEND` was seen; assembling up to the mailbox name.
    AppendHeader,
    /// Between APPEND parts: expecting message options and a data item,
    /// a further MULTIAPPEND message, or the final CRLF.
    AppendBoundary,
    /// Streaming one APPEND message payload.
    AppendMessage { remaining: u32 },
    /// Inside `CATENATE (`, expecting parts or the closing parenthesis.
    CatenateList,
    /// Streaming one CATENATE TEXT payload.
    CatenateData { remaining: u32 },
    /// Error recovery: dropping bytes until the next LF.
    Discarding,
}

/// Whether a mode handler moved the machine forward.
enum Step {
    Progressed,
    NeedBytes,
}

/// Streaming parser for the client side of a connection.
///
/// Feed bytes with [`enqueue_bytes`](Self::enqueue_bytes), then call
/// [`next_event`](Self::next_event) until it returns `Ok(None)`.
#[derive(Debug)]
pub struct CommandParser {
    config: ParserConfig,
    buf: Accumulator,
    mode: Mode,
    queue: VecDeque<CommandEvent>,
    /// Synchronising literals seen in the command being assembled.
    sync_literals: u32,
    /// Bytes of a buffered literal still owed to the accumulator.
    absorbing: Option<u32>,
    /// Announcement of the last framed line, not yet routed.
    announcement: Option<LiteralAnnouncement>,
    /// The command line ended (a line without a trailing literal
    /// marker was framed); no further bytes belong to this command.
    line_complete: bool,
    continuation: Option<LiteralAnnouncement>,
    poisoned: Option<StreamError>,
}

impl CommandParser {
    pub fn new(config: ParserConfig) -> Self {
        let buf = Accumulator::new(config.buffer_limit);

        Self {
            config,
            buf,
            mode: Mode::Lines,
            queue: VecDeque::new(),
            sync_literals: 0,
            absorbing: None,
            announcement: None,
            line_complete: false,
            continuation: None,
            poisoned: None,
        }
    }

    /// Appends freshly received bytes. Append-only: nothing already
    /// enqueued is ever mutated.
    pub fn enqueue_bytes(&mut self, bytes: &[u8]) {
        self.buf.enqueue(bytes);
    }

    /// The synchronising literal the parser is currently stopped at, if
    /// any. A server must answer it with a continuation request before
    /// the client will send the payload.
    pub fn continuation_needed(&self) -> Option<LiteralAnnouncement> {
        self.continuation
    }

    /// Parses the next event out of the enqueued bytes.
    ///
    /// `Ok(None)` means "feed more bytes". Errors poison the parser; a
    /// [`StreamError::Parser`] can be cleared with
    /// [`recover_to_next_line`](Self::recover_to_next_line), a
    /// [`StreamError::Limit`] is terminal.
    pub fn next_event(&mut self) -> Result<Option<CommandEvent>, StreamError> {
        if let Some(error) = &self.poisoned {
            return Err(error.clone());
        }

        match self.advance() {
            Ok(event) => Ok(event),
            Err(error) => {
                self.poisoned = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Drops the poisoned line and resynchronises to the next LF.
    /// Returns false when the parser is not recoverable (limit errors,
    /// or not poisoned at all).
    ///
    /// This is a best-effort utility: if the broken command announced a
    /// literal, the payload bytes can be mistaken for a line, and the
    /// only safe alternative is closing the connection.
    pub fn recover_to_next_line(&mut self) -> bool {
        match &self.poisoned {
            Some(StreamError::Parser { .. }) => {}
            _ => return false,
        }

        self.poisoned = None;
        self.queue.clear();
        self.sync_literals = 0;
        self.absorbing = None;
        self.announcement = None;
        self.line_complete = false;
        self.continuation = None;

        let aligned = self.buf.acc().is_empty();
        self.buf.clear_acc();

        self.mode = if aligned || self.buf.discard_line() {
            Mode::Lines
        } else {
            Mode::Discarding
        };

        true
    }

    fn advance(&mut self) -> Result<Option<CommandEvent>, StreamError> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }

            let step = match self.mode {
                Mode::Lines => self.on_lines()?,
                Mode::IdleAwaitingDone => self.on_idle()?,
                Mode::AppendHeader => self.on_append_header()?,
                Mode::AppendBoundary => self.on_append_boundary()?,
                Mode::AppendMessage { remaining } => self.on_stream(remaining, false),
                Mode::CatenateData { remaining } => self.on_stream(remaining, true),
                Mode::CatenateList => self.on_catenate_list()?,
                Mode::Discarding => {
                    if self.buf.discard_line() {
                        self.mode = Mode::Lines;
                        Step::Progressed
                    } else {
                        Step::NeedBytes
                    }
                }
            };

            if let Step::NeedBytes = step {
                return Ok(None);
            }
        }
    }

    // ----- mode handlers -----

    fn on_lines(&mut self) -> Result<Step, StreamError> {
        if self.absorbing.is_some() {
            return Ok(self.absorb_step());
        }

        if let Some(announcement) = self.announcement.take() {
            self.begin_buffered_literal(announcement)?;
            return Ok(Step::Progressed);
        }

        let line = match self.buf.scan_line()? {
            Some(line) => line,
            None => return Ok(Step::NeedBytes),
        };

        if append_prefix(self.buf.acc()).is_ok() {
            self.announcement = line.announcement;
            self.line_complete = line.announcement.is_none();
            self.mode = Mode::AppendHeader;
            return Ok(Step::Progressed);
        }

        if let Some(announcement) = line.announcement {
            self.announcement = Some(announcement);
            return Ok(Step::Progressed);
        }

        let message = self.buf.take_acc();
        self.parse_command_message(&message)?;

        Ok(Step::Progressed)
    }

    fn on_idle(&mut self) -> Result<Step, StreamError> {
        let line = self.buf.scan_line()?;

        if line.is_none() {
            return Ok(Step::NeedBytes);
        }

        let message = self.buf.take_acc();
        match idle_done(&message) {
            Ok((rem, ())) if rem.is_empty() => {
                self.queue.push_back(CommandEvent::IdleDone);
                self.mode = Mode::Lines;

                Ok(Step::Progressed)
            }
            _ => Err(StreamError::Parser {
                context: "idle done",
            }),
        }
    }

    fn on_append_header(&mut self) -> Result<Step, StreamError> {
        if self.absorbing.is_some() {
            return Ok(self.absorb_step());
        }

        match append_header(self.buf.acc()) {
            Ok((rem, (tag, mailbox))) => {
                let consumed = self.buf.acc().len() - rem.len();
                self.buf.consume(consumed);

                self.queue
                    .push_back(CommandEvent::AppendStart { tag, mailbox });
                self.mode = Mode::AppendBoundary;

                Ok(Step::Progressed)
            }
            Err(nom::Err::Incomplete(_)) => self.grow_segment("append"),
            Err(error) => Err(self.classify(error, "append")),
        }
    }

    fn on_append_boundary(&mut self) -> Result<Step, StreamError> {
        // Final CRLF: the APPEND command line is complete.
        match crate::grammar::core::crlf(self.buf.acc()) {
            Ok((rem, ())) if rem.is_empty() => {
                self.buf.clear_acc();
                self.queue.push_back(CommandEvent::AppendFinish);
                self.sync_literals = 0;
                self.line_complete = false;
                self.continuation = None;
                self.mode = Mode::Lines;

                return Ok(Step::Progressed);
            }
            Ok(_) => return Err(StreamError::Parser { context: "append" }),
            Err(nom::Err::Incomplete(_)) => return self.grow_segment("append"),
            Err(_) => {}
        }

        let parsed = append_options(self.buf.acc())
            .and_then(|(rem, options)| append_data_start(rem).map(|r| (options, r)));

        match parsed {
            Ok((options, (rem, AppendDataStart::Literal { length, mode }))) => {
                if !rem.is_empty() {
                    return Err(StreamError::Parser { context: "append" });
                }

                self.note_sync(mode, length);
                self.announcement = None;
                self.buf.clear_acc();

                self.queue.push_back(CommandEvent::AppendBeginMessage {
                    options,
                    length,
                    mode,
                });

                if length == 0 {
                    self.end_message_stream(false);
                } else {
                    self.mode = Mode::AppendMessage { remaining: length };
                }

                Ok(Step::Progressed)
            }
            Ok((options, (rem, AppendDataStart::Catenate))) => {
                let consumed = self.buf.acc().len() - rem.len();
                self.buf.consume(consumed);

                self.queue
                    .push_back(CommandEvent::AppendBeginCatenate { options });
                self.mode = Mode::CatenateList;

                Ok(Step::Progressed)
            }
            Err(nom::Err::Incomplete(_)) => self.grow_segment("append"),
            Err(error) => Err(self.classify(error, "append")),
        }
    }

    fn on_catenate_list(&mut self) -> Result<Step, StreamError> {
        if self.absorbing.is_some() {
            return Ok(self.absorb_step());
        }

        let acc = self.buf.acc();
        let (input, skipped) = match acc.first() {
            Some(b' ') => (&acc[1..], 1),
            Some(_) => (acc, 0),
            None => return self.grow_segment("catenate"),
        };

        // Closing parenthesis ends the part list.
        if input.first() == Some(&b')') {
            self.buf.consume(skipped + 1);
            self.queue.push_back(CommandEvent::AppendEndCatenate);
            self.mode = Mode::AppendBoundary;

            return Ok(Step::Progressed);
        }

        match cat_text_marker(input) {
            Ok((rem, (length, mode))) => {
                if !rem.is_empty() {
                    return Err(StreamError::Parser {
                        context: "catenate",
                    });
                }

                self.note_sync(mode, length);
                self.announcement = None;
                self.buf.clear_acc();

                self.queue
                    .push_back(CommandEvent::AppendCatenateDataBegin { length, mode });

                if length == 0 {
                    self.end_message_stream(true);
                } else {
                    self.mode = Mode::CatenateData { remaining: length };
                }

                return Ok(Step::Progressed);
            }
            Err(nom::Err::Incomplete(_)) => return self.grow_segment("catenate"),
            Err(_) => {}
        }

        match cat_url(input) {
            Ok((rem, url)) => {
                let url = match parse_imap_url(url.as_bytes()) {
                    Some(url) => url,
                    None => {
                        return Err(StreamError::Parser {
                            context: "catenate url",
                        })
                    }
                };

                let consumed = self.buf.acc().len() - rem.len();
                self.buf.consume(consumed);
                self.queue.push_back(CommandEvent::AppendCatenateUrl { url });

                Ok(Step::Progressed)
            }
            Err(nom::Err::Incomplete(_)) => self.grow_segment("catenate"),
            Err(error) => Err(self.classify(error, "catenate")),
        }
    }

    /// Streams payload bytes of the current APPEND message or CATENATE
    /// TEXT part.
    fn on_stream(&mut self, remaining: u32, catenate: bool) -> Step {
        let chunk = self.buf.drain_stream(remaining);

        if chunk.is_empty() {
            return Step::NeedBytes;
        }

        let remaining = remaining - chunk.len() as u32;
        let is_last = remaining == 0;

        self.queue.push_back(if catenate {
            CommandEvent::AppendCatenateDataBytes { chunk, is_last }
        } else {
            CommandEvent::AppendMessageBytes { chunk, is_last }
        });

        if is_last {
            self.end_message_stream(catenate);
        } else {
            self.mode = if catenate {
                Mode::CatenateData { remaining }
            } else {
                Mode::AppendMessage { remaining }
            };
        }

        Step::Progressed
    }

    // ----- shared plumbing -----

    /// Routes the pending announcement into a buffered literal, or
    /// frames the next line. Used wherever the grammar reported
    /// "incomplete" and more material is needed.
    fn grow_segment(&mut self, context: &'static str) -> Result<Step, StreamError> {
        if let Some(announcement) = self.announcement.take() {
            self.begin_buffered_literal(announcement)?;
            return Ok(Step::Progressed);
        }

        // The command line already ended, yet the grammar wants more:
        // malformed.
        if self.line_complete {
            return Err(StreamError::Parser { context });
        }

        match self.buf.scan_line()? {
            Some(line) => {
                match line.announcement {
                    Some(announcement) => self.announcement = Some(announcement),
                    None => self.line_complete = true,
                }

                Ok(Step::Progressed)
            }
            None => Ok(Step::NeedBytes),
        }
    }

    fn begin_buffered_literal(
        &mut self,
        announcement: LiteralAnnouncement,
    ) -> Result<(), LimitError> {
        check_buffered_literal(&self.config, announcement)?;
        self.note_sync(announcement.mode, announcement.length);
        self.absorbing = Some(announcement.length);

        Ok(())
    }

    fn absorb_step(&mut self) -> Step {
        let remaining = match self.absorbing {
            Some(remaining) => remaining,
            None => return Step::Progressed,
        };

        let moved = self.buf.absorb_literal(remaining);
        let left = remaining - moved;

        if left == 0 {
            self.absorbing = None;
            self.continuation = None;
            Step::Progressed
        } else {
            self.absorbing = Some(left);
            if moved == 0 {
                Step::NeedBytes
            } else {
                Step::Progressed
            }
        }
    }

    fn note_sync(&mut self, mode: LiteralMode, length: u32) {
        match mode {
            LiteralMode::Sync => {
                self.sync_literals += 1;
                self.continuation = Some(LiteralAnnouncement {
                    length,
                    mode,
                    binary: false,
                });
            }
            LiteralMode::NonSync => {}
        }
    }

    fn end_message_stream(&mut self, catenate: bool) {
        self.continuation = None;

        self.queue.push_back(if catenate {
            CommandEvent::AppendCatenateDataEnd
        } else {
            CommandEvent::AppendEndMessage
        });

        self.mode = if catenate {
            Mode::CatenateList
        } else {
            Mode::AppendBoundary
        };
    }

    fn parse_command_message(&mut self, message: &[u8]) -> Result<(), StreamError> {
        match command(self.config.max_parser_depth)(message) {
            Ok((rem, command)) if rem.is_empty() => {
                if command.body == CommandBody::Idle {
                    self.queue
                        .push_back(CommandEvent::IdleStart { tag: command.tag });
                    self.mode = Mode::IdleAwaitingDone;
                } else {
                    self.queue.push_back(CommandEvent::Command {
                        command,
                        sync_literals: self.sync_literals,
                    });
                }

                self.sync_literals = 0;
                self.continuation = None;

                Ok(())
            }
            Ok(_) => Err(StreamError::Parser { context: "command" }),
            Err(error) => Err(self.classify(error, "command")),
        }
    }

    fn classify(
        &self,
        error: nom::Err<crate::decode::GrammarError<'_>>,
        context: &'static str,
    ) -> StreamError {
        match error {
            nom::Err::Failure(inner)
                if inner.kind == GrammarErrorKind::RecursionLimitExceeded =>
            {
                StreamError::Limit(LimitError::TooDeep {
                    limit: self.config.max_parser_depth,
                })
            }
            _ => StreamError::Parser { context },
        }
    }
}
