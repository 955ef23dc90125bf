//! The response (server-side input) state machine.

use std::collections::VecDeque;

use crate::{
    config::ParserConfig,
    decode::GrammarErrorKind,
    error::{LimitError, StreamError},
    grammar::{
        core::crlf,
        fetch::{msg_att_item, msg_att_streaming_start},
        response::{continue_req, fetch_start, greeting, response},
    },
    stream::{check_buffered_literal, intern_flag, Accumulator},
    types::{
        event::{LiteralAnnouncement, ResponseEvent},
        fetch::MessageDataItem,
        flag::FlagFetch,
        response::Data,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Nothing parsed yet; the greeting must come first.
    Greeting,
    /// Assembling a complete response line (plus buffered literals).
    Lines,
    /// Inside `* N FETCH (`, parsing attributes one at a time.
    Fetch,
    /// Streaming a literal-valued FETCH attribute.
    FetchStreaming { remaining: u32 },
    /// Error recovery: dropping bytes until the next LF.
    Discarding,
}

enum Step {
    Progressed,
    NeedBytes,
}

/// Streaming parser for the server side of a connection.
///
/// Feed bytes with [`enqueue_bytes`](Self::enqueue_bytes), then call
/// [`next_event`](Self::next_event) until it returns `Ok(None)`.
#[derive(Debug)]
pub struct ResponseParser {
    config: ParserConfig,
    buf: Accumulator,
    mode: Mode,
    queue: VecDeque<ResponseEvent>,
    /// FETCH attributes seen for the current message.
    attr_count: u32,
    /// Bytes of a buffered literal still owed to the accumulator.
    absorbing: Option<u32>,
    /// Announcement of the last framed line, not yet routed.
    announcement: Option<LiteralAnnouncement>,
    /// The response line ended without announcing a literal.
    line_complete: bool,
    poisoned: Option<StreamError>,
}

impl ResponseParser {
    pub fn new(config: ParserConfig) -> Self {
        let buf = Accumulator::new(config.buffer_limit);

        Self {
            config,
            buf,
            mode: Mode::Greeting,
            queue: VecDeque::new(),
            attr_count: 0,
            absorbing: None,
            announcement: None,
            line_complete: false,
            poisoned: None,
        }
    }

    /// Appends freshly received bytes. Append-only: nothing already
    /// enqueued is ever mutated.
    pub fn enqueue_bytes(&mut self, bytes: &[u8]) {
        self.buf.enqueue(bytes);
    }

    /// Parses the next event out of the enqueued bytes.
    ///
    /// `Ok(None)` means "feed more bytes". Errors poison the parser; a
    /// [`StreamError::Parser`] can be cleared with
    /// [`recover_to_next_line`](Self::recover_to_next_line), a
    /// [`StreamError::Limit`] is terminal.
    pub fn next_event(&mut self) -> Result<Option<ResponseEvent>, StreamError> {
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

    /// Drops the poisoned line and resynchronises to the next LF. See
    /// the caveat on
    /// [`CommandParser::recover_to_next_line`](crate::stream::CommandParser::recover_to_next_line).
    pub fn recover_to_next_line(&mut self) -> bool {
        match &self.poisoned {
            Some(StreamError::Parser { .. }) => {}
            _ => return false,
        }

        self.poisoned = None;
        self.queue.clear();
        self.attr_count = 0;
        self.absorbing = None;
        self.announcement = None;
        self.line_complete = false;

        let aligned = self.buf.acc().is_empty();
        self.buf.clear_acc();

        self.mode = if aligned || self.buf.discard_line() {
            Mode::Lines
        } else {
            Mode::Discarding
        };

        true
    }

    fn advance(&mut self) -> Result<Option<ResponseEvent>, StreamError> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }

            let step = match self.mode {
                Mode::Greeting | Mode::Lines => self.on_lines()?,
                Mode::Fetch => self.on_fetch()?,
                Mode::FetchStreaming { remaining } => self.on_streaming(remaining),
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
            check_buffered_literal(&self.config, announcement)?;
            self.absorbing = Some(announcement.length);
            return Ok(Step::Progressed);
        }

        let line = match self.buf.scan_line()? {
            Some(line) => line,
            None => return Ok(Step::NeedBytes),
        };

        // `* N FETCH (` switches to attribute-wise parsing before any
        // literal is routed.
        if self.mode == Mode::Lines {
            if let Ok((rem, seq)) = fetch_start(self.buf.acc()) {
                let consumed = self.buf.acc().len() - rem.len();
                self.buf.consume(consumed);

                self.queue.push_back(ResponseEvent::FetchStart(seq));
                self.attr_count = 0;
                self.announcement = line.announcement;
                self.line_complete = line.announcement.is_none();
                self.mode = Mode::Fetch;

                return Ok(Step::Progressed);
            }
        }

        if let Some(announcement) = line.announcement {
            self.announcement = Some(announcement);
            return Ok(Step::Progressed);
        }

        let message = self.buf.take_acc();
        self.parse_response_message(&message)?;

        Ok(Step::Progressed)
    }

    fn on_fetch(&mut self) -> Result<Step, StreamError> {
        if self.absorbing.is_some() {
            return Ok(self.absorb_step());
        }

        let acc = self.buf.acc();
        let (input, skipped) = match acc.first() {
            Some(b' ') => (&acc[1..], 1usize),
            Some(_) => (acc, 0),
            None => return self.grow_segment(),
        };

        // Closing parenthesis ends the attribute list.
        if input.first() == Some(&b')') {
            return match crlf(&input[1..]) {
                Ok((rem, ())) if rem.is_empty() => {
                    self.buf.clear_acc();
                    self.queue.push_back(ResponseEvent::FetchFinish);
                    self.attr_count = 0;
                    self.line_complete = false;
                    self.mode = Mode::Lines;

                    Ok(Step::Progressed)
                }
                Err(nom::Err::Incomplete(_)) => self.grow_segment(),
                _ => Err(StreamError::Parser {
                    context: "fetch attribute",
                }),
            };
        }

        // A literal marker at the end of the accumulated bytes: decide
        // between streaming and buffering.
        if self.announcement.is_some() {
            if let Ok((rem, (kind, origin, (length, _mode)))) = msg_att_streaming_start(input) {
                if rem.is_empty() {
                    self.bump_attr_count()?;

                    if let Some(limit) = self.config.body_size_limit {
                        if length > limit {
                            return Err(StreamError::Limit(LimitError::BodyTooLarge {
                                limit,
                                length,
                            }));
                        }
                    }

                    self.announcement = None;
                    self.buf.clear_acc();

                    self.queue.push_back(ResponseEvent::FetchStreamingBegin {
                        kind,
                        origin,
                        length,
                    });

                    if length == 0 {
                        self.queue.push_back(ResponseEvent::FetchStreamingEnd);
                        self.mode = Mode::Fetch;
                    } else {
                        self.mode = Mode::FetchStreaming { remaining: length };
                    }

                    return Ok(Step::Progressed);
                }
            }
        }

        match msg_att_item(self.config.max_parser_depth)(input) {
            Ok((rem, item)) => {
                let consumed = skipped + (input.len() - rem.len());

                self.bump_attr_count()?;
                let item = self.intern_item(item);
                self.buf.consume(consumed);

                self.queue
                    .push_back(ResponseEvent::FetchSimpleAttribute(item));

                Ok(Step::Progressed)
            }
            Err(nom::Err::Incomplete(_)) => self.grow_segment(),
            Err(error) => Err(self.classify(error, "fetch attribute")),
        }
    }

    fn on_streaming(&mut self, remaining: u32) -> Step {
        let chunk = self.buf.drain_stream(remaining);

        if chunk.is_empty() {
            return Step::NeedBytes;
        }

        let remaining = remaining - chunk.len() as u32;

        self.queue
            .push_back(ResponseEvent::FetchStreamingBytes { chunk });

        if remaining == 0 {
            self.queue.push_back(ResponseEvent::FetchStreamingEnd);
            self.mode = Mode::Fetch;
        } else {
            self.mode = Mode::FetchStreaming { remaining };
        }

        Step::Progressed
    }

    // ----- shared plumbing -----

    fn grow_segment(&mut self) -> Result<Step, StreamError> {
        if let Some(announcement) = self.announcement.take() {
            check_buffered_literal(&self.config, announcement)?;
            self.absorbing = Some(announcement.length);
            return Ok(Step::Progressed);
        }

        if self.line_complete {
            return Err(StreamError::Parser {
                context: "fetch attribute",
            });
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

    fn absorb_step(&mut self) -> Step {
        let remaining = match self.absorbing {
            Some(remaining) => remaining,
            None => return Step::Progressed,
        };

        let moved = self.buf.absorb_literal(remaining);
        let left = remaining - moved;

        if left == 0 {
            self.absorbing = None;
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

    fn bump_attr_count(&mut self) -> Result<(), StreamError> {
        self.attr_count += 1;

        if let Some(limit) = self.config.message_attribute_limit {
            if self.attr_count > limit {
                return Err(StreamError::Limit(LimitError::TooManyAttributes {
                    limit,
                }));
            }
        }

        Ok(())
    }

    fn intern_item(&self, item: MessageDataItem) -> MessageDataItem {
        if self.config.parsed_string_cache.is_none() {
            return item;
        }

        match item {
            MessageDataItem::Flags(flags) => MessageDataItem::Flags(
                flags
                    .into_iter()
                    .map(|flag| match flag {
                        FlagFetch::Flag(flag) => {
                            FlagFetch::Flag(intern_flag(&self.config, flag))
                        }
                        recent => recent,
                    })
                    .collect(),
            ),
            other => other,
        }
    }

    fn parse_response_message(&mut self, message: &[u8]) -> Result<(), StreamError> {
        if self.mode == Mode::Greeting {
            if let Ok((rem, greeting)) = greeting(message) {
                if rem.is_empty() {
                    self.queue.push_back(ResponseEvent::Greeting(greeting));
                    self.mode = Mode::Lines;

                    return Ok(());
                }
            }

            // Continuation requests may interleave in any state.
            return match continue_req(message) {
                Ok((rem, request)) if rem.is_empty() => {
                    self.queue
                        .push_back(ResponseEvent::ContinuationRequest(request));

                    Ok(())
                }
                _ => Err(StreamError::Parser { context: "greeting" }),
            };
        }

        match response(message) {
            Ok((rem, event)) if rem.is_empty() => {
                let event = match event {
                    ResponseEvent::Untagged(Data::Flags(flags)) => {
                        ResponseEvent::Untagged(Data::Flags(
                            flags
                                .into_iter()
                                .map(|flag| intern_flag(&self.config, flag))
                                .collect(),
                        ))
                    }
                    other => other,
                };

                self.queue.push_back(event);

                Ok(())
            }
            Ok(_) => Err(StreamError::Parser { context: "response" }),
            Err(error) => Err(self.classify(error, "response")),
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
