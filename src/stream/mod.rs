//! The streaming state machines.
//!
//! Both parsers share the same shape: bytes are enqueued into an
//! [`Accumulator`], a line scanner frames them into lines and literal
//! payloads, and a mode enum decides whether the framed bytes are
//! parsed structurally (through the nom grammar) or surfaced verbatim
//! as streamed chunks. A call to `next_event` either returns the next
//! event, returns `Ok(None)` ("feed more bytes"), or fails with a
//! [`StreamError`](crate::error::StreamError).

mod command;
mod response;

use std::collections::VecDeque;

pub use command::CommandParser;
pub use response::ResponseParser;

use crate::{
    config::ParserConfig,
    error::LimitError,
    scanner::{LineScanner, ScannedLine},
    types::{event::LiteralAnnouncement, flag::Flag},
};

/// The parse buffer: raw enqueued bytes plus the scanned accumulation
/// of the current message.
///
/// Checkpoint/restore discipline: `acc` only ever grows until the state
/// machine *commits* a successful parse by calling [`Self::consume`] /
/// [`Self::take_acc`]; a failed or incomplete nom parse leaves it
/// untouched, so no byte is ever lost on suspension. The raw queue is
/// append-only between calls.
#[derive(Debug)]
pub(crate) struct Accumulator {
    /// Bytes not yet routed: the scanner (or a streaming drain) pulls
    /// from the front, the caller appends at the back.
    pending: VecDeque<u8>,
    /// Scanned bytes of the message currently being assembled.
    acc: Vec<u8>,
    scanner: LineScanner,
}

impl Accumulator {
    pub(crate) fn new(buffer_limit: u32) -> Self {
        Self {
            pending: VecDeque::new(),
            acc: Vec::new(),
            scanner: LineScanner::new(buffer_limit),
        }
    }

    pub(crate) fn enqueue(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Moves bytes from the raw queue into `acc` until a line ends.
    /// `Ok(None)` means the queue ran dry mid-line.
    pub(crate) fn scan_line(&mut self) -> Result<Option<ScannedLine>, LimitError> {
        while let Some(byte) = self.pending.pop_front() {
            self.acc.push(byte);

            if let Some(line) = self.scanner.step(byte)? {
                return Ok(Some(line));
            }
        }

        Ok(None)
    }

    /// Moves up to `remaining` literal bytes into `acc`, returning how
    /// many were moved. The line scanner restarts afterwards when the
    /// literal is complete.
    pub(crate) fn absorb_literal(&mut self, remaining: u32) -> u32 {
        let take = (remaining as usize).min(self.pending.len());
        self.acc.extend(self.pending.drain(..take));

        let moved = take as u32;
        if moved == remaining {
            self.scanner.reset_line();
        }

        moved
    }

    /// Pulls up to `max` raw bytes for streaming, bypassing `acc`.
    pub(crate) fn drain_stream(&mut self, max: u32) -> Vec<u8> {
        let take = (max as usize).min(self.pending.len());
        self.pending.drain(..take).collect()
    }

    /// Discards raw bytes up to and including the next LF. Returns true
    /// once a line end was found.
    pub(crate) fn discard_line(&mut self) -> bool {
        while let Some(byte) = self.pending.pop_front() {
            if byte == b'\n' {
                self.scanner.reset_line();
                return true;
            }
        }

        false
    }

    pub(crate) fn acc(&self) -> &[u8] {
        &self.acc
    }

    /// Commits `n` parsed bytes off the front of `acc`.
    pub(crate) fn consume(&mut self, n: usize) {
        self.acc.drain(..n);
    }

    /// Takes the whole assembled message, leaving `acc` empty.
    pub(crate) fn take_acc(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.acc)
    }

    pub(crate) fn clear_acc(&mut self) {
        self.acc.clear();
        self.scanner.reset_line();
    }
}

/// Buffered-literal guard: a literal that must be materialised is
/// checked against `literal_size_limit` at its marker, before any
/// payload byte is consumed.
pub(crate) fn check_buffered_literal(
    config: &ParserConfig,
    announcement: LiteralAnnouncement,
) -> Result<(), LimitError> {
    if let Some(limit) = config.literal_size_limit {
        if announcement.length > limit {
            return Err(LimitError::LiteralTooLarge {
                limit,
                length: announcement.length,
            });
        }
    }

    Ok(())
}

/// Applies the configured interning hook to keyword flags.
pub(crate) fn intern_flag(config: &ParserConfig, flag: Flag) -> Flag {
    let cache = match &config.parsed_string_cache {
        Some(cache) => cache,
        None => return flag,
    };

    match flag {
        Flag::Keyword(atom) => Flag::Keyword(crate::types::core::Atom(cache(atom.inner()))),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_scan_and_absorb() {
        let mut buf = Accumulator::new(1024);

        buf.enqueue(b"a LOGIN {5}\r\nalice");
        let line = buf.scan_line().unwrap().unwrap();
        let announcement = line.announcement.unwrap();
        assert_eq!(5, announcement.length);
        assert_eq!(b"a LOGIN {5}\r\n", buf.acc());

        assert_eq!(5, buf.absorb_literal(5));
        assert_eq!(b"a LOGIN {5}\r\nalice", buf.acc());

        // Nothing left mid-line.
        assert_eq!(None, buf.scan_line().unwrap());

        buf.enqueue(b" {3}\r\n");
        let line = buf.scan_line().unwrap().unwrap();
        assert_eq!(3, line.announcement.unwrap().length);
    }

    #[test]
    fn test_accumulator_partial_absorb() {
        let mut buf = Accumulator::new(1024);

        buf.enqueue(b"ab");
        assert_eq!(2, buf.absorb_literal(5));
        buf.enqueue(b"cde rest");
        assert_eq!(3, buf.absorb_literal(3));
        assert_eq!(b"abcde", buf.acc());
    }

    #[test]
    fn test_drain_stream_bypasses_acc() {
        let mut buf = Accumulator::new(1024);

        buf.enqueue(b"payload");
        assert_eq!(b"payl".to_vec(), buf.drain_stream(4));
        assert_eq!(b"oad".to_vec(), buf.drain_stream(100));
        assert!(buf.acc().is_empty());
    }
}
