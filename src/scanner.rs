//! Byte-at-a-time line scanning with literal-announcement detection.
//!
//! IMAP messages are lines interleaved with counted literals. Before any
//! structural parsing happens, the state machines need to know where a
//! line ends and whether it announces a literal (`{N}`, `{N+}`, `~{N}`)
//! so that the next N octets can be routed (buffered or streamed)
//! without ever being misread as protocol text. The scanner does exactly
//! that, one byte at a time, and enforces the line-length limit while
//! scanning: inside literal payloads the limit deliberately does not
//! apply.

use crate::{
    error::LimitError,
    types::{core::LiteralMode, event::LiteralAnnouncement},
};

/// A completed line (or line segment following a literal).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ScannedLine {
    /// The literal announced at the end of this line, if any.
    pub(crate) announcement: Option<LiteralAnnouncement>,
}

/// Tracks the byte most recently seen, accumulating a candidate literal
/// marker along the way. A malformed or overflowing marker silently
/// degrades to ordinary line content; the structural parser will deal
/// with it.
#[derive(Clone, Copy, Debug)]
enum ScanState {
    Other,
    /// `~`: possibly the start of a binary marker.
    Tilde,
    OpeningBracket {
        binary: bool,
    },
    Digit {
        length: u32,
        binary: bool,
    },
    Plus {
        length: u32,
        binary: bool,
    },
    ClosingBracket {
        announcement: LiteralAnnouncement,
    },
    Cr {
        announcement: Option<LiteralAnnouncement>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct LineScanner {
    state: ScanState,
    /// Bytes scanned in the current line so far.
    scanned: u32,
    /// Line-length ceiling (`buffer_limit`).
    limit: u32,
}

impl LineScanner {
    pub(crate) fn new(limit: u32) -> Self {
        Self {
            state: ScanState::Other,
            scanned: 0,
            limit,
        }
    }

    /// Restarts the scanner at a line boundary or after a literal (the
    /// bytes after a literal belong to the same logical line, but the
    /// length budget starts afresh).
    pub(crate) fn reset_line(&mut self) {
        self.state = ScanState::Other;
        self.scanned = 0;
    }

    /// Scans one byte. Returns `Some(line)` when `byte` terminated a
    /// line.
    pub(crate) fn step(&mut self, byte: u8) -> Result<Option<ScannedLine>, LimitError> {
        self.scanned = self.scanned.saturating_add(1);

        if self.scanned > self.limit {
            return Err(LimitError::LineTooLong { limit: self.limit });
        }

        let finish = |scanner: &mut Self, announcement| {
            scanner.reset_line();
            Ok(Some(ScannedLine { announcement }))
        };

        let next = match self.state {
            ScanState::Other
            | ScanState::Tilde
            | ScanState::OpeningBracket { .. }
            | ScanState::Plus { .. }
            | ScanState::Digit { .. } => {
                // The marker-accumulating states share their reactions
                // to the structural bytes; only their marker-progress
                // transitions differ.
                match (self.state, byte) {
                    (_, b'\n') => return finish(self, None),
                    (_, b'\r') => ScanState::Cr { announcement: None },
                    (_, b'~') => ScanState::Tilde,
                    (ScanState::Tilde, b'{') => ScanState::OpeningBracket { binary: true },
                    (_, b'{') => ScanState::OpeningBracket { binary: false },
                    (ScanState::OpeningBracket { binary }, b'0'..=b'9') => ScanState::Digit {
                        length: u32::from(byte - b'0'),
                        binary,
                    },
                    (ScanState::Digit { length, binary }, b'0'..=b'9') => {
                        let digit = u32::from(byte - b'0');
                        match length.checked_mul(10).and_then(|l| l.checked_add(digit)) {
                            // Overflow: not a marker we can represent;
                            // the grammar rejects the number properly.
                            None => ScanState::Other,
                            Some(length) => ScanState::Digit { length, binary },
                        }
                    }
                    (ScanState::Digit { length, binary }, b'+') => {
                        ScanState::Plus { length, binary }
                    }
                    (ScanState::Digit { length, binary }, b'}') => ScanState::ClosingBracket {
                        announcement: LiteralAnnouncement {
                            length,
                            mode: LiteralMode::Sync,
                            binary,
                        },
                    },
                    (ScanState::Plus { length, binary }, b'}') => ScanState::ClosingBracket {
                        announcement: LiteralAnnouncement {
                            length,
                            mode: LiteralMode::NonSync,
                            binary,
                        },
                    },
                    _ => ScanState::Other,
                }
            }
            ScanState::ClosingBracket { announcement } => match byte {
                b'\r' => ScanState::Cr {
                    announcement: Some(announcement),
                },
                b'\n' => return finish(self, Some(announcement)),
                b'~' => ScanState::Tilde,
                b'{' => ScanState::OpeningBracket { binary: false },
                _ => ScanState::Other,
            },
            ScanState::Cr { announcement } => match byte {
                b'\n' => return finish(self, announcement),
                b'\r' => ScanState::Cr { announcement: None },
                b'~' => ScanState::Tilde,
                b'{' => ScanState::OpeningBracket { binary: false },
                _ => ScanState::Other,
            },
        };

        self.state = next;

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(scanner: &mut LineScanner, bytes: &[u8]) -> Vec<Option<LiteralAnnouncement>> {
        let mut lines = Vec::new();

        for &byte in bytes {
            if let Some(line) = scanner.step(byte).unwrap() {
                lines.push(line.announcement);
            }
        }

        lines
    }

    #[test]
    fn test_plain_lines() {
        let mut scanner = LineScanner::new(1024);

        let lines = scan_all(&mut scanner, b"a NOOP\r\nb CHECK\n");
        assert_eq!(vec![None, None], lines);
    }

    #[test]
    fn test_announcements() {
        let mut scanner = LineScanner::new(1024);

        let lines = scan_all(&mut scanner, b"a LOGIN {5}\r\n");
        assert_eq!(
            vec![Some(LiteralAnnouncement {
                length: 5,
                mode: LiteralMode::Sync,
                binary: false,
            })],
            lines
        );

        let lines = scan_all(&mut scanner, b"a APPEND x {38}  junk {5+}\r\n");
        assert_eq!(
            vec![Some(LiteralAnnouncement {
                length: 5,
                mode: LiteralMode::NonSync,
                binary: false,
            })],
            lines
        );

        let lines = scan_all(&mut scanner, b"a APPEND x ~{7}\r\n");
        assert_eq!(
            vec![Some(LiteralAnnouncement {
                length: 7,
                mode: LiteralMode::Sync,
                binary: true,
            })],
            lines
        );
    }

    #[test]
    fn test_marker_must_close_the_line() {
        let mut scanner = LineScanner::new(1024);

        // Text after the closing bracket cancels the announcement.
        let lines = scan_all(&mut scanner, b"a SEARCH {3} x\r\n");
        assert_eq!(vec![None], lines);
    }

    #[test]
    fn test_overflowing_marker_degrades() {
        let mut scanner = LineScanner::new(1024);

        let lines = scan_all(&mut scanner, b"a X {99999999999999999999}\r\n");
        assert_eq!(vec![None], lines);
    }

    #[test]
    fn test_line_limit() {
        let mut scanner = LineScanner::new(8);

        for &byte in b"12345678" {
            assert!(scanner.step(byte).unwrap().is_none());
        }

        assert_eq!(
            Err(LimitError::LineTooLong { limit: 8 }),
            scanner.step(b'9').map(|_| ())
        );
    }
}
