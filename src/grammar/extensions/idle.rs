//! IDLE (RFC 2177).
//!
//! The `IDLE` command line itself is part of the command grammar; this
//! module recognises the client's terminating `DONE` line.

use nom::{bytes::streaming::tag_no_case, combinator::map, sequence::terminated};

use crate::{decode::ImapResult, grammar::core::crlf};

/// `idle-done = "DONE" CRLF`
pub(crate) fn idle_done(input: &[u8]) -> ImapResult<'_, ()> {
    map(terminated(tag_no_case(b"DONE"), crlf), |_| ())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_done() {
        assert!(idle_done(b"DONE\r\n").is_ok());
        assert!(idle_done(b"done\n").is_ok());
        assert!(matches!(idle_done(b"DONE\r"), Err(nom::Err::Incomplete(_))));
        assert!(idle_done(b"NOPE\r\n").is_err());
    }
}
