use imap_stream::{
    error::{LimitError, StreamError},
    types::{
        command::CommandBody,
        core::LiteralMode,
        mailbox::Mailbox,
    },
    CommandEvent, CommandParser, ParserConfig,
};

/// Feeds `input` in one shot and drains every available event.
fn events(input: &[u8]) -> Vec<CommandEvent> {
    let mut parser = CommandParser::new(ParserConfig::default());
    parser.enqueue_bytes(input);

    let mut events = Vec::new();
    while let Some(event) = parser.next_event().unwrap() {
        events.push(event);
    }

    events
}

/// Feeds `input` one byte at a time, draining after every byte.
fn events_bytewise(input: &[u8]) -> Vec<CommandEvent> {
    let mut parser = CommandParser::new(ParserConfig::default());

    let mut events = Vec::new();
    for byte in input {
        parser.enqueue_bytes(&[*byte]);
        while let Some(event) = parser.next_event().unwrap() {
            events.push(event);
        }
    }

    events
}

/// Merges adjacent payload-chunk events so that differently chunked but
/// equivalent streams compare equal.
fn normalize(events: Vec<CommandEvent>) -> Vec<CommandEvent> {
    let mut out: Vec<CommandEvent> = Vec::new();

    for event in events {
        match (out.pop(), event) {
            (
                Some(CommandEvent::AppendMessageBytes { mut chunk, .. }),
                CommandEvent::AppendMessageBytes {
                    chunk: next,
                    is_last,
                },
            ) => {
                chunk.extend_from_slice(&next);
                out.push(CommandEvent::AppendMessageBytes { chunk, is_last });
            }
            (
                Some(CommandEvent::AppendCatenateDataBytes { mut chunk, .. }),
                CommandEvent::AppendCatenateDataBytes {
                    chunk: next,
                    is_last,
                },
            ) => {
                chunk.extend_from_slice(&next);
                out.push(CommandEvent::AppendCatenateDataBytes { chunk, is_last });
            }
            (Some(previous), event) => {
                out.push(previous);
                out.push(event);
            }
            (None, event) => out.push(event),
        }
    }

    out
}

#[test]
fn test_noop_command() {
    let got = events(b"1 NOOP\r\n");

    assert_eq!(1, got.len());
    match &got[0] {
        CommandEvent::Command {
            command,
            sync_literals,
        } => {
            assert_eq!("1", command.tag.inner());
            assert_eq!(CommandBody::Noop, command.body);
            assert_eq!(0, *sync_literals);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_login_with_two_sync_literals() {
    let got = events(b"2 LOGIN {0}\r\n {0}\r\n\r\n");

    assert_eq!(1, got.len());
    match &got[0] {
        CommandEvent::Command {
            command,
            sync_literals,
        } => {
            assert_eq!("2", command.tag.inner());
            assert!(matches!(command.body, CommandBody::Login { .. }));
            assert_eq!(2, *sync_literals);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_multiappend_with_nonsync_literals() {
    let got = events(b"3 APPEND INBOX {3+}\r\n123 {3+}\r\n456\r\n");

    assert_eq!(
        vec![
            CommandEvent::AppendStart {
                tag: "3".try_into().unwrap(),
                mailbox: Mailbox::Inbox,
            },
            CommandEvent::AppendBeginMessage {
                options: Default::default(),
                length: 3,
                mode: LiteralMode::NonSync,
            },
            CommandEvent::AppendMessageBytes {
                chunk: b"123".to_vec(),
                is_last: true,
            },
            CommandEvent::AppendEndMessage,
            CommandEvent::AppendBeginMessage {
                options: Default::default(),
                length: 3,
                mode: LiteralMode::NonSync,
            },
            CommandEvent::AppendMessageBytes {
                chunk: b"456".to_vec(),
                is_last: true,
            },
            CommandEvent::AppendEndMessage,
            CommandEvent::AppendFinish,
        ],
        got
    );
}

#[test]
fn test_idle_done_returns_to_lines() {
    let got = events(b"1 NOOP\r\n2 IDLE\r\nDONE\r\n3 NOOP\r\n");

    assert_eq!(4, got.len());
    assert!(matches!(&got[0], CommandEvent::Command { command, .. } if command.tag.inner() == "1"));
    assert!(matches!(&got[1], CommandEvent::IdleStart { tag } if tag.inner() == "2"));
    assert_eq!(CommandEvent::IdleDone, got[2]);
    assert!(matches!(&got[3], CommandEvent::Command { command, .. } if command.tag.inner() == "3"));
}

#[test]
fn test_append_with_options() {
    let got = events(
        b"a APPEND Sent (\\Seen) \"17-Jul-1996 02:44:25 -0700\" {2+}\r\nhi\r\n",
    );

    match &got[1] {
        CommandEvent::AppendBeginMessage {
            options,
            length,
            mode,
        } => {
            assert_eq!(1, options.flags.len());
            assert!(options.date_time.is_some());
            assert_eq!(2, *length);
            assert_eq!(LiteralMode::NonSync, *mode);
        }
        other => panic!("unexpected: {other:?}"),
    }

    assert_eq!(CommandEvent::AppendFinish, *got.last().unwrap());
}

#[test]
fn test_append_sync_literal_needs_continuation() {
    let mut parser = CommandParser::new(ParserConfig::default());
    parser.enqueue_bytes(b"a APPEND INBOX {5}\r\n");

    // AppendStart and AppendBeginMessage are available right away.
    assert!(matches!(
        parser.next_event().unwrap(),
        Some(CommandEvent::AppendStart { .. })
    ));
    assert!(matches!(
        parser.next_event().unwrap(),
        Some(CommandEvent::AppendBeginMessage {
            mode: LiteralMode::Sync,
            ..
        })
    ));

    // Now the parser waits for payload the client will only send after
    // a continuation request.
    assert_eq!(None, parser.next_event().unwrap());
    let announcement = parser.continuation_needed().unwrap();
    assert_eq!(5, announcement.length);
    assert_eq!(LiteralMode::Sync, announcement.mode);

    parser.enqueue_bytes(b"hello\r\n");
    assert!(matches!(
        parser.next_event().unwrap(),
        Some(CommandEvent::AppendMessageBytes { is_last: true, .. })
    ));
    assert!(parser.continuation_needed().is_none());
}

#[test]
fn test_login_sync_literal_needs_continuation() {
    let mut parser = CommandParser::new(ParserConfig::default());
    parser.enqueue_bytes(b"a LOGIN {5}\r\n");

    assert_eq!(None, parser.next_event().unwrap());
    assert_eq!(5, parser.continuation_needed().unwrap().length);

    parser.enqueue_bytes(b"alice password\r\n");
    assert!(matches!(
        parser.next_event().unwrap(),
        Some(CommandEvent::Command { sync_literals: 1, .. })
    ));
}

#[test]
fn test_catenate() {
    let got = events(
        b"a APPEND Drafts CATENATE (URL \"/INBOX/;UID=20\" TEXT {5+}\r\nhello URL \"/INBOX/;UID=21\")\r\n",
    );

    assert!(matches!(&got[0], CommandEvent::AppendStart { .. }));
    assert!(matches!(&got[1], CommandEvent::AppendBeginCatenate { .. }));
    match &got[2] {
        CommandEvent::AppendCatenateUrl { url } => {
            assert_eq!(20, url.uid.unwrap().get());
            assert_eq!(Some("INBOX".into()), url.mailbox);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(
        CommandEvent::AppendCatenateDataBegin {
            length: 5,
            mode: LiteralMode::NonSync,
        },
        got[3]
    );
    assert_eq!(
        CommandEvent::AppendCatenateDataBytes {
            chunk: b"hello".to_vec(),
            is_last: true,
        },
        got[4]
    );
    assert_eq!(CommandEvent::AppendCatenateDataEnd, got[5]);
    assert!(matches!(&got[6], CommandEvent::AppendCatenateUrl { url } if url.uid.unwrap().get() == 21));
    assert_eq!(CommandEvent::AppendEndCatenate, got[7]);
    assert_eq!(CommandEvent::AppendFinish, got[8]);
    assert_eq!(9, got.len());
}

#[test]
fn test_bytewise_feed_is_equivalent() {
    let traces: &[&[u8]] = &[
        b"1 NOOP\r\n",
        b"2 LOGIN {0}\r\n {0}\r\n\r\n",
        b"3 APPEND INBOX {3+}\r\n123 {3+}\r\n456\r\n",
        b"1 NOOP\r\n2 IDLE\r\nDONE\r\n3 NOOP\r\n",
        b"a APPEND Drafts CATENATE (URL \"/INBOX/;UID=20\" TEXT {5+}\r\nhello)\r\n",
        b"s SEARCH RETURN (MIN) CHARSET UTF-8 OR SEEN NOT FLAGGED\r\n",
        b"f UID FETCH 1:* (FLAGS BODY.PEEK[HEADER]) (CHANGEDSINCE 12345)\r\n",
    ];

    for trace in traces {
        assert_eq!(
            normalize(events(trace)),
            normalize(events_bytewise(trace)),
            "trace: {}",
            String::from_utf8_lossy(trace),
        );
    }
}

#[test]
fn test_line_too_long_is_a_limit_error() {
    let mut parser = CommandParser::new(ParserConfig {
        buffer_limit: 16,
        ..ParserConfig::default()
    });

    parser.enqueue_bytes(b"a NOOPNOOPNOOPNOOPNOOPNOOP\r\n");
    assert_eq!(
        Err(StreamError::Limit(LimitError::LineTooLong { limit: 16 })),
        parser.next_event(),
    );

    // Limit errors are terminal.
    assert!(parser.next_event().is_err());
    assert!(!parser.recover_to_next_line());
}

#[test]
fn test_buffered_literal_too_large_is_a_limit_error() {
    let mut parser = CommandParser::new(ParserConfig {
        literal_size_limit: Some(4),
        ..ParserConfig::default()
    });

    parser.enqueue_bytes(b"a LOGIN {100}\r\n");
    assert_eq!(
        Err(StreamError::Limit(LimitError::LiteralTooLarge {
            limit: 4,
            length: 100,
        })),
        parser.next_event(),
    );
}

#[test]
fn test_search_nesting_hits_the_stack_cap() {
    let mut input = b"s SEARCH ".to_vec();
    for _ in 0..64 {
        input.extend_from_slice(b"NOT ");
    }
    input.extend_from_slice(b"SEEN\r\n");

    let mut parser = CommandParser::new(ParserConfig::default());
    parser.enqueue_bytes(&input);

    assert_eq!(
        Err(StreamError::Limit(LimitError::TooDeep { limit: 30 })),
        parser.next_event(),
    );
}

#[test]
fn test_parser_error_and_recovery() {
    let mut parser = CommandParser::new(ParserConfig::default());

    parser.enqueue_bytes(b"this is wrong\r\na NOOP\r\n");
    assert!(matches!(
        parser.next_event(),
        Err(StreamError::Parser { .. })
    ));

    // The same error is reported until the caller resynchronises.
    assert!(parser.next_event().is_err());
    assert!(parser.recover_to_next_line());

    match parser.next_event().unwrap() {
        Some(CommandEvent::Command { command, .. }) => {
            assert_eq!("a", command.tag.inner());
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_zero_length_append() {
    let got = events(b"a APPEND INBOX {0+}\r\n\r\n");

    assert_eq!(
        vec![
            CommandEvent::AppendStart {
                tag: "a".try_into().unwrap(),
                mailbox: Mailbox::Inbox,
            },
            CommandEvent::AppendBeginMessage {
                options: Default::default(),
                length: 0,
                mode: LiteralMode::NonSync,
            },
            CommandEvent::AppendEndMessage,
            CommandEvent::AppendFinish,
        ],
        got
    );
}
