//! FETCH rules: item names (command side), item values (response side),
//! and the streaming split.
//!
//! The response state machine never lets a literal-valued `BODY[..]`,
//! `RFC822`, `RFC822.TEXT`, or `BINARY[..]` item reach [`msg_att_item`]:
//! it matches [`msg_att_streaming_start`] first and surfaces the payload
//! as a byte stream. `RFC822.HEADER` stays in-memory on purpose (header
//! blobs are the thing callers want materialised, and they are bounded
//! by the buffered-literal limit).

use std::num::NonZeroU32;

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        body::body,
        core::{astring, crlf, literal_marker, nstring, number, number64, nz_number, sp},
        datetime::date_time,
        flag::flag_fetch,
    },
    types::{
        core::{AString, LiteralMode, NString, Vec1},
        event::StreamingKind,
        fetch::{
            GmailLabel, MessageDataItem, MessageDataItemName, Part, Section,
        },
    },
};

// ----- command side: fetch-att names -----

/// ```abnf
/// fetch-att = "ENVELOPE" / "FLAGS" / "INTERNALDATE" /
///             "RFC822" [".HEADER" / ".SIZE" / ".TEXT"] /
///             "BODY" ["STRUCTURE"] / "UID" /
///             "BODY" section ["<" number "." nz-number ">"] /
///             "BODY.PEEK" section ["<" number "." nz-number ">"] /
///             "BINARY" section-binary [partial] /
///             "BINARY.PEEK" section-binary [partial] /
///             "BINARY.SIZE" section-binary /
///             "MODSEQ"
/// ```
pub(crate) fn fetch_att(input: &[u8]) -> ImapResult<'_, MessageDataItemName> {
    alt((
        value(MessageDataItemName::Envelope, tag_no_case(b"ENVELOPE")),
        value(MessageDataItemName::Flags, tag_no_case(b"FLAGS")),
        value(
            MessageDataItemName::InternalDate,
            tag_no_case(b"INTERNALDATE"),
        ),
        value(
            MessageDataItemName::BodyStructure,
            tag_no_case(b"BODYSTRUCTURE"),
        ),
        map(
            tuple((tag_no_case(b"BODY.PEEK"), section, opt(partial))),
            |(_, section, partial)| MessageDataItemName::BodyExt {
                section,
                partial,
                peek: true,
            },
        ),
        map(
            tuple((tag_no_case(b"BODY"), section, opt(partial))),
            |(_, section, partial)| MessageDataItemName::BodyExt {
                section,
                partial,
                peek: false,
            },
        ),
        map(
            tuple((tag_no_case(b"BINARY.PEEK"), section_binary, opt(partial))),
            |(_, section, partial)| MessageDataItemName::Binary {
                section,
                partial,
                peek: true,
            },
        ),
        map(
            preceded(tag_no_case(b"BINARY.SIZE"), section_binary),
            |section| MessageDataItemName::BinarySize { section },
        ),
        map(
            tuple((tag_no_case(b"BINARY"), section_binary, opt(partial))),
            |(_, section, partial)| MessageDataItemName::Binary {
                section,
                partial,
                peek: false,
            },
        ),
        value(MessageDataItemName::Body, tag_no_case(b"BODY")),
        value(MessageDataItemName::Uid, tag_no_case(b"UID")),
        value(
            MessageDataItemName::Rfc822Header,
            tag_no_case(b"RFC822.HEADER"),
        ),
        value(MessageDataItemName::Rfc822Size, tag_no_case(b"RFC822.SIZE")),
        value(MessageDataItemName::Rfc822Text, tag_no_case(b"RFC822.TEXT")),
        value(MessageDataItemName::Rfc822, tag_no_case(b"RFC822")),
        value(MessageDataItemName::ModSeq, tag_no_case(b"MODSEQ")),
    ))(input)
}

/// `partial = "<" number "." nz-number ">"` (RFC 3516 shape, also used
/// by plain BODY fetches)
fn partial(input: &[u8]) -> ImapResult<'_, (u32, NonZeroU32)> {
    delimited(
        tag(b"<"),
        map(tuple((number, tag(b"."), nz_number)), |(start, _, len)| {
            (start, len)
        }),
        tag(b">"),
    )(input)
}

// ----- response side: msg-att items -----

/// One `msg-att-dynamic / msg-att-static` item.
///
/// `remaining_recursion` bounds the BODYSTRUCTURE tree depth.
pub(crate) fn msg_att_item(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> ImapResult<'_, MessageDataItem> {
    move |input: &[u8]| msg_att_item_limited(input, remaining_recursion)
}

fn msg_att_item_limited(
    input: &[u8],
    remaining_recursion: usize,
) -> ImapResult<'_, MessageDataItem> {
    alt((
        map(
            preceded(
                tuple((tag_no_case(b"FLAGS"), sp)),
                delimited(
                    tag(b"("),
                    opt(terminated(separated_list1(sp, flag_fetch), opt(sp))),
                    tag(b")"),
                ),
            ),
            |flags| MessageDataItem::Flags(flags.unwrap_or_default()),
        ),
        map(
            preceded(tuple((tag_no_case(b"ENVELOPE"), sp)), crate::grammar::envelope::envelope),
            MessageDataItem::Envelope,
        ),
        map(
            preceded(tuple((tag_no_case(b"INTERNALDATE"), sp)), date_time),
            MessageDataItem::InternalDate,
        ),
        map(
            preceded(tuple((tag_no_case(b"RFC822.HEADER"), sp)), nstring),
            MessageDataItem::Rfc822Header,
        ),
        map(
            preceded(tuple((tag_no_case(b"RFC822.TEXT"), sp)), nstring),
            MessageDataItem::Rfc822Text,
        ),
        map(
            preceded(tuple((tag_no_case(b"RFC822.SIZE"), sp)), number),
            MessageDataItem::Rfc822Size,
        ),
        map(
            preceded(tuple((tag_no_case(b"RFC822"), sp)), nstring),
            MessageDataItem::Rfc822,
        ),
        map(
            preceded(
                tuple((tag_no_case(b"BODYSTRUCTURE"), sp)),
                body(remaining_recursion),
            ),
            MessageDataItem::BodyStructure,
        ),
        map(
            tuple((
                tag_no_case(b"BODY"),
                section,
                opt(delimited(tag(b"<"), number, tag(b">"))),
                sp,
                nstring,
            )),
            |(_, section, origin, _, data)| MessageDataItem::BodyExt {
                section,
                origin,
                data,
            },
        ),
        map(
            preceded(tuple((tag_no_case(b"BODY"), sp)), body(remaining_recursion)),
            MessageDataItem::Body,
        ),
        map(
            preceded(tuple((tag_no_case(b"UID"), sp)), nz_number),
            MessageDataItem::Uid,
        ),
        map(
            tuple((tag_no_case(b"BINARY.SIZE"), section_binary, sp, number)),
            |(_, section, _, size)| MessageDataItem::BinarySize { section, size },
        ),
        map(
            tuple((
                tag_no_case(b"BINARY"),
                section_binary,
                sp,
                alt((
                    nstring,
                    map(crate::grammar::core::literal8, |literal| {
                        NString(Some(literal.into()))
                    }),
                )),
            )),
            |(_, section, _, value)| MessageDataItem::Binary { section, value },
        ),
        // `fetch-mod-resp = "MODSEQ" SP "(" permsg-modsequence ")"` (RFC 7162)
        map(
            preceded(
                tuple((tag_no_case(b"MODSEQ"), sp)),
                delimited(tag(b"("), number64, tag(b")")),
            ),
            MessageDataItem::ModSeq,
        ),
        gmail_items,
    ))(input)
}

/// The Gmail extension items `X-GM-MSGID`, `X-GM-THRID`, `X-GM-LABELS`.
fn gmail_items(input: &[u8]) -> ImapResult<'_, MessageDataItem> {
    alt((
        map(
            preceded(tuple((tag_no_case(b"X-GM-MSGID"), sp)), number64),
            MessageDataItem::GmailMessageId,
        ),
        map(
            preceded(tuple((tag_no_case(b"X-GM-THRID"), sp)), number64),
            MessageDataItem::GmailThreadId,
        ),
        map(
            preceded(
                tuple((tag_no_case(b"X-GM-LABELS"), sp)),
                delimited(
                    tag(b"("),
                    opt(separated_list1(sp, gmail_label)),
                    tag(b")"),
                ),
            ),
            |labels| MessageDataItem::GmailLabels(labels.unwrap_or_default()),
        ),
    ))(input)
}

fn gmail_label(input: &[u8]) -> ImapResult<'_, GmailLabel> {
    alt((
        map(
            preceded(tag(b"\\"), crate::grammar::core::atom),
            GmailLabel::System,
        ),
        map(astring, GmailLabel::User),
    ))(input)
}

/// The start of a *streamed* attribute: an item name whose value is
/// announced as a literal. Consumes up to and including the marker's
/// CRLF; the payload is not part of the match.
///
/// Returns the payload kind, the `<origin>` offset if present, and the
/// literal marker.
#[allow(clippy::type_complexity)]
pub(crate) fn msg_att_streaming_start(
    input: &[u8],
) -> ImapResult<'_, (StreamingKind, Option<u32>, (u32, LiteralMode))> {
    let (remaining, ((kind, origin), _, marker, _)) = tuple((
        alt((
            map(
                tuple((
                    tag_no_case(b"BODY"),
                    section,
                    opt(delimited(tag(b"<"), number, tag(b">"))),
                )),
                |(_, section, origin)| (StreamingKind::Body { section }, origin),
            ),
            map(
                tuple((tag_no_case(b"BINARY"), section_binary)),
                |(_, section)| (StreamingKind::Binary { section }, None),
            ),
            map(tag_no_case(b"RFC822.TEXT"), |_| {
                (StreamingKind::Rfc822Text, None)
            }),
            map(tag_no_case(b"RFC822"), |_| (StreamingKind::Rfc822, None)),
        )),
        sp,
        alt((
            literal_marker,
            preceded(tag(b"~"), literal_marker),
        )),
        crlf,
    ))(input)?;

    Ok((remaining, (kind, origin, marker)))
}

// ----- sections -----

/// `section = "[" [section-spec] "]"`
pub(crate) fn section(input: &[u8]) -> ImapResult<'_, Option<Section>> {
    delimited(tag(b"["), opt(section_spec), tag(b"]"))(input)
}

/// `section-spec = section-msgtext / (section-part ["." section-text])`
fn section_spec(input: &[u8]) -> ImapResult<'_, Section> {
    alt((
        map(section_msgtext, |spec| spec.into_section(None)),
        map(
            tuple((section_part, opt(preceded(tag(b"."), section_text)))),
            |(part, spec)| match spec {
                Some(SectionText::Mime) => Section::Mime(Part(part)),
                Some(SectionText::MsgText(spec)) => spec.into_section(Some(Part(part))),
                None => Section::Part(Part(part)),
            },
        ),
    ))(input)
}

#[derive(Clone)]
enum SectionMsgText {
    Header,
    HeaderFields(Vec1<AString>),
    HeaderFieldsNot(Vec1<AString>),
    Text,
}

impl SectionMsgText {
    fn into_section(self, part: Option<Part>) -> Section {
        match self {
            Self::Header => Section::Header(part),
            Self::HeaderFields(fields) => Section::HeaderFields(part, fields),
            Self::HeaderFieldsNot(fields) => Section::HeaderFieldsNot(part, fields),
            Self::Text => Section::Text(part),
        }
    }
}

#[derive(Clone)]
enum SectionText {
    MsgText(SectionMsgText),
    Mime,
}

/// `section-msgtext = "HEADER" / "HEADER.FIELDS" [".NOT"] SP header-list / "TEXT"`
fn section_msgtext(input: &[u8]) -> ImapResult<'_, SectionMsgText> {
    alt((
        map(
            preceded(tuple((tag_no_case(b"HEADER.FIELDS.NOT"), sp)), header_list),
            SectionMsgText::HeaderFieldsNot,
        ),
        map(
            preceded(tuple((tag_no_case(b"HEADER.FIELDS"), sp)), header_list),
            SectionMsgText::HeaderFields,
        ),
        value(SectionMsgText::Header, tag_no_case(b"HEADER")),
        value(SectionMsgText::Text, tag_no_case(b"TEXT")),
    ))(input)
}

/// `section-text = section-msgtext / "MIME"`
fn section_text(input: &[u8]) -> ImapResult<'_, SectionText> {
    alt((
        map(section_msgtext, SectionText::MsgText),
        value(SectionText::Mime, tag_no_case(b"MIME")),
    ))(input)
}

/// `section-part = nz-number *("." nz-number)`
fn section_part(input: &[u8]) -> ImapResult<'_, Vec1<NonZeroU32>> {
    map(separated_list1(tag(b"."), nz_number), Vec1::unvalidated)(input)
}

/// `section-binary = "[" [section-part] "]"` (RFC 3516)
pub(crate) fn section_binary(input: &[u8]) -> ImapResult<'_, Vec<NonZeroU32>> {
    delimited(
        tag(b"["),
        map(opt(separated_list1(tag(b"."), nz_number)), |part| {
            part.unwrap_or_default()
        }),
        tag(b"]"),
    )(input)
}

/// `header-list = "(" header-fld-name *(SP header-fld-name) ")"`
fn header_list(input: &[u8]) -> ImapResult<'_, Vec1<AString>> {
    map(
        delimited(tag(b"("), separated_list1(sp, astring), tag(b")")),
        Vec1::unvalidated,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::flag::{Flag, FlagFetch};

    #[test]
    fn test_fetch_att() {
        let tests: &[(&[u8], MessageDataItemName)] = &[
            (b"ENVELOPE ", MessageDataItemName::Envelope),
            (b"RFC822.SIZE ", MessageDataItemName::Rfc822Size),
            (
                b"BODY.PEEK[HEADER] ",
                MessageDataItemName::BodyExt {
                    section: Some(Section::Header(None)),
                    partial: None,
                    peek: true,
                },
            ),
            (
                b"BODY[1.2.3]<0.100> ",
                MessageDataItemName::BodyExt {
                    section: Some(Section::Part(Part(Vec1::unvalidated(vec![
                        NonZeroU32::new(1).unwrap(),
                        NonZeroU32::new(2).unwrap(),
                        NonZeroU32::new(3).unwrap(),
                    ])))),
                    partial: Some((0, NonZeroU32::new(100).unwrap())),
                    peek: false,
                },
            ),
            (
                b"BINARY.SIZE[2] ",
                MessageDataItemName::BinarySize {
                    section: vec![NonZeroU32::new(2).unwrap()],
                },
            ),
            (b"MODSEQ ", MessageDataItemName::ModSeq),
        ];

        for (test, expected) in tests {
            let (_, got) = fetch_att(test).unwrap();
            assert_eq!(expected, &got);
        }
    }

    #[test]
    fn test_msg_att_item_flags() {
        let (_, got) = msg_att_item(8)(b"FLAGS (\\Seen custom) ").unwrap();
        assert_eq!(
            MessageDataItem::Flags(vec![
                FlagFetch::Flag(Flag::Seen),
                FlagFetch::Flag(Flag::Keyword("custom".try_into().unwrap())),
            ]),
            got
        );
    }

    #[test]
    fn test_msg_att_item_modseq() {
        let (_, got) = msg_att_item(8)(b"MODSEQ (917162500) ").unwrap();
        assert_eq!(MessageDataItem::ModSeq(917162500), got);
    }

    #[test]
    fn test_streaming_start() {
        let (rem, (kind, origin, (length, mode))) =
            msg_att_streaming_start(b"BODY[TEXT]<4> {3}\r\nabc").unwrap();
        assert_eq!(b"abc", rem);
        assert_eq!(StreamingKind::Body {
            section: Some(Section::Text(None))
        }, kind);
        assert_eq!(Some(4), origin);
        assert_eq!(3, length);
        assert_eq!(LiteralMode::Sync, mode);

        let (_, (kind, ..)) = msg_att_streaming_start(b"RFC822 {10}\r\n").unwrap();
        assert_eq!(StreamingKind::Rfc822, kind);

        let (_, (kind, ..)) = msg_att_streaming_start(b"BINARY[1] ~{4}\r\n").unwrap();
        assert_eq!(StreamingKind::Binary {
            section: vec![NonZeroU32::new(1).unwrap()]
        }, kind);

        // A quoted value is not a streaming start.
        assert!(msg_att_streaming_start(b"BODY[TEXT] \"abc\"").is_err());
        // RFC822.HEADER is buffered, not streamed.
        assert!(msg_att_streaming_start(b"RFC822.HEADER {3}\r\n").is_err());
    }
}
