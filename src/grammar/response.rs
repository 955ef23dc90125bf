//! Response-line rules.
//!
//! `* N FETCH (` is absent from [`response`] on purpose: the response
//! state machine intercepts it (via [`fetch_start`]) and parses the
//! attribute list incrementally so that large payloads can stream.

use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_until, take_while},
    combinator::{map, map_res, opt, value},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        core::{atom, charset, crlf, nil, nstring, number, number64, nz_number, sp, string,
               tag_imap, text},
        extensions::{
            enable::enable_data,
            id::id_response,
            metadata::metadata_resp,
            quota::{quota_response, quotaroot_response},
            uidplus::{resp_code_apnd, resp_code_copy},
            url::parse_imap_url,
        },
        flag::flag_perm,
        mailbox::{mailbox, mailbox_list},
        sequence::sequence_set,
        status::status_att_list,
    },
    types::{
        core::{Text, Vec1},
        event::ResponseEvent,
        response::{
            Bye, Capability, Code, CodeOther, ContinuationRequest, Data, ESearchReturn, Greeting,
            GreetingKind, NamespaceDescr, StatusBody, StatusKind, Tagged,
        },
    },
};

// ----- greeting -----

/// `greeting = "*" SP (resp-cond-auth / resp-cond-bye) CRLF`
pub(crate) fn greeting(input: &[u8]) -> ImapResult<'_, Greeting> {
    let (remaining, (_, (kind, (code, text)), _)) = tuple((
        tag(b"* "),
        alt((
            map(
                tuple((
                    alt((
                        value(GreetingKind::Ok, tag_no_case(b"OK ")),
                        value(GreetingKind::PreAuth, tag_no_case(b"PREAUTH ")),
                    )),
                    resp_text,
                )),
                |(kind, resp_text)| (kind, resp_text),
            ),
            map(preceded(tag_no_case(b"BYE "), resp_text), |resp_text| {
                (GreetingKind::Bye, resp_text)
            }),
        )),
        crlf,
    ))(input)?;

    Ok((remaining, Greeting { kind, code, text }))
}

// ----- resp-text and codes -----

/// `resp-text = ["[" resp-text-code "]" SP] text`
///
/// When the text starts with `[`, a code is insisted upon; an unknown
/// code is swallowed verbatim into [`CodeOther`] rather than being
/// misread as text. A missing text after the code is rectified to
/// `"..."` (seen in the wild).
pub(crate) fn resp_text(input: &[u8]) -> ImapResult<'_, (Option<Code>, Text)> {
    let (_, peeked) = opt(tag(b"["))(input)?;

    if peeked.is_none() {
        return map(text, |text| (None, text))(input);
    }

    tuple((
        preceded(
            tag(b"["),
            map(
                alt((
                    terminated(resp_text_code, tag(b"]")),
                    map(
                        terminated(
                            take_while(|b: u8| b != b']' && b != b'\r' && b != b'\n'),
                            tag(b"]"),
                        ),
                        |bytes: &[u8]| Code::Other(CodeOther::unvalidated(bytes.to_vec())),
                    ),
                )),
                Some,
            ),
        ),
        alt((
            preceded(sp, text),
            map(nom::combinator::peek(crlf), |_| {
                log::warn!("Rectified missing resp-text to \"...\"");

                Text::unvalidated("...")
            }),
        )),
    ))(input)
}

/// `resp-text-code`
fn resp_text_code(input: &[u8]) -> ImapResult<'_, Code> {
    alt((
        value(Code::Alert, tag_no_case(b"ALERT")),
        map(
            preceded(
                tag_no_case(b"BADCHARSET"),
                opt(delimited(
                    tag(b" ("),
                    separated_list1(sp, charset),
                    tag(b")"),
                )),
            ),
            |allowed| Code::BadCharset {
                allowed: allowed.unwrap_or_default(),
            },
        ),
        map(capability_data, Code::Capability),
        value(Code::Parse, tag_no_case(b"PARSE")),
        map(
            preceded(
                tag_no_case(b"PERMANENTFLAGS "),
                delimited(
                    tag(b"("),
                    map(
                        opt(terminated(separated_list1(sp, flag_perm), opt(sp))),
                        Option::unwrap_or_default,
                    ),
                    tag(b")"),
                ),
            ),
            Code::PermanentFlags,
        ),
        value(Code::ReadOnly, tag_no_case(b"READ-ONLY")),
        value(Code::ReadWrite, tag_no_case(b"READ-WRITE")),
        value(Code::TryCreate, tag_no_case(b"TRYCREATE")),
        map(preceded(tag_no_case(b"UIDNEXT "), nz_number), Code::UidNext),
        map(
            preceded(tag_no_case(b"UIDVALIDITY "), nz_number),
            Code::UidValidity,
        ),
        map(preceded(tag_no_case(b"UNSEEN "), nz_number), Code::Unseen),
        resp_code_apnd,
        resp_code_copy,
        value(Code::UidNotSticky, tag_no_case(b"UIDNOTSTICKY")),
        map(
            preceded(tag_no_case(b"HIGHESTMODSEQ "), number64),
            Code::HighestModSeq,
        ),
        value(Code::NoModSeq, tag_no_case(b"NOMODSEQ")),
        map(
            preceded(tag_no_case(b"MODIFIED "), sequence_set),
            Code::Modified,
        ),
        value(Code::Closed, tag_no_case(b"CLOSED")),
    ))(input)
}

/// `capability-data = "CAPABILITY" *(SP capability) "IMAP4rev1" *(SP capability)`
///
/// Simplified to a non-empty capability list.
pub(crate) fn capability_data(input: &[u8]) -> ImapResult<'_, Vec1<Capability>> {
    map(
        preceded(
            tag_no_case(b"CAPABILITY "),
            separated_list1(sp, map(atom, Capability::from)),
        ),
        Vec1::unvalidated,
    )(input)
}

// ----- continuation request -----

/// `continue-req = "+" SP (resp-text / base64) CRLF`
///
/// Base64 is tried first: a base64 payload is also valid `text`, and the
/// more specific reading must win. A bare `+` CRLF without the space is
/// accepted as an empty request (seen in the wild).
pub(crate) fn continue_req(input: &[u8]) -> ImapResult<'_, ContinuationRequest> {
    enum Either {
        Base64(Vec<u8>),
        Basic((Option<Code>, Text)),
    }

    let (remaining, (_, either, _)) = tuple((
        tag(b"+"),
        alt((
            preceded(
                sp,
                alt((
                    map(
                        map_res(take_until("\n"), |bytes: &[u8]| {
                            let bytes = match bytes.split_last() {
                                Some((b'\r', head)) => head,
                                _ => bytes,
                            };

                            BASE64.decode(bytes)
                        }),
                        Either::Base64,
                    ),
                    map(resp_text, Either::Basic),
                )),
            ),
            map(nom::combinator::peek(crlf), |_| {
                Either::Basic((None, Text::unvalidated("")))
            }),
        )),
        crlf,
    ))(input)?;

    let request = match either {
        Either::Base64(data) => ContinuationRequest::Base64(data),
        Either::Basic((code, text)) => ContinuationRequest::Basic { code, text },
    };

    Ok((remaining, request))
}

// ----- untagged and tagged responses -----

/// Everything except greetings, continuation requests, and the
/// intercepted `* N FETCH`: produces the matching [`ResponseEvent`].
pub(crate) fn response(input: &[u8]) -> ImapResult<'_, ResponseEvent> {
    alt((
        map(continue_req, ResponseEvent::ContinuationRequest),
        response_data,
        map(response_tagged, ResponseEvent::Tagged),
    ))(input)
}

/// `response-data = "*" SP (resp-cond-state / resp-cond-bye /
///                  mailbox-data / message-data / capability-data / ...)
///                  CRLF`
fn response_data(input: &[u8]) -> ImapResult<'_, ResponseEvent> {
    delimited(
        tag(b"* "),
        alt((
            map(resp_cond_state, ResponseEvent::UntaggedStatus),
            map(
                preceded(tag_no_case(b"BYE "), resp_text),
                |(code, text)| ResponseEvent::Bye(Bye { code, text }),
            ),
            map(untagged_data, ResponseEvent::Untagged),
        )),
        tuple((opt(sp), crlf)),
    )(input)
}

/// `resp-cond-state = ("OK" / "NO" / "BAD") SP resp-text`
fn resp_cond_state(input: &[u8]) -> ImapResult<'_, StatusBody> {
    let (remaining, (kind, (code, text))) = tuple((
        alt((
            value(StatusKind::Ok, tag_no_case(b"OK ")),
            value(StatusKind::No, tag_no_case(b"NO ")),
            value(StatusKind::Bad, tag_no_case(b"BAD ")),
        )),
        resp_text,
    ))(input)?;

    Ok((remaining, StatusBody { kind, code, text }))
}

/// `response-tagged = tag SP resp-cond-state CRLF`
fn response_tagged(input: &[u8]) -> ImapResult<'_, Tagged> {
    let (remaining, (tag, _, body, _)) =
        tuple((tag_imap, sp, resp_cond_state, crlf))(input)?;

    Ok((remaining, Tagged { tag, body }))
}

fn untagged_data(input: &[u8]) -> ImapResult<'_, Data> {
    alt((
        alt((
            map(capability_data, Data::Capability),
            map(
                preceded(tag_no_case(b"LIST "), mailbox_list),
                |(attributes, delimiter, mailbox, child_info)| Data::List {
                    attributes,
                    delimiter,
                    mailbox,
                    child_info,
                },
            ),
            map(
                preceded(tag_no_case(b"LSUB "), mailbox_list),
                |(attributes, delimiter, mailbox, _)| Data::Lsub {
                    attributes,
                    delimiter,
                    mailbox,
                },
            ),
            status_data,
            search_data,
            esearch_data,
            map(
                preceded(tag_no_case(b"FLAGS "), crate::grammar::flag::flag_list),
                Data::Flags,
            ),
            map(terminated(number, tag_no_case(b" EXISTS")), Data::Exists),
            map(terminated(number, tag_no_case(b" RECENT")), Data::Recent),
            map(
                terminated(nz_number, tag_no_case(b" EXPUNGE")),
                Data::Expunge,
            ),
            vanished_data,
        )),
        alt((
            enable_data,
            quota_response,
            quotaroot_response,
            id_response,
            namespace_data,
            metadata_resp,
            genurlauth_data,
            urlfetch_data,
        )),
    ))(input)
}

/// `"STATUS" SP mailbox SP "(" [status-att-list] ")"`
fn status_data(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, mailbox, _, items)) = tuple((
        tag_no_case(b"STATUS "),
        mailbox,
        sp,
        delimited(
            tag(b"("),
            map(
                opt(terminated(status_att_list, opt(sp))),
                Option::unwrap_or_default,
            ),
            tag(b")"),
        ),
    ))(input)?;

    Ok((remaining, Data::Status { mailbox, items }))
}

/// `"SEARCH" *(SP nz-number) [SP "(" "MODSEQ" SP mod-sequence-value ")"]`
fn search_data(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, seqs, mod_seq)) = tuple((
        tag_no_case(b"SEARCH"),
        many0(preceded(sp, nz_number)),
        opt(preceded(
            sp,
            delimited(
                tag(b"("),
                preceded(tag_no_case(b"MODSEQ "), number64),
                tag(b")"),
            ),
        )),
    ))(input)?;

    Ok((remaining, Data::Search { seqs, mod_seq }))
}

/// `esearch-response = "ESEARCH" [search-correlator] [SP "UID"]
///                     *(SP search-return-data)` (RFC 4731)
fn esearch_data(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, correlator, uid, returns)) = tuple((
        tag_no_case(b"ESEARCH"),
        opt(preceded(
            sp,
            delimited(
                tuple((tag(b"("), tag_no_case(b"TAG"), sp, tag(b"\""))),
                tag_imap,
                tuple((tag(b"\""), tag(b")"))),
            ),
        )),
        map(opt(preceded(sp, tag_no_case(b"UID"))), |uid| uid.is_some()),
        many0(preceded(sp, search_return_data)),
    ))(input)?;

    Ok((
        remaining,
        Data::ESearch {
            correlator,
            uid,
            returns,
        },
    ))
}

/// `search-return-data = "MIN" SP nz-number / "MAX" SP nz-number /
///                       "ALL" SP sequence-set / "COUNT" SP number /
///                       "MODSEQ" SP mod-sequence-value`
fn search_return_data(input: &[u8]) -> ImapResult<'_, ESearchReturn> {
    alt((
        map(preceded(tag_no_case(b"MIN "), nz_number), ESearchReturn::Min),
        map(preceded(tag_no_case(b"MAX "), nz_number), ESearchReturn::Max),
        map(
            preceded(tag_no_case(b"ALL "), sequence_set),
            ESearchReturn::All,
        ),
        map(
            preceded(tag_no_case(b"COUNT "), number),
            ESearchReturn::Count,
        ),
        map(
            preceded(tag_no_case(b"MODSEQ "), number64),
            ESearchReturn::ModSeq,
        ),
    ))(input)
}

/// `"VANISHED" [SP "(EARLIER)"] SP known-uids` (RFC 7162)
fn vanished_data(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, earlier, _, uids)) = tuple((
        tag_no_case(b"VANISHED"),
        map(
            opt(preceded(
                sp,
                tuple((tag(b"("), tag_no_case(b"EARLIER"), tag(b")"))),
            )),
            |earlier| earlier.is_some(),
        ),
        sp,
        sequence_set,
    ))(input)?;

    Ok((remaining, Data::Vanished { earlier, uids }))
}

/// `namespace-response = "NAMESPACE" SP namespace SP namespace SP namespace`
fn namespace_data(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, personal, _, other_users, _, shared)) = tuple((
        tag_no_case(b"NAMESPACE "),
        namespace,
        sp,
        namespace,
        sp,
        namespace,
    ))(input)?;

    Ok((
        remaining,
        Data::Namespace {
            personal,
            other_users,
            shared,
        },
    ))
}

/// `namespace = nil / "(" 1*namespace-descr ")"`
fn namespace(input: &[u8]) -> ImapResult<'_, Vec<NamespaceDescr>> {
    alt((
        map(nil, |_| Vec::new()),
        delimited(tag(b"("), nom::multi::many1(namespace_descr), tag(b")")),
    ))(input)
}

/// `"(" string SP (DQUOTE QUOTED-CHAR DQUOTE / nil)
///  *(SP string SP "(" string *(SP string) ")") ")"`
///
/// The response extensions are accepted and discarded.
fn namespace_descr(input: &[u8]) -> ImapResult<'_, NamespaceDescr> {
    let (remaining, (_, prefix, _, delimiter, _, _)) = tuple((
        tag(b"("),
        string,
        sp,
        alt((
            map(
                delimited(tag(b"\""), crate::grammar::core::quoted_char, tag(b"\"")),
                Some,
            ),
            value(None, nil),
        )),
        many0(namespace_extension),
        tag(b")"),
    ))(input)?;

    Ok((remaining, NamespaceDescr { prefix, delimiter }))
}

fn namespace_extension(input: &[u8]) -> ImapResult<'_, ()> {
    map(
        tuple((
            sp,
            string,
            sp,
            delimited(tag(b"("), separated_list1(sp, string), tag(b")")),
        )),
        |_| (),
    )(input)
}

/// `genurlauth-response = "GENURLAUTH" 1*(SP url-full)` (RFC 4467)
fn genurlauth_data(input: &[u8]) -> ImapResult<'_, Data> {
    map(
        preceded(
            tag_no_case(b"GENURLAUTH"),
            nom::multi::many1(preceded(
                sp,
                nom::combinator::map_opt(crate::grammar::core::astring, |url| {
                    parse_imap_url(url.as_bytes())
                }),
            )),
        ),
        |urls| Data::GenUrlAuth(Vec1::unvalidated(urls)),
    )(input)
}

/// `urlfetch-response = "URLFETCH" 1*(SP url SP nstring)` (RFC 4467)
fn urlfetch_data(input: &[u8]) -> ImapResult<'_, Data> {
    map(
        preceded(
            tag_no_case(b"URLFETCH"),
            nom::multi::many1(map(
                tuple((
                    sp,
                    nom::combinator::map_opt(crate::grammar::core::astring, |url| {
                        parse_imap_url(url.as_bytes())
                    }),
                    sp,
                    nstring,
                )),
                |(_, url, _, data)| (url, data),
            )),
        ),
        Data::UrlFetch,
    )(input)
}

// ----- fetch interception -----

/// `"*" SP nz-number SP "FETCH" SP "("`: the prefix that switches the
/// response machine into attribute-wise parsing.
pub(crate) fn fetch_start(input: &[u8]) -> ImapResult<'_, NonZeroU32> {
    let (remaining, (_, seq, _)) = tuple((
        tag(b"* "),
        nz_number,
        tuple((sp, tag_no_case(b"FETCH"), sp, tag(b"("))),
    ))(input)?;

    Ok((remaining, seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        let (_, got) = greeting(b"* OK [CAPABILITY IMAP4rev1 IDLE] ready\r\n").unwrap();
        assert_eq!(GreetingKind::Ok, got.kind);
        assert!(matches!(got.code, Some(Code::Capability(_))));
        assert_eq!("ready", got.text.inner());

        let (_, got) = greeting(b"* PREAUTH welcome\r\n").unwrap();
        assert_eq!(GreetingKind::PreAuth, got.kind);

        assert!(greeting(b"* NO no\r\n").is_err());
        assert!(matches!(greeting(b"* OK read"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_continue_req() {
        let (_, got) = continue_req(b"+ idling\r\n").unwrap();
        assert!(matches!(got, ContinuationRequest::Basic { .. }));

        let (_, got) = continue_req(b"+ VGVzdA==\r\n").unwrap();
        assert_eq!(ContinuationRequest::Base64(b"Test".to_vec()), got);

        // Bare "+" line.
        let (_, got) = continue_req(b"+\r\n").unwrap();
        assert!(matches!(got, ContinuationRequest::Basic { .. }));
    }

    #[test]
    fn test_tagged_response() {
        let (_, got) = response(b"A1 OK [READ-WRITE] SELECT completed\r\n").unwrap();
        match got {
            ResponseEvent::Tagged(tagged) => {
                assert_eq!("A1", tagged.tag.inner());
                assert_eq!(StatusKind::Ok, tagged.body.kind);
                assert_eq!(Some(Code::ReadWrite), tagged.body.code);
            }
            _ => panic!("expected tagged response"),
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let (_, got) = response(b"* OK [XWEIRD 1 2] hi\r\n").unwrap();
        match got {
            ResponseEvent::UntaggedStatus(StatusBody {
                code: Some(Code::Other(other)),
                ..
            }) => assert_eq!(b"XWEIRD 1 2", other.as_bytes()),
            _ => panic!("expected unknown code"),
        }
    }

    #[test]
    fn test_untagged_data() {
        let (_, got) = response(b"* 23 EXISTS\r\n").unwrap();
        assert_eq!(ResponseEvent::Untagged(Data::Exists(23)), got);

        let (_, got) = response(b"* SEARCH 2 5 6 (MODSEQ 917162500)\r\n").unwrap();
        assert_eq!(
            ResponseEvent::Untagged(Data::Search {
                seqs: vec![
                    2u32.try_into().unwrap(),
                    5u32.try_into().unwrap(),
                    6u32.try_into().unwrap()
                ],
                mod_seq: Some(917162500),
            }),
            got
        );

        let (_, got) =
            response(b"* ESEARCH (TAG \"A282\") MIN 2 COUNT 3\r\n").unwrap();
        match got {
            ResponseEvent::Untagged(Data::ESearch {
                correlator,
                uid,
                returns,
            }) => {
                assert_eq!("A282", correlator.unwrap().inner());
                assert!(!uid);
                assert_eq!(2, returns.len());
            }
            _ => panic!("expected ESEARCH"),
        }

        let (_, got) = response(b"* VANISHED (EARLIER) 41,43:116\r\n").unwrap();
        assert!(matches!(
            got,
            ResponseEvent::Untagged(Data::Vanished { earlier: true, .. })
        ));

        let (_, got) = response(b"* NAMESPACE ((\"\" \"/\")) NIL NIL\r\n").unwrap();
        match got {
            ResponseEvent::Untagged(Data::Namespace { personal, .. }) => {
                assert_eq!(1, personal.len());
                assert_eq!('/', personal[0].delimiter.unwrap().inner());
            }
            _ => panic!("expected NAMESPACE"),
        }
    }

    #[test]
    fn test_fetch_start() {
        let (rem, seq) = fetch_start(b"* 999 FETCH (UID 1)\r\n").unwrap();
        assert_eq!(999, seq.get());
        assert_eq!(b"UID 1)\r\n", rem);

        assert!(fetch_start(b"* SEARCH 1\r\n").is_err());
    }

    #[test]
    fn test_trailing_space_tolerated() {
        assert!(response(b"* CAPABILITY IMAP4rev1 IDLE \r\n").is_ok());
        assert!(response(b"* STATUS INBOX (MESSAGES 2 UNSEEN 1) \r\n").is_ok());
    }
}
