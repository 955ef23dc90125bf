//! Command-line rules.
//!
//! APPEND and the IDLE payload are deliberately absent from
//! [`command`]: the command state machine intercepts them at line level
//! (see [`append_header`] and friends below) because their payloads are
//! streamed, not buffered.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    character::streaming::char,
    combinator::{map, map_opt, opt, value},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        core::{astring, atom, base64, crlf, literal_marker, sp, tag_imap},
        datetime::date_time,
        extensions::{
            catenate::catenate_start,
            condstore_qresync::{fetch_modifiers, select_params, store_unchangedsince},
            enable::enable,
            id::id,
            metadata::{getmetadata, setmetadata},
            quota::{getquota, getquotaroot, setquota},
            uidplus::uid_expunge,
            url::parse_imap_url,
        },
        fetch::fetch_att,
        flag::{flag, flag_list},
        mailbox::{list_mailbox, mailbox},
        search::{search_key, search_return_opts},
        sequence::sequence_set,
        status::status_att,
    },
    types::{
        command::{
            AppendOptions, Command, CommandBody, CreateParameter, ListReturnOption,
            ListSelectionOption,
        },
        core::{Charset, LiteralMode, Tag, Vec1},
        fetch::{Macro, MacroOrMessageDataItemNames},
        flag::{StoreResponse, StoreType},
        mailbox::Mailbox,
    },
};

/// `command = tag SP (command-any / command-auth / command-nonauth /
///            command-select) CRLF`
///
/// The recursion budget bounds SEARCH key nesting.
pub(crate) fn command(remaining_recursion: usize) -> impl Fn(&[u8]) -> ImapResult<'_, Command> {
    move |input: &[u8]| {
        let (remaining, (tag, _, body, _)) = tuple((
            tag_imap,
            sp,
            command_body(remaining_recursion),
            crlf,
        ))(input)?;

        Ok((remaining, Command { tag, body }))
    }
}

fn command_body(remaining_recursion: usize) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        alt((
            command_any,
            command_nonauth,
            command_auth,
            command_select(remaining_recursion),
        ))(input)
    }
}

/// `command-any = "CAPABILITY" / "LOGOUT" / "NOOP" / id`
fn command_any(input: &[u8]) -> ImapResult<'_, CommandBody> {
    alt((
        value(CommandBody::Capability, tag_no_case(b"CAPABILITY")),
        value(CommandBody::Logout, tag_no_case(b"LOGOUT")),
        value(CommandBody::Noop, tag_no_case(b"NOOP")),
        id,
    ))(input)
}

/// `command-nonauth = login / authenticate`
fn command_nonauth(input: &[u8]) -> ImapResult<'_, CommandBody> {
    alt((login, authenticate))(input)
}

/// `login = "LOGIN" SP userid SP password`
fn login(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, username, _, password)) =
        tuple((tag_no_case(b"LOGIN "), astring, sp, astring))(input)?;

    Ok((remaining, CommandBody::Login { username, password }))
}

/// `authenticate = "AUTHENTICATE" SP auth-type [SP (base64 / "=")]`
///
/// The optional initial response is SASL-IR (RFC 4959); `=` denotes an
/// empty one. Subsequent authentication data lines are not commands and
/// out of scope here.
fn authenticate(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mechanism, initial_response)) = tuple((
        tag_no_case(b"AUTHENTICATE "),
        atom,
        opt(preceded(
            sp,
            alt((base64, value(Vec::new(), tag(b"=")))),
        )),
    ))(input)?;

    Ok((
        remaining,
        CommandBody::Authenticate {
            mechanism,
            initial_response,
        },
    ))
}

/// `command-auth`: mailbox management plus the authenticated-state
/// extensions. APPEND is intercepted by the state machine and missing
/// here on purpose.
fn command_auth(input: &[u8]) -> ImapResult<'_, CommandBody> {
    alt((
        alt((
            select,
            examine,
            create,
            map(preceded(tag_no_case(b"DELETE "), mailbox), |mailbox| {
                CommandBody::Delete { mailbox }
            }),
            rename,
            map(preceded(tag_no_case(b"SUBSCRIBE "), mailbox), |mailbox| {
                CommandBody::Subscribe { mailbox }
            }),
            map(
                preceded(tag_no_case(b"UNSUBSCRIBE "), mailbox),
                |mailbox| CommandBody::Unsubscribe { mailbox },
            ),
            list,
            lsub,
            status,
            value(CommandBody::Idle, tag_no_case(b"IDLE")),
            enable,
        )),
        alt((
            getquotaroot,
            getquota,
            setquota,
            value(CommandBody::Namespace, tag_no_case(b"NAMESPACE")),
            getmetadata,
            setmetadata,
            genurlauth,
            urlfetch,
            resetkey,
        )),
    ))(input)
}

/// `select = "SELECT" SP mailbox [SP "(" select-param ... ")"]`
fn select(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mailbox, parameters)) = tuple((
        tag_no_case(b"SELECT "),
        mailbox,
        opt(preceded(sp, select_params)),
    ))(input)?;

    Ok((
        remaining,
        CommandBody::Select {
            mailbox,
            parameters: parameters.unwrap_or_default(),
        },
    ))
}

/// `examine = "EXAMINE" SP mailbox [SP "(" select-param ... ")"]`
fn examine(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mailbox, parameters)) = tuple((
        tag_no_case(b"EXAMINE "),
        mailbox,
        opt(preceded(sp, select_params)),
    ))(input)?;

    Ok((
        remaining,
        CommandBody::Examine {
            mailbox,
            parameters: parameters.unwrap_or_default(),
        },
    ))
}

/// `create = "CREATE" SP mailbox [SP "(" create-param ... ")"]`
fn create(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mailbox, parameters)) = tuple((
        tag_no_case(b"CREATE "),
        mailbox,
        opt(preceded(
            sp,
            delimited(tag(b"("), separated_list1(sp, create_param), tag(b")")),
        )),
    ))(input)?;

    Ok((
        remaining,
        CommandBody::Create {
            mailbox,
            parameters: parameters.unwrap_or_default(),
        },
    ))
}

/// `create-param = "USE" SP "(" [use-attr *(SP use-attr)] ")" /
///                 create-param-name [SP create-param-value]`
fn create_param(input: &[u8]) -> ImapResult<'_, CreateParameter> {
    alt((
        map(
            preceded(
                tag_no_case(b"USE "),
                delimited(
                    tag(b"("),
                    separated_list0(sp, preceded(char('\\'), atom)),
                    tag(b")"),
                ),
            ),
            CreateParameter::Use,
        ),
        map(
            tuple((atom, opt(preceded(sp, astring)))),
            |(name, value)| CreateParameter::Other {
                name,
                value: value.map(|v| v.as_bytes().to_vec()),
            },
        ),
    ))(input)
}

/// `rename = "RENAME" SP mailbox SP mailbox`
fn rename(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, from, _, to)) =
        tuple((tag_no_case(b"RENAME "), mailbox, sp, mailbox))(input)?;

    Ok((remaining, CommandBody::Rename { from, to }))
}

/// `list = "LIST" [SP "(" selection-opts ")"] SP mailbox SP list-mailbox
///         [SP "RETURN" SP "(" return-opts ")"]` (RFC 5258 superset of
/// the RFC 3501 form)
fn list(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, selection_options, reference, _, mailbox_wildcard, return_options)) =
        tuple((
            tag_no_case(b"LIST "),
            opt(terminated(
                delimited(
                    tag(b"("),
                    separated_list0(sp, list_selection_option),
                    tag(b")"),
                ),
                sp,
            )),
            mailbox,
            sp,
            list_mailbox,
            opt(preceded(
                tuple((sp, tag_no_case(b"RETURN "))),
                delimited(
                    tag(b"("),
                    separated_list0(sp, list_return_option),
                    tag(b")"),
                ),
            )),
        ))(input)?;

    Ok((
        remaining,
        CommandBody::List {
            selection_options: selection_options.unwrap_or_default(),
            reference,
            mailbox_wildcard,
            return_options: return_options.unwrap_or_default(),
        },
    ))
}

fn list_selection_option(input: &[u8]) -> ImapResult<'_, ListSelectionOption> {
    alt((
        value(
            ListSelectionOption::RecursiveMatch,
            tag_no_case(b"RECURSIVEMATCH"),
        ),
        value(ListSelectionOption::Subscribed, tag_no_case(b"SUBSCRIBED")),
        value(ListSelectionOption::Remote, tag_no_case(b"REMOTE")),
        value(
            ListSelectionOption::SpecialUse,
            tag_no_case(b"SPECIAL-USE"),
        ),
        map(atom, ListSelectionOption::Other),
    ))(input)
}

fn list_return_option(input: &[u8]) -> ImapResult<'_, ListReturnOption> {
    alt((
        value(ListReturnOption::Subscribed, tag_no_case(b"SUBSCRIBED")),
        value(ListReturnOption::Children, tag_no_case(b"CHILDREN")),
        value(ListReturnOption::SpecialUse, tag_no_case(b"SPECIAL-USE")),
        map(
            preceded(
                tag_no_case(b"STATUS "),
                delimited(tag(b"("), separated_list0(sp, status_att), tag(b")")),
            ),
            ListReturnOption::Status,
        ),
        map(atom, ListReturnOption::Other),
    ))(input)
}

/// `lsub = "LSUB" SP mailbox SP list-mailbox`
fn lsub(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, reference, _, mailbox_wildcard)) =
        tuple((tag_no_case(b"LSUB "), mailbox, sp, list_mailbox))(input)?;

    Ok((
        remaining,
        CommandBody::Lsub {
            reference,
            mailbox_wildcard,
        },
    ))
}

/// `status = "STATUS" SP mailbox SP "(" status-att *(SP status-att) ")"`
fn status(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mailbox, items)) = tuple((
        tag_no_case(b"STATUS "),
        mailbox,
        preceded(
            sp,
            delimited(tag(b"("), separated_list0(sp, status_att), tag(b")")),
        ),
    ))(input)?;

    Ok((remaining, CommandBody::Status { mailbox, items }))
}

/// `genurlauth = "GENURLAUTH" 1*(SP url-rump SP mechanism)` (RFC 4467)
fn genurlauth(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(
        preceded(
            tag_no_case(b"GENURLAUTH"),
            many1(map(
                tuple((sp, astring, sp, atom)),
                |(_, rump, _, mechanism)| (rump, mechanism),
            )),
        ),
        |rumps| CommandBody::GenUrlAuth {
            rumps: Vec1::unvalidated(rumps),
        },
    )(input)
}

/// `urlfetch = "URLFETCH" 1*(SP url)` (RFC 4467)
fn urlfetch(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(
        preceded(
            tag_no_case(b"URLFETCH"),
            many1(preceded(
                sp,
                map_opt(astring, |url| parse_imap_url(url.as_bytes())),
            )),
        ),
        |urls| CommandBody::UrlFetch {
            urls: Vec1::unvalidated(urls),
        },
    )(input)
}

/// `resetkey = "RESETKEY" [SP mailbox *(SP mechanism)]` (RFC 4467)
fn resetkey(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, tail)) = tuple((
        tag_no_case(b"RESETKEY"),
        opt(tuple((
            preceded(sp, mailbox),
            many0(preceded(sp, atom)),
        ))),
    ))(input)?;

    let (mailbox, mechanisms) = match tail {
        Some((mailbox, mechanisms)) => (Some(mailbox), mechanisms),
        None => (None, Vec::new()),
    };

    Ok((remaining, CommandBody::ResetKey { mailbox, mechanisms }))
}

/// `command-select`: the selected-state commands, with their `UID`
/// prefixed forms.
fn command_select(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        alt((
            value(CommandBody::Check, tag_no_case(b"CHECK")),
            value(CommandBody::Close, tag_no_case(b"CLOSE")),
            value(CommandBody::Expunge, tag_no_case(b"EXPUNGE")),
            uid_expunge,
            preceded(tag_no_case(b"UID "), uid_command(remaining_recursion)),
            search(remaining_recursion, false),
            fetch(false),
            store(false),
            copy(false),
            r#move(false),
        ))(input)
    }
}

fn uid_command(remaining_recursion: usize) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        alt((
            search(remaining_recursion, true),
            fetch(true),
            store(true),
            copy(true),
            r#move(true),
        ))(input)
    }
}

/// `search = "SEARCH" [search-return-opts] [SP "CHARSET" SP charset]
///           1*(SP search-key)`
fn search(
    remaining_recursion: usize,
    uid: bool,
) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        let (remaining, (_, return_options, charset, criteria)) = tuple((
            tag_no_case(b"SEARCH"),
            opt(preceded(sp, search_return_opts)),
            opt(preceded(
                tuple((sp, tag_no_case(b"CHARSET"), sp)),
                charset_arg,
            )),
            many1(preceded(sp, search_key(remaining_recursion))),
        ))(input)?;

        Ok((
            remaining,
            CommandBody::Search {
                charset,
                return_options: return_options.unwrap_or_default(),
                criteria: Vec1::unvalidated(criteria),
                uid,
            },
        ))
    }
}

fn charset_arg(input: &[u8]) -> ImapResult<'_, Charset> {
    crate::grammar::core::charset(input)
}

/// `fetch = "FETCH" SP sequence-set SP ("ALL" / "FULL" / "FAST" /
///          fetch-att / "(" [fetch-att *(SP fetch-att)] ")")
///          [SP "(" fetch-modifier ... ")"]`
fn fetch(uid: bool) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        let (remaining, (_, sequence_set, _, items, modifiers)) = tuple((
            tag_no_case(b"FETCH "),
            sequence_set,
            sp,
            alt((
                value(
                    MacroOrMessageDataItemNames::Macro(Macro::All),
                    tag_no_case(b"ALL"),
                ),
                value(
                    MacroOrMessageDataItemNames::Macro(Macro::Fast),
                    tag_no_case(b"FAST"),
                ),
                value(
                    MacroOrMessageDataItemNames::Macro(Macro::Full),
                    tag_no_case(b"FULL"),
                ),
                map(
                    delimited(
                        tag(b"("),
                        separated_list0(sp, fetch_att),
                        tag(b")"),
                    ),
                    MacroOrMessageDataItemNames::MessageDataItemNames,
                ),
                map(fetch_att, |item| {
                    MacroOrMessageDataItemNames::MessageDataItemNames(vec![item])
                }),
            )),
            opt(preceded(sp, fetch_modifiers)),
        ))(input)?;

        Ok((
            remaining,
            CommandBody::Fetch {
                sequence_set,
                items,
                modifiers: modifiers.unwrap_or_default(),
                uid,
            },
        ))
    }
}

/// `store = "STORE" SP sequence-set [SP "(" "UNCHANGEDSINCE" ... ")"]
///          SP store-att-flags`
fn store(uid: bool) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        let (remaining, (_, sequence_set, unchanged_since, _, kind, response, flags)) =
            tuple((
                tag_no_case(b"STORE "),
                sequence_set,
                opt(preceded(sp, store_unchangedsince)),
                sp,
                alt((
                    value(StoreType::Add, tag(b"+")),
                    value(StoreType::Remove, tag(b"-")),
                    value(StoreType::Replace, nom::combinator::success(&b""[..])),
                )),
                alt((
                    value(StoreResponse::Silent, tag_no_case(b"FLAGS.SILENT")),
                    value(StoreResponse::Answer, tag_no_case(b"FLAGS")),
                )),
                preceded(
                    sp,
                    alt((flag_list, separated_list1(sp, flag))),
                ),
            ))(input)?;

        Ok((
            remaining,
            CommandBody::Store {
                sequence_set,
                kind,
                response,
                flags,
                unchanged_since,
                uid,
            },
        ))
    }
}

/// `copy = "COPY" SP sequence-set SP mailbox`
fn copy(uid: bool) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        let (remaining, (_, sequence_set, _, mailbox)) =
            tuple((tag_no_case(b"COPY "), sequence_set, sp, mailbox))(input)?;

        Ok((
            remaining,
            CommandBody::Copy {
                sequence_set,
                mailbox,
                uid,
            },
        ))
    }
}

/// `move = "MOVE" SP sequence-set SP mailbox` (RFC 6851)
fn r#move(uid: bool) -> impl Fn(&[u8]) -> ImapResult<'_, CommandBody> {
    move |input: &[u8]| {
        let (remaining, (_, sequence_set, _, mailbox)) =
            tuple((tag_no_case(b"MOVE "), sequence_set, sp, mailbox))(input)?;

        Ok((
            remaining,
            CommandBody::Move {
                sequence_set,
                mailbox,
                uid,
            },
        ))
    }
}

// ----- APPEND line pieces (used by the command state machine) -----

/// Cheap APPEND detection: `tag SP "APPEND" SP`. Used on a freshly
/// framed line to decide whether the streaming APPEND path takes over
/// before any literal is buffered.
pub(crate) fn append_prefix(input: &[u8]) -> ImapResult<'_, ()> {
    map(tuple((tag_imap, sp, tag_no_case(b"APPEND "))), |_| ())(input)
}

/// `tag SP "APPEND" SP mailbox`: the fixed prefix of every APPEND.
pub(crate) fn append_header(input: &[u8]) -> ImapResult<'_, (Tag, Mailbox)> {
    let (remaining, (tag, _, _, mailbox)) = tuple((
        tag_imap,
        sp,
        tag_no_case(b"APPEND "),
        mailbox,
    ))(input)?;

    Ok((remaining, (tag, mailbox)))
}

/// `[SP flag-list] [SP date-time]`: the per-message APPEND options,
/// consumed greedily before the data item.
pub(crate) fn append_options(input: &[u8]) -> ImapResult<'_, AppendOptions> {
    let (remaining, (flags, date_time)) = tuple((
        opt(preceded(sp, flag_list)),
        opt(preceded(sp, date_time)),
    ))(input)?;

    Ok((
        remaining,
        AppendOptions {
            flags: flags.unwrap_or_default(),
            date_time,
        },
    ))
}

/// What follows the options of one APPEND message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AppendDataStart {
    /// `SP literal` / `SP literal8`, consumed up to the marker's CRLF.
    Literal { length: u32, mode: LiteralMode },
    /// `SP "CATENATE" SP "("`
    Catenate,
}

pub(crate) fn append_data_start(input: &[u8]) -> ImapResult<'_, AppendDataStart> {
    preceded(
        sp,
        alt((
            map(
                terminated(
                    alt((literal_marker, preceded(tag(b"~"), literal_marker))),
                    crlf,
                ),
                |(length, mode)| AppendDataStart::Literal { length, mode },
            ),
            value(AppendDataStart::Catenate, catenate_start),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::search::SearchKey;

    fn cmd(input: &[u8]) -> Command {
        let (rem, got) = command(30)(input).unwrap();
        assert!(rem.is_empty());
        got
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(CommandBody::Noop, cmd(b"1 NOOP\r\n").body);
        assert_eq!(CommandBody::Capability, cmd(b"a CAPABILITY\r\n").body);
        assert_eq!(CommandBody::Logout, cmd(b"z lOgOuT\r\n").body);
        assert_eq!(CommandBody::Check, cmd(b"a1 CHECK\r\n").body);
        assert_eq!(CommandBody::Idle, cmd(b"i IDLE\r\n").body);
    }

    #[test]
    fn test_login_with_literals() {
        let got = cmd(b"2 LOGIN {5}\r\nalice {8}\r\nwhatever\r\n");
        assert!(matches!(got.body, CommandBody::Login { .. }));

        let got = cmd(b"2 LOGIN {0}\r\n {0}\r\n\r\n");
        match got.body {
            CommandBody::Login { username, password } => {
                assert_eq!(b"", username.as_bytes());
                assert_eq!(b"", password.as_bytes());
            }
            _ => panic!("expected LOGIN"),
        }
    }

    #[test]
    fn test_select_with_qresync() {
        let got = cmd(b"s SELECT INBOX (QRESYNC (67890007 20050715194045000))\r\n");
        match got.body {
            CommandBody::Select {
                mailbox,
                parameters,
            } => {
                assert_eq!(Mailbox::Inbox, mailbox);
                assert_eq!(1, parameters.len());
            }
            _ => panic!("expected SELECT"),
        }
    }

    #[test]
    fn test_uid_fetch_with_changedsince() {
        let got = cmd(b"f UID FETCH 1:* (FLAGS UID) (CHANGEDSINCE 12345)\r\n");
        match got.body {
            CommandBody::Fetch {
                uid, modifiers, ..
            } => {
                assert!(uid);
                assert_eq!(1, modifiers.len());
            }
            _ => panic!("expected FETCH"),
        }
    }

    #[test]
    fn test_store_forms() {
        let got = cmd(b"s STORE 2:4 +FLAGS.SILENT (\\Deleted)\r\n");
        match got.body {
            CommandBody::Store {
                kind, response, ..
            } => {
                assert_eq!(StoreType::Add, kind);
                assert_eq!(StoreResponse::Silent, response);
            }
            _ => panic!("expected STORE"),
        }

        // Flags without parentheses.
        let got = cmd(b"s STORE 1 FLAGS \\Seen \\Answered\r\n");
        match got.body {
            CommandBody::Store { flags, .. } => assert_eq!(2, flags.len()),
            _ => panic!("expected STORE"),
        }

        let got = cmd(b"s STORE 1 (UNCHANGEDSINCE 98) -FLAGS \\Seen\r\n");
        match got.body {
            CommandBody::Store {
                unchanged_since, ..
            } => assert_eq!(Some(98), unchanged_since),
            _ => panic!("expected STORE"),
        }
    }

    #[test]
    fn test_search_with_return_and_charset() {
        let got = cmd(b"s SEARCH RETURN (MIN COUNT) CHARSET UTF-8 UNSEEN SINCE 1-Feb-1994\r\n");
        match got.body {
            CommandBody::Search {
                charset,
                return_options,
                criteria,
                uid,
            } => {
                assert!(charset.is_some());
                assert_eq!(2, return_options.len());
                assert_eq!(2, criteria.len());
                assert!(!uid);
                assert_eq!(SearchKey::Unseen, criteria.as_ref()[0]);
            }
            _ => panic!("expected SEARCH"),
        }
    }

    #[test]
    fn test_list_extended() {
        let got = cmd(
            b"l LIST (SUBSCRIBED REMOTE) \"\" \"*\" RETURN (CHILDREN STATUS (MESSAGES))\r\n",
        );
        match got.body {
            CommandBody::List {
                selection_options,
                return_options,
                ..
            } => {
                assert_eq!(2, selection_options.len());
                assert_eq!(2, return_options.len());
            }
            _ => panic!("expected LIST"),
        }
    }

    #[test]
    fn test_move_and_uid_expunge() {
        assert!(matches!(
            cmd(b"m MOVE 1:3 Archive\r\n").body,
            CommandBody::Move { uid: false, .. }
        ));
        assert!(matches!(
            cmd(b"m UID MOVE 1:3 Archive\r\n").body,
            CommandBody::Move { uid: true, .. }
        ));
        assert!(matches!(
            cmd(b"e UID EXPUNGE 3:5\r\n").body,
            CommandBody::ExpungeUid { .. }
        ));
    }

    #[test]
    fn test_append_header_and_data_start() {
        let (rem, (tag, mailbox)) = append_header(b"3 APPEND INBOX {3+}\r\n").unwrap();
        assert_eq!("3", tag.inner());
        assert_eq!(Mailbox::Inbox, mailbox);
        assert_eq!(b" {3+}\r\n", rem);

        let (rem, options) = append_options(rem).unwrap();
        assert!(options.flags.is_empty());
        assert!(options.date_time.is_none());

        let (rem, got) = append_data_start(rem).unwrap();
        assert!(rem.is_empty());
        assert_eq!(
            AppendDataStart::Literal {
                length: 3,
                mode: LiteralMode::NonSync
            },
            got
        );

        let (_, got) = append_data_start(b" CATENATE (URL \"u\")\r\n").unwrap();
        assert_eq!(AppendDataStart::Catenate, got);
    }

    #[test]
    fn test_append_with_options() {
        let input = b" (\\Seen) \"17-Jul-1996 02:44:25 -0700\" {10+}\r\n";
        let (rem, options) = append_options(input).unwrap();
        assert_eq!(1, options.flags.len());
        assert!(options.date_time.is_some());

        let (_, got) = append_data_start(rem).unwrap();
        assert!(matches!(got, AppendDataStart::Literal { length: 10, .. }));
    }
}
