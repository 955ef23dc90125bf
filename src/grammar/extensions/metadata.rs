//! METADATA (RFC 5464).

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        core::{astring, nstring, number, sp},
        mailbox::mailbox,
    },
    types::{
        command::{CommandBody, GetMetadataOption, MetadataDepth},
        core::Vec1,
        response::{Data, MetadataResponse},
    },
};

/// `getmetadata = "GETMETADATA" [SP getmetadata-options] SP mailbox SP entries`
pub(crate) fn getmetadata(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, options, mailbox, _, entries)) = tuple((
        tag_no_case(b"GETMETADATA "),
        opt(nom::sequence::terminated(getmetadata_options, sp)),
        mailbox,
        sp,
        entry_list,
    ))(input)?;

    Ok((
        remaining,
        CommandBody::GetMetadata {
            options: options.unwrap_or_default(),
            mailbox,
            entries,
        },
    ))
}

/// `getmetadata-options = "(" getmetadata-option *(SP getmetadata-option) ")"`
fn getmetadata_options(input: &[u8]) -> ImapResult<'_, Vec<GetMetadataOption>> {
    delimited(
        tag(b"("),
        separated_list1(sp, getmetadata_option),
        tag(b")"),
    )(input)
}

/// `getmetadata-option = "MAXSIZE" SP number / "DEPTH" SP ("0" / "1" / "infinity")`
fn getmetadata_option(input: &[u8]) -> ImapResult<'_, GetMetadataOption> {
    alt((
        map(
            preceded(tag_no_case(b"MAXSIZE "), number),
            GetMetadataOption::MaxSize,
        ),
        map(
            preceded(
                tag_no_case(b"DEPTH "),
                alt((
                    value(MetadataDepth::Zero, tag(b"0")),
                    value(MetadataDepth::One, tag(b"1")),
                    value(MetadataDepth::Infinity, tag_no_case(b"infinity")),
                )),
            ),
            GetMetadataOption::Depth,
        ),
    ))(input)
}

/// `setmetadata = "SETMETADATA" SP mailbox SP entry-values`
pub(crate) fn setmetadata(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, mailbox, _, entries)) = tuple((
        tag_no_case(b"SETMETADATA "),
        mailbox,
        sp,
        entry_values,
    ))(input)?;

    Ok((remaining, CommandBody::SetMetadata { mailbox, entries }))
}

/// `entry-values = "(" entry-value *(SP entry-value) ")"`
fn entry_values(
    input: &[u8],
) -> ImapResult<'_, Vec1<(crate::types::core::AString, crate::types::core::NString)>> {
    map(
        delimited(
            tag(b"("),
            separated_list1(
                sp,
                map(tuple((astring, sp, nstring)), |(entry, _, value)| {
                    (entry, value)
                }),
            ),
            tag(b")"),
        ),
        Vec1::unvalidated,
    )(input)
}

/// `entry-list = entry *(SP entry)` or the parenthesised form used in
/// commands.
fn entry_list(input: &[u8]) -> ImapResult<'_, Vec1<crate::types::core::AString>> {
    map(
        alt((
            delimited(tag(b"("), separated_list1(sp, astring), tag(b")")),
            map(astring, |entry| vec![entry]),
        )),
        Vec1::unvalidated,
    )(input)
}

/// `metadata-resp = "METADATA" SP mailbox SP (entry-values / entry-list)`
pub(crate) fn metadata_resp(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, mailbox, _, items)) = tuple((
        tag_no_case(b"METADATA "),
        mailbox,
        sp,
        alt((
            map(entry_values, MetadataResponse::WithValues),
            map(
                map(separated_list1(sp, astring), Vec1::unvalidated),
                MetadataResponse::WithoutValues,
            ),
        )),
    ))(input)?;

    Ok((remaining, Data::Metadata { mailbox, items }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getmetadata() {
        let (_, got) = getmetadata(
            b"GETMETADATA (MAXSIZE 1024 DEPTH infinity) INBOX /shared/comment\r\n",
        )
        .unwrap();
        match got {
            CommandBody::GetMetadata {
                options, entries, ..
            } => {
                assert_eq!(2, options.len());
                assert_eq!(1, entries.len());
            }
            _ => panic!("expected GETMETADATA"),
        }
    }

    #[test]
    fn test_metadata_resp_with_values() {
        let (_, got) =
            metadata_resp(b"METADATA INBOX (/shared/comment \"my comment\")\r\n").unwrap();
        assert!(matches!(
            got,
            Data::Metadata {
                items: MetadataResponse::WithValues(_),
                ..
            }
        ));
    }

    #[test]
    fn test_metadata_resp_without_values() {
        let (_, got) = metadata_resp(b"METADATA INBOX /shared/comment /private/foo\r\n").unwrap();
        assert!(matches!(
            got,
            Data::Metadata {
                items: MetadataResponse::WithoutValues(_),
                ..
            }
        ));
    }
}
