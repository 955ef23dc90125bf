//! QUOTA (RFC 9208, compatible with RFC 2087).

use nom::{
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::ImapResult,
    grammar::{
        core::{astring, atom, number64, sp},
        mailbox::mailbox,
    },
    types::{
        command::{CommandBody, QuotaSet, Resource},
        core::Vec1,
        response::{Data, QuotaGet},
    },
};

/// `getquota = "GETQUOTA" SP quota-root-name`
pub(crate) fn getquota(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(preceded(tag_no_case(b"GETQUOTA "), astring), |root| {
        CommandBody::GetQuota { root }
    })(input)
}

/// `getquotaroot = "GETQUOTAROOT" SP mailbox`
pub(crate) fn getquotaroot(input: &[u8]) -> ImapResult<'_, CommandBody> {
    map(preceded(tag_no_case(b"GETQUOTAROOT "), mailbox), |mailbox| {
        CommandBody::GetQuotaRoot { mailbox }
    })(input)
}

/// `setquota = "SETQUOTA" SP quota-root-name SP setquota-list`
///
/// `setquota-list = "(" [setquota-resource *(SP setquota-resource)] ")"`
pub(crate) fn setquota(input: &[u8]) -> ImapResult<'_, CommandBody> {
    let (remaining, (_, root, _, quotas)) = tuple((
        tag_no_case(b"SETQUOTA "),
        astring,
        sp,
        delimited(
            tag(b"("),
            separated_list0(sp, setquota_resource),
            tag(b")"),
        ),
    ))(input)?;

    Ok((remaining, CommandBody::SetQuota { root, quotas }))
}

/// `setquota-resource = resource-name SP resource-limit`
fn setquota_resource(input: &[u8]) -> ImapResult<'_, QuotaSet> {
    let (remaining, (resource, _, limit)) =
        tuple((map(atom, Resource::from), sp, number64))(input)?;

    Ok((remaining, QuotaSet { resource, limit }))
}

/// `quota-response = "QUOTA" SP quota-root-name SP quota-list`
pub(crate) fn quota_response(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, root, _, quotas)) = tuple((
        tag_no_case(b"QUOTA "),
        astring,
        sp,
        delimited(
            tag(b"("),
            separated_list1(sp, quota_resource),
            tag(b")"),
        ),
    ))(input)?;

    Ok((
        remaining,
        Data::Quota {
            root,
            quotas: Vec1::unvalidated(quotas),
        },
    ))
}

/// `quota-resource = resource-name SP resource-usage SP resource-limit`
fn quota_resource(input: &[u8]) -> ImapResult<'_, QuotaGet> {
    let (remaining, (resource, _, usage, _, limit)) =
        tuple((map(atom, Resource::from), sp, number64, sp, number64))(input)?;

    Ok((
        remaining,
        QuotaGet {
            resource,
            usage,
            limit,
        },
    ))
}

/// `quotaroot-response = "QUOTAROOT" SP mailbox *(SP quota-root-name)`
pub(crate) fn quotaroot_response(input: &[u8]) -> ImapResult<'_, Data> {
    let (remaining, (_, mailbox, roots)) = tuple((
        tag_no_case(b"QUOTAROOT "),
        mailbox,
        many0(preceded(sp, astring)),
    ))(input)?;

    Ok((remaining, Data::QuotaRoot { mailbox, roots }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_response() {
        let (_, got) = quota_response(b"QUOTA \"\" (STORAGE 10 512)\r\n").unwrap();
        match got {
            Data::Quota { quotas, .. } => {
                assert_eq!(
                    &[QuotaGet {
                        resource: Resource::Storage,
                        usage: 10,
                        limit: 512
                    }],
                    quotas.as_ref()
                );
            }
            _ => panic!("expected QUOTA"),
        }
    }

    #[test]
    fn test_setquota() {
        let (_, got) = setquota(b"SETQUOTA ROOT (STORAGE 512 MESSAGE 100)\r\n").unwrap();
        match got {
            CommandBody::SetQuota { quotas, .. } => assert_eq!(2, quotas.len()),
            _ => panic!("expected SETQUOTA"),
        }
    }
}
