//! BODYSTRUCTURE rules.
//!
//! The `body` production is mutually recursive (multiparts nest bodies,
//! MESSAGE/RFC822 parts embed one); every recursive entry point takes
//! the remaining recursion budget and fails hard when it runs out.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::{check_recursion, ImapResult},
    grammar::{
        core::{nil, nstring, number, sp, string},
        envelope::envelope,
    },
    types::{
        body::{
            BasicFields, Body, BodyExtension, BodyStructure, Disposition, Language, Location,
            MultiPartExtension, SinglePartExtension, SpecificFields,
        },
        core::{IString, Vec1},
    },
};

/// `body = "(" (body-type-1part / body-type-mpart) ")"`
pub(crate) fn body(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> ImapResult<'_, BodyStructure> {
    move |input: &[u8]| body_limited(input, remaining_recursion)
}

fn body_limited(input: &[u8], remaining_recursion: usize) -> ImapResult<'_, BodyStructure> {
    check_recursion(input, remaining_recursion)?;

    let one_part =
        move |input| body_type_1part(input, remaining_recursion.saturating_sub(1));
    let multi_part =
        move |input| body_type_mpart(input, remaining_recursion.saturating_sub(1));

    delimited(tag(b"("), alt((one_part, multi_part)), tag(b")"))(input)
}

/// `body-type-1part = (body-type-msg / body-type-text / body-type-basic)
///                    [SP body-ext-1part]`
fn body_type_1part(input: &[u8], remaining_recursion: usize) -> ImapResult<'_, BodyStructure> {
    check_recursion(input, remaining_recursion)?;

    let type_msg = move |input| body_type_msg(input, remaining_recursion);

    let (remaining, ((basic, specific), extension_data)) = tuple((
        alt((type_msg, body_type_text, body_type_basic)),
        opt(preceded(sp, body_ext_1part)),
    ))(input)?;

    Ok((
        remaining,
        BodyStructure::Single {
            body: Body { basic, specific },
            extension_data,
        },
    ))
}

/// `body-type-mpart = 1*body SP media-subtype [SP body-ext-mpart]`
fn body_type_mpart(input: &[u8], remaining_recursion: usize) -> ImapResult<'_, BodyStructure> {
    check_recursion(input, remaining_recursion)?;

    let body = move |input| body_limited(input, remaining_recursion);

    let (remaining, (bodies, _, subtype, extension_data)) = tuple((
        many1(body),
        sp,
        string,
        opt(preceded(sp, body_ext_mpart)),
    ))(input)?;

    Ok((
        remaining,
        BodyStructure::Multi {
            bodies: Vec1::unvalidated(bodies),
            subtype,
            extension_data,
        },
    ))
}

/// `body-type-basic = media-basic SP body-fields`
fn body_type_basic(input: &[u8]) -> ImapResult<'_, (BasicFields, SpecificFields)> {
    let (remaining, ((r#type, subtype), _, basic)) =
        tuple((media_basic, sp, body_fields))(input)?;

    Ok((
        remaining,
        (basic, SpecificFields::Basic { r#type, subtype }),
    ))
}

/// `body-type-msg = media-message SP body-fields SP envelope SP body SP
///                  body-fld-lines`
fn body_type_msg(
    input: &[u8],
    remaining_recursion: usize,
) -> ImapResult<'_, (BasicFields, SpecificFields)> {
    check_recursion(input, remaining_recursion)?;

    let body = move |input| body_limited(input, remaining_recursion.saturating_sub(1));

    let (remaining, (_, _, basic, _, envelope, _, body_structure, _, number_of_lines)) =
        tuple((
            media_message,
            sp,
            body_fields,
            sp,
            envelope,
            sp,
            body,
            sp,
            number,
        ))(input)?;

    Ok((
        remaining,
        (
            basic,
            SpecificFields::Message {
                envelope: Box::new(envelope),
                body_structure: Box::new(body_structure),
                number_of_lines,
            },
        ),
    ))
}

/// `body-type-text = media-text SP body-fields SP body-fld-lines`
fn body_type_text(input: &[u8]) -> ImapResult<'_, (BasicFields, SpecificFields)> {
    let (remaining, (subtype, _, basic, _, number_of_lines)) =
        tuple((media_text, sp, body_fields, sp, number))(input)?;

    Ok((
        remaining,
        (
            basic,
            SpecificFields::Text {
                subtype,
                number_of_lines,
            },
        ),
    ))
}

/// `media-basic = ((DQUOTE ... DQUOTE) / string) SP media-subtype`
///
/// Simplified to `string SP string`; the RFC's enumeration of well-known
/// media types adds nothing to the structure.
fn media_basic(input: &[u8]) -> ImapResult<'_, (IString, IString)> {
    let (remaining, (r#type, _, subtype)) = tuple((string, sp, string))(input)?;

    Ok((remaining, (r#type, subtype)))
}

/// `media-message = DQUOTE "MESSAGE" DQUOTE SP DQUOTE "RFC822" DQUOTE`
fn media_message(input: &[u8]) -> ImapResult<'_, ()> {
    map(tag_no_case(b"\"MESSAGE\" \"RFC822\""), |_| ())(input)
}

/// `media-text = DQUOTE "TEXT" DQUOTE SP media-subtype`
fn media_text(input: &[u8]) -> ImapResult<'_, IString> {
    preceded(tuple((tag_no_case(b"\"TEXT\""), sp)), string)(input)
}

/// `body-fields = body-fld-param SP body-fld-id SP body-fld-desc SP
///                body-fld-enc SP body-fld-octets`
fn body_fields(input: &[u8]) -> ImapResult<'_, BasicFields> {
    let (remaining, (parameter_list, _, id, _, description, _, content_transfer_encoding, _, size)) =
        tuple((
            body_fld_param,
            sp,
            nstring,
            sp,
            nstring,
            sp,
            string,
            sp,
            number,
        ))(input)?;

    Ok((
        remaining,
        BasicFields {
            parameter_list,
            id,
            description,
            content_transfer_encoding,
            size,
        },
    ))
}

/// `body-fld-param = "(" string SP string *(SP string SP string) ")" / nil`
fn body_fld_param(input: &[u8]) -> ImapResult<'_, Vec<(IString, IString)>> {
    alt((
        delimited(
            tag(b"("),
            separated_list0(
                sp,
                map(tuple((string, sp, string)), |(key, _, value)| (key, value)),
            ),
            tag(b")"),
        ),
        map(nil, |_| vec![]),
    ))(input)
}

/// `body-ext-1part = body-fld-md5 [SP body-fld-dsp [SP body-fld-lang
///                   [SP body-fld-loc *(SP body-extension)]]]`
fn body_ext_1part(input: &[u8]) -> ImapResult<'_, SinglePartExtension> {
    map(
        tuple((nstring, opt(preceded(sp, body_fld_dsp_tail)))),
        |(md5, tail)| SinglePartExtension { md5, tail },
    )(input)
}

/// `body-ext-mpart = body-fld-param [SP body-fld-dsp [SP body-fld-lang
///                   [SP body-fld-loc *(SP body-extension)]]]`
fn body_ext_mpart(input: &[u8]) -> ImapResult<'_, MultiPartExtension> {
    map(
        tuple((body_fld_param, opt(preceded(sp, body_fld_dsp_tail)))),
        |(parameter_list, tail)| MultiPartExtension {
            parameter_list,
            tail,
        },
    )(input)
}

/// The shared `body-fld-dsp [SP body-fld-lang [SP body-fld-loc ...]]`
/// suffix of both extension forms.
fn body_fld_dsp_tail(input: &[u8]) -> ImapResult<'_, Disposition> {
    map(
        tuple((
            body_fld_dsp,
            opt(map(
                tuple((
                    preceded(sp, body_fld_lang),
                    opt(map(
                        tuple((
                            preceded(sp, nstring),
                            many0(preceded(sp, body_extension(8))),
                        )),
                        |(location, extensions)| Location {
                            location,
                            extensions,
                        },
                    )),
                )),
                |(languages, tail)| Language { languages, tail },
            )),
        )),
        |(disposition, tail)| Disposition { disposition, tail },
    )(input)
}

/// `body-fld-dsp = "(" string SP body-fld-param ")" / nil`
#[allow(clippy::type_complexity)]
fn body_fld_dsp(input: &[u8]) -> ImapResult<'_, Option<(IString, Vec<(IString, IString)>)>> {
    alt((
        delimited(
            tag(b"("),
            map(tuple((string, sp, body_fld_param)), |(value, _, params)| {
                Some((value, params))
            }),
            tag(b")"),
        ),
        map(nil, |_| None),
    ))(input)
}

/// `body-fld-lang = nstring / "(" string *(SP string) ")"`
fn body_fld_lang(input: &[u8]) -> ImapResult<'_, Vec<IString>> {
    alt((
        map(nstring, |nstring| match nstring.0 {
            Some(item) => vec![item],
            None => vec![],
        }),
        delimited(tag(b"("), separated_list1(sp, string), tag(b")")),
    ))(input)
}

/// `body-extension = nstring / number / "(" body-extension *(SP body-extension) ")"`
pub(crate) fn body_extension(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> ImapResult<'_, BodyExtension> {
    move |input: &[u8]| body_extension_limited(input, remaining_recursion)
}

fn body_extension_limited(
    input: &[u8],
    remaining_recursion: usize,
) -> ImapResult<'_, BodyExtension> {
    check_recursion(input, remaining_recursion)?;

    let inner = move |input| body_extension_limited(input, remaining_recursion.saturating_sub(1));

    alt((
        map(nstring, BodyExtension::NString),
        map(number, BodyExtension::Number),
        map(
            delimited(tag(b"("), separated_list1(sp, inner), tag(b")")),
            |extensions| BodyExtension::List(Vec1::unvalidated(extensions)),
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{GrammarError, GrammarErrorKind};

    const TEXT_PART: &[u8] =
        b"(\"TEXT\" \"PLAIN\" (\"CHARSET\" \"US-ASCII\") NIL NIL \"7BIT\" 1152 23)";

    #[test]
    fn test_single_part() {
        let mut input = TEXT_PART.to_vec();
        input.extend_from_slice(b" ");

        let (_, got) = body(8)(&input).unwrap();
        match got {
            BodyStructure::Single { body, .. } => {
                assert_eq!(1152, body.basic.size);
                assert!(matches!(
                    body.specific,
                    SpecificFields::Text {
                        number_of_lines: 23,
                        ..
                    }
                ));
            }
            BodyStructure::Multi { .. } => panic!("expected single part"),
        }
    }

    #[test]
    fn test_multi_part() {
        let mut input = b"(".to_vec();
        input.extend_from_slice(TEXT_PART);
        input.extend_from_slice(TEXT_PART);
        input.extend_from_slice(b" \"MIXED\") ");

        let (_, got) = body(8)(&input).unwrap();
        match got {
            BodyStructure::Multi { bodies, .. } => assert_eq!(2, bodies.len()),
            BodyStructure::Single { .. } => panic!("expected multipart"),
        }
    }

    #[test]
    fn test_recursion_limit() {
        // A tower of nested multiparts deeper than the budget.
        let mut input = Vec::new();
        for _ in 0..64 {
            input.extend_from_slice(b"(");
        }

        let got = body(8)(&input);
        assert!(matches!(
            got,
            Err(nom::Err::Failure(GrammarError {
                kind: GrammarErrorKind::RecursionLimitExceeded,
                ..
            }))
        ));
    }
}
