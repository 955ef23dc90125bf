//! Glue between nom and the crate's error taxonomy.
//!
//! The grammar rules use nom's *streaming* flavour throughout, so the
//! three result kinds map directly onto the wire-parsing contract:
//!
//! * `Ok((remaining, value))`: the rule matched and consumed input.
//! * `Err(nom::Err::Incomplete(_))`: not enough bytes to decide. The
//!   input slice the caller holds is untouched; retrying with more bytes
//!   may succeed.
//! * `Err(nom::Err::Error(_) / Failure(_))`: the bytes are wrong. The
//!   caller's slice is untouched as well, which is what makes `alt`,
//!   `opt`, and friends reversible: a failed branch consumed nothing.

use std::num::{ParseIntError, TryFromIntError};

use nom::error::{ErrorKind as NomErrorKind, FromExternalError, ParseError};

/// Result type of every grammar rule.
pub(crate) type ImapResult<'a, O> = Result<(&'a [u8], O), nom::Err<GrammarError<'a>>>;

#[derive(Debug)]
pub(crate) struct GrammarError<'a> {
    #[allow(unused)]
    pub(crate) input: &'a [u8],
    pub(crate) kind: GrammarErrorKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GrammarErrorKind {
    /// A number that does not fit its target width, or has a forbidden
    /// leading zero.
    BadNumber,
    BadBase64,
    BadDateTime,
    LiteralContainsNull,
    /// The recursion budget ran out while parsing nested structures.
    RecursionLimitExceeded,
    Nom(NomErrorKind),
}

impl<'a> GrammarError<'a> {
    pub(crate) fn new(input: &'a [u8], kind: GrammarErrorKind) -> Self {
        Self { input, kind }
    }

    pub(crate) fn failure(input: &'a [u8], kind: GrammarErrorKind) -> nom::Err<Self> {
        nom::Err::Failure(Self::new(input, kind))
    }
}

impl<'a> ParseError<&'a [u8]> for GrammarError<'a> {
    fn from_error_kind(input: &'a [u8], kind: NomErrorKind) -> Self {
        Self {
            input,
            kind: GrammarErrorKind::Nom(kind),
        }
    }

    fn append(input: &'a [u8], kind: NomErrorKind, _: Self) -> Self {
        Self {
            input,
            kind: GrammarErrorKind::Nom(kind),
        }
    }
}

impl<'a> FromExternalError<&'a [u8], ParseIntError> for GrammarError<'a> {
    fn from_external_error(input: &'a [u8], _: NomErrorKind, _: ParseIntError) -> Self {
        Self {
            input,
            kind: GrammarErrorKind::BadNumber,
        }
    }
}

impl<'a> FromExternalError<&'a [u8], TryFromIntError> for GrammarError<'a> {
    fn from_external_error(input: &'a [u8], _: NomErrorKind, _: TryFromIntError) -> Self {
        Self {
            input,
            kind: GrammarErrorKind::BadNumber,
        }
    }
}

impl<'a> FromExternalError<&'a [u8], base64::DecodeError> for GrammarError<'a> {
    fn from_external_error(input: &'a [u8], _: NomErrorKind, _: base64::DecodeError) -> Self {
        Self {
            input,
            kind: GrammarErrorKind::BadBase64,
        }
    }
}

/// Guard for recursively defined rules (`body`, `search-key`).
///
/// Deeply nested parenthesised structures would otherwise let a peer
/// exhaust the real stack of a recursive-descent parser; the budget is
/// decremented at each nesting level and hitting zero is a hard failure.
pub(crate) fn check_recursion<'a>(
    input: &'a [u8],
    remaining_recursion: usize,
) -> Result<(), nom::Err<GrammarError<'a>>> {
    if remaining_recursion == 0 {
        return Err(GrammarError::failure(
            input,
            GrammarErrorKind::RecursionLimitExceeded,
        ));
    }

    Ok(())
}
