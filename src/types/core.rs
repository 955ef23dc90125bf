//! Core string types of the IMAP grammar.
//!
//! ```text
//!        ┌───────┐ ┌─────────────────┐
//!        │AString│ │     NString     │
//!        └──┬─┬──┘ │(Option<IString>)│
//!           │ │    └─────┬───────────┘
//!           │ └──────┐   │
//! ┌────┐ ┌──▼────┐ ┌─▼───▼─┐
//! │Atom│ │AtomExt│ │IString│
//! └────┘ └───────┘ └┬─────┬┘
//!                   │     │
//!             ┌─────▼─┐ ┌─▼────┐
//!             │Literal│ │Quoted│
//!             └───────┘ └──────┘
//! ```
//!
//! All types own their data. The streaming parsers hand out events that
//! outlive the internal parse buffer, so borrowing is not an option here.

use std::fmt;

use thiserror::Error;

use crate::utils::indicators::{
    is_astring_char, is_atom_char, is_char8, is_quoted_specials, is_text_char,
};

/// Error of a fallible conversion into one of the core types.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum ValidationError {
    #[error("Must not be empty")]
    Empty,
    #[error("Invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
}

fn verify_bytes(value: &[u8], allowed: fn(u8) -> bool) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty);
    }

    if let Some(position) = value.iter().position(|b| !allowed(*b)) {
        return Err(ValidationError::ByteNotAllowed {
            found: value[position],
            position,
        });
    }

    Ok(())
}

/// `atom = 1*ATOM-CHAR`
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Atom(pub(crate) String);

impl Atom {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        verify_bytes(value.as_ref(), is_atom_char)
    }

    /// Constructs an atom without validation.
    pub(crate) fn unvalidated(inner: impl Into<String>) -> Self {
        let inner = inner.into();

        #[cfg(debug_assertions)]
        Self::verify(&inner).unwrap();

        Self(inner)
    }

    pub fn inner(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Atom {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.into()))
    }
}

impl TryFrom<String> for Atom {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(value))
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An atom extended by `resp-specials`, i.e., `1*ASTRING-CHAR`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AtomExt(pub(crate) String);

impl AtomExt {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        verify_bytes(value.as_ref(), is_astring_char)
    }

    pub(crate) fn unvalidated(inner: impl Into<String>) -> Self {
        let inner = inner.into();

        #[cfg(debug_assertions)]
        Self::verify(&inner).unwrap();

        Self(inner)
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AtomExt {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.into()))
    }
}

impl From<Atom> for AtomExt {
    fn from(value: Atom) -> Self {
        Self(value.0)
    }
}

impl AsRef<str> for AtomExt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Literal transmission mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LiteralMode {
    /// `{N}`: the receiver must agree via a continuation request.
    Sync,
    /// `{N+}` (LITERAL+/LITERAL-): sent without waiting.
    NonSync,
}

/// `literal = "{" number ["+"] "}" CRLF *CHAR8`
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Literal {
    pub(crate) data: Vec<u8>,
    pub(crate) mode: LiteralMode,
}

impl Literal {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_char8(*b)) {
            return Err(ValidationError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    /// A binary literal (`~{N}`), which may contain NUL bytes.
    pub(crate) fn unvalidated_binary(data: Vec<u8>, mode: LiteralMode) -> Self {
        Self { data, mode }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mode(&self) -> LiteralMode {
        self.mode
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl TryFrom<&[u8]> for Literal {
    type Error = ValidationError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self {
            data: value.to_vec(),
            mode: LiteralMode::Sync,
        })
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Literal")
            .field("data", &crate::utils::escape_byte_string(&self.data))
            .field("mode", &self.mode)
            .finish()
    }
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE` (unescaped form)
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Quoted(pub(crate) String);

impl Quoted {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_text_char(*b)) {
            return Err(ValidationError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub(crate) fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Quoted {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.into()))
    }
}

/// A single `QUOTED-CHAR`, used as the mailbox hierarchy delimiter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct QuotedChar(pub(crate) char);

impl QuotedChar {
    pub(crate) fn unvalidated(inner: char) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> char {
        self.0
    }
}

/// `string = quoted / literal`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum IString {
    Literal(Literal),
    Quoted(Quoted),
}

impl IString {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Literal(literal) => literal.data(),
            Self::Quoted(quoted) => quoted.inner().as_bytes(),
        }
    }
}

impl From<Literal> for IString {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Quoted> for IString {
    fn from(value: Quoted) -> Self {
        Self::Quoted(value)
    }
}

/// `nstring = string / nil`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NString(pub Option<IString>);

impl NString {
    pub const NIL: NString = NString(None);

    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_ref().map(IString::as_bytes)
    }
}

/// `astring = 1*ASTRING-CHAR / string`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AString {
    Atom(AtomExt),
    String(IString),
}

impl AString {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Atom(atom) => atom.inner().as_bytes(),
            Self::String(string) => string.as_bytes(),
        }
    }
}

impl TryFrom<&str> for AString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::Atom(AtomExt::try_from(value)?))
    }
}

/// The client-chosen command identifier.
///
/// `tag = 1*<any ASTRING-CHAR except "+">`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag(pub(crate) String);

impl Tag {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        verify_bytes(value.as_ref(), |b| is_astring_char(b) && b != b'+')
    }

    pub(crate) fn unvalidated(inner: impl Into<String>) -> Self {
        let inner = inner.into();

        #[cfg(debug_assertions)]
        Self::verify(&inner).unwrap();

        Self(inner)
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Tag {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.into()))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `text = 1*TEXT-CHAR`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Text(pub(crate) String);

impl Text {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        verify_bytes(value.as_ref(), is_text_char)
    }

    // No verification: the grammar guarantees text-chars, and lenient
    // acceptance paths construct an empty text.
    pub(crate) fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Text {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.into()))
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `charset = atom / quoted`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Charset {
    Atom(Atom),
    Quoted(Quoted),
}

/// A non-empty `Vec`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Vec1<T>(pub(crate) Vec<T>);

impl<T> Vec1<T> {
    pub(crate) fn unvalidated(inner: Vec<T>) -> Self {
        #[cfg(debug_assertions)]
        assert!(!inner.is_empty());

        Self(inner)
    }

    pub fn as_ref(&self) -> &[T] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<T> From<T> for Vec1<T> {
    fn from(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T> TryFrom<Vec<T>> for Vec1<T> {
    type Error = ValidationError;

    fn try_from(inner: Vec<T>) -> Result<Self, Self::Error> {
        if inner.is_empty() {
            return Err(ValidationError::Empty);
        }

        Ok(Self(inner))
    }
}

impl<T> IntoIterator for Vec1<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
