//! Mailbox-related types.

use crate::{
    types::core::{AString, AtomExt, IString, ValidationError},
    utils::indicators::is_list_char,
};

/// A mailbox name.
///
/// `INBOX` is matched case-insensitively and normalised to
/// [`Mailbox::Inbox`]; every other name is byte-preserving.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Mailbox {
    Inbox,
    Other(MailboxOther),
}

impl Mailbox {
    pub(crate) fn interpret(astring: AString) -> Self {
        if astring.as_bytes().eq_ignore_ascii_case(b"INBOX") {
            Self::Inbox
        } else {
            Self::Other(MailboxOther(astring))
        }
    }
}

impl TryFrom<&str> for Mailbox {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::interpret(AString::try_from(value)?))
    }
}

/// Any mailbox name that is not `INBOX`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MailboxOther(pub(crate) AString);

impl MailboxOther {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// `list-mailbox = 1*list-char / string`
///
/// A mailbox argument to LIST/LSUB, which additionally permits the
/// wildcards `%` and `*`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListMailbox {
    Token(ListCharString),
    String(IString),
}

/// `1*list-char`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListCharString(pub(crate) String);

impl ListCharString {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::Empty);
        }

        if let Some(position) = value.iter().position(|b| !is_list_char(*b)) {
            return Err(ValidationError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
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

impl From<AtomExt> for MailboxOther {
    fn from(value: AtomExt) -> Self {
        Self(AString::Atom(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_is_case_insensitive() {
        for name in ["INBOX", "inbox", "InBoX"] {
            assert_eq!(Mailbox::Inbox, Mailbox::try_from(name).unwrap());
        }

        assert!(matches!(
            Mailbox::try_from("INBOX2").unwrap(),
            Mailbox::Other(_)
        ));
    }
}
