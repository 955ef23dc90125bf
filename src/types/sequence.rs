//! Sequence sets and UID sets.

use std::num::NonZeroU32;

/// `seq-number = nz-number / "*"`
///
/// `*` stands for the largest number in use.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SeqOrUid {
    Value(NonZeroU32),
    Asterisk,
}

impl SeqOrUid {
    /// Resolves `*` against the largest value currently in use.
    pub fn expand(&self, largest: NonZeroU32) -> NonZeroU32 {
        match self {
            Self::Value(value) => *value,
            Self::Asterisk => largest,
        }
    }
}

impl From<NonZeroU32> for SeqOrUid {
    fn from(value: NonZeroU32) -> Self {
        Self::Value(value)
    }
}

/// `seq-number / seq-range`
///
/// A range `a:b` with `a > b` is preserved as written; both orders denote
/// the same inclusive span.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sequence {
    Single(SeqOrUid),
    Range(SeqOrUid, SeqOrUid),
}

/// `sequence-set`, extended by SEARCHRES (RFC 5182): the set `$` denotes
/// the result saved by the most recent `SEARCH RETURN (SAVE)`.
///
/// Source ordering and overlaps are preserved; no canonicalisation
/// happens on parse.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SequenceSet {
    /// `$`
    SavedResult,
    Sequences(Vec<Sequence>),
}

impl SequenceSet {
    /// Iterates the concrete values of the set, resolving `*` to `largest`.
    ///
    /// Returns `None` for the saved-result set, which only the server can
    /// resolve.
    pub fn iter(&self, largest: NonZeroU32) -> Option<impl Iterator<Item = NonZeroU32> + '_> {
        let sequences = match self {
            Self::SavedResult => return None,
            Self::Sequences(sequences) => sequences,
        };

        Some(sequences.iter().flat_map(move |sequence| {
            let (start, end) = match sequence {
                Sequence::Single(value) => (value.expand(largest), value.expand(largest)),
                Sequence::Range(from, to) => {
                    let (from, to) = (from.expand(largest), to.expand(largest));
                    (from.min(to), from.max(to))
                }
            };

            (start.get()..=end.get()).map(|value| {
                // Range over non-zero bounds can't produce zero.
                NonZeroU32::new(value).unwrap()
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    #[test]
    fn test_iter_expands_star_and_reversed_ranges() {
        let set = SequenceSet::Sequences(vec![
            Sequence::Single(SeqOrUid::Value(nz(2))),
            Sequence::Range(SeqOrUid::Value(nz(5)), SeqOrUid::Value(nz(3))),
            Sequence::Range(SeqOrUid::Value(nz(9)), SeqOrUid::Asterisk),
        ]);

        let got: Vec<u32> = set
            .iter(nz(10))
            .unwrap()
            .map(NonZeroU32::get)
            .collect();

        assert_eq!(vec![2, 3, 4, 5, 9, 10], got);
    }

    #[test]
    fn test_saved_result_is_opaque() {
        assert!(SequenceSet::SavedResult.iter(nz(1)).is_none());
    }
}
