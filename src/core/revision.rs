use std::hash::Hasher;

/// Compact fingerprint of a value's contents. Two equal fingerprints mean
/// the underlying data has (almost certainly) not changed, which is all
/// the graph-mirror checks and the tests need from it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct RevisionHash(u64);

impl RevisionHash {
    pub(crate) fn new(value: u64) -> RevisionHash {
        RevisionHash(value)
    }

    pub(crate) fn value(&self) -> u64 {
        self.0
    }
}

/// Anything whose contents can be folded down to a RevisionHash. The hash
/// must cover every field that carries meaning and nothing else, so that
/// two semantically identical values always fingerprint the same.
pub(crate) trait Revisable {
    fn revision(&self) -> RevisionHash;
}

impl<T> Revisable for &T
where
    T: Revisable + ?Sized,
{
    fn revision(&self) -> RevisionHash {
        T::revision(self)
    }
}

/// Fold the fingerprints of a collection of items without regard to
/// iteration order, for containers where order carries no meaning.
pub(crate) fn revise_unordered<T, I>(items: I) -> RevisionHash
where
    T: Revisable,
    I: Iterator<Item = T>,
{
    let mut combined: u64 = 0;
    let mut count: usize = 0;
    for item in items {
        combined = combined.wrapping_add(item.revision().value());
        count += 1;
    }
    let mut hasher = seahash::SeaHasher::new();
    hasher.write_u64(combined);
    hasher.write_usize(count);
    RevisionHash::new(hasher.finish())
}
