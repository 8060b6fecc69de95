use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// a binary search tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<T> {
    /// Insert the element into the data structure
    Insert(T),
    /// Erase the element from the data structure
    Erase(T),
    /// Compare iterators
    Iter,
    /// Flatten the tree into a buffer and rebuild it balanced
    Rebuild,
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are
    /// weighted up so trees actually grow between erases.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2, 3]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Erase(T::arbitrary(g)),
            2 => Op::Iter,
            3 => Op::Rebuild,
            _ => unreachable!(),
        }
    }
}
