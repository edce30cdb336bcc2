// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tagged positions.
//!
//! Procedures, resource dimensions and search nodes are all addressed by
//! position. `TypedIndex<T>` carries the kind of position in its type, so a
//! dimension can never be passed where a procedure is expected. The wrapper
//! is `#[repr(transparent)]` over `usize`.
//!
//! ```rust
//! use theatre_core::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct ShiftTag;
//! impl TypedIndexTag for ShiftTag { const NAME: &'static str = "ShiftIndex"; }
//!
//! let shifts = ["early", "late"];
//! let late = TypedIndex::<ShiftTag>::new(1);
//! assert_eq!(late.lookup(&shifts), Some(&"late"));
//! assert_eq!(late.to_string(), "ShiftIndex(1)");
//! ```

use std::marker::PhantomData;

/// Marker for one kind of position. `NAME` is used when formatting.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A position in the sequence described by `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    position: usize,
    _tag: PhantomData<T>,
}

impl<T> TypedIndex<T> {
    #[inline(always)]
    pub const fn new(position: usize) -> Self {
        Self {
            position,
            _tag: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.position
    }

    /// All positions of a sequence of length `len`, first to last.
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }

    /// The element at this position of `items`, if it is in bounds.
    #[inline]
    pub fn lookup<'a, V>(&self, items: &'a [V]) -> Option<&'a V> {
        items.get(self.position)
    }
}

impl<T: TypedIndexTag> TypedIndex<T> {
    fn write_tagged(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.position)
    }
}

impl<T: TypedIndexTag> std::fmt::Debug for TypedIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_tagged(f)
    }
}

impl<T: TypedIndexTag> std::fmt::Display for TypedIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_tagged(f)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(position: usize) -> Self {
        Self::new(position)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(index: TypedIndex<T>) -> Self {
        index.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct BedTag;

    impl TypedIndexTag for BedTag {
        const NAME: &'static str = "BedIndex";
    }

    type BedIndex = TypedIndex<BedTag>;

    #[test]
    fn test_usize_round_trip() {
        let bed: BedIndex = 12.into();
        assert_eq!(bed.get(), 12);
        assert_eq!(usize::from(bed), 12);
    }

    #[test]
    fn test_formatting_uses_tag_name() {
        let bed = BedIndex::new(4);
        assert_eq!(bed.to_string(), "BedIndex(4)");
        assert_eq!(format!("{bed:?}"), "BedIndex(4)");
    }

    #[test]
    fn test_lookup_respects_bounds() {
        let beds = [10, 20, 30];
        assert_eq!(BedIndex::new(2).lookup(&beds), Some(&30));
        assert_eq!(BedIndex::new(3).lookup(&beds), None);
    }

    #[test]
    fn test_range_covers_every_position() {
        let positions: Vec<usize> = BedIndex::range(3).rev().map(|b| b.get()).collect();
        assert_eq!(positions, vec![2, 1, 0]);
        assert_eq!(BedIndex::range(5).len(), 5);
        assert!(BedIndex::new(1) < BedIndex::new(2));
    }
}
