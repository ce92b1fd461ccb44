use std::fmt::{self, Debug};
use std::iter::FusedIterator;

use crate::bitset::bitset_traits;
use crate::{Coord, NUM_CELLS};

const VALID_BITS: u64 = (1u64 << NUM_CELLS) - 1;

/// A [`Copy`] set of board cells that stores a single bit per cell.
///
/// The board keeps one of these per color for its face-up cards, so that
/// counting and membership tests don't have to decode cells.
///
/// Note that its "mutating" methods return a new object instead of really mutating.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSet {
    /// Bit `y * 7 + x` is set iff the cell `(x, y)` is in the set.
    bits: u64,
}

bitset_traits!(CellSet, VALID_BITS);

impl CellSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Out-of-bounds coordinates are ignored.
    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, coord: Coord) -> Self {
        if !coord.is_in_bounds() {
            return self;
        }
        Self {
            bits: self.bits | (1u64 << coord.index()),
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, coord: Coord) -> Self {
        if !coord.is_in_bounds() {
            return self;
        }
        Self {
            bits: self.bits & !(1u64 << coord.index()),
        }
    }

    pub fn contains(self, coord: Coord) -> bool {
        coord.is_in_bounds() && self.bits & (1u64 << coord.index()) != 0
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl FromIterator<Coord> for CellSet {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), CellSet::insert)
    }
}

impl IntoIterator for CellSet {
    type Item = Coord;

    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CellSetIter { bits: self.bits }
    }
}

/// Yields the cells of a [`CellSet`] in row-major order.
pub struct CellSetIter {
    bits: u64,
}

impl Iterator for CellSetIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(Coord::from_index(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for CellSetIter {}

impl FusedIterator for CellSetIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_iterate() {
        let set = CellSet::new()
            .insert(Coord::new(6, 6))
            .insert(Coord::new(0, 0))
            .insert(Coord::new(3, 1))
            .insert(Coord::new(7, 0));
        assert_eq!(set.len(), 3);
        assert!(set.contains(Coord::new(3, 1)));
        assert!(!set.contains(Coord::new(7, 0)));
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![Coord::new(0, 0), Coord::new(3, 1), Coord::new(6, 6)]
        );
        let set = set.remove(Coord::new(0, 0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn complement_stays_on_the_board() {
        let all = !CellSet::new();
        assert_eq!(all.len() as usize, NUM_CELLS);
        assert_eq!((all ^ all.remove(Coord::CENTER)).len(), 1);
    }
}
