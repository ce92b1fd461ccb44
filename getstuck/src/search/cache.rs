use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::{Color, Coord, Position, NUM_CELLS};

/// Everything that distinguishes two searched nodes.
///
/// The maximizing flag is part of the key because the same position is
/// scored differently depending on who the maximizing player is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    cells: [u8; NUM_CELLS],
    empty: Coord,
    to_move: Color,
    maximizing: bool,
}

impl PositionKey {
    pub fn new(position: &Position, maximizing: bool) -> Self {
        Self {
            cells: position.board.compact_bytes(),
            empty: position.empty_cell(),
            to_move: position.to_move,
            maximizing,
        }
    }
}

/// How a cached score relates to the true minimax value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least the score (the search failed high).
    Lower,
    /// The true value is at most the score (the search failed low).
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    /// Remaining search depth when this entry was stored.
    pub depth: u8,
    pub bound: Bound,
    pub best_move: Option<Coord>,
}

impl CacheEntry {
    /// Can this entry stand in for a search of `depth` plies within the
    /// window `(alpha, beta)`?
    pub fn is_usable(&self, depth: u8, alpha: i32, beta: i32) -> bool {
        self.depth >= depth
            && match self.bound {
                Bound::Exact => true,
                Bound::Lower => self.score >= beta,
                Bound::Upper => self.score <= alpha,
            }
    }
}

/// Memoized search results with a fixed capacity.
///
/// When full, storing a new position evicts the least recently used one.
/// Both lookups and stores count as a use.
#[derive(Debug)]
pub struct SearchCache {
    capacity: usize,
    entries: HashMap<PositionKey, (CacheEntry, u64)>,
    /// Last use of every key, oldest first.
    recency: BTreeMap<u64, PositionKey>,
    clock: u64,
}

impl SearchCache {
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            // Don't reserve the full capacity up front, it may be large
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    pub fn get(&mut self, key: &PositionKey) -> Option<CacheEntry> {
        let now = self.tick();
        let (entry, last_used) = self.entries.get_mut(key)?;
        self.recency.remove(last_used);
        *last_used = now;
        self.recency.insert(now, *key);
        Some(*entry)
    }

    /// Stores an entry, unless an entry from a deeper search is already there.
    pub fn insert(&mut self, key: PositionKey, entry: CacheEntry) {
        let now = self.tick();
        if let Some((existing, last_used)) = self.entries.get_mut(&key) {
            if entry.depth >= existing.depth {
                *existing = entry;
            }
            self.recency.remove(last_used);
            *last_used = now;
            self.recency.insert(now, key);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some((_, oldest)) = self.recency.pop_first() {
                self.entries.remove(&oldest);
                trace!(capacity = self.capacity, "Evicted least recently used cache entry");
            }
        }
        self.entries.insert(key, (entry, now));
        self.recency.insert(now, key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::ordered_board;

    fn entry(score: i32, depth: u8) -> CacheEntry {
        CacheEntry {
            score,
            depth,
            bound: Bound::Exact,
            best_move: None,
        }
    }

    fn keys() -> [PositionKey; 3] {
        let position = Position::new(ordered_board(), Color::Red);
        [
            PositionKey::new(&position, true),
            PositionKey::new(&position, false),
            PositionKey::new(&position.apply_move(Coord::new(2, 3)), true),
        ]
    }

    #[test]
    fn key_distinguishes_perspective_and_side() {
        let board = ordered_board();
        let red = Position::new(board, Color::Red);
        let black = Position::new(board, Color::Black);
        assert_ne!(PositionKey::new(&red, true), PositionKey::new(&red, false));
        assert_ne!(PositionKey::new(&red, true), PositionKey::new(&black, true));
        assert_eq!(PositionKey::new(&red, true), PositionKey::new(&red, true));
    }

    #[test]
    fn evicts_least_recently_used() {
        let [a, b, c] = keys();
        let mut cache = SearchCache::with_capacity(2);
        cache.insert(a, entry(1, 1));
        cache.insert(b, entry(2, 1));
        // Touch a, so that b is the oldest
        assert_eq!(cache.get(&a), Some(entry(1, 1)));
        cache.insert(c, entry(3, 1));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&b), None);
        assert_eq!(cache.get(&a), Some(entry(1, 1)));
        assert_eq!(cache.get(&c), Some(entry(3, 1)));
    }

    #[test]
    fn deeper_entries_are_kept() {
        let [a, _, _] = keys();
        let mut cache = SearchCache::with_capacity(4);
        cache.insert(a, entry(5, 3));
        cache.insert(a, entry(7, 2));
        assert_eq!(cache.get(&a), Some(entry(5, 3)));
        cache.insert(a, entry(9, 3));
        assert_eq!(cache.get(&a), Some(entry(9, 3)));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn bounds_decide_usability() {
        let lower = CacheEntry {
            bound: Bound::Lower,
            ..entry(10, 2)
        };
        assert!(lower.is_usable(2, 0, 10));
        assert!(!lower.is_usable(2, 0, 11));
        assert!(!lower.is_usable(3, 0, 10));

        let upper = CacheEntry {
            bound: Bound::Upper,
            ..entry(3, 2)
        };
        assert!(upper.is_usable(1, 3, 20));
        assert!(!upper.is_usable(1, 2, 20));

        assert!(entry(3, 2).is_usable(2, i32::MIN, i32::MAX));
    }
}
