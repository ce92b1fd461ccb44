//! Depth-limited minimax with alpha-beta pruning, memoization and optional
//! iterative deepening under a time budget.
//!
//! ```
//! use getstuck::{deal_new_game, Engine, SearchConfig};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let position = deal_new_game(&mut rng);
//! let mut engine = Engine::new(SearchConfig::default());
//! let result = engine.best_move(&position, 3);
//! assert!(position.legal_destinations().contains(&result.best_move.unwrap()));
//! ```

mod cache;

pub use cache::*;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{static_score, Coord, Position};

/// When to search by iterative deepening instead of a single fixed-depth
/// search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deepening {
    Never,
    Always,
    /// Only for depth budgets strictly greater than `threshold`.
    AboveDepth { threshold: u8 },
}

impl Deepening {
    pub fn applies_to(self, depth: u8) -> bool {
        match self {
            Deepening::Never => false,
            Deepening::Always => depth > 0,
            Deepening::AboveDepth { threshold } => depth > threshold,
        }
    }
}

impl Default for Deepening {
    fn default() -> Self {
        Deepening::AboveDepth { threshold: 8 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub deepening: Deepening,
    /// Checked between iterative deepening depths only. A depth that has
    /// started always runs to completion.
    pub time_budget_ms: u64,
    /// Maximum number of memoized positions.
    pub cache_capacity: usize,
    /// Switching this off gives a plain minimax that examines every child.
    pub alpha_beta: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            deepening: Deepening::default(),
            time_budget_ms: 2000,
            cache_capacity: 1 << 20,
            alpha_beta: true,
        }
    }
}

impl SearchConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Diagnostics of one call to [`Engine::best_move()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// The deepest completed search.
    pub depth_reached: u8,
    /// Leaves scored by the evaluator.
    ///
    /// Nodes answered from the cache are not included, they are counted in
    /// `cache_hits` instead. Add both to get every node whose value was
    /// settled without expanding children.
    pub nodes_evaluated: u64,
    /// Alpha-beta cutoffs.
    pub pruned: u64,
    /// Nodes answered from the cache.
    pub cache_hits: u64,
    pub chosen_move: Option<Coord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// `None` if the player to move has no move.
    pub best_move: Option<Coord>,
    pub score: i32,
    pub stats: SearchStats,
}

/// The search engine. It owns its cache, which persists across searches.
pub struct Engine {
    config: SearchConfig,
    cache: SearchCache,
    stats: SearchStats,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            cache: SearchCache::with_capacity(config.cache_capacity),
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The counters accumulated since the last call to [`Self::best_move()`].
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Finds the best move for the player to move, looking `depth` plies ahead.
    ///
    /// Depending on [`SearchConfig::deepening`], this is either one
    /// fixed-depth search, or searches of depth 1, 2, ... until `depth` is
    /// reached or the time budget is used up. In the latter case, the result
    /// and the counters cover all completed depths.
    pub fn best_move(&mut self, position: &Position, depth: u8) -> SearchResult {
        self.stats = SearchStats::default();
        let (best_move, score) = if self.config.deepening.applies_to(depth) {
            self.deepen(position, depth)
        } else {
            self.stats.depth_reached = depth;
            self.search(position, depth, true)
        };
        self.stats.chosen_move = best_move;
        debug!(
            depth = self.stats.depth_reached,
            nodes_evaluated = self.stats.nodes_evaluated,
            pruned = self.stats.pruned,
            cache_hits = self.stats.cache_hits,
            score,
            "Search finished"
        );
        SearchResult {
            best_move,
            score,
            stats: self.stats,
        }
    }

    /// A single minimax search of `depth` plies with the full window.
    ///
    /// At a maximizing node the player to move is the maximizing player, at a
    /// minimizing node it is their opponent. Leaves are always scored from
    /// the maximizing player's point of view.
    pub fn search(
        &mut self,
        position: &Position,
        depth: u8,
        maximizing: bool,
    ) -> (Option<Coord>, i32) {
        self.minimax(position, depth, maximizing, i32::MIN, i32::MAX)
    }

    fn deepen(&mut self, position: &Position, max_depth: u8) -> (Option<Coord>, i32) {
        let start = Instant::now();
        let budget = self.config.time_budget();
        let mut best = (None, static_score(&position.board, position.to_move));
        for depth in 1..=max_depth {
            best = self.search(position, depth, true);
            self.stats.depth_reached = depth;
            debug!(depth, best_move = ?best.0, score = best.1, "Completed depth");
            if start.elapsed() > budget {
                debug!(depth, max_depth, "Time budget exceeded");
                break;
            }
        }
        best
    }

    fn minimax(
        &mut self,
        position: &Position,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<Coord>, i32) {
        if !self.config.alpha_beta {
            // Without pruning every node sees the full window, so all values are exact
            alpha = i32::MIN;
            beta = i32::MAX;
        }

        let key = PositionKey::new(position, maximizing);
        if let Some(entry) = self.cache.get(&key) {
            if entry.is_usable(depth, alpha, beta) {
                self.stats.cache_hits += 1;
                return (entry.best_move, entry.score);
            }
        }

        let moves = position.legal_destinations();
        if depth == 0 || moves.is_empty() {
            self.stats.nodes_evaluated += 1;
            let perspective = if maximizing {
                position.to_move
            } else {
                position.to_move.opponent()
            };
            let score = static_score(&position.board, perspective);
            self.cache.insert(
                key,
                CacheEntry {
                    score,
                    depth,
                    bound: Bound::Exact,
                    best_move: None,
                },
            );
            return (None, score);
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best_move = moves[0];
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        for destination in moves {
            let child = position.apply_move(destination);
            let (_, score) = self.minimax(&child, depth - 1, !maximizing, alpha, beta);
            // Strict comparisons keep the first of several equally good moves
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = destination;
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = destination;
                }
                beta = beta.min(best_score);
            }
            if self.config.alpha_beta && beta <= alpha {
                self.stats.pruned += 1;
                break;
            }
        }

        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.insert(
            key,
            CacheEntry {
                score: best_score,
                depth,
                bound,
                best_move: Some(best_move),
            },
        );
        (Some(best_move), best_score)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::{block_rays_except, ordered_board, SearchCase};
    use crate::Color;

    fn fixed_depth(alpha_beta: bool) -> SearchConfig {
        SearchConfig {
            deepening: Deepening::Never,
            alpha_beta,
            ..SearchConfig::default()
        }
    }

    fn iterative(time_budget_ms: u64) -> SearchConfig {
        SearchConfig {
            deepening: Deepening::Always,
            time_budget_ms,
            ..SearchConfig::default()
        }
    }

    quickcheck! {
        fn pruning_does_not_change_the_result(case: SearchCase) -> bool {
            let pruned = Engine::new(fixed_depth(true)).best_move(&case.position, case.depth);
            let exhaustive = Engine::new(fixed_depth(false)).best_move(&case.position, case.depth);
            pruned.best_move == exhaustive.best_move
                && pruned.score == exhaustive.score
                && exhaustive.stats.pruned == 0
        }

        fn warm_cache_gives_the_cold_result(case: SearchCase) -> bool {
            let cold = Engine::new(fixed_depth(true)).best_move(&case.position, case.depth);
            let mut engine = Engine::new(fixed_depth(true));
            engine.best_move(&case.position, case.depth);
            let warm = engine.best_move(&case.position, case.depth);
            warm.best_move == cold.best_move && warm.score == cold.score
        }

        fn best_move_is_legal(case: SearchCase) -> bool {
            let result = Engine::new(SearchConfig::default()).best_move(&case.position, case.depth);
            let legal = case.position.legal_destinations();
            match result.best_move {
                Some(dest) => legal.contains(&dest),
                None => legal.is_empty(),
            }
        }
    }

    #[test]
    fn single_move_returns_it_with_the_leaf_score() {
        // K♦ is the only card red can move
        let board = block_rays_except(ordered_board(), &[Coord::new(2, 3)]);
        let position = Position::new(board, Color::Red);
        assert_eq!(position.legal_destinations(), vec![Coord::new(2, 3)]);

        let result = Engine::new(fixed_depth(true)).best_move(&position, 1);
        let child = position.apply_move(Coord::new(2, 3));
        assert_eq!(result.best_move, Some(Coord::new(2, 3)));
        assert_eq!(result.score, static_score(&child.board, Color::Red));
        assert_eq!(result.stats.nodes_evaluated, 1);
        assert_eq!(result.stats.chosen_move, Some(Coord::new(2, 3)));
    }

    #[test]
    fn no_move_means_static_score() {
        let position = Position::new(block_rays_except(ordered_board(), &[]), Color::Black);
        let result = Engine::new(fixed_depth(true)).best_move(&position, 4);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, static_score(&position.board, Color::Black));
    }

    #[test]
    fn depth_zero_scores_the_root() {
        let position = Position::new(ordered_board(), Color::Red);
        let result = Engine::new(iterative(10_000)).best_move(&position, 0);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 24);
        assert_eq!(result.stats.depth_reached, 0);
    }

    #[test]
    fn first_of_equal_moves_wins() {
        // At depth 1 every red move loses exactly one red face-up card
        let position = Position::new(ordered_board(), Color::Red);
        let result = Engine::new(fixed_depth(true)).best_move(&position, 1);
        assert_eq!(result.best_move, Some(Coord::new(2, 3)));
        assert_eq!(result.score, 23);
    }

    #[test]
    fn minimizing_root_scores_for_the_opponent() {
        let position = Position::new(ordered_board(), Color::Red);
        let mut engine = Engine::new(fixed_depth(true));
        let (best_move, score) = engine.search(&position, 1, false);
        // Black maximizes, red's moves don't touch black cards
        assert_eq!(best_move, Some(Coord::new(2, 3)));
        assert_eq!(score, 24);
    }

    #[test]
    fn iterative_deepening_runs_to_the_depth_budget() {
        let position = Position::new(ordered_board(), Color::Red);
        let mut engine = Engine::new(iterative(60_000));
        let result = engine.best_move(&position, 4);
        assert_eq!(result.stats.depth_reached, 4);

        let fixed = Engine::new(fixed_depth(true)).best_move(&position, 4);
        assert_eq!(result.best_move, fixed.best_move);
        assert_eq!(result.score, fixed.score);
    }

    #[test]
    fn iterative_deepening_counts_every_depth() {
        let position = Position::new(ordered_board(), Color::Red);
        let result = Engine::new(iterative(60_000)).best_move(&position, 3);

        let (mut nodes, mut pruned) = (0, 0);
        for depth in 1..=3 {
            let fixed = Engine::new(fixed_depth(true)).best_move(&position, depth);
            nodes += fixed.stats.nodes_evaluated;
            pruned += fixed.stats.pruned;
        }
        assert_eq!(result.stats.nodes_evaluated, nodes);
        assert_eq!(result.stats.pruned, pruned);
    }

    #[test]
    fn exhausted_budget_stops_after_a_completed_depth() {
        let position = Position::new(ordered_board(), Color::Red);
        let mut engine = Engine::new(SearchConfig {
            deepening: Deepening::AboveDepth { threshold: 2 },
            time_budget_ms: 0,
            ..SearchConfig::default()
        });
        let result = engine.best_move(&position, 6);
        // Depth 1 always completes, even with no time at all
        assert!(result.stats.depth_reached >= 1);
        assert!(result.stats.depth_reached < 6);
        assert!(result.best_move.is_some());

        // At or below the threshold there is no time budget
        let result = engine.best_move(&position, 2);
        assert_eq!(result.stats.depth_reached, 2);
    }

    #[test]
    fn counters_reset_per_search() {
        let position = Position::new(ordered_board(), Color::Red);
        let mut engine = Engine::new(fixed_depth(true));
        let first = engine.best_move(&position, 2);
        assert!(first.stats.nodes_evaluated > 0);
        let second = engine.best_move(&position, 2);
        assert_eq!(second.stats.nodes_evaluated, 0);
        assert_eq!(second.stats.cache_hits, 1);
        assert_eq!(engine.stats(), second.stats);
    }

    #[test]
    fn cache_stays_within_capacity() {
        let position = Position::new(ordered_board(), Color::Red);
        let mut engine = Engine::new(SearchConfig {
            cache_capacity: 16,
            ..fixed_depth(true)
        });
        let bounded = engine.best_move(&position, 3);
        assert!(engine.cache().len() <= 16);

        let unbounded = Engine::new(fixed_depth(true)).best_move(&position, 3);
        assert_eq!(bounded.best_move, unbounded.best_move);
        assert_eq!(bounded.score, unbounded.score);

        engine.clear_cache();
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn config_from_json() {
        let json = r#"{
            "deepening": {"kind": "above_depth", "threshold": 5},
            "time_budget_ms": 100
        }"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.deepening, Deepening::AboveDepth { threshold: 5 });
        assert_eq!(config.time_budget(), Duration::from_millis(100));
        assert_eq!(config.cache_capacity, SearchConfig::default().cache_capacity);
        assert!(config.alpha_beta);
        assert!(!Deepening::default().applies_to(8));
        assert!(Deepening::default().applies_to(9));
    }
}
