use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{deal_new_game, Board, Card, Coord, Position, Rank, Suit, DECK};

/// Moves played from a fresh deal to get an arbitrary position.
const MAX_RANDOM_MOVES: usize = 40;

impl Arbitrary for Suit {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Suit::ALL).unwrap()
    }
}

impl Arbitrary for Rank {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Rank::ALL).unwrap()
    }
}

impl Arbitrary for Card {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            rank: Rank::arbitrary(g),
            suit: Suit::arbitrary(g),
        }
    }
}

/// A seeded deal followed by random legal moves. May be a finished game.
impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
        let mut position = deal_new_game(&mut rng);
        let num_moves = usize::arbitrary(g) % (MAX_RANDOM_MOVES + 1);
        for _ in 0..num_moves {
            let destinations = position.legal_destinations();
            match g.choose(&destinations) {
                Some(&dest) => position = position.apply_move(dest),
                None => break,
            }
        }
        position
    }
}

/// A position and a small search depth.
#[derive(Clone, Debug)]
pub(crate) struct SearchCase {
    pub position: Position,
    pub depth: u8,
}

impl Arbitrary for SearchCase {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            position: Position::arbitrary(g),
            depth: 1 + u8::arbitrary(g) % 3,
        }
    }
}

/// The unshuffled deck laid out row by row around the empty center.
pub(crate) fn ordered_board() -> Board {
    Board::from_deck(&DECK).unwrap()
}

/// Turns every card face-down that lies on a line through the empty cell,
/// except the ones at `keep`.
pub(crate) fn block_rays_except(board: Board, keep: &[Coord]) -> Board {
    let empty = board.empty_cell();
    let mut result = board;
    for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1), (1, -1), (-1, -1)] {
        let mut cursor = empty.step(dx, dy);
        while let Some(coord) = cursor {
            if !keep.contains(&coord) {
                result = result.turn_face_down(coord);
            }
            cursor = coord.step(dx, dy);
        }
    }
    result
}
