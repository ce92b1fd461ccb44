mod cell_set;
mod compact_cell;
mod error;

pub use cell_set::*;
pub(crate) use compact_cell::*;
pub use error::*;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Card, Color, NUM_CARDS};

/// The board is always `BOARD_SIZE` x `BOARD_SIZE` cells.
pub const BOARD_SIZE: u8 = 7;

pub const NUM_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// The coordinates of a cell, 0-indexed. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Where the empty cell is at the start of every game.
    pub const CENTER: Coord = Coord::new(BOARD_SIZE / 2, BOARD_SIZE / 2);

    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn is_in_bounds(self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Row-major index. Only meaningful for in-bounds coordinates.
    pub(crate) fn index(self) -> usize {
        usize::from(self.y) * usize::from(BOARD_SIZE) + usize::from(self.x)
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_CELLS);
        Self {
            x: (idx % usize::from(BOARD_SIZE)) as u8,
            y: (idx / usize::from(BOARD_SIZE)) as u8,
        }
    }

    /// The neighboring cell in direction `(dx, dy)`, if it is on the board.
    pub(crate) fn step(self, dx: i8, dy: i8) -> Option<Coord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Coord { x, y }).filter(|c| c.is_in_bounds())
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A card lying on the board, together with its orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedCard {
    pub card: Card,
    pub face_up: bool,
}

/// The 7x7 grid, with exactly one empty cell and each of the 48 cards
/// exactly once.
///
/// Every `Board` value upholds this invariant, it is checked on construction.
/// The type is [`Copy`] and its methods return new boards instead of mutating,
/// so a board that was handed out can never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<PlacedCard>>>", into = "Vec<Vec<Option<PlacedCard>>>")]
pub struct Board {
    cells: [CompactCell; NUM_CELLS],
    /// Derived from `cells`.
    empty: Coord,
    /// The face-up red and black cards, derived from `cells`.
    face_up: [CellSet; 2],
}

impl Board {
    /// Creates a board from its cells in row-major order.
    pub fn new(cells: &[Option<PlacedCard>; NUM_CELLS]) -> Result<Self, InvalidBoard> {
        let mut compact_cells = [CompactCell::EMPTY; NUM_CELLS];
        let mut empty: Option<Coord> = None;
        let mut seen_cards = 0u64;

        for (idx, cell) in cells.iter().enumerate() {
            match cell {
                None => {
                    if let Some(first) = empty {
                        return Err(InvalidBoard::MultipleEmptyCells {
                            first,
                            second: Coord::from_index(idx),
                        });
                    }
                    empty = Some(Coord::from_index(idx));
                }
                Some(placed) => {
                    let bit = 1u64 << placed.card.to_index();
                    if seen_cards & bit != 0 {
                        return Err(InvalidBoard::DuplicateCard { card: placed.card });
                    }
                    seen_cards |= bit;
                    compact_cells[idx] = CompactCell::new(*placed);
                }
            }
        }

        // 49 cells with one empty and no duplicates means all 48 cards are there
        empty.ok_or(InvalidBoard::NoEmptyCell)?;
        Ok(Self::from_compact_cells(compact_cells))
    }

    /// Lays out the cards row by row, skipping the center cell, all face-up.
    pub fn from_deck(deck: &[Card; NUM_CARDS]) -> Result<Self, InvalidBoard> {
        let mut seen_cards = 0u64;
        for card in deck {
            let bit = 1u64 << card.to_index();
            if seen_cards & bit != 0 {
                return Err(InvalidBoard::DuplicateCard { card: *card });
            }
            seen_cards |= bit;
        }
        Ok(Self::layout(deck))
    }

    // The caller must pass a permutation of the deck.
    fn layout(deck: &[Card; NUM_CARDS]) -> Self {
        let mut compact_cells = [CompactCell::EMPTY; NUM_CELLS];
        let center = Coord::CENTER.index();
        let targets = (0..NUM_CELLS).filter(|&idx| idx != center);
        for (idx, &card) in targets.zip(deck.iter()) {
            compact_cells[idx] = CompactCell::new(PlacedCard {
                card,
                face_up: true,
            });
        }
        Self::from_compact_cells(compact_cells)
    }

    fn from_compact_cells(cells: [CompactCell; NUM_CELLS]) -> Self {
        let mut empty = Coord::CENTER;
        let mut face_up = [CellSet::new(); 2];
        for (idx, cell) in cells.iter().enumerate() {
            let coord = Coord::from_index(idx);
            match cell.placed_card() {
                None => empty = coord,
                Some(PlacedCard {
                    card,
                    face_up: true,
                }) => {
                    let color = card.color() as usize;
                    face_up[color] = face_up[color].insert(coord);
                }
                Some(_) => {}
            }
        }
        Self {
            cells,
            empty,
            face_up,
        }
    }

    /// The card at the given cell, or `None` for the empty cell and
    /// out-of-bounds coordinates.
    pub fn get(&self, coord: Coord) -> Option<PlacedCard> {
        if coord.is_in_bounds() {
            self.cells[coord.index()].placed_card()
        } else {
            None
        }
    }

    pub fn empty_cell(&self) -> Coord {
        self.empty
    }

    /// The cells holding face-up cards of the given color.
    pub fn face_up(&self, color: Color) -> CellSet {
        self.face_up[color as usize]
    }

    /// The cells holding face-down cards of either color.
    pub fn face_down(&self) -> CellSet {
        (!(self.face_up[0] | self.face_up[1])).remove(self.empty)
    }

    /// All cards with their location, in row-major order.
    pub fn cards(&self) -> impl Iterator<Item = (Coord, PlacedCard)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.placed_card().map(|p| (Coord::from_index(idx), p)))
    }

    pub fn to_cells(&self) -> [Option<PlacedCard>; NUM_CELLS] {
        self.cells.map(CompactCell::placed_card)
    }

    /// Slides the card at `from` into the empty cell, turning it face-down.
    ///
    /// Returns `None` if there is no card at `from`.
    #[must_use]
    pub(crate) fn slide(&self, from: Coord) -> Option<Board> {
        let placed = self.get(from)?;
        let mut cells = self.cells;
        cells[self.empty.index()] = cells[from.index()].turn_face_down();
        cells[from.index()] = CompactCell::EMPTY;

        let color = placed.card.color() as usize;
        let mut face_up = self.face_up;
        face_up[color] = face_up[color].remove(from);

        Some(Board {
            cells,
            empty: from,
            face_up,
        })
    }

    /// The packed cells, used for cache keys.
    pub(crate) fn compact_bytes(&self) -> [u8; NUM_CELLS] {
        self.cells.map(CompactCell::bits)
    }

    #[cfg(test)]
    pub(crate) fn turn_face_down(&self, coord: Coord) -> Board {
        let mut cells = self.cells;
        cells[coord.index()] = cells[coord.index()].turn_face_down();
        Self::from_compact_cells(cells)
    }
}

impl TryFrom<Vec<Vec<Option<PlacedCard>>>> for Board {
    type Error = InvalidBoard;

    fn try_from(rows: Vec<Vec<Option<PlacedCard>>>) -> Result<Self, Self::Error> {
        if rows.len() != usize::from(BOARD_SIZE) {
            return Err(InvalidBoard::WrongShape { rows: rows.len() });
        }
        let mut cells = [None; NUM_CELLS];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != usize::from(BOARD_SIZE) {
                return Err(InvalidBoard::WrongRowLength { row: y, len: row.len() });
            }
            for (x, cell) in row.iter().enumerate() {
                cells[y * usize::from(BOARD_SIZE) + x] = *cell;
            }
        }
        Board::new(&cells)
    }
}

impl From<Board> for Vec<Vec<Option<PlacedCard>>> {
    fn from(board: Board) -> Self {
        board
            .to_cells()
            .chunks(usize::from(BOARD_SIZE))
            .map(<[Option<PlacedCard>]>::to_vec)
            .collect()
    }
}

/// A board, plus whose turn it is. This is what gets searched and cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub board: Board,
    pub to_move: Color,
}

impl Position {
    pub fn new(board: Board, to_move: Color) -> Self {
        Self { board, to_move }
    }

    pub fn empty_cell(&self) -> Coord {
        self.board.empty_cell()
    }

    /// Slides the card at `destination` into the empty cell, face-down, and
    /// passes the turn.
    ///
    /// Legality is not checked, use [`Self::legal_destinations()`] for that.
    /// If there is no card at `destination` (because it is the empty cell or
    /// out of bounds), the position is returned unchanged.
    #[must_use]
    pub fn apply_move(&self, destination: Coord) -> Position {
        match self.board.slide(destination) {
            Some(board) => Position {
                board,
                to_move: self.to_move.opponent(),
            },
            None => *self,
        }
    }
}

/// Deals a new game: a shuffled board with the empty cell in the center, all
/// cards face-up and red to move.
///
/// Deals again if either player would be stuck from the start.
pub fn deal_new_game<R: Rng + ?Sized>(rng: &mut R) -> Position {
    loop {
        let mut deck = crate::DECK;
        deck.shuffle(rng);
        let board = Board::layout(&deck);
        if is_playable_deal(&board) {
            return Position::new(board, Color::Red);
        }
        debug!("Dealt a board where one player cannot move, dealing again");
    }
}

fn is_playable_deal(board: &Board) -> bool {
    board.has_any_move(Color::Red) && board.has_any_move(Color::Black)
}
