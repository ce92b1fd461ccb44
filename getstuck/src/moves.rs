use crate::{Board, Color, Coord, PlacedCard, Position};

/// Scan order for orthogonal moves: right, left, down, up.
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Scan order for diagonal moves.
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

impl Board {
    /// The cells from which `side` may slide a card into the empty cell.
    ///
    /// Diagonal moves are only offered when there is no orthogonal move.
    /// The order is the scan order: direction by direction, nearest cell first.
    pub fn legal_destinations(&self, side: Color) -> Vec<Coord> {
        let mut destinations = self.orthogonal_destinations(side);
        if destinations.is_empty() {
            self.scan(side, &DIAGONAL, &mut destinations);
        }
        destinations
    }

    pub fn orthogonal_destinations(&self, side: Color) -> Vec<Coord> {
        let mut destinations = Vec::new();
        self.scan(side, &ORTHOGONAL, &mut destinations);
        destinations
    }

    pub fn diagonal_destinations(&self, side: Color) -> Vec<Coord> {
        let mut destinations = Vec::new();
        self.scan(side, &DIAGONAL, &mut destinations);
        destinations
    }

    /// Does `side` have any move, orthogonal or diagonal?
    pub fn has_any_move(&self, side: Color) -> bool {
        // Both lists are non-empty iff the preferred list is.
        !self.legal_destinations(side).is_empty()
    }

    // Walks away from the empty cell along each direction.
    //
    // A face-up card of `side` is a legal source if it is a court card, or if
    // no face-down card lies between it and the empty cell. Cards further out
    // on the same ray are still considered after a blocker.
    fn scan(&self, side: Color, directions: &[(i8, i8)], destinations: &mut Vec<Coord>) {
        let own_cards = self.face_up(side);
        for &(dx, dy) in directions {
            let mut line_of_sight = true;
            let mut cursor = self.empty_cell().step(dx, dy);
            while let Some(coord) = cursor {
                if own_cards.contains(coord) {
                    if line_of_sight || self.is_court(coord) {
                        destinations.push(coord);
                    }
                } else if matches!(self.get(coord), Some(PlacedCard { face_up: false, .. })) {
                    line_of_sight = false;
                }
                cursor = coord.step(dx, dy);
            }
        }
    }

    fn is_court(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|placed| placed.card.rank.is_court())
    }
}

impl Position {
    /// The moves of the player whose turn it is, see [`Board::legal_destinations()`].
    pub fn legal_destinations(&self) -> Vec<Coord> {
        self.board.legal_destinations(self.to_move)
    }
}
