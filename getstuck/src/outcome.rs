use serde::{Deserialize, Serialize};

use crate::{Board, Color, Position};

/// Whether a game is over, and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ongoing,
    /// This player has no move at all and loses.
    Stuck(Color),
    /// Neither player has a move.
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }

    /// The player who did not get stuck, if exactly one player is stuck.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Stuck(loser) => Some(loser.opponent()),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }
}

impl Board {
    /// Checks both players for moves, regardless of whose turn it is.
    ///
    /// Diagonal moves count even when the player also has orthogonal ones.
    pub fn outcome(&self) -> Outcome {
        match (self.has_any_move(Color::Red), self.has_any_move(Color::Black)) {
            (true, true) => Outcome::Ongoing,
            (false, true) => Outcome::Stuck(Color::Red),
            (true, false) => Outcome::Stuck(Color::Black),
            (false, false) => Outcome::Draw,
        }
    }
}

impl Position {
    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }
}
