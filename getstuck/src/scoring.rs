use serde::{Deserialize, Serialize};

use crate::{Board, Color, PlacedCard};

/// What a court card is worth in the running total.
pub const COURT_VALUE: i32 = 10;

/// The face-up cards of one player, split into numerals and courts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Sum of the face-up numeral values, with the ace counting 1.
    pub numerals: i32,
    /// Number of face-up jacks, queens and kings.
    pub courts: i32,
}

/// The score display for both players.
///
/// This is separate from the search's [`static_score`](crate::static_score).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub red: i32,
    pub black: i32,
    pub red_breakdown: ScoreBreakdown,
    pub black_breakdown: ScoreBreakdown,
}

impl ScoreBreakdown {
    fn total(self, court_value: i32) -> i32 {
        self.numerals + self.courts * court_value
    }
}

impl Scores {
    /// The running tally during a game. Face-down cards don't count.
    pub fn tally(board: &Board) -> Self {
        let mut breakdowns = [ScoreBreakdown::default(); 2];
        for (_, placed) in board.cards() {
            let PlacedCard { card, face_up } = placed;
            if !face_up {
                continue;
            }
            let breakdown = &mut breakdowns[card.color() as usize];
            if card.rank.is_court() {
                breakdown.courts += 1;
            } else {
                breakdown.numerals += i32::from(card.rank.value());
            }
        }
        let [red_breakdown, black_breakdown] = breakdowns;
        Self {
            red: red_breakdown.total(COURT_VALUE),
            black: black_breakdown.total(COURT_VALUE),
            red_breakdown,
            black_breakdown,
        }
    }

    /// Applies the end-of-game court rule.
    ///
    /// The winner's face-up courts add 10 each, the loser's subtract 10 each.
    /// After a draw (`None`) both keep the running tally.
    #[must_use]
    pub fn finalise(self, winner: Option<Color>) -> Self {
        let court_value = |color: Color| match winner {
            Some(w) if w != color => -COURT_VALUE,
            _ => COURT_VALUE,
        };
        Self {
            red: self.red_breakdown.total(court_value(Color::Red)),
            black: self.black_breakdown.total(court_value(Color::Black)),
            ..self
        }
    }

    pub fn get(&self, color: Color) -> i32 {
        match color {
            Color::Red => self.red,
            Color::Black => self.black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::ordered_board;
    use crate::Coord;

    // Per suit: A..9 sum to 45, plus three courts
    const FULL_SUITS: ScoreBreakdown = ScoreBreakdown {
        numerals: 90,
        courts: 6,
    };

    #[test]
    fn tally_of_a_fresh_board() {
        let scores = Scores::tally(&ordered_board());
        assert_eq!(scores.red_breakdown, FULL_SUITS);
        assert_eq!(scores.black_breakdown, FULL_SUITS);
        assert_eq!(scores.red, 150);
        assert_eq!(scores.black, 150);
    }

    #[test]
    fn face_down_cards_are_ignored() {
        // A♥ and K♠
        let board = ordered_board()
            .turn_face_down(Coord::new(0, 0))
            .turn_face_down(Coord::new(6, 6));
        let scores = Scores::tally(&board);
        assert_eq!(scores.red, 149);
        assert_eq!(scores.black, 140);
        assert_eq!(scores.black_breakdown.courts, 5);
    }

    #[test]
    fn court_rule_at_the_end() {
        let scores = Scores::tally(&ordered_board());
        let red_won = scores.finalise(Some(Color::Red));
        assert_eq!(red_won.red, 150);
        assert_eq!(red_won.black, 30);
        assert_eq!(red_won.get(Color::Black), 30);
        assert_eq!(red_won.black_breakdown, FULL_SUITS);

        assert_eq!(scores.finalise(None), scores);
    }
}
