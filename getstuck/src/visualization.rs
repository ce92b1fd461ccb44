use crate::{Board, Coord, PlacedCard, Position, BOARD_SIZE};

/// Draws the board as a text grid.
///
/// Face-up cards are shown by their code, face-down cards as `##` and the
/// empty cell as `..`.
pub fn visualize(board: &Board) -> String {
    let mut result = String::from("    ");
    for x in 0..BOARD_SIZE {
        result += &format!(" {:>2}", x);
    }
    result += "\n    ╭";
    for _ in 0..BOARD_SIZE {
        result += "───";
    }
    result += "─╮\n";
    for y in 0..BOARD_SIZE {
        result += &format!("{:>3} │", y);
        for x in 0..BOARD_SIZE {
            match board.get(Coord::new(x, y)) {
                Some(PlacedCard {
                    card,
                    face_up: true,
                }) => result += &format!(" {}", card),
                Some(_) => result += " ##",
                None => result += " ..",
            }
        }
        result += " │\n";
    }
    result += "    ╰";
    for _ in 0..BOARD_SIZE {
        result += "───";
    }
    result += "─╯";
    result
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", visualize(self))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{} to move", visualize(&self.board), self.to_move)
    }
}
