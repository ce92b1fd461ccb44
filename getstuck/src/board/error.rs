use crate::{Card, Coord};

/// The error type for constructing a [`Board`](crate::Board) from its cells.
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidBoard {
    WrongShape { rows: usize },
    WrongRowLength { row: usize, len: usize },
    NoEmptyCell,
    MultipleEmptyCells { first: Coord, second: Coord },
    DuplicateCard { card: Card },
}

impl std::error::Error for InvalidBoard {}

impl std::fmt::Display for InvalidBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidBoard::WrongShape { rows } =>
                write!(f, "The board has {} rows instead of 7", rows),
            InvalidBoard::WrongRowLength { row, len } =>
                write!(f, "Row {} of the board has {} cells instead of 7", row, len),
            InvalidBoard::NoEmptyCell =>
                write!(f, "The board has no empty cell"),
            InvalidBoard::MultipleEmptyCells { first, second } =>
                write!(f, "The board has more than one empty cell, e.g. {} and {}", first, second),
            InvalidBoard::DuplicateCard { card } =>
                write!(f, "The card {} appears more than once on the board", card),
        }
    }
}
