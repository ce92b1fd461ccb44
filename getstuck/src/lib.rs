pub use board::*;
pub use cards::*;
pub use eval::*;
pub use outcome::*;
pub use scoring::*;
pub use search::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod cards;
mod eval;
mod moves;
mod outcome;
mod scoring;
mod search;
mod visualization;
