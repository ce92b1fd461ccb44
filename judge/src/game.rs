use getstuck::{deal_new_game, Color, Coord, Outcome, Scores};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WonBy(Color),
    Draw,
}

/// Summary of one finished game.
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub red: String,
    pub black: String,
    pub result: GameResult,
    pub outcome: Outcome,
    pub plies: usize,
    pub moves: Vec<Coord>,
    /// Including the end-of-game court rule.
    pub scores: Scores,
}

/// Plays one game from a fresh deal. Red moves first.
///
/// Returns an error if a player fails to return a legal move although it
/// has one.
pub fn play_game<R: Rng + ?Sized>(
    rng: &mut R,
    red: &mut Player,
    black: &mut Player,
) -> anyhow::Result<GameRecord> {
    let mut position = deal_new_game(rng);
    let mut moves = Vec::new();

    let outcome = loop {
        let outcome = position.outcome();
        if outcome.is_over() {
            break outcome;
        }
        trace!("\n{}", position);

        let player = match position.to_move {
            Color::Red => &mut *red,
            Color::Black => &mut *black,
        };
        let result = player.choose_move(&position);
        let Some(destination) = result.best_move else {
            anyhow::bail!("{} returned no move in an ongoing game", player.name);
        };
        if !position.legal_destinations().contains(&destination) {
            anyhow::bail!("{} tried the illegal move {}", player.name, destination);
        }
        debug!(
            player = &player.name,
            color = %position.to_move,
            %destination,
            score = result.score,
            depth = result.stats.depth_reached,
            "Move"
        );
        position = position.apply_move(destination);
        moves.push(destination);
    };

    let result = match outcome.winner() {
        Some(color) => GameResult::WonBy(color),
        None => GameResult::Draw,
    };
    let scores = Scores::tally(&position.board).finalise(outcome.winner());
    debug!(
        ?outcome,
        plies = moves.len(),
        red = scores.red,
        black = scores.black,
        "Game over"
    );

    Ok(GameRecord {
        red: red.name.clone(),
        black: black.name.clone(),
        result,
        outcome,
        plies: moves.len(),
        moves,
        scores,
    })
}
