use std::collections::HashMap;

use clap::Parser;
use getstuck::Color;
use itertools::Itertools;
use judge::{play_game, GameResult, Player, PlayerConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Players, each either a difficulty ("easy", "intermediate", "hard",
    /// "extreme") or the path to a player config JSON file
    #[clap(num_args(2..), value_delimiter = ' ')]
    players: Vec<String>,

    /// How many games to play per matchup
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON summary of every game to stdout
    #[arg(long, default_value_t = false)]
    json: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Default)]
struct MatchScore {
    wins: [usize; 2],
    draws: usize,
}

fn play_matchup(
    player_1: &mut Player,
    player_2: &mut Player,
    num_games: usize,
    rng: &mut StdRng,
    json: bool,
) -> anyhow::Result<MatchScore> {
    let mut match_score = MatchScore::default();

    for game_idx in 0..num_games {
        // Randomly pick who plays red, and therefore moves first
        let player_1_is_red = rng.gen::<bool>();
        let record = if player_1_is_red {
            play_game(rng, player_1, player_2)?
        } else {
            play_game(rng, player_2, player_1)?
        };
        if json {
            println!("{}", serde_json::to_string(&record)?);
        }
        match record.result {
            GameResult::WonBy(color) => {
                let player_idx = if (color == Color::Red) == player_1_is_red { 0 } else { 1 };
                let winner = if player_idx == 0 { &player_1.name } else { &player_2.name };
                debug!(winner, %color, game_idx, plies = record.plies);
                match_score.wins[player_idx] += 1;
            }
            GameResult::Draw => {
                debug!(game_idx, plies = record.plies, "Draw");
                match_score.draws += 1;
            }
        }
    }

    eprintln!(
        "End result:\n- {} wins by {}\n- {} wins by {}\n- {} draws",
        match_score.wins[0], player_1.name, match_score.wins[1], player_2.name, match_score.draws
    );

    Ok(match_score)
}

// prints an upper triangular matrix of the results of the tournament
fn print_tournament_results(
    player_configs: &[PlayerConfig],
    match_results: &HashMap<(usize, usize), MatchScore>,
) {
    println!("\nTournament results (p1 win %, p2 win %, draw %):\n");
    print!(" {:19} |", "p1 ↓           p2 →");
    for j in (0..player_configs.len()).rev() {
        print!(" {:19} |", player_configs[j].nick);
    }
    println!();
    for i in 0..player_configs.len() {
        for _ in 0..player_configs.len() - i + 1 {
            print!("---------------------|");
        }
        println!();
        print!(" {:19} |", player_configs[i].nick);
        for j in (0..player_configs.len()).rev() {
            if i >= j {
                print!("    ");
            } else if let Some(score) = match_results.get(&(i, j)) {
                let num_games = (score.wins[0] + score.wins[1] + score.draws).max(1);
                let win_1_percentage = score.wins[0] as f32 / num_games as f32 * 100.0;
                let win_2_percentage = score.wins[1] as f32 / num_games as f32 * 100.0;
                let draw_percentage = score.draws as f32 / num_games as f32 * 100.0;
                print!(
                    "{:5.1}% {:5.1}% {:5.1}% |",
                    win_1_percentage, win_2_percentage, draw_percentage
                );
            } else {
                print!(" {:19} |", "N/A");
            }
        }
        println!();
    }
    println!("---------------------|");
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let player_configs = args
        .players
        .iter()
        .map(|arg| PlayerConfig::from_arg(arg))
        .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?;

    let matchups: Vec<(usize, usize)> = (0..player_configs.len()).tuple_combinations().collect();

    let mut match_results: HashMap<(usize, usize), MatchScore> = HashMap::new();
    for (i1, i2) in matchups {
        let mut player_1 = Player::from_config(&player_configs[i1]);
        let mut player_2 = Player::from_config(&player_configs[i2]);
        info!(player_1 = player_1.name, player_2 = player_2.name, "Starting matchup");

        let match_score = play_matchup(
            &mut player_1,
            &mut player_2,
            args.num_games,
            &mut rng,
            args.json,
        )?;

        match_results.insert((i1, i2), match_score);
    }

    if player_configs.len() > 2 {
        print_tournament_results(&player_configs, &match_results);
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format().with_target(false).compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
