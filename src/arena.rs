//! Engine-versus-engine matches between two search depths

use indicatif::ProgressBar;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::board::Token;
use crate::game::{Game, GameState};
use crate::movegen::legal_moves;
use crate::player::{Player, PlayerKind, SearchConfig};
use crate::GameError;

#[derive(Copy, Clone, Debug)]
pub struct ArenaConfig {
    /// Search depth of the side moving first
    pub first_depth: u32,
    /// Search depth of the side moving second
    pub second_depth: u32,
    pub games: usize,
    /// Random plies played before the engines take over
    pub opening_moves: usize,
    pub seed: u64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaResults {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl ArenaResults {
    pub fn total(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }

    /// Tallies a finished game, wins go to the side that moved first or second
    pub fn record(&mut self, game: &Game) {
        match game.state() {
            GameState::Won(token) if token == game.players()[0].token => self.first_wins += 1,
            GameState::Won(_) => self.second_wins += 1,
            _ => self.draws += 1,
        }
    }
}

fn engine_player(name: &str, value: i32, depth: u32, seed: u64) -> Result<Player, GameError> {
    Ok(Player {
        name: format!("{} (depth {})", name, depth),
        token: Token::new(value)?,
        kind: PlayerKind::Scripted(SearchConfig {
            depth,
            random_fallback: Some(seed),
        }),
    })
}

/// Plays one game of the match, the outcome only depends on the config and `index`
pub fn play_game(config: &ArenaConfig, index: usize) -> Result<Game, GameError> {
    let seed = config.seed.wrapping_add(index as u64);
    let mut game = Game::new([
        engine_player("first", 1, config.first_depth, seed)?,
        engine_player("second", -1, config.second_depth, seed)?,
    ])?;

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..config.opening_moves {
        if game.state() != GameState::Playing {
            break;
        }
        let moves = legal_moves(game.board());
        if let Some(position) = moves.as_slice().choose(&mut rng) {
            game.play_checked(position.column)?;
        }
    }

    while game.state() == GameState::Playing {
        match game.engine_move() {
            Some((position, _)) => {
                game.play_checked(position.column)?;
            }
            None => break,
        }
    }
    Ok(game)
}

/// Plays `config.games` games in parallel and tallies the outcomes
pub fn run(config: &ArenaConfig, progress: &ProgressBar) -> Result<ArenaResults, GameError> {
    info!(
        first_depth = config.first_depth,
        second_depth = config.second_depth,
        games = config.games,
        "starting arena"
    );

    let games = (0..config.games)
        .into_par_iter()
        .map(|index| {
            let outcome = play_game(config, index);
            progress.inc(1);
            outcome
        })
        .collect::<Result<Vec<Game>, GameError>>()?;
    progress.finish_and_clear();

    let mut results = ArenaResults::default();
    for game in games.iter() {
        results.record(game);
    }

    info!(
        first_wins = results.first_wins,
        second_wins = results.second_wins,
        draws = results.draws,
        "arena finished"
    );
    Ok(results)
}
