//! Players and token assignment

use crate::board::{Board, Position, Token};
use crate::error::{NameError, TokenError};
use crate::history::TIE;
use crate::search::SearchEngine;
use crate::{GameError, DEFAULT_DEPTH};

/// The name under which a machine-controlled player is saved
pub const AI_NAME: &str = "AI";

/// Checks that a human may play under `name`
///
/// `AI` marks the machine player in save files and `Tie` tallies drawn
/// games in the history, so neither can name a human.
pub fn check_name(name: &str) -> Result<(), GameError> {
    let reason = if name.is_empty() {
        NameError::Empty
    } else if name.contains(':') {
        NameError::Separator
    } else if name == AI_NAME || name == TIE {
        NameError::Reserved
    } else {
        return Ok(());
    };
    Err(GameError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Settings of a machine-controlled player
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchConfig {
    /// Plies searched below the current position
    pub depth: u32,
    /// Seed for picking a random fallback move, `None` falls back to the first legal move
    pub random_fallback: Option<u64>,
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            random_fallback: None,
        }
    }

    /// Builds the engine playing `own` against `opponent` on the given ply
    pub fn engine(&self, own: Token, opponent: Token, ply: usize) -> SearchEngine {
        let engine = SearchEngine::new(own, opponent);
        match self.random_fallback {
            // vary the stream from one move to the next
            Some(seed) => engine.with_random_fallback(seed.wrapping_add(ply as u64)),
            None => engine,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PlayerKind {
    Human,
    Scripted(SearchConfig),
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Player {
    pub name: String,
    pub token: Token,
    pub kind: PlayerKind,
}

impl Player {
    pub fn human<S: Into<String>>(name: S, token: Token) -> Self {
        Self {
            name: name.into(),
            token,
            kind: PlayerKind::Human,
        }
    }

    pub fn scripted(token: Token, config: SearchConfig) -> Self {
        Self {
            name: AI_NAME.to_string(),
            token,
            kind: PlayerKind::Scripted(config),
        }
    }

    pub fn is_scripted(&self) -> bool {
        match self.kind {
            PlayerKind::Scripted(_) => true,
            PlayerKind::Human => false,
        }
    }

    /// Asks a scripted player for its move against `opponent`
    ///
    /// Returns `None` for human players and for boards with no move to make
    pub fn choose_move(&self, board: &Board, opponent: Token) -> Option<(Position, i32)> {
        match self.kind {
            PlayerKind::Human => None,
            PlayerKind::Scripted(config) => {
                let mut engine = config.engine(self.token, opponent, board.num_moves());
                let (best_move, value) = engine.best_move(board, config.depth, true);
                best_move.map(|position| (position, value))
            }
        }
    }
}

/// The tokens handed out so far during one game setup
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    claimed: Vec<Token>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `value` as a token, rejecting 0 and values already claimed
    pub fn claim(&mut self, value: i32) -> Result<Token, GameError> {
        let token = Token::new(value)?;
        if self.is_claimed(token) {
            return Err(GameError::InvalidToken {
                value,
                reason: TokenError::Taken,
            });
        }
        self.claimed.push(token);
        Ok(token)
    }

    pub fn is_claimed(&self, token: Token) -> bool {
        self.claimed.contains(&token)
    }
}

/// Validates the two players of a game: distinct tokens and usable human names
pub(crate) fn check_players(players: &[Player; 2]) -> Result<TokenRegistry, GameError> {
    let mut registry = TokenRegistry::new();
    for player in players.iter() {
        if let PlayerKind::Human = player.kind {
            check_name(&player.name)?;
        }
        registry.claim(player.token.value())?;
    }
    Ok(registry)
}
