//! The state of a game in progress

use tracing::debug;

use crate::board::{Board, Position, Token};
use crate::persist::SavedGame;
use crate::player::{check_players, Player};
use crate::{win, GameError, LoadError, MoveError};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Won(Token),
    Draw,
}

impl GameState {
    pub fn of(board: &Board) -> Self {
        match win::winner(board) {
            Some(token) => GameState::Won(token),
            None if board.is_full() => GameState::Draw,
            None => GameState::Playing,
        }
    }
}

/// A board together with the two players and whose turn it is
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    players: [Player; 2],
    // index into `players` of the side to move
    turn: usize,
    state: GameState,
}

impl Game {
    /// Starts a new game on an empty board, the first player moves first
    pub fn new(players: [Player; 2]) -> Result<Self, GameError> {
        check_players(&players)?;
        Ok(Self {
            board: Board::new(),
            players,
            turn: 0,
            state: GameState::Playing,
        })
    }

    /// Resumes a saved game
    pub fn from_saved(saved: SavedGame) -> Result<Self, LoadError> {
        let SavedGame {
            players,
            turn,
            board,
        } = saved;

        let registry = check_players(&players)?;
        let turn = players
            .iter()
            .position(|player| player.token == turn)
            .ok_or(LoadError::UnknownTurn(turn.value()))?;
        for (row, cells) in board.rows().iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                if let Some(token) = cell.token() {
                    if !registry.is_claimed(token) {
                        return Err(LoadError::UnknownToken {
                            row,
                            column,
                            value: token.value(),
                        });
                    }
                }
            }
        }

        let state = GameState::of(&board);
        Ok(Self {
            board,
            players,
            turn,
            state,
        })
    }

    pub fn to_saved(&self) -> SavedGame {
        SavedGame {
            players: self.players.clone(),
            turn: self.current().token,
            board: self.board.clone(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The player to move
    pub fn current(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn opponent(&self) -> &Player {
        &self.players[1 - self.turn]
    }

    /// The player owning `token`
    pub fn player(&self, token: Token) -> Option<&Player> {
        self.players.iter().find(|player| player.token == token)
    }

    /// The winning player, if the game has been won
    pub fn winner(&self) -> Option<&Player> {
        match self.state {
            GameState::Won(token) => self.player(token),
            _ => None,
        }
    }

    /// Plays the current player's token in `column` (zero-indexed)
    ///
    /// Illegal moves are rejected without touching the board.
    pub fn play_checked(&mut self, column: usize) -> Result<GameState, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::InvalidMove {
                column,
                reason: MoveError::GameOver,
            });
        }
        let token = self.current().token;
        let row = self.board.apply(column, token)?;
        debug!(token = token.value(), row, column, "move played");

        self.state = GameState::of(&self.board);
        self.turn = 1 - self.turn;
        Ok(self.state)
    }

    /// The move a scripted current player would make, with its search value
    pub fn engine_move(&self) -> Option<(Position, i32)> {
        if self.state != GameState::Playing {
            return None;
        }
        self.current().choose_move(&self.board, self.opponent().token)
    }
}
