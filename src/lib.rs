//! A depth-limited minimax agent for playing the board game 'Connect 4'
//!
//! The agent explores the game tree to a fixed depth with alpha-beta
//! pruning and scores the leaves with a window-counting heuristic.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{board::{Board, Token}, search::SearchEngine, WIN_VALUE};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let (ai, human) = (Token::new(1)?, Token::new(-1)?);
//! let mut board = Board::new();
//! for column in 0..3 {
//!     board.apply(column, ai)?;
//! }
//!
//! let mut engine = SearchEngine::new(ai, human);
//! let (best_move, value) = engine.best_move(&board, 3, true);
//!
//! assert_eq!(best_move.map(|p| p.column), Some(3));
//! assert_eq!(value, WIN_VALUE);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod movegen;

pub mod win;

pub mod heuristic;

pub mod search;

pub mod player;

pub mod game;

pub mod persist;

pub mod history;

pub mod arena;

mod test;

pub use error::{GameError, LoadError, MoveError, NameError};

/// The number of rows on the game board, row 0 is the top row
pub const ROWS: usize = 6;

/// The number of columns on the game board
pub const COLUMNS: usize = 7;

/// The length of a winning run
pub const RUN: usize = 4;

/// Value reported by the search for a position won by the maximizing side
pub const WIN_VALUE: i32 = 99999;

/// Search depth used when none is configured
pub const DEFAULT_DEPTH: u32 = 5;

// a window of four has to fit in every orientation
const_assert!(ROWS >= RUN && COLUMNS >= RUN);
// the centre bonus region (rows 3-5, columns 2-4) must lie inside the board
const_assert!(ROWS >= 6 && COLUMNS >= 5);
