//! Positional scoring of non-terminal boards

use crate::board::{Board, Cell, Token};
use crate::win::WINDOWS;

/// Bonus for a window holding four of a side's tokens
pub const FOUR_BONUS: i32 = 100;
/// Bonus for a window holding exactly three of a side's tokens
pub const THREE_BONUS: i32 = 5;
/// Bonus for a window holding exactly two of a side's tokens
pub const TWO_BONUS: i32 = 2;
/// Bonus per token inside the centre region
pub const CENTER_BONUS: i32 = 2;

/// Rows of the centre region (the bottom three)
pub const CENTER_ROWS: std::ops::Range<usize> = 3..6;
/// Columns of the centre region (the middle three)
pub const CENTER_COLUMNS: std::ops::Range<usize> = 2..5;

fn window_bonus(count: usize) -> i32 {
    match count {
        4 => FOUR_BONUS,
        3 => THREE_BONUS,
        2 => TWO_BONUS,
        _ => 0,
    }
}

/// The raw score of one side, ignoring its opponent
///
/// A window is scored by how many of `token`'s tokens it holds, whatever
/// occupies its other cells.
pub fn raw_score(board: &Board, token: Token) -> i32 {
    let own = Cell::Occupied(token);

    let windows: i32 = WINDOWS
        .iter()
        .map(|window| {
            let count = window
                .iter()
                .filter(|&&(row, column)| board.at(row, column) == own)
                .count();
            window_bonus(count)
        })
        .sum();

    let mut center = 0;
    for row in CENTER_ROWS {
        for column in CENTER_COLUMNS {
            if board.at(row, column) == own {
                center += CENTER_BONUS;
            }
        }
    }

    windows + center
}

/// Scores `board` from the maximizing side's point of view, positive favours `maximizing`
pub fn score(board: &Board, maximizing: Token, minimizing: Token) -> i32 {
    raw_score(board, maximizing) - raw_score(board, minimizing)
}
