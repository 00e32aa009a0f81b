//! Four-in-a-row detection

use crate::board::{Board, Cell, Token};
use crate::{COLUMNS, ROWS, RUN};

/// The number of 4-cell windows on the board across all four orientations
pub const WINDOW_COUNT: usize = ROWS * (COLUMNS - RUN + 1)
    + (ROWS - RUN + 1) * COLUMNS
    + 2 * (ROWS - RUN + 1) * (COLUMNS - RUN + 1);

/// A run of four (row, column) cells
pub type Window = [(usize, usize); RUN];

const fn window(row: usize, column: usize, d_row: usize, d_column: isize) -> Window {
    let mut cells = [(0, 0); RUN];
    let mut i = 0;
    while i < RUN {
        cells[i] = (
            row + i * d_row,
            (column as isize + i as isize * d_column) as usize,
        );
        i += 1;
    }
    cells
}

/// Enumerates every window: horizontal, vertical, diagonal down-right, then
/// diagonal down-left, each in row-major order of its first cell
const fn all_windows() -> [Window; WINDOW_COUNT] {
    let mut windows = [[(0, 0); RUN]; WINDOW_COUNT];
    let mut n = 0;

    let mut row = 0;
    while row < ROWS {
        let mut column = 0;
        while column + RUN <= COLUMNS {
            windows[n] = window(row, column, 0, 1);
            n += 1;
            column += 1;
        }
        row += 1;
    }

    row = 0;
    while row + RUN <= ROWS {
        let mut column = 0;
        while column < COLUMNS {
            windows[n] = window(row, column, 1, 0);
            n += 1;
            column += 1;
        }
        row += 1;
    }

    row = 0;
    while row + RUN <= ROWS {
        let mut column = 0;
        while column + RUN <= COLUMNS {
            windows[n] = window(row, column, 1, 1);
            n += 1;
            column += 1;
        }
        row += 1;
    }

    row = 0;
    while row + RUN <= ROWS {
        let mut column = RUN - 1;
        while column < COLUMNS {
            windows[n] = window(row, column, 1, -1);
            n += 1;
            column += 1;
        }
        row += 1;
    }

    windows
}

/// Every 4-cell window on the board, shared by win detection and scoring
pub const WINDOWS: [Window; WINDOW_COUNT] = all_windows();

/// The token holding all four cells of `window`, if any
pub fn window_owner(board: &Board, window: &Window) -> Option<Token> {
    let (row, column) = window[0];
    let first = board.at(row, column);
    match first {
        Cell::Empty => None,
        Cell::Occupied(token) => {
            if window[1..].iter().all(|&(r, c)| board.at(r, c) == first) {
                Some(token)
            } else {
                None
            }
        }
    }
}

/// Returns the token that owns a four-in-a-row, scanning each window once
pub fn winner(board: &Board) -> Option<Token> {
    WINDOWS.iter().find_map(|window| window_owner(board, window))
}
