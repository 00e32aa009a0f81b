use std::fmt;
use std::num::NonZeroI32;

use crate::{error::TokenError, GameError, MoveError, COLUMNS, ROWS};

/// The marker a side places on the board
///
/// Tokens are arbitrary non-zero integers, 0 is reserved for empty cells
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token(NonZeroI32);

impl Token {
    pub fn new(value: i32) -> Result<Self, GameError> {
        NonZeroI32::new(value)
            .map(Token)
            .ok_or(GameError::InvalidToken {
                value,
                reason: TokenError::Zero,
            })
    }

    pub fn value(self) -> i32 {
        self.0.get()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Occupied(Token),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    pub fn token(&self) -> Option<Token> {
        match *self {
            Cell::Occupied(token) => Some(token),
            Cell::Empty => None,
        }
    }

    /// The integer form used in saved games, 0 for an empty cell
    pub fn value(&self) -> i32 {
        self.token().map_or(0, Token::value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        match NonZeroI32::new(value) {
            Some(value) => Cell::Occupied(Token(value)),
            None => Cell::Empty,
        }
    }
}

impl From<Token> for Cell {
    fn from(token: Token) -> Self {
        Cell::Occupied(token)
    }
}

/// A resolved landing cell
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

/// A 6x7 Connect 4 grid
///
/// Row 0 is the top row. Every column keeps its tokens in a contiguous
/// block resting on the bottom row.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; COLUMNS]; ROWS],
    // number of tokens in each column
    heights: [usize; COLUMNS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMNS]; ROWS],
            heights: [0; COLUMNS],
        }
    }

    /// Restores a board from its rows, top row first
    pub fn from_cells(cells: [[Cell; COLUMNS]; ROWS]) -> Result<Self, GameError> {
        let mut heights = [0; COLUMNS];
        for column in 0..COLUMNS {
            let mut height = 0;
            for row in (0..ROWS).rev() {
                if cells[row][column].is_empty() {
                    break;
                }
                height += 1;
            }
            // anything above the first gap is floating
            if let Some(row) = (0..ROWS - height).find(|&row| !cells[row][column].is_empty()) {
                return Err(GameError::FloatingCell { row, column });
            }
            heights[column] = height;
        }
        Ok(Self { cells, heights })
    }

    /// Restores a board from the integer rows of a saved game
    pub fn from_values(values: [[i32; COLUMNS]; ROWS]) -> Result<Self, GameError> {
        let mut cells = [[Cell::Empty; COLUMNS]; ROWS];
        for (row, row_values) in values.iter().enumerate() {
            for (column, &value) in row_values.iter().enumerate() {
                cells[row][column] = Cell::from(value);
            }
        }
        Self::from_cells(cells)
    }

    /// Returns the cell at the given position
    ///
    /// # Panics
    /// Panics if the position lies outside the board
    pub fn at(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    pub fn rows(&self) -> &[[Cell; COLUMNS]; ROWS] {
        &self.cells
    }

    /// Whether a token can be dropped into `column`, false for columns off the board
    pub fn is_legal(&self, column: usize) -> bool {
        column < COLUMNS && self.heights[column] < ROWS
    }

    /// The cell a token dropped into `column` would land in
    pub fn landing(&self, column: usize) -> Option<Position> {
        if self.is_legal(column) {
            Some(Position {
                row: ROWS - 1 - self.heights[column],
                column,
            })
        } else {
            None
        }
    }

    /// Drops `token` into `column`, returning the row it landed on
    pub fn apply(&mut self, column: usize, token: Token) -> Result<usize, GameError> {
        if column >= COLUMNS {
            return Err(GameError::InvalidMove {
                column,
                reason: MoveError::OutOfRange,
            });
        }
        let row = match self.landing(column) {
            Some(position) => position.row,
            None => {
                return Err(GameError::InvalidMove {
                    column,
                    reason: MoveError::ColumnFull,
                })
            }
        };
        self.cells[row][column] = Cell::Occupied(token);
        self.heights[column] += 1;
        Ok(row)
    }

    /// Drops `token` into a column already known to be legal
    pub(crate) fn play(&mut self, column: usize, token: Token) {
        debug_assert!(self.is_legal(column), "play on illegal column {}", column);
        self.cells[ROWS - 1 - self.heights[column]][column] = Cell::Occupied(token);
        self.heights[column] += 1;
    }

    /// Removes the topmost token of `column`
    ///
    /// Only used to retract a move made with `apply`, so the column is never empty
    pub(crate) fn undo(&mut self, column: usize) {
        debug_assert!(self.heights[column] > 0, "undo on empty column {}", column);
        self.heights[column] -= 1;
        self.cells[ROWS - 1 - self.heights[column]][column] = Cell::Empty;
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == ROWS)
    }

    pub fn num_moves(&self) -> usize {
        self.heights.iter().sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: Vec<String> = row.iter().map(|cell| cell.value().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
