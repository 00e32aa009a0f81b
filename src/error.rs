use crate::COLUMNS;

/// Why a column could not take a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("columns must be between 1 and {}", COLUMNS)]
    OutOfRange,

    #[error("column full")]
    ColumnFull,

    #[error("the game is already over")]
    GameOver,
}

/// Why a value could not be used as a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("0 marks an empty cell")]
    Zero,

    #[error("already taken by another player")]
    Taken,
}

/// Why a name cannot be given to a human player
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("names must not be empty")]
    Empty,

    #[error("names may not contain ':'")]
    Separator,

    #[error("the name is reserved")]
    Reserved,
}

/// Errors raised by board mutation and game setup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid move, column {}: {}", .column + 1, .reason)]
    InvalidMove { column: usize, reason: MoveError },

    #[error("Invalid token {value}: {reason}")]
    InvalidToken { value: i32, reason: TokenError },

    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: NameError },

    #[error("cell ({row}, {column}) is occupied above an empty cell")]
    FloatingCell { row: usize, column: usize },
}

/// Errors raised while reading a saved game or a history file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: missing {what}")]
    MissingLine { line: usize, what: &'static str },

    #[error("line {line}: expected `<name> : <value>`, found {text:?}")]
    MissingSeparator { line: usize, text: String },

    #[error("line {line}: expected label {expected:?}, found {found:?}")]
    UnexpectedLabel {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: {value:?} is not an integer")]
    NotAnInteger { line: usize, value: String },

    #[error("line {line}: expected a bracketed row, found {text:?}")]
    MissingBrackets { line: usize, text: String },

    #[error("line {line}: expected {expected} cells, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} board rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("cell ({row}, {column}) holds token {value}, which belongs to no player")]
    UnknownToken { row: usize, column: usize, value: i32 },

    #[error("turn token {0} belongs to no player")]
    UnknownTurn(i32),

    #[error("invalid game: {0}")]
    Game(#[from] crate::GameError),
}
