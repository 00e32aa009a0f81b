//! Plain-text save files
//!
//! A saved game is line oriented:
//!
//! ```text
//! Alice : -1
//! AI : 1
//! Turn : 1
//! [0, 0, 0, 0, 0, 0, 0]
//! [0, 0, 0, 0, 0, 0, 0]
//! [0, 0, 0, 0, 0, 0, 0]
//! [0, 0, 0, 0, 0, 0, 0]
//! [0, 0, 0, 0, 0, 0, 0]
//! [0, 0, 0, -1, 1, 0, 0]
//! ```
//!
//! A player named `AI` is machine controlled.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::board::{Board, Token};
use crate::player::{Player, SearchConfig, AI_NAME};
use crate::{LoadError, COLUMNS, ROWS};

pub const SAVE_PATH: &str = "connect4_save.txt";

const TURN_LABEL: &str = "Turn";

/// Everything needed to resume a game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedGame {
    pub players: [Player; 2],
    pub turn: Token,
    pub board: Board,
}

impl SavedGame {
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for player in self.players.iter() {
            text.push_str(&format!("{} : {}\n", player.name, player.token));
        }
        text.push_str(&format!("{} : {}\n", TURN_LABEL, self.turn));
        for row in self.board.rows().iter() {
            let cells: Vec<String> = row.iter().map(|cell| cell.value().to_string()).collect();
            text.push_str(&format!("[{}]\n", cells.join(", ")));
        }
        text
    }

    /// Parses a saved game, restoring a player named `AI` with the given search settings
    pub fn parse(text: &str, ai: SearchConfig) -> Result<Self, LoadError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let mut next_line = |line: usize, what: &'static str| {
            lines.next().ok_or(LoadError::MissingLine { line, what })
        };

        let (line, text) = next_line(1, "first player")?;
        let first = parse_player(line, text, ai)?;
        let (line, text) = next_line(2, "second player")?;
        let second = parse_player(line, text, ai)?;

        let (line, text) = next_line(3, "turn")?;
        let (label, value) = split_pair(line, text)?;
        if label != TURN_LABEL {
            return Err(LoadError::UnexpectedLabel {
                line,
                expected: TURN_LABEL,
                found: label.to_string(),
            });
        }
        let turn = Token::new(parse_int(line, value)?)?;

        let mut values = [[0; COLUMNS]; ROWS];
        let mut found = 0;
        for (line, text) in lines {
            if text.trim().is_empty() {
                continue;
            }
            if found == ROWS {
                found += 1;
                continue;
            }
            values[found] = parse_row(line, text)?;
            found += 1;
        }
        if found != ROWS {
            return Err(LoadError::RowCount {
                expected: ROWS,
                found,
            });
        }

        Ok(Self {
            players: [first, second],
            turn,
            board: Board::from_values(values)?,
        })
    }
}

fn split_pair(line: usize, text: &str) -> Result<(&str, &str), LoadError> {
    let mut parts = text.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(label), Some(value)) => Ok((label.trim(), value.trim())),
        _ => Err(LoadError::MissingSeparator {
            line,
            text: text.to_string(),
        }),
    }
}

fn parse_int(line: usize, value: &str) -> Result<i32, LoadError> {
    value.trim().parse().map_err(|_| LoadError::NotAnInteger {
        line,
        value: value.trim().to_string(),
    })
}

fn parse_player(line: usize, text: &str, ai: SearchConfig) -> Result<Player, LoadError> {
    let (name, value) = split_pair(line, text)?;
    let token = Token::new(parse_int(line, value)?)?;
    if name == AI_NAME {
        Ok(Player::scripted(token, ai))
    } else {
        Ok(Player::human(name, token))
    }
}

fn parse_row(line: usize, text: &str) -> Result<[i32; COLUMNS], LoadError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| LoadError::MissingBrackets {
            line,
            text: text.to_string(),
        })?;

    let cells = inner
        .split(',')
        .map(|value| parse_int(line, value))
        .collect::<Result<Vec<i32>, LoadError>>()?;
    if cells.len() != COLUMNS {
        return Err(LoadError::ColumnCount {
            line,
            expected: COLUMNS,
            found: cells.len(),
        });
    }

    let mut row = [0; COLUMNS];
    row.copy_from_slice(&cells);
    Ok(row)
}

/// Loads a saved game, a missing file means there is no game to resume
pub fn load<P: AsRef<Path>>(path: P, ai: SearchConfig) -> Result<Option<SavedGame>, LoadError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let saved = SavedGame::parse(&text, ai)?;
    info!(path = %path.display(), "loaded saved game");
    Ok(Some(saved))
}

pub fn save<P: AsRef<Path>>(path: P, game: &SavedGame) -> std::io::Result<()> {
    let path = path.as_ref();
    fs::write(path, game.to_text())?;
    info!(path = %path.display(), "saved game");
    Ok(())
}

/// Deletes a save file, doing nothing if it does not exist
pub fn remove<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
