//! A running tally of game results, kept in a plain-text file

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::LoadError;

pub const HISTORY_PATH: &str = "connect4_history.txt";

/// The first line of every history file
pub const HEADER: &str = "Connect Four results";

/// The name under which drawn games are tallied
///
/// Players may not take this name, see [`crate::player::check_name`].
pub const TIE: &str = "Tie";

/// Win counts by player name, in the order names were first recorded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<(String, u32)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
        match lines.next() {
            Some((_, header)) if header.trim() == HEADER => {}
            Some((line, found)) => {
                return Err(LoadError::UnexpectedLabel {
                    line,
                    expected: HEADER,
                    found: found.to_string(),
                })
            }
            None => return Ok(Self::new()),
        }

        let mut history = Self::new();
        for (line, text) in lines {
            if text.trim().is_empty() {
                continue;
            }
            let mut parts = text.rsplitn(2, ':');
            let (wins, name) = match (parts.next(), parts.next()) {
                (Some(wins), Some(name)) => (wins.trim(), name.trim()),
                _ => {
                    return Err(LoadError::MissingSeparator {
                        line,
                        text: text.to_string(),
                    })
                }
            };
            let wins = wins.parse().map_err(|_| LoadError::NotAnInteger {
                line,
                value: wins.to_string(),
            })?;
            history.add(name, wins);
        }
        Ok(history)
    }

    pub fn to_text(&self) -> String {
        let mut text = format!("{}\n", HEADER);
        for (name, wins) in self.entries.iter() {
            text.push_str(&format!("{} : {}\n", name, wins));
        }
        text
    }

    fn add(&mut self, name: &str, wins: u32) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, count)) => *count += wins,
            None => self.entries.push((name.to_string(), wins)),
        }
    }

    /// Records one win for `name`
    pub fn record(&mut self, name: &str) {
        self.add(name, 1);
    }

    /// Records one drawn game under [`TIE`]
    pub fn record_draw(&mut self) {
        self.add(TIE, 1);
    }

    pub fn draws(&self) -> u32 {
        self.wins(TIE)
    }

    pub fn wins(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map_or(0, |&(_, wins)| wins)
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }
}

/// Loads the history file, a missing file is an empty history
pub fn load<P: AsRef<Path>>(path: P) -> Result<History, LoadError> {
    match fs::read_to_string(path) {
        Ok(text) => History::parse(&text),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(History::new()),
        Err(err) => Err(err.into()),
    }
}

pub fn save<P: AsRef<Path>>(path: P, history: &History) -> std::io::Result<()> {
    let path = path.as_ref();
    fs::write(path, history.to_text())?;
    info!(path = %path.display(), entries = history.entries.len(), "saved history");
    Ok(())
}
