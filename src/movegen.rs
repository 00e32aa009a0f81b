//! Legal move generation

use crate::board::{Board, Position};
use crate::COLUMNS;

/// The landing cells of every non-full column, in ascending column order
///
/// Built fresh from a board each time, it holds at most one entry per column
/// and never allocates.
#[derive(Clone, Debug)]
pub struct LegalMoves {
    size: usize,
    next: usize,
    moves: [Position; COLUMNS],
}

impl LegalMoves {
    pub fn new(board: &Board) -> Self {
        let mut moves = [Position { row: 0, column: 0 }; COLUMNS];
        let mut size = 0;
        for column in 0..COLUMNS {
            if let Some(position) = board.landing(column) {
                moves[size] = position;
                size += 1;
            }
        }
        Self {
            size,
            next: 0,
            moves,
        }
    }

    pub fn len(&self) -> usize {
        self.size - self.next
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first remaining move without consuming it
    pub fn first(&self) -> Option<Position> {
        self.as_slice().first().copied()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.moves[self.next..self.size]
    }
}

impl Iterator for LegalMoves {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.size {
            self.next += 1;
            Some(self.moves[self.next - 1])
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for LegalMoves {}

/// Returns the legal landing cells of `board`, empty when the board is full
pub fn legal_moves(board: &Board) -> LegalMoves {
    LegalMoves::new(board)
}
