//! A fixed-depth minimax search with alpha-beta pruning

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::board::{Board, Position, Token};
use crate::movegen::{legal_moves, LegalMoves};
use crate::{heuristic, win, WIN_VALUE};

/// An agent choosing moves for one side of a Connect 4 game
///
/// # Notes
/// The engine is generic over which token maximizes: `maximizing` is the
/// side the reported values favour, `minimizing` its opponent. Positions won
/// by the maximizing side are worth `WIN_VALUE`, positions won by the
/// minimizing side `-WIN_VALUE`, and positions at the depth horizon are
/// scored by [`heuristic::score`].
///
/// # Tie-breaking
/// At every node the best move starts out as a fallback and is only replaced
/// by a move with a strictly better value. The fallback is the first legal
/// move, or a uniformly random legal move when the engine was built with
/// [`SearchEngine::with_random_fallback`].
///
/// The search plays and retracts moves on a single private copy of the
/// board, so the caller's board is never touched.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    maximizing: Token,
    minimizing: Token,
    rng: Option<StdRng>,
    // depth of the current search's root node
    root_depth: u32,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub node_count: usize,
}

impl SearchEngine {
    /// Creates an engine with the deterministic first-legal-move fallback
    pub fn new(maximizing: Token, minimizing: Token) -> Self {
        Self {
            maximizing,
            minimizing,
            rng: None,
            root_depth: 0,
            node_count: 0,
        }
    }

    /// Replaces the fallback move with a random legal move drawn from a seeded generator
    pub fn with_random_fallback(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Searches `depth` plies below `board` with the initial window (`alpha`, `beta`)
    ///
    /// Returns the chosen move and its minimax value. The move is `None`
    /// only when `board` itself is a leaf: already won, at depth 0, or full.
    pub fn choose_move(
        &mut self,
        board: &Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing_turn: bool,
    ) -> (Option<Position>, i32) {
        self.node_count = 0;
        self.root_depth = depth;

        let mut scratch = board.clone();
        let (best_move, value) = self.minimax(&mut scratch, depth, alpha, beta, maximizing_turn);
        debug_assert_eq!(&scratch, board, "search left the board modified");

        debug!(
            depth,
            value,
            nodes = self.node_count,
            column = ?best_move.map(|p| p.column),
            "search finished"
        );
        (best_move, value)
    }

    /// Searches with the full window (`-WIN_VALUE`, `WIN_VALUE`)
    pub fn best_move(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing_turn: bool,
    ) -> (Option<Position>, i32) {
        self.choose_move(board, depth, -WIN_VALUE, WIN_VALUE, maximizing_turn)
    }

    fn fallback(&mut self, moves: &LegalMoves) -> Option<Position> {
        match self.rng.as_mut() {
            Some(rng) => moves.as_slice().choose(rng).copied(),
            None => moves.first(),
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing_turn: bool,
    ) -> (Option<Position>, i32) {
        self.node_count += 1;

        match win::winner(board) {
            Some(token) if token == self.maximizing => return (None, WIN_VALUE),
            Some(token) if token == self.minimizing => return (None, -WIN_VALUE),
            _ => {}
        }

        let moves = legal_moves(board);
        // depth horizon, or a drawn board with nothing left to explore
        if depth == 0 || moves.is_empty() {
            return (
                None,
                heuristic::score(board, self.maximizing, self.minimizing),
            );
        }

        let token = if maximizing_turn {
            self.maximizing
        } else {
            self.minimizing
        };
        let mut best_move = self.fallback(&moves);
        let mut best_value = if maximizing_turn {
            -WIN_VALUE
        } else {
            WIN_VALUE
        };

        for position in moves {
            let nodes_before = self.node_count;
            board.play(position.column, token);
            let (_, value) = self.minimax(board, depth - 1, alpha, beta, !maximizing_turn);
            board.undo(position.column);

            if depth == self.root_depth {
                debug!(
                    column = position.column,
                    value,
                    nodes = self.node_count - nodes_before,
                    "root move searched"
                );
            }

            if maximizing_turn {
                if value > best_value {
                    best_value = value;
                    best_move = Some(position);
                }
                alpha = alpha.max(best_value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(position);
                }
                beta = beta.min(best_value);
            }
            // the opponent will never let the game reach this node
            if alpha >= beta {
                break;
            }
        }

        (best_move, best_value)
    }
}
