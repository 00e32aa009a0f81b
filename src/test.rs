#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use indicatif::ProgressBar;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use std::collections::HashSet;

    use crate::arena::{self, ArenaConfig};
    use crate::board::{Board, Position, Token};
    use crate::game::{Game, GameState};
    use crate::heuristic;
    use crate::movegen::legal_moves;
    use crate::persist::SavedGame;
    use crate::player::{Player, SearchConfig, TokenRegistry};
    use crate::search::SearchEngine;
    use crate::win::{self, WINDOWS, WINDOW_COUNT};
    use crate::{GameError, LoadError, MoveError, COLUMNS, ROWS, WIN_VALUE};

    fn tokens() -> Result<(Token, Token)> {
        Ok((Token::new(1)?, Token::new(-1)?))
    }

    fn board_with(cells: &[(usize, usize, i32)]) -> Result<Board> {
        let mut values = [[0; COLUMNS]; ROWS];
        for &(row, column, value) in cells {
            values[row][column] = value;
        }
        Ok(Board::from_values(values)?)
    }

    // a full board without any four-in-a-row
    const DRAWN: [[i32; COLUMNS]; ROWS] = [
        [-1, 1, 1, -1, -1, -1, 1],
        [1, -1, -1, 1, 1, 1, -1],
        [-1, -1, -1, 1, -1, 1, -1],
        [1, 1, -1, 1, -1, -1, -1],
        [1, -1, 1, -1, 1, 1, 1],
        [1, 1, -1, -1, 1, -1, 1],
    ];

    /// Plain minimax without pruning, copying the board at every node
    fn full_minimax(
        board: &Board,
        depth: u32,
        maximizing_turn: bool,
        max: Token,
        min: Token,
        nodes: &mut usize,
    ) -> i32 {
        *nodes += 1;
        match win::winner(board) {
            Some(token) if token == max => return WIN_VALUE,
            Some(token) if token == min => return -WIN_VALUE,
            _ => {}
        }
        let moves = legal_moves(board);
        if depth == 0 || moves.is_empty() {
            return heuristic::score(board, max, min);
        }
        let values = moves.map(|position| {
            let mut child = board.clone();
            let token = if maximizing_turn { max } else { min };
            child.apply(position.column, token).unwrap();
            full_minimax(&child, depth - 1, !maximizing_turn, max, min, nodes)
        });
        if maximizing_turn {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    /// Plays random moves from the empty board, stopping before anyone wins
    fn random_position(rng: &mut StdRng, plies: usize) -> Result<Board> {
        let (a, b) = tokens()?;
        let mut board = Board::new();
        for ply in 0..plies {
            let token = if ply % 2 == 0 { a } else { b };
            let moves = legal_moves(&board);
            let position = match moves.as_slice().choose(rng) {
                Some(&position) => position,
                None => break,
            };
            let mut next = board.clone();
            next.apply(position.column, token)?;
            if win::winner(&next).is_some() {
                break;
            }
            board = next;
        }
        Ok(board)
    }

    #[test]
    pub fn apply_respects_gravity() -> Result<()> {
        let (a, b) = tokens()?;
        let mut board = Board::new();

        assert_eq!(board.apply(3, a)?, 5);
        assert_eq!(board.apply(3, b)?, 4);
        assert_eq!(board.apply(0, b)?, 5);
        assert_eq!(board.at(5, 3).token(), Some(a));
        assert_eq!(board.at(4, 3).token(), Some(b));
        assert!(board.at(3, 3).is_empty());
        assert_eq!(board.at(5, 0).token(), Some(b));
        assert_eq!(board.num_moves(), 3);
        Ok(())
    }

    #[test]
    pub fn illegal_moves_leave_board_untouched() -> Result<()> {
        let (a, b) = tokens()?;
        let mut board = Board::new();
        for i in 0..ROWS {
            board.apply(2, if i % 2 == 0 { a } else { b })?;
        }
        let before = board.clone();

        assert!(!board.is_legal(2));
        assert_eq!(
            board.apply(2, a),
            Err(GameError::InvalidMove {
                column: 2,
                reason: MoveError::ColumnFull
            })
        );
        assert!(!board.is_legal(COLUMNS));
        assert_eq!(
            board.apply(COLUMNS, a),
            Err(GameError::InvalidMove {
                column: COLUMNS,
                reason: MoveError::OutOfRange
            })
        );
        assert_eq!(board, before);
        Ok(())
    }

    #[test]
    pub fn floating_cells_are_rejected() {
        let mut values = [[0; COLUMNS]; ROWS];
        values[3][4] = 1;
        values[5][4] = 1;
        assert_eq!(
            Board::from_values(values),
            Err(GameError::FloatingCell { row: 3, column: 4 })
        );
    }

    #[test]
    pub fn windows_cover_every_orientation() {
        assert_eq!(WINDOW_COUNT, 69);

        let distinct: HashSet<_> = WINDOWS.iter().collect();
        assert_eq!(distinct.len(), WINDOW_COUNT);

        for window in WINDOWS.iter() {
            assert!(window.iter().all(|&(row, column)| row < ROWS && column < COLUMNS));
            let d_row = window[1].0 as isize - window[0].0 as isize;
            let d_column = window[1].1 as isize - window[0].1 as isize;
            for pair in window.windows(2) {
                assert_eq!(pair[1].0 as isize - pair[0].0 as isize, d_row);
                assert_eq!(pair[1].1 as isize - pair[0].1 as isize, d_column);
            }
        }
    }

    #[test]
    pub fn empty_board_has_no_winner() {
        assert_eq!(win::winner(&Board::new()), None);
    }

    #[test]
    pub fn winner_in_each_orientation() -> Result<()> {
        let (a, b) = tokens()?;

        let horizontal = board_with(&[(5, 3, 1), (5, 4, 1), (5, 5, 1), (5, 6, 1), (5, 0, -1)])?;
        assert_eq!(win::winner(&horizontal), Some(a));

        let vertical = board_with(&[(5, 6, -1), (4, 6, -1), (3, 6, -1), (2, 6, -1)])?;
        assert_eq!(win::winner(&vertical), Some(b));

        // down-right from (2, 0)
        let down_right = board_with(&[
            (2, 0, 1),
            (3, 0, -1),
            (4, 0, -1),
            (5, 0, -1),
            (3, 1, 1),
            (4, 1, -1),
            (5, 1, 1),
            (4, 2, 1),
            (5, 2, -1),
            (5, 3, 1),
        ])?;
        assert_eq!(win::winner(&down_right), Some(a));

        // down-left from (2, 6)
        let down_left = board_with(&[
            (2, 6, -1),
            (3, 6, 1),
            (4, 6, 1),
            (5, 6, 1),
            (3, 5, -1),
            (4, 5, 1),
            (5, 5, -1),
            (4, 4, -1),
            (5, 4, 1),
            (5, 3, -1),
        ])?;
        assert_eq!(win::winner(&down_left), Some(b));
        assert_eq!(GameState::of(&down_left), GameState::Won(b));

        let three = board_with(&[(5, 0, 1), (5, 1, 1), (5, 2, 1), (5, 3, -1)])?;
        assert_eq!(win::winner(&three), None);
        Ok(())
    }

    #[test]
    pub fn legal_moves_follow_gravity() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for plies in 0..30 {
            let board = random_position(&mut rng, plies)?;
            let moves: Vec<Position> = legal_moves(&board).collect();

            let open: Vec<usize> = (0..COLUMNS).filter(|&c| board.is_legal(c)).collect();
            let columns: Vec<usize> = moves.iter().map(|p| p.column).collect();
            assert_eq!(columns, open);

            for position in moves {
                assert!(board.at(position.row, position.column).is_empty());
                for row in position.row + 1..ROWS {
                    assert!(!board.at(row, position.column).is_empty());
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn full_board_is_a_draw() -> Result<()> {
        let board = Board::from_values(DRAWN)?;

        assert!(board.is_full());
        assert_eq!(win::winner(&board), None);
        assert_eq!(legal_moves(&board).len(), 0);
        assert_eq!(GameState::of(&board), GameState::Draw);
        Ok(())
    }

    #[test]
    pub fn heuristic_scores() -> Result<()> {
        let (a, b) = tokens()?;

        assert_eq!(heuristic::score(&Board::new(), a, b), 0);

        // three horizontal windows of two, two cells in the centre region
        let pair = board_with(&[(5, 2, 1), (5, 3, 1)])?;
        assert_eq!(heuristic::score(&pair, a, b), 10);
        assert_eq!(heuristic::score(&pair, b, a), -10);

        // the opponent's token does not spoil the three-window
        let spoiled = board_with(&[(5, 0, 1), (5, 1, 1), (5, 2, 1), (5, 3, -1)])?;
        assert_eq!(heuristic::raw_score(&spoiled, a), 9);
        assert_eq!(heuristic::raw_score(&spoiled, b), 2);
        assert_eq!(heuristic::score(&spoiled, a, b), 7);
        Ok(())
    }

    #[test]
    pub fn heuristic_is_pure() -> Result<()> {
        let (a, b) = tokens()?;
        let mut rng = StdRng::seed_from_u64(11);
        for plies in (0..40).step_by(4) {
            let board = random_position(&mut rng, plies)?;
            let first = heuristic::score(&board, a, b);
            assert_eq!(heuristic::score(&board, a, b), first);
            assert_eq!(heuristic::score(&board, b, a), -first);
        }
        Ok(())
    }

    #[test]
    pub fn depth_one_from_empty() -> Result<()> {
        let (a, b) = tokens()?;
        let mut engine = SearchEngine::new(a, b);

        let (best_move, value) = engine.best_move(&Board::new(), 1, true);

        // the first centre column is the first strict improvement
        assert_eq!(best_move, Some(Position { row: 5, column: 2 }));
        assert_eq!(value, 2);
        Ok(())
    }

    #[test]
    pub fn takes_the_win() -> Result<()> {
        let (a, b) = tokens()?;
        let board = board_with(&[(5, 0, 1), (5, 1, 1), (5, 2, 1)])?;

        for depth in 1..=4 {
            let mut engine = SearchEngine::new(a, b);
            let (best_move, value) = engine.best_move(&board, depth, true);
            assert_eq!(best_move, Some(Position { row: 5, column: 3 }));
            assert_eq!(value, WIN_VALUE);
        }
        Ok(())
    }

    #[test]
    pub fn blocks_the_loss() -> Result<()> {
        let (a, b) = tokens()?;
        let board = board_with(&[(5, 0, -1), (5, 1, -1), (5, 2, -1)])?;

        for &(depth, expected) in [(2, -14), (3, -10), (4, -16)].iter() {
            let mut engine = SearchEngine::new(a, b);
            let (best_move, value) = engine.best_move(&board, depth, true);
            assert_eq!(best_move, Some(Position { row: 5, column: 3 }));
            assert!(value > -WIN_VALUE);
            assert_eq!(value, expected);
        }
        Ok(())
    }

    #[test]
    pub fn lost_position_keeps_fallback_move() -> Result<()> {
        let (a, b) = tokens()?;
        // an open three cannot be blocked on both ends
        let board = board_with(&[(5, 1, -1), (5, 2, -1), (5, 3, -1)])?;

        let mut engine = SearchEngine::new(a, b);
        let (best_move, value) = engine.best_move(&board, 2, true);
        assert_eq!(best_move, Some(Position { row: 5, column: 0 }));
        assert_eq!(value, -WIN_VALUE);

        let legal: Vec<Position> = legal_moves(&board).collect();
        let pick = |seed| SearchEngine::new(a, b).with_random_fallback(seed).best_move(&board, 2, true);
        for seed in 0..8 {
            let (best_move, value) = pick(seed);
            assert_eq!(value, -WIN_VALUE);
            assert!(legal.contains(&best_move.unwrap()));
            assert_eq!(pick(seed), (best_move, value));
        }
        Ok(())
    }

    #[test]
    pub fn leaves_return_no_move() -> Result<()> {
        let (a, b) = tokens()?;
        let mut engine = SearchEngine::new(a, b);

        let won = board_with(&[(5, 0, 1), (5, 1, 1), (5, 2, 1), (5, 3, 1)])?;
        assert_eq!(engine.best_move(&won, 3, false), (None, WIN_VALUE));

        let lost = board_with(&[(5, 0, -1), (4, 0, -1), (3, 0, -1), (2, 0, -1)])?;
        assert_eq!(engine.best_move(&lost, 3, true), (None, -WIN_VALUE));

        let pair = board_with(&[(5, 2, 1), (5, 3, 1)])?;
        assert_eq!(engine.best_move(&pair, 0, true), (None, 10));

        let drawn = Board::from_values(DRAWN)?;
        let (best_move, value) = engine.best_move(&drawn, 4, true);
        assert_eq!(best_move, None);
        assert_eq!(value, heuristic::score(&drawn, a, b));
        Ok(())
    }

    #[test]
    pub fn pruning_preserves_minimax_value() -> Result<()> {
        let (a, b) = tokens()?;
        let mut rng = StdRng::seed_from_u64(2024);

        for plies in [0, 3, 6, 9, 12, 15, 20, 26].iter() {
            let board = random_position(&mut rng, *plies)?;
            for depth in 1..=4 {
                for &maximizing_turn in [true, false].iter() {
                    let mut full_nodes = 0;
                    let expected = full_minimax(&board, depth, maximizing_turn, a, b, &mut full_nodes);

                    let mut engine = SearchEngine::new(a, b);
                    let (best_move, value) = engine.best_move(&board, depth, maximizing_turn);

                    assert_eq!(value, expected, "plies {} depth {}\n{}", plies, depth, board);
                    assert!(engine.node_count <= full_nodes);
                    if let Some(position) = best_move {
                        assert_eq!(board.landing(position.column), Some(position));
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn search_leaves_board_untouched() -> Result<()> {
        let (a, b) = tokens()?;
        let mut rng = StdRng::seed_from_u64(3);
        let board = random_position(&mut rng, 10)?;
        let before = board.clone();

        let mut engine = SearchEngine::new(b, a);
        let _ = engine.choose_move(&board, 5, -WIN_VALUE, WIN_VALUE, true);

        assert_eq!(board, before);
        Ok(())
    }

    #[test]
    pub fn token_registry() -> Result<()> {
        let mut registry = TokenRegistry::new();
        let first = registry.claim(7)?;
        assert_eq!(first.value(), 7);

        assert!(matches!(
            registry.claim(0),
            Err(GameError::InvalidToken { value: 0, .. })
        ));
        assert!(matches!(
            registry.claim(7),
            Err(GameError::InvalidToken { value: 7, .. })
        ));
        assert_eq!(registry.claim(-3)?.value(), -3);
        Ok(())
    }

    #[test]
    pub fn game_alternates_and_ends() -> Result<()> {
        let (a, b) = tokens()?;
        let mut game = Game::new([Player::human("Alice", a), Player::human("Bob", b)])?;

        // Alice stacks column 1, Bob column 2
        for _ in 0..3 {
            assert_eq!(game.current().token, a);
            assert_eq!(game.play_checked(0)?, GameState::Playing);
            assert_eq!(game.current().token, b);
            assert_eq!(game.play_checked(1)?, GameState::Playing);
        }
        assert_eq!(game.play_checked(0)?, GameState::Won(a));
        assert_eq!(game.winner().map(|p| p.name.as_str()), Some("Alice"));

        let before = game.board().clone();
        assert!(matches!(
            game.play_checked(1),
            Err(GameError::InvalidMove {
                reason: MoveError::GameOver,
                ..
            })
        ));
        assert_eq!(game.board(), &before);
        Ok(())
    }

    #[test]
    pub fn game_rejects_duplicate_tokens() -> Result<()> {
        let (a, _) = tokens()?;
        let result = Game::new([Player::human("Alice", a), Player::human("Bob", a)]);
        assert!(matches!(result, Err(GameError::InvalidToken { value: 1, .. })));
        Ok(())
    }

    #[test]
    pub fn scripted_player_finds_the_win() -> Result<()> {
        let (a, b) = tokens()?;
        let mut game = Game::new([
            Player::human("Alice", b),
            Player::scripted(a, SearchConfig::with_depth(3)),
        ])?;
        // Alice wastes moves on the far side while the AI builds a row
        for &(human, ai) in [(6, 0), (6, 1), (5, 2)].iter() {
            game.play_checked(human)?;
            assert!(game.current().is_scripted());
            game.play_checked(ai)?;
        }
        game.play_checked(5)?;

        let (position, value) = game.engine_move().unwrap();
        assert_eq!(position, Position { row: 5, column: 3 });
        assert_eq!(value, WIN_VALUE);
        assert_eq!(game.play_checked(position.column)?, GameState::Won(a));
        assert!(game.engine_move().is_none());
        Ok(())
    }

    #[test]
    pub fn saved_game_round_trip() -> Result<()> {
        let (a, b) = tokens()?;
        let mut game = Game::new([
            Player::scripted(a, SearchConfig::with_depth(2)),
            Player::human("Bob", b),
        ])?;
        for &column in [3, 3, 4, 2, 0].iter() {
            game.play_checked(column)?;
        }

        let text = game.to_saved().to_text();
        let restored = Game::from_saved(SavedGame::parse(&text, SearchConfig::with_depth(2))?)?;

        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.players(), game.players());
        assert_eq!(restored.current().token, b);
        assert_eq!(restored.state(), GameState::Playing);
        Ok(())
    }

    #[test]
    pub fn saved_game_with_foreign_token_is_rejected() -> Result<()> {
        let (a, b) = tokens()?;
        let saved = SavedGame {
            players: [Player::human("Alice", a), Player::human("Bob", b)],
            turn: a,
            board: board_with(&[(5, 0, 1), (5, 1, 9)])?,
        };
        assert!(matches!(
            Game::from_saved(saved.clone()),
            Err(LoadError::UnknownToken {
                row: 5,
                column: 1,
                value: 9
            })
        ));

        let wrong_turn = SavedGame {
            turn: Token::new(4)?,
            board: Board::new(),
            ..saved
        };
        assert!(matches!(
            Game::from_saved(wrong_turn),
            Err(LoadError::UnknownTurn(4))
        ));
        Ok(())
    }

    #[test]
    pub fn arena_is_reproducible() -> Result<()> {
        let config = ArenaConfig {
            first_depth: 1,
            second_depth: 2,
            games: 4,
            opening_moves: 2,
            seed: 5,
        };

        let results = arena::run(&config, &ProgressBar::hidden())?;
        assert_eq!(results.total(), 4);
        assert_eq!(arena::run(&config, &ProgressBar::hidden())?, results);

        for index in 0..config.games {
            assert_ne!(arena::play_game(&config, index)?.state(), GameState::Playing);
        }
        Ok(())
    }
}
