//! Integration tests for the backgammon engine
//!
//! Covers the public `Game` API end to end: fixed scenarios, then seeded
//! random self-play checking invariants after every transition.

use backgammon_core::{
    board::{Board, Color, PerColor, BAR, OFF},
    dice::FixedDice,
    Game, GameConfig, GameError, InvalidMoveReason, Move, Phase, Setup, WinKind,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn scripted(values: &[u8]) -> Game<FixedDice> {
    Game::with_dice(GameConfig::default(), FixedDice::new(values.iter().copied())).unwrap()
}

fn from_position(board: Board, to_move: Color, dice: &[u8]) -> Game<FixedDice> {
    let setup = Setup::from_board("test", &board, to_move);
    Game::from_setup(GameConfig::default(), &setup, FixedDice::new(dice.iter().copied())).unwrap()
}

fn conserved(game: &Game<impl backgammon_core::DiceSource>) -> bool {
    let board = game.board();
    [Color::White, Color::Black].iter().all(|&c| {
        board.pieces_on_board(c) + board.bar(c) as u32 + board.born_off(c) as u32 == 15
    })
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_new_game_position() {
    let game = Game::new(GameConfig::default().with_seed(1)).unwrap();
    let snapshot = game.snapshot();

    let white: Vec<(usize, i8)> = snapshot
        .points
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(i, &n)| (i + 1, n))
        .collect();
    assert_eq!(white, vec![(1, 2), (12, 5), (17, 3), (19, 5)]);

    let black: Vec<(usize, i8)> = snapshot
        .points
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n < 0)
        .map(|(i, &n)| (i + 1, n))
        .collect();
    assert_eq!(black, vec![(6, -5), (8, -3), (13, -5), (24, -2)]);

    assert_eq!(snapshot.bar, PerColor::new(0, 0));
    assert_eq!(snapshot.born_off, PerColor::new(0, 0));
    assert!(conserved(&game));
}

#[test]
fn test_opening_three_five() {
    let mut game = scripted(&[3, 5]);
    game.roll_dice().unwrap();

    let moves = game.available_moves().unwrap();
    assert!(moves.contains(&Move::new(1, 4, 3)));

    let snapshot = game.make_move(Move::new(1, 4, 3)).unwrap();
    assert_eq!(snapshot.points[0], 1);
    assert_eq!(snapshot.points[3], 1);
    assert_eq!(snapshot.bar, PerColor::new(0, 0));
}

#[test]
fn test_opening_three_onto_blot_captures() {
    let board = Board::from_placements(
        &[(1, 2), (12, 5), (17, 3), (19, 5)],
        &[(4, 1), (24, 1), (13, 5), (8, 3), (6, 5)],
        PerColor::default(),
        PerColor::default(),
    )
    .unwrap();
    let mut game = from_position(board, Color::White, &[3, 5]);
    game.roll_dice().unwrap();

    let snapshot = game.make_move(Move::new(1, 4, 3)).unwrap();
    assert_eq!(snapshot.points[0], 1);
    assert_eq!(snapshot.points[3], 1);
    assert_eq!(snapshot.bar.black, 1);
    assert!(game.history()[0].capture);
    assert!(conserved(&game));
}

#[test]
fn test_move_from_empty_point_rejected() {
    let mut game = scripted(&[3, 5]);
    game.roll_dice().unwrap();
    let before = game.snapshot();

    let err = game.make_move(Move::new(10, 13, 3)).unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidMove {
            mv: Move::new(10, 13, 3),
            reason: InvalidMoveReason::EmptySource,
        }
    );
    assert!(err.is_gameplay());
    assert_eq!(game.snapshot(), before);
    assert!(game.history().is_empty());
}

#[test]
fn test_bear_off_last_piece_on_24() {
    let board = Board::from_placements(
        &[(19, 4), (20, 4), (21, 3), (22, 2), (23, 1), (24, 1)],
        &[(1, 15)],
        PerColor::default(),
        PerColor::default(),
    )
    .unwrap();
    let mut game = from_position(board, Color::White, &[1, 2]);
    game.roll_dice().unwrap();

    let mv = Move::new(24, OFF, 1);
    assert!(game.available_moves().unwrap().contains(&mv));

    let snapshot = game.make_move(mv).unwrap();
    assert_eq!(snapshot.born_off.white, 1);
    assert_eq!(snapshot.points[23], 0);
    assert!(conserved(&game));
}

#[test]
fn test_backgammon_with_loser_on_bar() {
    let board = Board::from_placements(
        &[(23, 1)],
        &[(1, 10), (10, 4)],
        PerColor::new(0, 1),
        PerColor::new(14, 0),
    )
    .unwrap();
    let mut game = from_position(board, Color::White, &[2, 6]);
    game.roll_dice().unwrap();

    let moves = game.available_moves().unwrap();
    assert_eq!(moves, vec![Move::new(23, OFF, 6)]);

    let snapshot = game.make_move(Move::new(23, OFF, 6)).unwrap();
    assert_eq!(snapshot.phase, Phase::GameOver);
    let outcome = snapshot.outcome.unwrap();
    assert_eq!(outcome.winner, Color::White);
    assert_eq!(outcome.kind, WinKind::Backgammon);
    assert_eq!(outcome.points, 3);

    assert!(game.roll_dice().is_err());
    assert!(game.make_move(Move::new(1, 2, 1)).is_err());
}

// ============================================================================
// TURN FLOW
// ============================================================================

#[test]
fn test_doubles_give_four_moves() {
    let mut game = scripted(&[6, 6]);
    game.roll_dice().unwrap();
    assert_eq!(game.remaining_dice(), vec![6, 6, 6, 6]);

    game.make_move(Move::new(1, 7, 6)).unwrap();
    game.make_move(Move::new(1, 7, 6)).unwrap();
    game.make_move(Move::new(12, 18, 6)).unwrap();
    assert_eq!(game.phase(), Phase::Moving);
    game.make_move(Move::new(12, 18, 6)).unwrap();
    assert_eq!(game.phase(), Phase::TurnOver);
    assert_eq!(game.snapshot().dice_used, vec![true; 4]);
}

#[test]
fn test_turns_alternate() {
    let mut game = scripted(&[3, 1, 6, 4, 2, 1]);
    let mut players = Vec::new();

    for _ in 0..3 {
        players.push(game.current_player());
        game.roll_dice().unwrap();
        while game.phase() == Phase::Moving {
            let mv = game.available_moves().unwrap()[0];
            game.make_move(mv).unwrap();
        }
        game.end_turn().unwrap();
    }

    assert_eq!(players, vec![Color::White, Color::Black, Color::White]);
    assert_eq!(game.history().len(), 6);
    assert_eq!(game.history()[2].player, Color::Black);
}

#[test]
fn test_black_starting() {
    let config = GameConfig::default().with_starting_player(Color::Black);
    let mut game = Game::with_dice(config, FixedDice::new([6, 5])).unwrap();
    game.roll_dice().unwrap();
    let moves = game.available_moves().unwrap();
    assert!(moves.contains(&Move::new(24, 18, 6)));
    assert!(moves.contains(&Move::new(13, 8, 5)));
    assert!(moves.iter().all(|mv| mv.to < mv.from));
}

#[test]
fn test_bar_entry_is_only_option() {
    let board = Board::from_placements(
        &[(1, 1), (12, 5), (17, 3), (19, 5)],
        &[(24, 2), (13, 5), (8, 3), (6, 5)],
        PerColor::new(1, 0),
        PerColor::default(),
    )
    .unwrap();
    let mut game = from_position(board, Color::White, &[4, 2]);
    game.roll_dice().unwrap();
    let moves = game.available_moves().unwrap();
    assert_eq!(moves, vec![Move::new(BAR, 2, 2), Move::new(BAR, 4, 4)]);

    let err = game.make_move(Move::new(1, 5, 4)).unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidMove { reason: InvalidMoveReason::MustEnterFromBar, .. }
    ));
}

#[test]
fn test_snapshot_serializes() {
    let mut game = scripted(&[3, 5]);
    game.roll_dice().unwrap();
    game.make_move(Move::new(1, 4, 3)).unwrap();

    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["phase"], "Moving");
    assert_eq!(json["current_player"], "White");
    assert_eq!(json["dice"], serde_json::json!([3, 5]));
    assert_eq!(json["dice_used"], serde_json::json!([true, false]));
    assert_eq!(json["points"].as_array().unwrap().len(), 24);

    let history = serde_json::to_value(game.history()).unwrap();
    assert_eq!(history[0]["mv"]["from"], 1);
    assert_eq!(history[0]["capture"], false);
}

// ============================================================================
// RANDOM SELF-PLAY PROPERTIES
// ============================================================================

/// Plays a full game choosing uniformly among legal moves, checking the
/// engine's invariants at every step
fn play_checked(seed: u64) -> Option<WinKind> {
    let mut game = Game::new(GameConfig::default().with_seed(seed)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0xBAC6);

    for _ in 0..20_000 {
        assert!(conserved(&game), "conservation broken (seed {seed})");
        assert!(game.board().check_invariants().is_ok());

        match game.phase() {
            Phase::Rolling => {
                let player = game.current_player();
                let roll = game.roll_dice().unwrap();
                assert!((1..=6).contains(&roll.first) && (1..=6).contains(&roll.second));
                if roll.is_double() {
                    assert_eq!(game.snapshot().dice.len(), 4);
                }
                assert_eq!(game.current_player(), player);
            }
            Phase::Moving => {
                let player = game.current_player();
                let moves = game.available_moves().unwrap();
                assert!(!moves.is_empty());

                if game.board().bar(player) > 0 {
                    assert!(moves.iter().all(|mv| mv.is_entry()));
                }
                if !game.board().all_pieces_home(player) {
                    assert!(moves.iter().all(|mv| !mv.is_bear_off()));
                }

                // An illegal move changes nothing
                let before = game.snapshot();
                let bogus = Move::new(1, 1, moves[0].die);
                assert!(game.make_move(bogus).is_err());
                assert_eq!(game.snapshot(), before);

                let mv = *moves.choose(&mut rng).unwrap();
                let opponent_bar = game.board().bar(player.opponent());
                let target_was_blot = mv.to != OFF
                    && game.board().owner_at(mv.to) == Some(player.opponent());
                game.make_move(mv).unwrap();

                if target_was_blot {
                    assert_eq!(game.board().bar(player.opponent()), opponent_bar + 1);
                    assert_eq!(game.board().piece_count_at(mv.to), 1);
                    assert_eq!(game.board().owner_at(mv.to), Some(player));
                }
            }
            Phase::TurnOver => {
                let player = game.current_player();
                game.end_turn().unwrap();
                assert_eq!(game.current_player(), player.opponent());
                assert_eq!(game.phase(), Phase::Rolling);
            }
            Phase::GameOver => {
                let outcome = game.outcome().unwrap();
                assert_eq!(game.board().born_off(outcome.winner), 15);
                return Some(outcome.kind);
            }
        }
    }

    None
}

#[test]
fn test_random_games_keep_invariants() {
    let mut finished = 0;
    for seed in 0..20 {
        if play_checked(seed).is_some() {
            finished += 1;
        }
    }
    assert!(finished > 0);
}

#[test]
fn test_seeded_games_are_reproducible() {
    fn record(seed: u64) -> Vec<Move> {
        let mut game = Game::new(GameConfig::default().with_seed(seed).with_auto_end_turn(true)).unwrap();
        for _ in 0..40 {
            if game.phase() == Phase::Rolling {
                game.roll_dice().unwrap();
            }
            if game.phase() == Phase::Moving {
                let mv = game.available_moves().unwrap()[0];
                game.make_move(mv).unwrap();
            }
        }
        game.history().iter().map(|entry| entry.mv).collect()
    }

    assert_eq!(record(99), record(99));
}
