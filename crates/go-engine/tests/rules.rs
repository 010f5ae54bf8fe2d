//! Rules and scoring tests on full games.

use go_core::{Color, Move, Point, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use go_engine::{Game, RuleError};
use proptest::prelude::*;

fn play_all(game: &mut Game, moves: &[(&str, &str)]) {
    for (color, vertex) in moves {
        game.play_gtp(color, vertex)
            .unwrap_or_else(|e| panic!("{} {} rejected: {}", color, vertex, e));
    }
}

#[test]
fn opening_moves() {
    let mut game = Game::new();
    play_all(&mut game, &[("b", "d4"), ("w", "q15")]);
    assert_eq!(game.move_count(), 2);
}

#[test]
fn occupied_point_is_rejected() {
    let mut game = Game::new();
    game.play_gtp("b", "d4").unwrap();
    assert!(matches!(
        game.play_gtp("w", "d4"),
        Err(RuleError::OccupiedPoint(_))
    ));
    assert!(matches!(
        game.play_gtp("b", "D4"),
        Err(RuleError::OccupiedPoint(_))
    ));
    assert_eq!(game.color_to_move(), Some(Color::White));
}

#[test]
fn out_of_range_points_are_rejected() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[("b", "a1"), ("w", "a19"), ("b", "t19"), ("w", "t1")],
    );
    for vertex in ["a0", "i10", "a20", "u8"] {
        assert!(
            matches!(game.play_gtp("b", vertex), Err(RuleError::InvalidPoint(_))),
            "{}",
            vertex
        );
    }
    assert_eq!(game.move_count(), 4);
}

#[test]
fn simple_ko_is_rejected() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[
            ("b", "a1"),
            ("w", "d1"),
            ("b", "b2"),
            ("w", "c2"),
            ("b", "c1"),
            ("w", "b1"),
        ],
    );
    // White's b1 captured c1; retaking at once recreates an earlier position.
    let c1 = Point::parse("c1", 19).unwrap();
    assert_eq!(game.stone_at(c1), None);
    let before = game.board().clone();
    assert_eq!(game.play_gtp("b", "c1"), Err(RuleError::RepeatedPosition));
    assert_eq!(game.board(), &before);
    assert_eq!(game.color_to_move(), Some(Color::Black));
}

#[test]
fn ko_can_be_retaken_after_a_threat() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[
            ("b", "a1"),
            ("w", "d1"),
            ("b", "b2"),
            ("w", "c2"),
            ("b", "c1"),
            ("w", "b1"),
            ("b", "q16"),
            ("w", "q4"),
            ("b", "c1"),
        ],
    );
    let b1 = Point::parse("b1", 19).unwrap();
    assert_eq!(game.stone_at(b1), None);
}

#[test]
fn score_empty_board() {
    let mut game = Game::new();
    assert_eq!(game.final_score(), -7.5);
    game.set_komi(6.5);
    assert_eq!(game.final_score(), -6.5);
}

#[test]
fn score_one_stone() {
    let mut game = Game::new();
    game.play_gtp("b", "d4").unwrap();
    assert_eq!(game.final_score(), 19.0 * 19.0 - 7.5);

    let mut game = Game::with_size(9).unwrap();
    game.play_gtp("w", "e5").unwrap();
    assert_eq!(game.final_score(), -(81.0 + 7.5));
}

#[test]
fn score_two_stones() {
    let mut game = Game::new();
    play_all(&mut game, &[("b", "d4"), ("w", "q16")]);
    assert_eq!(game.final_score(), -7.5);
}

#[test]
fn score_corner_territory() {
    let mut game = Game::new();
    play_all(&mut game, &[("b", "a2"), ("w", "q16"), ("b", "b1")]);
    assert_eq!(game.final_score(), 3.0 - 1.0 - 7.5);
}

#[test]
fn score_capture_corner_stone() {
    let mut game = Game::new();
    play_all(&mut game, &[("b", "a2"), ("w", "a1"), ("b", "b1")]);
    assert_eq!(game.stone_at(Point::parse("a1", 19).unwrap()), None);
    assert_eq!(game.final_score(), 19.0 * 19.0 - 7.5);
}

#[test]
fn capture_full_edge_line() {
    let mut game = Game::new();
    for row in 1..=19 {
        game.play_gtp("b", &format!("a{}", row)).unwrap();
        game.play_gtp("w", &format!("b{}", row)).unwrap();
    }
    for row in 1..=19 {
        let point = Point::parse(&format!("a{}", row), 19).unwrap();
        assert_eq!(game.stone_at(point), None);
    }
    assert_eq!(game.final_score(), -19.0 * 19.0 - 7.5);
}

#[test]
fn split_board_line() {
    let mut game = Game::new();
    for row in 1..=19 {
        game.play_gtp("b", &format!("b{}", row)).unwrap();
        game.play_gtp("w", &format!("c{}", row)).unwrap();
    }
    assert_eq!(game.final_score(), 2.0 * 19.0 - 17.0 * 19.0 - 7.5);
}

#[test]
fn region_enclosed_by_both_colors_is_neutral() {
    let mut game = Game::with_size(5).unwrap();
    game.set_komi(0.0);
    // One empty region touching both colors.
    play_all(&mut game, &[("b", "a3"), ("w", "e3")]);
    assert_eq!(game.final_score(), 0.0);
}

#[test]
fn finished_is_idempotent_until_reset() {
    let mut game = Game::with_size(9).unwrap();
    game.play(Color::Black, Move::Pass).unwrap();
    assert!(!game.finished());
    game.play(Color::White, Move::Pass).unwrap();
    for _ in 0..3 {
        assert!(game.finished());
        assert_eq!(game.color_to_move(), None);
    }
    game.clear_board();
    assert!(!game.finished());

    game.play(Color::Black, Move::Resign).unwrap();
    for _ in 0..3 {
        assert!(game.finished());
    }
    game.set_board_size(13).unwrap();
    assert!(!game.finished());
}

#[test]
fn passes_from_the_same_side_also_finish() {
    let mut game = Game::with_size(9).unwrap();
    game.play(Color::Black, Move::Pass).unwrap();
    game.play(Color::Black, Move::Pass).unwrap();
    assert!(game.finished());
}

proptest! {
    #[test]
    fn empty_board_score_is_minus_komi(size in MIN_BOARD_SIZE..=MAX_BOARD_SIZE, komi in -50i32..50) {
        let mut game = Game::with_size(size).unwrap();
        let komi = komi as f64 / 2.0;
        game.set_komi(komi);
        prop_assert_eq!(game.final_score(), -komi);
    }

    #[test]
    fn lone_stone_owns_the_board(size in MIN_BOARD_SIZE..=MAX_BOARD_SIZE, col in 0u8..25, row in 0u8..25, white in any::<bool>()) {
        prop_assume!(col < size && row < size);
        let mut game = Game::with_size(size).unwrap();
        let point = Point::new(col, row, size).unwrap();
        let color = if white { Color::White } else { Color::Black };
        game.play(color, Move::Place(point)).unwrap();
        let area = size as f64 * size as f64;
        let expected = match color {
            Color::Black => area - game.komi(),
            Color::White => -area - game.komi(),
        };
        prop_assert_eq!(game.final_score(), expected);
    }

    #[test]
    fn i_column_is_never_playable(row in 1u8..=25) {
        let mut game = Game::with_size(MAX_BOARD_SIZE).unwrap();
        let result = game.play_gtp("b", &format!("i{}", row));
        prop_assert!(matches!(result, Err(RuleError::InvalidPoint(_))));
        prop_assert!(game.board().is_empty());
    }
}
