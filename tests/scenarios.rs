//! Whole-game scenarios played through the public API.

use chess_core::{Color, Game, GameStatus, Move, MoveError, Piece, PieceKind, Position};

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn play(game: &mut Game, moves: &[&str]) {
    for &m in moves {
        game.make_move(mv(m))
            .unwrap_or_else(|e| panic!("{} rejected: {}", m, e));
    }
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert!(game.is_in_check(Color::White));
    assert!(game.is_in_checkmate(Color::White));
    assert!(!game.is_in_stalemate(Color::White));
    assert!(!game.is_in_check(Color::Black));
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
    assert!(game.all_valid_moves(Color::White).is_empty());
}

#[test]
fn test_fools_mate_queen_lands_on_h4() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    let h4 = Position::new(4, 8);
    assert_eq!(
        game.board().get(h4),
        Some(Piece::new(Color::Black, PieceKind::Queen))
    );
    assert_eq!(game.board().get(Position::new(8, 4)), None);
}

#[test]
fn test_scholars_mate() {
    let mut game = Game::new();
    play(
        &mut game,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert!(game.is_in_checkmate(Color::Black));
    assert!(!game.is_in_checkmate(Color::White));
}

#[test]
fn test_stalemate_king_and_queen() {
    // White king cornered on h8; black queen on g6 and king on f7 take every flight square.
    let game = Game::from_fen("7K/5k2/6q1/8/8/8/8/8 w").unwrap();
    assert!(!game.is_in_check(Color::White));
    assert!(game.is_in_stalemate(Color::White));
    assert!(!game.is_in_checkmate(Color::White));
    assert!(!game.is_in_stalemate(Color::Black));
}

#[test]
fn test_stalemate_reached_by_play() {
    // Qg5-g6 takes the last flight squares without giving check.
    let mut game = Game::from_fen("7K/5k2/8/6q1/8/8/8/8 b").unwrap();
    assert!(!game.is_in_stalemate(Color::White));
    play(&mut game, &["g5g6"]);
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.status(), GameStatus::Stalemate);
}

#[test]
fn test_escape_from_check_only_by_legal_moves() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "f7f6", "d1h5"]);

    assert!(game.is_in_check(Color::Black));
    assert!(!game.is_in_checkmate(Color::Black));

    // Every black reply must resolve the check.
    for reply in game.all_valid_moves(Color::Black) {
        let mut next = game;
        next.make_move(reply).unwrap();
        assert!(!next.is_in_check(Color::Black), "{} leaves black in check", reply);
    }

    let before = game;
    assert!(matches!(
        game.make_move(mv("a7a6")),
        Err(MoveError::IllegalDestination { .. })
    ));
    assert_eq!(game, before);
    play(&mut game, &["g7g6"]);
}

#[test]
fn test_promotion_for_both_colors() {
    let mut game = Game::from_fen("1n2k3/P7/8/8/8/8/6p1/4K2R w").unwrap();

    let white_promos: Vec<Move> = game
        .valid_moves(Position::new(7, 1))
        .into_iter()
        .filter(|m| m.end() == Position::new(8, 2))
        .collect();
    assert_eq!(white_promos.len(), 4);
    assert!(white_promos.iter().all(|m| m.promotion().is_some()));

    // a8 straight ahead is open too: 4 more.
    assert_eq!(game.valid_moves(Position::new(7, 1)).len(), 8);

    // Promoting on a8 keeps the knight on b8 between the queen and the black king.
    play(&mut game, &["a7a8q"]);
    assert!(!game.is_in_check(Color::Black));
    assert_eq!(
        game.board().get(Position::new(8, 1)),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );

    let black_promos = game.valid_moves(Position::new(2, 7));
    // g1 push plus h1 capture, four kinds each.
    assert_eq!(black_promos.len(), 8);

    play(&mut game, &["g2h1b"]);
    assert_eq!(
        game.board().get(Position::new(1, 8)),
        Some(Piece::new(Color::Black, PieceKind::Bishop))
    );
}

#[test]
fn test_wrong_turn_then_right_turn() {
    let mut game = Game::new();
    let err = game.make_move(mv("d7d5")).unwrap_err();
    assert_eq!(
        err,
        MoveError::WrongTurn {
            start: Position::new(7, 4),
            side_to_move: Color::White,
        }
    );
    play(&mut game, &["d2d4", "d7d5"]);
    assert_eq!(game.side_to_move(), Color::White);

    // Same piece cannot move twice in a row.
    assert!(matches!(
        game.make_move(mv("d5d4")),
        Err(MoveError::WrongTurn { .. })
    ));
}
