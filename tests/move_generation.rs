//! Scenario tests for legal move generation: full move sets as sorted UCI
//! strings, en passant appearance and expiry, castling legality, checkmate
//! and stalemate.

mod util;

use itertools::Itertools;
use patzer::chess::board::Board;
use patzer::chess::core::{MoveKind, Player, Square};
use patzer::chess::movegen;
use pretty_assertions::assert_eq;
use util::{find_move, move_names, play_line};

#[test]
fn starting_moves() {
    let mut board = Board::new();
    let expected = [
        "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3", "e2e4", "f2f3",
        "f2f4", "g2g3", "g2g4", "h2h3", "h2h4", "b1a3", "b1c3", "g1f3", "g1h3",
    ];
    assert_eq!(
        move_names(&mut board, Player::White),
        expected.iter().map(ToString::to_string).sorted().collect::<Vec<_>>()
    );
    let mirrored = [
        "a7a6", "a7a5", "b7b6", "b7b5", "c7c6", "c7c5", "d7d6", "d7d5", "e7e6", "e7e5", "f7f6",
        "f7f5", "g7g6", "g7g5", "h7h6", "h7h5", "b8a6", "b8c6", "g8f6", "g8h6",
    ];
    assert_eq!(
        move_names(&mut board, Player::Black),
        mirrored.iter().map(ToString::to_string).sorted().collect::<Vec<_>>()
    );
}

#[test]
fn en_passant_appears_for_exactly_one_move() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::E2, Square::E4),
            (Square::A7, Square::A6),
            (Square::E4, Square::E5),
            (Square::D7, Square::D5),
        ],
    );
    let capture = find_move(&mut board, Player::White, Square::E5, Square::D6);
    assert_eq!(capture.kind(), MoveKind::EnPassant);
    let victim = capture.captured().expect("en passant captures a pawn");
    assert_eq!(board.piece(victim).square, Square::D5);

    // Any intervening move forfeits the right.
    play_line(&mut board, &[(Square::G1, Square::F3), (Square::A6, Square::A5)]);
    let from_e5: Vec<Square> = board.valid_moves(Player::White)[&Square::E5]
        .iter()
        .map(|m| m.to())
        .collect();
    assert!(!from_e5.contains(&Square::D6));
}

#[test]
fn en_passant_removes_the_bypassing_pawn() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::E2, Square::E4),
            (Square::A7, Square::A6),
            (Square::E4, Square::E5),
            (Square::D7, Square::D5),
            (Square::E5, Square::D6),
        ],
    );
    assert!(board.is_empty_square(Square::D5));
    assert!(board.is_empty_square(Square::E5));
    assert_eq!(
        board.captured_pieces(Player::White).map(ToString::to_string).collect::<Vec<_>>(),
        vec!["p"]
    );
    util::assert_invariants(&board);
}

#[test]
fn short_castle_is_generated_and_moves_both_pieces() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::E2, Square::E4),
            (Square::E7, Square::E5),
            (Square::G1, Square::F3),
            (Square::G8, Square::F6),
            (Square::F1, Square::C4),
            (Square::F8, Square::C5),
        ],
    );
    let castle = find_move(&mut board, Player::White, Square::E1, Square::H1);
    assert_eq!(castle.kind(), MoveKind::Castle);
    assert_eq!(castle.to_string(), "O-O");
    board.make_move(castle).expect("castling is legal here");
    assert_eq!(board.king_square(Player::White), Square::G1);
    assert_eq!(board.piece_at(Square::F1).map(ToString::to_string), Some("R".into()));
    assert!(board.is_empty_square(Square::E1));
    assert!(board.is_empty_square(Square::H1));
    util::assert_invariants(&board);
}

#[test]
fn castling_through_an_attacked_square_is_rejected() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::F2, Square::F4),
            (Square::E7, Square::E6),
            (Square::G1, Square::F3),
            (Square::F8, Square::C5),
            (Square::E2, Square::E4),
            (Square::B8, Square::C6),
            (Square::F1, Square::C4),
            (Square::D7, Square::D6),
        ],
    );
    // The bishop on c5 eyes g1 through the vacated f2 square: the candidate
    // survives pseudo-legal generation but not legality filtering.
    let pseudo: Vec<String> = movegen::pseudo_legal_moves(&board, Player::White)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert!(pseudo.contains(&"O-O".to_string()));
    assert!(!move_names(&mut board, Player::White).contains(&"O-O".to_string()));
}

#[test]
fn fools_mate_is_checkmate() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::F2, Square::F3),
            (Square::E7, Square::E5),
            (Square::G2, Square::G4),
            (Square::D8, Square::H4),
        ],
    );
    assert!(board.is_in_check(Player::White));
    assert!(board.valid_moves(Player::White).is_empty());
}

#[test]
fn ten_move_stalemate() {
    // Sam Loyd's quickest-stalemate construction. Black has pieces left but
    // no legal move and no check: an empty move map with the check flag clear.
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::C2, Square::C4),
            (Square::H7, Square::H5),
            (Square::H2, Square::H4),
            (Square::A7, Square::A5),
            (Square::D1, Square::A4),
            (Square::A8, Square::A6),
            (Square::A4, Square::A5),
            (Square::A6, Square::H6),
            (Square::A5, Square::C7),
            (Square::F7, Square::F6),
            (Square::C7, Square::D7),
            (Square::E8, Square::F7),
            (Square::D7, Square::B7),
            (Square::D8, Square::D3),
            (Square::B7, Square::B8),
            (Square::D3, Square::H7),
            (Square::B8, Square::C8),
            (Square::F7, Square::G6),
            (Square::C8, Square::E6),
        ],
    );
    assert!(!board.is_in_check(Player::Black));
    assert!(board.valid_moves(Player::Black).is_empty());
    util::assert_invariants(&board);
}

#[test]
fn moves_that_expose_the_king_are_filtered_out() {
    let mut board = Board::new();
    play_line(
        &mut board,
        &[
            (Square::E2, Square::E4),
            (Square::E7, Square::E5),
            (Square::D1, Square::H5),
            (Square::G8, Square::F6),
            (Square::H5, Square::F7),
        ],
    );
    // Qxf7+ from an adjacent square can not be blocked, and only the king
    // itself can take the undefended queen. Every other reply is filtered.
    assert!(board.is_in_check(Player::Black));
    assert_eq!(move_names(&mut board, Player::Black), vec!["e8f7".to_string()]);
}
