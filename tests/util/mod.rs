//! Shared helpers for the integration tests.

#![allow(dead_code)]

use patzer::chess::board::Board;
use patzer::chess::core::{Move, PieceKind, Player, Square, BOARD_SIZE};

/// Picks the legal move of `player` from `from` to `to`, panicking with the
/// move name if there is none.
pub fn find_move(board: &mut Board, player: Player, from: Square, to: Square) -> Move {
    board
        .valid_moves(player)
        .get(&from)
        .and_then(|moves| moves.iter().copied().find(|m| m.to() == to))
        .unwrap_or_else(|| panic!("expected a legal move {from}{to} for {player}"))
}

/// Finds and applies a single legal move.
pub fn play(board: &mut Board, player: Player, from: Square, to: Square) {
    let m = find_move(board, player, from, to);
    board.make_move(m).expect("move comes from the legal set");
}

/// Plays out a line of `(from, to)` pairs, White first, alternating.
pub fn play_line(board: &mut Board, line: &[(Square, Square)]) {
    let mut player = Player::White;
    for &(from, to) in line {
        play(board, player, from, to);
        player = player.opponent();
    }
}

/// The legal moves of `player` rendered as UCI strings, sorted.
pub fn move_names(board: &mut Board, player: Player) -> Vec<String> {
    let mut names: Vec<String> = board
        .valid_moves(player)
        .values()
        .flatten()
        .map(ToString::to_string)
        .collect();
    names.sort_unstable();
    names
}

/// Checks the structural invariants that every reachable position satisfies:
/// the mailbox and the piece records agree, both kings are on the board and
/// uncaptured, and the 32 arena pieces are partitioned between the board and
/// the capture lists.
pub fn assert_invariants(board: &Board) {
    let mut on_board = 0;
    let mut kings = [0, 0];
    for index in 0..BOARD_SIZE {
        let square = Square::try_from(index).expect("index is in range");
        if let Some(piece) = board.piece_at(square) {
            assert_eq!(
                piece.square, square,
                "piece record and mailbox disagree at {square}"
            );
            if piece.kind == PieceKind::King {
                kings[usize::from(piece.owner == Player::Black)] += 1;
            }
            on_board += 1;
        }
    }
    assert_eq!(kings, [1, 1], "exactly one king per color on the board");
    for player in [Player::White, Player::Black] {
        assert!(
            board
                .captured_pieces(player)
                .all(|piece| piece.kind != PieceKind::King),
            "a king can never be captured"
        );
        assert_eq!(
            board.piece_at(board.king_square(player)).map(|p| p.kind),
            Some(PieceKind::King),
            "king-square cache points at the {player} king"
        );
    }
    let captured = board.captured_pieces(Player::White).count()
        + board.captured_pieces(Player::Black).count();
    assert_eq!(
        on_board + captured,
        32,
        "on-board and captured pieces partition the arena"
    );
}
