//! Pseudo-legal move generation and attack detection.
//!
//! Everything here obeys the rules of piece movement only: a pseudo-legal
//! move may still leave the mover's own king in check. Filtering those out is
//! [`Board::valid_moves`](crate::chess::board::Board::valid_moves)' job.
//! Attack detection is a fresh from-scratch scan on every call; there are no
//! incremental attack maps. That trades speed for an implementation that is
//! easy to convince yourself is correct.

use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Move, MoveKind, PieceId, PieceKind, Player, Square};

/// More than the maximum number of moves in any reachable chess position.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity list of generated moves; never allocates.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// `(row_delta, file_delta)` direction tables. Rows grow downwards (towards
/// White's back rank).
const STRAIGHT_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KING_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-1, -2),
    (-2, 1),
    (-1, 2),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
];

/// Generates the pseudo-legal moves of every on-board piece of `player`.
#[must_use]
pub fn pseudo_legal_moves(board: &Board, player: Player) -> MoveList {
    let mut moves = MoveList::new();
    for &id in board.side_pieces(player) {
        piece_moves(board, id, &mut moves);
    }
    moves
}

/// Generates the pseudo-legal moves of a single piece into `moves`.
pub fn piece_moves(board: &Board, id: PieceId, moves: &mut MoveList) {
    match board.piece(id).kind {
        PieceKind::Pawn => pawn_moves(board, id, moves),
        PieceKind::Knight => step_moves(board, id, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => sliding_moves(board, id, &DIAGONAL_DIRECTIONS, moves),
        PieceKind::Rook => sliding_moves(board, id, &STRAIGHT_DIRECTIONS, moves),
        PieceKind::Queen => sliding_moves(board, id, &KING_DIRECTIONS, moves),
        PieceKind::King => {
            step_moves(board, id, &KING_DIRECTIONS, moves);
            castle_moves(board, id, moves);
        },
    }
}

/// Is `player`'s king attacked in the current position?
///
/// Casts rays from the king's square and stops each one at the first occupied
/// square (a piece of either color fully blocks the ray), then probes the two
/// pawn-capture offsets, the knight offsets and the adjacent squares. Returns
/// on the first attacker found.
#[must_use]
pub fn in_check(board: &Board, player: Player) -> bool {
    let king = board.king_square(player);
    for &(row_delta, file_delta) in &STRAIGHT_DIRECTIONS {
        if let Some(id) = first_piece_on_ray(board, king, row_delta, file_delta) {
            let piece = board.piece(id);
            if piece.owner != player && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen) {
                return true;
            }
        }
    }
    for &(row_delta, file_delta) in &DIAGONAL_DIRECTIONS {
        if let Some(id) = first_piece_on_ray(board, king, row_delta, file_delta) {
            let piece = board.piece(id);
            if piece.owner != player && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
            {
                return true;
            }
        }
    }
    // Pawns attack diagonally towards their owner's last row, so the king is
    // attacked from the squares one row in *its* forward direction.
    for file_delta in [-1, 1] {
        if let Some(square) = king.shift(player.forward(), file_delta) {
            if let Some(piece) = board.piece_at(square) {
                if piece.owner != player && piece.kind == PieceKind::Pawn {
                    return true;
                }
            }
        }
    }
    for &(row_delta, file_delta) in &KNIGHT_OFFSETS {
        if let Some(square) = king.shift(row_delta, file_delta) {
            if let Some(piece) = board.piece_at(square) {
                if piece.owner != player && piece.kind == PieceKind::Knight {
                    return true;
                }
            }
        }
    }
    for &(row_delta, file_delta) in &KING_DIRECTIONS {
        if let Some(square) = king.shift(row_delta, file_delta) {
            if let Some(piece) = board.piece_at(square) {
                if piece.owner != player && piece.kind == PieceKind::King {
                    return true;
                }
            }
        }
    }
    false
}

fn first_piece_on_ray(
    board: &Board,
    from: Square,
    row_delta: i8,
    file_delta: i8,
) -> Option<PieceId> {
    let mut cursor = from;
    while let Some(square) = cursor.shift(row_delta, file_delta) {
        if let Some(id) = board.piece_id_at(square) {
            return Some(id);
        }
        cursor = square;
    }
    None
}

fn pawn_moves(board: &Board, id: PieceId, moves: &mut MoveList) {
    let pawn = board.piece(id);
    let from = pawn.square;
    let us = pawn.owner;
    let forward = us.forward();

    // A pawn standing on the last row has already been promoted; nothing to
    // generate.
    if from.row() == us.last_row() {
        return;
    }
    let kind_for = |to: Square| {
        if to.row() == us.last_row() {
            MoveKind::Promotion
        } else {
            MoveKind::Regular
        }
    };

    if let Some(push) = from.shift(forward, 0) {
        if board.is_empty_square(push) {
            moves.push(Move::new(from, push, id, None, kind_for(push)));
            // Two squares from the starting row, with the intervening square
            // also empty.
            if from.row() == us.pawn_start_row() {
                if let Some(double) = push.shift(forward, 0) {
                    if board.is_empty_square(double) {
                        moves.push(Move::new(from, double, id, None, MoveKind::Regular));
                    }
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        if let Some(to) = from.shift(forward, file_delta) {
            if board.has_opponent(to, us) {
                moves.push(Move::new(from, to, id, board.piece_id_at(to), kind_for(to)));
            }
        }
    }

    // En passant: the immediately preceding move was an opponent pawn's
    // two-square advance landing right next to us. The capture lands on the
    // square the pawn skipped; the captured reference points at the pawn, not
    // at the (empty) destination.
    if let Some(prev) = board.last_move() {
        let prev_mover = board.piece(prev.piece());
        let double_push = prev_mover.kind == PieceKind::Pawn
            && (prev.from().row() as i8 - prev.to().row() as i8).abs() == 2;
        if double_push && prev_mover.owner != us && prev.to().row() == from.row() {
            let file_delta = prev.to().file() as i8 - from.file() as i8;
            if file_delta.abs() == 1 {
                if let Some(to) = from.shift(forward, file_delta) {
                    moves.push(Move::new(from, to, id, Some(prev.piece()), MoveKind::EnPassant));
                }
            }
        }
    }
}

fn step_moves(board: &Board, id: PieceId, offsets: &[(i8, i8)], moves: &mut MoveList) {
    let piece = board.piece(id);
    for &(row_delta, file_delta) in offsets {
        if let Some(to) = piece.square.shift(row_delta, file_delta) {
            if board.opponent_or_empty(to, piece.owner) {
                moves.push(Move::new(
                    piece.square,
                    to,
                    id,
                    board.piece_id_at(to),
                    MoveKind::Regular,
                ));
            }
        }
    }
}

fn sliding_moves(board: &Board, id: PieceId, directions: &[(i8, i8)], moves: &mut MoveList) {
    let piece = board.piece(id);
    let from = piece.square;
    for &(row_delta, file_delta) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.shift(row_delta, file_delta) {
            if board.has_ally(to, piece.owner) {
                break;
            }
            let captured = board.piece_id_at(to);
            moves.push(Move::new(from, to, id, captured, MoveKind::Regular));
            if captured.is_some() {
                // The first occupied square blocks the ray.
                break;
            }
            cursor = to;
        }
    }
}

/// Castle candidates: right still held and every square strictly between king
/// and rook empty. The destination is the rook's home square; the actual king
/// and rook landing squares are resolved when the move is applied. Whether
/// the king is attacked anywhere along the way is deliberately not checked
/// here; legality filtering probes that.
fn castle_moves(board: &Board, id: PieceId, moves: &mut MoveList) {
    let king = board.piece(id);
    let rights = board.castle_rights();
    let clear = |squares: &[Square]| squares.iter().all(|&square| board.is_empty_square(square));
    match king.owner {
        Player::White => {
            if rights.contains(CastleRights::WHITE_SHORT) && clear(&[Square::F1, Square::G1]) {
                moves.push(Move::new(Square::E1, Square::H1, id, None, MoveKind::Castle));
            }
            if rights.contains(CastleRights::WHITE_LONG)
                && clear(&[Square::B1, Square::C1, Square::D1])
            {
                moves.push(Move::new(Square::E1, Square::A1, id, None, MoveKind::Castle));
            }
        },
        Player::Black => {
            if rights.contains(CastleRights::BLACK_SHORT) && clear(&[Square::F8, Square::G8]) {
                moves.push(Move::new(Square::E8, Square::H8, id, None, MoveKind::Castle));
            }
            if rights.contains(CastleRights::BLACK_LONG)
                && clear(&[Square::B8, Square::C8, Square::D8])
            {
                moves.push(Move::new(Square::E8, Square::A8, id, None, MoveKind::Castle));
            }
        },
    }
}
