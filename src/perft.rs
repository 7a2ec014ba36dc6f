//! [Perft] (derived from "performance testing") is a technique for checking
//! the correctness of move generation by comparing the number of nodes in the
//! game tree at a fixed depth against published reference values.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::core::{Error, Player};

/// Counts the leaf nodes of the legal game tree of the given `depth`, starting
/// with `player` to move. Each node is visited by actually making and undoing
/// the move, so perft also exercises the reversibility of the board.
///
/// # Errors
///
/// Propagates board errors; with generator-produced moves none occur.
pub fn perft(board: &mut Board, player: Player, depth: u8) -> Result<u64, Error> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = board.valid_moves(player);
    if depth == 1 {
        return Ok(moves.values().map(|from_square| from_square.len() as u64).sum());
    }
    let mut nodes = 0;
    for m in moves.into_values().flatten() {
        board.make_move(m)?;
        nodes += perft(board, player.opponent(), depth - 1)?;
        board.undo_move()?;
    }
    Ok(nodes)
}

/// [Divide]: perft split by root move. The workhorse for pinning down which
/// branch disagrees with a reference engine; prints one `move nodes` line per
/// root move and returns the total.
///
/// [Divide]: https://www.chessprogramming.org/Perft#Divide
///
/// # Errors
///
/// Propagates board errors; with generator-produced moves none occur.
pub fn divide(board: &mut Board, player: Player, depth: u8) -> Result<u64, Error> {
    let mut total = 0;
    for m in board.valid_moves(player).into_values().flatten() {
        board.make_move(m)?;
        let nodes = perft(board, player.opponent(), depth.saturating_sub(1))?;
        board.undo_move()?;
        println!("{m} {nodes}");
        total += nodes;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_counts_from_the_starting_position() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, Player::White, 0), Ok(1));
        assert_eq!(perft(&mut board, Player::White, 1), Ok(20));
        assert_eq!(perft(&mut board, Player::White, 2), Ok(400));
        // The board comes back untouched.
        assert_eq!(board, Board::new());
    }

    #[test]
    fn black_sees_the_same_tree_by_symmetry() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, Player::Black, 2), Ok(400));
    }
}
