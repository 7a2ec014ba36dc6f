//! Patzer is a chess rules engine: it knows how the pieces move and nothing
//! else. It generates legal moves, applies and exactly undoes them, and
//! validates itself with [perft](crate::perft). There is no search, no
//! evaluation and no position serialization; the intended consumer is a game
//! loop that owns the turn order and interprets an empty legal move set as
//! checkmate or stalemate.
//!
//! ```
//! use patzer::chess::board::Board;
//! use patzer::chess::core::Player;
//!
//! let mut board = Board::new();
//! let moves = board.valid_moves(Player::White);
//! assert_eq!(moves.values().map(Vec::len).sum::<usize>(), 20);
//! ```

pub mod chess;
pub mod perft;
