//! Chess primitives and rules: squares, pieces, moves, the board and its
//! move generator.

pub mod board;
pub mod core;
pub mod movegen;
