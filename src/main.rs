//! Perft driver: counts game-tree leaf nodes from the starting position.
//!
//! ```shell
//! $ patzer [DEPTH] [--divide]
//! ```
//!
//! `DEPTH` defaults to 4. With `--divide` the count is split by root move.

use std::time::Instant;

use anyhow::{bail, Context};
use patzer::chess::board::Board;
use patzer::chess::core::Player;
use patzer::perft;

fn main() -> anyhow::Result<()> {
    let mut depth = 4;
    let mut split = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--divide" => split = true,
            value => {
                depth = value
                    .parse()
                    .with_context(|| format!("expected a depth, got '{value}'"))?;
            },
        }
    }
    if depth == 0 {
        bail!("depth must be at least 1");
    }
    let mut board = Board::new();
    let start = Instant::now();
    let nodes = if split {
        perft::divide(&mut board, Player::White, depth)?
    } else {
        perft::perft(&mut board, Player::White, depth)?
    };
    let duration = start.elapsed();
    println!(
        "{nodes} nodes generated at depth {depth} in {duration:.3?} ({:.3} Mnps)",
        nodes as f64 / duration.as_secs_f64() / 1e6
    );
    Ok(())
}
