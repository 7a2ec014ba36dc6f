//! Board state and reversible move application.
//!
//! The board is a 64-cell mailbox over an arena of piece records: each cell
//! holds the [`PieceId`] of its occupant (or nothing), and every piece keeps
//! its own current square. Captured pieces are never destroyed — they move to
//! the capturing side's capture list and retain their last-known square, so
//! [`Board::undo_move`] can put them back exactly where they fell.

use std::collections::BTreeMap;
use std::fmt;

use crate::chess::core::{
    CastleRights, Error, Move, MoveKind, Piece, PieceId, PieceKind, Player, Square, BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::movegen::{self, MoveList};

const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The mutable position. Owns move application and undo, and produces the
/// legality-filtered move set of a side via [`Board::valid_moves`].
///
/// The board does not track whose turn it is; alternation is the caller's
/// job (the original consumer of this engine is an interactive game loop that
/// owns the turn, and perft recursion flips the player explicitly).
#[derive(Clone, Debug)]
pub struct Board {
    /// Piece arena. Populated at construction, never grows or shrinks;
    /// promotion rewrites a record in place.
    pieces: Vec<Piece>,
    /// The mailbox: who stands where.
    squares: [Option<PieceId>; BOARD_SIZE as usize],
    /// On-board pieces per player. A captured piece leaves its owner's set
    /// and comes back on undo.
    side: [Vec<PieceId>; 2],
    /// King locations, cached for attack detection.
    king: [Square; 2],
    rights: CastleRights,
    /// `captures[p]` holds the pieces `p` has taken, in capture order.
    captures: [Vec<PieceId>; 2],
    /// Applied moves, most recent last. Also serves as the lookback for en
    /// passant generation.
    history: Vec<Move>,
    check: [bool; 2],
}

impl Board {
    /// The standard starting position: full castling rights, empty history.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self {
            pieces: Vec::with_capacity(32),
            squares: [None; BOARD_SIZE as usize],
            side: [Vec::with_capacity(16), Vec::with_capacity(16)],
            king: [Square::E1, Square::E8],
            rights: CastleRights::all(),
            captures: [vec![], vec![]],
            history: vec![],
            check: [false, false],
        };
        for file in 0..BOARD_WIDTH {
            board.add_piece(Player::Black, BACK_RANK[file as usize], Square::from_row_file(0, file));
            board.add_piece(Player::Black, PieceKind::Pawn, Square::from_row_file(1, file));
            board.add_piece(Player::White, PieceKind::Pawn, Square::from_row_file(6, file));
            board.add_piece(Player::White, BACK_RANK[file as usize], Square::from_row_file(7, file));
        }
        board
    }

    fn add_piece(&mut self, owner: Player, kind: PieceKind, square: Square) {
        let id = PieceId::new(u8::try_from(self.pieces.len()).expect("at most 32 pieces"));
        self.pieces.push(Piece { owner, kind, square });
        self.squares[square.index()] = Some(id);
        self.side[owner.index()].push(id);
        if kind == PieceKind::King {
            self.king[owner.index()] = square;
        }
    }

    /// Looks up a piece record by its identifier. Works for captured pieces
    /// too (their `square` is where they fell).
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// The occupant of `square`, if any.
    #[must_use]
    pub fn piece_id_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square.index()]
    }

    /// Read-only lookup of the piece standing on `square`; `None` is the
    /// empty square.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.piece_id_at(square).map(|id| self.piece(id))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty_square(&self, square: Square) -> bool {
        self.piece_id_at(square).is_none()
    }

    /// Does `square` hold a piece of the opposite color? False for an empty
    /// square.
    #[must_use]
    pub fn has_opponent(&self, square: Square, of: Player) -> bool {
        self.piece_at(square).is_some_and(|piece| piece.owner != of)
    }

    /// Does `square` hold a piece of the same color? False for an empty
    /// square.
    #[must_use]
    pub fn has_ally(&self, square: Square, of: Player) -> bool {
        self.piece_at(square).is_some_and(|piece| piece.owner == of)
    }

    /// The empty-tolerant dual of [`Board::has_opponent`]: true when `square`
    /// is empty or holds an opposite-colored piece. This is the capture-or-
    /// move-to-empty-square test.
    #[must_use]
    pub fn opponent_or_empty(&self, square: Square, of: Player) -> bool {
        self.piece_at(square).map_or(true, |piece| piece.owner != of)
    }

    pub(crate) fn side_pieces(&self, player: Player) -> &[PieceId] {
        &self.side[player.index()]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn king_square(&self, player: Player) -> Square {
        self.king[player.index()]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castle_rights(&self) -> CastleRights {
        self.rights
    }

    /// Cached check state, recomputed after every applied or undone move.
    #[must_use]
    pub fn is_in_check(&self, player: Player) -> bool {
        self.check[player.index()]
    }

    /// The pieces `player` has captured, in capture order.
    pub fn captured_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> {
        self.captures[player.index()].iter().map(|&id| self.piece(id))
    }

    /// Read-only view of the most recently applied move (the en passant
    /// lookback).
    #[must_use]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// All applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The legality-filtered move set of `player`, keyed by origin square.
    /// Squares with no legal moves are absent: an empty map together with
    /// [`Board::is_in_check`] distinguishes checkmate from stalemate, which
    /// is the caller's call to make.
    ///
    /// Every pseudo-legal candidate is probed by speculatively applying it,
    /// asking whether the mover's own king is attacked, and reverting.
    pub fn valid_moves(&mut self, player: Player) -> BTreeMap<Square, Vec<Move>> {
        let candidates = movegen::pseudo_legal_moves(self, player);
        let mut result: BTreeMap<Square, Vec<Move>> = BTreeMap::new();
        for candidate in candidates {
            if self.is_legal(candidate) {
                result.entry(candidate.from()).or_default().push(candidate);
            }
        }
        result
    }

    /// Applies `m`, which must belong to the current legal move set of the
    /// piece it names.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if it does not; the board is left untouched.
    pub fn make_move(&mut self, m: Move) -> Result<(), Error> {
        if !self.is_valid(m) {
            return Err(Error::IllegalMove);
        }
        self.apply(m);
        Ok(())
    }

    /// Reverts the most recently applied move and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyHistory`] if there is nothing to undo.
    pub fn undo_move(&mut self) -> Result<Move, Error> {
        let m = self.history.pop().ok_or(Error::EmptyHistory)?;
        self.revert(m);
        Ok(m)
    }

    /// Membership test for [`Board::make_move`]: the move must name the piece
    /// that actually stands on its origin square, be producible by the
    /// generator right now, and pass the same legality probe `valid_moves`
    /// applies.
    fn is_valid(&mut self, m: Move) -> bool {
        if self.piece_id_at(m.from()) != Some(m.piece()) {
            return false;
        }
        let mut candidates = MoveList::new();
        movegen::piece_moves(self, m.piece(), &mut candidates);
        candidates.contains(&m) && self.is_legal(m)
    }

    /// Probe-and-revert legality: apply, test the mover's king, undo. Castles
    /// additionally require not being in check right now and a legal
    /// one-square king step towards the rook, approximating "the king does
    /// not pass through an attacked square".
    fn is_legal(&mut self, candidate: Move) -> bool {
        let mover = self.piece(candidate.piece()).owner;
        if candidate.kind() == MoveKind::Castle {
            if self.check[mover.index()] {
                return false;
            }
            let towards_rook: i8 = if candidate.to().file() > candidate.from().file() {
                1
            } else {
                -1
            };
            let Some(step) = candidate.from().shift(0, towards_rook) else {
                return false;
            };
            let probe = Move::new(candidate.from(), step, candidate.piece(), None, MoveKind::Regular);
            if !self.leaves_king_safe(probe, mover) {
                return false;
            }
        }
        self.leaves_king_safe(candidate, mover)
    }

    fn leaves_king_safe(&mut self, m: Move, mover: Player) -> bool {
        self.apply(m);
        let safe = !self.check[mover.index()];
        self.revert_last();
        safe
    }

    // Callers guarantee apply() was just called; the history can not be
    // empty.
    fn revert_last(&mut self) {
        if let Some(m) = self.history.pop() {
            self.revert(m);
        }
    }

    /// Unchecked application. Records the revoked castling rights into the
    /// history copy of the move so that undo can restore them.
    fn apply(&mut self, mut m: Move) {
        let mover = self.piece(m.piece()).owner;
        m.revoked_rights = self.revoked_rights(m);
        self.rights.remove(m.revoked_rights);
        match m.kind() {
            MoveKind::Castle => {
                let (king_to, rook_to) = castle_targets(m.from(), m.to());
                let rook = self.squares[m.to().index()]
                    .expect("castle right implies the rook is on its home square");
                self.squares[m.from().index()] = None;
                self.squares[m.to().index()] = None;
                self.put(m.piece(), king_to);
                self.put(rook, rook_to);
            },
            MoveKind::Regular | MoveKind::EnPassant | MoveKind::Promotion => {
                self.squares[m.from().index()] = None;
                if let Some(captured) = m.captured() {
                    // For en passant the captured pawn does not stand on the
                    // destination square; its own record knows where it is.
                    let fell_on = self.piece(captured).square;
                    self.squares[fell_on.index()] = None;
                    self.remove_from_side(captured);
                    self.captures[mover.index()].push(captured);
                }
                self.put(m.piece(), m.to());
                if m.kind() == MoveKind::Promotion {
                    self.pieces[m.piece().index()].kind = PieceKind::Queen;
                }
            },
        }
        self.history.push(m);
        self.refresh_checks();
    }

    /// Exact inverse of [`Board::apply`], driven entirely by the popped move.
    fn revert(&mut self, m: Move) {
        match m.kind() {
            MoveKind::Castle => {
                let (king_to, rook_to) = castle_targets(m.from(), m.to());
                let rook = self.squares[rook_to.index()]
                    .expect("undoing a castle: the rook is on its landing square");
                self.squares[king_to.index()] = None;
                self.squares[rook_to.index()] = None;
                self.put(m.piece(), m.from());
                self.put(rook, m.to());
            },
            MoveKind::Regular | MoveKind::EnPassant | MoveKind::Promotion => {
                self.squares[m.to().index()] = None;
                if m.kind() == MoveKind::Promotion {
                    self.pieces[m.piece().index()].kind = PieceKind::Pawn;
                }
                self.put(m.piece(), m.from());
                if let Some(captured) = m.captured() {
                    let mover = self.piece(m.piece()).owner;
                    let popped = self.captures[mover.index()].pop();
                    debug_assert_eq!(popped, Some(captured), "capture lists are LIFO under undo");
                    self.side[mover.opponent().index()].push(captured);
                    // Resurrect it on its retained last-known square.
                    let fell_on = self.piece(captured).square;
                    self.squares[fell_on.index()] = Some(captured);
                }
            },
        }
        self.rights.insert(m.revoked_rights);
        self.refresh_checks();
    }

    /// Places a piece on a square, keeping the mailbox, the piece record and
    /// the king cache in agreement.
    fn put(&mut self, id: PieceId, square: Square) {
        self.squares[square.index()] = Some(id);
        self.pieces[id.index()].square = square;
        let piece = &self.pieces[id.index()];
        if piece.kind == PieceKind::King {
            self.king[piece.owner.index()] = square;
        }
    }

    fn remove_from_side(&mut self, id: PieceId) {
        let owner = self.piece(id).owner;
        let side = &mut self.side[owner.index()];
        if let Some(position) = side.iter().position(|&piece| piece == id) {
            side.remove(position);
        }
    }

    /// Which of the currently-held rights `m` revokes: both for a king move
    /// (castling included), one side for a rook leaving its home square or an
    /// enemy rook captured on its home square.
    fn revoked_rights(&self, m: Move) -> CastleRights {
        let piece = self.piece(m.piece());
        let mut revoked = CastleRights::empty();
        match piece.kind {
            PieceKind::King => revoked |= CastleRights::both(piece.owner),
            PieceKind::Rook => revoked |= rook_home_right(piece.owner, m.from()),
            _ => {},
        }
        if let Some(captured) = m.captured() {
            let victim = self.piece(captured);
            if victim.kind == PieceKind::Rook {
                revoked |= rook_home_right(victim.owner, victim.square);
            }
        }
        revoked & self.rights
    }

    fn refresh_checks(&mut self) {
        self.check = [
            movegen::in_check(self, Player::White),
            movegen::in_check(self, Player::Black),
        ];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality is positional: arena, mailbox, rights, capture lists, check flags
/// and history must agree. The on-board piece sets are compared as sets —
/// a capture removes an id mid-vector and undo pushes it back at the end,
/// which reorders them without changing the position.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        let sorted = |ids: &[PieceId]| {
            let mut ids = ids.to_vec();
            ids.sort_unstable();
            ids
        };
        self.pieces == other.pieces
            && self.squares == other.squares
            && self.king == other.king
            && self.rights == other.rights
            && self.captures == other.captures
            && self.history == other.history
            && self.check == other.check
            && sorted(&self.side[0]) == sorted(&other.side[0])
            && sorted(&self.side[1]) == sorted(&other.side[1])
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            write!(f, "{} | ", 8 - row)?;
            for file in 0..BOARD_WIDTH {
                match self.piece_at(Square::from_row_file(row, file)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => f.write_str(". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    ---------------")?;
        write!(f, "    a b c d e f g h")
    }
}

/// Resolves the post-castle squares from the king's and rook's home squares:
/// the king moves two files towards the rook, the rook lands on the square
/// the king crossed.
const fn castle_targets(king: Square, rook: Square) -> (Square, Square) {
    let row = king.row();
    if rook.file() > king.file() {
        (Square::from_row_file(row, 6), Square::from_row_file(row, 5))
    } else {
        (Square::from_row_file(row, 2), Square::from_row_file(row, 3))
    }
}

/// The castling right associated with a rook standing on `square`, or empty
/// if that is not one of `owner`'s rook home squares.
const fn rook_home_right(owner: Player, square: Square) -> CastleRights {
    let home_row = match owner {
        Player::White => 7,
        Player::Black => 0,
    };
    if square.row() != home_row {
        return CastleRights::empty();
    }
    match square.file() {
        0 => CastleRights::long(owner),
        7 => CastleRights::short(owner),
        _ => CastleRights::empty(),
    }
}
