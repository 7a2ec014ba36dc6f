//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Failure conditions surfaced by the engine. All of them are local and
/// synchronous: an operation either completes or rejects without mutating
/// any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A square index outside `0..BOARD_SIZE`. Rejected before any board
    /// access; never produced for a generated move.
    OutOfBounds {
        #[allow(missing_docs)]
        index: u8,
    },
    /// [`undo_move`](crate::chess::board::Board::undo_move) was called with
    /// nothing to undo. This breaks the caller's make/undo pairing and is
    /// reported rather than silently ignored.
    EmptyHistory,
    /// A move outside the current legal set was presented to
    /// [`make_move`](crate::chess::board::Board::make_move).
    IllegalMove,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index } => {
                write!(f, "square index should be in 0..{BOARD_SIZE}, got {index}")
            },
            Self::EmptyHistory => f.write_str("no move to undo: the history is empty"),
            Self::IllegalMove => f.write_str("move is not legal in the current position"),
        }
    }
}

impl std::error::Error for Error {}

/// Board squares, indexed row-major from the top rank: a8 is 0, h8 is 7, a1
/// is 56, h1 is 63.
///
/// ```
/// use patzer::chess::core::Square;
///
/// assert_eq!(Square::A8 as u8, 0);
/// assert_eq!(Square::H8 as u8, 7);
/// assert_eq!(Square::E1 as u8, 60);
/// assert_eq!(Square::H1 as u8, 63);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    /// Row of the square: 0 is the top rank (rank 8), 7 the bottom (rank 1).
    #[must_use]
    pub const fn row(self) -> u8 {
        self as u8 / BOARD_WIDTH
    }

    /// File (column) of the square: 0 is the a-file, 7 the h-file.
    #[must_use]
    pub const fn file(self) -> u8 {
        self as u8 % BOARD_WIDTH
    }

    /// Moves `row_delta` rows down and `file_delta` files to the right,
    /// returning `None` when the destination leaves the board.
    ///
    /// This is the single admissibility check every move generator goes
    /// through: validating the destination file against `file_delta` rejects
    /// moves that raw index arithmetic would silently wrap to the opposite
    /// edge of the board.
    #[must_use]
    pub const fn shift(self, row_delta: i8, file_delta: i8) -> Option<Self> {
        let row = self.row() as i8 + row_delta;
        let file = self.file() as i8 + file_delta;
        if row < 0 || row >= BOARD_WIDTH as i8 || file < 0 || file >= BOARD_WIDTH as i8 {
            return None;
        }
        Some(Self::from_row_file(row as u8, file as u8))
    }

    pub(crate) const fn from_row_file(row: u8, file: u8) -> Self {
        debug_assert!(row < BOARD_WIDTH && file < BOARD_WIDTH);
        unsafe { mem::transmute(row * BOARD_WIDTH + file) }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Square {
    type Error = Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the index is outside `0..BOARD_SIZE`.
    fn try_from(index: u8) -> Result<Self, Error> {
        if index < BOARD_SIZE {
            Ok(unsafe { mem::transmute::<u8, Self>(index) })
        } else {
            Err(Error::OutOfBounds { index })
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, 8 - self.row())
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a pawn advance: white pawns move towards row 0.
    pub(crate) const fn forward(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub(crate) const fn pawn_start_row(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    pub(crate) const fn last_row(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        })
    }
}

/// Stable identifier of a piece in the board's arena. Pieces are created once
/// at board construction and never destroyed: a captured piece keeps its
/// identifier (and its last-known square) so that undo can resurrect it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PieceId(u8);

impl PieceId {
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A specific piece owned by a player. Identity is the arena slot
/// ([`PieceId`]); the `square` field follows the piece around the board.
/// Promotion rewrites `kind` in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Current square while on board; last-known square once captured.
    pub square: Square,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub fn is_white(&self) -> bool {
        self.owner == Player::White
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_black(&self) -> bool {
        self.owner == Player::Black
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn same_color(&self, other: &Self) -> bool {
        self.owner == other.owner
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn different_color(&self, other: &Self) -> bool {
        self.owner != other.owner
    }
}

impl fmt::Display for Piece {
    /// FEN-style letter: uppercase for white, lowercase for black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match (self.owner, self.kind) {
            (Player::White, PieceKind::King) => 'K',
            (Player::White, PieceKind::Queen) => 'Q',
            (Player::White, PieceKind::Rook) => 'R',
            (Player::White, PieceKind::Bishop) => 'B',
            (Player::White, PieceKind::Knight) => 'N',
            (Player::White, PieceKind::Pawn) => 'P',
            (Player::Black, PieceKind::King) => 'k',
            (Player::Black, PieceKind::Queen) => 'q',
            (Player::Black, PieceKind::Rook) => 'r',
            (Player::Black, PieceKind::Bishop) => 'b',
            (Player::Black, PieceKind::Knight) => 'n',
            (Player::Black, PieceKind::Pawn) => 'p',
        })
    }
}

bitflags::bitflags! {
    /// Tracks the ability to [castle] each side (kingside is often referred
    /// to as O-O or short castle, queenside as O-O-O or long castle). A right
    /// is lost in forward play when the king moves, when the corresponding
    /// rook moves off its home square, or when that rook is captured on its
    /// home square. Undo restores exactly the rights the undone move revoked.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
    }
}

impl CastleRights {
    /// Kingside right of the given player.
    #[must_use]
    pub const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// Queenside right of the given player.
    #[must_use]
    pub const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }

    /// Both rights of the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        Self::short(player).union(Self::long(player))
    }
}

/// What a move does beyond relocating its piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Plain relocation, possibly a capture.
    Regular,
    /// King and rook relocation; `to` holds the rook's home square.
    Castle,
    /// Pawn capture of the pawn that just advanced two squares; the captured
    /// pawn does not stand on `to`.
    EnPassant,
    /// Pawn move onto the last row. Always resolves to a queen when applied;
    /// underpromotion is not modeled.
    Promotion,
}

/// A transition between two positions. Carries enough information for undo
/// without consulting the board: the captured piece reference and the
/// castling rights the move revoked are recorded here, so undo never has to
/// re-derive state the board already discarded.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    from: Square,
    to: Square,
    piece: PieceId,
    captured: Option<PieceId>,
    kind: MoveKind,
    pub(super) revoked_rights: CastleRights,
}

impl Move {
    /// A candidate move; `revoked_rights` is filled in when the move is
    /// applied.
    #[must_use]
    pub const fn new(
        from: Square,
        to: Square,
        piece: PieceId,
        captured: Option<PieceId>,
        kind: MoveKind,
    ) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            kind,
            revoked_rights: CastleRights::empty(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The piece being moved.
    #[must_use]
    pub const fn piece(self) -> PieceId {
        self.piece
    }

    /// The piece this move captures, if any. For en passant this is the
    /// doubly-pushed pawn, which does not stand on [`Move::to`].
    #[must_use]
    pub const fn captured(self) -> Option<PieceId> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// The castling rights this move revoked when it was applied. Empty for
    /// a move that has not been applied yet.
    #[must_use]
    pub const fn revoked_rights(self) -> CastleRights {
        self.revoked_rights
    }
}

/// Equality ignores `revoked_rights`: it is bookkeeping filled in at apply
/// time, not part of the move's identity. A move popped by `undo_move` stays
/// equal to the freshly generated candidate and can be replayed.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.piece == other.piece
            && self.captured == other.captured
            && self.kind == other.kind
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Castle => f.write_str(if self.to.file() > self.from.file() {
                "O-O"
            } else {
                "O-O-O"
            }),
            MoveKind::Promotion => write!(f, "{}{}q", self.from, self.to),
            MoveKind::Regular | MoveKind::EnPassant => write!(f, "{}{}", self.from, self.to),
        }
    }
}
