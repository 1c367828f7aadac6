//! Immutable game position: placement plus the side-to-move, castling,
//! en-passant and clock state that FEN carries.

pub mod fen;

use crate::board::castle_bits::CastlingRights;
use crate::board::{Board, Color, Piece};
use crate::error::Error;
use crate::hash::zobrist::compute_hash;
use crate::moves::square_control::is_square_attacked;
use crate::square::Square;
use std::fmt;
use std::str::FromStr;

pub use fen::{FenError, START_FEN};

/// A complete chess position. Treated as a value: moves produce a new `Position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) zobrist: u64,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        let board = Board::starting();
        let mut pos = Position {
            board,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist: 0,
        };
        pos.refresh_zobrist();
        pos
    }

    /// Parse a six-field FEN string, enforcing the position invariants.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen::parse_fen(fen)
    }

    /// Emit the six-field FEN string.
    pub fn to_fen(&self) -> String {
        fen::write_fen(self)
    }

    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist key over placement, side to move, castling rights and a usable en-passant file.
    #[inline(always)]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board.piece_at(sq)
    }

    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        self.is_in_check(self.side_to_move)
    }

    /// Is `side`'s king attacked?
    pub fn is_in_check(&self, side: Color) -> bool {
        match self.board.king_square(side) {
            Some(king) => is_square_attacked(&self.board, king, side.opposite()),
            None => false,
        }
    }

    /// Recompute from current state and store into `self.zobrist`.
    #[inline]
    pub(crate) fn refresh_zobrist(&mut self) {
        self.zobrist = self.compute_zobrist_full();
    }

    /// Full recompute from current state. Must match the incremental hash at all times.
    pub fn compute_zobrist_full(&self) -> u64 {
        compute_hash(&self.board, self.side_to_move, self.castling, self.en_passant)
    }

    #[cfg(feature = "paranoid_hash")]
    #[inline]
    pub(crate) fn assert_hash(&self) {
        let full = self.compute_zobrist_full();
        assert_eq!(
            self.zobrist, full,
            "Zobrist parity mismatch: stored={:#018x}, full={:#018x}",
            self.zobrist, full
        );
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Position::from_fen(s)?)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // like "{:#}": diagram plus FEN
            writeln!(f, "{}", self.board)?;
            write!(f, "{}", self.to_fen())
        } else {
            write!(f, "{}", self.to_fen())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_fields() {
        let p = Position::new();
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(p.castling_rights(), CastlingRights::ALL);
        assert_eq!(p.en_passant(), None);
        assert_eq!((p.halfmove_clock(), p.fullmove_number()), (0, 1));
        assert_eq!(p.to_fen(), START_FEN);
        assert!(!p.in_check());
    }

    #[test]
    fn incremental_and_full_hash_agree_at_start() {
        let p = Position::new();
        assert_eq!(p.zobrist(), p.compute_zobrist_full());
        assert_eq!(Position::from_str(START_FEN).unwrap(), p);
    }

    #[test]
    fn alternate_display_includes_diagram() {
        let text = format!("{:#}", Position::new());
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.ends_with(START_FEN));
    }
}
