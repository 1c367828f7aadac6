use crate::bitboard::BitboardExt;
use crate::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod castle_bits;
pub(crate) mod fen_tables;
pub use castle_bits::*;

/// Starting position constants
// White side (ranks 1 & 2)
// Pawns on rank 2: bits 8–15
const WHITE_PAWN_MASK: u64 = 0x0000_0000_0000_FF00;
// Rooks on a1 (bit 0) and h1 (bit 7)
const WHITE_ROOK_MASK: u64 = (1 << 0) | (1 << 7);
// Knights on b1 (bit 1) and g1 (bit 6)
const WHITE_KNIGHT_MASK: u64 = (1 << 1) | (1 << 6);
// Bishops on c1 (bit 2) and f1 (bit 5)
const WHITE_BISHOP_MASK: u64 = (1 << 2) | (1 << 5);
// Queen on d1 (bit 3)
const WHITE_QUEEN_MASK: u64 = 1 << 3;
// King on e1 (bit 4)
const WHITE_KING_MASK: u64 = 1 << 4;

// Black side (ranks 7 & 8)
const BLACK_PAWN_MASK: u64 = 0x00FF_0000_0000_0000;
const BLACK_ROOK_MASK: u64 = (1 << 56) | (1 << 63);
const BLACK_KNIGHT_MASK: u64 = (1 << 57) | (1 << 62);
const BLACK_BISHOP_MASK: u64 = (1 << 58) | (1 << 61);
const BLACK_QUEEN_MASK: u64 = 1 << 59;
const BLACK_KING_MASK: u64 = 1 << 60;

// Empty square value, no piece code 0-13 will coincide with 255
pub(crate) const EMPTY_SQ: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

/// Piece kind; the owning colour travels alongside as `(Color, Piece)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Promotion choices in the order moves are generated.
pub const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

pub const COLORS: [Color; 2] = [Color::White, Color::Black];
pub const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Piece placement: one bitboard per (colour, piece) plus a square lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) piece_bb: [[u64; 6]; 2],
    pub(crate) occ_white: u64,
    pub(crate) occ_black: u64,
    pub(crate) occ_all: u64,
    // 0xFF = empty, otherwise (color << 3) | piece
    pub(crate) piece_on_sq: [u8; 64],
}

impl Board {
    /// A board with no pieces.
    pub fn new_empty() -> Self {
        Board {
            piece_bb: [[0u64; 6]; 2],
            occ_white: 0,
            occ_black: 0,
            occ_all: 0,
            piece_on_sq: [EMPTY_SQ; 64],
        }
    }

    /// The standard starting array.
    pub fn starting() -> Self {
        let mut b = Board::new_empty();
        let layout = [
            (Color::White, Piece::Pawn, WHITE_PAWN_MASK),
            (Color::White, Piece::Knight, WHITE_KNIGHT_MASK),
            (Color::White, Piece::Bishop, WHITE_BISHOP_MASK),
            (Color::White, Piece::Rook, WHITE_ROOK_MASK),
            (Color::White, Piece::Queen, WHITE_QUEEN_MASK),
            (Color::White, Piece::King, WHITE_KING_MASK),
            (Color::Black, Piece::Pawn, BLACK_PAWN_MASK),
            (Color::Black, Piece::Knight, BLACK_KNIGHT_MASK),
            (Color::Black, Piece::Bishop, BLACK_BISHOP_MASK),
            (Color::Black, Piece::Rook, BLACK_ROOK_MASK),
            (Color::Black, Piece::Queen, BLACK_QUEEN_MASK),
            (Color::Black, Piece::King, BLACK_KING_MASK),
        ];
        for (color, piece, mask) in layout {
            for sq in mask.squares() {
                b.put(color, piece, sq);
            }
        }
        b
    }

    /// Place a piece on an empty square.
    #[inline(always)]
    pub(crate) fn put(&mut self, color: Color, piece: Piece, sq: Square) {
        debug_assert_eq!(self.piece_on_sq[sq.index() as usize], EMPTY_SQ);
        let bit = sq.bit();
        self.piece_bb[color as usize][piece as usize] |= bit;
        match color {
            Color::White => self.occ_white |= bit,
            Color::Black => self.occ_black |= bit,
        }
        self.occ_all |= bit;
        self.piece_on_sq[sq.index() as usize] = (color as u8) << 3 | (piece as u8);
    }

    /// Clear a square, returning what stood on it.
    #[inline(always)]
    pub(crate) fn remove(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let (color, piece) = self.piece_at(sq)?;
        let bit = sq.bit();
        self.piece_bb[color as usize][piece as usize] &= !bit;
        match color {
            Color::White => self.occ_white &= !bit,
            Color::Black => self.occ_black &= !bit,
        }
        self.occ_all &= !bit;
        self.piece_on_sq[sq.index() as usize] = EMPTY_SQ;
        Some((color, piece))
    }

    #[inline(always)]
    /// Bitboard of all pieces (both colors).
    pub fn occupied(&self) -> u64 {
        self.occ_all
    }

    #[inline(always)]
    /// Bitboard of all pieces for one side.
    pub fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.occ_white,
            Color::Black => self.occ_black,
        }
    }

    #[inline(always)]
    pub fn pieces(&self, piece: Piece, color: Color) -> u64 {
        self.piece_bb[color as usize][piece as usize]
    }

    /// Returns the piece and color at a given square, or None if empty.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let val = self.piece_on_sq[sq.index() as usize];
        if val == EMPTY_SQ {
            None
        } else {
            Some((Color::from_u8((val >> 3) & 1), Piece::from_u8(val & 0b111)))
        }
    }

    #[inline(always)]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|(color, _)| color)
    }

    /// Square of the given side's king, `None` only on boards that fail validation.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king_bb = self.pieces(Piece::King, color);
        if king_bb == 0 {
            None
        } else {
            Some(Square::from_index(king_bb.lsb()))
        }
    }

    /// Number of pieces of one kind and colour.
    #[inline]
    pub fn count(&self, piece: Piece, color: Color) -> u32 {
        self.pieces(piece, color).count_ones()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

/// Eight-line diagram, rank 8 on top, '.' for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let glyph = match self.piece_at(Square::new(file, rank)) {
                    Some((color, piece)) => fen_tables::piece_char(piece, color),
                    None => '.',
                };
                write!(f, " {glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

impl Color {
    #[inline(always)]
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Decode a 0/1 value into a Color.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        if v == 0 { Color::White } else { Color::Black }
    }

    /// Rank (0-based) this side's king and rooks start on.
    #[inline(always)]
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl Piece {
    /// Decode a 0–5 value into a Piece. Codes above 5 only come from corrupt tables.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            _ => Piece::King,
        }
    }

    /// Uppercase SAN letter; pawns have none.
    pub fn san_letter(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            Piece::Knight => Some('N'),
            Piece::Bishop => Some('B'),
            Piece::Rook => Some('R'),
            Piece::Queen => Some('Q'),
            Piece::King => Some('K'),
        }
    }

    /// Inverse of [`Piece::san_letter`] (uppercase only).
    pub fn from_san_letter(c: char) -> Option<Piece> {
        match c {
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}
