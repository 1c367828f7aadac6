use crate::board::Piece;
use crate::square::Square;
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Upper bound on legal moves in any reachable position (218) with headroom.
pub const MAX_MOVES: usize = 256;

pub type MoveList = ArrayVec<Move, MAX_MOVES>;

pub trait MoveBuffer: Deref<Target = [Move]> + DerefMut {
    fn push(&mut self, mv: Move);
    fn clear(&mut self);
}

impl MoveBuffer for Vec<Move> {
    fn push(&mut self, mv: Move) {
        Vec::push(self, mv);
    }
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<const N: usize> MoveBuffer for ArrayVec<Move, N> {
    fn push(&mut self, mv: Move) {
        ArrayVec::push(self, mv);
    }
    fn clear(&mut self) {
        ArrayVec::clear(self);
    }
}

// Move flag encoding (4 bits)
// Bits 0-1: Special move type (00=quiet, 01=double pawn, 10=kingside castle, 11=queenside castle)
// Bit 2: Capture flag
// Bit 3: Promotion flag
pub const QUIET_MOVE: u8 = 0b0000;
pub const DOUBLE_PAWN_PUSH: u8 = 0b0001;
pub const KINGSIDE_CASTLE: u8 = 0b0010;
pub const QUEENSIDE_CASTLE: u8 = 0b0011;
pub const CAPTURE: u8 = 0b0100;
pub const EN_PASSANT: u8 = 0b0101;
pub const PROMOTION: u8 = 0b1000;
pub const PROMOTION_CAPTURE: u8 = 0b1100;

/// A move as produced by the generator. Castling is the king's two-square step
/// (`e1g1`); the rook's relocation is implied by the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub flags: u8,
}

impl Move {
    #[inline(always)]
    pub fn new(from: Square, to: Square, piece: Piece, flags: u8) -> Self {
        Move { from, to, piece, promotion: None, flags }
    }

    #[inline(always)]
    pub fn promote(from: Square, to: Square, promotion: Piece, capture: bool) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            promotion: Some(promotion),
            flags: if capture { PROMOTION_CAPTURE } else { PROMOTION },
        }
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        (self.flags & CAPTURE) != 0
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.flags == EN_PASSANT
    }

    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.flags == KINGSIDE_CASTLE || self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_kingside_castle(&self) -> bool {
        self.flags == KINGSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_queenside_castle(&self) -> bool {
        self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        (self.flags & PROMOTION) != 0
    }

    #[inline(always)]
    pub fn is_double_pawn_push(&self) -> bool {
        self.flags == DOUBLE_PAWN_PUSH
    }

    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        self.flags == QUIET_MOVE
    }

    /// Same origin, destination and promotion piece. Used to match a parsed
    /// coordinate move against generated ones.
    #[inline]
    pub fn matches(&self, from: Square, to: Square, promotion: Option<Piece>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }
}

pub(crate) fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        _ => '?',
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promotion_char(promo))?;
        }

        if f.alternate() {
            // like "{:#}": tag the special kinds
            if self.is_castling() {
                write!(f, " (castle)")?;
            } else if self.is_en_passant() {
                write!(f, " (ep)")?;
            } else if self.is_capture() {
                write!(f, " (x)")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_classify_moves() {
        let e7: Square = "e7".parse().unwrap();
        let d8: Square = "d8".parse().unwrap();
        let m = Move::promote(e7, d8, Piece::Knight, true);
        assert!(m.is_promotion() && m.is_capture());
        assert!(!m.is_en_passant() && !m.is_castling());
        assert_eq!(m.to_string(), "e7d8n");
        assert_eq!(format!("{m:#}"), "e7d8n (x)");

        let ep = Move::new("e5".parse().unwrap(), d8, Piece::Pawn, EN_PASSANT);
        assert!(ep.is_en_passant() && ep.is_capture() && !ep.is_promotion());
    }

    #[test]
    fn castle_renders_as_king_step() {
        let m = Move::new(Square::E1, Square::G1, Piece::King, KINGSIDE_CASTLE);
        assert!(m.is_kingside_castle());
        assert_eq!(format!("{m:#}"), "e1g1 (castle)");
        assert!(m.matches(Square::E1, Square::G1, None));
    }
}
