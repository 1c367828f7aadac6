// src/board/castle_bits.rs

use super::Color;
use crate::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Underlying bit type for castling rights.
pub type CastleBits = u8;

pub const CASTLE_WK: CastleBits = 0b0001;
pub const CASTLE_WQ: CastleBits = 0b0010;
pub const CASTLE_BK: CastleBits = 0b0100;
pub const CASTLE_BQ: CastleBits = 0b1000;

/// The set of castling rights still available, one bit per right in K,Q,k,q order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights(CastleBits);

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights(CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ);
    pub const NONE: CastlingRights = CastlingRights(0);

    #[inline(always)]
    pub const fn bits(self) -> CastleBits {
        self.0
    }

    #[inline(always)]
    pub const fn from_bits(bits: CastleBits) -> Self {
        CastlingRights(bits & Self::ALL.0)
    }

    #[inline(always)]
    pub const fn has(self, flag: CastleBits) -> bool {
        self.0 & flag != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, flag: CastleBits) {
        self.0 |= flag;
    }

    #[inline(always)]
    pub fn remove(&mut self, mask: CastleBits) {
        self.0 &= !mask;
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn has_kingside(self, color: Color) -> bool {
        self.has(kingside_flag(color))
    }

    #[inline(always)]
    pub fn has_queenside(self, color: Color) -> bool {
        self.has(queenside_flag(color))
    }
}

#[inline(always)]
pub const fn kingside_flag(color: Color) -> CastleBits {
    match color {
        Color::White => CASTLE_WK,
        Color::Black => CASTLE_BK,
    }
}

#[inline(always)]
pub const fn queenside_flag(color: Color) -> CastleBits {
    match color {
        Color::White => CASTLE_WQ,
        Color::Black => CASTLE_BQ,
    }
}

/// Both rights of one side.
#[inline(always)]
pub const fn side_flags(color: Color) -> CastleBits {
    kingside_flag(color) | queenside_flag(color)
}

/// The right lost when a rook leaves, or is captured on, `sq`.
#[inline(always)]
pub fn flag_for_rook_square(sq: Square) -> CastleBits {
    match sq {
        Square::A1 => CASTLE_WQ,
        Square::H1 => CASTLE_WK,
        Square::A8 => CASTLE_BQ,
        Square::H8 => CASTLE_BK,
        _ => 0,
    }
}

/// FEN castling field: `KQkq` subset or `-`.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')] {
            if self.has(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
