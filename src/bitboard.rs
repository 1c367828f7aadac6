//! Bitboard helpers. Bit `i` is square `i` (a1 = bit 0, h8 = bit 63).

use crate::square::Square;

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_H: u64 = 0x8080_8080_8080_8080;

pub const RANK_1: u64 = 0x0000_0000_0000_00FF;
pub const RANK_2: u64 = 0x0000_0000_0000_FF00;
pub const RANK_7: u64 = 0x00FF_0000_0000_0000;
pub const RANK_8: u64 = 0xFF00_0000_0000_0000;

/// Light squares (h1 is light).
pub const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Remove and return the index of the least significant set bit.
#[inline(always)]
pub fn pop_lsb(bb: &mut u64) -> u8 {
    debug_assert!(*bb != 0);
    let idx = bb.trailing_zeros() as u8;
    *bb &= *bb - 1;
    idx
}

pub trait BitboardExt {
    fn lsb(self) -> u8;
    fn msb(self) -> u8;
    fn has(self, sq: Square) -> bool;
    fn squares(self) -> Squares;
}

impl BitboardExt for u64 {
    #[inline(always)]
    fn lsb(self) -> u8 {
        self.trailing_zeros() as u8
    }

    #[inline(always)]
    fn msb(self) -> u8 {
        63 - self.leading_zeros() as u8
    }

    #[inline(always)]
    fn has(self, sq: Square) -> bool {
        self & sq.bit() != 0
    }

    #[inline(always)]
    fn squares(self) -> Squares {
        Squares(self)
    }
}

/// Iterator over the set squares of a bitboard, lowest first.
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index(pop_lsb(&mut self.0)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_lsb_walks_bits_in_order() {
        let mut bb = (1u64 << 3) | (1u64 << 40);
        assert_eq!(pop_lsb(&mut bb), 3);
        assert_eq!(pop_lsb(&mut bb), 40);
        assert_eq!(bb, 0);
    }

    #[test]
    fn msb_and_lsb() {
        let bb = (1u64 << 5) | (1u64 << 62);
        assert_eq!(bb.lsb(), 5);
        assert_eq!(bb.msb(), 62);
    }

    #[test]
    fn light_square_mask_matches_square_colour() {
        for sq in Square::all() {
            assert_eq!(LIGHT_SQUARES.has(sq), sq.is_light(), "{sq}");
        }
    }
}
