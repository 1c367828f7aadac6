use crate::board::{Board, Color, Piece};
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::square::Square;

/// Bitboard of `attacker`'s pieces that attack `square` on the current occupancy.
pub fn attackers_of(board: &Board, square: Square, attacker: Color) -> u64 {
    let occupied = board.occupied();
    // a pawn of `attacker` hits `square` iff a pawn of the other colour on `square` would hit it back
    let pawns = pawn_attacks(square, attacker.opposite()) & board.pieces(Piece::Pawn, attacker);
    let knights = knight_attacks(square) & board.pieces(Piece::Knight, attacker);
    let kings = king_attacks(square) & board.pieces(Piece::King, attacker);

    let queens = board.pieces(Piece::Queen, attacker);
    let straight = rook_attacks(square, occupied) & (board.pieces(Piece::Rook, attacker) | queens);
    let diagonal = bishop_attacks(square, occupied) & (board.pieces(Piece::Bishop, attacker) | queens);

    pawns | knights | kings | straight | diagonal
}

/// Is `square` attacked by any piece of `attacker`? Occupancy of `square` itself is irrelevant.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    let occupied = board.occupied();

    if pawn_attacks(square, attacker.opposite()) & board.pieces(Piece::Pawn, attacker) != 0 {
        return true;
    }
    if knight_attacks(square) & board.pieces(Piece::Knight, attacker) != 0 {
        return true;
    }
    if king_attacks(square) & board.pieces(Piece::King, attacker) != 0 {
        return true;
    }

    let queens = board.pieces(Piece::Queen, attacker);
    if rook_attacks(square, occupied) & (board.pieces(Piece::Rook, attacker) | queens) != 0 {
        return true;
    }
    bishop_attacks(square, occupied) & (board.pieces(Piece::Bishop, attacker) | queens) != 0
}

/// Is `side`'s king attacked? A board without that king is never in check.
#[inline(always)]
pub fn in_check(board: &Board, side: Color) -> bool {
    board
        .king_square(side)
        .is_some_and(|king| is_square_attacked(board, king, side.opposite()))
}
