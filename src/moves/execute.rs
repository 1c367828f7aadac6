use crate::board::castle_bits::*;
use crate::board::{Color, Piece};
use crate::error::{Error, Result};
use crate::hash::zobrist::{ep_file_to_hash, xor_castling_rights_delta, zobrist_keys};
use crate::moves::movegen::is_legal;
use crate::moves::types::Move;
use crate::position::Position;
use crate::square::Square;

/// Castling rook (from, to) by king destination.
#[inline(always)]
fn rook_castle_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)), // White O-O
        Square::C1 => Some((Square::A1, Square::D1)), // White O-O-O
        Square::G8 => Some((Square::H8, Square::F8)), // Black O-O
        Square::C8 => Some((Square::A8, Square::D8)), // Black O-O-O
        _ => None,
    }
}

/// Position after `mv`, which must be pseudo-legal for `pos`.
///
/// Placement, castling rights, en-passant target, clocks, side to move and the
/// Zobrist key are all updated; `pos` itself is untouched.
pub fn apply(pos: &Position, mv: Move) -> Position {
    let mut next = *pos;
    let keys = zobrist_keys();
    let color = pos.side_to_move;
    let piece = mv.piece;

    // If an EP file was in the hash, XOR it OUT now (pre-move, pre-flip)
    if let Some(f) = ep_file_to_hash(&pos.board, color, pos.en_passant) {
        next.zobrist ^= keys.ep_file[f as usize];
    }
    next.en_passant = None;

    // Capture
    let capture = if mv.is_en_passant() {
        let cap_sq = Square::new(mv.to.file(), mv.from.rank());
        next.board.remove(cap_sq).map(|(c, p)| (c, p, cap_sq))
    } else {
        next.board.remove(mv.to).map(|(c, p)| (c, p, mv.to))
    };
    if let Some((cap_color, cap_piece, cap_sq)) = capture {
        next.zobrist ^= keys.piece[cap_color as usize][cap_piece as usize][cap_sq.index() as usize];
    }

    // Move the piece, swapping in the promotion piece if any
    next.board.remove(mv.from);
    next.zobrist ^= keys.piece[color as usize][piece as usize][mv.from.index() as usize];
    let placed = mv.promotion.unwrap_or(piece);
    debug_assert!(mv.promotion.is_none() || piece == Piece::Pawn, "Only pawns can promote");
    next.board.put(color, placed, mv.to);
    next.zobrist ^= keys.piece[color as usize][placed as usize][mv.to.index() as usize];

    // Move the rook if castling
    if mv.is_castling()
        && let Some((rook_from, rook_to)) = rook_castle_squares(mv.to)
    {
        next.board.remove(rook_from);
        next.board.put(color, Piece::Rook, rook_to);
        next.zobrist ^= keys.piece[color as usize][Piece::Rook as usize][rook_from.index() as usize];
        next.zobrist ^= keys.piece[color as usize][Piece::Rook as usize][rook_to.index() as usize];
    }

    if mv.is_double_pawn_push() {
        let between = (mv.from.index() + mv.to.index()) / 2;
        next.en_passant = Some(Square::from_index(between));
    }

    // Compute all rights to clear for this move
    let mut mask_to_clear: CastleBits = 0;
    if piece == Piece::King {
        mask_to_clear |= side_flags(color);
    }
    // a rook leaving its corner, or anything captured on a corner
    mask_to_clear |= flag_for_rook_square(mv.from);
    if let Some((_, Piece::Rook, cap_sq)) = capture {
        mask_to_clear |= flag_for_rook_square(cap_sq);
    }
    let old_rights = pos.castling;
    next.castling.remove(mask_to_clear);
    if next.castling != old_rights {
        xor_castling_rights_delta(&mut next.zobrist, keys, old_rights.bits(), next.castling.bits());
    }

    if capture.is_some() || piece == Piece::Pawn {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = pos.halfmove_clock.saturating_add(1);
    }
    if color == Color::Black {
        next.fullmove_number = pos.fullmove_number.saturating_add(1);
    }

    // Flip side-to-move
    next.side_to_move = color.opposite();
    next.zobrist ^= keys.side_to_move;

    if let Some(f) = ep_file_to_hash(&next.board, next.side_to_move, next.en_passant) {
        next.zobrist ^= keys.ep_file[f as usize];
    }

    #[cfg(debug_assertions)]
    debug_assert_valid_ep(&next);

    #[cfg(feature = "paranoid_hash")]
    next.assert_hash();

    next
}

/// Apply `mv` only if it is legal in `pos`.
pub fn try_apply(pos: &Position, mv: Move) -> Result<Position> {
    if !is_legal(pos, mv) {
        return Err(Error::IllegalMove(mv.to_string()));
    }
    Ok(apply(pos, mv))
}

#[cfg(debug_assertions)]
#[inline]
pub(crate) fn debug_assert_valid_ep(pos: &Position) {
    if let Some(ep) = pos.en_passant {
        let expected = match pos.side_to_move {
            // Black just double-pushed → EP on rank 6 (0-based 5)
            Color::White => 5,
            // White just double-pushed → EP on rank 3 (0-based 2)
            Color::Black => 2,
        };
        debug_assert!(
            ep.rank() == expected,
            "EP square on wrong rank: {} with {:?} to move",
            ep,
            pos.side_to_move
        );
    }
}
