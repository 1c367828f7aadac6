use crate::bitboard::{RANK_1, RANK_2, RANK_7, RANK_8, pop_lsb};
use crate::board::{Color, PROMOTION_PIECES, Piece};
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::moves::execute::apply;
use crate::moves::square_control::{in_check, is_square_attacked};
use crate::moves::types::{
    CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, Move, MoveBuffer, MoveList,
    QUEENSIDE_CASTLE, QUIET_MOVE,
};
use crate::position::Position;
use crate::square::Square;

// Castling Constants
const WHITE_KINGSIDE_BETWEEN: u64 = 0x0000_0000_0000_0060;
const WHITE_QUEENSIDE_BETWEEN: u64 = 0x0000_0000_0000_000E;
const BLACK_KINGSIDE_BETWEEN: u64 = 0x6000_0000_0000_0000;
const BLACK_QUEENSIDE_BETWEEN: u64 = 0x0E00_0000_0000_0000;

/// Helper functionality to push latest found move
#[inline(always)]
fn push_piece_moves(from: u8, mut targets: u64, enemy: u64, move_piece: Piece, move_list: &mut impl MoveBuffer) {
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let is_cap = (enemy >> to) & 1 != 0;
        move_list.push(Move::new(
            Square::from_index(from),
            Square::from_index(to),
            move_piece,
            if is_cap { CAPTURE } else { QUIET_MOVE },
        ));
    }
}

#[inline(always)]
fn push_promotions(from: u8, to: u8, capture: bool, move_list: &mut impl MoveBuffer) {
    for &promo in PROMOTION_PIECES.iter() {
        move_list.push(Move::promote(Square::from_index(from), Square::from_index(to), promo, capture));
    }
}

/// Function to determine which squares must be empty for kingside castling
#[inline(always)]
fn kingside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_KINGSIDE_BETWEEN,
        Color::Black => BLACK_KINGSIDE_BETWEEN,
    }
}

/// Function to determine which squares must be empty for queenside castling
#[inline(always)]
fn queenside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_QUEENSIDE_BETWEEN,
        Color::Black => BLACK_QUEENSIDE_BETWEEN,
    }
}

/// Knights, bishops, rooks and queens share one shape: attack set minus own pieces.
fn generate_piece_moves(pos: &Position, piece: Piece, move_list: &mut impl MoveBuffer) {
    let board = &pos.board;
    let color = pos.side_to_move;
    let friendly = board.occupancy(color);
    let enemy = board.occupancy(color.opposite());
    let blockers = board.occupied();

    let mut bb = board.pieces(piece, color);
    while bb != 0 {
        let from = pop_lsb(&mut bb);
        let sq = Square::from_index(from);
        let attacks = match piece {
            Piece::Knight => knight_attacks(sq),
            Piece::Bishop => bishop_attacks(sq, blockers),
            Piece::Rook => rook_attacks(sq, blockers),
            Piece::Queen => queen_attacks(sq, blockers),
            Piece::Pawn | Piece::King => 0,
        };
        push_piece_moves(from, attacks & !friendly, enemy, piece, move_list);
    }
}

pub fn generate_knight_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(pos, Piece::Knight, move_list);
}

pub fn generate_bishop_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(pos, Piece::Bishop, move_list);
}

pub fn generate_rook_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(pos, Piece::Rook, move_list);
}

pub fn generate_queen_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(pos, Piece::Queen, move_list);
}

/// King steps plus castling. Castling is emitted only when fully legal: right held,
/// rook at home, squares between empty, king not in check and not crossing or
/// landing on an attacked square.
pub fn generate_king_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let board = &pos.board;
    let color = pos.side_to_move;
    let Some(king_sq) = board.king_square(color) else {
        return; // illegal position safeguard
    };
    let from = king_sq.index();
    let friendly = board.occupancy(color);
    let enemy = board.occupancy(color.opposite());

    push_piece_moves(from, king_attacks(king_sq) & !friendly, enemy, Piece::King, move_list);

    let back = color.back_rank();
    if king_sq != Square::new(4, back) {
        return;
    }
    let rights = pos.castling;
    let can_kingside = rights.has_kingside(color);
    let can_queenside = rights.has_queenside(color);
    if !can_kingside && !can_queenside {
        return;
    }

    let opp = color.opposite();
    if is_square_attacked(board, king_sq, opp) {
        return;
    }
    let occ = board.occupied();
    let own_rook = Some((color, Piece::Rook));

    if can_kingside
        && occ & kingside_between(color) == 0
        && board.piece_at(Square::new(7, back)) == own_rook
        && !is_square_attacked(board, Square::new(5, back), opp)
        && !is_square_attacked(board, Square::new(6, back), opp)
    {
        move_list.push(Move::new(king_sq, Square::new(6, back), Piece::King, KINGSIDE_CASTLE));
    }

    // b-file only needs to be empty, the king never crosses it
    if can_queenside
        && occ & queenside_between(color) == 0
        && board.piece_at(Square::new(0, back)) == own_rook
        && !is_square_attacked(board, Square::new(3, back), opp)
        && !is_square_attacked(board, Square::new(2, back), opp)
    {
        move_list.push(Move::new(king_sq, Square::new(2, back), Piece::King, QUEENSIDE_CASTLE));
    }
}

pub fn generate_pawn_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let board = &pos.board;
    let color = pos.side_to_move;
    let pawns = board.pieces(Piece::Pawn, color);
    let enemy = board.occupancy(color.opposite());
    let empty = !board.occupied();

    let (double_rank, promo_rank) = match color {
        Color::White => (RANK_2, RANK_8),
        Color::Black => (RANK_7, RANK_1),
    };
    let forward = |bb: u64| match color {
        Color::White => bb << 8,
        Color::Black => bb >> 8,
    };
    let back = |to: u8, n: u8| match color {
        Color::White => to - n,
        Color::Black => to + n,
    };

    // ===== 1) Single pushes, promotions included =====
    let single_pushes = forward(pawns) & empty;
    let mut bb = single_pushes;
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        let from = back(to, 8);
        if promo_rank >> to & 1 != 0 {
            push_promotions(from, to, false, move_list);
        } else {
            move_list.push(Move::new(Square::from_index(from), Square::from_index(to), Piece::Pawn, QUIET_MOVE));
        }
    }

    // ===== 2) Double pushes =====
    let mut bb = forward(forward(pawns & double_rank) & empty) & empty;
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        let from = back(to, 16);
        move_list.push(Move::new(
            Square::from_index(from),
            Square::from_index(to),
            Piece::Pawn,
            DOUBLE_PAWN_PUSH,
        ));
    }

    // ===== 3) Captures, promotions included =====
    let mut attackers = pawns;
    while attackers != 0 {
        let from = pop_lsb(&mut attackers);
        let mut targets = pawn_attacks(Square::from_index(from), color) & enemy;
        while targets != 0 {
            let to = pop_lsb(&mut targets);
            if promo_rank >> to & 1 != 0 {
                push_promotions(from, to, true, move_list);
            } else {
                move_list.push(Move::new(Square::from_index(from), Square::from_index(to), Piece::Pawn, CAPTURE));
            }
        }
    }

    // ===== 4) En passant =====
    if let Some(ep) = pos.en_passant {
        // the captured pawn sits beside the capturer, on the capturer's rank
        let captured = Square::from_index(back(ep.index(), 8));
        if empty >> ep.index() & 1 != 0 && board.piece_at(captured) == Some((color.opposite(), Piece::Pawn)) {
            let mut atk = pawn_attacks(ep, color.opposite()) & pawns;
            while atk != 0 {
                let from = pop_lsb(&mut atk);
                move_list.push(Move::new(Square::from_index(from), ep, Piece::Pawn, EN_PASSANT));
            }
        }
    }
}

/// Every move obeying piece movement rules; own-king safety is not checked
/// except for castling.
pub fn generate_pseudo_legal(pos: &Position, moves: &mut impl MoveBuffer) {
    moves.clear();
    generate_pawn_moves(pos, moves);
    generate_knight_moves(pos, moves);
    generate_bishop_moves(pos, moves);
    generate_rook_moves(pos, moves);
    generate_queen_moves(pos, moves);
    generate_king_moves(pos, moves);
}

/// Does playing `mv` leave the mover's own king safe?
#[inline]
fn keeps_king_safe(pos: &Position, mv: Move) -> bool {
    let mover = pos.side_to_move;
    let next = apply(pos, mv);
    !in_check(&next.board, mover)
}

/// Pseudo-legal generation followed by the king-safety filter.
pub fn generate_legal(pos: &Position, moves: &mut impl MoveBuffer) {
    let mut scratch = MoveList::new();
    generate_pseudo_legal(pos, &mut scratch);
    moves.clear();
    for mv in scratch.iter().copied() {
        if keeps_king_safe(pos, mv) {
            moves.push(mv);
        }
    }
}

/// All legal moves in generation order.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_legal(pos, &mut moves);
    moves
}

/// Legal moves of the piece on `sq`; empty when the square is empty or holds
/// an opponent piece.
pub fn moves_from(pos: &Position, sq: Square) -> Vec<Move> {
    if pos.board.color_at(sq) != Some(pos.side_to_move) {
        return Vec::new();
    }
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);
    moves.into_iter().filter(|mv| mv.from == sq).collect()
}

/// Is `mv` one of the legal moves in `pos`? Flags must match as generated.
pub fn is_legal(pos: &Position, mv: Move) -> bool {
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);
    moves.contains(&mv)
}

/// True when the side to move has at least one legal move. Stops at the first.
pub fn has_legal_move(pos: &Position) -> bool {
    let mut scratch = MoveList::new();
    generate_pseudo_legal(pos, &mut scratch);
    scratch.iter().any(|&mv| keeps_king_safe(pos, mv))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let moves = legal_moves(&Position::new());
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|m| m.is_double_pawn_push()).count(), 8);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // knight on e2 is pinned by the rook on e8
        let p = pos("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves_from(&p, "e2".parse().unwrap()).is_empty());
    }

    #[test]
    fn castling_both_sides_when_clear() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = legal_moves(&p).into_iter().filter(|m| m.is_castling()).collect();
        assert_eq!(castles.len(), 2);
    }

    #[test]
    fn b_file_attack_does_not_stop_queenside_castle() {
        let p = pos("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(legal_moves(&p).iter().any(|m| m.is_queenside_castle()));
    }

    #[test]
    fn en_passant_only_when_target_set() {
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(legal_moves(&p).iter().any(|m| m.is_en_passant()));
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
        assert!(!legal_moves(&p).iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn promotions_come_in_fours() {
        let p = pos("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        let promos = moves_from(&p, "e7".parse().unwrap());
        assert_eq!(promos.len(), 4);
        assert!(promos.iter().all(|m| m.is_promotion() && !m.is_capture()));
    }

    #[test]
    fn opponent_square_yields_nothing() {
        let p = Position::new();
        assert!(moves_from(&p, "e7".parse().unwrap()).is_empty());
        assert!(moves_from(&p, "e4".parse().unwrap()).is_empty());
        assert_eq!(moves_from(&p, "g1".parse().unwrap()).len(), 2);
    }
}
