// src/hash/zobrist.rs

use crate::bitboard::{FILE_A, FILE_H};
use crate::board::castle_bits::*;
use crate::board::{Board, Color, Piece};
use crate::square::Square;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed seed: repetition keys must be identical from run to run.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub struct ZobristKeys {
    /// [color][piece][square] with {White=0, Black=1} and {P,N,B,R,Q,K}={0..5}
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [0]=K, [1]=Q, [2]=k, [3]=q  (bit order K,Q,k,q)
    pub castling: [u64; 4],
    /// a..h => 0..7
    pub ep_file: [u64; 8],
}

#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: CastleBits, new_: CastleBits) {
    let d = old ^ new_;
    for (i, flag) in [CASTLE_WK, CASTLE_WQ, CASTLE_BK, CASTLE_BQ].into_iter().enumerate() {
        if d & flag != 0 {
            *hash ^= keys.castling[i];
        }
    }
}

/// Returns Some(file 0..7) if the en-passant square should contribute to the hash; else None.
/// It counts only when `side_to_move` has a pawn that could capture onto it (pins ignored),
/// so positions differing only in an unusable target hash the same.
pub fn ep_file_to_hash(board: &Board, side_to_move: Color, en_passant: Option<Square>) -> Option<u8> {
    let ep = en_passant?;
    let r = ep.rank();
    if !(r == 2 || r == 5) {
        return None;
    }

    let bb_s: u64 = ep.bit();
    let has_capturing_pawn = match side_to_move {
        Color::White => {
            let src_ne = (bb_s >> 9) & !FILE_H;
            let src_nw = (bb_s >> 7) & !FILE_A;
            ((src_ne | src_nw) & board.pieces(Piece::Pawn, Color::White)) != 0
        }
        Color::Black => {
            let src_se = (bb_s << 7) & !FILE_H;
            let src_sw = (bb_s << 9) & !FILE_A;
            ((src_se | src_sw) & board.pieces(Piece::Pawn, Color::Black)) != 0
        }
    };

    if has_capturing_pawn { Some(ep.file()) } else { None }
}

// Global keys, initialized on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_zobrist_keys_with_rng(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_zobrist_keys_with_rng(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // avoid zero keys to reduce degenerate collisions
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }
    for i in 0..4 {
        keys.castling[i] = non_zero(&mut rng);
    }
    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}

/// Full key from scratch. The incremental key kept by `Position` must always equal this.
pub fn compute_hash(
    board: &Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> u64 {
    let keys = zobrist_keys();
    let mut hash: u64 = 0;

    for ci in 0..2 {
        for pi in 0..6 {
            let mut bb = board.piece_bb[ci][pi];
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                hash ^= keys.piece[ci][pi][sq];
                bb &= bb - 1;
            }
        }
    }

    if side_to_move == Color::Black {
        hash ^= keys.side_to_move;
    }

    xor_castling_rights_delta(&mut hash, keys, 0, castling.bits());

    if let Some(file) = ep_file_to_hash(board, side_to_move, en_passant) {
        hash ^= keys.ep_file[file as usize];
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_and_non_zero() {
        let a = generate_zobrist_keys_with_rng(StdRng::seed_from_u64(ZOBRIST_SEED));
        let b = zobrist_keys();
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.piece[1][5][63], b.piece[1][5][63]);
        assert!(b.castling.iter().all(|&k| k != 0));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let board = Board::starting();
        let w = compute_hash(&board, Color::White, CastlingRights::ALL, None);
        let b = compute_hash(&board, Color::Black, CastlingRights::ALL, None);
        assert_eq!(w ^ b, zobrist_keys().side_to_move);
    }

    #[test]
    fn unusable_en_passant_square_is_not_hashed() {
        // After 1. e4 no black pawn can take on e3.
        let mut board = Board::starting();
        let e2: Square = "e2".parse().unwrap();
        let e4: Square = "e4".parse().unwrap();
        board.remove(e2);
        board.put(Color::White, Piece::Pawn, e4);
        let e3: Square = "e3".parse().unwrap();
        assert_eq!(ep_file_to_hash(&board, Color::Black, Some(e3)), None);
    }
}
