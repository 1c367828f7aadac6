//! Precomputed attack tables: leapers by lookup, sliders by ray and first blocker.

use crate::bitboard::BitboardExt;
use crate::board::{Color, Piece};
use crate::square::Square;
use once_cell::sync::Lazy;

/// Ray directions as (file step, rank step). The first four run toward higher
/// square indices, the last four toward lower ones.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (-1, 1),  // NW
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
    (1, -1),  // SE
];

const ROOK_DIRS: [usize; 4] = [0, 2, 4, 6];
const BISHOP_DIRS: [usize; 4] = [1, 3, 5, 7];

const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_STEPS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

struct AttackTables {
    knight: [u64; 64],
    king: [u64; 64],
    /// [color][square]
    pawn: [[u64; 64]; 2],
    /// [direction][square], excluding the origin square
    rays: [[u64; 64]; 8],
}

static TABLES: Lazy<AttackTables> = Lazy::new(build_tables);

/// Walk from `sq` in steps of (df, dr) until the board edge or `on_square` says stop.
#[inline]
fn scan_ray(sq: Square, df: i8, dr: i8, mut on_square: impl FnMut(Square) -> bool) {
    let mut cur = sq.offset(df, dr);
    while let Some(s) = cur {
        if !on_square(s) {
            break;
        }
        cur = s.offset(df, dr);
    }
}

fn leaper_mask(sq: Square, steps: &[(i8, i8)]) -> u64 {
    steps
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .fold(0u64, |bb, s| bb | s.bit())
}

fn build_tables() -> AttackTables {
    let mut t = AttackTables {
        knight: [0; 64],
        king: [0; 64],
        pawn: [[0; 64]; 2],
        rays: [[0; 64]; 8],
    };
    for sq in Square::all() {
        let i = sq.index() as usize;
        t.knight[i] = leaper_mask(sq, &KNIGHT_STEPS);
        t.king[i] = leaper_mask(sq, &KING_STEPS);
        t.pawn[Color::White as usize][i] = leaper_mask(sq, &[(-1, 1), (1, 1)]);
        t.pawn[Color::Black as usize][i] = leaper_mask(sq, &[(-1, -1), (1, -1)]);
        for (d, &(df, dr)) in DIRECTIONS.iter().enumerate() {
            let mut ray = 0u64;
            scan_ray(sq, df, dr, |s| {
                ray |= s.bit();
                true
            });
            t.rays[d][i] = ray;
        }
    }
    t
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> u64 {
    TABLES.knight[sq.index() as usize]
}

#[inline(always)]
pub fn king_attacks(sq: Square) -> u64 {
    TABLES.king[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` attacks (diagonally forward).
#[inline(always)]
pub fn pawn_attacks(sq: Square, color: Color) -> u64 {
    TABLES.pawn[color as usize][sq.index() as usize]
}

/// Ray attack in one direction, stopping at (and including) the first blocker.
#[inline(always)]
fn ray_attacks(dir: usize, sq: Square, occupied: u64) -> u64 {
    let ray = TABLES.rays[dir][sq.index() as usize];
    let blockers = ray & occupied;
    if blockers == 0 {
        return ray;
    }
    let first = if dir < 4 { blockers.lsb() } else { blockers.msb() };
    ray ^ TABLES.rays[dir][first as usize]
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: u64) -> u64 {
    ROOK_DIRS.iter().fold(0, |bb, &d| bb | ray_attacks(d, sq, occupied))
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: u64) -> u64 {
    BISHOP_DIRS.iter().fold(0, |bb, &d| bb | ray_attacks(d, sq, occupied))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: u64) -> u64 {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Squares `piece` of `color` standing on `sq` attacks given the occupancy.
pub fn attacks_from(piece: Piece, color: Color, sq: Square, occupied: u64) -> u64 {
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}
