use crate::moves::{
    execute::apply,
    movegen::{generate_legal, has_legal_move},
    types::{Move, MoveList},
};
use crate::position::Position;
use tracing::{debug, instrument};

const MAX_LOG_DEPTH: u32 = 3; // only trace details for shallow nodes

/// Leaf statistics in the usual perft-table layout: every counter describes the
/// moves made at the last ply and the positions they lead to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn zero() -> Self {
        Self::default()
    }
}

fn perft_recursive(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    // bulk count
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mv| perft_recursive(&apply(pos, mv), depth - 1))
        .sum()
}

/// Number of leaf positions reachable in exactly `depth` plies.
#[instrument(skip(pos), fields(depth))]
pub fn perft(pos: &Position, depth: u32) -> u64 {
    perft_recursive(pos, depth)
}

/// Per-root-move leaf counts, in generation order.
#[instrument(skip(pos), fields(depth))]
pub fn perft_divide(pos: &Position, depth: u32) -> Vec<(Move, u64)> {
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    if depth <= MAX_LOG_DEPTH {
        debug!(depth, moves = moves.len(), "divide: root legal moves");
    }
    if depth == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(moves.len());
    let mut total = 0;
    for &mv in moves.iter() {
        let count = perft_recursive(&apply(pos, mv), depth - 1);
        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, nodes = count, "divide: root child total");
        }
        total += count;
        out.push((mv, count));
    }

    debug!(depth, total, "divide: total");
    out
}

fn perft_count_recursive(pos: &Position, depth: u32, out: &mut PerftCounters) {
    if depth == 0 {
        out.nodes += 1;
        return;
    }

    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    for &mv in moves.iter() {
        let child = apply(pos, mv);

        #[cfg(debug_assertions)]
        debug_assert_eq!(child.compute_zobrist_full(), child.zobrist(), "full recompute mismatch");

        if depth > 1 {
            perft_count_recursive(&child, depth - 1, out);
            continue;
        }

        // --- breakdown tags at the last ply (edge-based) ---
        out.nodes += 1;
        if mv.is_capture() {
            out.captures += 1;
            if mv.is_en_passant() {
                out.ep_captures += 1;
            }
        }
        if mv.is_castling() {
            out.castles += 1;
        }
        if mv.is_promotion() {
            out.promotions += 1;
        }
        if child.in_check() {
            out.checks += 1;
            if !has_legal_move(&child) {
                out.checkmates += 1;
            }
        }
    }
}

/// Leaf count plus capture / castle / check breakdown at `depth`.
#[instrument(skip(pos), fields(depth))]
pub fn perft_with_breakdown(pos: &Position, depth: u32) -> PerftCounters {
    let mut out = PerftCounters::zero();
    perft_count_recursive(pos, depth, &mut out);
    out
}
