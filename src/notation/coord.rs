//! Coordinate notation: origin and destination squares plus an optional
//! promotion letter (`e2e4`, `e7e8q`). Output is `Move`'s `Display`.

use crate::board::Piece;
use crate::error::{Error, Result};
use crate::moves::movegen::legal_moves;
use crate::moves::types::Move;
use crate::position::Position;
use crate::square::Square;

/// Split a coordinate token into its parts without consulting a position.
/// The promotion letter may be either case and may follow an `=`.
pub fn parse_coord_parts(text: &str) -> Option<(Square, Square, Option<Piece>)> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=6).contains(&text.len()) {
        return None;
    }
    let from: Square = text[0..2].parse().ok()?;
    let to: Square = text[2..4].parse().ok()?;
    let rest = &text[4..];
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let promotion = match rest.as_bytes() {
        [] => None,
        [c] => match c.to_ascii_lowercase() {
            b'q' => Some(Piece::Queen),
            b'r' => Some(Piece::Rook),
            b'b' => Some(Piece::Bishop),
            b'n' => Some(Piece::Knight),
            _ => return None,
        },
        _ => return None,
    };
    Some((from, to, promotion))
}

/// Resolve a coordinate token to the legal move it names.
pub fn parse_coord(pos: &Position, text: &str) -> Result<Move> {
    let (from, to, promotion) =
        parse_coord_parts(text).ok_or_else(|| Error::InvalidMove(text.to_string()))?;

    let legal = legal_moves(pos);
    if let Some(mv) = legal.iter().find(|m| m.matches(from, to, promotion)) {
        return Ok(*mv);
    }
    if promotion.is_none() && legal.iter().any(|m| m.from == from && m.to == to && m.is_promotion()) {
        return Err(Error::InvalidMove(format!("{text}: missing promotion piece")));
    }
    Err(Error::IllegalMove(text.to_string()))
}
