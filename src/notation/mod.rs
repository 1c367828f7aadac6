//! Move notations: coordinate and SAN. FEN lives with [`crate::position`].

pub mod coord;
pub mod san;

pub use coord::{parse_coord, parse_coord_parts};
pub use san::{SanMove, SanParseError, parse_san, to_san};

use crate::error::Result;
use crate::moves::types::Move;
use crate::position::Position;

/// Accepts either notation: a token shaped like a coordinate move is read as
/// one, anything else as SAN.
pub fn parse_move(pos: &Position, text: &str) -> Result<Move> {
    if parse_coord_parts(text).is_some() {
        parse_coord(pos, text)
    } else {
        parse_san(pos, text)
    }
}
