//! FEN parsing and emission.
//!
//! Parsing is strict: six whitespace-separated fields, and the resulting
//! position must satisfy the board invariants (one king per side, no pawns on
//! the back ranks, the side that just moved not left in check, castling rights
//! and en-passant target consistent with the placement).

use super::Position;
use crate::bitboard::{RANK_1, RANK_8};
use crate::board::castle_bits::*;
use crate::board::fen_tables::{char_piece, piece_char};
use crate::board::{Board, COLORS, Color, Piece};
use crate::moves::square_control::is_square_attacked;
use crate::square::Square;
use thiserror::Error;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Why a FEN string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN string missing the {0} field")]
    MissingField(&'static str),
    #[error("FEN string has {0} fields, expected 6")]
    TooManyFields(usize),
    #[error("unexpected character `{0}` in piece placement")]
    InvalidPiece(char),
    #[error("rank {rank} describes {squares} squares, expected 8")]
    BadRankLength { rank: u8, squares: u8 },
    #[error("rank {0} has two empty-square counts in a row")]
    ConsecutiveDigits(u8),
    #[error("piece placement has {0} ranks, expected 8")]
    WrongRankCount(usize),
    #[error("side to move must be `w` or `b`, got `{0}`")]
    InvalidSideToMove(String),
    #[error("invalid castling field `{0}`")]
    InvalidCastling(String),
    #[error("invalid en-passant field `{0}`")]
    InvalidEnPassant(String),
    #[error("invalid {field} `{value}`")]
    InvalidClock { field: &'static str, value: String },
    #[error("{color} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: u32 },
    #[error("{color} has too many pieces")]
    TooManyPieces { color: Color },
    #[error("pawn on the first or eighth rank")]
    PawnOnBackRank,
    #[error("the side not to move is in check")]
    OpponentInCheck,
    #[error("castling right `{0}` does not match king and rook placement")]
    InconsistentCastling(char),
}

pub(crate) fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() > 6 {
        return Err(FenError::TooManyFields(fields.len()));
    }
    let field = |i: usize, name: &'static str| fields.get(i).copied().ok_or(FenError::MissingField(name));

    let board = parse_placement(field(0, "piece placement")?)?;

    let side_to_move = match field(1, "side to move")? {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSideToMove(other.to_string())),
    };

    let castling = parse_castling(field(2, "castling")?)?;
    let en_passant = parse_en_passant(field(3, "en passant")?)?;
    let halfmove_clock = parse_clock(field(4, "halfmove clock")?, "halfmove clock")?;
    let fullmove_number = parse_clock(field(5, "fullmove number")?, "fullmove number")?;
    if fullmove_number == 0 {
        return Err(FenError::InvalidClock {
            field: "fullmove number",
            value: "0".to_string(),
        });
    }

    let mut pos = Position {
        board,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
        zobrist: 0,
    };
    validate(&pos)?;
    pos.refresh_zobrist();
    Ok(pos)
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount(ranks.len()));
    }

    let mut board = Board::new_empty();
    // FEN lists rank 8 first.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: u8 = 0;
        let mut after_digit = false;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::InvalidPiece(c));
                }
                if after_digit {
                    return Err(FenError::ConsecutiveDigits(rank + 1));
                }
                after_digit = true;
                file += skip as u8;
            } else {
                after_digit = false;
                let (piece, color) = char_piece(c).ok_or(FenError::InvalidPiece(c))?;
                if file >= 8 {
                    return Err(FenError::BadRankLength { rank: rank + 1, squares: file + 1 });
                }
                board.put(color, piece, Square::new(file, rank));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::BadRankLength { rank: rank + 1, squares: file });
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank: rank + 1, squares: file });
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let flag = match c {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
        if rights.has(flag) {
            return Err(FenError::InvalidCastling(field.to_string()));
        }
        rights.insert(flag);
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    field
        .parse::<Square>()
        .map(Some)
        .map_err(|_| FenError::InvalidEnPassant(field.to_string()))
}

/// Plain decimal digits only; `u32::from_str` would also take a leading `+`.
fn parse_clock(field: &str, name: &'static str) -> Result<u32, FenError> {
    let invalid = || FenError::InvalidClock {
        field: name,
        value: field.to_string(),
    };
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    field.parse::<u32>().map_err(|_| invalid())
}

fn validate(pos: &Position) -> Result<(), FenError> {
    let board = &pos.board;

    for color in COLORS {
        let count = board.count(Piece::King, color);
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
        if board.count(Piece::Pawn, color) > 8 || board.occupancy(color).count_ones() > 16 {
            return Err(FenError::TooManyPieces { color });
        }
    }

    let pawns = board.pieces(Piece::Pawn, Color::White) | board.pieces(Piece::Pawn, Color::Black);
    if pawns & (RANK_1 | RANK_8) != 0 {
        return Err(FenError::PawnOnBackRank);
    }

    if pos.is_in_check(pos.side_to_move.opposite()) {
        return Err(FenError::OpponentInCheck);
    }

    validate_castling(board, pos.castling)?;
    validate_en_passant(pos)?;
    Ok(())
}

fn validate_castling(board: &Board, rights: CastlingRights) -> Result<(), FenError> {
    let checks = [
        (CASTLE_WK, 'K', Color::White, Square::E1, Square::H1),
        (CASTLE_WQ, 'Q', Color::White, Square::E1, Square::A1),
        (CASTLE_BK, 'k', Color::Black, Square::E8, Square::H8),
        (CASTLE_BQ, 'q', Color::Black, Square::E8, Square::A8),
    ];
    for (flag, glyph, color, king_sq, rook_sq) in checks {
        if !rights.has(flag) {
            continue;
        }
        let king_home = board.piece_at(king_sq) == Some((color, Piece::King));
        let rook_home = board.piece_at(rook_sq) == Some((color, Piece::Rook));
        if !(king_home && rook_home) {
            return Err(FenError::InconsistentCastling(glyph));
        }
    }
    Ok(())
}

/// The target must sit behind a pawn that could just have made a double push.
fn validate_en_passant(pos: &Position) -> Result<(), FenError> {
    let Some(ep) = pos.en_passant else {
        return Ok(());
    };
    let mover = pos.side_to_move;
    let pusher = mover.opposite();
    let (target_rank, forward) = match mover {
        Color::White => (5u8, -1i8),
        Color::Black => (2u8, 1i8),
    };
    let bad = || FenError::InvalidEnPassant(ep.to_string());
    if ep.rank() != target_rank {
        return Err(bad());
    }
    // The pushed pawn stands one step past the target, its origin one step before.
    let pawn_sq = ep.offset(0, forward).ok_or_else(bad)?;
    let origin_sq = ep.offset(0, -forward).ok_or_else(bad)?;
    if pos.board.piece_at(pawn_sq) != Some((pusher, Piece::Pawn))
        || pos.board.piece_at(ep).is_some()
        || pos.board.piece_at(origin_sq).is_some()
    {
        return Err(bad());
    }
    Ok(())
}

pub(crate) fn write_fen(pos: &Position) -> String {
    let mut out = String::with_capacity(90);
    for rank in (0..8u8).rev() {
        let mut empty = 0u8;
        for file in 0..8u8 {
            match pos.board.piece_at(Square::new(file, rank)) {
                Some((color, piece)) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece_char(piece, color));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match pos.side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    out.push(' ');
    out.push_str(&pos.castling.to_string());
    out.push(' ');
    match pos.en_passant {
        Some(sq) => out.push_str(&sq.to_string()),
        None => out.push('-'),
    }
    out.push_str(&format!(" {} {}", pos.halfmove_clock, pos.fullmove_number));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_fen_round_trips() {
        let pos = parse_fen(START_FEN).unwrap();
        assert_eq!(pos, Position::new());
        assert_eq!(write_fen(&pos), START_FEN);
    }

    #[test]
    fn en_passant_target_is_kept_after_double_push() {
        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
        let pos = parse_fen(fen).unwrap();
        assert_eq!(pos.en_passant(), Some(Square::new(4, 2)));
        assert_eq!(write_fen(&pos), fen);
    }

    #[test]
    fn field_count_errors() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w"),
            Err(FenError::MissingField("castling"))
        );
        assert_eq!(
            parse_fen(&format!("{START_FEN} extra")),
            Err(FenError::TooManyFields(7))
        );
    }

    #[test]
    fn placement_errors() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1"),
            Err(FenError::WrongRankCount(7))
        );
        assert!(matches!(
            parse_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::BadRankLength { rank: 7, squares: 7 })
        ));
        assert_eq!(
            parse_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece('x'))
        );
        assert!(matches!(
            parse_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece('9'))
        ));
    }

    #[test]
    fn invariant_errors() {
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::KingCount { color: Color::Black, count: 0 })
        ));
        assert_eq!(
            parse_fen("k6P/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::PawnOnBackRank)
        );
        // Black to move would capture the white king.
        assert_eq!(
            parse_fen("k7/8/8/8/8/8/8/K6r b - - 0 1"),
            Err(FenError::OpponentInCheck)
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w KQkq - 0 1"),
            Err(FenError::InconsistentCastling('K'))
        );
    }

    #[test]
    fn field_value_errors() {
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 x - - 0 1"),
            Err(FenError::InvalidSideToMove(_))
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w KK - 0 1"),
            Err(FenError::InvalidCastling(_))
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w - e3 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w - - x 1"),
            Err(FenError::InvalidClock { field: "halfmove clock", .. })
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w - - 0 0"),
            Err(FenError::InvalidClock { field: "fullmove number", .. })
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w - - +3 1"),
            Err(FenError::InvalidClock { field: "halfmove clock", .. })
        ));
        assert!(matches!(
            parse_fen("k7/8/8/8/8/8/8/K7 w - - 0 +1"),
            Err(FenError::InvalidClock { field: "fullmove number", .. })
        ));
    }

    #[test]
    fn adjacent_empty_counts_are_rejected() {
        assert_eq!(
            parse_fen("k7/8/8/44/8/8/8/K7 w - - 0 1"),
            Err(FenError::ConsecutiveDigits(5))
        );
        assert_eq!(
            parse_fen("k7/8/8/8/8/8/8/K16 w - - 0 1"),
            Err(FenError::ConsecutiveDigits(1))
        );
    }
}
