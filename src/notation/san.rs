//! Standard Algebraic Notation.
//!
//! A [`SanMove`] is the syntactic form of a SAN token. It carries less
//! information than a [`Move`] (no origin square for most moves), so turning
//! one into the other always goes through a position: [`to_san`] and
//! [`parse_san`].

use crate::board::Piece;
use crate::error::{Error, Result};
use crate::moves::execute::apply;
use crate::moves::movegen::{has_legal_move, legal_moves};
use crate::moves::types::Move;
use crate::position::Position;
use crate::square::Square;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum SanMove {
    PawnPush {
        target: Square,
        promoting_to: Option<Piece>,
    },
    PawnCapture {
        origin_file: u8,
        target: Square,
        promoting_to: Option<Piece>,
    },
    PieceMove {
        moving_piece: Piece,
        origin_file: Option<u8>,
        origin_rank: Option<u8>,
        is_capture: bool,
        target: Square,
    },
    KingSideCastle,
    QueenSideCastle,
}

/// Errors that may arise when parsing SAN tokens.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Error)]
pub enum SanParseError {
    #[error("SAN moves are ASCII")]
    NonAscii,
    #[error("SAN moves are at least 2 characters, got {0}")]
    TooLittleChars(usize),
    #[error("Missing target square")]
    MissingTargetSquare,
    #[error("Invalid target square")]
    InvalidTargetSquare,
    #[error("First character is invalid for SAN moves")]
    InvalidFirstCharacter,
    #[error("Cannot promote to `{0}`")]
    InvalidPromotion(char),
    #[error("{0} characters left unconsumed after successful SAN parse")]
    UnconsumedChars(usize),
}

fn file_of(b: u8) -> Option<u8> {
    (b'a'..=b'h').contains(&b).then(|| b - b'a')
}

fn rank_of(b: u8) -> Option<u8> {
    (b'1'..=b'8').contains(&b).then(|| b - b'1')
}

fn square_at(s: &str, at: usize) -> std::result::Result<Square, SanParseError> {
    s.get(at..at + 2)
        .ok_or(SanParseError::MissingTargetSquare)?
        .parse::<Square>()
        .map_err(|_| SanParseError::InvalidTargetSquare)
}

/// Parses `=Q` or a bare `Q` after a pawn target; `rest` is what follows the target.
fn promotion_suffix(rest: &str) -> std::result::Result<Option<Piece>, SanParseError> {
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let mut chars = rest.chars();
    let Some(c) = chars.next() else {
        return Ok(None);
    };
    let piece = match Piece::from_san_letter(c.to_ascii_uppercase()) {
        Some(p @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => p,
        _ => return Err(SanParseError::InvalidPromotion(c)),
    };
    match chars.as_str().len() {
        0 => Ok(Some(piece)),
        n => Err(SanParseError::UnconsumedChars(n)),
    }
}

impl FromStr for SanMove {
    type Err = SanParseError;

    /// Check and mate markers and `!`/`?` glyphs are dropped; `0-0` reads as `O-O`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err(SanParseError::NonAscii);
        }
        let s = s.trim().trim_end_matches(['+', '#', '!', '?']);
        match s {
            "O-O" | "0-0" => return Ok(Self::KingSideCastle),
            "O-O-O" | "0-0-0" => return Ok(Self::QueenSideCastle),
            _ => {}
        }
        if s.len() < 2 {
            return Err(SanParseError::TooLittleChars(s.len()));
        }
        let bytes = s.as_bytes();

        if let Some(moving_piece) = Piece::from_san_letter(bytes[0] as char) {
            // Piece move: letter, optional file/rank hints, optional 'x', target
            let body: Vec<u8> = bytes[1..].iter().copied().filter(|&b| b != b'x').collect();
            let is_capture = body.len() + 1 < bytes.len();
            if body.len() < 2 {
                return Err(SanParseError::MissingTargetSquare);
            }
            let (hints, target) = body.split_at(body.len() - 2);
            let target = std::str::from_utf8(target)
                .ok()
                .and_then(|t| t.parse::<Square>().ok())
                .ok_or(SanParseError::InvalidTargetSquare)?;
            let (origin_file, origin_rank) = match *hints {
                [] => (None, None),
                [h] => match (file_of(h), rank_of(h)) {
                    (Some(f), _) => (Some(f), None),
                    (None, Some(r)) => (None, Some(r)),
                    _ => return Err(SanParseError::UnconsumedChars(1)),
                },
                [f, r] => match (file_of(f), rank_of(r)) {
                    (Some(f), Some(r)) => (Some(f), Some(r)),
                    _ => return Err(SanParseError::UnconsumedChars(2)),
                },
                _ => return Err(SanParseError::UnconsumedChars(hints.len())),
            };
            Ok(Self::PieceMove {
                moving_piece,
                origin_file,
                origin_rank,
                is_capture,
                target,
            })
        } else if let Some(file) = file_of(bytes[0]) {
            if rank_of(bytes[1]).is_some() {
                // Pawn push
                let target = square_at(s, 0)?;
                let promoting_to = promotion_suffix(&s[2..])?;
                Ok(Self::PawnPush { target, promoting_to })
            } else if bytes[1] == b'x' {
                // Pawn capture
                let target = square_at(s, 2)?;
                let promoting_to = promotion_suffix(&s[4..])?;
                Ok(Self::PawnCapture {
                    origin_file: file,
                    target,
                    promoting_to,
                })
            } else {
                Err(SanParseError::MissingTargetSquare)
            }
        } else {
            Err(SanParseError::InvalidFirstCharacter)
        }
    }
}

impl fmt::Display for SanMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let promo = |f: &mut fmt::Formatter<'_>, p: Option<Piece>| match p.and_then(Piece::san_letter) {
            Some(letter) => write!(f, "={letter}"),
            None => Ok(()),
        };
        match *self {
            Self::PawnPush { target, promoting_to } => {
                write!(f, "{target}")?;
                promo(f, promoting_to)
            }
            Self::PawnCapture {
                origin_file,
                target,
                promoting_to,
            } => {
                write!(f, "{}x{target}", (b'a' + origin_file) as char)?;
                promo(f, promoting_to)
            }
            Self::PieceMove {
                moving_piece,
                origin_file,
                origin_rank,
                is_capture,
                target,
            } => {
                if let Some(letter) = moving_piece.san_letter() {
                    write!(f, "{letter}")?;
                }
                if let Some(file) = origin_file {
                    write!(f, "{}", (b'a' + file) as char)?;
                }
                if let Some(rank) = origin_rank {
                    write!(f, "{}", (b'1' + rank) as char)?;
                }
                if is_capture {
                    write!(f, "x")?;
                }
                write!(f, "{target}")
            }
            Self::KingSideCastle => write!(f, "O-O"),
            Self::QueenSideCastle => write!(f, "O-O-O"),
        }
    }
}

/// Syntactic SAN form of a legal move, without check suffix.
fn describe(pos: &Position, mv: Move, legal: &[Move]) -> SanMove {
    if mv.is_kingside_castle() {
        return SanMove::KingSideCastle;
    }
    if mv.is_queenside_castle() {
        return SanMove::QueenSideCastle;
    }
    if mv.piece == Piece::Pawn {
        return if mv.is_capture() {
            SanMove::PawnCapture {
                origin_file: mv.from.file(),
                target: mv.to,
                promoting_to: mv.promotion,
            }
        } else {
            SanMove::PawnPush {
                target: mv.to,
                promoting_to: mv.promotion,
            }
        };
    }

    let rivals: Vec<Square> = legal
        .iter()
        .filter(|m| m.piece == mv.piece && m.to == mv.to && m.from != mv.from)
        .map(|m| m.from)
        .collect();
    let (origin_file, origin_rank) = if rivals.is_empty() {
        (None, None)
    } else if rivals.iter().all(|r| r.file() != mv.from.file()) {
        (Some(mv.from.file()), None)
    } else if rivals.iter().all(|r| r.rank() != mv.from.rank()) {
        (None, Some(mv.from.rank()))
    } else {
        (Some(mv.from.file()), Some(mv.from.rank()))
    };
    debug_assert!(pos.piece_at(mv.from).is_some_and(|(_, p)| p == mv.piece));
    SanMove::PieceMove {
        moving_piece: mv.piece,
        origin_file,
        origin_rank,
        is_capture: mv.is_capture(),
        target: mv.to,
    }
}

/// SAN text for `mv`, which must be legal in `pos`, including the `+` / `#` suffix.
pub fn to_san(pos: &Position, mv: Move) -> String {
    let legal = legal_moves(pos);
    let mut san = describe(pos, mv, &legal).to_string();

    let next = apply(pos, mv);
    if next.in_check() {
        san.push(if has_legal_move(&next) { '+' } else { '#' });
    }
    san
}

/// Does legal move `m` fit the SAN token? The capture marker is not compared.
fn fits(san: &SanMove, m: &Move) -> bool {
    match *san {
        SanMove::KingSideCastle => m.is_kingside_castle(),
        SanMove::QueenSideCastle => m.is_queenside_castle(),
        SanMove::PawnPush { target, .. } => {
            m.piece == Piece::Pawn && m.to == target && m.from.file() == target.file()
        }
        SanMove::PawnCapture {
            origin_file, target, ..
        } => m.piece == Piece::Pawn && m.to == target && m.from.file() == origin_file,
        SanMove::PieceMove {
            moving_piece,
            origin_file,
            origin_rank,
            target,
            ..
        } => {
            m.piece == moving_piece
                && m.to == target
                && origin_file.is_none_or(|f| m.from.file() == f)
                && origin_rank.is_none_or(|r| m.from.rank() == r)
        }
    }
}

/// Resolve a SAN token to the single legal move it names.
///
/// Unparseable, ambiguous or promotion-less tokens are `InvalidMove`; a
/// well-formed token that matches no legal move is `IllegalMove`.
pub fn parse_san(pos: &Position, text: &str) -> Result<Move> {
    let san: SanMove = text
        .parse()
        .map_err(|e: SanParseError| Error::InvalidMove(format!("{text}: {e}")))?;
    let promotion = match san {
        SanMove::PawnPush { promoting_to, .. } | SanMove::PawnCapture { promoting_to, .. } => promoting_to,
        _ => None,
    };

    let candidates: Vec<Move> = legal_moves(pos).into_iter().filter(|m| fits(&san, m)).collect();
    if candidates.is_empty() {
        return Err(Error::IllegalMove(text.to_string()));
    }
    if promotion.is_none() && candidates.iter().any(|m| m.is_promotion()) {
        return Err(Error::InvalidMove(format!("{text}: missing promotion piece")));
    }

    let mut matching = candidates.into_iter().filter(|m| m.promotion == promotion);
    match (matching.next(), matching.next()) {
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(Error::InvalidMove(format!("{text}: ambiguous"))),
        (None, _) => Err(Error::IllegalMove(text.to_string())),
    }
}
