use crate::bitboard::LIGHT_SQUARES;
use crate::board::{Board, Color, Piece};
use crate::moves::movegen::has_legal_move;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plies without pawn move or capture after which a draw may be claimed.
pub const FIFTY_MOVE_PLIES: u32 = 100;
/// Plies without pawn move or capture after which the game is drawn.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

// Public enum you can use anywhere without pulling movegen into board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InPlay,
    Checkmate,
    Stalemate,
    DrawDeadPosition,
    DrawSeventyFiveMove,
    DrawFivefold,
    /// A claimable draw that a player has claimed.
    DrawClaimed(DrawClaim),
}

/// The draws a player may claim but which do not end the game by themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawClaim {
    Threefold,
    FiftyMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// PGN result token.
    pub fn pgn_tag(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pgn_tag())
    }
}

impl GameStatus {
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawDeadPosition
                | GameStatus::DrawSeventyFiveMove
                | GameStatus::DrawFivefold
                | GameStatus::DrawClaimed(_)
        )
    }

    pub fn is_game_over(self) -> bool {
        self != GameStatus::InPlay
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InPlay => write!(f, "in play"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawDeadPosition => write!(f, "draw (insufficient material)"),
            GameStatus::DrawSeventyFiveMove => write!(f, "draw (seventy-five-move rule)"),
            GameStatus::DrawFivefold => write!(f, "draw (fivefold repetition)"),
            GameStatus::DrawClaimed(DrawClaim::Threefold) => write!(f, "draw (threefold repetition claimed)"),
            GameStatus::DrawClaimed(DrawClaim::FiftyMove) => write!(f, "draw (fifty-move rule claimed)"),
        }
    }
}

/// Full classification of a position: the state plus the flags that do not end the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: GameStatus,
    /// Side to move is in check.
    pub check: bool,
    pub fifty_move_claimable: bool,
    pub threefold_claimable: bool,
    /// Occurrences of the current position, itself included.
    pub repetitions: u32,
    /// Side to move in the classified position.
    pub side_to_move: Color,
}

impl Status {
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Final result, `None` while the game is in play.
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            GameStatus::InPlay => None,
            // the side to move has been mated
            GameStatus::Checkmate => Some(match self.side_to_move {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }),
            _ => Some(GameResult::Draw),
        }
    }

    /// The draw the side to move could claim now, threefold first.
    pub fn claimable(&self) -> Option<DrawClaim> {
        if self.is_game_over() {
            None
        } else if self.threefold_claimable {
            Some(DrawClaim::Threefold)
        } else if self.fifty_move_claimable {
            Some(DrawClaim::FiftyMove)
        } else {
            None
        }
    }
}

/// No sequence of legal moves can produce mate: bare kings, a lone minor piece,
/// or any number of bishops all standing on one square colour.
pub fn is_insufficient_material(board: &Board) -> bool {
    let heavy_or_pawn = [Piece::Pawn, Piece::Rook, Piece::Queen]
        .iter()
        .any(|&p| board.pieces(p, Color::White) | board.pieces(p, Color::Black) != 0);
    if heavy_or_pawn {
        return false;
    }

    let knights = board.pieces(Piece::Knight, Color::White) | board.pieces(Piece::Knight, Color::Black);
    let bishops = board.pieces(Piece::Bishop, Color::White) | board.pieces(Piece::Bishop, Color::Black);

    match (knights.count_ones(), bishops.count_ones()) {
        (0, 0) => true,
        (1, 0) => true,
        (0, _) => bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0,
        _ => false,
    }
}

/// Classify `pos`, given how many times it has occurred in the game so far.
///
/// Priority (highest → lowest):
///  1) `Checkmate` / `Stalemate`
///  2) `DrawFivefold`          (repetitions ≥ 5)
///  3) `DrawSeventyFiveMove`   (halfmove_clock ≥ 150)
///  4) `DrawDeadPosition`      (insufficient material)
///  5) `InPlay`
pub fn evaluate(pos: &Position, repetitions: u32) -> Status {
    let check = pos.in_check();
    let hmc = pos.halfmove_clock();

    let state = if !has_legal_move(pos) {
        if check { GameStatus::Checkmate } else { GameStatus::Stalemate }
    } else if repetitions >= 5 {
        GameStatus::DrawFivefold
    } else if hmc >= SEVENTY_FIVE_MOVE_PLIES {
        GameStatus::DrawSeventyFiveMove
    } else if is_insufficient_material(pos.board()) {
        GameStatus::DrawDeadPosition
    } else {
        GameStatus::InPlay
    };

    Status {
        state,
        check,
        fifty_move_claimable: hmc >= FIFTY_MOVE_PLIES,
        threefold_claimable: repetitions >= 3,
        repetitions,
        side_to_move: pos.side_to_move(),
    }
}

/// Status of a standalone position with no game history behind it.
pub fn position_status(pos: &Position) -> Status {
    evaluate(pos, 1)
}
