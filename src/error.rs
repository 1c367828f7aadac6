use crate::position::fen::FenError;
use crate::status::GameStatus;
use thiserror::Error;

/// Errors surfaced by the embedding API. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] FenError),
    #[error("invalid move `{0}`")]
    InvalidMove(String),
    #[error("illegal move `{0}`")]
    IllegalMove(String),
    #[error("nothing to undo: already at the start of the game")]
    AtStartOfHistory,
    #[error("the game is over: {0}")]
    GameOver(GameStatus),
    #[error("no draw can be claimed in this position")]
    NoDrawToClaim,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a square")]
pub struct ParseSquareError(pub String);
