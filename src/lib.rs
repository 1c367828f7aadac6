pub mod bitboard;
pub mod board;
pub mod error;
pub mod hash;
#[cfg(feature = "cli")]
pub mod logger;
pub mod moves;
pub mod notation;
pub mod position;
pub mod session;
pub mod square;
pub mod status;

pub use board::{Board, CastlingRights, Color, Piece};
pub use error::{Error, Result};
pub use moves::Move;
pub use position::{FenError, Position, START_FEN};
pub use session::GameSession;
pub use square::Square;
pub use status::{DrawClaim, GameResult, GameStatus, Status};
