pub mod attacks;
pub mod execute;
pub mod movegen;
pub mod perft;
pub mod square_control;
pub mod types;

pub use execute::{apply, try_apply};
pub use movegen::{generate_legal, generate_pseudo_legal, has_legal_move, is_legal, legal_moves, moves_from};
pub use types::{Move, MoveBuffer, MoveList};
