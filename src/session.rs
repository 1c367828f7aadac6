//! A single game: the starting position, every move played since, and the
//! repetition bookkeeping that draw detection needs.

use crate::board::Color;
use crate::error::{Error, Result};
use crate::moves::execute::apply;
use crate::moves::movegen;
use crate::moves::types::Move;
use crate::notation::{parse_coord, parse_move, parse_san, to_san};
use crate::position::Position;
use crate::square::Square;
use crate::status::{DrawClaim, GameStatus, Status, evaluate};
use std::collections::HashMap;
use tracing::{debug, info};

/// One played move together with its SAN and the position it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    mv: Move,
    san: String,
    position: Position,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    initial: Position,
    history: Vec<HistoryEntry>,
    /// Zobrist key → occurrences, the initial position and every entry included.
    repetitions: HashMap<u64, u32>,
    claimed: Option<DrawClaim>,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::from_position(Position::new())
    }
}

impl GameSession {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// A game from `fen`, or from the standard start when `None`.
    pub fn start(fen: Option<&str>) -> Result<Self> {
        let initial = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::new(),
        };
        Ok(Self::from_position(initial))
    }

    pub fn from_position(initial: Position) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(initial.zobrist(), 1);
        debug!(fen = %initial, "session: started");
        GameSession {
            initial,
            history: Vec::new(),
            repetitions,
            claimed: None,
        }
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        self.history.last().map_or(&self.initial, |e| &e.position)
    }

    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    pub fn fen(&self) -> String {
        self.position().to_fen()
    }

    pub fn side_to_move(&self) -> Color {
        self.position().side_to_move()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(self.position())
    }

    /// Legal moves of the piece on `sq`, for square highlighting.
    pub fn moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::moves_from(self.position(), sq)
    }

    /// Occurrences of the current position in this game, itself included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.position().zobrist()).copied().unwrap_or(1)
    }

    pub fn status(&self) -> Status {
        let mut status = evaluate(self.position(), self.repetition_count());
        if let Some(claim) = self.claimed
            && !status.is_game_over()
        {
            status.state = GameStatus::DrawClaimed(claim);
        }
        status
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    fn ensure_in_play(&self) -> Result<()> {
        let status = self.status();
        if status.is_game_over() {
            return Err(Error::GameOver(status.state));
        }
        Ok(())
    }

    /// Play `mv`. Only origin, destination and promotion piece are compared
    /// against the legal moves, so a hand-built move works too.
    pub fn apply_move(&mut self, mv: Move) -> Result<Status> {
        self.ensure_in_play()?;
        let current = *self.position();
        let legal = movegen::legal_moves(&current)
            .into_iter()
            .find(|m| m.matches(mv.from, mv.to, mv.promotion))
            .ok_or_else(|| Error::IllegalMove(mv.to_string()))?;
        Ok(self.push(current, legal))
    }

    /// Play a SAN move such as `Nf3` or `exd8=Q+`.
    pub fn apply_san(&mut self, san: &str) -> Result<Status> {
        self.ensure_in_play()?;
        let current = *self.position();
        let mv = parse_san(&current, san)?;
        Ok(self.push(current, mv))
    }

    /// Play a coordinate move such as `e2e4` or `e7e8q`.
    pub fn apply_coord(&mut self, coord: &str) -> Result<Status> {
        self.ensure_in_play()?;
        let current = *self.position();
        let mv = parse_coord(&current, coord)?;
        Ok(self.push(current, mv))
    }

    /// Play a move in either notation, coordinate form taking precedence.
    pub fn apply_str(&mut self, text: &str) -> Result<Status> {
        self.ensure_in_play()?;
        let current = *self.position();
        let mv = parse_move(&current, text)?;
        Ok(self.push(current, mv))
    }

    fn push(&mut self, current: Position, mv: Move) -> Status {
        let san = to_san(&current, mv);
        let next = apply(&current, mv);
        *self.repetitions.entry(next.zobrist()).or_insert(0) += 1;
        debug!(%mv, %san, fen = %next, "session: move applied");
        self.history.push(HistoryEntry {
            mv,
            san,
            position: next,
        });
        let status = self.status();
        if status.is_game_over() {
            info!(state = %status.state, "session: game over");
        }
        status
    }

    /// Take back the last move. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    /// Take back the last move and return it.
    pub fn try_undo(&mut self) -> Result<Move> {
        let entry = self.history.pop().ok_or(Error::AtStartOfHistory)?;
        let key = entry.position.zobrist();
        if let Some(count) = self.repetitions.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&key);
            }
        }
        self.claimed = None;
        debug!(mv = %entry.mv, san = %entry.san, "session: move undone");
        Ok(entry.mv)
    }

    /// Claim a threefold or fifty-move draw on behalf of the side to move.
    pub fn claim_draw(&mut self) -> Result<DrawClaim> {
        let claim = self.status().claimable().ok_or(Error::NoDrawToClaim)?;
        self.claimed = Some(claim);
        info!(?claim, "session: draw claimed");
        Ok(claim)
    }

    /// Moves played, each with its SAN.
    pub fn history(&self) -> Vec<(Move, String)> {
        self.history.iter().map(|e| (e.mv, e.san.clone())).collect()
    }

    /// Numbered SAN movetext ending in the result token (`*` while in play).
    pub fn pgn_movetext(&self) -> String {
        let mut out = String::new();
        let mut number = self.initial.fullmove_number();
        let mut white_to_move = self.initial.side_to_move() == Color::White;

        for (i, entry) in self.history.iter().enumerate() {
            if white_to_move {
                out.push_str(&format!("{number}. "));
            } else if i == 0 {
                out.push_str(&format!("{number}... "));
            }
            out.push_str(&entry.san);
            out.push(' ');
            if !white_to_move {
                number += 1;
            }
            white_to_move = !white_to_move;
        }

        let token = self.status().result().map_or("*", |r| r.pgn_tag());
        out.push_str(token);
        out
    }
}
