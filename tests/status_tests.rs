use std::str::FromStr;

use rookie::position::Position;
use rookie::status::{DrawClaim, GameResult, GameStatus, evaluate, is_insufficient_material, position_status};
use rookie::GameSession;

fn status(fen: &str) -> GameStatus {
    position_status(&Position::from_str(fen).unwrap()).state
}

fn play(s: &mut GameSession, moves: &[&str]) {
    for m in moves {
        s.apply_str(m).unwrap_or_else(|e| panic!("{m}: {e}"));
    }
}

#[test]
fn status_inplay_on_startpos() {
    let s = position_status(&Position::new());
    assert_eq!(s.state, GameStatus::InPlay);
    assert!(!s.check);
    assert!(!s.threefold_claimable && !s.fifty_move_claimable);
    assert_eq!(s.repetitions, 1);
    assert_eq!(s.result(), None);
}

#[test]
fn status_checkmate_detection() {
    let s = position_status(&Position::from_str("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap());
    assert_eq!(s.state, GameStatus::Checkmate);
    assert!(s.check);
    assert_eq!(s.result(), Some(GameResult::WhiteWins));
    assert_eq!(s.result().map(|r| r.pgn_tag()), Some("1-0"));
}

#[test]
fn status_stalemate_detection() {
    let s = position_status(&Position::from_str("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap());
    assert_eq!(s.state, GameStatus::Stalemate);
    assert!(!s.check);
    assert_eq!(s.result(), Some(GameResult::Draw));
}

#[test]
fn check_is_a_flag_not_a_state() {
    let s = position_status(&Position::from_str("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap());
    assert_eq!(s.state, GameStatus::InPlay);
    assert!(s.check);
}

#[test]
fn dead_positions() {
    for fen in [
        "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/3N4/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/3B4/8/4K3 b - - 0 1",
        // c1 and f8 are both dark
        "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1",
        // c1 and e3 are both dark
        "4k3/8/8/8/8/4B3/8/2B1K3 w - - 0 1",
    ] {
        assert_eq!(status(fen), GameStatus::DrawDeadPosition, "{fen}");
    }
}

#[test]
fn mating_material_is_not_dead() {
    for fen in [
        // opposite-coloured bishops
        "2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/2BBK3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1",
        "1n2k3/8/8/8/8/8/8/1N2K3 w - - 0 1",
        "4k3/8/8/8/8/8/P7/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
    ] {
        let pos = Position::from_str(fen).unwrap();
        assert!(!is_insufficient_material(pos.board()), "{fen}");
        assert_eq!(status(fen), GameStatus::InPlay, "{fen}");
    }
}

#[test]
fn status_threshold_boundaries_50_and_75() {
    let at = |clock: u32| position_status(&Position::from_str(&format!("r5k1/8/8/8/8/8/8/R5K1 w - - {clock} 90")).unwrap());

    assert!(!at(99).fifty_move_claimable);
    assert!(at(100).fifty_move_claimable);
    assert_eq!(at(100).state, GameStatus::InPlay);
    assert_eq!(at(149).state, GameStatus::InPlay);
    assert_eq!(at(150).state, GameStatus::DrawSeventyFiveMove);
    assert_eq!(at(150).claimable(), None);
}

#[test]
fn stalemate_precedes_seventy_five_moves() {
    assert_eq!(status("7k/5Q2/6K1/8/8/8/8/8 b - - 150 90"), GameStatus::Stalemate);
}

#[test]
fn fivefold_precedes_seventy_five_moves() {
    let pos = Position::from_str("r5k1/8/8/8/8/8/8/R5K1 w - - 150 90").unwrap();
    assert_eq!(evaluate(&pos, 5).state, GameStatus::DrawFivefold);
    assert_eq!(evaluate(&pos, 4).state, GameStatus::DrawSeventyFiveMove);
}

#[test]
fn seventy_five_moves_precede_dead_position() {
    assert_eq!(status("4k3/8/8/8/8/8/8/4K3 w - - 150 90"), GameStatus::DrawSeventyFiveMove);
}

#[test]
fn status_draw_by_fivefold_is_automatic() {
    let mut s = GameSession::start(Some("r5k1/8/8/8/8/8/8/R5K1 w - - 0 1")).unwrap();
    let cycle = ["Kf2", "Kf7", "Kg1", "Kg8"];
    for round in 1..=4 {
        play(&mut s, &cycle);
        assert_eq!(s.repetition_count(), round + 1);
    }
    assert_eq!(s.status().state, GameStatus::DrawFivefold);
    assert!(s.status().threefold_claimable);
    assert_eq!(s.status().claimable(), None);
}

#[test]
fn threefold_ignores_non_capturable_ep_square() {
    // after e4 nothing can take en passant, so the target does not change identity
    let mut s = GameSession::start(Some("6k1/8/8/8/8/8/4P3/6K1 w - - 0 1")).unwrap();
    play(&mut s, &["e4"]);
    let cycle = ["Kf7", "Kf2", "Kg8", "Kg1"];

    play(&mut s, &cycle);
    assert_eq!(s.repetition_count(), 2);
    play(&mut s, &cycle);
    assert_eq!(s.repetition_count(), 3);
    assert_eq!(s.status().claimable(), Some(DrawClaim::Threefold));
}

#[test]
fn threefold_distinguishes_capturable_ep_square() {
    // after e4 the f4 pawn may take en passant, so the first occurrence is distinct
    let mut s = GameSession::start(Some("6k1/8/8/8/5p2/8/4P3/6K1 w - - 0 1")).unwrap();
    play(&mut s, &["e4"]);
    let cycle = ["Kf7", "Kf2", "Kg8", "Kg1"];

    play(&mut s, &cycle);
    assert_eq!(s.repetition_count(), 1);
    play(&mut s, &cycle);
    assert_eq!(s.repetition_count(), 2);
    assert!(!s.status().threefold_claimable);
    play(&mut s, &cycle);
    assert_eq!(s.repetition_count(), 3);
    assert!(s.status().threefold_claimable);
}

#[test]
fn status_evaluated_after_move_applied() {
    let mut s = GameSession::start(Some("r5k1/8/8/8/8/8/8/R5K1 w - - 148 90")).unwrap();
    let after_one = s.apply_str("Kf2").unwrap();
    assert_eq!(after_one.state, GameStatus::InPlay);
    let after_two = s.apply_str("Kf7").unwrap();
    assert_eq!(after_two.state, GameStatus::DrawSeventyFiveMove);
    assert_eq!(after_two, s.status());
    assert!(s.apply_str("Kg1").is_err());
}
