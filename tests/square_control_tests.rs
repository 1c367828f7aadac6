use std::str::FromStr;

use rookie::board::Color;
use rookie::moves::square_control::{attackers_of, in_check, is_square_attacked};
use rookie::position::Position;
use rookie::square::Square;

fn sq(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

fn pos(fen: &str) -> Position {
    Position::from_str(fen).unwrap()
}

#[test]
fn in_check_detects_simple_rook_check() {
    let p = pos("4r2k/8/8/8/8/8/8/4K3 w - - 0 1");
    assert!(in_check(p.board(), Color::White));
    assert!(!in_check(p.board(), Color::Black));
    assert!(p.in_check());
}

#[test]
fn is_square_attacked_handles_pawn_direction() {
    let p = pos("4k3/8/8/1P6/8/8/8/4K3 w - - 0 1");
    let b = p.board();
    assert!(is_square_attacked(b, sq("a6"), Color::White));
    assert!(is_square_attacked(b, sq("c6"), Color::White));
    assert!(!is_square_attacked(b, sq("a4"), Color::White));
    assert!(!is_square_attacked(b, sq("c4"), Color::White));
    assert!(!is_square_attacked(b, sq("b6"), Color::White), "pushes are not attacks");
}

#[test]
fn pawn_wraparound_edges_are_masked() {
    let p = pos("4k3/8/8/P7/8/8/8/4K3 w - - 0 1");
    let b = p.board();
    assert!(is_square_attacked(b, sq("b6"), Color::White));
    assert!(!is_square_attacked(b, sq("h6"), Color::White));
    assert!(!is_square_attacked(b, sq("h4"), Color::White));
}

#[test]
fn sliders_stop_at_the_first_blocker() {
    let p = pos("4k3/8/8/8/8/8/8/R1n1K3 w - - 0 1");
    let b = p.board();
    assert!(is_square_attacked(b, sq("b1"), Color::White));
    assert!(is_square_attacked(b, sq("c1"), Color::White));
    // the rook does not see through the knight
    assert_eq!(attackers_of(b, sq("d1"), Color::White), Square::E1.bit());
}

#[test]
fn every_attacker_is_reported() {
    // pawn d6, knight c8, bishop h4 and rook e2 all hit e7
    let p = pos("2N4k/8/3P4/8/7B/8/4R3/K7 w - - 0 1");
    let attackers = attackers_of(p.board(), sq("e7"), Color::White);
    let expected = [sq("d6"), sq("c8"), sq("h4"), sq("e2")]
        .iter()
        .fold(0u64, |acc, s| acc | s.bit());
    assert_eq!(attackers, expected);
}

#[test]
fn castling_king_in_check_is_detected() {
    let p = pos("r3k2r/8/8/8/1b6/8/8/R3K2R w KQkq - 0 1");
    assert!(in_check(p.board(), Color::White));
    assert!(p.is_in_check(Color::White));
}
