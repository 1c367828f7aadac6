use std::str::FromStr;

use rookie::moves::{apply, legal_moves};
use rookie::notation::{SanMove, parse_coord, parse_move, parse_san, to_san};
use rookie::position::Position;
use rookie::square::Square;
use rookie::{Error, Move};

const KIWI_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn pos(fen: &str) -> Position {
    Position::from_str(fen).unwrap()
}

fn find(p: &Position, from: &str, to: &str) -> Move {
    let (f, t) = (Square::from_str(from).unwrap(), Square::from_str(to).unwrap());
    legal_moves(p)
        .into_iter()
        .find(|m| m.from == f && m.to == t && m.promotion.is_none())
        .unwrap_or_else(|| panic!("{from}{to} not legal"))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[test]
fn start_position_san() {
    let p = Position::new();
    assert_eq!(to_san(&p, find(&p, "e2", "e4")), "e4");
    assert_eq!(to_san(&p, find(&p, "g1", "f3")), "Nf3");
    assert_eq!(to_san(&p, find(&p, "b1", "c3")), "Nc3");
}

#[test]
fn kiwipete_san() {
    let p = pos(KIWI_FEN);
    assert_eq!(to_san(&p, find(&p, "e1", "g1")), "O-O");
    assert_eq!(to_san(&p, find(&p, "e1", "c1")), "O-O-O");
    assert_eq!(to_san(&p, find(&p, "d5", "e6")), "dxe6");
    assert_eq!(to_san(&p, find(&p, "e5", "f7")), "Nxf7");
    assert_eq!(to_san(&p, find(&p, "f3", "h3")), "Qxh3");
    assert_eq!(to_san(&p, find(&p, "g2", "h3")), "gxh3");
    // only the c3 knight reaches b5
    assert_eq!(to_san(&p, find(&p, "c3", "b5")), "Nb5");
}

#[test]
fn rank_disambiguation() {
    // rooks on a1 and a5 both reach a3
    let p = pos("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
    assert_eq!(to_san(&p, find(&p, "a1", "a3")), "R1a3");
    assert_eq!(to_san(&p, find(&p, "a5", "a3")), "R5a3");
    assert_eq!(parse_san(&p, "R1a3").unwrap(), find(&p, "a1", "a3"));
    assert!(matches!(parse_san(&p, "Ra3"), Err(Error::InvalidMove(_))));
}

#[test]
fn promotion_with_check_and_mate() {
    let p = pos("k7/4P3/1K6/8/8/8/8/8 w - - 0 1");
    let queen = legal_moves(&p)
        .into_iter()
        .find(|m| m.promotion == Some(rookie::Piece::Queen))
        .unwrap();
    assert_eq!(to_san(&p, queen), "e8=Q#");
    assert_eq!(parse_san(&p, "e8=Q#").unwrap(), queen);
    assert_eq!(parse_san(&p, "e8Q").unwrap(), queen);
    let knight = parse_san(&p, "e8=N").unwrap();
    assert_eq!(to_san(&p, knight), "e8=N");
}

#[test]
fn markers_and_glyphs_are_tolerated() {
    let p = Position::new();
    let e4 = find(&p, "e2", "e4");
    for text in ["e4", "e4!", "e4?!", "e4+", "e4!!"] {
        assert_eq!(parse_san(&p, text).unwrap(), e4, "{text}");
    }
    let p = pos(KIWI_FEN);
    assert_eq!(parse_san(&p, "0-0").unwrap(), parse_san(&p, "O-O").unwrap());
    assert_eq!(parse_san(&p, "0-0-0").unwrap(), parse_san(&p, "O-O-O").unwrap());
}

#[test]
fn san_tokens_parse_into_shapes() {
    assert!(matches!(SanMove::from_str("O-O"), Ok(SanMove::KingSideCastle)));
    assert!(matches!(SanMove::from_str("O-O-O+"), Ok(SanMove::QueenSideCastle)));
    assert!(matches!(SanMove::from_str("exd5"), Ok(SanMove::PawnCapture { .. })));
    assert!(matches!(SanMove::from_str("Nbd7"), Ok(SanMove::PieceMove { .. })));
    assert!(SanMove::from_str("").is_err());
    assert!(SanMove::from_str("Nf3q").is_err());
}

#[test]
fn coordinate_parsing() {
    let p = Position::new();
    assert_eq!(parse_coord(&p, "g1f3").unwrap(), find(&p, "g1", "f3"));
    assert!(matches!(parse_coord(&p, "g1g3"), Err(Error::IllegalMove(_))));
    assert!(matches!(parse_coord(&p, "g1"), Err(Error::InvalidMove(_))));

    let p = pos("8/P7/8/8/8/8/8/k6K w - - 0 1");
    let q = parse_coord(&p, "a7a8q").unwrap();
    assert_eq!(parse_coord(&p, "a7a8Q").unwrap(), q);
    assert_eq!(parse_coord(&p, "a7a8=q").unwrap(), q);
    assert_eq!(q.to_string(), "a7a8q");
    assert!(matches!(parse_coord(&p, "a7a8"), Err(Error::InvalidMove(_))));
}

#[test]
fn either_notation_is_accepted() {
    let p = pos(KIWI_FEN);
    assert_eq!(parse_move(&p, "e1g1").unwrap(), parse_move(&p, "O-O").unwrap());
    assert_eq!(parse_move(&p, "e5f7").unwrap(), parse_move(&p, "Nxf7").unwrap());
}

#[test]
fn san_round_trips_along_random_games() {
    for seed0 in [7_u64, 11, 2024] {
        let mut p = Position::new();
        let mut seed = seed0;
        for _ply in 0..120 {
            let moves = legal_moves(&p);
            if moves.is_empty() {
                break;
            }
            for &m in &moves {
                let san = to_san(&p, m);
                assert_eq!(parse_san(&p, &san).unwrap(), m, "{san} in {p}");
                assert_eq!(parse_coord(&p, &m.to_string()).unwrap(), m);
            }
            seed = splitmix64(seed);
            p = apply(&p, moves[(seed as usize) % moves.len()]);
        }
    }
}
