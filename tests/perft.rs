use passant::perft::perft;
use passant::{Position, START_FEN};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

fn shakmaty_pos(fen: &str) -> Chess {
    let fen: Fen = fen.parse().expect("shakmaty fen");
    fen.into_position(CastlingMode::Standard).expect("shakmaty position")
}

fn assert_matches_shakmaty(fen: &str, max_depth: u8) {
    passant::init();
    let reference = shakmaty_pos(fen);
    let mut pos = Position::from_fen(fen).expect("from_fen");
    for depth in 1..=max_depth {
        let expected = perft_shakmaty(&reference, depth);
        let got = perft(&mut pos, depth);
        assert_eq!(got, expected, "perft mismatch for {fen} at depth {depth}");
    }
    assert_eq!(pos.to_fen(), fen, "perft left the position changed");
}

#[test]
fn perft_regression_starting_pos() {
    passant::init();
    let mut pos = Position::from_fen(START_FEN).unwrap();
    for (depth, expected) in [(1, 20), (2, 400), (3, 8902)] {
        assert_eq!(perft(&mut pos, depth), expected, "depth {depth}");
    }
}

#[test]
fn perft_regression_kiwipete() {
    passant::init();
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    for (depth, expected) in [(1, 48), (2, 2039), (3, 97862)] {
        assert_eq!(perft(&mut pos, depth), expected, "depth {depth}");
    }
}

#[test]
fn perft_matches_shakmaty_position3() {
    assert_matches_shakmaty("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4);
}

#[test]
fn perft_matches_shakmaty_position4() {
    assert_matches_shakmaty("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 3);
}

#[test]
fn perft_matches_shakmaty_position5() {
    assert_matches_shakmaty("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 3);
}

#[test]
fn perft_matches_shakmaty_position6() {
    assert_matches_shakmaty(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        3,
    );
}

#[test]
fn perft_matches_shakmaty_en_passant_and_promotion() {
    // en passant discovered check along the rank, and under-promotions
    assert_matches_shakmaty("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2", 3);
    assert_matches_shakmaty("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 3);
}

#[test]
#[ignore]
fn perft_start_depth_5() {
    passant::init();
    let mut pos = Position::from_fen(START_FEN).unwrap();
    assert_eq!(perft(&mut pos, 5), 4_865_609);
}

#[test]
#[ignore]
fn perft_kiwipete_depth_4() {
    passant::init();
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    assert_eq!(perft(&mut pos, 4), 4_085_603);
}
