// Perft: count leaf nodes of the legal move tree via make/take
use crate::movegen::{generate_all, MoveList};
use crate::moves::Move;
use crate::position::Position;

pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut list = MoveList::new();
    generate_all(pos, &mut list);
    let mut nodes = 0u64;
    for &mv in &list {
        if !pos.make_move(mv) {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(pos, depth - 1) };
        pos.take_move();
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn divide(pos: &mut Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut list = MoveList::new();
    generate_all(pos, &mut list);
    let mut counts = Vec::with_capacity(list.len());
    for &mv in &list {
        if !pos.make_move(mv) {
            continue;
        }
        let nodes = perft(pos, depth - 1);
        pos.take_move();
        log::trace!("{mv}: {nodes}");
        counts.push((mv, nodes));
    }
    log::debug!(
        "divide({depth}) = {} over {} moves",
        counts.iter().map(|(_, n)| n).sum::<u64>(),
        counts.len()
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::START_FEN;

    #[test]
    fn start_position_shallow() {
        crate::init();
        let mut pos = Position::from_fen(START_FEN).unwrap();
        assert_eq!(perft(&mut pos, 0), 1);
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(perft(&mut pos, 3), 8902);
        assert_eq!(pos.to_fen(), START_FEN);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut pos = Position::from_fen(START_FEN).unwrap();
        let counts = divide(&mut pos, 3);
        assert_eq!(counts.len(), 20);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), 8902);
        assert!(counts.iter().any(|(m, n)| m.to_uci() == "e2e4" && *n == 600));
    }

    #[test]
    fn divide_at_depth_zero_has_no_root_moves() {
        let mut pos = Position::from_fen(START_FEN).unwrap();
        assert!(divide(&mut pos, 0).is_empty());
        assert_eq!(divide(&mut pos, 1).len(), 20);
    }
}
