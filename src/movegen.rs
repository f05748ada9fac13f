//! Pseudo-legal move generation.
//!
//! Moves that leave the own king attacked are generated too; `make_move`
//! filters them out. Castling is only generated when the rights, the rook,
//! the empty path and the unattacked king path all allow it.

use crate::attacks;
use crate::board::{
    Color, PieceKind, Square, A1, A8, B1, B8, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8, H1, H8,
};
use crate::moves::Move;
use crate::position::{Position, BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};
use crate::utils::{iter_bits, square_bb, Bitboard, RANK_1, RANK_2, RANK_7, RANK_8};

pub const MAX_MOVES: usize = 256;

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|m| m.to_uci())).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Fill `list` with every pseudo-legal move of the side to move.
pub fn generate_all(pos: &Position, list: &mut MoveList) {
    list.clear();
    let us = pos.side_to_move();
    generate_pawn_moves(pos, us, list);
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(pos, us, kind, list);
    }
    generate_castling(pos, us, list);
}

/// Every move of the side to move that `make_move` accepts.
pub fn legal_moves(pos: &mut Position) -> Vec<Move> {
    let mut list = MoveList::new();
    generate_all(pos, &mut list);
    let mut legal = Vec::with_capacity(list.len());
    for &mv in &list {
        if pos.make_move(mv) {
            pos.take_move();
            legal.push(mv);
        }
    }
    legal
}

fn push_pawn_move(pos: &Position, from: Square, to: Square, list: &mut MoveList) {
    let captured = pos.piece_on(to);
    if square_bb(to) & (RANK_1 | RANK_8) != 0 {
        for kind in PROMOTIONS {
            list.push(Move::new(from, to, captured, Some(kind), Move::FLAG_NONE));
        }
    } else {
        list.push(Move::new(from, to, captured, None, Move::FLAG_NONE));
    }
}

fn generate_pawn_moves(pos: &Position, us: Color, list: &mut MoveList) {
    let board = pos.board();
    let occ = board.occupied();
    let enemy = board.color_bb(us.flip());
    let (up, start_rank): (isize, Bitboard) = match us {
        Color::White => (8, RANK_2),
        Color::Black => (-8, RANK_7),
    };
    let ep_bb = pos.ep_square().map_or(0, square_bb);

    for from in iter_bits(board.pieces(PieceKind::Pawn, us)) {
        let push = from.wrapping_add_signed(up);
        if occ & square_bb(push) == 0 {
            push_pawn_move(pos, from, push, list);
            let double = push.wrapping_add_signed(up);
            if square_bb(from) & start_rank != 0 && occ & square_bb(double) == 0 {
                list.push(Move::new(from, double, None, None, Move::FLAG_PAWN_START));
            }
        }

        let targets = attacks::pawn_attacks(us, from);
        for to in iter_bits(targets & enemy) {
            push_pawn_move(pos, from, to, list);
        }
        if targets & ep_bb != 0 {
            for to in iter_bits(targets & ep_bb) {
                list.push(Move::new(from, to, None, None, Move::FLAG_EN_PASSANT));
            }
        }
    }
}

fn piece_targets(kind: PieceKind, sq: Square, occ: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Knight => attacks::knight_attacks(sq),
        PieceKind::Bishop => attacks::bishop_attacks(sq, occ),
        PieceKind::Rook => attacks::rook_attacks(sq, occ),
        PieceKind::Queen => attacks::queen_attacks(sq, occ),
        PieceKind::King => attacks::king_attacks(sq),
        PieceKind::Pawn => 0,
    }
}

fn generate_piece_moves(pos: &Position, us: Color, kind: PieceKind, list: &mut MoveList) {
    let board = pos.board();
    let occ = board.occupied();
    let own = board.color_bb(us);
    for from in iter_bits(board.pieces(kind, us)) {
        for to in iter_bits(piece_targets(kind, from, occ) & !own) {
            list.push(Move::new(from, to, pos.piece_on(to), None, Move::FLAG_NONE));
        }
    }
}

struct CastleRule {
    right: u8,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    // squares between king and rook
    empty: &'static [Square],
    // squares the king stands on or crosses
    safe: [Square; 3],
}

const CASTLE_RULES: [[CastleRule; 2]; 2] = [
    [
        CastleRule {
            right: WHITE_OO,
            king_from: E1,
            king_to: G1,
            rook_from: H1,
            empty: &[F1, G1],
            safe: [E1, F1, G1],
        },
        CastleRule {
            right: WHITE_OOO,
            king_from: E1,
            king_to: C1,
            rook_from: A1,
            empty: &[D1, C1, B1],
            safe: [E1, D1, C1],
        },
    ],
    [
        CastleRule {
            right: BLACK_OO,
            king_from: E8,
            king_to: G8,
            rook_from: H8,
            empty: &[F8, G8],
            safe: [E8, F8, G8],
        },
        CastleRule {
            right: BLACK_OOO,
            king_from: E8,
            king_to: C8,
            rook_from: A8,
            empty: &[D8, C8, B8],
            safe: [E8, D8, C8],
        },
    ],
];

fn generate_castling(pos: &Position, us: Color, list: &mut MoveList) {
    let board = pos.board();
    let them = us.flip();
    for rule in &CASTLE_RULES[us.index()] {
        if pos.castling() & rule.right == 0 {
            continue;
        }
        if board.pieces(PieceKind::King, us) & square_bb(rule.king_from) == 0
            || board.pieces(PieceKind::Rook, us) & square_bb(rule.rook_from) == 0
        {
            continue;
        }
        if rule.empty.iter().any(|&sq| board.is_occupied(sq)) {
            continue;
        }
        if rule.safe.iter().any(|&sq| pos.square_attacked(sq, them)) {
            continue;
        }
        list.push(Move::new(
            rule.king_from,
            rule.king_to,
            None,
            None,
            Move::FLAG_CASTLE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::START_FEN;

    fn count(fen: &str) -> usize {
        let mut pos = Position::from_fen(fen).unwrap();
        legal_moves(&mut pos).len()
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::from_fen(START_FEN).unwrap();
        let mut list = MoveList::new();
        generate_all(&pos, &mut list);
        assert_eq!(list.len(), 20);
        assert_eq!(list.iter().filter(|m| m.is_pawn_start()).count(), 8);
    }

    #[test]
    fn kiwipete_move_count() {
        assert_eq!(
            count("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            48
        );
    }

    #[test]
    fn promotions_come_in_fours() {
        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut list = MoveList::new();
        generate_all(&pos, &mut list);
        assert_eq!(list.iter().filter(|m| m.promotion().is_some()).count(), 4);
    }

    #[test]
    fn castling_needs_empty_and_safe_path() {
        // b1 occupied blocks the long castle only
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        let mut list = MoveList::new();
        generate_all(&pos, &mut list);
        let castles: Vec<_> = list.iter().filter(|m| m.is_castle()).map(|m| m.to_sq()).collect();
        assert_eq!(castles, vec![G1]);

        // f1 attacked by the rook on f8
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        generate_all(&pos, &mut list);
        let castles: Vec<_> = list.iter().filter(|m| m.is_castle()).map(|m| m.to_sq()).collect();
        assert_eq!(castles, vec![C1]);
    }

    #[test]
    fn en_passant_is_generated_for_both_neighbours() {
        let pos = Position::from_fen("4k3/8/8/3PpP2/8/8/8/4K3 w - e6 0 2").unwrap();
        let mut list = MoveList::new();
        generate_all(&pos, &mut list);
        assert_eq!(list.iter().filter(|m| m.is_en_passant()).count(), 2);
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        // the knight on e2 is pinned by the rook on e8
        assert_eq!(count("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1"), 4);
    }
}
