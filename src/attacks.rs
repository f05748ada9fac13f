//! Attack bitboards.
//!
//! Leaper tables (knight, king, pawn) are built once behind a `OnceLock`;
//! sliders walk rays against the occupancy.

use std::sync::OnceLock;

use crate::board::{Color, Square};
use crate::utils::{square_bb, Bitboard, NOT_FILE_A, NOT_FILE_H};

struct LeaperTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
}

static LEAPERS: OnceLock<LeaperTables> = OnceLock::new();

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn leaper_mask(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    let file = (sq % 8) as i8;
    let rank = (sq / 8) as i8;
    let mut mask = 0u64;
    for (df, dr) in offsets {
        let (f, r) = (file + df, rank + dr);
        if (0..8).contains(&f) && (0..8).contains(&r) {
            mask |= 1u64 << (r * 8 + f);
        }
    }
    mask
}

fn build_leapers() -> LeaperTables {
    let mut tables = LeaperTables {
        knight: [0; 64],
        king: [0; 64],
        pawn: [[0; 64]; 2],
    };
    for sq in 0..64 {
        tables.knight[sq] = leaper_mask(sq, &KNIGHT_OFFSETS);
        tables.king[sq] = leaper_mask(sq, &KING_OFFSETS);
        let bb = square_bb(sq);
        tables.pawn[Color::White.index()][sq] = ((bb & NOT_FILE_A) << 7) | ((bb & NOT_FILE_H) << 9);
        tables.pawn[Color::Black.index()][sq] = ((bb & NOT_FILE_A) >> 9) | ((bb & NOT_FILE_H) >> 7);
    }
    tables
}

pub fn init() {
    LEAPERS.get_or_init(build_leapers);
}

#[inline]
fn leapers() -> &'static LeaperTables {
    LEAPERS.get_or_init(build_leapers)
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    leapers().knight[sq]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    leapers().king[sq]
}

/// Squares attacked by a pawn of `color` standing on `sq`.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    leapers().pawn[color.index()][sq]
}

#[inline]
fn ray(sq: Square, occ: Bitboard, df: i8, dr: i8) -> Bitboard {
    let mut attacks = 0u64;
    let (mut f, mut r) = ((sq % 8) as i8 + df, (sq / 8) as i8 + dr);
    while (0..8).contains(&f) && (0..8).contains(&r) {
        let bit = 1u64 << (r * 8 + f);
        attacks |= bit;
        if occ & bit != 0 {
            break;
        }
        f += df;
        r += dr;
    }
    attacks
}

pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    ray(sq, occ, 1, 1) | ray(sq, occ, -1, 1) | ray(sq, occ, 1, -1) | ray(sq, occ, -1, -1)
}

pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    ray(sq, occ, 0, 1) | ray(sq, occ, 0, -1) | ray(sq, occ, 1, 0) | ray(sq, occ, -1, 0)
}

#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    bishop_attacks(sq, occ) | rook_attacks(sq, occ)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_attacks_corner() {
        // Rook on a1, empty board: a2-a8 and b1-h1
        assert_eq!(rook_attacks(0, 0).count_ones(), 14);
        // Blocker on a4 stops the file ray
        assert_eq!(rook_attacks(0, square_bb(24)).count_ones(), 10);
    }

    #[test]
    fn bishop_attacks_center() {
        // d4 sees both long diagonals: 7 + 6
        assert_eq!(bishop_attacks(27, 0).count_ones(), 13);
        assert_eq!(queen_attacks(27, 0), bishop_attacks(27, 0) | rook_attacks(27, 0));
    }

    #[test]
    fn leapers_respect_edges() {
        init();
        assert_eq!(knight_attacks(0).count_ones(), 2);
        assert_eq!(knight_attacks(27).count_ones(), 8);
        assert_eq!(king_attacks(63).count_ones(), 3);
        // a2 white pawn only hits b3; h7 black pawn only hits g6
        assert_eq!(pawn_attacks(Color::White, 8), square_bb(17));
        assert_eq!(pawn_attacks(Color::Black, 55), square_bb(46));
    }
}
