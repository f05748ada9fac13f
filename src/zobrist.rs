// Zobrist hashing with precomputed tables
use std::sync::OnceLock;

use crate::board::{file_of, Board, Color, Piece, Square};
use crate::utils::iter_bits;

pub struct Keys {
    piece: [[u64; 64]; 12],
    // Castling rights keys: index 0..15 (WHITE_OO, WHITE_OOO, BLACK_OO, BLACK_OOO as bits)
    castling: [u64; 16],
    side: u64,
    ep_file: [u64; 8],
}

static KEYS: OnceLock<Keys> = OnceLock::new();

struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

fn generate() -> Keys {
    let mut rng = SplitMix64(0x5eed_cafe_f00d_beef);
    let mut keys = Keys {
        piece: [[0; 64]; 12],
        castling: [0; 16],
        side: 0,
        ep_file: [0; 8],
    };
    for piece in keys.piece.iter_mut() {
        for key in piece.iter_mut() {
            *key = rng.next();
        }
    }
    for key in keys.castling.iter_mut() {
        *key = rng.next();
    }
    keys.side = rng.next();
    for key in keys.ep_file.iter_mut() {
        *key = rng.next();
    }
    keys
}

pub fn init() {
    KEYS.get_or_init(generate);
}

#[inline]
fn keys() -> &'static Keys {
    KEYS.get_or_init(generate)
}

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    keys().piece[piece.index()][sq]
}

#[inline]
pub fn castling_key(rights: u8) -> u64 {
    keys().castling[(rights & 0xF) as usize]
}

#[inline]
pub fn side_key() -> u64 {
    keys().side
}

#[inline]
pub fn ep_key(sq: Square) -> u64 {
    keys().ep_file[file_of(sq)]
}

/// Hash a position from scratch. The incremental key must always equal this.
pub fn recalc(board: &Board, side: Color, castling: u8, ep: Option<Square>) -> u64 {
    let mut h = 0u64;
    for sq in iter_bits(board.occupied()) {
        if let Some(piece) = board.piece_on(sq) {
            h ^= piece_key(piece, sq);
        }
    }
    if side == Color::Black {
        h ^= side_key();
    }
    h ^= castling_key(castling);
    if let Some(sq) = ep {
        h ^= ep_key(sq);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        init();
        let k = keys();
        let mut seen = HashSet::new();
        for row in k.piece.iter() {
            for &key in row.iter() {
                assert!(seen.insert(key));
            }
        }
        for &key in k.castling.iter().chain(k.ep_file.iter()) {
            assert!(seen.insert(key));
        }
        assert!(seen.insert(k.side));
    }

    #[test]
    fn side_and_ep_toggle_the_hash() {
        let board = Board::new();
        let white = recalc(&board, Color::White, 0, None);
        let black = recalc(&board, Color::Black, 0, None);
        assert_eq!(white ^ black, side_key());
        let with_ep = recalc(&board, Color::White, 0, Some(20));
        assert_eq!(white ^ with_ep, ep_key(20));
        assert_eq!(ep_key(20), ep_key(44));
    }
}
