// Bitboard masks, iterators and small bit helpers shared by the board, attacks and movegen

pub type Bitboard = u64;

// File masks (A is column 0, H column 7)
pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_H: Bitboard = 0x8080808080808080;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: Bitboard = 0x00000000000000FF;
pub const RANK_2: Bitboard = 0x000000000000FF00;
pub const RANK_7: Bitboard = 0x00FF000000000000;
pub const RANK_8: Bitboard = 0xFF00000000000000;

#[inline]
pub const fn square_bb(sq: usize) -> Bitboard {
    1u64 << sq
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

#[inline]
pub fn lsb_index(bb: Bitboard) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

pub struct BitIter {
    bb: Bitboard,
}

impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: Bitboard) -> BitIter {
    BitIter { bb }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_lsb_walks_bits_low_to_high() {
        let mut bb = square_bb(3) | square_bb(17) | square_bb(63);
        assert_eq!(pop_lsb(&mut bb), Some(3));
        assert_eq!(pop_lsb(&mut bb), Some(17));
        assert_eq!(pop_lsb(&mut bb), Some(63));
        assert_eq!(pop_lsb(&mut bb), None);
    }

    #[test]
    fn iter_bits_matches_popcount() {
        let bb = RANK_2 | FILE_H;
        assert_eq!(iter_bits(bb).count() as u32, bb.count_ones());
        assert_eq!(lsb_index(bb), Some(7));
        assert_eq!(lsb_index(0), None);
    }
}
