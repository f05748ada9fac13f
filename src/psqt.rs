//! Material and game-phase bookkeeping.
//!
//! Every piece on the board contributes a tapered [`Score`] taken from the
//! piece-square table (positive for white, negative for black) and a phase
//! weight. The position keeps running totals of both and updates them on
//! every add/remove/move instead of rescanning the board.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;

use crate::board::{Color, Piece, PieceKind, Square};

/// Midgame/endgame score pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    #[inline]
    pub const fn new(mg: i32, eg: i32) -> Score {
        Score { mg, eg }
    }

    /// Interpolate between the endgame and midgame value by `phase` (0..=256).
    #[inline]
    pub fn taper(self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

impl Add for Score {
    type Output = Score;
    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl Sub for Score {
    type Output = Score;
    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl Neg for Score {
    type Output = Score;
    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

pub const MAX_PHASE: i32 = 256;

/// Sum of phase weights in the initial position.
pub const START_PHASE: i32 = 24;

const PHASE_VALUE: [i32; 6] = [0, 1, 1, 2, 4, 0];

const PIECE_VALUE: [Score; 6] = [
    Score::new(110, 155),
    Score::new(437, 448),
    Score::new(460, 465),
    Score::new(670, 755),
    Score::new(1400, 1560),
    Score::new(0, 0),
];

#[inline]
pub const fn phase_value(kind: PieceKind) -> i32 {
    PHASE_VALUE[kind as usize]
}

#[inline]
pub const fn is_non_pawn(kind: PieceKind) -> bool {
    !matches!(kind, PieceKind::Pawn | PieceKind::King)
}

/// Rescale the raw phase sum into 0..=256. Promotions can push the raw sum
/// past the starting total, so the result is clamped.
#[inline]
pub fn scale_phase(base_phase: i32) -> i32 {
    ((base_phase * MAX_PHASE + START_PHASE / 2) / START_PHASE).clamp(0, MAX_PHASE)
}

// Tables are written from white's point of view, A1..H1 first.
// Black squares are mirrored vertically: sq ^ 56.
#[rustfmt::skip]
const PAWN_PSQT: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,   5,   5,  -5,  -5,   5,   5,   5,
      5,   0,  10,  15,  15,  10,   0,   5,
      0,   5,  20,  30,  30,  20,   5,   0,
     10,  15,  25,  35,  35,  25,  15,  10,
     30,  35,  45,  55,  55,  45,  35,  30,
     60,  65,  70,  75,  75,  70,  65,  60,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PSQT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PSQT: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PSQT: [i32; 64] = [
      0,   0,   0,   5,   5,   0,   0,   0,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      5,  10,  10,  10,  10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PSQT: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -10,   5,   5,   5,   5,   5,   0, -10,
      0,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG_PSQT: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[rustfmt::skip]
const KING_EG_PSQT: [i32; 64] = [
    -50, -30, -30, -30, -30, -30, -30, -50,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -50, -40, -30, -20, -20, -30, -40, -50,
];

fn positional(kind: PieceKind, sq: Square) -> Score {
    let flat = |table: &[i32; 64]| Score::new(table[sq], table[sq]);
    match kind {
        PieceKind::Pawn => flat(&PAWN_PSQT),
        PieceKind::Knight => flat(&KNIGHT_PSQT),
        PieceKind::Bishop => flat(&BISHOP_PSQT),
        PieceKind::Rook => flat(&ROOK_PSQT),
        PieceKind::Queen => flat(&QUEEN_PSQT),
        PieceKind::King => Score::new(KING_MG_PSQT[sq], KING_EG_PSQT[sq]),
    }
}

static PSQT: OnceLock<[[Score; 64]; 12]> = OnceLock::new();

fn build_psqt() -> [[Score; 64]; 12] {
    let mut table = [[Score::ZERO; 64]; 12];
    for kind in PieceKind::ALL {
        for sq in 0..64 {
            let white = PIECE_VALUE[kind.index()] + positional(kind, sq);
            table[Piece::new(kind, Color::White).index()][sq] = white;
            table[Piece::new(kind, Color::Black).index()][sq ^ 56] = -white;
        }
    }
    table
}

pub fn init() {
    PSQT.get_or_init(build_psqt);
}

/// White-relative score of `piece` standing on `sq`.
#[inline]
pub fn psqt(piece: Piece, sq: Square) -> Score {
    PSQT.get_or_init(build_psqt)[piece.index()][sq]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_mirrors_white() {
        for kind in PieceKind::ALL {
            for sq in 0..64 {
                let white = psqt(Piece::new(kind, Color::White), sq);
                let black = psqt(Piece::new(kind, Color::Black), sq ^ 56);
                assert_eq!(white, -black, "{kind:?} on {sq}");
            }
        }
    }

    #[test]
    fn phase_scales_and_clamps() {
        assert_eq!(scale_phase(0), 0);
        assert_eq!(scale_phase(START_PHASE), MAX_PHASE);
        assert_eq!(scale_phase(12), 128);
        // two extra queens after promotion
        assert_eq!(scale_phase(START_PHASE + 8), MAX_PHASE);
    }

    #[test]
    fn taper_picks_ends() {
        let s = Score::new(100, -40);
        assert_eq!(s.taper(MAX_PHASE), 100);
        assert_eq!(s.taper(0), -40);
    }
}
