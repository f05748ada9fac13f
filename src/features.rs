//! FeatureList - feature indices of all 32 piece identities and the
//! square → identity reverse map.
//!
//! Every physical piece gets a [`PieceId`] from a fixed range per kind when
//! the position is set up and keeps it for the rest of the game, including
//! through promotion. For each id the list stores a [`FeaturePair`]: the
//! feature index of that piece as seen from white and from black. An external
//! incremental evaluator consumes these together with the per-move
//! [`DirtyPiece`](crate::dirty::DirtyPiece) record.
//!
//! Feature layout (per perspective):
//! - `0`: [`Feature::NONE`], no piece
//! - `1 + 64 * (2 * kind + enemy) + square`, with `enemy` = piece color differs
//!   from the perspective, and `square` rotated by 180° for black
//! - [`FEATURE_END`] = 769

use std::ops::Range;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::dirty::ChangedFeature;

/// Stable identity of a physical piece.
///
/// - pawns: 0-15
/// - knights: 16-19
/// - bishops: 20-23
/// - rooks: 24-27
/// - queens: 28-29
/// - kings: 30 (white), 31 (black)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Unassigned marker in the board map.
    pub const NONE: PieceId = PieceId(u8::MAX);

    pub const WHITE_KING: PieceId = PieceId(30);
    pub const BLACK_KING: PieceId = PieceId(31);

    /// Total number of identities.
    pub const NB: usize = 32;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 as usize >= Self::NB
    }

    #[inline]
    pub const fn king(color: Color) -> PieceId {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }
}

impl Default for PieceId {
    fn default() -> Self {
        Self::NONE
    }
}

const PIECE_ID_BASE: [u8; 7] = [0, 16, 20, 24, 28, 30, 32];

/// Identity range reserved for `kind`.
#[inline]
pub fn piece_id_range(kind: PieceKind) -> Range<u8> {
    PIECE_ID_BASE[kind.index()]..PIECE_ID_BASE[kind.index() + 1]
}

/// Index into the evaluator's feature space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Feature(pub u16);

/// One past the largest feature index.
pub const FEATURE_END: usize = 1 + 12 * 64;

#[inline]
const fn orient(sq: Square, perspective: Color) -> Square {
    match perspective {
        Color::White => sq,
        Color::Black => 63 - sq,
    }
}

impl Feature {
    /// Piece absent.
    pub const NONE: Feature = Feature(0);

    #[inline]
    pub const fn new(piece: Piece, sq: Square, perspective: Color) -> Feature {
        let enemy = (piece.color as usize != perspective as usize) as usize;
        let group = 2 * piece.kind as usize + enemy;
        Feature((1 + 64 * group + orient(sq, perspective)) as u16)
    }

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Recover the piece and square a feature encodes.
    pub fn decode(self, perspective: Color) -> Option<(Piece, Square)> {
        if self.is_none() || self.0 as usize >= FEATURE_END {
            return None;
        }
        let idx = self.0 as usize - 1;
        let group = idx / 64;
        let kind = PieceKind::from_index(group / 2)?;
        let color = if group % 2 == 1 {
            perspective.flip()
        } else {
            perspective
        };
        Some((Piece::new(kind, color), orient(idx % 64, perspective)))
    }
}

/// Feature index of one piece from both perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeaturePair {
    pub white: Feature,
    pub black: Feature,
}

impl FeaturePair {
    pub const NONE: FeaturePair = FeaturePair {
        white: Feature::NONE,
        black: Feature::NONE,
    };

    #[inline]
    pub const fn from_board(piece: Piece, sq: Square) -> FeaturePair {
        FeaturePair {
            white: Feature::new(piece, sq, Color::White),
            black: Feature::new(piece, sq, Color::Black),
        }
    }

    #[inline]
    pub const fn get(self, perspective: Color) -> Feature {
        match perspective {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.white.is_none() && self.black.is_none()
    }

    /// Square this pair places its piece on, if any.
    #[inline]
    pub fn square(self) -> Option<Square> {
        self.white.decode(Color::White).map(|(_, sq)| sq)
    }
}

/// Handle space ran out while assigning identities to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlesExhausted {
    pub square: Square,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FeatureList {
    pairs: [FeaturePair; PieceId::NB],
    on_board: [PieceId; 64],
}

impl FeatureList {
    pub fn new() -> Self {
        Self {
            pairs: [FeaturePair::NONE; PieceId::NB],
            on_board: [PieceId::NONE; 64],
        }
    }

    /// Reset every identity to absent and every square to unassigned.
    pub fn clear(&mut self) {
        self.pairs = [FeaturePair::NONE; PieceId::NB];
        self.on_board = [PieceId::NONE; 64];
    }

    /// Bind `id` to `piece` on `sq`.
    #[inline]
    pub fn put_piece(&mut self, id: PieceId, sq: Square, piece: Piece) {
        debug_assert!(!id.is_none(), "put_piece with unassigned id on {sq}");
        self.pairs[id.index()] = FeaturePair::from_board(piece, sq);
        self.on_board[sq] = id;
    }

    /// Take `id` off the board: its pair becomes the sentinel.
    #[inline]
    pub fn remove_piece(&mut self, id: PieceId, sq: Square) {
        debug_assert_eq!(self.on_board[sq], id, "remove_piece: {sq} not bound to {id:?}");
        self.pairs[id.index()] = FeaturePair::NONE;
        self.on_board[sq] = PieceId::NONE;
    }

    /// Rebind `id` from `from` to `to`, now as `piece`.
    #[inline]
    pub fn move_piece(&mut self, id: PieceId, from: Square, to: Square, piece: Piece) {
        debug_assert_eq!(self.on_board[from], id, "move_piece: {from} not bound to {id:?}");
        self.on_board[from] = PieceId::NONE;
        self.put_piece(id, to, piece);
    }

    /// Undo one recorded change, rebinding the same identity.
    pub(crate) fn revert(&mut self, change: &ChangedFeature) {
        if let Some(sq) = change.new.square() {
            if self.on_board[sq] == change.id {
                self.on_board[sq] = PieceId::NONE;
            }
        }
        self.pairs[change.id.index()] = change.old;
        if let Some(sq) = change.old.square() {
            self.on_board[sq] = change.id;
        }
    }

    #[inline]
    pub fn handle_on(&self, sq: Square) -> PieceId {
        self.on_board[sq]
    }

    #[inline]
    pub fn pair(&self, id: PieceId) -> FeaturePair {
        self.pairs[id.index()]
    }

    /// Live features of one perspective, for a full accumulator refresh.
    pub fn active(&self, perspective: Color) -> impl Iterator<Item = Feature> + '_ {
        self.pairs
            .iter()
            .map(move |pair| pair.get(perspective))
            .filter(|f| !f.is_none())
    }

    /// Assign identities to every piece of `board`, scanning A1..H8.
    ///
    /// Each kind draws from its own range; once that is used up (extra
    /// promoted pieces in the setup) it borrows free pawn identities, the
    /// same slots a promotion would have kept.
    pub fn set_from_board(&mut self, board: &Board) -> Result<(), HandlesExhausted> {
        self.clear();
        let mut next: [u8; 6] = [0, 16, 20, 24, 28, 30];
        for sq in 0..64 {
            let Some(piece) = board.piece_on(sq) else {
                continue;
            };
            let id = if piece.kind == PieceKind::King {
                PieceId::king(piece.color)
            } else {
                let kind = piece.kind.index();
                let pawn = PieceKind::Pawn.index();
                if next[kind] < PIECE_ID_BASE[kind + 1] {
                    next[kind] += 1;
                    PieceId(next[kind] - 1)
                } else if next[pawn] < PIECE_ID_BASE[pawn + 1] {
                    next[pawn] += 1;
                    PieceId(next[pawn] - 1)
                } else {
                    return Err(HandlesExhausted { square: sq });
                }
            };
            if !self.pairs[id.index()].is_none() {
                return Err(HandlesExhausted { square: sq });
            }
            self.put_piece(id, sq, piece);
        }
        Ok(())
    }

    /// Diagnostic cross-check of the list against the board.
    pub fn is_valid(&self, board: &Board) -> bool {
        for sq in 0..64 {
            let id = self.on_board[sq];
            match board.piece_on(sq) {
                Some(piece) => {
                    if id.is_none() || self.pairs[id.index()] != FeaturePair::from_board(piece, sq) {
                        return false;
                    }
                    let in_range = piece_id_range(piece.kind).contains(&id.0)
                        || (piece.kind != PieceKind::King
                            && piece_id_range(PieceKind::Pawn).contains(&id.0));
                    if !in_range {
                        return false;
                    }
                }
                None => {
                    if !id.is_none() {
                        return false;
                    }
                }
            }
        }
        (0..PieceId::NB).all(|i| match self.pairs[i].square() {
            Some(sq) => self.on_board[sq] == PieceId(i as u8),
            None => self.pairs[i].is_none(),
        })
    }
}

impl Default for FeatureList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FeatureList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                (0..PieceId::NB)
                    .filter(|&i| !self.pairs[i].is_none())
                    .map(|i| (i, self.pairs[i])),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_ranges_partition_the_handle_space() {
        let mut seen = [false; PieceId::NB];
        for kind in PieceKind::ALL {
            for id in piece_id_range(kind) {
                assert!(!seen[id as usize]);
                seen[id as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(piece_id_range(PieceKind::Pawn).len(), 16);
        assert_eq!(piece_id_range(PieceKind::Queen), 28..30);
    }

    #[test]
    fn features_decode_for_every_piece_square_and_perspective() {
        for i in 0..12 {
            let piece = Piece::from_index(i).unwrap();
            for sq in 0..64 {
                for perspective in [Color::White, Color::Black] {
                    let f = Feature::new(piece, sq, perspective);
                    assert!(!f.is_none());
                    assert!((f.value() as usize) < FEATURE_END);
                    assert_eq!(f.decode(perspective), Some((piece, sq)));
                }
            }
        }
        assert_eq!(Feature::NONE.decode(Color::White), None);
    }

    #[test]
    fn perspectives_are_symmetric() {
        // A white knight on b1 looks to white like a black knight on g8 looks to black.
        let white_knight = Piece::new(PieceKind::Knight, Color::White);
        let black_knight = Piece::new(PieceKind::Knight, Color::Black);
        assert_eq!(
            Feature::new(white_knight, 1, Color::White),
            Feature::new(black_knight, 62, Color::Black)
        );
    }

    #[test]
    fn put_move_remove_and_revert() {
        let mut list = FeatureList::new();
        let rook = Piece::new(PieceKind::Rook, Color::White);
        let id = PieceId(24);
        list.put_piece(id, 7, rook);
        assert_eq!(list.handle_on(7), id);

        let before = list.pair(id);
        list.move_piece(id, 7, 5, rook);
        let change = ChangedFeature {
            id,
            old: before,
            new: list.pair(id),
        };
        assert_eq!(list.handle_on(7), PieceId::NONE);
        assert_eq!(list.pair(id).square(), Some(5));

        list.revert(&change);
        assert_eq!(list.handle_on(5), PieceId::NONE);
        assert_eq!(list.handle_on(7), id);
        assert_eq!(list.pair(id), before);

        list.remove_piece(id, 7);
        assert!(list.pair(id).is_none());
        assert_eq!(list.handle_on(7), PieceId::NONE);
        assert_eq!(list.active(Color::White).count(), 0);
    }

    #[test]
    fn extra_promoted_pieces_borrow_pawn_ids() {
        let mut board = Board::new();
        board.put(4, Piece::new(PieceKind::King, Color::White));
        board.put(60, Piece::new(PieceKind::King, Color::Black));
        for sq in 8..11 {
            board.put(sq, Piece::new(PieceKind::Queen, Color::White));
        }
        let mut list = FeatureList::new();
        list.set_from_board(&board).unwrap();
        assert_eq!(list.handle_on(4), PieceId::WHITE_KING);
        assert_eq!(list.handle_on(60), PieceId::BLACK_KING);
        assert_eq!(list.handle_on(8), PieceId(28));
        assert_eq!(list.handle_on(9), PieceId(29));
        assert_eq!(list.handle_on(10), PieceId(0));
        assert!(list.is_valid(&board));
    }

    #[test]
    fn second_king_exhausts_handles() {
        let mut board = Board::new();
        board.put(4, Piece::new(PieceKind::King, Color::White));
        board.put(5, Piece::new(PieceKind::King, Color::White));
        let mut list = FeatureList::new();
        assert_eq!(list.set_from_board(&board), Err(HandlesExhausted { square: 5 }));
    }
}
