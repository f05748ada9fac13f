//! The position aggregate and its three mutation primitives.
//!
//! [`Position`] owns the board, hash key, counters, material/phase totals,
//! the [`FeatureList`] and the undo [`History`]. All piece movement goes
//! through `clear_piece`, `add_piece` and `move_piece`, which keep the
//! board views, material, phase and (optionally) the hash in step. The
//! make/take logic built on top of them lives in `makemove.rs`.

use crate::attacks;
use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::dirty::DirtyPiece;
use crate::features::{FeatureList, PieceId};
use crate::history::History;
use crate::psqt::{self, Score};
use crate::zobrist;

// Castling rights bits
pub const WHITE_OO: u8 = 1;
pub const WHITE_OOO: u8 = 2;
pub const BLACK_OO: u8 = 4;
pub const BLACK_OOO: u8 = 8;
pub const ALL_CASTLING: u8 = WHITE_OO | WHITE_OOO | BLACK_OO | BLACK_OOO;

#[derive(Clone)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side: Color,
    pub(crate) castling: u8,
    pub(crate) ep: Option<Square>,
    pub(crate) rule50: u16,
    // plies from the search root
    pub(crate) ply: usize,
    // plies since the start of the game
    pub(crate) hist_ply: usize,
    pub(crate) key: u64,
    pub(crate) material: Score,
    pub(crate) base_phase: i32,
    pub(crate) phase: i32,
    pub(crate) non_pawn: [u8; 2],
    pub(crate) features: FeatureList,
    pub(crate) history: History,
}

impl Position {
    /// Empty board, white to move. Use [`Position::from_fen`] to get a playable one.
    pub fn empty() -> Self {
        let mut pos = Self {
            board: Board::new(),
            side: Color::White,
            castling: 0,
            ep: None,
            rule50: 0,
            ply: 0,
            hist_ply: 0,
            key: 0,
            material: Score::ZERO,
            base_phase: 0,
            phase: 0,
            non_pawn: [0; 2],
            features: FeatureList::new(),
            history: History::new(),
        };
        pos.key = pos.recalc_key();
        pos
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board.piece_on(sq)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> u8 {
        self.castling
    }

    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep
    }

    #[inline]
    pub fn rule50(&self) -> u16 {
        self.rule50
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline]
    pub fn hist_ply(&self) -> usize {
        self.hist_ply
    }

    /// Start a new search from the current position.
    pub fn reset_ply(&mut self) {
        self.ply = 0;
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// White-relative material and piece-square score.
    #[inline]
    pub fn material(&self) -> Score {
        self.material
    }

    /// Game phase, 256 = full material, 0 = bare kings and pawns.
    #[inline]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    #[inline]
    pub fn non_pawn_count(&self, color: Color) -> u8 {
        self.non_pawn[color.index()]
    }

    #[inline]
    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    #[inline]
    pub fn handle_on(&self, sq: Square) -> PieceId {
        self.features.handle_on(sq)
    }

    /// Feature changes of the last move made, if any.
    #[inline]
    pub fn dirty_piece(&self) -> Option<&DirtyPiece> {
        self.history.last().map(|u| &u.dirty)
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn recalc_key(&self) -> u64 {
        zobrist::recalc(&self.board, self.side, self.castling, self.ep)
    }

    // Legality helpers -------------------------------------------

    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        let b = &self.board;
        let occ = b.occupied();
        let diagonal = b.pieces(PieceKind::Bishop, by) | b.pieces(PieceKind::Queen, by);
        let orthogonal = b.pieces(PieceKind::Rook, by) | b.pieces(PieceKind::Queen, by);
        attacks::pawn_attacks(by.flip(), sq) & b.pieces(PieceKind::Pawn, by) != 0
            || attacks::knight_attacks(sq) & b.pieces(PieceKind::Knight, by) != 0
            || attacks::king_attacks(sq) & b.pieces(PieceKind::King, by) != 0
            || attacks::bishop_attacks(sq, occ) & diagonal != 0
            || attacks::rook_attacks(sq, occ) & orthogonal != 0
    }

    pub fn king_attacked(&self, color: Color) -> bool {
        match self.board.king_sq(color) {
            Some(sq) => self.square_attacked(sq, color.flip()),
            None => false,
        }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.king_attacked(self.side)
    }

    // Mutation primitives ----------------------------------------

    pub(crate) fn clear_piece(&mut self, sq: Square, hash: bool) {
        let Some(piece) = self.board.take(sq) else {
            debug_assert!(false, "clear_piece on empty square {sq}");
            return;
        };
        if hash {
            self.key ^= zobrist::piece_key(piece, sq);
        }
        self.material -= psqt::psqt(piece, sq);
        self.base_phase -= psqt::phase_value(piece.kind);
        self.phase = psqt::scale_phase(self.base_phase);
        self.non_pawn[piece.color.index()] -= psqt::is_non_pawn(piece.kind) as u8;
    }

    pub(crate) fn add_piece(&mut self, sq: Square, piece: Piece, hash: bool) {
        if hash {
            self.key ^= zobrist::piece_key(piece, sq);
        }
        self.board.put(sq, piece);
        self.material += psqt::psqt(piece, sq);
        self.base_phase += psqt::phase_value(piece.kind);
        self.phase = psqt::scale_phase(self.base_phase);
        self.non_pawn[piece.color.index()] += psqt::is_non_pawn(piece.kind) as u8;
    }

    pub(crate) fn move_piece(&mut self, from: Square, to: Square, hash: bool) {
        let Some(piece) = self.board.shift(from, to) else {
            debug_assert!(false, "move_piece from empty square {from}");
            return;
        };
        if hash {
            self.key ^= zobrist::piece_key(piece, from) ^ zobrist::piece_key(piece, to);
        }
        self.material += psqt::psqt(piece, to) - psqt::psqt(piece, from);
    }

    // Diagnostics ------------------------------------------------

    /// Recompute every incremental structure from the board and compare.
    pub fn is_consistent(&self) -> bool {
        let mut material = Score::ZERO;
        let mut base_phase = 0;
        let mut non_pawn = [0u8; 2];
        for sq in 0..64 {
            if let Some(piece) = self.board.piece_on(sq) {
                material += psqt::psqt(piece, sq);
                base_phase += psqt::phase_value(piece.kind);
                non_pawn[piece.color.index()] += psqt::is_non_pawn(piece.kind) as u8;
            }
        }
        self.board.is_consistent()
            && self.key == self.recalc_key()
            && self.material == material
            && self.base_phase == base_phase
            && self.phase == psqt::scale_phase(base_phase)
            && self.non_pawn == non_pawn
            && self.features.is_valid(&self.board)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "fen: {}  key: {:016x}", self.to_fen(), self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{E1, E8};

    #[test]
    fn primitives_track_material_phase_and_hash() {
        let mut pos = Position::empty();
        let white_king = Piece::new(PieceKind::King, Color::White);
        let black_king = Piece::new(PieceKind::King, Color::Black);
        let rook = Piece::new(PieceKind::Rook, Color::White);

        pos.add_piece(E1, white_king, true);
        pos.add_piece(E8, black_king, true);
        pos.add_piece(0, rook, true);
        pos.features.set_from_board(&pos.board).unwrap();
        assert!(pos.is_consistent());
        assert_eq!(pos.non_pawn_count(Color::White), 1);
        assert_eq!(pos.base_phase, 2);

        pos.move_piece(0, 48, true);
        pos.features.move_piece(PieceId(24), 0, 48, rook);
        assert!(pos.is_consistent());
        assert_eq!(pos.material(), psqt::psqt(white_king, E1) + psqt::psqt(black_king, E8) + psqt::psqt(rook, 48));

        let id = pos.handle_on(48);
        pos.clear_piece(48, true);
        pos.features.remove_piece(id, 48);
        assert!(pos.is_consistent());
        assert_eq!(pos.phase(), 0);
        assert_eq!(pos.non_pawn_count(Color::White), 0);
    }

    #[test]
    fn attack_queries() {
        let mut pos = Position::empty();
        pos.add_piece(E1, Piece::new(PieceKind::King, Color::White), true);
        pos.add_piece(E8, Piece::new(PieceKind::King, Color::Black), true);
        pos.add_piece(36, Piece::new(PieceKind::Rook, Color::Black), true);
        assert!(pos.king_attacked(Color::White));
        assert!(!pos.king_attacked(Color::Black));
        assert!(pos.in_check());
        // a pawn on e2 blocks the file
        pos.add_piece(12, Piece::new(PieceKind::Pawn, Color::White), true);
        assert!(!pos.king_attacked(Color::White));
        assert!(!pos.in_check());
        assert!(pos.square_attacked(21, Color::White));
        assert!(pos.square_attacked(19, Color::White));
        assert!(!pos.square_attacked(28, Color::White));
    }

    #[test]
    fn reset_ply_keeps_game_history() {
        crate::init();
        let mut pos = Position::from_fen(crate::fen::START_FEN).unwrap();
        let mv = crate::movegen::legal_moves(&mut pos)[0];
        assert!(pos.make_move(mv));
        assert_eq!((pos.ply(), pos.hist_ply()), (1, 1));
        pos.reset_ply();
        assert_eq!((pos.ply(), pos.hist_ply()), (0, 1));
        assert_eq!(pos.history().len(), 1);
    }
}
