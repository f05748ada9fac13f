//! Make/take of regular and null moves.
//!
//! `make_move` pushes an [`Undo`] record, applies the move to every
//! incremental structure and rejects it (after a full rollback) when it
//! leaves the mover's king attacked. `take_move` reverses the last move
//! using the record: the key, en-passant square, 50-move counter and
//! castling rights are restored verbatim, pieces are moved back unhashed
//! and the feature list is rewound from the move's [`DirtyPiece`].

use crate::attacks;
use crate::board::{Piece, PieceKind, Square, A1, A8, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8, H1, H8};
use crate::dirty::{ChangedFeature, DirtyPiece};
use crate::features::FeaturePair;
use crate::history::Undo;
use crate::moves::Move;
use crate::position::Position;
use crate::zobrist;

// Rights that survive a move touching each square, and-ed for from and to.
#[rustfmt::skip]
const CASTLE_PERM: [u8; 64] = {
    let mut perm = [15u8; 64];
    perm[A1] = 13;
    perm[E1] = 12;
    perm[H1] = 14;
    perm[A8] = 7;
    perm[E8] = 3;
    perm[H8] = 11;
    perm
};

/// Rook squares (from, to) for a castling move whose king lands on `king_to`.
#[inline]
pub(crate) fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        C1 => Some((A1, D1)),
        C8 => Some((A8, D8)),
        G1 => Some((H1, F1)),
        G8 => Some((H8, F8)),
        _ => None,
    }
}

impl Position {
    /// Apply `mv`. Returns `false` and leaves the position untouched when the
    /// move leaves the mover in check.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let from = mv.from_sq();
        let to = mv.to_sq();
        let Some(mover) = self.board.piece_on(from) else {
            debug_assert!(false, "make_move {mv}: no piece on {from}");
            return false;
        };
        debug_assert_eq!(mover.color, self.side, "make_move {mv}: moving the wrong side");
        let us = mover.color;
        let them = us.flip();

        let mut undo = Undo {
            key: self.key,
            ep: self.ep,
            rule50: self.rule50,
            castling: self.castling,
            mv,
            dirty: DirtyPiece::new(),
        };

        self.ply += 1;
        self.hist_ply += 1;
        self.rule50 = self.rule50.saturating_add(1);

        if let Some(ep) = self.ep.take() {
            self.key ^= zobrist::ep_key(ep);
        }

        self.key ^= zobrist::castling_key(self.castling);
        self.castling &= CASTLE_PERM[from] & CASTLE_PERM[to];
        self.key ^= zobrist::castling_key(self.castling);

        let mut second: Option<ChangedFeature> = None;

        if let Some(victim) = mv.captured() {
            debug_assert_eq!(self.board.piece_on(to), Some(victim), "make_move {mv}: stale victim");
            let id = self.features.handle_on(to);
            second = Some(ChangedFeature {
                id,
                old: self.features.pair(id),
                new: FeaturePair::NONE,
            });
            self.features.remove_piece(id, to);
            self.clear_piece(to, true);
            self.rule50 = 0;
        }

        let id = self.features.handle_on(from);
        let old = self.features.pair(id);
        self.move_piece(from, to, true);
        self.features.move_piece(id, from, to, mover);

        if mover.kind == PieceKind::Pawn {
            self.rule50 = 0;

            if mv.is_pawn_start() {
                let skipped = to ^ 8;
                if attacks::pawn_attacks(us, skipped) & self.board.pieces(PieceKind::Pawn, them) != 0 {
                    self.ep = Some(skipped);
                    self.key ^= zobrist::ep_key(skipped);
                }
            } else if mv.is_en_passant() {
                let victim_sq = to ^ 8;
                let victim_id = self.features.handle_on(victim_sq);
                second = Some(ChangedFeature {
                    id: victim_id,
                    old: self.features.pair(victim_id),
                    new: FeaturePair::NONE,
                });
                self.features.remove_piece(victim_id, victim_sq);
                self.clear_piece(victim_sq, true);
            } else if let Some(kind) = mv.promotion() {
                let promoted = Piece::new(kind, us);
                self.clear_piece(to, true);
                self.add_piece(to, promoted, true);
                self.features.put_piece(id, to, promoted);
            }
        } else if mv.is_castle() {
            if let Some((rook_from, rook_to)) = castle_rook_squares(to) {
                let rook = Piece::new(PieceKind::Rook, us);
                let rook_id = self.features.handle_on(rook_from);
                let rook_old = self.features.pair(rook_id);
                self.move_piece(rook_from, rook_to, true);
                self.features.move_piece(rook_id, rook_from, rook_to, rook);
                second = Some(ChangedFeature {
                    id: rook_id,
                    old: rook_old,
                    new: self.features.pair(rook_id),
                });
            } else {
                debug_assert!(false, "make_move {mv}: castle to {to}");
            }
        }

        undo.dirty.push(ChangedFeature {
            id,
            old,
            new: self.features.pair(id),
        });
        if let Some(change) = second {
            undo.dirty.push(change);
        }
        self.history.push(undo);

        self.side = them;
        self.key ^= zobrist::side_key();

        if self.king_attacked(us) {
            self.take_move();
            return false;
        }

        debug_assert!(self.is_consistent(), "make_move {mv} broke the position:\n{self:?}");
        true
    }

    /// Reverse the last move made with [`Position::make_move`].
    pub fn take_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "take_move with empty history");
            return;
        };
        let mv = undo.mv;
        debug_assert!(mv != Move::NONE, "take_move on a null move");

        self.ply -= 1;
        self.hist_ply -= 1;
        self.side = self.side.flip();

        let us = self.side;
        let from = mv.from_sq();
        let to = mv.to_sq();

        if mv.is_en_passant() {
            self.add_piece(to ^ 8, Piece::new(PieceKind::Pawn, us.flip()), false);
        } else if mv.is_castle() {
            if let Some((rook_from, rook_to)) = castle_rook_squares(to) {
                self.move_piece(rook_to, rook_from, false);
            }
        }

        self.move_piece(to, from, false);

        if mv.promotion().is_some() {
            self.clear_piece(from, false);
            self.add_piece(from, Piece::new(PieceKind::Pawn, us), false);
        }

        if let Some(victim) = mv.captured() {
            self.add_piece(to, victim, false);
        }

        for change in undo.dirty.as_slice().iter().rev() {
            self.features.revert(change);
        }

        self.key = undo.key;
        self.ep = undo.ep;
        self.rule50 = undo.rule50;
        self.castling = undo.castling;

        debug_assert!(self.is_consistent(), "take_move {mv} broke the position:\n{self:?}");
    }

    /// Pass the turn without moving a piece.
    pub fn make_null_move(&mut self) {
        self.history.push(Undo {
            key: self.key,
            ep: self.ep,
            rule50: self.rule50,
            castling: self.castling,
            mv: Move::NONE,
            dirty: DirtyPiece::new(),
        });

        self.ply += 1;
        self.hist_ply += 1;
        self.rule50 = 0;

        self.side = self.side.flip();
        self.key ^= zobrist::side_key();

        if let Some(ep) = self.ep.take() {
            self.key ^= zobrist::ep_key(ep);
        }

        debug_assert!(self.is_consistent());
    }

    pub fn take_null_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "take_null_move with empty history");
            return;
        };
        debug_assert!(undo.mv == Move::NONE, "take_null_move on {}", undo.mv);

        self.ply -= 1;
        self.hist_ply -= 1;
        self.side = self.side.flip();

        self.key = undo.key;
        self.ep = undo.ep;
        self.rule50 = undo.rule50;
        self.castling = undo.castling;

        debug_assert!(self.is_consistent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_perm_strips_the_right_rights() {
        use crate::position::{ALL_CASTLING, BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};
        assert_eq!(ALL_CASTLING & CASTLE_PERM[E1], BLACK_OO | BLACK_OOO);
        assert_eq!(ALL_CASTLING & CASTLE_PERM[H1], ALL_CASTLING & !WHITE_OO);
        assert_eq!(ALL_CASTLING & CASTLE_PERM[A1], ALL_CASTLING & !WHITE_OOO);
        assert_eq!(ALL_CASTLING & CASTLE_PERM[E8], WHITE_OO | WHITE_OOO);
        assert_eq!(ALL_CASTLING & CASTLE_PERM[H8], ALL_CASTLING & !BLACK_OO);
        assert_eq!(ALL_CASTLING & CASTLE_PERM[A8], ALL_CASTLING & !BLACK_OOO);
        assert_eq!(CASTLE_PERM.iter().filter(|&&p| p == 15).count(), 58);
    }

    #[test]
    fn rook_table_follows_king_destination() {
        assert_eq!(castle_rook_squares(G1), Some((H1, F1)));
        assert_eq!(castle_rook_squares(C1), Some((A1, D1)));
        assert_eq!(castle_rook_squares(G8), Some((H8, F8)));
        assert_eq!(castle_rook_squares(C8), Some((A8, D8)));
        assert_eq!(castle_rook_squares(E1), None);
    }
}
