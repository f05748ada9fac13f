// Undo stack: one record per ply, pushed by make, popped by take
use crate::board::Square;
use crate::dirty::DirtyPiece;
use crate::moves::Move;

pub const MAX_GAME_MOVES: usize = 512;
pub const MAX_DEPTH: usize = 128;
pub const MAX_HISTORY: usize = MAX_GAME_MOVES + MAX_DEPTH;

// Undo entry per rollback; `mv` is Move::NONE for a null move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub key: u64,
    pub ep: Option<Square>,
    pub rule50: u16,
    pub castling: u8,
    pub mv: Move,
    pub dirty: DirtyPiece,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Undo>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_HISTORY),
        }
    }

    #[inline]
    pub fn push(&mut self, undo: Undo) {
        debug_assert!(
            self.entries.len() < MAX_HISTORY,
            "history overflow: more than {MAX_HISTORY} plies"
        );
        self.entries.push(undo);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Undo> {
        self.entries.pop()
    }

    #[inline]
    pub fn last(&self) -> Option<&Undo> {
        self.entries.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Moves played since setup, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().map(|u| u.mv)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
