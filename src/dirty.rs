//! DirtyPiece - which feature entries one move changed.
//!
//! A move touches at most two identities: the mover (entry 0) and either the
//! captured piece or the castling rook (entry 1). The evaluator's accumulator
//! cache applies these deltas instead of refreshing from scratch.

use crate::features::{FeaturePair, PieceId};

/// One identity's feature pair before and after a move. A captured piece has
/// `new == FeaturePair::NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangedFeature {
    pub id: PieceId,
    pub old: FeaturePair,
    pub new: FeaturePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyPiece {
    len: u8,
    changed: [ChangedFeature; 2],
}

impl DirtyPiece {
    pub const fn new() -> Self {
        Self {
            len: 0,
            changed: [
                ChangedFeature {
                    id: PieceId::NONE,
                    old: FeaturePair::NONE,
                    new: FeaturePair::NONE,
                },
                ChangedFeature {
                    id: PieceId::NONE,
                    old: FeaturePair::NONE,
                    new: FeaturePair::NONE,
                },
            ],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, change: ChangedFeature) {
        debug_assert!(self.len < 2, "more than two dirty pieces in one move");
        self.changed[self.len as usize] = change;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&ChangedFeature> {
        self.as_slice().get(i)
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChangedFeature] {
        &self.changed[..self.len as usize]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangedFeature> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a DirtyPiece {
    type Item = &'a ChangedFeature;
    type IntoIter = std::slice::Iter<'a, ChangedFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
