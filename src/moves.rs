use crate::board::{square_name, Piece, PieceKind, Square};

// Move encoding: 32-bit layout
// Bits 0-5: from (0-63)
// Bits 6-11: to (0-63)
// Bits 12-15: captured piece index + 1 (0 = none)
// Bits 16-19: promotion kind + 1 (0 = none)
// Bits 20-22: flags
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const NONE: Move = Move(0);

    pub const FLAG_NONE: u32 = 0;
    pub const FLAG_EN_PASSANT: u32 = 1 << 20;
    pub const FLAG_PAWN_START: u32 = 1 << 21;
    pub const FLAG_CASTLE: u32 = 1 << 22;

    /// En passant moves carry no captured piece: the victim sits behind `to`,
    /// not on it.
    pub fn new(
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promotion: Option<PieceKind>,
        flags: u32,
    ) -> Move {
        let cap = captured.map(|p| p.index() as u32 + 1).unwrap_or(0);
        let prom = promotion.map(|k| k as u32 + 1).unwrap_or(0);
        Move(
            (from as u32 & 0x3F)
                | ((to as u32 & 0x3F) << 6)
                | ((cap & 0xF) << 12)
                | ((prom & 0xF) << 16)
                | flags,
        )
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_sq(self) -> Square {
        (self.0 & 0x3F) as Square
    }

    #[inline]
    pub const fn to_sq(self) -> Square {
        ((self.0 >> 6) & 0x3F) as Square
    }

    #[inline]
    pub fn captured(self) -> Option<Piece> {
        match (self.0 >> 12) & 0xF {
            0 => None,
            v => Piece::from_index(v as usize - 1),
        }
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        match (self.0 >> 16) & 0xF {
            0 => None,
            v => PieceKind::from_index(v as usize - 1),
        }
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & Self::FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_pawn_start(self) -> bool {
        self.0 & Self::FLAG_PAWN_START != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.0 & Self::FLAG_CASTLE != 0
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.is_en_passant() || (self.0 >> 12) & 0xF != 0
    }

    /// Convert to UCI notation (e.g., "e2e4" or "e7e8q")
    pub fn to_uci(self) -> String {
        if self == Move::NONE {
            return "0000".to_string();
        }
        let mut uci = format!("{}{}", square_name(self.from_sq()), square_name(self.to_sq()));
        if let Some(promo) = self.promotion() {
            uci.push(match promo {
                PieceKind::Knight => 'n',
                PieceKind::Bishop => 'b',
                PieceKind::Rook => 'r',
                _ => 'q',
            });
        }
        uci
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl std::fmt::Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Move({} {:#x})", self.to_uci(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    #[test]
    fn fields_survive_encoding() {
        let victim = Piece::new(PieceKind::Rook, Color::Black);
        let mv = Move::new(52, 63, Some(victim), Some(PieceKind::Knight), Move::FLAG_NONE);
        assert_eq!(mv.from_sq(), 52);
        assert_eq!(mv.to_sq(), 63);
        assert_eq!(mv.captured(), Some(victim));
        assert_eq!(mv.promotion(), Some(PieceKind::Knight));
        assert!(mv.is_capture());
        assert!(!mv.is_castle() && !mv.is_en_passant() && !mv.is_pawn_start());
        assert_eq!(mv.to_uci(), "e7h8n");
        assert_eq!(mv.raw() & 0xFFF, 52 | (63 << 6));
        assert_eq!(Move::NONE.raw(), 0);
    }

    #[test]
    fn en_passant_counts_as_capture_without_victim() {
        let mv = Move::new(36, 43, None, None, Move::FLAG_EN_PASSANT);
        assert!(mv.is_capture());
        assert_eq!(mv.captured(), None);
        assert_eq!(mv.to_string(), "e5d6");
        assert_eq!(Move::NONE.to_uci(), "0000");
    }
}
