//! Piece encoding and the mailbox/bitboard board.
//!
//! Squares are mapped A1=0, B1=1, ..., H8=63. The [`Board`] keeps a per-square
//! piece array and three bitboard views (per kind, per color, combined) that
//! must always agree; every mutation goes through [`Board::put`],
//! [`Board::take`] or [`Board::shift`], which update all of them together.

use crate::utils::{iter_bits, lsb_index, square_bb, Bitboard};

pub type Square = usize;

pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<PieceKind> {
        Self::ALL.get(i).copied()
    }
}

/// A colored piece. Its [`Piece::index`] (white 0..6, black 6..12) keys the
/// hash and piece-square tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Piece> {
        let color = match i / 6 {
            0 => Color::White,
            1 => Color::Black,
            _ => return None,
        };
        PieceKind::from_index(i % 6).map(|kind| Piece::new(kind, color))
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(kind, color))
    }

    pub fn to_char(self) -> char {
        let ch = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

#[inline]
pub const fn file_of(sq: Square) -> usize {
    sq % 8
}

#[inline]
pub const fn rank_of(sq: Square) -> usize {
    sq / 8
}

/// Convert a square index (0-63) to algebraic notation (e.g., 0 -> "a1", 63 -> "h8")
pub fn square_name(sq: Square) -> String {
    let file_char = (b'a' + file_of(sq) as u8) as char;
    let rank_char = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file_char, rank_char)
}

/// Parse algebraic notation into a square index (e.g., "e2" -> 12)
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((rank - b'1') as usize * 8 + (file - b'a') as usize)
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    kind_bb: [Bitboard; 6],
    color_bb: [Bitboard; 2],
    occupied: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            squares: [None; 64],
            kind_bb: [0; 6],
            color_bb: [0; 2],
            occupied: 0,
        }
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq]
    }

    #[inline]
    pub fn kind_bb(&self, kind: PieceKind) -> Bitboard {
        self.kind_bb[kind.index()]
    }

    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.color_bb[color.index()]
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.kind_bb[kind.index()] & self.color_bb[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.occupied & square_bb(sq) != 0
    }

    pub fn king_sq(&self, color: Color) -> Option<Square> {
        lsb_index(self.pieces(PieceKind::King, color))
    }

    /// Place `piece` on an empty square.
    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq].is_none(), "put on occupied square {sq}");
        let bb = square_bb(sq);
        self.squares[sq] = Some(piece);
        self.kind_bb[piece.kind.index()] |= bb;
        self.color_bb[piece.color.index()] |= bb;
        self.occupied |= bb;
    }

    /// Remove and return the piece on `sq`.
    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq].take()?;
        let bb = square_bb(sq);
        self.kind_bb[piece.kind.index()] ^= bb;
        self.color_bb[piece.color.index()] ^= bb;
        self.occupied ^= bb;
        Some(piece)
    }

    /// Move the piece on `from` to the empty square `to`.
    #[inline]
    pub(crate) fn shift(&mut self, from: Square, to: Square) -> Option<Piece> {
        debug_assert!(self.squares[to].is_none(), "shift onto occupied square {to}");
        let piece = self.squares[from].take()?;
        let bb = square_bb(from) ^ square_bb(to);
        self.squares[to] = Some(piece);
        self.kind_bb[piece.kind.index()] ^= bb;
        self.color_bb[piece.color.index()] ^= bb;
        self.occupied ^= bb;
        Some(piece)
    }

    /// Cross-check the mailbox against every bitboard view.
    pub fn is_consistent(&self) -> bool {
        let mut kind_bb = [0u64; 6];
        let mut color_bb = [0u64; 2];
        for (sq, slot) in self.squares.iter().enumerate() {
            if let Some(piece) = slot {
                kind_bb[piece.kind.index()] |= square_bb(sq);
                color_bb[piece.color.index()] |= square_bb(sq);
            }
        }
        let occupied = color_bb[0] | color_bb[1];
        kind_bb == self.kind_bb
            && color_bb == self.color_bb
            && occupied == self.occupied
            && color_bb[0] & color_bb[1] == 0
            && iter_bits(occupied).all(|sq| self.squares[sq].is_some())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                match self.squares[rank * 8 + file] {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
