//! FEN parsing and serialization for [`Position`].

use thiserror::Error;

use crate::board::{parse_square, rank_of, square_name, Color, Piece, PieceKind};
use crate::features::HandlesExhausted;
use crate::position::{Position, BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),
    #[error("invalid piece character {0:?}")]
    InvalidPiece(char),
    #[error("malformed piece placement {0:?}")]
    InvalidBoard(String),
    #[error("invalid side to move {0:?}")]
    InvalidSide(String),
    #[error("invalid castling character {0:?}")]
    InvalidCastling(char),
    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid move counter {0:?}")]
    InvalidCounter(String),
    #[error("{0:?} must have exactly one king, found {1}")]
    KingCount(Color, u32),
    #[error("more pieces than piece handles (at square {})", square_name(.0.square))]
    TooManyPieces(HandlesExhausted),
}

impl From<HandlesExhausted> for FenError {
    fn from(err: HandlesExhausted) -> Self {
        FenError::TooManyPieces(err)
    }
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut pos = Position::empty();
        pos.set_fen(fen)?;
        Ok(pos)
    }

    /// Replace the whole position, history included. On error the position is
    /// left unchanged.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::MissingField("piece placement"))?;
        let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castle_part = parts.next().ok_or(FenError::MissingField("castling"))?;
        let ep_part = parts.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let mut pos = Position::empty();

        // Ranks 8..1, files a..h
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidBoard(placement.to_string()));
        }
        for (i, rank_part) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0;
            for ch in rank_part.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::InvalidBoard(placement.to_string()));
                    }
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                    let back_rank = rank == 0 || rank == 7;
                    if file >= 8 || (back_rank && piece.kind == PieceKind::Pawn) {
                        return Err(FenError::InvalidBoard(placement.to_string()));
                    }
                    pos.add_piece(rank * 8 + file, piece, false);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidBoard(placement.to_string()));
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = pos.board.pieces(PieceKind::King, color).count_ones();
            if kings != 1 {
                return Err(FenError::KingCount(color, kings));
            }
        }

        pos.side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidSide(side_part.to_string())),
        };

        for ch in castle_part.chars() {
            pos.castling |= match ch {
                'K' => WHITE_OO,
                'Q' => WHITE_OOO,
                'k' => BLACK_OO,
                'q' => BLACK_OOO,
                '-' => 0,
                _ => return Err(FenError::InvalidCastling(ch)),
            };
        }

        pos.ep = match ep_part {
            "-" => None,
            s => {
                let sq = parse_square(s).ok_or_else(|| FenError::InvalidEnPassant(s.to_string()))?;
                let expected_rank = match pos.side {
                    Color::White => 5,
                    Color::Black => 2,
                };
                let pushed = Piece::new(PieceKind::Pawn, pos.side.flip());
                if rank_of(sq) != expected_rank
                    || pos.board.is_occupied(sq)
                    || pos.board.piece_on(sq ^ 8) != Some(pushed)
                {
                    return Err(FenError::InvalidEnPassant(s.to_string()));
                }
                Some(sq)
            }
        };

        pos.rule50 = halfmove_part
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove_part.to_string()))?;
        let fullmove: usize = fullmove_part
            .parse()
            .map_err(|_| FenError::InvalidCounter(fullmove_part.to_string()))?;
        pos.hist_ply = 2 * fullmove.saturating_sub(1) + (pos.side == Color::Black) as usize;

        pos.features.set_from_board(&pos.board)?;
        pos.key = pos.recalc_key();

        log::debug!("set position {fen:?}, key {:016x}", pos.key);
        *self = pos;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board.piece_on(rank * 8 + file) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        }
        for (bit, ch) in [(WHITE_OO, 'K'), (WHITE_OOO, 'Q'), (BLACK_OO, 'k'), (BLACK_OOO, 'q')] {
            if self.castling & bit != 0 {
                fen.push(ch);
            }
        }

        fen.push(' ');
        match self.ep {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        let fullmove = self.hist_ply / 2 + 1;
        fen.push_str(&format!(" {} {}", self.rule50, fullmove));
        fen
    }
}

impl std::str::FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
