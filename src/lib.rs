pub mod attacks;
pub mod board;
pub mod dirty;
pub mod features;
pub mod fen;
pub mod history;
pub mod makemove;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod position;
pub mod psqt;
pub mod utils;
pub mod zobrist;

pub use board::{Board, Color, Piece, PieceKind, Square};
pub use dirty::{ChangedFeature, DirtyPiece};
pub use features::{Feature, FeatureList, FeaturePair, PieceId, FEATURE_END};
pub use fen::{FenError, START_FEN};
pub use moves::Move;
pub use position::Position;
pub use psqt::Score;

/// Build the attack, hash key and piece-square tables up front. They are also
/// built lazily on first use.
pub fn init() {
    attacks::init();
    zobrist::init();
    psqt::init();
}
