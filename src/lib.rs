//! In-memory mirror of a chess game's piece positions. Moves, captures,
//! promotions and castling are applied here after an upstream layer has
//! already validated them; piece creation is delegated to an injected
//! collaborator.
#![allow(clippy::module_inception)]
pub mod ledger;
pub mod types;

pub use ledger::{Ledger, LedgerError, PieceCreator};
pub use types::pieces::{ChessPiece, Color, Piece, PieceName};
pub use types::square::{file_letter, Square, SquareError};
