use thiserror::Error;

use crate::types::square::{Square, SquareError};

pub mod ledger;
pub mod setup;

pub use ledger::Ledger;
pub use setup::PieceCreator;

/// Error type surfaced by the external piece-creation collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Square(#[from] SquareError),

    /// The destination of a relocation must be vacated first; captures
    /// remove the captured piece before the move is applied.
    #[error("destination {0} is occupied")]
    Occupied(Square),

    /// Start-position setup was requested for a ledger that already holds
    /// pieces.
    #[error("ledger for game {game_id} already holds {count} pieces")]
    AlreadyPopulated { game_id: i64, count: usize },

    /// The piece-creation service failed mid-setup. The ledger is left
    /// untouched; `populated` lists the squares already created upstream.
    #[error("piece creation for {square} failed with {} pieces already created", .populated.len())]
    Setup {
        square: Square,
        populated: Vec<Square>,
        #[source]
        source: BoxError,
    },
}
