use core::fmt;

use log::warn;
use rustc_hash::FxHashMap;

use crate::{
    ledger::LedgerError,
    types::{
        pieces::{ChessPiece, Color, Piece, PieceName},
        square::Square,
    },
};

/// Positional ledger for one game: which piece currently stands on which
/// square. Moves arriving here were already validated upstream, so nothing is
/// checked beyond occupancy.
#[derive(Debug, Clone)]
pub struct Ledger {
    pieces: FxHashMap<Square, ChessPiece>,
    pub game_id: i64,
}

impl Ledger {
    pub fn new(game_id: i64) -> Self {
        Self { pieces: FxHashMap::default(), game_id }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, sq: Square) -> Option<&ChessPiece> {
        self.pieces.get(&sq)
    }

    /// Color-agnostic lookup: the {type, color} record standing on a square.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pieces.get(&sq).map(ChessPiece::piece)
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.pieces.get(&sq).map(|piece| piece.color)
    }

    /// One side's pieces, derived by filtering the authoritative map.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, &ChessPiece)> + '_ {
        self.pieces
            .iter()
            .filter(move |(_, piece)| piece.color == color)
            .map(|(sq, piece)| (*sq, piece))
    }

    pub fn place_piece(&mut self, sq: Square, piece: ChessPiece) -> Result<(), LedgerError> {
        if self.pieces.contains_key(&sq) {
            return Err(LedgerError::Occupied(sq));
        }
        self.pieces.insert(sq, piece);
        Ok(())
    }

    /// Removes and returns whatever stands on `sq`. Removing an empty square
    /// is a no-op, so capture bookkeeping can be replayed safely.
    pub fn remove_piece(&mut self, sq: Square) -> Option<ChessPiece> {
        self.pieces.remove(&sq)
    }

    /// Relocates the occupant of `from` to `to`. An empty `from` returns
    /// `Ok(false)` without touching anything. The destination must be empty:
    /// captures remove the captured piece first.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<bool, LedgerError> {
        match self.pieces.remove(&from) {
            None => {
                warn!("game {}: no piece at {from} to move to {to}", self.game_id);
                Ok(false)
            }
            Some(piece) if self.pieces.contains_key(&to) => {
                // failed moves must not disturb the board
                self.pieces.insert(from, piece);
                Err(LedgerError::Occupied(to))
            }
            Some(piece) => {
                self.pieces.insert(to, piece);
                Ok(true)
            }
        }
    }

    /// Rewrites the occupant's piece type in place, keeping its identity and
    /// color. Promoting an empty square is a no-op.
    pub fn promote(&mut self, sq: Square, to: PieceName) -> bool {
        match self.pieces.get_mut(&sq) {
            Some(piece) => {
                piece.name = to;
                true
            }
            None => {
                warn!("game {}: no piece at {sq} to promote to {to}", self.game_id);
                false
            }
        }
    }

    /// Castling: relocates the king, then the rook, each leg with
    /// `apply_move` semantics. The king leg completes before the rook leg
    /// starts.
    pub fn apply_castle(
        &mut self,
        king_from: Square,
        king_to: Square,
        rook_from: Square,
        rook_to: Square,
    ) -> Result<(), LedgerError> {
        self.apply_move(king_from, king_to)?;
        self.apply_move(rook_from, rook_to)?;
        Ok(())
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} | ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(piece) => write!(f, "{} | ", piece.name.to_char(piece.color))?,
                    None => write!(f, "_ | ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "    a   b   c   d   e   f   g   h")
    }
}
