use std::ops;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Display, EnumIter, EnumString, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl ops::Not for Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Display, EnumIter, EnumString, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PieceName {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceName {
    /// Uppercase letter for white pieces, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceName::Pawn => 'p',
            PieceName::Knight => 'n',
            PieceName::Bishop => 'b',
            PieceName::Rook => 'r',
            PieceName::Queen => 'q',
            PieceName::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// What stands on a square, independent of which service record it is.
#[derive(Eq, Copy, Clone, PartialEq, Debug)]
pub struct Piece {
    pub name: PieceName,
    pub color: Color,
}

impl Piece {
    pub fn new(name: PieceName, color: Color) -> Self {
        Self { name, color }
    }
}

/// Full piece object as handed back by the piece-creation service. `id` is
/// the service-assigned identity and survives moves and promotions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessPiece {
    pub id: i64,
    pub name: PieceName,
    pub color: Color,
}

impl ChessPiece {
    pub fn new(id: i64, name: PieceName, color: Color) -> Self {
        Self { id, name, color }
    }

    pub fn piece(&self) -> Piece {
        Piece::new(self.name, self.color)
    }
}
