use async_trait::async_trait;
use log::debug;

use crate::{
    ledger::{BoxError, Ledger, LedgerError},
    types::{
        pieces::{ChessPiece, Color, PieceName},
        square::{file_letter, Square},
    },
};

/// External piece-creation collaborator. Implementations persist the piece
/// (or fail) and hand back the stored record with its assigned identity.
#[async_trait]
pub trait PieceCreator: Send + Sync {
    async fn create_piece(
        &self,
        name: PieceName,
        color: Color,
        square: Square,
        game_id: i64,
    ) -> Result<ChessPiece, BoxError>;
}

/// Back-rank placements in creation order, a1 = 0 and h8 = 63.
const BACK_RANK: [(PieceName, Color, Square); 16] = [
    (PieceName::Rook, Color::White, Square(0)),
    (PieceName::Rook, Color::White, Square(7)),
    (PieceName::Rook, Color::Black, Square(56)),
    (PieceName::Rook, Color::Black, Square(63)),
    (PieceName::Knight, Color::White, Square(1)),
    (PieceName::Knight, Color::White, Square(6)),
    (PieceName::Knight, Color::Black, Square(57)),
    (PieceName::Knight, Color::Black, Square(62)),
    (PieceName::Bishop, Color::White, Square(2)),
    (PieceName::Bishop, Color::White, Square(5)),
    (PieceName::Bishop, Color::Black, Square(58)),
    (PieceName::Bishop, Color::Black, Square(61)),
    (PieceName::Queen, Color::White, Square(3)),
    (PieceName::Queen, Color::Black, Square(59)),
    (PieceName::King, Color::White, Square(4)),
    (PieceName::King, Color::Black, Square(60)),
];

impl Ledger {
    /// Populates an empty ledger with the standard opening position. The 32
    /// creation requests are awaited one at a time: per column a white pawn
    /// on rank 2 and a black pawn on rank 7, then the back ranks in
    /// rook/knight/bishop/queen/king order. Created pieces are staged and
    /// committed only once every request has succeeded, so a creation
    /// failure leaves the ledger unchanged.
    pub async fn setup_start_position(&mut self, creator: &dyn PieceCreator) -> Result<(), LedgerError> {
        if !self.is_empty() {
            return Err(LedgerError::AlreadyPopulated { game_id: self.game_id, count: self.len() });
        }

        let mut staged: Vec<(Square, ChessPiece)> = Vec::with_capacity(32);
        for column in 1..=8 {
            let file = file_letter(column)?;
            let square = format!("{file}2").parse()?;
            stage(creator, &mut staged, PieceName::Pawn, Color::White, square, self.game_id).await?;
            let square = format!("{file}7").parse()?;
            stage(creator, &mut staged, PieceName::Pawn, Color::Black, square, self.game_id).await?;
        }
        for (name, color, square) in BACK_RANK {
            stage(creator, &mut staged, name, color, square, self.game_id).await?;
        }

        for (square, piece) in staged {
            self.place_piece(square, piece)?;
        }
        debug!("game {}: start position committed, {} pieces", self.game_id, self.len());
        Ok(())
    }
}

async fn stage(
    creator: &dyn PieceCreator,
    staged: &mut Vec<(Square, ChessPiece)>,
    name: PieceName,
    color: Color,
    square: Square,
    game_id: i64,
) -> Result<(), LedgerError> {
    let piece = creator.create_piece(name, color, square, game_id).await.map_err(|source| {
        LedgerError::Setup {
            square,
            populated: staged.iter().map(|(taken, _)| *taken).collect(),
            source,
        }
    })?;
    staged.push((square, piece));
    Ok(())
}

#[cfg(test)]
mod setup_tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use strum::IntoEnumIterator;

    use super::*;
    use crate::types::pieces::{Piece, PieceName::*};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    /// Hands out sequential ids the way the CRUD service would.
    #[derive(Default)]
    struct StubCreator {
        next_id: AtomicI64,
    }

    #[async_trait]
    impl PieceCreator for StubCreator {
        async fn create_piece(
            &self,
            name: PieceName,
            color: Color,
            _square: Square,
            _game_id: i64,
        ) -> Result<ChessPiece, BoxError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ChessPiece::new(id, name, color))
        }
    }

    /// Succeeds for the first `fail_after` requests, then fails.
    struct FailingCreator {
        created: AtomicI64,
        fail_after: i64,
    }

    #[async_trait]
    impl PieceCreator for FailingCreator {
        async fn create_piece(
            &self,
            name: PieceName,
            color: Color,
            _square: Square,
            _game_id: i64,
        ) -> Result<ChessPiece, BoxError> {
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_after {
                return Err(anyhow::anyhow!("piece service unavailable").into());
            }
            Ok(ChessPiece::new(n + 1, name, color))
        }
    }

    #[tokio::test]
    async fn test_start_position_layout() {
        let mut ledger = Ledger::new(1);
        ledger.setup_start_position(&StubCreator::default()).await.unwrap();

        assert_eq!(ledger.len(), 32);
        assert_eq!(ledger.pieces_of(Color::White).count(), 16);
        assert_eq!(ledger.pieces_of(Color::Black).count(), 16);
        assert_eq!(ledger.piece_at(sq("e1")), Some(Piece::new(King, Color::White)));
        assert_eq!(ledger.piece_at(sq("e8")), Some(Piece::new(King, Color::Black)));
        for file in 'a'..='h' {
            assert_eq!(ledger.piece_at(sq(&format!("{file}2"))), Some(Piece::new(Pawn, Color::White)));
            assert_eq!(ledger.piece_at(sq(&format!("{file}7"))), Some(Piece::new(Pawn, Color::Black)));
        }
        for (square, piece) in ledger.pieces_of(Color::Black) {
            assert_eq!(ledger.color_at(square), Some(piece.color));
        }
    }

    #[tokio::test]
    async fn test_piece_counts_per_type() {
        let mut ledger = Ledger::new(1);
        ledger.setup_start_position(&StubCreator::default()).await.unwrap();

        let counts: Vec<usize> = PieceName::iter()
            .map(|name| ledger.pieces_of(Color::White).filter(|(_, piece)| piece.name == name).count())
            .collect();
        assert_eq!(counts, vec![8, 2, 2, 2, 1, 1]);
    }

    #[tokio::test]
    async fn test_creation_order() {
        let mut ledger = Ledger::new(1);
        ledger.setup_start_position(&StubCreator::default()).await.unwrap();

        // ids are assigned in request order: pawns column by column (white
        // then black), then rooks, knights, bishops, queens, kings
        assert_eq!(ledger.get(sq("a2")).map(|piece| piece.id), Some(1));
        assert_eq!(ledger.get(sq("a7")).map(|piece| piece.id), Some(2));
        assert_eq!(ledger.get(sq("h2")).map(|piece| piece.id), Some(15));
        assert_eq!(ledger.get(sq("h7")).map(|piece| piece.id), Some(16));
        assert_eq!(ledger.get(sq("a1")).map(|piece| piece.id), Some(17));
        assert_eq!(ledger.get(sq("h8")).map(|piece| piece.id), Some(20));
        assert_eq!(ledger.get(sq("d1")).map(|piece| piece.id), Some(29));
        assert_eq!(ledger.get(sq("e1")).map(|piece| piece.id), Some(31));
        assert_eq!(ledger.get(sq("e8")).map(|piece| piece.id), Some(32));
    }

    #[tokio::test]
    async fn test_failed_creation_leaves_ledger_empty() {
        let mut ledger = Ledger::new(1);
        let creator = FailingCreator { created: AtomicI64::new(0), fail_after: 5 };

        let err = ledger.setup_start_position(&creator).await.unwrap_err();
        match err {
            LedgerError::Setup { square, populated, .. } => {
                assert_eq!(square, sq("c7"));
                assert_eq!(populated, vec![sq("a2"), sq("a7"), sq("b2"), sq("b7"), sq("c2")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_setup_requires_empty_ledger() {
        let mut ledger = Ledger::new(1);
        ledger.place_piece(sq("e4"), ChessPiece::new(99, Pawn, Color::White)).unwrap();

        let err = ledger.setup_start_position(&StubCreator::default()).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyPopulated { count: 1, .. }));
        assert_eq!(ledger.len(), 1);
    }
}
