//! Reversible move application.
//!
//! `do_move` mutates the board and both players in place and returns an
//! `UndoState`; `undo_move` consumes that record and restores the board,
//! both index lists and both king caches exactly. All preconditions are
//! checked before the first mutation, so a failing `do_move` leaves the
//! position untouched.
//!
//! `with_move` is the scoped form used by search: it always undoes before
//! handing back the closure's result, error or not.

use tracing::trace;

use crate::chess_errors::{ChessErrors, ChessResult, IllegalMoveReason};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::PieceKind;
use crate::game_state::undo_state::{CapturedPiece, UndoState};
use crate::moves::chess_move::ChessMove;
use crate::moves::piece::Piece;
use crate::player::legal_move_checks::ensure_opponent;
use crate::player::player::Player;

impl Player {
    /// Applies `mv` for this player.
    ///
    /// With `verify` set the move is first checked against the player's legal
    /// moves (see `verify_move`). A king move spanning more than one file
    /// also relocates the matching rook, recorded as a nested `UndoState`.
    pub fn do_move(
        &mut self,
        mv: &ChessMove,
        board: &mut Board,
        opponent: &mut Player,
        verify: bool,
    ) -> ChessResult<UndoState> {
        ensure_opponent(self.color(), opponent)?;
        if verify {
            self.verify_move(mv, board, opponent)?;
        }
        let (start, end) = (mv.start, mv.end);

        let moving = self.piece_at(board, start)?;
        let had_moved = moving.has_moved();
        let kind = moving.kind();
        let promote = mv.promote.filter(|_| kind == PieceKind::Pawn);
        let castle = if kind == PieceKind::King {
            CastleSide::from_king_move(start, end)
        } else {
            None
        };

        if board.color_at(end) == Some(self.color()) {
            return Err(ChessErrors::illegal(mv, IllegalMoveReason::OwnPieceAtDestination));
        }
        let captured_slot = match board.get(end) {
            Some(_) => Some(opponent.slot_of(end)?),
            None => None,
        };
        let own_slot = self.slot_of(start)?;
        if let Some(side) = castle {
            self.piece_at(board, side.rook_start(self.color()))?;
            if !board.is_empty(side.rook_destination(self.color())) {
                return Err(ChessErrors::illegal(mv, IllegalMoveReason::NotInLegalSet));
            }
        }

        // Nothing below can fail until the nested rook move, whose
        // preconditions were checked above.
        let captured = match (captured_slot, board.clear(end)) {
            (Some(slot), Some(piece)) => {
                opponent.remove_slot(slot);
                Some(CapturedPiece { piece, slot })
            }
            _ => None,
        };

        let mut piece = board
            .clear(start)
            .ok_or_else(|| ChessErrors::accounting(start, "moving piece vanished"))?;
        if let Some(promotion) = promote {
            piece = Piece::new(promotion.kind(), start, self.color()).with_has_moved(had_moved);
        }
        piece.move_to(end);
        self.set_slot(own_slot, end);
        if kind == PieceKind::King {
            self.set_king(end);
        }
        board.place(piece);
        trace!(%mv, color = %self.color(), "applied move");

        let castling_rook = match castle {
            Some(side) => {
                let rook_move = side.rook_move(self.color());
                Some(Box::new(self.do_move(&rook_move, board, opponent, false)?))
            }
            None => None,
        };

        Ok(UndoState {
            had_moved,
            captured,
            promoted: promote.is_some(),
            castling_rook,
        })
    }

    /// Exact inverse of the `do_move` that produced `record`.
    pub fn undo_move(
        &mut self,
        mv: &ChessMove,
        board: &mut Board,
        opponent: &mut Player,
        record: UndoState,
    ) -> ChessResult<()> {
        let (start, end) = (mv.start, mv.end);

        if let Some(rook_record) = record.castling_rook {
            let side = CastleSide::from_king_move(start, end).ok_or_else(|| {
                ChessErrors::accounting(end, "castling record on a non-castling move")
            })?;
            self.undo_move(&side.rook_move(self.color()), board, opponent, *rook_record)?;
        }

        let kind = self.piece_at(board, end)?.kind();
        let own_slot = self.slot_of(end)?;

        let mut piece = board
            .clear(end)
            .ok_or_else(|| ChessErrors::accounting(end, "moved piece vanished"))?;
        if record.promoted {
            piece = Piece::new(PieceKind::Pawn, end, self.color());
        }
        piece.restore(start, record.had_moved);
        self.set_slot(own_slot, start);
        if kind == PieceKind::King {
            self.set_king(start);
        }
        board.place(piece);

        if let Some(CapturedPiece { piece, slot }) = record.captured {
            opponent.insert_slot(slot, piece.index());
            board.place(piece);
        }
        Ok(())
    }

    /// Runs `f` with `mv` applied (unverified) and undoes it before returning
    /// `f`'s result.
    pub fn with_move<T>(
        &mut self,
        mv: &ChessMove,
        board: &mut Board,
        opponent: &mut Player,
        f: impl FnOnce(&mut Player, &mut Board, &mut Player) -> ChessResult<T>,
    ) -> ChessResult<T> {
        let record = self.do_move(mv, board, opponent, false)?;
        let outcome = f(self, board, opponent);
        self.undo_move(mv, board, opponent, record)?;
        outcome
    }

    /// Checks an externally supplied move: the source holds one of this
    /// player's pieces of the declared kind, the destination is not
    /// friendly, promotion is named exactly when a pawn reaches the last
    /// rank, and the squares form one of the player's legal moves.
    pub fn verify_move(
        &mut self,
        mv: &ChessMove,
        board: &mut Board,
        opponent: &mut Player,
    ) -> ChessResult<()> {
        let piece = board
            .get(mv.start)
            .ok_or_else(|| ChessErrors::illegal(mv, IllegalMoveReason::NoPieceAtSource))?;
        if piece.color() != self.color() {
            return Err(ChessErrors::illegal(mv, IllegalMoveReason::OpponentPiece));
        }
        let kind = piece.kind();
        if let Some(declared) = mv.piece {
            if declared != kind {
                return Err(ChessErrors::illegal(
                    mv,
                    IllegalMoveReason::WrongPieceKind {
                        declared,
                        found: kind,
                    },
                ));
            }
        }
        if board.color_at(mv.end) == Some(self.color()) {
            return Err(ChessErrors::illegal(mv, IllegalMoveReason::OwnPieceAtDestination));
        }

        let reaches_last_rank =
            kind == PieceKind::Pawn && mv.end.rank() == self.color().promotion_rank();
        match (reaches_last_rank, mv.promote.is_some()) {
            (true, false) => {
                return Err(ChessErrors::illegal(mv, IllegalMoveReason::MissingPromotion))
            }
            (false, true) => {
                return Err(ChessErrors::illegal(mv, IllegalMoveReason::UnexpectedPromotion))
            }
            _ => {}
        }

        let legal = self.get_possible_moves_index(board, opponent)?;
        if legal.iter().any(|candidate| candidate.same_squares(mv)) {
            Ok(())
        } else {
            Err(ChessErrors::illegal(mv, IllegalMoveReason::NotInLegalSet))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_errors::{ChessErrors, IllegalMoveReason};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Index, PieceKind};
    use crate::moves::chess_move::{ChessMove, Promotion};
    use crate::moves::piece::Piece;
    use crate::player::player::Player;
    use crate::utils::algebraic::algebraic_to_index;

    fn sq(text: &str) -> Index {
        algebraic_to_index(text).expect("test square should parse")
    }

    fn mv(start: &str, end: &str) -> ChessMove {
        ChessMove::new(sq(start), sq(end))
    }

    fn setup(pieces: &[(PieceKind, &str, Color)]) -> (Board, Player, Player) {
        let pieces = pieces
            .iter()
            .map(|(kind, square, color)| Piece::new(*kind, sq(square), *color))
            .collect::<Vec<_>>();
        let board = Board::from_pieces(&pieces).expect("board should build");
        let own = |color| pieces.iter().filter(|p| p.color() == color).cloned().collect::<Vec<_>>();
        (
            board,
            Player::new(Color::White, &own(Color::White)).expect("white should build"),
            Player::new(Color::Black, &own(Color::Black)).expect("black should build"),
        )
    }

    #[test]
    fn capture_then_undo_restores_both_players() {
        let (mut board, mut white, mut black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Rook, "a1", Color::White),
            (PieceKind::Pawn, "a7", Color::Black),
            (PieceKind::Knight, "b8", Color::Black),
            (PieceKind::King, "e8", Color::Black),
        ]);
        let (board_before, white_before, black_before) =
            (board.snapshot(), white.clone(), black.clone());

        let capture = mv("a1", "a7");
        let record = white
            .do_move(&capture, &mut board, &mut black, true)
            .expect("capture should apply");
        assert_eq!(black.indices(), &[sq("b8"), sq("e8")]);
        assert_eq!(board.get(sq("a7")).map(Piece::kind), Some(PieceKind::Rook));
        assert!(board.is_empty(sq("a1")));

        white
            .undo_move(&capture, &mut board, &mut black, record)
            .expect("undo should succeed");
        assert_eq!(board.snapshot(), board_before);
        assert_eq!(white, white_before);
        assert_eq!(black, black_before);
    }

    #[test]
    fn castling_moves_rook_and_undo_puts_both_back() {
        let (mut board, mut white, mut black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Rook, "a1", Color::White),
            (PieceKind::Rook, "h1", Color::White),
            (PieceKind::King, "e8", Color::Black),
        ]);
        let before = board.snapshot();

        let castle = mv("e1", "c1");
        let record = white
            .do_move(&castle, &mut board, &mut black, true)
            .expect("castle should apply");
        assert!(record.castling_rook.is_some());
        assert_eq!(white.king_index(), sq("c1"));
        assert_eq!(board.get(sq("d1")).map(Piece::kind), Some(PieceKind::Rook));
        assert!(board.is_empty(sq("a1")));

        white
            .undo_move(&castle, &mut board, &mut black, record)
            .expect("undo should succeed");
        assert_eq!(board.snapshot(), before);
        assert_eq!(white.king_index(), sq("e1"));
    }

    #[test]
    fn promotion_is_reverted_to_an_unmoved_flag_pawn() {
        let (mut board, mut white, mut black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Pawn, "b7", Color::White),
            (PieceKind::King, "h8", Color::Black),
        ]);
        let before = board.snapshot();

        let promote = mv("b7", "b8").with_promotion(Promotion::Knight);
        let record = white
            .do_move(&promote, &mut board, &mut black, true)
            .expect("promotion should apply");
        assert_eq!(board.get(sq("b8")).map(Piece::kind), Some(PieceKind::Knight));
        assert_eq!(white.material(&board).expect("material"), 3);

        white
            .undo_move(&promote, &mut board, &mut black, record)
            .expect("undo should succeed");
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn verification_rejects_bad_moves_without_mutating() {
        let (mut board, mut white, mut black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Pawn, "e2", Color::White),
            (PieceKind::Pawn, "b7", Color::White),
            (PieceKind::King, "e8", Color::Black),
        ]);
        let before = board.snapshot();

        let cases = [
            (mv("d2", "d4"), IllegalMoveReason::NoPieceAtSource),
            (mv("e8", "e7"), IllegalMoveReason::OpponentPiece),
            (mv("e1", "e2"), IllegalMoveReason::OwnPieceAtDestination),
            (mv("e2", "e5"), IllegalMoveReason::NotInLegalSet),
            (mv("b7", "b8"), IllegalMoveReason::MissingPromotion),
            (
                mv("e2", "e3").with_promotion(Promotion::Queen),
                IllegalMoveReason::UnexpectedPromotion,
            ),
            (
                mv("e2", "e4").with_piece(PieceKind::Knight),
                IllegalMoveReason::WrongPieceKind {
                    declared: PieceKind::Knight,
                    found: PieceKind::Pawn,
                },
            ),
        ];
        for (bad, reason) in cases {
            let err = white
                .do_move(&bad, &mut board, &mut black, true)
                .expect_err("move should be rejected");
            assert_eq!(err, ChessErrors::illegal(bad, reason));
            assert_eq!(board.snapshot(), before);
        }
    }

    #[test]
    fn with_move_undoes_even_when_closure_fails() {
        let (mut board, mut white, mut black) = setup(&[
            (PieceKind::King, "e1", Color::White),
            (PieceKind::Pawn, "e2", Color::White),
            (PieceKind::King, "e8", Color::Black),
        ]);
        let before = board.snapshot();

        let result: Result<(), ChessErrors> =
            white.with_move(&mv("e2", "e4"), &mut board, &mut black, |_, board, _| {
                assert!(board.is_empty(sq("e2")));
                Err(ChessErrors::InvalidColorPairing(Color::White))
            });
        assert!(result.is_err());
        assert_eq!(board.snapshot(), before);
        assert_eq!(white.indices(), &[sq("e1"), sq("e2")]);
    }
}
