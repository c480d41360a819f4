use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::{king_home, CastleSide};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::moves::chess_move::{ChessMove, Promotion};
use crate::utils::algebraic::algebraic_to_index;

/// Parse a move in long algebraic form (`e2e4`, `e7e8q`).
///
/// Whitespace is ignored. Exactly four or five significant characters are
/// accepted; the fifth names the promotion piece. Legality is not checked
/// here (see `Player::verify_move`).
pub fn parse_long_algebraic(text: &str) -> ChessResult<ChessMove> {
    let compact = text.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    let invalid = || ChessErrors::InvalidAlgebraicString(text.to_owned());
    if !compact.is_ascii() || !(4..=5).contains(&compact.len()) {
        return Err(invalid());
    }

    let start = algebraic_to_index(&compact[0..2]).map_err(|_| invalid())?;
    let end = algebraic_to_index(&compact[2..4]).map_err(|_| invalid())?;
    let mut mv = ChessMove::new(start, end);
    if let Some(ch) = compact[4..].chars().next() {
        mv = mv.with_promotion(Promotion::from_char(ch).ok_or_else(invalid)?);
    }
    Ok(mv)
}

/// Parse a move as typed at the `play` prompt.
///
/// Accepts an optional leading piece letter (`Ng1f3`, `e2e4`), an optional
/// `-`, `x`, `+` or `#` between the squares (`Ng1-f3`, `Qd1xd7`), a trailing
/// check or mate marker (`Ra1a8#`), and castling as `0-0` / `0-0-0` (or
/// `O-O` / `O-O-O`) for `side`. A declared piece is recorded on the move so
/// verification can reject a move whose source holds a different kind.
pub fn parse_piece_prefixed(text: &str, side: Color) -> ChessResult<ChessMove> {
    let invalid = || ChessErrors::InvalidAlgebraicString(text.to_owned());
    let compact = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    let trimmed = compact.trim_end_matches(['+', '#']);

    let castle = match trimmed {
        "0-0" | "O-O" => Some(CastleSide::Kingside),
        "0-0-0" | "O-O-O" => Some(CastleSide::Queenside),
        _ => None,
    };
    if let Some(side_of_board) = castle {
        return Ok(ChessMove::new(king_home(side), side_of_board.king_destination(side))
            .with_piece(PieceKind::King));
    }

    let mut chars = trimmed.chars();
    let declared = match chars.next() {
        Some(ch) if ch.is_ascii_uppercase() => {
            Some(PieceKind::from_symbol(ch).ok_or_else(invalid)?)
        }
        Some(_) => None,
        None => return Err(invalid()),
    };
    let body = match declared {
        Some(_) => chars.as_str(),
        None => trimmed,
    };

    let squares = match body.get(2..3) {
        Some("-" | "x" | "+" | "#") => format!("{}{}", &body[..2], &body[3..]),
        _ => body.to_owned(),
    };
    let mv = parse_long_algebraic(&squares).map_err(|_| invalid())?;
    Ok(match declared {
        Some(kind) => mv.with_piece(kind),
        None => mv,
    })
}
