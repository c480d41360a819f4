//! Fixed rule data: the standard starting piece list and castling geometry.

use crate::game_state::chess_types::{Color, File, Index, PieceKind};
use crate::moves::chess_move::ChessMove;
use crate::moves::piece::Piece;

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The standard starting position as an ordered piece list, white first.
pub fn standard_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    for color in [Color::White, Color::Black] {
        for (file, kind) in File::ALL.into_iter().zip(BACK_ROW) {
            pieces.push(Piece::new(kind, Index::from_parts(file, color.home_rank()), color));
        }
        for file in File::ALL {
            pieces.push(Piece::new(
                PieceKind::Pawn,
                Index::from_parts(file, color.pawn_rank()),
                color,
            ));
        }
    }
    pieces
}

/// The square a king must stand on to castle.
#[inline]
pub const fn king_home(color: Color) -> Index {
    Index::from_parts(File::E, color.home_rank())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Recognises the king half of a castling move: any king move spanning
    /// more than one file.
    pub fn from_king_move(start: Index, end: Index) -> Option<Self> {
        if start.file_distance(end) <= 1 {
            None
        } else if end.file() > start.file() {
            Some(CastleSide::Kingside)
        } else {
            Some(CastleSide::Queenside)
        }
    }

    pub const fn king_destination(self, color: Color) -> Index {
        let file = match self {
            CastleSide::Kingside => File::G,
            CastleSide::Queenside => File::C,
        };
        Index::from_parts(file, color.home_rank())
    }

    pub const fn rook_start(self, color: Color) -> Index {
        let file = match self {
            CastleSide::Kingside => File::H,
            CastleSide::Queenside => File::A,
        };
        Index::from_parts(file, color.home_rank())
    }

    pub const fn rook_destination(self, color: Color) -> Index {
        let file = match self {
            CastleSide::Kingside => File::F,
            CastleSide::Queenside => File::D,
        };
        Index::from_parts(file, color.home_rank())
    }

    /// Squares strictly between king and rook.
    pub fn between(self, color: Color) -> Vec<Index> {
        let files: &[File] = match self {
            CastleSide::Kingside => &[File::F, File::G],
            CastleSide::Queenside => &[File::B, File::C, File::D],
        };
        files
            .iter()
            .map(|file| Index::from_parts(*file, color.home_rank()))
            .collect()
    }

    /// Squares the king crosses or lands on.
    pub fn king_path(self, color: Color) -> [Index; 2] {
        let rank = color.home_rank();
        match self {
            CastleSide::Kingside => [Index::from_parts(File::F, rank), Index::from_parts(File::G, rank)],
            CastleSide::Queenside => [Index::from_parts(File::D, rank), Index::from_parts(File::C, rank)],
        }
    }

    /// The rook relocation paired with this castle.
    pub const fn rook_move(self, color: Color) -> ChessMove {
        ChessMove::new(self.rook_start(color), self.rook_destination(color))
    }
}
