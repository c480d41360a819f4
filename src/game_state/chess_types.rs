//! Value types shared by the board, pieces, players and search.
//!
//! Squares are addressed two ways: `Index` is the zero-based `(file, rank)`
//! pair used for the board array, `Position` is the same square in chess
//! notation (`File::A..=File::H`, rank `1..=8`). The two convert losslessly.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::chess_errors::{ChessErrors, ChessResult};

/// Side to move / piece owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Zero-based rank of this color's back row.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Zero-based rank pawns start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Zero-based rank where this color's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }

    /// Rank delta of a pawn push.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Piece kind (color is stored separately on the piece).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Static material value. The king has none.
    #[inline]
    pub const fn value(self) -> Option<i32> {
        match self {
            PieceKind::Pawn => Some(1),
            PieceKind::Knight => Some(3),
            PieceKind::Bishop => Some(3),
            PieceKind::Rook => Some(5),
            PieceKind::Queen => Some(9),
            PieceKind::King => None,
        }
    }

    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        write!(f, "{name}")
    }
}

/// Board file in chess notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        File::ALL.get(index as usize).copied()
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'a'..='h' => File::from_index(ch as u8 - b'a'),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

/// Zero-based `(file, rank)` board address. Both components are in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index {
    file: u8,
    rank: u8,
}

impl Index {
    pub fn new(file: u8, rank: u8) -> ChessResult<Self> {
        if file < 8 && rank < 8 {
            Ok(Self { file, rank })
        } else {
            Err(ChessErrors::InvalidFileOrRank(file as i16, rank as i16))
        }
    }

    /// Builds an index from a file and a zero-based rank already known to be
    /// in range (board loops, rule tables).
    #[inline]
    pub(crate) const fn from_parts(file: File, rank: u8) -> Self {
        debug_assert!(rank < 8);
        Self {
            file: file as u8,
            rank,
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Square number `rank * 8 + file` (`a1 == 0`, `h8 == 63`).
    #[inline]
    pub const fn square(self) -> u8 {
        self.rank * 8 + self.file
    }

    #[inline]
    pub const fn from_square(square: u8) -> Self {
        Self {
            file: square % 8,
            rank: (square / 8) % 8,
        }
    }

    /// The square `(d_file, d_rank)` away, or `None` off the board.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Absolute file distance between two squares.
    #[inline]
    pub const fn file_distance(self, other: Index) -> u8 {
        self.file.abs_diff(other.file)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Position::from(*self))
    }
}

/// A square in chess notation: file `A..=H`, rank `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    file: File,
    rank: u8,
}

impl Position {
    pub fn new(file: File, rank: u8) -> ChessResult<Self> {
        if (1..=8).contains(&rank) {
            Ok(Self { file, rank })
        } else {
            Err(ChessErrors::InvalidFileOrRank(file.index() as i16, rank as i16 - 1))
        }
    }

    #[inline]
    pub const fn file(self) -> File {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }
}

impl From<Index> for Position {
    fn from(index: Index) -> Self {
        let file = File::ALL[index.file() as usize];
        Self {
            file,
            rank: index.rank() + 1,
        }
    }
}

impl From<Position> for Index {
    fn from(position: Position) -> Self {
        Index::from_parts(position.file, position.rank - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank)
    }
}

/// Set of squares packed into one `u64` (bit `square()` per index).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, index: Index) {
        self.0 |= 1u64 << index.square();
    }

    #[inline]
    pub const fn contains(self, index: Index) -> bool {
        (self.0 >> index.square()) & 1 != 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Index> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let square = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(Index::from_square(square))
        })
    }
}

impl FromIterator<Index> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Index>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<Index> for SquareSet {
    fn extend<I: IntoIterator<Item = Index>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

impl BitOr for SquareSet {
    type Output = SquareSet;

    fn bitor(self, rhs: SquareSet) -> SquareSet {
        SquareSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        self.0 |= rhs.0;
    }
}
