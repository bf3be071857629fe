//! Chess rules engine with a flat 64-square board representation.
//!
//! # Coordinates
//!
//! ```text
//! Rows and columns are 1-indexed. Row 1 is White's back rank, column 1 is the a-file.
//!
//!   8 | r n b q k b n r
//!   7 | p p p p p p p p
//!   6 | . . . . . . . .
//!   5 | . . . . . . . .
//!   4 | . . . . . . . .
//!   3 | . . . . . . . .
//!   2 | P P P P P P P P
//!   1 | R N B Q K B N R
//!       a b c d e f g h
//!       1 2 3 4 5 6 7 8
//! ```
//!
//! # Board Storage
//!
//! ```text
//! squares[row - 1][column - 1] : Option<Piece>
//!
//! 64 slots in one fixed-size array, so a copy of the board is a flat memcpy
//! with no aliasing between the original and the copy.
//! ```
//!
//! # Move Legality
//!
//! ```text
//! pseudo-legal = piece movement pattern + board occupancy
//! legal        = pseudo-legal, and the mover's king is not attacked after
//!                the move is played on a scratch copy of the board
//! ```
//!
//! Castling, en passant and draw-by-repetition/fifty-move are not modelled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
pub mod wasm;

/// Side color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Get the opposing color.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step (+1 for White, -1 for Black).
    #[inline]
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row from which pawns may advance two squares.
    #[inline]
    pub fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Farthest row for this color's pawns, where they promote.
    #[inline]
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// All six kinds.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Kinds a pawn may promote to, in the order promotion moves are emitted.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN letter into its color and kind.
    pub fn from_char(c: char) -> Option<(Color, PieceKind)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.to_char(color) == c)
            .map(|kind| (color, kind))
    }
}

/// A piece on the board.
///
/// Promotion replaces the piece with a new one; a `Piece` is never modified.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    #[inline]
    pub fn color(self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(self) -> PieceKind {
        self.kind
    }

    /// FEN letter for this piece.
    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Why `Game::make_move` rejected a move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum MoveError {
    /// The start square is empty or holds a piece of the side not to move.
    #[error("wrong turn: no {side_to_move} piece at {start}")]
    WrongTurn { start: Position, side_to_move: Color },
    /// The move is not among the legal moves of the piece on its start square.
    #[error("illegal destination: {mv} is not a legal move")]
    IllegalDestination { mv: Move },
}

/// Notation parsing failure.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

// ============================================================================
// COORDINATES
// ============================================================================

/// A square on the 8x8 board, 1-indexed.
///
/// Every `Position` in circulation is on the board: `new` asserts the range in
/// debug builds, `checked`/`offset` return `None` off the board, and
/// deserialization rejects out-of-range values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    column: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    column: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = ParseError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::checked(raw.row as i32, raw.column as i32).ok_or_else(|| {
            ParseError::InvalidSquare(format!("row {} column {}", raw.row, raw.column))
        })
    }
}

impl Position {
    /// Create a position from a row and column (1-8 each).
    #[inline]
    pub const fn new(row: u8, column: u8) -> Position {
        debug_assert!(row >= 1 && row <= 8 && column >= 1 && column <= 8);
        Position { row, column }
    }

    /// Create a position, or `None` if either coordinate is outside 1-8.
    #[inline]
    pub fn checked(row: i32, column: i32) -> Option<Position> {
        if Self::is_valid(row, column) {
            Some(Position {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// The single bounds test used wherever a square is synthesized.
    #[inline]
    pub fn is_valid(row: i32, column: i32) -> bool {
        (1..=8).contains(&row) && (1..=8).contains(&column)
    }

    /// The square `d_row` rows and `d_col` columns away, if on the board.
    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Position> {
        Self::checked(self.row as i32 + d_row, self.column as i32 + d_col)
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn column(self) -> u8 {
        self.column
    }

    /// Iterate over all 64 squares, row-major from a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |column| Position { row, column }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.column - 1) as char, self.row)
    }
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parse algebraic notation such as `e4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }
        let column = bytes[0] as i32 - b'a' as i32 + 1;
        let row = bytes[1] as i32 - b'0' as i32;
        Position::checked(row, column).ok_or_else(|| ParseError::InvalidSquare(s.to_string()))
    }
}

/// A move from one square to another, with the promotion kind for pawns
/// reaching the farthest row.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    start: Position,
    end: Position,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Create a plain move.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Move {
        Move {
            start,
            end,
            promotion: None,
        }
    }

    /// Create a promoting pawn move.
    #[inline]
    pub const fn promote(start: Position, end: Position, kind: PieceKind) -> Move {
        Move {
            start,
            end,
            promotion: Some(kind),
        }
    }

    #[inline]
    pub fn start(&self) -> Position {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Position {
        self.end
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char(Color::Black))?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    /// Parse long algebraic notation: `e2e4`, `e7e8q`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMove(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let start: Position = s[0..2].parse().map_err(|_| invalid())?;
        let end: Position = s[2..4].parse().map_err(|_| invalid())?;
        match s[4..].chars().next() {
            None => Ok(Move::new(start, end)),
            Some(c) => match PieceKind::from_char(c) {
                Some((_, kind)) if PieceKind::PROMOTIONS.contains(&kind) => {
                    Ok(Move::promote(start, end, kind))
                }
                _ => Err(invalid()),
            },
        }
    }
}

/// Fixed-size array for pseudo-legal moves of one piece (no heap allocation).
/// A queen has at most 27 moves, a pawn at most 12 (three targets × four promotions).
pub const MAX_MOVES: usize = 32;

/// A fixed-size move list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: u8,
}

impl MoveList {
    const FILLER: Move = Move::new(Position::new(1, 1), Position::new(1, 1));

    /// Create an empty move list.
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Self::FILLER; MAX_MOVES],
            len: 0,
        }
    }

    /// Add a move to the list.
    #[inline]
    pub fn push(&mut self, mov: Move) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = mov;
        self.len += 1;
    }

    /// Get the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over moves.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves[..self.len as usize].iter().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Piece placement on all 64 squares.
///
/// Serializes as 8 rows of 8 optional pieces, row 1 first, column 1 first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Create a new empty board.
    #[inline]
    pub fn new() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Create a board with the standard starting setup.
    pub fn standard() -> Board {
        let mut board = Board::new();
        board.reset();
        board
    }

    /// Clear every square, then place the standard starting setup.
    pub fn reset(&mut self) {
        *self = Board::new();
        for (idx, &kind) in BACK_RANK.iter().enumerate() {
            let column = idx as u8 + 1;
            self.set(Position::new(1, column), Some(Piece::new(Color::White, kind)));
            self.set(Position::new(2, column), Some(Piece::new(Color::White, PieceKind::Pawn)));
            self.set(Position::new(7, column), Some(Piece::new(Color::Black, PieceKind::Pawn)));
            self.set(Position::new(8, column), Some(Piece::new(Color::Black, kind)));
        }
    }

    /// Get the piece on a square, if any.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize - 1][pos.column as usize - 1]
    }

    /// Replace the occupant of a square.
    /// Does NOT validate - legality is the caller's concern.
    #[inline]
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.squares[pos.row as usize - 1][pos.column as usize - 1] = piece;
    }

    /// Check if a square is empty.
    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Iterate over occupied squares, row-major from a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Locate the king of the given color.
    /// Returns the first one found if several exist, None if there is none.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|&(_, piece)| piece == Piece::new(color, PieceKind::King))
            .map(|(pos, _)| pos)
    }

    /// Play a move on the board: the mover (or its promoted replacement) lands
    /// on the end square and the start square is cleared.
    /// Does NOT validate - caller must ensure move is legal.
    /// An empty start square leaves the board unchanged.
    pub fn apply(&mut self, mov: Move) {
        let Some(piece) = self.get(mov.start) else {
            return;
        };
        let placed = match mov.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.set(mov.end, Some(placed));
        self.set(mov.start, None);
    }

    // ========== FEN Placement ==========

    /// Parse the piece-placement field of a FEN string.
    pub fn from_fen(placement: &str) -> Result<Board, ParseError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ParseError::InvalidFen(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        let mut board = Board::new();
        for (idx, rank) in ranks.iter().enumerate() {
            let row = 8 - idx as u8;
            let mut column = 1u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ParseError::InvalidFen(format!("bad skip '{c}' in rank {row}")));
                    }
                    column += skip as u8;
                } else {
                    let (color, kind) = PieceKind::from_char(c).ok_or_else(|| {
                        ParseError::InvalidFen(format!("unknown piece '{c}' in rank {row}"))
                    })?;
                    if column > 8 {
                        return Err(ParseError::InvalidFen(format!("rank {row} overflows")));
                    }
                    board.set(Position::new(row, column), Some(Piece::new(color, kind)));
                    column += 1;
                }
                if column > 9 {
                    return Err(ParseError::InvalidFen(format!("rank {row} overflows")));
                }
            }
            if column != 9 {
                return Err(ParseError::InvalidFen(format!(
                    "rank {row} covers {} squares",
                    column - 1
                )));
            }
        }
        Ok(board)
    }

    /// Emit the piece-placement field of a FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in (1..=8u8).rev() {
            let mut empty = 0;
            for column in 1..=8u8 {
                match self.get(Position::new(row, column)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row > 1 {
                out.push('/');
            }
        }
        out
    }

    // ========== Move Generation ==========

    /// Pseudo-legal moves of the piece on `from`, ignoring whether the mover's
    /// own king is left attacked. Empty if the square is empty.
    pub fn piece_moves(&self, from: Position) -> MoveList {
        let mut moves = MoveList::new();
        let Some(piece) = self.get(from) else {
            return moves;
        };
        let color = piece.color;

        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(from, color, &mut moves),
            PieceKind::Knight => self.step_moves(from, color, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::King => self.step_moves(from, color, &KING_OFFSETS, &mut moves),
            PieceKind::Rook => self.slide_moves(from, color, &ROOK_DIRS, &mut moves),
            PieceKind::Bishop => self.slide_moves(from, color, &BISHOP_DIRS, &mut moves),
            PieceKind::Queen => {
                self.slide_moves(from, color, &ROOK_DIRS, &mut moves);
                self.slide_moves(from, color, &BISHOP_DIRS, &mut moves);
            }
        }
        moves
    }

    /// Single and double advance, diagonal captures, promotion fan-out.
    fn pawn_moves(&self, from: Position, color: Color, moves: &mut MoveList) {
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.is_empty(one) {
                push_pawn_move(from, one, color, moves);

                // The double step needs both squares clear.
                if from.row == color.pawn_home_row() {
                    if let Some(two) = from.offset(2 * dir, 0) {
                        if self.is_empty(two) {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            if let Some(target) = from.offset(dir, d_col) {
                if self.get(target).is_some_and(|p| p.color != color) {
                    push_pawn_move(from, target, color, moves);
                }
            }
        }
    }

    /// Knight and king: fixed offsets, land on empty or enemy squares.
    fn step_moves(&self, from: Position, color: Color, offsets: &[(i32, i32)], moves: &mut MoveList) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = from.offset(d_row, d_col) {
                match self.get(to) {
                    Some(p) if p.color == color => {}
                    _ => moves.push(Move::new(from, to)),
                }
            }
        }
    }

    /// Rook, bishop, queen: walk each ray until blocked.
    /// An enemy blocker is included as a capture, an own blocker is not.
    fn slide_moves(&self, from: Position, color: Color, dirs: &[(i32, i32)], moves: &mut MoveList) {
        for &(d_row, d_col) in dirs {
            let mut cur = from;
            while let Some(to) = cur.offset(d_row, d_col) {
                match self.get(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(p) => {
                        if p.color != color {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    }
                }
                cur = to;
            }
        }
    }

    // ========== Attack Detection ==========

    /// Check if any piece of `attacker` has a pseudo-legal move ending on `target`.
    pub fn is_attacked_by(&self, target: Position, attacker: Color) -> bool {
        self.pieces()
            .filter(|&(_, piece)| piece.color == attacker)
            .any(|(from, _)| self.piece_moves(from).iter().any(|mov| mov.end == target))
    }

    /// Check if the king of `color` is attacked on this board.
    /// A missing king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_position(color) {
            Some(king) => self.is_attacked_by(king, color.opponent()),
            None => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Push a pawn move, fanning out into one move per promotion kind on the
/// farthest row.
fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut MoveList) {
    if to.row == color.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promote(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

// ============================================================================
// GAME
// ============================================================================

/// Summary of the position from the side-to-move's point of view.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

/// A board plus the side to move.
///
/// The side to move only changes on a successful `make_move`. Not internally
/// synchronized: hosts serving several callers must serialize access.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    side_to_move: Color,
}

impl Game {
    /// Create a game in the standard starting position, White to move.
    pub fn new() -> Game {
        Game {
            board: Board::standard(),
            side_to_move: Color::White,
        }
    }

    /// Create a game from an arbitrary board.
    pub fn from_board(board: Board, side_to_move: Color) -> Game {
        Game { board, side_to_move }
    }

    /// Create a game from a FEN string.
    ///
    /// Only the placement and active-color fields are read; the active color
    /// defaults to White when absent. Castling, en passant and clock fields
    /// are ignored.
    pub fn from_fen(fen: &str) -> Result<Game, ParseError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| ParseError::InvalidFen("empty string".to_string()))?;
        let board = Board::from_fen(placement)?;
        let side_to_move = match fields.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(ParseError::InvalidFen(format!("bad active color '{other}'")));
            }
        };
        Ok(Game { board, side_to_move })
    }

    /// Placement and active-color fields of FEN.
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {}", self.board.to_fen(), side)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Override whose turn it is (restoring a saved game, setting up a puzzle).
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Current board snapshot.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Legal moves of the piece on `position`, whichever side owns it.
    ///
    /// Each pseudo-legal candidate is played on a copy of the board and kept
    /// only if the mover's king is not attacked there. Empty if the square is
    /// empty.
    pub fn valid_moves(&self, position: Position) -> Vec<Move> {
        let Some(piece) = self.board.get(position) else {
            return Vec::new();
        };

        self.board
            .piece_moves(position)
            .iter()
            .filter(|&mov| {
                let mut scratch = self.board;
                scratch.apply(mov);
                !scratch.is_in_check(piece.color())
            })
            .collect()
    }

    /// All legal moves for `color`, square by square from a1.
    pub fn all_valid_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces()
            .filter(|&(_, piece)| piece.color() == color)
            .flat_map(|(pos, _)| self.valid_moves(pos))
            .collect()
    }

    /// Check if any piece of `color` has a legal move.
    fn has_valid_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|&(_, piece)| piece.color() == color)
            .any(|(pos, _)| !self.valid_moves(pos).is_empty())
    }

    /// Validate and play a move, then pass the turn.
    ///
    /// The move is accepted when its end square is among the legal
    /// destinations of the piece on its start square. A set promotion kind
    /// places a new piece of that kind; otherwise the piece moves unchanged.
    /// The board is untouched when an error is returned.
    pub fn make_move(&mut self, mov: Move) -> Result<(), MoveError> {
        match self.board.get(mov.start()) {
            Some(piece) if piece.color() == self.side_to_move => {}
            _ => {
                return Err(MoveError::WrongTurn {
                    start: mov.start(),
                    side_to_move: self.side_to_move,
                });
            }
        }

        let reachable = self
            .valid_moves(mov.start())
            .iter()
            .any(|legal| legal.end() == mov.end());
        if !reachable {
            return Err(MoveError::IllegalDestination { mv: mov });
        }

        self.board.apply(mov);
        self.side_to_move = self.side_to_move.opponent();
        Ok(())
    }

    /// Check if `color`'s king is attacked on the live board.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// Check if `color`'s king is attacked on a hypothetical board.
    /// Same as `board.is_in_check(color)`; the game's own board is not read.
    pub fn is_in_check_on(&self, color: Color, board: &Board) -> bool {
        board.is_in_check(color)
    }

    /// In check, with no legal move for any piece of `color`.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_valid_move(color)
    }

    /// Not in check, with no legal move for any piece of `color`.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_valid_move(color)
    }

    /// Status for the side to move. The game is never ended by the engine;
    /// this only reports whether a legal continuation exists.
    pub fn status(&self) -> GameStatus {
        let color = self.side_to_move;
        match (self.is_in_check(color), self.has_valid_move(color)) {
            (true, false) => GameStatus::Checkmate {
                winner: color.opponent(),
            },
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Ongoing,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
