//! The position and its builder

use crate::bitboard::Bitboard;
use crate::fen::{self, ParseError};
use crate::movegen;
use crate::moves::{self, Move};
use crate::types::{CastlingRights, CastlingSide, Color, File, Piece, Rank, Square};

use std::fmt;
use std::str::FromStr;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// starting bitboards, indexed like Position::pieces
const START_BOARDS: [[Bitboard; Piece::COUNT]; 2] = [
    [
        Bitboard::from_raw(0x0000_0000_0000_ff00), // pawns
        Bitboard::from_raw(0x0000_0000_0000_0081), // rooks on A1, H1
        Bitboard::from_raw(0x0000_0000_0000_0042), // knights on B1, G1
        Bitboard::from_raw(0x0000_0000_0000_0024), // bishops on C1, F1
        Bitboard::from_raw(0x0000_0000_0000_0010), // queen on D1
        Bitboard::from_raw(0x0000_0000_0000_0008), // king on E1
    ],
    [
        Bitboard::from_raw(0x00ff_0000_0000_0000),
        Bitboard::from_raw(0x8100_0000_0000_0000),
        Bitboard::from_raw(0x4200_0000_0000_0000),
        Bitboard::from_raw(0x2400_0000_0000_0000),
        Bitboard::from_raw(0x1000_0000_0000_0000),
        Bitboard::from_raw(0x0800_0000_0000_0000),
    ],
];

/// A chess position
///
/// Holds the twelve per-(color, piece kind) bitboards together with the
/// derived per-color union boards and the overall occupancy, plus the scalar
/// game state (side to move, castling rights, en passant target and the move
/// clocks).
///
/// A position is created through [`PositionBuilder`] (usually from FEN, see
/// [`Position::from_fen`]) or [`Position::initial`], and then mutated in
/// place only by [`Position::make`] and [`Position::unmake`], which must be
/// paired in last-in-first-out order.
///
/// A position is not thread-safe; clone it (a flat, allocation-free copy) to
/// hand it to another worker.
#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; Piece::COUNT]; 2],
    pub(crate) all_pieces: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) side: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) enpassant: Option<Square>,
    pub(crate) previous_enpassant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
}

impl Position {
    /// Returns the standard starting position
    pub fn initial() -> Position {
        let mut builder = PositionBuilder::new();
        for color in [Color::White, Color::Black] {
            for piece in Piece::iter() {
                builder.piece(color, piece, START_BOARDS[color.index()][piece.index()]);
            }
            builder.castling(color, CastlingSide::King, true);
            builder.castling(color, CastlingSide::Queen, true);
        }
        builder.fullmove_number(1);
        builder.build()
    }

    /// Parses a position from FEN
    pub fn from_fen(s: &str) -> Result<Position, ParseError> {
        fen::parse(s)
    }

    /// Returns the side to move
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    /// Returns the castling rights
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the current en passant target square, if any
    ///
    /// This is the empty square a just-double-advanced pawn skipped, available
    /// to the opponent as a capture target for one ply.
    #[inline]
    pub fn enpassant_square(&self) -> Option<Square> {
        self.enpassant
    }

    /// Returns the halfmove clock (halfmoves since the last capture or pawn
    /// move)
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Returns the fullmove number, starting at 1 and incremented after each
    /// move by Black
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Returns the bitboard of the pieces of kind `piece` and color `color`
    #[inline]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Returns the bitboard of all the pieces of color `color`
    #[inline]
    pub fn all_pieces(&self, color: Color) -> Bitboard {
        self.all_pieces[color.index()]
    }

    /// Returns the bitboard of all the occupied squares
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub(crate) fn piece_bb_mut(&mut self, color: Color, piece: Piece) -> &mut Bitboard {
        &mut self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub(crate) fn all_bb_mut(&mut self, color: Color) -> &mut Bitboard {
        &mut self.all_pieces[color.index()]
    }

    /// Returns the square of the king of color `color`
    ///
    /// # Panics
    ///
    /// Panics if there is no such king; a valid position always has exactly
    /// one king of each color.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        match self.pieces(color, Piece::King).first() {
            Some(sq) => sq,
            None => panic!("no {} king on the board", color.as_long_str()),
        }
    }

    /// Returns the kind of the piece of color `color` on square `sq`
    ///
    /// # Panics
    ///
    /// Panics if no piece of that color stands on the square.
    pub fn piece_at(&self, sq: Square, color: Color) -> Piece {
        for piece in Piece::iter() {
            if self.pieces(color, piece).has(sq) {
                return piece;
            }
        }
        panic!("no {} piece on square {}", color.as_long_str(), sq);
    }

    /// Makes the move `mv` on this position
    ///
    /// See [`moves::make_move`] for the contract.
    #[inline]
    pub fn make(&mut self, mv: &mut Move) {
        moves::make_move(self, mv);
    }

    /// Unmakes the move `mv`, which must be the most recently made one
    #[inline]
    pub fn unmake(&mut self, mv: &Move) {
        moves::unmake_move(self, mv);
    }

    /// Returns `true` if any piece of color `color` attacks `target`
    #[inline]
    pub fn attacks_square(&self, color: Color, target: Square) -> bool {
        movegen::is_square_attacked(self, target, color)
    }

    /// Returns `true` if a piece of kind `piece` and color `color` attacks
    /// `target`
    #[inline]
    pub fn piece_attacks_square(&self, color: Color, piece: Piece, target: Square) -> bool {
        movegen::piece_attacks_square(self, color, piece, target)
    }

    /// Returns the bitboard of all the pieces attacking `target`
    ///
    /// With `color` given, only attackers of that color are reported; with
    /// `None`, attackers of both colors are.
    #[inline]
    pub fn attackers_of(&self, target: Square, color: Option<Color>) -> Bitboard {
        movegen::attackers_of(self, target, color)
    }
}

impl PartialEq for Position {
    // `previous_enpassant` is scratch memory for unmake, not position state
    fn eq(&self, other: &Position) -> bool {
        self.pieces == other.pieces
            && self.all_pieces == other.all_pieces
            && self.occupied == other.occupied
            && self.side == other.side
            && self.castling == other.castling
            && self.enpassant == other.enpassant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Position {}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Position, ParseError> {
        fen::parse(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        writeln!(f, "+--------+")?;
        for rank_idx in (0..8).rev() {
            let rank = Rank::from_index(rank_idx);
            write!(f, "|")?;
            for file in File::iter() {
                let sq = Square::from_parts(file, rank);
                let mut ch = '.';
                'outer: for color in [Color::White, Color::Black] {
                    for piece in Piece::iter() {
                        if self.pieces(color, piece).has(sq) {
                            ch = piece.fen_char(color);
                            break 'outer;
                        }
                    }
                }
                write!(f, "{}", ch)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "+--------+")?;
        Ok(())
    }
}

/// Mutable staging object for assembling a [`Position`]
///
/// Each per-(color, piece kind) bitboard may be installed at most once. The
/// four castling rights are independent booleans, set per color and side.
/// [`PositionBuilder::build`] derives the union and occupancy boards from the
/// installed piece boards.
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    pieces: [[Option<Bitboard>; Piece::COUNT]; 2],
    side: Color,
    castling: CastlingRights,
    enpassant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl PositionBuilder {
    /// Creates an empty builder
    ///
    /// White to move, no castling rights, no en passant square, zero clocks.
    pub fn new() -> PositionBuilder {
        PositionBuilder {
            pieces: [[None; Piece::COUNT]; 2],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            enpassant: None,
            halfmove_clock: 0,
            fullmove_number: 0,
        }
    }

    /// Installs the bitboard for the pieces of kind `piece` and color `color`
    ///
    /// # Panics
    ///
    /// Panics if that board has already been installed.
    pub fn piece(&mut self, color: Color, piece: Piece, board: Bitboard) -> &mut Self {
        let slot = &mut self.pieces[color.index()][piece.index()];
        if slot.is_some() {
            panic!(
                "piece board installed twice for {} {:?}",
                color.as_long_str(),
                piece
            );
        }
        *slot = Some(board);
        self
    }

    /// Sets the side to move
    pub fn side(&mut self, color: Color) -> &mut Self {
        self.side = color;
        self
    }

    /// Sets a single castling right
    pub fn castling(&mut self, color: Color, side: CastlingSide, allowed: bool) -> &mut Self {
        if allowed {
            self.castling.set(color, side);
        } else {
            self.castling.unset(color, side);
        }
        self
    }

    /// Sets the en passant target square
    pub fn enpassant(&mut self, sq: Option<Square>) -> &mut Self {
        self.enpassant = sq;
        self
    }

    /// Sets the halfmove clock
    pub fn halfmove_clock(&mut self, clock: u16) -> &mut Self {
        self.halfmove_clock = clock;
        self
    }

    /// Sets the fullmove number
    pub fn fullmove_number(&mut self, number: u16) -> &mut Self {
        self.fullmove_number = number;
        self
    }

    /// Builds the position, computing the union and occupancy bitboards
    pub fn build(&self) -> Position {
        let mut pieces = [[Bitboard::EMPTY; Piece::COUNT]; 2];
        let mut all_pieces = [Bitboard::EMPTY; 2];
        for color in [Color::White, Color::Black] {
            for piece in Piece::iter() {
                let board = self.pieces[color.index()][piece.index()].unwrap_or(Bitboard::EMPTY);
                pieces[color.index()][piece.index()] = board;
                all_pieces[color.index()] |= board;
            }
        }
        Position {
            pieces,
            all_pieces,
            occupied: all_pieces[0] | all_pieces[1],
            side: self.side,
            castling: self.castling,
            enpassant: self.enpassant,
            previous_enpassant: None,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }
}

impl Default for PositionBuilder {
    fn default() -> PositionBuilder {
        PositionBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial() {
        let p = Position::initial();
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(p.castling_rights(), CastlingRights::FULL);
        assert_eq!(p.enpassant_square(), None);
        assert_eq!(p.halfmove_clock(), 0);
        assert_eq!(p.fullmove_number(), 1);
        assert_eq!(p.occupied().len(), 32);
        assert_eq!(p.king_square(Color::White), sq("E1"));
        assert_eq!(p.king_square(Color::Black), sq("E8"));
        assert_eq!(p.piece_at(sq("D1"), Color::White), Piece::Queen);
        assert_eq!(p.piece_at(sq("A8"), Color::Black), Piece::Rook);
        assert_eq!(p, Position::from_fen(START_FEN).unwrap());
    }

    #[test]
    fn test_initial_invariants() {
        let p = Position::initial();
        for color in [Color::White, Color::Black] {
            let union = Piece::iter().fold(Bitboard::EMPTY, |acc, k| acc | p.pieces(color, k));
            assert_eq!(union, p.all_pieces(color));
            assert_eq!(p.pieces(color, Piece::King).len(), 1);
        }
        assert_eq!(
            p.all_pieces(Color::White) | p.all_pieces(Color::Black),
            p.occupied()
        );
        assert!((p.all_pieces(Color::White) & p.all_pieces(Color::Black)).is_empty());
    }

    #[test]
    fn test_display() {
        let expected = "\
+--------+
|rnbqkbnr|
|pppppppp|
|........|
|........|
|........|
|........|
|PPPPPPPP|
|RNBQKBNR|
+--------+
";
        assert_eq!(Position::initial().to_string(), expected);
    }

    #[test]
    #[should_panic(expected = "installed twice")]
    fn test_builder_set_once() {
        let mut builder = PositionBuilder::new();
        builder.piece(Color::White, Piece::King, Bitboard::from_square(sq("E1")));
        builder.piece(Color::White, Piece::King, Bitboard::from_square(sq("D1")));
    }

    #[test]
    #[should_panic(expected = "no white piece")]
    fn test_piece_at_empty() {
        Position::initial().piece_at(sq("E4"), Color::White);
    }

    #[test]
    fn test_builder() {
        let mut builder = PositionBuilder::new();
        builder
            .piece(Color::White, Piece::King, Bitboard::from_square(sq("E1")))
            .piece(Color::Black, Piece::King, Bitboard::from_square(sq("E8")))
            .piece(Color::Black, Piece::Pawn, Bitboard::from_square(sq("A5")))
            .side(Color::Black)
            .castling(Color::White, CastlingSide::King, false)
            .halfmove_clock(3)
            .fullmove_number(20);
        let p = builder.build();
        assert_eq!(p.side_to_move(), Color::Black);
        assert_eq!(p.occupied().len(), 3);
        assert_eq!(p.all_pieces(Color::Black).len(), 2);
        assert_eq!(p.piece_at(sq("A5"), Color::Black), Piece::Pawn);
        assert!(!p.castling_rights().has_color(Color::White));
        assert_eq!(p.halfmove_clock(), 3);
        assert_eq!(p.fullmove_number(), 20);
    }
}
