//! Forsyth-Edwards notation ingestion
//!
//! Parses the six FEN fields and feeds them into a
//! [`PositionBuilder`](crate::board::PositionBuilder). Every error names the
//! 1-based index of the offending field (0 when the field structure itself is
//! broken), so a caller can point at the bad part of the input.

use crate::bitboard::Bitboard;
use crate::board::{Position, PositionBuilder};
use crate::geometry;
use crate::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Color, ColorParseError, File, Piece,
    Rank, Square, SquareParseError,
};

use std::str::FromStr;

use thiserror::Error;

/// Error parsing a position from FEN
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not consist of six space-separated fields
    #[error("wrong number of fields")]
    FieldCount,
    /// The piece placement does not consist of eight ranks
    #[error("expected 8 ranks in the piece placement")]
    BadRankCount,
    /// A rank of the piece placement describes more than eight files
    #[error("rank {0} of the piece placement is too long")]
    RankTooLong(u8),
    /// A rank of the piece placement describes fewer than eight files
    #[error("rank {0} of the piece placement is too short")]
    RankTooShort(u8),
    /// An unknown character in the piece placement
    #[error("unexpected piece char {0:?}")]
    UnexpectedPieceChar(char),
    /// A side does not have exactly one king
    #[error("expected exactly one {} king", .0.as_long_str())]
    KingCount(Color),
    /// The active color field is invalid
    #[error("bad active color: {0}")]
    ActiveColor(ColorParseError),
    /// The castling rights field is invalid
    #[error("bad castling rights: {0}")]
    Castling(CastlingRightsParseError),
    /// The en passant field is not a square
    #[error("bad en passant square: {0}")]
    Enpassant(SquareParseError),
    /// The en passant square is on the wrong rank for the side to move
    #[error("invalid en passant square {} for {} to move", .0, .1.as_long_str())]
    EnpassantRank(Square, Color),
    /// The halfmove clock is not a non-negative integer
    #[error("bad halfmove clock {0:?}")]
    HalfmoveClock(String),
    /// The fullmove number is not a non-negative integer
    #[error("bad fullmove number {0:?}")]
    FullmoveNumber(String),
}

impl ParseError {
    /// Returns the 1-based index of the FEN field the error refers to
    ///
    /// Zero means the field structure itself was broken.
    pub fn field(&self) -> usize {
        match self {
            ParseError::FieldCount => 0,
            ParseError::BadRankCount
            | ParseError::RankTooLong(_)
            | ParseError::RankTooShort(_)
            | ParseError::UnexpectedPieceChar(_)
            | ParseError::KingCount(_) => 1,
            ParseError::ActiveColor(_) => 2,
            ParseError::Castling(_) => 3,
            ParseError::Enpassant(_) | ParseError::EnpassantRank(_, _) => 4,
            ParseError::HalfmoveClock(_) => 5,
            ParseError::FullmoveNumber(_) => 6,
        }
    }
}

fn parse_placement(field: &str) -> Result<[[Bitboard; Piece::COUNT]; 2], ParseError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(ParseError::BadRankCount);
    }
    let mut boards = [[Bitboard::EMPTY; Piece::COUNT]; 2];
    // ranks arrive top down, rank 8 first
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = Rank::from_index(7 - row_idx);
        let row_number = row_idx as u8 + 1;
        let mut file_count: u32 = 0;
        for c in row.chars() {
            match c.to_digit(10) {
                Some(0) | Some(9) => return Err(ParseError::UnexpectedPieceChar(c)),
                Some(d) => {
                    file_count += d;
                    if file_count > 8 {
                        return Err(ParseError::RankTooLong(row_number));
                    }
                }
                None => {
                    if file_count >= 8 {
                        return Err(ParseError::RankTooLong(row_number));
                    }
                    let (color, piece) =
                        Piece::from_fen_char(c).ok_or(ParseError::UnexpectedPieceChar(c))?;
                    let sq = Square::from_parts(File::from_index(file_count as usize), rank);
                    boards[color.index()][piece.index()].set(sq);
                    file_count += 1;
                }
            }
        }
        if file_count != 8 {
            return Err(ParseError::RankTooShort(row_number));
        }
    }
    for color in [Color::White, Color::Black] {
        if boards[color.index()][Piece::King.index()].len() != 1 {
            return Err(ParseError::KingCount(color));
        }
    }
    Ok(boards)
}

fn parse_enpassant(field: &str, side: Color) -> Result<Option<Square>, ParseError> {
    if field == "-" {
        return Ok(None);
    }
    let sq = Square::from_str(field).map_err(ParseError::Enpassant)?;
    if sq.rank() != geometry::enpassant_dst_rank(side) {
        return Err(ParseError::EnpassantRank(sq, side));
    }
    Ok(Some(sq))
}

/// Parses a position from a FEN string
pub fn parse(fen: &str) -> Result<Position, ParseError> {
    let fields: Vec<&str> = fen.split(' ').collect();
    if fields.len() != 6 {
        return Err(ParseError::FieldCount);
    }

    let boards = parse_placement(fields[0])?;
    let side = Color::from_str(fields[1]).map_err(ParseError::ActiveColor)?;
    let castling = CastlingRights::from_str(fields[2]).map_err(ParseError::Castling)?;
    let enpassant = parse_enpassant(fields[3], side)?;
    let halfmove_clock =
        u16::from_str(fields[4]).map_err(|_| ParseError::HalfmoveClock(fields[4].to_string()))?;
    let fullmove_number =
        u16::from_str(fields[5]).map_err(|_| ParseError::FullmoveNumber(fields[5].to_string()))?;

    let mut builder = PositionBuilder::new();
    for color in [Color::White, Color::Black] {
        for piece in Piece::iter() {
            builder.piece(color, piece, boards[color.index()][piece.index()]);
        }
        for castle_side in [CastlingSide::King, CastlingSide::Queen] {
            builder.castling(color, castle_side, castling.has(color, castle_side));
        }
    }
    builder
        .side(side)
        .enpassant(enpassant)
        .halfmove_clock(halfmove_clock)
        .fullmove_number(fullmove_number);
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial() {
        assert_eq!(parse(START_FEN).unwrap(), Position::initial());
    }

    #[test]
    fn test_midgame() {
        let p =
            parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(p.castling_rights(), CastlingRights::FULL);
        assert_eq!(p.enpassant_square(), None);
        assert_eq!(p.piece_at(sq("E5"), Color::White), Piece::Knight);
        assert_eq!(p.piece_at(sq("A6"), Color::Black), Piece::Bishop);
        assert_eq!(p.all_pieces(Color::White).len(), 16);
        assert_eq!(p.all_pieces(Color::Black).len(), 15);
    }

    #[test]
    fn test_enpassant_field() {
        let p = parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(p.enpassant_square(), Some(sq("E3")));

        let err =
            parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e6 0 1").unwrap_err();
        assert_eq!(err, ParseError::EnpassantRank(sq("E6"), Color::Black));
        assert_eq!(err.field(), 4);

        let err =
            parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq x9 0 1").unwrap_err();
        assert_eq!(err.field(), 4);
    }

    #[test]
    fn test_field_count() {
        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap_err();
        assert_eq!(err, ParseError::FieldCount);
        assert_eq!(err.field(), 0);
    }

    #[test]
    fn test_bad_placement() {
        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::BadRankCount);

        let err = parse("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::RankTooLong(2));
        assert_eq!(err.field(), 1);

        let err = parse("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::RankTooShort(2));

        let err = parse("rnbqkbnr/ppppppxp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedPieceChar('x'));
    }

    #[test]
    fn test_king_count() {
        let err = parse("rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::KingCount(Color::Black));
        assert_eq!(err.field(), 1);

        let err = parse("rnbqkbnr/pppppppp/8/8/8/2K5/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert_eq!(err, ParseError::KingCount(Color::White));
    }

    #[test]
    fn test_bad_scalar_fields() {
        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").unwrap_err();
        assert_eq!(err.field(), 2);

        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQKQ - 0 1").unwrap_err();
        assert_eq!(
            err,
            ParseError::Castling(CastlingRightsParseError::DuplicateChar('K'))
        );
        assert_eq!(err.field(), 3);

        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1").unwrap_err();
        assert_eq!(err, ParseError::HalfmoveClock("-1".to_string()));
        assert_eq!(err.field(), 5);

        let err = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 x").unwrap_err();
        assert_eq!(err, ParseError::FullmoveNumber("x".to_string()));
        assert_eq!(err.field(), 6);
    }

    #[test]
    fn test_clocks() {
        let p = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 13 37").unwrap();
        assert_eq!(p.halfmove_clock(), 13);
        assert_eq!(p.fullmove_number(), 37);
    }
}
