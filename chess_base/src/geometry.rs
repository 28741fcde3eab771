use crate::types::{Color, File, Rank, Square};

/// Rank holding the king and rooks of color `c` before castling
#[inline]
pub const fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

#[inline]
pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

#[inline]
pub const fn double_move_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R4,
        Color::Black => Rank::R5,
    }
}

#[inline]
pub const fn promotion_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank of the square a capturing pawn lands on in an en passant capture
#[inline]
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Rank of the pawns of color `c` that may capture en passant
#[inline]
pub const fn enpassant_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

/// Square-number delta of a single pawn push for color `c`
#[inline]
pub const fn pawn_forward_delta(c: Color) -> i32 {
    match c {
        Color::White => 8,
        Color::Black => -8,
    }
}

/// Home corner of the queenside rook of color `c` (A1 or A8)
#[inline]
pub const fn queenside_rook_home(c: Color) -> Square {
    Square::from_parts(File::A, home_rank(c))
}

/// Home corner of the kingside rook of color `c` (H1 or H8)
#[inline]
pub const fn kingside_rook_home(c: Color) -> Square {
    Square::from_parts(File::H, home_rank(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        assert_eq!(queenside_rook_home(Color::White).to_string(), "A1");
        assert_eq!(kingside_rook_home(Color::White).to_string(), "H1");
        assert_eq!(queenside_rook_home(Color::Black).to_string(), "A8");
        assert_eq!(kingside_rook_home(Color::Black).to_string(), "H8");
    }

    #[test]
    fn test_deltas() {
        let e2 = Square::from_parts(File::E, Rank::R2);
        assert_eq!(
            e2.add(pawn_forward_delta(Color::White)),
            Square::from_parts(File::E, Rank::R3)
        );
        let e7 = Square::from_parts(File::E, Rank::R7);
        assert_eq!(
            e7.add(pawn_forward_delta(Color::Black)),
            Square::from_parts(File::E, Rank::R6)
        );
    }
}
