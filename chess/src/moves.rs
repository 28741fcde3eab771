//! The move record and the paired make/unmake routines

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::{CastlingRights, CastlingSide, Color, File, Piece, Square};
use crate::{castling, geometry};

use std::fmt;

/// State stamped into a [`Move`] by [`make_move`], needed to reverse it
///
/// Castling rights are snapshotted for both colors, as a single move can
/// change the rights of either side (a rook capture on the opponent's home
/// corner drops theirs).
#[derive(Debug, Default, Copy, Clone)]
struct Reversal {
    rights: CastlingRights,
    halfmove_clock: u16,
}

/// One half-move, with enough context to apply and reverse it
///
/// A move knows the side making it, the moving piece kind, its origin and
/// destination, the captured and promoted-to kinds where applicable, a
/// castling tag and the en passant details. [`make_move`] additionally stamps
/// a reversal packet into the move, so a made move can be handed back to
/// [`unmake_move`] without any further bookkeeping on the caller's side.
#[derive(Debug, Copy, Clone)]
pub struct Move {
    side: Color,
    piece: Piece,
    src: Square,
    dst: Square,
    captured: Option<Piece>,
    promoted: Option<Piece>,
    castle: Option<CastlingSide>,
    enpassant: bool,
    ep_created: Option<Square>,
    reversal: Reversal,
}

impl Move {
    fn raw(side: Color, src: Square, dst: Square, piece: Piece) -> Move {
        Move {
            side,
            piece,
            src,
            dst,
            captured: None,
            promoted: None,
            castle: None,
            enpassant: false,
            ep_created: None,
            reversal: Reversal::default(),
        }
    }

    /// Creates a non-capture move
    ///
    /// A pawn double-advance is recognized here and records the square it
    /// skips, which becomes the opponent's en passant target.
    pub fn new(side: Color, src: Square, dst: Square, piece: Piece) -> Move {
        let mut mv = Move::raw(side, src, dst, piece);
        if piece == Piece::Pawn
            && src.rank() == geometry::double_move_src_rank(side)
            && dst.rank() == geometry::double_move_dst_rank(side)
        {
            mv.ep_created = Some(src.add(geometry::pawn_forward_delta(side)));
        }
        mv
    }

    /// Creates a capture move
    pub fn new_capture(
        side: Color,
        src: Square,
        dst: Square,
        piece: Piece,
        captured: Piece,
    ) -> Move {
        let mut mv = Move::raw(side, src, dst, piece);
        mv.captured = Some(captured);
        mv
    }

    /// Creates an en passant capture
    ///
    /// The captured kind is always a pawn. `dst` is the en passant target
    /// square, which the captured pawn skipped on its double advance.
    pub fn new_enpassant(side: Color, src: Square, dst: Square) -> Move {
        let mut mv = Move::raw(side, src, dst, Piece::Pawn);
        mv.captured = Some(Piece::Pawn);
        mv.enpassant = true;
        mv
    }

    /// Creates a promotion move
    pub fn new_promotion(side: Color, src: Square, dst: Square, promoted: Piece) -> Move {
        let mut mv = Move::raw(side, src, dst, Piece::Pawn);
        mv.promoted = Some(promoted);
        mv
    }

    /// Creates a capturing promotion move
    pub fn new_promotion_capture(
        side: Color,
        src: Square,
        dst: Square,
        promoted: Piece,
        captured: Piece,
    ) -> Move {
        let mut mv = Move::raw(side, src, dst, Piece::Pawn);
        mv.promoted = Some(promoted);
        mv.captured = Some(captured);
        mv
    }

    /// Creates a castling move by `side` to castling side `castle`
    pub fn castle(side: Color, castle: CastlingSide) -> Move {
        let rank = geometry::home_rank(side);
        let src = Square::from_parts(File::E, rank);
        let dst = match castle {
            CastlingSide::King => Square::from_parts(File::G, rank),
            CastlingSide::Queen => Square::from_parts(File::C, rank),
        };
        let mut mv = Move::raw(side, src, dst, Piece::King);
        mv.castle = Some(castle);
        mv
    }

    /// Returns the side making this move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns the kind of the moving piece
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Returns the origin square
    #[inline]
    pub fn src(&self) -> Square {
        self.src
    }

    /// Returns the destination square
    #[inline]
    pub fn dst(&self) -> Square {
        self.dst
    }

    /// Returns `true` if this move captures a piece (including en passant)
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns `true` if this move promotes a pawn
    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promoted.is_some()
    }

    /// Returns `true` if this move is a castling
    #[inline]
    pub fn is_castles(&self) -> bool {
        self.castle.is_some()
    }

    /// Returns `true` if this move is a kingside castling
    #[inline]
    pub fn is_kingside_castles(&self) -> bool {
        self.castle == Some(CastlingSide::King)
    }

    /// Returns `true` if this move is a queenside castling
    #[inline]
    pub fn is_queenside_castles(&self) -> bool {
        self.castle == Some(CastlingSide::Queen)
    }

    /// Returns the castling side of this move, if it is a castling
    #[inline]
    pub fn castle_side(&self) -> Option<CastlingSide> {
        self.castle
    }

    /// Returns `true` if this move is an en passant capture
    #[inline]
    pub fn is_enpassant(&self) -> bool {
        self.enpassant
    }

    /// Returns `true` if this move makes an en passant capture available to
    /// the opponent (i. e. it is a pawn double-advance)
    #[inline]
    pub fn has_enpassant_creation(&self) -> bool {
        self.ep_created.is_some()
    }

    /// Returns the en passant target square this move creates, if any
    #[inline]
    pub fn enpassant_square(&self) -> Option<Square> {
        self.ep_created
    }

    /// Returns the kind of the captured piece
    ///
    /// # Panics
    ///
    /// Panics if the move is not a capture.
    #[inline]
    pub fn captured_piece(&self) -> Piece {
        match self.captured {
            Some(p) => p,
            None => panic!("captured_piece() called on a non-capture move"),
        }
    }

    /// Returns the kind the pawn promotes to
    ///
    /// # Panics
    ///
    /// Panics if the move is not a promotion.
    #[inline]
    pub fn promoted_piece(&self) -> Piece {
        match self.promoted {
            Some(p) => p,
            None => panic!("promoted_piece() called on a non-promotion move"),
        }
    }

    /// Returns the square the captured pawn actually stood on for an en
    /// passant capture
    ///
    /// The pawn taken en passant does not stand on the destination square but
    /// one rank towards its own side, e. g. a capture onto E6 takes the pawn
    /// on E5.
    ///
    /// # Panics
    ///
    /// Panics if the move is not an en passant capture.
    #[inline]
    pub fn enpassant_victim_square(&self) -> Square {
        assert!(self.enpassant, "not an en passant capture");
        self.dst.add(-geometry::pawn_forward_delta(self.side))
    }
}

impl PartialEq for Move {
    // the reversal packet is bookkeeping, not identity
    fn eq(&self, other: &Move) -> bool {
        self.side == other.side
            && self.piece == other.piece
            && self.src == other.src
            && self.dst == other.dst
            && self.captured == other.captured
            && self.promoted == other.promoted
            && self.castle == other.castle
            && self.enpassant == other.enpassant
            && self.ep_created == other.ep_created
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.castle {
            Some(CastlingSide::King) => return write!(f, "O-O"),
            Some(CastlingSide::Queen) => return write!(f, "O-O-O"),
            None => {}
        }
        let sep = if self.is_capture() { "x" } else { "" };
        write!(f, "{}{}{}", self.src, sep, self.dst)?;
        if let Some(promoted) = self.promoted {
            write!(f, "={}", promoted.as_char())?;
        }
        Ok(())
    }
}

/// Makes the move `mv` on position `p`
///
/// The position must be one in which `mv` was generated; the castling rights
/// and halfmove clock active before the move are stamped into `mv`, so the
/// same move value must later be given back to [`unmake_move`].
///
/// All bitboard updates are XOR toggles, which makes the whole update
/// self-inverse except for the occupancy of a capture destination (the square
/// stays occupied) and the saved scalar state.
pub fn make_move(p: &mut Position, mv: &mut Move) {
    let us = mv.side;
    let them = us.inv();
    mv.reversal = Reversal {
        rights: p.castling,
        halfmove_clock: p.halfmove_clock,
    };

    let src = Bitboard::from_square(mv.src);
    let dst = Bitboard::from_square(mv.dst);
    let change = src | dst;
    let victim = if mv.enpassant {
        Bitboard::from_square(mv.enpassant_victim_square())
    } else {
        Bitboard::EMPTY
    };

    if let Some(side) = mv.castle {
        // the rook move alone; the king is shifted by the common path below
        let rook = castling::rook_change(us, side);
        *p.piece_bb_mut(us, Piece::Rook) ^= rook;
        *p.all_bb_mut(us) ^= rook;
        p.occupied ^= rook;
    } else if mv.enpassant {
        // the captured pawn does not stand on the destination; its occupancy
        // bit is toggled together with the mover shift below
        *p.piece_bb_mut(them, Piece::Pawn) ^= victim;
        *p.all_bb_mut(them) ^= victim;
    } else if let Some(promoted) = mv.promoted {
        *p.piece_bb_mut(us, Piece::Pawn) ^= src;
        *p.piece_bb_mut(us, promoted) ^= dst;
        *p.all_bb_mut(us) ^= change;
        if let Some(captured) = mv.captured {
            *p.piece_bb_mut(them, captured) ^= dst;
            *p.all_bb_mut(them) ^= dst;
            // the destination stays occupied
            p.occupied ^= src;
        } else {
            p.occupied ^= change;
        }
    } else if let Some(captured) = mv.captured {
        *p.piece_bb_mut(them, captured) ^= dst;
        *p.all_bb_mut(them) ^= dst;
    }

    if mv.promoted.is_none() {
        *p.piece_bb_mut(us, mv.piece) ^= change;
        *p.all_bb_mut(us) ^= change;
        if mv.enpassant {
            p.occupied ^= change ^ victim;
        } else if mv.captured.is_some() {
            // the destination stays occupied by the mover
            p.occupied = p.occupied.without(mv.src);
        } else {
            p.occupied ^= change;
        }
    }

    if mv.piece == Piece::King {
        p.castling.unset_color(us);
    } else if mv.piece == Piece::Rook {
        if mv.src == geometry::queenside_rook_home(us) {
            p.castling.unset(us, CastlingSide::Queen);
        } else if mv.src == geometry::kingside_rook_home(us) {
            p.castling.unset(us, CastlingSide::King);
        }
    }
    if mv.captured.is_some() {
        // a capture onto the opponent's rook home corner kills their right
        if mv.dst == geometry::queenside_rook_home(them) {
            p.castling.unset(them, CastlingSide::Queen);
        } else if mv.dst == geometry::kingside_rook_home(them) {
            p.castling.unset(them, CastlingSide::King);
        }
    }

    p.previous_enpassant = p.enpassant;
    p.enpassant = mv.ep_created;

    if mv.captured.is_some() || mv.piece == Piece::Pawn {
        p.halfmove_clock = 0;
    } else {
        p.halfmove_clock += 1;
    }
    if us == Color::Black {
        p.fullmove_number += 1;
    }
    p.side = them;
}

/// Unmakes the move `mv` on position `p`
///
/// `mv` must be the most recently made move on this position.
pub fn unmake_move(p: &mut Position, mv: &Move) {
    let us = mv.side;
    let them = us.inv();

    let src = Bitboard::from_square(mv.src);
    let dst = Bitboard::from_square(mv.dst);
    let change = src | dst;
    let victim = if mv.enpassant {
        Bitboard::from_square(mv.enpassant_victim_square())
    } else {
        Bitboard::EMPTY
    };

    if let Some(side) = mv.castle {
        let rook = castling::rook_change(us, side);
        *p.piece_bb_mut(us, Piece::Rook) ^= rook;
        *p.all_bb_mut(us) ^= rook;
        p.occupied ^= rook;
    } else if mv.enpassant {
        *p.piece_bb_mut(them, Piece::Pawn) ^= victim;
        *p.all_bb_mut(them) ^= victim;
    } else if let Some(promoted) = mv.promoted {
        *p.piece_bb_mut(us, Piece::Pawn) ^= src;
        *p.piece_bb_mut(us, promoted) ^= dst;
        *p.all_bb_mut(us) ^= change;
        if let Some(captured) = mv.captured {
            *p.piece_bb_mut(them, captured) ^= dst;
            *p.all_bb_mut(them) ^= dst;
            p.occupied ^= src;
        } else {
            p.occupied ^= change;
        }
    } else if let Some(captured) = mv.captured {
        *p.piece_bb_mut(them, captured) ^= dst;
        *p.all_bb_mut(them) ^= dst;
    }

    if mv.promoted.is_none() {
        *p.piece_bb_mut(us, mv.piece) ^= change;
        *p.all_bb_mut(us) ^= change;
        if mv.enpassant {
            p.occupied ^= change ^ victim;
        } else if mv.captured.is_some() {
            p.occupied = p.occupied.with(mv.src);
        } else {
            p.occupied ^= change;
        }
    }

    p.castling = mv.reversal.rights;
    p.halfmove_clock = mv.reversal.halfmove_clock;
    p.enpassant = p.previous_enpassant;
    if us == Color::Black {
        p.fullmove_number -= 1;
    }
    p.side = us;
}
