//! Move generation and attack queries

use crate::bitboard::Bitboard;
use crate::bitboard_consts::{NOT_FILE_A, NOT_FILE_H};
use crate::board::Position;
use crate::moves::{make_move, unmake_move, Move};
use crate::ray::{self, Direction, ALL_DIRECTIONS, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::types::{CastlingSide, Color, Piece, Square};
use crate::{castling, geometry};

use std::ops::{Deref, DerefMut};

use arrayvec::ArrayVec;

// the promotion expansion order is part of the generator's contract
const PROMOTION_KINDS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// A list of generated moves
///
/// Backed by a fixed-capacity vector; no reachable position produces more
/// than 256 pseudo-legal moves.
#[derive(Debug, Default, Clone)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Returns `true` if a piece of kind `piece` and color `by` attacks `target`
///
/// Pawn attacks are resolved through the reverse-attacker tables of the
/// attacker's color.
pub fn piece_attacks_square(p: &Position, by: Color, piece: Piece, target: Square) -> bool {
    let ours = p.pieces(by, piece);
    match piece {
        Piece::Pawn => (ray::pawn_attackers(by, target) & ours).is_nonempty(),
        Piece::Knight => (ray::knight(target) & ours).is_nonempty(),
        Piece::King => (ray::king(target) & ours).is_nonempty(),
        Piece::Rook => slides_onto(p, target, &ROOK_DIRECTIONS, ours),
        Piece::Bishop => slides_onto(p, target, &BISHOP_DIRECTIONS, ours),
        Piece::Queen => slides_onto(p, target, &ALL_DIRECTIONS, ours),
    }
}

fn slides_onto(p: &Position, target: Square, dirs: &[Direction], pieces: Bitboard) -> bool {
    dirs.iter().any(|dir| {
        let (attacks, _) = ray::sliding(target, *dir, p.occupied());
        (attacks & pieces).is_nonempty()
    })
}

/// Returns `true` if any piece of color `by` attacks `target`
pub fn is_square_attacked(p: &Position, target: Square, by: Color) -> bool {
    Piece::iter().any(|piece| piece_attacks_square(p, by, piece, target))
}

fn attacks_along(p: &Position, target: Square, dirs: &[Direction]) -> Bitboard {
    dirs.iter().fold(Bitboard::EMPTY, |acc, dir| {
        acc | ray::sliding(target, *dir, p.occupied()).0
    })
}

/// Returns the bitboard of all the pieces attacking `target`
///
/// With `color` given, only the attackers of that color are reported; with
/// `None`, attackers of both colors are.
pub fn attackers_of(p: &Position, target: Square, color: Option<Color>) -> Bitboard {
    let diagonals = attacks_along(p, target, &BISHOP_DIRECTIONS);
    let lines = attacks_along(p, target, &ROOK_DIRECTIONS);
    let mut res = Bitboard::EMPTY;
    for c in [Color::White, Color::Black] {
        if color == Some(c.inv()) {
            continue;
        }
        res |= diagonals & (p.pieces(c, Piece::Bishop) | p.pieces(c, Piece::Queen));
        res |= lines & (p.pieces(c, Piece::Rook) | p.pieces(c, Piece::Queen));
        res |= ray::knight(target) & p.pieces(c, Piece::Knight);
        res |= ray::king(target) & p.pieces(c, Piece::King);
        res |= ray::pawn_attackers(c, target) & p.pieces(c, Piece::Pawn);
    }
    res
}

fn push_promotions(
    moves: &mut MoveList,
    us: Color,
    src: Square,
    dst: Square,
    captured: Option<Piece>,
) {
    for promoted in PROMOTION_KINDS {
        moves.push(match captured {
            Some(captured) => Move::new_promotion_capture(us, src, dst, promoted, captured),
            None => Move::new_promotion(us, src, dst, promoted),
        });
    }
}

fn gen_pawn_moves(p: &Position, us: Color, moves: &mut MoveList) {
    let them = us.inv();
    let pawns = p.pieces(us, Piece::Pawn);
    let empty = !p.occupied();
    let theirs = p.all_pieces(them);
    let forward = geometry::pawn_forward_delta(us);
    let start_rank = crate::bitboard_consts::rank(geometry::double_move_src_rank(us));
    let promotion_rank = geometry::promotion_rank(us);

    let single = pawns.shift(forward) & empty;
    for dst in single {
        let src = dst.add(-forward);
        if dst.rank() == promotion_rank {
            push_promotions(moves, us, src, dst, None);
        } else {
            moves.push(Move::new(us, src, dst, Piece::Pawn));
        }
    }

    let double = ((pawns & start_rank).shift(forward) & empty).shift(forward) & empty;
    for dst in double {
        moves.push(Move::new(us, dst.add(-2 * forward), dst, Piece::Pawn));
    }

    // diagonal captures; the file masks keep shifts from wrapping around the
    // board edge
    let (toward_a, toward_h) = match us {
        Color::White => (9, 7),
        Color::Black => (-7, -9),
    };
    for (shift, mask) in [(toward_a, NOT_FILE_A), (toward_h, NOT_FILE_H)] {
        for dst in (pawns & mask).shift(shift) & theirs {
            let src = dst.add(-shift);
            let captured = p.piece_at(dst, them);
            if dst.rank() == promotion_rank {
                push_promotions(moves, us, src, dst, Some(captured));
            } else {
                moves.push(Move::new_capture(us, src, dst, Piece::Pawn, captured));
            }
        }
    }

    if let Some(target) = p.enpassant_square() {
        for src in ray::enpassant_attackers(us, target.file()) & pawns {
            moves.push(Move::new_enpassant(us, src, target));
        }
    }
}

fn gen_sliding_moves(
    p: &Position,
    us: Color,
    piece: Piece,
    dirs: &[Direction],
    moves: &mut MoveList,
) {
    let them = us.inv();
    for src in p.pieces(us, piece) {
        for dir in dirs {
            let (attacks, blocker) = ray::sliding(src, *dir, p.occupied());
            for dst in attacks {
                if Some(dst) == blocker {
                    if p.all_pieces(us).has(dst) {
                        continue;
                    }
                    moves.push(Move::new_capture(us, src, dst, piece, p.piece_at(dst, them)));
                } else {
                    moves.push(Move::new(us, src, dst, piece));
                }
            }
        }
    }
}

fn gen_leaper_moves(p: &Position, us: Color, piece: Piece, moves: &mut MoveList) {
    let them = us.inv();
    for src in p.pieces(us, piece) {
        let targets = match piece {
            Piece::Knight => ray::knight(src),
            Piece::King => ray::king(src),
            _ => unreachable!(),
        };
        for dst in targets.and_not(p.all_pieces(us)) {
            if p.all_pieces(them).has(dst) {
                moves.push(Move::new_capture(us, src, dst, piece, p.piece_at(dst, them)));
            } else {
                moves.push(Move::new(us, src, dst, piece));
            }
        }
    }
}

fn gen_king_moves(p: &Position, us: Color, moves: &mut MoveList) {
    gen_leaper_moves(p, us, Piece::King, moves);
    // candidates only; emptiness and attack checks are the legal filter's job
    if p.castling_rights().has(us, CastlingSide::King) {
        moves.push(Move::castle(us, CastlingSide::King));
    }
    if p.castling_rights().has(us, CastlingSide::Queen) {
        moves.push(Move::castle(us, CastlingSide::Queen));
    }
}

/// Generates all the pseudo-legal moves for `color`
///
/// The result respects piece movement rules and includes castling candidates
/// for every remaining right, but ignores king safety. Use
/// [`gen_legal`] for the filtered list.
pub fn gen_pseudo(p: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    gen_pawn_moves(p, color, &mut moves);
    gen_sliding_moves(p, color, Piece::Rook, &ROOK_DIRECTIONS, &mut moves);
    gen_leaper_moves(p, color, Piece::Knight, &mut moves);
    gen_sliding_moves(p, color, Piece::Bishop, &BISHOP_DIRECTIONS, &mut moves);
    gen_sliding_moves(p, color, Piece::Queen, &ALL_DIRECTIONS, &mut moves);
    gen_king_moves(p, color, &mut moves);
    moves
}

/// Generates all the legal moves for `color`
pub fn gen_legal(p: &Position, color: Color) -> MoveList {
    let mut moves = gen_pseudo(p, color);
    let them = color.inv();
    let our_king = p.king_square(color);
    let their_king = p.king_square(them);
    let mut probe = p.clone();
    moves.retain(|mv| {
        if let Some(side) = mv.castle_side() {
            // may not castle out of, through, or into check, and the path
            // between king and rook must be clear
            if is_square_attacked(&probe, our_king, them) {
                return false;
            }
            if (probe.occupied() & castling::empty_path(color, side)).is_nonempty() {
                return false;
            }
            let [crossing, destination] = castling::transit_squares(color, side);
            !is_square_attacked(&probe, crossing, them)
                && !is_square_attacked(&probe, destination, them)
        } else if mv.piece() == Piece::King {
            // kings may never touch; the fast path does not subsume the
            // attack test below
            if their_king.is_adjacent(mv.dst()) {
                return false;
            }
            make_move(&mut probe, mv);
            let legal = !is_square_attacked(&probe, mv.dst(), them);
            unmake_move(&mut probe, mv);
            legal
        } else {
            make_move(&mut probe, mv);
            let legal = !is_square_attacked(&probe, our_king, them);
            unmake_move(&mut probe, mv);
            legal
        }
    });
    moves
}
