//! Precomputed attack tables and the classical sliding-ray probe
//!
//! All tables here are built at compile time, so they are plain read-only
//! statics by the time any code runs and can be shared freely between
//! threads.

use crate::bitboard::Bitboard;
use crate::types::{Color, File, Square};

/// A ray direction on the board
///
/// The deltas are in terms of square numbers (H1 = 1, bit order low to high),
/// so "east" means toward the H file and a *smaller* square number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

/// All eight directions
pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// The directions a rook slides in
pub const ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// The directions a bishop slides in
pub const BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

impl Direction {
    /// Returns a numeric index of the direction
    #[inline]
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Square-number delta of one step in this direction
    #[inline]
    pub const fn delta(&self) -> i32 {
        match *self {
            Direction::North => 8,
            Direction::NorthEast => 7,
            Direction::East => -1,
            Direction::SouthEast => -9,
            Direction::South => -8,
            Direction::SouthWest => -7,
            Direction::West => 1,
            Direction::NorthWest => 9,
        }
    }

    /// `true` if stepping in this direction moves toward the H file
    #[inline]
    const fn heads_east(&self) -> bool {
        matches!(
            *self,
            Direction::NorthEast | Direction::East | Direction::SouthEast
        )
    }

    /// `true` if stepping in this direction moves toward the A file
    #[inline]
    const fn heads_west(&self) -> bool {
        matches!(
            *self,
            Direction::SouthWest | Direction::West | Direction::NorthWest
        )
    }

    #[inline]
    const fn from_index(val: usize) -> Direction {
        match val {
            0 => Direction::North,
            1 => Direction::NorthEast,
            2 => Direction::East,
            3 => Direction::SouthEast,
            4 => Direction::South,
            5 => Direction::SouthWest,
            6 => Direction::West,
            7 => Direction::NorthWest,
            _ => panic!("bad direction index"),
        }
    }
}

// H-file squares have number n with n % 8 == 1, A-file squares n % 8 == 0.
const fn on_h_file(n: i32) -> bool {
    n % 8 == 1
}

const fn on_a_file(n: i32) -> bool {
    n % 8 == 0
}

const fn edge_reached(n: i32, east: bool, west: bool) -> bool {
    (east && on_h_file(n)) || (west && on_a_file(n))
}

const fn ray_bits(start: u8, dir: Direction) -> u64 {
    let east = dir.heads_east();
    let west = dir.heads_west();
    let mut cur = start as i32;
    if edge_reached(cur, east, west) {
        return 0;
    }
    let mut bits = 0_u64;
    loop {
        cur += dir.delta();
        if cur < 1 || cur > 64 {
            break;
        }
        bits |= 1_u64 << (cur - 1);
        if edge_reached(cur, east, west) {
            break;
        }
    }
    bits
}

const fn make_rays() -> [[Bitboard; 8]; 64] {
    let mut table = [[Bitboard::EMPTY; 8]; 64];
    let mut n = 1_u8;
    while n <= 64 {
        let mut d = 0_usize;
        while d < 8 {
            table[(n - 1) as usize][d] = Bitboard::from_raw(ray_bits(n, Direction::from_index(d)));
            d += 1;
        }
        n += 1;
    }
    table
}

const fn leap_bits(start: u8, offsets: &[(i32, i32)]) -> u64 {
    let rank = ((start as i32 - 1) / 8) + 1;
    let file = 8 - (start as i32 - 1) % 8;
    let mut bits = 0_u64;
    let mut i = 0;
    while i < offsets.len() {
        let (dr, df) = offsets[i];
        let (nr, nf) = (rank + dr, file + df);
        if 1 <= nr && nr <= 8 && 1 <= nf && nf <= 8 {
            let number = (nr - 1) * 8 + 9 - nf;
            bits |= 1_u64 << (number - 1);
        }
        i += 1;
    }
    bits
}

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

const fn make_leaps(offsets: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut n = 1_u8;
    while n <= 64 {
        table[(n - 1) as usize] = Bitboard::from_raw(leap_bits(n, offsets));
        n += 1;
    }
    table
}

// Squares from which a pawn of the given color would attack the target. A
// white pawn attacks target t from t-7 (unless t is on the A file, where a
// step from t-7 would have wrapped) and from t-9 (unless t is on the H file);
// symmetrically t+7 and t+9 for black.
const fn pawn_attacker_bits(color: Color, target: u8) -> u64 {
    let t = target as i32;
    let (near, far) = match color {
        Color::White => (t - 7, t - 9),
        Color::Black => (t + 9, t + 7),
    };
    // `near` attacks over the H-file edge, `far` over the A-file edge
    let mut bits = 0_u64;
    if !on_a_file(t) && near >= 1 && near <= 64 {
        bits |= 1_u64 << (near - 1);
    }
    if !on_h_file(t) && far >= 1 && far <= 64 {
        bits |= 1_u64 << (far - 1);
    }
    bits
}

const fn make_pawn_attackers(color: Color) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut n = 1_u8;
    while n <= 64 {
        table[(n - 1) as usize] = Bitboard::from_raw(pawn_attacker_bits(color, n));
        n += 1;
    }
    table
}

// Squares on the capturing side's en passant source rank from which a pawn
// could capture onto the en passant target of the given file.
const fn enpassant_attacker_bits(color: Color, file_number: i32) -> u64 {
    let rank = match color {
        Color::White => 5,
        Color::Black => 4,
    };
    let mut bits = 0_u64;
    let mut df = -1;
    while df <= 1 {
        if df != 0 {
            let nf = file_number + df;
            if 1 <= nf && nf <= 8 {
                let number = (rank - 1) * 8 + 9 - nf;
                bits |= 1_u64 << (number - 1);
            }
        }
        df += 1;
    }
    bits
}

const fn make_enpassant_attackers(color: Color) -> [Bitboard; 8] {
    let mut table = [Bitboard::EMPTY; 8];
    let mut f = 0_usize;
    while f < 8 {
        table[f] = Bitboard::from_raw(enpassant_attacker_bits(color, f as i32 + 1));
        f += 1;
    }
    table
}

static RAYS: [[Bitboard; 8]; 64] = make_rays();
static KNIGHT_ATTACKS: [Bitboard; 64] = make_leaps(&KNIGHT_OFFSETS);
static KING_ATTACKS: [Bitboard; 64] = make_leaps(&KING_OFFSETS);
static PAWN_ATTACKERS: [[Bitboard; 64]; 2] = [
    make_pawn_attackers(Color::White),
    make_pawn_attackers(Color::Black),
];
static ENPASSANT_ATTACKERS: [[Bitboard; 8]; 2] = [
    make_enpassant_attackers(Color::White),
    make_enpassant_attackers(Color::Black),
];

/// Returns all the squares reachable from `sq` in direction `dir` on an empty
/// board
#[inline]
pub fn ray(sq: Square, dir: Direction) -> Bitboard {
    RAYS[sq.index()][dir.index()]
}

/// Returns the squares a knight on `sq` attacks
#[inline]
pub fn knight(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// Returns the squares a king on `sq` attacks
#[inline]
pub fn king(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Returns the squares from which a pawn of color `color` would attack `sq`
///
/// Note the reversed sense compared to the other tables: this is the set of
/// possible attacker squares, not the set of attacked squares.
#[inline]
pub fn pawn_attackers(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKERS[color.index()][sq.index()]
}

/// Returns the squares from which a pawn of color `color` could capture en
/// passant onto the target square on file `file`
#[inline]
pub fn enpassant_attackers(color: Color, file: File) -> Bitboard {
    ENPASSANT_ATTACKERS[color.index()][file.index()]
}

/// Runs the classical sliding probe from `sq` in direction `dir`
///
/// Returns every square reachable in that direction given `occupied`, paired
/// with the nearest occupied square along the ray, if there is one. The
/// blocker square is included in the returned set; it is up to the caller to
/// discard it when it holds a friendly piece or treat it as a capture target
/// otherwise.
pub fn sliding(sq: Square, dir: Direction, occupied: Bitboard) -> (Bitboard, Option<Square>) {
    let full = ray(sq, dir);
    let blockers = full & occupied;
    // the blocker set lies on a single directed ray, so the nearest one is
    // simply the lowest bit when stepping up the numbers and the highest bit
    // when stepping down
    let blocker = if dir.delta() > 0 {
        blockers.first()
    } else {
        blockers.last()
    };
    match blocker {
        Some(b) => (full ^ ray(b, dir), Some(b)),
        None => (full, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard_consts;
    use crate::types::{File, Rank};

    fn sq(file: File, rank: Rank) -> Square {
        Square::from_parts(file, rank)
    }

    #[test]
    fn test_rays_from_corners() {
        let h1 = sq(File::H, Rank::R1);
        assert_eq!(
            ray(h1, Direction::North),
            bitboard_consts::file(File::H).without(h1)
        );
        let a1 = sq(File::A, Rank::R1);
        assert_eq!(
            ray(a1, Direction::East),
            bitboard_consts::rank(Rank::R1).without(a1)
        );
        // outward diagonals from the corners are empty
        assert!(ray(a1, Direction::NorthWest).is_empty());
        assert!(ray(a1, Direction::SouthWest).is_empty());
        assert!(ray(a1, Direction::SouthEast).is_empty());
        assert!(ray(h1, Direction::NorthEast).is_empty());
        assert!(ray(h1, Direction::SouthEast).is_empty());
        assert!(ray(sq(File::A, Rank::R8), Direction::NorthWest).is_empty());
        assert!(ray(sq(File::H, Rank::R8), Direction::NorthEast).is_empty());
    }

    #[test]
    fn test_ray_lengths() {
        for s in Square::iter() {
            let mut all = Bitboard::EMPTY;
            let mut total = 0;
            for dir in ALL_DIRECTIONS {
                let r = ray(s, dir);
                assert!((r & all).is_empty(), "rays from {} overlap", s);
                all |= r;
                total += r.len();
            }
            assert!(!all.has(s));
            // a queen on an empty board attacks at least 21 squares
            assert!((21..=27).contains(&total), "{} attacks {} squares", s, total);
        }
    }

    #[test]
    fn test_diagonal_ray() {
        let c2 = sq(File::C, Rank::R2);
        let expected = Bitboard::from_squares(&[
            sq(File::D, Rank::R3),
            sq(File::E, Rank::R4),
            sq(File::F, Rank::R5),
            sq(File::G, Rank::R6),
            sq(File::H, Rank::R7),
        ]);
        assert_eq!(ray(c2, Direction::NorthEast), expected);
    }

    #[test]
    fn test_sliding_no_blockers() {
        for s in Square::iter() {
            for dir in ALL_DIRECTIONS {
                let (bb, blocker) = sliding(s, dir, Bitboard::EMPTY);
                assert_eq!(bb, ray(s, dir));
                assert_eq!(blocker, None);
            }
        }
    }

    #[test]
    fn test_sliding_blocker() {
        let a1 = sq(File::A, Rank::R1);
        let a4 = sq(File::A, Rank::R4);
        let occupied = Bitboard::from_squares(&[a1, a4, sq(File::A, Rank::R6)]);
        let (bb, blocker) = sliding(a1, Direction::North, occupied);
        assert_eq!(blocker, Some(a4));
        assert_eq!(
            bb,
            Bitboard::from_squares(&[
                sq(File::A, Rank::R2),
                sq(File::A, Rank::R3),
                sq(File::A, Rank::R4),
            ])
        );

        let h8 = sq(File::H, Rank::R8);
        let (bb, blocker) = sliding(h8, Direction::SouthWest, Bitboard::from_square(a1));
        assert_eq!(blocker, Some(a1));
        assert_eq!(bb, ray(h8, Direction::SouthWest));
    }

    #[test]
    fn test_knight() {
        let d4 = sq(File::D, Rank::R4);
        let expected = Bitboard::from_squares(&[
            sq(File::B, Rank::R3),
            sq(File::B, Rank::R5),
            sq(File::C, Rank::R2),
            sq(File::C, Rank::R6),
            sq(File::E, Rank::R2),
            sq(File::E, Rank::R6),
            sq(File::F, Rank::R3),
            sq(File::F, Rank::R5),
        ]);
        assert_eq!(knight(d4), expected);
        assert_eq!(
            knight(sq(File::A, Rank::R1)),
            Bitboard::from_squares(&[sq(File::B, Rank::R3), sq(File::C, Rank::R2)])
        );
    }

    #[test]
    fn test_king() {
        for s in Square::iter() {
            let expected: Vec<_> = Square::iter().filter(|o| s.is_adjacent(*o)).collect();
            assert_eq!(king(s).into_iter().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_pawn_attackers() {
        let e4 = sq(File::E, Rank::R4);
        assert_eq!(
            pawn_attackers(Color::White, e4),
            Bitboard::from_squares(&[sq(File::D, Rank::R3), sq(File::F, Rank::R3)])
        );
        assert_eq!(
            pawn_attackers(Color::Black, e4),
            Bitboard::from_squares(&[sq(File::D, Rank::R5), sq(File::F, Rank::R5)])
        );
        assert_eq!(
            pawn_attackers(Color::White, sq(File::A, Rank::R4)),
            Bitboard::from_square(sq(File::B, Rank::R3))
        );
        assert_eq!(
            pawn_attackers(Color::White, sq(File::H, Rank::R4)),
            Bitboard::from_square(sq(File::G, Rank::R3))
        );
        assert!(pawn_attackers(Color::White, sq(File::E, Rank::R1)).is_empty());
        assert!(pawn_attackers(Color::Black, sq(File::E, Rank::R8)).is_empty());
    }

    #[test]
    fn test_enpassant_attackers() {
        // the capturing side's pawns sit one file to either side on their own
        // fifth rank
        assert_eq!(
            enpassant_attackers(Color::White, File::A),
            Bitboard::from_raw(0x4000000000)
        );
        assert_eq!(
            enpassant_attackers(Color::White, File::B),
            Bitboard::from_raw(0xa000000000)
        );
        assert_eq!(
            enpassant_attackers(Color::Black, File::A),
            Bitboard::from_raw(0x40000000)
        );
        assert_eq!(
            enpassant_attackers(Color::Black, File::B),
            Bitboard::from_raw(0xa0000000)
        );
        assert_eq!(
            enpassant_attackers(Color::White, File::D),
            Bitboard::from_squares(&[sq(File::C, Rank::R5), sq(File::E, Rank::R5)])
        );
    }
}
