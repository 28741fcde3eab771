//! # Bitboard chess move generation
//!
//! Kitechess models a chess position on bitboards and enumerates every legal
//! half-move for the side to move. Moves are applied and reversed
//! incrementally with paired make/unmake, so a caller can walk the game tree
//! (e. g. for perft) without copying positions.
//!
//! Sliding-piece attacks use the classical precomputed-ray algorithm; the
//! ray, leaper and pawn-attacker tables are built at compile time.
//!
//! This crate supports the core functionality only:
//!
//! - parse FEN into a position
//! - generate pseudo-legal and legal moves
//! - make and unmake moves
//! - answer attack queries
//!
//! There is no search, no evaluation and no engine protocol here.
//!
//! ## Example
//!
//! ```
//! use kitechess::{movegen, Color, Position};
//!
//! // create a board with the initial position
//! let mut p = Position::initial();
//!
//! // generate all the legal moves
//! let mut moves = movegen::gen_legal(&p, p.side_to_move());
//! assert_eq!(moves.len(), 20);
//!
//! // make one of them, then take it back
//! let mv = &mut moves[0];
//! p.make(mv);
//! assert_eq!(p.side_to_move(), Color::Black);
//! p.unmake(mv);
//! assert_eq!(p, Position::initial());
//! ```

pub use kitechess_base::bitboard;
pub use kitechess_base::bitboard_consts;
pub use kitechess_base::geometry;
pub use kitechess_base::types;

pub mod board;
pub mod fen;
pub mod movegen;
pub mod moves;
pub mod ray;

mod castling;

pub use bitboard::Bitboard;
pub use board::{Position, PositionBuilder, START_FEN};
pub use movegen::MoveList;
pub use moves::Move;
pub use types::{CastlingRights, CastlingSide, Color, File, Piece, Rank, Square};
